use crate::entities::{Entity, EntityId, Outcome, Rect, TickContext};
use crate::feedback::Feedback;
use crate::pool::Poolable;

pub const BULLET_WIDTH: f32 = 16.0;
pub const BULLET_HEIGHT: f32 = 30.0;

/// Player projectile. Travels upward, tilted by `angle` radians from vertical
/// (positive = rightward).
#[derive(Clone, Debug)]
pub struct Bullet {
    id: EntityId,
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub angle: f32,
    active: bool,
    visible: bool,
}

impl Poolable for Bullet {
    const POOL_KEY: &'static str = "bullet";
}

impl Bullet {
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            speed: 0.0,
            angle: 0.0,
            active: false,
            visible: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    pub fn init(&mut self, x: f32, y: f32, speed: f32, angle: f32) {
        self.x = x;
        self.y = y;
        self.speed = speed;
        self.angle = angle;
        self.active = true;
        self.visible = true;
    }
}

impl Entity for Bullet {
    fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: BULLET_WIDTH,
            height: BULLET_HEIGHT,
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    fn update(&mut self, ctx: &TickContext) -> Outcome {
        if ctx.is_game_over {
            return Outcome::Continue;
        }

        self.y -= self.speed * self.angle.cos();
        self.x += self.speed * self.angle.sin();

        let off_top = self.y < -BULLET_HEIGHT;
        let off_sides = self.x < -BULLET_WIDTH || self.x > ctx.playfield.width + BULLET_WIDTH;
        if off_top || off_sides {
            return Outcome::Despawn;
        }
        Outcome::Continue
    }

    /// No explosion: a hit bullet goes straight back to the pool.
    fn destroy(&mut self, _feedback: &mut dyn Feedback) -> Outcome {
        self.active = false;
        Outcome::Despawn
    }

    fn remove(&mut self) {
        self.active = false;
        self.visible = false;
    }
}
