use rand::Rng;

use crate::databus::Difficulty;
use crate::entities::{Entity, EntityId, Explosion, Outcome, Playfield, Rect, TickContext};
use crate::feedback::{Feedback, Vibration};
use crate::movement::Movement;
use crate::pool::Poolable;

pub const ENEMY_WIDTH: f32 = 60.0;
pub const ENEMY_HEIGHT: f32 = 60.0;

/// Range of the per-spawn base speed, before the difficulty multiplier.
const BASE_SPEED_MIN: f32 = 3.0;
const BASE_SPEED_MAX: f32 = 9.0;

#[derive(Clone, Debug)]
pub struct Enemy {
    id: EntityId,
    pub x: f32,
    pub y: f32,
    pub speed: f32,
    pub movement: Movement,
    pub explosion: Explosion,
    active: bool,
    visible: bool,
}

impl Poolable for Enemy {
    const POOL_KEY: &'static str = "enemy";
}

impl Enemy {
    /// A blank, inactive instance. Call [`Enemy::init`] before use.
    pub fn new(id: EntityId) -> Self {
        Self {
            id,
            x: 0.0,
            y: 0.0,
            speed: 0.0,
            movement: Movement::Straight,
            explosion: Explosion::default(),
            active: false,
            visible: false,
        }
    }

    pub fn id(&self) -> EntityId {
        self.id
    }

    /// Fully re-initialise for a new spawn just above the top edge.
    pub fn init(&mut self, playfield: &Playfield, difficulty: &Difficulty, rng: &mut impl Rng) {
        let max_x = playfield.max_x(ENEMY_WIDTH);
        self.x = if max_x > 0.0 {
            rng.gen_range(0.0..max_x).floor()
        } else {
            0.0
        };
        self.y = -ENEMY_HEIGHT;

        let base_speed = rng.gen_range(BASE_SPEED_MIN..BASE_SPEED_MAX);
        self.speed = base_speed * difficulty.speed_multiplier;
        self.movement = Movement::roll(difficulty.special_chance, self.x, rng);

        self.explosion.reset();
        self.active = true;
        self.visible = true;
    }

    /// Place the enemy explicitly, bypassing the random roll.
    pub fn init_at(&mut self, x: f32, y: f32, speed: f32, movement: Movement) {
        self.x = x;
        self.y = y;
        self.speed = speed;
        self.movement = movement;
        self.explosion.reset();
        self.active = true;
        self.visible = true;
    }

    pub fn is_exploding(&self) -> bool {
        self.explosion.is_playing()
    }
}

impl Entity for Enemy {
    fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: ENEMY_WIDTH,
            height: ENEMY_HEIGHT,
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

        if !self.active {
            if self.explosion.advance() {
                return Outcome::Despawn;
            }
            return Outcome::Continue;
        }

        self.y += self.speed;
        self.x = self
            .movement
            .step_x(self.x, self.y, ENEMY_WIDTH, &ctx.playfield);

        if self.y > ctx.playfield.height + ENEMY_HEIGHT {
            return Outcome::Despawn;
        }
        Outcome::Continue
    }

    fn destroy(&mut self, feedback: &mut dyn Feedback) -> Outcome {
        self.active = false;
        self.explosion.start();
        feedback.play_explosion();
        feedback.vibrate(Vibration::Light);
        Outcome::Continue
    }

    fn remove(&mut self) {
        self.active = false;
        self.visible = false;
        self.explosion.reset();
    }
}
