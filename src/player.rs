use crate::databus::DataBus;
use crate::entities::{Entity, EntityId, Explosion, Outcome, Playfield, Rect, TickContext};
use crate::feedback::{Feedback, Vibration};
use crate::weapon;

pub const PLAYER_WIDTH: f32 = 80.0;
pub const PLAYER_HEIGHT: f32 = 80.0;

/// Gap kept between the plane and the bottom edge at spawn.
const BOTTOM_MARGIN: f32 = 30.0;

/// Slack around the plane within which a touch still grabs it.
const GRAB_MARGIN: f32 = 30.0;

#[derive(Clone, Debug)]
pub struct Player {
    pub x: f32,
    pub y: f32,
    /// A pointer grabbed the plane and is dragging it.
    pub touched: bool,
    pub explosion: Explosion,
    playfield: Playfield,
    active: bool,
    visible: bool,
}

impl Player {
    pub fn new(playfield: Playfield) -> Self {
        let mut player = Self {
            x: 0.0,
            y: 0.0,
            touched: false,
            explosion: Explosion::default(),
            playfield,
            active: false,
            visible: false,
        };
        player.init();
        player
    }

    /// Back to the spawn point, bottom centre.
    pub fn init(&mut self) {
        self.x = self.playfield.width / 2.0 - PLAYER_WIDTH / 2.0;
        self.y = self.playfield.height - PLAYER_HEIGHT - BOTTOM_MARGIN;
        self.touched = false;
        self.explosion.reset();
        self.active = true;
        self.visible = true;
    }

    // ── Pointer hooks ────────────────────────────────────────────────────────

    /// Whether `(x, y)` lands on the plane, with a forgiving margin.
    pub fn check_is_finger_on_air(&self, x: f32, y: f32) -> bool {
        x >= self.x - GRAB_MARGIN
            && y >= self.y - GRAB_MARGIN
            && x <= self.x + PLAYER_WIDTH + GRAB_MARGIN
            && y <= self.y + PLAYER_HEIGHT + GRAB_MARGIN
    }

    /// Centre the plane on the pointer, kept inside the playfield.
    pub fn set_position_from_pointer(&mut self, x: f32, y: f32) {
        self.x = self.playfield.clamp_x(x - PLAYER_WIDTH / 2.0, PLAYER_WIDTH);
        self.y = self.playfield.clamp_y(y - PLAYER_HEIGHT / 2.0, PLAYER_HEIGHT);
    }

    pub fn pointer_down(&mut self, x: f32, y: f32, is_game_over: bool) {
        if is_game_over {
            return;
        }
        if self.check_is_finger_on_air(x, y) {
            self.touched = true;
            self.set_position_from_pointer(x, y);
        }
    }

    pub fn pointer_move(&mut self, x: f32, y: f32, is_game_over: bool) {
        if is_game_over {
            return;
        }
        if self.touched {
            self.set_position_from_pointer(x, y);
        }
    }

    /// Pointer released or cancelled.
    pub fn pointer_up(&mut self) {
        self.touched = false;
    }

    // ── Firing ───────────────────────────────────────────────────────────────

    pub fn shoot(&self, bus: &mut DataBus, feedback: &mut dyn Feedback) -> Vec<EntityId> {
        let volley = weapon::fire(bus, self.bounds());
        feedback.play_shoot();
        volley
    }

    /// Keep the explosion playing after the session has ended.
    pub fn advance_explosion(&mut self) -> bool {
        let finished = self.explosion.advance();
        if finished {
            self.visible = false;
        }
        finished
    }
}

impl Entity for Player {
    fn bounds(&self) -> Rect {
        Rect {
            x: self.x,
            y: self.y,
            width: PLAYER_WIDTH,
            height: PLAYER_HEIGHT,
        }
    }

    fn is_active(&self) -> bool {
        self.active
    }

    fn is_visible(&self) -> bool {
        self.visible
    }

    /// Requests a volley every `fire_interval` ticks.
    fn update(&mut self, ctx: &TickContext) -> Outcome {
        if ctx.is_game_over || !self.active {
            return Outcome::Continue;
        }
        if ctx.frame % ctx.fire_interval.max(1) == 0 {
            return Outcome::Fire;
        }
        Outcome::Continue
    }

    fn destroy(&mut self, feedback: &mut dyn Feedback) -> Outcome {
        self.active = false;
        self.touched = false;
        self.explosion.start();
        feedback.play_explosion();
        feedback.vibrate(Vibration::Medium);
        Outcome::Continue
    }

    fn remove(&mut self) {
        self.active = false;
        self.visible = false;
    }
}
