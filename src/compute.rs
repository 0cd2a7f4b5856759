//! Frame driver.
//!
//! [`Game::tick`] runs exactly one simulation step: player, bullets,
//! enemies, spawning, then collisions. All randomness comes through the
//! injected RNG so a seeded RNG replays a session exactly.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bullet::Bullet;
use crate::config::GameConfig;
use crate::databus::DataBus;
use crate::enemy::Enemy;
use crate::entities::{Entity, EntityId, Outcome};
use crate::feedback::Feedback;
use crate::player::Player;

/// Seeded when `seed` is given, otherwise from OS entropy.
pub fn session_rng(seed: Option<u64>) -> StdRng {
    match seed {
        Some(seed) => StdRng::seed_from_u64(seed),
        None => StdRng::from_entropy(),
    }
}

/// What happened during one tick, for the front-end.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TickEvents {
    pub volley: Vec<EntityId>,
    pub spawned: Option<EntityId>,
    pub kills: u32,
    pub upgraded: bool,
    pub game_over: bool,
}

pub struct Game<R: Rng, F: Feedback> {
    pub bus: DataBus,
    pub player: Player,
    rng: R,
    feedback: F,
}

impl<R: Rng, F: Feedback> Game<R, F> {
    pub fn new(config: &GameConfig, rng: R, feedback: F) -> Self {
        Self {
            bus: DataBus::new(config),
            player: Player::new(config.playfield),
            rng,
            feedback,
        }
    }

    pub fn feedback(&self) -> &F {
        &self.feedback
    }

    pub fn feedback_mut(&mut self) -> &mut F {
        &mut self.feedback
    }

    /// Start a new session on the same bus and pool.
    pub fn restart(&mut self) {
        self.bus.reset();
        self.player.init();
    }

    // ── Pointer input ────────────────────────────────────────────────────────

    pub fn pointer_down(&mut self, x: f32, y: f32) {
        self.player.pointer_down(x, y, self.bus.is_game_over());
    }

    pub fn pointer_move(&mut self, x: f32, y: f32) {
        self.player.pointer_move(x, y, self.bus.is_game_over());
    }

    pub fn pointer_up(&mut self) {
        self.player.pointer_up();
    }

    // ── Tick ─────────────────────────────────────────────────────────────────

    /// Advance the simulation by one frame. After game over only the
    /// player's explosion keeps playing.
    pub fn tick(&mut self) -> TickEvents {
        let mut events = TickEvents::default();

        if self.bus.is_game_over() {
            self.player.advance_explosion();
            return events;
        }

        let frame = self.bus.advance_frame();

        let ctx = self.bus.tick_context();
        if self.player.update(&ctx) == Outcome::Fire {
            events.volley = self.player.shoot(&mut self.bus, &mut self.feedback);
        }

        self.bus.update_bullets();
        self.bus.update_enemies();

        if frame % self.bus.get_enemy_spawn_interval() == 0 {
            events.spawned = Some(self.bus.spawn_enemy(&mut self.rng));
        }

        self.collision_detection(&mut events);
        events
    }

    /// Bullet ↔ enemy first (each bullet hits at most one enemy), then
    /// enemy ↔ player.
    fn collision_detection(&mut self, events: &mut TickEvents) {
        let bullet_ids: Vec<EntityId> = self.bus.bullets().iter().map(Bullet::id).collect();

        for bullet_id in bullet_ids {
            let Some(bullet) = self.bus.bullets().iter().find(|b| b.id() == bullet_id) else {
                continue;
            };
            let target = self
                .bus
                .enemies()
                .iter()
                .find(|e| e.is_active() && e.collides_with(bullet))
                .map(Enemy::id);
            let Some(enemy_id) = target else {
                continue;
            };

            self.bus.destroy_enemy(enemy_id, &mut self.feedback);
            self.bus.destroy_bullet(bullet_id, &mut self.feedback);
            self.bus.add_score(1);
            events.kills += 1;
            if self.bus.check_upgrade() {
                events.upgraded = true;
            }
        }

        if !self.player.is_active() {
            return;
        }
        let crashed = self
            .bus
            .enemies()
            .iter()
            .any(|e| e.is_active() && self.player.collides_with(e));
        if crashed {
            self.player.destroy(&mut self.feedback);
            self.bus.game_over();
            events.game_over = true;
        }
    }
}
