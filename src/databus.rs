//! Session state: frame counter, score, difficulty and the live entity
//! collections, plus the pool they are recycled through.
//!
//! One bus is built per application run and handed by reference to whoever
//! needs it; [`DataBus::reset`] rewinds it in place for a new session.

use rand::Rng;

use crate::bullet::Bullet;
use crate::config::GameConfig;
use crate::enemy::Enemy;
use crate::entities::{Entity, EntityId, IdAllocator, Outcome, Playfield, TickContext};
use crate::feedback::Feedback;
use crate::pool::{Pool, Poolable};

/// `get_upgrade_level` never reports more than this, whatever the table size.
pub const UPGRADE_LEVEL_CAP: u32 = 5;

// ── Difficulty curve ──────────────────────────────────────────────────────────

const BASE_SPAWN_INTERVAL: u64 = 30;
const SPAWN_INTERVAL_STEP: u64 = 4;
const MIN_SPAWN_INTERVAL: u64 = 10;
const SPEED_STEP: f32 = 0.3;
const SPECIAL_CHANCE_STEP: f32 = 0.15;
const MAX_SPECIAL_CHANCE: f32 = 0.6;

/// Ticks between two enemy spawns at `level`.
pub fn spawn_interval_for(level: u32) -> u64 {
    BASE_SPAWN_INTERVAL
        .saturating_sub(u64::from(level) * SPAWN_INTERVAL_STEP)
        .max(MIN_SPAWN_INTERVAL)
}

pub fn speed_multiplier_for(level: u32) -> f32 {
    1.0 + level as f32 * SPEED_STEP
}

/// Probability that a fresh enemy uses a special movement pattern.
pub fn special_chance_for(level: u32) -> f32 {
    (level as f32 * SPECIAL_CHANCE_STEP).min(MAX_SPECIAL_CHANCE)
}

/// Snapshot of the difficulty-derived values at one upgrade level.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Difficulty {
    pub spawn_interval: u64,
    pub speed_multiplier: f32,
    pub special_chance: f32,
}

impl Difficulty {
    pub fn at_level(level: u32) -> Self {
        Self {
            spawn_interval: spawn_interval_for(level),
            speed_multiplier: speed_multiplier_for(level),
            special_chance: special_chance_for(level),
        }
    }
}

// ── Bus ───────────────────────────────────────────────────────────────────────

#[derive(Debug)]
pub struct DataBus {
    frame: u64,
    score: u32,
    upgrade_level: u32,
    last_upgrade_score: u32,
    is_game_over: bool,
    enemies: Vec<Enemy>,
    bullets: Vec<Bullet>,
    /// Enemies currently playing their explosion.
    animations: Vec<EntityId>,
    pool: Pool,
    ids: IdAllocator,
    upgrade_thresholds: Vec<u32>,
    playfield: Playfield,
    fire_interval: u64,
}

impl DataBus {
    pub fn new(config: &GameConfig) -> Self {
        Self {
            frame: 0,
            score: 0,
            upgrade_level: 0,
            last_upgrade_score: 0,
            is_game_over: false,
            enemies: Vec::new(),
            bullets: Vec::new(),
            animations: Vec::new(),
            pool: Pool::new(),
            ids: IdAllocator::default(),
            upgrade_thresholds: config.upgrade_thresholds.clone(),
            playfield: config.playfield,
            fire_interval: config.fire_interval,
        }
    }

    // ── Session control ──────────────────────────────────────────────────────

    /// Rewind to a fresh session. Live entities go back to the pool; what was
    /// already pooled stays there.
    pub fn reset(&mut self) {
        for mut enemy in self.enemies.drain(..) {
            enemy.remove();
            self.pool.recover(Enemy::POOL_KEY, enemy);
        }
        for mut bullet in self.bullets.drain(..) {
            bullet.remove();
            self.pool.recover(Bullet::POOL_KEY, bullet);
        }
        self.animations.clear();

        self.frame = 0;
        self.score = 0;
        self.upgrade_level = 0;
        self.last_upgrade_score = 0;
        self.is_game_over = false;
        log::info!("session reset");
    }

    pub fn game_over(&mut self) {
        if !self.is_game_over {
            log::info!("game over at frame {} with score {}", self.frame, self.score);
        }
        self.is_game_over = true;
    }

    pub fn is_game_over(&self) -> bool {
        self.is_game_over
    }

    // ── Counters ─────────────────────────────────────────────────────────────

    pub fn frame(&self) -> u64 {
        self.frame
    }

    /// Step the frame counter; returns the new frame number.
    pub fn advance_frame(&mut self) -> u64 {
        self.frame += 1;
        self.frame
    }

    pub fn score(&self) -> u32 {
        self.score
    }

    /// Score only goes up within a session; `reset` is the one way back to 0.
    pub fn add_score(&mut self, points: u32) {
        self.score = self.score.saturating_add(points);
    }

    /// Score at which the current level was reached.
    pub fn last_upgrade_score(&self) -> u32 {
        self.last_upgrade_score
    }

    pub fn pool(&self) -> &Pool {
        &self.pool
    }

    // ── Read-only views ──────────────────────────────────────────────────────

    pub fn enemies(&self) -> &[Enemy] {
        &self.enemies
    }

    pub fn bullets(&self) -> &[Bullet] {
        &self.bullets
    }

    pub fn animations(&self) -> &[EntityId] {
        &self.animations
    }

    pub fn playfield(&self) -> Playfield {
        self.playfield
    }

    pub fn tick_context(&self) -> TickContext {
        TickContext {
            frame: self.frame,
            is_game_over: self.is_game_over,
            playfield: self.playfield,
            fire_interval: self.fire_interval,
        }
    }

    // ── Spawning ─────────────────────────────────────────────────────────────

    /// Fetch an enemy from the pool, roll a fresh spawn for it at the current
    /// difficulty and make it live.
    pub fn spawn_enemy(&mut self, rng: &mut impl Rng) -> EntityId {
        let difficulty = self.difficulty();
        let playfield = self.playfield;
        self.spawn_enemy_with(|enemy| enemy.init(&playfield, &difficulty, rng))
    }

    /// Fetch an enemy from the pool and initialise it with `init`.
    pub fn spawn_enemy_with(&mut self, init: impl FnOnce(&mut Enemy)) -> EntityId {
        let ids = &mut self.ids;
        let mut enemy = self
            .pool
            .get_item_by_class(Enemy::POOL_KEY, || Enemy::new(ids.next_id()));
        init(&mut enemy);
        let id = enemy.id();
        log::debug!("spawned enemy {id:?} at x={:.0}", enemy.x);
        self.enemies.push(enemy);
        id
    }

    pub fn spawn_bullet(&mut self, init: impl FnOnce(&mut Bullet)) -> EntityId {
        let ids = &mut self.ids;
        let mut bullet = self
            .pool
            .get_item_by_class(Bullet::POOL_KEY, || Bullet::new(ids.next_id()));
        init(&mut bullet);
        let id = bullet.id();
        self.bullets.push(bullet);
        id
    }

    // ── Removal & destruction ────────────────────────────────────────────────

    /// Take the enemy out of the active list and recycle it. Absent ids are a
    /// no-op; returns whether anything was removed.
    pub fn remove_enemy(&mut self, id: EntityId) -> bool {
        let Some(index) = self.enemies.iter().position(|e| e.id() == id) else {
            return false;
        };
        let mut enemy = self.enemies.remove(index);
        enemy.remove();
        self.animations.retain(|&a| a != id);
        self.pool.recover(Enemy::POOL_KEY, enemy);
        true
    }

    pub fn remove_bullet(&mut self, id: EntityId) -> bool {
        let Some(index) = self.bullets.iter().position(|b| b.id() == id) else {
            return false;
        };
        let mut bullet = self.bullets.remove(index);
        bullet.remove();
        self.pool.recover(Bullet::POOL_KEY, bullet);
        true
    }

    /// Start the enemy's explosion; it is recycled once playback ends.
    /// Enemies already exploding, or absent, are left alone.
    pub fn destroy_enemy(&mut self, id: EntityId, feedback: &mut dyn Feedback) -> bool {
        let Some(enemy) = self.enemies.iter_mut().find(|e| e.id() == id) else {
            return false;
        };
        if !enemy.is_active() {
            return false;
        }
        match enemy.destroy(feedback) {
            Outcome::Despawn => {
                self.remove_enemy(id);
            }
            _ => self.animations.push(id),
        }
        true
    }

    pub fn destroy_bullet(&mut self, id: EntityId, feedback: &mut dyn Feedback) -> bool {
        let Some(bullet) = self.bullets.iter_mut().find(|b| b.id() == id) else {
            return false;
        };
        if bullet.destroy(feedback) == Outcome::Despawn {
            self.remove_bullet(id);
        }
        true
    }

    // ── Per-tick passes ──────────────────────────────────────────────────────

    /// Update every live bullet once. Walks backward so a despawn only shifts
    /// elements that were already visited.
    pub fn update_bullets(&mut self) {
        let ctx = self.tick_context();
        for index in (0..self.bullets.len()).rev() {
            if self.bullets[index].update(&ctx) == Outcome::Despawn {
                let id = self.bullets[index].id();
                self.remove_bullet(id);
            }
        }
    }

    pub fn update_enemies(&mut self) {
        let ctx = self.tick_context();
        for index in (0..self.enemies.len()).rev() {
            if self.enemies[index].update(&ctx) == Outcome::Despawn {
                let id = self.enemies[index].id();
                self.remove_enemy(id);
            }
        }
    }

    // ── Upgrades & difficulty ────────────────────────────────────────────────

    /// Raise `upgrade_level` to the highest threshold the score meets.
    /// Returns `true` only when the level actually went up.
    pub fn check_upgrade(&mut self) -> bool {
        let reached = self
            .upgrade_thresholds
            .iter()
            .take_while(|&&required| self.score >= required)
            .count()
            .saturating_sub(1) as u32;

        if reached > self.upgrade_level {
            self.upgrade_level = reached;
            self.last_upgrade_score = self.score;
            log::info!("upgrade level {reached} reached at score {}", self.score);
            return true;
        }
        false
    }

    /// Score needed for the next level, or `None` at the top of the table.
    pub fn get_next_upgrade_score(&self) -> Option<u32> {
        let next = usize::try_from(self.upgrade_level).ok()?.checked_add(1)?;
        self.upgrade_thresholds.get(next).copied()
    }

    pub fn get_upgrade_level(&self) -> u32 {
        self.upgrade_level.min(UPGRADE_LEVEL_CAP)
    }

    pub fn difficulty(&self) -> Difficulty {
        Difficulty::at_level(self.get_upgrade_level())
    }

    pub fn get_enemy_spawn_interval(&self) -> u64 {
        spawn_interval_for(self.get_upgrade_level())
    }

    pub fn get_enemy_speed_multiplier(&self) -> f32 {
        speed_multiplier_for(self.get_upgrade_level())
    }

    pub fn get_special_enemy_chance(&self) -> f32 {
        special_chance_for(self.get_upgrade_level())
    }
}
