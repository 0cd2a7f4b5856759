mod common;

use std::collections::HashSet;

use common::{make_bus, seeded_rng, Recorder};
use sky_shooter::bullet::Bullet;
use sky_shooter::config::GameConfig;
use sky_shooter::databus::{
    spawn_interval_for, special_chance_for, speed_multiplier_for, DataBus, UPGRADE_LEVEL_CAP,
};
use sky_shooter::enemy::Enemy;
use sky_shooter::entities::{Entity, EntityId, EXPLOSION_FRAMES};
use sky_shooter::movement::Movement;
use sky_shooter::pool::Poolable;

fn spawn_bullet_at(bus: &mut DataBus, x: f32, y: f32) -> EntityId {
    bus.spawn_bullet(|b: &mut Bullet| b.init(x, y, 10.0, 0.0))
}

fn spawn_enemy_at(bus: &mut DataBus, x: f32, y: f32) -> EntityId {
    bus.spawn_enemy_with(|e| e.init_at(x, y, 4.0, Movement::Straight))
}

/// Every instance id is in exactly one place: an active list or the pool.
fn assert_exclusive(bus: &DataBus) {
    let active_enemies: HashSet<_> = bus.enemies().iter().map(Enemy::id).collect();
    let pooled_enemies: HashSet<_> = bus
        .pool()
        .iter_free::<Enemy>(Enemy::POOL_KEY)
        .map(Enemy::id)
        .collect();
    assert!(active_enemies.is_disjoint(&pooled_enemies));
    assert_eq!(
        pooled_enemies.len(),
        bus.pool().free_len(Enemy::POOL_KEY),
        "an enemy was recovered twice"
    );

    let active_bullets: HashSet<_> = bus.bullets().iter().map(Bullet::id).collect();
    let pooled_bullets: HashSet<_> = bus
        .pool()
        .iter_free::<Bullet>(Bullet::POOL_KEY)
        .map(Bullet::id)
        .collect();
    assert!(active_bullets.is_disjoint(&pooled_bullets));
    assert_eq!(pooled_bullets.len(), bus.pool().free_len(Bullet::POOL_KEY));
}

// ── reset / game_over ─────────────────────────────────────────────────────────

#[test]
fn new_bus_starts_clean() {
    let bus = make_bus();
    assert_eq!(bus.frame(), 0);
    assert_eq!(bus.score(), 0);
    assert_eq!(bus.get_upgrade_level(), 0);
    assert!(!bus.is_game_over());
    assert!(bus.enemies().is_empty());
    assert!(bus.bullets().is_empty());
}

#[test]
fn reset_clears_session_state() {
    let mut bus = make_bus();
    let mut rng = seeded_rng();
    bus.spawn_enemy(&mut rng);
    spawn_bullet_at(&mut bus, 10.0, 10.0);
    for _ in 0..120 {
        bus.advance_frame();
    }
    bus.add_score(42);
    bus.check_upgrade();
    bus.game_over();

    bus.reset();

    assert!(bus.enemies().is_empty());
    assert!(bus.bullets().is_empty());
    assert!(bus.animations().is_empty());
    assert_eq!(bus.frame(), 0);
    assert_eq!(bus.score(), 0);
    assert_eq!(bus.get_upgrade_level(), 0);
    assert_eq!(bus.last_upgrade_score(), 0);
    assert!(!bus.is_game_over());
}

#[test]
fn reset_keeps_pooled_instances_and_recycles_live_ones() {
    let mut bus = make_bus();
    let pooled = spawn_bullet_at(&mut bus, 0.0, 0.0);
    bus.remove_bullet(pooled);
    let live = spawn_bullet_at(&mut bus, 0.0, 0.0);
    // The pooled instance was reused for the second spawn.
    assert_eq!(pooled, live);
    let other = spawn_bullet_at(&mut bus, 5.0, 5.0);

    bus.reset();

    let free: Vec<_> = bus.pool().iter_free::<Bullet>(Bullet::POOL_KEY).collect();
    assert_eq!(free.len(), 2);
    assert!(free.iter().all(|b| !b.is_active() && !b.is_visible()));
    assert!(free.iter().any(|b| b.id() == other));
    assert_exclusive(&bus);
}

#[test]
fn game_over_is_one_way_until_reset() {
    let mut bus = make_bus();
    bus.game_over();
    bus.game_over();
    assert!(bus.is_game_over());
    bus.add_score(10);
    bus.check_upgrade();
    assert!(bus.is_game_over());
    bus.reset();
    assert!(!bus.is_game_over());
}

// ── remove_enemy / remove_bullet ──────────────────────────────────────────────

#[test]
fn remove_bullet_recycles_into_pool() {
    let mut bus = make_bus();
    let id = spawn_bullet_at(&mut bus, 10.0, 10.0);
    assert!(bus.remove_bullet(id));
    assert!(bus.bullets().is_empty());
    assert_eq!(bus.pool().free_len(Bullet::POOL_KEY), 1);
    assert_exclusive(&bus);
}

#[test]
fn removing_twice_only_recycles_once() {
    let mut bus = make_bus();
    let id = spawn_enemy_at(&mut bus, 10.0, 10.0);
    assert!(bus.remove_enemy(id));
    assert!(!bus.remove_enemy(id));
    assert_eq!(bus.pool().free_len(Enemy::POOL_KEY), 1);

    let bid = spawn_bullet_at(&mut bus, 0.0, 0.0);
    assert!(bus.remove_bullet(bid));
    assert!(!bus.remove_bullet(bid));
    assert_eq!(bus.pool().free_len(Bullet::POOL_KEY), 1);
    assert_exclusive(&bus);
}

#[test]
fn removing_absent_handle_is_noop() {
    let mut bus = make_bus();
    let kept = spawn_enemy_at(&mut bus, 10.0, 10.0);
    assert!(!bus.remove_enemy(EntityId(999)));
    assert_eq!(bus.enemies().len(), 1);
    assert_eq!(bus.enemies()[0].id(), kept);
    assert_eq!(bus.pool().free_len(Enemy::POOL_KEY), 0);
}

#[test]
fn removal_preserves_order_of_remaining() {
    let mut bus = make_bus();
    let a = spawn_bullet_at(&mut bus, 0.0, 100.0);
    let b = spawn_bullet_at(&mut bus, 0.0, 100.0);
    let c = spawn_bullet_at(&mut bus, 0.0, 100.0);
    bus.remove_bullet(b);
    let ids: Vec<_> = bus.bullets().iter().map(Bullet::id).collect();
    assert_eq!(ids, vec![a, c]);
}

#[test]
fn exclusivity_holds_across_many_cycles() {
    let mut bus = make_bus();
    let mut rng = seeded_rng();
    for round in 0..50 {
        let id = bus.spawn_enemy(&mut rng);
        let bid = spawn_bullet_at(&mut bus, 1.0, 1.0);
        if round % 3 == 0 {
            bus.remove_enemy(id);
        }
        if round % 2 == 0 {
            bus.remove_bullet(bid);
        }
        assert_exclusive(&bus);
    }
    bus.reset();
    assert_exclusive(&bus);
}

// ── destroy ───────────────────────────────────────────────────────────────────

#[test]
fn destroyed_enemy_stays_until_explosion_finishes() {
    let mut bus = make_bus();
    let mut feedback = Recorder::default();
    let id = spawn_enemy_at(&mut bus, 100.0, 100.0);

    assert!(bus.destroy_enemy(id, &mut feedback));
    assert_eq!(bus.animations(), &[id]);
    assert!(!bus.enemies()[0].is_active());
    assert!(bus.enemies()[0].is_visible());

    for _ in 0..EXPLOSION_FRAMES - 1 {
        bus.update_enemies();
        assert_eq!(bus.enemies().len(), 1);
    }
    bus.update_enemies();
    assert!(bus.enemies().is_empty());
    assert!(bus.animations().is_empty());
    assert_eq!(bus.pool().free_len(Enemy::POOL_KEY), 1);
    assert_eq!(feedback.explosions, 1);
}

#[test]
fn destroying_exploding_enemy_is_ignored() {
    let mut bus = make_bus();
    let mut feedback = Recorder::default();
    let id = spawn_enemy_at(&mut bus, 100.0, 100.0);
    assert!(bus.destroy_enemy(id, &mut feedback));
    assert!(!bus.destroy_enemy(id, &mut feedback));
    assert_eq!(feedback.explosions, 1);
    assert_eq!(bus.animations().len(), 1);
}

#[test]
fn destroyed_bullet_is_recycled_immediately() {
    let mut bus = make_bus();
    let mut feedback = Recorder::default();
    let id = spawn_bullet_at(&mut bus, 10.0, 10.0);
    assert!(bus.destroy_bullet(id, &mut feedback));
    assert!(bus.bullets().is_empty());
    assert_eq!(bus.pool().free_len(Bullet::POOL_KEY), 1);
    assert_eq!(feedback.explosions, 0);
}

// ── update passes ─────────────────────────────────────────────────────────────

#[test]
fn update_pass_handles_adjacent_despawns() {
    let mut bus = make_bus();
    // Middle two leave the top this tick; outer two stay.
    let a = spawn_bullet_at(&mut bus, 50.0, 300.0);
    spawn_bullet_at(&mut bus, 50.0, -30.0);
    spawn_bullet_at(&mut bus, 50.0, -30.0);
    let d = spawn_bullet_at(&mut bus, 50.0, 300.0);

    bus.update_bullets();

    let ids: Vec<_> = bus.bullets().iter().map(Bullet::id).collect();
    assert_eq!(ids, vec![a, d]);
    // Each survivor moved exactly once.
    assert!(bus.bullets().iter().all(|b| b.y == 290.0));
    assert_eq!(bus.pool().free_len(Bullet::POOL_KEY), 2);
}

#[test]
fn update_pass_frozen_after_game_over() {
    let mut bus = make_bus();
    spawn_enemy_at(&mut bus, 100.0, 100.0);
    spawn_bullet_at(&mut bus, 50.0, 300.0);
    bus.game_over();

    bus.update_enemies();
    bus.update_bullets();

    assert_eq!(bus.enemies()[0].y, 100.0);
    assert_eq!(bus.bullets()[0].y, 300.0);
}

// ── check_upgrade ─────────────────────────────────────────────────────────────

#[test]
fn check_upgrade_fires_exactly_on_level_changes() {
    let mut bus = make_bus();
    let mut levels_seen = Vec::new();
    let mut last = 0;
    for score in 0..=200 {
        if score > 0 {
            bus.add_score(1);
        }
        assert_eq!(bus.score(), score);
        let upgraded = bus.check_upgrade();
        let level = bus.get_upgrade_level();
        assert!(level >= last, "level went down at score {score}");
        assert_eq!(upgraded, level > last, "score {score}");
        if upgraded {
            levels_seen.push((score, level));
            assert_eq!(bus.last_upgrade_score(), score);
        }
        last = level;
    }
    assert_eq!(
        levels_seen,
        vec![(10, 1), (30, 2), (60, 3), (100, 4), (150, 5)]
    );
}

#[test]
fn check_upgrade_can_skip_levels() {
    let mut bus = make_bus();
    bus.add_score(65);
    assert!(bus.check_upgrade());
    assert_eq!(bus.get_upgrade_level(), 3);
    assert!(!bus.check_upgrade());
    assert_eq!(bus.last_upgrade_score(), 65);
}

#[test]
fn upgrade_level_is_capped() {
    let config = GameConfig {
        upgrade_thresholds: vec![0, 1, 2, 3, 4, 5, 6, 7, 8],
        ..GameConfig::default()
    };
    let mut bus = DataBus::new(&config);
    bus.add_score(100);
    assert!(bus.check_upgrade());
    assert_eq!(bus.get_upgrade_level(), UPGRADE_LEVEL_CAP);
    // Levels past the cap are still tracked; the table has no next entry.
    assert_eq!(bus.get_next_upgrade_score(), None);
    assert!(!bus.check_upgrade());
    assert_eq!(bus.get_upgrade_level(), UPGRADE_LEVEL_CAP);
}

#[test]
fn next_upgrade_score_walks_the_table() {
    let mut bus = make_bus();
    assert_eq!(bus.get_next_upgrade_score(), Some(10));
    bus.add_score(30);
    bus.check_upgrade();
    assert_eq!(bus.get_next_upgrade_score(), Some(60));
    bus.add_score(470);
    bus.check_upgrade();
    assert_eq!(bus.get_next_upgrade_score(), None);
}

// ── difficulty ────────────────────────────────────────────────────────────────

#[test]
fn spawn_interval_decreases_to_floor() {
    assert_eq!(spawn_interval_for(0), 30);
    assert_eq!(spawn_interval_for(1), 26);
    assert_eq!(spawn_interval_for(5), 10);
    assert_eq!(spawn_interval_for(50), 10);
}

#[test]
fn speed_multiplier_is_linear() {
    assert_eq!(speed_multiplier_for(0), 1.0);
    assert!((speed_multiplier_for(5) - 2.5).abs() < 1e-6);
}

#[test]
fn special_chance_is_capped() {
    assert_eq!(special_chance_for(0), 0.0);
    assert!((special_chance_for(2) - 0.3).abs() < 1e-6);
    assert!((special_chance_for(4) - 0.6).abs() < 1e-6);
    assert!((special_chance_for(5) - 0.6).abs() < 1e-6);
}

#[test]
fn bus_difficulty_follows_capped_level() {
    let config = GameConfig {
        upgrade_thresholds: (0..10).collect(),
        ..GameConfig::default()
    };
    let mut bus = DataBus::new(&config);
    bus.add_score(9);
    bus.check_upgrade();
    assert_eq!(bus.get_enemy_spawn_interval(), spawn_interval_for(5));
    assert_eq!(bus.get_enemy_speed_multiplier(), speed_multiplier_for(5));
    assert_eq!(bus.get_special_enemy_chance(), special_chance_for(5));
}

// ── counters ──────────────────────────────────────────────────────────────────

#[test]
fn score_only_moves_up_until_reset() {
    let mut bus = make_bus();
    bus.add_score(30);
    bus.check_upgrade();
    bus.add_score(u32::MAX);
    assert_eq!(bus.score(), u32::MAX);
    assert!(bus.check_upgrade());
    assert_eq!(bus.get_upgrade_level(), 5);

    // Nothing short of reset lowers the level again.
    assert!(!bus.check_upgrade());
    assert_eq!(bus.get_upgrade_level(), 5);
    bus.reset();
    assert_eq!(bus.score(), 0);
    assert_eq!(bus.get_upgrade_level(), 0);
}

#[test]
fn advance_frame_counts_up_from_zero() {
    let mut bus = make_bus();
    assert_eq!(bus.advance_frame(), 1);
    assert_eq!(bus.advance_frame(), 2);
    assert_eq!(bus.frame(), 2);
}
