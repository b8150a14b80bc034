mod common;

use bevy::prelude::*;
use bevy_bullet_ops::pipeline::{perform_pending_actions_on_sticky_end, process_collision_ops, process_collision_ordered};
use bevy_bullet_ops::prelude::*;
use bevy_bullet_ops::world::SimContext;

use common::{approx, entities, RecordingHooks, SceneWorld};

fn surface(position: Vec3, normal: Vec3, collider: Option<Entity>) -> Impact {
    Impact {
        position,
        normal,
        next_position: position,
        collider,
        is_enemy: false,
    }
}

fn enemy(position: Vec3, normal: Vec3, enemy: Entity) -> Impact {
    Impact {
        position,
        normal,
        next_position: position + Vec3::NEG_Z,
        collider: Some(enemy),
        is_enemy: true,
    }
}

#[test]
fn test_ricochet_off_floor() {
    let world = SceneWorld::default();
    let mut hooks = RecordingHooks::default();
    let config = BulletOpsConfig::default();
    let mut ctx = SimContext::new(&world, &mut hooks, &config);

    let archetype = Archetype::new(0.05)
        .with_collision_op(CollisionOp::Bounce)
        .with_bounce(BounceConfig::new(0.1, 0.8, 1));
    let mut bullet = BulletData::new(ArchetypeId(0), Vec3::new(0.0, 0.5, 0.0), Vec3::new(0.0, -10.0, 0.0), 100.0);

    process_collision_ordered(&mut bullet, &archetype, &surface(Vec3::ZERO, Vec3::Y, None), &mut ctx);

    assert!(approx(bullet.velocity, Vec3::new(0.0, 8.0, 0.0)));
    assert!((bullet.damage - 90.0).abs() < 1e-4);
    assert_eq!(bullet.bounce_count, 1);
    assert!(bullet.active);
}

#[test]
fn test_sticky_on_static_collider() {
    let ids = entities(1);
    let wall = ids[0];
    let world = SceneWorld::default();
    let mut hooks = RecordingHooks::default();
    let config = BulletOpsConfig::default();
    let mut ctx = SimContext::new(&world, &mut hooks, &config);

    let archetype = Archetype::new(0.05)
        .with_collision_op(CollisionOp::Sticky)
        .with_sticky(StickyConfig::new(2.0, 1.0));
    let mut bullet = BulletData::new(ArchetypeId(0), Vec3::new(1.0, 5.0, 3.0), Vec3::new(0.0, -20.0, 0.0), 10.0);

    let outcome = process_collision_ordered(&mut bullet, &archetype, &surface(Vec3::new(1.0, 2.0, 3.0), Vec3::Y, Some(wall)), &mut ctx);

    assert_eq!(outcome, ChainOutcome::Paused { resume_at: 1 });
    assert_eq!(bullet.velocity, Vec3::ZERO);
    assert_eq!(bullet.position, Vec3::new(1.0, 2.0, 3.0));
    assert_eq!(bullet.stuck_target, Some(wall));
    assert_eq!(bullet.pending_action_index, Some(1));
    assert!(bullet.pending_snapshot.is_some());
    assert!(bullet.active);
    assert!(hooks.damage.is_empty());
}

#[test]
fn test_pierce_then_explode_uses_reduced_damage() {
    let ids = entities(1);
    let target = ids[0];
    let world = SceneWorld::default().with_enemy(target, Vec3::new(0.0, 0.0, -5.0));
    let mut hooks = RecordingHooks::default();
    let config = BulletOpsConfig::default();
    let mut ctx = SimContext::new(&world, &mut hooks, &config);

    let archetype = Archetype::new(0.05)
        .with_collision_op(CollisionOp::Pierce)
        .with_collision_op(CollisionOp::Explode)
        .with_pierce(PierceConfig::new(0.2, 0.9, 3, 0.1))
        .with_explosive(ExplosiveConfig::new(3.0, 1.0));
    let mut bullet = BulletData::new(ArchetypeId(0), Vec3::new(0.0, 0.0, -4.0), Vec3::NEG_Z * 50.0, 100.0);

    let outcome = process_collision_ordered(&mut bullet, &archetype, &enemy(Vec3::new(0.0, 0.0, -4.8), Vec3::Z, target), &mut ctx);

    assert_eq!(outcome, ChainOutcome::Completed { keep_alive: true });
    assert_eq!(bullet.damage, 80.0);
    assert!(approx(bullet.velocity, Vec3::NEG_Z * 45.0));
    assert_eq!(bullet.penetration_count, 1);
    assert!(bullet.active);
    assert_eq!(hooks.explosions.len(), 1);
    assert_eq!(hooks.damage, vec![(target, 80.0)]);
    assert_eq!(hooks.dealt[0].snapshot.damage, 80.0);
}

#[test]
fn test_pierce_counts_until_max_then_stops() {
    let ids = entities(1);
    let target = ids[0];
    let world = SceneWorld::default().with_enemy(target, Vec3::ZERO);
    let mut hooks = RecordingHooks::default();
    let config = BulletOpsConfig::default();
    let mut ctx = SimContext::new(&world, &mut hooks, &config);

    let archetype = Archetype::new(0.05)
        .with_collision_op(CollisionOp::Pierce)
        .with_pierce(PierceConfig::new(0.5, 1.0, 2, 0.0));
    let mut bullet = BulletData::new(ArchetypeId(0), Vec3::Z, Vec3::NEG_Z * 10.0, 64.0);

    let mut previous = bullet.damage;
    for expected_count in 1..=2 {
        process_collision_ordered(&mut bullet, &archetype, &enemy(Vec3::ZERO, Vec3::Z, target), &mut ctx);
        assert_eq!(bullet.penetration_count, expected_count);
        assert!(bullet.active);
        assert!(bullet.damage <= previous);
        previous = bullet.damage;
    }

    // At the cap the pierce op is a no-op and the default destroy applies
    process_collision_ordered(&mut bullet, &archetype, &enemy(Vec3::ZERO, Vec3::Z, target), &mut ctx);
    assert_eq!(bullet.penetration_count, 2);
    assert_eq!(bullet.damage, 16.0);
    assert!(!bullet.active);
}

#[test]
fn test_sticky_then_bounce_resumes_off_moving_host() {
    let ids = entities(1);
    let host = ids[0];
    let mut world = SceneWorld::default().with_static(host, Transform::from_xyz(0.0, 0.0, 0.0));
    let config = BulletOpsConfig::default();

    let archetype = Archetype::new(0.1)
        .with_collision_op(CollisionOp::Sticky)
        .with_collision_op(CollisionOp::Bounce)
        .with_sticky(StickyConfig::new(0.5, 0.0))
        .with_bounce(BounceConfig::new(0.5, 1.0, 1));
    let mut bullet = BulletData::new(ArchetypeId(0), Vec3::new(0.0, 2.0, 0.0), Vec3::NEG_Y * 6.0, 10.0);

    {
        let mut hooks = RecordingHooks::default();
        let mut ctx = SimContext::new(&world, &mut hooks, &config);
        process_collision_ordered(&mut bullet, &archetype, &surface(Vec3::new(0.0, 1.0, 0.0), Vec3::Y, Some(host)), &mut ctx);
    }

    // Host platform tips onto its side and drifts
    world.move_actor(
        host,
        Transform::from_xyz(3.0, 0.0, 0.0).with_rotation(Quat::from_rotation_z(-std::f32::consts::FRAC_PI_2)),
    );
    bullet.velocity = bullet.stuck_pre_velocity;

    let mut hooks = RecordingHooks::default();
    let mut ctx = SimContext::new(&world, &mut hooks, &config);
    let outcome = perform_pending_actions_on_sticky_end(&mut bullet, &archetype, &mut ctx);

    assert_eq!(outcome, Some(ChainOutcome::Completed { keep_alive: true }));
    // Local +Y now faces world +X, so the contact and normal rotate with the host
    assert!(approx(bullet.position, Vec3::new(4.1, 0.0, 0.0)));
    assert_eq!(bullet.bounce_count, 1);
    assert_eq!(bullet.damage, 5.0);
    assert_eq!(bullet.pending_action_index, None);
    assert!(bullet.pending_snapshot.is_none());
}

#[test]
fn test_resume_is_idempotent_once_cleared() {
    let world = SceneWorld::default();
    let mut hooks = RecordingHooks::default();
    let config = BulletOpsConfig::default();
    let mut ctx = SimContext::new(&world, &mut hooks, &config);

    let archetype = presets::sticky_bomb();
    let mut bullet = BulletData::new(ArchetypeId(0), Vec3::ZERO, Vec3::NEG_Y, 10.0);
    process_collision_ordered(&mut bullet, &archetype, &surface(Vec3::ZERO, Vec3::Y, None), &mut ctx);
    assert!(perform_pending_actions_on_sticky_end(&mut bullet, &archetype, &mut ctx).is_some());

    let after_first = bullet.clone();
    assert!(perform_pending_actions_on_sticky_end(&mut bullet, &archetype, &mut ctx).is_none());
    assert_eq!(bullet, after_first);
    assert_eq!(hooks.explosions.len(), 1);
}

#[test]
fn test_failed_damage_does_not_break_chain() {
    let ids = entities(2);
    let world = SceneWorld::default()
        .with_enemy(ids[0], Vec3::ZERO)
        .with_enemy(ids[1], Vec3::X);
    let mut hooks = RecordingHooks::default();
    hooks.rejected.insert(ids[0]);
    let config = BulletOpsConfig::default();
    let mut ctx = SimContext::new(&world, &mut hooks, &config);

    let archetype = Archetype::new(0.05)
        .with_collision_op(CollisionOp::Explode)
        .with_collision_op(CollisionOp::Bounce)
        .with_explosive(ExplosiveConfig::new(2.0, 1.0))
        .with_bounce(BounceConfig::new(0.0, 1.0, 1));
    let mut bullet = BulletData::new(ArchetypeId(0), Vec3::Y, Vec3::NEG_Y, 10.0);

    let outcome = process_collision_ordered(&mut bullet, &archetype, &enemy(Vec3::ZERO, Vec3::Y, ids[0]), &mut ctx);

    assert_eq!(outcome, ChainOutcome::Completed { keep_alive: true });
    assert_eq!(hooks.damage, vec![(ids[1], 10.0)]);
    assert_eq!(bullet.bounce_count, 1);
}

#[test]
fn test_explicit_start_index_skips_earlier_ops() {
    let world = SceneWorld::default();
    let mut hooks = RecordingHooks::default();
    let config = BulletOpsConfig::default();
    let mut ctx = SimContext::new(&world, &mut hooks, &config);

    let archetype = Archetype::new(0.05)
        .with_collision_op(CollisionOp::Explode)
        .with_collision_op(CollisionOp::Bounce)
        .with_explosive(ExplosiveConfig::new(2.0, 1.0))
        .with_bounce(BounceConfig::new(0.0, 1.0, 1));
    let mut bullet = BulletData::new(ArchetypeId(0), Vec3::Y, Vec3::NEG_Y, 10.0);
    let impact = surface(Vec3::ZERO, Vec3::Y, None);

    let snapshot = impact.snapshot(bullet.damage);
    process_collision_ops(&mut bullet, &archetype, &impact, 1, snapshot, &mut ctx);

    assert!(hooks.explosions.is_empty());
    assert_eq!(bullet.bounce_count, 1);
}

#[test]
fn test_paused_chain_survives_save_and_restore() {
    let ids = entities(1);
    let host = ids[0];
    let world = SceneWorld::default().with_enemy(host, Vec3::new(0.0, 0.0, -3.0));
    let config = BulletOpsConfig::default();
    let archetype = presets::sticky_bomb();

    let mut store = BulletStore::with_capacity(2);
    let slot = store.spawn(BulletSpawn::new(ArchetypeId(0), Vec3::ZERO, Vec3::NEG_Z * 10.0), 5.0);
    {
        let mut hooks = RecordingHooks::default();
        let mut ctx = SimContext::new(&world, &mut hooks, &config);
        let bullet = store.get_mut(slot).expect("slot exists");
        process_collision_ordered(bullet, &archetype, &enemy(Vec3::new(0.0, 0.0, -2.5), Vec3::Z, host), &mut ctx);
    }

    let bytes = store.save().expect("store serializes");
    let mut restored = BulletStore::restore(&bytes).expect("store deserializes");
    assert_eq!(restored.get(slot), store.get(slot));

    let mut hooks = RecordingHooks::default();
    let mut ctx = SimContext::new(&world, &mut hooks, &config);
    let bullet = restored.get_mut(slot).expect("slot exists");
    let outcome = perform_pending_actions_on_sticky_end(bullet, &archetype, &mut ctx);

    assert_eq!(outcome, Some(ChainOutcome::Completed { keep_alive: false }));
    assert!(approx(hooks.explosions[0].center, Vec3::new(0.0, 0.0, -2.5)));
    assert_eq!(hooks.damage, vec![(host, 20.0)]);
}
