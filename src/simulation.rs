//! One fixed simulation step over the whole bullet store.
//!
//! Order per bullet: cooldowns and lifetime, then either the stuck countdown
//! (follow host, release, resume) or free flight (steering, gravity, probe,
//! collision chain). Inactive slots are reclaimed at the end.

use bevy::prelude::*;

use crate::archetype::{Archetype, ArchetypeCatalog};
use crate::events::{DamageDealtEvent, ImpactEvent};
use crate::math::{normalize_or_default, to_world_normal, to_world_point, FORWARD};
use crate::pipeline::{knockback_direction, perform_pending_actions_on_sticky_end, process_collision_ordered, Impact};
use crate::steering::apply_per_tick_behaviors;
use crate::store::{BulletData, BulletStore};
use crate::types::ImpactSnapshot;
use crate::world::{BulletWorld, CombatHooks, ImpactProbe, SimContext};

/// What happened during one [`step_bullets`] call.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct StepReport {
    /// Contacts that ran an op chain
    pub impacts: usize,
    /// Sticky continuations that resumed
    pub resumed: usize,
    /// Bullets whose lifetime ran out
    pub expired: usize,
    /// Slots returned to the free list
    pub reclaimed: usize,
}

/// Advances every active bullet by `dt` seconds.
///
/// `tracking` is this frame's cached tracking point. Bullets referencing an
/// unknown archetype are dropped with a warning.
pub fn step_bullets<W, H, P>(
    store: &mut BulletStore,
    catalog: &ArchetypeCatalog,
    probe: &P,
    tracking: Option<Vec3>,
    dt: f32,
    ctx: &mut SimContext<'_, W, H>,
) -> StepReport
where
    W: BulletWorld,
    H: CombatHooks,
    P: ImpactProbe,
{
    let mut report = StepReport::default();

    for bullet in store.slots_mut().iter_mut().filter(|bullet| bullet.active) {
        let Some(archetype) = catalog.get(bullet.archetype) else {
            warn!("bullet {} references unknown archetype {:?}", bullet.id, bullet.archetype);
            bullet.clear_pending();
            bullet.active = false;
            continue;
        };

        bullet.collision_cooldown = (bullet.collision_cooldown - dt).max(0.0);
        bullet.sticky_cooldown = (bullet.sticky_cooldown - dt).max(0.0);
        bullet.life_remaining -= dt;

        let holding = bullet.is_stuck() || bullet.has_pending_continuation();
        if bullet.life_remaining <= 0.0 && !holding {
            bullet.active = false;
            report.expired += 1;
            continue;
        }

        if holding {
            if step_stuck(bullet, archetype, dt, ctx) {
                report.resumed += 1;
            }
            continue;
        }

        if step_flight(bullet, archetype, probe, tracking, dt, ctx) {
            report.impacts += 1;
        }
    }

    report.reclaimed = store.reclaim();
    report
}

/// Counts down an attached bullet; returns whether a continuation resumed.
fn step_stuck<W: BulletWorld, H: CombatHooks>(
    bullet: &mut BulletData,
    archetype: &Archetype,
    dt: f32,
    ctx: &mut SimContext<'_, W, H>,
) -> bool {
    bullet.stuck_time_left = (bullet.stuck_time_left - dt).max(0.0);

    let host = bullet.stuck_target.and_then(|target| ctx.world.actor_transform(target));
    if let Some(frame) = host {
        bullet.position = to_world_point(&frame, bullet.stuck_local_offset);
        bullet.prev_position = bullet.position;
    }

    if bullet.stuck_time_left > 0.0 {
        return false;
    }

    let normal = host
        .map(|frame| to_world_normal(&frame, bullet.stuck_local_normal))
        .unwrap_or(bullet.stuck_world_normal);
    bullet.position += normal * ctx.config.surface_offset(archetype.radius);
    bullet.prev_position = bullet.position;
    bullet.velocity = bullet.stuck_pre_velocity;
    bullet.sticky_cooldown = ctx.config.sticky_reuse_cooldown;

    let resumed = perform_pending_actions_on_sticky_end(bullet, archetype, ctx).is_some();
    bullet.stuck_target = None;
    resumed
}

/// Integrates a free bullet; returns whether it hit something.
fn step_flight<W, H, P>(
    bullet: &mut BulletData,
    archetype: &Archetype,
    probe: &P,
    tracking: Option<Vec3>,
    dt: f32,
    ctx: &mut SimContext<'_, W, H>,
) -> bool
where
    W: BulletWorld,
    H: CombatHooks,
    P: ImpactProbe,
{
    bullet.prev_position = bullet.position;
    apply_per_tick_behaviors(bullet, archetype, ctx.world, tracking);
    if archetype.gravity.abs() > 1e-4 {
        bullet.velocity += Vec3::NEG_Y * archetype.gravity * dt;
    }
    let next_position = bullet.position + bullet.velocity * dt;

    let Some(hit) = probe.probe(bullet.position, next_position, archetype.radius, archetype.collision_mask) else {
        bullet.position = next_position;
        bullet.last_collider = None;
        return false;
    };

    if hit.collider.is_some() && hit.collider == bullet.last_collider && bullet.collision_cooldown > 0.0 {
        bullet.position = next_position;
        return false;
    }

    let is_enemy = hit.collider.is_some_and(|collider| ctx.world.is_enemy(collider));
    if let Some(target) = hit.collider.filter(|_| is_enemy) {
        if ctx.deliver_damage(target, bullet.damage) {
            ctx.hooks.damage_dealt(DamageDealtEvent {
                target,
                snapshot: ImpactSnapshot::new(bullet.damage, hit.position, hit.normal).with_enemy(target),
                direction: knockback_direction(bullet.velocity, ctx.config),
                base_knockback: ctx.config.default_knockback,
                falloff: None,
            });
        }
    }

    let direction = if bullet.velocity.length_squared() > 1e-6 {
        bullet.velocity.normalize()
    } else {
        FORWARD
    };
    ctx.hooks.impact(ImpactEvent {
        position: hit.position,
        normal: hit.normal,
        direction,
    });
    if ctx.config.debug_log_collisions {
        debug!(
            "bullet {} impact at {:.2} n={:.2} collider={:?} enemy={}",
            bullet.id, hit.position, hit.normal, hit.collider, is_enemy
        );
    }

    let impact = Impact {
        position: hit.position,
        normal: normalize_or_default(hit.normal, Vec3::ZERO),
        next_position,
        collider: hit.collider,
        is_enemy,
    };
    process_collision_ordered(bullet, archetype, &impact, ctx);
    true
}
