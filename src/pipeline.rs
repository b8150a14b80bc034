//! Collision resolution: the archetype op chain and its sticky continuation.
//!
//! A chain runs the archetype's [`CollisionOp`]s in order against one impact.
//! Pierce and Bounce move the bullet and keep it alive, Explode deals area
//! damage, and Sticky attaches the bullet and pauses the chain. A paused chain
//! is stored on the bullet as a resume index plus an [`ImpactSnapshot`], and
//! [`perform_pending_actions_on_sticky_end`] picks it up once the attachment
//! countdown runs out.

use bevy::prelude::*;
use rand::Rng;

use crate::archetype::{Archetype, CollisionOp};
use crate::events::{DamageDealtEvent, StickyAttachedEvent};
use crate::math::{normalize_or_default, reflect, to_local_normal, to_local_point, to_world_normal, to_world_point, FORWARD};
use crate::resources::BulletOpsConfig;
use crate::store::BulletData;
use crate::targeting::{apply_explosion_aoe, try_apply_aimbot};
use crate::types::ImpactSnapshot;
use crate::world::{BulletWorld, CombatHooks, SimContext};

/// One contact fed into the op chain.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Impact {
    /// World-space contact point
    pub position: Vec3,
    /// Surface normal at the contact (may be zero)
    pub normal: Vec3,
    /// Where the bullet would have been without the contact
    pub next_position: Vec3,
    pub collider: Option<Entity>,
    pub is_enemy: bool,
}

impl Impact {
    /// Snapshot of a fresh contact carrying `damage`.
    pub fn snapshot(&self, damage: f32) -> ImpactSnapshot {
        let snapshot = ImpactSnapshot::new(damage, self.position, self.normal);
        match self.collider {
            Some(enemy) if self.is_enemy => snapshot.with_enemy(enemy),
            _ => snapshot,
        }
    }
}

/// How a chain run ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ChainOutcome {
    /// The archetype has no collision ops; the bullet was snapped to the contact
    Snapped,
    /// Every op from the start index ran
    Completed {
        /// Pierce or Bounce fired, so destroy-on-impact was skipped
        keep_alive: bool,
    },
    /// A Sticky op attached the bullet; the chain resumes at `resume_at`
    Paused { resume_at: usize },
}

/// Runs a fresh impact through the whole op chain.
pub fn process_collision_ordered<W: BulletWorld, H: CombatHooks>(
    bullet: &mut BulletData,
    archetype: &Archetype,
    impact: &Impact,
    ctx: &mut SimContext<'_, W, H>,
) -> ChainOutcome {
    let snapshot = impact.snapshot(bullet.damage);
    process_collision_ops(bullet, archetype, impact, 0, snapshot, ctx)
}

/// Runs the archetype's collision ops from `start_index` against one impact.
///
/// When no Pierce or Bounce fires the bullet is left at the contact point.
/// The chain's running damage starts at `snapshot.damage` and is lowered by
/// every Pierce and Bounce that fires; Explode and a Sticky pause both see the
/// lowered value. Any pending continuation on the bullet is cleared first and
/// only re-established if a Sticky op pauses this run.
///
/// A Sticky pause writes the stuck state straight into the bullet and skips
/// the usual writeback of the working state.
pub fn process_collision_ops<W: BulletWorld, H: CombatHooks>(
    bullet: &mut BulletData,
    archetype: &Archetype,
    impact: &Impact,
    start_index: usize,
    snapshot: ImpactSnapshot,
    ctx: &mut SimContext<'_, W, H>,
) -> ChainOutcome {
    let mut state = bullet.collision_state();
    bullet.last_collider = impact.collider;
    bullet.collision_cooldown = 0.0;
    bullet.clear_pending();
    state.last_collider = impact.collider;
    state.collision_cooldown = 0.0;

    let exclude = if impact.is_enemy { impact.collider } else { None };

    if archetype.collision_ops.is_empty() {
        state.position = impact.position;
        bullet.apply_collision_state(&state);
        if archetype.destroy_on_impact {
            bullet.active = false;
        } else if let Some(aimbot) = archetype.aimbot {
            try_apply_aimbot(bullet, &aimbot, exclude, ctx);
        }
        return ChainOutcome::Snapped;
    }

    let offset = ctx.config.surface_offset(archetype.radius);
    let mut snapshot = snapshot;
    state.damage = snapshot.damage;
    let mut resolved_motion = false;
    let mut keep_alive = false;

    for (index, op) in archetype.collision_ops.iter().enumerate().skip(start_index) {
        match op {
            CollisionOp::Explode => {
                if let Some(explosive) = archetype.explosive {
                    apply_explosion_aoe(impact.position, &explosive, &snapshot, ctx);
                }
            }
            CollisionOp::Sticky => {
                let Some(sticky) = archetype.sticky else {
                    continue;
                };
                if bullet.sticky_cooldown > 0.0 {
                    continue;
                }

                if let Some(target) = impact.collider.filter(|_| impact.is_enemy) {
                    if ctx.deliver_damage(target, sticky.collision_damage) {
                        ctx.hooks.damage_dealt(DamageDealtEvent {
                            target,
                            snapshot: snapshot.with_damage(sticky.collision_damage),
                            direction: knockback_direction(state.velocity, ctx.config),
                            base_knockback: ctx.config.default_knockback,
                            falloff: None,
                        });
                    }
                }

                let host = impact.collider.and_then(|collider| ctx.world.actor_transform(collider));
                bullet.position = impact.position;
                bullet.prev_position = impact.position;
                bullet.stuck_pre_velocity = state.velocity;
                bullet.velocity = Vec3::ZERO;
                bullet.stuck_time_left = sticky.duration;
                bullet.stuck_target = impact.collider;
                bullet.stuck_local_offset = host
                    .map(|frame| to_local_point(&frame, impact.position))
                    .unwrap_or(Vec3::ZERO);
                bullet.stuck_world_normal = impact.normal;
                bullet.stuck_local_normal = host
                    .map(|frame| to_local_normal(&frame, impact.normal))
                    .unwrap_or(impact.normal);

                if let (Some(target), Some(_)) = (impact.collider, host) {
                    ctx.hooks.sticky_attached(StickyAttachedEvent {
                        target,
                        position: impact.position,
                        normal: impact.normal,
                        blob_radius: sticky_blob_radius(archetype.radius),
                        duration: sticky.duration,
                    });
                }

                bullet.pending_action_index = Some(index + 1);
                bullet.pending_snapshot = Some(snapshot);
                return ChainOutcome::Paused { resume_at: index + 1 };
            }
            CollisionOp::Pierce => {
                let Some(pierce) = archetype.pierce else {
                    continue;
                };
                if resolved_motion || !impact.is_enemy || state.penetration_count >= pierce.max_penetrations {
                    continue;
                }

                state.penetration_count += 1;
                state.damage *= 1.0 - pierce.damage_reduction;
                state.velocity *= pierce.velocity_factor;
                let forward = if state.velocity.length_squared() > 1e-4 {
                    state.velocity.normalize()
                } else {
                    normalize_or_default(impact.next_position - state.position, FORWARD)
                };
                state.position = impact.position + forward * offset;
                state.prev_position = state.position;
                state.collision_cooldown = pierce.cooldown;

                snapshot = snapshot.with_damage(state.damage);
                keep_alive = true;
                resolved_motion = true;
            }
            CollisionOp::Bounce => {
                let Some(bounce) = archetype.bounce else {
                    continue;
                };
                if resolved_motion
                    || impact.normal.length_squared() <= 1e-4
                    || state.bounce_count >= bounce.max_bounces
                {
                    continue;
                }

                let normal = impact.normal.normalize();
                state.bounce_count += 1;
                state.velocity = reflect(state.velocity, normal) * bounce.bounciness;
                state.damage *= 1.0 - bounce.damage_reduction;
                state.position = impact.position + normal * offset;
                state.prev_position = state.position;

                snapshot = snapshot.with_damage(state.damage);
                keep_alive = true;
                resolved_motion = true;
            }
        }
    }

    if !keep_alive {
        state.position = impact.position;
    }
    bullet.apply_collision_state(&state);

    if !keep_alive {
        if archetype.destroy_on_impact {
            bullet.active = false;
        }
    } else if let Some(aimbot) = archetype.aimbot {
        try_apply_aimbot(bullet, &aimbot, exclude, ctx);
    }

    ChainOutcome::Completed { keep_alive }
}

/// Resumes a chain paused by a Sticky op.
///
/// The contact is rebuilt from the attachment: if the host still exists, the
/// saved local offset and normal are re-projected through its current
/// transform, otherwise the last recorded world position and normal are
/// used. The pending index and snapshot are always cleared afterwards.
///
/// Returns `None` when there was nothing to resume.
pub fn perform_pending_actions_on_sticky_end<W: BulletWorld, H: CombatHooks>(
    bullet: &mut BulletData,
    archetype: &Archetype,
    ctx: &mut SimContext<'_, W, H>,
) -> Option<ChainOutcome> {
    let start = bullet.pending_action_index?;
    if start > archetype.collision_ops.len() {
        debug!(
            "bullet {} continuation index {} is past {} collision ops, dropping it",
            bullet.id,
            start,
            archetype.collision_ops.len()
        );
        bullet.clear_pending();
        return None;
    }

    let host = bullet
        .stuck_target
        .filter(|target| ctx.world.is_valid(*target))
        .and_then(|target| ctx.world.actor_transform(target));
    let (position, normal) = match host {
        Some(frame) => (
            to_world_point(&frame, bullet.stuck_local_offset),
            to_world_normal(&frame, bullet.stuck_local_normal),
        ),
        None => (bullet.position, bullet.stuck_world_normal),
    };
    let is_enemy = host.is_some() && bullet.stuck_target.is_some_and(|target| ctx.world.is_enemy(target));

    let probe = (archetype.radius * ctx.config.resume_probe_fraction).max(ctx.config.min_surface_offset);
    let impact = Impact {
        position,
        normal,
        next_position: position + normalize_or_default(bullet.velocity, FORWARD) * probe,
        collider: bullet.stuck_target,
        is_enemy,
    };
    let snapshot = bullet
        .pending_snapshot
        .unwrap_or_else(|| impact.snapshot(bullet.damage));

    let outcome = process_collision_ops(bullet, archetype, &impact, start, snapshot, ctx);
    bullet.clear_pending();
    Some(outcome)
}

/// Mostly horizontal push along the bullet's travel direction.
pub fn knockback_direction(velocity: Vec3, config: &BulletOpsConfig) -> Vec3 {
    let direction = if velocity.length_squared() > 1e-6 {
        velocity.normalize()
    } else {
        FORWARD
    };
    normalize_or_default(
        Vec3::new(direction.x, config.knockback_vertical_bias * direction.y, direction.z),
        direction,
    )
}

fn sticky_blob_radius(radius: f32) -> f32 {
    let radius = radius.max(0.0);
    let slime = radius / 1.5;
    radius + slime + rand::rng().random_range(0.0..=slime * 0.5)
}
