//! Enemy queries and area effects invoked by steering and collision ops.

use bevy::prelude::*;

use crate::archetype::{AimbotConfig, ExplosiveConfig};
use crate::events::{AimbotIndicatorEvent, DamageDealtEvent, ExplosionEvent};
use crate::math::{normalize_or_default, FORWARD};
use crate::store::BulletData;
use crate::types::ImpactSnapshot;
use crate::world::{BulletWorld, CombatHooks, SimContext};

/// Closest enemy to `position`, strictly inside `radius`.
///
/// A radius of zero or less means unbounded. Ties keep the first enemy in
/// scan order. `exclude` is never returned.
pub fn find_nearest_enemy<W: BulletWorld>(
    world: &W,
    position: Vec3,
    radius: f32,
    exclude: Option<Entity>,
) -> Option<(Entity, Vec3)> {
    let mut best = if radius > 0.0 { radius } else { f32::INFINITY };
    let mut nearest = None;

    for (enemy, enemy_pos) in world.enemies() {
        if Some(enemy) == exclude {
            continue;
        }
        let distance = enemy_pos.distance(position);
        if distance < best {
            best = distance;
            nearest = Some((enemy, enemy_pos));
        }
    }

    nearest
}

/// Re-aims a bullet at the enemy closest to its line of flight.
///
/// Candidates must lie within `config.radius` and inside the cone of
/// half-angle `config.aim_cone_angle` around the current direction; the
/// smallest angle wins. Speed is preserved. Emits an
/// [`AimbotIndicatorEvent`] on success.
///
/// Returns whether the bullet was retargeted.
pub fn try_apply_aimbot<W: BulletWorld, H: CombatHooks>(
    bullet: &mut BulletData,
    config: &AimbotConfig,
    exclude: Option<Entity>,
    ctx: &mut SimContext<'_, W, H>,
) -> bool {
    let origin = bullet.position;
    let base_dir = if bullet.velocity.length_squared() > 1e-4 {
        bullet.velocity.normalize()
    } else {
        FORWARD
    };

    let mut best_angle = config.aim_cone_angle;
    let mut best = None;

    for (enemy, enemy_pos) in ctx.world.enemies() {
        if Some(enemy) == exclude {
            continue;
        }
        let to_enemy = enemy_pos - origin;
        let distance = to_enemy.length();
        if distance > config.radius || distance <= 1e-4 {
            continue;
        }
        let angle = base_dir.dot(to_enemy / distance).clamp(-1.0, 1.0).acos();
        if angle < best_angle {
            best_angle = angle;
            best = Some(enemy_pos);
        }
    }

    let Some(enemy_pos) = best else {
        return false;
    };

    let target = enemy_pos + Vec3::Y * config.vertical_offset;
    let speed = bullet.velocity.length().max(1e-4);
    bullet.velocity = normalize_or_default(target - origin, base_dir) * speed;

    if origin.distance(target) > 1e-4 {
        ctx.hooks.aimbot_indicator(AimbotIndicatorEvent {
            start: origin,
            end: target,
            width: config.line_width,
            duration: config.line_duration,
        });
    }
    true
}

/// Damages every visible enemy within the blast radius.
///
/// Fires an [`ExplosionEvent`] first, then deals
/// `snapshot.damage * config.damage_multiplier` to each enemy that is within
/// `config.radius` of `center` and not occluded. Knockback points away from
/// the center with a linear falloff to zero at the edge.
///
/// Returns how many enemies took damage.
pub fn apply_explosion_aoe<W: BulletWorld, H: CombatHooks>(
    center: Vec3,
    config: &ExplosiveConfig,
    snapshot: &ImpactSnapshot,
    ctx: &mut SimContext<'_, W, H>,
) -> usize {
    ctx.hooks.explosion(ExplosionEvent {
        center,
        radius: config.radius,
    });

    let world = ctx.world;
    let damage = snapshot.damage * config.damage_multiplier;
    let mut hits = 0;

    for (enemy, enemy_pos) in world.enemies() {
        let distance = enemy_pos.distance(center);
        if distance > config.radius {
            continue;
        }
        if world.is_occluded(center, enemy_pos, enemy) {
            continue;
        }
        if !ctx.deliver_damage(enemy, damage) {
            continue;
        }

        let direction = normalize_or_default(enemy_pos - center, Vec3::Y);
        let falloff = (1.0 - distance / config.radius.max(1e-4)).clamp(0.0, 1.0);
        ctx.hooks.damage_dealt(DamageDealtEvent {
            target: enemy,
            snapshot: snapshot.with_damage(damage),
            direction,
            base_knockback: ctx.config.default_knockback,
            falloff: Some(falloff),
        });
        hits += 1;
    }

    hits
}
