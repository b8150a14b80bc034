//! Per-tick steering pass: homing and tracking.

use bevy::prelude::*;

use crate::archetype::{Archetype, SteeringOp};
use crate::math::{blend_directions, normalize_or_default, FORWARD};
use crate::store::BulletData;
use crate::targeting::find_nearest_enemy;
use crate::world::BulletWorld;

/// Turns a bullet's velocity toward its steering targets.
///
/// Runs the archetype's steering ops in order; each op blends from the
/// direction left by the previous one. Speed is preserved (floored at a tiny
/// positive value so a resting bullet can still be turned). Ops whose config
/// is missing, or that find no target, leave the velocity untouched.
///
/// `tracking` is the per-frame cached tracking point shared by all bullets.
pub fn apply_per_tick_behaviors<W: BulletWorld>(
    bullet: &mut BulletData,
    archetype: &Archetype,
    world: &W,
    tracking: Option<Vec3>,
) {
    if archetype.steering_ops.is_empty() {
        return;
    }

    let speed = bullet.velocity.length().max(1e-4);
    let mut direction = normalize_or_default(bullet.velocity, FORWARD);

    for op in &archetype.steering_ops {
        let (target, strength) = match op {
            SteeringOp::Homing => {
                let Some(homing) = archetype.homing else {
                    continue;
                };
                let Some((_, enemy_pos)) = find_nearest_enemy(world, bullet.position, homing.radius, None) else {
                    continue;
                };
                (enemy_pos, homing.strength)
            }
            SteeringOp::Tracking => {
                let (Some(config), Some(point)) = (archetype.tracking, tracking) else {
                    continue;
                };
                (point, config.strength)
            }
        };

        direction = blend_directions(direction, target - bullet.position, strength);
        bullet.velocity = direction * speed;
    }
}
