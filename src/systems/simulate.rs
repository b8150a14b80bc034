//! Step system: runs the bullet core against Bevy queries and messages.
//!
//! [`EcsWorld`] answers the core's world queries from `GlobalTransform`s and
//! the [`Enemy`]/[`Health`] components; [`MessageHooks`] applies direct damage
//! to [`Health`] and forwards everything else as messages. With `dim3`, ray
//! casts go through avian3d's `SpatialQuery`.

use bevy::ecs::message::MessageWriter;
use bevy::ecs::system::SystemParam;
use bevy::prelude::*;

#[cfg(feature = "dim3")]
use avian3d::prelude::*;

use crate::archetype::ArchetypeCatalog;
use crate::components::{Enemy, Health, Invulnerable};
use crate::events::{
    AimbotIndicatorEvent, DamageDealtEvent, DamageRequestEvent, ExplosionEvent, ImpactEvent,
    StickyAttachedEvent,
};
use crate::resources::{BulletOpsConfig, TrackingTarget};
use crate::simulation::step_bullets;
use crate::store::BulletStore;
use crate::types::DamageRoute;
#[cfg(feature = "dim3")]
use crate::types::ImpactHit;
use crate::world::{BulletWorld, CombatHooks, DamageError, NoImpacts, SimContext};
#[cfg(feature = "dim3")]
use crate::world::ImpactProbe;

/// Read-only world view over ECS queries.
#[derive(SystemParam)]
pub struct EcsWorld<'w, 's> {
    enemies: Query<'w, 's, (Entity, &'static GlobalTransform), With<Enemy>>,
    transforms: Query<'w, 's, &'static GlobalTransform>,
    receivers: Query<'w, 's, (), With<Health>>,
}

impl BulletWorld for EcsWorld<'_, '_> {
    fn enemies(&self) -> impl Iterator<Item = (Entity, Vec3)> + '_ {
        self.enemies
            .iter()
            .map(|(enemy, transform)| (enemy, transform.translation()))
    }

    fn actor_transform(&self, actor: Entity) -> Option<Transform> {
        self.transforms
            .get(actor)
            .ok()
            .map(GlobalTransform::compute_transform)
    }

    fn is_enemy(&self, actor: Entity) -> bool {
        self.enemies.contains(actor)
    }

    fn damage_route(&self, actor: Entity) -> DamageRoute {
        if self.receivers.contains(actor) {
            DamageRoute::Direct
        } else {
            DamageRoute::Deferred
        }
    }
}

/// Damage entry point and message sinks.
#[derive(SystemParam)]
pub struct MessageHooks<'w, 's> {
    health: Query<'w, 's, &'static mut Health, Without<Invulnerable>>,
    invulnerable: Query<'w, 's, (), With<Invulnerable>>,
    damage_requests: MessageWriter<'w, DamageRequestEvent>,
    damage_dealt: MessageWriter<'w, DamageDealtEvent>,
    explosions: MessageWriter<'w, ExplosionEvent>,
    impacts: MessageWriter<'w, ImpactEvent>,
    aimbot_lines: MessageWriter<'w, AimbotIndicatorEvent>,
    sticky_blobs: MessageWriter<'w, StickyAttachedEvent>,
}

impl CombatHooks for MessageHooks<'_, '_> {
    fn apply_damage(&mut self, target: Entity, amount: f32, route: DamageRoute) -> Result<(), DamageError> {
        if self.invulnerable.contains(target) {
            return Err(DamageError::Rejected {
                target,
                reason: "target is invulnerable".to_string(),
            });
        }

        match route {
            DamageRoute::Direct => {
                let mut health = self
                    .health
                    .get_mut(target)
                    .map_err(|_| DamageError::MissingReceiver(target))?;
                if health.is_dead() {
                    return Err(DamageError::Rejected {
                        target,
                        reason: "target is already dead".to_string(),
                    });
                }
                health.take_damage(amount);
            }
            DamageRoute::Deferred => {
                self.damage_requests.write(DamageRequestEvent { target, amount });
            }
        }
        Ok(())
    }

    fn damage_dealt(&mut self, event: DamageDealtEvent) {
        self.damage_dealt.write(event);
    }

    fn explosion(&mut self, event: ExplosionEvent) {
        self.explosions.write(event);
    }

    fn impact(&mut self, event: ImpactEvent) {
        self.impacts.write(event);
    }

    fn aimbot_indicator(&mut self, event: AimbotIndicatorEvent) {
        self.aimbot_lines.write(event);
    }

    fn sticky_attached(&mut self, event: StickyAttachedEvent) {
        self.sticky_blobs.write(event);
    }
}

/// Approximates a swept sphere with a centre ray plus four rays offset by
/// the bullet radius; the nearest hit wins.
#[cfg(feature = "dim3")]
pub struct AvianProbe<'a, 'w, 's> {
    spatial_query: &'a SpatialQuery<'w, 's>,
}

#[cfg(feature = "dim3")]
impl ImpactProbe for AvianProbe<'_, '_, '_> {
    fn probe(&self, from: Vec3, to: Vec3, radius: f32, mask: u32) -> Option<ImpactHit> {
        let segment = to - from;
        let length = segment.length();
        if length <= 1e-6 {
            return None;
        }
        let direction = Dir3::new(segment / length).ok()?;

        let up = if direction.y.abs() < 0.99 { Vec3::Y } else { Vec3::X };
        let u = direction.cross(up).normalize();
        let v = direction.cross(u).normalize();
        let r = radius.max(0.001);
        let filter = contact_filter(mask);

        let mut best: Option<(f32, ImpactHit)> = None;
        for offset in [Vec3::ZERO, u * r, -u * r, v * r, -v * r] {
            let origin = from + offset;
            let Some(hit) = self.spatial_query.cast_ray(origin, direction, length, true, &filter) else {
                continue;
            };
            if best.as_ref().is_some_and(|(distance, _)| hit.distance >= *distance) {
                continue;
            }
            best = Some((
                hit.distance,
                ImpactHit {
                    position: origin + *direction * hit.distance,
                    normal: hit.normal,
                    collider: Some(hit.entity),
                },
            ));
        }

        best.map(|(_, hit)| hit)
    }
}

/// Ray filter for contact probes restricted to the archetype's layer bits.
#[cfg(feature = "dim3")]
pub fn contact_filter(mask: u32) -> SpatialQueryFilter {
    SpatialQueryFilter::from_mask(LayerMask(mask))
}

/// [`EcsWorld`] with line-of-sight checks through the physics scene.
#[cfg(feature = "dim3")]
pub struct OccludingWorld<'a, 'w, 's, W> {
    inner: &'a W,
    spatial_query: &'a SpatialQuery<'w, 's>,
}

#[cfg(feature = "dim3")]
impl<W: BulletWorld> BulletWorld for OccludingWorld<'_, '_, '_, W> {
    fn enemies(&self) -> impl Iterator<Item = (Entity, Vec3)> + '_ {
        self.inner.enemies()
    }

    fn actor_transform(&self, actor: Entity) -> Option<Transform> {
        self.inner.actor_transform(actor)
    }

    fn is_enemy(&self, actor: Entity) -> bool {
        self.inner.is_enemy(actor)
    }

    fn damage_route(&self, actor: Entity) -> DamageRoute {
        self.inner.damage_route(actor)
    }

    fn is_occluded(&self, from: Vec3, to: Vec3, target: Entity) -> bool {
        let segment = to - from;
        let length = segment.length();
        if length <= 1e-4 {
            return false;
        }
        let Ok(direction) = Dir3::new(segment / length) else {
            return false;
        };
        let filter = SpatialQueryFilter::default().with_excluded_entities([target]);
        self.spatial_query
            .cast_ray(from, direction, length, true, &filter)
            .is_some_and(|hit| hit.distance < length - 1e-3)
    }
}

/// Advances all bullets by one fixed step with avian3d ray casts and occlusion.
#[cfg(feature = "dim3")]
#[allow(clippy::too_many_arguments)]
pub fn simulate_bullets(
    time: Res<Time>,
    config: Res<BulletOpsConfig>,
    catalog: Res<ArchetypeCatalog>,
    tracking: Res<TrackingTarget>,
    mut store: ResMut<BulletStore>,
    world: EcsWorld,
    mut hooks: MessageHooks,
    spatial_query: SpatialQuery,
) {
    let world = OccludingWorld {
        inner: &world,
        spatial_query: &spatial_query,
    };
    let probe = AvianProbe {
        spatial_query: &spatial_query,
    };
    let mut ctx = SimContext::new(&world, &mut hooks, &config);
    step_bullets(&mut store, &catalog, &probe, tracking.0, time.delta_secs(), &mut ctx);
}

/// Advances all bullets by one fixed step without a physics scene.
///
/// Steering, sticky countdowns, continuations and lifetimes still run; no
/// contacts are ever reported.
pub fn simulate_bullets_unprobed(
    time: Res<Time>,
    config: Res<BulletOpsConfig>,
    catalog: Res<ArchetypeCatalog>,
    tracking: Res<TrackingTarget>,
    mut store: ResMut<BulletStore>,
    world: EcsWorld,
    mut hooks: MessageHooks,
) {
    let mut ctx = SimContext::new(&world, &mut hooks, &config);
    step_bullets(&mut store, &catalog, &NoImpacts, tracking.0, time.delta_secs(), &mut ctx);
}

#[cfg(all(test, feature = "dim3"))]
mod tests {
    use super::*;

    #[test]
    fn test_contact_filter_uses_archetype_mask() {
        assert_eq!(contact_filter(0b0101).mask, LayerMask(0b0101));
        assert_eq!(contact_filter(u32::MAX).mask, LayerMask::ALL);
        assert!(contact_filter(0b0101).excluded_entities.is_empty());
    }
}
