//! Service boundary between the bullet core and the rest of the game.
//!
//! The core never touches the scene directly: it reads the world through
//! [`BulletWorld`], pushes side effects through [`CombatHooks`], and asks an
//! [`ImpactProbe`] for contacts. The ECS layer implements all three over Bevy
//! queries and messages; tests implement them over plain vectors.

use bevy::prelude::*;

use crate::events::{
    AimbotIndicatorEvent, DamageDealtEvent, ExplosionEvent, ImpactEvent, StickyAttachedEvent,
};
use crate::resources::BulletOpsConfig;
use crate::types::{DamageRoute, ImpactHit};

/// Failure reported by a damage entry point.
///
/// Always recovered locally: the pipeline logs it and treats the attempt as
/// "no damage applied".
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum DamageError {
    #[error("{0:?} has no damage receiver")]
    MissingReceiver(Entity),
    #[error("{target:?} rejected damage: {reason}")]
    Rejected { target: Entity, reason: String },
}

/// Read-only view of the spatial world and actor registry.
pub trait BulletWorld {
    /// Live enemy actors and their world positions, in a stable scan order.
    fn enemies(&self) -> impl Iterator<Item = (Entity, Vec3)> + '_;

    /// Current world transform of an actor, or `None` if it no longer exists.
    fn actor_transform(&self, actor: Entity) -> Option<Transform>;

    /// Whether the actor is tagged as an enemy.
    fn is_enemy(&self, actor: Entity) -> bool;

    /// Whether the actor still exists.
    fn is_valid(&self, actor: Entity) -> bool {
        self.actor_transform(actor).is_some()
    }

    /// How damage reaches this actor.
    fn damage_route(&self, _actor: Entity) -> DamageRoute {
        DamageRoute::Deferred
    }

    /// Whether line of sight from `from` to `target` (standing at `to`) is
    /// blocked by something other than the target itself.
    fn is_occluded(&self, _from: Vec3, _to: Vec3, _target: Entity) -> bool {
        false
    }
}

/// Side-effect sinks: damage entry point, event bus and visual hooks.
///
/// Nothing returned here except the damage result is consumed by the core.
pub trait CombatHooks {
    /// Apply damage to an actor. May fail; failures are logged by the caller.
    fn apply_damage(&mut self, target: Entity, amount: f32, route: DamageRoute) -> Result<(), DamageError>;

    fn damage_dealt(&mut self, event: DamageDealtEvent);

    fn explosion(&mut self, event: ExplosionEvent);

    fn impact(&mut self, _event: ImpactEvent) {}

    fn aimbot_indicator(&mut self, _event: AimbotIndicatorEvent) {}

    fn sticky_attached(&mut self, _event: StickyAttachedEvent) {}
}

/// Broad-phase contact query for one bullet step.
pub trait ImpactProbe {
    /// First contact of a sphere of `radius` swept from `from` to `to`.
    ///
    /// Only colliders on a layer set in `mask` are reported.
    fn probe(&self, from: Vec3, to: Vec3, radius: f32, mask: u32) -> Option<ImpactHit>;
}

/// Probe that never reports a contact.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoImpacts;

impl ImpactProbe for NoImpacts {
    fn probe(&self, _from: Vec3, _to: Vec3, _radius: f32, _mask: u32) -> Option<ImpactHit> {
        None
    }
}

/// Everything an op chain needs besides the bullet and its archetype.
pub struct SimContext<'a, W, H> {
    pub world: &'a W,
    pub hooks: &'a mut H,
    pub config: &'a BulletOpsConfig,
}

impl<'a, W: BulletWorld, H: CombatHooks> SimContext<'a, W, H> {
    pub fn new(world: &'a W, hooks: &'a mut H, config: &'a BulletOpsConfig) -> Self {
        Self { world, hooks, config }
    }

    /// Routes damage to `target`, logging and swallowing failures.
    ///
    /// Returns whether the damage was applied.
    pub fn deliver_damage(&mut self, target: Entity, amount: f32) -> bool {
        let route = self.world.damage_route(target);
        match self.hooks.apply_damage(target, amount, route) {
            Ok(()) => true,
            Err(err) => {
                warn!("bullet damage call failed: {err}");
                false
            }
        }
    }
}
