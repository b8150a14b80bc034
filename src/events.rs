//! Events emitted by the bullet core.
//!
//! Note: In Bevy 0.18, buffered events use the `Message` trait instead of `Event`.
//! The core publishes these through [`CombatHooks`](crate::world::CombatHooks);
//! the ECS layer forwards them to message queues for VFX, audio and camera
//! consumers.

use bevy::prelude::*;
use bevy::ecs::message::Message;

use crate::store::BulletSpawn;
use crate::types::ImpactSnapshot;

/// Request to spawn one bullet into the store.
///
/// Written by weapon code; consumed once per fixed tick before the step runs.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_bullet_ops::events::FireBulletEvent;
/// use bevy_bullet_ops::store::BulletSpawn;
/// use bevy_bullet_ops::types::ArchetypeId;
///
/// let fire = FireBulletEvent(
///     BulletSpawn::new(ArchetypeId(0), Vec3::new(0.0, 1.5, 0.0), Vec3::NEG_Z * 80.0).with_damage(25.0),
/// );
/// assert_eq!(fire.0.damage, 25.0);
/// ```
#[derive(Message, Clone, Debug, PartialEq)]
pub struct FireBulletEvent(pub BulletSpawn);

/// Event fired when a bullet dealt damage to an actor.
///
/// Consumers derive the knockback impulse as
/// `direction * base_knockback * falloff.unwrap_or(1.0) * snapshot.knockback_scale`.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_bullet_ops::events::DamageDealtEvent;
/// use bevy_bullet_ops::types::ImpactSnapshot;
///
/// let event = DamageDealtEvent {
///     target: Entity::PLACEHOLDER,
///     snapshot: ImpactSnapshot::new(12.0, Vec3::ZERO, Vec3::Y),
///     direction: Vec3::X,
///     base_knockback: 3.5,
///     falloff: Some(0.5),
/// };
/// assert_eq!(event.knockback_impulse(), Vec3::X * 1.75);
/// ```
#[derive(Message, Clone, Debug, PartialEq)]
pub struct DamageDealtEvent {
    /// Damaged actor
    pub target: Entity,
    /// Damage context; `snapshot.damage` is the amount dealt
    pub snapshot: ImpactSnapshot,
    /// Unit knockback direction
    pub direction: Vec3,
    /// Knockback strength before falloff
    pub base_knockback: f32,
    /// Distance falloff in [0, 1] for area damage
    pub falloff: Option<f32>,
}

impl DamageDealtEvent {
    /// Knockback impulse with falloff and snapshot scale applied.
    pub fn knockback_impulse(&self) -> Vec3 {
        self.direction * self.base_knockback * self.falloff.unwrap_or(1.0) * self.snapshot.knockback_scale
    }
}

/// Damage queued for an actor that is not a known enemy type.
///
/// Game code reads these and forwards them to whatever damage entry point the
/// target exposes.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct DamageRequestEvent {
    pub target: Entity,
    pub amount: f32,
}

/// Event fired when an explosion op detonates.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct ExplosionEvent {
    /// Center of the explosion
    pub center: Vec3,
    /// Radius of effect (meters)
    pub radius: f32,
}

/// Event fired for every resolved bullet contact, enemy or not.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct ImpactEvent {
    pub position: Vec3,
    pub normal: Vec3,
    /// Unit travel direction at contact
    pub direction: Vec3,
}

/// Visual line from a retargeted bullet to its new target.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct AimbotIndicatorEvent {
    pub start: Vec3,
    pub end: Vec3,
    pub width: f32,
    /// Seconds the line stays visible
    pub duration: f32,
}

/// Visual blob for a bullet that just attached to something.
#[derive(Message, Clone, Debug, PartialEq)]
pub struct StickyAttachedEvent {
    /// Host the bullet is attached to
    pub target: Entity,
    pub position: Vec3,
    pub normal: Vec3,
    /// Radius of the blob mesh, including slime thickness
    pub blob_radius: f32,
    /// Seconds the blob stays visible
    pub duration: f32,
}
