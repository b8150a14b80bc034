//! Common value types shared by the pipeline, the store and the ECS layer.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Handle of a registered [`Archetype`](crate::archetype::Archetype).
///
/// Stored on every bullet; resolved through the
/// [`ArchetypeCatalog`](crate::archetype::ArchetypeCatalog).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect)]
pub struct ArchetypeId(pub u32);

/// Index of a bullet slot inside the [`BulletStore`](crate::store::BulletStore).
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BulletSlot(pub usize);

/// Damage/knockback context captured when contact is first detected.
///
/// Threaded through the op chain so later operations read an explicit record
/// instead of re-deriving it. A new value is built whenever pierce or bounce
/// reduces damage and whenever a sticky pause must carry context forward.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_bullet_ops::types::ImpactSnapshot;
///
/// let snapshot = ImpactSnapshot::new(40.0, Vec3::ZERO, Vec3::Y).with_crit(2.0);
/// let reduced = snapshot.with_damage(20.0);
/// assert_eq!(reduced.damage, 20.0);
/// assert!(reduced.is_crit);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct ImpactSnapshot {
    /// Damage carried by this impact
    pub damage: f32,
    /// Multiplier applied on top of the base knockback
    pub knockback_scale: f32,
    /// Whether the contacted actor was an enemy
    pub enemy_hit: bool,
    /// The contacted enemy, if any
    pub enemy: Option<Entity>,
    /// World-space contact point
    pub hit_position: Vec3,
    /// World-space surface normal at the contact point
    pub hit_normal: Vec3,
    /// Whether the impact rolled a critical hit
    pub is_crit: bool,
    /// Critical damage multiplier (1.0 when not a crit)
    pub crit_multiplier: f32,
}

impl ImpactSnapshot {
    /// Creates a non-critical snapshot with unit knockback and no enemy.
    pub fn new(damage: f32, hit_position: Vec3, hit_normal: Vec3) -> Self {
        Self {
            damage,
            knockback_scale: 1.0,
            enemy_hit: false,
            enemy: None,
            hit_position,
            hit_normal,
            is_crit: false,
            crit_multiplier: 1.0,
        }
    }

    /// Builder pattern: mark the contacted actor as an enemy.
    pub fn with_enemy(mut self, enemy: Entity) -> Self {
        self.enemy_hit = true;
        self.enemy = Some(enemy);
        self
    }

    /// Builder pattern: mark as a critical hit.
    pub fn with_crit(mut self, multiplier: f32) -> Self {
        self.is_crit = true;
        self.crit_multiplier = multiplier;
        self
    }

    /// Builder pattern: set the knockback scale.
    pub fn with_knockback_scale(mut self, scale: f32) -> Self {
        self.knockback_scale = scale;
        self
    }

    /// Copy of this snapshot carrying a different damage value.
    pub fn with_damage(self, damage: f32) -> Self {
        Self { damage, ..self }
    }
}

/// Contact reported by a broad-phase probe.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ImpactHit {
    /// World-space contact point
    pub position: Vec3,
    /// Surface normal (may be zero if the backend did not report one)
    pub normal: Vec3,
    /// The collider that was hit, if it maps to an entity
    pub collider: Option<Entity>,
}

/// How a damage amount reaches its target.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default, Reflect)]
pub enum DamageRoute {
    /// Known enemy type: apply immediately
    Direct,
    /// Anything else exposing a damage entry point: queue for later
    #[default]
    Deferred,
}
