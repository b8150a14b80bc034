//! Components the ECS adapter reads from actors.
//!
//! Bullets themselves are not entities; they live in the
//! [`BulletStore`](crate::store::BulletStore). These components only tag and
//! describe the things bullets hit.

use bevy::prelude::*;

/// Marks an actor as a valid target for homing, aimbot and explosions.
#[derive(Component, Reflect, Default, Clone, Copy, Debug)]
#[reflect(Component)]
pub struct Enemy;

/// Hit points of a damageable actor.
///
/// Actors with `Health` receive bullet damage directly; anything else is
/// sent a [`DamageRequestEvent`](crate::events::DamageRequestEvent).
///
/// # Example
/// ```
/// use bevy_bullet_ops::components::Health;
///
/// let mut health = Health::new(50.0);
/// health.take_damage(20.0);
/// assert_eq!(health.current, 30.0);
/// assert!(!health.is_dead());
/// ```
#[derive(Component, Reflect, Clone, Copy, Debug, PartialEq)]
#[reflect(Component)]
pub struct Health {
    pub current: f32,
    pub max: f32,
}

impl Default for Health {
    fn default() -> Self {
        Self::new(100.0)
    }
}

impl Health {
    /// Creates full health.
    pub fn new(max: f32) -> Self {
        let max = max.max(0.0);
        Self { current: max, max }
    }

    /// Subtracts `amount` (negative amounts are ignored), never going below zero.
    ///
    /// Returns the remaining health.
    pub fn take_damage(&mut self, amount: f32) -> f32 {
        self.current = (self.current - amount.max(0.0)).max(0.0);
        self.current
    }

    pub fn is_dead(&self) -> bool {
        self.current <= 0.0
    }
}

/// Actor refuses all bullet damage (shields, cutscene actors, ...).
#[derive(Component, Reflect, Default, Clone, Copy, Debug)]
#[reflect(Component)]
pub struct Invulnerable;
