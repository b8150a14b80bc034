//! Global resources for the bullet pipeline.

use bevy::prelude::*;

/// Tuning shared by every bullet, independent of archetype.
///
/// # Fields
/// * `default_knockback` - Base knockback strength carried by damage events
/// * `knockback_vertical_bias` - Factor applied to the Y component of contact knockback
/// * `sticky_reuse_cooldown` - Re-stick immunity after a sticky release (seconds)
/// * `min_surface_offset` - Smallest push-out distance when leaving a surface (meters)
/// * `resume_probe_fraction` - Fraction of the bullet radius used for the predicted
///   next position when a sticky chain resumes
/// * `debug_log_collisions` - Log every resolved impact at debug level
/// * `debug_draw` - Draw bullet gizmos (requires `BulletOpsDebugPlugin`)
///
/// # Example
/// ```
/// use bevy_bullet_ops::resources::BulletOpsConfig;
///
/// let config = BulletOpsConfig {
///     default_knockback: 5.0,
///     debug_log_collisions: true,
///     ..Default::default()
/// };
/// assert_eq!(config.sticky_reuse_cooldown, 0.08);
/// ```
#[derive(Resource, Reflect, Clone, Debug)]
#[reflect(Resource)]
pub struct BulletOpsConfig {
    /// Base knockback strength
    pub default_knockback: f32,
    /// Y scale for contact knockback (mostly horizontal push)
    pub knockback_vertical_bias: f32,
    /// Re-stick immunity (seconds)
    pub sticky_reuse_cooldown: f32,
    /// Minimum surface push-out (meters)
    pub min_surface_offset: f32,
    /// Resume probe distance as a fraction of radius
    pub resume_probe_fraction: f32,
    /// Debug-log every impact
    pub debug_log_collisions: bool,
    /// Debug visualization
    pub debug_draw: bool,
}

impl Default for BulletOpsConfig {
    /// Default values:
    /// - 3.5 knockback with a 0.15 vertical bias
    /// - 0.08 s re-stick immunity
    /// - 1 cm minimum surface offset
    /// - Resume probe at half the bullet radius
    /// - Logging and drawing disabled
    fn default() -> Self {
        Self {
            default_knockback: 3.5,
            knockback_vertical_bias: 0.15,
            sticky_reuse_cooldown: 0.08,
            min_surface_offset: 0.01,
            resume_probe_fraction: 0.5,
            debug_log_collisions: false,
            debug_draw: false,
        }
    }
}

impl BulletOpsConfig {
    /// Distance a bullet of `radius` is pushed off a surface.
    pub fn surface_offset(&self, radius: f32) -> f32 {
        self.min_surface_offset.max(radius)
    }
}

/// Per-frame tracking point for bullets with a tracking steering op.
///
/// Written once per frame by game code (typically a cursor raycast limited to
/// the archetype's `max_ray_distance`); `None` disables tracking for the frame.
#[derive(Resource, Reflect, Clone, Copy, Debug, Default, PartialEq)]
#[reflect(Resource)]
pub struct TrackingTarget(pub Option<Vec3>);
