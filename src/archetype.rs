//! Archetype catalog: shared, read-only bullet behavior definitions.
//!
//! Many bullets reference one [`Archetype`] by [`ArchetypeId`]. The op lists
//! are closed enums dispatched with a `match` in the pipeline's hot loop.

use bevy::prelude::*;

use crate::types::ArchetypeId;

/// Operation run when a bullet contacts something.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum CollisionOp {
    /// Continue through enemies with reduced damage and speed
    Pierce,
    /// Reflect off surfaces
    Bounce,
    /// Attach to the contact and pause the chain
    Sticky,
    /// Area damage at the contact point
    Explode,
}

/// Per-tick velocity adjustment independent of collisions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Reflect)]
pub enum SteeringOp {
    /// Turn toward the nearest enemy within a radius
    Homing,
    /// Turn toward the per-frame tracking target
    Tracking,
}

/// Area damage configuration.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct ExplosiveConfig {
    pub radius: f32,
    pub damage_multiplier: f32,
}

impl ExplosiveConfig {
    pub fn new(radius: f32, damage_multiplier: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            damage_multiplier: damage_multiplier.max(0.0),
        }
    }
}

/// Sticky attachment configuration.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct StickyConfig {
    /// Seconds the bullet stays attached before the chain resumes
    pub duration: f32,
    /// Damage applied to an enemy on attach
    pub collision_damage: f32,
}

impl StickyConfig {
    pub fn new(duration: f32, collision_damage: f32) -> Self {
        Self {
            duration: duration.max(0.0),
            collision_damage: collision_damage.max(0.0),
        }
    }
}

/// Penetration configuration.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct PierceConfig {
    /// Fraction of damage lost per penetration, in [0, 1)
    pub damage_reduction: f32,
    /// Speed multiplier applied per penetration
    pub velocity_factor: f32,
    pub max_penetrations: u32,
    /// Seconds during which the same collider is ignored after piercing it
    pub cooldown: f32,
}

impl PierceConfig {
    pub fn new(damage_reduction: f32, velocity_factor: f32, max_penetrations: u32, cooldown: f32) -> Self {
        Self {
            damage_reduction: damage_reduction.clamp(0.0, 1.0),
            velocity_factor: velocity_factor.max(0.0),
            max_penetrations,
            cooldown: cooldown.max(0.0),
        }
    }
}

/// Ricochet configuration.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct BounceConfig {
    /// Fraction of damage lost per bounce, in [0, 1)
    pub damage_reduction: f32,
    /// Speed multiplier applied to the reflected velocity
    pub bounciness: f32,
    pub max_bounces: u32,
}

impl BounceConfig {
    pub fn new(damage_reduction: f32, bounciness: f32, max_bounces: u32) -> Self {
        Self {
            damage_reduction: damage_reduction.clamp(0.0, 1.0),
            bounciness: bounciness.max(0.0),
            max_bounces,
        }
    }
}

/// Nearest-enemy homing configuration.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct HomingConfig {
    /// Search radius; zero means unbounded
    pub radius: f32,
    /// Blend strength per tick, in [0, 1]
    pub strength: f32,
}

impl HomingConfig {
    pub fn new(radius: f32, strength: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            strength: strength.clamp(0.0, 1.0),
        }
    }
}

/// Cursor/target tracking configuration.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct TrackingConfig {
    /// Blend strength per tick, in [0, 1]
    pub strength: f32,
    /// Reach of the ray used by whoever fills the tracking cache
    pub max_ray_distance: f32,
}

impl TrackingConfig {
    pub fn new(strength: f32, max_ray_distance: f32) -> Self {
        Self {
            strength: strength.clamp(0.0, 1.0),
            max_ray_distance: max_ray_distance.max(0.0),
        }
    }
}

/// Post-impact retarget configuration.
#[derive(Clone, Copy, Debug, PartialEq, Reflect)]
pub struct AimbotConfig {
    /// Cone half-angle in radians
    pub aim_cone_angle: f32,
    /// Added to the target's Y when aiming
    pub vertical_offset: f32,
    pub radius: f32,
    /// Width of the targeting indicator
    pub line_width: f32,
    /// Lifetime of the targeting indicator (seconds)
    pub line_duration: f32,
}

impl AimbotConfig {
    pub fn new(aim_cone_angle: f32, vertical_offset: f32, radius: f32, line_width: f32, line_duration: f32) -> Self {
        Self {
            aim_cone_angle: aim_cone_angle.max(0.0),
            vertical_offset,
            radius: radius.max(0.0),
            line_width: line_width.max(0.0),
            line_duration: line_duration.max(0.0),
        }
    }
}

/// Shared, immutable configuration for one bullet type.
///
/// Built once at content-load time with the `with_*` builders, then handed to
/// [`ArchetypeCatalog::register`]. Op lists keep first-occurrence order and
/// never contain duplicates.
///
/// # Example
/// ```
/// use bevy_bullet_ops::archetype::*;
///
/// let sticky_bomb = Archetype::new(0.1)
///     .with_collision_op(CollisionOp::Sticky)
///     .with_collision_op(CollisionOp::Explode)
///     .with_sticky(StickyConfig::new(1.5, 5.0))
///     .with_explosive(ExplosiveConfig::new(4.0, 2.0));
/// assert_eq!(sticky_bomb.collision_ops, vec![CollisionOp::Sticky, CollisionOp::Explode]);
/// ```
#[derive(Clone, Debug, PartialEq, Reflect)]
pub struct Archetype {
    /// Collision radius (meters)
    pub radius: f32,
    /// Deactivate on impact unless a keep-alive op fired
    pub destroy_on_impact: bool,
    /// Downward acceleration (m/s²); zero for straight flight
    pub gravity: f32,
    /// Default lifetime of a bullet of this type (seconds)
    pub lifetime: f32,
    /// Physics layers the contact probe reports; all layers by default
    pub collision_mask: u32,
    pub collision_ops: Vec<CollisionOp>,
    pub steering_ops: Vec<SteeringOp>,
    pub explosive: Option<ExplosiveConfig>,
    pub sticky: Option<StickyConfig>,
    pub pierce: Option<PierceConfig>,
    pub bounce: Option<BounceConfig>,
    pub homing: Option<HomingConfig>,
    pub tracking: Option<TrackingConfig>,
    pub aimbot: Option<AimbotConfig>,
}

impl Default for Archetype {
    /// A small destroy-on-impact bullet with no ops and a 5 second lifetime.
    fn default() -> Self {
        Self {
            radius: 0.05,
            destroy_on_impact: true,
            gravity: 0.0,
            lifetime: 5.0,
            collision_mask: u32::MAX,
            collision_ops: Vec::new(),
            steering_ops: Vec::new(),
            explosive: None,
            sticky: None,
            pierce: None,
            bounce: None,
            homing: None,
            tracking: None,
            aimbot: None,
        }
    }
}

impl Archetype {
    /// Creates a destroy-on-impact archetype with the given radius.
    pub fn new(radius: f32) -> Self {
        Self {
            radius: radius.max(0.0),
            ..Default::default()
        }
    }

    /// Builder pattern: set destroy-on-impact
    pub fn with_destroy_on_impact(mut self, destroy: bool) -> Self {
        self.destroy_on_impact = destroy;
        self
    }

    /// Builder pattern: set gravity
    pub fn with_gravity(mut self, gravity: f32) -> Self {
        self.gravity = gravity;
        self
    }

    /// Builder pattern: set default lifetime
    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = lifetime.max(0.0);
        self
    }

    /// Builder pattern: restrict contacts to the given layer bits
    pub fn with_collision_mask(mut self, mask: u32) -> Self {
        self.collision_mask = mask;
        self
    }

    /// Appends a collision op unless it is already present.
    pub fn with_collision_op(mut self, op: CollisionOp) -> Self {
        if !self.collision_ops.contains(&op) {
            self.collision_ops.push(op);
        }
        self
    }

    /// Appends a steering op unless it is already present.
    pub fn with_steering_op(mut self, op: SteeringOp) -> Self {
        if !self.steering_ops.contains(&op) {
            self.steering_ops.push(op);
        }
        self
    }

    pub fn with_explosive(mut self, config: ExplosiveConfig) -> Self {
        self.explosive = Some(config);
        self
    }

    pub fn with_sticky(mut self, config: StickyConfig) -> Self {
        self.sticky = Some(config);
        self
    }

    pub fn with_pierce(mut self, config: PierceConfig) -> Self {
        self.pierce = Some(config);
        self
    }

    pub fn with_bounce(mut self, config: BounceConfig) -> Self {
        self.bounce = Some(config);
        self
    }

    pub fn with_homing(mut self, config: HomingConfig) -> Self {
        self.homing = Some(config);
        self
    }

    pub fn with_tracking(mut self, config: TrackingConfig) -> Self {
        self.tracking = Some(config);
        self
    }

    pub fn with_aimbot(mut self, config: AimbotConfig) -> Self {
        self.aimbot = Some(config);
        self
    }
}

/// Registry of all archetypes loaded by the content system.
///
/// Archetypes are append-only: once registered, an entry is never mutated,
/// so any number of bullets may read it concurrently.
#[derive(Resource, Default, Debug)]
pub struct ArchetypeCatalog {
    archetypes: Vec<Archetype>,
}

impl ArchetypeCatalog {
    /// Registers an archetype and returns its handle.
    pub fn register(&mut self, archetype: Archetype) -> ArchetypeId {
        let id = ArchetypeId(self.archetypes.len() as u32);
        self.archetypes.push(archetype);
        id
    }

    /// Looks up a registered archetype.
    pub fn get(&self, id: ArchetypeId) -> Option<&Archetype> {
        self.archetypes.get(id.0 as usize)
    }

    pub fn len(&self) -> usize {
        self.archetypes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.archetypes.is_empty()
    }
}

/// Archetype presets for common bullet types.
pub mod presets {
    use super::*;

    /// Rubber round: two bounces, loses 10% damage per bounce.
    pub fn ricochet_round() -> Archetype {
        Archetype::new(0.05)
            .with_collision_op(CollisionOp::Bounce)
            .with_bounce(BounceConfig::new(0.1, 0.8, 2))
    }

    /// Armor-piercing round: passes through up to three enemies.
    pub fn piercing_round() -> Archetype {
        Archetype::new(0.04)
            .with_collision_op(CollisionOp::Pierce)
            .with_pierce(PierceConfig::new(0.2, 0.9, 3, 0.1))
    }

    /// Sticky bomb: attaches for 1.5 seconds, then explodes where its host is.
    pub fn sticky_bomb() -> Archetype {
        Archetype::new(0.1)
            .with_gravity(9.8)
            .with_collision_op(CollisionOp::Sticky)
            .with_collision_op(CollisionOp::Explode)
            .with_sticky(StickyConfig::new(1.5, 5.0))
            .with_explosive(ExplosiveConfig::new(4.0, 2.0))
    }

    /// Seeker: homes onto the nearest enemy and retargets after piercing.
    pub fn seeker() -> Archetype {
        Archetype::new(0.05)
            .with_collision_op(CollisionOp::Pierce)
            .with_steering_op(SteeringOp::Homing)
            .with_pierce(PierceConfig::new(0.25, 1.0, 2, 0.1))
            .with_homing(HomingConfig::new(15.0, 0.2))
            .with_aimbot(AimbotConfig::new(120f32.to_radians(), 0.5, 25.0, 0.1, 0.05))
    }
}
