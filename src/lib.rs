//! # Bevy Bullet Ops
//!
//! Archetype-driven bullet collision and steering for Bevy 0.18.
//!
//! ## Features
//! - Shared, immutable bullet archetypes with ordered collision ops
//!   (pierce, bounce, sticky, explode) and steering ops (homing, tracking)
//! - Dense, allocation-free bullet store with save/restore
//! - Sticky bullets that ride their host and resume their op chain later
//! - Aimbot retargeting and explosion AoE with occlusion and falloff
//! - avian3d ray casts for contacts and line of sight (`dim3` feature)
//!
//! The core ([`pipeline`], [`steering`], [`targeting`], [`simulation`]) is
//! plain functions over plain data, generic over the [`world`] traits, and
//! runs without an `App`. The [`systems`] module adapts it to ECS queries and
//! messages.
//!
//! ## Quick Start
//! ```rust,no_run
//! use bevy::prelude::*;
//! use bevy_bullet_ops::prelude::*;
//!
//! fn main() {
//!     App::new()
//!         .add_plugins(DefaultPlugins)
//!         .add_plugins(BulletOpsPlugin)
//!         .add_systems(Startup, register_bullets)
//!         .run();
//! }
//!
//! fn register_bullets(mut catalog: ResMut<ArchetypeCatalog>) {
//!     catalog.register(presets::sticky_bomb());
//! }
//! ```

pub mod archetype;
pub mod components;
pub mod events;
pub mod math;
pub mod pipeline;
pub mod resources;
pub mod simulation;
pub mod steering;
pub mod store;
pub mod systems;
pub mod targeting;
pub mod types;
pub mod world;

#[cfg(test)]
mod testing;

pub mod prelude {
    pub use crate::archetype::*;
    pub use crate::components::*;
    pub use crate::events::*;
    pub use crate::pipeline::{ChainOutcome, Impact};
    pub use crate::resources::*;
    pub use crate::store::{BulletData, BulletSpawn, BulletStore};
    pub use crate::types::*;
    pub use crate::world::{BulletWorld, CombatHooks, DamageError, ImpactProbe};
    pub use crate::{BulletOpsDebugPlugin, BulletOpsPlugin};
}

use bevy::prelude::*;

/// Core plugin: resources, messages and the fixed-step bullet systems.
///
/// # Systems
/// - `spawn_requested_bullets` - Moves `FireBulletEvent`s into the store
/// - `simulate_bullets` - Steps all bullets with avian3d contacts (when a
///   `SpatialQueryPipeline` exists)
/// - `simulate_bullets_unprobed` - Steps all bullets without contacts otherwise
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_bullet_ops::prelude::*;
///
/// let mut app = App::new();
/// app.add_plugins(BulletOpsPlugin);
/// assert!(app.world().contains_resource::<BulletStore>());
/// ```
pub struct BulletOpsPlugin;

impl Plugin for BulletOpsPlugin {
    fn build(&self, app: &mut App) {
        app.register_type::<components::Enemy>()
            .register_type::<components::Health>()
            .register_type::<components::Invulnerable>()
            .register_type::<resources::BulletOpsConfig>()
            .register_type::<resources::TrackingTarget>()
            .init_resource::<resources::BulletOpsConfig>()
            .init_resource::<resources::TrackingTarget>()
            .init_resource::<archetype::ArchetypeCatalog>()
            .init_resource::<store::BulletStore>()
            .add_message::<events::FireBulletEvent>()
            .add_message::<events::DamageDealtEvent>()
            .add_message::<events::DamageRequestEvent>()
            .add_message::<events::ExplosionEvent>()
            .add_message::<events::ImpactEvent>()
            .add_message::<events::AimbotIndicatorEvent>()
            .add_message::<events::StickyAttachedEvent>();

        #[cfg(feature = "dim3")]
        {
            use avian3d::prelude::SpatialQueryPipeline;
            app.add_systems(
                FixedUpdate,
                (
                    systems::spawn::spawn_requested_bullets,
                    systems::simulate::simulate_bullets.run_if(resource_exists::<SpatialQueryPipeline>),
                    systems::simulate::simulate_bullets_unprobed
                        .run_if(not(resource_exists::<SpatialQueryPipeline>)),
                )
                    .chain(),
            );
        }

        #[cfg(not(feature = "dim3"))]
        app.add_systems(
            FixedUpdate,
            (
                systems::spawn::spawn_requested_bullets,
                systems::simulate::simulate_bullets_unprobed,
            )
                .chain(),
        );
    }
}

/// Debug plugin for bullet visualization.
pub struct BulletOpsDebugPlugin;

impl Plugin for BulletOpsDebugPlugin {
    fn build(&self, app: &mut App) {
        app.add_systems(Update, systems::debug::draw_bullet_debug);
    }
}
