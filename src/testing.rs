//! In-memory world and recording hooks for unit tests.

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;

use crate::events::{
    AimbotIndicatorEvent, DamageDealtEvent, ExplosionEvent, ImpactEvent, StickyAttachedEvent,
};
use crate::types::{DamageRoute, ImpactHit};
use crate::world::{BulletWorld, CombatHooks, DamageError, ImpactProbe};

/// `n` distinct entity ids.
pub fn entities(n: usize) -> Vec<Entity> {
    let mut world = World::new();
    (0..n).map(|_| world.spawn_empty().id()).collect()
}

#[derive(Default)]
pub struct MockWorld {
    pub enemies: Vec<(Entity, Vec3)>,
    pub transforms: HashMap<Entity, Transform>,
    pub occluded: HashSet<Entity>,
}

impl MockWorld {
    pub fn with_enemy(mut self, enemy: Entity, position: Vec3) -> Self {
        self.enemies.push((enemy, position));
        self.transforms.insert(enemy, Transform::from_translation(position));
        self
    }

    pub fn with_actor(mut self, actor: Entity, transform: Transform) -> Self {
        self.transforms.insert(actor, transform);
        self
    }

    pub fn with_occluded(mut self, enemy: Entity) -> Self {
        self.occluded.insert(enemy);
        self
    }

    /// Moves an actor, keeping the enemy list in sync.
    pub fn move_actor(&mut self, actor: Entity, transform: Transform) {
        self.transforms.insert(actor, transform);
        for (enemy, position) in &mut self.enemies {
            if *enemy == actor {
                *position = transform.translation;
            }
        }
    }

    pub fn despawn(&mut self, actor: Entity) {
        self.transforms.remove(&actor);
        self.enemies.retain(|(enemy, _)| *enemy != actor);
    }
}

impl BulletWorld for MockWorld {
    fn enemies(&self) -> impl Iterator<Item = (Entity, Vec3)> + '_ {
        self.enemies.iter().copied()
    }

    fn actor_transform(&self, actor: Entity) -> Option<Transform> {
        self.transforms.get(&actor).copied()
    }

    fn is_enemy(&self, actor: Entity) -> bool {
        self.enemies.iter().any(|(enemy, _)| *enemy == actor)
    }

    fn is_occluded(&self, _from: Vec3, _to: Vec3, target: Entity) -> bool {
        self.occluded.contains(&target)
    }
}

#[derive(Default)]
pub struct MockHooks {
    pub damage_log: Vec<(Entity, f32)>,
    pub damage_events: Vec<DamageDealtEvent>,
    pub explosions: Vec<ExplosionEvent>,
    pub impacts: Vec<ImpactEvent>,
    pub aimbot_lines: Vec<AimbotIndicatorEvent>,
    pub sticky_blobs: Vec<StickyAttachedEvent>,
    pub failing: HashSet<Entity>,
}

impl MockHooks {
    /// Makes every damage call against `target` fail.
    pub fn failing_for(mut self, target: Entity) -> Self {
        self.failing.insert(target);
        self
    }
}

impl CombatHooks for MockHooks {
    fn apply_damage(&mut self, target: Entity, amount: f32, _route: DamageRoute) -> Result<(), DamageError> {
        if self.failing.contains(&target) {
            return Err(DamageError::Rejected {
                target,
                reason: "scripted failure".to_string(),
            });
        }
        self.damage_log.push((target, amount));
        Ok(())
    }

    fn damage_dealt(&mut self, event: DamageDealtEvent) {
        self.damage_events.push(event);
    }

    fn explosion(&mut self, event: ExplosionEvent) {
        self.explosions.push(event);
    }

    fn impact(&mut self, event: ImpactEvent) {
        self.impacts.push(event);
    }

    fn aimbot_indicator(&mut self, event: AimbotIndicatorEvent) {
        self.aimbot_lines.push(event);
    }

    fn sticky_attached(&mut self, event: StickyAttachedEvent) {
        self.sticky_blobs.push(event);
    }
}

/// Probe that reports one scripted hit for any segment crossing a plane.
///
/// The plane is `y = height`, lives on `layers` and contacts carry the
/// given collider.
pub struct FloorProbe {
    pub height: f32,
    pub collider: Option<Entity>,
    pub layers: u32,
}

impl FloorProbe {
    pub fn new(height: f32, collider: Option<Entity>) -> Self {
        Self {
            height,
            collider,
            layers: 1,
        }
    }

    pub fn on_layers(mut self, layers: u32) -> Self {
        self.layers = layers;
        self
    }
}

impl ImpactProbe for FloorProbe {
    fn probe(&self, from: Vec3, to: Vec3, _radius: f32, mask: u32) -> Option<ImpactHit> {
        if mask & self.layers == 0 || from.y < self.height || to.y >= self.height {
            return None;
        }
        let t = (from.y - self.height) / (from.y - to.y);
        Some(ImpactHit {
            position: from.lerp(to, t),
            normal: Vec3::Y,
            collider: self.collider,
        })
    }
}
