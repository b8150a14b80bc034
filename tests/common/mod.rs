//! Shared fakes for integration tests.
#![allow(dead_code)]

use std::collections::{HashMap, HashSet};

use bevy::prelude::*;
use bevy_bullet_ops::prelude::*;

pub fn entities(n: usize) -> Vec<Entity> {
    let mut world = World::new();
    (0..n).map(|_| world.spawn_empty().id()).collect()
}

#[derive(Default)]
pub struct SceneWorld {
    pub enemies: Vec<(Entity, Vec3)>,
    pub transforms: HashMap<Entity, Transform>,
}

impl SceneWorld {
    pub fn with_enemy(mut self, enemy: Entity, position: Vec3) -> Self {
        self.enemies.push((enemy, position));
        self.transforms.insert(enemy, Transform::from_translation(position));
        self
    }

    pub fn with_static(mut self, actor: Entity, transform: Transform) -> Self {
        self.transforms.insert(actor, transform);
        self
    }

    pub fn move_actor(&mut self, actor: Entity, transform: Transform) {
        self.transforms.insert(actor, transform);
        for (enemy, position) in &mut self.enemies {
            if *enemy == actor {
                *position = transform.translation;
            }
        }
    }
}

impl BulletWorld for SceneWorld {
    fn enemies(&self) -> impl Iterator<Item = (Entity, Vec3)> + '_ {
        self.enemies.iter().copied()
    }

    fn actor_transform(&self, actor: Entity) -> Option<Transform> {
        self.transforms.get(&actor).copied()
    }

    fn is_enemy(&self, actor: Entity) -> bool {
        self.enemies.iter().any(|(enemy, _)| *enemy == actor)
    }
}

#[derive(Default)]
pub struct RecordingHooks {
    pub damage: Vec<(Entity, f32)>,
    pub dealt: Vec<DamageDealtEvent>,
    pub explosions: Vec<ExplosionEvent>,
    pub rejected: HashSet<Entity>,
}

impl CombatHooks for RecordingHooks {
    fn apply_damage(&mut self, target: Entity, amount: f32, _route: DamageRoute) -> Result<(), DamageError> {
        if self.rejected.contains(&target) {
            return Err(DamageError::MissingReceiver(target));
        }
        self.damage.push((target, amount));
        Ok(())
    }

    fn damage_dealt(&mut self, event: DamageDealtEvent) {
        self.dealt.push(event);
    }

    fn explosion(&mut self, event: ExplosionEvent) {
        self.explosions.push(event);
    }
}

pub fn approx(a: Vec3, b: Vec3) -> bool {
    a.distance(b) < 1e-4
}
