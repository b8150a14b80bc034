//! Dense per-bullet state, decoupled from the shared archetypes.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::types::{ArchetypeId, BulletSlot, ImpactSnapshot};

/// Mutable state of one live bullet slot.
///
/// Mutated only by the steering pass and the collision pipeline. A pending
/// continuation (`pending_action_index`) is always paired with a
/// `pending_snapshot`, and a bullet with a pending continuation stays active
/// until it resumes.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BulletData {
    /// Slot is live; `false` means reclaimable
    pub active: bool,
    /// Monotonic id, unique for the lifetime of the store
    pub id: u32,
    pub archetype: ArchetypeId,

    // Kinematics
    pub position: Vec3,
    pub prev_position: Vec3,
    pub velocity: Vec3,
    pub life_remaining: f32,

    // Combat
    pub damage: f32,
    pub bounce_count: u32,
    pub penetration_count: u32,
    pub last_collider: Option<Entity>,
    pub collision_cooldown: f32,

    // Sticky continuation
    pub stuck_target: Option<Entity>,
    pub stuck_local_offset: Vec3,
    pub stuck_world_normal: Vec3,
    pub stuck_local_normal: Vec3,
    pub stuck_time_left: f32,
    pub stuck_pre_velocity: Vec3,
    /// Re-stick immunity after a release (seconds)
    pub sticky_cooldown: f32,
    /// Resume index into the archetype's collision ops
    pub pending_action_index: Option<usize>,
    pub pending_snapshot: Option<ImpactSnapshot>,
}

impl BulletData {
    /// Creates an active bullet at `position` moving with `velocity`.
    pub fn new(archetype: ArchetypeId, position: Vec3, velocity: Vec3, damage: f32) -> Self {
        Self {
            active: true,
            id: 0,
            archetype,
            position,
            prev_position: position,
            velocity,
            life_remaining: f32::INFINITY,
            damage,
            bounce_count: 0,
            penetration_count: 0,
            last_collider: None,
            collision_cooldown: 0.0,
            stuck_target: None,
            stuck_local_offset: Vec3::ZERO,
            stuck_world_normal: Vec3::ZERO,
            stuck_local_normal: Vec3::ZERO,
            stuck_time_left: 0.0,
            stuck_pre_velocity: Vec3::ZERO,
            sticky_cooldown: 0.0,
            pending_action_index: None,
            pending_snapshot: None,
        }
    }

    /// Whether the bullet is attached and counting down.
    pub fn is_stuck(&self) -> bool {
        self.stuck_time_left > 0.0
    }

    /// Whether a paused op chain is waiting to resume.
    pub fn has_pending_continuation(&self) -> bool {
        self.pending_action_index.is_some()
    }

    /// Drops any paused continuation.
    pub fn clear_pending(&mut self) {
        self.pending_action_index = None;
        self.pending_snapshot = None;
    }

    /// Stack copy of the fields one collision pass may change.
    pub fn collision_state(&self) -> BulletCollisionState {
        BulletCollisionState {
            position: self.position,
            prev_position: self.prev_position,
            velocity: self.velocity,
            damage: self.damage,
            bounce_count: self.bounce_count,
            penetration_count: self.penetration_count,
            last_collider: self.last_collider,
            collision_cooldown: self.collision_cooldown,
        }
    }

    /// Writes a finished collision pass back into the bullet.
    pub fn apply_collision_state(&mut self, state: &BulletCollisionState) {
        self.position = state.position;
        self.prev_position = state.prev_position;
        self.velocity = state.velocity;
        self.damage = state.damage;
        self.bounce_count = state.bounce_count;
        self.penetration_count = state.penetration_count;
        self.last_collider = state.last_collider;
        self.collision_cooldown = state.collision_cooldown;
    }
}

/// Working copy of a bullet's mutable fields for one collision pass.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct BulletCollisionState {
    pub position: Vec3,
    pub prev_position: Vec3,
    pub velocity: Vec3,
    pub damage: f32,
    pub bounce_count: u32,
    pub penetration_count: u32,
    pub last_collider: Option<Entity>,
    pub collision_cooldown: f32,
}

/// Spawn parameters for a new bullet.
///
/// # Example
/// ```
/// use bevy::prelude::*;
/// use bevy_bullet_ops::store::BulletSpawn;
/// use bevy_bullet_ops::types::ArchetypeId;
///
/// let spawn = BulletSpawn::new(ArchetypeId(0), Vec3::new(0.0, 1.5, 0.0), Vec3::NEG_Z * 60.0)
///     .with_damage(35.0)
///     .with_lifetime(2.0);
/// assert_eq!(spawn.damage, 35.0);
/// ```
#[derive(Clone, Debug, PartialEq)]
pub struct BulletSpawn {
    pub archetype: ArchetypeId,
    pub origin: Vec3,
    pub velocity: Vec3,
    pub damage: f32,
    /// Overrides the archetype lifetime when set
    pub lifetime: Option<f32>,
}

impl BulletSpawn {
    /// Creates spawn parameters with 10 damage and the archetype's lifetime.
    pub fn new(archetype: ArchetypeId, origin: Vec3, velocity: Vec3) -> Self {
        Self {
            archetype,
            origin,
            velocity,
            damage: 10.0,
            lifetime: None,
        }
    }

    /// Builder pattern: set damage
    pub fn with_damage(mut self, damage: f32) -> Self {
        self.damage = damage;
        self
    }

    /// Builder pattern: set lifetime
    pub fn with_lifetime(mut self, lifetime: f32) -> Self {
        self.lifetime = Some(lifetime);
        self
    }
}

/// Save/restore failure.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("bullet store encoding failed: {0}")]
    Codec(#[from] bincode::Error),
}

/// Dense slot storage for all bullets.
///
/// Inactive slots are recycled through a free list, so steady-state firing
/// does not allocate per bullet. `on_free_list` mirrors `slots` and marks the
/// indices already queued for reuse.
#[derive(Resource, Default, Debug, Clone, Serialize, Deserialize)]
pub struct BulletStore {
    slots: Vec<BulletData>,
    on_free_list: Vec<bool>,
    free: Vec<usize>,
    next_id: u32,
}

impl BulletStore {
    /// Creates a store with room for `capacity` bullets.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            slots: Vec::with_capacity(capacity),
            on_free_list: Vec::with_capacity(capacity),
            free: Vec::new(),
            next_id: 1,
        }
    }

    /// Spawns a bullet, reusing a free slot when one exists.
    ///
    /// `default_lifetime` is used when the spawn does not override it
    /// (normally the archetype's lifetime).
    pub fn spawn(&mut self, spawn: BulletSpawn, default_lifetime: f32) -> BulletSlot {
        let mut bullet = BulletData::new(spawn.archetype, spawn.origin, spawn.velocity, spawn.damage);
        bullet.id = self.next_id.max(1);
        self.next_id = bullet.id.wrapping_add(1);
        bullet.life_remaining = spawn.lifetime.unwrap_or(default_lifetime);

        match self.free.pop() {
            Some(index) => {
                self.slots[index] = bullet;
                self.on_free_list[index] = false;
                BulletSlot(index)
            }
            None => {
                self.slots.push(bullet);
                self.on_free_list.push(false);
                BulletSlot(self.slots.len() - 1)
            }
        }
    }

    pub fn get(&self, slot: BulletSlot) -> Option<&BulletData> {
        self.slots.get(slot.0)
    }

    pub fn get_mut(&mut self, slot: BulletSlot) -> Option<&mut BulletData> {
        self.slots.get_mut(slot.0)
    }

    /// All slots, live or not, in index order.
    pub fn slots(&self) -> &[BulletData] {
        &self.slots
    }

    pub fn slots_mut(&mut self) -> &mut [BulletData] {
        &mut self.slots
    }

    pub fn iter_active(&self) -> impl Iterator<Item = (BulletSlot, &BulletData)> {
        self.slots
            .iter()
            .enumerate()
            .filter(|(_, bullet)| bullet.active)
            .map(|(index, bullet)| (BulletSlot(index), bullet))
    }

    pub fn active_count(&self) -> usize {
        self.slots.iter().filter(|bullet| bullet.active).count()
    }

    /// Puts every inactive slot not yet on the free list back on it.
    ///
    /// One pass over the slots; returns how many slots were freed by this call.
    pub fn reclaim(&mut self) -> usize {
        let mut freed = 0;
        for (index, (bullet, queued)) in self.slots.iter().zip(self.on_free_list.iter_mut()).enumerate() {
            if !bullet.active && !*queued {
                *queued = true;
                self.free.push(index);
                freed += 1;
            }
        }
        freed
    }

    /// Number of slots waiting to be reused.
    pub fn free_count(&self) -> usize {
        self.free.len()
    }

    /// Serializes the whole store, including paused continuations.
    pub fn save(&self) -> Result<Vec<u8>, StoreError> {
        Ok(bincode::serialize(self)?)
    }

    /// Rebuilds a store from [`save`](Self::save) output.
    pub fn restore(bytes: &[u8]) -> Result<Self, StoreError> {
        Ok(bincode::deserialize(bytes)?)
    }
}
