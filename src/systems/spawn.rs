//! Bullet spawning from fire requests.

use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::archetype::ArchetypeCatalog;
use crate::events::FireBulletEvent;
use crate::store::BulletStore;

/// Moves queued [`FireBulletEvent`]s into the [`BulletStore`].
///
/// Requests naming an unregistered archetype are dropped with a warning.
pub fn spawn_requested_bullets(
    mut fire_events: MessageReader<FireBulletEvent>,
    catalog: Res<ArchetypeCatalog>,
    mut store: ResMut<BulletStore>,
) {
    for FireBulletEvent(spawn) in fire_events.read() {
        let Some(archetype) = catalog.get(spawn.archetype) else {
            warn!("fire request for unknown archetype {:?} ignored", spawn.archetype);
            continue;
        };
        store.spawn(spawn.clone(), archetype.lifetime);
    }
}
