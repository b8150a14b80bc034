use bevy::prelude::*;

use crate::archetype::ArchetypeCatalog;
use crate::resources::BulletOpsConfig;
use crate::store::BulletStore;

/// Draw debug gizmos for bullets.
///
/// Free bullets get a red sphere and a green velocity line; stuck bullets get
/// a yellow sphere and a line along their contact normal.
pub fn draw_bullet_debug(
    mut gizmos: Gizmos,
    store: Res<BulletStore>,
    catalog: Res<ArchetypeCatalog>,
    config: Res<BulletOpsConfig>,
) {
    if !config.debug_draw {
        return;
    }

    for (_, bullet) in store.iter_active() {
        let radius = catalog
            .get(bullet.archetype)
            .map_or(0.05, |archetype| archetype.radius.max(0.01));

        if bullet.is_stuck() {
            gizmos.sphere(bullet.position, radius, Color::srgb(1.0, 0.9, 0.0));
            gizmos.line(
                bullet.position,
                bullet.position + bullet.stuck_world_normal * 0.25,
                Color::srgb(1.0, 0.9, 0.0),
            );
            continue;
        }

        gizmos.sphere(bullet.position, radius, Color::srgb(1.0, 0.0, 0.0));
        // Scaled down for visibility
        let end = bullet.position + bullet.velocity * 0.1;
        gizmos.line(bullet.position, end, Color::srgb(0.0, 1.0, 0.0));
    }
}
