//! Presentation systems (headless animator clock + hit volume events)

use bevy::prelude::*;

use super::{HeadlessAnimator, HitVolumeState, HitVolumeToggled};

/// Система: тик presentation часов (кадр +1 на всех слоях)
pub fn advance_animators(mut animators: Query<&mut HeadlessAnimator>) {
    for mut animator in animators.iter_mut() {
        animator.advance();
    }
}

/// Система: накопленные переключения hit volumes → HitVolumeToggled
///
/// Идёт последней в тике, после update_attacks.
pub fn flush_hit_volume_toggles(
    mut states: Query<(Entity, &mut HitVolumeState)>,
    mut toggled_events: EventWriter<HitVolumeToggled>,
) {
    for (entity, mut state) in states.iter_mut() {
        for toggle in state.drain_pending() {
            toggled_events.write(HitVolumeToggled {
                entity,
                volume: toggle.volume,
                active: toggle.active,
            });
        }
    }
}
