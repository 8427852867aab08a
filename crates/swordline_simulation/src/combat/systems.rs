//! Combat systems (gameplay set, после input dispatch)

use bevy::prelude::*;

use super::events::AttackFinished;
use super::resolver::{ActionResolver, AttackOutcome};
use crate::presentation::{HeadlessAnimator, HitVolumeState};

/// Система: per-tick update активных атак
///
/// Melee hit volumes по кадру → окно отмены → poll завершения анимации.
/// Завершённые атаки → AttackFinished.
pub fn update_attacks(
    mut characters: Query<(Entity, &mut ActionResolver, &mut HeadlessAnimator, &mut HitVolumeState)>,
    mut finished_events: EventWriter<AttackFinished>,
) {
    for (entity, mut resolver, mut animator, mut volumes) in characters.iter_mut() {
        if let Some(AttackOutcome::Finished { id }) = resolver.update(&mut *animator, &mut *volumes) {
            finished_events.write(AttackFinished {
                entity,
                attack_id: id,
            });
        }
    }
}
