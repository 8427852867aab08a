//! Input dispatch system

use bevy::prelude::*;

use super::{classify_direction, ActionInput};
use crate::combat::{ActionResolver, AttackOutcome, AttackStarted, AttackTrigger};
use crate::logger::log_warning;
use crate::presentation::{HeadlessAnimator, HitVolumeState};

/// Система: ActionInput → ActionResolver
///
/// Порядок на событие: Dash (latch) → Move → Jump → StartAttack (Attack, затем Special).
/// Dash идёт первым, иначе latch не успеет к Move этого же тика.
pub fn dispatch_action_input(
    mut inputs: EventReader<ActionInput>,
    mut characters: Query<(&mut ActionResolver, &mut HeadlessAnimator, &mut HitVolumeState)>,
    mut started_events: EventWriter<AttackStarted>,
) {
    for input in inputs.read() {
        let Ok((mut resolver, mut animator, mut volumes)) = characters.get_mut(input.entity) else {
            log_warning(&format!("ActionInput: {:?} is not a character, skipped", input.entity));
            continue;
        };

        if input.dash {
            resolver.dash();
        }
        resolver.move_axis(input.horizontal);
        if input.jump {
            resolver.jump();
        }

        let direction = classify_direction(input.horizontal, input.vertical);
        let triggers = [(input.attack, AttackTrigger::Attack), (input.special, AttackTrigger::Special)];

        for (_, trigger) in triggers.into_iter().filter(|(pressed, _)| *pressed) {
            let outcome = resolver.start_attack(direction, trigger, &mut *animator, &mut *volumes);
            if let Some(AttackOutcome::Started { id, replaced }) = outcome {
                started_events.write(AttackStarted {
                    entity: input.entity,
                    attack_id: id,
                    replaced,
                });
            }
        }
    }
}
