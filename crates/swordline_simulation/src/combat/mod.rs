//! Combat module - combo resolution + attack lifecycle
//!
//! Core ответственность:
//! - AttackDefinition / ComboGraph: какая атака следующая для (PositionState, Direction, Trigger, starter)
//! - AttackLifecycle: activate → per-frame update → deactivate (+ токен MovementBlockers)
//! - ActionResolver: единственная точка входа для input dispatcher'а
//!
//! Presentation (анимация, hit volumes) и физика - через трейты, см. `presentation` / `movement::ground`.

use bevy::prelude::*;

pub mod combo_graph;
pub mod definition;
pub mod events;
pub mod lifecycle;
pub mod resolver;
pub mod systems;


// Re-export основных типов
pub use combo_graph::{ComboGraph, ComboGraphError, ComboKey};
pub use definition::{AttackBehavior, AttackDefinition, AttackDirection, AttackInput, AttackTrigger, HitFrame};
pub use events::{AttackFinished, AttackStarted};
pub use lifecycle::{AttackLifecycle, AttackRuntime};
pub use resolver::{ActionResolver, AttackOutcome};

use crate::input::{dispatch_action_input, ActionInput};
use crate::movement::systems as movement_systems;
use crate::physics::PlatformGeometry;
use crate::presentation::systems as presentation_systems;
use crate::presentation::HitVolumeToggled;

/// Фазы fixed tick'а персонажа
#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ActionSet {
    /// Ground check → layer filters → velocity integration
    Physics,
    /// Presentation clock → animation flags → input dispatch → attack update
    Gameplay,
}

/// Action Plugin (locomotion + combat одного тика)
///
/// Регистрирует системы в FixedUpdate, Physics строго до Gameplay.
///
/// Порядок выполнения:
/// 1. ground_check - probe земли + one-way фильтры (мутирует PlatformGeometry)
/// 2. physics_step - силы, прыжок, гравитация, позиция
/// 3. advance_animators - кадр +1, законченные клипы → idle
/// 4. update_animation_flags - Grounded/Jump/Fall/Walk/Dash
/// 5. dispatch_action_input - ActionInput → Dash/Move/Jump/StartAttack
/// 6. update_attacks - hit volumes, окно отмены, poll завершения
/// 7. flush_hit_volume_toggles - HitVolumeToggled наружу
pub struct ActionPlugin;

impl Plugin for ActionPlugin {
    fn build(&self, app: &mut App) {
        // Регистрация событий
        app.add_event::<ActionInput>()
            .add_event::<AttackStarted>()
            .add_event::<AttackFinished>()
            .add_event::<HitVolumeToggled>();

        // Не перезаписывает геометрию, если уровень уже вставлен
        app.init_resource::<PlatformGeometry>();

        app.configure_sets(FixedUpdate, (ActionSet::Physics, ActionSet::Gameplay).chain());

        app.add_systems(
            FixedUpdate,
            (movement_systems::ground_check, movement_systems::physics_step)
                .chain()
                .in_set(ActionSet::Physics),
        );

        app.add_systems(
            FixedUpdate,
            (
                presentation_systems::advance_animators,
                movement_systems::update_animation_flags,
                dispatch_action_input,
                systems::update_attacks,
                presentation_systems::flush_hit_volume_toggles,
            )
                .chain()
                .in_set(ActionSet::Gameplay),
        );
    }
}
