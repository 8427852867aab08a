//! Combat events

use bevy::prelude::*;

/// Event: атака стартовала
///
/// Генерируется: dispatch_action_input (ActionResolver::start_attack вернул Started)
/// Обрабатывается: движковый адаптер (звук, VFX), тесты
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AttackStarted {
    pub entity: Entity,
    pub attack_id: String,
    /// Прерванная атака (combo continuation или cancel)
    pub replaced: Option<String>,
}

/// Event: анимация атаки закончилась, атака деактивирована
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct AttackFinished {
    pub entity: Entity,
    pub attack_id: String,
}
