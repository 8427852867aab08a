//! Input events

use bevy::prelude::*;

/// Event: ввод персонажа за тик (уже опрошенный - raw polling вне core)
///
/// Генерируется: движковый адаптер / headless скрипт / AI
/// Обрабатывается: dispatch_action_input (Dash → Move → Jump → StartAttack)
#[derive(Event, Debug, Clone, Copy, PartialEq)]
pub struct ActionInput {
    pub entity: Entity,
    /// Горизонтальная ось [-1, 1]
    pub horizontal: f32,
    /// Вертикальная ось [-1, 1] (+ = вверх)
    pub vertical: f32,
    /// Dash удерживается
    pub dash: bool,
    pub jump: bool,
    pub attack: bool,
    pub special: bool,
}

impl ActionInput {
    /// Пустой ввод (оси в 0, кнопки отпущены)
    pub fn idle(entity: Entity) -> Self {
        Self {
            entity,
            horizontal: 0.0,
            vertical: 0.0,
            dash: false,
            jump: false,
            attack: false,
            special: false,
        }
    }

    pub fn with_axis(mut self, horizontal: f32, vertical: f32) -> Self {
        self.horizontal = horizontal;
        self.vertical = vertical;
        self
    }

    pub fn with_dash(mut self) -> Self {
        self.dash = true;
        self
    }

    pub fn with_jump(mut self) -> Self {
        self.jump = true;
        self
    }

    pub fn with_attack(mut self) -> Self {
        self.attack = true;
        self
    }

    pub fn with_special(mut self) -> Self {
        self.special = true;
        self
    }
}
