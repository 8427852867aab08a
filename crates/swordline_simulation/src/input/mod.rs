//! Input domain - поверхность input dispatcher'а
//!
//! Raw polling (клавиатура/геймпад) вне core: сюда приходят уже готовые оси и кнопки
//! через `ActionInput`, dispatcher переводит их в вызовы ActionResolver.

pub mod events;
pub mod systems;

pub use events::ActionInput;
pub use systems::dispatch_action_input;

use crate::combat::AttackDirection;

/// Мёртвая зона осей при выборе направления атаки
pub const DIRECTION_DEADZONE: f32 = 0.1;

/// Направление атаки из осей
///
/// Side если |h| доминирует, Up/Down по знаку v если доминирует |v|, иначе Neutral
/// (включая равенство осей и всё внутри deadzone).
pub fn classify_direction(horizontal: f32, vertical: f32) -> AttackDirection {
    let (h, v) = (horizontal.abs(), vertical.abs());

    if h > v && h > DIRECTION_DEADZONE {
        AttackDirection::Side
    } else if v > h && v > DIRECTION_DEADZONE {
        if vertical > 0.0 {
            AttackDirection::Up
        } else {
            AttackDirection::Down
        }
    } else {
        AttackDirection::Neutral
    }
}
