//! Attack definitions - данные атак (moveset), неизменяемые в рантайме
//!
//! Приходят из конфига (CharacterConfig.attacks), индексируются ComboGraph'ом.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::PositionState;

/// Направление ввода при атаке
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect)]
pub enum AttackDirection {
    #[default]
    Neutral,
    Up,
    Down,
    Side,
}

impl AttackDirection {
    pub const ALL: [AttackDirection; 4] = [
        AttackDirection::Neutral,
        AttackDirection::Up,
        AttackDirection::Down,
        AttackDirection::Side,
    ];
}

/// Кнопка атаки
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect)]
pub enum AttackTrigger {
    #[default]
    Attack,
    Special,
}

impl AttackTrigger {
    pub const ALL: [AttackTrigger; 2] = [AttackTrigger::Attack, AttackTrigger::Special];
}

/// Биндинг: в каком PositionState и какими направлениями атака вызывается
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttackInput {
    pub position: PositionState,
    pub directions: Vec<AttackDirection>,
}

/// Кадр анимации, с которого включается hit volume
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HitFrame {
    pub active_frame: u32,
    /// Имя внешнего hit volume объекта
    pub volume: String,
}

/// Поведение атаки на каждом кадре
///
/// - Basic: ничего не делает в UpdateFrame
/// - Melee: таблица кадр → hit volume (timeline, см. `AttackBehavior::volume_at`)
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum AttackBehavior {
    #[default]
    Basic,
    Melee { hit_frames: Vec<HitFrame> },
}

impl AttackBehavior {
    /// Melee behavior с hit frames, отсортированными по кадру
    pub fn melee(mut hit_frames: Vec<HitFrame>) -> Self {
        hit_frames.sort_by_key(|f| f.active_frame);
        AttackBehavior::Melee { hit_frames }
    }

    /// Hit volume, который должен быть включён на кадре `frame`
    ///
    /// Включён volume последней записи с `active_frame <= frame`; до первой записи - ничего.
    pub fn volume_at(&self, frame: u32) -> Option<&str> {
        match self {
            AttackBehavior::Basic => None,
            AttackBehavior::Melee { hit_frames } => hit_frames
                .iter()
                .filter(|f| f.active_frame <= frame)
                .max_by_key(|f| f.active_frame)
                .map(|f| f.volume.as_str()),
        }
    }

    /// Все hit volumes этой атаки (без повторов, в порядке таблицы)
    pub fn volumes(&self) -> Vec<&str> {
        match self {
            AttackBehavior::Basic => Vec::new(),
            AttackBehavior::Melee { hit_frames } => {
                let mut volumes: Vec<&str> = Vec::new();
                for frame in hit_frames {
                    if !volumes.contains(&frame.volume.as_str()) {
                        volumes.push(frame.volume.as_str());
                    }
                }
                volumes
            }
        }
    }
}

/// Определение атаки
///
/// `combo_starter` пустой = fresh start (доступна из не-combo контекста),
/// непустой = combo continuation (доступна только пока играет атака с этим id).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttackDefinition {
    /// ID атаки (может быть пустым; используется как токен блокера и как combo starter)
    pub id: String,
    /// Только для читаемости/логов
    pub name: String,
    /// Animation state, который играется на слое атак (пустой = id)
    pub animation_state: String,
    pub combo_starter: String,
    pub trigger: AttackTrigger,
    pub inputs: Vec<AttackInput>,
    /// Кадр, после которого атаку можно прервать новой (см. CancelPolicy)
    pub cancel_frame: u32,
    /// false = атака не блокирует движение
    pub limits_movement: bool,
    pub behavior: AttackBehavior,
}

impl Default for AttackDefinition {
    fn default() -> Self {
        Self {
            id: String::new(),
            name: String::new(),
            animation_state: String::new(),
            combo_starter: String::new(),
            trigger: AttackTrigger::Attack,
            inputs: Vec::new(),
            cancel_frame: 0,
            limits_movement: true,
            behavior: AttackBehavior::Basic,
        }
    }
}

impl AttackDefinition {
    /// Атака с id; имя и animation state по умолчанию = id
    pub fn new(id: &str) -> Self {
        Self {
            id: id.to_owned(),
            name: id.to_owned(),
            animation_state: id.to_owned(),
            ..Default::default()
        }
    }

    // Builder методы (moveset'ы в коде и тестах)

    pub fn with_animation_state(mut self, state: &str) -> Self {
        self.animation_state = state.to_owned();
        self
    }

    pub fn with_trigger(mut self, trigger: AttackTrigger) -> Self {
        self.trigger = trigger;
        self
    }

    pub fn continues(mut self, starter_id: &str) -> Self {
        self.combo_starter = starter_id.to_owned();
        self
    }

    /// Добавить биндинг (position × directions)
    pub fn bind(mut self, position: PositionState, directions: &[AttackDirection]) -> Self {
        self.inputs.push(AttackInput {
            position,
            directions: directions.to_vec(),
        });
        self
    }

    pub fn with_cancel_frame(mut self, frame: u32) -> Self {
        self.cancel_frame = frame;
        self
    }

    pub fn with_behavior(mut self, behavior: AttackBehavior) -> Self {
        self.behavior = behavior;
        self
    }

    pub fn without_movement_limit(mut self) -> Self {
        self.limits_movement = false;
        self
    }

    /// State на слое атак: `animation_state`, либо id если он не задан
    pub fn state_name(&self) -> &str {
        if self.animation_state.is_empty() {
            &self.id
        } else {
            &self.animation_state
        }
    }

    pub fn is_combo_continuation(&self) -> bool {
        !self.combo_starter.is_empty()
    }

    /// Все (position, direction) пары из inputs
    pub fn bindings(&self) -> impl Iterator<Item = (PositionState, AttackDirection)> + '_ {
        self.inputs
            .iter()
            .flat_map(|input| input.directions.iter().map(move |&dir| (input.position, dir)))
    }
}
