//! Presentation seam - всё, что core знает об анимации и hit volumes
//!
//! Архитектура:
//! - Core ничего не знает про конкретный движок анимации
//! - Вместо этого - трейты `AnimationDriver` / `HitVolumeSink`
//! - Headless реализации (`HeadlessAnimator`, `HitVolumeState`) живут рядом,
//!   чтобы симуляция работала end-to-end без движка (тесты, headless binary)
//!
//! Завершение атаки определяется ПОЛЛИНГОМ имени текущего state на слое,
//! никаких callback'ов "анимация закончилась" нет.

pub mod animator;
pub mod hit_volumes;
pub mod systems;

pub use animator::HeadlessAnimator;
pub use hit_volumes::{HitVolumeState, HitVolumeToggle, HitVolumeToggled};

use serde::{Deserialize, Serialize};

/// Булевы параметры анимации, которые movement выставляет каждый тик
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AnimParam {
    Grounded,
    Jump,
    Fall,
    Walk,
    Dash,
}

impl AnimParam {
    pub const COUNT: usize = 5;

    pub fn index(&self) -> usize {
        *self as usize
    }
}

/// Контракт presentation/animation сервиса
///
/// Реализуется движковым адаптером (или `HeadlessAnimator` в тестах).
pub trait AnimationDriver {
    /// Проиграть state с начала на слое
    fn play(&mut self, state: &str, layer: usize);

    fn set_layer_weight(&mut self, layer: usize, weight: f32);

    /// Имя state, который СЕЙЧАС играет на слое (пустая строка если слоя нет)
    fn current_state_name(&self, layer: usize) -> &str;

    /// Номер кадра текущего state на слое (0 = первый кадр)
    fn current_frame(&self, layer: usize) -> u32;

    fn set_bool(&mut self, param: AnimParam, value: bool);
}

/// Контракт для внешних hit volume объектов (хитбоксы melee атак)
pub trait HitVolumeSink {
    fn set_volume_active(&mut self, volume: &str, active: bool);
}
