//! Ground probe - grounding через linecast'ы от физического сервиса
//!
//! Два вида земли:
//! - always ground (маска слоёв) - земля всегда
//! - pass-through слои (one-way платформы) - земля только если НЕ летим вверх сквозь неё
//!
//! Сам linecast - чёрный ящик (`GroundProbe`), core только решает что считать землёй.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

/// Битовая маска физических слоёв (бит i = слой i)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct LayerMask(pub u32);

impl LayerMask {
    /// Маска из одного слоя
    pub fn layer(layer: u32) -> Self {
        Self(1u32.checked_shl(layer).unwrap_or(0))
    }

    pub fn contains(&self, layer: u32) -> bool {
        self.0 & Self::layer(layer).0 != 0
    }
}

/// Контракт физического probe сервиса
pub trait GroundProbe {
    /// Linecast: true если отрезок from→to задевает коллайдер из маски
    fn probe(&self, from: Vec2, to: Vec2, mask: LayerMask) -> bool;

    /// Фильтр коллизий между слоями (one-way платформы)
    fn set_layer_collision(&mut self, layer_a: u32, layer_b: u32, ignore: bool);
}

/// Конфиг ground check'а персонажа
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroundProbeConfig {
    /// Точки probe относительно позиции персонажа (ноги + боковые смещения)
    ///
    /// Пустой список = ошибка setup'а.
    pub offsets: Vec<[f32; 2]>,
    /// Слои, которые всегда земля
    pub always_ground: LayerMask,
    /// One-way слои (прыгаем сквозь снизу, стоим сверху)
    pub pass_through_layers: Vec<u32>,
    /// Физический слой самого персонажа (для фильтра коллизий)
    pub character_layer: u32,
    /// Вертикальная скорость, выше которой pass-through слой НЕ считается землёй
    pub upward_pass_speed: f32,
}

impl Default for GroundProbeConfig {
    fn default() -> Self {
        Self {
            // Центр + два боковых probe'а, ~0.55m вниз от центра капсулы
            offsets: vec![[0.0, -0.55], [-0.2, -0.55], [0.2, -0.55]],
            always_ground: LayerMask::layer(0),
            pass_through_layers: Vec::new(),
            character_layer: 8,
            upward_pass_speed: 0.01,
        }
    }
}

/// Результат ground check'а за тик
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroundContact {
    pub grounded: bool,
    /// Pass-through слой, на котором стоим (None если на always ground или в воздухе)
    pub pass_through_layer: Option<u32>,
}

/// Ground check: сначала always ground по всем probe точкам, потом pass-through слои
///
/// Pass-through слой засчитывается только если не летим вверх (`velocity.y <= upward_pass_speed`).
pub fn probe_ground(
    config: &GroundProbeConfig,
    probe: &dyn GroundProbe,
    position: Vec2,
    velocity: Vec2,
) -> GroundContact {
    let hits = |mask: LayerMask| {
        config
            .offsets
            .iter()
            .any(|&[x, y]| probe.probe(position, position + Vec2::new(x, y), mask))
    };

    if hits(config.always_ground) {
        return GroundContact {
            grounded: true,
            pass_through_layer: None,
        };
    }

    // Летим вверх сквозь one-way платформу → это не земля
    if velocity.y > config.upward_pass_speed {
        return GroundContact::default();
    }

    config
        .pass_through_layers
        .iter()
        .copied()
        .find(|&layer| hits(LayerMask::layer(layer)))
        .map(|layer| GroundContact {
            grounded: true,
            pass_through_layer: Some(layer),
        })
        .unwrap_or_default()
}

/// Фильтр коллизий для one-way платформ
///
/// Коллизия включена только со слоем, на котором стоим; остальные pass-through слои игнорируются,
/// чтобы сквозь них можно было пролетать.
pub fn apply_pass_through_filters(
    config: &GroundProbeConfig,
    probe: &mut dyn GroundProbe,
    contact: GroundContact,
) {
    for &layer in &config.pass_through_layers {
        let ignore = contact.pass_through_layer != Some(layer);
        probe.set_layer_collision(config.character_layer, layer, ignore);
    }
}
