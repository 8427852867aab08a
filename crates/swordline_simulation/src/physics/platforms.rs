//! PlatformGeometry - headless реализация GroundProbe
//!
//! Stub для headless симуляции: мир = набор горизонтальных платформ на физических слоях.
//! Движковый адаптер подменяет это реальным linecast'ом.

use std::collections::HashSet;

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use crate::movement::{GroundProbe, LayerMask};

/// Горизонтальная платформа (верхняя грань - отрезок на высоте `top`)
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Platform {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub layer: u32,
}

impl Platform {
    pub fn new(left: f32, right: f32, top: f32, layer: u32) -> Self {
        Self {
            left: left.min(right),
            right: left.max(right),
            top,
            layer,
        }
    }

    /// Пересекает ли отрезок from→to верхнюю грань платформы
    fn intersects(&self, from: Vec2, to: Vec2) -> bool {
        let (low, high) = (from.y.min(to.y), from.y.max(to.y));
        if self.top < low || self.top > high {
            return false;
        }

        let dy = to.y - from.y;
        if dy.abs() <= f32::EPSILON {
            // Горизонтальный отрезок (или точка) на высоте грани
            let (x0, x1) = (from.x.min(to.x), from.x.max(to.x));
            return x1 >= self.left && x0 <= self.right;
        }

        let t = (self.top - from.y) / dy;
        let x = from.x + t * (to.x - from.x);
        x >= self.left && x <= self.right
    }
}

/// Ресурс: геометрия уровня + таблица игнорируемых пар слоёв
#[derive(Resource, Debug, Clone, Default)]
pub struct PlatformGeometry {
    platforms: Vec<Platform>,
    /// Нормализованные пары (min, max)
    ignored_pairs: HashSet<(u32, u32)>,
}

impl PlatformGeometry {
    pub fn new(platforms: Vec<Platform>) -> Self {
        Self {
            platforms,
            ignored_pairs: HashSet::new(),
        }
    }

    /// Бесконечный (практически) пол на слое 0 с верхом на y = 0
    pub fn flat_floor() -> Self {
        Self::new(vec![Platform::new(-10_000.0, 10_000.0, 0.0, 0)])
    }

    pub fn add(&mut self, platform: Platform) {
        self.platforms.push(platform);
    }

    /// Включена ли коллизия между слоями
    pub fn collides(&self, layer_a: u32, layer_b: u32) -> bool {
        !self.ignored_pairs.contains(&Self::pair(layer_a, layer_b))
    }

    fn pair(a: u32, b: u32) -> (u32, u32) {
        (a.min(b), a.max(b))
    }
}

impl GroundProbe for PlatformGeometry {
    fn probe(&self, from: Vec2, to: Vec2, mask: LayerMask) -> bool {
        self.platforms
            .iter()
            .filter(|p| mask.contains(p.layer))
            .any(|p| p.intersects(from, to))
    }

    fn set_layer_collision(&mut self, layer_a: u32, layer_b: u32, ignore: bool) {
        let pair = Self::pair(layer_a, layer_b);
        if ignore {
            self.ignored_pairs.insert(pair);
        } else {
            self.ignored_pairs.remove(&pair);
        }
    }
}
