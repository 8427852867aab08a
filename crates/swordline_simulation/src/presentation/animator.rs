//! HeadlessAnimator - модель animator'а для headless симуляции
//!
//! Модель "clip length":
//! - `play(state, layer)` ставит state на слой с кадра 0
//! - `advance()` (раз в тик) двигает кадр на всех слоях
//! - когда кадр доходит до длины клипа → слой возвращается в idle state
//!
//! Именно этот возврат в idle ActionResolver видит как "анимация атаки закончилась".

use std::collections::HashMap;

use bevy::prelude::*;

use super::{AnimParam, AnimationDriver};

/// Состояние одного слоя animator'а
#[derive(Debug, Clone, PartialEq)]
struct AnimatorLayer {
    idle_state: String,
    state: String,
    frame: u32,
    weight: f32,
}

impl AnimatorLayer {
    fn new(idle_state: &str) -> Self {
        Self {
            idle_state: idle_state.to_owned(),
            state: idle_state.to_owned(),
            frame: 0,
            weight: 0.0,
        }
    }
}

#[derive(Component, Debug, Clone, PartialEq)]
pub struct HeadlessAnimator {
    layers: Vec<AnimatorLayer>,
    /// state name → длина клипа в кадрах (state без записи играет бесконечно)
    clip_frames: HashMap<String, u32>,
    params: [bool; AnimParam::COUNT],
}

impl Default for HeadlessAnimator {
    fn default() -> Self {
        Self::new(2)
    }
}

impl HeadlessAnimator {
    /// Слой 0 - locomotion (weight 1), остальные - overlay слои (weight 0)
    pub fn new(layer_count: usize) -> Self {
        let mut layers: Vec<AnimatorLayer> = (0..layer_count.max(1))
            .map(|_| AnimatorLayer::new("Idle"))
            .collect();
        layers[0].weight = 1.0;

        Self {
            layers,
            clip_frames: HashMap::new(),
            params: [false; AnimParam::COUNT],
        }
    }

    /// Builder: длина клипа для state
    pub fn with_clip(mut self, state: &str, frames: u32) -> Self {
        self.clip_frames.insert(state.to_owned(), frames);
        self
    }

    pub fn set_clip(&mut self, state: &str, frames: u32) {
        self.clip_frames.insert(state.to_owned(), frames);
    }

    /// Тик presentation часов: кадр +1, законченные клипы выходят в idle
    pub fn advance(&mut self) {
        for layer in self.layers.iter_mut() {
            layer.frame += 1;

            let finished = self
                .clip_frames
                .get(&layer.state)
                .is_some_and(|&frames| layer.frame >= frames);

            if finished {
                layer.state = layer.idle_state.clone();
                layer.frame = 0;
            }
        }
    }

    /// Принудительно перевести слой в idle (например, прерывание извне)
    pub fn interrupt(&mut self, layer: usize) {
        if let Some(layer) = self.layers.get_mut(layer) {
            layer.state = layer.idle_state.clone();
            layer.frame = 0;
        }
    }

    pub fn param(&self, param: AnimParam) -> bool {
        self.params[param.index()]
    }

    pub fn layer_weight(&self, layer: usize) -> f32 {
        self.layers.get(layer).map_or(0.0, |l| l.weight)
    }

    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    fn layer_mut(&mut self, layer: usize) -> &mut AnimatorLayer {
        // Слои создаются по требованию (конфиг может ссылаться на слой > layer_count)
        while self.layers.len() <= layer {
            self.layers.push(AnimatorLayer::new("Idle"));
        }
        &mut self.layers[layer]
    }
}

impl AnimationDriver for HeadlessAnimator {
    fn play(&mut self, state: &str, layer: usize) {
        let layer = self.layer_mut(layer);
        layer.state = state.to_owned();
        layer.frame = 0;
    }

    fn set_layer_weight(&mut self, layer: usize, weight: f32) {
        self.layer_mut(layer).weight = weight.clamp(0.0, 1.0);
    }

    fn current_state_name(&self, layer: usize) -> &str {
        self.layers.get(layer).map_or("", |l| l.state.as_str())
    }

    fn current_frame(&self, layer: usize) -> u32 {
        self.layers.get(layer).map_or(0, |l| l.frame)
    }

    fn set_bool(&mut self, param: AnimParam, value: bool) {
        self.params[param.index()] = value;
    }
}
