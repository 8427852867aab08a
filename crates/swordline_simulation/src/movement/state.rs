//! MovementState - 2D locomotion персонажа
//!
//! Архитектура:
//! - Input (через ActionResolver) пишет intent: drive (axis), jump latch, dash latch
//! - Physics step (fixed tick) применяет силы, clamp скорости, flip, прыжок, гравитацию
//! - Gameplay step выводит animation флаги (Jump/Fall/Walk/Dash/Grounded)
//!
//! Velocity интегрируем сами (kinematic), grounding приходит от `GroundProbe`.
//! Move/Jump игнорируются пока `MovementBlockers` не пуст.

use bevy::prelude::*;
use serde::{Deserialize, Serialize};

use super::blockers::MovementBlockers;
use super::ground::{apply_pass_through_filters, probe_ground, GroundProbe, GroundProbeConfig};
use crate::config::SetupError;
use crate::presentation::{AnimParam, AnimationDriver};

/// Грубый контекст locomotion для combo index
///
/// Никогда не хранится отдельно - выводится из флагов MovementState на каждый запрос.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize, Reflect)]
pub enum PositionState {
    #[default]
    Neutral,
    Dash,
    Air,
}

impl PositionState {
    pub const ALL: [PositionState; 3] = [PositionState::Neutral, PositionState::Dash, PositionState::Air];

    /// Air если jumping || falling, иначе Dash если dashing, иначе Neutral
    pub fn derive(jumping: bool, falling: bool, dashing: bool) -> Self {
        if jumping || falling {
            PositionState::Air
        } else if dashing {
            PositionState::Dash
        } else {
            PositionState::Neutral
        }
    }
}

/// Направление взгляда персонажа
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Reflect)]
pub enum Facing {
    #[default]
    Right,
    Left,
}

impl Facing {
    /// +1 вправо, -1 влево
    pub fn sign(&self) -> f32 {
        match self {
            Facing::Right => 1.0,
            Facing::Left => -1.0,
        }
    }

    pub fn flipped(&self) -> Self {
        match self {
            Facing::Right => Facing::Left,
            Facing::Left => Facing::Right,
        }
    }
}

/// Тюнинг движения (forces в ньютонах, скорости в м/с)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MovementTuning {
    pub walk_force: f32,
    pub max_walk_speed: f32,
    pub dash_force: f32,
    pub max_dash_speed: f32,
    pub jump_force: f32,
    pub mass: f32,
    /// Гравитация (м/с², отрицательная = вниз)
    pub gravity: f32,
    /// Предельная скорость падения (м/с), за тик не пролетаем дальше длины ground probe
    pub max_fall_speed: f32,
    /// Линейное затухание скорости (0 = без затухания)
    pub linear_drag: f32,
    /// Dash включается только если |vx| ≥ max_walk_speed × ratio
    pub dash_min_speed_ratio: f32,
    /// |axis| ниже порога гасит dash на земле
    pub dash_cancel_axis: f32,
    /// vy выше порога = прыжок реально начался (и ниже = Jump флаг снимается)
    pub jump_started_speed: f32,
    /// |vx| выше порога = Walk анимация
    pub walk_anim_speed: f32,
}

impl Default for MovementTuning {
    fn default() -> Self {
        Self {
            walk_force: 30.0,
            max_walk_speed: 1.0,
            dash_force: 60.0,
            max_dash_speed: 3.0,
            jump_force: 250.0,
            mass: 1.0,
            gravity: -9.81,
            max_fall_speed: 20.0,
            linear_drag: 0.0,
            dash_min_speed_ratio: 0.5,
            dash_cancel_axis: 0.05,
            jump_started_speed: 1.0,
            walk_anim_speed: 0.1,
        }
    }
}

/// Наблюдаемое состояние движения (read-only для combo/resolver)
#[derive(Debug, Clone, Copy, Default, PartialEq, Reflect)]
pub struct MovementRuntime {
    pub facing: Facing,
    pub grounded: bool,
    pub jumping: bool,
    pub falling: bool,
    pub dashing: bool,
    pub velocity: Vec2,
    pub position: Vec2,
    /// Pass-through слой под ногами (one-way платформа)
    pub pass_through_layer: Option<u32>,
}

#[derive(Debug, Clone)]
pub struct MovementState {
    tuning: MovementTuning,
    ground: GroundProbeConfig,
    runtime: MovementRuntime,
    /// Горизонтальный drive [-1, 1], latch'ится только на земле
    drive: f32,
    /// Прыжок запрошен, импульс применится на следующем physics step
    start_jump: bool,
    /// Прыжок реально начался (vy превысил jump_started_speed)
    has_jumped: bool,
    /// Dash latch - действует ровно на один Move
    can_dash: bool,
    /// Последнее увиденное поколение блокеров (новый блок → гасим горизонтальную скорость)
    seen_blocker_generation: u64,
}

impl MovementState {
    /// Ошибка если в ground конфиге нет ни одной probe точки
    pub fn new(tuning: MovementTuning, ground: GroundProbeConfig) -> Result<Self, SetupError> {
        if ground.offsets.is_empty() {
            return Err(SetupError::MissingGroundProbes);
        }

        Ok(Self {
            tuning,
            ground,
            runtime: MovementRuntime::default(),
            drive: 0.0,
            start_jump: false,
            has_jumped: true,
            can_dash: false,
            seen_blocker_generation: 0,
        })
    }

    // ========================================================================
    // Input actions
    // ========================================================================

    /// Горизонтальный ввод. No-op пока есть блокеры.
    pub fn move_axis(&mut self, axis: f32, blockers: &MovementBlockers) {
        if blockers.is_blocked() {
            return;
        }

        let axis = if axis.is_nan() { 0.0 } else { axis.clamp(-1.0, 1.0) };

        if self.runtime.grounded {
            self.drive = axis;

            let dash_speed = self.tuning.max_walk_speed * self.tuning.dash_min_speed_ratio;
            self.runtime.dashing = self.can_dash && self.runtime.velocity.x.abs() >= dash_speed;
        }

        // Ось почти отпущена → dash гаснет (в прыжке держим)
        if self.runtime.dashing && !self.runtime.jumping && axis.abs() < self.tuning.dash_cancel_axis {
            self.runtime.dashing = false;
        }

        self.can_dash = false;
    }

    /// Прыжок: только с земли и без блокеров. Возвращает true если прыжок запланирован.
    pub fn jump(&mut self, blockers: &MovementBlockers) -> bool {
        if !self.runtime.grounded || blockers.is_blocked() {
            return false;
        }

        self.start_jump = true;
        self.runtime.jumping = true;
        self.runtime.falling = false;
        self.has_jumped = false;
        true
    }

    /// Dash intent - взводит latch на следующий Move
    pub fn dash(&mut self) {
        self.can_dash = true;
    }

    // ========================================================================
    // Fixed tick
    // ========================================================================

    /// Ground check + фильтры one-way платформ (до gameplay логики тика)
    pub fn ground_check(&mut self, probe: &mut dyn GroundProbe) {
        let contact = probe_ground(&self.ground, &*probe, self.runtime.position, self.runtime.velocity);
        apply_pass_through_filters(&self.ground, probe, contact);

        self.runtime.grounded = contact.grounded;
        self.runtime.pass_through_layer = contact.pass_through_layer;
    }

    /// Physics step: силы → clamp → flip → прыжок → гравитация → интеграция позиции
    pub fn physics_step(&mut self, blockers: &MovementBlockers, animator: &mut dyn AnimationDriver, dt: f32) {
        // Новый блокер (атака стартовала) → стоп по горизонтали
        if blockers.generation() != self.seen_blocker_generation {
            self.seen_blocker_generation = blockers.generation();
            if blockers.is_blocked() {
                self.halt();
            }
        }

        let tuning = &self.tuning;
        let mass = tuning.mass.max(f32::EPSILON);
        let (force, max_speed) = if self.runtime.dashing {
            (tuning.dash_force, tuning.max_dash_speed)
        } else {
            (tuning.walk_force, tuning.max_walk_speed)
        };

        let velocity = &mut self.runtime.velocity;

        // Разгоняем только пока не упёрлись в max в сторону drive
        if self.drive * velocity.x <= max_speed {
            velocity.x += self.drive * force / mass * dt;
        }
        if velocity.x.abs() > max_speed {
            velocity.x = max_speed.copysign(velocity.x);
        }

        // Flip если drive смотрит против facing
        let facing_sign = self.runtime.facing.sign();
        if self.drive != 0.0 && self.drive.signum() != facing_sign {
            self.runtime.facing = self.runtime.facing.flipped();
        }

        if self.start_jump {
            animator.set_bool(AnimParam::Jump, true);
            velocity.y += tuning.jump_force / mass * dt;
            self.start_jump = false;
        }

        if !self.runtime.grounded {
            velocity.y = (velocity.y + tuning.gravity * dt).max(-tuning.max_fall_speed);
        } else if velocity.y < 0.0 {
            // Приземлились - вертикальная скорость гасится землёй
            velocity.y = 0.0;
        }

        if tuning.linear_drag > 0.0 {
            *velocity *= 1.0 / (1.0 + tuning.linear_drag * dt);
        }

        self.runtime.position += *velocity * dt;
    }

    /// Animation флаги (gameplay step, после physics)
    pub fn update_animation_flags(&mut self, animator: &mut dyn AnimationDriver) {
        let threshold = self.tuning.jump_started_speed;
        let runtime = &mut self.runtime;

        animator.set_bool(AnimParam::Grounded, runtime.grounded);

        if !self.has_jumped && runtime.velocity.y > threshold {
            self.has_jumped = true;
        }

        if runtime.grounded && !runtime.jumping && runtime.falling {
            // Приземление
            runtime.falling = false;
            animator.set_bool(AnimParam::Jump, false);
            animator.set_bool(AnimParam::Fall, false);
        } else if runtime.velocity.y < threshold {
            if self.has_jumped {
                runtime.jumping = false;
                animator.set_bool(AnimParam::Jump, false);
            }
            if !runtime.grounded {
                runtime.falling = true;
                animator.set_bool(AnimParam::Fall, true);
            }
        }

        let walking = !runtime.jumping
            && !runtime.falling
            && runtime.grounded
            && runtime.velocity.x.abs() > self.tuning.walk_anim_speed;
        animator.set_bool(AnimParam::Walk, walking);
        animator.set_bool(AnimParam::Dash, runtime.dashing);
    }

    /// Гасит горизонтальную скорость и drive
    pub fn halt(&mut self) {
        self.runtime.velocity.x = 0.0;
        self.drive = 0.0;
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn position_state(&self) -> PositionState {
        PositionState::derive(self.runtime.jumping, self.runtime.falling, self.runtime.dashing)
    }

    pub fn runtime(&self) -> &MovementRuntime {
        &self.runtime
    }

    pub fn drive(&self) -> f32 {
        self.drive
    }

    pub fn is_dash_armed(&self) -> bool {
        self.can_dash
    }

    pub fn is_jump_pending(&self) -> bool {
        self.start_jump
    }

    /// Телепорт (spawn / респавн)
    pub fn set_position(&mut self, position: Vec2) {
        self.runtime.position = position;
    }

    pub fn set_velocity(&mut self, velocity: Vec2) {
        self.runtime.velocity = velocity;
    }

    #[cfg(test)]
    pub(crate) fn runtime_mut(&mut self) -> &mut MovementRuntime {
        &mut self.runtime
    }
}
