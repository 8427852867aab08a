//! ActionResolver - единственная точка входа для input dispatcher'а
//!
//! Владеет MovementState, MovementBlockers, ComboGraph и AttackLifecycle одного персонажа.
//! Связывает их: movement state → PositionState → combo lookup → lifecycle,
//! lifecycle → blockers → movement.

use std::sync::Arc;

use bevy::prelude::*;

use super::combo_graph::ComboGraph;
use super::definition::{AttackDirection, AttackTrigger};
use super::lifecycle::{AttackLifecycle, AttackRuntime};
use crate::config::{CancelPolicy, CharacterConfig, SetupError};
use crate::logger::log;
use crate::movement::{GroundProbe, MovementBlockers, MovementState, PositionState};
use crate::presentation::{AnimationDriver, HitVolumeSink};

/// Что произошло с атакой за вызов (для логов и ECS событий)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Атака стартовала (`replaced` - прерванная атака, если была)
    Started {
        id: String,
        replaced: Option<String>,
    },
    /// Анимация атаки закончилась, атака деактивирована
    Finished { id: String },
}

#[derive(Component, Debug, Clone)]
pub struct ActionResolver {
    movement: MovementState,
    blockers: MovementBlockers,
    combos: ComboGraph,
    lifecycle: AttackLifecycle,
    cancel_policy: CancelPolicy,
}

impl ActionResolver {
    /// Строит резолвер из конфига. Ошибки: нет ground probe'ов, коллизия combo ключей.
    pub fn new(config: CharacterConfig) -> Result<Self, SetupError> {
        let movement = MovementState::new(config.movement, config.ground)?;
        let combos = ComboGraph::build(config.attacks)?;

        Ok(Self {
            movement,
            blockers: MovementBlockers::new(),
            combos,
            lifecycle: AttackLifecycle::new(config.attack_layer),
            cancel_policy: config.cancel_policy,
        })
    }

    // ========================================================================
    // Locomotion (проксируется в MovementState)
    // ========================================================================

    pub fn move_axis(&mut self, axis: f32) {
        self.movement.move_axis(axis, &self.blockers);
    }

    pub fn jump(&mut self) -> bool {
        self.movement.jump(&self.blockers)
    }

    pub fn dash(&mut self) {
        self.movement.dash();
    }

    pub fn ground_check(&mut self, probe: &mut dyn GroundProbe) {
        self.movement.ground_check(probe);
    }

    pub fn physics_step(&mut self, animator: &mut dyn AnimationDriver, dt: f32) {
        self.movement.physics_step(&self.blockers, animator, dt);
    }

    pub fn update_animation_flags(&mut self, animator: &mut dyn AnimationDriver) {
        self.movement.update_animation_flags(animator);
    }

    // ========================================================================
    // Attacks
    // ========================================================================

    /// Попытка начать атаку. Возвращает Started если атака реально стартовала.
    ///
    /// Отказ (None): активная атака не отменяема, либо для контекста нет биндинга.
    pub fn start_attack(
        &mut self,
        direction: AttackDirection,
        trigger: AttackTrigger,
        animator: &mut dyn AnimationDriver,
        volumes: &mut dyn HitVolumeSink,
    ) -> Option<AttackOutcome> {
        let runtime = self.lifecycle.runtime();
        if runtime.is_active() && !runtime.can_cancel() {
            log(&format!(
                "🚫 StartAttack {:?}/{:?} rejected: '{}' not cancellable",
                direction,
                trigger,
                runtime.active_id().unwrap_or_default()
            ));
            return None;
        }

        let position = self.movement.position_state();
        let Some(next) = self
            .combos
            .try_resolve(position, direction, trigger, runtime.active_id())
            .map(Arc::clone)
        else {
            // Нет биндинга: в лог идут starter'ы, которые вообще есть у контекста
            let starters: Vec<&str> = self
                .combos
                .bindings_for(position, direction, trigger)
                .into_iter()
                .map(|(starter, _)| starter)
                .collect();
            log(&format!(
                "🚫 StartAttack {:?}/{:?}/{:?}: no binding (starters {:?})",
                position, direction, trigger, starters
            ));
            return None;
        };

        // Прерываемая атака отпускает свой токен и volumes ДО старта новой
        let replaced = self
            .lifecycle
            .deactivate(&mut self.blockers, animator, volumes)
            .map(|previous| previous.id.clone());

        if let Some(previous) = &replaced {
            if next.combo_starter == *previous {
                log(&format!("⚔️ Combo: '{}' → '{}' ({:?})", previous, next.id, position));
            } else {
                log(&format!("⚔️ Cancel: '{}' → '{}' ({:?})", previous, next.id, position));
            }
        } else {
            log(&format!("⚔️ Attack '{}' started ({:?}, {:?}, {:?})", next.id, position, direction, trigger));
        }

        let id = next.id.clone();
        self.lifecycle.activate(next, &mut self.blockers, animator);

        Some(AttackOutcome::Started { id, replaced })
    }

    /// Per-tick update атаки: behavior кадра → окно отмены → проверка завершения
    pub fn update(
        &mut self,
        animator: &mut dyn AnimationDriver,
        volumes: &mut dyn HitVolumeSink,
    ) -> Option<AttackOutcome> {
        let cancel_frame = self.lifecycle.runtime().active()?.cancel_frame;

        self.lifecycle.update_frame(&*animator, volumes);

        if self.cancel_policy == CancelPolicy::FromCancelFrame
            && animator.current_frame(self.lifecycle.layer()) >= cancel_frame
        {
            self.lifecycle.allow_cancel();
        }

        if !self.lifecycle.is_finished(&*animator) {
            return None;
        }

        let finished = self.lifecycle.deactivate(&mut self.blockers, animator, volumes)?;
        log(&format!("✅ Attack '{}' finished", finished.id));
        Some(AttackOutcome::Finished {
            id: finished.id.clone(),
        })
    }

    // ========================================================================
    // Queries
    // ========================================================================

    pub fn position_state(&self) -> PositionState {
        self.movement.position_state()
    }

    pub fn movement(&self) -> &MovementState {
        &self.movement
    }

    /// Телепорт и прочие внешние правки movement (spawn, тесты)
    pub fn movement_mut(&mut self) -> &mut MovementState {
        &mut self.movement
    }

    pub fn blockers(&self) -> &MovementBlockers {
        &self.blockers
    }

    /// Внешние блокеры (стан, катсцены) - тот же набор, что и у атак
    pub fn blockers_mut(&mut self) -> &mut MovementBlockers {
        &mut self.blockers
    }

    pub fn combos(&self) -> &ComboGraph {
        &self.combos
    }

    pub fn attack(&self) -> &AttackRuntime {
        self.lifecycle.runtime()
    }

    pub fn active_attack_id(&self) -> Option<&str> {
        self.lifecycle.runtime().active_id()
    }
}
