//! AttackLifecycle - одна активная атака: Inactive → Active → Inactive
//!
//! Activate: токен блокера (id атаки) + вес слоя атак 1 + play state
//! UpdateFrame: behavior атаки (Melee → hit volumes по кадру слоя)
//! Deactivate: снять ровно свой токен + выключить volumes + вес слоя 0
//!
//! Завершение НЕ событийное: resolver поллит имя state на слое (`is_finished`).

use std::sync::Arc;

use super::definition::{AttackBehavior, AttackDefinition};
use crate::movement::MovementBlockers;
use crate::presentation::{AnimationDriver, HitVolumeSink};

/// Снимок состояния атаки (read-only снаружи)
///
/// Инвариант: `is_active()` ⇔ `active.is_some()`.
#[derive(Debug, Clone, Default)]
pub struct AttackRuntime {
    active: Option<Arc<AttackDefinition>>,
    can_cancel: bool,
}

impl AttackRuntime {
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    pub fn active(&self) -> Option<&Arc<AttackDefinition>> {
        self.active.as_ref()
    }

    pub fn active_id(&self) -> Option<&str> {
        self.active.as_deref().map(|def| def.id.as_str())
    }

    pub fn can_cancel(&self) -> bool {
        self.can_cancel
    }
}

#[derive(Debug, Clone)]
pub struct AttackLifecycle {
    /// Animation слой атак
    layer: usize,
    runtime: AttackRuntime,
    /// Токен реально зарегистрирован (limits_movement == true на activate)
    holds_blocker: bool,
}

impl AttackLifecycle {
    pub fn new(layer: usize) -> Self {
        Self {
            layer,
            runtime: AttackRuntime::default(),
            holds_blocker: false,
        }
    }

    pub fn layer(&self) -> usize {
        self.layer
    }

    pub fn runtime(&self) -> &AttackRuntime {
        &self.runtime
    }

    /// Активирует атаку. No-op (false) если уже активна другая.
    pub fn activate(
        &mut self,
        definition: Arc<AttackDefinition>,
        blockers: &mut MovementBlockers,
        animator: &mut dyn AnimationDriver,
    ) -> bool {
        if self.runtime.is_active() {
            return false;
        }

        // Пустой id - тоже валидный токен
        self.holds_blocker = definition.limits_movement;
        if self.holds_blocker {
            blockers.add(&definition.id);
        }

        animator.set_layer_weight(self.layer, 1.0);
        animator.play(definition.state_name(), self.layer);

        self.runtime.active = Some(definition);
        self.runtime.can_cancel = false;
        true
    }

    /// Per-frame behavior активной атаки
    pub fn update_frame(&mut self, animator: &dyn AnimationDriver, volumes: &mut dyn HitVolumeSink) {
        let Some(definition) = self.runtime.active.as_deref() else {
            return;
        };

        match &definition.behavior {
            AttackBehavior::Basic => {}
            AttackBehavior::Melee { .. } => {
                let frame = animator.current_frame(self.layer);
                let current = definition.behavior.volume_at(frame);
                for volume in definition.behavior.volumes() {
                    volumes.set_volume_active(volume, current == Some(volume));
                }
            }
        }
    }

    /// Открывает окно отмены (вызывается resolver'ом по CancelPolicy)
    pub fn allow_cancel(&mut self) {
        if self.runtime.is_active() {
            self.runtime.can_cancel = true;
        }
    }

    /// Атака закончилась: на слое играет уже не её state
    pub fn is_finished(&self, animator: &dyn AnimationDriver) -> bool {
        self.runtime
            .active
            .as_deref()
            .is_some_and(|def| animator.current_state_name(self.layer) != def.state_name())
    }

    /// Деактивирует атаку, возвращает определение (None если ничего не было активно)
    pub fn deactivate(
        &mut self,
        blockers: &mut MovementBlockers,
        animator: &mut dyn AnimationDriver,
        volumes: &mut dyn HitVolumeSink,
    ) -> Option<Arc<AttackDefinition>> {
        let definition = self.runtime.active.take()?;

        if self.holds_blocker {
            blockers.remove(&definition.id);
            self.holds_blocker = false;
        }

        for volume in definition.behavior.volumes() {
            volumes.set_volume_active(volume, false);
        }

        animator.set_layer_weight(self.layer, 0.0);
        self.runtime.can_cancel = false;
        Some(definition)
    }
}
