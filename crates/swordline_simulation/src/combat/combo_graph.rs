//! ComboGraph - индекс атак по (PositionState, Direction, Trigger, combo starter)
//!
//! Build: каждое определение разворачивается в (position × direction) пары,
//! каждая пара → один ключ. Занятый ключ = ошибка конфига (НЕ перезапись).
//!
//! Resolve - двухуровневый приоритет:
//! 1. combo continuation: ключ со starter == id текущей активной атаки
//! 2. fresh start: ключ со starter == ""
//! 3. иначе ничего (атака не стартует)

use std::collections::hash_map::Entry;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use thiserror::Error;

use super::definition::{AttackDefinition, AttackDirection, AttackTrigger};
use crate::movement::PositionState;

/// Составной ключ combo index
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ComboKey {
    pub position: PositionState,
    pub direction: AttackDirection,
    pub trigger: AttackTrigger,
    /// "" = fresh start
    pub starter: String,
}

impl ComboKey {
    pub fn new(
        position: PositionState,
        direction: AttackDirection,
        trigger: AttackTrigger,
        starter: &str,
    ) -> Self {
        Self {
            position,
            direction,
            trigger,
            starter: starter.to_owned(),
        }
    }
}

impl fmt::Display for ComboKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:?}, {:?}, {:?}, starter '{}')",
            self.position, self.direction, self.trigger, self.starter
        )
    }
}

/// Ошибки построения ComboGraph
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ComboGraphError {
    /// Два определения претендуют на один ключ
    #[error("duplicate combo binding {key}: already bound to '{existing}', also claimed by '{colliding}'")]
    DuplicateBinding {
        key: ComboKey,
        existing: String,
        colliding: String,
    },
}

#[derive(Debug, Clone, Default)]
pub struct ComboGraph {
    index: HashMap<ComboKey, Arc<AttackDefinition>>,
    /// Определения в порядке конфига
    definitions: Vec<Arc<AttackDefinition>>,
}

impl ComboGraph {
    /// Строит индекс; первая коллизия ключей - ошибка с id обоих определений
    pub fn build(definitions: impl IntoIterator<Item = AttackDefinition>) -> Result<Self, ComboGraphError> {
        let mut graph = ComboGraph::default();

        for definition in definitions {
            let definition = Arc::new(definition);

            for (position, direction) in definition.bindings() {
                let key = ComboKey::new(position, direction, definition.trigger, &definition.combo_starter);

                match graph.index.entry(key) {
                    Entry::Vacant(slot) => {
                        slot.insert(Arc::clone(&definition));
                    }
                    // Одно определение перечислило пару дважды - это не коллизия
                    Entry::Occupied(slot) if Arc::ptr_eq(slot.get(), &definition) => {}
                    Entry::Occupied(slot) => {
                        return Err(ComboGraphError::DuplicateBinding {
                            existing: slot.get().id.clone(),
                            colliding: definition.id.clone(),
                            key: slot.key().clone(),
                        });
                    }
                }
            }

            graph.definitions.push(definition);
        }

        Ok(graph)
    }

    /// Следующая атака для контекста. `active_id` - id играющей атаки (None если не атакуем).
    pub fn try_resolve(
        &self,
        position: PositionState,
        direction: AttackDirection,
        trigger: AttackTrigger,
        active_id: Option<&str>,
    ) -> Option<&Arc<AttackDefinition>> {
        if let Some(active_id) = active_id {
            let continuation = ComboKey::new(position, direction, trigger, active_id);
            if let Some(definition) = self.index.get(&continuation) {
                return Some(definition);
            }
        }

        self.index.get(&ComboKey::new(position, direction, trigger, ""))
    }

    /// Все биндинги для (position, direction, trigger): starter → определение
    pub fn bindings_for(
        &self,
        position: PositionState,
        direction: AttackDirection,
        trigger: AttackTrigger,
    ) -> Vec<(&str, &AttackDefinition)> {
        let mut bindings: Vec<(&str, &AttackDefinition)> = self
            .index
            .iter()
            .filter(|(key, _)| key.position == position && key.direction == direction && key.trigger == trigger)
            .map(|(key, definition)| (key.starter.as_str(), definition.as_ref()))
            .collect();
        bindings.sort_by(|a, b| a.0.cmp(b.0));
        bindings
    }

    pub fn definitions(&self) -> &[Arc<AttackDefinition>] {
        &self.definitions
    }

    pub fn definition(&self, id: &str) -> Option<&Arc<AttackDefinition>> {
        self.definitions.iter().find(|d| d.id == id)
    }

    /// Количество ключей в индексе
    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }
}
