//! Hit volumes (хитбоксы melee атак) - внешние объекты, core их только включает/выключает

use std::collections::BTreeSet;

use bevy::prelude::*;

use super::HitVolumeSink;

/// Одно переключение hit volume (для событий наружу)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HitVolumeToggle {
    pub volume: String,
    pub active: bool,
}

/// Event: hit volume включён/выключен
///
/// Генерируется: flush_hit_volume_toggles (из HitVolumeState.pending)
/// Обрабатывается: движковый адаптер (реальные коллайдеры)
#[derive(Event, Debug, Clone, PartialEq, Eq)]
pub struct HitVolumeToggled {
    pub entity: Entity,
    pub volume: String,
    pub active: bool,
}

/// Текущее состояние hit volumes персонажа
///
/// Переключения копятся в `pending` только при реальной смене состояния.
#[derive(Component, Debug, Clone, Default)]
pub struct HitVolumeState {
    active: BTreeSet<String>,
    pending: Vec<HitVolumeToggle>,
}

impl HitVolumeState {
    pub fn is_active(&self, volume: &str) -> bool {
        self.active.contains(volume)
    }

    pub fn active_volumes(&self) -> impl Iterator<Item = &str> {
        self.active.iter().map(String::as_str)
    }

    /// Забрать накопленные переключения (для событий)
    pub fn drain_pending(&mut self) -> Vec<HitVolumeToggle> {
        std::mem::take(&mut self.pending)
    }
}

impl HitVolumeSink for HitVolumeState {
    fn set_volume_active(&mut self, volume: &str, active: bool) {
        let changed = if active {
            self.active.insert(volume.to_owned())
        } else {
            self.active.remove(volume)
        };

        if changed {
            self.pending.push(HitVolumeToggle {
                volume: volume.to_owned(),
                active,
            });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_real_changes_are_recorded() {
        let mut state = HitVolumeState::default();
        state.set_volume_active("blade", true);
        state.set_volume_active("blade", true);
        state.set_volume_active("fist", false);

        let pending = state.drain_pending();
        assert_eq!(
            pending,
            vec![HitVolumeToggle { volume: "blade".into(), active: true }]
        );
        assert!(state.is_active("blade"));
        assert!(state.drain_pending().is_empty());
    }
}
