//! Character configuration (movement tuning + ground probes + moveset)
//!
//! Загружается из JSON (`CharacterConfig::from_json_str` / `from_json_file`),
//! все поля имеют defaults - пустой объект `{}` валиден (но без атак).

use std::collections::BTreeMap;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::combat::{
    AttackBehavior, AttackDefinition, AttackDirection, AttackTrigger, ComboGraphError, HitFrame,
};
use crate::movement::{GroundProbeConfig, MovementTuning, PositionState};

/// Ошибки инициализации персонажа (всё фатально, до первого тика)
#[derive(Debug, Error)]
pub enum SetupError {
    #[error("ground check needs at least one probe offset")]
    MissingGroundProbes,

    #[error(transparent)]
    ComboGraph(#[from] ComboGraphError),

    #[error("invalid character config: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to read character config: {0}")]
    Io(#[from] std::io::Error),
}

/// Когда активную атаку можно прервать новой StartAttack
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CancelPolicy {
    /// Атака никогда не прерывается (играет до конца)
    #[default]
    Never,
    /// Прерывается когда кадр слоя атак >= `cancel_frame` определения
    FromCancelFrame,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CharacterConfig {
    pub movement: MovementTuning,
    pub ground: GroundProbeConfig,
    /// Порядок важен только для сообщений об ошибках (первая коллизия)
    pub attacks: Vec<AttackDefinition>,
    /// Animation слой, на котором играются атаки
    pub attack_layer: usize,
    pub cancel_policy: CancelPolicy,
    /// Длины клипов (кадры) для HeadlessAnimator; движковый адаптер их игнорирует
    pub headless_clips: BTreeMap<String, u32>,
}

impl Default for CharacterConfig {
    fn default() -> Self {
        Self {
            movement: MovementTuning::default(),
            ground: GroundProbeConfig::default(),
            attacks: Vec::new(),
            attack_layer: 1,
            cancel_policy: CancelPolicy::Never,
            headless_clips: BTreeMap::new(),
        }
    }
}

impl CharacterConfig {
    pub fn from_json_str(json: &str) -> Result<Self, SetupError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, SetupError> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    /// Builder: заменить moveset
    pub fn with_attacks(mut self, attacks: Vec<AttackDefinition>) -> Self {
        self.attacks = attacks;
        self
    }

    pub fn with_cancel_policy(mut self, policy: CancelPolicy) -> Self {
        self.cancel_policy = policy;
        self
    }

    pub fn with_clip(mut self, state: &str, frames: u32) -> Self {
        self.headless_clips.insert(state.to_owned(), frames);
        self
    }

    /// Атаки, для state которых не задана длина клипа (в headless такие играют бесконечно)
    pub fn attacks_without_clips(&self) -> Vec<&str> {
        self.attacks
            .iter()
            .filter(|attack| !self.headless_clips.contains_key(attack.state_name()))
            .map(|attack| attack.id.as_str())
            .collect()
    }

    /// Демо-персонаж с мечом: ground combo jab → slash → finisher, dash/air атаки, special
    pub fn swordsman() -> Self {
        use AttackDirection::{Down, Neutral, Side, Up};

        let blade = |frames: &[(u32, &str)]| {
            AttackBehavior::melee(
                frames
                    .iter()
                    .map(|&(active_frame, volume)| HitFrame {
                        active_frame,
                        volume: volume.to_owned(),
                    })
                    .collect(),
            )
        };

        let attacks = vec![
            AttackDefinition::new("jab")
                .bind(PositionState::Neutral, &[Neutral, Side])
                .with_cancel_frame(8)
                .with_behavior(blade(&[(3, "blade_near")])),
            AttackDefinition::new("slash")
                .continues("jab")
                .bind(PositionState::Neutral, &[Neutral, Side])
                .with_cancel_frame(10)
                .with_behavior(blade(&[(4, "blade_near"), (7, "blade_far")])),
            AttackDefinition::new("finisher")
                .continues("slash")
                .bind(PositionState::Neutral, &[Neutral, Side])
                .with_behavior(blade(&[(6, "blade_far")])),
            AttackDefinition::new("uppercut").bind(PositionState::Neutral, &[Up]),
            AttackDefinition::new("sweep").bind(PositionState::Neutral, &[Down]),
            AttackDefinition::new("dash_thrust")
                .bind(PositionState::Dash, &[Neutral, Side])
                .with_behavior(blade(&[(2, "blade_far")])),
            AttackDefinition::new("air_slash")
                .bind(PositionState::Air, &[Neutral, Side, Up])
                .without_movement_limit(),
            AttackDefinition::new("dive").bind(PositionState::Air, &[Down]),
            AttackDefinition::new("whirlwind")
                .with_trigger(AttackTrigger::Special)
                .bind(PositionState::Neutral, &[Neutral, Side, Up, Down])
                .with_behavior(blade(&[(5, "blade_ring")])),
        ];

        let clips = [
            ("jab", 12),
            ("slash", 16),
            ("finisher", 24),
            ("uppercut", 18),
            ("sweep", 18),
            ("dash_thrust", 14),
            ("air_slash", 12),
            ("dive", 20),
            ("whirlwind", 30),
        ];

        clips.into_iter().fold(
            Self::default()
                .with_attacks(attacks)
                .with_cancel_policy(CancelPolicy::FromCancelFrame),
            |config, (state, frames)| config.with_clip(state, frames),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::combat::ComboGraph;

    #[test]
    fn test_empty_json_uses_defaults() {
        let config = CharacterConfig::from_json_str("{}").unwrap();
        assert_eq!(config, CharacterConfig::default());
        assert_eq!(config.attack_layer, 1);
        assert_eq!(config.cancel_policy, CancelPolicy::Never);
        assert_eq!(config.ground.offsets.len(), 3);
    }

    #[test]
    fn test_json_moveset_parses() {
        let json = r#"{
            "movement": { "max_walk_speed": 2.0 },
            "cancel_policy": "from_cancel_frame",
            "attacks": [
                {
                    "id": "jab",
                    "inputs": [ { "position": "Neutral", "directions": ["Neutral", "Side"] } ]
                },
                {
                    "id": "slash",
                    "combo_starter": "jab",
                    "trigger": "Attack",
                    "limits_movement": false,
                    "inputs": [ { "position": "Neutral", "directions": ["Side"] } ],
                    "behavior": {
                        "kind": "melee",
                        "hit_frames": [ { "active_frame": 4, "volume": "blade" } ]
                    }
                }
            ]
        }"#;

        let config = CharacterConfig::from_json_str(json).unwrap();
        assert_eq!(config.movement.max_walk_speed, 2.0);
        assert_eq!(config.movement.walk_force, 30.0);
        assert_eq!(config.cancel_policy, CancelPolicy::FromCancelFrame);
        assert_eq!(config.attacks.len(), 2);

        let jab = &config.attacks[0];
        assert!(jab.limits_movement);
        assert_eq!(jab.behavior, AttackBehavior::Basic);
        // animation_state не задан → играется state с именем id
        assert_eq!(jab.animation_state, "");
        assert_eq!(jab.state_name(), "jab");

        let slash = &config.attacks[1];
        assert_eq!(slash.combo_starter, "jab");
        assert!(!slash.limits_movement);
        assert_eq!(slash.behavior.volume_at(4), Some("blade"));
    }

    #[test]
    fn test_attacks_without_clips() {
        let json = r#"{
            "attacks": [
                { "id": "jab", "inputs": [ { "position": "Neutral", "directions": ["Neutral"] } ] },
                {
                    "id": "kick",
                    "animation_state": "kick_anim",
                    "inputs": [ { "position": "Neutral", "directions": ["Down"] } ]
                }
            ],
            "headless_clips": { "jab": 12 }
        }"#;

        let config = CharacterConfig::from_json_str(json).unwrap();
        assert_eq!(config.attacks_without_clips(), vec!["kick"]);

        // Клип ищется по имени state, не по id
        let config = config.with_clip("kick_anim", 10);
        assert!(config.attacks_without_clips().is_empty());
        assert!(CharacterConfig::swordsman().attacks_without_clips().is_empty());
    }

    #[test]
    fn test_invalid_json_is_setup_error() {
        let result = CharacterConfig::from_json_str(r#"{ "attacks": 5 }"#);
        assert!(matches!(result, Err(SetupError::Json(_))));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let result = CharacterConfig::from_json_file("/nonexistent/swordline/character.json");
        assert!(matches!(result, Err(SetupError::Io(_))));
    }

    #[test]
    fn test_swordsman_moveset_builds() {
        let config = CharacterConfig::swordsman();
        let graph = ComboGraph::build(config.attacks.clone()).unwrap();
        assert_eq!(graph.definitions().len(), config.attacks.len());

        // У каждой атаки есть длина клипа, иначе в headless она не закончится
        for attack in &config.attacks {
            assert!(config.headless_clips.contains_key(attack.state_name()), "{}", attack.id);
        }
    }
}
