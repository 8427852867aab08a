//! Actor domain - сборка персонажа из конфига
//!
//! Персонаж = entity с:
//! - Character (маркер + имя для логов)
//! - ActionResolver (movement + combo + attack lifecycle)
//! - HeadlessAnimator (presentation stand-in)
//! - HitVolumeState (hit volumes melee атак)

use bevy::prelude::*;

use crate::combat::ActionResolver;
use crate::config::{CharacterConfig, SetupError};
use crate::logger::{log_error, log_info, log_warning};
use crate::presentation::{HeadlessAnimator, HitVolumeState};

/// Маркер персонажа
#[derive(Component, Debug, Clone, PartialEq, Eq)]
pub struct Character {
    pub name: String,
}

#[derive(Bundle)]
pub struct CharacterBundle {
    pub character: Character,
    pub resolver: ActionResolver,
    pub animator: HeadlessAnimator,
    pub volumes: HitVolumeState,
}

impl CharacterBundle {
    /// Собирает персонажа: setup ошибки (probe'ы, combo коллизии) всплывают здесь, до первого тика
    pub fn new(name: &str, config: CharacterConfig, position: Vec2) -> Result<Self, SetupError> {
        // Слой атак может быть > 1 - animator создаёт слои до него включительно
        for attack_id in config.attacks_without_clips() {
            log_warning(&format!(
                "⚠️ Character '{}': attack '{}' has no headless clip length, it will never finish",
                name, attack_id
            ));
        }

        let mut animator = HeadlessAnimator::new(config.attack_layer + 1);
        for (state, &frames) in &config.headless_clips {
            animator.set_clip(state, frames);
        }

        let mut resolver = ActionResolver::new(config)?;
        resolver.movement_mut().set_position(position);

        Ok(Self {
            character: Character { name: name.to_owned() },
            resolver,
            animator,
            volumes: HitVolumeState::default(),
        })
    }
}

/// Spawn персонажа через Commands (из систем / startup)
pub fn spawn_character(
    commands: &mut Commands,
    name: &str,
    config: CharacterConfig,
    position: Vec2,
) -> Result<Entity, SetupError> {
    let bundle = CharacterBundle::new(name, config, position).inspect_err(|e| {
        log_error(&format!("❌ Character '{}' setup failed: {}", name, e));
    })?;

    let attack_count = bundle.resolver.combos().definitions().len();
    let entity = commands.spawn(bundle).id();
    log_info(&format!(
        "🧍 Spawned '{}' {:?} at {:?} ({} attacks)",
        name, entity, position, attack_count
    ));
    Ok(entity)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::movement::GroundProbeConfig;

    #[test]
    fn test_bundle_applies_config() {
        let config = CharacterConfig::swordsman();
        let bundle = CharacterBundle::new("hero", config, Vec2::new(3.0, 0.5)).unwrap();

        assert_eq!(bundle.character.name, "hero");
        assert_eq!(bundle.resolver.movement().runtime().position, Vec2::new(3.0, 0.5));
        assert_eq!(bundle.animator.layer_count(), 2);
        assert!(bundle.resolver.combos().definition("finisher").is_some());
    }

    #[test]
    fn test_bundle_setup_error() {
        let config = CharacterConfig {
            ground: GroundProbeConfig {
                offsets: Vec::new(),
                ..GroundProbeConfig::default()
            },
            ..CharacterConfig::default()
        };

        assert!(matches!(
            CharacterBundle::new("broken", config, Vec2::ZERO),
            Err(SetupError::MissingGroundProbes)
        ));
    }

    #[test]
    fn test_spawn_character_with_commands() {
        let mut world = World::new();
        let entity = {
            let mut queue = bevy::ecs::world::CommandQueue::default();
            let mut commands = Commands::new(&mut queue, &world);
            let entity = spawn_character(&mut commands, "hero", CharacterConfig::swordsman(), Vec2::ZERO).unwrap();
            queue.apply(&mut world);
            entity
        };

        assert!(world.get::<Character>(entity).is_some());
        assert!(world.get::<ActionResolver>(entity).is_some());
        assert!(world.get::<HitVolumeState>(entity).is_some());
    }
}
