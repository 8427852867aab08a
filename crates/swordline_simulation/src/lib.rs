//! SWORDLINE Simulation Core
//!
//! Character Action Resolution Core на Bevy 0.16 (headless ECS)
//!
//! Движок (анимация, физика, input polling) подключается через трейты:
//! - `presentation::AnimationDriver` / `HitVolumeSink`
//! - `movement::GroundProbe`
//! - `input::ActionInput` события
//!
//! Headless stand-ins (HeadlessAnimator, PlatformGeometry) позволяют гонять core без движка.

use bevy::prelude::*;

// Публичные модули
pub mod actor;
pub mod combat;
pub mod config;
pub mod input;
pub mod logger;
pub mod movement;
pub mod physics;
pub mod presentation;

// Re-export базовых типов для удобства
pub use actor::{spawn_character, Character, CharacterBundle};
pub use combat::{
    ActionPlugin, ActionResolver, ActionSet, AttackDefinition, AttackDirection, AttackFinished, AttackStarted,
    AttackTrigger, ComboGraph, ComboGraphError,
};
pub use config::{CancelPolicy, CharacterConfig, SetupError};
pub use input::{classify_direction, ActionInput};
pub use logger::{init_logger, log, log_error, log_info, log_warning, set_log_level, LogLevel};
pub use movement::{MovementBlockers, MovementState, PositionState};
pub use physics::{Platform, PlatformGeometry};
pub use presentation::{AnimationDriver, HeadlessAnimator, HitVolumeSink, HitVolumeState, HitVolumeToggled};

/// Fixed tick симуляции
pub const SIMULATION_HZ: f64 = 60.0;

/// Главный plugin симуляции
pub struct SimulationPlugin;

impl Plugin for SimulationPlugin {
    fn build(&self, app: &mut App) {
        // Fixed timestep 60Hz для simulation tick
        app.insert_resource(Time::<Fixed>::from_hz(SIMULATION_HZ));

        // Уровень по умолчанию - плоский пол (если геометрию не вставили раньше)
        if !app.world().contains_resource::<PlatformGeometry>() {
            app.insert_resource(PlatformGeometry::flat_floor());
        }

        app.add_plugins(ActionPlugin);
    }
}

/// Создаёт minimal Bevy App для headless симуляции
pub fn create_headless_app() -> App {
    let mut app = App::new();
    init_logger();
    app.add_plugins(MinimalPlugins).add_plugins(SimulationPlugin);

    app
}

/// Snapshot персонажей для сравнения детерминизма
///
/// Только наблюдаемое состояние (movement runtime, атака, блокеры, hit volumes), отсортировано по Entity.
pub fn world_snapshot(world: &mut World) -> Vec<u8> {
    let mut snapshot = Vec::new();

    let mut query = world.query::<(Entity, &ActionResolver, &HitVolumeState)>();
    let mut characters: Vec<_> = query.iter(world).collect();

    // Сортируем по Entity ID для детерминизма
    characters.sort_by_key(|(entity, _, _)| entity.index());

    // Сериализуем в байты через Debug (простейший способ)
    for (entity, resolver, volumes) in characters {
        snapshot.extend_from_slice(&entity.index().to_le_bytes());
        let blockers: Vec<&str> = resolver.blockers().iter().collect();
        let active_volumes: Vec<&str> = volumes.active_volumes().collect();
        snapshot.extend_from_slice(
            format!(
                "{:?}|{:?}|{}|{:?}|{:?}",
                resolver.movement().runtime(),
                resolver.active_attack_id(),
                resolver.attack().can_cancel(),
                blockers,
                active_volumes
            )
            .as_bytes(),
        );
    }

    snapshot
}
