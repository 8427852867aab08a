//! Headless симуляция SWORDLINE
//!
//! Гоняет одного персонажа по скрипту ввода и логирует timeline атак.
//! `swordline_simulation [character.json]` - без аргумента используется демо-мечник.

use std::process::ExitCode;

use bevy::prelude::*;
use swordline_simulation::*;

const TICK_COUNT: u32 = 360;

/// Скрипт ввода: тик → ввод персонажа
fn scripted_input(entity: Entity, tick: u32) -> ActionInput {
    let input = ActionInput::idle(entity);
    match tick {
        // Разгон вправо
        0..=29 => input.with_axis(1.0, 0.0),
        // Dash + thrust
        30..=35 => input.with_axis(1.0, 0.0).with_dash(),
        36 => input.with_axis(1.0, 0.0).with_dash().with_attack(),
        // Ground combo: jab → slash → finisher (жмём каждые 10 тиков)
        90 | 100 | 112 => input.with_attack(),
        // Прыжок + air slash
        160 => input.with_jump(),
        170 => input.with_axis(0.5, 0.0).with_attack(),
        // Special
        240 => input.with_special(),
        _ => input,
    }
}

fn main() -> ExitCode {
    let config = match std::env::args().nth(1) {
        Some(path) => match CharacterConfig::from_json_file(&path) {
            Ok(config) => config,
            Err(e) => {
                init_logger();
                log_error(&format!("❌ Failed to load '{}': {}", path, e));
                return ExitCode::FAILURE;
            }
        },
        None => CharacterConfig::swordsman(),
    };

    let mut app = create_headless_app();
    log_info(&format!("Starting SWORDLINE headless simulation ({} ticks)", TICK_COUNT));

    let hero = match spawn_character(&mut app.world_mut().commands(), "hero", config, Vec2::new(0.0, 0.5)) {
        Ok(entity) => entity,
        Err(_) => return ExitCode::FAILURE,
    };
    app.world_mut().flush();

    for tick in 0..TICK_COUNT {
        app.world_mut().send_event(scripted_input(hero, tick));
        app.world_mut().run_schedule(FixedUpdate);

        let world = app.world_mut();
        for started in world.resource_mut::<Events<AttackStarted>>().drain() {
            log_info(&format!("Tick {}: ⚔️ {} (replaced {:?})", tick, started.attack_id, started.replaced));
        }
        for finished in world.resource_mut::<Events<AttackFinished>>().drain() {
            log_info(&format!("Tick {}: ✅ {} finished", tick, finished.attack_id));
        }
        // Входящие события тоже копятся без First schedule
        world.resource_mut::<Events<ActionInput>>().clear();
        world.resource_mut::<Events<HitVolumeToggled>>().clear();

        if tick % 60 == 0 {
            if let Some(resolver) = world.get::<ActionResolver>(hero) {
                let runtime = resolver.movement().runtime();
                log_info(&format!(
                    "Tick {}: pos ({:.2}, {:.2}) vel ({:.2}, {:.2}) {:?}",
                    tick,
                    runtime.position.x,
                    runtime.position.y,
                    runtime.velocity.x,
                    runtime.velocity.y,
                    resolver.position_state()
                ));
            }
        }
    }

    log_info("Simulation complete!");
    ExitCode::SUCCESS
}
