//! Action integration test
//!
//! Headless App + SimulationPlugin, персонаж управляется только через ActionInput события.
//!
//! Проверяем:
//! - Падение/приземление, ходьба, one-way платформы через ECS системы
//! - Атака блокирует движение до конца анимации
//! - Combo цепочка и hit volumes через события

use bevy::prelude::*;
use swordline_simulation::*;
use swordline_simulation::movement::GroundProbeConfig;
use swordline_simulation::presentation::AnimParam;

/// Helper: spawn персонажа напрямую в World
fn spawn(app: &mut App, config: CharacterConfig, position: Vec2) -> Entity {
    let bundle = CharacterBundle::new("test", config, position).unwrap();
    app.world_mut().spawn(bundle).id()
}

/// Helper: один fixed tick с вводом
fn tick(app: &mut App, input: ActionInput) {
    app.world_mut().send_event(input);
    app.world_mut().run_schedule(FixedUpdate);
}

fn idle_ticks(app: &mut App, entity: Entity, count: usize) {
    for _ in 0..count {
        tick(app, ActionInput::idle(entity));
    }
}

fn resolver(app: &App, entity: Entity) -> &ActionResolver {
    app.world().get::<ActionResolver>(entity).unwrap()
}

fn started_ids(app: &App) -> Vec<String> {
    app.world()
        .resource::<Events<AttackStarted>>()
        .iter_current_update_events()
        .map(|e| e.attack_id.clone())
        .collect()
}

fn jab_config(clip: u32) -> CharacterConfig {
    CharacterConfig::default()
        .with_attacks(vec![
            AttackDefinition::new("jab").bind(PositionState::Neutral, &[AttackDirection::Neutral])
        ])
        .with_clip("jab", clip)
}

#[test]
fn test_character_falls_and_lands() {
    let mut app = create_headless_app();
    let hero = spawn(&mut app, CharacterConfig::default(), Vec2::new(0.0, 3.0));

    idle_ticks(&mut app, hero, 10);
    assert!(!resolver(&app, hero).movement().runtime().grounded);
    assert_eq!(resolver(&app, hero).position_state(), PositionState::Air);

    idle_ticks(&mut app, hero, 120);
    let runtime = *resolver(&app, hero).movement().runtime();
    assert!(runtime.grounded);
    assert!(!runtime.falling);
    assert!(runtime.position.y > 0.3 && runtime.position.y <= 0.56, "y = {}", runtime.position.y);
    assert_eq!(resolver(&app, hero).position_state(), PositionState::Neutral);

    let animator = app.world().get::<HeadlessAnimator>(hero).unwrap();
    assert!(animator.param(AnimParam::Grounded));
    assert!(!animator.param(AnimParam::Fall));
}

#[test]
fn test_walk_through_input_events() {
    let mut app = create_headless_app();
    let hero = spawn(&mut app, CharacterConfig::default(), Vec2::new(0.0, 0.5));

    for _ in 0..30 {
        tick(&mut app, ActionInput::idle(hero).with_axis(-1.0, 0.0));
    }

    let runtime = *resolver(&app, hero).movement().runtime();
    assert!((runtime.velocity.x + 1.0).abs() < 1e-4, "vx = {}", runtime.velocity.x);
    assert!(runtime.position.x < -0.3);
    assert_eq!(runtime.facing, movement::Facing::Left);
    assert!(app.world().get::<HeadlessAnimator>(hero).unwrap().param(AnimParam::Walk));
}

#[test]
fn test_attack_blocks_movement_until_animation_ends() {
    let mut app = create_headless_app();
    let hero = spawn(&mut app, jab_config(6), Vec2::new(0.0, 0.5));

    idle_ticks(&mut app, hero, 2);
    tick(&mut app, ActionInput::idle(hero).with_attack());
    assert_eq!(started_ids(&app), vec!["jab".to_owned()]);
    assert!(resolver(&app, hero).blockers().contains("jab"));

    // Держим ось: атака не даёт двигаться (jab = 6 кадров, 5 тиков после старта)
    for _ in 0..5 {
        tick(&mut app, ActionInput::idle(hero).with_axis(1.0, 0.0));
        assert_eq!(resolver(&app, hero).movement().runtime().velocity.x, 0.0);
        assert_eq!(resolver(&app, hero).active_attack_id(), Some("jab"));
    }

    tick(&mut app, ActionInput::idle(hero).with_axis(1.0, 0.0));
    let finished: Vec<_> = app
        .world()
        .resource::<Events<AttackFinished>>()
        .iter_current_update_events()
        .map(|e| (e.entity, e.attack_id.clone()))
        .collect();
    assert_eq!(finished, vec![(hero, "jab".to_owned())]);
    assert!(resolver(&app, hero).blockers().is_empty());

    // Drive ставится в gameplay set, разгон начнётся physics step'ом следующего тика
    tick(&mut app, ActionInput::idle(hero).with_axis(1.0, 0.0));
    assert_eq!(resolver(&app, hero).movement().drive(), 1.0);
    tick(&mut app, ActionInput::idle(hero).with_axis(1.0, 0.0));
    assert!(resolver(&app, hero).movement().runtime().velocity.x > 0.0);
}

#[test]
fn test_swordsman_ground_combo_chain() {
    let mut app = create_headless_app();
    let hero = spawn(&mut app, CharacterConfig::swordsman(), Vec2::new(0.0, 0.5));

    // jab cancel_frame = 8, slash cancel_frame = 10
    let presses = [0, 9, 20];
    for t in 0..40 {
        let input = ActionInput::idle(hero);
        let input = if presses.contains(&t) { input.with_attack() } else { input };
        tick(&mut app, input);
    }

    assert_eq!(started_ids(&app), vec!["jab", "slash", "finisher"]);

    let replaced: Vec<_> = app
        .world()
        .resource::<Events<AttackStarted>>()
        .iter_current_update_events()
        .map(|e| e.replaced.clone())
        .collect();
    assert_eq!(replaced, vec![None, Some("jab".to_owned()), Some("slash".to_owned())]);

    // Ровно один токен за всю цепочку
    assert_eq!(resolver(&app, hero).blockers().len(), 1);
    assert_eq!(resolver(&app, hero).active_attack_id(), Some("finisher"));
}

#[test]
fn test_early_press_is_rejected() {
    let mut app = create_headless_app();
    let hero = spawn(&mut app, CharacterConfig::swordsman(), Vec2::new(0.0, 0.5));

    tick(&mut app, ActionInput::idle(hero).with_attack());
    idle_ticks(&mut app, hero, 3);
    // Кадр 3 < cancel_frame 8
    tick(&mut app, ActionInput::idle(hero).with_attack());

    assert_eq!(started_ids(&app), vec!["jab"]);
    assert_eq!(resolver(&app, hero).active_attack_id(), Some("jab"));
}

#[test]
fn test_melee_hit_volume_events() {
    let mut app = create_headless_app();
    let hero = spawn(&mut app, CharacterConfig::swordsman(), Vec2::new(0.0, 0.5));

    // jab: blade_near с кадра 3, клип 12 кадров
    tick(&mut app, ActionInput::idle(hero).with_attack());
    idle_ticks(&mut app, hero, 20);

    let toggles: Vec<_> = app
        .world()
        .resource::<Events<HitVolumeToggled>>()
        .iter_current_update_events()
        .map(|e| (e.entity, e.volume.clone(), e.active))
        .collect();
    assert_eq!(
        toggles,
        vec![
            (hero, "blade_near".to_owned(), true),
            (hero, "blade_near".to_owned(), false),
        ]
    );
    assert!(!resolver(&app, hero).attack().is_active());
}

#[test]
fn test_air_attack_does_not_block_movement() {
    let mut app = create_headless_app();
    let hero = spawn(&mut app, CharacterConfig::swordsman(), Vec2::new(0.0, 0.5));

    idle_ticks(&mut app, hero, 2);
    tick(&mut app, ActionInput::idle(hero).with_jump());
    idle_ticks(&mut app, hero, 5);
    assert_eq!(resolver(&app, hero).position_state(), PositionState::Air);

    tick(&mut app, ActionInput::idle(hero).with_axis(0.5, 0.0).with_attack());
    assert_eq!(started_ids(&app), vec!["air_slash"]);
    assert!(resolver(&app, hero).blockers().is_empty());
}

#[test]
fn test_one_way_platform_through_ecs() {
    let mut app = create_headless_app();
    let mut geometry = PlatformGeometry::flat_floor();
    geometry.add(Platform::new(-2.0, 2.0, 1.5, 5));
    app.world_mut().insert_resource(geometry);

    let config = CharacterConfig {
        ground: GroundProbeConfig {
            pass_through_layers: vec![5],
            ..GroundProbeConfig::default()
        },
        ..CharacterConfig::default()
    };
    let hero = spawn(&mut app, config, Vec2::new(0.0, 3.0));

    idle_ticks(&mut app, hero, 120);

    let runtime = *resolver(&app, hero).movement().runtime();
    assert!(runtime.grounded);
    assert_eq!(runtime.pass_through_layer, Some(5));
    assert!(runtime.position.y > 1.5, "y = {}", runtime.position.y);
    assert!(app.world().resource::<PlatformGeometry>().collides(8, 5));
}

#[test]
fn test_input_for_non_character_is_ignored() {
    let mut app = create_headless_app();
    let hero = spawn(&mut app, jab_config(6), Vec2::new(0.0, 0.5));
    let prop = app.world_mut().spawn_empty().id();

    tick(&mut app, ActionInput::idle(prop).with_attack());
    assert!(started_ids(&app).is_empty());
    assert!(!resolver(&app, hero).attack().is_active());
}

#[test]
fn test_spawn_character_through_commands() {
    let mut app = create_headless_app();
    let hero = spawn_character(
        &mut app.world_mut().commands(),
        "hero",
        CharacterConfig::swordsman(),
        Vec2::new(1.0, 0.5),
    )
    .unwrap();
    app.world_mut().flush();

    assert_eq!(app.world().get::<Character>(hero).map(|c| c.name.as_str()), Some("hero"));
    idle_ticks(&mut app, hero, 1);
    assert!(resolver(&app, hero).movement().runtime().grounded);
}
