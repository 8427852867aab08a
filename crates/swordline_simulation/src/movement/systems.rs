//! Movement systems
//!
//! Physics set: ground check → physics step (строго до gameplay логики тика).
//! Gameplay set: animation флаги.

use bevy::prelude::*;

use crate::combat::ActionResolver;
use crate::physics::PlatformGeometry;
use crate::presentation::HeadlessAnimator;

/// Система: ground check + фильтры one-way платформ
///
/// Единственная система, которая мутирует PlatformGeometry (layer collision table).
pub fn ground_check(mut geometry: ResMut<PlatformGeometry>, mut characters: Query<&mut ActionResolver>) {
    for mut resolver in characters.iter_mut() {
        resolver.ground_check(&mut *geometry);
    }
}

/// Система: силы, прыжок, гравитация, интеграция позиции
///
/// dt = fixed timestep (не delta - при ручном запуске FixedUpdate в тестах delta = 0).
pub fn physics_step(
    time: Res<Time<Fixed>>,
    mut characters: Query<(&mut ActionResolver, &mut HeadlessAnimator)>,
) {
    let dt = time.timestep().as_secs_f32();

    for (mut resolver, mut animator) in characters.iter_mut() {
        resolver.physics_step(&mut *animator, dt);
    }
}

/// Система: Grounded/Jump/Fall/Walk/Dash параметры animator'а
pub fn update_animation_flags(mut characters: Query<(&mut ActionResolver, &mut HeadlessAnimator)>) {
    for (mut resolver, mut animator) in characters.iter_mut() {
        resolver.update_animation_flags(&mut *animator);
    }
}
