//! Physics module
//!
//! Core НЕ физический движок: grounding и коллизии приходят через `GroundProbe`.
//! Здесь только headless реализация probe сервиса (платформы на слоях).

pub mod platforms;

// Re-export основных типов
pub use platforms::{Platform, PlatformGeometry};
