//! Movement domain - locomotion персонажа
//!
//! Содержит:
//! - MovementState (facing, grounded/jumping/falling/dashing, velocity shaping)
//! - MovementBlockers (токены, блокирующие Move/Jump)
//! - GroundProbe контракт + ground check (always ground + one-way слои)
//! - PositionState (Neutral/Dash/Air - ключ combo index)

pub mod blockers;
pub mod ground;
pub mod state;
pub mod systems;


// Re-export основных типов
pub use blockers::MovementBlockers;
pub use ground::{GroundContact, GroundProbe, GroundProbeConfig, LayerMask};
pub use state::{Facing, MovementRuntime, MovementState, MovementTuning, PositionState};
