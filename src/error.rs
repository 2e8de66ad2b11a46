use thiserror::Error;

use crate::BodyHandle;

/// # Physics Error
///
/// Errors raised by the simulation layer when it is handed input the rigid body core would turn
/// into NaN state.
#[derive(Copy, Clone, Debug, Error, PartialEq)]
pub enum PhysicsError {
    /// Body mass must be finite and greater than zero.
    #[error("invalid mass {0}: expected a finite value greater than zero")]
    InvalidMass(f32),
    /// Simulation tick must be finite and greater than zero.
    #[error("invalid tick {0}: expected a finite duration greater than zero")]
    InvalidTick(f32),
    /// At least one tick must be allowed per update.
    #[error("max ticks per update must be at least 1")]
    InvalidMaxTicks,
    /// A setting is outside of its allowed range.
    #[error("invalid {name} {value}")]
    InvalidSetting {
        /// Name of the setting.
        name: &'static str,
        /// Rejected value.
        value: f32,
    },
    /// Surface normal has zero or non-finite length.
    #[error("surface normal must have a finite, non-zero length")]
    InvalidNormal,
    /// The body is not part of the world.
    #[error("body {0:?} not found")]
    BodyNotFound(BodyHandle),
}
