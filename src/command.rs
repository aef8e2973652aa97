//! Command module - Velocity commands, limits and indicator signals

use std::f32::consts::FRAC_PI_2;

// ============================================================================
// VELOCITY COMMAND - Body-frame velocity vector sent every tick
// ============================================================================

#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct VelocityCommand {
    pub linear_x: f32,
    pub linear_y: f32,
    pub linear_z: f32,
    pub angular_x: f32,
    pub angular_y: f32,
    pub angular_z: f32,
}

impl VelocityCommand {
    /// The all-zero command, i.e. hover in place.
    pub fn hover() -> Self {
        Self::default()
    }

    pub fn is_hover(&self) -> bool {
        *self == Self::hover()
    }

    /// Clamp the three controlled fields symmetrically to `limits`.
    pub fn clamped(self, limits: &CommandLimits) -> Self {
        Self {
            linear_x: self.linear_x.clamp(-limits.linear_x, limits.linear_x),
            linear_z: self.linear_z.clamp(-limits.linear_z, limits.linear_z),
            angular_z: self.angular_z.clamp(-limits.angular_z, limits.angular_z),
            ..self
        }
    }
}

// ============================================================================
// COMMAND LIMITS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CommandLimits {
    pub angular_z: f32,
    pub linear_x: f32,
    pub linear_z: f32,
}

impl Default for CommandLimits {
    fn default() -> Self {
        Self {
            angular_z: FRAC_PI_2,
            linear_x: 1.0,
            linear_z: 2.0,
        }
    }
}

// ============================================================================
// INDICATOR SIGNAL - Cosmetic side channel (LED pattern)
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct IndicatorSignal {
    pub pattern: u8,
    pub frequency_hz: u32,
    pub duration_s: u32,
}

impl IndicatorSignal {
    pub const TARGET_ACQUIRED_PATTERN: u8 = 3;
}

impl Default for IndicatorSignal {
    fn default() -> Self {
        Self {
            pattern: Self::TARGET_ACQUIRED_PATTERN,
            frequency_hz: 10,
            duration_s: 1,
        }
    }
}

// ============================================================================
// LOOP MODE
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoopMode {
    /// Exactly one target visible, PID-driven command.
    Tracking,
    /// No target or several targets, zero command.
    Idle,
}

impl std::fmt::Display for LoopMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoopMode::Tracking => write!(f, "Tracking"),
            LoopMode::Idle => write!(f, "Idle"),
        }
    }
}
