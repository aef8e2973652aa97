//! Controller module - Axis PID, follow law and the tick orchestrator

pub mod control_loop;
pub mod follow;
pub mod pid;

// ============================================================================
// AXIS - One independently controlled degree of freedom
// ============================================================================

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Axis {
    /// Horizontal pixel offset, drives yaw rate.
    Horizontal,
    /// Vertical pixel offset, drives climb rate.
    Vertical,
    /// Marker distance, drives forward speed.
    Depth,
}

impl Axis {
    pub const ALL: [Axis; 3] = [Axis::Horizontal, Axis::Vertical, Axis::Depth];
}

impl std::fmt::Display for Axis {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Axis::Horizontal => write!(f, "Horizontal"),
            Axis::Vertical => write!(f, "Vertical"),
            Axis::Depth => write!(f, "Depth"),
        }
    }
}
