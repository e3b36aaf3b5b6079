//! Common types for the rule engine: attack outcomes and game errors.

use core::fmt;

/// Result of an attack on a grid cell.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AttackOutcome {
    /// Attack struck an afloat vessel.
    Hit,
    /// Attack struck open water.
    Miss,
    /// Attack brought a vessel's hit count up to its length, sinking it.
    Sunk(&'static str),
}

impl AttackOutcome {
    pub fn is_hit(&self) -> bool {
        !matches!(self, AttackOutcome::Miss)
    }
}

/// Errors returned by rule-engine operations. All of these reject the
/// request without mutating any grid or fleet state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GameError {
    /// Direction string is not one of north/up, south/down, east/right,
    /// west/left (case-insensitive).
    UnknownDirection(String),
    /// Coordinate falls outside the grid bounds.
    OutOfBounds { row: i32, col: i32 },
    /// Cell is already covered by a vessel in the same fleet.
    Occupied { row: i32, col: i32 },
    /// Vessel lengths must be requested in ascending order.
    WrongLength { requested: usize, expected: usize },
    /// The fleet already holds its full complement of vessels.
    FleetComplete,
    /// Participant slot is not 0 or 1.
    NoSuchSlot(usize),
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GameError::UnknownDirection(dir) => write!(
                f,
                "not a valid direction {:?}: must be north, south, east, west or up, down, left, right",
                dir
            ),
            GameError::OutOfBounds { row, col } => {
                write!(f, "({}, {}) is off the grid", row, col)
            }
            GameError::Occupied { row, col } => {
                write!(f, "({}, {}) is already occupied by a vessel", row, col)
            }
            GameError::WrongLength {
                requested,
                expected,
            } => write!(
                f,
                "vessel of length {} requested, but length {} must be built next",
                requested, expected
            ),
            GameError::FleetComplete => write!(f, "the fleet already has all of its vessels"),
            GameError::NoSuchSlot(slot) => write!(f, "no participant in slot {}", slot),
        }
    }
}

impl std::error::Error for GameError {}
