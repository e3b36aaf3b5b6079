//! Fleet construction and hit scanning for one participant.

use core::str::FromStr;

use crate::common::{AttackOutcome, GameError};
use crate::config::{NUM_VESSELS, VESSEL_LENGTHS};
use crate::grid::Grid;
use crate::vessel::Vessel;

/// Compass direction a vessel extends in from its starting coordinate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    North,
    South,
    East,
    West,
}

impl Direction {
    /// Unit vector as a (row, col) step.
    pub fn step(&self) -> (i32, i32) {
        match self {
            Direction::North => (-1, 0),
            Direction::South => (1, 0),
            Direction::East => (0, 1),
            Direction::West => (0, -1),
        }
    }
}

impl FromStr for Direction {
    type Err = GameError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "north" | "up" => Ok(Direction::North),
            "south" | "down" => Ok(Direction::South),
            "east" | "right" => Ok(Direction::East),
            "west" | "left" => Ok(Direction::West),
            _ => Err(GameError::UnknownDirection(s.to_string())),
        }
    }
}

/// The complete set of vessels owned by one participant, built in strictly
/// ascending length order.
#[derive(Debug, Clone)]
pub struct Fleet {
    vessels: Vec<Vessel>,
    vessel_mark: char,
}

impl Fleet {
    pub fn new(vessel_mark: char) -> Self {
        Fleet {
            vessels: Vec::with_capacity(NUM_VESSELS),
            vessel_mark,
        }
    }

    pub fn vessels(&self) -> &[Vessel] {
        &self.vessels
    }

    /// The length the next built vessel must have, or `None` when complete.
    pub fn expected_length(&self) -> Option<usize> {
        VESSEL_LENGTHS.get(self.vessels.len()).copied()
    }

    pub fn is_complete(&self) -> bool {
        self.vessels.len() == NUM_VESSELS
    }

    /// True while at least one vessel is afloat. A fleet with no vessels has
    /// none afloat.
    pub fn any_afloat(&self) -> bool {
        self.vessels.iter().any(Vessel::is_afloat)
    }

    /// Build the next vessel starting at (`row`, `col`) and extending
    /// `length` cells in `direction`. Rejects atomically, without marking
    /// anything, if the direction is unknown, the length is out of order, or
    /// any cell is out of bounds or already covered by this fleet.
    ///
    /// Only exact-cell overlap is checked; adjacent vessels are allowed.
    pub fn build_vessel(
        &mut self,
        grid: &mut Grid,
        row: i32,
        col: i32,
        length: usize,
        direction: &str,
    ) -> Result<(), GameError> {
        let direction: Direction = direction.parse()?;
        match self.expected_length() {
            None => return Err(GameError::FleetComplete),
            Some(expected) if expected != length => {
                return Err(GameError::WrongLength {
                    requested: length,
                    expected,
                })
            }
            Some(_) => {}
        }

        let (row_step, col_step) = direction.step();
        let mut cells = Vec::with_capacity(length);
        let (mut r, mut c) = (row, col);
        for _ in 0..length {
            if !grid.contains(r, c) {
                return Err(GameError::OutOfBounds { row: r, col: c });
            }
            if self.vessels.iter().any(|v| v.occupies(r, c)) {
                return Err(GameError::Occupied { row: r, col: c });
            }
            cells.push((r, c));
            r += row_step;
            c += col_step;
        }

        for &(r, c) in &cells {
            grid.set_mark(r, c, self.vessel_mark)?;
        }
        self.vessels.push(Vessel::new(cells));
        Ok(())
    }

    /// Scan vessels in placement order and credit the first afloat vessel
    /// covering the target with a hit; otherwise mark a miss. The coordinate
    /// must already be bounds-checked. A sunk vessel no longer matches, so an
    /// attack on its cells reads as a miss.
    pub fn check_hit(
        &mut self,
        grid: &mut Grid,
        row: i32,
        col: i32,
        hit_mark: char,
    ) -> Result<AttackOutcome, GameError> {
        for vessel in &mut self.vessels {
            if vessel.is_afloat() && vessel.occupies(row, col) {
                grid.set_mark(row, col, hit_mark)?;
                if vessel.take_hit() {
                    return Ok(AttackOutcome::Sunk(vessel.name()));
                }
                return Ok(AttackOutcome::Hit);
            }
        }
        grid.set_mark(row, col, crate::config::MISS_MARK)?;
        Ok(AttackOutcome::Miss)
    }
}
