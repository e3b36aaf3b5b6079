//! The rule engine: two (grid, fleet) pairs and the operations the session
//! layer arbitrates between them.

use crate::common::{AttackOutcome, GameError};
use crate::config::{GRID_MAX_COL, GRID_MAX_ROW, GRID_MIN_COL, GRID_MIN_ROW};
use crate::fleet::Fleet;
use crate::grid::Grid;

#[derive(Debug, Clone)]
struct Side {
    grid: Grid,
    fleet: Fleet,
}

/// Match state for both participants, indexed by slot 0/1.
#[derive(Debug, Clone)]
pub struct GameState {
    sides: [Side; 2],
}

impl GameState {
    /// Create fresh state with the two participants' vessel marks.
    pub fn new(vessel_marks: [char; 2]) -> Self {
        let side = |mark: char| Side {
            grid: Grid::new(GRID_MIN_ROW, GRID_MIN_COL, GRID_MAX_ROW, GRID_MAX_COL, mark),
            fleet: Fleet::new(mark),
        };
        GameState {
            sides: [side(vessel_marks[0]), side(vessel_marks[1])],
        }
    }

    fn side(&self, slot: usize) -> Result<&Side, GameError> {
        self.sides.get(slot).ok_or(GameError::NoSuchSlot(slot))
    }

    /// Build the next vessel for `slot`'s fleet. See [`Fleet::build_vessel`].
    pub fn build_vessel(
        &mut self,
        slot: usize,
        row: i32,
        col: i32,
        length: usize,
        direction: &str,
    ) -> Result<(), GameError> {
        let side = self
            .sides
            .get_mut(slot)
            .ok_or(GameError::NoSuchSlot(slot))?;
        side.fleet
            .build_vessel(&mut side.grid, row, col, length, direction)
    }

    /// Attack a cell on `target_slot`'s grid with the attacker's hit mark.
    /// Out-of-bounds targets are rejected before anything is mutated.
    pub fn attack(
        &mut self,
        target_slot: usize,
        row: i32,
        col: i32,
        hit_mark: char,
    ) -> Result<AttackOutcome, GameError> {
        let side = self
            .sides
            .get_mut(target_slot)
            .ok_or(GameError::NoSuchSlot(target_slot))?;
        if !side.grid.contains(row, col) {
            return Err(GameError::OutOfBounds { row, col });
        }
        side.fleet.check_hit(&mut side.grid, row, col, hit_mark)
    }

    /// True while both fleets have at least one afloat vessel.
    pub fn match_ongoing(&self) -> bool {
        self.sides.iter().all(|s| s.fleet.any_afloat())
    }

    /// The slot whose fleet still has an afloat vessel. If both fleets were
    /// somehow fully sunk (a single attack cannot produce this), slot 1 is
    /// reported: only slot 0's fleet decides.
    pub fn winner(&self) -> usize {
        if self.sides[0].fleet.any_afloat() {
            0
        } else {
            1
        }
    }

    /// Whether `slot` has built its full complement of vessels.
    pub fn setup_complete(&self, slot: usize) -> Result<bool, GameError> {
        Ok(self.side(slot)?.fleet.is_complete())
    }

    /// Render `slot`'s grid, optionally withholding vessel marks.
    pub fn render_grid(&self, slot: usize, show_vessels: bool) -> Result<String, GameError> {
        Ok(self.side(slot)?.grid.render(show_vessels))
    }

    /// The fleet in `slot`, for inspection.
    pub fn fleet(&self, slot: usize) -> Result<&Fleet, GameError> {
        Ok(&self.side(slot)?.fleet)
    }

    /// The grid in `slot`, for inspection.
    pub fn grid(&self, slot: usize) -> Result<&Grid, GameError> {
        Ok(&self.side(slot)?.grid)
    }
}
