//! A single vessel: a fixed run of grid coordinates that accumulates hits.

use crate::config::vessel_name;

/// An ordered run of grid coordinates with a hit count and an afloat flag.
/// The afloat flag flips to false exactly when the hit count reaches the
/// vessel's length.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Vessel {
    cells: Vec<(i32, i32)>,
    hits: usize,
    afloat: bool,
}

impl Vessel {
    pub fn new(cells: Vec<(i32, i32)>) -> Self {
        debug_assert!(!cells.is_empty());
        Vessel {
            cells,
            hits: 0,
            afloat: true,
        }
    }

    pub fn length(&self) -> usize {
        self.cells.len()
    }

    pub fn cells(&self) -> &[(i32, i32)] {
        &self.cells
    }

    pub fn hits(&self) -> usize {
        self.hits
    }

    pub fn is_afloat(&self) -> bool {
        self.afloat
    }

    /// Whether the vessel covers the coordinate.
    pub fn occupies(&self, row: i32, col: i32) -> bool {
        self.cells.contains(&(row, col))
    }

    /// The class name for this vessel's length.
    pub fn name(&self) -> &'static str {
        vessel_name(self.length())
    }

    /// Record one hit. Returns true when this hit sinks the vessel.
    ///
    /// There is no idempotence guard: striking an already-hit cell counts
    /// again, so a vessel can sink with unhit cells remaining. The rules
    /// want it that way; tests pin the behavior down.
    pub fn take_hit(&mut self) -> bool {
        self.hits += 1;
        if self.afloat && self.hits == self.length() {
            self.afloat = false;
            return true;
        }
        false
    }
}
