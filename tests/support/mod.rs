#![allow(dead_code)]

use armada::Interface;

/// A deterministic participant for end-to-end tests: plays placements from a
/// script and targets every cell in row-major order, recording everything the
/// session tells it.
pub struct ScriptedPlayer {
    placements: Vec<(i32, i32, String)>,
    next_placement: usize,
    next_target: usize,
    pub messages: Vec<String>,
}

impl ScriptedPlayer {
    pub fn new(placements: &[(i32, i32, &str)]) -> Self {
        ScriptedPlayer {
            placements: placements
                .iter()
                .map(|&(r, c, d)| (r, c, d.to_string()))
                .collect(),
            next_placement: 0,
            next_target: 0,
            messages: Vec::new(),
        }
    }

    /// Four legal placements in the top rows, lengths 2,3,4,5.
    pub fn standard() -> Self {
        Self::new(&[
            (0, 0, "east"),
            (1, 0, "east"),
            (2, 0, "east"),
            (3, 0, "east"),
        ])
    }

    /// Same as `standard`, but the first proposal runs off the grid and must
    /// be rejected and retried.
    pub fn with_bad_first_placement() -> Self {
        Self::new(&[
            (9, 9, "east"),
            (0, 0, "east"),
            (1, 0, "east"),
            (2, 0, "east"),
            (3, 0, "east"),
        ])
    }

    pub fn saw(&self, needle: &str) -> bool {
        self.messages.iter().any(|m| m.contains(needle))
    }
}

impl Interface for ScriptedPlayer {
    fn request_placement(&mut self, _name: &str, _length: usize) -> (i32, i32, String) {
        let placement = self.placements[self.next_placement].clone();
        self.next_placement += 1;
        placement
    }

    fn request_target(&mut self, _name: &str) -> (i32, i32) {
        let idx = self.next_target as i32;
        self.next_target += 1;
        (idx / 10, idx % 10)
    }

    fn message(&mut self, text: &str) {
        self.messages.push(text.to_string());
    }
}
