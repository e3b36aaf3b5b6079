//! Turn alternation without modulo arithmetic: a `(turn, sign)` pair where
//! the opponent of `turn` is always `turn + sign`.

/// The alternator. Starts at `(0, +1)`; each advance does `turn += sign`
/// then flips the sign, so the active slot bounces between 0 and 1 and
/// `turn + sign` always names the inactive slot.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TurnState {
    turn: i32,
    sign: i32,
}

impl TurnState {
    pub fn new() -> Self {
        TurnState { turn: 0, sign: 1 }
    }

    /// The slot whose handler is active.
    pub fn active(&self) -> usize {
        self.turn as usize
    }

    /// The slot waiting for its turn.
    pub fn opponent(&self) -> usize {
        (self.turn + self.sign) as usize
    }

    pub fn advance(&mut self) {
        self.turn += self.sign;
        self.sign = -self.sign;
    }
}

impl Default for TurnState {
    fn default() -> Self {
        Self::new()
    }
}

/// The match phase published to every handler over a watch channel. A single
/// value carries the alternator, whether the match is still ongoing, and
/// whether a handler has aborted the session, so waiting handlers wake on
/// any of the three.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MatchPhase {
    pub turn: TurnState,
    pub ongoing: bool,
    pub aborted: bool,
}

impl MatchPhase {
    pub fn new() -> Self {
        MatchPhase {
            turn: TurnState::new(),
            ongoing: true,
            aborted: false,
        }
    }
}

impl Default for MatchPhase {
    fn default() -> Self {
        Self::new()
    }
}
