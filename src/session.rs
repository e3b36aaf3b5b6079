//! Per-participant session handlers and the shared turn arbitration state.
//!
//! The turn counter and readiness flags live behind `tokio::sync::watch`
//! channels: only the active handler advances the alternator, and everyone
//! else blocks on a channel wait instead of spinning. `turn + sign` is
//! always the inactive slot.

use std::sync::Arc;

use log::{info, warn};
use tokio::sync::{watch, Mutex};
use tokio::time::{timeout, Duration};

use crate::common::AttackOutcome;
use crate::config::{SETUP_WAIT, VESSEL_LENGTHS};
use crate::envelope::Payload;
use crate::game::GameState;
use crate::link::Link;
use crate::participant::Participant;
use crate::turn::{MatchPhase, TurnState};

/// State shared by the two handler tasks of one match.
pub struct MatchShared {
    participants: [Participant; 2],
    game: Mutex<GameState>,
    phase_tx: watch::Sender<MatchPhase>,
    ready_tx: watch::Sender<[bool; 2]>,
}

impl MatchShared {
    pub fn new(participants: [Participant; 2]) -> Arc<Self> {
        let game = GameState::new([participants[0].vessel_mark, participants[1].vessel_mark]);
        let (phase_tx, _) = watch::channel(MatchPhase::new());
        let (ready_tx, _) = watch::channel([false; 2]);
        Arc::new(MatchShared {
            participants,
            game: Mutex::new(game),
            phase_tx,
            ready_tx,
        })
    }

    pub fn participant(&self, slot: usize) -> &Participant {
        &self.participants[slot]
    }

    pub fn game(&self) -> &Mutex<GameState> {
        &self.game
    }

    /// The phase as currently published.
    pub fn phase(&self) -> MatchPhase {
        *self.phase_tx.borrow()
    }

    fn subscribe_phase(&self) -> watch::Receiver<MatchPhase> {
        self.phase_tx.subscribe()
    }

    fn subscribe_ready(&self) -> watch::Receiver<[bool; 2]> {
        self.ready_tx.subscribe()
    }

    fn mark_ready(&self, slot: usize) {
        self.ready_tx.send_modify(|flags| flags[slot] = true);
    }

    /// Advance the alternator and publish whether the match continues. Only
    /// the active handler calls this, once per turn.
    fn advance_turn(&self, ongoing: bool) {
        self.phase_tx.send_modify(|phase| {
            phase.turn.advance();
            phase.ongoing = ongoing;
        });
    }

    /// Mark the session aborted, waking any handler blocked on the phase.
    pub fn abort(&self) {
        self.phase_tx.send_modify(|phase| phase.aborted = true);
    }
}

/// Drives one participant from fleet setup through game over.
pub struct Handler {
    slot: usize,
    link: Link,
    shared: Arc<MatchShared>,
    setup_wait: Duration,
}

impl Handler {
    pub fn new(slot: usize, link: Link, shared: Arc<MatchShared>) -> Self {
        Handler {
            slot,
            link,
            shared,
            setup_wait: SETUP_WAIT,
        }
    }

    /// Override the bounded wait for the peer's fleet setup.
    pub fn with_setup_wait(mut self, setup_wait: Duration) -> Self {
        self.setup_wait = setup_wait;
        self
    }

    /// Run the handler to completion. Any failure (transport loss, malformed
    /// frame, protocol violation) aborts the session so the peer's handler
    /// can notify its participant instead of stalling forever.
    pub async fn run(mut self) -> anyhow::Result<()> {
        match self.drive().await {
            Ok(()) => Ok(()),
            Err(e) => {
                warn!("handler for slot {} failed: {:#}", self.slot, e);
                self.shared.abort();
                Err(e)
            }
        }
    }

    async fn drive(&mut self) -> anyhow::Result<()> {
        self.fleet_setup().await?;
        self.await_peer_setup().await;
        let aborted = self.turn_loop().await?;
        self.link.send(Payload::Playing(false)).await?;
        if aborted {
            self.link
                .send(Payload::Info(
                    "the match was aborted: opponent unavailable".to_string(),
                ))
                .await?;
        } else {
            let winner = {
                let game = self.shared.game.lock().await;
                self.shared.participant(game.winner()).name.clone()
            };
            self.link.send(Payload::Winner(winner)).await?;
        }
        Ok(())
    }

    /// FLEET_SETUP: request vessels one at a time in ascending length order,
    /// validating each against the rule engine and letting the participant
    /// retry rejected placements.
    async fn fleet_setup(&mut self) -> anyhow::Result<()> {
        for &length in VESSEL_LENGTHS.iter() {
            loop {
                self.link
                    .send(Payload::PlacementRequest {
                        length: length as u8,
                    })
                    .await?;
                let (row, col, direction) = match self.link.recv().await? {
                    Payload::Placement {
                        row,
                        col,
                        direction,
                    } => (row, col, direction),
                    other => anyhow::bail!("expected a placement, got {:?}", other),
                };
                let result = {
                    let mut game = self.shared.game.lock().await;
                    game.build_vessel(self.slot, row, col, length, &direction)
                };
                match result {
                    Ok(()) => {
                        self.link.send(Payload::PlacementOutcome(true)).await?;
                        break;
                    }
                    Err(e) => {
                        info!("slot {} placement rejected: {}", self.slot, e);
                        self.link.send(Payload::PlacementOutcome(false)).await?;
                    }
                }
            }
        }
        info!("slot {} fleet setup complete", self.slot);
        Ok(())
    }

    /// AWAIT_PEER_SETUP: publish our readiness and wait, bounded, for the
    /// peer's. On timeout the match starts anyway with the shortfall logged.
    async fn await_peer_setup(&mut self) {
        self.shared.mark_ready(self.slot);
        let mut ready_rx = self.shared.subscribe_ready();
        let all_ready = ready_rx.wait_for(|flags| flags.iter().all(|&f| f));
        match timeout(self.setup_wait, all_ready).await {
            Ok(Ok(_)) => {}
            Ok(Err(_)) => warn!("slot {}: readiness channel closed", self.slot),
            Err(_) => warn!(
                "slot {}: peer not ready after {:?}, starting with incomplete setup",
                self.slot, self.setup_wait
            ),
        };
    }

    /// TURN_LOOP: block until this slot is active, the match ends, or the
    /// session aborts. Returns true if the loop ended because of an abort.
    async fn turn_loop(&mut self) -> anyhow::Result<bool> {
        let mut phase_rx = self.shared.subscribe_phase();
        loop {
            let phase = *phase_rx
                .wait_for(|p| p.aborted || !p.ongoing || p.turn.active() == self.slot)
                .await
                .map_err(|_| anyhow::anyhow!("phase channel closed"))?;
            if phase.aborted {
                return Ok(true);
            }
            if !phase.ongoing {
                return Ok(false);
            }
            self.take_turn(phase.turn).await?;
        }
    }

    /// One active turn: announce, show both boards, take a target, apply the
    /// attack, report, and hand the turn over.
    async fn take_turn(&mut self, turn: TurnState) -> anyhow::Result<()> {
        let opponent = turn.opponent();
        self.link.send(Payload::Playing(true)).await?;

        let (own, theirs) = {
            let game = self.shared.game.lock().await;
            (
                game.render_grid(self.slot, true)?,
                game.render_grid(opponent, false)?,
            )
        };
        self.link
            .send(Payload::BoardView {
                caption: "Your ocean:".to_string(),
                rendered: own,
            })
            .await?;
        self.link
            .send(Payload::BoardView {
                caption: "Your guesses:".to_string(),
                rendered: theirs,
            })
            .await?;

        let hit_mark = self.shared.participant(self.slot).hit_mark;
        let outcome = loop {
            self.link.send(Payload::TargetRequest).await?;
            let (row, col) = match self.link.recv().await? {
                Payload::Target { row, col } => (row, col),
                other => anyhow::bail!("expected a target, got {:?}", other),
            };
            let result = {
                let mut game = self.shared.game.lock().await;
                game.attack(opponent, row, col, hit_mark)
            };
            match result {
                Ok(outcome) => break outcome,
                Err(e) => {
                    info!("slot {} target rejected: {}", self.slot, e);
                    self.link.send(Payload::Info(e.to_string())).await?;
                }
            }
        };

        self.link
            .send(Payload::ShotOutcome {
                hit: outcome.is_hit(),
                sunk: match outcome {
                    AttackOutcome::Sunk(name) => Some(name.to_string()),
                    _ => None,
                },
            })
            .await?;

        let (updated, ongoing) = {
            let game = self.shared.game.lock().await;
            (game.render_grid(opponent, false)?, game.match_ongoing())
        };
        self.link
            .send(Payload::BoardView {
                caption: "Your guesses:".to_string(),
                rendered: updated,
            })
            .await?;

        self.shared.advance_turn(ongoing);
        Ok(())
    }
}
