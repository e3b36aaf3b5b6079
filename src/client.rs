//! Participant-side session loop. The core performs no prompting or text
//! parsing itself: coordinate and placement requests are delegated to an
//! [`Interface`] collaborator, and status text goes out through its
//! `message` sink.

use log::debug;

use crate::envelope::Payload;
use crate::link::Link;

/// The collaborator seam consumed by the client loop.
pub trait Interface {
    /// Ask for a placement for a vessel of `length`: (row, col, direction).
    fn request_placement(&mut self, name: &str, length: usize) -> (i32, i32, String);
    /// Ask for a target coordinate: (row, col).
    fn request_target(&mut self, name: &str) -> (i32, i32);
    /// Show status text to the participant.
    fn message(&mut self, text: &str);
}

/// Join a match as `name` and drive it to completion. The loop is directed
/// entirely by the payload kind of each received envelope, so it works
/// unchanged over the stream and datagram bindings.
pub async fn run_client<I: Interface>(
    mut link: Link,
    name: &str,
    interface: &mut I,
) -> anyhow::Result<()> {
    link.send(Payload::Name(name.to_string())).await?;
    let mut game_over = false;
    loop {
        match link.recv().await? {
            Payload::Welcome { slot } => {
                debug!("joined as slot {}", slot);
                interface.message("Waiting for the match to start...");
            }
            Payload::PlacementRequest { length } => {
                let (row, col, direction) = interface.request_placement(name, length as usize);
                link.send(Payload::Placement {
                    row,
                    col,
                    direction,
                })
                .await?;
            }
            Payload::PlacementOutcome(built) => {
                if built {
                    interface.message("Vessel placed.");
                } else {
                    interface.message("Not a valid position and or direction!");
                }
            }
            Payload::Playing(true) => interface.message("Your turn."),
            Payload::Playing(false) => game_over = true,
            Payload::BoardView { caption, rendered } => {
                interface.message(&caption);
                interface.message(&rendered);
            }
            Payload::TargetRequest => {
                let (row, col) = interface.request_target(name);
                link.send(Payload::Target { row, col }).await?;
            }
            Payload::ShotOutcome { hit, sunk } => {
                interface.message(if hit { "Hit!" } else { "Miss!" });
                if let Some(vessel) = sunk {
                    interface.message(&format!("You sank my {}!", vessel));
                }
            }
            Payload::Winner(winner) => {
                interface.message(&format!("{} has won!", winner));
                if game_over {
                    break;
                }
            }
            Payload::Info(text) => {
                interface.message(&text);
                if game_over {
                    break;
                }
            }
            other => anyhow::bail!("unexpected payload from server: {:?}", other),
        }
    }
    Ok(())
}
