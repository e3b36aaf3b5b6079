mod client;
mod common;
mod config;
mod console;
mod envelope;
mod fleet;
mod game;
mod grid;
mod link;
mod logging;
mod participant;
mod server;
mod session;
mod turn;
mod vessel;
pub mod transport;

pub use client::{run_client, Interface};
pub use common::{AttackOutcome, GameError};
pub use config::*;
pub use console::ConsoleInterface;
pub use envelope::{decode, encode, Envelope, Payload};
pub use fleet::{Direction, Fleet};
pub use game::GameState;
pub use grid::Grid;
pub use link::Link;
pub use logging::init_logging;
pub use participant::Participant;
pub use server::{
    exchange_name, run_datagram_match, run_datagram_server, run_stream_match, run_stream_server,
};
pub use session::{Handler, MatchShared};
pub use transport::datagram::DatagramTransport;
pub use transport::in_memory::InMemoryTransport;
pub use transport::stream::StreamTransport;
pub use transport::Transport;
pub use turn::{MatchPhase, TurnState};
pub use vessel::Vessel;
