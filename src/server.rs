//! Match servers: a concurrent stream-transport server with one handler task
//! per participant, and a sequential datagram-transport server.

use std::net::SocketAddr;
use std::sync::Arc;

use log::{error, info, warn};
use tokio::net::{TcpListener, UdpSocket};
use tokio::time::timeout;

use crate::common::AttackOutcome;
use crate::config::{
    CONNECT_TIMEOUT, DATAGRAM_BUFFER, HIT_MARKS, VESSEL_LENGTHS, VESSEL_MARKS,
};
use crate::envelope::{decode, Envelope, Payload};
use crate::game::GameState;
use crate::link::Link;
use crate::participant::Participant;
use crate::session::{Handler, MatchShared};
use crate::transport::datagram::DatagramTransport;
use crate::transport::stream::StreamTransport;
use crate::turn::TurnState;

/// NAME_EXCHANGE over an established link: receive the participant's name,
/// allocate their identity for `slot`, and confirm the slot back to them.
pub async fn exchange_name(link: &mut Link, slot: usize) -> anyhow::Result<Participant> {
    let name = match link.recv().await? {
        Payload::Name(name) => name,
        other => anyhow::bail!("expected a name, got {:?}", other),
    };
    link.send(Payload::Welcome { slot: slot as u8 }).await?;
    info!("participant {:?} joined as slot {}", name, slot);
    Ok(Participant::new(&name, VESSEL_MARKS[slot], HIT_MARKS[slot]))
}

/// Host a match over the stream transport on `bind`.
pub async fn run_stream_server(bind: &str) -> anyhow::Result<()> {
    let listener = TcpListener::bind(bind).await?;
    info!("stream server listening on {}", listener.local_addr()?);
    run_stream_match(listener).await
}

/// Run one match on an already-bound listener. Waits, bounded, for exactly
/// two participants, then runs one handler task per connection over shared
/// arbitration state.
pub async fn run_stream_match(listener: TcpListener) -> anyhow::Result<()> {
    let mut links = Vec::with_capacity(2);
    let mut participants = Vec::with_capacity(2);
    for slot in 0..2 {
        let (socket, addr) = timeout(CONNECT_TIMEOUT, listener.accept())
            .await
            .map_err(|_| anyhow::anyhow!("no participants joined within {:?}", CONNECT_TIMEOUT))??;
        info!("connection from {}", addr);
        let mut link = Link::reliable(Box::new(StreamTransport::new(socket)));
        participants.push(exchange_name(&mut link, slot).await?);
        links.push(link);
    }

    let second = participants.pop().expect("two participants");
    let first = participants.pop().expect("two participants");
    let shared = MatchShared::new([first, second]);

    let second_link = links.pop().expect("two links");
    let first_link = links.pop().expect("two links");
    let task0 = tokio::spawn(Handler::new(0, first_link, shared.clone()).run());
    let task1 = tokio::spawn(Handler::new(1, second_link, shared.clone()).run());

    let (r0, r1) = tokio::join!(task0, task1);
    for (slot, result) in [(0, r0), (1, r1)] {
        match result {
            Ok(Ok(())) => {}
            Ok(Err(e)) => error!("handler {} ended with error: {:#}", slot, e),
            Err(e) => error!("handler {} panicked: {}", slot, e),
        }
    }
    info!("match finished");
    Ok(())
}

/// CONNECTING for the datagram server: wait, bounded, for first datagrams
/// from two distinct peer addresses. Malformed or duplicate join datagrams
/// are discarded rather than ending the server.
async fn gather_datagram_peers(
    socket: &Arc<UdpSocket>,
) -> anyhow::Result<Vec<(SocketAddr, Envelope)>> {
    let mut joined: Vec<(SocketAddr, Envelope)> = Vec::with_capacity(2);
    let mut buf = vec![0u8; DATAGRAM_BUFFER];
    while joined.len() != 2 {
        let (n, from) = timeout(CONNECT_TIMEOUT, socket.recv_from(&mut buf))
            .await
            .map_err(|_| anyhow::anyhow!("no participants joined within {:?}", CONNECT_TIMEOUT))??;
        if joined.iter().any(|(addr, _)| *addr == from) {
            warn!("duplicate join datagram from {}", from);
            continue;
        }
        match decode(&buf[..n]) {
            Ok(env) => joined.push((from, env)),
            Err(e) => warn!("discarding malformed datagram from {}: {}", from, e),
        }
    }
    Ok(joined)
}

/// Host a match over the datagram transport. Sharing one socket between
/// concurrent handlers would need a demultiplexer, so this runs as one
/// sequential task instead: both fleet setups in slot order, then the turn
/// loop, driving whichever link the alternator says is active.
pub async fn run_datagram_server(bind: &str) -> anyhow::Result<()> {
    let socket = UdpSocket::bind(bind).await?;
    info!("datagram server listening on {}", socket.local_addr()?);
    run_datagram_match(socket).await
}

/// Run one match on an already-bound datagram socket. A failure mid-match
/// (malformed frame, unreachable peer) aborts the match; both links get a
/// best-effort abort notice before the error propagates.
pub async fn run_datagram_match(socket: UdpSocket) -> anyhow::Result<()> {
    let socket = Arc::new(socket);
    let joined = gather_datagram_peers(&socket).await?;

    let mut links = Vec::with_capacity(2);
    let mut participants = Vec::with_capacity(2);
    for (slot, (addr, env)) in joined.into_iter().enumerate() {
        let mut link = Link::acked(Box::new(DatagramTransport::new(socket.clone(), addr)));
        link.inject(env);
        participants.push(exchange_name(&mut link, slot).await?);
        links.push(link);
    }

    if let Err(e) = drive_datagram_match(&mut links, &participants).await {
        warn!("match aborted: {:#}", e);
        for link in links.iter_mut() {
            let _ = link.send(Payload::Playing(false)).await;
            let _ = link
                .send(Payload::Info(
                    "the match was aborted: opponent unavailable".to_string(),
                ))
                .await;
        }
        return Err(e);
    }
    Ok(())
}

async fn drive_datagram_match(
    links: &mut [Link],
    participants: &[Participant],
) -> anyhow::Result<()> {
    let mut game = GameState::new([participants[0].vessel_mark, participants[1].vessel_mark]);

    // FLEET_SETUP, one participant at a time.
    for slot in 0..2 {
        fleet_setup_sequential(&mut links[slot], &mut game, slot).await?;
    }

    // TURN_LOOP, sequential: only the active link is serviced.
    let mut turn = TurnState::new();
    while game.match_ongoing() {
        conduct_turn(&mut links[turn.active()], &mut game, participants, turn).await?;
        turn.advance();
    }

    // GAME_OVER for both sides.
    let winner = participants[game.winner()].name.clone();
    for link in links.iter_mut() {
        link.send(Payload::Playing(false)).await?;
        link.send(Payload::Winner(winner.clone())).await?;
    }
    info!("match finished, {} has won", winner);
    Ok(())
}

async fn fleet_setup_sequential(
    link: &mut Link,
    game: &mut GameState,
    slot: usize,
) -> anyhow::Result<()> {
    for &length in VESSEL_LENGTHS.iter() {
        loop {
            link.send(Payload::PlacementRequest {
                length: length as u8,
            })
            .await?;
            let (row, col, direction) = match link.recv().await? {
                Payload::Placement {
                    row,
                    col,
                    direction,
                } => (row, col, direction),
                other => anyhow::bail!("expected a placement, got {:?}", other),
            };
            match game.build_vessel(slot, row, col, length, &direction) {
                Ok(()) => {
                    link.send(Payload::PlacementOutcome(true)).await?;
                    break;
                }
                Err(e) => {
                    info!("slot {} placement rejected: {}", slot, e);
                    link.send(Payload::PlacementOutcome(false)).await?;
                }
            }
        }
    }
    info!("slot {} fleet setup complete", slot);
    Ok(())
}

async fn conduct_turn(
    link: &mut Link,
    game: &mut GameState,
    participants: &[Participant],
    turn: TurnState,
) -> anyhow::Result<()> {
    let active = turn.active();
    let opponent = turn.opponent();

    link.send(Payload::Playing(true)).await?;
    link.send(Payload::BoardView {
        caption: "Your ocean:".to_string(),
        rendered: game.render_grid(active, true)?,
    })
    .await?;
    link.send(Payload::BoardView {
        caption: "Your guesses:".to_string(),
        rendered: game.render_grid(opponent, false)?,
    })
    .await?;

    let outcome = loop {
        link.send(Payload::TargetRequest).await?;
        let (row, col) = match link.recv().await? {
            Payload::Target { row, col } => (row, col),
            other => anyhow::bail!("expected a target, got {:?}", other),
        };
        match game.attack(opponent, row, col, participants[active].hit_mark) {
            Ok(outcome) => break outcome,
            Err(e) => {
                info!("slot {} target rejected: {}", active, e);
                link.send(Payload::Info(e.to_string())).await?;
            }
        }
    };

    link.send(Payload::ShotOutcome {
        hit: outcome.is_hit(),
        sunk: match outcome {
            AttackOutcome::Sunk(name) => Some(name.to_string()),
            _ => None,
        },
    })
    .await?;
    link.send(Payload::BoardView {
        caption: "Your guesses:".to_string(),
        rendered: game.render_grid(opponent, false)?,
    })
    .await?;
    Ok(())
}
