//! The message layer over a transport binding. Stream links run bare: the
//! transport already guarantees ordered delivery, so envelopes go out without
//! an acknowledgment exchange. Datagram links acknowledge every data
//! envelope and retransmit a bounded number of times when the ack does not
//! arrive; duplicates created by retransmission are suppressed on receive
//! using the monotonic envelope ids.

use std::collections::VecDeque;

use log::{debug, warn};
use tokio::time::{timeout, Duration, Instant};

use crate::config::{ACK_WAIT, SEND_ATTEMPTS};
use crate::envelope::{Envelope, Payload};
use crate::transport::Transport;

#[derive(Clone, Copy)]
enum AckMode {
    /// No acknowledgment traffic in either direction.
    Off,
    /// Wait for acks, retransmit on timeout, ack and deduplicate inbound.
    On {
        ack_wait: Duration,
        attempts: u32,
    },
}

pub struct Link {
    transport: Box<dyn Transport>,
    mode: AckMode,
    next_id: u64,
    // Highest data-envelope id already handed to the caller; anything at or
    // below it is a retransmitted duplicate and only needs a fresh ack.
    last_delivered: u64,
    // Data envelopes that arrived while waiting on an ack; yielded by the
    // next recv(), which also acks them (late, but the peer tolerates that).
    stashed: VecDeque<Envelope>,
}

impl Link {
    /// A link over a transport that is ordered and reliable on its own.
    pub fn reliable(transport: Box<dyn Transport>) -> Self {
        Self::with_mode(transport, AckMode::Off)
    }

    /// A link over a lossy transport: acknowledgments plus bounded
    /// retransmission.
    pub fn acked(transport: Box<dyn Transport>) -> Self {
        Self::with_ack_wait(transport, ACK_WAIT)
    }

    pub fn with_ack_wait(transport: Box<dyn Transport>, ack_wait: Duration) -> Self {
        Self::with_mode(
            transport,
            AckMode::On {
                ack_wait,
                attempts: SEND_ATTEMPTS,
            },
        )
    }

    fn with_mode(transport: Box<dyn Transport>, mode: AckMode) -> Self {
        Link {
            transport,
            mode,
            next_id: 0,
            last_delivered: 0,
            stashed: VecDeque::new(),
        }
    }

    /// Monotonic per-connection id, starting at 1 so ids are positive.
    fn next_id(&mut self) -> u64 {
        self.next_id += 1;
        self.next_id
    }

    /// Feed an envelope that was read off the wire before this link was
    /// constructed (the datagram server learns a peer's address from its
    /// first datagram). The next recv() yields and acks it.
    pub fn inject(&mut self, env: Envelope) {
        self.stashed.push_back(env);
    }

    /// Wrap `payload` in a fresh envelope and transmit it. On an acked link
    /// this also waits a bounded time for the matching ack, retransmitting
    /// the same envelope on each timeout; once the attempts are spent the
    /// failure is logged and play continues. Transport failures propagate.
    pub async fn send(&mut self, payload: Payload) -> anyhow::Result<()> {
        let id = self.next_id();
        let env = Envelope::data(id, payload);
        let (ack_wait, attempts) = match self.mode {
            AckMode::Off => {
                self.transport.send(env).await?;
                debug!("sent envelope {}", id);
                return Ok(());
            }
            AckMode::On { ack_wait, attempts } => (ack_wait, attempts),
        };

        let sent_at = Instant::now();
        for attempt in 1..=attempts {
            self.transport.send(env.clone()).await?;
            debug!("sent envelope {} (attempt {})", id, attempt);
            match timeout(ack_wait, self.wait_ack(id)).await {
                Ok(res) => {
                    res?;
                    debug!("envelope {} acknowledged after {:?}", id, sent_at.elapsed());
                    return Ok(());
                }
                Err(_) if attempt < attempts => {
                    warn!("no acknowledgment for envelope {}, retransmitting", id);
                }
                Err(_) => {
                    warn!(
                        "envelope {} unacknowledged after {} attempts, giving up",
                        id, attempts
                    );
                }
            }
        }
        Ok(())
    }

    async fn wait_ack(&mut self, id: u64) -> anyhow::Result<()> {
        loop {
            let env = self.transport.recv().await?;
            if env.ack {
                if env.id == id {
                    return Ok(());
                }
                warn!("stale acknowledgment for envelope {}", env.id);
            } else {
                self.stashed.push_back(env);
            }
        }
    }

    /// Receive the next data payload. On an acked link an ack echoing the
    /// envelope's id goes back first, and retransmitted duplicates are
    /// re-acked and skipped instead of delivered twice.
    pub async fn recv(&mut self) -> anyhow::Result<Payload> {
        loop {
            let env = loop {
                if let Some(env) = self.stashed.pop_front() {
                    break env;
                }
                let env = self.transport.recv().await?;
                if env.ack {
                    warn!("unexpected acknowledgment for envelope {}", env.id);
                    continue;
                }
                break env;
            };
            if let AckMode::On { .. } = self.mode {
                self.transport.send(Envelope::ack(env.id)).await?;
                if env.id <= self.last_delivered {
                    debug!("duplicate envelope {}, already delivered", env.id);
                    continue;
                }
                self.last_delivered = env.id;
            }
            debug!("received envelope {} ({} ms in flight)", env.id, env.age_ms());
            return env
                .payload
                .ok_or_else(|| anyhow::anyhow!("envelope {} carried no payload", env.id));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::transport::in_memory::InMemoryTransport;

    #[tokio::test]
    async fn acked_recv_echoes_the_id() {
        let (a, mut b) = InMemoryTransport::pair();
        let mut link = Link::acked(Box::new(a));
        b.send(Envelope::data(9, Payload::Playing(true)))
            .await
            .unwrap();
        let payload = link.recv().await.unwrap();
        assert_eq!(payload, Payload::Playing(true));
        let ack = b.recv().await.unwrap();
        assert!(ack.ack);
        assert_eq!(ack.id, 9);
    }

    #[tokio::test]
    async fn reliable_link_sends_no_acks() {
        let (a, mut b) = InMemoryTransport::pair();
        let mut link = Link::reliable(Box::new(a));
        b.send(Envelope::data(1, Payload::Playing(true)))
            .await
            .unwrap();
        link.recv().await.unwrap();
        link.send(Payload::Playing(false)).await.unwrap();
        // the only traffic back is the data envelope itself
        let env = b.recv().await.unwrap();
        assert!(!env.ack);
        assert_eq!(env.payload, Some(Payload::Playing(false)));
    }

    #[tokio::test]
    async fn unacknowledged_send_retransmits_then_gives_up() {
        let (a, mut b) = InMemoryTransport::pair();
        let mut link = Link::with_ack_wait(Box::new(a), Duration::from_millis(10));
        // b never acks; send still succeeds after the bounded attempts,
        // each carrying the same envelope id
        link.send(Payload::Info("hello".to_string())).await.unwrap();
        let mut ids = Vec::new();
        while let Ok(env) = tokio::time::timeout(Duration::from_millis(10), b.recv()).await {
            ids.push(env.unwrap().id);
        }
        assert_eq!(ids.len() as u32, SEND_ATTEMPTS);
        assert!(ids.iter().all(|&id| id == 1));
    }

    #[tokio::test]
    async fn duplicate_data_envelopes_are_delivered_once() {
        let (a, mut b) = InMemoryTransport::pair();
        let mut link = Link::acked(Box::new(a));
        let env = Envelope::data(1, Payload::Playing(true));
        b.send(env.clone()).await.unwrap();
        b.send(env).await.unwrap();
        b.send(Envelope::data(2, Payload::Playing(false)))
            .await
            .unwrap();
        assert_eq!(link.recv().await.unwrap(), Payload::Playing(true));
        // the duplicate is skipped, not handed out again
        assert_eq!(link.recv().await.unwrap(), Payload::Playing(false));
        // but both copies were acked
        let acks: Vec<u64> = vec![
            b.recv().await.unwrap(),
            b.recv().await.unwrap(),
            b.recv().await.unwrap(),
        ]
        .into_iter()
        .filter(|e| e.ack)
        .map(|e| e.id)
        .collect();
        assert_eq!(acks, vec![1, 1, 2]);
    }

    #[tokio::test]
    async fn ids_are_monotonic_from_one() {
        let (a, mut b) = InMemoryTransport::pair();
        let mut link = Link::reliable(Box::new(a));
        for expected in 1..=3u64 {
            link.send(Payload::Playing(true)).await.unwrap();
            let env = b.recv().await.unwrap();
            assert_eq!(env.id, expected);
            assert!(!env.ack);
        }
    }
}
