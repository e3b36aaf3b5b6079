//! In-memory transport pair for tests: two crossed unbounded channels.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::envelope::Envelope;
use crate::transport::Transport;

pub struct InMemoryTransport {
    tx: UnboundedSender<Envelope>,
    rx: UnboundedReceiver<Envelope>,
}

impl InMemoryTransport {
    pub fn pair() -> (Self, Self) {
        let (tx_a, rx_a) = unbounded_channel();
        let (tx_b, rx_b) = unbounded_channel();
        (Self { tx: tx_a, rx: rx_b }, Self { tx: tx_b, rx: rx_a })
    }
}

#[async_trait::async_trait]
impl Transport for InMemoryTransport {
    async fn send(&mut self, env: Envelope) -> anyhow::Result<()> {
        self.tx
            .send(env)
            .map_err(|_| anyhow::anyhow!("channel closed"))
    }

    async fn recv(&mut self) -> anyhow::Result<Envelope> {
        self.rx
            .recv()
            .await
            .ok_or_else(|| anyhow::anyhow!("channel closed"))
    }
}
