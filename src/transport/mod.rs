//! Transport bindings. Both real bindings expose the same contract: send an
//! envelope to, and receive an envelope from, the one peer the transport was
//! bound to at setup time.

use crate::envelope::Envelope;

#[async_trait::async_trait]
pub trait Transport: Send {
    async fn send(&mut self, env: Envelope) -> anyhow::Result<()>;
    async fn recv(&mut self) -> anyhow::Result<Envelope>;
}

pub mod datagram;
pub mod in_memory;
pub mod stream;
