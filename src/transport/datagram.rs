//! Unreliable datagram binding: one envelope per UDP datagram, no
//! fragmentation or retransmission. Loss and duplication go undetected
//! beyond the link layer's ack timeout.

use std::net::SocketAddr;
use std::sync::Arc;

use log::warn;
use tokio::net::UdpSocket;

use crate::config::DATAGRAM_BUFFER;
use crate::envelope::{decode, encode, Envelope};
use crate::transport::Transport;

/// A datagram endpoint bound to a single peer address. The server side
/// shares one socket between both participants' transports and filters
/// received datagrams by sender, so a frame from the wrong peer never leaks
/// into the other participant's exchange.
pub struct DatagramTransport {
    socket: Arc<UdpSocket>,
    peer: SocketAddr,
    buf_size: usize,
}

impl DatagramTransport {
    pub fn new(socket: Arc<UdpSocket>, peer: SocketAddr) -> Self {
        Self {
            socket,
            peer,
            buf_size: DATAGRAM_BUFFER,
        }
    }

    /// Client-side constructor: bind an ephemeral local socket toward the
    /// server address.
    pub async fn connect(server: &str) -> anyhow::Result<Self> {
        let socket = UdpSocket::bind("0.0.0.0:0").await?;
        let peer = tokio::net::lookup_host(server)
            .await?
            .next()
            .ok_or_else(|| anyhow::anyhow!("cannot resolve {}", server))?;
        Ok(Self::new(Arc::new(socket), peer))
    }

    pub fn peer(&self) -> SocketAddr {
        self.peer
    }
}

#[async_trait::async_trait]
impl Transport for DatagramTransport {
    async fn send(&mut self, env: Envelope) -> anyhow::Result<()> {
        let data = encode(&env)?;
        // Hard ceiling instead of silent truncation at the receiver.
        if data.len() > self.buf_size {
            anyhow::bail!(
                "payload of {} bytes exceeds the {} byte datagram ceiling",
                data.len(),
                self.buf_size
            );
        }
        self.socket.send_to(&data, self.peer).await?;
        Ok(())
    }

    async fn recv(&mut self) -> anyhow::Result<Envelope> {
        let mut buf = vec![0u8; self.buf_size];
        loop {
            let (n, from) = self.socket.recv_from(&mut buf).await?;
            if from != self.peer {
                warn!("discarding datagram from unexpected peer {}", from);
                continue;
            }
            return decode(&buf[..n]);
        }
    }
}
