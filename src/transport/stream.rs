//! Reliable stream binding: one persistent TCP connection per participant,
//! envelopes framed with a u32 length prefix.

use tokio::io::{AsyncReadExt, AsyncWriteExt};
use tokio::net::{TcpStream, ToSocketAddrs};
use tokio::time::{timeout, Duration};

use crate::config::MAX_FRAME_SIZE;
use crate::envelope::{decode, encode, Envelope};
use crate::transport::Transport;

/// Bound on how long a single write may take. Receives block indefinitely:
/// a handler waiting for a placement or a target has no other cancellation
/// point than the transport closing.
const SEND_TIMEOUT: Duration = Duration::from_secs(30);

pub struct StreamTransport {
    stream: TcpStream,
    max_frame_size: u32,
}

impl StreamTransport {
    pub fn new(stream: TcpStream) -> Self {
        Self {
            stream,
            max_frame_size: MAX_FRAME_SIZE,
        }
    }

    pub async fn connect<A: ToSocketAddrs>(addr: A) -> anyhow::Result<Self> {
        let stream = TcpStream::connect(addr).await?;
        Ok(Self::new(stream))
    }
}

fn map_write_err(e: std::io::Error) -> anyhow::Error {
    if e.kind() == std::io::ErrorKind::BrokenPipe
        || e.kind() == std::io::ErrorKind::ConnectionReset
    {
        anyhow::anyhow!("connection closed by peer")
    } else {
        anyhow::anyhow!("write error: {}", e)
    }
}

fn map_read_err(e: std::io::Error) -> anyhow::Error {
    match e.kind() {
        std::io::ErrorKind::UnexpectedEof => anyhow::anyhow!("connection closed by peer"),
        std::io::ErrorKind::ConnectionReset => anyhow::anyhow!("connection reset by peer"),
        _ => anyhow::anyhow!("read error: {}", e),
    }
}

#[async_trait::async_trait]
impl Transport for StreamTransport {
    async fn send(&mut self, env: Envelope) -> anyhow::Result<()> {
        let data = encode(&env)?;
        if data.len() as u32 > self.max_frame_size {
            anyhow::bail!(
                "frame too large: {} bytes (max: {})",
                data.len(),
                self.max_frame_size
            );
        }
        let send_op = async {
            let len = (data.len() as u32).to_be_bytes();
            self.stream.write_all(&len).await.map_err(map_write_err)?;
            self.stream.write_all(&data).await.map_err(map_write_err)?;
            anyhow::Ok(())
        };
        timeout(SEND_TIMEOUT, send_op)
            .await
            .map_err(|_| anyhow::anyhow!("send timeout after {:?}", SEND_TIMEOUT))?
    }

    async fn recv(&mut self) -> anyhow::Result<Envelope> {
        let mut len_buf = [0u8; 4];
        self.stream
            .read_exact(&mut len_buf)
            .await
            .map_err(map_read_err)?;
        let len = u32::from_be_bytes(len_buf);
        if len == 0 {
            anyhow::bail!("invalid frame length: 0");
        }
        if len > self.max_frame_size {
            anyhow::bail!("frame too large: {} bytes (max: {})", len, self.max_frame_size);
        }
        let mut buf = vec![0u8; len as usize];
        self.stream
            .read_exact(&mut buf)
            .await
            .map_err(map_read_err)?;
        decode(&buf)
    }
}
