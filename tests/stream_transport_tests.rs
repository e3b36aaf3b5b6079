use armada::{Envelope, Payload, StreamTransport, Transport};
use tokio::io::AsyncWriteExt;
use tokio::net::TcpListener;

#[tokio::test(flavor = "multi_thread")]
async fn envelope_roundtrip_over_tcp() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let server = tokio::spawn(async move {
        let (socket, _) = listener.accept().await.unwrap();
        let mut transport = StreamTransport::new(socket);
        let env = transport.recv().await.unwrap();
        transport.send(Envelope::ack(env.id)).await.unwrap();
        env
    });

    let mut client = StreamTransport::connect(addr).await?;
    let sent = Envelope::data(
        1,
        Payload::Placement {
            row: 2,
            col: 3,
            direction: "south".to_string(),
        },
    );
    client.send(sent.clone()).await?;

    let received = server.await?;
    assert_eq!(received, sent);

    let ack = client.recv().await?;
    assert!(ack.ack);
    assert_eq!(ack.id, 1);
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn malformed_frame_is_an_error_not_a_crash() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let writer = tokio::spawn(async move {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        // well-formed length prefix, junk body
        stream.write_all(&8u32.to_be_bytes()).await.unwrap();
        stream.write_all(&[0xde, 0xad, 0xbe, 0xef, 0xde, 0xad, 0xbe, 0xef])
            .await
            .unwrap();
    });

    let (socket, _) = listener.accept().await?;
    let mut transport = StreamTransport::new(socket);
    assert!(transport.recv().await.is_err());
    writer.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn zero_length_frame_is_rejected() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let writer = tokio::spawn(async move {
        let mut stream = tokio::net::TcpStream::connect(addr).await.unwrap();
        stream.write_all(&0u32.to_be_bytes()).await.unwrap();
    });

    let (socket, _) = listener.accept().await?;
    let mut transport = StreamTransport::new(socket);
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("invalid frame length"));
    writer.await?;
    Ok(())
}

#[tokio::test(flavor = "multi_thread")]
async fn closed_connection_surfaces_as_peer_loss() -> anyhow::Result<()> {
    let listener = TcpListener::bind("127.0.0.1:0").await?;
    let addr = listener.local_addr()?;

    let client = tokio::net::TcpStream::connect(addr).await?;
    let (socket, _) = listener.accept().await?;
    drop(client);

    let mut transport = StreamTransport::new(socket);
    let err = transport.recv().await.unwrap_err();
    assert!(err.to_string().contains("closed by peer"));
    Ok(())
}
