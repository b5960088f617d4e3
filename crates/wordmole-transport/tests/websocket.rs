//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener and a real `tokio-tungstenite` client to
//! verify that frames actually cross the network, that clean closes surface
//! as `Ok(None)`, and that send and recv do not block each other.

#[cfg(feature = "websocket")]
mod websocket {
    use std::time::Duration;

    use futures_util::{SinkExt, StreamExt};
    use tokio_tungstenite::tungstenite::Message;
    use wordmole_transport::{Connection, Transport, WebSocketTransport};

    type ClientWs = tokio_tungstenite::WebSocketStream<
        tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
    >;

    /// Binds a transport on a random port and returns it with its address.
    async fn bind_transport() -> (WebSocketTransport, String) {
        let transport = WebSocketTransport::bind("127.0.0.1:0")
            .await
            .expect("should bind");
        let addr = transport.local_addr().expect("should have addr").to_string();
        (transport, addr)
    }

    async fn connect_client(addr: &str) -> ClientWs {
        let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
            .await
            .expect("client should connect");
        ws
    }

    #[tokio::test]
    async fn test_accept_and_receive_binary_frame() {
        let (mut transport, addr) = bind_transport().await;

        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let mut client = connect_client(&addr).await;
        let conn = server.await.expect("accept task should complete");

        client
            .send(Message::Binary(b"hello".to_vec().into()))
            .await
            .unwrap();

        let data = conn.recv().await.expect("recv should succeed");
        assert_eq!(data.as_deref(), Some(b"hello".as_slice()));
    }

    #[tokio::test]
    async fn test_text_frames_arrive_as_bytes() {
        let (mut transport, addr) = bind_transport().await;

        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let mut client = connect_client(&addr).await;
        let conn = server.await.unwrap();

        client
            .send(Message::Text("{\"type\":\"start\"}".into()))
            .await
            .unwrap();

        let data = conn.recv().await.unwrap();
        assert_eq!(data.as_deref(), Some(b"{\"type\":\"start\"}".as_slice()));
    }

    #[tokio::test]
    async fn test_send_reaches_client() {
        let (mut transport, addr) = bind_transport().await;

        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let mut client = connect_client(&addr).await;
        let conn = server.await.unwrap();

        conn.send(b"from-server").await.expect("send should succeed");

        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"from-server");
    }

    #[tokio::test]
    async fn test_clean_close_yields_none() {
        let (mut transport, addr) = bind_transport().await;

        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let mut client = connect_client(&addr).await;
        let conn = server.await.unwrap();

        client.close(None).await.unwrap();

        let data = conn.recv().await.expect("close should not be an error");
        assert_eq!(data, None);
    }

    #[tokio::test]
    async fn test_send_while_recv_is_parked() {
        // A clone of the connection must be able to push a frame while the
        // original is blocked waiting for inbound data.
        let (mut transport, addr) = bind_transport().await;

        let server = tokio::spawn(async move {
            transport.accept().await.expect("should accept")
        });
        let mut client = connect_client(&addr).await;
        let conn = server.await.unwrap();

        let reader = conn.clone();
        let read_task = tokio::spawn(async move { reader.recv().await });

        // Give the reader time to park on the stream lock.
        tokio::time::sleep(Duration::from_millis(20)).await;

        tokio::time::timeout(Duration::from_secs(1), conn.send(b"push"))
            .await
            .expect("send must not wait for recv to finish")
            .expect("send should succeed");

        let msg = client.next().await.unwrap().unwrap();
        assert_eq!(msg.into_data().as_ref(), b"push");

        // Unblock and finish the reader.
        client.send(Message::Binary(b"bye".to_vec().into())).await.unwrap();
        let data = read_task.await.unwrap().unwrap();
        assert_eq!(data.as_deref(), Some(b"bye".as_slice()));
    }

    #[tokio::test]
    async fn test_connection_ids_are_unique() {
        let (mut transport, addr) = bind_transport().await;

        let server = tokio::spawn(async move {
            let a = transport.accept().await.expect("first accept");
            let b = transport.accept().await.expect("second accept");
            (a, b)
        });
        let _c1 = connect_client(&addr).await;
        let _c2 = connect_client(&addr).await;
        let (a, b) = server.await.unwrap();

        assert_ne!(a.id(), b.id());
    }
}
