//! Integration tests for the WebSocket transport.
//!
//! These spin up a real listener and a real tokio-tungstenite client so
//! the frames actually cross a socket.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use sleuth_transport::{WsConnection, WsListener};
use tokio_tungstenite::tungstenite::Message;

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Binds a listener on a random port and returns it with its address.
async fn listen() -> (WsListener, String) {
    let listener = WsListener::bind("127.0.0.1:0").await.expect("should bind");
    let addr = listener
        .local_addr()
        .expect("should have local addr")
        .to_string();
    (listener, addr)
}

/// Accepts one server-side connection while connecting one client.
async fn pair(listener: &mut WsListener, addr: &str) -> (WsConnection, ClientWs) {
    let url = format!("ws://{addr}");
    let (conn, client) = tokio::join!(listener.accept(), async {
        let (ws, _) = tokio_tungstenite::connect_async(&url)
            .await
            .expect("client should connect");
        ws
    });
    (conn.expect("should accept"), client)
}

#[tokio::test]
async fn test_frames_flow_both_ways() {
    let (mut listener, addr) = listen().await;
    let (mut conn, mut client) = pair(&mut listener, &addr).await;

    // Server to client. Outbound frames are text because the payload
    // is always JSON.
    conn.sender()
        .send(br#"{"type":"hello"}"#.to_vec())
        .expect("send should queue");
    let msg = client.next().await.unwrap().unwrap();
    assert!(msg.is_text(), "expected a text frame, got {msg:?}");
    assert_eq!(msg.into_data().as_ref(), br#"{"type":"hello"}"#);

    // Client to server.
    client
        .send(Message::Text(r#"{"type":"reply"}"#.into()))
        .await
        .unwrap();
    let received = conn.recv().await.expect("recv").expect("should have data");
    assert_eq!(received, br#"{"type":"reply"}"#);
}

#[tokio::test]
async fn test_binary_frames_are_accepted_inbound() {
    let (mut listener, addr) = listen().await;
    let (mut conn, mut client) = pair(&mut listener, &addr).await;

    client
        .send(Message::Binary(br#"{"type":"reply"}"#.to_vec().into()))
        .await
        .unwrap();
    let received = conn.recv().await.expect("recv").expect("should have data");
    assert_eq!(received, br#"{"type":"reply"}"#);
}

#[tokio::test]
async fn test_ping_frames_are_skipped() {
    let (mut listener, addr) = listen().await;
    let (mut conn, mut client) = pair(&mut listener, &addr).await;

    client
        .send(Message::Ping(b"ka".to_vec().into()))
        .await
        .unwrap();
    client
        .send(Message::Text("after the ping".into()))
        .await
        .unwrap();

    // recv never surfaces the ping; the next payload is the text frame.
    let received = conn.recv().await.expect("recv").expect("should have data");
    assert_eq!(received, b"after the ping");
}

#[tokio::test]
async fn test_recv_returns_none_on_client_close() {
    let (mut listener, addr) = listen().await;
    let (mut conn, mut client) = pair(&mut listener, &addr).await;

    client.send(Message::Close(None)).await.unwrap();

    let result = conn.recv().await.expect("clean close is not an error");
    assert!(result.is_none(), "should return None on client close");
}

#[tokio::test]
async fn test_close_reaches_the_client() {
    let (mut listener, addr) = listen().await;
    let (conn, mut client) = pair(&mut listener, &addr).await;

    conn.sender().close();

    let msg = tokio::time::timeout(Duration::from_secs(5), client.next())
        .await
        .expect("close should arrive promptly");
    match msg {
        Some(Ok(Message::Close(_))) | None => {}
        other => panic!("expected a close frame, got {other:?}"),
    }
}

#[tokio::test]
async fn test_connection_ids_are_unique() {
    let (mut listener, addr) = listen().await;
    let (first, _client_a) = pair(&mut listener, &addr).await;
    let (second, _client_b) = pair(&mut listener, &addr).await;

    assert_ne!(first.id(), second.id());
}

#[tokio::test]
async fn test_sender_clones_share_the_queue() {
    let (mut listener, addr) = listen().await;
    let (conn, mut client) = pair(&mut listener, &addr).await;

    let a = conn.sender();
    let b = a.clone();
    a.send(b"one".to_vec()).expect("send");
    b.send(b"two".to_vec()).expect("send");

    let first = client.next().await.unwrap().unwrap();
    let second = client.next().await.unwrap().unwrap();
    assert_eq!(first.into_data().as_ref(), b"one");
    assert_eq!(second.into_data().as_ref(), b"two");
}
