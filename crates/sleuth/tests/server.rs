//! End-to-end tests: real server, real WebSocket clients, JSON on the wire.

use std::time::Duration;

use futures_util::{SinkExt, StreamExt};
use sleuth::Server;
use sleuth_protocol::{ClientCommand, PlayerId, RoomCode, ServerEvent};
use tokio_tungstenite::tungstenite::Message;

// =========================================================================
// Helpers
// =========================================================================

type ClientWs = tokio_tungstenite::WebSocketStream<
    tokio_tungstenite::MaybeTlsStream<tokio::net::TcpStream>,
>;

/// Starts a server on a random port and returns the address.
async fn start_server() -> String {
    let server = Server::bind("127.0.0.1:0").await.expect("server should bind");
    let addr = server
        .local_addr()
        .expect("should have local addr")
        .to_string();

    tokio::spawn(async move {
        let _ = server.run().await;
    });

    // Give the accept loop a moment to start.
    tokio::time::sleep(Duration::from_millis(10)).await;
    addr
}

async fn connect(addr: &str) -> ClientWs {
    let (ws, _) = tokio_tungstenite::connect_async(format!("ws://{addr}"))
        .await
        .expect("should connect");
    ws
}

fn code(n: u16) -> RoomCode {
    RoomCode::new(n).expect("valid room code")
}

async fn send(ws: &mut ClientWs, command: &ClientCommand) {
    let text = serde_json::to_string(command).expect("encode command");
    ws.send(Message::Text(text.into())).await.expect("send");
}

async fn recv(ws: &mut ClientWs) -> ServerEvent {
    let msg = tokio::time::timeout(Duration::from_secs(5), ws.next())
        .await
        .expect("timed out waiting for an event")
        .expect("connection ended")
        .expect("websocket error");
    serde_json::from_slice(&msg.into_data()).expect("decode event")
}

/// Reads events until one satisfies the predicate, discarding the rest.
async fn recv_until<F>(ws: &mut ClientWs, mut pred: F) -> ServerEvent
where
    F: FnMut(&ServerEvent) -> bool,
{
    for _ in 0..50 {
        let event = recv(ws).await;
        if pred(&event) {
            return event;
        }
    }
    panic!("no matching event in 50 messages");
}

async fn assert_silent(ws: &mut ClientWs) {
    let result = tokio::time::timeout(Duration::from_millis(100), ws.next()).await;
    assert!(result.is_err(), "expected silence, got {result:?}");
}

/// Joins a room and returns the id the server assigned.
async fn join(ws: &mut ClientWs, name: &str, room: RoomCode) -> PlayerId {
    send(
        ws,
        &ClientCommand::Join {
            name: name.into(),
            room_code: room,
        },
    )
    .await;
    let event = recv_until(ws, |e| matches!(e, ServerEvent::Joined { .. })).await;
    match event {
        ServerEvent::Joined { player_id, .. } => player_id,
        other => panic!("expected Joined, got {other:?}"),
    }
}

// =========================================================================
// Lobby
// =========================================================================

#[tokio::test]
async fn test_join_acknowledges_then_broadcasts_roster() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    send(
        &mut ws,
        &ClientCommand::Join {
            name: "amy".into(),
            room_code: code(11),
        },
    )
    .await;

    let joined = recv(&mut ws).await;
    match joined {
        ServerEvent::Joined { room_code, .. } => assert_eq!(room_code, code(11)),
        other => panic!("expected Joined, got {other:?}"),
    }

    let update = recv(&mut ws).await;
    match update {
        ServerEvent::RoomUpdate {
            players, host_id, ..
        } => {
            assert_eq!(players.len(), 1);
            assert_eq!(players[0].name, "amy");
            assert_eq!(host_id, players[0].id);
        }
        other => panic!("expected RoomUpdate, got {other:?}"),
    }
}

#[tokio::test]
async fn test_commands_before_joining_are_refused() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    send(&mut ws, &ClientCommand::RollDice).await;

    match recv(&mut ws).await {
        ServerEvent::Error { message } => assert_eq!(message, "Join a room first."),
        other => panic!("expected Error, got {other:?}"),
    }
}

#[tokio::test]
async fn test_taken_name_can_retry_on_the_same_socket() {
    let addr = start_server().await;
    let mut ws1 = connect(&addr).await;
    let mut ws2 = connect(&addr).await;
    join(&mut ws1, "amy", code(21)).await;

    send(
        &mut ws2,
        &ClientCommand::Join {
            name: "amy".into(),
            room_code: code(21),
        },
    )
    .await;
    let event = recv(&mut ws2).await;
    assert!(
        matches!(event, ServerEvent::Error { .. }),
        "duplicate name should bounce, got {event:?}"
    );

    // The connection is still in the join phase and may try again.
    join(&mut ws2, "bea", code(21)).await;
}

#[tokio::test]
async fn test_invalid_json_keeps_the_connection_alive() {
    let addr = start_server().await;
    let mut ws = connect(&addr).await;

    ws.send(Message::Text("this is not json".into()))
        .await
        .expect("send");
    let event = recv(&mut ws).await;
    assert!(matches!(event, ServerEvent::Error { .. }));

    join(&mut ws, "amy", code(31)).await;
}

#[tokio::test]
async fn test_rooms_do_not_leak_events() {
    let addr = start_server().await;
    let mut outsider = connect(&addr).await;
    join(&mut outsider, "zoe", code(41)).await;
    // Drain the outsider's own roster update before listening for leaks.
    recv_until(&mut outsider, |e| matches!(e, ServerEvent::RoomUpdate { .. })).await;

    let mut players = Vec::new();
    for name in ["amy", "bea", "cal"] {
        let mut ws = connect(&addr).await;
        join(&mut ws, name, code(42)).await;
        players.push(ws);
    }
    send(&mut players[0], &ClientCommand::StartGame).await;
    recv_until(&mut players[0], |e| {
        matches!(e, ServerEvent::GameStarted { .. })
    })
    .await;

    assert_silent(&mut outsider).await;
}

// =========================================================================
// Game flow
// =========================================================================

#[tokio::test]
async fn test_game_start_deals_private_hands() {
    let addr = start_server().await;
    let mut clients = Vec::new();
    for name in ["amy", "bea", "cal"] {
        let mut ws = connect(&addr).await;
        join(&mut ws, name, code(51)).await;
        clients.push(ws);
    }

    send(&mut clients[0], &ClientCommand::StartGame).await;

    let mut turn = None;
    for ws in &mut clients {
        let event = recv_until(ws, |e| matches!(e, ServerEvent::GameStarted { .. })).await;
        match event {
            ServerEvent::GameStarted {
                players,
                your_cards,
                current_turn,
                ..
            } => {
                assert_eq!(players.len(), 3);
                // 18 cards outside the envelope split evenly across three hands.
                assert_eq!(your_cards.len(), 6);
                turn.get_or_insert(current_turn);
                assert_eq!(
                    turn,
                    Some(current_turn),
                    "clients disagree on whose turn it is"
                );
            }
            other => panic!("expected GameStarted, got {other:?}"),
        }
    }
}

#[tokio::test]
async fn test_non_host_cannot_start() {
    let addr = start_server().await;
    let mut host = connect(&addr).await;
    let mut guest = connect(&addr).await;
    join(&mut host, "amy", code(61)).await;
    join(&mut guest, "bea", code(61)).await;

    send(&mut guest, &ClientCommand::StartGame).await;

    let event = recv_until(&mut guest, |e| matches!(e, ServerEvent::Error { .. })).await;
    match event {
        ServerEvent::Error { message } => {
            assert_eq!(message, "Only the host can start the game.");
        }
        other => panic!("expected Error, got {other:?}"),
    }
    // The rejection is private; the host hears nothing about it.
    recv_until(&mut host, |e| {
        matches!(e, ServerEvent::RoomUpdate { players, .. } if players.len() == 2)
    })
    .await;
    assert_silent(&mut host).await;
}

#[tokio::test]
async fn test_dice_roll_reaches_everyone() {
    let addr = start_server().await;
    let mut clients = Vec::new();
    let mut ids = Vec::new();
    for name in ["amy", "bea", "cal"] {
        let mut ws = connect(&addr).await;
        ids.push(join(&mut ws, name, code(71)).await);
        clients.push(ws);
    }

    send(&mut clients[0], &ClientCommand::StartGame).await;
    let event = recv_until(&mut clients[0], |e| {
        matches!(e, ServerEvent::GameStarted { .. })
    })
    .await;
    let current_turn = match event {
        ServerEvent::GameStarted { current_turn, .. } => current_turn,
        other => panic!("expected GameStarted, got {other:?}"),
    };

    let roller = ids
        .iter()
        .position(|&id| id == current_turn)
        .expect("the first turn belongs to someone at the table");
    send(&mut clients[roller], &ClientCommand::RollDice).await;

    for ws in &mut clients {
        let event = recv_until(ws, |e| matches!(e, ServerEvent::DiceRolled { .. })).await;
        match event {
            ServerEvent::DiceRolled {
                player_id, result, ..
            } => {
                assert_eq!(player_id, current_turn);
                assert!((2..=12).contains(&result), "two d6 landed on {result}");
            }
            other => panic!("expected DiceRolled, got {other:?}"),
        }
    }
}

// =========================================================================
// Disconnects
// =========================================================================

#[tokio::test]
async fn test_clean_close_announces_the_departure() {
    let addr = start_server().await;
    let mut leaver = connect(&addr).await;
    let mut stayer = connect(&addr).await;
    let leaver_id = join(&mut leaver, "amy", code(81)).await;
    let stayer_id = join(&mut stayer, "bea", code(81)).await;

    leaver.close(None).await.expect("close");

    let event = recv_until(&mut stayer, |e| {
        matches!(e, ServerEvent::PlayerDisconnected { .. })
    })
    .await;
    match event {
        ServerEvent::PlayerDisconnected {
            player_id,
            new_host_id,
            ..
        } => {
            assert_eq!(player_id, leaver_id);
            assert_eq!(new_host_id, Some(stayer_id));
        }
        other => panic!("expected PlayerDisconnected, got {other:?}"),
    }
}

#[tokio::test]
async fn test_room_code_is_reusable_after_everyone_leaves() {
    let addr = start_server().await;
    let mut first = connect(&addr).await;
    join(&mut first, "amy", code(91)).await;
    first.close(None).await.expect("close");
    // Give the server a moment to tear the room down.
    tokio::time::sleep(Duration::from_millis(50)).await;

    let mut second = connect(&addr).await;
    join(&mut second, "amy", code(91)).await;
}
