use duet_core::{ConnectionId, Identity, RoomId};
use duet_server::{JoinOutcome, SessionCommand, SessionCoordinator, SessionError};
use std::sync::Arc;

use crate::integration::init_tracing;
use crate::utils::{MockSignalingOutput, OutputCall, TestSession};

#[tokio::test]
async fn test_join_leaves_previous_transport_rooms_first() {
    init_tracing();
    let output = MockSignalingOutput::new();
    let mut coordinator = SessionCoordinator::new(Arc::new(output.clone()));
    let conn = ConnectionId::new();

    coordinator
        .handle_command(SessionCommand::Connect { connection_id: conn })
        .await;
    output.place_in_room(conn, "lobby").await;

    let outcome = coordinator
        .join_room(conn, RoomId::from("r1"), Identity::from("alice"))
        .await;
    assert_eq!(outcome, Ok(JoinOutcome::Created));

    let calls = output.calls().await;
    let left = calls
        .iter()
        .position(|c| matches!(c, OutputCall::LeaveRoom { room_id, .. } if room_id.as_str() == "lobby"))
        .expect("connection should leave the lobby");
    let joined = calls
        .iter()
        .position(|c| matches!(c, OutputCall::JoinRoom { room_id, .. } if room_id.as_str() == "r1"))
        .expect("connection should join r1");
    assert!(left < joined);
}

#[tokio::test]
async fn test_second_join_on_same_connection_is_ignored() {
    init_tracing();
    let mut session = TestSession::new();
    let mut alice = session.connect().await;

    session.join_room(&alice, "r1", "alice").await;
    let outcome = session.join(&alice, "r2", "alice").await;

    assert_eq!(
        outcome,
        Err(SessionError::AlreadyJoined {
            connection_id: alice.connection_id,
            room_id: RoomId::from("r1"),
        })
    );
    assert!(session.room("r2").is_none());
    alice.assert_silent();
}

#[tokio::test]
async fn test_join_from_unknown_connection_is_ignored() {
    init_tracing();
    let mut session = TestSession::new();
    let ghost = ConnectionId::new();

    let outcome = session
        .coordinator
        .join_room(ghost, RoomId::from("r1"), Identity::from("ghost"))
        .await;

    assert_eq!(
        outcome,
        Err(SessionError::ConnectionClosed { connection_id: ghost })
    );
    assert!(session.room("r1").is_none());
    assert!(session.coordinator.registry().is_empty());
}
