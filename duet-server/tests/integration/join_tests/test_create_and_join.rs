use duet_core::{Identity, ServerMessage};
use duet_server::{ConnectionState, JoinOutcome};

use crate::integration::init_tracing;
use crate::utils::TestSession;

#[tokio::test]
async fn test_first_joiner_creates_room() {
    init_tracing();
    let mut session = TestSession::new();
    let mut alice = session.connect().await;

    let outcome = session.join(&alice, "r1", "alice").await;

    assert_eq!(outcome, Ok(JoinOutcome::Created));
    let room = session.room("r1").expect("room should exist");
    assert_eq!(room.creator(), &Identity::from("alice"));
    assert_eq!(session.room_members("r1"), vec!["alice"]);
    assert_eq!(session.transport_members("r1").await, vec![alice.connection_id]);
    assert!(
        session
            .coordinator
            .connection_state(&alice.connection_id)
            .is_some_and(ConnectionState::is_joined)
    );

    // Nobody else is in the room to be told.
    alice.assert_silent();
}

#[tokio::test]
async fn test_second_joiner_is_announced_to_creator_only() {
    init_tracing();
    let mut session = TestSession::new();
    let mut alice = session.connect().await;
    let mut bob = session.connect().await;

    session.join_room(&alice, "r1", "alice").await;
    let outcome = session.join(&bob, "r1", "bob").await;

    assert_eq!(outcome, Ok(JoinOutcome::Joined));
    assert_eq!(
        alice.take_messages(),
        vec![ServerMessage::UserConnected(Identity::from("bob"))]
    );
    bob.assert_silent();
    assert_eq!(session.room_members("r1"), vec!["alice", "bob"]);
    assert_eq!(
        session.room("r1").map(|r| r.creator().clone()),
        Some(Identity::from("alice"))
    );
}

#[tokio::test]
async fn test_rooms_are_independent() {
    init_tracing();
    let mut session = TestSession::new();
    let mut alice = session.connect().await;
    let mut dave = session.connect().await;

    session.join_room(&alice, "r1", "alice").await;
    session.join_room(&dave, "r2", "dave").await;

    alice.assert_silent();
    dave.assert_silent();
    assert_eq!(session.coordinator.directory().room_count(), 2);
}
