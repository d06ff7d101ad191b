use duet_core::{ClientMessage, Identity, RoomId, ServerMessage};
use duet_server::{ServerConfig, bind, serve};
use serde_json::json;
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use tokio::sync::oneshot;

use crate::integration::init_tracing;
use crate::utils::WsTestClient;

async fn start_server() -> (SocketAddr, oneshot::Sender<()>) {
    let config = ServerConfig {
        host: IpAddr::V4(Ipv4Addr::LOCALHOST),
        port: 0,
        static_dir: None,
        ..ServerConfig::default()
    };

    let listener = bind(&config).await.expect("Failed to bind");
    let addr = listener.local_addr().expect("No local address");
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();

    tokio::spawn(async move {
        let shutdown = async {
            let _ = shutdown_rx.await;
        };
        serve(listener, &config, shutdown).await.expect("Server failed");
    });

    (addr, shutdown_tx)
}

#[tokio::test]
async fn test_two_party_session_over_websocket() {
    init_tracing();
    let (addr, shutdown) = start_server().await;

    let mut alice = WsTestClient::connect(addr).await.expect("alice connect");
    let mut bob = WsTestClient::connect(addr).await.expect("bob connect");
    assert_ne!(alice.connection_id, bob.connection_id);

    alice.join_and_confirm("r1", "alice").await.expect("alice join");
    bob.join_and_confirm("r1", "bob").await.expect("bob join");

    assert_eq!(
        alice.recv().await.expect("alice recv"),
        ServerMessage::UserConnected(Identity::from("bob"))
    );
    match alice.recv().await.expect("alice recv") {
        ServerMessage::Signal { user_id, .. } => assert_eq!(user_id, bob.connection_id),
        other => panic!("expected bob's probe, got {:?}", other),
    }

    let offer = json!({"type": "offer", "sdp": "v=0"});
    alice
        .send(&ClientMessage::Signal {
            signal: offer.clone(),
        })
        .await
        .expect("send offer");

    let expected = ServerMessage::Signal {
        user_id: alice.connection_id,
        signal: offer,
    };
    assert_eq!(bob.recv().await.expect("bob recv"), expected);
    assert_eq!(alice.recv().await.expect("alice echo"), expected);

    alice.close().await.expect("alice close");
    assert_eq!(
        bob.recv().await.expect("bob recv"),
        ServerMessage::SessionEnded
    );

    bob.close().await.expect("bob close");
    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_third_client_is_refused_over_websocket() {
    init_tracing();
    let (addr, shutdown) = start_server().await;

    let mut alice = WsTestClient::connect(addr).await.expect("alice connect");
    let mut bob = WsTestClient::connect(addr).await.expect("bob connect");
    let mut carol = WsTestClient::connect(addr).await.expect("carol connect");

    alice.join_and_confirm("r1", "alice").await.expect("alice join");
    bob.join_and_confirm("r1", "bob").await.expect("bob join");

    carol
        .send(&ClientMessage::JoinRoom {
            room_id: RoomId::from("r1"),
            user_id: Identity::from("carol"),
        })
        .await
        .expect("carol send");

    assert_eq!(carol.recv().await.expect("carol recv"), ServerMessage::RoomFull);

    let _ = shutdown.send(());
}

#[tokio::test]
async fn test_malformed_frames_do_not_drop_the_socket() {
    init_tracing();
    let (addr, shutdown) = start_server().await;

    let mut alice = WsTestClient::connect(addr).await.expect("alice connect");

    alice
        .send_raw("not json".to_owned())
        .await
        .expect("send garbage");
    alice
        .send_raw(r#"{"event":"shout","data":{}}"#.to_owned())
        .await
        .expect("send unknown event");

    alice.join_and_confirm("r1", "alice").await.expect("join after garbage");

    let _ = shutdown.send(());
}
