use crate::session::SessionCommand;
use crate::signaling::SignalingService;
use axum::extract::State;
use axum::extract::ws::{Message, WebSocket, WebSocketUpgrade};
use axum::response::IntoResponse;
use duet_core::{ClientMessage, ConnectionId, ServerMessage};
use futures::{SinkExt, StreamExt};
use tokio::sync::mpsc;
use tracing::{error, info, warn};

pub async fn ws_handler(
    ws: WebSocketUpgrade,
    State(service): State<SignalingService>,
) -> impl IntoResponse {
    ws.on_upgrade(move |socket| handle_socket(socket, service))
}

async fn handle_socket(socket: WebSocket, service: SignalingService) {
    let connection_id = ConnectionId::new();
    info!("User connected: {}", connection_id);

    let (mut sender, mut receiver) = socket.split();
    let (tx, mut rx) = mpsc::unbounded_channel::<ServerMessage>();

    service.add_connection(connection_id, tx);
    if let Err(e) = service.dispatch(SessionCommand::Connect { connection_id }).await {
        error!("Session coordinator is gone: {}", e);
        service.remove_connection(&connection_id);
        return;
    }
    service.send_message(connection_id, ServerMessage::Connected { connection_id });

    let mut send_task = tokio::spawn(async move {
        while let Some(msg) = rx.recv().await {
            let json = match serde_json::to_string(&msg) {
                Ok(json) => json,
                Err(e) => {
                    error!("Failed to serialize {} event: {}", msg.name(), e);
                    continue;
                }
            };
            if sender.send(Message::Text(json.into())).await.is_err() {
                break;
            }
        }
    });

    let mut recv_task = tokio::spawn({
        let service = service.clone();

        async move {
            while let Some(Ok(msg)) = receiver.next().await {
                match msg {
                    Message::Text(text) => match serde_json::from_str::<ClientMessage>(text.as_str()) {
                        Ok(client_msg) => {
                            let cmd = SessionCommand::from_client(connection_id, client_msg);
                            if let Err(e) = service.dispatch(cmd).await {
                                error!("Session coordinator died: {}", e);
                                break;
                            }
                        }
                        Err(e) => warn!("Invalid message from {}: {}", connection_id, e),
                    },
                    Message::Close(_) => break,
                    _ => {}
                }
            }
        }
    });

    tokio::select! {
        _ = (&mut send_task) => recv_task.abort(),
        _ = (&mut recv_task) => send_task.abort(),
    };

    // Exactly one disconnect per socket, even when the reader was aborted.
    if let Err(e) = service
        .dispatch(SessionCommand::Disconnect { connection_id })
        .await
    {
        error!("Lost disconnect for {}: {}", connection_id, e);
    }

    service.remove_connection(&connection_id);
    info!("User disconnected: {}", connection_id);
}
