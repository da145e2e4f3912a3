//! Spectator WebSocket lifecycle: attach, pump, detach.

use axum::extract::ws::{Message, WebSocket};
use futures::{SinkExt, StreamExt, stream::SplitSink};
use tokio::{sync::mpsc, task::JoinHandle};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    dto::{
        broadcast::{ChatMessage, RoomMessage, RoomState, SpectatorPresence},
        now_timestamp,
        ws::{ConnectionEstablished, SpectatorInboundMessage},
    },
    state::{
        SharedState,
        rooms::{GameRoom, SpectatorConnection},
    },
};

/// Drive one spectator connection from accept to teardown.
///
/// The socket is split so room broadcasts and direct replies share one writer
/// task fed by an unbounded channel; the read half is pumped here.
pub async fn handle_socket(state: SharedState, mut socket: WebSocket, game_id: i64, token: String) {
    let Some(user_id) = state.identity().resolve(&token).await else {
        debug!(game_id, "rejecting spectator with invalid token");
        let _ = socket.close().await;
        return;
    };

    let game = match state.store().find_game(game_id).await {
        Ok(Some(game)) => game,
        Ok(None) => {
            debug!(game_id, "rejecting spectator for unknown game");
            let _ = socket.close().await;
            return;
        }
        Err(err) => {
            warn!(game_id, error = %err, "storage failure during spectator attach");
            let _ = socket.close().await;
            return;
        }
    };

    let username = match state.store().find_user(user_id).await {
        Ok(Some(user)) => user.username,
        _ => format!("user-{user_id}"),
    };

    let (sink, mut stream) = socket.split();
    let (tx, rx) = mpsc::unbounded_channel::<Message>();
    let writer_task = spawn_writer(sink, rx);

    let connection_id = format!("{user_id}-{game_id}-{}", Uuid::new_v4().simple());
    let room = state.rooms().room(game.id);
    room.join(SpectatorConnection {
        id: connection_id.clone(),
        user_id,
        username: username.clone(),
        tx: tx.clone(),
    });
    info!(game_id, user_id, connection_id = %connection_id, "spectator joined");

    send_json(
        &tx,
        &ConnectionEstablished {
            r#type: "connection_established",
            game_id,
            user_id,
            username: username.clone(),
            connection_id: connection_id.clone(),
        },
    );
    send_room_state(&tx, &room);

    room.broadcast(&RoomMessage::SpectatorJoined(SpectatorPresence {
        game_id,
        user_id,
        username: username.clone(),
        spectators: room.spectator_count(),
        timestamp: now_timestamp(),
    }));

    while let Some(frame) = stream.next().await {
        let frame = match frame {
            Ok(frame) => frame,
            Err(err) => {
                debug!(connection_id = %connection_id, error = %err, "spectator read error");
                break;
            }
        };
        match frame {
            Message::Text(raw) => {
                handle_inbound(&room, &tx, game_id, user_id, &username, raw.as_str())
            }
            Message::Ping(payload) => {
                let _ = tx.send(Message::Pong(payload));
            }
            Message::Close(_) => break,
            _ => {}
        }
    }

    room.leave(&connection_id);
    room.broadcast(&RoomMessage::SpectatorLeft(SpectatorPresence {
        game_id,
        user_id,
        username,
        spectators: room.spectator_count(),
        timestamp: now_timestamp(),
    }));
    info!(game_id, user_id, connection_id = %connection_id, "spectator left");

    finalize(writer_task, tx);
}

fn handle_inbound(
    room: &GameRoom,
    tx: &mpsc::UnboundedSender<Message>,
    game_id: i64,
    user_id: i64,
    username: &str,
    raw: &str,
) {
    match SpectatorInboundMessage::from_json_str(raw) {
        SpectatorInboundMessage::Ping => {
            let _ = tx.send(Message::Text("{\"type\":\"pong\"}".into()));
        }
        SpectatorInboundMessage::Chat { message } => {
            room.broadcast(&RoomMessage::Chat(ChatMessage {
                game_id,
                user_id,
                username: username.to_string(),
                message,
                timestamp: now_timestamp(),
            }));
        }
        SpectatorInboundMessage::GetState => send_room_state(tx, room),
        SpectatorInboundMessage::GetEvents => {
            send_json(
                tx,
                &serde_json::json!({
                    "type": "events",
                    "game_id": game_id,
                    "events": room.recent_events(),
                }),
            );
        }
        SpectatorInboundMessage::Unknown => {
            debug!(game_id, user_id, "ignoring unknown spectator message");
        }
    }
}

fn send_room_state(tx: &mpsc::UnboundedSender<Message>, room: &GameRoom) {
    send_json(
        tx,
        &serde_json::json!({
            "type": "room_state",
            "state": RoomState {
                game_id: room.game_id(),
                spectators: room.spectator_count(),
                scoreboard: room.scoreboard(),
                recent_events: room.recent_events(),
            },
        }),
    );
}

fn send_json<T: serde::Serialize>(tx: &mpsc::UnboundedSender<Message>, payload: &T) {
    match serde_json::to_string(payload) {
        Ok(json) => {
            let _ = tx.send(Message::Text(json.into()));
        }
        Err(err) => warn!(error = %err, "failed to serialize socket payload"),
    }
}

fn spawn_writer(
    mut sink: SplitSink<WebSocket, Message>,
    mut rx: mpsc::UnboundedReceiver<Message>,
) -> JoinHandle<()> {
    tokio::spawn(async move {
        while let Some(message) = rx.recv().await {
            if sink.send(message).await.is_err() {
                break;
            }
        }
        let _ = sink.close().await;
    })
}

// Dropping the sender lets the writer drain its queue and exit on its own.
fn finalize(writer_task: JoinHandle<()>, tx: mpsc::UnboundedSender<Message>) {
    drop(tx);
    drop(writer_task);
}
