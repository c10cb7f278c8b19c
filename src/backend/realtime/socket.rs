/**
 * WebSocket Endpoint
 *
 * One connection per active client. The connection is anonymous until the
 * client sends a `user_connected` event binding it to an identity; from
 * then on the connection receives every envelope addressed to everyone or
 * to that identity.
 *
 * # Connection lifecycle
 *
 * 1. Client upgrades at `GET /ws`
 * 2. Client sends `user_connected` with its identity; the registry maps
 *    identity -> this connection and the online list is broadcast
 * 3. Inbound events are handled (presence registration, client relays);
 *    outbound envelopes are filtered and forwarded
 * 4. On close, the registry entry is removed only if this connection still
 *    owns it, and the online list is broadcast again
 *
 * Clients may also relay `follow_request` / `follow` / `unfollow` /
 * `new_message` events through the socket; the server resolves the target
 * identity and forwards the server-side counterpart event.
 */

use axum::{
    extract::{
        ws::{Message as WsMessage, WebSocket, WebSocketUpgrade},
        State,
    },
    response::Response,
};
use futures_util::{SinkExt, StreamExt};
use uuid::Uuid;

use crate::backend::presence::PresenceRegistry;
use crate::backend::realtime::broadcast::{broadcast_all, push_to_user, EventBus};
use crate::backend::server::state::AppState;
use crate::shared::event::{ClientEvent, ServerEvent};

/// Handle WebSocket upgrade (GET /ws)
pub async fn handle_socket_upgrade(
    State(state): State<AppState>,
    ws: WebSocketUpgrade,
) -> Response {
    ws.on_upgrade(move |socket| run_connection(state, socket))
}

/// Drive one connection until it closes
async fn run_connection(state: AppState, socket: WebSocket) {
    let conn_id = Uuid::new_v4();
    let (mut sink, mut stream) = socket.split();
    let mut bus_rx = state.events.subscribe();
    let mut identity: Option<Uuid> = None;

    tracing::debug!(%conn_id, "websocket connected");

    loop {
        tokio::select! {
            inbound = stream.next() => {
                match inbound {
                    Some(Ok(WsMessage::Text(text))) => {
                        match serde_json::from_str::<ClientEvent>(text.as_str()) {
                            Ok(event) => {
                                handle_client_event(
                                    &state.presence,
                                    &state.events,
                                    conn_id,
                                    &mut identity,
                                    event,
                                );
                            }
                            Err(e) => {
                                tracing::warn!(%conn_id, "unparseable client event: {}", e);
                            }
                        }
                    }
                    Some(Ok(WsMessage::Close(_))) | None => break,
                    // Pings are answered by axum; binary frames are not part
                    // of the protocol
                    Some(Ok(_)) => {}
                    Some(Err(e)) => {
                        tracing::warn!(%conn_id, "websocket read failure: {}", e);
                        break;
                    }
                }
            }
            outbound = bus_rx.recv() => {
                match outbound {
                    Ok(envelope) => {
                        let addressed_here =
                            envelope.target.is_none() || envelope.target == identity;
                        if !addressed_here {
                            continue;
                        }
                        let frame = match serde_json::to_string(&envelope.event) {
                            Ok(json) => json,
                            Err(e) => {
                                tracing::error!("failed to serialize event: {}", e);
                                continue;
                            }
                        };
                        if sink.send(WsMessage::Text(frame.into())).await.is_err() {
                            break;
                        }
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Lagged(skipped)) => {
                        tracing::warn!(%conn_id, skipped, "connection lagged event bus");
                    }
                    Err(tokio::sync::broadcast::error::RecvError::Closed) => break,
                }
            }
        }
    }

    // The registry ignores this if the identity already reconnected on a
    // newer connection.
    if let Some(user_id) = state.presence.disconnect(conn_id) {
        tracing::debug!(%conn_id, %user_id, "websocket disconnected");
        broadcast_all(
            &state.events,
            ServerEvent::OnlineUsers {
                users: state.presence.online_users(),
            },
        );
    }
}

/// Apply one inbound client event
///
/// `identity` is the identity this connection has bound itself to, updated
/// in place when a `user_connected` event arrives.
pub fn handle_client_event(
    presence: &PresenceRegistry,
    bus: &EventBus,
    conn_id: Uuid,
    identity: &mut Option<Uuid>,
    event: ClientEvent,
) {
    match event {
        ClientEvent::UserConnected { user_id } => {
            *identity = Some(user_id);
            presence.connect(user_id, conn_id);
            broadcast_all(
                bus,
                ServerEvent::OnlineUsers {
                    users: presence.online_users(),
                },
            );
        }
        ClientEvent::FollowRequest { from, to } => {
            push_to_user(bus, presence, to, ServerEvent::NewFollowRequest { from });
        }
        ClientEvent::Follow {
            follower_id,
            followed_id,
        } => {
            push_to_user(
                bus,
                presence,
                followed_id,
                ServerEvent::NewFollower { follower_id },
            );
        }
        ClientEvent::Unfollow {
            unfollower_id,
            unfollowed_id,
        } => {
            // Any connected client may have the pair's chat open, so the
            // invalidation goes to everyone.
            broadcast_all(
                bus,
                ServerEvent::Unfollowed {
                    unfollower_id,
                    unfollowed_id,
                },
            );
        }
        ClientEvent::NewMessage { message, from, to } => {
            let mut message = message;
            message.sender_id = from;
            message.receiver_id = to;
            push_to_user(bus, presence, to, ServerEvent::NewMessage { message });
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::realtime::broadcast::event_bus;

    #[tokio::test]
    async fn test_user_connected_registers_and_broadcasts_online_list() {
        let presence = PresenceRegistry::new();
        let bus = event_bus();
        let mut rx = bus.subscribe();
        let conn_id = Uuid::new_v4();
        let user_id = Uuid::new_v4();
        let mut identity = None;

        handle_client_event(
            &presence,
            &bus,
            conn_id,
            &mut identity,
            ClientEvent::UserConnected { user_id },
        );

        assert_eq!(identity, Some(user_id));
        assert!(presence.is_online(user_id));

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.target, None);
        match envelope.event {
            ServerEvent::OnlineUsers { users } => assert_eq!(users, vec![user_id]),
            other => panic!("expected OnlineUsers, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_follow_request_relay_targets_recipient() {
        let presence = PresenceRegistry::new();
        let bus = event_bus();
        let from = Uuid::new_v4();
        let to = Uuid::new_v4();
        presence.connect(to, Uuid::new_v4());
        let mut rx = bus.subscribe();

        handle_client_event(
            &presence,
            &bus,
            Uuid::new_v4(),
            &mut None,
            ClientEvent::FollowRequest { from, to },
        );

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.target, Some(to));
        assert_eq!(envelope.event, ServerEvent::NewFollowRequest { from });
    }

    #[tokio::test]
    async fn test_relay_to_offline_recipient_emits_nothing() {
        let presence = PresenceRegistry::new();
        let bus = event_bus();
        let mut rx = bus.subscribe();

        handle_client_event(
            &presence,
            &bus,
            Uuid::new_v4(),
            &mut None,
            ClientEvent::Follow {
                follower_id: Uuid::new_v4(),
                followed_id: Uuid::new_v4(),
            },
        );

        assert!(rx.try_recv().is_err());
    }

    #[tokio::test]
    async fn test_unfollow_relay_broadcasts_globally() {
        let presence = PresenceRegistry::new();
        let bus = event_bus();
        let mut rx = bus.subscribe();

        handle_client_event(
            &presence,
            &bus,
            Uuid::new_v4(),
            &mut None,
            ClientEvent::Unfollow {
                unfollower_id: Uuid::new_v4(),
                unfollowed_id: Uuid::new_v4(),
            },
        );

        let envelope = rx.recv().await.unwrap();
        assert_eq!(envelope.target, None);
    }
}
