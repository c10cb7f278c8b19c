/**
 * Real-time Event System
 *
 * This module defines the events carried over the WebSocket channel in both
 * directions. Client events use snake_case type tags; server event names
 * keep the mixed casing the client protocol was built around
 * (`getOnlineUsers`, `newMessage`, `new_follow_request`, ...), so each
 * variant carries an explicit rename.
 *
 * Server events are broadcast best-effort: they are never acknowledged,
 * queued, or redelivered, and a failed delivery never fails the operation
 * that produced the event.
 */
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::shared::message::{Message, MessageStatus};

/// Events a client sends over its WebSocket connection
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ClientEvent {
    /// Binds the connection to an identity and marks it online
    UserConnected { user_id: Uuid },
    /// Relay: tell `to` that `from` requested to follow them
    FollowRequest { from: Uuid, to: Uuid },
    /// Relay: tell `followed_id` they gained a follower
    Follow { follower_id: Uuid, followed_id: Uuid },
    /// Relay: a follow edge was removed
    Unfollow {
        unfollower_id: Uuid,
        unfollowed_id: Uuid,
    },
    /// Relay: forward an already-persisted message to its receiver
    NewMessage {
        message: Message,
        from: Uuid,
        to: Uuid,
    },
}

/// Events the server pushes to connected clients
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "event", content = "data")]
pub enum ServerEvent {
    /// Full list of currently-online identities; sent to everyone whenever
    /// a connection is registered or dropped
    #[serde(rename = "getOnlineUsers")]
    OnlineUsers { users: Vec<Uuid> },

    /// A message was persisted with this client as receiver
    #[serde(rename = "newMessage")]
    NewMessage { message: Message },

    /// One message moved forward in the status lifecycle
    #[serde(rename = "messageStatusUpdate")]
    MessageStatusUpdate {
        message_id: Uuid,
        status: MessageStatus,
    },

    /// Every unread message from this client to `from` became read at once
    #[serde(rename = "bulkReadStatusUpdate")]
    BulkReadStatusUpdate { from: Uuid },

    /// Someone asked to follow this client
    #[serde(rename = "new_follow_request")]
    NewFollowRequest { from: Uuid },

    /// Someone now follows this client
    #[serde(rename = "newFollower")]
    NewFollower { follower_id: Uuid },

    /// A follow edge was removed; broadcast to every connection so any open
    /// chat between the pair can be invalidated
    #[serde(rename = "unfollowed")]
    Unfollowed {
        unfollower_id: Uuid,
        unfollowed_id: Uuid,
    },

    /// A follow request this client sent was accepted
    #[serde(rename = "requestAccepted")]
    RequestAccepted { by: Uuid },

    /// A follow request this client sent was rejected
    #[serde(rename = "requestRejected")]
    RequestRejected { by: Uuid },
}

impl ServerEvent {
    /// Event name as it appears on the wire
    pub fn name(&self) -> &'static str {
        match self {
            ServerEvent::OnlineUsers { .. } => "getOnlineUsers",
            ServerEvent::NewMessage { .. } => "newMessage",
            ServerEvent::MessageStatusUpdate { .. } => "messageStatusUpdate",
            ServerEvent::BulkReadStatusUpdate { .. } => "bulkReadStatusUpdate",
            ServerEvent::NewFollowRequest { .. } => "new_follow_request",
            ServerEvent::NewFollower { .. } => "newFollower",
            ServerEvent::Unfollowed { .. } => "unfollowed",
            ServerEvent::RequestAccepted { .. } => "requestAccepted",
            ServerEvent::RequestRejected { .. } => "requestRejected",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_event_uses_snake_case_tag() {
        let event = ClientEvent::UserConnected {
            user_id: Uuid::nil(),
        };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["type"], "user_connected");
    }

    #[test]
    fn test_server_event_wire_names() {
        let event = ServerEvent::OnlineUsers { users: vec![] };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "getOnlineUsers");

        let event = ServerEvent::NewFollowRequest { from: Uuid::nil() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], "new_follow_request");
        assert_eq!(json["data"]["from"], Uuid::nil().to_string());
    }

    #[test]
    fn test_client_event_roundtrip() {
        let event = ClientEvent::Follow {
            follower_id: Uuid::new_v4(),
            followed_id: Uuid::new_v4(),
        };
        let json = serde_json::to_string(&event).unwrap();
        let back: ClientEvent = serde_json::from_str(&json).unwrap();
        assert_eq!(event, back);
    }

    #[test]
    fn test_event_name_matches_serialized_tag() {
        let event = ServerEvent::BulkReadStatusUpdate { from: Uuid::nil() };
        let json = serde_json::to_value(&event).unwrap();
        assert_eq!(json["event"], event.name());
    }
}
