/**
 * Real-time Event Broadcasting
 *
 * One process-wide `tokio::sync::broadcast` channel carries every outbound
 * event, wrapped in an `Envelope` that is either addressed to a single
 * identity or to all connections. Connection tasks subscribe to the channel
 * and forward what is addressed to them.
 *
 * Sending is fire-and-forget from the caller's point of view: a send with
 * no subscribers is not an error, and a slow subscriber that lags the
 * channel drops events rather than backpressuring the producer.
 */

use tokio::sync::broadcast;
use uuid::Uuid;

use crate::backend::presence::PresenceRegistry;
use crate::shared::event::ServerEvent;

/// An event plus its addressing
#[derive(Debug, Clone)]
pub struct Envelope {
    /// `None` means every connection; `Some(id)` means only connections
    /// bound to that identity
    pub target: Option<Uuid>,
    pub event: ServerEvent,
}

/// Process-wide event bus
pub type EventBus = broadcast::Sender<Envelope>;

/// Capacity of the event bus. Events past this many unconsumed entries are
/// dropped for the lagging subscriber only.
pub const EVENT_BUS_CAPACITY: usize = 1000;

/// Create the event bus
pub fn event_bus() -> EventBus {
    broadcast::channel(EVENT_BUS_CAPACITY).0
}

/// Broadcast an event to every connected client
///
/// Returns the number of subscribers that received the envelope.
pub fn broadcast_all(bus: &EventBus, event: ServerEvent) -> usize {
    let name = event.name();
    match bus.send(Envelope {
        target: None,
        event,
    }) {
        Ok(subscriber_count) => {
            tracing::debug!(event = name, subscriber_count, "event broadcast");
            subscriber_count
        }
        Err(_) => {
            // No subscribers, that's okay
            tracing::debug!(event = name, "no subscribers for broadcast");
            0
        }
    }
}

/// Push an event to a single identity if it is online
///
/// No-op when the identity has no live connection. Delivery is best-effort;
/// failures are swallowed and never propagate to the caller. Returns
/// whether the identity was online at push time.
pub fn push_to_user(
    bus: &EventBus,
    presence: &PresenceRegistry,
    user_id: Uuid,
    event: ServerEvent,
) -> bool {
    if !presence.is_online(user_id) {
        tracing::debug!(%user_id, event = event.name(), "push skipped, user offline");
        return false;
    }

    let name = event.name();
    if bus
        .send(Envelope {
            target: Some(user_id),
            event,
        })
        .is_err()
    {
        tracing::debug!(%user_id, event = name, "push had no subscribers");
    }
    true
}
