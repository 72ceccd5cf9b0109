use dashmap::DashMap;
use tokio::sync::broadcast;

use crate::dto::ws::RoomEvent;

/// Fan-out hub with one broadcast channel per join-code room.
///
/// A room is the set of live subscribers (host, players, spectators) for one
/// join code. Channels are created lazily on first subscription; broadcasts
/// to rooms nobody listens to are dropped silently.
pub struct RoomHub {
    capacity: usize,
    channels: DashMap<String, broadcast::Sender<RoomEvent>>,
}

impl RoomHub {
    /// Construct a hub whose per-room channels hold `capacity` pending events.
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            channels: DashMap::new(),
        }
    }

    /// Register a new subscriber for the given room.
    pub fn subscribe(&self, join_code: &str) -> broadcast::Receiver<RoomEvent> {
        self.channels
            .entry(join_code.to_owned())
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Send an event to every current subscriber of the room, ignoring
    /// delivery errors.
    pub fn broadcast(&self, join_code: &str, event: RoomEvent) {
        if let Some(sender) = self.channels.get(join_code) {
            let _ = sender.send(event);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn events_reach_every_room_subscriber() {
        let hub = RoomHub::new(8);
        let mut first = hub.subscribe("123456");
        let mut second = hub.subscribe("123456");
        let mut other_room = hub.subscribe("654321");

        hub.broadcast("123456", RoomEvent::GameStarted);

        assert!(matches!(first.recv().await, Ok(RoomEvent::GameStarted)));
        assert!(matches!(second.recv().await, Ok(RoomEvent::GameStarted)));
        assert!(other_room.try_recv().is_err());
    }

    #[tokio::test]
    async fn broadcast_without_subscribers_is_dropped() {
        let hub = RoomHub::new(8);
        hub.broadcast("123456", RoomEvent::GameStarted);

        // A later subscriber only sees events sent after it joined.
        let mut late = hub.subscribe("123456");
        assert!(late.try_recv().is_err());
    }
}
