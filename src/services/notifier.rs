use std::collections::HashMap;
use std::sync::Mutex;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::Message;

/// Event pushed to everyone listening on a conversation
#[derive(Debug, Clone)]
pub enum RoomEvent {
    NewMessage(Message),
}

impl RoomEvent {
    pub fn name(&self) -> &'static str {
        match self {
            RoomEvent::NewMessage(_) => "new_message",
        }
    }

    /// Render as a Server-Sent Events frame
    pub fn to_sse_frame(&self) -> String {
        let data = match self {
            RoomEvent::NewMessage(message) => serde_json::to_string(message),
        }
        .unwrap_or_else(|_| "{}".to_string());

        format!("event: {}\ndata: {}\n\n", self.name(), data)
    }
}

/// Fire-and-forget fan-out of conversation events
///
/// One broadcast channel per conversation ("room"). Rooms are created lazily
/// by subscribers and dropped on the first publish that finds nobody
/// listening. Publishing never blocks and never fails the caller.
pub struct MessageHub {
    rooms: Mutex<HashMap<Uuid, broadcast::Sender<RoomEvent>>>,
    capacity: usize,
}

impl MessageHub {
    pub fn new(capacity: usize) -> Self {
        Self {
            rooms: Mutex::new(HashMap::new()),
            capacity: capacity.max(1),
        }
    }

    /// Join a room; rooms whose listeners have all gone are dropped first
    pub fn subscribe(&self, room: Uuid) -> broadcast::Receiver<RoomEvent> {
        let mut rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());
        rooms.retain(|_, sender| sender.receiver_count() > 0);
        rooms
            .entry(room)
            .or_insert_with(|| broadcast::channel(self.capacity).0)
            .subscribe()
    }

    /// Deliver to current subscribers; returns how many received the event
    pub fn publish(&self, room: Uuid, event: RoomEvent) -> usize {
        let mut rooms = self.rooms.lock().unwrap_or_else(|e| e.into_inner());

        let Some(sender) = rooms.get(&room) else {
            return 0;
        };

        match sender.send(event) {
            Ok(delivered) => delivered,
            Err(_) => {
                rooms.remove(&room);
                tracing::trace!("Dropped room {} with no listeners", room);
                0
            }
        }
    }

    pub fn room_count(&self) -> usize {
        self.rooms.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

impl Default for MessageHub {
    fn default() -> Self {
        Self::new(64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn message(conversation_id: Uuid) -> Message {
        Message {
            id: Uuid::new_v4(),
            conversation_id,
            sender_id: Uuid::new_v4(),
            content: "Hi, are you free on Friday?".to_string(),
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_subscriber_receives_published_message() {
        let hub = MessageHub::default();
        let room = Uuid::new_v4();
        let mut rx = hub.subscribe(room);

        let delivered = hub.publish(room, RoomEvent::NewMessage(message(room)));
        assert_eq!(delivered, 1);

        let RoomEvent::NewMessage(received) = rx.recv().await.unwrap();
        assert_eq!(received.conversation_id, room);
    }

    #[test]
    fn test_publish_without_listeners_is_noop() {
        let hub = MessageHub::default();
        let room = Uuid::new_v4();

        assert_eq!(hub.publish(room, RoomEvent::NewMessage(message(room))), 0);
        assert_eq!(hub.room_count(), 0);
    }

    #[test]
    fn test_room_dropped_after_last_listener_leaves() {
        let hub = MessageHub::default();
        let room = Uuid::new_v4();

        let rx = hub.subscribe(room);
        assert_eq!(hub.room_count(), 1);
        drop(rx);

        assert_eq!(hub.publish(room, RoomEvent::NewMessage(message(room))), 0);
        assert_eq!(hub.room_count(), 0);
    }

    #[test]
    fn test_abandoned_rooms_pruned_on_subscribe() {
        let hub = MessageHub::default();

        for _ in 0..5 {
            drop(hub.subscribe(Uuid::new_v4()));
        }
        let _live = hub.subscribe(Uuid::new_v4());

        assert_eq!(hub.room_count(), 1);
    }

    #[test]
    fn test_rooms_are_isolated() {
        let hub = MessageHub::default();
        let room_a = Uuid::new_v4();
        let room_b = Uuid::new_v4();
        let mut rx_b = hub.subscribe(room_b);
        let _rx_a = hub.subscribe(room_a);

        hub.publish(room_a, RoomEvent::NewMessage(message(room_a)));

        assert!(rx_b.try_recv().is_err());
    }

    #[test]
    fn test_sse_frame_format() {
        let room = Uuid::new_v4();
        let frame = RoomEvent::NewMessage(message(room)).to_sse_frame();

        assert!(frame.starts_with("event: new_message\ndata: {"));
        assert!(frame.ends_with("\n\n"));
        assert!(frame.contains(&room.to_string()));

        let data = frame
            .trim_end()
            .strip_prefix("event: new_message\ndata: ")
            .unwrap();
        let decoded: Message = serde_json::from_str(data).unwrap();
        assert_eq!(decoded.conversation_id, room);
    }
}
