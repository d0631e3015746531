//! In-process event hub.
//!
//! Services publish [`DomainEvent`]s keyed by user id or email; connected
//! clients hold the receiving half of an unbounded channel that the API
//! layer drains into a WebSocket. Publishing to a user
//! with no open connection is a no-op.

use dashmap::DashMap;
use tokio::sync::mpsc;
use tracing::debug;
use uuid::Uuid;

use nimbus_core::events::DomainEvent;
use nimbus_core::traits::publisher::EventPublisher;

/// Connection registry and fan-out point for domain events.
#[derive(Debug, Default)]
pub struct EventHub {
    connections: DashMap<Uuid, mpsc::UnboundedSender<DomainEvent>>,
    emails: DashMap<String, Uuid>,
}

impl EventHub {
    /// Create an empty hub.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a connection for a user, replacing any previous one.
    /// Returns the receiving half for the subscriber loop.
    pub fn subscribe(&self, user_id: Uuid, email: &str) -> mpsc::UnboundedReceiver<DomainEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.connections.insert(user_id, tx);
        self.emails.insert(email.to_lowercase(), user_id);
        debug!(%user_id, connections = self.connections.len(), "Client subscribed");
        rx
    }

    /// Drop a user's connection.
    pub fn disconnect(&self, user_id: Uuid) {
        self.connections.remove(&user_id);
        self.emails.retain(|_, id| *id != user_id);
        debug!(%user_id, connections = self.connections.len(), "Client disconnected");
    }

    /// Number of connected clients.
    pub fn connection_count(&self) -> usize {
        self.connections.len()
    }
}

impl EventPublisher for EventHub {
    fn publish(&self, user_id: Uuid, event: DomainEvent) -> bool {
        match self.connections.get(&user_id) {
            Some(tx) => {
                if tx.send(event).is_err() {
                    // Receiver dropped without disconnecting.
                    drop(tx);
                    self.connections.remove(&user_id);
                    false
                } else {
                    true
                }
            }
            None => false,
        }
    }

    fn publish_to_email(&self, email: &str, event: DomainEvent) -> bool {
        match self.emails.get(&email.to_lowercase()) {
            Some(user_id) => self.publish(*user_id, event),
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn publishes_to_subscribed_user() {
        let hub = EventHub::new();
        let user_id = Uuid::new_v4();
        let mut rx = hub.subscribe(user_id, "a@example.com");

        assert!(hub.publish(
            user_id,
            DomainEvent::FileUploaded {
                file_id: Uuid::new_v4(),
                file_name: "a.txt".into(),
                folder_path: "/".into(),
            },
        ));
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn publish_without_subscriber_is_noop() {
        let hub = EventHub::new();
        assert!(!hub.publish(
            Uuid::new_v4(),
            DomainEvent::FolderMoved {
                folder_id: Uuid::new_v4(),
                old_path: "/a".into(),
                new_path: "/b".into(),
            },
        ));
    }

    #[tokio::test]
    async fn resolves_recipients_by_email() {
        let hub = EventHub::new();
        let user_id = Uuid::new_v4();
        let mut rx = hub.subscribe(user_id, "b@example.com");

        assert!(hub.publish_to_email(
            "B@Example.com",
            DomainEvent::ShareCreated {
                share_id: Uuid::new_v4(),
                resource_type: "file".into(),
                resource_name: "a.txt".into(),
                shared_by: "a@example.com".into(),
            },
        ));
        assert!(rx.recv().await.is_some());
    }

    #[tokio::test]
    async fn disconnect_removes_connection() {
        let hub = EventHub::new();
        let user_id = Uuid::new_v4();
        let _rx = hub.subscribe(user_id, "c@example.com");
        assert_eq!(hub.connection_count(), 1);
        hub.disconnect(user_id);
        assert_eq!(hub.connection_count(), 0);
        assert!(!hub.publish_to_email(
            "c@example.com",
            DomainEvent::FolderMoved {
                folder_id: Uuid::new_v4(),
                old_path: "/a".into(),
                new_path: "/b".into(),
            },
        ));
    }
}
