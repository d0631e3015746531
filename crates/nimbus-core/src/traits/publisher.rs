//! Event publication trait for realtime notifications.

use uuid::Uuid;

use crate::events::DomainEvent;

/// Delivers domain events to online users.
///
/// Delivery is best-effort: `publish` returns whether the event reached a
/// connected recipient, and callers never fail an operation because a
/// notification was dropped. Presence tracking lives entirely inside the
/// implementation (`nimbus-realtime`).
pub trait EventPublisher: Send + Sync + std::fmt::Debug + 'static {
    /// Publish an event to a single user. Returns `true` when delivered.
    fn publish(&self, user_id: Uuid, event: DomainEvent) -> bool;

    /// Publish an event to whatever user is connected under the given
    /// email. Shares and drive invitations address recipients by email,
    /// which may not belong to a registered account yet.
    fn publish_to_email(&self, _email: &str, _event: DomainEvent) -> bool {
        false
    }
}

/// Publisher that drops everything. Used in tests and tooling contexts
/// where no realtime hub is running.
#[derive(Debug, Default, Clone)]
pub struct NullPublisher;

impl EventPublisher for NullPublisher {
    fn publish(&self, _user_id: Uuid, _event: DomainEvent) -> bool {
        false
    }
}
