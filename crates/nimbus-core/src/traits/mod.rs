//! Traits for external collaborators.

pub mod blob;
pub mod mailer;
pub mod publisher;

pub use blob::BlobStore;
pub use mailer::Mailer;
pub use publisher::{EventPublisher, NullPublisher};
