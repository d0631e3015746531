//! Shared-drive domain entities.

pub mod member;
pub mod model;

pub use member::{DriveMember, DriveRole};
pub use model::SharedDrive;
