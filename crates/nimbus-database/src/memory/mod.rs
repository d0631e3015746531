//! In-memory store implementations.
//!
//! Single-node backends holding everything in `RwLock<HashMap>` maps.
//! Used when `database.backend = "memory"` and throughout the service
//! test suites; they honor the same boundary-exact path semantics as the
//! PostgreSQL stores.

pub mod drive;
pub mod file;
pub mod folder;
pub mod share;

pub use drive::MemoryDriveStore;
pub use file::MemoryFileStore;
pub use folder::MemoryFolderStore;
pub use share::MemoryShareStore;

use nimbus_core::types::DeletedFilter;

pub(crate) fn matches_filter(is_deleted: bool, filter: DeletedFilter) -> bool {
    match filter {
        DeletedFilter::LiveOnly => !is_deleted,
        DeletedFilter::DeletedOnly => is_deleted,
        DeletedFilter::Any => true,
    }
}
