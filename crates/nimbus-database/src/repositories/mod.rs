//! PostgreSQL store implementations.

pub mod drive;
pub mod file;
pub mod folder;
pub mod share;

pub use drive::PgDriveStore;
pub use file::PgFileStore;
pub use folder::PgFolderStore;
pub use share::PgShareStore;

use nimbus_core::types::DeletedFilter;

/// SQL fragment applying a soft-delete filter.
pub(crate) fn deleted_clause(filter: DeletedFilter) -> &'static str {
    match filter {
        DeletedFilter::LiveOnly => " AND is_deleted = FALSE",
        DeletedFilter::DeletedOnly => " AND is_deleted = TRUE",
        DeletedFilter::Any => "",
    }
}
