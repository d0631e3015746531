//! # nimbus-service
//!
//! Business logic for Nimbus Drive. Each service orchestrates the store
//! traits, the blob store, the mailer, and the realtime publisher to
//! implement application-level use cases.
//!
//! Services follow constructor injection — all dependencies are provided
//! at construction time via `Arc` references.

pub mod access;
pub mod context;
pub mod drive;
pub mod file;
pub mod folder;
pub mod mailer;
pub mod search;
pub mod share;
pub mod starred;
pub mod storage;
pub mod trash;

pub use access::AccessControl;
pub use context::RequestContext;
pub use drive::DriveService;
pub use file::FileService;
pub use folder::{ConflictAction, ExportService, FolderService, ImportService, ImportSummary};
pub use mailer::LogMailer;
pub use search::{SearchResults, SearchService};
pub use share::{LinkService, ShareAccess, ShareService, SharedItem};
pub use starred::{StarredListing, StarredService};
pub use storage::{StorageUsage, UsageService};
pub use trash::{TrashListing, TrashService, TrashedFile, TrashedFolder};
