//! Name search over a user's personal space.

use std::sync::Arc;

use serde::{Deserialize, Serialize};

use nimbus_core::error::AppError;
use nimbus_core::result::AppResult;
use nimbus_database::{FileStore, FolderStore};
use nimbus_entity::file::File;
use nimbus_entity::folder::Folder;

use crate::context::RequestContext;

/// Shortest query the search accepts.
const MIN_QUERY_LEN: usize = 2;
/// Result cap per kind.
const RESULT_LIMIT: i64 = 10;

/// Search hits across both kinds.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResults {
    /// Matching live folders.
    pub folders: Vec<Folder>,
    /// Matching live files.
    pub files: Vec<File>,
}

/// Case-insensitive substring search over names.
#[derive(Debug, Clone)]
pub struct SearchService {
    folders: Arc<dyn FolderStore>,
    files: Arc<dyn FileStore>,
}

impl SearchService {
    /// Creates a new search service.
    pub fn new(folders: Arc<dyn FolderStore>, files: Arc<dyn FileStore>) -> Self {
        Self { folders, files }
    }

    /// Searches the requester's live personal items by name.
    pub async fn search(&self, ctx: &RequestContext, query: &str) -> AppResult<SearchResults> {
        let query = query.trim();
        if query.chars().count() < MIN_QUERY_LEN {
            return Err(AppError::validation(format!(
                "Search query must be at least {MIN_QUERY_LEN} characters"
            )));
        }
        Ok(SearchResults {
            folders: self.folders.search(ctx.user_id, query, RESULT_LIMIT).await?,
            files: self.files.search(ctx.user_id, query, RESULT_LIMIT).await?,
        })
    }
}
