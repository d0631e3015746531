//! Scope selection shared by folder and file endpoints.
//!
//! Personal content is the default; passing `drive_id` switches the
//! operation to a shared drive. The service layer enforces membership.

use serde::Deserialize;
use uuid::Uuid;

use nimbus_core::types::OwnerScope;
use nimbus_service::RequestContext;

/// Common query parameters for content listings.
#[derive(Debug, Clone, Deserialize)]
pub struct ScopeQuery {
    /// Path within the scope; defaults to the root.
    #[serde(default = "default_path")]
    pub path: String,
    /// Shared-drive id; absent means personal space.
    pub drive_id: Option<Uuid>,
}

fn default_path() -> String {
    "/".to_string()
}

impl ScopeQuery {
    /// Resolves the owner scope for the authenticated user.
    pub fn scope(&self, ctx: &RequestContext) -> OwnerScope {
        resolve_scope(ctx, self.drive_id)
    }
}

/// Personal scope unless a drive id is given.
pub fn resolve_scope(ctx: &RequestContext, drive_id: Option<Uuid>) -> OwnerScope {
    match drive_id {
        Some(id) => OwnerScope::Drive(id),
        None => OwnerScope::User(ctx.user_id),
    }
}
