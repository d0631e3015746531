//! Outbound mail trait.

use async_trait::async_trait;

use crate::result::AppResult;

/// Sends transactional mail for sharing and drive membership.
///
/// Mail delivery is an external collaborator; the sharing layer treats a
/// send failure as advisory and never fails the enclosing operation on it.
#[async_trait]
pub trait Mailer: Send + Sync + std::fmt::Debug + 'static {
    /// Notify `to` that `from` shared a resource with them.
    async fn send_share_notification(
        &self,
        to: &str,
        from: &str,
        resource_name: &str,
        resource_type: &str,
        link: &str,
    ) -> AppResult<()>;

    /// Notify `to` that `from` added them to a shared drive.
    async fn send_drive_invitation(
        &self,
        to: &str,
        from: &str,
        drive_name: &str,
        role: &str,
    ) -> AppResult<()>;
}
