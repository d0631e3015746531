//! Mail delivery backends.

use async_trait::async_trait;
use tracing::info;

use nimbus_core::result::AppResult;
use nimbus_core::traits::mailer::Mailer;

/// Mailer that records sends in the log instead of delivering them.
/// Used in development and tests, and as the default when no mail
/// transport is configured.
#[derive(Debug, Default, Clone)]
pub struct LogMailer;

#[async_trait]
impl Mailer for LogMailer {
    async fn send_share_notification(
        &self,
        to: &str,
        from: &str,
        resource_name: &str,
        resource_type: &str,
        link: &str,
    ) -> AppResult<()> {
        info!(to, from, resource_name, resource_type, link, "Share notification mail");
        Ok(())
    }

    async fn send_drive_invitation(
        &self,
        to: &str,
        from: &str,
        drive_name: &str,
        role: &str,
    ) -> AppResult<()> {
        info!(to, from, drive_name, role, "Drive invitation mail");
        Ok(())
    }
}
