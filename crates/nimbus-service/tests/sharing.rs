//! Share lifecycle: creation, listing, token access, expiry, revocation.

mod common;

use bytes::Bytes;
use chrono::{Duration, Utc};
use nimbus_core::error::ErrorKind;
use nimbus_core::types::OwnerScope;
use nimbus_entity::share::{ResourceType, SharePermission};

use common::{TestEnv, user_ctx};

#[tokio::test]
async fn share_grants_token_access_to_a_file() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let file = env
        .file_svc
        .upload(&ctx, &scope, "/", "report.pdf", None, Bytes::from_static(b"pdf"))
        .await
        .unwrap();

    let share = env
        .share_svc
        .create(
            &ctx,
            ResourceType::File,
            file.id,
            "friend@example.com",
            SharePermission::Download,
            None,
        )
        .await
        .unwrap();
    assert_eq!(share.token.len(), 64);

    let access = env.share_svc.access_by_token(&share.token).await.unwrap();
    assert_eq!(access.file.unwrap().id, file.id);
    let url = access.url.unwrap();
    assert!(url.contains("disposition=attachment"));
}

#[tokio::test]
async fn unknown_token_is_not_found_but_expired_is_gone() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let file = env
        .file_svc
        .upload(&ctx, &scope, "/", "a.txt", None, Bytes::from_static(b"a"))
        .await
        .unwrap();

    let err = env.share_svc.access_by_token("deadbeef").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);

    let expired = env
        .share_svc
        .create(
            &ctx,
            ResourceType::File,
            file.id,
            "friend@example.com",
            SharePermission::View,
            Some(Utc::now() - Duration::hours(1)),
        )
        .await
        .unwrap();
    let err = env.share_svc.access_by_token(&expired.token).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Gone);
}

#[tokio::test]
async fn only_the_owner_may_share_and_only_the_creator_may_revoke() {
    let env = TestEnv::new();
    let owner = user_ctx();
    let stranger = user_ctx();
    let scope = OwnerScope::User(owner.user_id);

    let file = env
        .file_svc
        .upload(&owner, &scope, "/", "a.txt", None, Bytes::from_static(b"a"))
        .await
        .unwrap();

    let err = env
        .share_svc
        .create(
            &stranger,
            ResourceType::File,
            file.id,
            "x@example.com",
            SharePermission::View,
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);

    let share = env
        .share_svc
        .create(
            &owner,
            ResourceType::File,
            file.id,
            "x@example.com",
            SharePermission::View,
            None,
        )
        .await
        .unwrap();
    let err = env.share_svc.revoke(&stranger, share.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);
    env.share_svc.revoke(&owner, share.id).await.unwrap();
    assert!(env.share_svc.list_sent(&owner).await.unwrap().is_empty());
}

#[tokio::test]
async fn listings_resolve_resource_names() {
    let env = TestEnv::new();
    let owner = user_ctx();
    let recipient = user_ctx();
    let scope = OwnerScope::User(owner.user_id);

    let folder = env
        .folder_svc
        .create(&owner, &scope, "Shared stuff", "/")
        .await
        .unwrap();
    env.share_svc
        .create(
            &owner,
            ResourceType::Folder,
            folder.id,
            &recipient.email,
            SharePermission::View,
            None,
        )
        .await
        .unwrap();

    let received = env.share_svc.list_received(&recipient).await.unwrap();
    assert_eq!(received.len(), 1);
    assert_eq!(received[0].resource_name.as_deref(), Some("Shared stuff"));

    let sent = env.share_svc.list_sent(&owner).await.unwrap();
    assert_eq!(sent.len(), 1);
}

#[tokio::test]
async fn share_recipient_email_is_validated_and_normalized() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let file = env
        .file_svc
        .upload(&ctx, &scope, "/", "a.txt", None, Bytes::from_static(b"a"))
        .await
        .unwrap();

    let err = env
        .share_svc
        .create(
            &ctx,
            ResourceType::File,
            file.id,
            "not-an-email",
            SharePermission::View,
            None,
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let share = env
        .share_svc
        .create(
            &ctx,
            ResourceType::File,
            file.id,
            "  Friend@Example.COM ",
            SharePermission::View,
            None,
        )
        .await
        .unwrap();
    assert_eq!(share.shared_with, "friend@example.com");
}
