//! File operations: upload semantics, quota, signed URLs, search,
//! starring, and usage reporting.

mod common;

use bytes::Bytes;
use nimbus_core::config::storage::StorageConfig;
use nimbus_core::error::ErrorKind;
use nimbus_core::types::OwnerScope;

use common::{TestEnv, user_ctx};

#[tokio::test]
async fn upload_replaces_a_file_with_the_same_name() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let first = env
        .file_svc
        .upload(&ctx, &scope, "/", "a.txt", None, Bytes::from_static(b"v1"))
        .await
        .unwrap();
    let second = env
        .file_svc
        .upload(&ctx, &scope, "/", "a.txt", None, Bytes::from_static(b"v2!"))
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(second.size_bytes, 3);
    assert_eq!(env.file_svc.list(&ctx, &scope, "/").await.unwrap().len(), 1);
}

#[tokio::test]
async fn upload_requires_an_existing_destination_folder() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let err = env
        .file_svc
        .upload(&ctx, &scope, "/Missing", "a.txt", None, Bytes::from_static(b"a"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn quota_and_size_limits_are_enforced() {
    let env = TestEnv::with_storage_config(StorageConfig {
        max_upload_size_bytes: 8,
        user_quota_bytes: 10,
        ..StorageConfig::default()
    });
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let err = env
        .file_svc
        .upload(
            &ctx,
            &scope,
            "/",
            "big.bin",
            None,
            Bytes::from_static(b"123456789"),
        )
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    env.file_svc
        .upload(&ctx, &scope, "/", "a.bin", None, Bytes::from_static(b"123456"))
        .await
        .unwrap();
    let err = env
        .file_svc
        .upload(&ctx, &scope, "/", "b.bin", None, Bytes::from_static(b"123456"))
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);
}

#[tokio::test]
async fn signed_urls_differ_for_preview_and_download() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let file = env
        .file_svc
        .upload(&ctx, &scope, "/", "a.txt", None, Bytes::from_static(b"a"))
        .await
        .unwrap();

    let preview = env.file_svc.preview_url(&ctx, file.id).await.unwrap();
    let download = env.file_svc.download_url(&ctx, file.id).await.unwrap();
    assert!(preview.contains("expires_in=300"));
    assert!(!preview.contains("disposition"));
    assert!(download.contains("disposition=attachment"));
}

#[tokio::test]
async fn move_and_rename_reject_destination_conflicts() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    env.folder_svc.create(&ctx, &scope, "Docs", "/").await.unwrap();
    let a = env
        .file_svc
        .upload(&ctx, &scope, "/", "a.txt", None, Bytes::from_static(b"a"))
        .await
        .unwrap();
    env.file_svc
        .upload(&ctx, &scope, "/Docs", "a.txt", None, Bytes::from_static(b"x"))
        .await
        .unwrap();

    let err = env.file_svc.move_to(&ctx, a.id, "/Docs").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateName);

    let b = env
        .file_svc
        .upload(&ctx, &scope, "/", "b.txt", None, Bytes::from_static(b"b"))
        .await
        .unwrap();
    let err = env.file_svc.rename(&ctx, b.id, "a.txt").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::DuplicateName);

    let moved = env.file_svc.move_to(&ctx, b.id, "/Docs").await.unwrap();
    assert_eq!(moved.folder_path, "/Docs");
}

#[tokio::test]
async fn search_requires_two_characters_and_caps_results() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    for i in 0..15 {
        env.file_svc
            .upload(
                &ctx,
                &scope,
                "/",
                &format!("report-{i:02}.txt"),
                None,
                Bytes::from_static(b"r"),
            )
            .await
            .unwrap();
    }

    let err = env.search_svc.search(&ctx, "r").await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::Validation);

    let results = env.search_svc.search(&ctx, "REPORT").await.unwrap();
    assert_eq!(results.files.len(), 10);
    assert!(results.folders.is_empty());
}

#[tokio::test]
async fn starring_toggles_and_lists() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let folder = env.folder_svc.create(&ctx, &scope, "Docs", "/").await.unwrap();
    let file = env
        .file_svc
        .upload(&ctx, &scope, "/", "a.txt", None, Bytes::from_static(b"a"))
        .await
        .unwrap();

    assert!(env.starred_svc.toggle_folder(&ctx, folder.id).await.unwrap());
    assert!(env.starred_svc.toggle_file(&ctx, file.id).await.unwrap());

    let listing = env.starred_svc.list(&ctx).await.unwrap();
    assert_eq!(listing.folders.len(), 1);
    assert_eq!(listing.files.len(), 1);

    assert!(!env.starred_svc.toggle_file(&ctx, file.id).await.unwrap());
    assert!(env.starred_svc.list(&ctx).await.unwrap().files.is_empty());
}

#[tokio::test]
async fn usage_reports_live_bytes_only() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    env.file_svc
        .upload(
            &ctx,
            &scope,
            "/",
            "a.txt",
            Some("text/plain".into()),
            Bytes::from_static(b"aaaa"),
        )
        .await
        .unwrap();
    let trashed = env
        .file_svc
        .upload(
            &ctx,
            &scope,
            "/",
            "b.txt",
            Some("text/plain".into()),
            Bytes::from_static(b"bbbb"),
        )
        .await
        .unwrap();
    env.trash_svc.trash_file(&ctx, trashed.id).await.unwrap();

    let usage = env.usage_svc.usage(&ctx).await.unwrap();
    assert_eq!(usage.used_bytes, 4);
    assert_eq!(usage.file_count, 1);
    assert_eq!(usage.breakdown.len(), 1);
}
