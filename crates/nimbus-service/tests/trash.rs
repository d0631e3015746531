//! Trash lifecycle behavior.

mod common;

use bytes::Bytes;
use nimbus_core::error::ErrorKind;
use nimbus_core::types::OwnerScope;

use common::{TestEnv, user_ctx};

#[tokio::test]
async fn trashing_a_folder_cascades_and_hides_contents() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let docs = env.folder_svc.create(&ctx, &scope, "Docs", "/").await.unwrap();
    env.folder_svc
        .create(&ctx, &scope, "Q3", "/Docs")
        .await
        .unwrap();
    let file = env
        .file_svc
        .upload(&ctx, &scope, "/Docs/Q3", "r.txt", None, Bytes::from_static(b"r"))
        .await
        .unwrap();

    env.trash_svc.trash_folder(&ctx, docs.id).await.unwrap();

    // Gone from live listings and live lookups.
    assert!(env.folder_svc.list(&ctx, &scope, "/").await.unwrap().is_empty());
    assert!(env.file_svc.get(&ctx, file.id).await.is_err());
    assert_eq!(
        env.folder_svc.get(&ctx, docs.id).await.unwrap_err().kind,
        ErrorKind::NotFound
    );
}

#[tokio::test]
async fn trash_listing_shows_roots_with_days_remaining() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let docs = env.folder_svc.create(&ctx, &scope, "Docs", "/").await.unwrap();
    env.folder_svc
        .create(&ctx, &scope, "Q3", "/Docs")
        .await
        .unwrap();
    env.file_svc
        .upload(&ctx, &scope, "/Docs", "a.txt", None, Bytes::from_static(b"a"))
        .await
        .unwrap();
    let loose = env
        .file_svc
        .upload(&ctx, &scope, "/", "loose.txt", None, Bytes::from_static(b"l"))
        .await
        .unwrap();

    env.trash_svc.trash_folder(&ctx, docs.id).await.unwrap();
    env.trash_svc.trash_file(&ctx, loose.id).await.unwrap();

    let listing = env.trash_svc.list(&ctx).await.unwrap();
    // Only the cascade root and the loose file show, not Q3 or a.txt.
    assert_eq!(listing.folders.len(), 1);
    assert_eq!(listing.folders[0].folder.name, "Docs");
    assert_eq!(listing.files.len(), 1);
    assert_eq!(listing.files[0].file.file_name, "loose.txt");
    assert_eq!(listing.folders[0].days_remaining, 30);
}

#[tokio::test]
async fn restore_brings_the_subtree_back() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let docs = env.folder_svc.create(&ctx, &scope, "Docs", "/").await.unwrap();
    let file = env
        .file_svc
        .upload(&ctx, &scope, "/Docs", "a.txt", None, Bytes::from_static(b"a"))
        .await
        .unwrap();

    env.trash_svc.trash_folder(&ctx, docs.id).await.unwrap();
    env.trash_svc.restore_folder(&ctx, docs.id).await.unwrap();

    let restored = env.file_svc.get(&ctx, file.id).await.unwrap();
    assert_eq!(restored.folder_path, "/Docs");
    assert_eq!(
        env.folder_svc.list(&ctx, &scope, "/").await.unwrap().len(),
        1
    );
}

#[tokio::test]
async fn permanent_delete_and_empty_clear_records_despite_blob_failures() {
    let env = TestEnv::with_failing_blob_deletes();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let a = env
        .file_svc
        .upload(&ctx, &scope, "/", "a.txt", None, Bytes::from_static(b"a"))
        .await
        .unwrap();
    let b = env
        .file_svc
        .upload(&ctx, &scope, "/", "b.txt", None, Bytes::from_static(b"b"))
        .await
        .unwrap();

    env.trash_svc.trash_file(&ctx, a.id).await.unwrap();
    env.trash_svc.trash_file(&ctx, b.id).await.unwrap();

    env.trash_svc.delete_file_permanently(&ctx, a.id).await.unwrap();
    let removed = env.trash_svc.empty(&ctx).await.unwrap();
    assert_eq!(removed, 1);
    assert!(env.trash_svc.list(&ctx).await.unwrap().files.is_empty());
}

#[tokio::test]
async fn restoring_a_live_folder_is_not_found() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let docs = env.folder_svc.create(&ctx, &scope, "Docs", "/").await.unwrap();
    let err = env.trash_svc.restore_folder(&ctx, docs.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
