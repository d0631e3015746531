//! Archive import and export behavior.

mod common;

use std::io::Cursor;

use nimbus_core::types::{DeletedFilter, OwnerScope};
use nimbus_database::{FileStore, FolderStore};
use nimbus_service::ConflictAction;

use common::{TestEnv, make_zip, user_ctx};

#[tokio::test]
async fn import_materializes_folders_from_file_parents() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let archive = make_zip(&[
        ("docs/", b""),
        ("docs/readme.md", b"hello"),
        ("docs/deep/notes.txt", b"notes"),
        ("top.txt", b"top"),
    ]);

    let summary = env
        .import_svc
        .import(&ctx, &scope, "/", "bundle.zip", archive, ConflictAction::Rename)
        .await
        .unwrap();
    assert_eq!(summary.root_path, "/bundle");
    assert_eq!(summary.files, 3);

    // Every ancestor of a file entry exists.
    for (name, parent) in [
        ("bundle", "/"),
        ("docs", "/bundle"),
        ("deep", "/bundle/docs"),
    ] {
        let found = env
            .folders
            .find_by_location(&scope, name, parent, DeletedFilter::LiveOnly)
            .await
            .unwrap();
        assert!(found.is_some(), "missing folder {parent}/{name}");
    }

    let files = env
        .files
        .find_descendants(&scope, "/bundle", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert_eq!(files.len(), 3);
}

#[tokio::test]
async fn import_skips_directory_only_entries() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    // "empty/" holds no files, so it never becomes a folder record.
    let archive = make_zip(&[("empty/", b""), ("readme.txt", b"hi")]);
    let summary = env
        .import_svc
        .import(&ctx, &scope, "/", "pack.zip", archive, ConflictAction::Merge)
        .await
        .unwrap();
    assert_eq!(summary.files, 1);
    assert_eq!(summary.folders, 1, "the archive root only");

    let empty = env
        .folders
        .find_by_location(&scope, "empty", "/pack", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert!(empty.is_none());
}

#[tokio::test]
async fn conflict_action_defaults_to_merge() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let archive = make_zip(&[("a.txt", b"a")]);
    for _ in 0..2 {
        env.import_svc
            .import(
                &ctx,
                &scope,
                "/",
                "pack.zip",
                archive.clone(),
                ConflictAction::default(),
            )
            .await
            .unwrap();
    }

    // Merging twice leaves a single root, not "pack (1)".
    let roots = env.folders.list_children(&scope, "/").await.unwrap();
    assert_eq!(roots.len(), 1);
    assert_eq!(roots[0].name, "pack");
}

#[tokio::test]
async fn import_creates_missing_intermediate_folders() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    // No explicit directory entries: a/b/c.txt alone must imply a and a/b.
    let archive = make_zip(&[("a/b/c.txt", b"c")]);
    env.import_svc
        .import(&ctx, &scope, "/", "tree.zip", archive, ConflictAction::Rename)
        .await
        .unwrap();

    let a = env
        .folders
        .find_by_location(&scope, "a", "/tree", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    let b = env
        .folders
        .find_by_location(&scope, "b", "/tree/a", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert!(a.is_some());
    assert!(b.is_some());
}

#[tokio::test]
async fn merge_import_is_idempotent() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let archive = make_zip(&[("docs/a.txt", b"v1")]);
    env.import_svc
        .import(
            &ctx,
            &scope,
            "/",
            "pack.zip",
            archive.clone(),
            ConflictAction::Merge,
        )
        .await
        .unwrap();
    env.import_svc
        .import(&ctx, &scope, "/", "pack.zip", archive, ConflictAction::Merge)
        .await
        .unwrap();

    // One folder record per path, one file record per name.
    let folders = env
        .folders
        .find_descendants(&scope, "/", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert_eq!(folders.len(), 2, "pack and pack/docs only");
    let files = env
        .files
        .find_descendants(&scope, "/pack", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn rename_import_picks_a_fresh_name() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let archive = make_zip(&[("a.txt", b"a")]);
    let first = env
        .import_svc
        .import(
            &ctx,
            &scope,
            "/",
            "pack.zip",
            archive.clone(),
            ConflictAction::Rename,
        )
        .await
        .unwrap();
    let second = env
        .import_svc
        .import(&ctx, &scope, "/", "pack.zip", archive, ConflictAction::Rename)
        .await
        .unwrap();

    assert_eq!(first.root_path, "/pack");
    assert_eq!(second.root_path, "/pack (1)");
}

#[tokio::test]
async fn replace_import_drops_the_previous_subtree() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let old = make_zip(&[("old.txt", b"old")]);
    env.import_svc
        .import(&ctx, &scope, "/", "pack.zip", old, ConflictAction::Merge)
        .await
        .unwrap();
    let new = make_zip(&[("new.txt", b"new")]);
    env.import_svc
        .import(&ctx, &scope, "/", "pack.zip", new, ConflictAction::Replace)
        .await
        .unwrap();

    let files = env
        .files
        .find_descendants(&scope, "/pack", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name, "new.txt");
}

#[tokio::test]
async fn export_round_trips_the_subtree() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let docs = env.folder_svc.create(&ctx, &scope, "Docs", "/").await.unwrap();
    env.folder_svc
        .create(&ctx, &scope, "empty", "/Docs")
        .await
        .unwrap();
    env.file_svc
        .upload(
            &ctx,
            &scope,
            "/Docs",
            "a.txt",
            None,
            bytes::Bytes::from_static(b"alpha"),
        )
        .await
        .unwrap();

    let (name, data) = env.export_svc.export_zip(&ctx, docs.id).await.unwrap();
    assert_eq!(name, "Docs.zip");

    let mut archive = zip::ZipArchive::new(Cursor::new(data.to_vec())).unwrap();
    let names: Vec<String> = (0..archive.len())
        .map(|i| archive.by_index(i).unwrap().name().to_string())
        .collect();
    assert!(names.contains(&"Docs/".to_string()));
    assert!(names.contains(&"Docs/empty/".to_string()));
    assert!(names.contains(&"Docs/a.txt".to_string()));
}
