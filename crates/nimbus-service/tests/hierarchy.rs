//! Hierarchy engine behavior: create, move, rename, boundary exactness,
//! and permanent deletion.

mod common;

use bytes::Bytes;
use nimbus_core::error::ErrorKind;
use nimbus_core::types::{DeletedFilter, OwnerScope};
use nimbus_database::{FileStore, FolderStore};

use common::{TestEnv, user_ctx};

#[tokio::test]
async fn create_list_and_duplicate_rejection() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let docs = env.folder_svc.create(&ctx, &scope, "Docs", "/").await.unwrap();
    assert_eq!(docs.full_path(), "/Docs");

    let dup = env.folder_svc.create(&ctx, &scope, "Docs", "/").await;
    assert_eq!(dup.unwrap_err().kind, ErrorKind::DuplicateName);

    let q3 = env
        .folder_svc
        .create(&ctx, &scope, "Q3", "/Docs")
        .await
        .unwrap();
    assert_eq!(q3.full_path(), "/Docs/Q3");

    let children = env.folder_svc.list(&ctx, &scope, "/Docs").await.unwrap();
    assert_eq!(children.len(), 1);
    assert_eq!(children[0].name, "Q3");
}

#[tokio::test]
async fn create_requires_existing_parent() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let err = env
        .folder_svc
        .create(&ctx, &scope, "Q3", "/Missing")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}

#[tokio::test]
async fn move_rewrites_entire_subtree_and_files() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let a = env.folder_svc.create(&ctx, &scope, "A", "/").await.unwrap();
    env.folder_svc.create(&ctx, &scope, "b", "/A").await.unwrap();
    env.folder_svc
        .create(&ctx, &scope, "c", "/A/b")
        .await
        .unwrap();
    env.folder_svc.create(&ctx, &scope, "X", "/").await.unwrap();
    env.file_svc
        .upload(&ctx, &scope, "/A/b", "deep.txt", None, Bytes::from_static(b"x"))
        .await
        .unwrap();

    let moved = env.folder_svc.move_to(&ctx, a.id, "/X").await.unwrap();
    assert_eq!(moved.full_path(), "/X/A");

    // Every record beneath the moved folder re-derives to a consistent
    // tree: children's parent paths equal their parent's full path.
    let b = env
        .folders
        .find_by_location(&scope, "b", "/X/A", DeletedFilter::LiveOnly)
        .await
        .unwrap()
        .expect("b moved");
    let c = env
        .folders
        .find_by_location(&scope, "c", "/X/A/b", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert!(c.is_some());
    assert_eq!(b.full_path(), "/X/A/b");

    let files = env.file_svc.list(&ctx, &scope, "/X/A/b").await.unwrap();
    assert_eq!(files.len(), 1);
    assert_eq!(files[0].file_name, "deep.txt");
}

#[tokio::test]
async fn move_into_own_subtree_is_rejected_without_mutation() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let a = env.folder_svc.create(&ctx, &scope, "A", "/").await.unwrap();
    env.folder_svc.create(&ctx, &scope, "b", "/A").await.unwrap();

    for dest in ["/A", "/A/b"] {
        let err = env.folder_svc.move_to(&ctx, a.id, dest).await.unwrap_err();
        assert_eq!(err.kind, ErrorKind::InvalidMove, "dest {dest}");
    }

    // Nothing changed.
    let a_after = env.folder_svc.get(&ctx, a.id).await.unwrap();
    assert_eq!(a_after.full_path(), "/A");
    let b = env
        .folders
        .find_by_location(&scope, "b", "/A", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert!(b.is_some());
}

#[tokio::test]
async fn sibling_with_shared_name_prefix_is_untouched() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let test = env.folder_svc.create(&ctx, &scope, "Test", "/").await.unwrap();
    env.folder_svc
        .create(&ctx, &scope, "inner", "/Test")
        .await
        .unwrap();
    env.folder_svc.create(&ctx, &scope, "Test2", "/").await.unwrap();
    env.folder_svc
        .create(&ctx, &scope, "inner2", "/Test2")
        .await
        .unwrap();
    env.folder_svc.create(&ctx, &scope, "Dest", "/").await.unwrap();

    env.folder_svc.move_to(&ctx, test.id, "/Dest").await.unwrap();

    // /Test2's subtree kept its paths.
    let inner2 = env
        .folders
        .find_by_location(&scope, "inner2", "/Test2", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert!(inner2.is_some());
    // /Test's subtree moved.
    let inner = env
        .folders
        .find_by_location(&scope, "inner", "/Dest/Test", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert!(inner.is_some());
}

#[tokio::test]
async fn rename_rewrites_subtree() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let docs = env.folder_svc.create(&ctx, &scope, "Docs", "/").await.unwrap();
    env.folder_svc
        .create(&ctx, &scope, "Q3", "/Docs")
        .await
        .unwrap();
    env.file_svc
        .upload(&ctx, &scope, "/Docs/Q3", "r.txt", None, Bytes::from_static(b"r"))
        .await
        .unwrap();

    let renamed = env.folder_svc.rename(&ctx, docs.id, "Archive").await.unwrap();
    assert_eq!(renamed.full_path(), "/Archive");

    let files = env.file_svc.list(&ctx, &scope, "/Archive/Q3").await.unwrap();
    assert_eq!(files.len(), 1);
}

#[tokio::test]
async fn retried_move_converges() {
    let env = TestEnv::new();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let a = env.folder_svc.create(&ctx, &scope, "A", "/").await.unwrap();
    env.folder_svc.create(&ctx, &scope, "b", "/A").await.unwrap();
    env.folder_svc.create(&ctx, &scope, "X", "/").await.unwrap();

    env.folder_svc.move_to(&ctx, a.id, "/X").await.unwrap();
    // A second identical request is a no-op, not a second rewrite.
    env.folder_svc.move_to(&ctx, a.id, "/X").await.unwrap();

    let b = env
        .folders
        .find_by_location(&scope, "b", "/X/A", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert!(b.is_some());
    let stale = env
        .folders
        .find_by_location(&scope, "b", "/X/X/A", DeletedFilter::LiveOnly)
        .await
        .unwrap();
    assert!(stale.is_none());
}

#[tokio::test]
async fn permanent_delete_clears_metadata_even_when_blob_deletes_fail() {
    let env = TestEnv::with_failing_blob_deletes();
    let ctx = user_ctx();
    let scope = OwnerScope::User(ctx.user_id);

    let a = env.folder_svc.create(&ctx, &scope, "A", "/").await.unwrap();
    env.folder_svc.create(&ctx, &scope, "b", "/A").await.unwrap();
    env.file_svc
        .upload(&ctx, &scope, "/A/b", "f.txt", None, Bytes::from_static(b"f"))
        .await
        .unwrap();

    env.folder_svc.delete_permanently(&ctx, a.id).await.unwrap();

    assert!(env.folder_svc.get(&ctx, a.id).await.is_err());
    assert!(env
        .files
        .find_descendants(&scope, "/A", DeletedFilter::Any)
        .await
        .unwrap()
        .is_empty());
}

#[tokio::test]
async fn scopes_are_isolated() {
    let env = TestEnv::new();
    let alice = user_ctx();
    let bob = user_ctx();
    let alice_scope = OwnerScope::User(alice.user_id);

    let folder = env
        .folder_svc
        .create(&alice, &alice_scope, "Private", "/")
        .await
        .unwrap();

    let err = env.folder_svc.get(&bob, folder.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);

    let err = env
        .folder_svc
        .list(&bob, &alice_scope, "/")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);
}
