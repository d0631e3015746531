//! Shared-drive membership, roles, and cross-scope moves.

mod common;

use bytes::Bytes;
use nimbus_core::error::ErrorKind;
use nimbus_core::types::OwnerScope;
use nimbus_entity::drive::DriveRole;

use common::{TestEnv, user_ctx};

#[tokio::test]
async fn creator_is_admin_and_members_gain_access() {
    let env = TestEnv::new();
    let owner = user_ctx();
    let member = user_ctx();

    let drive = env
        .drive_svc
        .create(&owner, "Design", "shared assets")
        .await
        .unwrap();
    assert!(env.drive_svc.list(&owner).await.unwrap().len() == 1);

    // Not yet a member.
    let err = env.drive_svc.get(&member, drive.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);

    env.drive_svc
        .add_member(&owner, drive.id, &member.email, DriveRole::Editor)
        .await
        .unwrap();
    assert!(env.drive_svc.get(&member, drive.id).await.is_ok());
    assert_eq!(env.drive_svc.list(&member).await.unwrap().len(), 1);
}

#[tokio::test]
async fn viewers_cannot_mutate_drive_content() {
    let env = TestEnv::new();
    let owner = user_ctx();
    let viewer = user_ctx();

    let drive = env.drive_svc.create(&owner, "Team", "").await.unwrap();
    env.drive_svc
        .add_member(&owner, drive.id, &viewer.email, DriveRole::Viewer)
        .await
        .unwrap();

    let scope = OwnerScope::Drive(drive.id);
    let err = env
        .folder_svc
        .create(&viewer, &scope, "Docs", "/")
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);

    // Reading is fine.
    env.folder_svc.create(&owner, &scope, "Docs", "/").await.unwrap();
    let (folders, files) = env.drive_svc.contents(&viewer, drive.id, "/").await.unwrap();
    assert_eq!(folders.len(), 1);
    assert!(files.is_empty());
}

#[tokio::test]
async fn membership_management_requires_admin_and_protects_the_owner() {
    let env = TestEnv::new();
    let owner = user_ctx();
    let editor = user_ctx();

    let drive = env.drive_svc.create(&owner, "Team", "").await.unwrap();
    env.drive_svc
        .add_member(&owner, drive.id, &editor.email, DriveRole::Editor)
        .await
        .unwrap();

    // Editors cannot manage membership.
    let err = env
        .drive_svc
        .add_member(&editor, drive.id, "x@example.com", DriveRole::Viewer)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);

    // The owner cannot be demoted or removed.
    let err = env
        .drive_svc
        .update_member_role(&owner, drive.id, &owner.email, DriveRole::Viewer)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);
    let err = env
        .drive_svc
        .remove_member(&owner, drive.id, &owner.email)
        .await
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);

    // Admins can change and remove other members.
    env.drive_svc
        .update_member_role(&owner, drive.id, &editor.email, DriveRole::Admin)
        .await
        .unwrap();
    env.drive_svc
        .remove_member(&owner, drive.id, &editor.email)
        .await
        .unwrap();
    let err = env.drive_svc.get(&editor, drive.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);
}

#[tokio::test]
async fn files_move_between_personal_space_and_drives() {
    let env = TestEnv::new();
    let owner = user_ctx();
    let personal = OwnerScope::User(owner.user_id);

    let drive = env.drive_svc.create(&owner, "Team", "").await.unwrap();
    let file = env
        .file_svc
        .upload(&owner, &personal, "/", "notes.md", None, Bytes::from_static(b"s"))
        .await
        .unwrap();

    let moved = env
        .drive_svc
        .move_file_in(&owner, file.id, drive.id, "/")
        .await
        .unwrap();
    assert_eq!(moved.owner_id, None);
    assert_eq!(moved.drive_id, Some(drive.id));

    // Visible in the drive, gone from the personal root.
    let (_, drive_files) = env.drive_svc.contents(&owner, drive.id, "/").await.unwrap();
    assert_eq!(drive_files.len(), 1);
    assert!(env.file_svc.list(&owner, &personal, "/").await.unwrap().is_empty());

    let back = env
        .drive_svc
        .move_file_out(&owner, file.id, "/")
        .await
        .unwrap();
    assert_eq!(back.owner_id, Some(owner.user_id));
    assert_eq!(back.drive_id, None);
}

#[tokio::test]
async fn only_the_owner_deletes_a_drive_and_content_goes_with_it() {
    let env = TestEnv::new();
    let owner = user_ctx();
    let admin = user_ctx();

    let drive = env.drive_svc.create(&owner, "Team", "").await.unwrap();
    env.drive_svc
        .add_member(&owner, drive.id, &admin.email, DriveRole::Admin)
        .await
        .unwrap();
    let scope = OwnerScope::Drive(drive.id);
    env.file_svc
        .upload(&owner, &scope, "/", "a.txt", None, Bytes::from_static(b"a"))
        .await
        .unwrap();

    let err = env.drive_svc.delete(&admin, drive.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::AccessDenied);

    env.drive_svc.delete(&owner, drive.id).await.unwrap();
    let err = env.drive_svc.get(&owner, drive.id).await.unwrap_err();
    assert_eq!(err.kind, ErrorKind::NotFound);
}
