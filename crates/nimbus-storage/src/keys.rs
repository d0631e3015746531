//! Blob key layout.
//!
//! Keys are namespaced by owning scope so drive blobs and personal blobs
//! never collide, and each upload gets a fresh UUID segment so two files
//! with the same name keep distinct blobs.

use uuid::Uuid;

use nimbus_core::types::OwnerScope;

/// Build the object-store key for a newly uploaded file.
pub fn blob_key(scope: &OwnerScope, file_name: &str) -> String {
    match scope {
        OwnerScope::User(owner_id) => {
            format!("users/{}/{}-{}", owner_id, Uuid::new_v4(), file_name)
        }
        OwnerScope::Drive(drive_id) => {
            format!("drives/{}/{}-{}", drive_id, Uuid::new_v4(), file_name)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_are_scope_namespaced_and_unique() {
        let scope = OwnerScope::User(Uuid::new_v4());
        let a = blob_key(&scope, "report.pdf");
        let b = blob_key(&scope, "report.pdf");
        assert!(a.starts_with("users/"));
        assert!(a.ends_with("-report.pdf"));
        assert_ne!(a, b);
    }
}
