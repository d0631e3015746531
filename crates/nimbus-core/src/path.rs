//! Materialized-path helpers for the folder hierarchy.
//!
//! Every folder stores the absolute path of its parent container
//! (`parent_path`) and every file stores the absolute path of its containing
//! folder (`folder_path`). Containment is therefore encoded in strings, and
//! every structural operation on the tree reduces to the three functions in
//! this module. All of them are pure and total.
//!
//! Descendant matching is boundary-exact: `/Test` is an ancestor of
//! `/Test/a` but not of `/Test2`. A naive `starts_with` check conflates
//! sibling names that share a prefix, which corrupts subtree rewrites.

/// The root path.
pub const ROOT: &str = "/";

/// Compute a folder's full path from its parent path and name.
///
/// `full_path("/", "Docs")` is `/Docs`; `full_path("/Docs", "Q3")` is
/// `/Docs/Q3`.
pub fn full_path(parent_path: &str, name: &str) -> String {
    if parent_path == ROOT {
        format!("/{name}")
    } else {
        format!("{parent_path}/{name}")
    }
}

/// True iff `candidate` equals `ancestor` or lies strictly beneath it,
/// separated by a path boundary.
pub fn is_descendant_or_self(candidate: &str, ancestor: &str) -> bool {
    if ancestor == ROOT {
        return true;
    }
    match candidate.strip_prefix(ancestor) {
        Some("") => true,
        Some(rest) => rest.starts_with('/'),
        None => false,
    }
}

/// Rewrite the leading `old_prefix` of `path` to `new_prefix`.
///
/// The substitution only applies when `old_prefix` matches at a path
/// boundary; otherwise the input is returned unchanged. Re-applying a
/// completed substitution is therefore a no-op, which is what makes
/// retried subtree rewrites converge.
pub fn replace_prefix(path: &str, old_prefix: &str, new_prefix: &str) -> String {
    if !is_descendant_or_self(path, old_prefix) {
        return path.to_string();
    }
    let rest = &path[old_prefix.len()..];
    format!("{new_prefix}{rest}")
}

/// The parent path of a full path (`/` for top-level entries).
pub fn parent_of(path: &str) -> &str {
    match path.rfind('/') {
        Some(0) | None => ROOT,
        Some(idx) => &path[..idx],
    }
}

/// The leaf segment of a full path.
pub fn leaf_of(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Split a path into its non-empty segments.
pub fn segments(path: &str) -> impl Iterator<Item = &str> {
    path.split('/').filter(|s| !s.is_empty())
}

/// Normalize a client-supplied path: force a leading slash, collapse
/// repeated separators, strip a trailing slash (except for the root).
pub fn normalize(path: &str) -> String {
    let joined = segments(path).collect::<Vec<_>>().join("/");
    if joined.is_empty() {
        ROOT.to_string()
    } else {
        format!("/{joined}")
    }
}

/// True when `name` is usable as a path segment: non-empty after trimming
/// and free of separators.
pub fn is_valid_name(name: &str) -> bool {
    !name.trim().is_empty() && !name.contains('/')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_path_at_root_and_nested() {
        assert_eq!(full_path("/", "Docs"), "/Docs");
        assert_eq!(full_path("/Docs", "Q3"), "/Docs/Q3");
        assert_eq!(full_path("/Docs/Q3", "drafts"), "/Docs/Q3/drafts");
    }

    #[test]
    fn descendant_matching_is_boundary_exact() {
        assert!(is_descendant_or_self("/Test", "/Test"));
        assert!(is_descendant_or_self("/Test/a", "/Test"));
        assert!(is_descendant_or_self("/Test/a/b", "/Test"));
        // Sibling sharing a name prefix must not match.
        assert!(!is_descendant_or_self("/Test2", "/Test"));
        assert!(!is_descendant_or_self("/Test2/a", "/Test"));
        assert!(!is_descendant_or_self("/Tes", "/Test"));
    }

    #[test]
    fn everything_descends_from_root() {
        assert!(is_descendant_or_self("/", "/"));
        assert!(is_descendant_or_self("/a", "/"));
        assert!(is_descendant_or_self("/a/b/c", "/"));
    }

    #[test]
    fn replace_prefix_rewrites_matched_subtree_paths() {
        assert_eq!(replace_prefix("/A", "/A", "/X/A"), "/X/A");
        assert_eq!(replace_prefix("/A/b/c", "/A", "/X/A"), "/X/A/b/c");
    }

    #[test]
    fn replace_prefix_leaves_non_matches_unchanged() {
        assert_eq!(replace_prefix("/AB/c", "/A", "/X"), "/AB/c");
        assert_eq!(replace_prefix("/Test2", "/Test", "/Moved"), "/Test2");
    }

    #[test]
    fn replace_prefix_is_idempotent() {
        // Simulates a retried move: once the old prefix no longer matches,
        // re-applying the substitution changes nothing.
        let once = replace_prefix("/A/b", "/A", "/X/A");
        let twice = replace_prefix(&once, "/A", "/X/A");
        assert_eq!(once, "/X/A/b");
        assert_eq!(once, twice);
    }

    #[test]
    fn parent_and_leaf() {
        assert_eq!(parent_of("/Docs"), "/");
        assert_eq!(parent_of("/Docs/Q3"), "/Docs");
        assert_eq!(leaf_of("/Docs/Q3"), "Q3");
        assert_eq!(leaf_of("/Docs"), "Docs");
    }

    #[test]
    fn normalize_collapses_and_anchors() {
        assert_eq!(normalize(""), "/");
        assert_eq!(normalize("/"), "/");
        assert_eq!(normalize("a/b"), "/a/b");
        assert_eq!(normalize("/a//b/"), "/a/b");
    }

    #[test]
    fn name_validation() {
        assert!(is_valid_name("report.pdf"));
        assert!(!is_valid_name("  "));
        assert!(!is_valid_name("a/b"));
    }
}
