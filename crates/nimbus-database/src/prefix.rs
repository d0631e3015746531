//! SQL helpers for boundary-exact materialized-path prefix matching.
//!
//! Subtree queries match `path = prefix OR path LIKE prefix || '/%'`. The
//! `LIKE` pattern must escape wildcard characters occurring in folder
//! names, otherwise a folder named `100%` would match unrelated paths.

/// Escape `LIKE` wildcard characters in a literal path.
pub fn escape_like(literal: &str) -> String {
    literal
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}

/// Build the `LIKE` pattern matching strict descendants of `prefix`.
pub fn descendant_pattern(prefix: &str) -> String {
    format!("{}/%", escape_like(prefix))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn escapes_wildcards() {
        assert_eq!(escape_like("/100%/a_b"), "/100\\%/a\\_b");
        assert_eq!(escape_like("/plain"), "/plain");
    }

    #[test]
    fn descendant_pattern_appends_boundary() {
        assert_eq!(descendant_pattern("/Test"), "/Test/%");
        // The pattern never matches the sibling "/Test2".
        assert_eq!(descendant_pattern("/a_b"), "/a\\_b/%");
    }
}
