//! Path resolution against a cursor.

use crate::error::{BrowseError, CursorCall};
use crate::provider::HierarchyCursor;

/// Splits a browse path into its non-empty segments.
///
/// Back-slashes count as separators, so `a\b`, `a/b`, `/a/b/` and `a//b`
/// all yield `["a", "b"]`.
pub fn segments(path: &str) -> Vec<&str> {
    path.split(['/', '\\'])
        .filter(|segment| !segment.is_empty())
        .collect()
}

/// Path of the child `name` under the node at `key`.
///
/// The root key is empty, so root children come out as `/name`.
pub fn child_path(key: &str, name: &str) -> String {
    format!("{key}/{name}")
}

/// Moves `cursor` from the root down to `path` and returns its key.
///
/// # Errors
/// Returns [`BrowseError::Navigation`] naming the first segment the cursor
/// rejects.
pub fn resolve(cursor: &mut dyn HierarchyCursor, path: &str) -> Result<String, BrowseError> {
    cursor
        .reset_to_root()
        .map_err(BrowseError::provider(CursorCall::MoveToRoot))?;

    let segments = segments(path);
    for segment in &segments {
        tracing::debug!(segment, "move down");
        cursor
            .step_into(segment)
            .map_err(|source| BrowseError::Navigation {
                segment: (*segment).to_string(),
                source,
            })?;
    }
    Ok(segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::browser::testing::{FakeCursor, FakeNode};

    #[test]
    fn test_separators_normalize_to_same_segments() {
        for path in ["a\\b", "a/b", "/a/b/", "a//b", "\\a\\\\b\\"] {
            assert_eq!(segments(path), ["a", "b"], "path {path:?}");
        }
        assert!(segments("").is_empty());
        assert!(segments("///").is_empty());
    }

    #[test]
    fn test_child_path_joins_key_and_name() {
        assert_eq!(child_path("", "Group1"), "/Group1");
        assert_eq!(child_path("a/b", "Tag"), "a/b/Tag");
    }

    #[test]
    fn test_resolve_steps_through_each_segment() {
        let tree = FakeNode::new()
            .branch("a", FakeNode::new().branch("b", FakeNode::new().leaf("x")));
        for path in ["a\\b", "a/b", "/a/b/", "a//b"] {
            let mut cursor = FakeCursor::new(&tree);
            assert_eq!(resolve(&mut cursor, path).unwrap(), "a/b");
            assert_eq!(cursor.steps(), ["a", "b"]);
            assert_eq!(cursor.depth(), 2);
        }
    }

    #[test]
    fn test_resolve_empty_path_stays_at_root() {
        let tree = FakeNode::new().branch("a", FakeNode::new());
        let mut cursor = FakeCursor::new(&tree);
        assert_eq!(resolve(&mut cursor, "").unwrap(), "");
        assert!(cursor.steps().is_empty());
        assert_eq!(cursor.resets(), 1);
    }

    #[test]
    fn test_resolve_unknown_segment_is_navigation_error() {
        let tree = FakeNode::new().branch("a", FakeNode::new());
        let mut cursor = FakeCursor::new(&tree);
        let err = resolve(&mut cursor, "a/missing/c").unwrap_err();
        match err {
            BrowseError::Navigation { segment, .. } => assert_eq!(segment, "missing"),
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
