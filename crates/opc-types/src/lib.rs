//! Wire types shared by the browser core and its consumers.
//!
//! Field names are a persisted contract for programmatic consumers:
//! `items`, `total`, `offset`, `limit`, `errors`, `name`, `itemId`,
//! `isBranch`, `path`. Zero-valued and absent fields are left out when
//! serializing and defaulted when deserializing.

use serde::{Deserialize, Serialize};

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_zero(value: &u16) -> bool {
    *value == 0
}

#[allow(clippy::trivially_copy_pass_by_ref)]
fn is_false(value: &bool) -> bool {
    !*value
}

/// A browse request: which node to list and which window of its children.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Query {
    /// Slash-delimited path from the root. Back-slashes are accepted too.
    pub path: String,
    pub offset: u16,
    pub limit: u16,
}

impl Query {
    pub fn new(path: impl Into<String>, offset: u16, limit: u16) -> Self {
        Self {
            path: path.into(),
            offset,
            limit,
        }
    }
}

/// One child of a browsed node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct Tag {
    #[serde(skip_serializing_if = "String::is_empty")]
    pub name: String,
    /// Opaque handle used to read/write the data point. Leaves only.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub item_id: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub is_branch: bool,
    /// Full slash-joined path, including the item's own name.
    #[serde(skip_serializing_if = "String::is_empty")]
    pub path: String,
}

impl Tag {
    pub fn branch(name: impl Into<String>, path: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            item_id: None,
            is_branch: true,
            path: path.into(),
        }
    }

    pub fn leaf(
        name: impl Into<String>,
        item_id: impl Into<String>,
        path: impl Into<String>,
    ) -> Self {
        Self {
            name: name.into(),
            item_id: Some(item_id.into()),
            is_branch: false,
            path: path.into(),
        }
    }
}

/// Result of a single browse call.
///
/// When `errors` is present the call failed and `items`/`total` must not be
/// trusted. Otherwise `items` holds the requested window and `total` the
/// number of children at the node, independent of the window.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ItemsTag {
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<Tag>,
    #[serde(skip_serializing_if = "is_zero")]
    pub total: u16,
    #[serde(skip_serializing_if = "is_zero")]
    pub offset: u16,
    #[serde(skip_serializing_if = "is_zero")]
    pub limit: u16,
    #[serde(alias = "Errors", skip_serializing_if = "Option::is_none")]
    pub errors: Option<Vec<String>>,
}

impl ItemsTag {
    /// Builds a failed result carrying the given messages.
    pub fn failed(errors: Vec<String>) -> Self {
        Self {
            errors: Some(errors),
            ..Self::default()
        }
    }

    pub fn is_err(&self) -> bool {
        self.errors.as_ref().is_some_and(|errors| !errors.is_empty())
    }

    /// Error messages, empty on success.
    pub fn errors(&self) -> &[String] {
        self.errors.as_deref().unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn test_tag_uses_camel_case_field_names() {
        let tag = Tag::leaf("TagA", "Group1.TagA", "/Group1/TagA");
        let value = serde_json::to_value(&tag).unwrap();
        assert_eq!(
            value,
            json!({"name": "TagA", "itemId": "Group1.TagA", "path": "/Group1/TagA"})
        );
    }

    #[test]
    fn test_branch_omits_item_id() {
        let tag = Tag::branch("Group1", "/Group1");
        let value = serde_json::to_value(&tag).unwrap();
        assert_eq!(
            value,
            json!({"name": "Group1", "isBranch": true, "path": "/Group1"})
        );
    }

    #[test]
    fn test_items_tag_omits_zero_fields() {
        let result = ItemsTag::default();
        assert_eq!(serde_json::to_string(&result).unwrap(), "{}");
    }

    #[test]
    fn test_failed_items_tag_serializes_errors_only() {
        let result = ItemsTag::failed(vec!["Connection failed".into(), "refused".into()]);
        let value = serde_json::to_value(&result).unwrap();
        assert_eq!(value, json!({"errors": ["Connection failed", "refused"]}));
        assert!(result.is_err());
    }

    #[test]
    fn test_items_tag_accepts_legacy_errors_key() {
        let parsed: ItemsTag =
            serde_json::from_str(r#"{"Errors": ["Offset is greater than total items"]}"#).unwrap();
        assert_eq!(parsed.errors(), ["Offset is greater than total items"]);
        assert!(parsed.items.is_empty());
        assert_eq!(parsed.total, 0);
    }

    #[test]
    fn test_query_defaults_missing_fields() {
        let query: Query = serde_json::from_str(r#"{"path": "Group1"}"#).unwrap();
        assert_eq!(query, Query::new("Group1", 0, 0));
    }

    #[test]
    fn test_empty_errors_is_not_a_failure() {
        let result = ItemsTag {
            errors: Some(Vec::new()),
            ..ItemsTag::default()
        };
        assert!(!result.is_err());
    }
}
