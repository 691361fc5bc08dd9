//! Error types for provider calls and browse operations.

use std::fmt;

/// Failure of a single call into a namespace provider.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("{message}")]
pub struct ProviderError {
    /// One-line summary suitable for display
    pub message: String,
}

impl ProviderError {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }

    /// A named child, tag or server that the provider does not know.
    pub fn not_found(what: &str, name: &str) -> Self {
        Self::new(format!("{what} '{name}' not found"))
    }
}

/// Result type for provider operations.
pub type ProviderResult<T> = std::result::Result<T, ProviderError>;

/// Cursor and session calls, named after the automation methods they stand for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorCall {
    CreateBrowser,
    MoveToRoot,
    ShowBranches,
    ShowLeafs,
    Count,
    Item,
    GetItemId,
}

impl CursorCall {
    pub fn as_str(self) -> &'static str {
        match self {
            CursorCall::CreateBrowser => "CreateBrowser",
            CursorCall::MoveToRoot => "MoveToRoot",
            CursorCall::ShowBranches => "ShowBranches",
            CursorCall::ShowLeafs => "ShowLeafs",
            CursorCall::Count => "Count",
            CursorCall::Item => "Item",
            CursorCall::GetItemId => "GetItemID",
        }
    }
}

impl fmt::Display for CursorCall {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a browse call failed.
///
/// Converted to the string-list `errors` field of `ItemsTag` only at the
/// result boundary, see [`BrowseError::messages`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum BrowseError {
    /// The session to the server could not be established.
    #[error("connection to '{server}' failed")]
    Connection {
        server: String,
        #[source]
        source: ProviderError,
    },
    /// A path segment is not a child branch at its level.
    #[error("cannot move down to '{segment}'")]
    Navigation {
        segment: String,
        #[source]
        source: ProviderError,
    },
    /// The requested offset lies past the last child.
    #[error("offset {offset} is greater than total items ({total})")]
    Range { offset: u16, total: u16 },
    /// Any other cursor call failed.
    #[error("{call} failed")]
    Provider {
        call: CursorCall,
        #[source]
        source: ProviderError,
    },
}

impl BrowseError {
    pub const RANGE_MESSAGE: &'static str = "Offset is greater than total items";

    pub fn provider(call: CursorCall) -> impl FnOnce(ProviderError) -> Self {
        move |source| BrowseError::Provider { call, source }
    }

    /// Wire form: a stage label followed by the underlying detail.
    pub fn messages(&self) -> Vec<String> {
        match self {
            BrowseError::Connection { source, .. } => {
                vec!["Connection failed".to_string(), source.to_string()]
            }
            BrowseError::Navigation { segment, source } => {
                vec![
                    format!("Cannot move down to '{segment}'"),
                    source.to_string(),
                ]
            }
            BrowseError::Range { .. } => vec![Self::RANGE_MESSAGE.to_string()],
            BrowseError::Provider { call, source } => {
                vec![format!("Cannot call method {call}"), source.to_string()]
            }
        }
    }
}
