//! Paginated browsing of a server's tag namespace.
//!
//! Every call to [`Browser::browse`] opens its own session and cursor, walks
//! to the requested path, lists one window of children and closes the
//! session again before returning. Nothing is cached between calls.
//!
//! - `navigator`: path normalization and cursor descent
//! - `paginator`: branch/leaf windowing
//! - `assembler`: conversion to the `ItemsTag` wire value

pub mod assembler;
pub mod navigator;
pub mod paginator;

#[cfg(test)]
pub(crate) mod testing;

use opc_types::{ItemsTag, Query};

pub use self::paginator::Page;
use crate::error::{BrowseError, CursorCall};
use crate::provider::SessionFactory;

/// Browses one server through a provider.
pub struct Browser<F> {
    factory: F,
    server: String,
    nodes: Vec<String>,
}

impl<F: SessionFactory> Browser<F> {
    /// Creates a browser after checking the server can be reached.
    ///
    /// # Errors
    /// Returns [`BrowseError::Connection`] if no session can be opened.
    pub fn connect(
        factory: F,
        server: impl Into<String>,
        nodes: Vec<String>,
    ) -> Result<Self, BrowseError> {
        let browser = Self {
            factory,
            server: server.into(),
            nodes,
        };
        browser.open_probe()?;
        Ok(browser)
    }

    fn open_probe(&self) -> Result<(), BrowseError> {
        self.factory
            .connect(&self.server, &self.nodes)
            .map(drop)
            .map_err(|source| BrowseError::Connection {
                server: self.server.clone(),
                source,
            })
    }

    /// Lists one window of children at `query.path`.
    ///
    /// Never fails: errors are reported in [`ItemsTag::errors`].
    pub fn browse(&self, query: &Query) -> ItemsTag {
        tracing::debug!(
            server = %self.server,
            path = %query.path,
            offset = query.offset,
            limit = query.limit,
            "browse"
        );
        assembler::assemble(query, self.try_browse(query))
    }

    fn try_browse(&self, query: &Query) -> Result<Page, BrowseError> {
        let session = self
            .factory
            .connect(&self.server, &self.nodes)
            .map_err(|source| BrowseError::Connection {
                server: self.server.clone(),
                source,
            })?;
        let mut cursor = session
            .new_cursor()
            .map_err(BrowseError::provider(CursorCall::CreateBrowser))?;

        let key = navigator::resolve(cursor.as_mut(), &query.path)?;
        paginator::paginate(cursor.as_mut(), &key, query.offset, query.limit)
    }
}
