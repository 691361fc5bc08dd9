//! Namespace provider interfaces.
//!
//! A provider connects to a named server on a set of hosts and hands out
//! sessions. A session creates [`HierarchyCursor`]s for browsing and serves
//! scalar reads and writes of individual tags.
//!
//! - `snapshot`: provider backed by namespace snapshot files on disk
//! - `value`: tag values, qualities and write coercion

use chrono::{DateTime, Utc};

use crate::error::ProviderResult;

pub mod snapshot;
pub mod value;

pub use value::{Quality, TagValue};

/// Stateful handle positioned at one node of the hierarchy.
///
/// Branches and leaves of the current node are two separate views, each
/// indexed from 1. `count` and `item` answer for whichever view was selected
/// last.
pub trait HierarchyCursor {
    fn reset_to_root(&mut self) -> ProviderResult<()>;

    /// Moves into the child branch `name` of the current node.
    fn step_into(&mut self, name: &str) -> ProviderResult<()>;

    fn show_branches(&mut self) -> ProviderResult<()>;

    fn show_leaves(&mut self) -> ProviderResult<()>;

    fn count(&self) -> ProviderResult<u32>;

    /// Name of the entry at the 1-based `index` of the current view.
    fn item(&self, index: u32) -> ProviderResult<String>;

    /// Opaque identifier of the leaf `name` under the current node.
    fn item_id(&self, name: &str) -> ProviderResult<String>;
}

/// Current state of one data point.
#[derive(Debug, Clone, PartialEq)]
pub struct ItemState {
    pub item_id: String,
    pub value: Option<TagValue>,
    pub quality: Quality,
    pub timestamp: DateTime<Utc>,
}

/// A live connection to one server. Released on drop.
pub trait Session {
    /// Creates a fresh cursor, positioned at the root.
    fn new_cursor(&self) -> ProviderResult<Box<dyn HierarchyCursor + '_>>;

    /// Reads the given item identifiers. Unknown identifiers come back with
    /// [`Quality::Bad`] instead of failing the whole read.
    fn read(&self, item_ids: &[String]) -> ProviderResult<Vec<ItemState>>;

    /// Writes `raw` to `item_id`, converted to the tag's value type.
    fn write(&mut self, item_id: &str, raw: &str) -> ProviderResult<TagValue>;
}

/// Entry point of a provider.
pub trait SessionFactory {
    fn connect(&self, server: &str, nodes: &[String]) -> ProviderResult<Box<dyn Session + '_>>;

    /// Names of the servers reachable on `node`.
    fn servers(&self, node: &str) -> ProviderResult<Vec<String>>;
}
