//! Provider backed by namespace snapshot files.
//!
//! Each `*.toml` file in the servers directory describes one server: its
//! name, the nodes it is reachable on and its branch/leaf hierarchy.
//!
//! ```toml
//! name = "Graybox.Simulator.1"
//! nodes = ["localhost"]
//!
//! [[branches]]
//! name = "Group1"
//! [[branches.leaves]]
//! name = "TagA"
//! item_id = "Group1.TagA"   # optional, defaults to the dotted path
//! value = 1.5
//! ```
//!
//! Files are read on every connect, so edits show up on the next call.
//! Writes go back to the file through `toml_edit`, keeping comments intact.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::Utc;
use serde::Deserialize;
use toml_edit::{DocumentMut, Table};

use super::{HierarchyCursor, ItemState, Quality, Session, SessionFactory, TagValue};
use crate::error::{ProviderError, ProviderResult};

/// Node names that all refer to this machine.
const LOCAL_ALIASES: &[&str] = &["localhost", "127.0.0.1", "::1", "."];

/// One server's namespace as stored on disk.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Snapshot {
    pub name: String,
    pub nodes: Vec<String>,
    pub branches: Vec<Branch>,
    pub leaves: Vec<Leaf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Branch {
    pub name: String,
    pub branches: Vec<Branch>,
    pub leaves: Vec<Leaf>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct Leaf {
    pub name: String,
    pub item_id: Option<String>,
    pub value: Option<TagValue>,
}

/// Children of one node, borrowed from the snapshot.
#[derive(Debug, Clone, Copy)]
struct Node<'a> {
    branches: &'a [Branch],
    leaves: &'a [Leaf],
}

impl Branch {
    fn node(&self) -> Node<'_> {
        Node {
            branches: &self.branches,
            leaves: &self.leaves,
        }
    }
}

/// Where a leaf lives: the branch names above it and the leaf itself.
struct LeafLocation<'a> {
    branches: Vec<&'a str>,
    leaf: &'a Leaf,
}

impl Snapshot {
    /// Loads a snapshot file.
    ///
    /// # Errors
    /// Returns an error if the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse snapshot {}", path.display()))
    }

    fn root(&self) -> Node<'_> {
        Node {
            branches: &self.branches,
            leaves: &self.leaves,
        }
    }

    /// Whether the server is reachable on `node`.
    pub fn serves(&self, node: &str) -> bool {
        let wanted = canonical_node(node);
        self.nodes.iter().any(|n| canonical_node(n) == wanted)
    }

    fn find_leaf(&self, item_id: &str) -> Option<LeafLocation<'_>> {
        fn walk<'a>(
            node: Node<'a>,
            trail: &mut Vec<&'a str>,
            item_id: &str,
        ) -> Option<LeafLocation<'a>> {
            for leaf in node.leaves {
                if leaf_item_id(trail, leaf) == item_id {
                    return Some(LeafLocation {
                        branches: trail.clone(),
                        leaf,
                    });
                }
            }
            for branch in node.branches {
                trail.push(&branch.name);
                let found = walk(branch.node(), trail, item_id);
                trail.pop();
                if found.is_some() {
                    return found;
                }
            }
            None
        }

        walk(self.root(), &mut Vec::new(), item_id)
    }
}

fn canonical_node(node: &str) -> String {
    let trimmed = node.trim();
    if trimmed.is_empty() || LOCAL_ALIASES.iter().any(|a| trimmed.eq_ignore_ascii_case(a)) {
        "localhost".to_string()
    } else {
        trimmed.to_ascii_lowercase()
    }
}

fn leaf_item_id(trail: &[&str], leaf: &Leaf) -> String {
    if let Some(id) = leaf.item_id.as_deref() {
        return id.to_string();
    }
    let mut parts = trail.to_vec();
    parts.push(&leaf.name);
    parts.join(".")
}

/// Provider reading server snapshots from a directory.
#[derive(Debug, Clone)]
pub struct SnapshotProvider {
    dir: PathBuf,
    debug: bool,
}

impl SnapshotProvider {
    /// `debug` turns on per-call logging of cursor operations.
    pub fn new(dir: impl Into<PathBuf>, debug: bool) -> Self {
        Self {
            dir: dir.into(),
            debug,
        }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Loads every readable snapshot, sorted by file name.
    ///
    /// Files that fail to parse are skipped with a warning.
    fn load_all(&self) -> ProviderResult<Vec<(PathBuf, Snapshot)>> {
        let entries = fs::read_dir(&self.dir).map_err(|e| {
            ProviderError::new(format!(
                "cannot read servers directory {}: {e}",
                self.dir.display()
            ))
        })?;

        let mut paths: Vec<PathBuf> = entries
            .filter_map(std::result::Result::ok)
            .map(|entry| entry.path())
            .filter(|path| path.extension().is_some_and(|ext| ext == "toml"))
            .collect();
        paths.sort();

        let mut snapshots = Vec::with_capacity(paths.len());
        for path in paths {
            match Snapshot::load(&path) {
                Ok(snapshot) => snapshots.push((path, snapshot)),
                Err(err) => tracing::warn!("skipping snapshot: {err:#}"),
            }
        }
        Ok(snapshots)
    }
}

impl SessionFactory for SnapshotProvider {
    fn connect(&self, server: &str, nodes: &[String]) -> ProviderResult<Box<dyn Session + '_>> {
        let mut known_elsewhere = false;
        for (path, snapshot) in self.load_all()? {
            if !snapshot.name.eq_ignore_ascii_case(server) {
                continue;
            }
            if nodes.iter().any(|node| snapshot.serves(node)) {
                tracing::debug!(server, path = %path.display(), "session opened");
                return Ok(Box::new(SnapshotSession {
                    path,
                    snapshot,
                    debug: self.debug,
                }));
            }
            known_elsewhere = true;
        }

        if known_elsewhere {
            Err(ProviderError::new(format!(
                "server '{server}' is not available on {}",
                nodes.join(", ")
            )))
        } else {
            Err(ProviderError::not_found("server", server))
        }
    }

    fn servers(&self, node: &str) -> ProviderResult<Vec<String>> {
        Ok(self
            .load_all()?
            .into_iter()
            .filter(|(_, snapshot)| snapshot.serves(node))
            .map(|(_, snapshot)| snapshot.name)
            .collect())
    }
}

/// Session over one loaded snapshot file.
pub struct SnapshotSession {
    path: PathBuf,
    snapshot: Snapshot,
    debug: bool,
}

impl Session for SnapshotSession {
    fn new_cursor(&self) -> ProviderResult<Box<dyn HierarchyCursor + '_>> {
        Ok(Box::new(SnapshotCursor {
            snapshot: &self.snapshot,
            trail: Vec::new(),
            view: View::Branches,
            debug: self.debug,
        }))
    }

    fn read(&self, item_ids: &[String]) -> ProviderResult<Vec<ItemState>> {
        let timestamp = Utc::now();
        Ok(item_ids
            .iter()
            .map(|item_id| {
                let value = self
                    .snapshot
                    .find_leaf(item_id)
                    .map(|location| location.leaf.value.clone());
                let quality = match &value {
                    Some(Some(_)) => Quality::Good,
                    Some(None) => Quality::Uncertain,
                    None => Quality::Bad,
                };
                ItemState {
                    item_id: item_id.clone(),
                    value: value.flatten(),
                    quality,
                    timestamp,
                }
            })
            .collect())
    }

    fn write(&mut self, item_id: &str, raw: &str) -> ProviderResult<TagValue> {
        let location = self
            .snapshot
            .find_leaf(item_id)
            .ok_or_else(|| ProviderError::not_found("tag", item_id))?;

        let value = match &location.leaf.value {
            Some(current) => current.coerce(raw)?,
            None => TagValue::infer(raw),
        };
        let branches: Vec<String> = location.branches.iter().map(ToString::to_string).collect();
        let leaf_name = location.leaf.name.clone();

        persist_value(&self.path, &branches, &leaf_name, &value)
            .map_err(|e| ProviderError::new(format!("{e:#}")))?;
        self.snapshot = Snapshot::load(&self.path).map_err(|e| ProviderError::new(format!("{e:#}")))?;

        tracing::debug!(item_id, value = %value, "tag written");
        Ok(value)
    }
}

impl Drop for SnapshotSession {
    fn drop(&mut self) {
        tracing::debug!(server = %self.snapshot.name, "session closed");
    }
}

/// Rewrites the `value` of one leaf in a snapshot file.
fn persist_value(path: &Path, branches: &[String], leaf: &str, value: &TagValue) -> Result<()> {
    let contents = fs::read_to_string(path)
        .with_context(|| format!("Failed to read snapshot {}", path.display()))?;
    let mut doc: DocumentMut = contents
        .parse()
        .with_context(|| format!("Failed to parse snapshot {}", path.display()))?;

    let mut table: &mut Table = doc.as_table_mut();
    for name in branches {
        table = named_child(table, "branches", name)
            .with_context(|| format!("branch '{name}' is not a [[branches]] table"))?;
    }
    let leaf_table = named_child(table, "leaves", leaf)
        .with_context(|| format!("leaf '{leaf}' is not a [[leaves]] table"))?;
    match leaf_table.get_mut("value") {
        // replace in place so the key keeps its comments
        Some(toml_edit::Item::Value(existing)) => {
            let decor = existing.decor().clone();
            *existing = value.to_toml();
            *existing.decor_mut() = decor;
        }
        _ => {
            leaf_table.insert("value", toml_edit::Item::Value(value.to_toml()));
        }
    }

    let tmp_path = path.with_extension("toml.tmp");
    fs::write(&tmp_path, doc.to_string())
        .with_context(|| format!("Failed to write snapshot to {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path).with_context(|| {
        format!(
            "Failed to rename {} to {}",
            tmp_path.display(),
            path.display()
        )
    })?;
    Ok(())
}

fn named_child<'t>(table: &'t mut Table, key: &str, name: &str) -> Option<&'t mut Table> {
    table
        .get_mut(key)?
        .as_array_of_tables_mut()?
        .iter_mut()
        .find(|child| child.get("name").and_then(|v| v.as_str()) == Some(name))
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum View {
    Branches,
    Leaves,
}

struct SnapshotCursor<'a> {
    snapshot: &'a Snapshot,
    /// Branches from the root down to the current node.
    trail: Vec<&'a Branch>,
    view: View,
    debug: bool,
}

impl<'a> SnapshotCursor<'a> {
    fn node(&self) -> Node<'a> {
        match self.trail.last() {
            Some(branch) => branch.node(),
            None => self.snapshot.root(),
        }
    }

    fn trace(&self, call: &str, arg: &str) {
        if self.debug {
            tracing::debug!(call, arg, depth = self.trail.len(), "cursor call");
        }
    }
}

impl HierarchyCursor for SnapshotCursor<'_> {
    fn reset_to_root(&mut self) -> ProviderResult<()> {
        self.trace("MoveToRoot", "");
        self.trail.clear();
        Ok(())
    }

    fn step_into(&mut self, name: &str) -> ProviderResult<()> {
        self.trace("MoveDown", name);
        let branch = self
            .node()
            .branches
            .iter()
            .find(|b| b.name == name)
            .ok_or_else(|| ProviderError::not_found("branch", name))?;
        self.trail.push(branch);
        Ok(())
    }

    fn show_branches(&mut self) -> ProviderResult<()> {
        self.trace("ShowBranches", "");
        self.view = View::Branches;
        Ok(())
    }

    fn show_leaves(&mut self) -> ProviderResult<()> {
        self.trace("ShowLeafs", "");
        self.view = View::Leaves;
        Ok(())
    }

    fn count(&self) -> ProviderResult<u32> {
        let node = self.node();
        let len = match self.view {
            View::Branches => node.branches.len(),
            View::Leaves => node.leaves.len(),
        };
        u32::try_from(len).map_err(|e| ProviderError::new(format!("cannot count children: {e}")))
    }

    fn item(&self, index: u32) -> ProviderResult<String> {
        self.trace("Item", &index.to_string());
        let node = self.node();
        let slot = (index as usize).checked_sub(1);
        let name = match self.view {
            View::Branches => slot.and_then(|i| node.branches.get(i)).map(|b| &b.name),
            View::Leaves => slot.and_then(|i| node.leaves.get(i)).map(|l| &l.name),
        };
        name.cloned()
            .ok_or_else(|| ProviderError::new(format!("index {index} out of range")))
    }

    fn item_id(&self, name: &str) -> ProviderResult<String> {
        self.trace("GetItemID", name);
        let leaf = self
            .node()
            .leaves
            .iter()
            .find(|l| l.name == name)
            .ok_or_else(|| ProviderError::not_found("leaf", name))?;
        let trail: Vec<&str> = self.trail.iter().map(|b| b.name.as_str()).collect();
        Ok(leaf_item_id(&trail, leaf))
    }
}
