//! In-memory provider that records every cursor call.

use std::cell::{Cell, RefCell};
use std::rc::Rc;

use crate::error::{ProviderError, ProviderResult};
use crate::provider::{HierarchyCursor, ItemState, Session, SessionFactory, TagValue};

#[derive(Debug, Clone, Default)]
pub(crate) struct FakeNode {
    branches: Vec<(String, FakeNode)>,
    leaves: Vec<String>,
}

impl FakeNode {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn branch(mut self, name: &str, node: FakeNode) -> Self {
        self.branches.push((name.to_string(), node));
        self
    }

    pub(crate) fn leaf(mut self, name: &str) -> Self {
        self.leaves.push(name.to_string());
        self
    }

    /// `branches` empty branches followed by `leaves` leaves.
    pub(crate) fn flat(branches: &[&str], leaves: &[&str]) -> Self {
        let node = branches
            .iter()
            .fold(Self::new(), |node, name| node.branch(name, Self::new()));
        leaves.iter().fold(node, |node, name| node.leaf(name))
    }
}

pub(crate) struct FakeCursor<'a> {
    root: &'a FakeNode,
    trail: Vec<(&'a str, &'a FakeNode)>,
    leaves_view: bool,
    steps: Vec<String>,
    resets: usize,
    fetched: RefCell<Vec<String>>,
    id_lookups: Cell<usize>,
    fail_item_ids: bool,
}

impl<'a> FakeCursor<'a> {
    pub(crate) fn new(root: &'a FakeNode) -> Self {
        Self {
            root,
            trail: Vec::new(),
            leaves_view: false,
            steps: Vec::new(),
            resets: 0,
            fetched: RefCell::new(Vec::new()),
            id_lookups: Cell::new(0),
            fail_item_ids: false,
        }
    }

    pub(crate) fn failing_item_ids(mut self) -> Self {
        self.fail_item_ids = true;
        self
    }

    fn node(&self) -> &'a FakeNode {
        self.trail.last().map_or(self.root, |(_, node)| *node)
    }

    pub(crate) fn steps(&self) -> &[String] {
        &self.steps
    }

    pub(crate) fn depth(&self) -> usize {
        self.trail.len()
    }

    pub(crate) fn resets(&self) -> usize {
        self.resets
    }

    /// Names returned by `item`, in call order.
    pub(crate) fn fetched(&self) -> Vec<String> {
        self.fetched.borrow().clone()
    }

    pub(crate) fn id_lookups(&self) -> usize {
        self.id_lookups.get()
    }
}

impl HierarchyCursor for FakeCursor<'_> {
    fn reset_to_root(&mut self) -> ProviderResult<()> {
        self.resets += 1;
        self.trail.clear();
        Ok(())
    }

    fn step_into(&mut self, name: &str) -> ProviderResult<()> {
        let (child_name, child) = self
            .node()
            .branches
            .iter()
            .find(|(n, _)| n == name)
            .ok_or_else(|| ProviderError::not_found("branch", name))?;
        self.steps.push(name.to_string());
        self.trail.push((child_name.as_str(), child));
        Ok(())
    }

    fn show_branches(&mut self) -> ProviderResult<()> {
        self.leaves_view = false;
        Ok(())
    }

    fn show_leaves(&mut self) -> ProviderResult<()> {
        self.leaves_view = true;
        Ok(())
    }

    fn count(&self) -> ProviderResult<u32> {
        let node = self.node();
        let len = if self.leaves_view {
            node.leaves.len()
        } else {
            node.branches.len()
        };
        Ok(len as u32)
    }

    fn item(&self, index: u32) -> ProviderResult<String> {
        let node = self.node();
        let slot = (index as usize).checked_sub(1);
        let name = if self.leaves_view {
            slot.and_then(|i| node.leaves.get(i)).cloned()
        } else {
            slot.and_then(|i| node.branches.get(i)).map(|(n, _)| n.clone())
        };
        let name = name.ok_or_else(|| ProviderError::new(format!("index {index} out of range")))?;
        self.fetched.borrow_mut().push(name.clone());
        Ok(name)
    }

    fn item_id(&self, name: &str) -> ProviderResult<String> {
        self.id_lookups.set(self.id_lookups.get() + 1);
        if self.fail_item_ids {
            return Err(ProviderError::new("access denied"));
        }
        let mut parts: Vec<&str> = self.trail.iter().map(|(n, _)| *n).collect();
        parts.push(name);
        Ok(format!("ns=2;s={}", parts.join(".")))
    }
}

/// Factory handing out sessions over a [`FakeNode`] tree.
pub(crate) struct FakeFactory {
    root: FakeNode,
    refuse: bool,
    open: Rc<Cell<usize>>,
    opened: Cell<usize>,
}

impl FakeFactory {
    pub(crate) fn new(root: FakeNode) -> Self {
        Self {
            root,
            refuse: false,
            open: Rc::new(Cell::new(0)),
            opened: Cell::new(0),
        }
    }

    pub(crate) fn refusing(mut self) -> Self {
        self.refuse = true;
        self
    }

    /// Sessions currently alive.
    pub(crate) fn open_sessions(&self) -> usize {
        self.open.get()
    }

    /// Sessions created so far.
    pub(crate) fn opened_sessions(&self) -> usize {
        self.opened.get()
    }
}

impl SessionFactory for FakeFactory {
    fn connect(&self, server: &str, _nodes: &[String]) -> ProviderResult<Box<dyn Session + '_>> {
        if self.refuse {
            return Err(ProviderError::new(format!("{server} refused the connection")));
        }
        self.open.set(self.open.get() + 1);
        self.opened.set(self.opened.get() + 1);
        Ok(Box::new(FakeSession {
            root: &self.root,
            open: Rc::clone(&self.open),
        }))
    }

    fn servers(&self, _node: &str) -> ProviderResult<Vec<String>> {
        Ok(vec!["Fake.Server".to_string()])
    }
}

struct FakeSession<'a> {
    root: &'a FakeNode,
    open: Rc<Cell<usize>>,
}

impl Session for FakeSession<'_> {
    fn new_cursor(&self) -> ProviderResult<Box<dyn HierarchyCursor + '_>> {
        Ok(Box::new(FakeCursor::new(self.root)))
    }

    fn read(&self, _item_ids: &[String]) -> ProviderResult<Vec<ItemState>> {
        Err(ProviderError::new("read not supported"))
    }

    fn write(&mut self, _item_id: &str, _raw: &str) -> ProviderResult<TagValue> {
        Err(ProviderError::new("write not supported"))
    }
}

impl Drop for FakeSession<'_> {
    fn drop(&mut self) {
        self.open.set(self.open.get() - 1);
    }
}
