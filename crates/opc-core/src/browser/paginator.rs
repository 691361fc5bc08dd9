//! Windowed listing of a node's children.
//!
//! A cursor exposes branches and leaves as two separate 1-based views. The
//! paginator presents them as one 0-based list, branches first, and fetches
//! only the entries that fall inside `[offset, offset + limit)`. Counts are
//! always read for both views so `total` covers the whole node.

use opc_types::Tag;

use super::navigator::child_path;
use crate::error::{BrowseError, CursorCall};
use crate::provider::HierarchyCursor;

/// One window of children plus the number of children at the node.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Page {
    pub items: Vec<Tag>,
    pub total: u32,
}

/// Lists the window `[offset, offset + limit)` of the cursor's current node.
///
/// # Errors
/// Returns [`BrowseError::Range`] when `offset` is past the last child, and
/// [`BrowseError::Provider`] when any cursor call fails.
pub fn paginate(
    cursor: &mut dyn HierarchyCursor,
    key: &str,
    offset: u16,
    limit: u16,
) -> Result<Page, BrowseError> {
    let offset = u32::from(offset);
    let limit = u32::from(limit);

    cursor
        .show_branches()
        .map_err(BrowseError::provider(CursorCall::ShowBranches))?;
    let branch_count = cursor
        .count()
        .map_err(BrowseError::provider(CursorCall::Count))?;

    // Branches before `offset` are skipped without fetching their names.
    let branch_max = (offset + limit).min(branch_count);
    let mut items = Vec::with_capacity(branch_max.saturating_sub(offset) as usize);
    for index in offset + 1..=branch_max {
        let name = cursor
            .item(index)
            .map_err(BrowseError::provider(CursorCall::Item))?;
        let path = child_path(key, &name);
        items.push(Tag::branch(name, path));
    }

    cursor
        .show_leaves()
        .map_err(BrowseError::provider(CursorCall::ShowLeafs))?;
    let leaf_count = cursor
        .count()
        .map_err(BrowseError::provider(CursorCall::Count))?;
    let total = branch_count.saturating_add(leaf_count);
    tracing::debug!(branch_count, leaf_count, offset, limit, "counted children");

    // An empty node still answers the first page.
    if offset > 0 && offset >= total {
        return Err(BrowseError::Range {
            offset: saturate(offset),
            total: saturate(total),
        });
    }

    let remaining = limit - items.len() as u32;
    if remaining == 0 {
        return Ok(Page { items, total });
    }

    let leaf_offset = offset.saturating_sub(branch_count);
    let leaf_max = leaf_offset.saturating_add(remaining).min(leaf_count);
    items.reserve(leaf_max.saturating_sub(leaf_offset) as usize);
    for index in leaf_offset + 1..=leaf_max {
        let name = cursor
            .item(index)
            .map_err(BrowseError::provider(CursorCall::Item))?;
        let item_id = cursor
            .item_id(&name)
            .map_err(BrowseError::provider(CursorCall::GetItemId))?;
        let path = child_path(key, &name);
        items.push(Tag::leaf(name, item_id, path));
        if items.len() as u32 == limit {
            break;
        }
    }

    Ok(Page { items, total })
}

/// Clamps a provider count into the `u16` wire fields.
pub(crate) fn saturate(value: u32) -> u16 {
    u16::try_from(value).unwrap_or(u16::MAX)
}
