//! Turns a browse outcome into the `ItemsTag` wire value.

use opc_types::{ItemsTag, Query};

use super::paginator::{Page, saturate};
use crate::error::BrowseError;

pub fn assemble(query: &Query, outcome: Result<Page, BrowseError>) -> ItemsTag {
    match outcome {
        Ok(page) => ItemsTag {
            items: page.items,
            total: saturate(page.total),
            offset: query.offset,
            limit: query.limit,
            errors: None,
        },
        Err(err) => {
            let messages = err.messages();
            tracing::debug!(path = %query.path, "browse failed: {}", messages.join(": "));
            let mut result = ItemsTag::failed(messages);
            if let BrowseError::Range { total, .. } = err {
                result.total = total;
            }
            result
        }
    }
}
