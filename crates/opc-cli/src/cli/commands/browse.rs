//! Browse command handler.

use std::io::{self, Write};

use anyhow::{Context, Result};
use opc_core::browser::Browser;
use opc_core::provider::SessionFactory;
use opc_types::{ItemsTag, Query, Tag};

pub struct BrowseOptions<'a> {
    pub node: &'a str,
    pub server: &'a str,
    pub path: &'a str,
    pub limit: u16,
    pub offset: u16,
    pub json: bool,
}

/// Browses one page and prints it.
///
/// Only a failed connection is an error; problems inside the page (unknown
/// path, offset out of range) are printed and the command still succeeds.
pub fn run<F: SessionFactory>(provider: F, opts: &BrowseOptions<'_>) -> Result<()> {
    let browser = Browser::connect(provider, opts.server, vec![opts.node.to_string()])
        .with_context(|| format!("browse '{}' on '{}'", opts.server, opts.node))?;

    let result = browser.browse(&Query::new(opts.path, opts.offset, opts.limit));

    let stdout = io::stdout();
    let mut out = stdout.lock();
    if opts.json {
        serde_json::to_writer_pretty(&mut out, &result).context("encode result")?;
        writeln!(out)?;
        return Ok(());
    }

    if result.is_err() {
        eprintln!("{}", result.errors().join(": "));
        return Ok(());
    }
    for line in render(&result) {
        writeln!(out, "{line}")?;
    }
    Ok(())
}

/// Text listing: branches as `+name`, leaves as `  -name item_id`.
fn render(result: &ItemsTag) -> Vec<String> {
    result.items.iter().map(format_tag).collect()
}

fn format_tag(tag: &Tag) -> String {
    if tag.is_branch {
        format!("+{}", tag.name)
    } else {
        match tag.item_id.as_deref() {
            Some(id) if !id.is_empty() => format!("  -{} {id}", tag.name),
            _ => format!("  -{}", tag.name),
        }
    }
}
