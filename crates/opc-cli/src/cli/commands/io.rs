//! Tag read/write command handlers.

use anyhow::{Context, Result};
use chrono::SecondsFormat;
use opc_core::provider::{ItemState, SessionFactory};

pub fn read(provider: &dyn SessionFactory, node: &str, server: &str, tags: &[String]) -> Result<()> {
    let session = provider
        .connect(server, &[node.to_string()])
        .with_context(|| format!("connect to '{server}' on '{node}'"))?;
    let states = session.read(tags).context("read tags")?;
    for state in &states {
        println!("{}", format_state(state));
    }
    Ok(())
}

pub fn write(
    provider: &dyn SessionFactory,
    node: &str,
    server: &str,
    tag: &str,
    value: &str,
) -> Result<()> {
    let mut session = provider
        .connect(server, &[node.to_string()])
        .with_context(|| format!("connect to '{server}' on '{node}'"))?;
    let written = session
        .write(tag, value)
        .with_context(|| format!("write '{tag}'"))?;
    println!("{tag} = {written} ({})", written.type_name());
    Ok(())
}

fn format_state(state: &ItemState) -> String {
    let value = state
        .value
        .as_ref()
        .map_or_else(|| "-".to_string(), ToString::to_string);
    format!(
        "{}  {}  {}  {}",
        state.item_id,
        value,
        state.quality,
        state.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
    )
}
