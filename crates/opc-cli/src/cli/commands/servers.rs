//! Server discovery command handlers.

use anyhow::{Context, Result};
use opc_core::provider::SessionFactory;

/// Lists servers on `node`. Discovery problems are logged, never fatal.
pub fn list(provider: &dyn SessionFactory, node: &str) {
    let servers = provider.servers(node).unwrap_or_else(|err| {
        tracing::warn!("cannot list servers on '{node}': {err}");
        Vec::new()
    });
    println!("Found {} server(s) on '{node}':", servers.len());
    for server in servers {
        println!("{server}");
    }
}

pub fn info(provider: &dyn SessionFactory, node: &str, server: &str) -> Result<()> {
    let _session = provider
        .connect(server, &[node.to_string()])
        .with_context(|| format!("connect to '{server}' on '{node}'"))?;
    println!("{server} on '{node}' is up and running.");
    Ok(())
}
