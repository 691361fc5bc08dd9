//! CLI entry and dispatch.

use anyhow::{Context, Result};
use clap::Parser;
use opc_core::config::Config;
use opc_core::logging;
use opc_core::provider::snapshot::SnapshotProvider;

mod commands;

#[derive(Parser)]
#[command(name = "opc-cli")]
#[command(version)]
#[command(about = "Browse, read and write tags on OPC data-access servers")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Log every provider call to stderr
    #[arg(short, long, global = true, env = "OPC_DEBUG")]
    debug: bool,
}

#[derive(clap::Subcommand)]
enum Commands {
    /// Lists the OPC servers available on a specific node
    List {
        /// Host to look on
        node: String,
    },

    /// Connects to a server on a node and checks that it is running
    Info {
        /// Host the server runs on
        node: String,
        /// Server name (program id)
        server: String,
    },

    /// Browse OPC tags; pass branch_path to list a sub-branch
    Browse {
        /// Host the server runs on
        node: String,
        /// Server name (program id)
        server: String,
        /// Slash-separated branch path (default: root)
        branch_path: Option<String>,

        /// Maximum number of items to list (default: browse_limit from config, 20)
        #[arg(short, long)]
        limit: Option<u16>,

        /// Number of items to skip
        #[arg(short, long, default_value_t = 0)]
        offset: u16,

        /// Print the result as JSON
        #[arg(long)]
        json: bool,
    },

    /// Read OPC tags
    Read {
        /// Host the server runs on
        node: String,
        /// Server name (program id)
        server: String,
        /// Item identifiers to read
        #[arg(required = true, value_name = "TAG")]
        tags: Vec<String>,
    },

    /// Write a value to an OPC tag
    Write {
        /// Host the server runs on
        node: String,
        /// Server name (program id)
        server: String,
        /// Item identifier to write
        tag: String,
        /// New value, converted to the tag's type
        #[arg(allow_hyphen_values = true)]
        value: String,
    },

    /// Manage configuration
    Config {
        #[command(subcommand)]
        command: ConfigCommands,
    },
}

#[derive(clap::Subcommand)]
enum ConfigCommands {
    /// Show the path to the config file
    Path,
    /// Initialize a default config file (if not present)
    Init,
    /// Generate a fresh config from Rust defaults (for xtask)
    Generate,
}

pub fn run() -> Result<()> {
    let Cli { command, debug } = Cli::parse();
    dispatch(command, debug)
}

/// Loads config, sets up logging and builds the snapshot provider.
fn setup(debug_flag: bool) -> Result<(Config, SnapshotProvider)> {
    let config = Config::load().context("load config")?;
    let debug = debug_flag || config.debug;
    logging::init(debug);

    let provider = SnapshotProvider::new(config.servers_dir(), debug);
    tracing::debug!(servers_dir = %provider.dir().display(), "provider ready");
    Ok((config, provider))
}

fn dispatch(command: Commands, debug: bool) -> Result<()> {
    match command {
        Commands::List { node } => {
            let (_, provider) = setup(debug)?;
            commands::servers::list(&provider, &node);
            Ok(())
        }
        Commands::Info { node, server } => {
            let (_, provider) = setup(debug)?;
            commands::servers::info(&provider, &node, &server)
        }
        Commands::Browse {
            node,
            server,
            branch_path,
            limit,
            offset,
            json,
        } => {
            let (config, provider) = setup(debug)?;
            commands::browse::run(
                provider,
                &commands::browse::BrowseOptions {
                    node: &node,
                    server: &server,
                    path: branch_path.as_deref().unwrap_or_default(),
                    limit: limit.unwrap_or(config.browse_limit),
                    offset,
                    json,
                },
            )
        }
        Commands::Read { node, server, tags } => {
            let (_, provider) = setup(debug)?;
            commands::io::read(&provider, &node, &server, &tags)
        }
        Commands::Write {
            node,
            server,
            tag,
            value,
        } => {
            let (_, provider) = setup(debug)?;
            commands::io::write(&provider, &node, &server, &tag, &value)
        }

        // config commands must work even when the config file is broken
        Commands::Config { command } => {
            logging::init(debug);
            match command {
                ConfigCommands::Path => {
                    commands::config::path();
                    Ok(())
                }
                ConfigCommands::Init => commands::config::init(),
                ConfigCommands::Generate => commands::config::generate(),
            }
        }
    }
}
