mod commands;
mod config;
mod input;
mod retry;
mod shutdown;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use config::Config;

#[derive(Parser)]
#[command(name = "d2reader")]
#[command(about = "Diablo II memory reader and kill tracker")]
#[command(version)]
struct Args {
    /// Path to the config file (default: ./d2reader.toml, then the user config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Attach to this process ID instead of searching by name
    #[arg(short, long, global = true)]
    pid: Option<u32>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Track kills and player stats until the game exits (default)
    Track,
    /// Show build, module and game state information
    Status,
    /// Show the player's stats
    Stats {
        /// Translate attributes into readable lines
        #[arg(short, long)]
        translate: bool,
        /// Output JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Resolve a string table id
    String {
        /// String id, e.g. 5382
        id: u32,
    },
    /// Show the item under the mouse cursor
    Hovered,
    /// List supported game builds
    Builds {
        /// Output JSON instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Hex dump of game memory
    Hexdump {
        /// Address in hex (0x prefix optional)
        address: String,
        /// Number of bytes to dump (decimal or 0x hex)
        #[arg(default_value = "0x100")]
        size: String,
        /// Treat the address as an offset into this module, e.g. D2Client.dll
        #[arg(short, long)]
        module: Option<String>,
        /// Show an ASCII column
        #[arg(short, long)]
        ascii: bool,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let config_path = args.config.unwrap_or_else(Config::default_path);
    let config = Config::load_or_default(&config_path);

    let filter = if args.verbose {
        EnvFilter::new("d2reader=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_filter))
    };
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match args.command.unwrap_or(Command::Track) {
        Command::Track => commands::track::run(&config, args.pid),
        Command::Status => commands::status::run(&config, args.pid),
        Command::Stats { translate, json } => {
            commands::stats::run(&config, args.pid, translate, json)
        }
        Command::String { id } => commands::string::run(&config, args.pid, id),
        Command::Hovered => commands::hovered::run(&config, args.pid),
        Command::Builds { json } => commands::builds::run(json),
        Command::Hexdump {
            address,
            size,
            module,
            ascii,
        } => commands::hexdump::run(&config, args.pid, &address, &size, module.as_deref(), ascii),
    }
}
