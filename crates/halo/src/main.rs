mod commands;

use std::path::PathBuf;

use clap::{Parser, Subcommand};

use commands::GlobalOptions;

#[derive(Parser)]
#[command(
    name = "halo",
    version,
    about = "Draws a colored border around the focused window"
)]
struct Cli {
    /// Use this config file instead of ~/.config/halo/config.toml
    #[arg(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Write log files to this directory (must exist)
    #[arg(short, long, global = true, value_name = "DIR")]
    logs: Option<PathBuf>,

    /// Disable file logging
    #[arg(long, global = true, conflicts_with = "logs")]
    no_logs: bool,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the border in the foreground (default)
    Run,
    /// Create the default configuration file
    Init,
    /// Debugging and inspection tools
    Debug {
        #[command(subcommand)]
        command: DebugCommands,
    },
}

#[derive(Subcommand)]
enum DebugCommands {
    /// Print every focused-window transition in real time
    Events,
    /// Show the current foreground window and whether it gets a border
    Foreground,
}

fn main() {
    let cli = Cli::parse();
    let options = GlobalOptions {
        config: cli.config,
        logs: cli.logs,
        no_logs: cli.no_logs,
    };

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => commands::run::execute(&options),
        Commands::Init => commands::init::execute(options.config.as_deref()),
        Commands::Debug { command } => match command {
            DebugCommands::Events => commands::debug::events::execute(&options),
            DebugCommands::Foreground => commands::debug::foreground::execute(&options),
        },
    }
}
