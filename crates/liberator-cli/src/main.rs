use clap::{ArgAction, Parser, Subcommand};
use commands::{clear, config, import};
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "liberator-import")]
#[command(about = "Import a TV Time style export into your Trakt account")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Import shows.json and movies.json into Trakt
    #[command(long_about = "Read shows.json and movies.json from the export directory and submit them to Trakt: watchlist first (skipped when it would exceed your account limit), then watch history, then stopped shows as hidden from progress and recommendations. Requests are spaced by the configured interval.")]
    Import {
        /// Directory holding shows.json and movies.json (overrides LIBERATOR_EXPORT_PATH and the config file)
        #[arg(long, value_name = "DIR")]
        export_dir: Option<PathBuf>,

        /// Write the request bodies to disk instead of sending them.
        /// Defaults to the data directory if no path is given: --dry-run=./out
        #[arg(long, value_name = "DIR", num_args = 0..=1, default_missing_value = "default")]
        dry_run: Option<String>,

        /// Treat the account as VIP during a dry run
        #[arg(long, action = ArgAction::SetTrue, requires = "dry_run")]
        assume_vip: bool,

        /// Continue past the watchlist limit notice without waiting for Enter
        #[arg(short, long, action = ArgAction::SetTrue)]
        yes: bool,

        /// Also write logs to a file, rotated daily.
        /// Defaults to the log directory if no path is given: --log-file=./import.log
        #[arg(long, value_name = "PATH", num_args = 0..=1, default_missing_value = "default")]
        log_file: Option<String>,
    },
    /// Configure credentials and settings
    #[command(long_about = "Manage configuration and credentials. Use subcommands to view or modify the Trakt application credentials and import settings.")]
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
    /// Clear stored credentials or dry run output
    #[command(long_about = "Clear stored Trakt tokens or the request bodies written by previous dry runs. Use --all to clear both.")]
    Clear {
        /// Clear credentials and dry run output
        #[arg(long, action = ArgAction::SetTrue, conflicts_with_all = ["credentials", "dry_run_output"])]
        all: bool,

        /// Clear stored Trakt tokens
        #[arg(long, action = ArgAction::SetTrue)]
        credentials: bool,

        /// Clear request bodies written by dry runs
        #[arg(long, action = ArgAction::SetTrue)]
        dry_run_output: bool,
    },
}

#[derive(Subcommand)]
pub(crate) enum ConfigCommands {
    /// Show current configuration (masks sensitive data)
    #[command(long_about = "Display the current configuration. The client secret and tokens are masked. Use --full to show them.")]
    Show {
        /// Show full configuration including masked secrets
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Configure Trakt (OAuth flow)
    #[command(long_about = "Configure Trakt API credentials and perform OAuth authentication. You'll need to create a Trakt API application at https://trakt.tv/oauth/applications first.")]
    Trakt {
        /// Trakt Client ID (if not provided, will prompt)
        #[arg(long)]
        client_id: Option<String>,

        /// Trakt Client Secret (if not provided, will prompt)
        #[arg(long)]
        client_secret: Option<String>,
    },

    /// Configure import settings
    #[command(long_about = "Set the default export directory and the minimum spacing between Trakt requests.")]
    Import {
        /// Default directory holding shows.json and movies.json
        #[arg(long, value_name = "DIR")]
        export_dir: Option<PathBuf>,

        /// Minimum milliseconds between the start of two Trakt requests
        #[arg(long, value_name = "MS")]
        request_interval_ms: Option<u64>,
    },
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Import { log_file: Some(path), .. } if path == "default" => {
            Some(liberator_config::PathManager::default().import_log_file())
        }
        Commands::Import { log_file: Some(path), .. } => Some(PathBuf::from(path)),
        _ => None,
    };
    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Import {
            export_dir,
            dry_run,
            assume_vip,
            yes,
            log_file: _,
        } => {
            let options = import::ImportOptions {
                export_dir,
                dry_run,
                assume_vip,
                assume_yes: yes,
            };
            import::run_import(options, &output).await
        }
        Commands::Config { cmd } => config::run_config(cmd, &output).await,
        Commands::Clear { all, credentials, dry_run_output } => {
            clear::run_clear(all, credentials, dry_run_output, &output).await
        }
    }
}
