use std::path::PathBuf;

use clap::{ArgAction, Parser, Subcommand};
use cinefeed_config::PathManager;
use commands::{config, list, movie};

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "cinefeed")]
#[command(about = "Cinefeed - browse, search and inspect movies from TMDB")]
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

    /// Write logs to a daily-rotated file instead of stderr.
    /// Without a value, logs go to the default log directory.
    #[arg(long, global = true, value_name = "PATH", num_args = 0..=1, default_missing_value = "")]
    log_file: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List popular movies
    Popular {
        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,
    },
    /// Search movies by title
    #[command(long_about = "Search movies by title. An empty term prints nothing. With --open, the full detail record is shown when the search yields exactly one movie.")]
    Search {
        /// Search term (multiple words are joined with spaces)
        term: Vec<String>,

        /// Number of pages to load
        #[arg(long, default_value_t = 1, value_parser = clap::value_parser!(u32).range(1..))]
        pages: u32,

        /// Show the detail record when there is exactly one result
        #[arg(long, action = ArgAction::SetTrue)]
        open: bool,
    },
    /// Show normalized detail records for one or more movie ids
    Movie {
        /// TMDB movie ids
        #[arg(required = true)]
        ids: Vec<u64>,
    },
    /// Manage the configuration file
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
enum ConfigCommands {
    /// Show the effective configuration (API key masked)
    Show,
    /// Write a configuration template
    Init {
        /// Overwrite an existing file
        #[arg(long, action = ArgAction::SetTrue)]
        force: bool,
    },
    /// Print the configuration file path
    Path,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = cli.log_file.map(|path| {
        if path.as_os_str().is_empty() {
            PathManager::default().default_log_file()
        } else {
            path
        }
    });
    logging::init_logging_with_file(cli.verbose, cli.quiet, log_file)
        .map_err(|e| color_eyre::eyre::eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Popular { pages } => list::run_popular(pages, &output).await,
        Commands::Search { term, pages, open } => list::run_search(&term.join(" "), pages, open, &output).await,
        Commands::Movie { ids } => movie::run_movie(&ids, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output),
    }
}
