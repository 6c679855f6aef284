use std::path::PathBuf;

use clap::{builder::ArgAction, Parser, Subcommand};
use console::{style, Emoji};
use errors::GleanerdErrors;
use gleaner::{pipeline, Config, Database};
use tracing::trace;
use tracing_subscriber::EnvFilter;

pub mod daemon;
pub mod errors;

use daemon::{Daemon, DaemonCommands};

static LOOKING_GLASS: Emoji<'_, '_> = Emoji("🔍 ", "");
static BOOKS: Emoji<'_, '_> = Emoji("📚 ", "");
static ROCKET: Emoji<'_, '_> = Emoji("🚀 ", "");
static SAVE: Emoji<'_, '_> = Emoji("💾 ", "");
static WARNING: Emoji<'_, '_> = Emoji("⚠️  ", "");
static SUCCESS: Emoji<'_, '_> = Emoji("✨ ", "");

#[derive(Parser)]
#[command(author, version, about = "Daemon and CLI for the gleaner arXiv harvesting pipeline")]
struct Cli {
  /// Verbose mode (-v, -vv, -vvv)
  #[arg(
        short,
        long,
        action = ArgAction::Count,
        global = true,
        help = "Increase logging verbosity"
    )]
  verbose: u8,

  /// Skip interactive confirmations and accept default choices
  #[arg(long, global = true, help = "Accept defaults for all prompts")]
  accept_defaults: bool,

  #[command(subcommand)]
  command: Commands,
}

#[derive(Subcommand)]
enum Commands {
  /// Initialize a new gleaner database
  Init {
    /// Path where the database should be created
    #[arg(long, short)]
    path: Option<PathBuf>,
  },
  /// Run the harvesting pipeline once
  Run {
    /// Category listing path to scrape (e.g. list/cs/recent)
    #[arg(long)]
    category:    Option<String>,
    /// Maximum number of papers to accept from the listing
    #[arg(long)]
    max_results: Option<usize>,
    /// Path to the database file
    #[arg(long, short)]
    path:        Option<PathBuf>,
    /// Root directory for the response cache
    #[arg(long)]
    cache_dir:   Option<PathBuf>,
  },
  /// Removes the entire database
  Clean {
    /// Path to the database file
    #[arg(long, short)]
    path: Option<PathBuf>,
  },
  /// Manage the gleanerd daemon
  Daemon {
    #[command(subcommand)]
    command: DaemonCommands,
  },
}

/// Setup logging with the specified verbosity level
fn setup_logging(verbosity: u8) {
  let filter = match verbosity {
    0 => "warn",
    1 => "info",
    2 => "debug",
    _ => "trace",
  };

  let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

  tracing_subscriber::fmt()
    .with_env_filter(filter)
    .with_file(true)
    .with_line_number(true)
    .with_target(true)
    .init();
}

fn main() -> Result<(), GleanerdErrors> {
  let cli = Cli::parse();

  match cli.command {
    // The daemon configures its own file logging after forking.
    Commands::Daemon { command } => {
      let daemon = Daemon::new();
      match command {
        DaemonCommands::Start => daemon.start(),
        DaemonCommands::Stop => daemon.stop(),
        DaemonCommands::Restart => daemon.restart(),
        DaemonCommands::Install => daemon.install(),
        DaemonCommands::Uninstall => daemon.uninstall(),
        DaemonCommands::Status => daemon.status(),
      }
    },
    command => {
      setup_logging(cli.verbose);
      let runtime = tokio::runtime::Runtime::new()?;
      runtime.block_on(execute(command, cli.accept_defaults))
    },
  }
}

/// Runs one non-daemon CLI command to completion.
async fn execute(command: Commands, accept_defaults: bool) -> Result<(), GleanerdErrors> {
  match command {
    Commands::Init { path } => {
      let path = path.unwrap_or_else(|| {
        let default_path = Database::default_path();
        println!(
          "{} Using default database path: {}",
          style(BOOKS).cyan(),
          style(default_path.display()).yellow()
        );
        default_path
      });

      if path.exists() {
        println!(
          "{} Database already exists at: {}",
          style(WARNING).yellow(),
          style(path.display()).yellow()
        );

        if !accept_defaults {
          // First confirmation with proper prompt
          let confirm = dialoguer::Confirm::new()
            .with_prompt(
              "Do you want to reinitialize this database? This will erase all existing data",
            )
            .default(false)
            .interact()?;

          if !confirm {
            println!("{} Keeping existing database", style("ℹ").blue());
            return Ok(());
          }

          // Require typing INIT for final confirmation
          let input = dialoguer::Input::<String>::new()
            .with_prompt(format!(
              "{} Type {} to confirm reinitialization",
              style("⚠️").red(),
              style("INIT").red().bold()
            ))
            .interact_text()?;

          if input != "INIT" {
            println!("{} Operation cancelled, keeping existing database", style("ℹ").blue());
            return Ok(());
          }
        }

        // Remove existing database
        println!("{} Removing existing database", style(WARNING).yellow());
        std::fs::remove_file(&path)?;
      }

      // Create parent directories if they don't exist
      if let Some(parent) = path.parent() {
        trace!("Creating parent directories: {}", parent.display());
        std::fs::create_dir_all(parent)?;
      }

      println!(
        "{} Initializing database at: {}",
        style(ROCKET).cyan(),
        style(path.display()).yellow()
      );

      Database::open(&path).await?;

      println!("{} Database initialized successfully!", style(SUCCESS).green());
      Ok(())
    },

    Commands::Run { category, max_results, path, cache_dir } => {
      let mut config = Config::from_env()?;
      if let Some(category) = category {
        config.category_path = category;
      }
      if let Some(max_results) = max_results {
        config.max_results = max_results;
      }
      if let Some(path) = path {
        config.database_path = path;
      }
      if let Some(cache_dir) = cache_dir {
        config.cache_dir = cache_dir;
      }

      println!(
        "{} Harvesting {} (up to {} papers)",
        style(LOOKING_GLASS).cyan(),
        style(&config.category_path).yellow(),
        style(config.max_results).yellow()
      );

      let papers = pipeline::run(&config).await?;

      println!(
        "{} Processed {} papers into {}",
        style(SAVE).green(),
        style(papers.len()).yellow(),
        style(config.database_path.display()).yellow()
      );
      Ok(())
    },

    Commands::Clean { path } => {
      let path = path.unwrap_or_else(Database::default_path);
      if path.exists() {
        println!(
          "{} Database found at: {}",
          style(WARNING).yellow(),
          style(path.display()).yellow()
        );

        if !accept_defaults {
          // First confirmation
          if !dialoguer::Confirm::new()
            .with_prompt("Are you sure you want to delete this database?")
            .default(false)
            .wait_for_newline(true)
            .interact()?
          {
            println!("{} Operation cancelled", style("✖").red());
            return Ok(());
          }

          // Require typing DELETE for final confirmation
          let input = dialoguer::Input::<String>::new()
            .with_prompt(format!(
              "{} Type {} to confirm deletion",
              style("⚠️").red(),
              style("DELETE").red().bold()
            ))
            .interact_text()?;

          if input != "DELETE" {
            println!("{} Operation cancelled", style("✖").red());
            return Ok(());
          }
        }

        // Proceed with deletion
        println!(
          "{} Removing database: {}",
          style(WARNING).yellow(),
          style(path.display()).yellow()
        );
        std::fs::remove_file(&path)?;
        println!("{} Database files cleaned", style(SUCCESS).green());
      } else {
        println!(
          "{} No database found at: {}",
          style(WARNING).yellow(),
          style(path.display()).yellow()
        );
      }
      Ok(())
    },

    Commands::Daemon { .. } => unreachable!("daemon commands are dispatched before the runtime"),
  }
}
