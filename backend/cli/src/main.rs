mod permissions_cmd;
mod stats_cmd;
mod window_cmd;

use std::path::PathBuf;

use anyhow::Result;
use clap::{Parser, Subcommand};

use activity24_config::{config_dir, config_file_path, load_and_prepare, load_config, Activity24Config};
use activity24_stats::LanguagePack;

#[derive(Parser)]
#[command(name = "activity24")]
#[command(about = "Forum activity over the last 24 hours")]
#[command(version)]
struct Cli {
    /// Config file (defaults to the platform config dir)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the activity block for a viewer and print it as JSON
    Stats {
        /// SQLite forum database
        #[arg(long)]
        db: PathBuf,
        /// User id of the viewer
        #[arg(long, default_value_t = 1)]
        viewer: i64,
        /// Permission granted to the viewer (repeatable)
        #[arg(long = "grant")]
        grants: Vec<String>,
        /// Unix timestamp to render at (defaults to now)
        #[arg(long)]
        now: Option<i64>,
        /// Log every hook phase as it fires
        #[arg(long)]
        trace_hooks: bool,
    },
    /// List the permissions the extension contributes
    Permissions,
    /// Show the window for a lookback interval
    Window {
        #[arg(long, default_value_t = 86_400)]
        seconds: i64,
        #[arg(long)]
        now: Option<i64>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let path = cli
        .config
        .unwrap_or_else(|| config_file_path(&config_dir()));

    // Logger first so config warnings are visible.
    let raw = load_config(&path).await?;
    activity24_logging::init_logger(raw.log_level(), raw.log_dir().map(|d| d.as_path()));
    let config = load_and_prepare(&path).await?;

    match cli.command {
        Commands::Stats {
            db,
            viewer,
            grants,
            now,
            trace_hooks,
        } => {
            let args = stats_cmd::StatsArgs {
                db,
                viewer,
                grants,
                now: now.unwrap_or_else(unix_now),
                trace_hooks,
            };
            stats_cmd::run(&config, language(&config), args).await?;
        }
        Commands::Permissions => permissions_cmd::run(&language(&config)),
        Commands::Window { seconds, now } => {
            window_cmd::run(seconds, now.unwrap_or_else(unix_now), &language(&config));
        }
    }

    Ok(())
}

fn unix_now() -> i64 {
    chrono::Utc::now().timestamp()
}

/// English strings with the configured overrides applied.
fn language(config: &Activity24Config) -> LanguagePack {
    let mut pack = LanguagePack::english();
    if let Some(lang) = &config.language {
        pack.apply_overrides(&lang.overrides);
    }
    pack
}
