mod init_db;
mod notify;
mod run;

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "adweekly")]
#[command(about = "Weekly ad performance report for Notion")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Fetch last week's insights and create or update its Notion report page
    Run {
        /// Last day of the 7-day window (defaults to yesterday)
        #[arg(long)]
        week_end: Option<NaiveDate>,
        /// Build the report and plan the write without touching Notion
        #[arg(long)]
        dry_run: bool,
    },
    /// Build the report offline from a JSON snapshot of raw rows and print it
    Plan {
        /// Snapshot file with `insights` and `demographics` arrays
        #[arg(long)]
        input: PathBuf,
        /// Last day of the 7-day window (defaults to the latest row date)
        #[arg(long)]
        week_end: Option<NaiveDate>,
        /// Report settings YAML (defaults to built-in settings)
        #[arg(long, env = "ADWEEKLY_SETTINGS_PATH")]
        settings: Option<PathBuf>,
    },
    /// Create the report database under a parent page
    InitDb {
        #[arg(long, env = "NOTION_TOKEN", hide_env_values = true)]
        notion_token: String,
        #[arg(long, env = "NOTION_PARENT_PAGE_ID")]
        parent_page_id: String,
        #[arg(long, env = "NOTION_BASE_URL", default_value = adweekly_notion::client::DEFAULT_BASE_URL)]
        notion_base_url: String,
        /// Database title
        #[arg(long, default_value = "Weekly Ad Reports")]
        title: String,
        /// Currency used for money column formats
        #[arg(long, default_value = "KRW")]
        currency: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { week_end, dry_run } => {
            let config = adweekly_core::load_app_config()?;
            init_tracing(&config.log_level)?;
            run::run_weekly(&config, week_end, dry_run).await
        }
        Commands::Plan {
            input,
            week_end,
            settings,
        } => {
            init_tracing("info")?;
            run::run_plan(&input, week_end, settings.as_deref())
        }
        Commands::InitDb {
            notion_token,
            parent_page_id,
            notion_base_url,
            title,
            currency,
        } => {
            init_tracing("info")?;
            init_db::run_init_db(&notion_token, &parent_page_id, &notion_base_url, &title, &currency)
                .await
        }
    }
}

/// `RUST_LOG` wins over the configured level. Logs go to stderr so command
/// output on stdout stays machine-readable.
fn init_tracing(default_level: &str) -> anyhow::Result<()> {
    let env_filter =
        EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default_level))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();
    Ok(())
}
