mod news;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Debug, Parser)]
#[command(name = "mnm-cli")]
#[command(about = "Market news monitor command line interface")]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Aggregate and classify news for one or more companies
    Fetch {
        /// Company to search for (repeatable)
        #[arg(long = "company", required = true)]
        companies: Vec<String>,

        /// Print one JSON object per line instead of a table
        #[arg(long)]
        json: bool,
    },
    /// Probe every enabled source on its own and report what each returns
    Sources {
        /// Company to search for (repeatable)
        #[arg(long = "company", required = true)]
        companies: Vec<String>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = mnm_core::load_app_config()?;
    let env_filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(config.log_level.clone()))?;
    tracing_subscriber::fmt()
        .with_env_filter(env_filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let news_config = mnm_news::NewsConfig::from_app_config(&config)?;

    match cli.command {
        Some(Commands::Fetch { companies, json }) => {
            news::run_fetch(&news_config, &companies, json).await?;
        }
        Some(Commands::Sources { companies }) => {
            news::run_sources_probe(&news_config, &companies).await?;
        }
        None => println!("mnm-cli ready; see --help"),
    }

    Ok(())
}
