use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use quiz_cms::db::{self, run_migrations};
use quiz_cms::settings::Settings;
use quiz_cms::telemetry::init_tracing;
use quiz_cms::transfer::{export_data, import_data};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Settings file, `quiz-cms.toml` in the working directory when omitted
    #[clap(short, long)]
    config: Option<PathBuf>,
    #[clap(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Apply pending database migrations
    Migrate,
    /// Import quiz content from a directory of CSV files
    Import { path: PathBuf },
    /// Export quiz content to a directory of CSV files
    Export { path: PathBuf },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Cannot load settings")?;
    let pool = db::establish_connection(&settings.database)
        .await
        .context("Cannot connect to DB")?;
    run_migrations(&pool).await.context("Migrations failed")?;

    match cli.command {
        Commands::Migrate => tracing::info!("Database is up to date"),
        Commands::Export { path } => export_data(&pool, &path).await.context("Cannot export")?,
        Commands::Import { path } => import_data(&pool, &path).await.context("Cannot import")?,
    }
    Ok(())
}
