use std::path::PathBuf;

use anyhow::Context;
use clap::Parser;
use quiz_cms::db::{self, run_migrations};
use quiz_cms::server::app::run_server;
use quiz_cms::settings::Settings;
use quiz_cms::telemetry::init_tracing;

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    /// Settings file, `quiz-cms.toml` in the working directory when omitted
    #[clap(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();
    let cli = Cli::parse();
    let settings = Settings::load(cli.config.as_deref()).context("Cannot load settings")?;

    let pool = db::establish_connection(&settings.database)
        .await
        .context("Cannot connect to DB")?;

    tracing::info!("Running db migrations...");
    run_migrations(&pool).await?;

    run_server(pool, &settings.server, &settings.graphql).await
}
