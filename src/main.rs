//! Entry point: parse CLI, build the client and dispatch to command handlers.

use clap::Parser;
use sports_odds::{
    cli::{Commands, SportsCli},
    commands::{
        event_details::handle_event_details, event_stats::handle_event_stats,
        matches::handle_matches,
    },
    Result, SportsClient,
};
use tracing_subscriber::EnvFilter;

async fn run(app: SportsCli) -> Result<()> {
    let client = SportsClient::from_env()?;
    let options = app.output.fetch_options();
    let as_json = app.output.json;

    match app.command {
        Commands::Matches { limit, live } => {
            handle_matches(&client, limit, live, as_json, options).await?
        }
        Commands::Details { event_id } => {
            handle_event_details(&client, &event_id, as_json, options).await?
        }
        Commands::Stats { event_id } => {
            handle_event_stats(&client, &event_id, as_json, options).await?
        }
    }

    Ok(())
}

/// Run the CLI.
#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let app = SportsCli::parse();

    if let Err(err) = run(app).await {
        eprintln!("Error ({}): {}", err.category(), err);
        std::process::exit(1);
    }
}
