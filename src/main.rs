use std::net::SocketAddr;
use std::process::ExitCode;
use std::sync::Arc;

use anyhow::Context;
use bindays::cache::{AddressKeyCache, FileAddressCache, MemoryAddressCache, NoCache};
use bindays::cli::{Args, Command};
use bindays::config::Config;
use bindays::logging::setup_logging;
use bindays::lookup::BinDayLookup;
use bindays::web::{AppState, create_router};
use clap::Parser;
use tracing::{error, info};

/// Exit status for any failed lookup, whatever the cause.
const FAILURE: u8 = 1;

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();

    let args = Args::parse();

    let config = match Config::load() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("error: {e:#}");
            return ExitCode::from(FAILURE);
        }
    };
    setup_logging(&config, args.tracing);

    info!(
        version = env!("CARGO_PKG_VERSION"),
        commit = env!("GIT_COMMIT_SHORT"),
        base_url = %config.base_url,
        "starting bindays"
    );

    let result = match args.command {
        Command::Lookup {
            postcode,
            house,
            no_cache,
            json,
        } => lookup(&config, &postcode, &house, no_cache, json).await,
        Command::Serve { port } => serve(&config, port.unwrap_or(config.port)).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = ?e, "command failed");
            eprintln!("error: {e:#}");
            ExitCode::from(FAILURE)
        }
    }
}

async fn lookup(
    config: &Config,
    postcode: &str,
    house: &str,
    no_cache: bool,
    json: bool,
) -> anyhow::Result<()> {
    let cache: Arc<dyn AddressKeyCache> = if no_cache {
        Arc::new(NoCache)
    } else {
        match &config.cache_dir {
            Some(dir) => Arc::new(FileAddressCache::new(dir)),
            None => Arc::new(FileAddressCache::in_home()?),
        }
    };

    let lookup = BinDayLookup::new(config.form_client()?, cache);
    let dates = lookup.find_dates(postcode, house).await?;

    if json {
        println!("{}", serde_json::to_string_pretty(&dates)?);
    } else {
        println!("dates for {house} {postcode} are {dates}");
    }
    Ok(())
}

async fn serve(config: &Config, port: u16) -> anyhow::Result<()> {
    // Addresses are cached in memory only; the service keeps no files
    let lookup = BinDayLookup::new(config.form_client()?, Arc::new(MemoryAddressCache::new()));

    // Three sequential upstream requests, plus slack
    let timeout = config.request_timeout * 3 + std::time::Duration::from_secs(5);
    let app = create_router(AppState { lookup }, timeout);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    info!(%addr, "listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(async {
            let _ = tokio::signal::ctrl_c().await;
            info!("shutdown signal received");
        })
        .await
        .context("HTTP server failed")
}
