use clap::Parser;
use gaptrap::app::{build_notifier_registry, build_venues, App};
use gaptrap::config::Config;
use tokio::signal;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(version, about = "CEX/DEX spread watcher and two-leg arbitrage executor")]
struct Args {
    /// Path to the TOML config file
    #[arg(long, default_value = "config.toml")]
    config: String,

    /// Force paper trading regardless of the config file
    #[arg(long)]
    paper: bool,
}

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();
    let args = Args::parse();

    let mut config = match Config::load(&args.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    if args.paper {
        config.trade.paper = true;
    }

    config.init_logging();
    info!(
        mode = if config.trade.paper { "paper" } else { "live" },
        "gaptrap starting"
    );

    let (exchange, pool) = match build_venues(&config) {
        Ok(venues) => venues,
        Err(e) => {
            error!(error = %e, "Failed to build venue clients");
            std::process::exit(1);
        }
    };
    let notifiers = build_notifier_registry(&config);

    let app = match App::start(&config, exchange, pool, notifiers) {
        Ok(app) => app,
        Err(e) => {
            error!(error = %e, "Failed to start");
            std::process::exit(1);
        }
    };

    if let Err(e) = signal::ctrl_c().await {
        error!(error = %e, "Failed to listen for shutdown signal");
    }

    info!("Shutdown signal received");
    app.close().await;
    info!("gaptrap stopped");
}
