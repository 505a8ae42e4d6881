//! Application lifecycle.
//!
//! [`App::start`] brings the price oracle worker up first and the spread
//! detector loop second, so the detector never runs against an oracle that
//! does not exist yet. [`App::close`] tears the two down in the opposite
//! order and is safe to call more than once.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::{Config, VenueKind};
use crate::error::Result;
use crate::service::{
    Evaluation, Event, LogNotifier, NotifierRegistry, PriceOracle, SpreadDetector, TradeSequencer,
};
use crate::venue::sim::{SimExchange, SimPool};
use crate::venue::{ExchangeClient, PoolClient};

#[cfg(feature = "telegram")]
use crate::service::{TelegramConfig, TelegramNotifier};

/// The running system: oracle worker + detector loop.
pub struct App {
    oracle: Arc<PriceOracle>,
    detector: Arc<SpreadDetector>,
    shutdown: watch::Sender<bool>,
    detector_task: parking_lot::Mutex<Option<JoinHandle<()>>>,
    closed: AtomicBool,
}

impl App {
    /// Start the oracle worker, then the detector loop.
    ///
    /// The venue clients are injected so the core never knows what is
    /// behind them; `paper` in the config decides whether the sequencer
    /// places real orders.
    pub fn start(
        config: &Config,
        exchange: Arc<dyn ExchangeClient>,
        pool: Arc<dyn PoolClient>,
        notifiers: NotifierRegistry,
    ) -> Result<Self> {
        let pair = config.trading_pair()?;
        let notifiers = Arc::new(notifiers);

        let oracle = Arc::new(PriceOracle::new(
            pair.clone(),
            Arc::clone(&exchange),
            Arc::clone(&pool),
        ));
        let sequencer = Arc::new(TradeSequencer::new(
            pair.clone(),
            exchange,
            pool,
            config.trade.paper,
            config.trade.size_precision,
        ));
        let detector = Arc::new(SpreadDetector::new(
            Arc::clone(&oracle),
            sequencer,
            Arc::clone(&notifiers),
            config.detector.spread_threshold_pct,
            Duration::from_secs(config.detector.interval_secs),
        ));

        oracle.start(Duration::from_secs(config.oracle.refresh_interval_secs));

        let (shutdown, shutdown_rx) = watch::channel(false);
        let detector_task = tokio::spawn(Arc::clone(&detector).run(shutdown_rx));

        notifiers.notify_all(Event::Started {
            pair: pair.to_string(),
            paper: config.trade.paper,
        });

        Ok(Self {
            oracle,
            detector,
            shutdown,
            detector_task: parking_lot::Mutex::new(Some(detector_task)),
            closed: AtomicBool::new(false),
        })
    }

    /// Run one detection + execution cycle synchronously, outside the loop's
    /// own schedule. The sequencer's admission gate still applies.
    pub async fn evaluate_once(&self) -> Evaluation {
        self.detector.evaluate_once().await
    }

    /// Stop the detector loop, then the oracle worker.
    ///
    /// Waits for any in-flight evaluation (including its execution) to
    /// drain, so no background task outlives this call. Calling `close`
    /// again is a no-op.
    pub async fn close(&self) {
        if self.closed.swap(true, Ordering::SeqCst) {
            debug!("Already closed");
            return;
        }

        info!("Shutting down");
        let _ = self.shutdown.send(true);

        let task = self.detector_task.lock().take();
        if let Some(task) = task {
            if task.await.is_err() {
                warn!("Detector task ended abnormally");
            }
        }

        self.oracle.stop().await;
        info!("Shutdown complete");
    }
}

/// Build the venue pair the config asks for.
pub fn build_venues(config: &Config) -> Result<(Arc<dyn ExchangeClient>, Arc<dyn PoolClient>)> {
    match config.venues.kind {
        VenueKind::Sim => {
            let sim = &config.venues.sim;
            let base = config.trading_pair()?.base().to_string();
            info!(
                exchange_price = %sim.exchange_price,
                pool_price = %sim.pool_price,
                "Using simulated venues"
            );
            Ok((
                Arc::new(SimExchange::new(sim.exchange_price).with_balance(&base, sim.seed_balance)),
                Arc::new(
                    SimPool::new(sim.pool_price, sim.pool_liquidity)
                        .with_balance(&base, sim.seed_balance),
                ),
            ))
        }
    }
}

/// Build the notifier registry from configuration. The log sink is always
/// registered; Telegram joins it when enabled and configured.
pub fn build_notifier_registry(config: &Config) -> NotifierRegistry {
    let mut registry = NotifierRegistry::new();
    registry.register(Box::new(LogNotifier));

    #[cfg(feature = "telegram")]
    if config.telegram.enabled {
        if let Some(tg_config) = TelegramConfig::from_env() {
            let tg_config = TelegramConfig {
                notify_spread_checks: config.telegram.notify_spread_checks,
                notify_opportunities: config.telegram.notify_opportunities,
                notify_executions: config.telegram.notify_executions,
                ..tg_config
            };
            registry.register(Box::new(TelegramNotifier::new(tg_config)));
            info!("Telegram notifier enabled");
        } else {
            warn!("Telegram enabled but TELEGRAM_BOT_TOKEN or TELEGRAM_CHAT_ID not set");
        }
    }

    #[cfg(not(feature = "telegram"))]
    let _ = config;

    registry
}
