//! Price oracle: the freshest known price pair, published lock-free.
//!
//! Every refresh builds a new immutable [`PriceSnapshot`] and publishes it
//! with a single atomic pointer swap, so readers do one atomic load and
//! never contend with the writer. A per-venue fetch failure keeps that
//! venue's previous quote in place rather than zeroing it.

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::Utc;
use rust_decimal::Decimal;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::domain::{PriceSnapshot, TradingPair, VenueQuote};
use crate::venue::{ExchangeClient, PoolClient};

struct Worker {
    stop: watch::Sender<bool>,
    task: JoinHandle<()>,
}

/// Owns the last-known price from each venue.
pub struct PriceOracle {
    pair: TradingPair,
    exchange: Arc<dyn ExchangeClient>,
    pool: Arc<dyn PoolClient>,
    snapshot: ArcSwap<PriceSnapshot>,
    /// Serializes concurrent refreshes (background worker vs. a forced
    /// refresh) so the read-modify-publish cannot lose an update. Readers
    /// never touch this.
    refresh_gate: tokio::sync::Mutex<()>,
    worker: parking_lot::Mutex<Option<Worker>>,
}

impl PriceOracle {
    pub fn new(
        pair: TradingPair,
        exchange: Arc<dyn ExchangeClient>,
        pool: Arc<dyn PoolClient>,
    ) -> Self {
        Self {
            pair,
            exchange,
            pool,
            snapshot: ArcSwap::from_pointee(PriceSnapshot::default()),
            refresh_gate: tokio::sync::Mutex::new(()),
            worker: parking_lot::Mutex::new(None),
        }
    }

    /// Current snapshot: one atomic load, never partially updated.
    pub fn snapshot(&self) -> PriceSnapshot {
        **self.snapshot.load()
    }

    /// Fetch both venue prices and publish a new snapshot.
    ///
    /// The two fetches run concurrently, bounding refresh latency to the
    /// slower venue rather than the sum. A venue that errors (or reports a
    /// non-positive price) is logged and keeps its stale quote.
    pub async fn refresh(&self) {
        let _gate = self.refresh_gate.lock().await;

        let (exchange_res, pool_res) =
            tokio::join!(self.exchange.price(&self.pair), self.pool.price());

        let previous = self.snapshot();
        let now = Utc::now();

        let exchange = match exchange_res {
            Ok(price) if price > Decimal::ZERO => Some(VenueQuote::new(price, now)),
            Ok(price) => {
                warn!(venue = "exchange", %price, "Non-positive price, keeping stale quote");
                previous.exchange
            }
            Err(e) => {
                warn!(venue = "exchange", error = %e, "Price refresh failed, keeping stale quote");
                previous.exchange
            }
        };

        let pool = match pool_res {
            Ok(price) if price > Decimal::ZERO => Some(VenueQuote::new(price, now)),
            Ok(price) => {
                warn!(venue = "pool", %price, "Non-positive price, keeping stale quote");
                previous.pool
            }
            Err(e) => {
                warn!(venue = "pool", error = %e, "Price refresh failed, keeping stale quote");
                previous.pool
            }
        };

        self.snapshot.store(Arc::new(PriceSnapshot { exchange, pool }));
    }

    /// Spawn the background refresh worker: one immediate refresh, then one
    /// per `interval` until [`stop`](Self::stop) is called.
    ///
    /// An oracle runs at most one worker; a second `start` is ignored with
    /// a warning.
    pub fn start(self: &Arc<Self>, interval: Duration) {
        let mut slot = self.worker.lock();
        if slot.is_some() {
            warn!("Price oracle worker already running, ignoring start");
            return;
        }

        let (stop_tx, mut stop_rx) = watch::channel(false);
        let oracle = Arc::clone(self);

        let task = tokio::spawn(async move {
            let mut ticker = tokio::time::interval(interval);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

            loop {
                tokio::select! {
                    result = stop_rx.changed() => {
                        if result.is_err() || *stop_rx.borrow() {
                            break;
                        }
                    }
                    _ = ticker.tick() => {
                        oracle.refresh().await;
                    }
                }
            }

            debug!("Price oracle worker stopped");
        });

        info!(interval_secs = interval.as_secs(), "Price oracle worker started");
        *slot = Some(Worker { stop: stop_tx, task });
    }

    /// Stop the worker after its current cycle. Idempotent: stopping an
    /// oracle that never started (or stopping twice) is a no-op.
    pub async fn stop(&self) {
        let worker = self.worker.lock().take();

        let Some(worker) = worker else {
            debug!("Price oracle already stopped");
            return;
        };

        let _ = worker.stop.send(true);
        let _ = worker.task.await;
    }
}
