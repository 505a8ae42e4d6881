//! Spread detection loop.
//!
//! One cycle: refresh prices, read the snapshot, classify the spread, and
//! if it clears the threshold hand the opportunity straight to the
//! sequencer and wait for it. The synchronous hand-off is deliberate: the
//! loop cannot start a new evaluation while an execution is in flight, so
//! exposure is bounded to one trade pair at a time.

use std::sync::Arc;
use std::time::Duration;

use rust_decimal::Decimal;
use tokio::sync::watch;
use tracing::{debug, info, warn};

use crate::domain::{ExecutionOutcome, ExecutionReport, Opportunity};
use crate::service::notifier::{Event, NotifierRegistry};
use crate::service::oracle::PriceOracle;
use crate::service::sequencer::TradeSequencer;

/// What one detection cycle produced.
#[derive(Debug, Clone)]
pub struct Evaluation {
    /// The opportunity, if the spread cleared the threshold.
    pub opportunity: Option<Opportunity>,
    /// The execution report, if an opportunity was handed to the sequencer
    /// and at least one leg was attempted. A pre-leg abort leaves this
    /// `None`; the abort reason is logged.
    pub report: Option<ExecutionReport>,
}

impl Evaluation {
    fn idle() -> Self {
        Self {
            opportunity: None,
            report: None,
        }
    }
}

pub struct SpreadDetector {
    oracle: Arc<PriceOracle>,
    sequencer: Arc<TradeSequencer>,
    notifiers: Arc<NotifierRegistry>,
    threshold_pct: Decimal,
    interval: Duration,
}

impl SpreadDetector {
    pub fn new(
        oracle: Arc<PriceOracle>,
        sequencer: Arc<TradeSequencer>,
        notifiers: Arc<NotifierRegistry>,
        threshold_pct: Decimal,
        interval: Duration,
    ) -> Self {
        Self {
            oracle,
            sequencer,
            notifiers,
            threshold_pct,
            interval,
        }
    }

    /// Run exactly one detection + execution cycle.
    ///
    /// Forces a synchronous price refresh first, so the decision is made on
    /// quotes no older than this call. Every failure inside the cycle is
    /// recovered here: the caller always gets an [`Evaluation`] back.
    pub async fn evaluate_once(&self) -> Evaluation {
        self.oracle.refresh().await;
        let snapshot = self.oracle.snapshot();

        let (Some(exchange), Some(pool)) = (snapshot.exchange, snapshot.pool) else {
            debug!("Waiting for first quotes from both venues");
            return Evaluation::idle();
        };

        let Some(spread_pct) = snapshot.spread_pct() else {
            debug!("Spread undefined for current snapshot");
            return Evaluation::idle();
        };

        self.notifiers.notify_all(Event::SpreadEvaluated {
            exchange_price: exchange.price,
            pool_price: pool.price,
            spread_pct,
        });

        let Some(opportunity) = Opportunity::classify(&snapshot, self.threshold_pct) else {
            return Evaluation::idle();
        };

        self.notifiers
            .notify_all(Event::OpportunityDetected(opportunity));

        let report = match self.sequencer.execute(&opportunity).await {
            Ok(report) => {
                if let ExecutionOutcome::SecondLegFailed(details) = &report.outcome {
                    self.notifiers.notify_all(Event::InventoryImbalance {
                        details: details.clone(),
                    });
                }
                self.notifiers.notify_all(Event::ExecutionCompleted {
                    report: report.clone(),
                });
                Some(report)
            }
            Err(e) => {
                warn!(error = %e, "Execution aborted before any leg");
                None
            }
        };

        Evaluation {
            opportunity: Some(opportunity),
            report,
        }
    }

    /// Detection loop: one [`evaluate_once`](Self::evaluate_once) per tick
    /// until the shutdown signal fires. An in-flight evaluation (including
    /// its execution) always completes before the loop exits.
    pub async fn run(self: Arc<Self>, mut shutdown: watch::Receiver<bool>) {
        info!(
            interval_secs = self.interval.as_secs(),
            threshold_pct = %self.threshold_pct,
            "Spread detector started"
        );

        let mut ticker = tokio::time::interval(self.interval);
        ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

        loop {
            tokio::select! {
                result = shutdown.changed() => {
                    if result.is_err() || *shutdown.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    self.evaluate_once().await;
                }
            }
        }

        info!("Spread detector stopped");
    }
}
