//! Operator notification fan-out.
//!
//! Notifications are best-effort: a sink that fails logs the failure and is
//! never allowed to disturb the trading loop.

use rust_decimal::Decimal;
use tracing::{error, info, warn};

use crate::domain::{ExecutionReport, Opportunity};

/// Something the operator may want to hear about.
#[derive(Debug, Clone)]
pub enum Event {
    /// The process came up and both loops are running.
    Started { pair: String, paper: bool },
    /// One detection cycle ran; carries the observed prices. Noisy, so
    /// sinks decide whether to forward it.
    SpreadEvaluated {
        exchange_price: Decimal,
        pool_price: Decimal,
        spread_pct: Decimal,
    },
    /// A spread crossed the threshold.
    OpportunityDetected(Opportunity),
    /// An execution attempt finished, successfully or not.
    ExecutionCompleted { report: ExecutionReport },
    /// High severity: the pool leg settled but the exchange leg did not.
    /// The book is imbalanced until an operator intervenes.
    InventoryImbalance { details: String },
}

/// A notification sink.
pub trait Notifier: Send + Sync {
    fn notify(&self, event: &Event);

    /// Name for logging/debugging.
    fn name(&self) -> &'static str;
}

/// Fans one event out to every registered sink.
#[derive(Default)]
pub struct NotifierRegistry {
    notifiers: Vec<Box<dyn Notifier>>,
}

impl NotifierRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, notifier: Box<dyn Notifier>) {
        self.notifiers.push(notifier);
    }

    pub fn len(&self) -> usize {
        self.notifiers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.notifiers.is_empty()
    }

    pub fn notify_all(&self, event: Event) {
        for notifier in &self.notifiers {
            notifier.notify(&event);
        }
    }
}

/// Sink that writes every event to the log. Always registered.
pub struct LogNotifier;

impl Notifier for LogNotifier {
    fn notify(&self, event: &Event) {
        match event {
            Event::Started { pair, paper } => {
                info!(pair = %pair, paper, "Bot started");
            }
            Event::SpreadEvaluated {
                exchange_price,
                pool_price,
                spread_pct,
            } => {
                info!(
                    exchange = %exchange_price,
                    pool = %pool_price,
                    spread_pct = %spread_pct,
                    "Spread evaluated"
                );
            }
            Event::OpportunityDetected(opp) => {
                info!(
                    direction = %opp.direction,
                    spread_pct = %opp.spread_pct,
                    reference = %opp.reference_price,
                    "Arbitrage opportunity found"
                );
            }
            Event::ExecutionCompleted { report } => {
                if report.is_completed() {
                    info!(paper = report.paper, legs = report.legs.len(), "Execution completed");
                } else {
                    warn!(outcome = ?report.outcome, "Execution did not complete");
                }
            }
            Event::InventoryImbalance { details } => {
                error!(details = %details, "INVENTORY IMBALANCE - operator action required");
            }
        }
    }

    fn name(&self) -> &'static str {
        "log"
    }
}
