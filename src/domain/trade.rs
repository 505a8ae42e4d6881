//! Trade leg results and balance observations.

use std::collections::HashMap;
use std::fmt;

use rust_decimal::Decimal;

/// A price-providing, trade-accepting counterparty.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Venue {
    Exchange,
    Pool,
}

impl fmt::Display for Venue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Exchange => write!(f, "exchange"),
            Self::Pool => write!(f, "pool"),
        }
    }
}

/// Order side.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn opposite(self) -> Self {
        match self {
            Self::Buy => Self::Sell,
            Self::Sell => Self::Buy,
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Buy => write!(f, "buy"),
            Self::Sell => write!(f, "sell"),
        }
    }
}

/// What became of a single leg.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LegOutcome {
    /// The venue accepted the order / the transaction settled.
    Filled,
    /// Paper mode: the decision was made but no order was issued.
    Simulated,
    /// The venue call failed; the message is for telemetry only.
    Failed(String),
}

/// One side of the two-leg trade, for logging and telemetry. Never retried.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradeLegResult {
    pub venue: Venue,
    pub side: Side,
    /// Base-asset amount the leg traded (or would have traded).
    pub amount: Decimal,
    /// Execution price for the exchange leg, target price for the pool leg.
    pub price: Decimal,
    pub outcome: LegOutcome,
}

impl TradeLegResult {
    pub fn succeeded(&self) -> bool {
        !matches!(self.outcome, LegOutcome::Failed(_))
    }
}

/// Terminal state of a sequenced execution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionOutcome {
    /// Both legs completed (or were simulated).
    Completed,
    /// The pool leg failed; the exchange leg was never attempted and no
    /// state changed anywhere.
    FirstLegFailed(String),
    /// The pool leg settled but the exchange leg failed: the book is now
    /// inventory-imbalanced and an operator has to intervene. Not retried.
    SecondLegFailed(String),
}

/// The sequencer's account of one execution attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionReport {
    pub paper: bool,
    pub legs: Vec<TradeLegResult>,
    pub outcome: ExecutionOutcome,
}

impl ExecutionReport {
    pub fn is_completed(&self) -> bool {
        matches!(self.outcome, ExecutionOutcome::Completed)
    }
}

/// Per-venue holdings, fetched best-effort around an execution for
/// observability. Sizing never reads this.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BalanceSnapshot {
    pub exchange: HashMap<String, Decimal>,
    pub pool: HashMap<String, Decimal>,
    /// Native/gas balance on the chain side, if the query succeeded.
    pub gas: Option<Decimal>,
}
