//! Venue-agnostic domain types: trading pairs, price snapshots,
//! opportunities, and trade results.

mod opportunity;
mod pair;
mod snapshot;
mod trade;

pub use opportunity::{Opportunity, TradeDirection};
pub use pair::TradingPair;
pub use snapshot::{PriceSnapshot, VenueQuote};
pub use trade::{
    BalanceSnapshot, ExecutionOutcome, ExecutionReport, LegOutcome, Side, TradeLegResult, Venue,
};
