//! Immutable price snapshot shared between the oracle and the detector.

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;

/// One venue's last successful price observation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VenueQuote {
    pub price: Decimal,
    pub captured_at: DateTime<Utc>,
}

impl VenueQuote {
    pub fn new(price: Decimal, captured_at: DateTime<Utc>) -> Self {
        Self { price, captured_at }
    }
}

/// The freshest known price pair.
///
/// A snapshot is an immutable value: the oracle builds a new one on every
/// refresh and publishes it whole, so readers can never observe a
/// half-written pair. A venue that has never been fetched successfully is
/// `None`; a venue whose refresh failed keeps its previous quote. The two
/// quotes may carry different capture times; the prices are independent
/// observations and cross-venue capture atomicity is not required.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PriceSnapshot {
    pub exchange: Option<VenueQuote>,
    pub pool: Option<VenueQuote>,
}

impl PriceSnapshot {
    /// Relative spread of the exchange price over the pool price, in
    /// percent: `(exchange - pool) / pool * 100`.
    ///
    /// `None` until both venues have produced at least one quote, or if the
    /// pool price is not strictly positive.
    pub fn spread_pct(&self) -> Option<Decimal> {
        let exchange = self.exchange?.price;
        let pool = self.pool?.price;

        if pool <= Decimal::ZERO {
            return None;
        }

        Some((exchange - pool) / pool * Decimal::ONE_HUNDRED)
    }

    /// Midpoint of the two venue prices.
    pub fn mid_price(&self) -> Option<Decimal> {
        let exchange = self.exchange?.price;
        let pool = self.pool?.price;
        Some((exchange + pool) / Decimal::TWO)
    }
}
