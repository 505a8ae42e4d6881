//! Detected arbitrage opportunities.

use std::fmt;

use rust_decimal::Decimal;

use super::snapshot::PriceSnapshot;
use super::trade::Side;

/// Which venue to buy on and which to sell on.
///
/// The sign convention: a positive spread means the pool is the cheaper
/// venue, so the pool leg buys and the exchange leg sells.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TradeDirection {
    BuyPoolSellExchange,
    BuyExchangeSellPool,
}

impl TradeDirection {
    /// Side of the on-chain pool leg.
    pub fn pool_side(self) -> Side {
        match self {
            Self::BuyPoolSellExchange => Side::Buy,
            Self::BuyExchangeSellPool => Side::Sell,
        }
    }

    /// Side of the exchange leg (always the opposite of the pool leg).
    pub fn exchange_side(self) -> Side {
        self.pool_side().opposite()
    }
}

impl fmt::Display for TradeDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BuyPoolSellExchange => write!(f, "buy pool / sell exchange"),
            Self::BuyExchangeSellPool => write!(f, "buy exchange / sell pool"),
        }
    }
}

/// A spread wide enough to act on.
///
/// Created transiently by the detector each cycle and consumed immediately
/// by the sequencer or dropped; never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Opportunity {
    pub direction: TradeDirection,
    /// Midpoint of the two venue prices at detection time.
    pub reference_price: Decimal,
    pub spread_pct: Decimal,
}

impl Opportunity {
    /// Classify a snapshot against the spread threshold.
    ///
    /// Returns `None` when either venue has no quote yet, or when the
    /// absolute spread does not strictly exceed the threshold. A spread of
    /// exactly the threshold is not an opportunity.
    pub fn classify(snapshot: &PriceSnapshot, threshold_pct: Decimal) -> Option<Self> {
        let spread_pct = snapshot.spread_pct()?;
        let reference_price = snapshot.mid_price()?;

        if spread_pct.abs() <= threshold_pct {
            return None;
        }

        let direction = if spread_pct > Decimal::ZERO {
            TradeDirection::BuyPoolSellExchange
        } else {
            TradeDirection::BuyExchangeSellPool
        };

        Some(Self {
            direction,
            reference_price,
            spread_pct,
        })
    }
}
