//! Deterministic in-process venues.
//!
//! These stand in for the real exchange and pool clients in paper runs and
//! in the integration tests: fixed starting prices, a linear liquidity
//! model for sizing, and seeded balances. A swap nudges the pool price
//! toward the target so repeated cycles converge instead of re-firing on
//! the same spread.

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use parking_lot::Mutex;
use rust_decimal::Decimal;

use crate::domain::{Side, TradingPair};
use crate::error::VenueError;

use super::traits::{ExchangeClient, OrderReceipt, PoolClient, SwapReceipt};

/// Simulated centralized exchange.
pub struct SimExchange {
    price: Mutex<Decimal>,
    balances: Mutex<HashMap<String, Decimal>>,
    order_seq: AtomicU64,
}

impl SimExchange {
    pub fn new(price: Decimal) -> Self {
        Self {
            price: Mutex::new(price),
            balances: Mutex::new(HashMap::new()),
            order_seq: AtomicU64::new(0),
        }
    }

    pub fn with_balance(self, asset: &str, amount: Decimal) -> Self {
        self.balances.lock().insert(asset.to_string(), amount);
        self
    }

    pub fn set_price(&self, price: Decimal) {
        *self.price.lock() = price;
    }
}

#[async_trait]
impl ExchangeClient for SimExchange {
    async fn price(&self, _pair: &TradingPair) -> Result<Decimal, VenueError> {
        Ok(*self.price.lock())
    }

    async fn balance(&self, asset: &str) -> Result<Decimal, VenueError> {
        Ok(self
            .balances
            .lock()
            .get(asset)
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    async fn place_order(
        &self,
        side: Side,
        asset: &str,
        size: Decimal,
        limit_price: Decimal,
    ) -> Result<OrderReceipt, VenueError> {
        if size <= Decimal::ZERO {
            return Err(VenueError::OrderRejected("non-positive size".into()));
        }

        let mut balances = self.balances.lock();
        let held = balances.entry(asset.to_string()).or_insert(Decimal::ZERO);
        match side {
            Side::Buy => *held += size,
            Side::Sell => {
                if *held < size {
                    return Err(VenueError::InsufficientBalance {
                        asset: asset.to_string(),
                    });
                }
                *held -= size;
            }
        }

        let id = self.order_seq.fetch_add(1, Ordering::Relaxed);
        Ok(OrderReceipt {
            order_id: format!("sim-{id}"),
            price: limit_price,
            size,
        })
    }
}

/// Simulated concentrated-liquidity pool.
///
/// Sizing uses a linear model: moving the price by a relative fraction `r`
/// costs `liquidity * r` of the base asset. Targets further than
/// `max_move_pct` from the current price are outside the priced range.
pub struct SimPool {
    price: Mutex<Decimal>,
    liquidity: Decimal,
    max_move_pct: Decimal,
    balances: Mutex<HashMap<String, Decimal>>,
    gas: Decimal,
    swap_seq: AtomicU64,
}

impl SimPool {
    pub fn new(price: Decimal, liquidity: Decimal) -> Self {
        Self {
            price: Mutex::new(price),
            liquidity,
            max_move_pct: Decimal::new(50, 0),
            balances: Mutex::new(HashMap::new()),
            gas: Decimal::ONE,
            swap_seq: AtomicU64::new(0),
        }
    }

    pub fn with_balance(self, asset: &str, amount: Decimal) -> Self {
        self.balances.lock().insert(asset.to_string(), amount);
        self
    }

    pub fn set_price(&self, price: Decimal) {
        *self.price.lock() = price;
    }
}

#[async_trait]
impl PoolClient for SimPool {
    async fn price(&self) -> Result<Decimal, VenueError> {
        Ok(*self.price.lock())
    }

    async fn balance(&self, asset: &str) -> Result<Decimal, VenueError> {
        Ok(self
            .balances
            .lock()
            .get(asset)
            .copied()
            .unwrap_or(Decimal::ZERO))
    }

    async fn gas_balance(&self) -> Result<Decimal, VenueError> {
        Ok(self.gas)
    }

    async fn quote_required_input(
        &self,
        target_price: Decimal,
        _side: Side,
    ) -> Result<Decimal, VenueError> {
        let current = *self.price.lock();
        if target_price <= Decimal::ZERO || current <= Decimal::ZERO {
            return Err(VenueError::QuoteOutOfRange {
                target: target_price,
            });
        }

        let move_pct = ((target_price - current) / current * Decimal::ONE_HUNDRED).abs();
        if move_pct > self.max_move_pct {
            return Err(VenueError::QuoteOutOfRange {
                target: target_price,
            });
        }

        Ok(self.liquidity * move_pct / Decimal::ONE_HUNDRED)
    }

    async fn execute_swap(&self, amount: Decimal, side: Side) -> Result<SwapReceipt, VenueError> {
        if amount <= Decimal::ZERO {
            return Err(VenueError::Reverted("non-positive amount".into()));
        }

        // Buying base lifts the pool price, selling presses it.
        let mut price = self.price.lock();
        let move_pct = amount / self.liquidity;
        let shift = *price * move_pct;
        match side {
            Side::Buy => *price += shift,
            Side::Sell => *price -= shift,
        }

        let id = self.swap_seq.fetch_add(1, Ordering::Relaxed);
        Ok(SwapReceipt {
            tx_id: format!("simtx-{id}"),
            amount,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[tokio::test]
    async fn quote_scales_with_distance_to_target() {
        let pool = SimPool::new(dec!(100), dec!(1000));
        let near = pool
            .quote_required_input(dec!(101), Side::Buy)
            .await
            .unwrap();
        let far = pool
            .quote_required_input(dec!(105), Side::Buy)
            .await
            .unwrap();
        assert!(far > near);
        assert_eq!(near, dec!(10));
    }

    #[tokio::test]
    async fn quote_rejects_target_outside_range() {
        let pool = SimPool::new(dec!(100), dec!(1000));
        let err = pool
            .quote_required_input(dec!(400), Side::Buy)
            .await
            .unwrap_err();
        assert!(matches!(err, VenueError::QuoteOutOfRange { .. }));
    }

    #[tokio::test]
    async fn swap_moves_price_toward_target() {
        let pool = SimPool::new(dec!(100), dec!(1000));
        pool.execute_swap(dec!(10), Side::Buy).await.unwrap();
        assert_eq!(pool.price().await.unwrap(), dec!(101));
    }

    #[tokio::test]
    async fn sell_order_requires_balance() {
        let exchange = SimExchange::new(dec!(100));
        let err = exchange
            .place_order(Side::Sell, "ELON", dec!(5), dec!(100))
            .await
            .unwrap_err();
        assert!(matches!(err, VenueError::InsufficientBalance { .. }));
    }
}
