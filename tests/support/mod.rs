//! Scripted venue mocks shared by the integration tests.
//!
//! Each mock counts its side-effecting calls so tests can assert which
//! legs were (or were not) attempted.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use gaptrap::domain::{Side, TradingPair};
use gaptrap::error::VenueError;
use gaptrap::venue::{ExchangeClient, OrderReceipt, PoolClient, SwapReceipt};
use parking_lot::Mutex;
use rust_decimal::Decimal;

pub fn pair() -> TradingPair {
    TradingPair::parse("ELON-USDT").unwrap()
}

/// Scripted exchange: price and order behavior set by the test.
pub struct MockExchange {
    price: Mutex<Result<Decimal, VenueError>>,
    order_error: Mutex<Option<VenueError>>,
    price_calls: AtomicUsize,
    order_calls: AtomicUsize,
}

impl MockExchange {
    pub fn with_price(price: Decimal) -> Self {
        Self {
            price: Mutex::new(Ok(price)),
            order_error: Mutex::new(None),
            price_calls: AtomicUsize::new(0),
            order_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_price(&self, price: Decimal) {
        *self.price.lock() = Ok(price);
    }

    pub fn fail_price(&self, error: VenueError) {
        *self.price.lock() = Err(error);
    }

    pub fn fail_orders(&self, error: VenueError) {
        *self.order_error.lock() = Some(error);
    }

    pub fn allow_orders(&self) {
        *self.order_error.lock() = None;
    }

    pub fn order_calls(&self) -> usize {
        self.order_calls.load(Ordering::SeqCst)
    }

    pub fn price_calls(&self) -> usize {
        self.price_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl ExchangeClient for MockExchange {
    async fn price(&self, _pair: &TradingPair) -> Result<Decimal, VenueError> {
        self.price_calls.fetch_add(1, Ordering::SeqCst);
        self.price.lock().clone()
    }

    async fn balance(&self, _asset: &str) -> Result<Decimal, VenueError> {
        Ok(Decimal::new(10_000, 0))
    }

    async fn place_order(
        &self,
        _side: Side,
        _asset: &str,
        size: Decimal,
        limit_price: Decimal,
    ) -> Result<OrderReceipt, VenueError> {
        self.order_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.order_error.lock().clone() {
            return Err(error);
        }
        Ok(OrderReceipt {
            order_id: "mock-order".into(),
            price: limit_price,
            size,
        })
    }
}

/// Scripted pool: price, sizing quote, and swap behavior set by the test.
pub struct MockPool {
    price: Mutex<Result<Decimal, VenueError>>,
    quote: Mutex<Result<Decimal, VenueError>>,
    swap_error: Mutex<Option<VenueError>>,
    /// Delay inserted into `price()`, for concurrency tests.
    price_delay: Mutex<Option<Duration>>,
    swap_calls: AtomicUsize,
    quote_calls: AtomicUsize,
}

impl MockPool {
    pub fn with_price(price: Decimal) -> Self {
        Self {
            price: Mutex::new(Ok(price)),
            quote: Mutex::new(Ok(Decimal::new(50, 0))),
            swap_error: Mutex::new(None),
            price_delay: Mutex::new(None),
            swap_calls: AtomicUsize::new(0),
            quote_calls: AtomicUsize::new(0),
        }
    }

    pub fn set_price(&self, price: Decimal) {
        *self.price.lock() = Ok(price);
    }

    pub fn fail_price(&self, error: VenueError) {
        *self.price.lock() = Err(error);
    }

    pub fn set_quote(&self, amount: Decimal) {
        *self.quote.lock() = Ok(amount);
    }

    pub fn fail_quote(&self, error: VenueError) {
        *self.quote.lock() = Err(error);
    }

    pub fn fail_swaps(&self, error: VenueError) {
        *self.swap_error.lock() = Some(error);
    }

    pub fn delay_price(&self, delay: Duration) {
        *self.price_delay.lock() = Some(delay);
    }

    pub fn swap_calls(&self) -> usize {
        self.swap_calls.load(Ordering::SeqCst)
    }

    pub fn quote_calls(&self) -> usize {
        self.quote_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl PoolClient for MockPool {
    async fn price(&self) -> Result<Decimal, VenueError> {
        let delay = *self.price_delay.lock();
        if let Some(delay) = delay {
            tokio::time::sleep(delay).await;
        }
        self.price.lock().clone()
    }

    async fn balance(&self, _asset: &str) -> Result<Decimal, VenueError> {
        Ok(Decimal::new(10_000, 0))
    }

    async fn gas_balance(&self) -> Result<Decimal, VenueError> {
        Ok(Decimal::ONE)
    }

    async fn quote_required_input(
        &self,
        _target_price: Decimal,
        _side: Side,
    ) -> Result<Decimal, VenueError> {
        self.quote_calls.fetch_add(1, Ordering::SeqCst);
        self.quote.lock().clone()
    }

    async fn execute_swap(&self, amount: Decimal, _side: Side) -> Result<SwapReceipt, VenueError> {
        self.swap_calls.fetch_add(1, Ordering::SeqCst);
        if let Some(error) = self.swap_error.lock().clone() {
            return Err(error);
        }
        Ok(SwapReceipt {
            tx_id: "mock-tx".into(),
            amount,
        })
    }
}
