//! Trait definitions for the two venue clients.

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::domain::{Side, TradingPair};
use crate::error::VenueError;

/// Receipt for an accepted exchange order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrderReceipt {
    pub order_id: String,
    /// Limit price the order was placed at.
    pub price: Decimal,
    pub size: Decimal,
}

/// Receipt for a settled on-chain swap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SwapReceipt {
    pub tx_id: String,
    /// Base-asset amount the swap moved.
    pub amount: Decimal,
}

/// Centralized exchange order-book client.
#[async_trait]
pub trait ExchangeClient: Send + Sync {
    /// Current price of the pair on the exchange.
    async fn price(&self, pair: &TradingPair) -> Result<Decimal, VenueError>;

    /// Available balance of one asset.
    async fn balance(&self, asset: &str) -> Result<Decimal, VenueError>;

    /// Place a limit order for `size` of the base asset.
    async fn place_order(
        &self,
        side: Side,
        asset: &str,
        size: Decimal,
        limit_price: Decimal,
    ) -> Result<OrderReceipt, VenueError>;
}

/// On-chain concentrated-liquidity pool client.
#[async_trait]
pub trait PoolClient: Send + Sync {
    /// Current pool price.
    async fn price(&self) -> Result<Decimal, VenueError>;

    /// Pool-side balance of one asset.
    async fn balance(&self, asset: &str) -> Result<Decimal, VenueError>;

    /// Native-token balance of the signing wallet (pays gas).
    async fn gas_balance(&self) -> Result<Decimal, VenueError>;

    /// Base-asset input required to move the pool to `target_price`.
    ///
    /// The sizing model rejects targets outside the pool's priced range
    /// with [`VenueError::QuoteOutOfRange`].
    async fn quote_required_input(
        &self,
        target_price: Decimal,
        side: Side,
    ) -> Result<Decimal, VenueError>;

    /// Swap `amount` of the base asset in the given direction.
    async fn execute_swap(&self, amount: Decimal, side: Side) -> Result<SwapReceipt, VenueError>;
}
