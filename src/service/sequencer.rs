//! Trade sequencer: turns an opportunity into two dependent legs.
//!
//! The two legs run in a fixed order, on-chain pool first and exchange
//! second, because a settled swap is an observable fact while an exchange
//! limit order may never fill. There is no compensating action: a pool leg
//! that settled stays settled, and a failed exchange leg leaves the book
//! imbalanced for an operator to resolve.

use std::sync::Arc;

use rust_decimal::{Decimal, RoundingStrategy};
use tokio::sync::Mutex;
use tracing::{debug, info, warn};

use crate::domain::{
    BalanceSnapshot, ExecutionOutcome, ExecutionReport, LegOutcome, Opportunity, Side,
    TradeLegResult, TradingPair, Venue,
};
use crate::error::{ExecutionError, VenueError};
use crate::venue::{ExchangeClient, PoolClient};

pub struct TradeSequencer {
    pair: TradingPair,
    exchange: Arc<dyn ExchangeClient>,
    pool: Arc<dyn PoolClient>,
    paper: bool,
    /// Exchange lot precision: the pool-sized amount is truncated to this
    /// many decimals before being reused on the exchange leg.
    size_precision: u32,
    /// Single-slot admission gate: at most one execution in flight,
    /// whatever mix of detector cycles and direct `evaluate_once` calls
    /// is running.
    admission: Mutex<()>,
}

impl TradeSequencer {
    pub fn new(
        pair: TradingPair,
        exchange: Arc<dyn ExchangeClient>,
        pool: Arc<dyn PoolClient>,
        paper: bool,
        size_precision: u32,
    ) -> Self {
        Self {
            pair,
            exchange,
            pool,
            paper,
            size_precision,
            admission: Mutex::new(()),
        }
    }

    /// Execute both legs of an opportunity.
    ///
    /// Errors mean the sequencer refused before any leg ran; once a leg has
    /// been attempted the result is always a report, with the leg failure
    /// captured in its outcome.
    pub async fn execute(
        &self,
        opportunity: &Opportunity,
    ) -> Result<ExecutionReport, ExecutionError> {
        let _slot = self.admission.lock().await;

        if opportunity.reference_price <= Decimal::ZERO {
            return Err(ExecutionError::NonPositivePrice(opportunity.reference_price));
        }

        info!(
            direction = %opportunity.direction,
            spread_pct = %opportunity.spread_pct,
            paper = self.paper,
            "Executing arbitrage trade"
        );

        let before = self.balances().await;
        debug!(balances = ?before, "Balances before execution");

        // The sequencer reads the venues fresh rather than trusting the
        // detection-time snapshot: the target price and the exchange limit
        // come from what the venues say now.
        let (exchange_res, pool_res) =
            tokio::join!(self.exchange.price(&self.pair), self.pool.price());
        let exchange_price = exchange_res.map_err(ExecutionError::VenueUnavailable)?;
        let pool_price = pool_res.map_err(ExecutionError::VenueUnavailable)?;

        let target_price = (exchange_price + pool_price) / Decimal::TWO;
        let pool_side = opportunity.direction.pool_side();

        let quoted = self
            .pool
            .quote_required_input(target_price, pool_side)
            .await
            .map_err(|e| match e {
                VenueError::QuoteOutOfRange { .. } => ExecutionError::QuoteStale(e),
                other => ExecutionError::VenueUnavailable(other),
            })?;

        // Both legs trade the same nominal base amount; truncating (never
        // rounding up) keeps the exchange leg within what the pool moved.
        let amount = quoted.round_dp_with_strategy(self.size_precision, RoundingStrategy::ToZero);
        if amount <= Decimal::ZERO {
            return Err(ExecutionError::ZeroSize {
                precision: self.size_precision,
            });
        }

        info!(
            %amount,
            %target_price,
            pool_side = %pool_side,
            "Sized both legs from pool quote"
        );

        let mut legs = Vec::with_capacity(2);

        // Leg 1: on-chain pool.
        match self.run_pool_leg(amount, pool_side, target_price).await {
            Ok(leg) => legs.push(leg),
            Err(e) => {
                warn!(error = %e, "Pool leg failed, exchange leg not attempted");
                legs.push(TradeLegResult {
                    venue: Venue::Pool,
                    side: pool_side,
                    amount,
                    price: target_price,
                    outcome: LegOutcome::Failed(e.to_string()),
                });
                return Ok(ExecutionReport {
                    paper: self.paper,
                    legs,
                    outcome: ExecutionOutcome::FirstLegFailed(e.to_string()),
                });
            }
        }

        // Leg 2: exchange, opposite side, same amount, limited at the
        // exchange's own price.
        let exchange_side = opportunity.direction.exchange_side();
        match self
            .run_exchange_leg(amount, exchange_side, exchange_price)
            .await
        {
            Ok(leg) => legs.push(leg),
            Err(e) => {
                legs.push(TradeLegResult {
                    venue: Venue::Exchange,
                    side: exchange_side,
                    amount,
                    price: exchange_price,
                    outcome: LegOutcome::Failed(e.to_string()),
                });
                return Ok(ExecutionReport {
                    paper: self.paper,
                    legs,
                    outcome: ExecutionOutcome::SecondLegFailed(e.to_string()),
                });
            }
        }

        let after = self.balances().await;
        debug!(balances = ?after, "Balances after execution");

        info!("Trade executed");
        Ok(ExecutionReport {
            paper: self.paper,
            legs,
            outcome: ExecutionOutcome::Completed,
        })
    }

    async fn run_pool_leg(
        &self,
        amount: Decimal,
        side: Side,
        target_price: Decimal,
    ) -> Result<TradeLegResult, VenueError> {
        if self.paper {
            info!(%amount, side = %side, "PAPER: skipping pool swap");
            return Ok(TradeLegResult {
                venue: Venue::Pool,
                side,
                amount,
                price: target_price,
                outcome: LegOutcome::Simulated,
            });
        }

        let receipt = self.pool.execute_swap(amount, side).await?;
        info!(tx = %receipt.tx_id, %amount, side = %side, "Pool leg settled");

        Ok(TradeLegResult {
            venue: Venue::Pool,
            side,
            amount,
            price: target_price,
            outcome: LegOutcome::Filled,
        })
    }

    async fn run_exchange_leg(
        &self,
        amount: Decimal,
        side: Side,
        limit_price: Decimal,
    ) -> Result<TradeLegResult, VenueError> {
        if self.paper {
            info!(%amount, side = %side, %limit_price, "PAPER: skipping exchange order");
            return Ok(TradeLegResult {
                venue: Venue::Exchange,
                side,
                amount,
                price: limit_price,
                outcome: LegOutcome::Simulated,
            });
        }

        let receipt = self
            .exchange
            .place_order(side, self.pair.base(), amount, limit_price)
            .await?;
        info!(order_id = %receipt.order_id, %amount, side = %side, "Exchange leg placed");

        Ok(TradeLegResult {
            venue: Venue::Exchange,
            side,
            amount,
            price: limit_price,
            outcome: LegOutcome::Filled,
        })
    }

    /// Best-effort holdings for observability. A venue that refuses a
    /// balance query is logged and skipped; execution never waits on this.
    pub async fn balances(&self) -> BalanceSnapshot {
        let mut snapshot = BalanceSnapshot::default();

        for asset in [self.pair.base(), self.pair.quote()] {
            match self.exchange.balance(asset).await {
                Ok(amount) => {
                    snapshot.exchange.insert(asset.to_string(), amount);
                }
                Err(e) => debug!(asset, error = %e, "Exchange balance query failed"),
            }
            match self.pool.balance(asset).await {
                Ok(amount) => {
                    snapshot.pool.insert(asset.to_string(), amount);
                }
                Err(e) => debug!(asset, error = %e, "Pool balance query failed"),
            }
        }

        match self.pool.gas_balance().await {
            Ok(amount) => snapshot.gas = Some(amount),
            Err(e) => debug!(error = %e, "Gas balance query failed"),
        }

        snapshot
    }
}
