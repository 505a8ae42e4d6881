//! Integration tests for two-leg execution sequencing.

mod support;

use std::sync::Arc;

use gaptrap::domain::{
    ExecutionOutcome, LegOutcome, Opportunity, Side, TradeDirection, Venue,
};
use gaptrap::error::{ExecutionError, VenueError};
use gaptrap::service::TradeSequencer;
use rust_decimal_macros::dec;
use support::{pair, MockExchange, MockPool};

fn opportunity() -> Opportunity {
    Opportunity {
        direction: TradeDirection::BuyPoolSellExchange,
        reference_price: dec!(101),
        spread_pct: dec!(2),
    }
}

fn sequencer(
    exchange: &Arc<MockExchange>,
    pool: &Arc<MockPool>,
    paper: bool,
) -> TradeSequencer {
    TradeSequencer::new(pair(), exchange.clone(), pool.clone(), paper, 2)
}

#[tokio::test]
async fn both_legs_fill_in_order() {
    let exchange = Arc::new(MockExchange::with_price(dec!(102)));
    let pool = Arc::new(MockPool::with_price(dec!(100)));
    pool.set_quote(dec!(50));

    let report = sequencer(&exchange, &pool, false)
        .execute(&opportunity())
        .await
        .unwrap();

    assert_eq!(report.outcome, ExecutionOutcome::Completed);
    assert_eq!(report.legs.len(), 2);
    assert_eq!(report.legs[0].venue, Venue::Pool);
    assert_eq!(report.legs[0].side, Side::Buy);
    assert_eq!(report.legs[1].venue, Venue::Exchange);
    assert_eq!(report.legs[1].side, Side::Sell);
    // Both legs trade the same nominal base amount.
    assert_eq!(report.legs[0].amount, dec!(50));
    assert_eq!(report.legs[1].amount, dec!(50));
    // The exchange leg is limited at the exchange's own price.
    assert_eq!(report.legs[1].price, dec!(102));
}

#[tokio::test]
async fn sized_amount_is_truncated_to_exchange_precision() {
    let exchange = Arc::new(MockExchange::with_price(dec!(102)));
    let pool = Arc::new(MockPool::with_price(dec!(100)));
    pool.set_quote(dec!(50.1299));

    let report = sequencer(&exchange, &pool, false)
        .execute(&opportunity())
        .await
        .unwrap();

    assert_eq!(report.legs[0].amount, dec!(50.12));
    assert_eq!(report.legs[1].amount, dec!(50.12));
}

#[tokio::test]
async fn paper_mode_skips_side_effects_but_sizes_identically() {
    let exchange = Arc::new(MockExchange::with_price(dec!(102)));
    let pool = Arc::new(MockPool::with_price(dec!(100)));
    pool.set_quote(dec!(50.1299));

    let report = sequencer(&exchange, &pool, true)
        .execute(&opportunity())
        .await
        .unwrap();

    assert!(report.paper);
    assert_eq!(report.outcome, ExecutionOutcome::Completed);
    // Same sizing and direction decisions as live mode.
    assert_eq!(report.legs[0].amount, dec!(50.12));
    assert_eq!(report.legs[0].side, Side::Buy);
    assert_eq!(report.legs[1].side, Side::Sell);
    assert!(report
        .legs
        .iter()
        .all(|leg| leg.outcome == LegOutcome::Simulated));
    // No order or swap ever issued.
    assert_eq!(pool.swap_calls(), 0);
    assert_eq!(exchange.order_calls(), 0);
}

#[tokio::test]
async fn pool_leg_failure_aborts_before_the_exchange_leg() {
    let exchange = Arc::new(MockExchange::with_price(dec!(102)));
    let pool = Arc::new(MockPool::with_price(dec!(100)));
    pool.fail_swaps(VenueError::Reverted("price moved".into()));

    let report = sequencer(&exchange, &pool, false)
        .execute(&opportunity())
        .await
        .unwrap();

    assert!(matches!(report.outcome, ExecutionOutcome::FirstLegFailed(_)));
    assert_eq!(report.legs.len(), 1);
    assert!(!report.legs[0].succeeded());
    assert_eq!(exchange.order_calls(), 0);
}

#[tokio::test]
async fn exchange_leg_failure_reports_inventory_imbalance() {
    let exchange = Arc::new(MockExchange::with_price(dec!(102)));
    let pool = Arc::new(MockPool::with_price(dec!(100)));
    pool.set_quote(dec!(50));
    exchange.fail_orders(VenueError::OrderRejected("rejected".into()));

    let report = sequencer(&exchange, &pool, false)
        .execute(&opportunity())
        .await
        .unwrap();

    assert!(matches!(report.outcome, ExecutionOutcome::SecondLegFailed(_)));
    assert_eq!(report.legs.len(), 2);
    assert_eq!(report.legs[0].outcome, LegOutcome::Filled);
    assert!(!report.legs[1].succeeded());
    assert_eq!(pool.swap_calls(), 1);
    assert_eq!(exchange.order_calls(), 1);
}

#[tokio::test]
async fn stale_quote_aborts_before_any_leg() {
    let exchange = Arc::new(MockExchange::with_price(dec!(102)));
    let pool = Arc::new(MockPool::with_price(dec!(100)));
    pool.fail_quote(VenueError::QuoteOutOfRange { target: dec!(101) });

    let error = sequencer(&exchange, &pool, false)
        .execute(&opportunity())
        .await
        .unwrap_err();

    assert!(matches!(error, ExecutionError::QuoteStale(_)));
    assert_eq!(pool.swap_calls(), 0);
    assert_eq!(exchange.order_calls(), 0);
}

#[tokio::test]
async fn unreadable_venue_price_aborts_before_sizing() {
    let exchange = Arc::new(MockExchange::with_price(dec!(102)));
    let pool = Arc::new(MockPool::with_price(dec!(100)));
    exchange.fail_price(VenueError::Unavailable("timeout".into()));

    let error = sequencer(&exchange, &pool, false)
        .execute(&opportunity())
        .await
        .unwrap_err();

    assert!(matches!(error, ExecutionError::VenueUnavailable(_)));
    assert_eq!(pool.quote_calls(), 0);
    assert_eq!(pool.swap_calls(), 0);
}

#[tokio::test]
async fn non_positive_reference_price_is_rejected() {
    let exchange = Arc::new(MockExchange::with_price(dec!(102)));
    let pool = Arc::new(MockPool::with_price(dec!(100)));

    let opportunity = Opportunity {
        direction: TradeDirection::BuyPoolSellExchange,
        reference_price: dec!(0),
        spread_pct: dec!(2),
    };
    let error = sequencer(&exchange, &pool, false)
        .execute(&opportunity)
        .await
        .unwrap_err();

    assert!(matches!(error, ExecutionError::NonPositivePrice(_)));
    assert_eq!(exchange.price_calls(), 0);
}

#[tokio::test]
async fn dust_sized_quote_aborts_as_zero_size() {
    let exchange = Arc::new(MockExchange::with_price(dec!(102)));
    let pool = Arc::new(MockPool::with_price(dec!(100)));
    pool.set_quote(dec!(0.0049));

    let error = sequencer(&exchange, &pool, false)
        .execute(&opportunity())
        .await
        .unwrap_err();

    assert!(matches!(error, ExecutionError::ZeroSize { .. }));
    assert_eq!(pool.swap_calls(), 0);
    assert_eq!(exchange.order_calls(), 0);
}
