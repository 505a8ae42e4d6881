//! Gaptrap - cross-venue spread monitoring and two-leg arbitrage execution.
//!
//! The crate watches one trading pair on two venues, a centralized
//! exchange and an on-chain concentrated-liquidity pool, and fires an
//! offsetting trade pair when the spread between them exceeds a threshold.
//!
//! # Architecture
//!
//! Three long-lived pieces, wired by [`app::App`]:
//!
//! - **[`service::PriceOracle`]** - last-known price pair, refreshed by a
//!   background worker and published lock-free as an immutable snapshot
//! - **[`service::SpreadDetector`]** - periodic loop that classifies the
//!   spread and hands opportunities to the sequencer, one at a time
//! - **[`service::TradeSequencer`]** - sizes the trade from a pool quote
//!   and runs the two legs in fixed order: on-chain first, exchange second,
//!   with no rollback across venues
//!
//! The venue clients themselves sit behind the traits in [`venue`]; the
//! core never performs wire-level I/O. There is deliberately no atomicity
//! between the two legs: a settled pool leg plus a failed exchange leg is
//! surfaced to the operator as an inventory imbalance, not retried.
//!
//! # Modules
//!
//! - [`config`] - TOML configuration with env-sourced secrets
//! - [`domain`] - pairs, snapshots, opportunities, trade results
//! - [`error`] - error types for the crate
//! - [`venue`] - venue client traits and the simulated venues
//! - [`service`] - oracle, detector, sequencer, notifications
//! - [`app`] - lifecycle: start, close, evaluate-once

pub mod app;
pub mod config;
pub mod domain;
pub mod error;
pub mod service;
pub mod venue;
