//! Orchestration services: price oracle, spread detector, trade sequencer,
//! and operator notifications.

mod detector;
mod notifier;
mod oracle;
mod sequencer;

#[cfg(feature = "telegram")]
mod telegram;

pub use detector::{Evaluation, SpreadDetector};
pub use notifier::{Event, LogNotifier, Notifier, NotifierRegistry};
pub use oracle::PriceOracle;
pub use sequencer::TradeSequencer;

#[cfg(feature = "telegram")]
pub use telegram::{TelegramConfig, TelegramNotifier};
