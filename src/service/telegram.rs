//! Telegram notification sink.
//!
//! Requires the `telegram` feature. Sends are handled by a background
//! worker so a slow Telegram API can never stall the trading loop.

use teloxide::prelude::*;
use teloxide::types::ParseMode;
use tokio::sync::mpsc;
use tracing::{error, info, warn};

use super::notifier::{Event, Notifier};
use crate::domain::ExecutionOutcome;

/// Configuration for the Telegram sink.
#[derive(Debug, Clone)]
pub struct TelegramConfig {
    /// Bot token from @BotFather.
    pub bot_token: String,
    /// Chat or channel ID to send notifications to.
    pub chat_id: i64,
    /// Forward every spread evaluation (one message per detector cycle).
    pub notify_spread_checks: bool,
    /// Forward detected opportunities.
    pub notify_opportunities: bool,
    /// Forward execution results.
    pub notify_executions: bool,
}

impl TelegramConfig {
    /// Create config from `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID`.
    ///
    /// Returns `None` when either variable is missing or the chat ID is not
    /// numeric; the sink is simply not registered in that case.
    pub fn from_env() -> Option<Self> {
        let bot_token = std::env::var("TELEGRAM_BOT_TOKEN").ok()?;
        let chat_id = std::env::var("TELEGRAM_CHAT_ID")
            .ok()
            .and_then(|s| s.parse().ok())?;

        Some(Self {
            bot_token,
            chat_id,
            notify_spread_checks: false,
            notify_opportunities: true,
            notify_executions: true,
        })
    }
}

/// Telegram notifier backed by an unbounded channel and a worker task.
pub struct TelegramNotifier {
    sender: mpsc::UnboundedSender<Event>,
}

impl TelegramNotifier {
    /// Create the notifier and spawn its background worker.
    pub fn new(config: TelegramConfig) -> Self {
        let (sender, receiver) = mpsc::unbounded_channel();
        tokio::spawn(telegram_worker(config, receiver));
        Self { sender }
    }
}

impl Notifier for TelegramNotifier {
    fn notify(&self, event: &Event) {
        if self.sender.send(event.clone()).is_err() {
            warn!("Telegram notifier channel closed");
        }
    }

    fn name(&self) -> &'static str {
        "telegram"
    }
}

async fn telegram_worker(config: TelegramConfig, mut receiver: mpsc::UnboundedReceiver<Event>) {
    let bot = Bot::new(&config.bot_token);
    let chat_id = ChatId(config.chat_id);

    info!(chat_id = config.chat_id, "Telegram notifier started");

    while let Some(event) = receiver.recv().await {
        let message = render_event(&event, &config);

        if let Some(text) = message {
            if let Err(e) = bot
                .send_message(chat_id, &text)
                .parse_mode(ParseMode::MarkdownV2)
                .await
            {
                error!(error = %e, "Failed to send Telegram message");
            }
        }
    }

    warn!("Telegram worker shutting down");
}

fn render_event(event: &Event, config: &TelegramConfig) -> Option<String> {
    match event {
        Event::Started { pair, paper } => Some(format!(
            "🤖 *Bot started*\n\nPair: `{}`\nMode: {}",
            escape_markdown(pair),
            if *paper { "paper trading" } else { "live" }
        )),
        Event::SpreadEvaluated {
            exchange_price,
            pool_price,
            spread_pct,
        } if config.notify_spread_checks => Some(format!(
            "📈 Exchange: `{}`, Pool: `{}`, Spread: `{}`%",
            exchange_price,
            pool_price,
            escape_markdown(&format!("{spread_pct:.2}"))
        )),
        Event::OpportunityDetected(opp) if config.notify_opportunities => Some(format!(
            "🎯 *Opportunity*\n\nDirection: {}\nSpread: `{}`%\nReference: `{}`",
            escape_markdown(&opp.direction.to_string()),
            escape_markdown(&format!("{:.2}", opp.spread_pct)),
            opp.reference_price
        )),
        Event::ExecutionCompleted { report } if config.notify_executions => {
            let (emoji, label) = match &report.outcome {
                ExecutionOutcome::Completed => ("✅", "Execution completed"),
                ExecutionOutcome::FirstLegFailed(_) => ("⏹", "Execution aborted"),
                ExecutionOutcome::SecondLegFailed(_) => ("❌", "Execution failed"),
            };
            Some(format!(
                "{} *{}*\n\nMode: {}\nLegs: {}",
                emoji,
                label,
                if report.paper { "paper" } else { "live" },
                report.legs.len()
            ))
        }
        Event::InventoryImbalance { details } => Some(format!(
            "🚨 *INVENTORY IMBALANCE*\n\n{}\n\nThe pool leg settled but the exchange leg \
             failed\\. Manual rebalancing required\\.",
            escape_markdown(details)
        )),
        _ => None,
    }
}

/// Escape special characters for Telegram MarkdownV2.
fn escape_markdown(text: &str) -> String {
    let special_chars = [
        '_', '*', '[', ']', '(', ')', '~', '`', '>', '#', '+', '-', '=', '|', '{', '}', '.', '!',
    ];
    let mut result = String::with_capacity(text.len() * 2);

    for c in text.chars() {
        if special_chars.contains(&c) {
            result.push('\\');
        }
        result.push(c);
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    /// Serializes tests that touch process environment variables.
    static ENV_LOCK: Mutex<()> = Mutex::new(());

    #[test]
    fn escape_markdown_passes_plain_text() {
        assert_eq!(escape_markdown("hello"), "hello");
        assert_eq!(escape_markdown("spread_pct"), "spread\\_pct");
        assert_eq!(escape_markdown("1.25"), "1\\.25");
    }

    #[test]
    fn from_env_missing_token() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::remove_var("TELEGRAM_BOT_TOKEN");
        std::env::remove_var("TELEGRAM_CHAT_ID");

        assert!(TelegramConfig::from_env().is_none());
    }

    #[test]
    fn from_env_invalid_chat_id() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TELEGRAM_BOT_TOKEN", "test-token");
        std::env::set_var("TELEGRAM_CHAT_ID", "not-a-number");

        assert!(TelegramConfig::from_env().is_none());

        std::env::remove_var("TELEGRAM_BOT_TOKEN");
        std::env::remove_var("TELEGRAM_CHAT_ID");
    }

    #[test]
    fn from_env_valid() {
        let _guard = ENV_LOCK.lock().unwrap();
        std::env::set_var("TELEGRAM_BOT_TOKEN", "test-token");
        std::env::set_var("TELEGRAM_CHAT_ID", "12345");

        let config = TelegramConfig::from_env().unwrap();
        assert_eq!(config.chat_id, 12345);
        assert!(!config.notify_spread_checks);
        assert!(config.notify_executions);

        std::env::remove_var("TELEGRAM_BOT_TOKEN");
        std::env::remove_var("TELEGRAM_CHAT_ID");
    }

    #[test]
    fn spread_checks_are_suppressed_by_default() {
        let config = TelegramConfig {
            bot_token: "t".into(),
            chat_id: 1,
            notify_spread_checks: false,
            notify_opportunities: true,
            notify_executions: true,
        };
        let event = Event::SpreadEvaluated {
            exchange_price: rust_decimal_macros::dec!(101),
            pool_price: rust_decimal_macros::dec!(100),
            spread_pct: rust_decimal_macros::dec!(1),
        };
        assert!(render_event(&event, &config).is_none());
    }
}
