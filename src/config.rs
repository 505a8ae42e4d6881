//! Configuration loading and validation.
//!
//! Configuration comes from a TOML file; secrets (the Telegram bot token
//! and chat ID) come only from environment variables and never appear in
//! the file.

use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;
use tracing_subscriber::{fmt, EnvFilter};

use crate::domain::TradingPair;
use crate::error::{ConfigError, Result};

#[derive(Debug, Deserialize)]
pub struct Config {
    pub pair: PairConfig,
    #[serde(default)]
    pub oracle: OracleConfig,
    #[serde(default)]
    pub detector: DetectorConfig,
    #[serde(default)]
    pub trade: TradeConfig,
    #[serde(default)]
    pub venues: VenuesConfig,
    #[serde(default)]
    pub telegram: TelegramAppConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// The one pair this instance trades.
#[derive(Debug, Clone, Deserialize)]
pub struct PairConfig {
    /// `"BASE-QUOTE"`, e.g. `"ELON-USDT"`.
    pub symbol: String,
}

/// Price oracle worker settings.
#[derive(Debug, Clone, Deserialize)]
pub struct OracleConfig {
    /// Seconds between background price refreshes. The dominant staleness
    /// knob: an opportunity can be stale by up to one interval.
    #[serde(default = "default_refresh_interval_secs")]
    pub refresh_interval_secs: u64,
}

fn default_refresh_interval_secs() -> u64 {
    10
}

impl Default for OracleConfig {
    fn default() -> Self {
        Self {
            refresh_interval_secs: default_refresh_interval_secs(),
        }
    }
}

/// Spread detector settings.
#[derive(Debug, Clone, Deserialize)]
pub struct DetectorConfig {
    /// Seconds between detection cycles, independent of the oracle
    /// interval. Trades reaction latency against venue API rate limits.
    #[serde(default = "default_detector_interval_secs")]
    pub interval_secs: u64,
    /// Absolute spread (percent) that must be strictly exceeded.
    #[serde(default = "default_spread_threshold_pct")]
    pub spread_threshold_pct: Decimal,
}

fn default_detector_interval_secs() -> u64 {
    60
}

fn default_spread_threshold_pct() -> Decimal {
    Decimal::ONE
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self {
            interval_secs: default_detector_interval_secs(),
            spread_threshold_pct: default_spread_threshold_pct(),
        }
    }
}

/// Trade execution settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TradeConfig {
    /// Paper trading: make every decision, place no orders.
    #[serde(default)]
    pub paper: bool,
    /// Decimals the exchange accepts for order size; the pool-sized amount
    /// is truncated to this before the exchange leg.
    #[serde(default = "default_size_precision")]
    pub size_precision: u32,
}

fn default_size_precision() -> u32 {
    2
}

impl Default for TradeConfig {
    fn default() -> Self {
        Self {
            paper: false,
            size_precision: default_size_precision(),
        }
    }
}

/// Which venue clients to run against.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum VenueKind {
    /// Deterministic in-process venues for paper runs and tests.
    #[default]
    Sim,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct VenuesConfig {
    #[serde(default)]
    pub kind: VenueKind,
    #[serde(default)]
    pub sim: SimVenueConfig,
}

/// Starting state for the simulated venues.
#[derive(Debug, Clone, Deserialize)]
pub struct SimVenueConfig {
    #[serde(default = "default_sim_exchange_price")]
    pub exchange_price: Decimal,
    #[serde(default = "default_sim_pool_price")]
    pub pool_price: Decimal,
    #[serde(default = "default_sim_pool_liquidity")]
    pub pool_liquidity: Decimal,
    /// Base-asset balance seeded on both venues.
    #[serde(default = "default_sim_seed_balance")]
    pub seed_balance: Decimal,
}

fn default_sim_exchange_price() -> Decimal {
    Decimal::new(102, 0)
}

fn default_sim_pool_price() -> Decimal {
    Decimal::ONE_HUNDRED
}

fn default_sim_pool_liquidity() -> Decimal {
    Decimal::new(1000, 0)
}

fn default_sim_seed_balance() -> Decimal {
    Decimal::new(10_000, 0)
}

impl Default for SimVenueConfig {
    fn default() -> Self {
        Self {
            exchange_price: default_sim_exchange_price(),
            pool_price: default_sim_pool_price(),
            pool_liquidity: default_sim_pool_liquidity(),
            seed_balance: default_sim_seed_balance(),
        }
    }
}

const fn default_true() -> bool {
    true
}

/// Telegram notification switches. The token and chat ID are read from
/// `TELEGRAM_BOT_TOKEN` / `TELEGRAM_CHAT_ID` at startup.
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramAppConfig {
    #[serde(default)]
    pub enabled: bool,
    /// One message per detection cycle; noisy, off by default.
    #[serde(default)]
    pub notify_spread_checks: bool,
    #[serde(default = "default_true")]
    pub notify_opportunities: bool,
    #[serde(default = "default_true")]
    pub notify_executions: bool,
}

impl Default for TelegramAppConfig {
    fn default() -> Self {
        Self {
            enabled: false,
            notify_spread_checks: false,
            notify_opportunities: true,
            notify_executions: true,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

fn default_log_level() -> String {
    "info".into()
}

fn default_log_format() -> String {
    "pretty".into()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

impl Config {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(ConfigError::ReadFile)?;

        let config: Self = toml::from_str(&content).map_err(ConfigError::Parse)?;
        config.validate()?;

        Ok(config)
    }

    fn validate(&self) -> Result<()> {
        // Surfaces a malformed symbol at startup instead of at first use.
        self.trading_pair()?;

        if self.oracle.refresh_interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "oracle.refresh_interval_secs",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.detector.interval_secs == 0 {
            return Err(ConfigError::InvalidValue {
                field: "detector.interval_secs",
                reason: "must be at least 1".into(),
            }
            .into());
        }
        if self.detector.spread_threshold_pct <= Decimal::ZERO {
            return Err(ConfigError::InvalidValue {
                field: "detector.spread_threshold_pct",
                reason: "must be positive".into(),
            }
            .into());
        }
        if self.venues.sim.exchange_price <= Decimal::ZERO
            || self.venues.sim.pool_price <= Decimal::ZERO
            || self.venues.sim.pool_liquidity <= Decimal::ZERO
        {
            return Err(ConfigError::InvalidValue {
                field: "venues.sim",
                reason: "prices and liquidity must be positive".into(),
            }
            .into());
        }

        Ok(())
    }

    /// The configured pair, parsed.
    pub fn trading_pair(&self) -> Result<TradingPair> {
        Ok(TradingPair::parse(&self.pair.symbol)?)
    }

    pub fn init_logging(&self) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(&self.logging.level));

        match self.logging.format.as_str() {
            "json" => {
                fmt().json().with_env_filter(filter).init();
            }
            _ => {
                fmt().with_env_filter(filter).init();
            }
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            pair: PairConfig {
                symbol: "ELON-USDT".into(),
            },
            oracle: OracleConfig::default(),
            detector: DetectorConfig::default(),
            trade: TradeConfig::default(),
            venues: VenuesConfig::default(),
            telegram: TelegramAppConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}
