//! Trading pair identity.

use std::fmt;

use crate::error::ConfigError;

/// The one pair this instance trades, derived at startup from a
/// `"BASE-QUOTE"` string and immutable thereafter.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TradingPair {
    base: String,
    quote: String,
}

impl TradingPair {
    /// Parse a `"BASE-QUOTE"` symbol, e.g. `"ELON-USDT"`.
    pub fn parse(symbol: &str) -> Result<Self, ConfigError> {
        let (base, quote) = symbol.split_once('-').ok_or(ConfigError::InvalidValue {
            field: "pair.symbol",
            reason: format!("expected BASE-QUOTE, got '{symbol}'"),
        })?;

        if base.is_empty() || quote.is_empty() {
            return Err(ConfigError::InvalidValue {
                field: "pair.symbol",
                reason: format!("empty side in '{symbol}'"),
            });
        }

        Ok(Self {
            base: base.to_string(),
            quote: quote.to_string(),
        })
    }

    /// Base asset symbol (the asset both legs trade the same amount of).
    pub fn base(&self) -> &str {
        &self.base
    }

    /// Quote asset symbol.
    pub fn quote(&self) -> &str {
        &self.quote
    }
}

impl fmt::Display for TradingPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}-{}", self.base, self.quote)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_base_and_quote() {
        let pair = TradingPair::parse("ELON-USDT").unwrap();
        assert_eq!(pair.base(), "ELON");
        assert_eq!(pair.quote(), "USDT");
        assert_eq!(pair.to_string(), "ELON-USDT");
    }

    #[test]
    fn rejects_missing_separator() {
        assert!(TradingPair::parse("ELONUSDT").is_err());
    }

    #[test]
    fn rejects_empty_sides() {
        assert!(TradingPair::parse("-USDT").is_err());
        assert!(TradingPair::parse("ELON-").is_err());
    }
}
