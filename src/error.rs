use thiserror::Error;

/// Configuration-related errors with structured variants.
///
/// These are the only fatal errors in the system: a bad config aborts
/// startup, everything else is recovered per cycle.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("missing required field: {field}")]
    MissingField { field: &'static str },

    #[error("invalid value for {field}: {reason}")]
    InvalidValue { field: &'static str, reason: String },

    #[error("failed to read config file: {0}")]
    ReadFile(#[source] std::io::Error),

    #[error("failed to parse config: {0}")]
    Parse(#[source] toml::de::Error),
}

/// Errors surfaced by a venue client at the collaborator boundary.
///
/// Venue implementations map their transport/protocol failures into these
/// variants; the core never inspects anything finer-grained.
#[derive(Error, Debug, Clone)]
pub enum VenueError {
    #[error("venue unavailable: {0}")]
    Unavailable(String),

    #[error("authentication failed: {0}")]
    AuthFailed(String),

    #[error("order rejected: {0}")]
    OrderRejected(String),

    #[error("transaction reverted: {0}")]
    Reverted(String),

    #[error("target price {target} outside pool bounds")]
    QuoteOutOfRange { target: rust_decimal::Decimal },

    #[error("insufficient balance for {asset}")]
    InsufficientBalance { asset: String },
}

/// Pre-leg execution errors: the sequencer refused before attempting any
/// leg, so nothing changed on either venue. Leg failures themselves are
/// reported through the execution outcome, not as errors.
#[derive(Error, Debug)]
pub enum ExecutionError {
    #[error("reference price must be positive, got {0}")]
    NonPositivePrice(rust_decimal::Decimal),

    #[error("venue price read failed before sizing: {0}")]
    VenueUnavailable(#[source] VenueError),

    #[error("sizing quote rejected: {0}")]
    QuoteStale(#[source] VenueError),

    #[error("sized amount rounds to zero at precision {precision}")]
    ZeroSize { precision: u32 },
}

#[derive(Error, Debug)]
pub enum Error {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Venue(#[from] VenueError),

    #[error(transparent)]
    Execution(#[from] ExecutionError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
