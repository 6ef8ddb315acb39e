//! Error types and retry classification for the market data crate.
//!
//! This module provides:
//! - [`MarketDataError`]: The main error enum for all market data operations
//! - [`RetryClass`]: Classification for determining retry behavior

mod retry;

pub use retry::RetryClass;

use chrono::{DateTime, Local};
use thiserror::Error;

/// Errors that can occur while fetching market data.
///
/// Rate deferral inside the request gate is not an error: it is resolved by
/// internal waiting and callers never observe it. Durable-store failures are
/// likewise absent here - they degrade the cache to memory-only behavior and
/// are reported through logging alone.
#[derive(Error, Debug)]
pub enum MarketDataError {
    /// The vendor did not recognize the requested symbol.
    /// This is a terminal error - retrying won't help.
    #[error("Symbol not found: {0}")]
    SymbolNotFound(String),

    /// The daily call budget is spent. Nothing is admitted until the recorded
    /// reset time passes; callers must surface this immediately, not wait.
    #[error("Daily request quota exhausted, resets at {resets_at}")]
    QuotaExhausted {
        /// When the daily counter rolls back to zero.
        resets_at: DateTime<Local>,
    },

    /// The admission-wait ceiling was exceeded while the request sat in the
    /// queue. Surfaced as retryable; the request never executed.
    #[error("Timed out waiting for request admission")]
    AdmissionTimeout,

    /// The vendor reported throttling, either as HTTP 429 or embedded in a
    /// nominally successful response body.
    #[error("Rate limited by provider")]
    RateLimited,

    /// A vendor-reported error, surfaced verbatim.
    #[error("Provider error: {message}")]
    ProviderError {
        /// The error message from the vendor.
        message: String,
    },

    /// The request to the vendor timed out.
    #[error("Request timed out")]
    Timeout,

    /// The response body did not match the documented shape.
    #[error("Failed to parse provider response: {message}")]
    Parse {
        /// Description of the decode failure.
        message: String,
    },

    /// A transport-level failure while talking to the vendor.
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The request was dropped before it could settle (gate shut down).
    #[error("Request was cancelled before completion")]
    Cancelled,
}

impl MarketDataError {
    /// Returns the retry classification for this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use marketlens_market_data::errors::{MarketDataError, RetryClass};
    ///
    /// let error = MarketDataError::RateLimited;
    /// assert_eq!(error.retry_class(), RetryClass::Retryable);
    ///
    /// let error = MarketDataError::SymbolNotFound("INVALID".to_string());
    /// assert_eq!(error.retry_class(), RetryClass::Never);
    /// ```
    pub fn retry_class(&self) -> RetryClass {
        match self {
            // Terminal until something external changes
            Self::SymbolNotFound(_)
            | Self::QuotaExhausted { .. }
            | Self::ProviderError { .. }
            | Self::Parse { .. }
            | Self::Cancelled => RetryClass::Never,

            // Transient conditions
            Self::AdmissionTimeout
            | Self::RateLimited
            | Self::Timeout
            | Self::Network(_) => RetryClass::Retryable,
        }
    }
}
