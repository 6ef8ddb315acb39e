//! Error types for the AI commentary crate.

use thiserror::Error;

/// Errors from the text-generation collaborator.
#[derive(Error, Debug)]
pub enum AiError {
    /// No API key was configured; commentary is disabled.
    #[error("No AI API key configured")]
    MissingKey,

    /// Transport-level failure.
    #[error("AI request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The vendor rejected the request or returned an error payload.
    #[error("AI provider error: {message}")]
    Vendor {
        /// The error message from the vendor.
        message: String,
    },

    /// The response carried no usable completion.
    #[error("AI provider returned an empty response")]
    EmptyResponse,
}
