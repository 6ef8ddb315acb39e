//! Marketlens AI commentary crate.
//!
//! A thin, single-shot text-generation client plus the commentary service
//! that feeds it market snapshots. The model is an opaque collaborator:
//! prompt in, text out, no retries, no state.

mod client;
mod commentary;
mod error;

pub use client::{GeminiClient, DEFAULT_MODEL};
pub use commentary::CommentaryService;
pub use error::AiError;
