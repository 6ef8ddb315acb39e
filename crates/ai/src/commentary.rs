//! Per-symbol market commentary.
//!
//! Renders a compact snapshot of the already-fetched market data into a
//! prompt and returns the completion verbatim. The model is treated as an
//! opaque collaborator; there is no retry and no post-processing.

use std::fmt::Write as _;

use marketlens_market_data::{CompanyOverview, GlobalQuote};

use crate::client::GeminiClient;
use crate::error::AiError;

const SYSTEM_INSTRUCTION: &str = "You are a neutral equity research assistant. \
Write two short paragraphs about the stock snapshot you are given: first what \
the numbers say, then what a researcher might look at next. No investment \
advice, no price targets.";

/// Generates research commentary for one symbol at a time.
pub struct CommentaryService {
    client: GeminiClient,
}

impl CommentaryService {
    pub fn new(client: GeminiClient) -> Self {
        Self { client }
    }

    /// One-shot commentary for a symbol snapshot.
    pub async fn symbol_brief(
        &self,
        quote: &GlobalQuote,
        overview: Option<&CompanyOverview>,
    ) -> Result<String, AiError> {
        let prompt = render_snapshot(quote, overview);
        self.client.generate(SYSTEM_INSTRUCTION, &prompt).await
    }
}

/// Render the snapshot the prompt is built from. Only fields we actually
/// have; absent fundamentals are simply omitted.
fn render_snapshot(quote: &GlobalQuote, overview: Option<&CompanyOverview>) -> String {
    let mut out = String::new();
    let _ = writeln!(out, "Symbol: {}", quote.symbol);
    let _ = writeln!(
        out,
        "Price: {} (change {}%, previous close {})",
        quote.price, quote.change_percent, quote.previous_close
    );
    let _ = writeln!(
        out,
        "Session: open {}, high {}, low {}, volume {}",
        quote.open, quote.high, quote.low, quote.volume
    );
    let _ = writeln!(out, "As of: {}", quote.latest_trading_day);

    if let Some(overview) = overview {
        if let Some(name) = &overview.name {
            let _ = writeln!(out, "Company: {}", name);
        }
        if let (Some(sector), Some(industry)) = (&overview.sector, &overview.industry) {
            let _ = writeln!(out, "Sector: {} / {}", sector, industry);
        }
        if let Some(market_cap) = overview.market_cap {
            let _ = writeln!(out, "Market cap: {}", market_cap);
        }
        if let Some(pe_ratio) = overview.pe_ratio {
            let _ = writeln!(out, "P/E: {}", pe_ratio);
        }
        if let (Some(high), Some(low)) = (overview.week_52_high, overview.week_52_low) {
            let _ = writeln!(out, "52-week range: {} - {}", low, high);
        }
    }

    out
}
