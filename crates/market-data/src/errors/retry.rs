/// Classification for retry policy.
///
/// The governance layer never retries on its own; this classifies each error
/// so callers can decide whether a later attempt could possibly succeed.
///
/// | Class | Meaning |
/// |-------|---------|
/// | `Never` | The request is fundamentally rejected until something external changes |
/// | `Retryable` | A later attempt may succeed once the vendor window rolls or the network recovers |
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum RetryClass {
    /// Don't retry - bad symbol, exhausted daily quota, or an unusable payload.
    Never,

    /// Retrying after a delay may succeed.
    ///
    /// Used for transient conditions: vendor-side throttling, transport
    /// timeouts, and admission waits that hit the polling ceiling.
    Retryable,
}
