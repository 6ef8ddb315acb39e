//! Background scheduler for the daily quota rollover.
//!
//! The gate resets its daily counter lazily, on the first check past the
//! boundary. This periodic tick performs that check independent of traffic,
//! so an idle server still rolls over shortly after midnight rather than on
//! its next request.

use std::sync::Arc;

use tokio::time::{interval, Duration};
use tracing::{debug, info};

use crate::main_lib::AppState;

/// Check interval: once a minute is plenty for a midnight boundary.
const CHECK_INTERVAL_SECS: u64 = 60;

/// Starts the quota rollover scheduler.
pub fn start_quota_reset_scheduler(state: Arc<AppState>) {
    tokio::spawn(async move {
        info!("quota rollover scheduler started (60s interval)");

        let mut tick = interval(Duration::from_secs(CHECK_INTERVAL_SECS));
        loop {
            tick.tick().await;
            debug!("running daily quota rollover check");
            state.gate.roll_daily_if_due();
        }
    });
}
