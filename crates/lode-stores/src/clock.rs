use web_time::{SystemTime, UNIX_EPOCH};

/// Milliseconds since the Unix epoch, used for last-updated timestamps.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
