use std::thread;
use std::time::Duration;

use log::debug;
use rand::Rng;

/// Pause between consecutive API calls, with a little jitter so the
/// request cadence is not perfectly regular. A zero base skips the pause
/// entirely (used by tests).
pub fn request_delay(base: Duration) {
    if base.is_zero() {
        return;
    }
    let mut rng = rand::thread_rng();
    let jitter_ms = rng.gen_range(0..=500);
    let total = base + Duration::from_millis(jitter_ms);
    debug!("Waiting {:?} before next search request...", total);
    thread::sleep(total);
}
