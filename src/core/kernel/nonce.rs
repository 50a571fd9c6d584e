use std::sync::atomic::{AtomicI64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

/// Process-local nonce generator.
///
/// Values are wall-clock milliseconds, bumped by one whenever the clock has
/// not advanced past the previously issued value, so every call returns a
/// strictly greater nonce than the last one handed out by this source. The
/// same value doubles as the WebSocket correlation id.
#[derive(Debug, Default)]
pub struct NonceSource {
    last: AtomicI64,
}

impl NonceSource {
    pub const fn new() -> Self {
        Self {
            last: AtomicI64::new(0),
        }
    }

    /// Next nonce; strictly increasing across calls on this source
    pub fn next(&self) -> i64 {
        let now = now_millis();
        let mut current = self.last.load(Ordering::Relaxed);
        loop {
            let candidate = now.max(current + 1);
            match self.last.compare_exchange_weak(
                current,
                candidate,
                Ordering::AcqRel,
                Ordering::Relaxed,
            ) {
                Ok(_) => return candidate,
                Err(observed) => current = observed,
            }
        }
    }

    /// Last nonce issued, zero if none yet
    pub fn last(&self) -> i64 {
        self.last.load(Ordering::Acquire)
    }
}

fn now_millis() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map_or(0, |d| d.as_millis() as i64)
}
