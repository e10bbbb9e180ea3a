//! In-memory failed-login throttle, keyed by client IP.

use std::collections::HashMap;
use std::net::IpAddr;
use std::sync::{Arc, Mutex};
use std::time::{Duration, Instant};

const MAX_FAILURES: u32 = 5;
const WINDOW: Duration = Duration::from_secs(15 * 60);

struct Strikes {
    first: Instant,
    count: u32,
}

/// Shared across workers; cloning is one `Arc` bump.
#[derive(Clone, Default)]
pub struct RateLimiter {
    inner: Arc<Mutex<HashMap<IpAddr, Strikes>>>,
}

impl RateLimiter {
    pub fn new() -> Self {
        Self::default()
    }

    /// Whether this address has used up its attempts for the current window.
    /// A lapsed window is dropped on the way through.
    pub fn is_blocked(&self, ip: IpAddr) -> bool {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        if map.get(&ip).is_some_and(|s| s.first.elapsed() >= WINDOW) {
            map.remove(&ip);
            return false;
        }
        map.get(&ip).is_some_and(|s| s.count >= MAX_FAILURES)
    }

    /// Count one failed login. A failure after the window lapses starts a
    /// fresh window rather than extending the old one.
    pub fn record_failure(&self, ip: IpAddr) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        let now = Instant::now();
        let strikes = map.entry(ip).or_insert(Strikes { first: now, count: 0 });
        if now.duration_since(strikes.first) >= WINDOW {
            strikes.first = now;
            strikes.count = 0;
        }
        strikes.count += 1;
    }

    /// Forget an address entirely, on successful login.
    pub fn clear(&self, ip: IpAddr) {
        let mut map = self.inner.lock().unwrap_or_else(|e| e.into_inner());
        map.remove(&ip);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ip(last: u8) -> IpAddr {
        IpAddr::from([192, 0, 2, last])
    }

    #[test]
    fn blocks_after_max_failures() {
        let limiter = RateLimiter::new();
        for _ in 0..MAX_FAILURES - 1 {
            limiter.record_failure(ip(7));
            assert!(!limiter.is_blocked(ip(7)));
        }
        limiter.record_failure(ip(7));
        assert!(limiter.is_blocked(ip(7)));
    }

    #[test]
    fn clear_unblocks() {
        let limiter = RateLimiter::new();
        for _ in 0..MAX_FAILURES {
            limiter.record_failure(ip(8));
        }
        assert!(limiter.is_blocked(ip(8)));
        limiter.clear(ip(8));
        assert!(!limiter.is_blocked(ip(8)));
    }

    #[test]
    fn addresses_are_tracked_separately() {
        let limiter = RateLimiter::new();
        for _ in 0..MAX_FAILURES {
            limiter.record_failure(ip(9));
        }
        assert!(limiter.is_blocked(ip(9)));
        assert!(!limiter.is_blocked(ip(10)));
    }
}
