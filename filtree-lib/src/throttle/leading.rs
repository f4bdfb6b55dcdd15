//! Leading-edge throttle.

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

/// Lets the first call of each window through and drops the rest.
///
/// Used for scroll-triggered page requests, where a burst of scroll events
/// must produce a single fetch.
///
/// # Example
///
/// ```
/// use std::time::Duration;
/// use filtree_lib::throttle::LeadingThrottle;
///
/// let throttle = LeadingThrottle::new(Duration::from_secs(60));
/// assert!(throttle.try_fire());
/// assert!(!throttle.try_fire());
/// ```
#[derive(Debug)]
pub struct LeadingThrottle {
    window: Duration,
    last: Mutex<Option<Instant>>,
}

impl LeadingThrottle {
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last: Mutex::new(None),
        }
    }

    /// Returns `true` if the caller may proceed, opening a new window.
    pub fn try_fire(&self) -> bool {
        let Ok(mut last) = self.last.lock() else {
            return false;
        };
        let now = Instant::now();
        match *last {
            Some(previous) if now.duration_since(previous) < self.window => false,
            _ => {
                *last = Some(now);
                true
            }
        }
    }

    /// Returns the configured window duration.
    pub fn window(&self) -> Duration {
        self.window
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test(start_paused = true)]
    async fn test_first_call_fires_rest_dropped() {
        let throttle = LeadingThrottle::new(Duration::from_millis(100));
        let fired = (0..5).filter(|_| throttle.try_fire()).count();
        assert_eq!(fired, 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_next_window_fires_again() {
        let throttle = LeadingThrottle::new(Duration::from_millis(100));
        assert!(throttle.try_fire());

        tokio::time::advance(Duration::from_millis(50)).await;
        assert!(!throttle.try_fire());

        tokio::time::advance(Duration::from_millis(60)).await;
        assert!(throttle.try_fire());
    }

    #[test]
    fn test_zero_window_never_drops() {
        let throttle = LeadingThrottle::new(Duration::ZERO);
        assert!((0..3).all(|_| throttle.try_fire()));
    }
}
