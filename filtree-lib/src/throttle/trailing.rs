//! Trailing-edge throttle.

use std::fmt;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use crate::task;

struct Pending<T> {
    value: Option<T>,
    scheduled: bool,
}

/// Delays calls to the end of the window and delivers only the latest value.
///
/// The first call opens a window; calls inside it replace the pending value.
/// When the window closes the callback runs once with the last value. A zero
/// window runs the callback synchronously.
///
/// Used for search text, so a filter runs once typing pauses rather than on
/// every keystroke.
pub struct TrailingThrottle<T> {
    window: Duration,
    pending: Arc<Mutex<Pending<T>>>,
    callback: Arc<dyn Fn(T) + Send + Sync>,
}

impl<T: Send + 'static> TrailingThrottle<T> {
    pub fn new(window: Duration, callback: impl Fn(T) + Send + Sync + 'static) -> Self {
        Self {
            window,
            pending: Arc::new(Mutex::new(Pending {
                value: None,
                scheduled: false,
            })),
            callback: Arc::new(callback),
        }
    }

    /// Submit a value.
    pub fn call(&self, value: T) {
        if self.window.is_zero() {
            (self.callback)(value);
            return;
        }

        let Ok(mut pending) = self.pending.lock() else {
            return;
        };
        pending.value = Some(value);
        if pending.scheduled {
            return;
        }
        pending.scheduled = true;
        drop(pending);

        let window = self.window;
        let state = Arc::clone(&self.pending);
        let callback = Arc::clone(&self.callback);
        let spawned = task::spawn_detached(async move {
            tokio::time::sleep(window).await;
            let value = state.lock().ok().and_then(|mut pending| {
                pending.scheduled = false;
                pending.value.take()
            });
            if let Some(value) = value {
                callback(value);
            }
        });

        if !spawned && let Ok(mut pending) = self.pending.lock() {
            pending.scheduled = false;
            pending.value = None;
        }
    }

    /// Check if a value is waiting for its window to close.
    pub fn is_pending(&self) -> bool {
        self.pending.lock().map(|p| p.scheduled).unwrap_or(false)
    }

    /// Returns the configured window duration.
    pub fn window(&self) -> Duration {
        self.window
    }
}

impl<T> fmt::Debug for TrailingThrottle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TrailingThrottle")
            .field("window", &self.window)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn recorder() -> (Arc<Mutex<Vec<String>>>, impl Fn(String) + Send + Sync + 'static) {
        let calls = Arc::new(Mutex::new(Vec::new()));
        let sink = Arc::clone(&calls);
        (calls, move |value| sink.lock().unwrap().push(value))
    }

    #[tokio::test(start_paused = true)]
    async fn test_only_last_value_after_window() {
        let (calls, callback) = recorder();
        let throttle = TrailingThrottle::new(Duration::from_millis(300), callback);

        for text in ["a", "ap", "app", "appl", "apple"] {
            throttle.call(text.to_string());
            tokio::time::advance(Duration::from_millis(10)).await;
        }
        assert!(calls.lock().unwrap().is_empty());
        assert!(throttle.is_pending());

        tokio::time::sleep(Duration::from_millis(300)).await;
        assert_eq!(*calls.lock().unwrap(), vec!["apple"]);
        assert!(!throttle.is_pending());
    }

    #[tokio::test(start_paused = true)]
    async fn test_new_window_after_fire() {
        let (calls, callback) = recorder();
        let throttle = TrailingThrottle::new(Duration::from_millis(100), callback);

        throttle.call("first".to_string());
        tokio::time::sleep(Duration::from_millis(150)).await;
        throttle.call("second".to_string());
        tokio::time::sleep(Duration::from_millis(150)).await;

        assert_eq!(*calls.lock().unwrap(), vec!["first", "second"]);
    }

    #[test]
    fn test_zero_window_is_synchronous() {
        let (calls, callback) = recorder();
        let throttle = TrailingThrottle::new(Duration::ZERO, callback);

        throttle.call("now".to_string());
        assert_eq!(*calls.lock().unwrap(), vec!["now"]);
    }
}
