use chrono::{DateTime, Duration, Utc};
use std::collections::HashMap;
use std::sync::Mutex;

/// Cap on reminder emails per recipient within a fixed window.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    pub max_per_window: u32,
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_per_window: 5,
            window: Duration::hours(1),
        }
    }
}

/// Fixed-window counter keyed by recipient address. Time comes in from the
/// caller so the limiter follows whatever clock the engine runs on.
pub struct RecipientRateLimiter {
    config: RateLimitConfig,
    windows: Mutex<HashMap<String, Window>>,
}

struct Window {
    count: u32,
    reset_at: DateTime<Utc>,
}

impl RecipientRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            windows: Mutex::new(HashMap::new()),
        }
    }

    /// Records one send attempt for `recipient`. Returns false when the
    /// recipient has exhausted the current window.
    pub fn try_acquire(&self, recipient: &str, now: DateTime<Utc>) -> bool {
        let mut windows = self.windows.lock().unwrap();
        match windows.get_mut(recipient) {
            Some(window) if now < window.reset_at => {
                if window.count >= self.config.max_per_window {
                    tracing::warn!(
                        recipient = recipient,
                        reset_at = %window.reset_at,
                        "Recipient email rate limit exhausted"
                    );
                    false
                } else {
                    window.count += 1;
                    true
                }
            }
            _ => {
                windows.insert(
                    recipient.to_owned(),
                    Window {
                        count: 1,
                        reset_at: now + self.config.window,
                    },
                );
                true
            }
        }
    }
}
