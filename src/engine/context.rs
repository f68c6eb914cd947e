use crate::configuration::SchedulerSettings;
use crate::email::Email;
use crate::engine::clock::Clock;
use crate::engine::rate_limit::{RateLimitConfig, RecipientRateLimiter};
use crate::storage::SubscriptionStore;
use chrono::Duration;
use std::sync::Arc;

/// Everything one reminder cycle needs, threaded explicitly instead of
/// living in module-level globals. Built once at startup and shared.
pub struct EngineContext {
    pub store: Arc<dyn SubscriptionStore>,
    pub notifier: Arc<dyn Email>,
    pub clock: Arc<dyn Clock>,
    pub rate_limiter: Arc<RecipientRateLimiter>,
    pub dispatch_concurrency: usize,
    pub dashboard_url: String,
}

impl EngineContext {
    pub fn new(
        store: Arc<dyn SubscriptionStore>,
        notifier: Arc<dyn Email>,
        clock: Arc<dyn Clock>,
        settings: &SchedulerSettings,
        dashboard_url: String,
    ) -> Self {
        let rate_limiter = RecipientRateLimiter::new(RateLimitConfig {
            max_per_window: settings.email_rate_limit.max_per_hour,
            window: Duration::hours(1),
        });
        Self {
            store,
            notifier,
            clock,
            rate_limiter: Arc::new(rate_limiter),
            dispatch_concurrency: settings.dispatch_concurrency.max(1),
            dashboard_url,
        }
    }
}
