mod batch;
mod clock;
mod context;
mod due;
mod rate_limit;
mod rollover;
mod scheduler;

pub use batch::{batch_by_recipient, ReminderBatch};
pub use clock::{Clock, FixedClock, SystemClock};
pub use context::EngineContext;
pub use due::due_tomorrow;
pub use rate_limit::{RateLimitConfig, RecipientRateLimiter};
pub use rollover::{next_renewal_date, RolloverError};
pub use scheduler::{
    run_reminder_cycle, CycleError, CycleFailure, CycleSummary, ReminderReceipt, RenewalUpdate,
    SubscriptionRef,
};
