use crate::domain::Subscription;
use chrono::{DateTime, Utc};

/// Decides whether a reminder should fire for this subscription: the
/// renewal must land on *tomorrow* as seen from the subscription's own
/// timezone, not from UTC. A disabled reminder flag always wins.
pub fn due_tomorrow(now: DateTime<Utc>, subscription: &Subscription) -> bool {
    if !subscription.reminder_enabled {
        return false;
    }
    let local_today = now.with_timezone(&subscription.timezone).date_naive();
    match local_today.succ_opt() {
        Some(local_tomorrow) => subscription.renewal_date == local_tomorrow,
        None => false,
    }
}
