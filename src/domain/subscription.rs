use crate::domain::{Price, SubscriptionName, UserEmail};
use chrono::NaiveDate;
use chrono_tz::Tz;

/// One recurring charge a user tracks.
///
/// `renewal_date` is date-granular on purpose: renewal policy works in
/// calendar days, interpreted in the owner's `timezone`. Rows that cannot
/// be mapped into this shape are rejected at the storage boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct Subscription {
    pub id: i32,
    pub name: SubscriptionName,
    pub category: String,
    pub price: Price,
    pub renewal_date: NaiveDate,
    pub reminder_enabled: bool,
    pub timezone: Tz,
    pub user_email: UserEmail,
}
