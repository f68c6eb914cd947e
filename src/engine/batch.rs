use crate::domain::{Subscription, UserEmail};
use rust_decimal::Decimal;
use std::collections::BTreeMap;

/// Everything renewing tomorrow for one recipient, folded into a single
/// notification. Built fresh each cycle, never persisted.
#[derive(Debug, Clone)]
pub struct ReminderBatch {
    pub recipient: UserEmail,
    pub subscriptions: Vec<Subscription>,
    pub total: Decimal,
}

/// Groups due subscriptions by owner so a user with several renewals gets
/// one consolidated message. Recipients come out in lexicographic order
/// and subscriptions within a batch in name-ascending order.
pub fn batch_by_recipient(due: Vec<Subscription>) -> Vec<ReminderBatch> {
    let mut by_recipient: BTreeMap<String, Vec<Subscription>> = BTreeMap::new();
    for subscription in due {
        by_recipient
            .entry(subscription.user_email.as_ref().to_owned())
            .or_default()
            .push(subscription);
    }
    by_recipient
        .into_values()
        .map(|mut subscriptions| {
            subscriptions.sort_by(|a, b| a.name.as_ref().cmp(b.name.as_ref()));
            let total = subscriptions.iter().map(|s| s.price.amount()).sum();
            ReminderBatch {
                recipient: subscriptions[0].user_email.clone(),
                subscriptions,
                total,
            }
        })
        .collect()
}
