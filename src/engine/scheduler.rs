use crate::email::{reminder, Email};
use crate::engine::batch::{batch_by_recipient, ReminderBatch};
use crate::engine::context::EngineContext;
use crate::engine::due::due_tomorrow;
use crate::engine::rate_limit::RecipientRateLimiter;
use crate::engine::rollover::next_renewal_date;
use crate::routes::error_chain_fmt;
use crate::storage::StorageError;
use chrono::{DateTime, NaiveDate, Utc};
use std::sync::Arc;
use tokio::sync::Semaphore;

/// What one scheduler invocation reports back to the external trigger.
#[derive(serde::Serialize, Debug)]
#[serde(rename_all = "camelCase")]
pub struct CycleSummary {
    pub success: bool,
    pub reminders_sent: Vec<ReminderReceipt>,
    pub updated_renewals: Vec<RenewalUpdate>,
    pub errors: Vec<CycleFailure>,
    pub timestamp: DateTime<Utc>,
}

#[derive(serde::Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct ReminderReceipt {
    pub email: String,
    pub subscription_count: usize,
    pub subscriptions: Vec<SubscriptionRef>,
}

#[derive(serde::Serialize, Debug, Clone)]
pub struct SubscriptionRef {
    pub id: i32,
    pub name: String,
}

#[derive(serde::Serialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct RenewalUpdate {
    pub id: i32,
    pub name: String,
    pub old_renewal_date: NaiveDate,
    pub new_renewal_date: NaiveDate,
    pub user_email: String,
}

#[derive(serde::Serialize, Debug, Clone)]
#[serde(untagged, rename_all = "camelCase")]
pub enum CycleFailure {
    #[serde(rename_all = "camelCase")]
    Dispatch {
        email: String,
        subscriptions: Vec<SubscriptionRef>,
        error: String,
    },
    #[serde(rename_all = "camelCase")]
    Rollover { id: i32, name: String, error: String },
}

#[derive(thiserror::Error)]
pub enum CycleError {
    #[error("failed to load subscriptions from storage")]
    Storage(#[from] StorageError),
}

impl std::fmt::Debug for CycleError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        error_chain_fmt(self, f)
    }
}

/// Runs one full reminder cycle: load eligible subscriptions, send one
/// consolidated reminder per recipient whose renewals land tomorrow, then
/// roll any already-past renewal dates forward.
///
/// The two passes are deliberately independent. A subscription renewing
/// tomorrow is not stale, and a stale subscription being advanced must not
/// suppress the reminder that already fired for its previous cycle.
/// Per-recipient and per-row failures are collected, never fatal; only a
/// failed storage read aborts the cycle.
#[tracing::instrument(name = "Run reminder cycle", skip(ctx))]
pub async fn run_reminder_cycle(ctx: &EngineContext) -> Result<CycleSummary, CycleError> {
    let now = ctx.clock.now();
    let subscriptions = ctx.store.list_reminder_eligible().await?;
    tracing::info!(
        subscription_count = subscriptions.len(),
        "Loaded reminder-eligible subscriptions"
    );

    let due: Vec<_> = subscriptions
        .iter()
        .filter(|s| due_tomorrow(now, s))
        .cloned()
        .collect();
    let batches = batch_by_recipient(due);
    let (reminders_sent, mut errors) = dispatch_batches(ctx, batches, now).await;
    tracing::info!(reminders_sent = reminders_sent.len(), "Due pass finished");

    let mut updated_renewals = Vec::new();
    for subscription in &subscriptions {
        let today = now.with_timezone(&subscription.timezone).date_naive();
        if subscription.renewal_date >= today {
            continue;
        }
        let next = match next_renewal_date(subscription.renewal_date, today) {
            Ok(next) => next,
            Err(error) => {
                tracing::warn!(
                    subscription_id = subscription.id,
                    renewal_date = %subscription.renewal_date,
                    "Skipping rollover for a corrupt renewal date"
                );
                errors.push(CycleFailure::Rollover {
                    id: subscription.id,
                    name: subscription.name.as_ref().to_owned(),
                    error: error.to_string(),
                });
                continue;
            }
        };
        match ctx.store.update_renewal_date(subscription.id, next).await {
            Ok(()) => updated_renewals.push(RenewalUpdate {
                id: subscription.id,
                name: subscription.name.as_ref().to_owned(),
                old_renewal_date: subscription.renewal_date,
                new_renewal_date: next,
                user_email: subscription.user_email.as_ref().to_owned(),
            }),
            Err(error) => {
                tracing::error!(
                    error.cause_chain = ?error,
                    subscription_id = subscription.id,
                    "Failed to persist a rolled-over renewal date"
                );
                errors.push(CycleFailure::Rollover {
                    id: subscription.id,
                    name: subscription.name.as_ref().to_owned(),
                    error: error.to_string(),
                });
            }
        }
    }
    tracing::info!(
        updated_renewals = updated_renewals.len(),
        errors = errors.len(),
        "Rollover pass finished"
    );

    Ok(CycleSummary {
        success: true,
        reminders_sent,
        updated_renewals,
        errors,
        timestamp: now,
    })
}

enum DispatchOutcome {
    Sent(ReminderReceipt),
    Failed(CycleFailure),
}

/// Fans batches out across concurrent dispatch tasks, bounded so the email
/// transport is not hammered with every recipient at once.
async fn dispatch_batches(
    ctx: &EngineContext,
    batches: Vec<ReminderBatch>,
    now: DateTime<Utc>,
) -> (Vec<ReminderReceipt>, Vec<CycleFailure>) {
    let semaphore = Arc::new(Semaphore::new(ctx.dispatch_concurrency));
    let mut handles = Vec::with_capacity(batches.len());
    for batch in batches {
        let semaphore = semaphore.clone();
        let notifier = ctx.notifier.clone();
        let rate_limiter = ctx.rate_limiter.clone();
        let dashboard_url = ctx.dashboard_url.clone();
        handles.push(tokio::spawn(async move {
            let _permit = match semaphore.acquire_owned().await {
                Ok(permit) => permit,
                Err(_) => {
                    return DispatchOutcome::Failed(dispatch_failure(
                        &batch,
                        "dispatch pool is closed",
                    ))
                }
            };
            dispatch_one(notifier, rate_limiter, &dashboard_url, batch, now).await
        }));
    }

    let mut sent = Vec::new();
    let mut errors = Vec::new();
    for handle in handles {
        match handle.await {
            Ok(DispatchOutcome::Sent(receipt)) => sent.push(receipt),
            Ok(DispatchOutcome::Failed(failure)) => errors.push(failure),
            Err(error) => {
                tracing::error!(error = %error, "A reminder dispatch task failed to complete");
            }
        }
    }
    (sent, errors)
}

async fn dispatch_one(
    notifier: Arc<dyn Email>,
    rate_limiter: Arc<RecipientRateLimiter>,
    dashboard_url: &str,
    batch: ReminderBatch,
    now: DateTime<Utc>,
) -> DispatchOutcome {
    if !rate_limiter.try_acquire(batch.recipient.as_ref(), now) {
        return DispatchOutcome::Failed(dispatch_failure(
            &batch,
            "recipient email rate limit exceeded",
        ));
    }
    let subject = reminder::subject(&batch);
    let html = reminder::html_body(&batch, dashboard_url);
    let text = reminder::text_body(&batch, dashboard_url);
    match notifier
        .send_email(batch.recipient.clone(), &subject, &html, &text)
        .await
    {
        Ok(()) => DispatchOutcome::Sent(receipt(&batch)),
        Err(error) => {
            tracing::error!(
                error.cause_chain = ?error,
                recipient = %batch.recipient,
                "Failed to send a renewal reminder"
            );
            DispatchOutcome::Failed(dispatch_failure(&batch, &error.to_string()))
        }
    }
}

fn receipt(batch: &ReminderBatch) -> ReminderReceipt {
    ReminderReceipt {
        email: batch.recipient.as_ref().to_owned(),
        subscription_count: batch.subscriptions.len(),
        subscriptions: subscription_refs(batch),
    }
}

fn dispatch_failure(batch: &ReminderBatch, error: &str) -> CycleFailure {
    CycleFailure::Dispatch {
        email: batch.recipient.as_ref().to_owned(),
        subscriptions: subscription_refs(batch),
        error: error.to_owned(),
    }
}

fn subscription_refs(batch: &ReminderBatch) -> Vec<SubscriptionRef> {
    batch
        .subscriptions
        .iter()
        .map(|s| SubscriptionRef {
            id: s.id,
            name: s.name.as_ref().to_owned(),
        })
        .collect()
}
