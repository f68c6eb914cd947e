use crate::domain::{Price, Subscription, SubscriptionName, UserEmail};
use bigdecimal::BigDecimal;
use chrono::NaiveDate;
use chrono_tz::Tz;
use rust_decimal::Decimal;
use std::str::FromStr;

/// A `subscriptions` row exactly as stored. Converted into the validated
/// domain record before the engine sees it; rows that fail conversion are
/// reported as data-quality errors and skipped by the caller.
#[derive(Queryable)]
pub struct SubscriptionRow {
    pub id: i32,
    pub name: String,
    pub category: String,
    pub price: BigDecimal,
    pub renewal_date: NaiveDate,
    pub reminder_enabled: bool,
    pub user_email: String,
    pub timezone: Option<String>,
}

#[derive(thiserror::Error, Debug)]
pub enum DataQualityError {
    #[error("subscription {id} has an invalid name: {reason}")]
    InvalidName { id: i32, reason: String },
    #[error("subscription {id} has an invalid price: {reason}")]
    InvalidPrice { id: i32, reason: String },
    #[error("subscription {id} has an invalid owner email: {reason}")]
    InvalidEmail { id: i32, reason: String },
}

impl TryFrom<SubscriptionRow> for Subscription {
    type Error = DataQualityError;

    fn try_from(row: SubscriptionRow) -> Result<Self, Self::Error> {
        let id = row.id;
        let name = SubscriptionName::parse(row.name)
            .map_err(|reason| DataQualityError::InvalidName { id, reason })?;
        let price = Decimal::from_str(&row.price.to_string())
            .map_err(|e| DataQualityError::InvalidPrice {
                id,
                reason: e.to_string(),
            })
            .and_then(|amount| {
                Price::parse(amount).map_err(|reason| DataQualityError::InvalidPrice { id, reason })
            })?;
        let user_email = UserEmail::parse(row.user_email)
            .map_err(|reason| DataQualityError::InvalidEmail { id, reason })?;
        let timezone = resolve_timezone(id, row.timezone.as_deref());

        Ok(Subscription {
            id,
            name,
            category: row.category,
            price,
            renewal_date: row.renewal_date,
            reminder_enabled: row.reminder_enabled,
            timezone,
            user_email,
        })
    }
}

/// A missing or unrecognized IANA identifier degrades to UTC with a
/// warning rather than knocking the row out of the batch.
fn resolve_timezone(id: i32, raw: Option<&str>) -> Tz {
    match raw {
        Some(raw) => match raw.parse::<Tz>() {
            Ok(tz) => tz,
            Err(_) => {
                tracing::warn!(
                    subscription_id = id,
                    timezone = raw,
                    "Unknown timezone on subscription, falling back to UTC"
                );
                Tz::UTC
            }
        },
        None => {
            tracing::warn!(
                subscription_id = id,
                "Subscription has no timezone, falling back to UTC"
            );
            Tz::UTC
        }
    }
}
