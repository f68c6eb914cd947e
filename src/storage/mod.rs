mod postgres;

use crate::domain::Subscription;
use async_trait::async_trait;
use chrono::NaiveDate;
pub use postgres::PostgresSubscriptionStore;

/// The engine's whole view of persistent storage: read the rows that take
/// part in reminder processing, and persist a rolled-over renewal date.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
    async fn list_reminder_eligible(&self) -> Result<Vec<Subscription>, StorageError>;

    async fn update_renewal_date(&self, id: i32, new_date: NaiveDate)
        -> Result<(), StorageError>;
}

#[derive(thiserror::Error, Debug)]
pub enum StorageError {
    #[error("the subscription store is unavailable: {0}")]
    Unavailable(String),
    #[error("database query failed")]
    Query(#[from] diesel::result::Error),
    #[error("no subscription with id {0}")]
    NotFound(i32),
}
