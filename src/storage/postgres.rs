use crate::configuration::DatabaseSettings;
use crate::domain::Subscription;
use crate::models::SubscriptionRow;
use crate::storage::{StorageError, SubscriptionStore};
use async_trait::async_trait;
use chrono::NaiveDate;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::{ExpressionMethods, PgConnection, QueryDsl, RunQueryDsl};

/// Diesel-backed store. Owns its connection pool so the whole store can be
/// handed to the engine as a trait object (and swapped for a fake in tests).
pub struct PostgresSubscriptionStore {
    pool: Pool<ConnectionManager<PgConnection>>,
}

impl PostgresSubscriptionStore {
    pub fn new(settings: &DatabaseSettings) -> Result<Self, StorageError> {
        let manager = ConnectionManager::<PgConnection>::new(settings.connection_string());
        let pool = Pool::builder()
            .build(manager)
            .map_err(|e| StorageError::Unavailable(e.to_string()))?;
        Ok(Self { pool })
    }
}

#[async_trait]
impl SubscriptionStore for PostgresSubscriptionStore {
    #[tracing::instrument(name = "List reminder-eligible subscriptions", skip(self))]
    async fn list_reminder_eligible(&self) -> Result<Vec<Subscription>, StorageError> {
        use crate::schema::subscriptions as subs;
        let pool = self.pool.clone();
        let rows = tokio::task::spawn_blocking(move || -> Result<Vec<SubscriptionRow>, StorageError> {
            let conn = pool
                .get()
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            let rows = subs::table
                .filter(subs::reminder_enabled.eq(true))
                .order((subs::user_email.asc(), subs::name.asc()))
                .load::<SubscriptionRow>(&*conn)?;
            Ok(rows)
        })
        .await
        .map_err(|e| StorageError::Unavailable(format!("storage task failed: {}", e)))??;

        // Malformed rows are rejected here, at the mapping boundary, so the
        // engine only ever sees validated records.
        let subscriptions = rows
            .into_iter()
            .filter_map(|row| {
                let id = row.id;
                match Subscription::try_from(row) {
                    Ok(subscription) => Some(subscription),
                    Err(error) => {
                        tracing::warn!(
                            subscription_id = id,
                            error = %error,
                            "Skipping a subscription with malformed stored data"
                        );
                        None
                    }
                }
            })
            .collect();
        Ok(subscriptions)
    }

    #[tracing::instrument(name = "Update a renewal date", skip(self))]
    async fn update_renewal_date(
        &self,
        id: i32,
        new_date: NaiveDate,
    ) -> Result<(), StorageError> {
        use crate::schema::subscriptions as subs;
        let pool = self.pool.clone();
        let updated = tokio::task::spawn_blocking(move || -> Result<usize, StorageError> {
            let conn = pool
                .get()
                .map_err(|e| StorageError::Unavailable(e.to_string()))?;
            let updated = diesel::update(subs::table.filter(subs::id.eq(id)))
                .set(subs::renewal_date.eq(new_date))
                .execute(&*conn)?;
            Ok(updated)
        })
        .await
        .map_err(|e| StorageError::Unavailable(format!("storage task failed: {}", e)))??;

        if updated == 0 {
            return Err(StorageError::NotFound(id));
        }
        Ok(())
    }
}
