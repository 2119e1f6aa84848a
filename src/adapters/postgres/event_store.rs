use crate::domain::{events::DomainEvent, value_objects::UserId};
use crate::ports::event_store::{AppendError, EventStore as EventStoreTrait, Result};
use async_trait::async_trait;
use futures::stream::{BoxStream, StreamExt};
use sqlx::{PgPool, Row};
use uuid::Uuid;

fn storage<E>(err: E) -> AppendError
where
    E: std::error::Error + Send + Sync + 'static,
{
    AppendError::Storage(Box::new(err))
}

/// PostgreSQL implementation of EventStore
///
/// Stores domain events in an append-only event log.
/// Events are serialized as JSONB for flexible schema evolution.
pub struct EventStore {
    pool: PgPool,
}

impl EventStore {
    /// Create a new EventStore with a PostgreSQL connection pool
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl EventStoreTrait for EventStore {
    /// Append events to the event store
    ///
    /// A transaction-scoped advisory lock on the aggregate id serializes
    /// writers of the same account, so the version check below is exact.
    /// The unique (aggregate_id, aggregate_version) constraint backs it up.
    /// Uses batch INSERT with UNNEST.
    async fn append(
        &self,
        aggregate_id: UserId,
        expected_version: u64,
        events: Vec<DomainEvent>,
    ) -> std::result::Result<(), AppendError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut tx = self.pool.begin().await.map_err(storage)?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(aggregate_id.value())
            .execute(&mut *tx)
            .await
            .map_err(storage)?;

        // COALESCE handles NULL when no events exist for this aggregate
        let current_version: i64 = sqlx::query_scalar(
            r#"
            SELECT COALESCE(MAX(aggregate_version), 0)
            FROM events
            WHERE aggregate_id = $1
            "#,
        )
        .bind(aggregate_id.value())
        .fetch_one(&mut *tx)
        .await
        .map_err(storage)?;

        let actual = current_version as u64;
        if actual != expected_version {
            return Err(AppendError::VersionConflict {
                expected: expected_version,
                actual,
            });
        }

        // Prepare batch data
        let mut event_ids = Vec::with_capacity(events.len());
        let mut versions = Vec::with_capacity(events.len());
        let mut event_types = Vec::with_capacity(events.len());
        let mut event_data_list = Vec::with_capacity(events.len());
        let mut occurred_at_list = Vec::with_capacity(events.len());

        for (i, event) in events.iter().enumerate() {
            event_ids.push(Uuid::new_v4());
            versions.push(current_version + (i as i64) + 1);
            event_types.push(event.event_type());
            event_data_list.push(serde_json::to_value(event).map_err(storage)?);
            occurred_at_list.push(event.occurred_at());
        }

        let aggregate_types = vec!["Account"; events.len()];

        sqlx::query(
            r#"
            INSERT INTO events (
                aggregate_id,
                event_id,
                aggregate_version,
                aggregate_type,
                event_type,
                event_data,
                occurred_at
            )
            SELECT $1, * FROM UNNEST($2::uuid[], $3::bigint[], $4::varchar[], $5::varchar[], $6::jsonb[], $7::timestamptz[])
            "#,
        )
        .bind(aggregate_id.value())
        .bind(&event_ids)
        .bind(&versions)
        .bind(&aggregate_types)
        .bind(&event_types)
        .bind(&event_data_list)
        .bind(&occurred_at_list)
        .execute(&mut *tx)
        .await
        .map_err(storage)?;

        tx.commit().await.map_err(storage)?;
        Ok(())
    }

    /// Load all events for an aggregate in chronological order
    async fn load(&self, aggregate_id: UserId) -> Result<Vec<DomainEvent>> {
        let rows = sqlx::query(
            r#"
            SELECT event_data
            FROM events
            WHERE aggregate_id = $1
            ORDER BY aggregate_version ASC
            "#,
        )
        .bind(aggregate_id.value())
        .fetch_all(&self.pool)
        .await?;

        let mut events = Vec::with_capacity(rows.len());
        for row in rows {
            let event_data: serde_json::Value = row.get("event_data");
            let event: DomainEvent = serde_json::from_value(event_data)?;
            events.push(event);
        }

        Ok(events)
    }

    /// Stream all events in insertion order
    ///
    /// Used to rebuild the read models.
    fn stream_all(&self) -> BoxStream<'_, Result<DomainEvent>> {
        let stream = sqlx::query(
            r#"
            SELECT event_data
            FROM events
            ORDER BY sequence_number ASC
            "#,
        )
        .fetch(&self.pool)
        .map(|row_result| -> Result<DomainEvent> {
            let row = row_result?;
            let event_data: serde_json::Value = row.get("event_data");
            let event: DomainEvent = serde_json::from_value(event_data)?;
            Ok(event)
        });

        Box::pin(stream)
    }
}
