use crate::domain::{events::DomainEvent, value_objects::UserId};
use crate::ports::event_store::{AppendError, EventStore as EventStoreTrait, Result};
use async_trait::async_trait;
use futures::stream::{self, BoxStream};
use std::collections::HashMap;
use std::sync::Mutex;

#[derive(Default)]
struct Log {
    /// 口座ごとのイベント列
    by_aggregate: HashMap<UserId, Vec<DomainEvent>>,
    /// 全口座の挿入順
    all: Vec<DomainEvent>,
}

/// In-memory implementation of EventStore
///
/// Version check and append happen under a single lock, so concurrent
/// appends to the same account are serialized.
pub struct EventStore {
    log: Mutex<Log>,
}

impl EventStore {
    pub fn new() -> Self {
        Self {
            log: Mutex::new(Log::default()),
        }
    }
}

impl Default for EventStore {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl EventStoreTrait for EventStore {
    async fn append(
        &self,
        aggregate_id: UserId,
        expected_version: u64,
        events: Vec<DomainEvent>,
    ) -> std::result::Result<(), AppendError> {
        let mut log = self
            .log
            .lock()
            .map_err(|_| AppendError::Storage("event log lock poisoned".into()))?;

        let actual = log
            .by_aggregate
            .get(&aggregate_id)
            .map_or(0, |events| events.len() as u64);
        if actual != expected_version {
            return Err(AppendError::VersionConflict {
                expected: expected_version,
                actual,
            });
        }

        log.all.extend(events.iter().cloned());
        log.by_aggregate
            .entry(aggregate_id)
            .or_default()
            .extend(events);
        Ok(())
    }

    async fn load(&self, aggregate_id: UserId) -> Result<Vec<DomainEvent>> {
        let log = self.log.lock().map_err(|_| "event log lock poisoned")?;
        Ok(log
            .by_aggregate
            .get(&aggregate_id)
            .cloned()
            .unwrap_or_default())
    }

    fn stream_all(&self) -> BoxStream<'_, Result<DomainEvent>> {
        let snapshot: Vec<Result<DomainEvent>> = match self.log.lock() {
            Ok(log) => log.all.iter().cloned().map(Ok).collect(),
            Err(_) => vec![Err("event log lock poisoned".into())],
        };

        Box::pin(stream::iter(snapshot))
    }
}
