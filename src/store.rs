//! Persisted alarm records and the storage port.
//!
//! The persistence layer itself is an external collaborator; the engine
//! only reads and writes through the [`AlarmStore`] trait. A simple
//! in-memory implementation is provided for hosts without a database and
//! for tests.

use std::collections::HashMap;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;
use uuid::Uuid;

use crate::error::CalarmResult;
use crate::event::ComputedAlarm;
use crate::expand::Occurrence;
use crate::time::CanonicalTime;

/// A pending alarm, persisted until it fires.
///
/// `trigger` is always `start_date` shifted by the computed offset — it is
/// derived once, here, and never recomputed another way.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Alarm {
    pub id: String,
    pub busytime_id: String,
    pub event_id: String,
    pub start_date: CanonicalTime,
    pub trigger: CanonicalTime,
}

impl Alarm {
    /// Build the persisted record for one computed alarm of an occurrence.
    pub fn from_occurrence(occurrence: &Occurrence, computed: &ComputedAlarm) -> Alarm {
        Alarm {
            id: Uuid::new_v4().to_string(),
            busytime_id: occurrence.busytime_id(),
            event_id: occurrence.event_uid.clone(),
            start_date: occurrence.start.clone(),
            trigger: occurrence
                .start
                .shifted_by_seconds(computed.trigger_offset_seconds),
        }
    }
}

/// Transactional storage for pending alarms.
#[async_trait]
pub trait AlarmStore: Send + Sync {
    async fn list_pending(&self) -> CalarmResult<Vec<Alarm>>;
    async fn get(&self, id: &str) -> CalarmResult<Option<Alarm>>;
    async fn put(&self, alarm: Alarm) -> CalarmResult<()>;
    async fn delete(&self, id: &str) -> CalarmResult<()>;
}

/// Persist one alarm record per computed alarm of an occurrence.
///
/// Returns the ids of the created records. Callers are expected to hand
/// in occurrences from a fresh expansion pass, whose alarms are already
/// limited to future instances.
pub async fn schedule_occurrence_alarms(
    store: &dyn AlarmStore,
    occurrence: &Occurrence,
) -> CalarmResult<Vec<String>> {
    let mut ids = Vec::with_capacity(occurrence.alarms.len());
    for computed in &occurrence.alarms {
        let alarm = Alarm::from_occurrence(occurrence, computed);
        ids.push(alarm.id.clone());
        store.put(alarm).await?;
    }
    Ok(ids)
}

/// Embedded in-memory [`AlarmStore`].
#[derive(Default)]
pub struct MemoryAlarmStore {
    alarms: RwLock<HashMap<String, Alarm>>,
}

impl MemoryAlarmStore {
    pub fn new() -> Self {
        MemoryAlarmStore::default()
    }
}

#[async_trait]
impl AlarmStore for MemoryAlarmStore {
    async fn list_pending(&self) -> CalarmResult<Vec<Alarm>> {
        let alarms = self.alarms.read().await;
        let mut pending: Vec<Alarm> = alarms.values().cloned().collect();
        // Deterministic order for callers that iterate
        pending.sort_by_key(|alarm| (alarm.trigger.utc_ms, alarm.id.clone()));
        Ok(pending)
    }

    async fn get(&self, id: &str) -> CalarmResult<Option<Alarm>> {
        Ok(self.alarms.read().await.get(id).cloned())
    }

    async fn put(&self, alarm: Alarm) -> CalarmResult<()> {
        self.alarms.write().await.insert(alarm.id.clone(), alarm);
        Ok(())
    }

    async fn delete(&self, id: &str) -> CalarmResult<()> {
        self.alarms.write().await.remove(id);
        Ok(())
    }
}
