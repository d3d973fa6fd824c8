//! Alarm reconciliation work queue.
//!
//! The scheduling core: scans persisted alarms, dispatches the overdue
//! ones, and arms the platform's single timer slot for the nearest alarm
//! within the forward horizon. Reconciliation is single-flight — a second
//! request while a pass is running coalesces into at most one follow-up
//! pass instead of piling up.

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, warn};

use crate::config::EngineConfig;
use crate::error::CalarmResult;
use crate::store::{Alarm, AlarmStore};
use crate::time::{Clock, SystemClock, TimeContext};
use crate::timer::{PlatformEntry, PlatformTimer, TimerMode};

/// Controller callback for alarms that should reach the user.
#[async_trait]
pub trait AlarmListener: Send + Sync {
    async fn on_alarm_fired(&self, alarm: Alarm);
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum QueueState {
    Idle,
    Running,
    /// A pass is running and another was requested; exactly one more runs.
    Queued,
}

/// The alarm work queue.
///
/// Owns the platform timer slot from the application's point of view:
/// nothing else arms or disarms it. Instantiated once by the host and
/// shared by reference into callback registrations — never a global.
pub struct AlarmQueue {
    ctx: TimeContext,
    store: Arc<dyn AlarmStore>,
    timer: Arc<dyn PlatformTimer>,
    listener: Arc<dyn AlarmListener>,
    config: EngineConfig,
    clock: Arc<dyn Clock>,
    state: Mutex<QueueState>,
    capability_missing: AtomicBool,
}

impl AlarmQueue {
    pub fn new(
        ctx: TimeContext,
        store: Arc<dyn AlarmStore>,
        timer: Arc<dyn PlatformTimer>,
        listener: Arc<dyn AlarmListener>,
        config: EngineConfig,
    ) -> Self {
        AlarmQueue {
            ctx,
            store,
            timer,
            listener,
            config,
            clock: Arc::new(SystemClock),
            state: Mutex::new(QueueState::Idle),
            capability_missing: AtomicBool::new(false),
        }
    }

    /// Replace the time source; tests pin the clock through this.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Whether the platform timer capability was observed missing.
    pub fn capability_missing(&self) -> bool {
        self.capability_missing.load(Ordering::Relaxed)
    }

    /// Run a reconciliation pass, or coalesce into the one in flight.
    ///
    /// Concurrent callers never block: if a pass is already running, the
    /// request collapses into a single deferred re-run. A persistence
    /// failure aborts only the current pass and returns the queue to idle.
    pub async fn request_reconciliation(&self) -> CalarmResult<()> {
        {
            let mut state = self.state.lock().await;
            match *state {
                QueueState::Running | QueueState::Queued => {
                    *state = QueueState::Queued;
                    return Ok(());
                }
                QueueState::Idle => *state = QueueState::Running,
            }
        }

        loop {
            let result = self.reconcile_pass().await;

            let mut state = self.state.lock().await;
            if let Err(err) = result {
                *state = QueueState::Idle;
                return Err(err);
            }
            if *state == QueueState::Queued {
                *state = QueueState::Running;
                continue;
            }
            *state = QueueState::Idle;
            return Ok(());
        }
    }

    /// Fire notification from the platform: dispatch the alarm, drop its
    /// record, and immediately reconcile so the next-nearest alarm gets
    /// armed without waiting for an external trigger.
    pub async fn on_timer_fired(&self, alarm_id: &str) -> CalarmResult<()> {
        if let Some(alarm) = self.store.get(alarm_id).await? {
            debug!(alarm_id, "platform timer fired");
            self.listener.on_alarm_fired(alarm).await;
            self.store.delete(alarm_id).await?;
        } else {
            debug!(alarm_id, "platform timer fired for unknown alarm");
        }
        self.request_reconciliation().await
    }

    async fn reconcile_pass(&self) -> CalarmResult<()> {
        if !self.timer.is_available() {
            if !self.capability_missing.swap(true, Ordering::Relaxed) {
                warn!("platform timer API unavailable; alarm scheduling disabled");
            }
            return Ok(());
        }

        let now = self.clock.now();
        let pending = self.store.list_pending().await?;
        let active = self.clear_unrelated_entries(&pending).await?;

        let Some(next) = pending.iter().min_by_key(|alarm| alarm.trigger.utc_ms) else {
            debug!("no pending alarms");
            return Ok(());
        };

        let fire_at = self.ctx.to_instant(&next.trigger);

        if fire_at <= now {
            // Overdue: dispatch directly, no platform timer involved.
            debug!(alarm_id = %next.id, "dispatching overdue alarm");
            if let Some(entry) = &active {
                if entry.alarm_id == next.id {
                    self.disarm_entry(entry).await;
                }
            }
            self.listener.on_alarm_fired(next.clone()).await;
            self.store.delete(&next.id).await?;

            // Queue a follow-up pass so the next-nearest alarm is considered.
            let mut state = self.state.lock().await;
            if *state == QueueState::Running {
                *state = QueueState::Queued;
            }
            return Ok(());
        }

        let lead = (fire_at - now).to_std().unwrap_or_default();
        if lead > self.config.max_forward_window {
            debug!(alarm_id = %next.id, "next alarm beyond forward window; nothing armed");
            return Ok(());
        }

        if let Some(entry) = &active {
            if entry.alarm_id == next.id {
                debug!(alarm_id = %next.id, "nearest alarm already armed");
                return Ok(());
            }
            // The slot must move to the nearer alarm.
            self.disarm_entry(entry).await;
        }

        let mode = if next.start_date.is_floating() {
            TimerMode::IgnoreTimezone
        } else {
            TimerMode::HonorTimezone
        };

        match self.timer.arm(fire_at, mode, &next.id).await {
            Ok(entry_id) => {
                debug!(alarm_id = %next.id, entry_id, %fire_at, "armed platform timer");
            }
            Err(err) => {
                // The record stays pending; the next externally-triggered
                // reconciliation retries, so no internal retry loop.
                warn!(alarm_id = %next.id, "platform arm failed: {err}");
            }
        }

        Ok(())
    }

    /// Disarm entries that no longer match a pending record (e.g. left
    /// behind by a previous process generation). Returns the surviving
    /// engine-owned entry, if any.
    async fn clear_unrelated_entries(
        &self,
        pending: &[Alarm],
    ) -> CalarmResult<Option<PlatformEntry>> {
        let armed = self.timer.list_armed().await?;
        let mut active: Option<PlatformEntry> = None;

        for entry in armed {
            let related = pending.iter().any(|alarm| alarm.id == entry.alarm_id);
            if related && active.is_none() {
                active = Some(entry);
            } else {
                // Unrelated, or a duplicate violating the single-slot rule.
                self.disarm_entry(&entry).await;
            }
        }

        Ok(active)
    }

    async fn disarm_entry(&self, entry: &PlatformEntry) {
        if let Err(err) = self.timer.disarm(entry.entry_id).await {
            warn!(
                alarm_id = %entry.alarm_id,
                entry_id = entry.entry_id,
                "failed to disarm platform entry: {err}"
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CalarmError;
    use crate::event::{AlarmAction, AlarmDefinition, Trigger};
    use crate::expand::{ExpandOptions, expand_event};
    use crate::store::{MemoryAlarmStore, schedule_occurrence_alarms};
    use crate::time::{CanonicalTime, EventTime};
    use chrono::{DateTime, NaiveDate, TimeZone, Utc};
    use std::collections::HashMap;
    use std::sync::Mutex as StdMutex;
    use std::sync::atomic::{AtomicU64, AtomicUsize, Ordering};
    use tokio::sync::Semaphore;

    fn ctx() -> TimeContext {
        TimeContext::new(chrono_tz::America::New_York)
    }

    struct FixedClock(DateTime<Utc>);

    impl Clock for FixedClock {
        fn now(&self) -> DateTime<Utc> {
            self.0
        }
    }

    #[derive(Default)]
    struct MockTimer {
        unavailable: bool,
        fail_arm: bool,
        entries: StdMutex<Vec<PlatformEntry>>,
        arm_calls: AtomicUsize,
        disarmed: StdMutex<Vec<u64>>,
        next_id: AtomicU64,
    }

    #[async_trait]
    impl PlatformTimer for MockTimer {
        fn is_available(&self) -> bool {
            !self.unavailable
        }

        async fn list_armed(&self) -> CalarmResult<Vec<PlatformEntry>> {
            Ok(self.entries.lock().unwrap().clone())
        }

        async fn arm(
            &self,
            fire_at: DateTime<Utc>,
            mode: TimerMode,
            alarm_id: &str,
        ) -> CalarmResult<u64> {
            self.arm_calls.fetch_add(1, Ordering::SeqCst);
            if self.fail_arm {
                return Err(CalarmError::PlatformRegistration("rejected".to_string()));
            }
            let entry_id = self.next_id.fetch_add(1, Ordering::SeqCst) + 1;
            self.entries.lock().unwrap().push(PlatformEntry {
                entry_id,
                fire_at,
                mode,
                alarm_id: alarm_id.to_string(),
            });
            Ok(entry_id)
        }

        async fn disarm(&self, entry_id: u64) -> CalarmResult<()> {
            self.disarmed.lock().unwrap().push(entry_id);
            self.entries
                .lock()
                .unwrap()
                .retain(|entry| entry.entry_id != entry_id);
            Ok(())
        }
    }

    #[derive(Default)]
    struct RecordingListener {
        fired: StdMutex<Vec<Alarm>>,
    }

    #[async_trait]
    impl AlarmListener for RecordingListener {
        async fn on_alarm_fired(&self, alarm: Alarm) {
            self.fired.lock().unwrap().push(alarm);
        }
    }

    fn canonical_utc(instant: DateTime<Utc>) -> CanonicalTime {
        ctx().to_canonical(&EventTime::Utc(instant))
    }

    fn alarm_at(id: &str, trigger: DateTime<Utc>) -> Alarm {
        let start = canonical_utc(trigger);
        Alarm {
            id: id.to_string(),
            busytime_id: format!("busy-{id}"),
            event_id: format!("event-{id}"),
            start_date: start.clone(),
            trigger: start,
        }
    }

    fn build_queue(
        store: Arc<dyn AlarmStore>,
        timer: Arc<MockTimer>,
        now: DateTime<Utc>,
    ) -> (AlarmQueue, Arc<RecordingListener>) {
        let listener = Arc::new(RecordingListener::default());
        let queue = AlarmQueue::new(
            ctx(),
            store,
            timer,
            listener.clone(),
            EngineConfig::default(),
        )
        .with_clock(Arc::new(FixedClock(now)));
        (queue, listener)
    }

    fn now_2018() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2018, 1, 1, 5, 0, 0).unwrap()
    }

    #[tokio::test]
    async fn test_arms_only_the_minimal_trigger() {
        let now = now_2018();
        let store = Arc::new(MemoryAlarmStore::new());
        for (id, minutes) in [("a", 90), ("b", 30), ("c", 240)] {
            store
                .put(alarm_at(id, now + chrono::Duration::minutes(minutes)))
                .await
                .unwrap();
        }
        let timer = Arc::new(MockTimer::default());
        let (queue, listener) = build_queue(store, timer.clone(), now);

        queue.request_reconciliation().await.unwrap();

        assert_eq!(timer.arm_calls.load(Ordering::SeqCst), 1);
        let entries = timer.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].alarm_id, "b");
        assert_eq!(entries[0].mode, TimerMode::HonorTimezone);
        assert!(listener.fired.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_overdue_alarm_dispatches_without_arming() {
        let now = now_2018();
        let store = Arc::new(MemoryAlarmStore::new());
        store
            .put(alarm_at("late", now - chrono::Duration::minutes(1)))
            .await
            .unwrap();
        let timer = Arc::new(MockTimer::default());
        let (queue, listener) = build_queue(store.clone(), timer.clone(), now);

        queue.request_reconciliation().await.unwrap();

        assert!(store.list_pending().await.unwrap().is_empty());
        assert_eq!(timer.arm_calls.load(Ordering::SeqCst), 0);
        let fired = listener.fired.lock().unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, "late");
    }

    #[tokio::test]
    async fn test_multiple_overdue_alarms_drain_in_order() {
        let now = now_2018();
        let store = Arc::new(MemoryAlarmStore::new());
        store
            .put(alarm_at("second", now - chrono::Duration::minutes(5)))
            .await
            .unwrap();
        store
            .put(alarm_at("first", now - chrono::Duration::minutes(10)))
            .await
            .unwrap();
        let timer = Arc::new(MockTimer::default());
        let (queue, listener) = build_queue(store.clone(), timer.clone(), now);

        queue.request_reconciliation().await.unwrap();

        assert!(store.list_pending().await.unwrap().is_empty());
        let fired = listener.fired.lock().unwrap();
        assert_eq!(fired.len(), 2);
        assert_eq!(fired[0].id, "first");
        assert_eq!(fired[1].id, "second");
    }

    #[tokio::test]
    async fn test_beyond_horizon_arms_nothing() {
        let now = now_2018();
        let store = Arc::new(MemoryAlarmStore::new());
        store
            .put(alarm_at("far", now + chrono::Duration::hours(72)))
            .await
            .unwrap();
        let timer = Arc::new(MockTimer::default());
        let (queue, _listener) = build_queue(store, timer.clone(), now);

        queue.request_reconciliation().await.unwrap();

        assert_eq!(timer.arm_calls.load(Ordering::SeqCst), 0);
        assert!(timer.entries.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_capability_absence_short_circuits() {
        let now = now_2018();
        let store = Arc::new(MemoryAlarmStore::new());
        store
            .put(alarm_at("a", now + chrono::Duration::minutes(30)))
            .await
            .unwrap();
        let timer = Arc::new(MockTimer {
            unavailable: true,
            ..MockTimer::default()
        });
        let (queue, listener) = build_queue(store, timer.clone(), now);

        assert!(!queue.capability_missing());
        queue.request_reconciliation().await.unwrap();
        queue.request_reconciliation().await.unwrap();

        assert!(queue.capability_missing());
        assert_eq!(timer.arm_calls.load(Ordering::SeqCst), 0);
        assert!(listener.fired.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unrelated_platform_entries_cleared() {
        let now = now_2018();
        let store = Arc::new(MemoryAlarmStore::new());
        let timer = Arc::new(MockTimer::default());
        timer.entries.lock().unwrap().push(PlatformEntry {
            entry_id: 77,
            fire_at: now + chrono::Duration::minutes(5),
            mode: TimerMode::HonorTimezone,
            alarm_id: "deleted-in-a-previous-life".to_string(),
        });
        let (queue, _listener) = build_queue(store, timer.clone(), now);

        queue.request_reconciliation().await.unwrap();

        assert_eq!(*timer.disarmed.lock().unwrap(), vec![77]);
        assert!(timer.entries.lock().unwrap().is_empty());
        assert_eq!(timer.arm_calls.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_slot_moves_to_nearer_alarm() {
        let now = now_2018();
        let store = Arc::new(MemoryAlarmStore::new());
        store
            .put(alarm_at("later", now + chrono::Duration::hours(4)))
            .await
            .unwrap();
        let timer = Arc::new(MockTimer::default());
        let (queue, _listener) = build_queue(store.clone(), timer.clone(), now);

        queue.request_reconciliation().await.unwrap();
        assert_eq!(timer.entries.lock().unwrap()[0].alarm_id, "later");

        store
            .put(alarm_at("sooner", now + chrono::Duration::hours(1)))
            .await
            .unwrap();
        queue.request_reconciliation().await.unwrap();

        let entries = timer.entries.lock().unwrap();
        assert_eq!(entries.len(), 1, "single slot");
        assert_eq!(entries[0].alarm_id, "sooner");
    }

    #[tokio::test]
    async fn test_already_armed_alarm_is_not_rearmed() {
        let now = now_2018();
        let store = Arc::new(MemoryAlarmStore::new());
        store
            .put(alarm_at("a", now + chrono::Duration::hours(1)))
            .await
            .unwrap();
        let timer = Arc::new(MockTimer::default());
        let (queue, _listener) = build_queue(store, timer.clone(), now);

        queue.request_reconciliation().await.unwrap();
        queue.request_reconciliation().await.unwrap();

        assert_eq!(timer.arm_calls.load(Ordering::SeqCst), 1);
        assert_eq!(timer.entries.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_arm_failure_leaves_record_pending() {
        let now = now_2018();
        let store = Arc::new(MemoryAlarmStore::new());
        store
            .put(alarm_at("a", now + chrono::Duration::hours(1)))
            .await
            .unwrap();
        let timer = Arc::new(MockTimer {
            fail_arm: true,
            ..MockTimer::default()
        });
        let (queue, _listener) = build_queue(store.clone(), timer.clone(), now);

        // arm rejection is not a pass failure
        queue.request_reconciliation().await.unwrap();
        assert_eq!(store.list_pending().await.unwrap().len(), 1);

        // the next externally-triggered pass retries
        queue.request_reconciliation().await.unwrap();
        assert_eq!(timer.arm_calls.load(Ordering::SeqCst), 2);
    }

    struct FailingStore {
        inner: MemoryAlarmStore,
        fail: AtomicBool,
    }

    #[async_trait]
    impl AlarmStore for FailingStore {
        async fn list_pending(&self) -> CalarmResult<Vec<Alarm>> {
            if self.fail.load(Ordering::SeqCst) {
                return Err(CalarmError::Persistence("read failed".to_string()));
            }
            self.inner.list_pending().await
        }

        async fn get(&self, id: &str) -> CalarmResult<Option<Alarm>> {
            self.inner.get(id).await
        }

        async fn put(&self, alarm: Alarm) -> CalarmResult<()> {
            self.inner.put(alarm).await
        }

        async fn delete(&self, id: &str) -> CalarmResult<()> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_persistence_failure_returns_queue_to_idle() {
        let now = now_2018();
        let store = Arc::new(FailingStore {
            inner: MemoryAlarmStore::new(),
            fail: AtomicBool::new(true),
        });
        store
            .put(alarm_at("a", now + chrono::Duration::hours(1)))
            .await
            .unwrap();
        let timer = Arc::new(MockTimer::default());
        let (queue, _listener) = build_queue(store.clone(), timer.clone(), now);

        let err = queue.request_reconciliation().await.unwrap_err();
        assert!(matches!(err, CalarmError::Persistence(_)));

        // the aborted pass left the queue reusable
        store.fail.store(false, Ordering::SeqCst);
        queue.request_reconciliation().await.unwrap();
        assert_eq!(timer.arm_calls.load(Ordering::SeqCst), 1);
    }

    struct GatedStore {
        inner: MemoryAlarmStore,
        started: Semaphore,
        release: Semaphore,
        list_calls: AtomicUsize,
    }

    impl GatedStore {
        fn new() -> Self {
            GatedStore {
                inner: MemoryAlarmStore::new(),
                started: Semaphore::new(0),
                release: Semaphore::new(0),
                list_calls: AtomicUsize::new(0),
            }
        }
    }

    #[async_trait]
    impl AlarmStore for GatedStore {
        async fn list_pending(&self) -> CalarmResult<Vec<Alarm>> {
            let call = self.list_calls.fetch_add(1, Ordering::SeqCst);
            if call == 0 {
                // hold the first pass open until the test releases it
                self.started.add_permits(1);
                self.release.acquire().await.unwrap().forget();
            }
            self.inner.list_pending().await
        }

        async fn get(&self, id: &str) -> CalarmResult<Option<Alarm>> {
            self.inner.get(id).await
        }

        async fn put(&self, alarm: Alarm) -> CalarmResult<()> {
            self.inner.put(alarm).await
        }

        async fn delete(&self, id: &str) -> CalarmResult<()> {
            self.inner.delete(id).await
        }
    }

    #[tokio::test]
    async fn test_concurrent_requests_coalesce_into_one_extra_pass() {
        let now = now_2018();
        let store = Arc::new(GatedStore::new());
        let timer = Arc::new(MockTimer::default());
        let listener = Arc::new(RecordingListener::default());
        let queue = Arc::new(
            AlarmQueue::new(
                ctx(),
                store.clone(),
                timer,
                listener,
                EngineConfig::default(),
            )
            .with_clock(Arc::new(FixedClock(now))),
        );

        let first = tokio::spawn({
            let queue = queue.clone();
            async move { queue.request_reconciliation().await }
        });

        // wait until the first pass is inside the store read
        store.started.acquire().await.unwrap().forget();

        for _ in 0..3 {
            queue.request_reconciliation().await.unwrap();
        }

        store.release.add_permits(1);
        first.await.unwrap().unwrap();

        // one running pass plus exactly one coalesced follow-up
        assert_eq!(store.list_calls.load(Ordering::SeqCst), 2);
    }

    #[tokio::test]
    async fn test_on_timer_fired_dispatches_and_rearms() {
        let now = now_2018();
        let store = Arc::new(MemoryAlarmStore::new());
        store
            .put(alarm_at("near", now + chrono::Duration::minutes(10)))
            .await
            .unwrap();
        store
            .put(alarm_at("next", now + chrono::Duration::minutes(20)))
            .await
            .unwrap();
        let timer = Arc::new(MockTimer::default());
        let (queue, listener) = build_queue(store.clone(), timer.clone(), now);

        queue.on_timer_fired("near").await.unwrap();

        assert!(store.get("near").await.unwrap().is_none());
        let fired = listener.fired.lock().unwrap();
        assert_eq!(fired.len(), 1);
        assert_eq!(fired[0].id, "near");

        // the follow-up reconciliation armed the next alarm
        let entries = timer.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].alarm_id, "next");
    }

    #[tokio::test]
    async fn test_floating_event_pipeline_arms_ignore_timezone() {
        // Event at 05:00 floating on 2018-01-01 with an at-start display
        // alarm, expanded a week out and reconciled at local midnight.
        let context = ctx();
        let floating = |d: u32, h: u32| {
            EventTime::Floating(
                NaiveDate::from_ymd_opt(2018, 1, d)
                    .unwrap()
                    .and_hms_opt(h, 0, 0)
                    .unwrap(),
            )
        };
        let event = crate::event::Event {
            uid: "morning-run".to_string(),
            start: floating(1, 5),
            end: floating(1, 6),
            recurrence: None,
            recurrence_id: None,
            exceptions: HashMap::new(),
            alarms: vec![AlarmDefinition {
                action: AlarmAction::Display,
                trigger: Trigger::Duration(0),
            }],
        };

        let mut options = ExpandOptions::new(context.to_canonical(&floating(1, 0)));
        options.max_date = Some(context.to_canonical(&floating(8, 0)));
        let expansion = expand_event(&context, &event, &options).unwrap();
        assert_eq!(expansion.occurrences.len(), 1);
        assert_eq!(
            expansion.occurrences[0].alarms,
            vec![crate::event::ComputedAlarm {
                action: AlarmAction::Display,
                trigger_offset_seconds: 0,
            }]
        );

        let store = Arc::new(MemoryAlarmStore::new());
        schedule_occurrence_alarms(store.as_ref(), &expansion.occurrences[0])
            .await
            .unwrap();

        // midnight in New York on 2018-01-01
        let local_midnight = Utc.with_ymd_and_hms(2018, 1, 1, 5, 0, 0).unwrap();
        let timer = Arc::new(MockTimer::default());
        let (queue, listener) = build_queue(store, timer.clone(), local_midnight);

        queue.request_reconciliation().await.unwrap();

        assert!(listener.fired.lock().unwrap().is_empty());
        let entries = timer.entries.lock().unwrap();
        assert_eq!(entries.len(), 1);
        assert_eq!(entries[0].mode, TimerMode::IgnoreTimezone);
        // 05:00 wall clock in New York resolves to 10:00 UTC
        assert_eq!(
            entries[0].fire_at,
            Utc.with_ymd_and_hms(2018, 1, 1, 10, 0, 0).unwrap()
        );
    }
}
