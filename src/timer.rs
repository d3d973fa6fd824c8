//! Platform wake-up timer port.
//!
//! The platform provides a single-slot timer: at most one armed entry at a
//! time, only within a bounded forward horizon. The capability may be
//! absent entirely, which the reconciler treats as a status, not an error.

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use crate::error::CalarmResult;

/// Whether the platform re-derives the fire time across DST shifts.
///
/// Floating alarms track the wall clock wherever the device is, so they
/// register as [`IgnoreTimezone`](TimerMode::IgnoreTimezone); everything
/// else pins the absolute instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerMode {
    HonorTimezone,
    IgnoreTimezone,
}

/// One armed platform timer registration.
#[derive(Debug, Clone, PartialEq)]
pub struct PlatformEntry {
    pub entry_id: u64,
    pub fire_at: DateTime<Utc>,
    pub mode: TimerMode,
    /// Payload: the persisted alarm this registration belongs to.
    pub alarm_id: String,
}

/// The platform's wake-up primitive.
///
/// Fire notifications are delivered by the host calling
/// [`AlarmQueue::on_timer_fired`](crate::queue::AlarmQueue::on_timer_fired)
/// with the registration's payload.
#[async_trait]
pub trait PlatformTimer: Send + Sync {
    /// Whether the timer capability exists at all on this platform.
    fn is_available(&self) -> bool;

    async fn list_armed(&self) -> CalarmResult<Vec<PlatformEntry>>;

    /// Arm the slot for `fire_at`, returning the registration id.
    async fn arm(&self, fire_at: DateTime<Utc>, mode: TimerMode, alarm_id: &str)
    -> CalarmResult<u64>;

    async fn disarm(&self, entry_id: u64) -> CalarmResult<()>;
}
