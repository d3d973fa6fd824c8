//! Recurring-event expansion and alarm scheduling engine.
//!
//! This crate is the scheduling core of a calendar application:
//! - `time` normalizes between native calendar times and a canonical,
//!   storable form that keeps floating-time arithmetic offset-free
//! - `event` holds event and alarm definitions and reduces every alarm
//!   trigger to a signed seconds-from-start offset
//! - `expand` turns a recurring definition into concrete occurrences,
//!   honoring exception overrides and a bounded date window
//! - `queue` reconciles persisted alarms against the platform's
//!   single-slot wake-up timer
//!
//! Persistence and the platform timer are external collaborators behind
//! the `store` and `timer` ports.

pub mod config;
pub mod error;
pub mod event;
pub mod expand;
pub mod queue;
pub mod store;
pub mod time;
pub mod timer;

pub use config::EngineConfig;
pub use error::{CalarmError, CalarmResult};
pub use event::{AlarmAction, AlarmDefinition, ComputedAlarm, Event, Recurrence, Trigger};
pub use expand::{ExpandOptions, Expansion, Occurrence, RecurrenceCursor, expand_event};
pub use queue::{AlarmListener, AlarmQueue};
pub use store::{Alarm, AlarmStore, MemoryAlarmStore, schedule_occurrence_alarms};
pub use time::{CanonicalTime, Clock, EventTime, SystemClock, TimeContext};
pub use timer::{PlatformEntry, PlatformTimer, TimerMode};
