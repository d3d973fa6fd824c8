//! Event definitions, alarm definitions, and trigger reduction.
//!
//! An [`Event`] is one immutable version of a recurring definition: a start,
//! an optional recurrence rule, exception overrides keyed by the recurrence
//! instant they replace, and alarm definitions. The trigger calculator
//! reduces every alarm kind to a signed seconds-from-start offset so nothing
//! downstream cares whether an alarm was duration- or date-based.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::error::{CalarmError, CalarmResult};
use crate::time::{EventTime, TimeContext};

/// Action carried by an alarm definition. Only `Display` alarms are
/// expanded into occurrence alarms.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AlarmAction {
    Display,
    Email,
}

/// An alarm trigger, either relative to the occurrence start or an
/// absolute date-time.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Trigger {
    /// Signed seconds from the occurrence start; negative fires before it.
    Duration(i64),
    /// Absolute instant, reduced to a start-relative offset at expansion.
    Absolute(EventTime),
}

impl Trigger {
    /// Parse an ISO 8601 duration trigger such as `-PT15M`.
    ///
    /// The sign convention is preserved: a leading `-` means "before the
    /// occurrence start", so `-PT15M` becomes `Duration(-900)`.
    pub fn parse_duration(value: &str) -> Option<Trigger> {
        let is_before = value.starts_with('-');
        let duration_str = value.trim_start_matches(['-', '+']);

        let duration = iso8601::duration(duration_str).ok()?;
        let std_duration: std::time::Duration = duration.into();
        let seconds = std_duration.as_secs() as i64;

        Some(Trigger::Duration(if is_before { -seconds } else { seconds }))
    }
}

/// One alarm attached to an event definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AlarmDefinition {
    pub action: AlarmAction,
    pub trigger: Trigger,
}

/// An alarm reduced to canonical numeric form during expansion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ComputedAlarm {
    pub action: AlarmAction,
    pub trigger_offset_seconds: i64,
}

/// Recurrence rule plus excluded instants, in raw iCalendar form.
///
/// The rule grammar itself is opaque to this crate; the `rrule` crate turns
/// it into a lazy sequence of candidate instants.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Recurrence {
    pub rrule: String,
    pub exdates: Vec<EventTime>,
}

/// One immutable version of a (possibly recurring) event definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Event {
    pub uid: String,
    pub start: EventTime,
    pub end: EventTime,
    pub recurrence: Option<Recurrence>,
    /// Set on exception overrides: the recurrence instant this replaces.
    pub recurrence_id: Option<EventTime>,
    /// Exception overrides keyed by the canonical `utc_ms` of the
    /// recurrence instant they replace.
    pub exceptions: HashMap<i64, Event>,
    pub alarms: Vec<AlarmDefinition>,
}

impl Event {
    /// Relate a raw multi-instance payload into a single resolved event.
    ///
    /// The primary instance is the one without a `recurrence_id`; every
    /// other part becomes an exception override keyed by its recurrence
    /// instant. A payload with no primary instance is an
    /// [`CalarmError::EventParse`], reported to the caller rather than
    /// aborting the process.
    pub fn resolve(ctx: &TimeContext, parts: Vec<Event>) -> CalarmResult<Event> {
        let mut primary: Option<Event> = None;
        let mut exceptions: Vec<Event> = Vec::new();

        for part in parts {
            if part.recurrence_id.is_none() {
                primary = Some(part);
            } else {
                exceptions.push(part);
            }
        }

        let Some(mut event) = primary else {
            let uid = exceptions
                .first()
                .map(|e| e.uid.clone())
                .unwrap_or_else(|| "<empty payload>".to_string());
            return Err(CalarmError::EventParse(uid));
        };

        for exception in exceptions {
            let recurrence_id = exception
                .recurrence_id
                .as_ref()
                .expect("non-primary parts carry a recurrence id");
            let key = ctx.to_canonical(recurrence_id).utc_ms;
            event.exceptions.insert(key, exception);
        }

        Ok(event)
    }

    /// The event's `Display` alarms.
    pub fn display_alarms(&self) -> impl Iterator<Item = &AlarmDefinition> {
        self.alarms
            .iter()
            .filter(|alarm| alarm.action == AlarmAction::Display)
    }
}

/// Reduce an alarm definition to signed seconds from the owning instance's
/// start time.
///
/// Duration triggers pass through verbatim. Absolute triggers become the
/// wall-clock difference between the trigger instant and the start.
pub fn trigger_offset_seconds(
    ctx: &TimeContext,
    definition: &AlarmDefinition,
    start: &EventTime,
) -> i64 {
    match &definition.trigger {
        Trigger::Duration(seconds) => *seconds,
        Trigger::Absolute(value) => {
            (ctx.to_canonical(value).utc_ms - ctx.to_canonical(start).utc_ms) / 1000
        }
    }
}
