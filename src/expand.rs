//! Recurrence expansion.
//!
//! Expands an event definition into concrete occurrences within a bounded
//! date window, substituting exception overrides and attaching computed
//! alarms to occurrences that end at or after `now`.
//!
//! Expansion is a finite, restartable batch: each call emits at most
//! `limit` occurrences and returns a serializable [`RecurrenceCursor`]
//! that a later call can resume from, so no generator state has to
//! survive between passes.

use chrono::{DateTime, Duration, Utc};
use rrule::RRuleSet;
use serde::{Deserialize, Serialize};

use crate::config::{DEFAULT_EXPANSION_LIMIT, DEFAULT_EXPANSION_WINDOW};
use crate::error::{CalarmError, CalarmResult};
use crate::event::{ComputedAlarm, Event, Recurrence, trigger_offset_seconds};
use crate::time::{CanonicalTime, EventTime, TimeContext};

/// One concrete instance of a (possibly recurring) event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Occurrence {
    pub event_uid: String,
    pub recurrence_id: CanonicalTime,
    pub start: CanonicalTime,
    pub end: CanonicalTime,
    pub is_exception: bool,
    pub alarms: Vec<ComputedAlarm>,
}

impl Occurrence {
    /// Stable identifier for the busy slot this occurrence represents.
    pub fn busytime_id(&self) -> String {
        format!("{}-{}", self.event_uid, self.recurrence_id.utc_ms)
    }
}

/// Serializable expansion position, replacing in-memory iterator state.
///
/// `exhausted` is the "rule complete" sentinel: once set, further passes
/// emit nothing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RecurrenceCursor {
    pub last: Option<CanonicalTime>,
    pub exhausted: bool,
}

impl RecurrenceCursor {
    pub fn new() -> Self {
        RecurrenceCursor {
            last: None,
            exhausted: false,
        }
    }
}

impl Default for RecurrenceCursor {
    fn default() -> Self {
        RecurrenceCursor::new()
    }
}

/// Window and resume state for one expansion pass.
#[derive(Debug, Clone)]
pub struct ExpandOptions {
    /// Resume position from a previous pass, if any.
    pub cursor: Option<RecurrenceCursor>,
    /// Inclusive lower bound on emitted recurrence ids.
    pub min_date: Option<CanonicalTime>,
    /// Exclusive upper bound; defaults to `now` plus the default
    /// expansion window.
    pub max_date: Option<CanonicalTime>,
    /// Occurrences ending at or after this instant get alarms attached.
    pub now: CanonicalTime,
    /// Per-pass occurrence cap.
    pub limit: usize,
}

impl ExpandOptions {
    pub fn new(now: CanonicalTime) -> Self {
        ExpandOptions {
            cursor: None,
            min_date: None,
            max_date: None,
            now,
            limit: DEFAULT_EXPANSION_LIMIT,
        }
    }
}

/// Result of one expansion pass.
#[derive(Debug, Clone)]
pub struct Expansion {
    pub event_uid: String,
    pub occurrences: Vec<Occurrence>,
    /// Resume position for the next pass.
    pub cursor: RecurrenceCursor,
    /// Last recurrence instant visited by this pass, emitted or not.
    pub last_recurrence_id: Option<CanonicalTime>,
}

/// Expand `event` into occurrences within the options' window.
///
/// Non-recurring events yield exactly one occurrence. Recurring events
/// drive the rule until the window, the per-pass limit, or rule
/// exhaustion ends the pass. Exception overrides substitute their own
/// start, end, and alarms for the rule-derived instance.
pub fn expand_event(
    ctx: &TimeContext,
    event: &Event,
    options: &ExpandOptions,
) -> CalarmResult<Expansion> {
    let mut cursor = options.cursor.clone().unwrap_or_default();
    let mut last_recurrence_id = cursor.last.clone();
    let mut occurrences = Vec::new();

    if cursor.exhausted {
        return Ok(Expansion {
            event_uid: event.uid.clone(),
            occurrences,
            cursor,
            last_recurrence_id,
        });
    }

    let max_date = options.max_date.clone().unwrap_or_else(|| {
        options
            .now
            .shifted_by_seconds(DEFAULT_EXPANSION_WINDOW.as_secs() as i64)
    });
    let min_ms = options.min_date.as_ref().map(|c| c.utc_ms);
    let resume_ms = cursor.last.as_ref().map(|c| c.utc_ms);

    let Some(recurrence) = &event.recurrence else {
        // Single instance: the event itself, keyed by its own start.
        let recurrence_id = ctx.to_canonical(&event.start);
        cursor.exhausted = true;
        cursor.last = Some(recurrence_id.clone());
        last_recurrence_id = Some(recurrence_id.clone());

        let in_window = recurrence_id.utc_ms < max_date.utc_ms
            && min_ms.is_none_or(|min| recurrence_id.utc_ms >= min);
        if in_window {
            occurrences.push(resolve_occurrence(ctx, event, recurrence_id, &options.now));
        }

        return Ok(Expansion {
            event_uid: event.uid.clone(),
            occurrences,
            cursor,
            last_recurrence_id,
        });
    };

    let rrule_text = build_rrule_text(&event.start, recurrence);
    let mut rrule_set: RRuleSet = rrule_text.parse().map_err(|e| CalarmError::Rule {
        uid: event.uid.clone(),
        message: format!("{e}"),
    })?;

    // Push the resume position and the min bound below the parser so
    // skipped candidates never count against the expansion cap
    // (after() is exclusive of the instant it is given).
    let mut lower: Option<DateTime<Utc>> = cursor.last.as_ref().map(rule_instant);
    if let Some(min) = &options.min_date {
        let min_bound = rule_instant(min) - Duration::milliseconds(1);
        lower = Some(lower.map_or(min_bound, |bound| bound.max(min_bound)));
    }
    if let Some(bound) = lower {
        let tz: rrule::Tz = Utc.into();
        rrule_set = rrule_set.after(bound.with_timezone(&tz));
    }

    let cap = (options.limit + recurrence.exdates.len() + 2).min(u16::MAX as usize) as u16;
    let result = rrule_set.all(cap);

    let mut stopped_early = false;
    for candidate in &result.dates {
        let start_time = occurrence_time(candidate, &event.start);
        let recurrence_id = ctx.to_canonical(&start_time);

        if resume_ms.is_some_and(|resume| recurrence_id.utc_ms <= resume) {
            continue;
        }
        if recurrence_id.utc_ms >= max_date.utc_ms {
            stopped_early = true;
            break;
        }

        cursor.last = Some(recurrence_id.clone());
        last_recurrence_id = Some(recurrence_id.clone());

        // visited but below the window floor: advance the cursor only
        if min_ms.is_some_and(|min| recurrence_id.utc_ms < min) {
            continue;
        }

        occurrences.push(resolve_occurrence(ctx, event, recurrence_id, &options.now));

        if occurrences.len() >= options.limit {
            stopped_early = true;
            break;
        }
    }

    cursor.exhausted = !stopped_early && !result.limited;

    Ok(Expansion {
        event_uid: event.uid.clone(),
        occurrences,
        cursor,
        last_recurrence_id,
    })
}

/// Resolve one recurrence instant to a concrete occurrence, substituting
/// any exception override registered for it.
fn resolve_occurrence(
    ctx: &TimeContext,
    event: &Event,
    recurrence_id: CanonicalTime,
    now: &CanonicalTime,
) -> Occurrence {
    if let Some(exception) = event.exceptions.get(&recurrence_id.utc_ms) {
        let start = ctx.to_canonical(&exception.start);
        let end = ctx.to_canonical(&exception.end);
        let alarms = attached_alarms(ctx, exception, &end, now);
        return Occurrence {
            event_uid: event.uid.clone(),
            recurrence_id,
            start,
            end,
            is_exception: true,
            alarms,
        };
    }

    let master_start = ctx.to_canonical(&event.start);
    let duration_ms = ctx.to_canonical(&event.end).utc_ms - master_start.utc_ms;

    let start = recurrence_id.clone();
    let end = CanonicalTime {
        utc_ms: start.utc_ms + duration_ms,
        offset_ms: start.offset_ms,
        tzid: start.tzid.clone(),
        is_date: start.is_date,
    };
    let alarms = attached_alarms(ctx, event, &end, now);

    Occurrence {
        event_uid: event.uid.clone(),
        recurrence_id,
        start,
        end,
        is_exception: false,
        alarms,
    }
}

/// Compute display alarms for an occurrence, or none if it already ended.
///
/// Past occurrences never generate alarms; the cutoff is inclusive, so an
/// occurrence ending exactly at `now` still qualifies. Offsets are
/// computed against the resolved instance's own start (the exception's
/// start for overrides, the master's otherwise).
fn attached_alarms(
    ctx: &TimeContext,
    source: &Event,
    end: &CanonicalTime,
    now: &CanonicalTime,
) -> Vec<ComputedAlarm> {
    if end.utc_ms < now.utc_ms {
        return Vec::new();
    }

    source
        .display_alarms()
        .map(|definition| ComputedAlarm {
            action: definition.action,
            trigger_offset_seconds: trigger_offset_seconds(ctx, definition, &source.start),
        })
        .collect()
}

/// True absolute instant of a canonical time in the rule's comparison
/// space: real epoch for zoned and UTC times, wall-clock-as-UTC for
/// floating and date values (matching their fake-UTC DTSTART lines).
fn rule_instant(canonical: &CanonicalTime) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(canonical.utc_ms - canonical.offset_ms as i64)
        .expect("millisecond timestamp out of chrono range")
}

/// Assemble the iCalendar text block the rrule parser consumes.
fn build_rrule_text(start: &EventTime, recurrence: &Recurrence) -> String {
    let mut lines = Vec::with_capacity(2 + recurrence.exdates.len());
    lines.push(ical_time_line("DTSTART", start));
    lines.push(format!("RRULE:{}", recurrence.rrule));
    for exdate in &recurrence.exdates {
        lines.push(ical_time_line("EXDATE", exdate));
    }
    lines.join("\n")
}

/// Format one DTSTART/EXDATE line.
///
/// The rrule parser needs a datetime, so all-day dates become midnight
/// UTC, and floating wall clocks are written as fake UTC — consistent
/// with the local-shifted canonical encoding.
fn ical_time_line(name: &str, time: &EventTime) -> String {
    match time {
        EventTime::Date(d) => format!("{}:{}T000000Z", name, d.format("%Y%m%d")),
        EventTime::Utc(dt) => format!("{}:{}", name, dt.format("%Y%m%dT%H%M%SZ")),
        EventTime::Floating(dt) => format!("{}:{}Z", name, dt.format("%Y%m%dT%H%M%S")),
        EventTime::Zoned { datetime, tzid } => format!(
            "{};TZID={}:{}",
            name,
            tzid,
            datetime.format("%Y%m%dT%H%M%S")
        ),
    }
}

/// Convert an rrule candidate back to an [`EventTime`] matching the
/// master start's variant.
fn occurrence_time(candidate: &DateTime<rrule::Tz>, master_start: &EventTime) -> EventTime {
    match master_start {
        EventTime::Date(_) => EventTime::Date(candidate.date_naive()),
        EventTime::Utc(_) => EventTime::Utc(candidate.with_timezone(&Utc)),
        EventTime::Floating(_) => EventTime::Floating(candidate.naive_utc()),
        EventTime::Zoned { tzid, .. } => EventTime::Zoned {
            datetime: candidate.naive_local(),
            tzid: tzid.clone(),
        },
    }
}
