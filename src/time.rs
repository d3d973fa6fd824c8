//! Time normalization between native calendar times and the canonical
//! storable form.
//!
//! A [`CanonicalTime`] stores "local-shifted UTC": the wall-clock instant
//! with the zone's UTC offset already folded into `utc_ms`. Floating times
//! (no zone) therefore need no offset arithmetic at all, and comparing
//! `utc_ms` values compares wall clocks directly.

use chrono::{DateTime, LocalResult, NaiveDate, NaiveDateTime, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};

/// Zone identifier for times that carry no timezone at all.
pub const TZID_FLOATING: &str = "floating";

/// Zone identifier for explicit UTC times.
pub const TZID_UTC: &str = "UTC";

/// A calendar time in its native, zone-aware form.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum EventTime {
    /// All-day value with no time component.
    Date(NaiveDate),
    /// Absolute instant in UTC.
    Utc(DateTime<Utc>),
    /// Zone-less wall clock, interpreted in the device's local zone at the
    /// moment it is used.
    Floating(NaiveDateTime),
    /// Wall clock anchored to an IANA timezone.
    Zoned { datetime: NaiveDateTime, tzid: String },
}

/// The canonical, storable form of a calendar time.
///
/// `utc_ms` is NOT pure UTC: it encodes the wall-clock instant with
/// `offset_ms` already applied. A value must never be mutated after
/// construction — DST information is irrecoverable once converted, so any
/// change requires re-deriving from an [`EventTime`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CanonicalTime {
    pub utc_ms: i64,
    pub offset_ms: i32,
    pub tzid: String,
    pub is_date: bool,
}

impl CanonicalTime {
    /// True when the source time carried no timezone.
    pub fn is_floating(&self) -> bool {
        self.tzid == TZID_FLOATING
    }

    /// Derive a new canonical time a fixed number of seconds away.
    ///
    /// The zone tag and offset are carried over unchanged; this is how alarm
    /// triggers are derived from an occurrence start.
    pub fn shifted_by_seconds(&self, seconds: i64) -> CanonicalTime {
        CanonicalTime {
            utc_ms: self.utc_ms + seconds * 1000,
            offset_ms: self.offset_ms,
            tzid: self.tzid.clone(),
            is_date: false,
        }
    }
}

/// A source of the current instant.
///
/// The reconciler reads time through this seam so tests can pin the clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Utc>;
}

/// [`Clock`] backed by the system time.
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Converts between [`EventTime`] and [`CanonicalTime`], anchored to the
/// host's local timezone.
#[derive(Debug, Clone, Copy)]
pub struct TimeContext {
    local: Tz,
}

impl TimeContext {
    pub fn new(local: Tz) -> Self {
        TimeContext { local }
    }

    pub fn local_tzid(&self) -> &str {
        self.local.name()
    }

    /// Convert a native time to its canonical storable form.
    ///
    /// Panics on an unknown timezone identifier; a malformed native time is
    /// a caller contract violation, not a recoverable error.
    pub fn to_canonical(&self, time: &EventTime) -> CanonicalTime {
        match time {
            EventTime::Date(date) => {
                let midnight = date
                    .and_hms_opt(0, 0, 0)
                    .expect("midnight is always a valid time");
                CanonicalTime {
                    utc_ms: midnight.and_utc().timestamp_millis(),
                    offset_ms: 0,
                    tzid: TZID_FLOATING.to_string(),
                    is_date: true,
                }
            }
            EventTime::Utc(dt) => CanonicalTime {
                utc_ms: dt.timestamp_millis(),
                offset_ms: 0,
                tzid: TZID_UTC.to_string(),
                is_date: false,
            },
            EventTime::Floating(naive) => CanonicalTime {
                utc_ms: naive.and_utc().timestamp_millis(),
                offset_ms: 0,
                tzid: TZID_FLOATING.to_string(),
                is_date: false,
            },
            EventTime::Zoned { datetime, tzid } => {
                let tz: Tz = tzid
                    .parse()
                    .unwrap_or_else(|_| panic!("unknown timezone identifier: {tzid}"));
                let offset_ms = zone_offset_ms(tz, datetime);
                CanonicalTime {
                    // wall clock interpreted as UTC == true epoch + offset
                    utc_ms: datetime.and_utc().timestamp_millis(),
                    offset_ms,
                    tzid: tzid.clone(),
                    is_date: false,
                }
            }
        }
    }

    /// Reconstruct a native time from its canonical form.
    ///
    /// A canonical time tagged with the context's local zone is replayed as
    /// local wall clock; any other zone (including the explicit UTC marker)
    /// is replayed as true UTC from `utc_ms - offset_ms`. The asymmetry
    /// avoids re-applying DST transitions that happened between construction
    /// and replay. `is_date` is preserved.
    pub fn from_canonical(&self, canonical: &CanonicalTime) -> EventTime {
        let wall = naive_from_ms(canonical.utc_ms);

        if canonical.is_date {
            return EventTime::Date(wall.date());
        }
        if canonical.is_floating() {
            return EventTime::Floating(wall);
        }
        if canonical.tzid == self.local.name() {
            return EventTime::Zoned {
                datetime: wall,
                tzid: canonical.tzid.clone(),
            };
        }

        let epoch_ms = canonical.utc_ms - canonical.offset_ms as i64;
        EventTime::Utc(utc_from_ms(epoch_ms))
    }

    /// Resolve a canonical time to a true absolute instant.
    ///
    /// Floating and date values resolve their wall clock against the local
    /// zone; everything else un-applies the stored offset. This is the form
    /// handed to the platform timer.
    pub fn to_instant(&self, canonical: &CanonicalTime) -> DateTime<Utc> {
        if canonical.is_floating() || canonical.is_date {
            let wall = naive_from_ms(canonical.utc_ms);
            return resolve_local(self.local, &wall).with_timezone(&Utc);
        }
        utc_from_ms(canonical.utc_ms - canonical.offset_ms as i64)
    }
}

/// UTC offset of `tz` at the given wall-clock time, in milliseconds.
fn zone_offset_ms(tz: Tz, wall: &NaiveDateTime) -> i32 {
    let offset = match tz.offset_from_local_datetime(wall) {
        LocalResult::Single(offset) => offset,
        // DST fold: take the earlier of the two offsets
        LocalResult::Ambiguous(offset, _) => offset,
        // DST gap: the wall clock never happened; derive from the instant
        LocalResult::None => tz.offset_from_utc_datetime(wall),
    };
    offset.fix().local_minus_utc() * 1000
}

/// Resolve a wall-clock time in `tz`, tolerating DST folds and gaps.
fn resolve_local(tz: Tz, wall: &NaiveDateTime) -> DateTime<Tz> {
    match tz.from_local_datetime(wall) {
        LocalResult::Single(dt) => dt,
        LocalResult::Ambiguous(dt, _) => dt,
        LocalResult::None => tz.from_utc_datetime(&(*wall - tz.offset_from_utc_datetime(wall).fix())),
    }
}

fn naive_from_ms(ms: i64) -> NaiveDateTime {
    utc_from_ms(ms).naive_utc()
}

fn utc_from_ms(ms: i64) -> DateTime<Utc> {
    DateTime::from_timestamp_millis(ms).expect("millisecond timestamp out of chrono range")
}
