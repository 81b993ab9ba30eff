//! Millisecond timestamps and the wall clock

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use std::fmt;

/// A point in time as a signed count of milliseconds since the Unix epoch.
///
/// The full `i64` range is accepted, including pre-1970 values and values far beyond the 32-bit
/// seconds range. Only `0..=0xffff_ffff_ffff` survives a trip through the 48-bit UUIDv7 field;
/// see [`encode_timestamp()`](crate::encode_timestamp).
#[derive(Copy, Clone, Eq, PartialEq, Ord, PartialOrd, Hash, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(transparent))]
pub struct Timestamp(i64);

/// Milliseconds in one minute.
pub const MINUTE: i64 = 60 * 1000;

/// Milliseconds in one hour.
pub const HOUR: i64 = 60 * MINUTE;

/// Milliseconds in one day.
pub const DAY: i64 = 24 * HOUR;

impl Timestamp {
    /// The Unix epoch.
    pub const EPOCH: Self = Self(0);

    /// The largest timestamp the 48-bit UUIDv7 field can hold (around the year 10889).
    pub const MAX_UUIDV7: Self = Self((1 << 48) - 1);

    /// Creates a timestamp from milliseconds since the Unix epoch.
    pub const fn from_millis(unix_ts_ms: i64) -> Self {
        Self(unix_ts_ms)
    }

    /// Returns the number of milliseconds since the Unix epoch.
    pub const fn as_millis(&self) -> i64 {
        self.0
    }

    /// Returns the current time read from the system clock.
    pub fn now() -> Self {
        SystemClock.now()
    }

    /// Returns this timestamp shifted by `delta_ms` milliseconds, saturating at the bounds of
    /// `i64`.
    pub const fn saturating_add_millis(self, delta_ms: i64) -> Self {
        Self(self.0.saturating_add(delta_ms))
    }

    /// Creates a timestamp from a [`DateTime`], truncating sub-millisecond precision.
    pub fn from_datetime<Tz: TimeZone>(dt: &DateTime<Tz>) -> Self {
        Self(dt.timestamp_millis())
    }

    /// Converts the timestamp to a UTC date and time, or returns `None` if it is outside the
    /// range chrono can represent.
    pub fn to_utc(&self) -> Option<DateTime<Utc>> {
        Utc.timestamp_millis_opt(self.0).single()
    }

    /// Converts the timestamp to a date and time in `tz`.
    pub fn to_timezone<Tz: TimeZone>(&self, tz: &Tz) -> Option<DateTime<Tz>> {
        self.to_utc().map(|dt| dt.with_timezone(tz))
    }

    /// Returns the ISO 8601 UTC representation with millisecond precision, e.g.
    /// `2023-06-30T12:34:56.789Z`.
    pub fn to_iso_string(&self) -> Option<String> {
        self.to_utc()
            .map(|dt| dt.format("%Y-%m-%dT%H:%M:%S%.3fZ").to_string())
    }

    /// Returns a human-readable rendering in `tz`, e.g. `2023-06-30 20:42:02.737 +09:00`, or the
    /// raw millisecond count if the timestamp is out of range.
    pub fn format_in<Tz>(&self, tz: &Tz) -> String
    where
        Tz: TimeZone,
        Tz::Offset: fmt::Display,
    {
        match self.to_timezone(tz) {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f %:z").to_string(),
            None => format!("{} ms", self.0),
        }
    }

    /// Returns the UTC rendering with a space separator and no zone designator, e.g.
    /// `2023-06-30 11:42:02.737`.
    pub fn format_utc(&self) -> String {
        match self.to_utc() {
            Some(dt) => dt.format("%Y-%m-%d %H:%M:%S%.3f").to_string(),
            None => format!("{} ms", self.0),
        }
    }
}

impl fmt::Display for Timestamp {
    /// Writes the ISO 8601 UTC representation, or the raw millisecond count if the timestamp is
    /// out of range.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.to_iso_string() {
            Some(iso) => f.write_str(&iso),
            None => write!(f, "{} ms", self.0),
        }
    }
}

impl From<i64> for Timestamp {
    fn from(src: i64) -> Self {
        Self(src)
    }
}

impl From<Timestamp> for i64 {
    fn from(src: Timestamp) -> Self {
        src.0
    }
}

impl<Tz: TimeZone> From<DateTime<Tz>> for Timestamp {
    fn from(src: DateTime<Tz>) -> Self {
        Self::from_datetime(&src)
    }
}

/// A source of the current time.
///
/// Analyses that depend on "now" take the current instant as an argument; this trait lets callers
/// such as refresh loops obtain it without tying them to the system clock.
pub trait TimeSource {
    /// Returns the current time.
    fn now(&mut self) -> Timestamp;
}

/// [`TimeSource`] backed by the system's real-time clock.
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct SystemClock;

impl TimeSource for SystemClock {
    fn now(&mut self) -> Timestamp {
        Timestamp(Utc::now().timestamp_millis())
    }
}

/// Returns the first existing instant of the given month in `tz`.
///
/// This is local midnight of the first day unless a daylight saving transition skips it, in which
/// case the first valid local time after midnight is used. Returns `None` if the date is outside
/// chrono's supported range.
pub fn first_instant_of_month<Tz: TimeZone>(tz: &Tz, year: i32, month: u32) -> Option<Timestamp> {
    let midnight = NaiveDate::from_ymd_opt(year, month, 1)?.and_hms_opt(0, 0, 0)?;

    // local midnight can be skipped by a DST gap; gaps never exceed a day
    let mut local = midnight;
    for _ in 0..(24 * 4) {
        if let Some(dt) = tz.from_local_datetime(&local).earliest() {
            return Some(Timestamp::from_datetime(&dt));
        }
        local += chrono::Duration::minutes(15);
    }

    tracing::warn!(year, month, "no valid local time found on first day of month");
    Some(Timestamp::from_datetime(&Utc.from_utc_datetime(&midnight)))
}

/// Returns the `(year, month)` pair preceding the given one.
pub(crate) const fn previous_month(year: i32, month: u32) -> (i32, u32) {
    if month <= 1 {
        (year - 1, 12)
    } else {
        (year, month - 1)
    }
}
