//! Quick-reference table of prefixes around the current time

use crate::timestamp::{first_instant_of_month, previous_month, DAY, HOUR, MINUTE};
use crate::{encode_timestamp, Error, OsRandom, Prefix, RandSource, Timestamp, Uuid, V7Generator};
use chrono::{Datelike, TimeZone};
use std::fmt;

/// Labels and offsets from "now" of the relative markers, in presentation order.
const RELATIVE_MARKERS: [(&str, i64); 13] = [
    ("-3 days", -3 * DAY),
    ("-1 day", -DAY),
    ("-3 hours", -3 * HOUR),
    ("-1 hour", -HOUR),
    ("-30 minutes", -30 * MINUTE),
    ("-15 minutes", -15 * MINUTE),
    ("Now", 0),
    ("+15 minutes", 15 * MINUTE),
    ("+30 minutes", 30 * MINUTE),
    ("+1 hour", HOUR),
    ("+3 hours", 3 * HOUR),
    ("+1 day", DAY),
    ("+3 days", 3 * DAY),
];

/// One row of the quick-reference table.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TimeReferenceEntry {
    /// Human-readable label such as `-3 days` or `This month`.
    pub label: &'static str,

    /// The instant this row describes.
    pub timestamp: Timestamp,

    /// The timestamp prefix of [`TimeReferenceEntry::timestamp`].
    pub prefix: Prefix,

    /// A full sample UUIDv7 carrying [`TimeReferenceEntry::timestamp`].
    pub uuid: Uuid,

    /// The instant rendered in the observer's time zone.
    pub formatted: String,

    /// True only for the row at offset zero from now.
    pub is_now: bool,
}

impl fmt::Display for TimeReferenceEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:<12} {}  {}", self.label, self.prefix, self.formatted)
    }
}

/// Builds the quick-reference table for `now` in the system's local time zone.
///
/// See [`build_references_with()`] for the row order.
pub fn build_references(now: Timestamp) -> Result<Vec<TimeReferenceEntry>, Error> {
    build_references_with(now, &chrono::Local, &mut V7Generator::new(OsRandom))
}

/// Builds the quick-reference table for `now`, resolving calendar markers in `tz` and drawing
/// sample UUIDs from `generator`.
///
/// Rows come in a fixed order: six past offsets (`-3 days` to `-15 minutes`), `Now`, six future
/// offsets (`+15 minutes` to `+3 days`), then `This year`, `Last year`, `This month`, and
/// `Last month`. The calendar markers point at the first local instant of the year or month.
/// The order is the presentation order, not a sort by timestamp.
///
/// The table is meant to be rebuilt periodically by the caller so that the relative rows follow
/// the clock; each build is independent of the previous one.
///
/// # Errors
///
/// Returns [`Error::RandomnessUnavailable`] if a sample UUID cannot be generated.
pub fn build_references_with<Tz, R>(
    now: Timestamp,
    tz: &Tz,
    generator: &mut V7Generator<R>,
) -> Result<Vec<TimeReferenceEntry>, Error>
where
    Tz: TimeZone,
    Tz::Offset: fmt::Display,
    R: RandSource,
{
    let mut markers: Vec<(&'static str, Timestamp, bool)> = RELATIVE_MARKERS
        .iter()
        .map(|&(label, offset)| (label, now.saturating_add_millis(offset), offset == 0))
        .collect();

    if let Some(local_now) = now.to_timezone(tz) {
        let (year, month) = (local_now.year(), local_now.month());
        let (last_month_year, last_month) = previous_month(year, month);
        for (label, year, month) in [
            ("This year", year, 1),
            ("Last year", year - 1, 1),
            ("This month", year, month),
            ("Last month", last_month_year, last_month),
        ] {
            if let Some(t) = first_instant_of_month(tz, year, month) {
                markers.push((label, t, false));
            }
        }
    } else {
        tracing::warn!(now = now.as_millis(), "current time out of calendar range");
    }

    let mut refs = Vec::with_capacity(markers.len());
    for (label, timestamp, is_now) in markers {
        refs.push(TimeReferenceEntry {
            label,
            timestamp,
            prefix: encode_timestamp(timestamp),
            uuid: generator.generate_at(timestamp)?,
            formatted: timestamp.format_in(tz),
            is_now,
        });
    }

    tracing::debug!(now = now.as_millis(), rows = refs.len(), "built reference table");
    Ok(refs)
}
