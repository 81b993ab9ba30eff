//! Monthly calendar of prefixes and the shortest prefix that tells the months apart

use crate::codec::PREFIX_LEN;
use crate::timestamp::first_instant_of_month;
use crate::{encode_timestamp, Error, OsRandom, Prefix, RandSource, Timestamp, Uuid, V7Generator};
use chrono::TimeZone;
use std::collections::HashSet;

const MONTH_NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// Prefix length reported when there are too few prefixes to compare.
pub const DEFAULT_PREFIX_LEN: usize = 6;

/// Largest number of years [`CalendarSpan::build()`] covers.
pub const MAX_SPAN_YEARS: i32 = 1000;

/// An inclusive span of calendar years.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct CalendarSpan {
    /// First year included.
    pub start_year: i32,

    /// Last year included.
    pub end_year: i32,
}

impl CalendarSpan {
    /// Creates a span from `start_year` to `end_year` inclusive.
    pub const fn new(start_year: i32, end_year: i32) -> Self {
        Self {
            start_year,
            end_year,
        }
    }

    /// Returns the number of years in the span, 0 if it is empty.
    pub fn len(&self) -> u64 {
        (i64::from(self.end_year) - i64::from(self.start_year) + 1).max(0) as u64
    }

    /// Returns true if the span contains no year.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Shortens the span to its first [`MAX_SPAN_YEARS`] years.
    pub fn clamped(self) -> Self {
        if self.len() <= MAX_SPAN_YEARS as u64 {
            return self;
        }
        let end_year = self.start_year.saturating_add(MAX_SPAN_YEARS - 1);
        tracing::warn!(
            start_year = self.start_year,
            end_year = self.end_year,
            clamped_to = end_year,
            "calendar span too long; shortened"
        );
        Self::new(self.start_year, end_year)
    }

    /// Builds the calendar for this span, shortened by [`CalendarSpan::clamped()`]; otherwise
    /// equivalent to [`build_calendar()`].
    pub fn build(&self) -> Result<Vec<YearEntry>, Error> {
        let span = self.clamped();
        build_calendar(span.start_year, span.end_year)
    }
}

impl Default for CalendarSpan {
    /// 2020 through 2030.
    fn default() -> Self {
        Self::new(2020, 2030)
    }
}

/// The first instant of one calendar month.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct MonthEntry {
    /// Calendar year.
    pub year: i32,

    /// Month number, 1 for January.
    pub month: u32,

    /// English month name.
    pub month_name: &'static str,

    /// First local instant of the month.
    pub timestamp: Timestamp,

    /// The timestamp prefix of [`MonthEntry::timestamp`].
    pub prefix: Prefix,

    /// A full sample UUIDv7 carrying [`MonthEntry::timestamp`].
    pub uuid: Uuid,
}

/// The months of one calendar year.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct YearEntry {
    /// Calendar year.
    pub year: i32,

    /// Months in order, January first.
    pub months: Vec<MonthEntry>,
}

/// Builds one entry per month for `start_year..=end_year` in the system's local time zone.
pub fn build_calendar(start_year: i32, end_year: i32) -> Result<Vec<YearEntry>, Error> {
    build_calendar_with(
        start_year,
        end_year,
        &chrono::Local,
        &mut V7Generator::new(OsRandom),
    )
}

/// Builds one entry per month for `start_year..=end_year`, taking the first instant of each month
/// in `tz` and drawing sample UUIDs from `generator`.
///
/// Months whose first day is outside chrono's supported range are skipped.
///
/// # Errors
///
/// Returns [`Error::RandomnessUnavailable`] if a sample UUID cannot be generated.
pub fn build_calendar_with<Tz, R>(
    start_year: i32,
    end_year: i32,
    tz: &Tz,
    generator: &mut V7Generator<R>,
) -> Result<Vec<YearEntry>, Error>
where
    Tz: TimeZone,
    R: RandSource,
{
    let mut calendar = Vec::new();
    for year in start_year..=end_year {
        let mut months = Vec::with_capacity(12);
        for (month, month_name) in (1..=12).zip(MONTH_NAMES) {
            let Some(timestamp) = first_instant_of_month(tz, year, month) else {
                tracing::warn!(year, month, "month out of calendar range; skipped");
                continue;
            };
            months.push(MonthEntry {
                year,
                month,
                month_name,
                timestamp,
                prefix: encode_timestamp(timestamp),
                uuid: generator.generate_at(timestamp)?,
            });
        }
        calendar.push(YearEntry { year, months });
    }

    tracing::debug!(start_year, end_year, years = calendar.len(), "built monthly calendar");
    Ok(calendar)
}

/// Returns the prefixes of every month in `calendar`, in order.
pub fn calendar_prefixes(calendar: &[YearEntry]) -> Vec<Prefix> {
    calendar
        .iter()
        .flat_map(|y| y.months.iter().map(|m| m.prefix))
        .collect()
}

/// Finds how many leading digits to show so that every prefix stays distinct, plus one digit of
/// margin.
///
/// Lengths are tried from 1 upward; the first length at which truncating every prefix yields no
/// duplicate is taken, and one is added for display. The result never exceeds 12, which is also
/// returned when the input contains identical prefixes. Input with fewer than two prefixes has
/// nothing to compare and yields [`DEFAULT_PREFIX_LEN`].
///
/// # Examples
///
/// ```rust
/// use uuid7_prefix::{min_unique_prefix_length, Prefix};
///
/// let prefixes = [
///     Prefix::from_bits(0x0189_0c1c_35f1),
///     Prefix::from_bits(0x018a_0000_0000),
/// ];
/// assert_eq!(min_unique_prefix_length(&prefixes), 5);
/// ```
pub fn min_unique_prefix_length(prefixes: &[Prefix]) -> usize {
    if prefixes.len() < 2 {
        return DEFAULT_PREFIX_LEN;
    }

    let mut len = 1;
    while len <= PREFIX_LEN {
        let mut seen = HashSet::with_capacity(prefixes.len());
        if prefixes.iter().all(|p| seen.insert(p.truncate(len))) {
            break;
        }
        len += 1;
    }

    let shown = (len + 1).min(PREFIX_LEN);
    tracing::debug!(count = prefixes.len(), unique_at = len, shown, "computed prefix length");
    shown
}

#[cfg(test)]
mod tests {
    use super::{
        build_calendar, build_calendar_with, calendar_prefixes, min_unique_prefix_length,
        CalendarSpan, DEFAULT_PREFIX_LEN, MAX_SPAN_YEARS,
    };
    use crate::generator::testing::{BrokenRandom, CountingRandom};
    use crate::{Error, Prefix, V7Generator};
    use chrono::{FixedOffset, Utc};
    use std::collections::HashSet;

    /// Builds twelve months per year in order
    #[test]
    fn builds_twelve_months_per_year_in_order() {
        let span = CalendarSpan::default();
        let calendar = build_calendar_with(
            span.start_year,
            span.end_year,
            &Utc,
            &mut V7Generator::new(CountingRandom::default()),
        )
        .unwrap();

        assert_eq!(calendar.len(), 11);
        assert_eq!(calendar[0].year, 2020);
        assert_eq!(calendar[10].year, 2030);
        for y in &calendar {
            assert_eq!(y.months.len(), 12);
            for (i, m) in y.months.iter().enumerate() {
                assert_eq!(m.year, y.year);
                assert_eq!(m.month as usize, i + 1);
                assert_eq!(m.uuid.timestamp(), m.timestamp);
                assert_eq!(m.prefix.timestamp(), m.timestamp);
            }
        }

        let jan = &calendar[0].months[0];
        assert_eq!(jan.month_name, "January");
        assert_eq!(jan.prefix.as_str(), "016f5e66e800");
        assert_eq!(jan.timestamp.to_string(), "2020-01-01T00:00:00.000Z");
        assert_eq!(calendar[10].months[11].month_name, "December");
        assert_eq!(calendar[10].months[11].prefix.as_str(), "01bf92d1bc00");
    }

    /// Uses local midnight of the given time zone
    #[test]
    fn uses_local_midnight_of_the_given_time_zone() {
        let tz = FixedOffset::west_opt(5 * 3600).unwrap();
        let calendar =
            build_calendar_with(2023, 2023, &tz, &mut V7Generator::new(CountingRandom::default()))
                .unwrap();
        assert_eq!(
            calendar[0].months[2].timestamp.to_string(),
            "2023-03-01T05:00:00.000Z"
        );
    }

    /// Finds unique length of 132 monthly prefixes
    #[test]
    fn finds_unique_length_of_132_monthly_prefixes() {
        let calendar =
            build_calendar_with(2020, 2030, &Utc, &mut V7Generator::new(CountingRandom::default()))
                .unwrap();
        let prefixes = calendar_prefixes(&calendar);
        assert_eq!(prefixes.len(), 132);

        let len = min_unique_prefix_length(&prefixes);
        assert_eq!(len, 6);

        let truncated: HashSet<_> = prefixes.iter().map(|p| p.truncate(len)).collect();
        assert_eq!(truncated.len(), 132);
        // the margin digit is not needed for uniqueness
        let truncated: HashSet<_> = prefixes.iter().map(|p| p.truncate(len - 1)).collect();
        assert_eq!(truncated.len(), 132);
        let truncated: HashSet<_> = prefixes.iter().map(|p| p.truncate(len - 2)).collect();
        assert!(truncated.len() < 132);
    }

    /// Holds in the system time zone
    #[test]
    fn holds_in_the_system_time_zone() {
        let prefixes = calendar_prefixes(&build_calendar(2020, 2030).unwrap());
        let len = min_unique_prefix_length(&prefixes);
        assert!((1..=12).contains(&len));
        let truncated: HashSet<_> = prefixes.iter().map(|p| p.truncate(len)).collect();
        assert_eq!(truncated.len(), 132);
    }

    /// Adds one digit of margin capped at full length
    #[test]
    fn adds_one_digit_of_margin_capped_at_full_length() {
        let p = Prefix::from_bits;
        assert_eq!(min_unique_prefix_length(&[p(0x1000_0000_0000), p(0x2000_0000_0000)]), 2);
        assert_eq!(min_unique_prefix_length(&[p(0x0189_0c1c_35f0), p(0x0189_0c1c_35f1)]), 12);
        assert_eq!(min_unique_prefix_length(&[p(0x0189_0c1c_3500), p(0x0189_0c1c_35f1)]), 12);
        assert_eq!(min_unique_prefix_length(&[p(0x0189_0c1c_3000), p(0x0189_0c1c_35f1)]), 11);
        assert_eq!(min_unique_prefix_length(&[p(0x0189_0c1c_0000), p(0x0189_0c1c_35f1)]), 10);
    }

    /// Returns full length for duplicate prefixes
    #[test]
    fn returns_full_length_for_duplicate_prefixes() {
        let p = Prefix::from_bits(0x0189_0c1c_35f1);
        assert_eq!(min_unique_prefix_length(&[p, p]), 12);
        assert_eq!(min_unique_prefix_length(&[p, Prefix::from_bits(0), p]), 12);
    }

    /// Returns default for fewer than two prefixes
    #[test]
    fn returns_default_for_fewer_than_two_prefixes() {
        assert_eq!(min_unique_prefix_length(&[]), DEFAULT_PREFIX_LEN);
        assert_eq!(
            min_unique_prefix_length(&[Prefix::from_bits(0x0189_0c1c_35f1)]),
            DEFAULT_PREFIX_LEN
        );
    }

    /// Surfaces randomness failures
    #[test]
    fn surfaces_randomness_failures() {
        let result = build_calendar_with(2020, 2020, &Utc, &mut V7Generator::new(BrokenRandom));
        assert!(matches!(result, Err(Error::RandomnessUnavailable(_))));
    }

    /// Handles empty span
    #[test]
    fn handles_empty_span() {
        let calendar =
            build_calendar_with(2031, 2030, &Utc, &mut V7Generator::new(CountingRandom::default()))
                .unwrap();
        assert!(calendar.is_empty());
        assert_eq!(min_unique_prefix_length(&calendar_prefixes(&calendar)), DEFAULT_PREFIX_LEN);
    }

    /// Shortens oversized spans
    #[test]
    fn shortens_oversized_spans() {
        let span = CalendarSpan::new(-1_000_000_000, 1_000_000_000);
        assert_eq!(span.len(), 2_000_000_001);
        let clamped = span.clamped();
        assert_eq!(clamped, CalendarSpan::new(-1_000_000_000, -1_000_000_000 + MAX_SPAN_YEARS - 1));
        assert_eq!(clamped.len(), MAX_SPAN_YEARS as u64);

        let span = CalendarSpan::new(i32::MAX - 5, i32::MAX);
        assert_eq!(span.clamped(), span);
        let span = CalendarSpan::new(i32::MIN, i32::MAX);
        assert_eq!(span.clamped().end_year, i32::MIN + MAX_SPAN_YEARS - 1);

        assert_eq!(CalendarSpan::default().clamped(), CalendarSpan::default());
        assert!(CalendarSpan::new(2031, 2030).is_empty());
        assert_eq!(CalendarSpan::new(2031, 2030).clamped(), CalendarSpan::new(2031, 2030));
    }

    /// Builds a bounded calendar from an oversized span
    #[test]
    fn builds_a_bounded_calendar_from_an_oversized_span() {
        let calendar = CalendarSpan::new(2020, i32::MAX).build().unwrap();
        assert_eq!(calendar.len(), MAX_SPAN_YEARS as usize);
        assert_eq!(calendar[0].year, 2020);
        assert_eq!(calendar.last().unwrap().year, 2020 + MAX_SPAN_YEARS - 1);
    }
}
