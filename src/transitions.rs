//! Points in time where the leading digits of UUIDv7 prefixes change

use crate::{Prefix, Timestamp};
use std::{fmt, ops};

/// Rendering of the missing predecessor of the first transition.
pub const NO_PREDECESSOR: &str = "—";

/// An inclusive range of 4-digit (16-bit) prefix values to scan.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct ScanRange {
    /// First 4-digit prefix value scanned.
    pub start: u16,

    /// Last 4-digit prefix value scanned (inclusive).
    pub end: u16,
}

impl ScanRange {
    /// Creates a range from `start` to `end` inclusive.
    pub const fn new(start: u16, end: u16) -> Self {
        Self { start, end }
    }

    /// Scans the range; equivalent to [`scan_transitions()`].
    pub fn scan(&self) -> TransitionTable {
        scan_transitions(self.start, self.end)
    }
}

impl Default for ScanRange {
    /// `0160`..=`01c0`, which spans late 2017 through late 2030.
    fn default() -> Self {
        Self::new(0x0160, 0x01c0)
    }
}

impl From<ops::RangeInclusive<u16>> for ScanRange {
    fn from(src: ops::RangeInclusive<u16>) -> Self {
        Self::new(*src.start(), *src.end())
    }
}

/// A point where the first `digits` characters of the prefix take a new value.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransitionEntry {
    /// Number of leading hexadecimal digits compared (3 or 4).
    pub digits: usize,

    /// Truncated prefix before the transition, or `None` for the first entry of a scan.
    pub old_prefix: Option<String>,

    /// Truncated prefix from the transition on.
    pub new_prefix: String,

    /// Full 12-digit prefix at which the new value first appears.
    pub full_prefix: Prefix,

    /// Instant at which [`TransitionEntry::full_prefix`] becomes current.
    pub timestamp: Timestamp,
}

impl TransitionEntry {
    /// Returns the old prefix, or [`NO_PREDECESSOR`] for the first entry.
    pub fn old_prefix_or_sentinel(&self) -> &str {
        self.old_prefix.as_deref().unwrap_or(NO_PREDECESSOR)
    }
}

impl fmt::Display for TransitionEntry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} → {}",
            self.old_prefix_or_sentinel(),
            self.new_prefix
        )
    }
}

/// Result of a transition scan, one run-length-encoded list per truncation width.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TransitionTable {
    /// Transitions of the first three digits.
    pub three_digit: Vec<TransitionEntry>,

    /// Transitions of the first four digits.
    pub four_digit: Vec<TransitionEntry>,
}

impl TransitionTable {
    /// Returns the list for the given width, or `None` for widths other than 3 and 4.
    pub fn for_digits(&self, digits: usize) -> Option<&[TransitionEntry]> {
        match digits {
            3 => Some(self.three_digit.as_slice()),
            4 => Some(self.four_digit.as_slice()),
            _ => None,
        }
    }

    /// Returns the time bracket in which a prefix's first `digits` characters were current.
    ///
    /// The bracket starts at the matching transition and ends at the next one, or is open-ended
    /// if the match is the last transition in the scan. Returns `None` if the truncated prefix
    /// does not appear in the scan.
    pub fn bracket(&self, digits: usize, prefix: &Prefix) -> Option<(Timestamp, Option<Timestamp>)> {
        let entries = self.for_digits(digits)?;
        let key = prefix.truncate(digits);
        let i = entries.iter().position(|e| e.new_prefix == key)?;
        Some((entries[i].timestamp, entries.get(i + 1).map(|e| e.timestamp)))
    }
}

/// Lists the points where the 3-digit and 4-digit prefixes change between `start` and `end`.
///
/// Each 16-bit value `p` in `start..=end` is taken as the first four hexadecimal digits of a
/// prefix padded with zeros (`pppp00000000`) and decoded into the instant it represents. For each
/// width, an entry is recorded only when the truncated prefix differs from the previous entry's,
/// so consecutive entries never share [`TransitionEntry::new_prefix`]. The first entry of each
/// list has no predecessor. An empty range (`start > end`) yields empty lists.
///
/// # Examples
///
/// ```rust
/// use uuid7_prefix::scan_transitions;
///
/// let table = scan_transitions(0x0180, 0x0190);
/// assert_eq!(table.three_digit.len(), 2);
/// assert_eq!(table.three_digit[1].to_string(), "018 → 019");
/// assert_eq!(table.three_digit[1].timestamp.to_string(), "2024-06-10T02:35:18.400Z");
/// ```
pub fn scan_transitions(start: u16, end: u16) -> TransitionTable {
    let mut table = TransitionTable::default();
    for p in start..=end {
        let full_prefix = Prefix::from_bits((p as u64) << 32);
        let timestamp = full_prefix.timestamp();
        push_if_changed(&mut table.three_digit, 3, full_prefix, timestamp);
        push_if_changed(&mut table.four_digit, 4, full_prefix, timestamp);
    }

    tracing::debug!(
        start,
        end,
        three_digit = table.three_digit.len(),
        four_digit = table.four_digit.len(),
        "scanned prefix transitions"
    );
    table
}

fn push_if_changed(
    entries: &mut Vec<TransitionEntry>,
    digits: usize,
    full_prefix: Prefix,
    timestamp: Timestamp,
) {
    let truncated = full_prefix.truncate(digits);
    let old_prefix = match entries.last() {
        Some(last) if last.new_prefix == truncated => return,
        Some(last) => Some(last.new_prefix.clone()),
        None => None,
    };
    entries.push(TransitionEntry {
        digits,
        old_prefix,
        new_prefix: truncated.to_owned(),
        full_prefix,
        timestamp,
    });
}

#[cfg(test)]
mod tests {
    use super::{scan_transitions, ScanRange, NO_PREDECESSOR};
    use crate::{encode_timestamp, Prefix};

    /// Produces run-length-encoded boundaries for the default range
    #[test]
    fn produces_run_length_encoded_boundaries_for_the_default_range() {
        let table = ScanRange::default().scan();

        let three: Vec<_> = table.three_digit.iter().map(|e| e.new_prefix.as_str()).collect();
        assert_eq!(three, ["016", "017", "018", "019", "01a", "01b", "01c"]);
        assert_eq!(table.four_digit.len(), 0x01c0 - 0x0160 + 1);

        for list in [&table.three_digit, &table.four_digit] {
            assert!(!list.is_empty());
            assert_eq!(list[0].old_prefix, None);
            assert_eq!(list[0].old_prefix_or_sentinel(), NO_PREDECESSOR);
            for w in list.windows(2) {
                assert_ne!(w[0].new_prefix, w[1].new_prefix);
                assert_eq!(w[1].old_prefix.as_deref(), Some(w[0].new_prefix.as_str()));
                assert!(w[0].full_prefix < w[1].full_prefix);
                assert!(w[0].timestamp < w[1].timestamp);
            }
        }
    }

    /// Records the first full prefix of each new value
    #[test]
    fn records_the_first_full_prefix_of_each_new_value() {
        let table = scan_transitions(0x0160, 0x01c0);
        let e = &table.three_digit[2];
        assert_eq!(e.digits, 3);
        assert_eq!(e.to_string(), "017 → 018");
        assert_eq!(e.full_prefix.as_str(), "018000000000");
        assert_eq!(e.timestamp.as_millis(), 0x0180 << 32);
        assert_eq!(e.timestamp.to_string(), "2022-04-06T17:50:41.664Z");
        assert_eq!(encode_timestamp(e.timestamp), e.full_prefix);

        let e = &table.four_digit[1];
        assert_eq!(e.digits, 4);
        assert_eq!(e.to_string(), "0160 → 0161");
        assert_eq!(e.full_prefix.split_at(4), ("0161", "00000000"));
    }

    /// Starts mid-run with a sentinel predecessor
    #[test]
    fn starts_mid_run_with_a_sentinel_predecessor() {
        let table = scan_transitions(0x0185, 0x0191);
        assert_eq!(table.three_digit.len(), 2);
        assert_eq!(table.three_digit[0].to_string(), "— → 018");
        assert_eq!(table.three_digit[0].full_prefix.as_str(), "018500000000");
        assert_eq!(table.three_digit[1].full_prefix.as_str(), "019000000000");
    }

    /// Handles degenerate ranges
    #[test]
    fn handles_degenerate_ranges() {
        let single = scan_transitions(0x0189, 0x0189);
        assert_eq!(single.three_digit.len(), 1);
        assert_eq!(single.four_digit.len(), 1);

        let empty = scan_transitions(0x01c0, 0x0160);
        assert!(empty.three_digit.is_empty());
        assert!(empty.four_digit.is_empty());

        let full = ScanRange::from(0xfff0..=0xffff).scan();
        assert_eq!(full.three_digit.len(), 1);
        assert_eq!(full.four_digit.len(), 16);
        assert_eq!(full.four_digit[15].full_prefix.as_str(), "ffff00000000");
    }

    /// Brackets a prefix between consecutive transitions
    #[test]
    fn brackets_a_prefix_between_consecutive_transitions() {
        let table = ScanRange::default().scan();
        let p = Prefix::from_bits(0x0189_0c1c_35f1);

        let (from, to) = table.bracket(3, &p).unwrap();
        assert_eq!(from.to_string(), "2022-04-06T17:50:41.664Z");
        assert_eq!(to.unwrap().to_string(), "2024-06-10T02:35:18.400Z");

        let (from, to) = table.bracket(4, &p).unwrap();
        assert_eq!(from.as_millis(), 0x0189 << 32);
        assert_eq!(to.unwrap().as_millis(), 0x018a << 32);

        let last = Prefix::from_bits(0x01c0_ffff_ffff);
        assert_eq!(table.bracket(4, &last).unwrap().1, None);
        assert!(table.bracket(4, &Prefix::from_bits(0)).is_none());
        assert!(table.for_digits(5).is_none());
    }
}
