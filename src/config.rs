//! Analysis settings and their environment overrides

use crate::{CalendarSpan, ScanRange};
use std::time::Duration;

/// Environment variable overriding [`ScanRange::start`] (hexadecimal, `0x` optional).
pub const ENV_SCAN_START: &str = "UUID7_PREFIX_SCAN_START";

/// Environment variable overriding [`ScanRange::end`] (hexadecimal, `0x` optional).
pub const ENV_SCAN_END: &str = "UUID7_PREFIX_SCAN_END";

/// Environment variable overriding [`CalendarSpan::start_year`].
pub const ENV_START_YEAR: &str = "UUID7_PREFIX_START_YEAR";

/// Environment variable overriding [`CalendarSpan::end_year`].
pub const ENV_END_YEAR: &str = "UUID7_PREFIX_END_YEAR";

/// Environment variable overriding [`Config::refresh_interval`] in seconds.
pub const ENV_REFRESH_SECS: &str = "UUID7_PREFIX_REFRESH_SECS";

/// Settings of the analyses.
#[derive(Clone, Eq, PartialEq, Debug)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct Config {
    /// 4-digit prefix range scanned for transitions.
    pub scan: ScanRange,

    /// Years covered by the monthly calendar.
    pub calendar: CalendarSpan,

    /// How often a live reference table should be rebuilt.
    pub refresh_interval: Duration,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            scan: ScanRange::default(),
            calendar: CalendarSpan::default(),
            refresh_interval: Duration::from_secs(60),
        }
    }
}

impl Config {
    /// Reads the configuration from `UUID7_PREFIX_*` environment variables, falling back to the
    /// defaults for unset or unparsable values.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads the configuration through `lookup`, which maps a variable name to its value.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();

        if let Some(v) = read(&lookup, ENV_SCAN_START, parse_hex_u16) {
            config.scan.start = v;
        }
        if let Some(v) = read(&lookup, ENV_SCAN_END, parse_hex_u16) {
            config.scan.end = v;
        }
        if let Some(v) = read(&lookup, ENV_START_YEAR, |s| s.parse().ok()) {
            config.calendar.start_year = v;
        }
        if let Some(v) = read(&lookup, ENV_END_YEAR, |s| s.parse().ok()) {
            config.calendar.end_year = v;
        }
        if let Some(v) = read(&lookup, ENV_REFRESH_SECS, |s| s.parse().ok()) {
            config.refresh_interval = Duration::from_secs(v);
        }

        config
    }
}

fn read<T>(
    lookup: &impl Fn(&str) -> Option<String>,
    key: &str,
    parse: impl Fn(&str) -> Option<T>,
) -> Option<T> {
    let raw = lookup(key)?;
    let value = parse(raw.trim());
    if value.is_none() {
        tracing::warn!(key, value = %raw, "ignoring unparsable setting");
    }
    value
}

/// Parses a 16-bit hexadecimal number with an optional `0x` prefix.
pub fn parse_hex_u16(src: &str) -> Option<u16> {
    let digits = src
        .strip_prefix("0x")
        .or_else(|| src.strip_prefix("0X"))
        .unwrap_or(src);
    u16::from_str_radix(digits, 16).ok()
}

#[cfg(test)]
mod tests {
    use super::{parse_hex_u16, Config};
    use crate::{CalendarSpan, ScanRange};
    use std::{collections::HashMap, time::Duration};

    /// Defaults to the reference deployment settings
    #[test]
    fn defaults_to_the_reference_deployment_settings() {
        let config = Config::default();
        assert_eq!(config.scan, ScanRange::new(0x0160, 0x01c0));
        assert_eq!(config.calendar, CalendarSpan::new(2020, 2030));
        assert_eq!(config.refresh_interval, Duration::from_secs(60));
    }

    /// Overrides defaults from variables
    #[test]
    fn overrides_defaults_from_variables() {
        let vars: HashMap<&str, &str> = [
            ("UUID7_PREFIX_SCAN_START", "0x0180"),
            ("UUID7_PREFIX_SCAN_END", "01A0"),
            ("UUID7_PREFIX_START_YEAR", "2022"),
            ("UUID7_PREFIX_END_YEAR", " 2026 "),
            ("UUID7_PREFIX_REFRESH_SECS", "5"),
        ]
        .into_iter()
        .collect();
        let config = Config::from_lookup(|k| vars.get(k).map(|v| v.to_string()));
        assert_eq!(config.scan, ScanRange::new(0x0180, 0x01a0));
        assert_eq!(config.calendar, CalendarSpan::new(2022, 2026));
        assert_eq!(config.refresh_interval, Duration::from_secs(5));
    }

    /// Ignores unparsable values
    #[test]
    fn ignores_unparsable_values() {
        let config = Config::from_lookup(|k| match k {
            "UUID7_PREFIX_SCAN_START" => Some("zz".to_owned()),
            "UUID7_PREFIX_SCAN_END" => Some("10000".to_owned()),
            "UUID7_PREFIX_REFRESH_SECS" => Some("-1".to_owned()),
            _ => None,
        });
        assert_eq!(config, Config::default());
    }

    /// Parses hexadecimal with optional prefix
    #[test]
    fn parses_hexadecimal_with_optional_prefix() {
        assert_eq!(parse_hex_u16("0160"), Some(0x0160));
        assert_eq!(parse_hex_u16("0x1c0"), Some(0x01c0));
        assert_eq!(parse_hex_u16("0XFFFF"), Some(0xffff));
        assert_eq!(parse_hex_u16("0x"), None);
        assert_eq!(parse_hex_u16(""), None);
    }
}
