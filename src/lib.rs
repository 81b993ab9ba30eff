//! Parse and generate UUIDv7 and map timestamp ranges onto their hexadecimal prefixes
//!
//! ```rust
//! use uuid7_prefix::{decode_timestamp, generate, Timestamp};
//!
//! let t = decode_timestamp("01890c1c-35f1-7000-9c9f-4237c55a8d19")?;
//! println!("{}", t); // "2023-06-30T11:42:02.737Z"
//!
//! let uuid = generate(Timestamp::now())?;
//! println!("{}", uuid); // e.g. "019a0b3c-51f0-7c05-9219-566f82fff672"
//! # Ok::<(), uuid7_prefix::Error>(())
//! ```
//!
//! See [RFC 9562](https://www.rfc-editor.org/rfc/rfc9562.html#name-uuid-version-7).
//!
//! # Field and bit layout
//!
//! A UUIDv7 has the following bit layout:
//!
//! ```text
//!  0                   1                   2                   3
//!  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                          unix_ts_ms                           |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |          unix_ts_ms           |  ver  |        rand_a         |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |var|                        rand_b                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! |                            rand_b                             |
//! +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
//! ```
//!
//! Where:
//!
//! - The 48-bit `unix_ts_ms` field holds the Unix timestamp in milliseconds. Its 12 hexadecimal
//!   digits form the [`Prefix`] that this crate is about.
//! - The 4-bit `ver` field is set at `0111`.
//! - The 2-bit `var` field is set at `10`.
//! - The 12-bit `rand_a` and 62-bit `rand_b` fields are filled with a cryptographically strong
//!   random number.
//!
//! Because the timestamp comes first, the leading digits of a UUIDv7 tell roughly when it was
//! created. The analyses in this crate make that relation visible:
//!
//! - [`build_references()`] lists prefixes for instants around now (`-3 days` to `+3 days`) and
//!   for the start of this and last year and month.
//! - [`scan_transitions()`] lists the instants at which the first three or four digits change.
//! - [`build_calendar()`] lists the prefix of the first instant of every month in a span of years,
//!   and [`min_unique_prefix_length()`] tells how many digits are enough to tell them apart.
//!
//! All analyses are plain functions of their inputs. Callers that display a live table rebuild it
//! on their own schedule, e.g. every [`Config::refresh_interval`].
//!
//! # Crate features
//!
//! - `cli` (default): builds the `uuid7-prefix` command.
//! - `serde`: implements `Serialize` for the types and `Deserialize` for the value types.
//! - `uuid`: enables conversions between [`Uuid`] and `uuid::Uuid`.

#![cfg_attr(docsrs, feature(doc_cfg))]

mod error;
pub use error::Error;

mod timestamp;
pub use timestamp::{first_instant_of_month, SystemClock, TimeSource, Timestamp};

mod codec;
pub use codec::{decode_timestamp, encode_timestamp, DateInfo, Prefix, PREFIX_LEN};

mod uuid;
pub use uuid::{Uuid, Variant};

pub mod generator;
#[doc(inline)]
pub use generator::{generate, generate_now, OsRandom, RandSource, V7Generator};

pub mod references;
#[doc(inline)]
pub use references::{build_references, build_references_with, TimeReferenceEntry};

pub mod transitions;
#[doc(inline)]
pub use transitions::{scan_transitions, ScanRange, TransitionEntry, TransitionTable};

pub mod calendar;
#[doc(inline)]
pub use calendar::{
    build_calendar, build_calendar_with, calendar_prefixes, min_unique_prefix_length,
    CalendarSpan, MonthEntry, YearEntry,
};

pub mod config;
pub use config::Config;
