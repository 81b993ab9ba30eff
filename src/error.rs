//! Error type shared by the codec and the generator

/// Errors returned by fallible operations of this crate.
///
/// Parse failures ([`Error::InvalidFormat`] and [`Error::TooShort`]) are meant to be recovered at
/// the input boundary and shown to the user; see [`Error::user_message()`].
/// [`Error::RandomnessUnavailable`] aborts UUID generation instead of falling back to a weaker
/// random source.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The input contains characters other than hexadecimal digits, hyphens, and braces.
    #[error("invalid string representation")]
    InvalidFormat,

    /// The input has fewer than 12 hexadecimal digits after normalization.
    #[error("expected at least 12 hexadecimal digits, found {len}")]
    TooShort {
        /// Number of hexadecimal digits found.
        len: usize,
    },

    /// The platform's cryptographically strong random source could not be read.
    #[error("random number generator unavailable")]
    RandomnessUnavailable(#[source] rand::Error),
}

impl Error {
    /// Returns the message shown to the user of an interactive parser.
    pub fn user_message(&self) -> &'static str {
        match self {
            Self::InvalidFormat => "Invalid UUID format",
            Self::TooShort { .. } => "UUID needs to be at least 12 characters",
            Self::RandomnessUnavailable(_) => "Secure random number generator unavailable",
        }
    }

    /// Returns true if the error came from parsing user input.
    pub fn is_parse_error(&self) -> bool {
        matches!(self, Self::InvalidFormat | Self::TooShort { .. })
    }
}
