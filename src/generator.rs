//! UUIDv7 generator and related types.

use crate::{encode_timestamp, Error, SystemClock, TimeSource, Timestamp, Uuid};

/// A trait that defines the minimum random number generator interface for [`V7Generator`].
///
/// Implementations must report failure instead of substituting a weaker source, so that a broken
/// entropy source never yields predictable UUIDs.
pub trait RandSource {
    /// Fills `dest` with cryptographically strong random data.
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error>;
}

/// The platform's cryptographically secure random number generator.
///
/// Every call reads fresh bytes from the operating system through [`rand::rngs::OsRng`].
#[derive(Copy, Clone, Eq, PartialEq, Debug, Default)]
pub struct OsRandom;

impl RandSource for OsRandom {
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        rand::RngCore::try_fill_bytes(&mut rand::rngs::OsRng, dest)
    }
}

/// An adapter that implements [`RandSource`] for [`rand::RngCore`] types.
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct Adapter<T>(/** The wrapped [`rand::RngCore`] type. */ pub T);

impl<T: rand::RngCore + rand::CryptoRng> RandSource for Adapter<T> {
    fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
        self.0.try_fill_bytes(dest)
    }
}

/// Represents a UUIDv7 generator that stamps arbitrary timestamps with fresh random bits.
///
/// Unlike a monotonic generator, this type keeps no state between calls: each UUID gets the
/// timestamp it is asked for and 74 bits straight from the random source. This makes it suitable
/// for producing sample identifiers for past or future instants.
///
/// # Examples
///
/// ```rust
/// use uuid7_prefix::{OsRandom, Timestamp, V7Generator};
///
/// let mut g = V7Generator::new(OsRandom);
/// let uuid = g.generate_at(Timestamp::from_millis(0x0189_0c1c_35f1))?;
/// assert!(uuid.to_string().starts_with("01890c1c-35f1-7"));
/// # Ok::<(), uuid7_prefix::Error>(())
/// ```
#[derive(Clone, Eq, PartialEq, Debug, Default)]
pub struct V7Generator<R = OsRandom, C = SystemClock> {
    /// The random number generator used by the generator.
    rng: R,

    /// The clock consulted by [`V7Generator::generate()`].
    clock: C,
}

impl<R: RandSource> V7Generator<R> {
    /// Creates a generator instance reading the system clock.
    pub const fn new(rng: R) -> Self {
        Self {
            rng,
            clock: SystemClock,
        }
    }
}

impl<T: rand::RngCore + rand::CryptoRng> V7Generator<Adapter<T>> {
    /// Creates a generator object with a specified random number generator that implements
    /// [`rand::RngCore`] and [`rand::CryptoRng`].
    pub const fn with_rand08(rng: T) -> Self {
        Self::new(Adapter(rng))
    }
}

impl<R: RandSource, C: TimeSource> V7Generator<R, C> {
    /// Creates a generator instance with a specified random source and clock.
    pub const fn with_rand_and_time_sources(rng: R, clock: C) -> Self {
        Self { rng, clock }
    }

    /// Generates a new UUIDv7 object from the current time.
    pub fn generate(&mut self) -> Result<Uuid, Error> {
        let now = self.clock.now();
        self.generate_at(now)
    }

    /// Generates a new UUIDv7 object carrying the timestamp passed.
    ///
    /// Timestamps outside the 48-bit range are truncated as described in
    /// [`encode_timestamp()`].
    ///
    /// # Errors
    ///
    /// Returns [`Error::RandomnessUnavailable`] if the random source fails.
    pub fn generate_at(&mut self, t: Timestamp) -> Result<Uuid, Error> {
        let mut random = [0u8; 10];
        self.rng.try_fill_bytes(&mut random).map_err(|err| {
            tracing::warn!(error = %err, "random source failed; refusing to generate UUID");
            Error::RandomnessUnavailable(err)
        })?;
        Ok(Uuid::from_prefix_v7(&encode_timestamp(t), random))
    }
}

/// Generates a UUIDv7 object carrying `t`, using the operating system's random number generator.
///
/// # Examples
///
/// ```rust
/// use uuid7_prefix::{generate, Timestamp};
///
/// let uuid = generate(Timestamp::now())?;
/// println!("{}", uuid); // e.g. "019a0b3c-51f0-7c05-9219-566f82fff672"
/// println!("{}", uuid.to_braced_upper()); // e.g. "{019A0B3C-51F0-7C05-9219-566F82FFF672}"
/// # Ok::<(), uuid7_prefix::Error>(())
/// ```
pub fn generate(t: Timestamp) -> Result<Uuid, Error> {
    V7Generator::new(OsRandom).generate_at(t)
}

/// Generates a UUIDv7 object for the current time.
pub fn generate_now() -> Result<Uuid, Error> {
    V7Generator::new(OsRandom).generate()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::RandSource;

    /// Deterministic source that emits an incrementing byte sequence.
    #[derive(Debug, Default)]
    pub struct CountingRandom(pub u8);

    impl RandSource for CountingRandom {
        fn try_fill_bytes(&mut self, dest: &mut [u8]) -> Result<(), rand::Error> {
            for e in dest {
                *e = self.0;
                self.0 = self.0.wrapping_add(1);
            }
            Ok(())
        }
    }

    /// Source that always fails.
    #[derive(Debug, Default)]
    pub struct BrokenRandom;

    impl RandSource for BrokenRandom {
        fn try_fill_bytes(&mut self, _: &mut [u8]) -> Result<(), rand::Error> {
            Err(rand::Error::new("entropy source closed"))
        }
    }
}
