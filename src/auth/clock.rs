//! Time source for request dates.

use time::OffsetDateTime;

/// Trait for supplying the signing instant.
///
/// The default [`SystemClock`] reads the system time. Tests inject a fixed
/// clock to get reproducible `Date` headers and signatures.
pub trait Clock: Send + Sync {
    /// The current instant in UTC.
    fn now(&self) -> OffsetDateTime;
}

/// Clock backed by the system time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> OffsetDateTime {
        OffsetDateTime::now_utc()
    }
}
