use derive_more::{Add, AddAssign, Display};
use serde::{Deserialize, Serialize};
use std::ops::{Sub, SubAssign};

///
/// Timestamp
/// (in seconds)
///

#[derive(
    Add,
    AddAssign,
    Clone,
    Copy,
    Debug,
    Default,
    Display,
    Eq,
    PartialEq,
    Hash,
    Ord,
    PartialOrd,
    Serialize,
    Deserialize,
)]
#[repr(transparent)]
pub struct Timestamp(u64);

impl Sub for Timestamp {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self(self.0 - rhs.0)
    }
}

impl SubAssign for Timestamp {
    fn sub_assign(&mut self, rhs: Self) {
        self.0 -= rhs.0;
    }
}

impl Timestamp {
    pub const EPOCH: Self = Self(u64::MIN);

    /// Construct from seconds.
    #[must_use]
    pub const fn from_seconds(secs: u64) -> Self {
        Self(secs)
    }

    /// Current wall-clock timestamp in seconds.
    #[must_use]
    pub fn now() -> Self {
        let secs = chrono::Utc::now().timestamp();
        Self(u64::try_from(secs).unwrap_or_default())
    }

    #[must_use]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl From<u64> for Timestamp {
    fn from(u: u64) -> Self {
        Self(u)
    }
}

///
/// Clock
///
/// Wall-clock capability injected into the model layer so auto-timestamp
/// stamping stays deterministic under test. The compiler itself never reads
/// the clock; it receives `now` as an argument.
///

pub trait Clock {
    fn now(&self) -> Timestamp;
}

///
/// SystemClock
///

#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Timestamp {
        Timestamp::now()
    }
}

///
/// FixedClock
/// Deterministic clock for tests and replay tooling.
///

#[derive(Clone, Copy, Debug)]
pub struct FixedClock(pub Timestamp);

impl Clock for FixedClock {
    fn now(&self) -> Timestamp {
        self.0
    }
}

///
/// TESTS
///
