//! Millisecond clock for unit tests.

use crate::time::{TimeDuration, TimeInstant, TimeSource};
use core::cell::Cell;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeDuration for TestDuration {
    const ZERO: Self = TestDuration(0);

    fn as_millis(&self) -> u64 {
        self.0
    }

    fn from_millis(millis: u64) -> Self {
        TestDuration(millis)
    }

    fn saturating_sub(self, other: Self) -> Self {
        TestDuration(self.0.saturating_sub(other.0))
    }
}

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> TestDuration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, d: TestDuration) -> Option<Self> {
        self.0.checked_add(d.0).map(TestInstant)
    }

    fn checked_sub(self, d: TestDuration) -> Option<Self> {
        self.0.checked_sub(d.0).map(TestInstant)
    }
}

/// Clock that only moves when told to.
pub struct MockTimeSource(Cell<u64>);

impl MockTimeSource {
    pub fn new() -> Self {
        MockTimeSource(Cell::new(0))
    }

    pub fn advance(&self, by: TestDuration) {
        self.0.set(self.0.get() + by.0);
    }

    pub fn set_time(&self, at: TestInstant) {
        self.0.set(at.0);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        TestInstant(self.0.get())
    }
}
