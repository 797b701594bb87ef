//! Shared test infrastructure for pausable-timers integration tests

#![allow(dead_code)] // Items used across multiple test files; Rust analyzes per-file

use core::cell::Cell;
use pausable_timers::{
    ManualScheduler, PausableTimer, TimeDuration, TimeInstant, TimeSource, TimerCallback,
};

// ============================================================================
// Mock Time Types
// ============================================================================

/// Mock duration type for testing (wraps milliseconds)
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestDuration(pub u64);

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

/// Mock instant type for testing
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TestInstant(pub u64);

impl TimeInstant for TestInstant {
    type Duration = TestDuration;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        TestDuration(self.0 - earlier.0)
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(TestInstant)
    }

    fn checked_sub(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_sub(duration.0).map(TestInstant)
    }
}

// ============================================================================
// Mock Time Source
// ============================================================================

/// Mock time source with controllable time advancement
pub struct MockTimeSource {
    current_time: Cell<TestInstant>,
}

impl MockTimeSource {
    pub fn new() -> Self {
        Self {
            current_time: Cell::new(TestInstant(0)),
        }
    }

    /// Advance time by the given duration
    pub fn advance(&self, duration: TestDuration) {
        let current = self.current_time.get();
        self.current_time.set(TestInstant(current.0 + duration.0));
    }

    pub fn set_time(&self, time: TestInstant) {
        self.current_time.set(time);
    }
}

impl TimeSource<TestInstant> for MockTimeSource {
    fn now(&self) -> TestInstant {
        self.current_time.get()
    }
}

// ============================================================================
// Scheduler driving
// ============================================================================

pub type TestScheduler<'t> = ManualScheduler<'t, TestInstant, MockTimeSource, 8>;

pub type TestTimer<'t, C> =
    PausableTimer<'t, TestInstant, MockTimeSource, TestScheduler<'t>, C>;

/// Moves the clock forward by `ms`, stopping at every deadline on the way
/// and delivering the due handles to `timer`, like a fake-timer runtime.
pub fn advance<C: TimerCallback>(
    clock: &MockTimeSource,
    sched: &TestScheduler<'_>,
    timer: &mut TestTimer<'_, C>,
    ms: u64,
) {
    step_through(clock, sched, ms, || {
        sched.run_due(|handle| {
            timer.fire(handle).unwrap();
        });
    });
}

/// Steps the clock to each pending deadline up to `ms` ahead and calls
/// `service` there. An instant is serviced once; fires re-armed at an
/// instant that was already serviced run one millisecond later.
pub fn step_through(
    clock: &MockTimeSource,
    sched: &TestScheduler<'_>,
    ms: u64,
    mut service: impl FnMut(),
) {
    let target = TestInstant(clock.now().0 + ms);
    let mut last_serviced: Option<TestInstant> = None;
    while let Some(deadline) = sched.next_deadline() {
        let mut at = deadline.max(clock.now());
        if let Some(last) = last_serviced {
            at = at.max(TestInstant(last.0 + 1));
        }
        if at > target {
            break;
        }
        clock.set_time(at);
        service();
        last_serviced = Some(at);
    }
    clock.set_time(target);
}

// ============================================================================
// Call counting
// ============================================================================

/// Counts callback invocations.
pub struct Counter(Cell<u32>);

impl Counter {
    pub fn new() -> Self {
        Counter(Cell::new(0))
    }

    pub fn hit(&self) {
        self.0.set(self.0.get() + 1);
    }

    pub fn count(&self) -> u32 {
        self.0.get()
    }
}
