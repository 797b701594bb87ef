#![no_std]
#![no_main]

use core::cell::Cell;

use cortex_m_rt::entry;
use panic_halt as _;
use pausable_timers::{
    Bound, FireContext, ManualScheduler, PausableTimer, TimeDuration, TimeInstant, TimeSource,
    TimerAction, TimerCollection, TimerId, WithContext,
};

// ============================================================================
// Minimal Time Types
// ============================================================================

/// Minimal 32-bit millisecond duration
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Duration32(u32);

impl Duration32 {
    const fn new(millis: u32) -> Self {
        Duration32(millis)
    }
}

impl TimeDuration for Duration32 {
    const ZERO: Self = Duration32(0);

    fn as_millis(&self) -> u64 {
        self.0 as u64
    }

    fn from_millis(millis: u64) -> Self {
        Duration32(millis as u32)
    }

    fn saturating_sub(self, other: Self) -> Self {
        Duration32(self.0.saturating_sub(other.0))
    }
}

/// Minimal 32-bit millisecond instant
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Instant32(u32);

impl TimeInstant for Instant32 {
    type Duration = Duration32;

    fn duration_since(&self, earlier: Self) -> Self::Duration {
        Duration32(self.0.saturating_sub(earlier.0))
    }

    fn checked_add(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_add(duration.0).map(Instant32)
    }

    fn checked_sub(self, duration: Self::Duration) -> Option<Self> {
        self.0.checked_sub(duration.0).map(Instant32)
    }
}

// ============================================================================
// Minimal TimeSource Implementation
// ============================================================================

/// Clock stepped by hand so every state transition is reachable.
pub struct MinimalTimeSource(Cell<u32>);

impl MinimalTimeSource {
    fn step(&self, millis: u32) {
        self.0.set(self.0.get().wrapping_add(millis));
    }
}

impl TimeSource<Instant32> for MinimalTimeSource {
    fn now(&self) -> Instant32 {
        Instant32(self.0.get())
    }
}

// ============================================================================
// Test Timers
// ============================================================================

// This function uses the library to prevent optimizer from removing code
#[inline(never)]
fn test_timers() {
    let time_source = MinimalTimeSource(Cell::new(0));
    let scheduler = ManualScheduler::<_, _, 8>::new(&time_source);

    // One-shot timer with pause and resume
    if let Ok(mut timer) = PausableTimer::timeout(
        || core::hint::black_box(()),
        Duration32::new(100),
        &time_source,
        &scheduler,
    ) {
        time_source.step(40);
        timer.pause();
        let _ = timer.resume();
        time_source.step(60);
        scheduler.run_due(|handle| {
            let _ = timer.fire(handle);
        });
        core::hint::black_box(timer.remaining_time());
    }

    // Interval timer that pauses itself
    if let Ok(mut timer) = PausableTimer::interval(
        WithContext(|ctx: &mut FireContext| ctx.pause()),
        Duration32::new(16),
        &time_source,
        &scheduler,
    ) {
        time_source.step(16);
        scheduler.run_due(|handle| {
            let _ = timer.fire(handle);
        });
        let _ = timer.restart();
        core::hint::black_box(timer.is_paused());
    }

    // Collection of timers with bound arguments
    fn report(level: &u8) {
        core::hint::black_box(*level);
    }

    let mut collection: TimerCollection<'_, _, _, _, Bound<fn(&u8), u8>, 4> =
        TimerCollection::new();
    for id in 0..4u8 {
        if let Ok(timer) = PausableTimer::interval(
            Bound::new(report as fn(&u8), id),
            Duration32::new(10 * (id as u32 + 1)),
            &time_source,
            &scheduler,
        ) {
            let _ = collection.add_timer(TimerId(id as usize), timer);
        }
    }

    time_source.step(40);
    while let Some(handle) = scheduler.poll() {
        let _ = collection.dispatch(handle);
    }
    let _ = collection.handle_command(TimerId(2), TimerAction::Pause);
    let _ = collection.resume_all();
    collection.pause_all();
    core::hint::black_box(collection.len());
}

#[entry]
fn main() -> ! {
    // Call test function to ensure all code is included
    test_timers();

    // Halt - this is a size analysis binary, not meant to run
    loop {
        cortex_m::asm::nop();
    }
}
