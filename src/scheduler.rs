//! Scheduling primitives and a manually serviced scheduler.
//!
//! A [`Scheduler`] registers and cancels one-shot and repeating fires. It
//! only hands out handles; when a fire is due the host passes the handle to
//! [`PausableTimer::fire`](crate::PausableTimer::fire). [`ManualScheduler`]
//! is the bundled implementation: a fixed-capacity queue serviced by the
//! host's event loop, or stepped by a simulated clock in tests.

use core::cell::RefCell;

use crate::time::{TimeDuration, TimeInstant, TimeSource};
use heapless::Vec;

/// The four scheduling primitives a timer is built on.
///
/// Methods take `&self` so one scheduler can be shared by several timers;
/// implementations use interior mutability.
pub trait Scheduler<D: TimeDuration> {
    /// Opaque identifier of a pending fire.
    type Handle: Copy + PartialEq;

    /// Error returned when a fire cannot be registered.
    type Error;

    /// Registers a single fire after `delay`.
    fn schedule_once(&self, delay: D) -> Result<Self::Handle, Self::Error>;

    /// Registers a fire every `period`, first one after `period`.
    fn schedule_repeating(&self, period: D) -> Result<Self::Handle, Self::Error>;

    /// Cancels a fire registered with [`schedule_once`](Self::schedule_once).
    /// Unknown handles are ignored.
    fn cancel_once(&self, handle: Self::Handle);

    /// Cancels a fire registered with
    /// [`schedule_repeating`](Self::schedule_repeating). Unknown handles are ignored.
    fn cancel_repeating(&self, handle: Self::Handle);
}

/// Handle issued by [`ManualScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerHandle(u32);

/// Errors raised by [`ManualScheduler`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ScheduleError {
    /// Every slot holds a pending fire.
    CapacityExceeded,

    /// `now + delay` is not representable by the instant type.
    DeadlineOverflow,
}

impl core::fmt::Display for ScheduleError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ScheduleError::CapacityExceeded => {
                write!(f, "scheduler capacity exceeded")
            }
            ScheduleError::DeadlineOverflow => {
                write!(f, "deadline overflows the instant type")
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ScheduleError {}

#[derive(Clone, Copy)]
struct Entry<I: TimeInstant> {
    handle: TimerHandle,
    /// Registration order. Breaks deadline ties and bounds a service pass.
    seq: u64,
    deadline: I,
    period: Option<I::Duration>,
}

struct Queue<I: TimeInstant, const N: usize> {
    entries: Vec<Entry<I>, N>,
    next_id: u32,
    next_seq: u64,
}

impl<I: TimeInstant + Ord, const N: usize> Queue<I, N> {
    fn allocate_handle(&mut self) -> TimerHandle {
        loop {
            let id = self.next_id;
            self.next_id = self.next_id.wrapping_add(1);
            if !self.entries.iter().any(|e| e.handle.0 == id) {
                return TimerHandle(id);
            }
        }
    }

    /// Index of the entry that fires first among those registered before
    /// `seq_limit`. Ties go to the older registration.
    fn earliest(&self, seq_limit: u64) -> Option<usize> {
        self.entries
            .iter()
            .enumerate()
            .filter(|(_, e)| e.seq < seq_limit)
            .min_by(|(_, a), (_, b)| a.deadline.cmp(&b.deadline).then(a.seq.cmp(&b.seq)))
            .map(|(idx, _)| idx)
    }

    fn remove(&mut self, handle: TimerHandle) -> bool {
        match self.entries.iter().position(|e| e.handle == handle) {
            Some(idx) => {
                self.entries.remove(idx);
                true
            }
            None => false,
        }
    }
}

/// Fixed-capacity scheduler serviced by the host.
///
/// Deadlines are computed from the shared time source when a fire is
/// registered. The host calls [`poll`](Self::poll) or
/// [`run_due`](Self::run_due) whenever time may have passed (after sleeping
/// until [`next_deadline`](Self::next_deadline), on a tick interrupt, or
/// after advancing a simulated clock) and delivers each returned handle to
/// its timer.
///
/// Repeating fires are re-armed one period after the instant they were
/// serviced, the same instant a timer restarts its countdown from. A host
/// that services late therefore shifts the cadence by its lateness and never
/// replays missed periods.
///
/// A single [`run_due`](Self::run_due) pass only delivers fires registered
/// before it started, so a zero-delay fire armed from a callback waits for
/// the next pass.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source reference
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `N` - Maximum number of pending fires
pub struct ManualScheduler<'t, I: TimeInstant, T: TimeSource<I>, const N: usize> {
    time_source: &'t T,
    queue: RefCell<Queue<I, N>>,
}

impl<'t, I, T, const N: usize> ManualScheduler<'t, I, T, N>
where
    I: TimeInstant + Ord,
    T: TimeSource<I>,
{
    /// Creates an empty scheduler reading time from `time_source`.
    pub fn new(time_source: &'t T) -> Self {
        Self {
            time_source,
            queue: RefCell::new(Queue {
                entries: Vec::new(),
                next_id: 0,
                next_seq: 0,
            }),
        }
    }

    fn schedule(
        &self,
        delay: I::Duration,
        period: Option<I::Duration>,
    ) -> Result<TimerHandle, ScheduleError> {
        let deadline = self
            .time_source
            .now()
            .checked_add(delay)
            .ok_or(ScheduleError::DeadlineOverflow)?;

        let mut queue = self.queue.borrow_mut();
        if queue.entries.is_full() {
            warn!("scheduler full ({=usize} slots)", N);
            return Err(ScheduleError::CapacityExceeded);
        }

        let handle = queue.allocate_handle();
        let seq = queue.next_seq;
        queue.next_seq += 1;
        queue
            .entries
            .push(Entry {
                handle,
                seq,
                deadline,
                period,
            })
            .map_err(|_| ScheduleError::CapacityExceeded)?;

        trace!(
            "scheduled {=u32} in {=u64}ms (repeating: {=bool})",
            handle.0,
            delay.as_millis(),
            period.is_some()
        );
        Ok(handle)
    }

    fn cancel(&self, handle: TimerHandle) {
        if self.queue.borrow_mut().remove(handle) {
            trace!("cancelled {=u32}", handle.0);
        }
    }

    /// Instant of the next pending fire, if any.
    pub fn next_deadline(&self) -> Option<I> {
        let queue = self.queue.borrow();
        queue.earliest(u64::MAX).map(|idx| queue.entries[idx].deadline)
    }

    /// Time left until the next pending fire, zero if one is already due.
    pub fn time_until_next(&self) -> Option<I::Duration> {
        let now = self.time_source.now();
        self.next_deadline().map(|deadline| {
            if deadline > now {
                deadline.duration_since(now)
            } else {
                I::Duration::ZERO
            }
        })
    }

    /// Pops the earliest due fire and returns its handle.
    ///
    /// One-shot entries are removed; repeating entries are re-armed.
    /// Returns `None` when nothing is due.
    pub fn poll(&self) -> Option<TimerHandle> {
        self.poll_at(self.time_source.now(), u64::MAX)
    }

    fn poll_at(&self, now: I, seq_limit: u64) -> Option<TimerHandle> {
        let mut queue = self.queue.borrow_mut();

        let idx = queue.earliest(seq_limit)?;
        let entry = queue.entries[idx];
        if entry.deadline > now {
            return None;
        }

        match entry.period {
            None => {
                queue.entries.remove(idx);
            }
            Some(period) => match now.checked_add(period) {
                Some(next) => queue.entries[idx].deadline = next,
                None => {
                    warn!("dropping repeating {=u32}: deadline overflow", entry.handle.0);
                    queue.entries.remove(idx);
                }
            },
        }

        trace!("due {=u32}", entry.handle.0);
        Some(entry.handle)
    }

    /// Delivers every due handle to `deliver`, in deadline order.
    ///
    /// The pass reads the clock once and only considers fires registered
    /// before it started. The queue is not borrowed while `deliver` runs, so
    /// it may schedule and cancel freely. Returns the number of handles
    /// delivered.
    pub fn run_due<F>(&self, mut deliver: F) -> usize
    where
        F: FnMut(TimerHandle),
    {
        let now = self.time_source.now();
        let seq_limit = self.queue.borrow().next_seq;

        let mut delivered = 0;
        while let Some(handle) = self.poll_at(now, seq_limit) {
            deliver(handle);
            delivered += 1;
        }
        delivered
    }

    /// Returns true if `handle` is still pending.
    pub fn is_pending(&self, handle: TimerHandle) -> bool {
        self.queue
            .borrow()
            .entries
            .iter()
            .any(|e| e.handle == handle)
    }

    /// Number of pending fires.
    pub fn pending(&self) -> usize {
        self.queue.borrow().entries.len()
    }

    /// Returns true if no fire is pending.
    pub fn is_empty(&self) -> bool {
        self.queue.borrow().entries.is_empty()
    }

    /// Maximum number of pending fires.
    pub const fn capacity(&self) -> usize {
        N
    }
}

impl<'t, I, T, const N: usize> Scheduler<I::Duration> for ManualScheduler<'t, I, T, N>
where
    I: TimeInstant + Ord,
    T: TimeSource<I>,
{
    type Handle = TimerHandle;
    type Error = ScheduleError;

    fn schedule_once(&self, delay: I::Duration) -> Result<TimerHandle, ScheduleError> {
        self.schedule(delay, None)
    }

    fn schedule_repeating(&self, period: I::Duration) -> Result<TimerHandle, ScheduleError> {
        // A zero period would never let the host loop make progress.
        let period = if period.is_zero() {
            I::Duration::from_millis(1)
        } else {
            period
        };
        self.schedule(period, Some(period))
    }

    fn cancel_once(&self, handle: TimerHandle) {
        self.cancel(handle);
    }

    fn cancel_repeating(&self, handle: TimerHandle) {
        self.cancel(handle);
    }
}
