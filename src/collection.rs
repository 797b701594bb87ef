use crate::callback::TimerCallback;
use crate::command::{TimerAction, TimerCommand};
use crate::scheduler::Scheduler;
use crate::time::{TimeInstant, TimeSource};
use crate::timer::PausableTimer;
use crate::types::{FireOutcome, TimerState};

/// An identifier for a timer within a collection.
///
/// Users pick the ID when adding a timer and use it to target the timer
/// with commands.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerId(pub usize);

impl From<usize> for TimerId {
    fn from(id: usize) -> Self {
        TimerId(id)
    }
}

impl From<TimerId> for usize {
    fn from(id: TimerId) -> Self {
        id.0
    }
}

/// Errors that can occur during collection operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum CollectionError<E> {
    /// The specified timer ID does not exist in the collection.
    InvalidTimerId(TimerId),

    /// Attempted to add a timer with an ID that already exists.
    DuplicateTimerId(TimerId),

    /// The timer ID exceeds the collection's capacity.
    TimerIdOutOfBounds { id: TimerId, capacity: usize },

    /// The scheduler rejected a fire.
    Schedule(E),
}

impl<E: core::fmt::Display> core::fmt::Display for CollectionError<E> {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CollectionError::InvalidTimerId(id) => {
                write!(f, "timer ID {} does not exist in collection", id.0)
            }
            CollectionError::DuplicateTimerId(id) => {
                write!(f, "timer ID {} already exists in collection", id.0)
            }
            CollectionError::TimerIdOutOfBounds { id, capacity } => {
                write!(
                    f,
                    "timer ID {} exceeds collection capacity of {}",
                    id.0, capacity
                )
            }
            CollectionError::Schedule(err) => {
                write!(f, "scheduler error: {}", err)
            }
        }
    }
}

#[cfg(feature = "std")]
impl<E: core::fmt::Debug + core::fmt::Display> std::error::Error for CollectionError<E> {}

impl<E> From<E> for CollectionError<E> {
    fn from(err: E) -> Self {
        CollectionError::Schedule(err)
    }
}

/// A fixed set of timers sharing one scheduler.
///
/// A scheduler only reports which handle is due. The collection finds the
/// timer that owns that handle and fires it, so a host loop can drive many
/// timers through one [`ManualScheduler`](crate::ManualScheduler).
///
/// All timers share a callback type. Use `&dyn Fn()` (or another common
/// type such as `fn()`) to mix different callbacks.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source and scheduler references
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `S` - Scheduler implementation type
/// * `C` - Callback type shared by every timer
/// * `MAX` - Maximum number of timers this collection can hold
pub struct TimerCollection<'t, I, T, S, C, const MAX: usize>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: Scheduler<I::Duration>,
    C: TimerCallback,
{
    timers: [Option<PausableTimer<'t, I, T, S, C>>; MAX],
}

impl<'t, I, T, S, C, const MAX: usize> TimerCollection<'t, I, T, S, C, MAX>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: Scheduler<I::Duration>,
    C: TimerCallback,
{
    /// Creates a new empty collection.
    pub fn new() -> Self {
        Self {
            timers: core::array::from_fn(|_| None),
        }
    }

    /// Adds a timer under the given ID.
    ///
    /// # Errors
    /// * `DuplicateTimerId` - A timer with this ID already exists
    /// * `TimerIdOutOfBounds` - The ID exceeds the collection's capacity
    pub fn add_timer(
        &mut self,
        id: TimerId,
        timer: PausableTimer<'t, I, T, S, C>,
    ) -> Result<(), CollectionError<S::Error>> {
        let idx = id.0;

        if idx >= MAX {
            return Err(CollectionError::TimerIdOutOfBounds { id, capacity: MAX });
        }

        if self.timers[idx].is_some() {
            return Err(CollectionError::DuplicateTimerId(id));
        }

        self.timers[idx] = Some(timer);
        Ok(())
    }

    /// Removes a timer and hands it back. Its pending fire stays armed until
    /// the returned timer is cleared or dropped.
    pub fn remove_timer(
        &mut self,
        id: TimerId,
    ) -> Result<PausableTimer<'t, I, T, S, C>, CollectionError<S::Error>> {
        self.timers
            .get_mut(id.0)
            .and_then(Option::take)
            .ok_or(CollectionError::InvalidTimerId(id))
    }

    /// Returns the timer with the given ID.
    pub fn get(&self, id: TimerId) -> Option<&PausableTimer<'t, I, T, S, C>> {
        self.timers.get(id.0).and_then(Option::as_ref)
    }

    /// Returns the timer with the given ID, mutably.
    pub fn get_mut(&mut self, id: TimerId) -> Option<&mut PausableTimer<'t, I, T, S, C>> {
        self.timers.get_mut(id.0).and_then(Option::as_mut)
    }

    /// Routes an action to the specified timer.
    ///
    /// # Errors
    /// * `InvalidTimerId` - No timer with this ID
    /// * `Schedule` - The timer could not be re-armed
    pub fn handle_command(
        &mut self,
        id: TimerId,
        action: TimerAction,
    ) -> Result<(), CollectionError<S::Error>> {
        let timer = self
            .get_mut(id)
            .ok_or(CollectionError::InvalidTimerId(id))?;

        Ok(timer.handle_action(action)?)
    }

    /// Routes a [`TimerCommand`] to its target.
    pub fn apply(&mut self, command: TimerCommand<TimerId>) -> Result<(), CollectionError<S::Error>> {
        self.handle_command(command.timer_id, command.action)
    }

    /// Fires the timer that owns `handle`.
    ///
    /// # Returns
    /// * `Ok(Some((id, outcome)))` - The owning timer and what the fire did
    /// * `Ok(None)` - No timer in the collection owns this handle
    pub fn dispatch(
        &mut self,
        handle: S::Handle,
    ) -> Result<Option<(TimerId, FireOutcome)>, CollectionError<S::Error>> {
        for (idx, slot) in self.timers.iter_mut().enumerate() {
            if let Some(timer) = slot {
                if timer.active_handle() == Some(handle) {
                    let outcome = timer.fire(handle)?;
                    return Ok(Some((TimerId(idx), outcome)));
                }
            }
        }
        Ok(None)
    }

    /// Returns the state of the specified timer.
    pub fn state(&self, id: TimerId) -> Result<TimerState, CollectionError<S::Error>> {
        self.get(id)
            .map(PausableTimer::state)
            .ok_or(CollectionError::InvalidTimerId(id))
    }

    /// Returns the remaining time of the specified timer.
    pub fn remaining_time(&self, id: TimerId) -> Result<I::Duration, CollectionError<S::Error>> {
        self.get(id)
            .map(PausableTimer::remaining_time)
            .ok_or(CollectionError::InvalidTimerId(id))
    }

    /// Pauses every timer.
    pub fn pause_all(&mut self) {
        for timer in self.timers.iter_mut().flatten() {
            timer.pause();
        }
    }

    /// Resumes every paused timer. Stops at the first scheduler error.
    pub fn resume_all(&mut self) -> Result<(), CollectionError<S::Error>> {
        for timer in self.timers.iter_mut().flatten() {
            timer.resume()?;
        }
        Ok(())
    }

    /// Returns the number of timers in the collection.
    pub fn len(&self) -> usize {
        self.timers.iter().filter(|t| t.is_some()).count()
    }

    /// Returns true if the collection holds no timers.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Returns true if the collection holds a timer with the given ID.
    pub fn contains(&self, id: TimerId) -> bool {
        self.get(id).is_some()
    }
}

impl<'t, I, T, S, C, const MAX: usize> Default for TimerCollection<'t, I, T, S, C, MAX>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: Scheduler<I::Duration>,
    C: TimerCallback,
{
    fn default() -> Self {
        Self::new()
    }
}
