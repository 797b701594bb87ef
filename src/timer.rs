//! Pausable timer with state management and timing control.
//!
//! Provides [`PausableTimer`], which arms a callback on an injected
//! [`Scheduler`], and tracks elapsed and remaining time across pause and
//! resume so that a resumed countdown continues from where it stopped.

use crate::callback::{FireContext, FireRequest, TimerCallback};
use crate::command::TimerAction;
use crate::scheduler::Scheduler;
use crate::time::{TimeDuration, TimeInstant, TimeSource};
use crate::types::{FireOutcome, TimerMode, TimerState};

/// How the pending fire was registered, so it is cancelled the same way.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Arming {
    Once,
    Repeating,
}

/// A one-shot or repeating timer that can be paused, resumed, restarted
/// and cleared.
///
/// The timer arms itself on construction. It never waits on its own: the
/// host services the scheduler and passes each due handle to
/// [`fire`](Self::fire), which runs the callback and advances the state.
///
/// Resuming always arms a one-shot fire for the remaining slice of the
/// current period. In interval mode that fire runs the callback and then
/// re-arms the steady repeating fire, so pausing never shifts the phase of
/// an interval.
///
/// Dropping the timer cancels its pending fire.
///
/// # Type Parameters
/// * `'t` - Lifetime of the time source and scheduler references
/// * `I` - Time instant type
/// * `T` - Time source implementation type
/// * `S` - Scheduler implementation type
/// * `C` - Callback type
pub struct PausableTimer<'t, I, T, S, C>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: Scheduler<I::Duration>,
    C: TimerCallback,
{
    callback: C,
    delay: I::Duration,
    mode: TimerMode,
    time_source: &'t T,
    scheduler: &'t S,
    active: Option<(S::Handle, Arming)>,
    start_time: I,
    remaining: I::Duration,
    paused: bool,
    completed: bool,
}

impl<'t, I, T, S, C> PausableTimer<'t, I, T, S, C>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: Scheduler<I::Duration>,
    C: TimerCallback,
{
    /// Creates a timer and arms it.
    ///
    /// A zero `delay` fires on the scheduler's next service.
    ///
    /// # Errors
    /// Returns the scheduler's error if the first fire cannot be registered.
    pub fn new(
        callback: C,
        delay: I::Duration,
        mode: TimerMode,
        time_source: &'t T,
        scheduler: &'t S,
    ) -> Result<Self, S::Error> {
        let mut timer = Self {
            callback,
            delay,
            mode,
            time_source,
            scheduler,
            active: None,
            start_time: time_source.now(),
            remaining: delay,
            paused: false,
            completed: false,
        };
        timer.restart()?;
        Ok(timer)
    }

    /// Creates a one-shot timer.
    pub fn timeout(
        callback: C,
        delay: I::Duration,
        time_source: &'t T,
        scheduler: &'t S,
    ) -> Result<Self, S::Error> {
        Self::new(callback, delay, TimerMode::Timeout, time_source, scheduler)
    }

    /// Creates a repeating timer.
    pub fn interval(
        callback: C,
        delay: I::Duration,
        time_source: &'t T,
        scheduler: &'t S,
    ) -> Result<Self, S::Error> {
        Self::new(callback, delay, TimerMode::Interval, time_source, scheduler)
    }

    /// Handles a timer action by dispatching to the matching method.
    pub fn handle_action(&mut self, action: TimerAction) -> Result<(), S::Error> {
        match action {
            TimerAction::Pause => {
                self.pause();
                Ok(())
            }
            TimerAction::Resume => self.resume(),
            TimerAction::Clear => {
                self.clear();
                Ok(())
            }
            TimerAction::Restart => self.restart(),
        }
    }

    /// Restarts the countdown from a full delay, from any state.
    ///
    /// # Errors
    /// Returns the scheduler's error if the fire cannot be registered. The
    /// timer is then left idle.
    pub fn restart(&mut self) -> Result<(), S::Error> {
        self.clear();
        let arming = match self.mode {
            TimerMode::Timeout => Arming::Once,
            TimerMode::Interval => Arming::Repeating,
        };
        self.arm(self.delay, arming)?;
        debug!("timer started ({}, {=u64}ms)", self.mode, self.delay.as_millis());
        Ok(())
    }

    /// Pauses the countdown, freezing the remaining time.
    ///
    /// Does nothing if already paused or if no fire is pending (cleared or
    /// completed).
    pub fn pause(&mut self) {
        if self.paused || self.active.is_none() {
            return;
        }

        let elapsed = self.time_source.now().duration_since(self.start_time);
        self.remaining = self.remaining.saturating_sub(elapsed);
        self.cancel();
        self.paused = true;
        trace!("timer paused, {=u64}ms left", self.remaining.as_millis());
    }

    /// Resumes a paused countdown with the time that was left.
    ///
    /// Does nothing unless paused.
    ///
    /// # Errors
    /// Returns the scheduler's error if the fire cannot be registered. The
    /// timer then stays paused with its remaining time intact.
    pub fn resume(&mut self) -> Result<(), S::Error> {
        if !self.paused {
            return Ok(());
        }

        self.arm(self.remaining, Arming::Once)?;
        self.paused = false;
        self.start_time = self.time_source.now();
        trace!("timer resumed, {=u64}ms left", self.remaining.as_millis());
        Ok(())
    }

    /// Cancels any pending fire and resets to a fresh, unarmed state.
    ///
    /// The timer stays inert until [`restart`](Self::restart).
    pub fn clear(&mut self) {
        self.cancel();
        self.reset_state();
        self.completed = false;
    }

    /// Delivers a scheduler notification to this timer.
    ///
    /// Runs the callback if `handle` is the pending fire, then applies the
    /// post-fire transition and any request the callback made through its
    /// [`FireContext`]. Any other handle is ignored.
    ///
    /// # Errors
    /// Returns the scheduler's error if re-arming fails (the steady interval
    /// after a resumed slice, or a restart requested by the callback). The
    /// timer is then left idle.
    pub fn fire(&mut self, handle: S::Handle) -> Result<FireOutcome, S::Error> {
        let arming = match self.active {
            Some((active, arming)) if active == handle => arming,
            _ => {
                trace!("ignoring stale fire");
                return Ok(FireOutcome::Stale);
            }
        };

        let mut ctx = FireContext::new();
        self.callback.on_fire(&mut ctx);
        let request = ctx.take();

        match (self.mode, arming) {
            (TimerMode::Timeout, _) => {
                self.active = None;
                self.reset_state();
                self.completed = true;
            }
            (TimerMode::Interval, Arming::Repeating) => {
                self.start_time = self.time_source.now();
                self.remaining = self.delay;
            }
            (TimerMode::Interval, Arming::Once) => {
                // End of a resumed slice: fall back to the steady period,
                // unless the callback asked for something else.
                self.active = None;
                self.reset_state();
                match request {
                    None => self.arm(self.delay, Arming::Repeating)?,
                    Some(FireRequest::Pause) => self.paused = true,
                    Some(_) => {}
                }
            }
        }

        match request {
            None if self.completed => Ok(FireOutcome::Completed),
            None => Ok(FireOutcome::Fired),
            Some(FireRequest::Pause) if self.completed => Ok(FireOutcome::Completed),
            Some(FireRequest::Pause) => {
                self.pause();
                Ok(FireOutcome::Interrupted)
            }
            Some(FireRequest::Clear) => {
                self.clear();
                Ok(FireOutcome::Interrupted)
            }
            Some(FireRequest::Restart) => {
                self.restart()?;
                Ok(FireOutcome::Interrupted)
            }
        }
    }

    /// Time left until the next fire.
    ///
    /// Zero once a timeout has completed, frozen while paused, the full
    /// delay while cleared, and counting down otherwise.
    pub fn remaining_time(&self) -> I::Duration {
        if self.completed {
            return I::Duration::ZERO;
        }
        if self.paused || self.active.is_none() {
            return self.remaining;
        }

        let elapsed = self.time_source.now().duration_since(self.start_time);
        self.remaining.saturating_sub(elapsed)
    }

    /// Returns true if the countdown is paused.
    pub fn is_paused(&self) -> bool {
        self.paused
    }

    /// Returns true once a timeout has fired. Always false in interval mode.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Returns the current lifecycle state.
    pub fn state(&self) -> TimerState {
        if self.paused {
            TimerState::Paused
        } else if self.active.is_some() {
            TimerState::Running
        } else if self.completed {
            TimerState::Completed
        } else {
            TimerState::Idle
        }
    }

    /// Handle of the pending fire, if any.
    pub fn active_handle(&self) -> Option<S::Handle> {
        self.active.map(|(handle, _)| handle)
    }

    /// Returns the mode the timer was created with.
    pub fn mode(&self) -> TimerMode {
        self.mode
    }

    /// Returns the configured delay.
    pub fn delay(&self) -> I::Duration {
        self.delay
    }

    /// Returns the callback.
    pub fn callback(&self) -> &C {
        &self.callback
    }

    /// Returns the callback mutably, e.g. to rebind [`Bound`](crate::Bound)
    /// arguments between fires.
    pub fn callback_mut(&mut self) -> &mut C {
        &mut self.callback
    }

    fn arm(&mut self, delay: I::Duration, arming: Arming) -> Result<(), S::Error> {
        let handle = match arming {
            Arming::Once => self.scheduler.schedule_once(delay)?,
            Arming::Repeating => self.scheduler.schedule_repeating(delay)?,
        };
        self.active = Some((handle, arming));
        Ok(())
    }

    fn cancel(&mut self) {
        match self.active.take() {
            Some((handle, Arming::Once)) => self.scheduler.cancel_once(handle),
            Some((handle, Arming::Repeating)) => self.scheduler.cancel_repeating(handle),
            None => {}
        }
    }

    fn reset_state(&mut self) {
        self.start_time = self.time_source.now();
        self.remaining = self.delay;
        self.paused = false;
    }
}

impl<'t, I, T, S, C> Drop for PausableTimer<'t, I, T, S, C>
where
    I: TimeInstant,
    T: TimeSource<I>,
    S: Scheduler<I::Duration>,
    C: TimerCallback,
{
    fn drop(&mut self) {
        self.cancel();
    }
}
