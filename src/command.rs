//! Command-based control for timers.

/// Actions for controlling timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerAction {
    /// Pause countdown.
    Pause,
    /// Resume countdown.
    Resume,
    /// Clear timer.
    Clear,
    /// Restart from a full delay.
    Restart,
}

/// Command targeting a specific timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimerCommand<Id> {
    pub timer_id: Id,
    pub action: TimerAction,
}

impl<Id> TimerCommand<Id> {
    /// Creates command.
    pub fn new(timer_id: Id, action: TimerAction) -> Self {
        Self { timer_id, action }
    }
}
