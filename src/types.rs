//! Core types shared by timers, schedulers and collections.

use core::str::FromStr;

/// Whether a timer fires once or repeatedly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerMode {
    /// Fire once after the delay, then complete.
    #[default]
    Timeout,

    /// Fire every `delay` until cleared.
    Interval,
}

impl TimerMode {
    /// Configuration name of this mode.
    pub const fn as_str(&self) -> &'static str {
        match self {
            TimerMode::Timeout => "timeout",
            TimerMode::Interval => "interval",
        }
    }
}

impl core::fmt::Display for TimerMode {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimerMode {
    type Err = ParseModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "timeout" => Ok(TimerMode::Timeout),
            "interval" => Ok(TimerMode::Interval),
            _ => Err(ParseModeError),
        }
    }
}

/// Returned when a mode name is neither `"timeout"` nor `"interval"`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct ParseModeError;

impl core::fmt::Display for ParseModeError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "unknown timer mode, expected \"timeout\" or \"interval\"")
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ParseModeError {}

/// Lifecycle state of a timer, derived from its flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum TimerState {
    /// A scheduled fire is pending.
    Running,
    /// Countdown suspended; remaining time is frozen.
    Paused,
    /// Timeout fired. Inert until restarted.
    Completed,
    /// Cleared, or left unarmed by a failed schedule. Inert until restarted.
    Idle,
}

/// What happened when a scheduler notification reached a timer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FireOutcome {
    /// Handle was not the timer's active fire. Callback not invoked.
    Stale,

    /// Callback invoked; the timer is still counting down (interval mode).
    Fired,

    /// Callback invoked and the timeout completed.
    Completed,

    /// Callback invoked and the callback paused, cleared or restarted the timer.
    Interrupted,
}

impl FireOutcome {
    /// Returns true if the callback ran.
    pub fn invoked(&self) -> bool {
        !matches!(self, FireOutcome::Stale)
    }
}
