#![cfg_attr(not(feature = "std"), no_std)]
#![doc = include_str!("../README.md")]

//! # Core Concepts
//!
//! - **`PausableTimer`**: A one-shot or repeating timer that can be paused, resumed, restarted and cleared
//! - **`TimerMode`**: `Timeout` (fires once) or `Interval` (fires every delay)
//! - **`Scheduler`**: Trait carrying the schedule-once, schedule-repeating and cancel primitives
//! - **`ManualScheduler`**: Allocation-free scheduler serviced by the host event loop
//! - **`TimerCallback`**: What runs on each fire (any `FnMut()`, [`WithContext`], or [`Bound`])
//! - **`FireContext`**: Lets a running callback pause, clear or restart its own timer
//! - **`TimeSource`**: Trait to implement for your timing system
//! - **`TimerCollection`**: Several timers sharing one scheduler
//! - **`TimerAction`**: Commands that can be sent to control timers
//!
//! Timers never block and never read a global clock. The host owns the
//! loop: it services the scheduler and hands each due handle to
//! [`PausableTimer::fire`].

#[macro_use]
mod log;

pub mod callback;
pub mod collection;
pub mod command;
pub mod scheduler;
pub mod time;
pub mod timer;
pub mod types;

#[cfg(test)]
mod testing;

pub use callback::{Bound, FireContext, FireRequest, TimerCallback, WithContext};
pub use collection::{CollectionError, TimerCollection, TimerId};
pub use command::{TimerAction, TimerCommand};
pub use scheduler::{ManualScheduler, ScheduleError, Scheduler, TimerHandle};
pub use time::{TimeDuration, TimeInstant, TimeSource};
pub use timer::PausableTimer;
pub use types::{FireOutcome, ParseModeError, TimerMode, TimerState};

#[cfg(feature = "std")]
pub use time::StdClock;
