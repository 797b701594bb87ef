//! Integration tests for TimerCollection driven by one shared scheduler

mod common;
use common::*;

use pausable_timers::{
    CollectionError, FireContext, FireOutcome, PausableTimer, Scheduler, TimerAction, TimerCallback, TimerCollection, TimerCommand, TimerId, TimerState, WithContext,
};

type Collection<'t, C> = TimerCollection<'t, TestInstant, MockTimeSource, TestScheduler<'t>, C, 4>;

/// Steps the clock through every deadline up to `ms` ahead, dispatching each
/// due handle to the collection.
fn advance_all<C: TimerCallback>(
    clock: &MockTimeSource,
    sched: &TestScheduler<'_>,
    collection: &mut Collection<'_, C>,
    ms: u64,
) {
    step_through(clock, sched, ms, || {
        sched.run_due(|handle| {
            collection.dispatch(handle).unwrap();
        });
    });
}

#[test]
fn timers_share_one_scheduler() {
    let fast = Counter::new();
    let slow = Counter::new();
    let fast_cb = || fast.hit();
    let slow_cb = || slow.hit();
    let clock = MockTimeSource::new();
    let sched = TestScheduler::new(&clock);
    let mut collection: Collection<'_, &dyn Fn()> = Collection::new();

    collection
        .add_timer(
            TimerId(0),
            PausableTimer::interval(&fast_cb as &dyn Fn(), TestDuration(30), &clock, &sched)
                .unwrap(),
        )
        .unwrap();
    collection
        .add_timer(
            TimerId(1),
            PausableTimer::timeout(&slow_cb as &dyn Fn(), TestDuration(100), &clock, &sched)
                .unwrap(),
        )
        .unwrap();

    advance_all(&clock, &sched, &mut collection, 150);
    assert_eq!(fast.count(), 5);
    assert_eq!(slow.count(), 1);
    assert_eq!(collection.state(TimerId(1)), Ok(TimerState::Completed));
    assert_eq!(collection.state(TimerId(0)), Ok(TimerState::Running));
}

#[test]
fn commands_pause_one_timer_without_touching_others() {
    let a = Counter::new();
    let b = Counter::new();
    let a_cb = || a.hit();
    let b_cb = || b.hit();
    let clock = MockTimeSource::new();
    let sched = TestScheduler::new(&clock);
    let mut collection: Collection<'_, &dyn Fn()> = Collection::new();

    collection
        .add_timer(
            TimerId(0),
            PausableTimer::interval(&a_cb as &dyn Fn(), TestDuration(100), &clock, &sched)
                .unwrap(),
        )
        .unwrap();
    collection
        .add_timer(
            TimerId(1),
            PausableTimer::interval(&b_cb as &dyn Fn(), TestDuration(100), &clock, &sched)
                .unwrap(),
        )
        .unwrap();

    advance_all(&clock, &sched, &mut collection, 130);
    collection
        .apply(TimerCommand::new(TimerId(0), TimerAction::Pause))
        .unwrap();

    advance_all(&clock, &sched, &mut collection, 200);
    assert_eq!((a.count(), b.count()), (1, 3));

    collection
        .handle_command(TimerId(0), TimerAction::Resume)
        .unwrap();
    advance_all(&clock, &sched, &mut collection, 70);
    assert_eq!(a.count(), 2);
}

#[test]
fn callback_requests_apply_through_dispatch() {
    let clock = MockTimeSource::new();
    let sched = TestScheduler::new(&clock);
    let mut collection: Collection<'_, WithContext<fn(&mut FireContext)>> = Collection::new();

    let pause_self: fn(&mut FireContext) = |ctx| ctx.pause();
    collection
        .add_timer(
            TimerId(3),
            PausableTimer::interval(WithContext(pause_self), TestDuration(40), &clock, &sched)
                .unwrap(),
        )
        .unwrap();

    clock.set_time(TestInstant(40));
    let handle = sched.poll().unwrap();
    assert_eq!(
        collection.dispatch(handle),
        Ok(Some((TimerId(3), FireOutcome::Interrupted)))
    );
    assert_eq!(collection.state(TimerId(3)), Ok(TimerState::Paused));
    assert!(sched.is_empty());
}

#[test]
fn resume_all_reports_scheduler_errors() {
    let clock = MockTimeSource::new();
    let sched = TestScheduler::new(&clock);
    let mut collection: Collection<'_, fn()> = Collection::new();
    let noop: fn() = || {};

    collection
        .add_timer(
            TimerId(0),
            PausableTimer::timeout(noop, TestDuration(100), &clock, &sched).unwrap(),
        )
        .unwrap();

    advance_all(&clock, &sched, &mut collection, 10);
    collection.pause_all();

    // Fill every slot so the resume cannot be registered.
    let mut blockers = heapless::Vec::<_, 8>::new();
    while let Ok(handle) = sched.schedule_once(TestDuration(1000)) {
        blockers.push(handle).unwrap();
    }

    assert!(matches!(
        collection.resume_all(),
        Err(CollectionError::Schedule(_))
    ));
    assert_eq!(collection.state(TimerId(0)), Ok(TimerState::Paused));
    assert_eq!(collection.remaining_time(TimerId(0)), Ok(TestDuration(90)));
}
