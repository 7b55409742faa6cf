//! Per-turn countdown
//!
//! The countdown never sleeps or spawns anything itself. While running it
//! asks the host to deliver an [`AlarmMessage`] one second later through a
//! `schedule_message` callback, and the host hands each delivered alarm back
//! to [`Countdown::receive_alarm`]. Every pause, reset or duration change
//! moves the countdown to a new generation, so alarms scheduled before it
//! are recognised as stale and dropped. That is how a pending tick gets
//! cancelled without the host having to support cancellation.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::constants::game::DEFAULT_TIME_LIMIT;

/// Interval between ticks
pub const TICK: web_time::Duration = web_time::Duration::from_secs(1);

/// A scheduled tick of one countdown generation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlarmMessage {
    generation: u64,
}

/// The countdown's lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TimerState {
    /// Not ticking; either fresh or paused
    #[default]
    Idle,
    /// A tick is pending
    Running,
    /// Remaining time reached zero
    Expired,
}

/// How close the countdown is to running out
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Urgency {
    /// More than 60% of the time left
    Calm,
    /// More than 30% left
    Warning,
    /// 30% or less left
    Critical,
}

/// A one-second resolution countdown for a single turn
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Countdown {
    duration: u64,
    remaining: u64,
    state: TimerState,
    generation: u64,
}

impl Default for Countdown {
    fn default() -> Self {
        Self::new(DEFAULT_TIME_LIMIT)
    }
}

impl Countdown {
    /// Creates an idle countdown of `duration` seconds
    pub fn new(duration: u64) -> Self {
        Self {
            duration,
            remaining: duration,
            state: TimerState::Idle,
            generation: 0,
        }
    }

    /// Configured length in seconds
    pub fn duration(&self) -> u64 {
        self.duration
    }

    /// Seconds left
    pub fn remaining(&self) -> u64 {
        self.remaining
    }

    /// Current lifecycle state
    pub fn state(&self) -> TimerState {
        self.state
    }

    /// Whether a tick is pending
    pub fn is_running(&self) -> bool {
        self.state == TimerState::Running
    }

    /// Share of the duration still left, in `[0, 1]`
    pub fn fraction(&self) -> f64 {
        if self.duration == 0 {
            0.
        } else {
            self.remaining as f64 / self.duration as f64
        }
    }

    /// Classifies the remaining share for display
    pub fn urgency(&self) -> Urgency {
        let fraction = self.fraction();
        if fraction > 0.6 {
            Urgency::Calm
        } else if fraction > 0.3 {
            Urgency::Warning
        } else {
            Urgency::Critical
        }
    }

    fn invalidate(&mut self) {
        self.generation += 1;
    }

    fn schedule_tick<S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &self,
        schedule_message: &mut S,
    ) {
        schedule_message(
            AlarmMessage {
                generation: self.generation,
            }
            .into(),
            TICK,
        );
    }

    /// Starts or suspends ticking
    ///
    /// Suspending keeps the remaining time. Activating an expired countdown
    /// does nothing until it is reset.
    pub fn set_active<S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        active: bool,
        schedule_message: &mut S,
    ) {
        match (active, self.state) {
            (true, TimerState::Idle) if self.remaining > 0 => {
                self.invalidate();
                self.state = TimerState::Running;
                self.schedule_tick(schedule_message);
            }
            (false, TimerState::Running) => {
                self.invalidate();
                self.state = TimerState::Idle;
            }
            _ => (),
        }
    }

    /// Flips between running and suspended, returning whether it now runs
    pub fn toggle<S: FnMut(crate::AlarmMessage, web_time::Duration)>(
        &mut self,
        schedule_message: &mut S,
    ) -> bool {
        self.set_active(!self.is_running(), schedule_message);
        self.is_running()
    }

    /// Handles a delivered tick
    ///
    /// Returns `false` if the tick belongs to an older generation and was
    /// ignored. Otherwise one second is taken off; at zero the countdown
    /// expires and `on_time_up` runs, else the next tick is scheduled.
    pub fn receive_alarm<S, F>(
        &mut self,
        message: &AlarmMessage,
        schedule_message: &mut S,
        on_time_up: F,
    ) -> bool
    where
        S: FnMut(crate::AlarmMessage, web_time::Duration),
        F: FnOnce(),
    {
        if message.generation != self.generation || !self.is_running() {
            tracing::debug!(
                stale = message.generation,
                current = self.generation,
                "ignoring countdown tick"
            );
            return false;
        }

        self.remaining = self.remaining.saturating_sub(1);
        if self.remaining == 0 {
            self.invalidate();
            self.state = TimerState::Expired;
            on_time_up();
        } else {
            self.schedule_tick(schedule_message);
        }
        true
    }

    /// Restores the full duration and goes idle, reporting the stop through
    /// `on_toggle(false)`
    pub fn reset<F: FnOnce(bool)>(&mut self, on_toggle: F) {
        self.invalidate();
        self.remaining = self.duration;
        self.state = TimerState::Idle;
        on_toggle(false);
    }

    /// Changes the duration, restarting from it in the idle state
    pub fn set_duration(&mut self, duration: u64) {
        self.invalidate();
        self.duration = duration;
        self.remaining = duration;
        self.state = TimerState::Idle;
    }

    /// Drops any pending tick, for teardown
    pub fn cancel(&mut self) {
        self.invalidate();
        if self.is_running() {
            self.state = TimerState::Idle;
        }
    }
}

impl Display for Countdown {
    /// Formats the remaining time as `m:ss`
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{:02}", self.remaining / 60, self.remaining % 60)
    }
}

#[cfg(test)]
#[cfg_attr(coverage_nightly, coverage(off))]
mod tests {
    use std::time::Duration;

    use super::*;

    fn take_tick(scheduled: &mut Vec<crate::AlarmMessage>) -> AlarmMessage {
        let crate::AlarmMessage::Countdown(tick) = scheduled.remove(0);
        tick
    }

    #[test]
    fn test_runs_out_exactly_once() {
        let mut countdown = Countdown::new(60);
        let mut scheduled = Vec::new();
        let mut schedule_message = |msg: crate::AlarmMessage, duration: Duration| {
            assert_eq!(duration, TICK);
            scheduled.push(msg);
        };
        countdown.set_active(true, &mut schedule_message);

        let mut expirations = 0;
        let mut ticks = 0;
        while !scheduled.is_empty() {
            let tick = take_tick(&mut scheduled);
            let mut schedule_message = |msg: crate::AlarmMessage, _: Duration| scheduled.push(msg);
            assert!(countdown.receive_alarm(&tick, &mut schedule_message, || expirations += 1));
            ticks += 1;
        }

        assert_eq!(ticks, 60);
        assert_eq!(expirations, 1);
        assert_eq!(countdown.remaining(), 0);
        assert_eq!(countdown.state(), TimerState::Expired);
    }

    #[test]
    fn test_no_decrement_past_zero() {
        let mut countdown = Countdown::new(1);
        let mut scheduled = Vec::new();
        countdown.set_active(true, &mut |msg, _| scheduled.push(msg));
        let tick = take_tick(&mut scheduled);

        let mut expirations = 0;
        assert!(countdown.receive_alarm(&tick, &mut |msg, _| scheduled.push(msg), || {
            expirations += 1;
        }));
        assert!(!countdown.receive_alarm(&tick, &mut |msg, _| scheduled.push(msg), || {
            expirations += 1;
        }));

        assert_eq!(expirations, 1);
        assert_eq!(countdown.remaining(), 0);
        assert!(scheduled.is_empty());

        countdown.set_active(true, &mut |msg, _| scheduled.push(msg));
        assert!(scheduled.is_empty());
        assert_eq!(countdown.state(), TimerState::Expired);
    }

    #[test]
    fn test_pause_keeps_remaining_time() {
        let mut countdown = Countdown::new(60);
        let mut scheduled = Vec::new();
        countdown.set_active(true, &mut |msg, _| scheduled.push(msg));
        for _ in 0..25 {
            let tick = take_tick(&mut scheduled);
            countdown.receive_alarm(&tick, &mut |msg, _| scheduled.push(msg), || {});
        }
        assert_eq!(countdown.remaining(), 35);

        countdown.set_active(false, &mut |msg, _| scheduled.push(msg));
        assert_eq!(countdown.state(), TimerState::Idle);

        // the tick scheduled before pausing is stale
        let stale = take_tick(&mut scheduled);
        assert!(!countdown.receive_alarm(&stale, &mut |msg, _| scheduled.push(msg), || {}));
        assert_eq!(countdown.remaining(), 35);

        countdown.set_active(true, &mut |msg, _| scheduled.push(msg));
        assert_eq!(countdown.remaining(), 35);
        let tick = take_tick(&mut scheduled);
        assert!(countdown.receive_alarm(&tick, &mut |msg, _| scheduled.push(msg), || {}));
        assert_eq!(countdown.remaining(), 34);
    }

    #[test]
    fn test_toggle() {
        let mut countdown = Countdown::new(30);
        let mut count = 0;
        let mut schedule_message = |_msg: crate::AlarmMessage, _duration: Duration| count += 1;
        assert!(countdown.toggle(&mut schedule_message));
        assert!(!countdown.toggle(&mut schedule_message));
        assert!(countdown.toggle(&mut schedule_message));
        assert_eq!(count, 2);
    }

    #[test]
    fn test_double_activation_schedules_once() {
        let mut countdown = Countdown::new(30);
        let mut count = 0;
        let mut schedule_message = |_msg: crate::AlarmMessage, _duration: Duration| count += 1;
        countdown.set_active(true, &mut schedule_message);
        countdown.set_active(true, &mut schedule_message);
        assert_eq!(count, 1);
    }

    #[test]
    fn test_reset() {
        let mut countdown = Countdown::new(60);
        let mut scheduled = Vec::new();
        countdown.set_active(true, &mut |msg, _| scheduled.push(msg));
        let tick = take_tick(&mut scheduled);
        countdown.receive_alarm(&tick, &mut |msg, _| scheduled.push(msg), || {});

        let mut toggled = None;
        countdown.reset(|active| toggled = Some(active));
        assert_eq!(toggled, Some(false));
        assert_eq!(countdown.remaining(), 60);
        assert_eq!(countdown.state(), TimerState::Idle);

        let stale = take_tick(&mut scheduled);
        assert!(!countdown.receive_alarm(&stale, &mut |msg, _| scheduled.push(msg), || {}));
        assert_eq!(countdown.remaining(), 60);
    }

    #[test]
    fn test_set_duration() {
        let mut countdown = Countdown::new(60);
        countdown.set_duration(90);
        assert_eq!(countdown.duration(), 90);
        assert_eq!(countdown.remaining(), 90);

        let mut scheduled = Vec::new();
        countdown.set_active(true, &mut |msg, _| scheduled.push(msg));
        countdown.set_duration(30);
        assert_eq!(countdown.state(), TimerState::Idle);
        let stale = take_tick(&mut scheduled);
        assert!(!countdown.receive_alarm(&stale, &mut |msg, _| scheduled.push(msg), || {}));
        assert_eq!(countdown.remaining(), 30);
    }

    #[test]
    fn test_cancel() {
        let mut countdown = Countdown::new(60);
        let mut scheduled = Vec::new();
        countdown.set_active(true, &mut |msg, _| scheduled.push(msg));
        countdown.cancel();
        assert!(!countdown.is_running());
        let stale = take_tick(&mut scheduled);
        assert!(!countdown.receive_alarm(&stale, &mut |msg, _| scheduled.push(msg), || {}));
    }

    #[test]
    fn test_fraction_and_urgency() {
        let mut countdown = Countdown::new(10);
        assert!((countdown.fraction() - 1.).abs() < f64::EPSILON);
        assert_eq!(countdown.urgency(), Urgency::Calm);

        let mut scheduled = Vec::new();
        countdown.set_active(true, &mut |msg, _| scheduled.push(msg));
        let mut seen = Vec::new();
        for _ in 0..8 {
            let tick = take_tick(&mut scheduled);
            countdown.receive_alarm(&tick, &mut |msg, _| scheduled.push(msg), || {});
            seen.push(countdown.urgency());
        }
        // 9..=2 seconds left out of 10
        assert_eq!(seen[0], Urgency::Calm);
        assert_eq!(seen[2], Urgency::Calm);
        assert_eq!(seen[3], Urgency::Warning);
        assert_eq!(seen[6], Urgency::Critical);

        assert!(Countdown::new(0).fraction().abs() < f64::EPSILON);
    }

    #[test]
    fn test_display() {
        assert_eq!(Countdown::new(90).to_string(), "1:30");
        assert_eq!(Countdown::new(60).to_string(), "1:00");
        assert_eq!(Countdown::new(5).to_string(), "0:05");
    }
}
