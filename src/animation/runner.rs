use std::fmt;
use std::time::Duration;

use crate::animation::ease::Ease;
use crate::animation::spring::SpringConfig;
use crate::drive::value::DriveValue;
use crate::foundation::error::{MotionError, MotionResult};

/// Lifecycle of a runner: `Idle -> Running -> Completed | Canceled`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunState {
    /// Never started.
    Idle,
    /// Driving its value.
    Running,
    /// Reached its target.
    Completed,
    /// Stopped before reaching its target.
    Canceled,
}

impl RunState {
    /// Return `true` for `Completed` and `Canceled`.
    pub fn is_finished(self) -> bool {
        matches!(self, Self::Completed | Self::Canceled)
    }
}

/// A time-driven unit that writes one or more drive values.
///
/// Runners are advanced cooperatively; they never block or schedule themselves. `now` is
/// host time and must not go backwards between calls.
pub trait Runner: fmt::Debug {
    /// Begin (or restart) at `now` from the drive value's current reading.
    fn start_at(&mut self, now: Duration);

    /// Advance to `now`, writing drive values, and report the resulting state.
    fn advance(&mut self, now: Duration) -> RunState;

    /// Cancel if running. The drive value keeps whatever it last reached.
    fn stop(&mut self);

    /// Current lifecycle state.
    fn state(&self) -> RunState;

    /// Exact instant the runner reached its target, once `Completed`.
    fn completed_at(&self) -> Option<Duration>;
}

impl Runner for Box<dyn Runner> {
    fn start_at(&mut self, now: Duration) {
        (**self).start_at(now);
    }

    fn advance(&mut self, now: Duration) -> RunState {
        (**self).advance(now)
    }

    fn stop(&mut self) {
        (**self).stop();
    }

    fn state(&self) -> RunState {
        (**self).state()
    }

    fn completed_at(&self) -> Option<Duration> {
        (**self).completed_at()
    }
}

/// Timed transition of a drive value toward a fixed target.
#[derive(Debug)]
pub struct Tween {
    drive: DriveValue,
    to: f64,
    duration: Duration,
    ease: Ease,
    native_driver: bool,
    state: RunState,
    from: f64,
    started_at: Duration,
    completed_at: Option<Duration>,
}

impl Tween {
    /// Linear tween of `drive` to `to` over `duration`.
    pub fn new(drive: DriveValue, to: f64, duration: Duration) -> MotionResult<Self> {
        check_target(to)?;
        Ok(Self {
            from: drive.get(),
            drive,
            to,
            duration,
            ease: Ease::Linear,
            native_driver: false,
            state: RunState::Idle,
            started_at: Duration::ZERO,
            completed_at: None,
        })
    }

    /// Replace the easing curve.
    pub fn with_ease(mut self, ease: Ease) -> Self {
        self.ease = ease;
        self
    }

    /// Mark the transition as eligible for host-side (native) acceleration.
    pub fn with_native_driver(mut self, native_driver: bool) -> Self {
        self.native_driver = native_driver;
        self
    }

    /// Target value.
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Configured duration.
    pub fn duration(&self) -> Duration {
        self.duration
    }

    /// Easing curve.
    pub fn ease(&self) -> Ease {
        self.ease
    }

    /// Host acceleration hint.
    pub fn native_driver(&self) -> bool {
        self.native_driver
    }

    fn finish(&mut self, at: Duration) {
        write(&self.drive, self.to);
        self.state = RunState::Completed;
        self.completed_at = Some(at);
        tracing::debug!(drive = self.drive.id().0, to = self.to, at = ?at, "tween completed");
    }
}

impl Runner for Tween {
    fn start_at(&mut self, now: Duration) {
        if self.state == RunState::Running {
            tracing::debug!(drive = self.drive.id().0, "tween restarted mid-flight");
        }
        self.from = self.drive.get();
        self.started_at = now;
        self.completed_at = None;
        self.state = RunState::Running;
        tracing::debug!(
            drive = self.drive.id().0,
            from = self.from,
            to = self.to,
            duration = ?self.duration,
            native_driver = self.native_driver,
            "tween started"
        );
        if self.duration.is_zero() {
            self.finish(now);
        }
    }

    fn advance(&mut self, now: Duration) -> RunState {
        if self.state != RunState::Running {
            return self.state;
        }
        let elapsed = now.saturating_sub(self.started_at);
        if elapsed >= self.duration {
            self.finish(self.started_at + self.duration);
        } else {
            let t = elapsed.as_secs_f64() / self.duration.as_secs_f64();
            let v = self.from + (self.to - self.from) * self.ease.apply(t);
            tracing::trace!(drive = self.drive.id().0, t, value = v, "tween tick");
            write(&self.drive, v);
        }
        self.state
    }

    fn stop(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Canceled;
            tracing::debug!(drive = self.drive.id().0, at = self.drive.get(), "tween canceled");
        }
    }

    fn state(&self) -> RunState {
        self.state
    }

    fn completed_at(&self) -> Option<Duration> {
        self.completed_at
    }
}

/// Physically-modelled transition of a drive value toward a fixed target.
///
/// Each run starts at rest from the drive value's current reading.
#[derive(Debug)]
pub struct Spring {
    drive: DriveValue,
    to: f64,
    config: SpringConfig,
    native_driver: bool,
    state: RunState,
    from: f64,
    started_at: Duration,
    completed_at: Option<Duration>,
}

impl Spring {
    /// Spring `drive` to `to` with validated `config`.
    pub fn new(drive: DriveValue, to: f64, config: SpringConfig) -> MotionResult<Self> {
        check_target(to)?;
        config.validate()?;
        Ok(Self {
            from: drive.get(),
            drive,
            to,
            config,
            native_driver: false,
            state: RunState::Idle,
            started_at: Duration::ZERO,
            completed_at: None,
        })
    }

    /// Mark the transition as eligible for host-side (native) acceleration.
    pub fn with_native_driver(mut self, native_driver: bool) -> Self {
        self.native_driver = native_driver;
        self
    }

    /// Target value.
    pub fn to(&self) -> f64 {
        self.to
    }

    /// Spring parameters.
    pub fn config(&self) -> &SpringConfig {
        &self.config
    }

    /// Host acceleration hint.
    pub fn native_driver(&self) -> bool {
        self.native_driver
    }

    fn finish(&mut self, at: Duration) {
        write(&self.drive, self.to);
        self.state = RunState::Completed;
        self.completed_at = Some(at);
        tracing::debug!(drive = self.drive.id().0, to = self.to, at = ?at, "spring settled");
    }
}

impl Runner for Spring {
    fn start_at(&mut self, now: Duration) {
        if self.state == RunState::Running {
            tracing::debug!(drive = self.drive.id().0, "spring restarted mid-flight");
        }
        self.from = self.drive.get();
        self.started_at = now;
        self.completed_at = None;
        self.state = RunState::Running;
        tracing::debug!(
            drive = self.drive.id().0,
            from = self.from,
            to = self.to,
            native_driver = self.native_driver,
            "spring started"
        );
        if (self.to - self.from).abs() <= self.config.rest_displacement {
            self.finish(now);
        }
    }

    fn advance(&mut self, now: Duration) -> RunState {
        if self.state != RunState::Running {
            return self.state;
        }
        let t = now.saturating_sub(self.started_at).as_secs_f64();
        let span = self.to - self.from;
        let (x, dx) = self.config.step_response(t);
        let value = self.from + span * x;
        let velocity = span * dx;

        if (self.to - value).abs() <= self.config.rest_displacement
            && velocity.abs() <= self.config.rest_speed
        {
            self.finish(now);
        } else {
            tracing::trace!(drive = self.drive.id().0, value, velocity, "spring tick");
            write(&self.drive, value);
        }
        self.state
    }

    fn stop(&mut self) {
        if self.state == RunState::Running {
            self.state = RunState::Canceled;
            tracing::debug!(drive = self.drive.id().0, at = self.drive.get(), "spring canceled");
        }
    }

    fn state(&self) -> RunState {
        self.state
    }

    fn completed_at(&self) -> Option<Duration> {
        self.completed_at
    }
}

fn check_target(to: f64) -> MotionResult<()> {
    if to.is_finite() {
        Ok(())
    } else {
        Err(MotionError::configuration(format!(
            "animation target must be finite, got {to}"
        )))
    }
}

fn write(drive: &DriveValue, value: f64) {
    if let Err(err) = drive.set(value) {
        tracing::warn!(drive = drive.id().0, error = %err, "runner produced an unwritable value");
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/runner.rs"]
mod tests;
