//! Frame-paced interpolation toward a snap target.

use crate::config::FrameCadence;
use kurbo::{Point, Vec2};
use std::time::Duration;

/// Repeating interval owned by the host.
///
/// The engine arms it when an animation starts and cancels it when the
/// animation completes or the engine is destroyed. The host calls
/// `DragEngine::on_frame` each time the interval elapses.
pub trait FrameTimer {
    /// Arm a repeating interval. Re-arming replaces the previous interval.
    fn start(&mut self, interval: Duration);

    /// Disarm the interval. Safe to call when not running.
    fn cancel(&mut self);

    fn is_running(&self) -> bool;
}

/// Timer that only records what the engine asked for.
///
/// Suitable for tests and for hosts that poll `interval()` themselves.
#[derive(Debug, Clone, Default)]
pub struct ManualTimer {
    interval: Option<Duration>,
    starts: usize,
}

impl ManualTimer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Currently armed interval.
    pub fn interval(&self) -> Option<Duration> {
        self.interval
    }

    /// How many times the timer has been armed.
    pub fn starts(&self) -> usize {
        self.starts
    }
}

impl FrameTimer for ManualTimer {
    fn start(&mut self, interval: Duration) {
        self.interval = Some(interval);
        self.starts += 1;
    }

    fn cancel(&mut self) {
        self.interval = None;
    }

    fn is_running(&self) -> bool {
        self.interval.is_some()
    }
}

/// Outcome of one animation tick.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Tick {
    /// Intermediate position.
    Moved(Point),
    /// Exact target; the run is over.
    Finished(Point),
}

/// One in-flight animation from a start position to a snap target.
#[derive(Debug, Clone, PartialEq)]
pub struct AnimationRun {
    /// Snap index reported to the observer.
    pub index: usize,
    pub target: Point,
    step: Vec2,
    elapsed: f64,
    duration: f64,
    every: f64,
}

impl AnimationRun {
    /// Plan a run. The slower axis sets the duration; both axes arrive together.
    pub fn plan(from: Point, target: Point, frame: FrameCadence, index: usize) -> Self {
        let delta = target - from;
        let duration = frame
            .duration_for(delta.x)
            .max(frame.duration_for(delta.y));
        let every = frame.every as f64;
        let step = if duration > 0.0 {
            delta / (duration / every)
        } else {
            Vec2::ZERO
        };

        Self {
            index,
            target,
            step,
            elapsed: 0.0,
            duration,
            every,
        }
    }

    /// Total scheduled time in milliseconds.
    pub fn duration(&self) -> f64 {
        self.duration
    }

    /// Per-tick movement.
    pub fn step(&self) -> Vec2 {
        self.step
    }

    /// A run with nothing to travel.
    pub fn is_instant(&self) -> bool {
        self.duration <= 0.0
    }

    /// Advance by one interval from `current`.
    pub fn tick(&mut self, current: Point) -> Tick {
        self.elapsed += self.every;
        if self.elapsed >= self.duration {
            return Tick::Finished(self.target);
        }

        Tick::Moved(Point::new(
            approach(current.x, self.step.x, self.target.x),
            approach(current.y, self.step.y, self.target.y),
        ))
    }
}

/// Move `value` by `step` without passing `target`.
fn approach(value: f64, step: f64, target: f64) -> f64 {
    let next = value + step;
    if step > 0.0 {
        next.min(target)
    } else if step < 0.0 {
        next.max(target)
    } else {
        value
    }
}
