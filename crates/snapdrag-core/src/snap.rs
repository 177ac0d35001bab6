//! Snap target selection.
//!
//! Two modes, picked by whether the config carries a trigger function:
//! nearest-distance over the draggable snap points, or the trigger
//! function applied to the total drag delta.

use crate::config::{AxisLock, DragConfig, SnapPoint, TriggerFn};
use kurbo::{Point, Vec2};

/// What the engine knows about a drag at the moment of release.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Release {
    /// Last committed position.
    pub position: Point,
    /// Pointer displacement from drag start to release, in client space.
    pub delta: Vec2,
    /// Index of the last completed snap (0 before any snap).
    pub last_snap_index: usize,
}

/// Distance between `position` and `target` under an axis lock.
///
/// With both axes free the distance is Euclidean.
pub fn snap_distance(position: Point, target: Point, lock: AxisLock) -> f64 {
    match lock {
        AxisLock::Horizontal => (target.x - position.x).abs(),
        AxisLock::Vertical => (target.y - position.y).abs(),
        AxisLock::Free => (target - position).hypot(),
    }
}

/// Index of the nearest draggable snap point.
///
/// The position is rounded to whole pixels first, halves toward positive
/// infinity. A missing snap coordinate counts as 0. Ties go to the earliest
/// index.
pub fn nearest_snap_index(position: Point, points: &[SnapPoint], lock: AxisLock) -> Option<usize> {
    let position = Point::new(round_half_up(position.x), round_half_up(position.y));
    let mut best: Option<(usize, f64)> = None;

    for (index, point) in points.iter().enumerate() {
        if !point.draggable {
            continue;
        }
        let distance = snap_distance(position, point.measure_point(), lock);
        match best {
            Some((_, best_distance)) if distance >= best_distance => {}
            _ => best = Some((index, distance)),
        }
    }

    best.map(|(index, _)| index)
}

fn round_half_up(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Index chosen by a trigger function, falling back to the last snap.
pub fn triggered_snap_index(triggers: &TriggerFn, delta: Vec2, last_snap_index: usize) -> usize {
    triggers.call(delta).unwrap_or(last_snap_index)
}

/// Picks the animation target when a drag is released.
#[derive(Debug, Clone, Copy)]
pub struct SnapResolver<'a> {
    config: &'a DragConfig,
}

impl<'a> SnapResolver<'a> {
    pub fn new(config: &'a DragConfig) -> Self {
        Self { config }
    }

    /// Resolve a release to a snap index, or `None` when nothing applies.
    pub fn resolve(&self, release: &Release) -> Option<usize> {
        if self.config.snap_points.is_empty() {
            return None;
        }

        match &self.config.triggers {
            Some(triggers) => Some(triggered_snap_index(
                triggers,
                release.delta,
                release.last_snap_index,
            )),
            None => nearest_snap_index(
                release.position,
                &self.config.snap_points,
                self.config.axis_lock(),
            ),
        }
    }
}
