//! Drag configuration and validation.

use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::Arc;
use std::time::Duration;
use thiserror::Error;

/// Configuration errors reported when an engine is created.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("verticalOnly and horizontalOnly are mutually exclusive")]
    ConflictingAxisLock,
    #[error("frame.pixels must be a positive finite number, got {0}")]
    InvalidFramePixels(f64),
    #[error("frame.every must be at least 1ms")]
    InvalidFrameInterval,
    #[error("resistance on the {axis} axis must be a non-negative finite number, got {value}")]
    InvalidResistance { axis: char, value: f64 },
    #[error("boundary {low} ({low_value}) exceeds {high} ({high_value})")]
    InvertedBoundary {
        low: &'static str,
        low_value: f64,
        high: &'static str,
        high_value: f64,
    },
    #[error("initialPosition ({x}, {y}) lies outside the boundaries")]
    InitialOutOfBounds { x: f64, y: f64 },
    #[error("Failed to parse drag config: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Result type for configuration operations.
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Optional per-edge clamp. An unset edge leaves that side unclamped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Boundary {
    pub left: Option<f64>,
    pub right: Option<f64>,
    pub top: Option<f64>,
    pub bottom: Option<f64>,
}

impl Boundary {
    /// Clamp a horizontal coordinate. Each configured edge applies on its own.
    pub fn clamp_x(&self, x: f64) -> f64 {
        clamp_edge(x, self.left, self.right)
    }

    /// Clamp a vertical coordinate.
    pub fn clamp_y(&self, y: f64) -> f64 {
        clamp_edge(y, self.top, self.bottom)
    }

    /// Check whether a point lies inside every configured edge.
    pub fn contains(&self, point: Point) -> bool {
        self.clamp_x(point.x) == point.x && self.clamp_y(point.y) == point.y
    }
}

fn clamp_edge(value: f64, low: Option<f64>, high: Option<f64>) -> f64 {
    let value = high.map_or(value, |h| value.min(h));
    low.map_or(value, |l| value.max(l))
}

/// Axis restriction derived from `verticalOnly`/`horizontalOnly`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AxisLock {
    #[default]
    Free,
    Horizontal,
    Vertical,
}

/// Pixels of movement required along a locked axis before a drag activates.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Resistance {
    pub x: Option<f64>,
    pub y: Option<f64>,
}

/// Animation cadence: move `pixels` px every `every` ms.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FrameCadence {
    pub pixels: f64,
    pub every: u64,
}

impl Default for FrameCadence {
    fn default() -> Self {
        Self {
            pixels: 10.0,
            every: 10,
        }
    }
}

impl FrameCadence {
    /// Timer interval between two animation ticks.
    pub fn interval(&self) -> Duration {
        Duration::from_millis(self.every)
    }

    /// Milliseconds needed to travel `distance` pixels.
    pub fn duration_for(&self, distance: f64) -> f64 {
        distance.abs() * (self.every as f64 / self.pixels)
    }
}

/// A candidate snap target.
///
/// A missing coordinate counts as 0 when measuring distance, and keeps the
/// current value on that axis when used as an animation target.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SnapPoint {
    #[serde(default)]
    pub x: Option<f64>,
    #[serde(default)]
    pub y: Option<f64>,
    /// `false` excludes the point from nearest-distance resolution.
    #[serde(default = "default_true")]
    pub draggable: bool,
}

fn default_true() -> bool {
    true
}

impl SnapPoint {
    /// A point on both axes.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            draggable: true,
        }
    }

    /// A point that only constrains the horizontal axis.
    pub fn at_x(x: f64) -> Self {
        Self {
            x: Some(x),
            y: None,
            draggable: true,
        }
    }

    /// A point that only constrains the vertical axis.
    pub fn at_y(y: f64) -> Self {
        Self {
            x: None,
            y: Some(y),
            draggable: true,
        }
    }

    /// Exclude this point from automatic selection.
    pub fn locked(mut self) -> Self {
        self.draggable = false;
        self
    }

    /// Coordinates used for nearest-distance selection.
    pub fn measure_point(&self) -> Point {
        Point::new(self.x.unwrap_or(0.0), self.y.unwrap_or(0.0))
    }

    /// Fill missing coordinates from `current`.
    pub fn resolve(&self, current: Point) -> Point {
        Point::new(self.x.unwrap_or(current.x), self.y.unwrap_or(current.y))
    }
}

/// Caller-supplied mapping from total drag delta to a snap index.
#[derive(Clone)]
pub struct TriggerFn(Arc<dyn Fn(Vec2) -> Option<usize> + Send + Sync>);

impl TriggerFn {
    pub fn new(f: impl Fn(Vec2) -> Option<usize> + Send + Sync + 'static) -> Self {
        Self(Arc::new(f))
    }

    pub fn call(&self, delta: Vec2) -> Option<usize> {
        (self.0)(delta)
    }
}

impl fmt::Debug for TriggerFn {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("TriggerFn(..)")
    }
}

/// Per-engine drag configuration.
///
/// Field names serialize in camelCase, so a JSON config reads like
/// `{"horizontalOnly": true, "snapPoints": [{"x": 0}, {"x": 100}]}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct DragConfig {
    /// Gates drag acquisition.
    pub drag_enabled: bool,
    pub vertical_only: bool,
    pub horizontal_only: bool,
    pub resistance: Resistance,
    pub frame: FrameCadence,
    pub initial_position: Point,
    pub boundaries: Boundary,
    pub snap_points: Vec<SnapPoint>,
    /// Replaces nearest-distance resolution when set.
    #[serde(skip)]
    pub triggers: Option<TriggerFn>,
    /// Resolve animations synchronously without intermediate ticks.
    pub immediate: bool,
    /// Client-space rectangle a drag must start in.
    pub drag_area: Option<Rect>,
}

impl Default for DragConfig {
    fn default() -> Self {
        Self {
            drag_enabled: true,
            vertical_only: false,
            horizontal_only: false,
            resistance: Resistance::default(),
            frame: FrameCadence::default(),
            initial_position: Point::ZERO,
            boundaries: Boundary::default(),
            snap_points: Vec::new(),
            triggers: None,
            immediate: false,
            drag_area: None,
        }
    }
}

impl DragConfig {
    /// Create a config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse and validate a JSON config.
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Check the config for contradictory or unusable values.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.vertical_only && self.horizontal_only {
            return Err(ConfigError::ConflictingAxisLock);
        }
        if !self.frame.pixels.is_finite() || self.frame.pixels <= 0.0 {
            return Err(ConfigError::InvalidFramePixels(self.frame.pixels));
        }
        if self.frame.every == 0 {
            return Err(ConfigError::InvalidFrameInterval);
        }
        for (axis, value) in [('x', self.resistance.x), ('y', self.resistance.y)] {
            if let Some(value) = value {
                if !value.is_finite() || value < 0.0 {
                    return Err(ConfigError::InvalidResistance { axis, value });
                }
            }
        }
        let b = &self.boundaries;
        if let (Some(left), Some(right)) = (b.left, b.right) {
            if left > right {
                return Err(ConfigError::InvertedBoundary {
                    low: "left",
                    low_value: left,
                    high: "right",
                    high_value: right,
                });
            }
        }
        if let (Some(top), Some(bottom)) = (b.top, b.bottom) {
            if top > bottom {
                return Err(ConfigError::InvertedBoundary {
                    low: "top",
                    low_value: top,
                    high: "bottom",
                    high_value: bottom,
                });
            }
        }
        let initial = self.initial_position;
        if !b.contains(initial) {
            return Err(ConfigError::InitialOutOfBounds {
                x: initial.x,
                y: initial.y,
            });
        }
        Ok(())
    }

    pub fn axis_lock(&self) -> AxisLock {
        if self.horizontal_only {
            AxisLock::Horizontal
        } else if self.vertical_only {
            AxisLock::Vertical
        } else {
            AxisLock::Free
        }
    }

    /// Whether x follows the pointer while dragging.
    pub fn x_free(&self) -> bool {
        !self.vertical_only
    }

    /// Whether y follows the pointer while dragging.
    pub fn y_free(&self) -> bool {
        !self.horizontal_only
    }

    /// Resistance threshold on the locked axis, if one applies.
    pub fn active_resistance(&self) -> Option<f64> {
        match self.axis_lock() {
            AxisLock::Horizontal => self.resistance.x,
            AxisLock::Vertical => self.resistance.y,
            AxisLock::Free => None,
        }
    }

    pub fn with_horizontal_only(mut self) -> Self {
        self.horizontal_only = true;
        self.vertical_only = false;
        self
    }

    pub fn with_vertical_only(mut self) -> Self {
        self.vertical_only = true;
        self.horizontal_only = false;
        self
    }

    pub fn with_resistance(mut self, resistance: Resistance) -> Self {
        self.resistance = resistance;
        self
    }

    pub fn with_frame(mut self, pixels: f64, every: u64) -> Self {
        self.frame = FrameCadence { pixels, every };
        self
    }

    pub fn with_initial_position(mut self, position: Point) -> Self {
        self.initial_position = position;
        self
    }

    pub fn with_boundaries(mut self, boundaries: Boundary) -> Self {
        self.boundaries = boundaries;
        self
    }

    pub fn with_snap_points(mut self, points: Vec<SnapPoint>) -> Self {
        self.snap_points = points;
        self
    }

    pub fn with_triggers(
        mut self,
        triggers: impl Fn(Vec2) -> Option<usize> + Send + Sync + 'static,
    ) -> Self {
        self.triggers = Some(TriggerFn::new(triggers));
        self
    }

    pub fn with_immediate(mut self, immediate: bool) -> Self {
        self.immediate = immediate;
        self
    }

    pub fn with_drag_area(mut self, area: Rect) -> Self {
        self.drag_area = Some(area);
        self
    }
}
