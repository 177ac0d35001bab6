//! The drag controller state machine.
//!
//! A [`DragEngine`] owns the authoritative position of one draggable
//! element. Input moves it while dragging; on release it resolves a snap
//! target and animates there over discrete frames.
//!
//! ```text
//! Idle --start--> Armed --move (past resistance)--> Dragging
//! Dragging --end--> Animating --last tick--> Idle
//! ```

use crate::animation::{AnimationRun, FrameTimer, Tick};
use crate::config::{ConfigResult, DragConfig};
use crate::input::{DragSignal, NativeEvent, PointerInputAdapter, PointerPoint};
use crate::snap::{Release, SnapResolver};
use kurbo::{Point, Vec2};
use std::fmt;
use uuid::Uuid;

/// Callbacks invoked on the owner.
pub trait DragObserver {
    /// Called after every committed position change.
    fn on_movement(&mut self, _position: Point) {}

    /// Called once before the first tick of a snap animation.
    fn on_snap_start(&mut self, _index: usize) {}

    /// Called once after the final position of a snap animation is committed.
    fn on_snap_end(&mut self, _index: usize) {}
}

impl DragObserver for () {}

/// A single observer callback, as recorded by [`RecordingObserver`].
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ObserverEvent {
    Movement(Point),
    SnapStart(usize),
    SnapEnd(usize),
}

/// Observer that keeps every callback in order.
#[derive(Debug, Clone, Default)]
pub struct RecordingObserver {
    pub events: Vec<ObserverEvent>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn movements(&self) -> Vec<Point> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObserverEvent::Movement(p) => Some(*p),
                _ => None,
            })
            .collect()
    }

    pub fn snap_starts(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObserverEvent::SnapStart(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    pub fn snap_ends(&self) -> Vec<usize> {
        self.events
            .iter()
            .filter_map(|e| match e {
                ObserverEvent::SnapEnd(i) => Some(*i),
                _ => None,
            })
            .collect()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl DragObserver for RecordingObserver {
    fn on_movement(&mut self, position: Point) {
        self.events.push(ObserverEvent::Movement(position));
    }

    fn on_snap_start(&mut self, index: usize) {
        self.events.push(ObserverEvent::SnapStart(index));
    }

    fn on_snap_end(&mut self, index: usize) {
        self.events.push(ObserverEvent::SnapEnd(index));
    }
}

/// Engine lifecycle state. Exactly one holds at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EngineState {
    #[default]
    Idle,
    /// Pointer is down but the drag has not activated yet.
    Armed,
    Dragging,
    Animating,
}

/// Identifier used to tell engines apart in logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EngineId(Uuid);

impl EngineId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for EngineId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for EngineId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Per-drag data, dropped when the drag ends.
#[derive(Debug, Clone, Copy)]
struct Session {
    /// Client coordinates at drag start.
    start: Point,
    /// Pointer minus position at drag start.
    offset: Vec2,
    /// Most recent client coordinates.
    last_pointer: Point,
}

/// Programmatic snap request.
///
/// With an index only, the target is that snap point. With a point, the
/// point is the target and the index (or the last snap index) labels it.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct SnapRequest {
    pub index: Option<usize>,
    pub point: Option<Point>,
}

impl SnapRequest {
    pub fn index(index: usize) -> Self {
        Self {
            index: Some(index),
            point: None,
        }
    }

    pub fn point(point: Point) -> Self {
        Self {
            index: None,
            point: Some(point),
        }
    }

    pub fn with_point(mut self, point: Point) -> Self {
        self.point = Some(point);
        self
    }
}

/// Drag-to-snap engine for one owner.
///
/// The owner forwards native pointer events through [`handle_event`](Self::handle_event),
/// forwards timer ticks through [`on_frame`](Self::on_frame), and calls
/// [`destroy`](Self::destroy) on teardown. Dropping the engine also tears it down.
pub struct DragEngine<O: DragObserver, T: FrameTimer> {
    id: EngineId,
    config: DragConfig,
    position: Point,
    state: EngineState,
    session: Option<Session>,
    animation: Option<AnimationRun>,
    last_snap_index: usize,
    input: PointerInputAdapter,
    observer: O,
    timer: T,
    destroyed: bool,
}

impl<O: DragObserver, T: FrameTimer> DragEngine<O, T> {
    /// Create an engine at `config.initial_position` and acquire its listeners.
    pub fn new(config: DragConfig, observer: O, timer: T) -> ConfigResult<Self> {
        if let Err(e) = config.validate() {
            log::warn!("Rejected drag config: {}", e);
            return Err(e);
        }

        let id = EngineId::new();
        log::debug!("[{}] created at {:?}", id, config.initial_position);
        let mut input = PointerInputAdapter::new();
        input.attach();

        Ok(Self {
            id,
            position: config.initial_position,
            config,
            state: EngineState::Idle,
            session: None,
            animation: None,
            last_snap_index: 0,
            input,
            observer,
            timer,
            destroyed: false,
        })
    }

    pub fn id(&self) -> EngineId {
        self.id
    }

    pub fn config(&self) -> &DragConfig {
        &self.config
    }

    pub fn position(&self) -> Point {
        self.position
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn last_snap_index(&self) -> usize {
        self.last_snap_index
    }

    pub fn is_destroyed(&self) -> bool {
        self.destroyed
    }

    pub fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn timer(&self) -> &T {
        &self.timer
    }

    pub fn timer_mut(&mut self) -> &mut T {
        &mut self.timer
    }

    pub fn input(&self) -> &PointerInputAdapter {
        &self.input
    }

    /// Feed one native pointer event.
    pub fn handle_event(&mut self, event: &NativeEvent) {
        if self.destroyed {
            return;
        }
        match self.input.handle_event(event) {
            Some(DragSignal::Start(point)) => {
                if !self.drag_start(point) {
                    self.input.cancel();
                }
            }
            Some(DragSignal::Move(point)) => self.drag(point),
            Some(DragSignal::End) => self.drag_end(),
            None => {}
        }
    }

    /// Begin a drag session. Returns `false` if the session was refused.
    pub fn drag_start(&mut self, point: PointerPoint) -> bool {
        if self.destroyed || !self.config.drag_enabled || self.state != EngineState::Idle {
            return false;
        }
        if let Some(area) = self.config.drag_area {
            if !area.contains(point.client) {
                log::trace!("[{}] drag start outside drag area", self.id);
                return false;
            }
        }

        self.session = Some(Session {
            start: point.client,
            offset: point.client - self.position,
            last_pointer: point.client,
        });
        self.state = EngineState::Armed;
        log::debug!("[{}] Idle -> Armed at {:?}", self.id, point.client);
        true
    }

    /// Pointer moved during a session.
    pub fn drag(&mut self, point: PointerPoint) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.last_pointer = point.client;
        let session = *session;

        match self.state {
            EngineState::Armed => {
                if !self.resistance_passed(&session, point.client) {
                    return;
                }
                self.state = EngineState::Dragging;
                log::debug!("[{}] Armed -> Dragging", self.id);
                self.move_to_pointer(&session, point.client);
            }
            EngineState::Dragging => self.move_to_pointer(&session, point.client),
            _ => {}
        }
    }

    /// Pointer released. Snaps when the drag had activated.
    pub fn drag_end(&mut self) {
        let Some(session) = self.session.take() else {
            return;
        };

        match self.state {
            EngineState::Armed => {
                self.state = EngineState::Idle;
                log::debug!("[{}] Armed -> Idle (drag never activated)", self.id);
            }
            EngineState::Dragging => {
                self.state = EngineState::Idle;
                let release = Release {
                    position: self.position,
                    delta: session.last_pointer - session.start,
                    last_snap_index: self.last_snap_index,
                };
                match SnapResolver::new(&self.config).resolve(&release) {
                    Some(index) => {
                        log::debug!("[{}] release resolved to snap {}", self.id, index);
                        self.snap_to(SnapRequest::index(index));
                    }
                    None => {
                        log::debug!("[{}] release with no snap target", self.id);
                    }
                }
            }
            _ => {}
        }
    }

    /// Toggle `dragEnabled`. Disabling mid-drag reverts to the last snap point.
    pub fn set_drag_enabled(&mut self, enabled: bool) {
        if self.destroyed {
            return;
        }
        self.config.drag_enabled = enabled;
        if enabled {
            return;
        }

        match self.state {
            EngineState::Armed => {
                self.input.cancel();
                self.session = None;
                self.state = EngineState::Idle;
                log::debug!("[{}] drag disabled while armed", self.id);
            }
            EngineState::Dragging => {
                self.input.cancel();
                self.session = None;
                self.state = EngineState::Idle;
                log::debug!("[{}] drag disabled while dragging, reverting", self.id);

                let request = if self.config.snap_points.get(self.last_snap_index).is_some() {
                    SnapRequest::index(self.last_snap_index)
                } else {
                    SnapRequest::point(self.config.initial_position)
                };
                self.snap_to(request);
            }
            _ => {}
        }
    }

    /// Animate to a snap point or explicit point.
    ///
    /// Silently ignored while a drag or animation is in progress, or when
    /// the request names neither a point nor an existing snap point.
    pub fn snap_to(&mut self, request: SnapRequest) {
        if self.destroyed {
            return;
        }
        if self.state != EngineState::Idle {
            log::debug!("[{}] snap request ignored in {:?}", self.id, self.state);
            return;
        }

        let index = request.index.unwrap_or(self.last_snap_index);
        let snap_point = request.index.and_then(|i| self.config.snap_points.get(i));
        let target = match (request.point, snap_point) {
            (Some(point), _) => point,
            (None, Some(snap_point)) => snap_point.resolve(self.position),
            (None, None) => {
                log::debug!("[{}] snap request to missing index {}", self.id, index);
                return;
            }
        };
        if snap_point.is_some() {
            self.last_snap_index = index;
        }

        let run = AnimationRun::plan(self.position, target, self.config.frame, index);
        log::debug!(
            "[{}] snapping to {} at {:?} over {}ms",
            self.id,
            index,
            target,
            run.duration()
        );
        self.observer.on_snap_start(index);

        if self.config.immediate || run.is_instant() {
            self.finish(run);
            return;
        }

        self.state = EngineState::Animating;
        self.animation = Some(run);
        self.timer.start(self.config.frame.interval());
    }

    /// Advance the running animation by one frame. Stale ticks are ignored.
    pub fn on_frame(&mut self) {
        if self.destroyed {
            return;
        }
        let Some(run) = self.animation.as_mut() else {
            return;
        };

        match run.tick(self.position) {
            Tick::Moved(position) => {
                log::trace!("[{}] tick {:?}", self.id, position);
                self.commit(position);
            }
            Tick::Finished(_) => {
                if let Some(run) = self.animation.take() {
                    self.finish(run);
                }
            }
        }
    }

    /// Tear down: cancel the timer and release listeners. Idempotent.
    pub fn destroy(&mut self) {
        if self.destroyed {
            return;
        }
        self.timer.cancel();
        self.animation = None;
        self.session = None;
        self.input.detach();
        self.state = EngineState::Idle;
        self.destroyed = true;
        log::debug!("[{}] destroyed", self.id);
    }

    fn resistance_passed(&self, session: &Session, pointer: Point) -> bool {
        let Some(threshold) = self.config.active_resistance() else {
            return true;
        };
        let moved = if self.config.horizontal_only {
            (pointer.x - session.start.x).abs()
        } else {
            (pointer.y - session.start.y).abs()
        };
        moved >= threshold
    }

    fn move_to_pointer(&mut self, session: &Session, pointer: Point) {
        let candidate = pointer - session.offset;
        let bounds = self.config.boundaries;
        let x = if self.config.x_free() {
            bounds.clamp_x(candidate.x)
        } else {
            self.position.x
        };
        let y = if self.config.y_free() {
            bounds.clamp_y(candidate.y)
        } else {
            self.position.y
        };
        log::trace!("[{}] drag {:?}", self.id, (x, y));
        self.commit(Point::new(x, y));
    }

    fn commit(&mut self, position: Point) {
        self.position = position;
        self.observer.on_movement(position);
    }

    fn finish(&mut self, run: AnimationRun) {
        self.timer.cancel();
        self.animation = None;
        self.state = EngineState::Idle;
        self.commit(run.target);
        log::debug!("[{}] snap {} complete", self.id, run.index);
        self.observer.on_snap_end(run.index);
    }
}

impl<O: DragObserver, T: FrameTimer> Drop for DragEngine<O, T> {
    fn drop(&mut self) {
        self.destroy();
    }
}

impl<O: DragObserver, T: FrameTimer> fmt::Debug for DragEngine<O, T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DragEngine")
            .field("id", &self.id)
            .field("state", &self.state)
            .field("position", &self.position)
            .field("last_snap_index", &self.last_snap_index)
            .field("destroyed", &self.destroyed)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::animation::ManualTimer;
    use crate::config::{Boundary, ConfigError, Resistance, SnapPoint};
    use crate::input::{MouseButton, TouchPoint};
    use kurbo::Rect;
    use std::cell::Cell;
    use std::rc::Rc;
    use std::time::Duration;

    type TestEngine = DragEngine<RecordingObserver, ManualTimer>;

    fn engine(config: DragConfig) -> TestEngine {
        DragEngine::new(config, RecordingObserver::new(), ManualTimer::new()).unwrap()
    }

    fn down(x: f64, y: f64) -> NativeEvent {
        NativeEvent::MouseDown {
            button: MouseButton::Left,
            point: PointerPoint::at(x, y),
        }
    }

    fn mv(x: f64, y: f64) -> NativeEvent {
        NativeEvent::MouseMove {
            point: PointerPoint::at(x, y),
        }
    }

    fn up() -> NativeEvent {
        NativeEvent::MouseUp {
            button: MouseButton::Left,
        }
    }

    fn drag(engine: &mut TestEngine, from: (f64, f64), to: (f64, f64)) {
        engine.handle_event(&down(from.0, from.1));
        engine.handle_event(&mv(to.0, to.1));
        engine.handle_event(&up());
    }

    fn run_animation(engine: &mut TestEngine) {
        let mut ticks = 0;
        while engine.state() == EngineState::Animating {
            engine.on_frame();
            ticks += 1;
            assert!(ticks < 10_000, "animation never finished");
        }
    }

    fn horizontal_rail() -> DragConfig {
        DragConfig::new()
            .with_horizontal_only()
            .with_snap_points(vec![
                SnapPoint::at_x(0.0),
                SnapPoint::at_x(100.0),
                SnapPoint::at_x(300.0),
            ])
    }

    #[test]
    fn test_invalid_config_rejected() {
        let mut config = DragConfig::new().with_horizontal_only();
        config.vertical_only = true;
        let result = DragEngine::new(config, (), ManualTimer::new());
        assert!(matches!(result, Err(ConfigError::ConflictingAxisLock)));
    }

    #[test]
    fn test_new_engine_holds_listeners() {
        let engine = engine(horizontal_rail());
        assert!(engine.input().is_attached());
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_initial_position_outside_boundaries_rejected() {
        let config = horizontal_rail()
            .with_initial_position(Point::new(500.0, 0.0))
            .with_boundaries(Boundary {
                left: Some(0.0),
                right: Some(300.0),
                ..Default::default()
            });
        let result = DragEngine::new(config, (), ManualTimer::new());
        assert!(matches!(result, Err(ConfigError::InitialOutOfBounds { .. })));
    }

    #[test]
    fn test_upper_boundaries_clamp_without_lower() {
        let bounds = Boundary {
            right: Some(100.0),
            bottom: Some(50.0),
            ..Default::default()
        };
        let mut engine = engine(DragConfig::new().with_boundaries(bounds));
        engine.handle_event(&down(0.0, 0.0));
        engine.handle_event(&mv(250.0, 400.0));
        assert_eq!(engine.position(), Point::new(100.0, 50.0));
        engine.handle_event(&mv(-250.0, -400.0));
        assert_eq!(engine.position(), Point::new(-250.0, -400.0));
    }

    #[test]
    fn test_drag_follows_pointer_minus_offset() {
        let mut engine = engine(DragConfig::new().with_initial_position(Point::new(10.0, 10.0)));

        engine.handle_event(&down(50.0, 50.0));
        assert_eq!(engine.state(), EngineState::Armed);
        assert_eq!(engine.position(), Point::new(10.0, 10.0));
        assert!(engine.observer().events.is_empty());

        engine.handle_event(&mv(60.0, 70.0));
        assert_eq!(engine.state(), EngineState::Dragging);
        assert_eq!(engine.position(), Point::new(20.0, 30.0));
        assert_eq!(engine.observer().movements(), vec![Point::new(20.0, 30.0)]);
    }

    #[test]
    fn test_boundaries_clamp_bounded_axes_only() {
        let bounds = Boundary {
            left: Some(0.0),
            right: Some(100.0),
            top: None,
            bottom: Some(50.0),
        };
        let mut engine = engine(DragConfig::new().with_boundaries(bounds));
        engine.handle_event(&down(0.0, 0.0));

        for &(x, y) in &[(-40.0, -500.0), (250.0, 20.0), (50.0, 400.0), (99.0, -1.0)] {
            engine.handle_event(&mv(x, y));
            let p = engine.position();
            assert!(p.x >= 0.0 && p.x <= 100.0);
            assert!(p.y <= 50.0);
        }
        let movements = engine.observer().movements();
        assert_eq!(movements[0], Point::new(0.0, -500.0));
        assert_eq!(movements[1], Point::new(100.0, 20.0));
        assert_eq!(movements[2], Point::new(50.0, 50.0));
    }

    #[test]
    fn test_axis_lock_holds_other_axis() {
        let mut engine = engine(
            DragConfig::new()
                .with_vertical_only()
                .with_initial_position(Point::new(5.0, 0.0)),
        );
        engine.handle_event(&down(0.0, 0.0));
        engine.handle_event(&mv(80.0, 40.0));
        assert_eq!(engine.position(), Point::new(5.0, 40.0));
    }

    #[test]
    fn test_resistance_gates_activation() {
        let config = DragConfig::new()
            .with_horizontal_only()
            .with_resistance(Resistance {
                x: Some(10.0),
                y: None,
            });
        let mut engine = engine(config);

        engine.handle_event(&down(0.0, 0.0));
        engine.handle_event(&mv(9.0, 0.0));
        assert_eq!(engine.state(), EngineState::Armed);
        engine.handle_event(&mv(-9.0, 200.0));
        assert_eq!(engine.state(), EngineState::Armed);
        assert_eq!(engine.position(), Point::ZERO);
        assert!(engine.observer().movements().is_empty());

        engine.handle_event(&mv(10.0, 0.0));
        assert_eq!(engine.state(), EngineState::Dragging);
        assert_eq!(engine.position(), Point::new(10.0, 0.0));
    }

    #[test]
    fn test_resistance_ignored_without_axis_lock() {
        let config = DragConfig::new().with_resistance(Resistance {
            x: Some(50.0),
            y: Some(50.0),
        });
        let mut engine = engine(config);
        engine.handle_event(&down(0.0, 0.0));
        engine.handle_event(&mv(1.0, 1.0));
        assert_eq!(engine.state(), EngineState::Dragging);
    }

    #[test]
    fn test_release_snaps_to_nearest() {
        let mut engine = engine(horizontal_rail());

        drag(&mut engine, (0.0, 0.0), (120.0, 0.0));
        assert_eq!(engine.state(), EngineState::Animating);
        assert_eq!(engine.observer().snap_starts(), vec![1]);
        assert_eq!(engine.timer().interval(), Some(Duration::from_millis(10)));

        run_animation(&mut engine);
        assert_eq!(engine.position(), Point::new(100.0, 0.0));
        assert_eq!(engine.observer().snap_ends(), vec![1]);
        assert_eq!(engine.last_snap_index(), 1);
        assert!(!engine.timer().is_running());
        assert_eq!(engine.state(), EngineState::Idle);
    }

    #[test]
    fn test_snap_callbacks_bracket_ticks() {
        let mut engine = engine(horizontal_rail());
        drag(&mut engine, (0.0, 0.0), (260.0, 0.0));
        run_animation(&mut engine);

        let events = &engine.observer().events;
        let start = events
            .iter()
            .position(|e| *e == ObserverEvent::SnapStart(2))
            .unwrap();
        // Only the drag movement precedes the snap start.
        assert_eq!(start, 1);
        assert_eq!(events.last(), Some(&ObserverEvent::SnapEnd(2)));
        assert_eq!(
            events[events.len() - 2],
            ObserverEvent::Movement(Point::new(300.0, 0.0))
        );
        // 40px at 10px per tick: three intermediate ticks, then the exact target.
        assert_eq!(events.len() - start - 2, 4);
    }

    #[test]
    fn test_final_position_is_exact() {
        let config = DragConfig::new()
            .with_frame(7.0, 16)
            .with_snap_points(vec![SnapPoint::new(33.3, -17.7)]);
        let mut engine = engine(config);
        drag(&mut engine, (0.0, 0.0), (0.1, 0.3));
        run_animation(&mut engine);

        let p = engine.position();
        assert_eq!(p.x.to_bits(), 33.3f64.to_bits());
        assert_eq!(p.y.to_bits(), (-17.7f64).to_bits());
    }

    #[test]
    fn test_snap_to_while_animating_is_ignored() {
        let mut engine = engine(horizontal_rail());
        engine.snap_to(SnapRequest::index(2));
        assert_eq!(engine.state(), EngineState::Animating);

        engine.snap_to(SnapRequest::index(0));
        engine.snap_to(SnapRequest::point(Point::new(-50.0, 0.0)));
        assert_eq!(engine.observer().snap_starts(), vec![2]);
        assert_eq!(engine.timer().starts(), 1);

        run_animation(&mut engine);
        assert_eq!(engine.observer().snap_ends(), vec![2]);
        assert_eq!(engine.position(), Point::new(300.0, 0.0));
    }

    #[test]
    fn test_drag_refused_while_animating() {
        let mut engine = engine(horizontal_rail());
        engine.snap_to(SnapRequest::index(1));
        engine.handle_event(&down(0.0, 0.0));
        assert_eq!(engine.state(), EngineState::Animating);
        assert!(!engine.input().is_active());
    }

    #[test]
    fn test_immediate_mode_skips_ticks() {
        let mut engine = engine(horizontal_rail().with_immediate(true));
        drag(&mut engine, (0.0, 0.0), (120.0, 0.0));

        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.timer().starts(), 0);
        assert_eq!(
            engine.observer().events,
            vec![
                ObserverEvent::Movement(Point::new(120.0, 0.0)),
                ObserverEvent::SnapStart(1),
                ObserverEvent::Movement(Point::new(100.0, 0.0)),
                ObserverEvent::SnapEnd(1),
            ]
        );
    }

    #[test]
    fn test_snap_to_missing_index_is_noop() {
        let mut engine = engine(horizontal_rail());
        engine.snap_to(SnapRequest::index(7));
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.observer().events.is_empty());
        assert_eq!(engine.last_snap_index(), 0);
    }

    #[test]
    fn test_snap_to_explicit_point() {
        let mut engine = engine(DragConfig::new().with_immediate(true));
        engine.snap_to(SnapRequest::point(Point::new(40.0, 40.0)));
        assert_eq!(engine.position(), Point::new(40.0, 40.0));
        assert_eq!(engine.observer().snap_starts(), vec![0]);
        assert_eq!(engine.observer().snap_ends(), vec![0]);

        engine.snap_to(SnapRequest::index(3).with_point(Point::new(1.0, 2.0)));
        assert_eq!(engine.observer().snap_ends(), vec![0, 3]);
        // No snap point 3 exists, so the last snap index is unchanged.
        assert_eq!(engine.last_snap_index(), 0);
    }

    #[test]
    fn test_snap_to_current_position_completes_at_once() {
        let mut engine = engine(horizontal_rail());
        engine.snap_to(SnapRequest::index(0));
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.timer().starts(), 0);
        assert_eq!(
            engine.observer().events,
            vec![
                ObserverEvent::SnapStart(0),
                ObserverEvent::Movement(Point::ZERO),
                ObserverEvent::SnapEnd(0),
            ]
        );
    }

    #[test]
    fn test_release_without_snap_points_stays_put() {
        let mut engine = engine(DragConfig::new());
        drag(&mut engine, (0.0, 0.0), (33.0, 44.0));
        assert_eq!(engine.state(), EngineState::Idle);
        assert_eq!(engine.position(), Point::new(33.0, 44.0));
        assert!(engine.observer().snap_starts().is_empty());
    }

    #[test]
    fn test_release_from_armed_does_not_snap() {
        let mut engine = engine(horizontal_rail().with_initial_position(Point::new(40.0, 0.0)));
        engine.handle_event(&down(0.0, 0.0));
        engine.handle_event(&up());
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(engine.observer().events.is_empty());
    }

    #[test]
    fn test_disable_mid_drag_reverts_to_last_snap() {
        let mut engine = engine(horizontal_rail().with_immediate(true));
        engine.snap_to(SnapRequest::index(1));
        engine.observer_mut().clear();

        engine.handle_event(&down(100.0, 0.0));
        engine.handle_event(&mv(250.0, 0.0));
        assert_eq!(engine.position(), Point::new(250.0, 0.0));

        engine.set_drag_enabled(false);
        assert_eq!(engine.position(), Point::new(100.0, 0.0));
        assert_eq!(engine.observer().snap_starts(), vec![1]);
        assert_eq!(engine.observer().snap_ends(), vec![1]);

        // The aborted session no longer moves the element.
        engine.handle_event(&mv(280.0, 0.0));
        engine.handle_event(&up());
        assert_eq!(engine.position(), Point::new(100.0, 0.0));
        assert_eq!(engine.observer().snap_starts(), vec![1]);
    }

    #[test]
    fn test_disable_mid_drag_without_snap_points_returns_home() {
        let home = Point::new(12.0, 8.0);
        let mut engine = engine(
            DragConfig::new()
                .with_initial_position(home)
                .with_immediate(true),
        );
        engine.handle_event(&down(0.0, 0.0));
        engine.handle_event(&mv(90.0, 90.0));
        engine.set_drag_enabled(false);
        assert_eq!(engine.position(), home);
        assert_eq!(engine.observer().snap_ends(), vec![0]);
    }

    #[test]
    fn test_toggle_while_idle_has_no_effect() {
        let mut engine = engine(horizontal_rail());
        engine.set_drag_enabled(false);
        assert!(engine.observer().events.is_empty());
        assert_eq!(engine.state(), EngineState::Idle);

        engine.handle_event(&down(0.0, 0.0));
        assert_eq!(engine.state(), EngineState::Idle);

        engine.set_drag_enabled(true);
        engine.handle_event(&down(0.0, 0.0));
        assert_eq!(engine.state(), EngineState::Armed);
    }

    #[test]
    fn test_trigger_mode() {
        let config = DragConfig::new()
            .with_vertical_only()
            .with_immediate(true)
            .with_snap_points(vec![SnapPoint::at_y(0.0), SnapPoint::at_y(-300.0)])
            .with_triggers(|delta| if delta.y < -50.0 { Some(1) } else { None });
        let mut engine = engine(config);

        drag(&mut engine, (0.0, 400.0), (0.0, 340.0));
        assert_eq!(engine.position(), Point::new(0.0, -300.0));
        assert_eq!(engine.last_snap_index(), 1);

        // A small nudge stays on the last snap point.
        drag(&mut engine, (0.0, 100.0), (0.0, 120.0));
        assert_eq!(engine.position(), Point::new(0.0, -300.0));
        assert_eq!(engine.observer().snap_ends(), vec![1, 1]);
    }

    #[test]
    fn test_drag_area_limits_start() {
        let config = DragConfig::new().with_drag_area(Rect::new(0.0, 0.0, 100.0, 40.0));
        let mut engine = engine(config);

        engine.handle_event(&down(50.0, 80.0));
        assert_eq!(engine.state(), EngineState::Idle);
        assert!(!engine.input().is_active());

        engine.handle_event(&down(50.0, 20.0));
        assert_eq!(engine.state(), EngineState::Armed);
    }

    #[test]
    fn test_touch_drives_engine() {
        let mut engine = engine(horizontal_rail().with_immediate(true));
        let touch = |x: f64| TouchPoint {
            id: 4,
            point: PointerPoint::at(x, 0.0),
        };

        engine.handle_event(&NativeEvent::TouchStart {
            touches: vec![touch(0.0)],
        });
        engine.handle_event(&NativeEvent::TouchMove {
            touches: vec![touch(230.0)],
        });
        engine.handle_event(&NativeEvent::TouchEnd { touches: vec![] });

        assert_eq!(engine.position(), Point::new(300.0, 0.0));
        assert_eq!(engine.observer().snap_ends(), vec![2]);
    }

    #[test]
    fn test_destroy_cancels_timer_and_listeners() {
        let mut engine = engine(horizontal_rail());
        engine.snap_to(SnapRequest::index(2));
        engine.on_frame();
        let events_before = engine.observer().events.len();

        engine.destroy();
        assert!(engine.is_destroyed());
        assert!(!engine.timer().is_running());
        assert!(!engine.input().is_attached());

        engine.on_frame();
        engine.handle_event(&down(0.0, 0.0));
        engine.snap_to(SnapRequest::index(1));
        assert_eq!(engine.observer().events.len(), events_before);
        assert!(engine.observer().snap_ends().is_empty());

        engine.destroy();
    }

    struct SharedTimer(Rc<Cell<bool>>);

    impl FrameTimer for SharedTimer {
        fn start(&mut self, _interval: Duration) {
            self.0.set(true);
        }

        fn cancel(&mut self) {
            self.0.set(false);
        }

        fn is_running(&self) -> bool {
            self.0.get()
        }
    }

    #[test]
    fn test_drop_cancels_pending_timer() {
        let running = Rc::new(Cell::new(false));
        let mut engine = DragEngine::new(
            horizontal_rail(),
            (),
            SharedTimer(Rc::clone(&running)),
        )
        .unwrap();

        engine.snap_to(SnapRequest::index(1));
        assert!(running.get());

        drop(engine);
        assert!(!running.get());
    }

    #[test]
    fn test_engines_are_independent() {
        let mut a = engine(horizontal_rail());
        let mut b = engine(horizontal_rail());
        assert_ne!(a.id(), b.id());

        a.snap_to(SnapRequest::index(2));
        b.handle_event(&down(0.0, 0.0));
        b.handle_event(&mv(50.0, 0.0));

        assert_eq!(a.state(), EngineState::Animating);
        assert_eq!(b.state(), EngineState::Dragging);
        assert!(b.observer().snap_starts().is_empty());
    }
}
