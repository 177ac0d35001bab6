//! SnapDrag Core Library
//!
//! Element-agnostic drag-to-snap interaction engine: pointer input
//! normalization, axis locking, resistance-gated activation, boundary
//! clamping, snap target resolution and frame-paced snap animation.

pub mod animation;
pub mod config;
pub mod engine;
pub mod input;
pub mod native;
pub mod snap;

pub use animation::{AnimationRun, FrameTimer, ManualTimer, Tick};
pub use config::{
    AxisLock, Boundary, ConfigError, ConfigResult, DragConfig, FrameCadence, Resistance,
    SnapPoint, TriggerFn,
};
pub use engine::{
    DragEngine, DragObserver, EngineId, EngineState, ObserverEvent, RecordingObserver,
    SnapRequest,
};
pub use input::{
    DragSignal, MouseButton, NativeEvent, PointerInputAdapter, PointerPoint, TouchPoint,
};
pub use native::WinitTranslator;
pub use snap::{Release, SnapResolver, nearest_snap_index, snap_distance};
