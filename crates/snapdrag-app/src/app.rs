//! Windowed demo: one draggable element on a snap rail.

use crate::timer::DeadlineTimer;
use kurbo::Point;
use snapdrag_core::{
    Boundary, ConfigError, DragConfig, DragEngine, DragObserver, Resistance, SnapPoint,
    SnapRequest, WinitTranslator,
};
use std::time::Instant;
use thiserror::Error;
use winit::application::ApplicationHandler;
use winit::dpi::LogicalSize;
use winit::event::{ElementState, WindowEvent};
use winit::event_loop::{ActiveEventLoop, ControlFlow, EventLoop};
use winit::keyboard::Key;
use winit::window::{Window, WindowId};

/// Demo errors.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid drag config: {0}")]
    Config(#[from] ConfigError),
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Event loop error: {0}")]
    EventLoop(#[from] winit::error::EventLoopError),
}

/// Application configuration.
#[derive(Debug, Clone)]
pub struct AppConfig {
    pub title: String,
    pub width: u32,
    pub height: u32,
    pub drag: DragConfig,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            title: "SnapDrag".to_string(),
            width: 480,
            height: 640,
            drag: bottom_sheet(),
        }
    }
}

impl AppConfig {
    /// Load the drag settings from a JSON file, keeping default window settings.
    pub fn from_file(path: &str) -> Result<Self, AppError> {
        let json = std::fs::read_to_string(path)?;
        let drag = DragConfig::from_json(&json)?;
        Ok(Self {
            drag,
            ..Self::default()
        })
    }
}

/// A vertical sheet with collapsed, half and full stops.
fn bottom_sheet() -> DragConfig {
    DragConfig::new()
        .with_vertical_only()
        .with_resistance(Resistance {
            x: None,
            y: Some(8.0),
        })
        .with_frame(24.0, 16)
        .with_initial_position(Point::new(0.0, 520.0))
        .with_boundaries(Boundary {
            top: Some(80.0),
            bottom: Some(520.0),
            ..Default::default()
        })
        .with_snap_points(vec![
            SnapPoint::at_y(520.0),
            SnapPoint::at_y(300.0),
            SnapPoint::at_y(80.0),
        ])
}

/// Observer that logs callbacks and remembers what the title should show.
#[derive(Debug, Default)]
struct TitleObserver {
    position: Point,
    snapping: Option<usize>,
    dirty: bool,
}

impl TitleObserver {
    fn title(&self, base: &str) -> String {
        match self.snapping {
            Some(index) => format!(
                "{} - ({:.0}, {:.0}) snapping to {}",
                base, self.position.x, self.position.y, index
            ),
            None => format!("{} - ({:.0}, {:.0})", base, self.position.x, self.position.y),
        }
    }
}

impl DragObserver for TitleObserver {
    fn on_movement(&mut self, position: Point) {
        log::trace!("Movement: {:?}", position);
        self.position = position;
        self.dirty = true;
    }

    fn on_snap_start(&mut self, index: usize) {
        log::info!("Snap start: {}", index);
        self.snapping = Some(index);
        self.dirty = true;
    }

    fn on_snap_end(&mut self, index: usize) {
        log::info!("Snap end: {}", index);
        self.snapping = None;
        self.dirty = true;
    }
}

/// Main application state.
pub struct App {
    config: AppConfig,
    window: Option<Window>,
    engine: DragEngine<TitleObserver, DeadlineTimer>,
    translator: WinitTranslator,
}

impl App {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        let observer = TitleObserver {
            position: config.drag.initial_position,
            ..Default::default()
        };
        let engine = DragEngine::new(config.drag.clone(), observer, DeadlineTimer::new())?;
        Ok(Self {
            config,
            window: None,
            engine,
            translator: WinitTranslator::new(),
        })
    }

    /// Run the event loop until the window closes.
    pub fn run(config: AppConfig) -> Result<(), AppError> {
        let event_loop = EventLoop::new()?;
        let mut app = App::new(config)?;
        event_loop.run_app(&mut app)?;
        Ok(())
    }

    fn handle_key(&mut self, key: &Key) {
        let Key::Character(text) = key else {
            return;
        };
        match text.as_str() {
            "d" | "D" => {
                let enabled = !self.engine.config().drag_enabled;
                log::info!("Drag enabled: {}", enabled);
                self.engine.set_drag_enabled(enabled);
            }
            digit => {
                if let Ok(n) = digit.parse::<usize>() {
                    if n > 0 {
                        self.engine.snap_to(SnapRequest::index(n - 1));
                    }
                }
            }
        }
    }

    fn refresh_title(&mut self) {
        let observer = self.engine.observer_mut();
        if !observer.dirty {
            return;
        }
        observer.dirty = false;
        let title = observer.title(&self.config.title);
        if let Some(window) = &self.window {
            window.set_title(&title);
        }
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        log::info!("Creating window...");
        let attrs = Window::default_attributes()
            .with_title(&self.config.title)
            .with_inner_size(LogicalSize::new(self.config.width, self.config.height));
        match event_loop.create_window(attrs) {
            Ok(window) => {
                self.window = Some(window);
                self.engine.observer_mut().dirty = true;
                self.refresh_title();
            }
            Err(e) => {
                log::error!("Failed to create window: {}", e);
                event_loop.exit();
            }
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                self.engine.destroy();
                event_loop.exit();
                return;
            }
            WindowEvent::KeyboardInput { event: key, .. } => {
                if key.state == ElementState::Pressed && !key.repeat {
                    self.handle_key(&key.logical_key);
                }
            }
            _ => {
                if let Some(native) = self.translator.translate(&event) {
                    self.engine.handle_event(&native);
                }
            }
        }
        self.refresh_title();
    }

    fn about_to_wait(&mut self, event_loop: &ActiveEventLoop) {
        let due = self.engine.timer_mut().due(Instant::now());
        for _ in 0..due {
            self.engine.on_frame();
        }
        self.refresh_title();

        match self.engine.timer().next_deadline() {
            Some(deadline) => event_loop.set_control_flow(ControlFlow::WaitUntil(deadline)),
            None => event_loop.set_control_flow(ControlFlow::Wait),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_sheet_config_is_valid() {
        let config = AppConfig::default();
        assert!(config.drag.validate().is_ok());
        assert_eq!(config.drag.snap_points.len(), 3);
    }

    #[test]
    fn test_title_reflects_snap() {
        let mut observer = TitleObserver::default();
        observer.on_movement(Point::new(0.0, 300.4));
        assert_eq!(observer.title("SnapDrag"), "SnapDrag - (0, 300)");
        observer.on_snap_start(2);
        assert_eq!(observer.title("SnapDrag"), "SnapDrag - (0, 300) snapping to 2");
        observer.on_snap_end(2);
        assert!(observer.snapping.is_none());
        assert!(observer.dirty);
    }

    #[test]
    fn test_carousel_config_parses() {
        let drag = DragConfig::from_json(include_str!("../configs/carousel.json")).unwrap();
        assert!(drag.horizontal_only);
        assert_eq!(drag.snap_points.len(), 4);
        assert!(!drag.snap_points[3].draggable);
    }

    #[test]
    fn test_missing_config_file() {
        let result = AppConfig::from_file("/nonexistent/snapdrag.json");
        assert!(matches!(result, Err(AppError::Io(_))));
    }
}
