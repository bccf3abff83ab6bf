//! Input state management for mouse and touch events.
//!
//! Mouse and touch samples are reduced to one surface-space point before they
//! reach the gesture engine, so gestures never care which device produced them.

use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

// Use web_time for WASM compatibility
#[cfg(target_arch = "wasm32")]
use web_time::Instant;
#[cfg(not(target_arch = "wasm32"))]
use std::time::Instant;

/// Lifecycle phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    Down,
    Move,
    Up,
    /// Pointer left the editing surface.
    Leave,
    /// The platform aborted the touch sequence.
    Cancel,
}

impl PointerPhase {
    /// Whether this phase terminates the current gesture.
    pub fn ends_gesture(self) -> bool {
        matches!(self, PointerPhase::Up | PointerPhase::Leave | PointerPhase::Cancel)
    }
}

/// Raw pointer coordinates as delivered by the host, in client space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerSample {
    Mouse { client: Point },
    /// Active touch points; only the first one drives gestures.
    Touch { touches: Vec<Point> },
}

impl PointerSample {
    pub fn mouse(x: f64, y: f64) -> Self {
        PointerSample::Mouse {
            client: Point::new(x, y),
        }
    }

    pub fn touch(x: f64, y: f64) -> Self {
        PointerSample::Touch {
            touches: vec![Point::new(x, y)],
        }
    }

    /// Client position of the sample, `None` for a touch event without touches.
    pub fn position(&self) -> Option<Point> {
        match self {
            PointerSample::Mouse { client } => Some(*client),
            PointerSample::Touch { touches } => touches.first().copied(),
        }
    }
}

/// A unified pointer event.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    pub phase: PointerPhase,
    pub sample: PointerSample,
}

impl PointerEvent {
    pub fn new(phase: PointerPhase, sample: PointerSample) -> Self {
        Self { phase, sample }
    }
}

/// Double-click detection constants.
const DOUBLE_CLICK_TIME_MS: u128 = 500;
const DOUBLE_CLICK_DISTANCE: f64 = 5.0;

/// Tracks pointer state across events.
#[derive(Debug, Clone)]
pub struct InputState {
    /// Client-space position of the surface's top-left corner.
    pub surface_origin: Vec2,
    /// Whether a pointer is currently pressed.
    pub is_pressed: bool,
    /// Last press time for double-click detection.
    last_click_time: Option<Instant>,
    /// Last press position for double-click detection.
    last_click_position: Option<Point>,
    /// Whether the latest press completed a double-click.
    double_click_detected: bool,
}

impl Default for InputState {
    fn default() -> Self {
        Self {
            surface_origin: Vec2::ZERO,
            is_pressed: false,
            last_click_time: None,
            last_click_position: None,
            double_click_detected: false,
        }
    }
}

impl InputState {
    /// Create a new input state.
    pub fn new() -> Self {
        Self::default()
    }

    /// Convert a client-space point to surface coordinates.
    pub fn to_surface(&self, client: Point) -> Point {
        client - self.surface_origin
    }

    /// Record a pointer event and return its surface position.
    ///
    /// Returns `None` when the event carries no usable position; such events
    /// must not reach the gesture engine, except that ending phases still end.
    pub fn handle_pointer_event(&mut self, event: &PointerEvent) -> Option<Point> {
        if event.phase.ends_gesture() {
            self.is_pressed = false;
        }
        let position = self.to_surface(event.sample.position()?);

        match event.phase {
            PointerPhase::Down => {
                self.is_pressed = true;
                self.detect_double_click(position);
            }
            PointerPhase::Move | PointerPhase::Up | PointerPhase::Leave | PointerPhase::Cancel => {
                self.double_click_detected = false;
            }
        }
        Some(position)
    }

    fn detect_double_click(&mut self, position: Point) {
        let now = Instant::now();
        self.double_click_detected = false;
        if let (Some(last_time), Some(last_pos)) = (self.last_click_time, self.last_click_position) {
            let elapsed = now.duration_since(last_time).as_millis();
            let distance = (position - last_pos).hypot();
            if elapsed < DOUBLE_CLICK_TIME_MS && distance < DOUBLE_CLICK_DISTANCE {
                self.double_click_detected = true;
                // Reset to prevent triple-click being detected as another double-click
                self.last_click_time = None;
                self.last_click_position = None;
                return;
            }
        }
        self.last_click_time = Some(now);
        self.last_click_position = Some(position);
    }

    /// Check if the latest press completed a double-click.
    pub fn is_double_click(&self) -> bool {
        self.double_click_detected
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn down(x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(PointerPhase::Down, PointerSample::mouse(x, y))
    }

    #[test]
    fn test_touch_uses_first_point() {
        let sample = PointerSample::Touch {
            touches: vec![Point::new(3.0, 4.0), Point::new(90.0, 90.0)],
        };
        assert_eq!(sample.position(), Some(Point::new(3.0, 4.0)));
    }

    #[test]
    fn test_empty_touch_has_no_position() {
        let sample = PointerSample::Touch { touches: vec![] };
        assert_eq!(sample.position(), None);

        let mut input = InputState::new();
        let event = PointerEvent::new(PointerPhase::Move, sample);
        assert_eq!(input.handle_pointer_event(&event), None);
    }

    #[test]
    fn test_mouse_and_touch_agree() {
        let mut input = InputState::new();
        let mouse = input.handle_pointer_event(&PointerEvent::new(
            PointerPhase::Move,
            PointerSample::mouse(12.0, 34.0),
        ));
        let touch = input.handle_pointer_event(&PointerEvent::new(
            PointerPhase::Move,
            PointerSample::touch(12.0, 34.0),
        ));
        assert_eq!(mouse, touch);
    }

    #[test]
    fn test_surface_origin_offset() {
        let mut input = InputState::new();
        input.surface_origin = Vec2::new(20.0, 50.0);
        let position = input.handle_pointer_event(&down(120.0, 150.0));
        assert_eq!(position, Some(Point::new(100.0, 100.0)));
        assert!(input.is_pressed);
    }

    #[test]
    fn test_ending_phases() {
        assert!(PointerPhase::Up.ends_gesture());
        assert!(PointerPhase::Leave.ends_gesture());
        assert!(PointerPhase::Cancel.ends_gesture());
        assert!(!PointerPhase::Down.ends_gesture());
        assert!(!PointerPhase::Move.ends_gesture());

        let mut input = InputState::new();
        input.handle_pointer_event(&down(0.0, 0.0));
        input.handle_pointer_event(&PointerEvent::new(
            PointerPhase::Cancel,
            PointerSample::Touch { touches: vec![] },
        ));
        assert!(!input.is_pressed);
    }

    #[test]
    fn test_double_click_detection() {
        let mut input = InputState::new();

        input.handle_pointer_event(&down(100.0, 100.0));
        assert!(!input.is_double_click());
        input.handle_pointer_event(&PointerEvent::new(PointerPhase::Up, PointerSample::mouse(100.0, 100.0)));

        input.handle_pointer_event(&down(101.0, 100.0));
        assert!(input.is_double_click());

        // A third press starts a new sequence.
        input.handle_pointer_event(&down(101.0, 100.0));
        assert!(!input.is_double_click());
    }

    #[test]
    fn test_double_click_too_far() {
        let mut input = InputState::new();
        input.handle_pointer_event(&down(100.0, 100.0));
        input.handle_pointer_event(&down(200.0, 200.0));
        assert!(!input.is_double_click());
    }
}
