//! Editing session: the gesture engine plus everything around it.

use crate::config::EditorConfig;
use crate::controls::Control;
use crate::engine::GestureEngine;
use crate::error::{EditorError, EditorResult};
use crate::export::{ExportRequest, ExportedImage, Exporter};
use crate::input::{InputState, PointerEvent, PointerPhase};
use crate::shapes::{
    FlipAxis, GestureKind, GestureTarget, ObjectId, Sticker, StickerId, TextId, TextKey, TextUpdate,
};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};

/// Opaque reference to the uploaded background image (usually a data URL).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BackgroundImage(String);

impl BackgroundImage {
    /// Wrap a reference. Empty references are rejected.
    pub fn new(reference: impl Into<String>) -> EditorResult<Self> {
        let reference = reference.into();
        if reference.trim().is_empty() {
            return Err(EditorError::EmptyBackground);
        }
        Ok(Self(reference))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

/// Read-only view of a session for rendering.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub revision: u64,
    pub background: Option<BackgroundImage>,
    pub mascot_url: String,
    pub stickers: Vec<Sticker>,
    pub compact: bool,
    pub preview: bool,
    /// Text label open for in-place editing.
    pub editing: Option<TextKey>,
}

impl SessionSnapshot {
    /// Serialize the snapshot to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }
}

/// One editing session. Nothing here outlives a page load.
#[derive(Debug, Clone)]
pub struct Session {
    config: EditorConfig,
    engine: GestureEngine,
    input: InputState,
    background: Option<BackgroundImage>,
    compact: bool,
    preview: bool,
    editing: Option<TextKey>,
    revision: u64,
}

impl Default for Session {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Session {
    /// Create a session; seeds one sticker unless the config says otherwise.
    pub fn new(config: EditorConfig) -> Self {
        let mut engine = GestureEngine::new();
        if config.initial_sticker {
            engine.add_sticker();
        }
        Self {
            config,
            engine,
            input: InputState::new(),
            background: None,
            compact: false,
            preview: false,
            editing: None,
            revision: 0,
        }
    }

    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// The gesture engine, for read access to stickers and texts.
    pub fn engine(&self) -> &GestureEngine {
        &self.engine
    }

    pub fn stickers(&self) -> &[Sticker] {
        self.engine.stickers()
    }

    /// Counter bumped by every call that changed state.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    /// Copy of everything the rendering surface needs.
    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            revision: self.revision,
            background: self.background.clone(),
            mascot_url: self.config.mascot_url.clone(),
            stickers: self.engine.stickers().to_vec(),
            compact: self.compact,
            preview: self.preview,
            editing: self.editing,
        }
    }

    fn mark(&mut self, changed: bool) -> bool {
        if changed {
            self.revision += 1;
        }
        changed
    }

    // --- Background ---

    /// Replace the background image. An empty reference leaves state untouched.
    pub fn set_background(&mut self, reference: impl Into<String>) -> EditorResult<()> {
        let background = BackgroundImage::new(reference).inspect_err(|e| {
            log::warn!("Rejected background image: {}", e);
        })?;
        log::info!("Background image set ({} bytes)", background.as_str().len());
        self.background = Some(background);
        self.mark(true);
        Ok(())
    }

    pub fn clear_background(&mut self) {
        let changed = self.background.take().is_some();
        self.mark(changed);
    }

    pub fn background(&self) -> Option<&BackgroundImage> {
        self.background.as_ref()
    }

    // --- Display modes ---

    /// Update compact mode from the viewport width. Returns the new mode.
    pub fn set_viewport_width(&mut self, width: f64) -> bool {
        let compact = width <= self.config.compact_breakpoint;
        if compact != self.compact {
            log::debug!("Viewport {}px, compact layout {}", width, compact);
            self.compact = compact;
            if compact {
                self.finish_text_edit();
            }
            self.mark(true);
        }
        self.compact
    }

    pub fn is_compact(&self) -> bool {
        self.compact
    }

    /// Show or hide the on-object controls.
    pub fn set_preview(&mut self, preview: bool) {
        if preview == self.preview {
            return;
        }
        self.preview = preview;
        if preview {
            self.finish_text_edit();
        }
        self.mark(true);
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.set_preview(!self.preview);
        self.preview
    }

    pub fn is_preview(&self) -> bool {
        self.preview
    }

    /// Client-space offset of the surface's top-left corner.
    pub fn set_surface_origin(&mut self, origin: Vec2) {
        self.input.surface_origin = origin;
    }

    // --- Gestures ---

    /// Start a gesture on `target_id`. See [`GestureEngine::begin_gesture`].
    pub fn begin_gesture(&mut self, target_id: ObjectId, pointer: Point, kind: GestureKind) -> Option<GestureTarget> {
        let target = self.engine.begin_gesture(target_id, pointer, kind);
        self.mark(true);
        target
    }

    pub fn update_gesture(&mut self, pointer: Point) -> bool {
        let changed = self.engine.update_gesture(pointer);
        self.mark(changed)
    }

    pub fn end_gesture(&mut self) -> bool {
        let ended = self.engine.end_gesture();
        self.mark(ended)
    }

    /// Which object, if any, is engaged in a gesture.
    pub fn active_target(&self) -> Option<GestureTarget> {
        self.engine.active_target()
    }

    /// Controls the surface should draw on `target_id`, in layout order.
    ///
    /// Empty for an unknown object. In preview only the body remains.
    pub fn available_controls(&self, target_id: ObjectId) -> Vec<Control> {
        let Some(target) = self.engine.resolve(target_id) else {
            return Vec::new();
        };
        Control::all()
            .iter()
            .copied()
            .filter(|c| c.applies_to(target))
            .filter(|c| !self.preview || c.available_in_preview())
            .collect()
    }

    /// Act on a press of `control` on the object `target_id`.
    ///
    /// Returns false if nothing happened: unknown object, a control the object
    /// does not offer, or a hidden control in preview mode.
    pub fn press_control(&mut self, target_id: ObjectId, control: Control, pointer: Point) -> bool {
        if self.preview && !control.available_in_preview() {
            return false;
        }
        let Some(target) = self.engine.resolve(target_id) else {
            log::debug!("Press on unknown object {}", target_id);
            return false;
        };
        if !control.applies_to(target) {
            return false;
        }
        if let Some(kind) = control.gesture() {
            return self.begin_gesture(target_id, pointer, kind).is_some();
        }
        if let (Some(axis), GestureTarget::Sticker(id)) = (control.flip_axis(), target) {
            return self.toggle_flip(id, axis);
        }
        match (control, target) {
            (Control::Delete, GestureTarget::Sticker(id)) => self.delete_sticker(id),
            (Control::Delete, GestureTarget::Text(key)) => self.delete_text(key.sticker, key.text),
            _ => false,
        }
    }

    /// Route a unified pointer event.
    ///
    /// `target` is the object and control under the pointer as resolved by the
    /// surface; it is only consulted on `Down`. Up, leave and cancel always end
    /// the gesture, even when the event carries no coordinates.
    pub fn handle_pointer(&mut self, event: &PointerEvent, target: Option<(ObjectId, Control)>) -> bool {
        let position = self.input.handle_pointer_event(event);
        if event.phase.ends_gesture() {
            return self.end_gesture();
        }
        let Some(position) = position else {
            return false;
        };
        match event.phase {
            PointerPhase::Down => {
                let Some((id, control)) = target else {
                    return false;
                };
                let pressed = self.press_control(id, control, position);
                if control == Control::Body && self.input.is_double_click() {
                    if let Some(GestureTarget::Text(key)) = self.engine.resolve(id) {
                        self.begin_text_edit(key);
                    }
                }
                pressed
            }
            // Hover moves with nothing pressed never drive a gesture.
            PointerPhase::Move if !self.input.is_pressed => false,
            PointerPhase::Move => self.update_gesture(position),
            PointerPhase::Up | PointerPhase::Leave | PointerPhase::Cancel => false,
        }
    }

    // --- Objects ---

    pub fn toggle_flip(&mut self, sticker_id: StickerId, axis: FlipAxis) -> bool {
        let changed = self.engine.toggle_flip(sticker_id, axis);
        self.mark(changed)
    }

    pub fn add_sticker(&mut self) -> StickerId {
        let id = self.engine.add_sticker();
        self.mark(true);
        id
    }

    pub fn delete_sticker(&mut self, sticker_id: StickerId) -> bool {
        let removed = self.engine.delete_sticker(sticker_id).is_some();
        if removed && self.editing.is_some_and(|key| key.sticker == sticker_id) {
            self.editing = None;
        }
        self.mark(removed)
    }

    pub fn add_text(&mut self, sticker_id: StickerId, is_compact: bool) -> Option<TextId> {
        let id = self.engine.add_text(sticker_id, is_compact);
        self.mark(id.is_some());
        id
    }

    /// Add a text label to the first sticker, styled for the current layout.
    pub fn add_text_to_primary(&mut self) -> Option<TextKey> {
        let sticker = self.engine.stickers().first()?.id;
        let text = self.add_text(sticker, self.compact)?;
        Some(TextKey { sticker, text })
    }

    pub fn update_text(&mut self, sticker_id: StickerId, text_id: TextId, update: TextUpdate) -> bool {
        if update.is_empty() {
            return false;
        }
        let changed = self.engine.update_text(sticker_id, text_id, update);
        self.mark(changed)
    }

    pub fn delete_text(&mut self, sticker_id: StickerId, text_id: TextId) -> bool {
        let removed = self.engine.delete_text(sticker_id, text_id).is_some();
        if removed && self.editing == Some(TextKey { sticker: sticker_id, text: text_id }) {
            self.editing = None;
        }
        self.mark(removed)
    }

    // --- In-place text editing ---

    /// Open a text label for in-place editing.
    ///
    /// Compact layouts edit text in a separate field and preview mode has no
    /// controls, so both refuse.
    pub fn begin_text_edit(&mut self, key: TextKey) -> bool {
        if self.compact || self.preview || self.engine.text(key).is_none() {
            return false;
        }
        if self.editing == Some(key) {
            return true;
        }
        log::debug!("Editing text {}", key.text);
        self.editing = Some(key);
        self.mark(true)
    }

    /// Close in-place editing, returning the label that was open.
    pub fn finish_text_edit(&mut self) -> Option<TextKey> {
        let key = self.editing.take();
        self.mark(key.is_some());
        key
    }

    pub fn editing(&self) -> Option<TextKey> {
        self.editing
    }

    // --- Export ---

    /// Ask `exporter` to rasterize the current composition.
    ///
    /// The exporter receives a snapshot in preview form with no open text edit.
    /// Session state is never modified, whether the export succeeds or not.
    pub fn export(&self, exporter: &dyn Exporter) -> EditorResult<ExportedImage> {
        if self.background.is_none() {
            return Err(EditorError::NoBackground);
        }
        let request = ExportRequest {
            file_name: self.config.export_file_name.clone(),
            pixel_ratio: self.config.export_pixel_ratio,
            hide_controls: true,
        };
        let mut snapshot = self.snapshot();
        if request.hide_controls {
            snapshot.preview = true;
            snapshot.editing = None;
        }
        exporter
            .export(&snapshot, &request)
            .inspect(|image| log::info!("Exported {}", image.file_name))
            .inspect_err(|e| log::error!("Failed to export meme: {}", e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::PointerSample;
    use crate::shapes::Overlay;
    use std::cell::Cell;

    struct FakeExporter {
        fail: bool,
        calls: Cell<usize>,
    }

    impl Exporter for FakeExporter {
        fn export(&self, snapshot: &SessionSnapshot, request: &ExportRequest) -> EditorResult<ExportedImage> {
            self.calls.set(self.calls.get() + 1);
            assert!(request.hide_controls);
            assert!(snapshot.preview);
            if self.fail {
                return Err(EditorError::Export("canvas tainted".to_string()));
            }
            Ok(ExportedImage {
                file_name: request.file_name.clone(),
                data_url: format!("data:image/png;base64,{}", snapshot.stickers.len()),
            })
        }
    }

    fn mouse(phase: PointerPhase, x: f64, y: f64) -> PointerEvent {
        PointerEvent::new(phase, PointerSample::mouse(x, y))
    }

    fn first_sticker(session: &Session) -> StickerId {
        session.stickers()[0].id()
    }

    #[test]
    fn test_new_session_has_one_sticker() {
        let session = Session::default();
        assert_eq!(session.stickers().len(), 1);
        assert!(session.background().is_none());

        let empty = Session::new(EditorConfig {
            initial_sticker: false,
            ..EditorConfig::default()
        });
        assert!(empty.stickers().is_empty());
    }

    #[test]
    fn test_pointer_drag_with_touch() {
        let mut session = Session::default();
        let id = first_sticker(&session);

        let down = PointerEvent::new(PointerPhase::Down, PointerSample::touch(10.0, 10.0));
        assert!(session.handle_pointer(&down, Some((id, Control::Body))));
        let moved = PointerEvent::new(PointerPhase::Move, PointerSample::touch(30.0, 5.0));
        assert!(session.handle_pointer(&moved, None));
        let end = PointerEvent::new(PointerPhase::Up, PointerSample::Touch { touches: vec![] });
        assert!(session.handle_pointer(&end, None));

        let sticker = &session.stickers()[0];
        assert_eq!(sticker.position, Point::new(120.0, 95.0));
        assert!(sticker.gesture().is_none());
    }

    #[test]
    fn test_leave_ends_gesture() {
        let mut session = Session::default();
        let id = first_sticker(&session);

        session.handle_pointer(&mouse(PointerPhase::Down, 0.0, 0.0), Some((id, Control::ResizeHandle)));
        assert_eq!(session.active_target(), Some(GestureTarget::Sticker(id)));
        session.handle_pointer(&mouse(PointerPhase::Leave, 500.0, 500.0), None);
        assert_eq!(session.active_target(), None);

        // Moves after leaving do nothing.
        assert!(!session.handle_pointer(&mouse(PointerPhase::Move, 900.0, 0.0), None));
        assert!((session.stickers()[0].scale - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_cancel_ends_gesture() {
        let mut session = Session::default();
        let id = first_sticker(&session);
        session.handle_pointer(&mouse(PointerPhase::Down, 0.0, 0.0), Some((id, Control::RotateHandle)));
        let cancel = PointerEvent::new(PointerPhase::Cancel, PointerSample::Touch { touches: vec![] });
        assert!(session.handle_pointer(&cancel, None));
        assert_eq!(session.active_target(), None);
    }

    #[test]
    fn test_surface_origin_applies() {
        let mut session = Session::default();
        let id = first_sticker(&session);
        session.set_surface_origin(Vec2::new(100.0, 100.0));
        session.handle_pointer(&mouse(PointerPhase::Down, 300.0, 250.0), Some((id, Control::RotateHandle)));
        // Surface point (200, 150) lies right of the (150, 150) pivot.
        session.handle_pointer(&mouse(PointerPhase::Move, 250.0, 300.0), None);
        assert!((session.stickers()[0].rotation - 90.0).abs() < 1e-9);
    }

    #[test]
    fn test_controls_dispatch() {
        let mut session = Session::default();
        let id = first_sticker(&session);
        let key = session.add_text_to_primary().unwrap();

        assert!(session.press_control(id, Control::FlipX, Point::ZERO));
        assert!(session.stickers()[0].flip_x);
        assert!(!session.press_control(key.text, Control::FlipY, Point::ZERO));

        assert!(session.press_control(key.text, Control::Delete, Point::ZERO));
        assert!(session.stickers()[0].texts.is_empty());

        assert!(session.press_control(id, Control::Delete, Point::ZERO));
        assert!(session.stickers().is_empty());
        assert!(!session.press_control(id, Control::Body, Point::ZERO));
    }

    #[test]
    fn test_preview_hides_controls_but_allows_drag() {
        let mut session = Session::default();
        let id = first_sticker(&session);
        assert!(session.toggle_preview());

        assert!(!session.press_control(id, Control::Delete, Point::ZERO));
        assert!(!session.press_control(id, Control::ResizeHandle, Point::ZERO));
        assert!(!session.press_control(id, Control::FlipX, Point::ZERO));
        assert_eq!(session.stickers().len(), 1);

        assert!(session.press_control(id, Control::Body, Point::ZERO));
        session.update_gesture(Point::new(5.0, 5.0));
        assert_eq!(session.stickers()[0].position, Point::new(105.0, 105.0));
    }

    #[test]
    fn test_move_without_press_is_ignored() {
        let mut session = Session::default();
        let id = first_sticker(&session);
        session.begin_gesture(id, Point::ZERO, GestureKind::Drag);

        // No pointer went down through the input layer, so moves are hover.
        assert!(!session.handle_pointer(&mouse(PointerPhase::Move, 40.0, 40.0), None));
        assert_eq!(session.stickers()[0].position, Point::new(100.0, 100.0));

        session.handle_pointer(&mouse(PointerPhase::Down, 0.0, 0.0), Some((id, Control::Body)));
        assert!(session.handle_pointer(&mouse(PointerPhase::Move, 40.0, 40.0), None));
        assert_eq!(session.stickers()[0].position, Point::new(140.0, 140.0));
    }

    #[test]
    fn test_available_controls() {
        let mut session = Session::default();
        let id = first_sticker(&session);
        let key = session.add_text_to_primary().unwrap();

        assert_eq!(session.available_controls(id), Control::all().to_vec());
        assert_eq!(
            session.available_controls(key.text),
            vec![Control::Body, Control::ResizeHandle, Control::RotateHandle, Control::Delete]
        );

        session.set_preview(true);
        assert_eq!(session.available_controls(id), vec![Control::Body]);
        assert!(session.available_controls(uuid::Uuid::new_v4()).is_empty());
    }

    #[test]
    fn test_compact_breakpoint_and_text_defaults() {
        let mut session = Session::default();
        assert!(!session.set_viewport_width(1024.0));
        assert!(session.set_viewport_width(768.0));

        let key = session.add_text_to_primary().unwrap();
        let text = session.engine().text(key).unwrap();
        assert_eq!(text.content, "Edit text below");
        assert!((text.style.stroke_width - 1.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_text_edit_gating() {
        let mut session = Session::default();
        let key = session.add_text_to_primary().unwrap();

        assert!(session.begin_text_edit(key));
        assert_eq!(session.editing(), Some(key));

        session.set_preview(true);
        assert_eq!(session.editing(), None);
        assert!(!session.begin_text_edit(key));
        session.set_preview(false);

        session.set_viewport_width(400.0);
        assert!(!session.begin_text_edit(key));
        session.set_viewport_width(1200.0);

        assert!(session.begin_text_edit(key));
        session.delete_text(key.sticker, key.text);
        assert_eq!(session.editing(), None);
    }

    #[test]
    fn test_double_click_opens_text_edit() {
        let mut session = Session::default();
        let key = session.add_text_to_primary().unwrap();
        let target = Some((key.text, Control::Body));

        session.handle_pointer(&mouse(PointerPhase::Down, 100.0, 100.0), target);
        session.handle_pointer(&mouse(PointerPhase::Up, 100.0, 100.0), None);
        assert_eq!(session.editing(), None);
        session.handle_pointer(&mouse(PointerPhase::Down, 100.0, 100.0), target);
        assert_eq!(session.editing(), Some(key));
    }

    #[test]
    fn test_delete_sticker_closes_edit() {
        let mut session = Session::default();
        let key = session.add_text_to_primary().unwrap();
        session.begin_text_edit(key);
        assert!(session.delete_sticker(key.sticker));
        assert_eq!(session.editing(), None);
        assert!(!session.update_text(key.sticker, key.text, TextUpdate::content("wagmi")));
    }

    #[test]
    fn test_background_rejects_empty() {
        let mut session = Session::default();
        let before = session.revision();
        assert!(matches!(session.set_background("  "), Err(EditorError::EmptyBackground)));
        assert_eq!(session.revision(), before);
        assert!(session.background().is_none());

        session.set_background("data:image/png;base64,AAAA").unwrap();
        assert_eq!(session.background().unwrap().as_str(), "data:image/png;base64,AAAA");
        assert!(session.revision() > before);
    }

    #[test]
    fn test_export_failure_leaves_state() {
        let mut session = Session::default();
        let exporter = FakeExporter {
            fail: true,
            calls: Cell::new(0),
        };
        assert!(matches!(session.export(&exporter), Err(EditorError::NoBackground)));
        assert_eq!(exporter.calls.get(), 0);

        session.set_background("data:image/png;base64,AAAA").unwrap();
        let before = session.snapshot().to_json().unwrap();
        assert!(matches!(session.export(&exporter), Err(EditorError::Export(_))));
        assert_eq!(session.snapshot().to_json().unwrap(), before);

        let ok = FakeExporter {
            fail: false,
            calls: Cell::new(0),
        };
        let image = session.export(&ok).unwrap();
        assert_eq!(image.file_name, "baba-meme.png");
        assert_eq!(ok.calls.get(), 1);
    }

    #[test]
    fn test_revision_tracks_changes() {
        let mut session = Session::default();
        let start = session.revision();
        assert!(!session.end_gesture());
        assert!(!session.update_gesture(Point::new(1.0, 1.0)));
        assert_eq!(session.revision(), start);

        let id = session.add_sticker();
        assert_eq!(session.revision(), start + 1);
        session.toggle_flip(id, FlipAxis::Y);
        assert_eq!(session.revision(), start + 2);
        assert_eq!(session.snapshot().revision, start + 2);
    }

    #[test]
    fn test_snapshot_serializes() {
        let mut session = Session::default();
        session.add_text_to_primary();
        let json = session.snapshot().to_json().unwrap();
        let snapshot: SessionSnapshot = serde_json::from_str(&json).unwrap();
        assert_eq!(snapshot.stickers.len(), 1);
        assert_eq!(snapshot.stickers[0].texts.len(), 1);
        assert_eq!(snapshot.mascot_url, "https://i.imgur.com/ZvW1pC3.png");
    }
}
