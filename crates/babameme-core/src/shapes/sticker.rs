//! Mascot sticker overlay.

use super::{ActiveGesture, ObjectId, Overlay, StickerId, TextId, TextLabel};
use crate::geometry::sticker_pivot;
use kurbo::{Affine, Point};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Axis a sticker image can be mirrored along.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FlipAxis {
    X,
    Y,
}

/// A copy of the mascot image placed on the canvas.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Sticker {
    pub(crate) id: StickerId,
    /// Top-left anchor of the image box.
    pub position: Point,
    /// Rotation angle in degrees.
    pub rotation: f64,
    /// Uniform scale, kept within the geometry limits.
    pub scale: f64,
    /// Mirror the image horizontally.
    pub flip_x: bool,
    /// Mirror the image vertically.
    pub flip_y: bool,
    /// Owned text labels in render order (back to front).
    pub texts: Vec<TextLabel>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) gesture: Option<ActiveGesture>,
}

impl Default for Sticker {
    fn default() -> Self {
        Self::new()
    }
}

impl Sticker {
    /// Position of a newly added sticker.
    pub const DEFAULT_POSITION: Point = Point::new(100.0, 100.0);

    /// Create a sticker at the default position with no texts.
    pub fn new() -> Self {
        Self {
            id: Uuid::new_v4(),
            position: Self::DEFAULT_POSITION,
            rotation: 0.0,
            scale: 1.0,
            flip_x: false,
            flip_y: false,
            texts: Vec::new(),
            gesture: None,
        }
    }

    /// Toggle mirroring along `axis`.
    pub fn toggle_flip(&mut self, axis: FlipAxis) {
        match axis {
            FlipAxis::X => self.flip_x = !self.flip_x,
            FlipAxis::Y => self.flip_y = !self.flip_y,
        }
    }

    /// Transform applied to the image content only, inside [`Overlay::transform`].
    /// Mirrors around the image centre; texts never receive it.
    pub fn content_transform(&self) -> Affine {
        let sx = if self.flip_x { -1.0 } else { 1.0 };
        let sy = if self.flip_y { -1.0 } else { 1.0 };
        let half = crate::geometry::STICKER_SIZE / 2.0;
        Affine::translate((half, half))
            * Affine::scale_non_uniform(sx, sy)
            * Affine::translate((-half, -half))
    }

    /// Get a text label by ID.
    pub fn text(&self, id: TextId) -> Option<&TextLabel> {
        self.texts.iter().find(|t| t.id == id)
    }

    /// Get a mutable text label by ID.
    pub fn text_mut(&mut self, id: TextId) -> Option<&mut TextLabel> {
        self.texts.iter_mut().find(|t| t.id == id)
    }

    /// Append a text label on top of the existing ones.
    pub fn push_text(&mut self, text: TextLabel) -> TextId {
        let id = text.id;
        self.texts.push(text);
        id
    }

    /// Remove a text label, returning it if it existed.
    pub fn remove_text(&mut self, id: TextId) -> Option<TextLabel> {
        let index = self.texts.iter().position(|t| t.id == id)?;
        Some(self.texts.remove(index))
    }
}

impl Overlay for Sticker {
    fn id(&self) -> ObjectId {
        self.id
    }

    fn position(&self) -> Point {
        self.position
    }

    fn set_position(&mut self, position: Point) {
        self.position = position;
    }

    fn rotation(&self) -> f64 {
        self.rotation
    }

    fn set_rotation(&mut self, degrees: f64) {
        self.rotation = degrees;
    }

    fn scale(&self) -> f64 {
        self.scale
    }

    fn set_scale(&mut self, scale: f64) {
        self.scale = scale;
    }

    fn pivot(&self) -> Point {
        sticker_pivot(self.position)
    }

    fn gesture(&self) -> Option<&ActiveGesture> {
        self.gesture.as_ref()
    }

    fn gesture_mut(&mut self) -> &mut Option<ActiveGesture> {
        &mut self.gesture
    }
}
