//! Text label overlay.

use super::{ActiveGesture, ObjectId, Overlay, SerializableColor, TextId};
use crate::geometry::{BASE_FONT_SIZE, clamp_scale, derived_font_size};
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Visual style of a text label.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TextStyle {
    /// Font size in pixels. Recomputed from the scale on every resize step.
    pub font_size: f64,
    /// Fill color.
    pub color: SerializableColor,
    /// CSS font family list.
    pub font_family: String,
    pub italic: bool,
    pub underline: bool,
    pub strikethrough: bool,
    /// Outline width in pixels.
    pub stroke_width: f64,
    /// Outline color.
    pub stroke_color: SerializableColor,
}

impl TextStyle {
    pub const DEFAULT_FONT_FAMILY: &'static str = "Impact, system-ui";

    /// Default style; compact layouts get a thinner outline.
    pub fn for_layout(is_compact: bool) -> Self {
        Self {
            stroke_width: if is_compact { 1.0 } else { 2.0 },
            ..Self::default()
        }
    }
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_size: BASE_FONT_SIZE,
            color: SerializableColor::white(),
            font_family: Self::DEFAULT_FONT_FAMILY.to_string(),
            italic: false,
            underline: false,
            strikethrough: false,
            stroke_width: 2.0,
            stroke_color: SerializableColor::black(),
        }
    }
}

/// Partial style change; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextStyleUpdate {
    pub font_size: Option<f64>,
    pub color: Option<SerializableColor>,
    pub font_family: Option<String>,
    pub italic: Option<bool>,
    pub underline: Option<bool>,
    pub strikethrough: Option<bool>,
    pub stroke_width: Option<f64>,
    pub stroke_color: Option<SerializableColor>,
}

impl TextStyleUpdate {
    fn apply(self, style: &mut TextStyle) {
        if let Some(size) = self.font_size.filter(|s| *s > 0.0) {
            style.font_size = size;
        }
        if let Some(color) = self.color {
            style.color = color;
        }
        if let Some(family) = self.font_family {
            style.font_family = family;
        }
        if let Some(italic) = self.italic {
            style.italic = italic;
        }
        if let Some(underline) = self.underline {
            style.underline = underline;
        }
        if let Some(strikethrough) = self.strikethrough {
            style.strikethrough = strikethrough;
        }
        if let Some(width) = self.stroke_width {
            style.stroke_width = width.max(0.0);
        }
        if let Some(color) = self.stroke_color {
            style.stroke_color = color;
        }
    }
}

/// Partial text label change; `None` fields are left as they are.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TextUpdate {
    pub content: Option<String>,
    pub position: Option<Point>,
    pub rotation: Option<f64>,
    pub scale: Option<f64>,
    pub style: Option<TextStyleUpdate>,
}

impl TextUpdate {
    /// Update that only replaces the content.
    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    /// Update that only changes style fields.
    pub fn style(style: TextStyleUpdate) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// A text annotation owned by a sticker.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TextLabel {
    pub(crate) id: TextId,
    /// The text content.
    pub content: String,
    /// Anchor point, also the rotation pivot.
    pub position: Point,
    /// Rotation angle in degrees.
    pub rotation: f64,
    /// Uniform scale, kept within the geometry limits.
    pub scale: f64,
    /// Style properties.
    pub style: TextStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub(crate) gesture: Option<ActiveGesture>,
}

impl TextLabel {
    /// Placeholder for touch layouts, where text is edited in a separate field.
    pub const COMPACT_PLACEHOLDER: &'static str = "Edit text below";
    /// Placeholder for desktop layouts.
    pub const DESKTOP_PLACEHOLDER: &'static str = "DOUBLE CLICK TO EDIT";
    /// Position of a newly added label.
    pub const DEFAULT_POSITION: Point = Point::new(100.0, 100.0);

    /// Create a label with the placeholder and style for the given layout.
    pub fn new(is_compact: bool) -> Self {
        let content = if is_compact {
            Self::COMPACT_PLACEHOLDER
        } else {
            Self::DESKTOP_PLACEHOLDER
        };
        Self {
            id: Uuid::new_v4(),
            content: content.to_string(),
            position: Self::DEFAULT_POSITION,
            rotation: 0.0,
            scale: 1.0,
            style: TextStyle::for_layout(is_compact),
            gesture: None,
        }
    }

    /// Merge a partial update into this label.
    pub fn apply_update(&mut self, update: TextUpdate) {
        if let Some(content) = update.content {
            self.content = content;
        }
        if let Some(position) = update.position {
            self.position = position;
        }
        if let Some(rotation) = update.rotation {
            self.rotation = rotation;
        }
        if let Some(style) = update.style {
            style.apply(&mut self.style);
        }
        // Applied after the style so an explicit scale keeps the font size in step.
        if let Some(scale) = update.scale {
            self.scale = clamp_scale(scale);
            self.scale_changed();
        }
    }
}

impl Overlay for TextLabel {
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
        self.position
    }

    fn gesture(&self) -> Option<&ActiveGesture> {
        self.gesture.as_ref()
    }

    fn gesture_mut(&mut self) -> &mut Option<ActiveGesture> {
        &mut self.gesture
    }

    fn scale_changed(&mut self) {
        self.style.font_size = derived_font_size(self.scale);
    }
}
