//! Overlay objects placed on top of the background image.

mod sticker;
mod text;

pub use sticker::{FlipAxis, Sticker};
pub use text::{TextLabel, TextStyle, TextStyleUpdate, TextUpdate};

use crate::geometry::{angle_between, apply_resize};
use kurbo::{Affine, Point};
use peniko::Color;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for overlay objects.
pub type ObjectId = Uuid;
/// Identifier of a sticker.
pub type StickerId = ObjectId;
/// Identifier of a text label, unique within its sticker.
pub type TextId = ObjectId;

/// Serializable color representation (RGBA8).
///
/// Serializes as a hex string (`#RRGGBB`, or `#RRGGBBAA` when translucent),
/// which is what browser color inputs produce. Deserializes from either a hex
/// string or an `{ r, g, b, a }` object.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "ColorRepr", into = "String")]
pub struct SerializableColor {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl SerializableColor {
    pub fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    pub fn black() -> Self {
        Self::new(0, 0, 0, 255)
    }

    pub fn white() -> Self {
        Self::new(255, 255, 255, 255)
    }

    /// Parse `#RRGGBB` or `#RRGGBBAA` (the leading `#` is optional).
    pub fn from_hex(hex: &str) -> Option<Self> {
        let hex = hex.trim().trim_start_matches('#');
        if !hex.is_ascii() {
            return None;
        }
        let channel = |i: usize| u8::from_str_radix(hex.get(i..i + 2)?, 16).ok();
        match hex.len() {
            6 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, 255)),
            8 => Some(Self::new(channel(0)?, channel(2)?, channel(4)?, channel(6)?)),
            _ => None,
        }
    }

    /// Format as `#RRGGBB`, or `#RRGGBBAA` when not fully opaque.
    pub fn to_hex(&self) -> String {
        if self.a == 255 {
            format!("#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
        } else {
            format!("#{:02X}{:02X}{:02X}{:02X}", self.r, self.g, self.b, self.a)
        }
    }
}

/// Accepted serialized forms of a color.
#[derive(Deserialize)]
#[serde(untagged)]
enum ColorRepr {
    Hex(String),
    Channels {
        r: u8,
        g: u8,
        b: u8,
        #[serde(default = "opaque")]
        a: u8,
    },
}

fn opaque() -> u8 {
    255
}

impl TryFrom<ColorRepr> for SerializableColor {
    type Error = String;

    fn try_from(repr: ColorRepr) -> Result<Self, Self::Error> {
        match repr {
            ColorRepr::Hex(hex) => {
                Self::from_hex(&hex).ok_or_else(|| format!("invalid hex color {:?}", hex))
            }
            ColorRepr::Channels { r, g, b, a } => Ok(Self::new(r, g, b, a)),
        }
    }
}

impl From<SerializableColor> for String {
    fn from(color: SerializableColor) -> Self {
        color.to_hex()
    }
}

impl From<Color> for SerializableColor {
    fn from(color: Color) -> Self {
        let rgba = color.to_rgba8();
        Self {
            r: rgba.r,
            g: rgba.g,
            b: rgba.b,
            a: rgba.a,
        }
    }
}

impl From<SerializableColor> for Color {
    fn from(color: SerializableColor) -> Self {
        Color::from_rgba8(color.r, color.g, color.b, color.a)
    }
}

/// The manipulation a gesture performs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GestureKind {
    Drag,
    Resize,
    Rotate,
}

/// An in-progress gesture on one object.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ActiveGesture {
    pub kind: GestureKind,
    /// Last pointer sample seen by the gesture.
    pub drag_start: Point,
    /// Rotation at gesture start minus the pointer angle at gesture start.
    /// Only meaningful for rotate gestures.
    pub initial_rotation: f64,
}

/// Address of a text label: its sticker and its own id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TextKey {
    pub sticker: StickerId,
    pub text: TextId,
}

/// The object a gesture or control applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GestureTarget {
    Sticker(StickerId),
    Text(TextKey),
}

/// Common behaviour of stickers and text labels.
///
/// Implementors only expose their placement fields; the gesture math lives in
/// the provided methods so both kinds of overlay move identically.
pub trait Overlay {
    /// Get the unique identifier.
    fn id(&self) -> ObjectId;

    fn position(&self) -> Point;

    fn set_position(&mut self, position: Point);

    /// Rotation in degrees.
    fn rotation(&self) -> f64;

    fn set_rotation(&mut self, degrees: f64);

    fn scale(&self) -> f64;

    /// Set the scale. Callers pass an already clamped value.
    fn set_scale(&mut self, scale: f64);

    /// Point rotate gestures measure angles around.
    fn pivot(&self) -> Point;

    fn gesture(&self) -> Option<&ActiveGesture>;

    fn gesture_mut(&mut self) -> &mut Option<ActiveGesture>;

    /// Hook run after a resize step changed the scale.
    fn scale_changed(&mut self) {}

    fn is_dragging(&self) -> bool {
        self.gesture().is_some_and(|g| g.kind == GestureKind::Drag)
    }

    fn is_resizing(&self) -> bool {
        self.gesture().is_some_and(|g| g.kind == GestureKind::Resize)
    }

    fn is_rotating(&self) -> bool {
        self.gesture().is_some_and(|g| g.kind == GestureKind::Rotate)
    }

    /// Start a gesture with the pointer at `pointer`, replacing any other.
    fn begin_gesture(&mut self, kind: GestureKind, pointer: Point) {
        let initial_rotation = match kind {
            GestureKind::Rotate => self.rotation() - angle_between(self.pivot(), pointer),
            GestureKind::Drag | GestureKind::Resize => 0.0,
        };
        *self.gesture_mut() = Some(ActiveGesture {
            kind,
            drag_start: pointer,
            initial_rotation,
        });
    }

    /// Advance the active gesture to `pointer`.
    /// Returns false if no gesture is active.
    fn update_gesture(&mut self, pointer: Point) -> bool {
        let Some(gesture) = self.gesture().copied() else {
            return false;
        };
        let delta = pointer - gesture.drag_start;
        match gesture.kind {
            GestureKind::Drag => {
                let position = self.position() + delta;
                self.set_position(position);
            }
            GestureKind::Resize => {
                let scale = apply_resize(self.scale(), delta);
                self.set_scale(scale);
                self.scale_changed();
            }
            GestureKind::Rotate => {
                let rotation = gesture.initial_rotation + angle_between(self.pivot(), pointer);
                self.set_rotation(rotation);
            }
        }
        if let Some(active) = self.gesture_mut() {
            active.drag_start = pointer;
        }
        true
    }

    /// Drop the active gesture. Returns true if one was active.
    fn end_gesture(&mut self) -> bool {
        self.gesture_mut().take().is_some()
    }

    /// Placement transform: `translate(position) rotate(rotation) scale(scale)`.
    fn transform(&self) -> Affine {
        Affine::translate(self.position().to_vec2())
            * Affine::rotate(self.rotation().to_radians())
            * Affine::scale(self.scale())
    }
}
