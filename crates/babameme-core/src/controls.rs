//! On-object controls the rendering surface draws around each overlay.

use crate::shapes::{FlipAxis, GestureKind, GestureTarget};
use serde::{Deserialize, Serialize};

/// The part of an overlay a pointer press landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Control {
    /// The image or text itself.
    Body,
    /// Corner resize handle.
    ResizeHandle,
    /// Rotation handle below the object.
    RotateHandle,
    /// Mirror horizontally (stickers only).
    FlipX,
    /// Mirror vertically (stickers only).
    FlipY,
    /// Delete button.
    Delete,
}

impl Control {
    /// Every control, in the order the surface lays them out.
    pub fn all() -> &'static [Control] {
        &[
            Control::Body,
            Control::ResizeHandle,
            Control::RotateHandle,
            Control::FlipX,
            Control::FlipY,
            Control::Delete,
        ]
    }

    /// The gesture a press on this control starts, if any.
    pub fn gesture(self) -> Option<GestureKind> {
        match self {
            Control::Body => Some(GestureKind::Drag),
            Control::ResizeHandle => Some(GestureKind::Resize),
            Control::RotateHandle => Some(GestureKind::Rotate),
            Control::FlipX | Control::FlipY | Control::Delete => None,
        }
    }

    /// The flip axis for flip buttons.
    pub fn flip_axis(self) -> Option<FlipAxis> {
        match self {
            Control::FlipX => Some(FlipAxis::X),
            Control::FlipY => Some(FlipAxis::Y),
            _ => None,
        }
    }

    /// Whether this control is offered on `target`. Text labels cannot flip.
    pub fn applies_to(self, target: GestureTarget) -> bool {
        match target {
            GestureTarget::Sticker(_) => true,
            GestureTarget::Text(_) => self.flip_axis().is_none(),
        }
    }

    /// Whether the control stays usable in preview mode, where the surface
    /// hides every handle and button but the object body remains grabbable.
    pub fn available_in_preview(self) -> bool {
        matches!(self, Control::Body)
    }
}
