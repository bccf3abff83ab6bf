//! Gesture engine: owns the stickers and applies pointer gestures to them.

use crate::shapes::{
    FlipAxis, GestureKind, GestureTarget, ObjectId, Overlay, Sticker, StickerId, TextId, TextKey,
    TextLabel, TextUpdate,
};
use kurbo::Point;

/// Owns the ordered sticker collection and every gesture on it.
///
/// All operations are silent no-ops on unknown ids: deletions can race with
/// in-flight pointer events, and a stale id simply finds nothing to update.
#[derive(Debug, Clone, Default)]
pub struct GestureEngine {
    stickers: Vec<Sticker>,
}

impl GestureEngine {
    /// Create an engine with no stickers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Stickers in render order (back to front).
    pub fn stickers(&self) -> &[Sticker] {
        &self.stickers
    }

    /// Get a sticker by ID.
    pub fn sticker(&self, id: StickerId) -> Option<&Sticker> {
        self.stickers.iter().find(|s| s.id == id)
    }

    fn sticker_mut(&mut self, id: StickerId) -> Option<&mut Sticker> {
        self.stickers.iter_mut().find(|s| s.id == id)
    }

    /// Get a text label by sticker and text ID.
    pub fn text(&self, key: TextKey) -> Option<&TextLabel> {
        self.sticker(key.sticker)?.text(key.text)
    }

    pub fn len(&self) -> usize {
        self.stickers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stickers.is_empty()
    }

    /// Find what `id` refers to. Text labels are matched before stickers.
    pub fn resolve(&self, id: ObjectId) -> Option<GestureTarget> {
        self.stickers
            .iter()
            .find_map(|sticker| {
                sticker.text(id).map(|_| {
                    GestureTarget::Text(TextKey {
                        sticker: sticker.id,
                        text: id,
                    })
                })
            })
            .or_else(|| self.sticker(id).map(|_| GestureTarget::Sticker(id)))
    }

    /// The object currently engaged in a gesture, front-most text first.
    pub fn active_target(&self) -> Option<GestureTarget> {
        self.stickers.iter().find_map(|sticker| {
            sticker
                .texts
                .iter()
                .find(|t| t.gesture().is_some())
                .map(|t| {
                    GestureTarget::Text(TextKey {
                        sticker: sticker.id,
                        text: t.id,
                    })
                })
                .or_else(|| sticker.gesture().map(|_| GestureTarget::Sticker(sticker.id)))
        })
    }

    /// Start a gesture on `target_id` and clear it on every other object.
    ///
    /// Returns the resolved target, or `None` for an unknown id (in which case
    /// every gesture is still cleared).
    pub fn begin_gesture(
        &mut self,
        target_id: ObjectId,
        pointer: Point,
        kind: GestureKind,
    ) -> Option<GestureTarget> {
        let target = self.resolve(target_id);
        for sticker in &mut self.stickers {
            let sticker_id = sticker.id;
            for text in &mut sticker.texts {
                let key = TextKey {
                    sticker: sticker_id,
                    text: text.id,
                };
                if target == Some(GestureTarget::Text(key)) {
                    text.begin_gesture(kind, pointer);
                } else {
                    text.end_gesture();
                }
            }
            if target == Some(GestureTarget::Sticker(sticker_id)) {
                sticker.begin_gesture(kind, pointer);
            } else {
                sticker.end_gesture();
            }
        }
        match target {
            Some(target) => log::debug!("Begin {:?} gesture on {:?} at {:?}", kind, target, pointer),
            None => log::debug!("Begin {:?} gesture on unknown object {}", kind, target_id),
        }
        target
    }

    /// Advance every active gesture to `pointer`.
    ///
    /// Scans the whole collection rather than trusting the single-gesture
    /// invariant. Returns true if anything moved.
    pub fn update_gesture(&mut self, pointer: Point) -> bool {
        let mut changed = false;
        for sticker in &mut self.stickers {
            for text in &mut sticker.texts {
                changed |= text.update_gesture(pointer);
            }
            changed |= sticker.update_gesture(pointer);
        }
        changed
    }

    /// Clear all gestures on every object. Idempotent.
    /// Returns true if any gesture was active.
    pub fn end_gesture(&mut self) -> bool {
        let mut ended = false;
        for sticker in &mut self.stickers {
            for text in &mut sticker.texts {
                ended |= text.end_gesture();
            }
            ended |= sticker.end_gesture();
        }
        if ended {
            log::debug!("Gesture ended");
        }
        ended
    }

    /// Mirror a sticker along `axis`. Returns false if it does not exist.
    pub fn toggle_flip(&mut self, sticker_id: StickerId, axis: FlipAxis) -> bool {
        match self.sticker_mut(sticker_id) {
            Some(sticker) => {
                sticker.toggle_flip(axis);
                true
            }
            None => false,
        }
    }

    /// Append a default sticker and return its id.
    pub fn add_sticker(&mut self) -> StickerId {
        let sticker = Sticker::new();
        let id = sticker.id;
        self.stickers.push(sticker);
        log::debug!("Added sticker {}", id);
        id
    }

    /// Remove a sticker together with its text labels.
    pub fn delete_sticker(&mut self, sticker_id: StickerId) -> Option<Sticker> {
        let index = self.stickers.iter().position(|s| s.id == sticker_id)?;
        let sticker = self.stickers.remove(index);
        log::debug!("Deleted sticker {} with {} texts", sticker_id, sticker.texts.len());
        Some(sticker)
    }

    /// Append a default text label to a sticker.
    pub fn add_text(&mut self, sticker_id: StickerId, is_compact: bool) -> Option<TextId> {
        let sticker = self.sticker_mut(sticker_id)?;
        let id = sticker.push_text(TextLabel::new(is_compact));
        log::debug!("Added text {} to sticker {}", id, sticker_id);
        Some(id)
    }

    /// Merge a partial update into a text label. Returns false if not found.
    pub fn update_text(&mut self, sticker_id: StickerId, text_id: TextId, update: TextUpdate) -> bool {
        match self
            .sticker_mut(sticker_id)
            .and_then(|sticker| sticker.text_mut(text_id))
        {
            Some(text) => {
                text.apply_update(update);
                true
            }
            None => false,
        }
    }

    /// Remove a text label from its sticker.
    pub fn delete_text(&mut self, sticker_id: StickerId, text_id: TextId) -> Option<TextLabel> {
        let text = self.sticker_mut(sticker_id)?.remove_text(text_id)?;
        log::debug!("Deleted text {} from sticker {}", text_id, sticker_id);
        Some(text)
    }
}
