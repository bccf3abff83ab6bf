//! Scripted sessions.
//!
//! A script is a JSON document with an optional config and a list of steps.
//! Objects are addressed by index (sticker, then text within it) since their
//! ids are generated at runtime.

use babameme_core::{
    Control, EditorConfig, EditorError, EditorResult, FlipAxis, ObjectId, Overlay, PointerEvent,
    PointerPhase, PointerSample, Session, StickerId, TextKey, TextUpdate,
};
use kurbo::{Point, Vec2};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// A replayable editing session.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Script {
    pub config: Option<EditorConfig>,
    pub steps: Vec<ScriptStep>,
}

impl Script {
    pub fn from_json(json: &str) -> EditorResult<Self> {
        serde_json::from_str(json).map_err(|e| EditorError::Script(e.to_string()))
    }

    /// Read and parse a script file.
    pub fn load(path: impl AsRef<Path>) -> EditorResult<Self> {
        let json = std::fs::read_to_string(path)?;
        Self::from_json(&json)
    }
}

/// An object addressed by its sticker index and optional text index.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StepTarget {
    pub sticker: usize,
    #[serde(default)]
    pub text: Option<usize>,
}

/// One step of a script.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "op", rename_all = "snake_case")]
pub enum ScriptStep {
    Viewport { width: f64 },
    Preview { enabled: bool },
    SurfaceOrigin { x: f64, y: f64 },
    Background { reference: String },
    ClearBackground,
    AddSticker,
    AddText { sticker: usize },
    AddTextToPrimary,
    UpdateText { target: StepTarget, update: TextUpdate },
    Delete { target: StepTarget },
    Flip { sticker: usize, axis: FlipAxis },
    /// A pointer event in client space. `at` may be omitted for touch events
    /// whose touch list is empty. `control` defaults to the object body.
    Pointer {
        phase: PointerPhase,
        #[serde(default)]
        at: Option<Point>,
        #[serde(default)]
        touch: bool,
        #[serde(default)]
        target: Option<StepTarget>,
        #[serde(default)]
        control: Option<Control>,
    },
    BeginEdit { target: StepTarget },
    FinishEdit,
}

fn sticker_id(session: &Session, index: usize) -> EditorResult<StickerId> {
    session
        .stickers()
        .get(index)
        .map(|sticker| sticker.id())
        .ok_or_else(|| EditorError::Script(format!("no sticker at index {}", index)))
}

fn text_key(session: &Session, target: StepTarget) -> EditorResult<TextKey> {
    let Some(index) = target.text else {
        return Err(EditorError::Script(format!(
            "step needs a text index on sticker {}",
            target.sticker
        )));
    };
    let sticker = session
        .stickers()
        .get(target.sticker)
        .ok_or_else(|| EditorError::Script(format!("no sticker at index {}", target.sticker)))?;
    let text = sticker.texts.get(index).ok_or_else(|| {
        EditorError::Script(format!("no text {} on sticker {}", index, target.sticker))
    })?;
    Ok(TextKey {
        sticker: sticker.id(),
        text: text.id(),
    })
}

fn object_id(session: &Session, target: StepTarget) -> EditorResult<ObjectId> {
    match target.text {
        Some(_) => text_key(session, target).map(|key| key.text),
        None => sticker_id(session, target.sticker),
    }
}

fn pointer_event(phase: PointerPhase, at: Option<Point>, touch: bool) -> EditorResult<PointerEvent> {
    let sample = match (at, touch) {
        (Some(point), false) => PointerSample::Mouse { client: point },
        (Some(point), true) => PointerSample::Touch { touches: vec![point] },
        (None, true) => PointerSample::Touch { touches: Vec::new() },
        (None, false) => {
            return Err(EditorError::Script("mouse pointer step needs a position".to_string()));
        }
    };
    Ok(PointerEvent::new(phase, sample))
}

fn apply_step(session: &mut Session, step: &ScriptStep) -> EditorResult<()> {
    match step {
        ScriptStep::Viewport { width } => {
            session.set_viewport_width(*width);
        }
        ScriptStep::Preview { enabled } => session.set_preview(*enabled),
        ScriptStep::SurfaceOrigin { x, y } => session.set_surface_origin(Vec2::new(*x, *y)),
        ScriptStep::Background { reference } => session.set_background(reference.clone())?,
        ScriptStep::ClearBackground => session.clear_background(),
        ScriptStep::AddSticker => {
            session.add_sticker();
        }
        ScriptStep::AddText { sticker } => {
            let id = sticker_id(session, *sticker)?;
            let compact = session.is_compact();
            session.add_text(id, compact);
        }
        ScriptStep::AddTextToPrimary => {
            session.add_text_to_primary();
        }
        ScriptStep::UpdateText { target, update } => {
            let key = text_key(session, *target)?;
            session.update_text(key.sticker, key.text, update.clone());
        }
        ScriptStep::Delete { target } => match target.text {
            Some(_) => {
                let key = text_key(session, *target)?;
                session.delete_text(key.sticker, key.text);
            }
            None => {
                let id = sticker_id(session, target.sticker)?;
                session.delete_sticker(id);
            }
        },
        ScriptStep::Flip { sticker, axis } => {
            let id = sticker_id(session, *sticker)?;
            session.toggle_flip(id, *axis);
        }
        ScriptStep::Pointer {
            phase,
            at,
            touch,
            target,
            control,
        } => {
            let event = pointer_event(*phase, *at, *touch)?;
            let target = match target {
                Some(target) => Some((object_id(session, *target)?, control.unwrap_or(Control::Body))),
                None => None,
            };
            session.handle_pointer(&event, target);
        }
        ScriptStep::BeginEdit { target } => {
            let key = text_key(session, *target)?;
            session.begin_text_edit(key);
        }
        ScriptStep::FinishEdit => {
            session.finish_text_edit();
        }
    }
    Ok(())
}

/// Run every step of `script` against a fresh session.
///
/// Stops at the first step that addresses a missing object or is otherwise
/// malformed.
pub fn run_script(script: &Script) -> EditorResult<Session> {
    let config = script.config.clone().unwrap_or_default();
    config.validate()?;
    let mut session = Session::new(config);

    for (index, step) in script.steps.iter().enumerate() {
        log::debug!("Step {}: {:?}", index, step);
        apply_step(&mut session, step).map_err(|e| match e {
            EditorError::Script(msg) => EditorError::Script(format!("step {}: {}", index, msg)),
            other => other,
        })?;
    }

    log::info!(
        "Replayed {} steps, {} stickers, revision {}",
        script.steps.len(),
        session.stickers().len(),
        session.revision()
    );
    Ok(session)
}
