//! Baba Meme Core Library
//!
//! Platform-agnostic state and gesture logic for the meme editor: stickers,
//! text labels, pointer gestures and the editing session that owns them.

pub mod config;
pub mod controls;
pub mod engine;
pub mod error;
pub mod export;
pub mod geometry;
pub mod input;
pub mod session;
pub mod shapes;

pub use config::EditorConfig;
pub use controls::Control;
pub use engine::GestureEngine;
pub use error::{EditorError, EditorResult};
pub use export::{ExportRequest, ExportedImage, Exporter};
pub use input::{InputState, PointerEvent, PointerPhase, PointerSample};
pub use session::{BackgroundImage, Session, SessionSnapshot};
pub use shapes::{
    ActiveGesture, FlipAxis, GestureKind, GestureTarget, ObjectId, Overlay, SerializableColor,
    Sticker, StickerId, TextId, TextKey, TextLabel, TextStyle, TextStyleUpdate, TextUpdate,
};
