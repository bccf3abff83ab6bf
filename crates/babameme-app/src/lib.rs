//! Baba Meme Application
//!
//! Shells around the core session: the WebAssembly facade the browser surface
//! drives, and a script replayer used by the native binary.

pub mod replay;

pub use replay::{Script, ScriptStep, StepTarget, run_script};

#[cfg(target_arch = "wasm32")]
mod web;

#[cfg(target_arch = "wasm32")]
pub use web::{MemeEditor, start};
