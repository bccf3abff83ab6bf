//! Export collaborator interface.
//!
//! Pixel capture belongs to whoever owns the rendering surface; the session
//! only describes what to capture and hands over a snapshot.

use crate::error::EditorResult;
use crate::session::SessionSnapshot;
use serde::{Deserialize, Serialize};

/// Parameters for one export.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportRequest {
    /// Suggested download file name.
    pub file_name: String,
    /// Device pixel ratio to rasterize at.
    pub pixel_ratio: f64,
    /// Leave handles and buttons out of the captured image.
    pub hide_controls: bool,
}

/// A rasterized meme.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportedImage {
    pub file_name: String,
    /// Encoded image as a data URL.
    pub data_url: String,
}

/// Something that can rasterize the composed canvas.
pub trait Exporter {
    fn export(&self, snapshot: &SessionSnapshot, request: &ExportRequest) -> EditorResult<ExportedImage>;
}
