//! WebAssembly entry point and the JS-facing editor facade.

use babameme_core::{
    Control, EditorConfig, EditorError, EditorResult, ExportRequest, ExportedImage, Exporter,
    FlipAxis, ObjectId, PointerEvent, PointerPhase, PointerSample, Session, SessionSnapshot,
    TextKey, TextUpdate,
};
use kurbo::{Point, Vec2};
use serde::Serialize;
use serde::de::DeserializeOwned;
use wasm_bindgen::JsCast;
use wasm_bindgen::prelude::*;
use web_sys::{Element, HtmlAnchorElement, HtmlCanvasElement, MouseEvent, TouchEvent};

/// Initialize panic reporting and logging.
#[wasm_bindgen(start)]
pub fn start() {
    console_error_panic_hook::set_once();

    if let Err(e) = console_log::init_with_level(log::Level::Info) {
        web_sys::console::warn_1(&format!("Failed to initialize logger: {}", e).into());
    }

    log::info!("Starting Baba meme editor (WASM)");
}

fn to_js(err: EditorError) -> JsValue {
    JsValue::from_str(&err.to_string())
}

fn js_error(value: JsValue) -> EditorError {
    EditorError::Export(value.as_string().unwrap_or_else(|| format!("{:?}", value)))
}

/// Serialize to a plain JS object (numbers stay numbers, maps become objects).
fn to_value<T: Serialize>(value: &T) -> Result<JsValue, serde_wasm_bindgen::Error> {
    value.serialize(&serde_wasm_bindgen::Serializer::json_compatible())
}

/// Parse a snake_case enum name such as `"resize_handle"` or `"down"`.
fn parse_name<T: DeserializeOwned>(kind: &str, name: &str) -> Result<T, JsValue> {
    serde_json::from_value(serde_json::Value::String(name.to_string()))
        .map_err(|_| JsValue::from_str(&format!("Unknown {}: {}", kind, name)))
}

fn parse_id(id: &str) -> Result<ObjectId, JsValue> {
    id.parse::<ObjectId>()
        .map_err(|e| JsValue::from_str(&format!("Invalid object id {}: {}", id, e)))
}

fn touch_sample(event: &TouchEvent) -> PointerSample {
    let list = event.touches();
    let touches = (0..list.length())
        .filter_map(|i| list.get(i))
        .map(|touch| Point::new(touch.client_x() as f64, touch.client_y() as f64))
        .collect();
    PointerSample::Touch { touches }
}

/// Captures the composed canvas as a PNG data URL.
struct CanvasExporter {
    canvas: HtmlCanvasElement,
    /// Host callback `(snapshot, pixelRatio)` that redraws the canvas without
    /// controls before capture.
    redraw: Option<js_sys::Function>,
}

impl Exporter for CanvasExporter {
    fn export(&self, snapshot: &SessionSnapshot, request: &ExportRequest) -> EditorResult<ExportedImage> {
        if self.canvas.width() == 0 || self.canvas.height() == 0 {
            return Err(EditorError::Export("canvas has no size".to_string()));
        }
        if let Some(redraw) = &self.redraw {
            let value = to_value(snapshot).map_err(|e| EditorError::Export(e.to_string()))?;
            redraw
                .call2(&JsValue::NULL, &value, &JsValue::from_f64(request.pixel_ratio))
                .map_err(js_error)?;
        }
        let data_url = self.canvas.to_data_url_with_type("image/png").map_err(js_error)?;
        Ok(ExportedImage {
            file_name: request.file_name.clone(),
            data_url,
        })
    }
}

/// Offer an exported image as a browser download.
fn download(image: &ExportedImage) -> Result<(), JsValue> {
    let document = web_sys::window()
        .and_then(|w| w.document())
        .ok_or_else(|| JsValue::from_str("No document available"))?;
    let anchor = document
        .create_element("a")?
        .dyn_into::<HtmlAnchorElement>()?;
    anchor.set_href(&image.data_url);
    anchor.set_download(&image.file_name);
    anchor.click();
    Ok(())
}

/// Editing session owned by the page.
#[wasm_bindgen]
pub struct MemeEditor {
    session: Session,
}

#[wasm_bindgen]
impl MemeEditor {
    /// Create an editor. `config` may be `undefined` or a partial config object.
    #[wasm_bindgen(constructor)]
    pub fn new(config: JsValue) -> Result<MemeEditor, JsValue> {
        let config = if config.is_undefined() || config.is_null() {
            EditorConfig::default()
        } else {
            let config: EditorConfig = serde_wasm_bindgen::from_value(config)?;
            config.validate().map_err(to_js)?;
            config
        };
        Ok(MemeEditor {
            session: Session::new(config),
        })
    }

    pub fn revision(&self) -> f64 {
        self.session.revision() as f64
    }

    pub fn snapshot(&self) -> Result<JsValue, JsValue> {
        Ok(to_value(&self.session.snapshot())?)
    }

    pub fn set_viewport_width(&mut self, width: f64) -> bool {
        self.session.set_viewport_width(width)
    }

    /// Track where the editing surface sits in client space.
    pub fn sync_surface(&mut self, surface: &Element) {
        let rect = surface.get_bounding_client_rect();
        self.session.set_surface_origin(Vec2::new(rect.left(), rect.top()));
    }

    pub fn set_preview(&mut self, preview: bool) {
        self.session.set_preview(preview);
    }

    pub fn toggle_preview(&mut self) -> bool {
        self.session.toggle_preview()
    }

    pub fn set_background(&mut self, reference: String) -> Result<(), JsValue> {
        self.session.set_background(reference).map_err(to_js)
    }

    pub fn clear_background(&mut self) {
        self.session.clear_background();
    }

    /// Route a mouse event. `target_id` and `control` describe what was under
    /// the pointer on `down`; `control` defaults to the object body.
    pub fn mouse_event(
        &mut self,
        phase: &str,
        event: &MouseEvent,
        target_id: Option<String>,
        control: Option<String>,
    ) -> Result<bool, JsValue> {
        let phase: PointerPhase = parse_name("pointer phase", phase)?;
        let sample = PointerSample::mouse(event.client_x() as f64, event.client_y() as f64);
        self.dispatch(PointerEvent::new(phase, sample), target_id, control)
    }

    /// Route a touch event; see [`MemeEditor::mouse_event`].
    pub fn touch_event(
        &mut self,
        phase: &str,
        event: &TouchEvent,
        target_id: Option<String>,
        control: Option<String>,
    ) -> Result<bool, JsValue> {
        let phase: PointerPhase = parse_name("pointer phase", phase)?;
        self.dispatch(PointerEvent::new(phase, touch_sample(event)), target_id, control)
    }

    /// Names of the controls to draw on an object, e.g. `["body", "delete"]`.
    pub fn controls(&self, target_id: &str) -> Result<JsValue, JsValue> {
        let controls = self.session.available_controls(parse_id(target_id)?);
        Ok(to_value(&controls)?)
    }

    pub fn end_gesture(&mut self) -> bool {
        self.session.end_gesture()
    }

    pub fn add_sticker(&mut self) -> String {
        self.session.add_sticker().to_string()
    }

    pub fn delete_sticker(&mut self, sticker_id: &str) -> Result<bool, JsValue> {
        Ok(self.session.delete_sticker(parse_id(sticker_id)?))
    }

    pub fn toggle_flip(&mut self, sticker_id: &str, axis: &str) -> Result<bool, JsValue> {
        let axis: FlipAxis = parse_name("flip axis", axis)?;
        Ok(self.session.toggle_flip(parse_id(sticker_id)?, axis))
    }

    /// Add a text label to the first sticker; returns its id.
    pub fn add_text(&mut self) -> Option<String> {
        self.session.add_text_to_primary().map(|key| key.text.to_string())
    }

    /// Apply a partial text update such as `{ content: "gm", style: { italic: true } }`.
    pub fn update_text(&mut self, sticker_id: &str, text_id: &str, update: JsValue) -> Result<bool, JsValue> {
        let update: TextUpdate = serde_wasm_bindgen::from_value(update)?;
        Ok(self.session.update_text(parse_id(sticker_id)?, parse_id(text_id)?, update))
    }

    pub fn delete_text(&mut self, sticker_id: &str, text_id: &str) -> Result<bool, JsValue> {
        Ok(self.session.delete_text(parse_id(sticker_id)?, parse_id(text_id)?))
    }

    pub fn begin_text_edit(&mut self, sticker_id: &str, text_id: &str) -> Result<bool, JsValue> {
        let key = TextKey {
            sticker: parse_id(sticker_id)?,
            text: parse_id(text_id)?,
        };
        Ok(self.session.begin_text_edit(key))
    }

    pub fn finish_text_edit(&mut self) -> bool {
        self.session.finish_text_edit().is_some()
    }

    /// Capture `canvas` and download it. `redraw`, if given, is called with a
    /// control-free snapshot and the pixel ratio before capture.
    pub fn export(&self, canvas: HtmlCanvasElement, redraw: Option<js_sys::Function>) -> Result<String, JsValue> {
        let exporter = CanvasExporter { canvas, redraw };
        let image = self.session.export(&exporter).map_err(to_js)?;
        download(&image)?;
        Ok(image.data_url)
    }
}

impl MemeEditor {
    fn dispatch(
        &mut self,
        event: PointerEvent,
        target_id: Option<String>,
        control: Option<String>,
    ) -> Result<bool, JsValue> {
        let target = match target_id {
            Some(id) => {
                let control = match control.as_deref() {
                    Some(name) => parse_name("control", name)?,
                    None => Control::Body,
                };
                Some((parse_id(&id)?, control))
            }
            None => None,
        };
        Ok(self.session.handle_pointer(&event, target))
    }
}
