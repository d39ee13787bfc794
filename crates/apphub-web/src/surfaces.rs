//! Detached `<canvas>` surfaces for the graphics probes.
//!
//! Canvases are created with `document.createElement` and never attached to
//! the DOM; they are dropped once the probe returns.

use apphub_fingerprint::{
    Canvas2d, DrawOp, GpuContext, RendererInfo, SurfaceError, SurfaceFactory,
};
use wasm_bindgen::{JsCast, JsValue};
use web_sys::{CanvasRenderingContext2d, Document, HtmlCanvasElement, WebGlRenderingContext};

use crate::util::js_error_message;

/// `WEBGL_debug_renderer_info.UNMASKED_VENDOR_WEBGL`
const UNMASKED_VENDOR_WEBGL: u32 = 0x9245;
/// `WEBGL_debug_renderer_info.UNMASKED_RENDERER_WEBGL`
const UNMASKED_RENDERER_WEBGL: u32 = 0x9246;

const DEBUG_RENDERER_INFO: &str = "WEBGL_debug_renderer_info";

/// Context ids tried in order for the GPU probe.
const WEBGL_CONTEXT_IDS: [&str; 2] = ["webgl", "experimental-webgl"];

/// Creates canvases from the window's document.
pub struct BrowserSurfaces {
    document: Option<Document>,
}

impl BrowserSurfaces {
    /// Bind to `window.document`.
    pub fn new() -> Self {
        Self {
            document: web_sys::window().and_then(|w| w.document()),
        }
    }

    fn canvas_element(&self) -> Result<HtmlCanvasElement, SurfaceError> {
        let document = self.document.as_ref().ok_or(SurfaceError::NoDocument)?;
        document
            .create_element("canvas")
            .map_err(|e| SurfaceError::Query(js_error_message(&e)))?
            .dyn_into::<HtmlCanvasElement>()
            .map_err(|_| SurfaceError::ContextUnavailable)
    }
}

impl Default for BrowserSurfaces {
    fn default() -> Self {
        Self::new()
    }
}

impl SurfaceFactory for BrowserSurfaces {
    type Canvas = BrowserCanvas;
    type Gpu = BrowserGpu;

    fn create_canvas(&self) -> Result<BrowserCanvas, SurfaceError> {
        let canvas = self.canvas_element()?;
        let context = canvas
            .get_context("2d")
            .ok()
            .flatten()
            .ok_or(SurfaceError::ContextUnavailable)?
            .dyn_into::<CanvasRenderingContext2d>()
            .map_err(|_| SurfaceError::ContextUnavailable)?;
        Ok(BrowserCanvas { canvas, context })
    }

    fn create_gpu(&self) -> Result<BrowserGpu, SurfaceError> {
        let canvas = self.canvas_element()?;
        let context = WEBGL_CONTEXT_IDS
            .iter()
            .find_map(|id| canvas.get_context(id).ok().flatten())
            .ok_or(SurfaceError::ContextUnavailable)?
            .dyn_into::<WebGlRenderingContext>()
            .map_err(|_| SurfaceError::ContextUnavailable)?;
        Ok(BrowserGpu { context })
    }
}

/// A canvas with its 2D context.
pub struct BrowserCanvas {
    canvas: HtmlCanvasElement,
    context: CanvasRenderingContext2d,
}

impl Canvas2d for BrowserCanvas {
    fn apply(&mut self, op: &DrawOp) -> Result<(), SurfaceError> {
        match *op {
            DrawOp::TextBaseline(baseline) => self.context.set_text_baseline(baseline),
            DrawOp::Font(font) => self.context.set_font(font),
            DrawOp::FillStyle(style) => self.context.set_fill_style_str(style),
            DrawOp::FillText { text, x, y } => self
                .context
                .fill_text(text, x, y)
                .map_err(|e| SurfaceError::Draw(js_error_message(&e)))?,
            DrawOp::FillRect { x, y, w, h } => self.context.fill_rect(x, y, w, h),
        }
        Ok(())
    }

    fn to_data_url(&self) -> Result<String, SurfaceError> {
        self.canvas
            .to_data_url()
            .map_err(|e| SurfaceError::Query(js_error_message(&e)))
    }
}

/// A WebGL 1 context.
pub struct BrowserGpu {
    context: WebGlRenderingContext,
}

impl BrowserGpu {
    fn string_parameter(&self, pname: u32) -> Result<String, SurfaceError> {
        let value: JsValue = self
            .context
            .get_parameter(pname)
            .map_err(|e| SurfaceError::Query(js_error_message(&e)))?;
        value
            .as_string()
            .ok_or_else(|| SurfaceError::Query(format!("parameter {:#x} is not a string", pname)))
    }
}

impl GpuContext for BrowserGpu {
    fn renderer_info(&self) -> Result<RendererInfo, SurfaceError> {
        self.context
            .get_extension(DEBUG_RENDERER_INFO)
            .ok()
            .flatten()
            .ok_or(SurfaceError::ExtensionUnavailable)?;
        let vendor = self.string_parameter(UNMASKED_VENDOR_WEBGL)?;
        let renderer = self.string_parameter(UNMASKED_RENDERER_WEBGL)?;
        Ok(RendererInfo::new(vendor, renderer))
    }
}
