//! In-memory environment and surfaces for testing.
//!
//! `FakeCanvas` "rasterizes" by recording the operations it was given, so
//! the data URL is a deterministic function of the drawing script.

use alloc::format;
use alloc::string::String;
use alloc::vec::Vec;

use crate::surface::{
    Canvas2d, DrawOp, Environment, GpuContext, RendererInfo, SurfaceError, SurfaceFactory,
    CANVAS_SCRIPT,
};

/// Environment with fixed property values.
#[derive(Clone, Debug, Default)]
pub struct StaticEnvironment {
    /// `navigator.userAgent`
    pub user_agent: Option<String>,
    /// `navigator.language`
    pub language: Option<String>,
    /// `navigator.platform`
    pub platform: Option<String>,
    /// Screen width and height
    pub screen_size: Option<(u32, u32)>,
    /// IANA timezone
    pub timezone: Option<String>,
    /// Plugin names in enumeration order
    pub plugins: Vec<String>,
}

impl Environment for StaticEnvironment {
    fn user_agent(&self) -> Option<String> {
        self.user_agent.clone()
    }

    fn language(&self) -> Option<String> {
        self.language.clone()
    }

    fn platform(&self) -> Option<String> {
        self.platform.clone()
    }

    fn screen_size(&self) -> Option<(u32, u32)> {
        self.screen_size
    }

    fn timezone(&self) -> Option<String> {
        self.timezone.clone()
    }

    fn plugin_names(&self) -> Vec<String> {
        self.plugins.clone()
    }
}

/// Surface factory with switchable capabilities.
#[derive(Clone, Debug)]
pub struct FakeSurfaces {
    canvas: bool,
    fail_draw: bool,
    gpu: Option<RendererInfo>,
    debug_extension: bool,
}

impl FakeSurfaces {
    /// Both probes available; the GPU reports `info`.
    pub fn new(info: RendererInfo) -> Self {
        Self {
            canvas: true,
            fail_draw: false,
            gpu: Some(info),
            debug_extension: true,
        }
    }

    /// Neither a 2D nor a 3D context can be created.
    pub fn unsupported() -> Self {
        Self {
            canvas: false,
            fail_draw: false,
            gpu: None,
            debug_extension: false,
        }
    }

    /// The 3D context exists but hides the debug renderer extension.
    pub fn without_debug_extension(mut self) -> Self {
        self.debug_extension = false;
        self
    }

    /// Drawing calls on the 2D context fail.
    pub fn failing_draw(mut self) -> Self {
        self.fail_draw = true;
        self
    }

    /// Data URL a [`FakeCanvas`] produces after the full [`CANVAS_SCRIPT`].
    pub fn expected_data_url(&self) -> String {
        render(CANVAS_SCRIPT)
    }
}

impl SurfaceFactory for FakeSurfaces {
    type Canvas = FakeCanvas;
    type Gpu = FakeGpu;

    fn create_canvas(&self) -> Result<FakeCanvas, SurfaceError> {
        if !self.canvas {
            return Err(SurfaceError::ContextUnavailable);
        }
        Ok(FakeCanvas {
            ops: Vec::new(),
            fail_draw: self.fail_draw,
        })
    }

    fn create_gpu(&self) -> Result<FakeGpu, SurfaceError> {
        match &self.gpu {
            Some(info) => Ok(FakeGpu {
                info: info.clone(),
                debug_extension: self.debug_extension,
            }),
            None => Err(SurfaceError::ContextUnavailable),
        }
    }
}

/// Canvas that records the operations applied to it.
#[derive(Clone, Debug)]
pub struct FakeCanvas {
    ops: Vec<DrawOp>,
    fail_draw: bool,
}

impl FakeCanvas {
    /// Operations applied so far.
    pub fn ops(&self) -> &[DrawOp] {
        &self.ops
    }
}

impl Canvas2d for FakeCanvas {
    fn apply(&mut self, op: &DrawOp) -> Result<(), SurfaceError> {
        if self.fail_draw {
            return Err(SurfaceError::Draw(String::from("drawing disabled")));
        }
        self.ops.push(*op);
        Ok(())
    }

    fn to_data_url(&self) -> Result<String, SurfaceError> {
        Ok(render(&self.ops))
    }
}

/// GPU context reporting fixed renderer info.
#[derive(Clone, Debug)]
pub struct FakeGpu {
    info: RendererInfo,
    debug_extension: bool,
}

impl GpuContext for FakeGpu {
    fn renderer_info(&self) -> Result<RendererInfo, SurfaceError> {
        if !self.debug_extension {
            return Err(SurfaceError::ExtensionUnavailable);
        }
        Ok(self.info.clone())
    }
}

fn render(ops: &[DrawOp]) -> String {
    let mut out = String::from("data:text/plain,");
    for op in ops {
        out.push_str(&format!("{:?};", op));
    }
    out
}
