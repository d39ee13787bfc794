//! Signal collector.

use alloc::format;
use alloc::string::String;

use crate::hash::simple_hash;
use crate::signals::{join_plugins, SignalSet, CANVAS_NOT_SUPPORTED, WEBGL_NOT_SUPPORTED};
use crate::surface::{
    Canvas2d, Environment, GpuContext, SurfaceError, SurfaceFactory, CANVAS_SCRIPT,
};

/// Anything that can produce a fresh [`SignalSet`].
///
/// Implemented by [`SignalCollector`]; the identity layer depends only on
/// this trait so tests can feed fixed signals.
pub trait SignalSource {
    /// Collect a new signal set. Never fails.
    fn collect(&self) -> SignalSet;
}

/// Builds a [`SignalSet`] from an environment and a surface factory.
pub struct SignalCollector<E, S> {
    env: E,
    surfaces: S,
}

impl<E: Environment, S: SurfaceFactory> SignalCollector<E, S> {
    /// Create a collector.
    pub fn new(env: E, surfaces: S) -> Self {
        Self { env, surfaces }
    }

    /// The environment the collector reads from.
    pub fn environment(&self) -> &E {
        &self.env
    }

    /// Hash of the rendered canvas script, or [`CANVAS_NOT_SUPPORTED`].
    pub fn canvas_fingerprint(&self) -> String {
        self.try_canvas_fingerprint()
            .unwrap_or_else(|_| String::from(CANVAS_NOT_SUPPORTED))
    }

    /// Hash of the unmasked GPU vendor/renderer, or [`WEBGL_NOT_SUPPORTED`].
    pub fn webgl_fingerprint(&self) -> String {
        self.try_webgl_fingerprint()
            .unwrap_or_else(|_| String::from(WEBGL_NOT_SUPPORTED))
    }

    fn try_canvas_fingerprint(&self) -> Result<String, SurfaceError> {
        let mut canvas = self.surfaces.create_canvas()?;
        for op in CANVAS_SCRIPT {
            canvas.apply(op)?;
        }
        let data_url = canvas.to_data_url()?;
        Ok(simple_hash(&data_url))
    }

    fn try_webgl_fingerprint(&self) -> Result<String, SurfaceError> {
        let gpu = self.surfaces.create_gpu()?;
        let info = gpu.renderer_info()?;
        Ok(simple_hash(&info.joined()))
    }

    fn screen_resolution(&self) -> String {
        match self.env.screen_size() {
            Some((width, height)) => format!("{}x{}", width, height),
            None => String::new(),
        }
    }
}

impl<E: Environment, S: SurfaceFactory> SignalSource for SignalCollector<E, S> {
    fn collect(&self) -> SignalSet {
        SignalSet {
            user_agent: self.env.user_agent().unwrap_or_default(),
            language: self.env.language().unwrap_or_default(),
            platform: self.env.platform().unwrap_or_default(),
            screen_resolution: self.screen_resolution(),
            timezone: self.env.timezone().unwrap_or_default(),
            plugins: join_plugins(self.env.plugin_names()),
            canvas_fingerprint: self.canvas_fingerprint(),
            webgl_fingerprint: self.webgl_fingerprint(),
        }
    }
}

impl SignalSource for SignalSet {
    fn collect(&self) -> SignalSet {
        self.clone()
    }
}

impl<T: SignalSource> SignalSource for &T {
    fn collect(&self) -> SignalSet {
        (**self).collect()
    }
}
