use std::sync::Arc;

use crate::action::Action;
use crate::foundation::core::{OutputFormat, Rect};
use crate::foundation::error::PassageResult;
use crate::render::backend::{NativeBackend, NativeCapability, RenderOutcome};
use crate::renderable::config::{DrawFn, RenderConfig};
use crate::renderable::{PassArgs, RenderPass, Renderable, run_native};

/// A still image: exactly one pass per request, regardless of action.
pub struct Still {
    cfg: RenderConfig,
    draw: DrawFn,
}

impl Still {
    /// Create a still-image descriptor.
    pub fn new(cfg: RenderConfig, draw: DrawFn) -> Self {
        Self { cfg, draw }
    }
}

impl Renderable for Still {
    fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    fn draw_fn(&self) -> &DrawFn {
        &self.draw
    }

    fn passes(&self, _action: Action, _layers: &[String], _indices: &[u32]) -> Vec<RenderPass<'_>> {
        vec![RenderPass::new(
            self,
            self.cfg.name.clone(),
            PassArgs::Rect(self.cfg.rect),
        )]
    }
}

/// A still forced to SVG output whose artifacts land in a folder named after the
/// descriptor.
pub struct SvgIcon {
    cfg: RenderConfig,
    draw: DrawFn,
}

impl SvgIcon {
    /// Create an SVG icon descriptor. The configured format is overridden to SVG.
    pub fn new(cfg: RenderConfig, draw: DrawFn) -> Self {
        Self {
            cfg: cfg.with_format(OutputFormat::Svg),
            draw,
        }
    }
}

impl Renderable for SvgIcon {
    fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    fn draw_fn(&self) -> &DrawFn {
        &self.draw
    }

    fn folder(&self) -> String {
        self.cfg.name.clone()
    }

    fn passes(&self, _action: Action, _layers: &[String], _indices: &[u32]) -> Vec<RenderPass<'_>> {
        vec![RenderPass::new(
            self,
            self.cfg.name.clone(),
            PassArgs::Rect(self.cfg.rect),
        )]
    }
}

/// A self-rasterizing still: draws through a scoped native context and writes its own
/// file.
pub struct NativeSketch {
    cfg: RenderConfig,
    draw: DrawFn,
    backend: Arc<dyn NativeBackend>,
}

impl NativeSketch {
    /// Create a native sketch.
    ///
    /// Fails immediately when the native backend is absent on this host; the error is
    /// never deferred to execution.
    pub fn new(cfg: RenderConfig, draw: DrawFn, native: &NativeCapability) -> PassageResult<Self> {
        let backend = native.require()?;
        Ok(Self { cfg, draw, backend })
    }
}

impl Renderable for NativeSketch {
    fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    fn draw_fn(&self) -> &DrawFn {
        &self.draw
    }

    fn self_rasterizing(&self) -> bool {
        true
    }

    fn passes(&self, _action: Action, _layers: &[String], _indices: &[u32]) -> Vec<RenderPass<'_>> {
        vec![RenderPass::new(
            self,
            self.cfg.name.clone(),
            PassArgs::Rect(self.cfg.rect),
        )]
    }

    fn run(&self, pass: &RenderPass<'_>) -> PassageResult<RenderOutcome> {
        run_native(self.backend.as_ref(), self.cfg.rect, pass)
    }
}

/// A single glyph: one pass, geometry derived from config at construction.
pub struct Glyph {
    cfg: RenderConfig,
    draw: DrawFn,
    glyph_name: String,
    body: Rect,
}

impl Glyph {
    /// Create a glyph descriptor for `glyph_name`, with a drawing body `width` units
    /// wide centered in the configured rect.
    pub fn new(cfg: RenderConfig, draw: DrawFn, glyph_name: impl Into<String>, width: f64) -> Self {
        let body = centered_band(cfg.rect, width, 750.0_f64.min(cfg.rect.height()));
        Self {
            cfg,
            draw,
            glyph_name: glyph_name.into(),
            body,
        }
    }

    /// The glyph's drawing body within the artboard.
    pub fn body(&self) -> Rect {
        self.body
    }

    /// The glyph name.
    pub fn glyph_name(&self) -> &str {
        &self.glyph_name
    }
}

impl Renderable for Glyph {
    fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    fn draw_fn(&self) -> &DrawFn {
        &self.draw
    }

    fn passes(&self, _action: Action, _layers: &[String], _indices: &[u32]) -> Vec<RenderPass<'_>> {
        vec![RenderPass::new(self, self.glyph_name.clone(), PassArgs::None)]
    }
}

/// A `w`×`h` rect centered inside `r`.
fn centered_band(r: Rect, w: f64, h: f64) -> Rect {
    let cx = (r.x0 + r.x1) / 2.0;
    let cy = (r.y0 + r.y1) / 2.0;
    Rect::new(cx - w / 2.0, cy - h / 2.0, cx + w / 2.0, cy + h / 2.0)
}
