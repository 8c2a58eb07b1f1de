use std::sync::Arc;

use crate::action::Action;
use crate::foundation::core::Rect;
use crate::foundation::error::PassageResult;
use crate::render::backend::{NativeBackend, NativeCapability, RenderOutcome};
use crate::renderable::config::{DrawFn, RenderConfig};
use crate::renderable::{PassArgs, RenderPass, Renderable, run_native};
use crate::timeline::resolve::resolve_frames;
use crate::timeline::{Frame, Timeline};

/// A timed animation: one pass per resolved frame.
pub struct Animation {
    cfg: RenderConfig,
    draw: DrawFn,
    timeline: Arc<Timeline>,
}

impl Animation {
    /// Create an animation over `timeline`. An externally supplied `Arc<Timeline>`
    /// is shared, not copied.
    pub fn new(cfg: RenderConfig, draw: DrawFn, timeline: impl Into<Arc<Timeline>>) -> Self {
        Self {
            cfg,
            draw,
            timeline: timeline.into(),
        }
    }

    /// The animation's timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

impl Renderable for Animation {
    fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    fn draw_fn(&self) -> &DrawFn {
        &self.draw
    }

    fn folder(&self) -> String {
        self.cfg.name.clone()
    }

    fn layer_folder(&self, layer: &str) -> String {
        layer.to_string()
    }

    fn passes(&self, action: Action, layers: &[String], indices: &[u32]) -> Vec<RenderPass<'_>> {
        frame_passes(self, &self.timeline, self.cfg.rect, action, layers, indices)
    }
}

/// A self-rasterizing animation with declared layers.
///
/// Render-class requests cross every declared layer with every resolved frame so
/// each layer materializes as a separable output file; preview-class requests fall
/// back to unlayered behavior so the interactive sink composites all layers together.
pub struct LayeredAnimation {
    cfg: RenderConfig,
    draw: DrawFn,
    timeline: Arc<Timeline>,
    backend: Arc<dyn NativeBackend>,
}

impl LayeredAnimation {
    /// Create a layered animation.
    ///
    /// Fails immediately when the native backend is absent on this host; the error is
    /// never deferred to execution.
    pub fn new(
        cfg: RenderConfig,
        draw: DrawFn,
        timeline: impl Into<Arc<Timeline>>,
        native: &NativeCapability,
    ) -> PassageResult<Self> {
        let backend = native.require()?;
        Ok(Self {
            cfg,
            draw,
            timeline: timeline.into(),
            backend,
        })
    }

    /// The animation's timeline.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }
}

impl Renderable for LayeredAnimation {
    fn config(&self) -> &RenderConfig {
        &self.cfg
    }

    fn draw_fn(&self) -> &DrawFn {
        &self.draw
    }

    fn folder(&self) -> String {
        self.cfg.name.clone()
    }

    fn layer_folder(&self, layer: &str) -> String {
        layer.to_string()
    }

    fn self_rasterizing(&self) -> bool {
        true
    }

    fn passes(&self, action: Action, layers: &[String], indices: &[u32]) -> Vec<RenderPass<'_>> {
        if action.is_render() {
            layer_crossed_passes(
                self,
                &self.timeline,
                self.cfg.rect,
                &self.cfg.layers,
                action,
                indices,
            )
        } else {
            frame_passes(self, &self.timeline, self.cfg.rect, action, layers, indices)
        }
    }

    fn run(&self, pass: &RenderPass<'_>) -> PassageResult<RenderOutcome> {
        run_native(self.backend.as_ref(), self.cfg.rect, pass)
    }
}

/// Pass-generation strategy: one pass per resolved frame, carrying the full
/// requested layer set, suffixed with the zero-padded frame index.
pub(crate) fn frame_passes<'r>(
    owner: &'r dyn Renderable,
    timeline: &'r Timeline,
    rect: Rect,
    action: Action,
    layers: &[String],
    indices: &[u32],
) -> Vec<RenderPass<'r>> {
    resolve_frames(action, timeline, indices)
        .into_iter()
        .map(|i| {
            RenderPass::new(
                owner,
                format!("{i:04}"),
                PassArgs::Frame(Frame::new(i, timeline, rect, layers.to_vec())),
            )
        })
        .collect()
}

/// Pass-generation strategy: the cross product of declared layers and resolved
/// frames, each pass carrying exactly one layer tag so it renders in isolation.
pub(crate) fn layer_crossed_passes<'r>(
    owner: &'r dyn Renderable,
    timeline: &'r Timeline,
    rect: Rect,
    declared: &[String],
    action: Action,
    indices: &[u32],
) -> Vec<RenderPass<'r>> {
    let frames = resolve_frames(action, timeline, indices);
    let mut passes = Vec::with_capacity(declared.len() * frames.len());
    for layer in declared {
        for &i in &frames {
            passes.push(RenderPass::single_layer(
                owner,
                format!("{i:04}"),
                PassArgs::Frame(Frame::new(i, timeline, rect, vec![layer.clone()])),
                layer.clone(),
            ));
        }
    }
    passes
}
