//! Renderable descriptors and the passes they generate.

/// Animation descriptors and layer-crossing.
pub mod animation;
/// Shared descriptor configuration.
pub mod config;
/// Font-preview sheet descriptor.
pub mod fontpreview;
/// Icon-set descriptor and its packaging step.
pub mod iconset;
/// Still-image descriptors.
pub mod still;

use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::action::Action;
use crate::foundation::core::Rect;
use crate::foundation::error::PassageResult;
use crate::preview::{PreviewArtifact, PreviewOptions, PreviewSink};
use crate::render::backend::{NativeBackend, RenderOutcome};
use crate::renderable::config::{DrawFn, RenderConfig};
use crate::timeline::Frame;

/// Typed positional arguments handed to a pass's draw function.
#[derive(Clone, Debug)]
pub enum PassArgs<'r> {
    /// The configured rect (still images).
    Rect(Rect),
    /// No arguments (glyphs derive geometry from config).
    None,
    /// Rect plus one discovered font file (font-preview sheets).
    Font {
        /// The configured rect.
        rect: Rect,
        /// The discovered font file.
        font: PathBuf,
    },
    /// Rect plus one icon size (icon sets).
    IconSize {
        /// The configured rect.
        rect: Rect,
        /// Icon edge length in pixels.
        size: u32,
    },
    /// One bound frame (animations).
    Frame(Frame<'r>),
}

/// An immutable unit of work: exactly one pass produces exactly one output artifact.
///
/// Passes generated for one request are mutually independent — no pass reads another
/// pass's output.
pub struct RenderPass<'r> {
    /// The descriptor this pass belongs to.
    pub renderable: &'r dyn Renderable,
    /// The bound drawing function.
    pub draw: DrawFn,
    /// Typed positional arguments.
    pub args: PassArgs<'r>,
    /// Output-name suffix.
    pub suffix: String,
    /// When set, the pass renders exactly this layer in isolation.
    pub single_layer: Option<String>,
    /// Resolved output path for the pass's artifact.
    pub output_path: PathBuf,
}

impl<'r> RenderPass<'r> {
    /// Create a pass for `renderable` with the full requested layer set.
    pub fn new(renderable: &'r dyn Renderable, suffix: impl Into<String>, args: PassArgs<'r>) -> Self {
        Self::build(renderable, suffix.into(), args, None)
    }

    /// Create a pass rendering `layer` in isolation.
    pub fn single_layer(
        renderable: &'r dyn Renderable,
        suffix: impl Into<String>,
        args: PassArgs<'r>,
        layer: impl Into<String>,
    ) -> Self {
        Self::build(renderable, suffix.into(), args, Some(layer.into()))
    }

    fn build(
        renderable: &'r dyn Renderable,
        suffix: String,
        args: PassArgs<'r>,
        single_layer: Option<String>,
    ) -> Self {
        let layer_folder = single_layer
            .as_deref()
            .map(|layer| renderable.layer_folder(layer));
        let output_path = renderable.config().output_path(
            &renderable.folder(),
            layer_folder.as_deref(),
            &suffix,
        );
        Self {
            renderable,
            draw: renderable.draw_fn().clone(),
            args,
            suffix,
            single_layer,
            output_path,
        }
    }
}

impl std::fmt::Debug for RenderPass<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderPass")
            .field("renderable", &self.renderable.config().name)
            .field("suffix", &self.suffix)
            .field("single_layer", &self.single_layer)
            .field("output_path", &self.output_path)
            .finish()
    }
}

/// A renderable descriptor: configuration plus the pass-generation policy of one
/// variant.
///
/// Variants are distinct types composing a shared [`RenderConfig`]; frame resolution
/// and layer-crossing are free-standing strategies the animation variants invoke.
pub trait Renderable: Send + Sync {
    /// The composed configuration.
    fn config(&self) -> &RenderConfig;

    /// The bound drawing function.
    fn draw_fn(&self) -> &DrawFn;

    /// The descriptor name.
    fn name(&self) -> &str {
        &self.config().name
    }

    /// Output folder naming hook; empty means outputs land in the destination root.
    fn folder(&self) -> String {
        String::new()
    }

    /// Per-layer subfolder naming hook for single-layer passes.
    fn layer_folder(&self, _layer: &str) -> String {
        String::new()
    }

    /// `true` when the descriptor draws through a scoped native context and writes
    /// its own files.
    fn self_rasterizing(&self) -> bool {
        false
    }

    /// Generate the ordered passes for one request.
    fn passes(&self, action: Action, layers: &[String], indices: &[u32]) -> Vec<RenderPass<'_>>;

    /// Execute one pass, producing an abstract drawable or a materialized path.
    fn run(&self, pass: &RenderPass<'_>) -> PassageResult<RenderOutcome> {
        (pass.draw)(&pass.args).map(RenderOutcome::Drawable)
    }

    /// Apply the configured post-processing hook, or pass the result through.
    fn runpost(
        &self,
        result: RenderOutcome,
        pass: &RenderPass<'_>,
    ) -> PassageResult<RenderOutcome> {
        match &self.config().post {
            Some(post) => post(result, pass),
            None => Ok(result),
        }
    }

    /// Terminal multi-file aggregation over the completed output folder. No-op unless
    /// a variant overrides it.
    fn package(&self, _output_folder: &Path) -> PassageResult<()> {
        Ok(())
    }

    /// Forward one result to the preview transport.
    ///
    /// Materialized files are sent as images at half the configured rect; drawables
    /// are sent as composites with a bounded display width.
    fn send_preview(
        &self,
        sink: &mut dyn PreviewSink,
        result: &RenderOutcome,
        _pass: &RenderPass<'_>,
    ) -> PassageResult<()> {
        let cfg = self.config();
        match result {
            RenderOutcome::File(path) => {
                let half = Rect::new(0.0, 0.0, cfg.rect.width() / 2.0, cfg.rect.height() / 2.0);
                sink.send(
                    PreviewArtifact::Image(path),
                    half,
                    cfg.bg,
                    &PreviewOptions::image(),
                )
            }
            RenderOutcome::Drawable(scene) => sink.send(
                PreviewArtifact::Drawable(scene),
                cfg.rect,
                cfg.bg,
                &PreviewOptions::composite(800.0),
            ),
        }
    }
}

/// Execute one pass through a scoped native drawing context.
///
/// The context is acquired per execution and released on every exit path, including
/// failure; the artifact is written by the backend itself.
pub(crate) fn run_native(
    backend: &dyn NativeBackend,
    rect: Rect,
    pass: &RenderPass<'_>,
) -> PassageResult<RenderOutcome> {
    let mut ctx = backend.acquire(rect)?;
    let scene = (pass.draw)(&pass.args)?;
    ctx.draw(&scene)?;
    if let Some(parent) = pass.output_path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("failed to create output directory '{}'", parent.display()))?;
    }
    ctx.materialize(&pass.output_path)?;
    Ok(RenderOutcome::File(pass.output_path.clone()))
}
