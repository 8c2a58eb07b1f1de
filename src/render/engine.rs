use std::collections::{BTreeMap, HashSet};
use std::path::PathBuf;
use std::sync::Arc;

use anyhow::Context as _;
use rayon::prelude::*;

use crate::action::Action;
use crate::foundation::error::{PassageError, PassageResult};
use crate::preview::PreviewSink;
use crate::render::backend::{BackendChoice, ExternalRasterizer, RenderOutcome};
use crate::renderable::{RenderPass, Renderable};

/// The recorded result of one pass within a request.
///
/// A failing pass aborts only its own artifact; sibling passes in the same request
/// are unaffected.
#[derive(Debug)]
pub struct PassReport {
    /// The pass's output-name suffix.
    pub suffix: String,
    /// The isolated layer tag, when the pass was single-layer.
    pub single_layer: Option<String>,
    /// The pass's resolved output path.
    pub output_path: PathBuf,
    /// The pass's outcome or failure.
    pub result: PassageResult<RenderOutcome>,
}

impl PassReport {
    /// `true` when the pass produced its artifact.
    pub fn is_ok(&self) -> bool {
        self.result.is_ok()
    }
}

/// Executes render passes against the selected backends.
///
/// Passes within one request are mutually independent and execute concurrently on a
/// bounded worker pool. The engine holds no cross-request state.
#[derive(Clone, Default)]
pub struct Engine {
    rasterizers: BTreeMap<BackendChoice, Arc<dyn ExternalRasterizer>>,
    threads: Option<usize>,
}

impl Engine {
    /// Create an engine with no external rasterizers and the default worker count.
    pub fn new() -> Self {
        Self::default()
    }

    /// Install the external rasterizer materializing drawable results for
    /// descriptors that resolved to `choice`.
    pub fn with_rasterizer(
        mut self,
        choice: BackendChoice,
        rasterizer: Arc<dyn ExternalRasterizer>,
    ) -> Self {
        self.rasterizers.insert(choice, rasterizer);
        self
    }

    /// Bound the worker pool to `threads` workers.
    pub fn with_threads(mut self, threads: usize) -> Self {
        self.threads = Some(threads);
        self
    }

    /// Execute one pass: run, post-process, and (when `materialize` is set)
    /// rasterize a drawable result to the pass's resolved output path.
    pub fn run_pass(
        &self,
        renderable: &dyn Renderable,
        pass: &RenderPass<'_>,
        materialize: bool,
    ) -> PassageResult<RenderOutcome> {
        let result = renderable.run(pass)?;
        let result = renderable.runpost(result, pass)?;
        if !materialize {
            return Ok(result);
        }
        match result {
            RenderOutcome::File(path) => Ok(RenderOutcome::File(path)),
            RenderOutcome::Drawable(scene) => {
                let choice = renderable.config().backend();
                let rasterizer = self.rasterizers.get(&choice).ok_or_else(|| {
                    PassageError::backend(format!(
                        "no external rasterizer installed for the {choice:?} route"
                    ))
                })?;
                if let Some(parent) = pass.output_path.parent() {
                    std::fs::create_dir_all(parent).with_context(|| {
                        format!("failed to create output directory '{}'", parent.display())
                    })?;
                }
                rasterizer.rasterize(&scene, renderable.config().rect, &pass.output_path)?;
                Ok(RenderOutcome::File(pass.output_path.clone()))
            }
        }
    }

    /// Generate and execute every pass of one request.
    ///
    /// Output-path collisions across passes are a configuration error, rejected
    /// before anything runs. For render-class actions where every pass succeeded,
    /// the descriptor's terminal packaging step runs over the output folder.
    #[tracing::instrument(
        skip(self, renderable, layers, indices),
        fields(renderable = %renderable.config().name)
    )]
    pub fn execute(
        &self,
        renderable: &dyn Renderable,
        action: Action,
        layers: &[String],
        indices: &[u32],
    ) -> PassageResult<Vec<PassReport>> {
        let passes = renderable.passes(action, layers, indices);
        ensure_distinct_paths(&passes)?;
        tracing::debug!(count = passes.len(), "generated passes");

        let materialize = action.is_render();
        let pool = build_thread_pool(self.threads)?;
        let reports: Vec<PassReport> = pool.install(|| {
            passes
                .par_iter()
                .map(|pass| PassReport {
                    suffix: pass.suffix.clone(),
                    single_layer: pass.single_layer.clone(),
                    output_path: pass.output_path.clone(),
                    result: self.run_pass(renderable, pass, materialize),
                })
                .collect()
        });

        if materialize && reports.iter().all(PassReport::is_ok) {
            let folder = renderable.config().output_folder(&renderable.folder());
            renderable.package(&folder)?;
        }
        Ok(reports)
    }

    /// Generate and execute every pass of one request, forwarding each result to
    /// the preview transport.
    ///
    /// Preview runs sequentially in request order and never materializes drawables
    /// through the external rasterizer.
    pub fn preview(
        &self,
        renderable: &dyn Renderable,
        action: Action,
        layers: &[String],
        indices: &[u32],
        sink: &mut dyn PreviewSink,
    ) -> PassageResult<Vec<PassReport>> {
        if action == Action::UiCallback
            && let Some(callback) = &renderable.config().ui_callback
        {
            callback();
        }
        let passes = renderable.passes(action, layers, indices);
        let mut reports = Vec::with_capacity(passes.len());
        for pass in &passes {
            let result = self.run_pass(renderable, pass, false);
            if let Ok(outcome) = &result {
                renderable.send_preview(sink, outcome, pass)?;
            }
            reports.push(PassReport {
                suffix: pass.suffix.clone(),
                single_layer: pass.single_layer.clone(),
                output_path: pass.output_path.clone(),
                result,
            });
        }
        Ok(reports)
    }
}

impl std::fmt::Debug for Engine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Engine")
            .field(
                "rasterizers",
                &self.rasterizers.keys().collect::<Vec<_>>(),
            )
            .field("threads", &self.threads)
            .finish()
    }
}

fn build_thread_pool(threads: Option<usize>) -> PassageResult<rayon::ThreadPool> {
    if let Some(n) = threads
        && n == 0
    {
        return Err(PassageError::validation(
            "engine 'threads' must be >= 1 when set",
        ));
    }

    let mut builder = rayon::ThreadPoolBuilder::new();
    if let Some(n) = threads {
        builder = builder.num_threads(n);
    }
    builder
        .build()
        .map_err(|e| PassageError::render(format!("failed to build worker pool: {e}")))
}

/// Distinct passes must write distinct output paths; a collision is a configuration
/// error, not a runtime race.
fn ensure_distinct_paths(passes: &[RenderPass<'_>]) -> PassageResult<()> {
    let mut seen = HashSet::new();
    for pass in passes {
        if !seen.insert(&pass.output_path) {
            return Err(PassageError::validation(format!(
                "output path collision across passes: '{}'",
                pass.output_path.display()
            )));
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderable::config::{DrawFn, RenderConfig};
    use crate::renderable::still::Still;
    use crate::render::scene::Scene;

    fn noop_draw() -> DrawFn {
        Arc::new(|_args| Ok(Scene::new()))
    }

    #[test]
    fn zero_threads_is_a_validation_error() {
        let engine = Engine::new().with_threads(0);
        let still = Still::new(RenderConfig::new("poster"), noop_draw());
        let err = engine.execute(&still, Action::Initial, &[], &[]).unwrap_err();
        assert!(matches!(err, PassageError::Validation(_)));
    }

    #[test]
    fn preview_does_not_require_a_rasterizer() {
        struct NullSink;
        impl PreviewSink for NullSink {
            fn send(
                &mut self,
                _artifact: crate::preview::PreviewArtifact<'_>,
                _rect: crate::foundation::core::Rect,
                _bg: crate::foundation::core::Rgba8,
                _options: &crate::preview::PreviewOptions,
            ) -> PassageResult<()> {
                Ok(())
            }
        }

        let engine = Engine::new();
        let still = Still::new(RenderConfig::new("poster"), noop_draw());
        let reports = engine
            .preview(&still, Action::Initial, &[], &[], &mut NullSink)
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert!(reports[0].is_ok());
    }

    #[test]
    fn render_without_matching_rasterizer_fails_per_pass_not_per_request() {
        let engine = Engine::new();
        let still = Still::new(RenderConfig::new("poster"), noop_draw());
        let reports = engine
            .execute(&still, Action::RenderIndices, &[], &[])
            .unwrap();
        assert_eq!(reports.len(), 1);
        assert!(matches!(
            reports[0].result,
            Err(PassageError::Backend(_))
        ));
    }
}
