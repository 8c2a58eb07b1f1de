use std::path::Path;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use passage::{
    Action, Animation, BackendChoice, DrawFn, Engine, ExternalRasterizer, IconSet, PassArgs,
    PassageError, PassageResult, PreviewArtifact, PreviewOptions, PreviewSink, Rect, RenderConfig,
    Rgba8, Scene, Still, Timeline,
};

/// Stand-in rasterizer: materializes every drawable as a small opaque PNG.
struct PngRasterizer;

impl ExternalRasterizer for PngRasterizer {
    fn rasterize(&self, _scene: &Scene, _rect: Rect, path: &Path) -> PassageResult<()> {
        let img = image::RgbaImage::from_pixel(8, 8, image::Rgba([10, 20, 30, 255]));
        img.save(path)
            .map_err(|e| PassageError::render(format!("png write failed: {e}")))
    }
}

fn noop_draw() -> DrawFn {
    Arc::new(|_args| Ok(Scene::new()))
}

fn engine() -> Engine {
    let rasterizer = Arc::new(PngRasterizer);
    Engine::new()
        .with_rasterizer(BackendChoice::Native, rasterizer.clone())
        .with_rasterizer(BackendChoice::Raster, rasterizer.clone())
        .with_rasterizer(BackendChoice::Svg, rasterizer)
        .with_threads(2)
}

#[test]
fn animation_render_all_materializes_every_frame() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RenderConfig::new("wave").with_dst(dir.path());
    let anim = Animation::new(cfg, noop_draw(), Timeline::new(6));

    let reports = engine()
        .execute(&anim, Action::RenderAll, &[], &[])
        .unwrap();
    assert_eq!(reports.len(), 6);
    for report in &reports {
        assert!(report.is_ok(), "pass {} failed", report.suffix);
        assert!(report.output_path.exists());
    }
    assert!(dir.path().join("wave/wave_0000.png").exists());
    assert!(dir.path().join("wave/wave_0005.png").exists());
}

#[test]
fn duplicate_indices_collide_before_anything_runs() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RenderConfig::new("wave").with_dst(dir.path());
    let anim = Animation::new(cfg, noop_draw(), Timeline::new(6));

    let err = engine()
        .execute(&anim, Action::RenderIndices, &[], &[3, 3])
        .unwrap_err();
    assert!(matches!(err, PassageError::Validation(_)));
    assert!(!dir.path().join("wave/wave_0003.png").exists());
}

#[test]
fn post_hook_runs_once_per_pass() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let cfg = RenderConfig::new("poster")
        .with_dst(dir.path())
        .with_post(Arc::new(move |result, _pass| {
            counter.fetch_add(1, Ordering::SeqCst);
            Ok(result)
        }));
    let still = Still::new(cfg, noop_draw());

    let reports = engine()
        .execute(&still, Action::RenderIndices, &[], &[])
        .unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].is_ok());
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn failing_pass_leaves_siblings_unaffected() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RenderConfig::new("wave").with_dst(dir.path());
    let draw: DrawFn = Arc::new(|args| match args {
        PassArgs::Frame(frame) if frame.i == 2 => {
            Err(PassageError::render("frame 2 refused to draw"))
        }
        _ => Ok(Scene::new()),
    });
    let anim = Animation::new(cfg, draw, Timeline::new(6));

    let reports = engine()
        .execute(&anim, Action::RenderIndices, &[], &[1, 2, 3])
        .unwrap();
    assert_eq!(reports.len(), 3);
    assert!(reports[0].is_ok());
    assert!(!reports[1].is_ok());
    assert!(reports[2].is_ok());
    assert!(dir.path().join("wave/wave_0001.png").exists());
    assert!(!dir.path().join("wave/wave_0002.png").exists());
    assert!(dir.path().join("wave/wave_0003.png").exists());
}

// The platform bundle sub-step shells out to macOS-only tools; the generic
// container is the portable path exercised here.
#[cfg(not(target_os = "macos"))]
#[test]
fn iconset_render_packages_a_generic_container() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RenderConfig::new("app").with_dst(dir.path());
    let set = IconSet::with_sizes(cfg, noop_draw(), vec![1024]);

    let reports = engine()
        .execute(&set, Action::RenderIndices, &[], &[])
        .unwrap();
    assert_eq!(reports.len(), 1);
    assert!(reports[0].is_ok());
    assert!(dir.path().join("app_source/app_1024.png").exists());
    assert!(dir.path().join("app.ico").exists());
}

#[derive(Default)]
struct RecordingSink {
    composites: usize,
    images: usize,
    max_widths: Vec<Option<f64>>,
}

impl PreviewSink for RecordingSink {
    fn send(
        &mut self,
        artifact: PreviewArtifact<'_>,
        _rect: Rect,
        _bg: Rgba8,
        options: &PreviewOptions,
    ) -> PassageResult<()> {
        match artifact {
            PreviewArtifact::Drawable(_) => self.composites += 1,
            PreviewArtifact::Image(_) => self.images += 1,
        }
        self.max_widths.push(options.max_width);
        Ok(())
    }
}

#[test]
fn ui_callback_requests_invoke_the_configured_callback() {
    let dir = tempfile::tempdir().unwrap();
    let calls = Arc::new(AtomicUsize::new(0));
    let counter = calls.clone();
    let cfg = RenderConfig::new("panel")
        .with_dst(dir.path())
        .with_ui_callback(Arc::new(move || {
            counter.fetch_add(1, Ordering::SeqCst);
        }));
    let still = Still::new(cfg, noop_draw());

    let mut sink = RecordingSink::default();
    engine()
        .preview(&still, Action::UiCallback, &[], &[], &mut sink)
        .unwrap();
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn preview_forwards_drawable_composites() {
    let dir = tempfile::tempdir().unwrap();
    let cfg = RenderConfig::new("wave").with_dst(dir.path());
    let anim = Animation::new(cfg, noop_draw(), Timeline::new(6).with_storyboard(vec![0, 3]));

    let mut sink = RecordingSink::default();
    let reports = engine()
        .preview(&anim, Action::PreviewStoryboard, &[], &[], &mut sink)
        .unwrap();
    assert_eq!(reports.len(), 2);
    assert_eq!(sink.composites, 2);
    assert_eq!(sink.images, 0);
    assert_eq!(sink.max_widths, vec![Some(800.0), Some(800.0)]);
    // Preview never materializes.
    assert!(!dir.path().join("wave/wave_0000.png").exists());
}
