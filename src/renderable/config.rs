use std::path::PathBuf;
use std::sync::Arc;

use crate::foundation::core::{OutputFormat, Rect, Rgba8};
use crate::foundation::error::PassageResult;
use crate::render::backend::{BackendChoice, RenderOutcome};
use crate::render::scene::Scene;
use crate::renderable::{PassArgs, RenderPass};

/// The drawing function bound to a descriptor.
///
/// Draw functions receive the pass's typed positional arguments and produce an
/// abstract drawable.
pub type DrawFn = Arc<dyn Fn(&PassArgs<'_>) -> PassageResult<Scene> + Send + Sync>;

/// The optional post-processing hook applied to each raw pass result.
///
/// This is the only place user-supplied transformation logic may alter an artifact
/// after rendering.
pub type PostFn =
    Arc<dyn Fn(RenderOutcome, &RenderPass<'_>) -> PassageResult<RenderOutcome> + Send + Sync>;

/// The optional callback invoked for [`Action::UiCallback`](crate::Action::UiCallback)
/// requests.
pub type UiCallbackFn = Arc<dyn Fn() + Send + Sync>;

/// Shared configuration composed into every descriptor variant.
///
/// Created at descriptor construction and never mutated afterwards. The `with_*`
/// methods are chainable and consumed before the config is handed to a variant.
#[derive(Clone)]
pub struct RenderConfig {
    /// Descriptor name; doubles as the bound drawing function's name for suffixes
    /// and folder naming.
    pub name: String,
    /// Artboard rect.
    pub rect: Rect,
    /// Background color.
    pub bg: Rgba8,
    /// Output artifact format.
    pub fmt: OutputFormat,
    /// Explicit destination root; `renders/` beside the working directory when unset.
    pub dst: Option<PathBuf>,
    /// Custom output folder name, overriding the variant's folder naming.
    pub custom_folder: Option<String>,
    /// Output filename prefix; `{name}_` when unset.
    pub prefix: Option<String>,
    /// Post-processing hook.
    pub post: Option<PostFn>,
    /// UI callback.
    pub ui_callback: Option<UiCallbackFn>,
    /// Declared layer names.
    pub layers: Vec<String>,
    /// Declared watch paths, consumed by an external reloader.
    pub watch: Vec<PathBuf>,
    /// Hidden descriptors are skipped by interactive frontends.
    pub hidden: bool,
    backend_override: Option<BackendChoice>,
}

impl RenderConfig {
    /// Create a config named `name` with the default 1080×1080 rect.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            rect: Rect::new(0.0, 0.0, 1080.0, 1080.0),
            bg: Rgba8::WHITESMOKE,
            fmt: OutputFormat::Png,
            dst: None,
            custom_folder: None,
            prefix: None,
            post: None,
            ui_callback: None,
            layers: Vec::new(),
            watch: Vec::new(),
            hidden: false,
            backend_override: None,
        }
    }

    /// Set the artboard rect.
    pub fn with_rect(mut self, rect: Rect) -> Self {
        self.rect = rect;
        self
    }

    /// Set the background color.
    pub fn with_bg(mut self, bg: Rgba8) -> Self {
        self.bg = bg;
        self
    }

    /// Set the output format.
    pub fn with_format(mut self, fmt: OutputFormat) -> Self {
        self.fmt = fmt;
        self
    }

    /// Set an explicit destination root.
    pub fn with_dst(mut self, dst: impl Into<PathBuf>) -> Self {
        self.dst = Some(dst.into());
        self
    }

    /// Set a custom output folder name.
    pub fn with_custom_folder(mut self, folder: impl Into<String>) -> Self {
        self.custom_folder = Some(folder.into());
        self
    }

    /// Set an explicit filename prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = Some(prefix.into());
        self
    }

    /// Install a post-processing hook.
    pub fn with_post(mut self, post: PostFn) -> Self {
        self.post = Some(post);
        self
    }

    /// Install a UI callback.
    pub fn with_ui_callback(mut self, cb: UiCallbackFn) -> Self {
        self.ui_callback = Some(cb);
        self
    }

    /// Override the backend choice.
    pub fn with_backend(mut self, backend: BackendChoice) -> Self {
        self.backend_override = Some(backend);
        self
    }

    /// Declare layer names.
    pub fn with_layers(mut self, layers: Vec<String>) -> Self {
        self.layers = layers;
        self
    }

    /// Declare watch paths.
    pub fn with_watch(mut self, watch: Vec<PathBuf>) -> Self {
        self.watch = watch;
        self
    }

    /// Mark the descriptor hidden.
    pub fn hidden(mut self) -> Self {
        self.hidden = true;
        self
    }

    /// The backend for this descriptor: explicit override, then the SVG route for
    /// vector format requests, then the platform default.
    pub fn backend(&self) -> BackendChoice {
        BackendChoice::resolve(self.backend_override, self.fmt)
    }

    /// Effective filename prefix.
    pub fn prefix(&self) -> String {
        self.prefix
            .clone()
            .unwrap_or_else(|| format!("{}_", self.name))
    }

    /// Destination root for outputs.
    pub fn output_root(&self) -> PathBuf {
        self.dst.clone().unwrap_or_else(|| PathBuf::from("renders"))
    }

    /// Output folder: the custom folder when set, otherwise the variant's `folder`
    /// naming, otherwise the root itself.
    pub fn output_folder(&self, folder: &str) -> PathBuf {
        let mut path = self.output_root();
        match &self.custom_folder {
            Some(custom) => path.push(custom),
            None if !folder.is_empty() => path.push(folder),
            None => {}
        }
        path
    }

    /// Resolve one pass's output path:
    /// `{root}/{custom-folder | folder}/{layer-folder?}/{prefix}{suffix}.{ext}`.
    pub fn output_path(&self, folder: &str, layer_folder: Option<&str>, suffix: &str) -> PathBuf {
        let mut path = self.output_folder(folder);
        if let Some(layer) = layer_folder {
            if !layer.is_empty() {
                path.push(layer);
            }
        }
        path.push(format!("{}{}.{}", self.prefix(), suffix, self.fmt.extension()));
        path
    }
}

impl std::fmt::Debug for RenderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RenderConfig")
            .field("name", &self.name)
            .field("rect", &self.rect)
            .field("bg", &self.bg)
            .field("fmt", &self.fmt)
            .field("dst", &self.dst)
            .field("custom_folder", &self.custom_folder)
            .field("prefix", &self.prefix)
            .field("post", &self.post.as_ref().map(|_| "<fn>"))
            .field("layers", &self.layers)
            .field("watch", &self.watch)
            .field("hidden", &self.hidden)
            .field("backend", &self.backend())
            .finish()
    }
}
