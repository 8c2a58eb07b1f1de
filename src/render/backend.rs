use std::path::{Path, PathBuf};
use std::sync::Arc;

use crate::foundation::core::{OutputFormat, Rect};
use crate::foundation::error::{PassageError, PassageResult};
use crate::render::scene::Scene;

/// Which rasterization route converts a descriptor's drawables into artifacts.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum BackendChoice {
    /// The host's native drawing backend (self-rasterizing descriptors draw through
    /// a scoped context of this backend).
    Native,
    /// The SVG rasterization route, for vector format requests.
    Svg,
    /// The portable offscreen raster route.
    Raster,
}

impl BackendChoice {
    /// Resolve the backend for a descriptor, once, at construction.
    ///
    /// Priority: explicit override, then the SVG route for vector format requests,
    /// then the platform default.
    pub fn resolve(explicit: Option<BackendChoice>, fmt: OutputFormat) -> BackendChoice {
        if let Some(choice) = explicit {
            return choice;
        }
        if fmt == OutputFormat::Svg {
            return BackendChoice::Svg;
        }
        if cfg!(target_os = "macos") {
            BackendChoice::Native
        } else {
            BackendChoice::Raster
        }
    }
}

/// A scoped drawing context acquired from a [`NativeBackend`].
///
/// The context is released when the box is dropped, on every exit path including
/// failure. Contexts are never shared across concurrent passes — each execution
/// acquires its own.
pub trait RasterContext {
    /// Draw a scene into the context.
    fn draw(&mut self, scene: &Scene) -> PassageResult<()>;

    /// Write the context's contents to `path` and return.
    fn materialize(&mut self, path: &Path) -> PassageResult<()>;
}

/// A self-contained drawing backend that owns its drawing contexts and writes files
/// directly.
pub trait NativeBackend: Send + Sync {
    /// Acquire a drawing context sized to `rect`.
    fn acquire(&self, rect: Rect) -> PassageResult<Box<dyn RasterContext + '_>>;
}

/// An out-of-process or out-of-crate rasterizer that converts an abstract drawable
/// into a pixel or vector file.
pub trait ExternalRasterizer: Send + Sync {
    /// Rasterize `scene` at `rect` into the file at `path`.
    fn rasterize(&self, scene: &Scene, rect: Rect, path: &Path) -> PassageResult<()>;
}

/// Host availability of the native self-rasterizing backend, resolved once at startup.
///
/// Self-rasterizing descriptors take this at construction and fail fast when the
/// backend is absent; availability is never re-probed at execution time.
#[derive(Clone)]
pub struct NativeCapability {
    backend: Option<Arc<dyn NativeBackend>>,
}

impl NativeCapability {
    /// Capability with the native backend present.
    pub fn present(backend: Arc<dyn NativeBackend>) -> Self {
        Self {
            backend: Some(backend),
        }
    }

    /// Capability with no native backend on this host.
    pub fn absent() -> Self {
        Self { backend: None }
    }

    /// `true` when the native backend is available.
    pub fn available(&self) -> bool {
        self.backend.is_some()
    }

    /// The native backend, or a construction-time fatal error when absent.
    pub fn require(&self) -> PassageResult<Arc<dyn NativeBackend>> {
        self.backend.clone().ok_or_else(|| {
            PassageError::backend("native drawing backend is not available on this host")
        })
    }
}

impl std::fmt::Debug for NativeCapability {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NativeCapability")
            .field("available", &self.available())
            .finish()
    }
}

/// The result of executing one render pass.
#[derive(Clone, Debug)]
pub enum RenderOutcome {
    /// An abstract drawable, to be rasterized externally or composited for preview.
    Drawable(Scene),
    /// A materialized artifact on disk.
    File(PathBuf),
}

impl RenderOutcome {
    /// The materialized path, when the outcome is a file.
    pub fn path(&self) -> Option<&Path> {
        match self {
            RenderOutcome::File(p) => Some(p),
            RenderOutcome::Drawable(_) => None,
        }
    }
}
