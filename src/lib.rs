//! Passage turns a declarative description of a renderable artifact (a still image,
//! an icon set, a font-preview sheet, a glyph, or a timed animation) plus a requested
//! action into a concrete, ordered collection of independent render passes, each
//! sufficient to produce exactly one output artifact. It then executes those passes
//! against a pluggable drawing backend, optionally post-processes each result, and
//! optionally performs a terminal packaging step aggregating multiple outputs into
//! one composite file.
//!
//! # Pipeline overview
//!
//! 1. **Describe**: a [`RenderConfig`] composed into one descriptor variant
//!    ([`Still`], [`Glyph`], [`FontPreview`], [`IconSet`], [`Animation`], ...)
//! 2. **Generate**: `Renderable::passes(action, layers, indices)` resolves frames,
//!    layers, and sizes into ordered, mutually independent [`RenderPass`] items
//! 3. **Execute**: [`Engine`] runs passes on a bounded worker pool, applies the
//!    post-processing hook, and materializes or previews each result
//! 4. **Package** (icon sets): aggregate the completed output folder into composite
//!    icon containers
//!
//! Key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Pure resolution**: frame/index resolution is deterministic and
//!   order-preserving for a given input.
//! - **Pass independence**: no pass reads another pass's output; requests carry no
//!   persistent queue or retry state.
//! - **Scoped contexts**: self-rasterizing execution acquires and releases its own
//!   drawing context per pass, on every exit path.
//!
//! Concrete rasterizers, font loading, the preview transport, and hardware polling
//! are collaborator boundaries, consumed through the traits in [`render::backend`],
//! [`preview`], and [`control::merger`].
#![forbid(unsafe_code)]
#![deny(missing_docs)]

/// Request intents.
pub mod action;
/// Controller-input merging.
pub mod control;
/// Shared value types and errors.
pub mod foundation;
/// External 3D-host frame supervision.
pub mod host;
/// The preview transport boundary.
pub mod preview;
/// Pass execution and backends.
pub mod render;
/// Descriptors and pass generation.
pub mod renderable;
/// Timelines and frame resolution.
pub mod timeline;

pub use action::Action;
pub use control::merger::{
    ControlKey, ControlMessage, ControlPort, ControllerConfig, ControllerState,
    ControllerWatcher, DeviceShortcuts,
};
pub use foundation::core::{BezPath, FrameRange, OutputFormat, Point, Rect, Rgba8, Vec2};
pub use foundation::error::{PassageError, PassageResult};
pub use host::frame::{
    FrameRenderLog, HOST_ERROR_MARKER, HostFrameJob, SuperviseStatus, render_frame_supervised,
    supervise,
};
pub use preview::{PreviewArtifact, PreviewOptions, PreviewSink};
pub use render::backend::{
    BackendChoice, ExternalRasterizer, NativeBackend, NativeCapability, RasterContext,
    RenderOutcome,
};
pub use render::engine::{Engine, PassReport};
pub use render::scene::{DrawOp, Scene};
pub use renderable::animation::{Animation, LayeredAnimation};
pub use renderable::config::{DrawFn, PostFn, RenderConfig, UiCallbackFn};
pub use renderable::fontpreview::{FontPreview, retain_matches};
pub use renderable::iconset::{DEFAULT_SIZES, IconSet, VALID_SIZES};
pub use renderable::still::{Glyph, NativeSketch, Still, SvgIcon};
pub use renderable::{PassArgs, RenderPass, Renderable};
pub use timeline::resolve::resolve_frames;
pub use timeline::{Frame, Timeline};
