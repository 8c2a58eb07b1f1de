use std::path::Path;

use crate::foundation::core::{Rect, Rgba8};
use crate::foundation::error::PassageResult;
use crate::render::scene::Scene;

/// What a preview send carries: an abstract drawable composite or a materialized
/// image file.
#[derive(Clone, Copy, Debug)]
pub enum PreviewArtifact<'a> {
    /// An abstract drawable to composite in the sink.
    Drawable(&'a Scene),
    /// A file on disk, tagged as an image.
    Image(&'a Path),
}

/// Presentation options accompanying a preview send.
#[derive(Clone, Copy, Debug, Default)]
pub struct PreviewOptions {
    /// `true` when the artifact is a materialized image file.
    pub image: bool,
    /// Maximum display width for composites, in pixels.
    pub max_width: Option<f64>,
}

impl PreviewOptions {
    /// Options for a materialized image artifact.
    pub fn image() -> Self {
        Self {
            image: true,
            max_width: None,
        }
    }

    /// Options for a drawable composite artifact.
    pub fn composite(max_width: f64) -> Self {
        Self {
            image: false,
            max_width: Some(max_width),
        }
    }
}

/// The live preview transport.
///
/// The transport itself lives outside this crate; descriptors only produce sends.
pub trait PreviewSink {
    /// Send one artifact for display.
    fn send(
        &mut self,
        artifact: PreviewArtifact<'_>,
        rect: Rect,
        bg: Rgba8,
        options: &PreviewOptions,
    ) -> PassageResult<()>;
}
