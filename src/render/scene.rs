use std::path::PathBuf;

use crate::foundation::core::{BezPath, Rect, Rgba8};

/// One backend-agnostic drawing operation.
#[derive(Clone, Debug)]
pub enum DrawOp {
    /// Fill a bezier path with a solid color.
    Fill {
        /// Path geometry in scene coordinates.
        path: BezPath,
        /// Fill color.
        color: Rgba8,
    },
    /// Stroke a bezier path with a solid color.
    Stroke {
        /// Path geometry in scene coordinates.
        path: BezPath,
        /// Stroke color.
        color: Rgba8,
        /// Stroke width in scene units.
        width: f64,
    },
    /// Place a previously materialized image.
    Image {
        /// Path to the image file.
        source: PathBuf,
        /// Destination rect in scene coordinates.
        dest: Rect,
    },
}

/// The abstract drawable a draw function produces.
///
/// A scene is an ordered display list. It is the value handed to an
/// [`ExternalRasterizer`](crate::render::backend::ExternalRasterizer), drawn into a
/// scoped [`RasterContext`](crate::render::backend::RasterContext), or forwarded to a
/// preview sink as a composite. Concrete rasterization lives outside this crate.
#[derive(Clone, Debug, Default)]
pub struct Scene {
    /// Drawing operations, back to front.
    pub ops: Vec<DrawOp>,
}

impl Scene {
    /// Create an empty scene.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one operation.
    pub fn push(&mut self, op: DrawOp) {
        self.ops.push(op);
    }

    /// `true` when the scene holds no operations.
    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }
}
