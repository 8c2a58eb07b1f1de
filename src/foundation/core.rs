use crate::foundation::error::{PassageError, PassageResult};

pub use kurbo::{BezPath, Point, Rect, Vec2};

/// A contiguous, end-exclusive range of frame indices.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct FrameRange {
    /// First frame index in the range.
    pub start: u32,
    /// One past the last frame index in the range.
    pub end: u32,
}

impl FrameRange {
    /// Create a validated range (`start <= end`).
    pub fn new(start: u32, end: u32) -> PassageResult<Self> {
        if start > end {
            return Err(PassageError::validation("FrameRange start must be <= end"));
        }
        Ok(Self { start, end })
    }

    /// Number of frames in the range.
    pub fn len_frames(self) -> u32 {
        self.end.saturating_sub(self.start)
    }

    /// `true` when the range holds no frames.
    pub fn is_empty(self) -> bool {
        self.start == self.end
    }

    /// `true` when `f` lies inside the range.
    pub fn contains(self, f: u32) -> bool {
        self.start <= f && f < self.end
    }

    /// Iterate the frame indices of the range in ascending order.
    pub fn frames(self) -> impl Iterator<Item = u32> {
        self.start..self.end
    }
}

/// Straight-alpha RGBA8 color.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Rgba8 {
    /// Red channel.
    pub r: u8,
    /// Green channel.
    pub g: u8,
    /// Blue channel.
    pub b: u8,
    /// Alpha channel (255 = opaque).
    pub a: u8,
}

impl Rgba8 {
    /// Fully transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0, 0, 0, 0);
    /// Opaque white.
    pub const WHITE: Self = Self::rgba(255, 255, 255, 255);
    /// Opaque black.
    pub const BLACK: Self = Self::rgba(0, 0, 0, 255);
    /// The default descriptor background.
    pub const WHITESMOKE: Self = Self::rgba(245, 245, 245, 255);

    /// Construct from channel values.
    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Construct an opaque color.
    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self::rgba(r, g, b, 255)
    }
}

/// Output artifact formats a descriptor can request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Raster PNG output.
    #[default]
    Png,
    /// Vector SVG output.
    Svg,
    /// Vector PDF output.
    Pdf,
}

impl OutputFormat {
    /// File extension for the format, without a leading dot.
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Png => "png",
            OutputFormat::Svg => "svg",
            OutputFormat::Pdf => "pdf",
        }
    }

    /// `true` for vector formats.
    pub fn is_vector(self) -> bool {
        matches!(self, OutputFormat::Svg | OutputFormat::Pdf)
    }
}
