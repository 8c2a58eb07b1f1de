//! Animation timelines and per-pass frames.

/// Action-driven frame/index resolution.
pub mod resolve;

use crate::foundation::core::{FrameRange, Rect};

/// The declared time structure of an animation.
///
/// A timeline is owned by an animation descriptor; an externally supplied timeline is
/// shared by reference (`Arc`) rather than copied.
#[derive(Clone, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Timeline {
    /// Total frame count; valid frame indices are `0..duration`.
    pub duration: u32,
    /// Explicit interesting frame indices, in declared order.
    pub storyboard: Vec<u32>,
    /// Zero or more contiguous frame ranges marking areas of active work.
    pub workareas: Vec<FrameRange>,
}

impl Timeline {
    /// Create a timeline of `duration` frames with the default storyboard `[0]`.
    pub fn new(duration: u32) -> Self {
        Self {
            duration,
            storyboard: vec![0],
            workareas: Vec::new(),
        }
    }

    /// Replace the storyboard.
    pub fn with_storyboard(mut self, storyboard: Vec<u32>) -> Self {
        self.storyboard = storyboard;
        self
    }

    /// Replace the workareas.
    pub fn with_workareas(mut self, workareas: Vec<FrameRange>) -> Self {
        self.workareas = workareas;
        self
    }

    /// Every frame index of the timeline, ascending.
    pub fn all_frames(&self) -> Vec<u32> {
        (0..self.duration).collect()
    }
}

/// One frame of an animation, bound to a single render pass.
///
/// A frame carries its index, a back-reference to the owning animation's timeline and
/// rect, and the layer subset active for the pass. Frames are created per pass and
/// discarded after use; they have no independent lifecycle.
#[derive(Clone, Debug)]
pub struct Frame<'r> {
    /// Frame index within `0..timeline.duration`.
    pub i: u32,
    /// The owning animation's timeline.
    pub timeline: &'r Timeline,
    /// The owning animation's rect.
    pub rect: Rect,
    /// Layers active for this pass.
    pub layers: Vec<String>,
}

impl<'r> Frame<'r> {
    /// Bind frame `i` of `timeline` to a pass.
    pub fn new(i: u32, timeline: &'r Timeline, rect: Rect, layers: Vec<String>) -> Self {
        Self {
            i,
            timeline,
            rect,
            layers,
        }
    }

    /// Normalized position of this frame in the timeline, in `[0, 1)`.
    pub fn progress(&self) -> f64 {
        if self.timeline.duration == 0 {
            return 0.0;
        }
        f64::from(self.i) / f64::from(self.timeline.duration)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn timeline_defaults_storyboard_to_zero() {
        let t = Timeline::new(24);
        assert_eq!(t.storyboard, vec![0]);
        assert!(t.workareas.is_empty());
        assert_eq!(t.all_frames().len(), 24);
    }

    #[test]
    fn frame_progress_is_normalized() {
        let t = Timeline::new(10);
        let f = Frame::new(5, &t, Rect::new(0.0, 0.0, 100.0, 100.0), vec![]);
        assert_eq!(f.progress(), 0.5);
    }

    #[test]
    fn frame_progress_handles_zero_duration() {
        let t = Timeline::new(0);
        let f = Frame::new(0, &t, Rect::new(0.0, 0.0, 1.0, 1.0), vec![]);
        assert_eq!(f.progress(), 0.0);
    }
}
