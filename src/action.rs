/// The caller's intent for one request.
///
/// Actions are a closed set, compared by identity and consumed through exhaustive
/// matches in the frame resolver and each descriptor's pass-generation policy.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// First evaluation of a freshly loaded description.
    Initial,
    /// The description was saved again without semantic changes.
    Resave,
    /// Render every frame of every renderable.
    RenderAll,
    /// Render the first declared workarea.
    RenderWorkarea,
    /// Render an explicit list of frame indices.
    RenderIndices,
    /// Preview the storyboard frames.
    PreviewStoryboard,
    /// Play the preview continuously.
    PreviewPlay,
    /// Preview an explicit list of frame indices.
    PreviewIndices,
    /// Step the storyboard preview forward.
    PreviewStoryboardNext,
    /// Step the storyboard preview backward.
    PreviewStoryboardPrev,
    /// Play back already-rendered artifacts.
    RenderedPlay,
    /// Free-form typing forwarded to the description.
    ArbitraryTyping,
    /// Free-form command forwarded to the description.
    ArbitraryCommand,
    /// A UI callback fired.
    UiCallback,
    /// Restart the renderer process.
    RestartRenderer,
    /// Terminate the renderer.
    Kill,
}

impl Action {
    /// `true` for actions that materialize artifacts to disk.
    ///
    /// Render-class actions drive per-layer pass generation and the terminal
    /// packaging step; everything else is preview-class.
    pub fn is_render(self) -> bool {
        matches!(
            self,
            Action::RenderAll | Action::RenderWorkarea | Action::RenderIndices
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn render_classification_is_closed() {
        assert!(Action::RenderAll.is_render());
        assert!(Action::RenderWorkarea.is_render());
        assert!(Action::RenderIndices.is_render());
        assert!(!Action::Initial.is_render());
        assert!(!Action::PreviewStoryboard.is_render());
        assert!(!Action::PreviewIndices.is_render());
        assert!(!Action::RenderedPlay.is_render());
    }

    #[test]
    fn serde_tags_are_snake_case() {
        assert_eq!(
            serde_json::to_string(&Action::PreviewStoryboardNext).unwrap(),
            "\"preview_storyboard_next\""
        );
        let a: Action = serde_json::from_str("\"render_all\"").unwrap();
        assert_eq!(a, Action::RenderAll);
    }
}
