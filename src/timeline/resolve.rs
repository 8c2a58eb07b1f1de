use crate::action::Action;
use crate::timeline::Timeline;

/// Resolve the concrete frame indices a request should render.
///
/// Pure and order-preserving: identical inputs always produce the identical sequence.
///
/// Policy, in priority order:
/// 1. [`Action::RenderAll`] — every index in `0..duration`, ascending.
/// 2. [`Action::RenderIndices`] / [`Action::PreviewIndices`] — exactly `requested`,
///    in caller order, neither sorted nor deduplicated.
/// 3. [`Action::RenderWorkarea`] — the first declared workarea's range; the full
///    `0..duration` range when no workarea is declared (never an error).
/// 4. Any other action — the storyboard, in declared order.
pub fn resolve_frames(action: Action, timeline: &Timeline, requested: &[u32]) -> Vec<u32> {
    match action {
        Action::RenderAll => timeline.all_frames(),
        Action::RenderIndices | Action::PreviewIndices => requested.to_vec(),
        Action::RenderWorkarea => match timeline.workareas.first() {
            Some(area) => area.frames().collect(),
            None => timeline.all_frames(),
        },
        _ => timeline.storyboard.clone(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::foundation::core::FrameRange;

    fn timeline() -> Timeline {
        Timeline::new(24).with_storyboard(vec![0, 10, 20])
    }

    #[test]
    fn render_all_covers_full_duration_ascending() {
        let frames = resolve_frames(Action::RenderAll, &timeline(), &[]);
        assert_eq!(frames, (0..24).collect::<Vec<_>>());
    }

    #[test]
    fn explicit_indices_pass_through_in_caller_order() {
        let frames = resolve_frames(Action::RenderIndices, &timeline(), &[7, 3, 3, 11]);
        assert_eq!(frames, vec![7, 3, 3, 11]);
        let frames = resolve_frames(Action::PreviewIndices, &timeline(), &[9, 1]);
        assert_eq!(frames, vec![9, 1]);
    }

    #[test]
    fn workarea_uses_first_declared_range() {
        let t = timeline().with_workareas(vec![
            FrameRange::new(4, 8).unwrap(),
            FrameRange::new(12, 16).unwrap(),
        ]);
        let frames = resolve_frames(Action::RenderWorkarea, &t, &[]);
        assert_eq!(frames, vec![4, 5, 6, 7]);
    }

    #[test]
    fn workarea_falls_back_to_full_range_when_none_declared() {
        let frames = resolve_frames(Action::RenderWorkarea, &timeline(), &[]);
        assert_eq!(frames, (0..24).collect::<Vec<_>>());
    }

    #[test]
    fn other_actions_use_storyboard_in_declared_order() {
        let t = Timeline::new(24).with_storyboard(vec![20, 0, 10]);
        for action in [
            Action::Initial,
            Action::PreviewStoryboard,
            Action::PreviewStoryboardNext,
            Action::PreviewStoryboardPrev,
            Action::Resave,
        ] {
            assert_eq!(resolve_frames(action, &t, &[]), vec![20, 0, 10]);
        }
    }

    #[test]
    fn resolver_is_deterministic() {
        let t = timeline();
        let a = resolve_frames(Action::RenderAll, &t, &[]);
        let b = resolve_frames(Action::RenderAll, &t, &[]);
        assert_eq!(a, b);
    }
}
