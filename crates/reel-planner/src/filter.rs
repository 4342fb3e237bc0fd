use reel_types::Video;

use crate::PlanContext;
use crate::state::RunState;

/// Unplaced, schedulable videos of `category_id` that fit in `max_duration_sec`.
/// Seen videos are kept only when `allow_seen` is set. Order follows the catalogue.
#[must_use]
pub fn filter_videos<'a>(
    ctx: &PlanContext<'a>,
    state: &RunState<'a>,
    category_id: &str,
    max_duration_sec: i64,
    allow_seen: bool,
) -> Vec<&'a Video> {
    ctx.catalogue
        .videos()
        .iter()
        .filter(|video| video.is_schedulable())
        .filter(|video| i64::from(video.duration_sec) <= max_duration_sec)
        .filter(|video| allow_seen || !ctx.history.contains_key(&video.video_id))
        .filter(|video| !state.contains(&video.video_id))
        .filter(|video| ctx.catalogue.effective_category(video) == Some(category_id))
        .collect()
}
