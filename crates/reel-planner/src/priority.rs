use std::cmp::Ordering;
use std::collections::HashMap;

use rand::RngCore;
use reel_types::{FillerPriority, TemplateFiller, Video};

use crate::PlanContext;

/// Stable in-place ordering of candidates.
///
/// Videos of one group are ranked against each other by the filler's video
/// policy and their viewing history; videos of different groups are ranked by
/// their groups. Random priorities are drawn fresh from `rng` on every call.
pub fn presort<R: RngCore + ?Sized>(
    videos: &mut [&Video],
    filler: &TemplateFiller,
    ctx: &PlanContext<'_>,
    rng: &mut R,
) {
    let random: Option<HashMap<&str, u64>> = (filler.videos_priority == FillerPriority::Random)
        .then(|| {
            videos
                .iter()
                .copied()
                .map(|video| (video.video_id.as_str(), rng.next_u64()))
                .collect()
        });

    videos.sort_by(|a, b| compare(ctx, random.as_ref(), a, b));
}

fn compare(
    ctx: &PlanContext<'_>,
    random: Option<&HashMap<&str, u64>>,
    a: &Video,
    b: &Video,
) -> Ordering {
    match (a.group_id(), b.group_id()) {
        (ga, gb) if ga == gb => compare_videos(ctx, random, a, b),
        (ga, gb) => compare_groups(ctx, ga, gb),
    }
}

/// Unseen before seen, earlier views before later ones. Equal history falls back
/// to the random priority when present, otherwise to the explicit order.
fn compare_videos(
    ctx: &PlanContext<'_>,
    random: Option<&HashMap<&str, u64>>,
    a: &Video,
    b: &Video,
) -> Ordering {
    let seen_a = ctx.history.get(&a.video_id);
    let seen_b = ctx.history.get(&b.video_id);

    match (seen_a, seen_b) {
        (x, y) if x == y => match random {
            Some(priorities) => {
                let pa = priorities.get(a.video_id.as_str()).copied().unwrap_or_default();
                let pb = priorities.get(b.video_id.as_str()).copied().unwrap_or_default();
                pa.cmp(&pb)
            }
            None => a.order.cmp(&b.order),
        },
        (None, _) => Ordering::Less,
        (_, None) => Ordering::Greater,
        (Some(x), Some(y)) => x.cmp(y),
    }
}

/// Ungrouped first. Then groups with more watched time, more views and the most
/// recent view rank higher; sibling order and group id settle the rest.
pub(crate) fn compare_groups(ctx: &PlanContext<'_>, a: Option<&str>, b: Option<&str>) -> Ordering {
    let (a, b) = match (a, b) {
        (None, None) => return Ordering::Equal,
        (None, Some(_)) => return Ordering::Less,
        (Some(_), None) => return Ordering::Greater,
        (Some(a), Some(b)) => (a, b),
    };
    let ha = ctx.aggregates.group(a);
    let hb = ctx.aggregates.group(b);

    hb.total_duration_sec
        .cmp(&ha.total_duration_sec)
        .then(hb.total_count.cmp(&ha.total_count))
        .then(hb.last_seen.cmp(&ha.last_seen))
        .then_with(|| placement_key(ctx, a).cmp(&placement_key(ctx, b)))
}

// Parent first so siblings compare by order; the id keeps the ranking total.
fn placement_key<'k>(ctx: &PlanContext<'k>, group_id: &'k str) -> (Option<&'k str>, i32, &'k str) {
    match ctx.catalogue.group(group_id) {
        Some(group) => (
            group.parent_id.as_deref().filter(|p| !p.is_empty()),
            group.order,
            group_id,
        ),
        None => (None, 0, group_id),
    }
}
