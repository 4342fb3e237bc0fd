use std::collections::HashMap;

use chrono::{DateTime, Utc};
use reel_types::{Group, History, Video};

/// Read-only lookups over one catalogue snapshot.
pub struct CatalogueIndex<'a> {
    videos: &'a [Video],
    groups: HashMap<&'a str, &'a Group>,
}

impl<'a> CatalogueIndex<'a> {
    #[must_use]
    pub fn new(videos: &'a [Video], groups: &'a [Group]) -> Self {
        let groups = groups
            .iter()
            .map(|group| (group.group_id.as_str(), group))
            .collect();
        Self { videos, groups }
    }

    #[must_use]
    pub fn videos(&self) -> &'a [Video] {
        self.videos
    }

    #[must_use]
    pub fn group(&self, group_id: &str) -> Option<&'a Group> {
        self.groups.get(group_id).copied()
    }

    /// The video's own category, else the category of its parent group.
    #[must_use]
    pub fn effective_category<'v>(&self, video: &'v Video) -> Option<&'v str>
    where
        'a: 'v,
    {
        if let Some(category_id) = video.category_id.as_deref().filter(|c| !c.is_empty()) {
            return Some(category_id);
        }
        video
            .group_id()
            .and_then(|parent| self.group(parent))
            .and_then(|group| group.category_id.as_deref())
            .filter(|c| !c.is_empty())
    }
}

/// Prior viewing totals for one group.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GroupHistory {
    pub last_seen: Option<DateTime<Utc>>,
    pub total_count: u32,
    pub total_duration_sec: u64,
}

#[derive(Debug, Clone, Default)]
pub struct HistoryAggregates {
    by_group: HashMap<String, GroupHistory>,
}

impl HistoryAggregates {
    #[must_use]
    pub fn build(videos: &[Video], history: &History) -> Self {
        let mut by_group: HashMap<String, GroupHistory> = HashMap::new();
        for video in videos {
            let (Some(seen), Some(group_id)) = (history.get(&video.video_id), video.group_id())
            else {
                continue;
            };
            let entry = by_group.entry(group_id.to_string()).or_default();
            entry.total_count += 1;
            entry.total_duration_sec += u64::from(video.duration_sec);
            if entry.last_seen.is_none_or(|last| *seen > last) {
                entry.last_seen = Some(*seen);
            }
        }
        Self { by_group }
    }

    #[must_use]
    pub fn group(&self, group_id: &str) -> GroupHistory {
        self.by_group.get(group_id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.by_group.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.by_group.is_empty()
    }
}
