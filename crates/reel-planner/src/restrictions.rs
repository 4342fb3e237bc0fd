use std::collections::HashMap;

use reel_types::{RestrictionScope, TemplateRestriction, Video};

/// Running duration and count for one group or category.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Tally {
    pub duration_sec: u64,
    pub count: u32,
}

impl Tally {
    fn admits(self, video: &Video, restriction: &TemplateRestriction) -> bool {
        if restriction.max_duration_sec != 0
            && self.duration_sec + u64::from(video.duration_sec)
                > u64::from(restriction.max_duration_sec)
        {
            return false;
        }
        restriction.max_amount == 0 || self.count < restriction.max_amount
    }
}

/// Per-group and per-category totals. One table accounts for a single chunk,
/// another for the whole run; both answer restriction checks the same way.
#[derive(Debug, Clone, Default)]
pub struct CounterTable {
    by_group: HashMap<String, Tally>,
    by_category: HashMap<String, Tally>,
}

impl CounterTable {
    pub fn record(&mut self, video: &Video, category_id: &str) {
        let duration = u64::from(video.duration_sec);
        let category = self.by_category.entry(category_id.to_string()).or_default();
        category.duration_sec += duration;
        category.count += 1;

        if let Some(group_id) = video.group_id() {
            let group = self.by_group.entry(group_id.to_string()).or_default();
            group.duration_sec += duration;
            group.count += 1;
        }
    }

    #[must_use]
    pub fn group(&self, group_id: &str) -> Tally {
        self.by_group.get(group_id).copied().unwrap_or_default()
    }

    #[must_use]
    pub fn category(&self, category_id: &str) -> Tally {
        self.by_category.get(category_id).copied().unwrap_or_default()
    }

    /// True when placing `video` under `category_id` keeps every restriction satisfied.
    #[must_use]
    pub fn allows(
        &self,
        video: &Video,
        category_id: &str,
        restrictions: &[TemplateRestriction],
    ) -> bool {
        restrictions
            .iter()
            .all(|restriction| self.allows_one(video, category_id, restriction))
    }

    fn allows_one(&self, video: &Video, category_id: &str, restriction: &TemplateRestriction) -> bool {
        match restriction.scope {
            RestrictionScope::Undefined => true,
            RestrictionScope::Group => {
                let Some(group_id) = video.group_id() else {
                    return true;
                };
                if restriction
                    .group_id
                    .as_deref()
                    .is_some_and(|target| target != group_id)
                {
                    return true;
                }
                self.group(group_id).admits(video, restriction)
            }
            RestrictionScope::Category => {
                if restriction
                    .category_id
                    .as_deref()
                    .is_some_and(|target| target != category_id)
                {
                    return true;
                }
                self.category(category_id).admits(video, restriction)
            }
        }
    }
}
