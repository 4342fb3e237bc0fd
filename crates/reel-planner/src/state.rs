use std::collections::HashSet;

use reel_types::Video;

use crate::restrictions::CounterTable;

/// Accumulators owned by exactly one scheduling run.
#[derive(Debug, Default)]
pub struct RunState<'a> {
    output: Vec<&'a Video>,
    placed: HashSet<&'a str>,
    totals: CounterTable,
}

impl<'a> RunState<'a> {
    pub fn place(&mut self, video: &'a Video, category_id: &str) {
        self.output.push(video);
        self.placed.insert(video.video_id.as_str());
        self.totals.record(video, category_id);
    }

    #[must_use]
    pub fn contains(&self, video_id: &str) -> bool {
        self.placed.contains(video_id)
    }

    #[must_use]
    pub fn totals(&self) -> &CounterTable {
        &self.totals
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.output.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.output.is_empty()
    }

    #[must_use]
    pub fn duration_sec(&self) -> u64 {
        self.output.iter().map(|v| u64::from(v.duration_sec)).sum()
    }

    pub fn into_videos(self) -> Vec<Video> {
        self.output.into_iter().cloned().collect()
    }
}
