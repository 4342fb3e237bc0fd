//! Template-driven playlist scheduling.
//!
//! A [`Planner`] walks a template's start, main and end blocks, filling each
//! item from its fillers with the freshest eligible videos while keeping every
//! group and category cap satisfied, both per item and across the whole run.

mod filter;
mod priority;
mod restrictions;
mod scheduler;
mod state;

#[cfg(test)]
mod fixtures;

use rand::rngs::StdRng;
use rand::{RngCore, SeedableRng};
use reel_catalog::{CatalogueIndex, HistoryAggregates};
use reel_types::{Group, History, Playlist, Template, Video};

pub use filter::filter_videos;
pub use priority::presort;
pub use restrictions::{CounterTable, Tally};
pub use state::RunState;

/// Residual budget, in seconds, treated as "close enough" and the overshoot a
/// single video may cause.
pub const DEFAULT_TOLERANCE_SEC: u32 = 60;

/// Read-only inputs shared by every step of one run.
pub struct PlanContext<'a> {
    pub catalogue: CatalogueIndex<'a>,
    pub history: &'a History,
    pub aggregates: HistoryAggregates,
}

impl<'a> PlanContext<'a> {
    #[must_use]
    pub fn new(videos: &'a [Video], groups: &'a [Group], history: &'a History) -> Self {
        Self {
            catalogue: CatalogueIndex::new(videos, groups),
            history,
            aggregates: HistoryAggregates::build(videos, history),
        }
    }
}

pub struct Planner<R = StdRng> {
    rng: R,
    tolerance_sec: u32,
}

impl Planner<StdRng> {
    #[must_use]
    pub fn new() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }

    #[must_use]
    pub fn seeded(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }
}

impl Default for Planner<StdRng> {
    fn default() -> Self {
        Self::new()
    }
}

impl<R: RngCore> Planner<R> {
    #[must_use]
    pub fn with_rng(rng: R) -> Self {
        Self {
            rng,
            tolerance_sec: DEFAULT_TOLERANCE_SEC,
        }
    }

    #[must_use]
    pub fn with_tolerance(mut self, tolerance_sec: u32) -> Self {
        self.tolerance_sec = tolerance_sec;
        self
    }

    #[must_use]
    pub fn tolerance_sec(&self) -> u32 {
        self.tolerance_sec
    }

    /// Builds an ordered playlist of roughly `target_sec` seconds. Never fails:
    /// an undersupplied catalogue or an empty template gives a shorter or empty list.
    pub fn make_playlist(
        &mut self,
        target_sec: u32,
        videos: &[Video],
        groups: &[Group],
        history: &History,
        template: &Template,
    ) -> Playlist {
        let ctx = PlanContext::new(videos, groups, history);
        let state = scheduler::run(
            &ctx,
            template,
            &mut self.rng,
            i64::from(self.tolerance_sec),
            i64::from(target_sec),
        );
        Playlist {
            videos: state.into_videos(),
        }
    }
}

/// One-shot scheduling with an entropy-seeded random source.
#[must_use]
pub fn make_playlist(
    target_sec: u32,
    videos: &[Video],
    groups: &[Group],
    history: &History,
    template: &Template,
) -> Playlist {
    Planner::new().make_playlist(target_sec, videos, groups, history, template)
}
