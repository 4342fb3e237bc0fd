use chrono::{DateTime, Utc};
use reel_config::SettingsStore;
use reel_planner::Planner;
use reel_store::{Storage, StoreError};
use reel_types::{HistoryRecord, Playlist, collapse_history};
use thiserror::Error;
use tracing::{info, info_span};
use uuid::Uuid;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Store(#[from] StoreError),
    #[error("template {id} is invalid: {reason}")]
    InvalidTemplate { id: String, reason: String },
}

pub struct PlaylistApp<S> {
    storage: S,
    settings: SettingsStore,
}

impl<S: Storage> PlaylistApp<S> {
    pub fn new(storage: S, settings: SettingsStore) -> Self {
        Self { storage, settings }
    }

    pub fn storage(&self) -> &S {
        &self.storage
    }

    pub fn settings(&self) -> &SettingsStore {
        &self.settings
    }

    /// Loads the catalogue, history and template, then schedules one run.
    /// Any fetch or validation failure aborts before scheduling starts.
    pub fn make_playlist(&self, target_sec: u32, template_id: &str) -> Result<Playlist, AppError> {
        let run_id = Uuid::new_v4();
        let span = info_span!("make-playlist", %run_id, template_id, target_sec);
        let _entered = span.enter();

        let videos = self.storage.videos().list()?;
        let groups = self.storage.groups().list()?;
        let history = collapse_history(&self.storage.history().list()?);
        let template = self.storage.templates().read(template_id)?;
        template
            .validate()
            .map_err(|reason| AppError::InvalidTemplate {
                id: template_id.to_string(),
                reason,
            })?;

        let settings = self.settings.current().planner;
        let mut planner = match settings.random_seed {
            Some(seed) => Planner::seeded(seed),
            None => Planner::new(),
        }
        .with_tolerance(settings.overshoot_tolerance_sec);
        let playlist = planner.make_playlist(target_sec, &videos, &groups, &history, &template);

        info!(
            catalogue_videos = videos.len(),
            history_entries = history.len(),
            placed = playlist.len(),
            total_duration_sec = playlist.total_duration_sec(),
            "playlist-ready"
        );
        Ok(playlist)
    }

    /// Marks a known video as watched at `at`.
    pub fn record_view(&self, video_id: &str, at: DateTime<Utc>) -> Result<(), AppError> {
        self.storage.videos().read(video_id)?;
        self.storage.history().create(HistoryRecord {
            video_id: video_id.to_string(),
            last_seen: at,
        })?;
        Ok(())
    }
}
