use std::{
    fs,
    path::{Path, PathBuf},
    sync::Arc,
};

use anyhow::{Context, Result, anyhow};
use parking_lot::RwLock;
use reel_types::Template;
use serde::{Deserialize, Serialize};
use tracing_subscriber::EnvFilter;

const MAX_TOLERANCE_SEC: u32 = 3600;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PlannerSettings {
    pub overshoot_tolerance_sec: u32,
    pub random_seed: Option<u64>,
}

impl Default for PlannerSettings {
    fn default() -> Self {
        Self {
            overshoot_tolerance_sec: 60,
            random_seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    pub filter: String,
    pub json: bool,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            filter: "info".to_string(),
            json: true,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Settings {
    pub planner: PlannerSettings,
    pub logging: LoggingSettings,
}

impl Settings {
    pub fn validate(&self) -> Result<(), String> {
        if self.planner.overshoot_tolerance_sec > MAX_TOLERANCE_SEC {
            return Err(format!(
                "overshoot_tolerance_sec must be <= {MAX_TOLERANCE_SEC}"
            ));
        }
        if self.logging.filter.trim().is_empty() {
            return Err("logging.filter cannot be empty".to_string());
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct SettingsStore {
    path: Option<PathBuf>,
    current: Arc<RwLock<Settings>>,
}

impl SettingsStore {
    pub fn load_from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path_ref = path.as_ref();
        let parsed = load_settings(path_ref)?;
        Ok(Self {
            path: Some(path_ref.to_path_buf()),
            current: Arc::new(RwLock::new(parsed)),
        })
    }

    /// A store with no backing file; `reload` on it fails.
    #[must_use]
    pub fn from_settings(settings: Settings) -> Self {
        Self {
            path: None,
            current: Arc::new(RwLock::new(settings)),
        }
    }

    pub fn current(&self) -> Settings {
        self.current.read().clone()
    }

    /// Keeps the previous settings when the file no longer parses or validates.
    pub fn reload(&self) -> Result<()> {
        let path = self
            .path
            .as_ref()
            .ok_or_else(|| anyhow!("settings store has no backing file"))?;
        let updated = load_settings(path)?;
        *self.current.write() = updated;
        Ok(())
    }
}

pub fn load_settings(path: impl AsRef<Path>) -> Result<Settings> {
    let raw = fs::read_to_string(path.as_ref())
        .with_context(|| format!("failed reading settings at {}", path.as_ref().display()))?;
    let settings: Settings = serde_yaml::from_str(&raw).context("failed parsing settings YAML")?;
    settings.validate().map_err(|err| anyhow!(err))?;
    Ok(settings)
}

pub fn load_template(path: impl AsRef<Path>) -> Result<Template> {
    let raw = fs::read_to_string(path.as_ref())
        .with_context(|| format!("failed reading template at {}", path.as_ref().display()))?;
    let template: Template =
        serde_yaml::from_str(&raw).context("failed parsing template YAML")?;
    template.validate().map_err(|err| anyhow!(err))?;
    Ok(template)
}

/// Installs the global subscriber. Returns false when one is already set.
pub fn init_tracing(settings: &LoggingSettings) -> Result<bool> {
    let filter = EnvFilter::try_new(&settings.filter)
        .with_context(|| format!("invalid log filter {:?}", settings.filter))?;
    let installed = if settings.json {
        tracing_subscriber::fmt()
            .json()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    } else {
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .try_init()
            .is_ok()
    };
    Ok(installed)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;
    use reel_types::RestrictionScope;
    use tempfile::NamedTempFile;

    fn write_yaml(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write yaml");
        file
    }

    #[test]
    fn missing_sections_use_defaults() {
        let file = write_yaml("planner:\n  random_seed: 9\n");
        let settings = load_settings(file.path()).expect("load");

        assert_eq!(settings.planner.overshoot_tolerance_sec, 60);
        assert_eq!(settings.planner.random_seed, Some(9));
        assert_eq!(settings.logging, LoggingSettings::default());
    }

    #[test]
    fn oversized_tolerance_is_rejected() {
        let file = write_yaml("planner:\n  overshoot_tolerance_sec: 7200\n");
        let err = load_settings(file.path()).expect_err("invalid tolerance");
        assert!(err.to_string().contains("overshoot_tolerance_sec"));
    }

    #[test]
    fn reload_picks_up_changes() {
        let file = write_yaml("logging:\n  filter: info\n");
        let store = SettingsStore::load_from_path(file.path()).expect("load");
        assert!(store.current().logging.json);

        fs::write(file.path(), "logging:\n  filter: debug\n  json: false\n").expect("rewrite");
        store.reload().expect("reload");

        assert_eq!(store.current().logging.filter, "debug");
        assert!(!store.current().logging.json);
    }

    #[test]
    fn failed_reload_keeps_previous_settings() {
        let file = write_yaml("planner:\n  overshoot_tolerance_sec: 30\n");
        let store = SettingsStore::load_from_path(file.path()).expect("load");

        fs::write(file.path(), "logging:\n  filter: \"\"\n").expect("rewrite");

        assert!(store.reload().is_err());
        assert_eq!(store.current().planner.overshoot_tolerance_sec, 30);
    }

    #[test]
    fn detached_store_cannot_reload() {
        let store = SettingsStore::from_settings(Settings::default());
        assert!(store.reload().is_err());
        assert_eq!(store.current(), Settings::default());
    }

    #[test]
    fn template_document_loads_and_validates() {
        let file = write_yaml(
            r#"
template_id: evening
title: Evening block
start_items:
  - item_id: intro
    duration_sec: 300
    fillers:
      - category_id: music
items:
  - item_id: lesson
    duration_sec: 900
    fillers:
      - category_id: edu
        allow_seen: true
        videos_priority: random
    restrictions:
      - scope: group
        max_amount: 1
restrictions:
  - scope: category
    category_id: music
    max_duration_sec: 1200
"#,
        );
        let template = load_template(file.path()).expect("load template");

        assert_eq!(template.template_id, "evening");
        assert_eq!(template.items[0].restrictions[0].scope, RestrictionScope::Group);
        assert_eq!(template.restrictions[0].max_duration_sec, 1200);
        assert!(template.end_items.is_empty());
    }

    #[test]
    fn template_without_id_is_rejected() {
        let file = write_yaml("template_id: \"\"\n");
        assert!(load_template(file.path()).is_err());
    }

    #[test]
    fn tracing_init_is_idempotent() {
        let settings = LoggingSettings {
            filter: "reel_planner=debug".to_string(),
            json: false,
        };
        init_tracing(&settings).expect("first init");
        assert!(!init_tracing(&settings).expect("second init"));
    }
}
