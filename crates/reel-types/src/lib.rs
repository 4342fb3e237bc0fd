use std::collections::HashMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Video id to the moment it was last watched.
pub type History = HashMap<String, DateTime<Utc>>;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Category {
    pub category_id: String,
    pub title: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Group {
    pub group_id: String,
    pub title: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub category_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Video {
    pub video_id: String,
    pub title: String,
    #[serde(default)]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub order: i32,
    #[serde(default)]
    pub category_id: Option<String>,
    pub duration_sec: u32,
}

impl Video {
    #[must_use]
    pub fn is_schedulable(&self) -> bool {
        self.duration_sec > 0
    }

    /// Parent group, treating a blank id as ungrouped.
    #[must_use]
    pub fn group_id(&self) -> Option<&str> {
        self.parent_id.as_deref().filter(|id| !id.is_empty())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HistoryRecord {
    pub video_id: String,
    pub last_seen: DateTime<Utc>,
}

/// Folds raw history records into one entry per video, keeping the most recent view.
#[must_use]
pub fn collapse_history(records: &[HistoryRecord]) -> History {
    let mut history = History::with_capacity(records.len());
    for record in records {
        history
            .entry(record.video_id.clone())
            .and_modify(|seen| {
                if record.last_seen > *seen {
                    *seen = record.last_seen;
                }
            })
            .or_insert(record.last_seen);
    }
    history
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum FillerPriority {
    #[default]
    Undefined,
    Amount,
    Duration,
    Order,
    Random,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum RestrictionScope {
    #[default]
    Undefined,
    Group,
    Category,
}

/// A cap on cumulative duration and/or count. Zero disables that dimension.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateRestriction {
    #[serde(default)]
    pub restriction_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub scope: RestrictionScope,
    #[serde(default)]
    pub category_id: Option<String>,
    #[serde(default)]
    pub group_id: Option<String>,
    #[serde(default)]
    pub max_duration_sec: u32,
    #[serde(default)]
    pub max_amount: u32,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateFiller {
    #[serde(default)]
    pub filler_id: String,
    #[serde(default)]
    pub order: i32,
    pub category_id: String,
    #[serde(default)]
    pub allow_seen: bool,
    #[serde(default)]
    pub groups_priority: FillerPriority,
    #[serde(default)]
    pub videos_priority: FillerPriority,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct TemplateItem {
    #[serde(default)]
    pub item_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub order: i32,
    pub duration_sec: u32,
    #[serde(default)]
    pub fillers: Vec<TemplateFiller>,
    #[serde(default)]
    pub restrictions: Vec<TemplateRestriction>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Template {
    pub template_id: String,
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub start_items: Vec<TemplateItem>,
    #[serde(default)]
    pub items: Vec<TemplateItem>,
    #[serde(default)]
    pub end_items: Vec<TemplateItem>,
    #[serde(default)]
    pub restrictions: Vec<TemplateRestriction>,
}

impl Template {
    pub fn validate(&self) -> Result<(), String> {
        if self.template_id.trim().is_empty() {
            return Err("template_id cannot be empty".to_string());
        }
        validate_restrictions(&self.restrictions)
            .map_err(|err| format!("template {}: {err}", self.template_id))?;

        let blocks = [
            ("start_items", &self.start_items),
            ("items", &self.items),
            ("end_items", &self.end_items),
        ];
        for (block, items) in blocks {
            for (idx, item) in items.iter().enumerate() {
                if item.fillers.iter().any(|f| f.category_id.trim().is_empty()) {
                    return Err(format!("{block}[{idx}]: filler category_id cannot be empty"));
                }
                validate_restrictions(&item.restrictions)
                    .map_err(|err| format!("{block}[{idx}]: {err}"))?;
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.start_items.is_empty() && self.items.is_empty() && self.end_items.is_empty()
    }
}

fn validate_restrictions(restrictions: &[TemplateRestriction]) -> Result<(), String> {
    for restriction in restrictions {
        match restriction.scope {
            RestrictionScope::Group if restriction.category_id.is_some() => {
                return Err(format!(
                    "restriction {} is group-scoped but names a category",
                    restriction.restriction_id
                ));
            }
            RestrictionScope::Category if restriction.group_id.is_some() => {
                return Err(format!(
                    "restriction {} is category-scoped but names a group",
                    restriction.restriction_id
                ));
            }
            _ => {}
        }
    }
    Ok(())
}

/// Ordered scheduling result.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Playlist {
    pub videos: Vec<Video>,
}

impl Playlist {
    #[must_use]
    pub fn total_duration_sec(&self) -> u64 {
        self.videos.iter().map(|v| u64::from(v.duration_sec)).sum()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.videos.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.videos.is_empty()
    }

    pub fn video_ids(&self) -> impl Iterator<Item = &str> {
        self.videos.iter().map(|v| v.video_id.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn sample_template() -> Template {
        Template {
            template_id: "evening".to_string(),
            title: "Evening".to_string(),
            start_items: vec![TemplateItem {
                item_id: "intro".to_string(),
                duration_sec: 300,
                fillers: vec![TemplateFiller {
                    category_id: "music".to_string(),
                    ..TemplateFiller::default()
                }],
                ..TemplateItem::default()
            }],
            items: vec![],
            end_items: vec![],
            restrictions: vec![TemplateRestriction {
                restriction_id: "one-per-group".to_string(),
                scope: RestrictionScope::Group,
                max_amount: 1,
                ..TemplateRestriction::default()
            }],
        }
    }

    #[test]
    fn template_validation_works() {
        assert!(sample_template().validate().is_ok());
    }

    #[test]
    fn template_validation_rejects_mismatched_scope() {
        let mut template = sample_template();
        template.restrictions[0].category_id = Some("music".to_string());
        let err = template.validate().expect_err("group scope naming a category");
        assert!(err.contains("one-per-group"));
    }

    #[test]
    fn template_validation_rejects_blank_filler_category() {
        let mut template = sample_template();
        template.start_items[0].fillers[0].category_id = " ".to_string();
        let err = template.validate().expect_err("blank filler category");
        assert!(err.starts_with("start_items[0]"));
    }

    #[test]
    fn collapse_history_keeps_latest_view() {
        let early = Utc.with_ymd_and_hms(2026, 3, 1, 18, 0, 0).unwrap();
        let late = early + Duration::hours(2);
        let records = vec![
            HistoryRecord {
                video_id: "a".to_string(),
                last_seen: late,
            },
            HistoryRecord {
                video_id: "a".to_string(),
                last_seen: early,
            },
            HistoryRecord {
                video_id: "b".to_string(),
                last_seen: early,
            },
        ];

        let history = collapse_history(&records);

        assert_eq!(history.len(), 2);
        assert_eq!(history["a"], late);
        assert_eq!(history["b"], early);
    }

    #[test]
    fn template_deserializes_with_defaults() {
        let raw = r#"{
            "template_id": "t1",
            "items": [{
                "duration_sec": 600,
                "fillers": [{"category_id": "edu", "videos_priority": "random"}],
                "restrictions": [{"scope": "category", "max_amount": 2}]
            }]
        }"#;
        let template: Template = serde_json::from_str(raw).expect("deserialize");
        assert!(template.start_items.is_empty());
        assert_eq!(template.items[0].fillers[0].videos_priority, FillerPriority::Random);
        assert_eq!(template.items[0].fillers[0].groups_priority, FillerPriority::Undefined);
        assert!(!template.items[0].fillers[0].allow_seen);
        assert_eq!(template.items[0].restrictions[0].scope, RestrictionScope::Category);
        assert_eq!(template.items[0].restrictions[0].max_duration_sec, 0);
    }

    #[test]
    fn playlist_totals_durations() {
        let playlist = Playlist {
            videos: vec![
                Video {
                    video_id: "a".to_string(),
                    title: "A".to_string(),
                    parent_id: None,
                    order: 0,
                    category_id: Some("edu".to_string()),
                    duration_sec: 300,
                },
                Video {
                    video_id: "b".to_string(),
                    title: "B".to_string(),
                    parent_id: None,
                    order: 1,
                    category_id: Some("edu".to_string()),
                    duration_sec: 420,
                },
            ],
        };
        assert_eq!(playlist.total_duration_sec(), 720);
        assert_eq!(playlist.video_ids().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
