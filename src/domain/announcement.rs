use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::null_as_clear;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Announcement {
    pub id: Uuid,
    pub title: String,
    pub message: String,
    #[serde(rename = "type")]
    pub kind: AnnouncementKind,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub is_active: bool,
    pub starts_at: DateTime<Utc>,
    pub ends_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    /// Active and inside its display window at `now`.
    pub fn is_live_at(&self, now: DateTime<Utc>) -> bool {
        self.is_active
            && self.starts_at <= now
            && self.ends_at.map_or(true, |end| now < end)
    }

    pub fn link_label(&self) -> &str {
        self.link_text.as_deref().filter(|t| !t.is_empty()).unwrap_or("Learn more")
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum AnnouncementKind {
    #[default]
    Info,
    Warning,
    Success,
    Urgent,
}

impl AnnouncementKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            AnnouncementKind::Info => "info",
            AnnouncementKind::Warning => "warning",
            AnnouncementKind::Success => "success",
            AnnouncementKind::Urgent => "urgent",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "info" => Some(AnnouncementKind::Info),
            "warning" => Some(AnnouncementKind::Warning),
            "success" => Some(AnnouncementKind::Success),
            "urgent" => Some(AnnouncementKind::Urgent),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub message: String,
    #[serde(rename = "type", default)]
    pub kind: AnnouncementKind,
    pub link_url: Option<String>,
    pub link_text: Option<String>,
    pub is_active: Option<bool>,
    pub starts_at: Option<DateTime<Utc>>,
    pub ends_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub message: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<AnnouncementKind>,
    #[serde(default, deserialize_with = "null_as_clear")]
    pub link_url: Option<Option<String>>,
    #[serde(default, deserialize_with = "null_as_clear")]
    pub link_text: Option<Option<String>>,
    pub is_active: Option<bool>,
    pub starts_at: Option<DateTime<Utc>>,
    #[serde(default, deserialize_with = "null_as_clear")]
    pub ends_at: Option<Option<DateTime<Utc>>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration;

    fn announcement(is_active: bool, starts_in: i64, ends_in: Option<i64>) -> Announcement {
        let now = Utc::now();
        Announcement {
            id: Uuid::new_v4(),
            title: "UPCAT".to_string(),
            message: "Applications open".to_string(),
            kind: AnnouncementKind::Info,
            link_url: None,
            link_text: None,
            is_active,
            starts_at: now + Duration::hours(starts_in),
            ends_at: ends_in.map(|h| now + Duration::hours(h)),
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_live_window() {
        let now = Utc::now();
        assert!(announcement(true, -1, None).is_live_at(now));
        assert!(announcement(true, -1, Some(1)).is_live_at(now));
        assert!(!announcement(false, -1, None).is_live_at(now));
        assert!(!announcement(true, 1, None).is_live_at(now));
        assert!(!announcement(true, -2, Some(-1)).is_live_at(now));
    }

    #[test]
    fn test_kind_serializes_as_type() {
        let json = serde_json::to_value(announcement(true, 0, None)).unwrap();
        assert_eq!(json["type"], "info");
        assert_eq!(announcement(true, 0, None).link_label(), "Learn more");
    }
}
