use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use super::{null_as_clear, null_as_default};

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct University {
    pub id: Uuid,
    pub slug: String,
    pub name: String,
    pub short_name: String,
    pub logo: Option<String>,
    pub exam_name: String,
    pub exam_fee: Option<String>,
    pub application_start: String,
    pub application_end: String,
    pub application_status: ApplicationStatus,
    pub exam_dates: Vec<ExamDate>,
    pub results_release: String,
    pub test_locations: Vec<String>,
    pub requirements: Vec<String>,
    pub admission_link: String,
    #[serde(default)]
    pub academic_year: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ApplicationStatus {
    #[default]
    Upcoming,
    Ongoing,
    Closed,
}

impl ApplicationStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            ApplicationStatus::Upcoming => "upcoming",
            ApplicationStatus::Ongoing => "ongoing",
            ApplicationStatus::Closed => "closed",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "upcoming" => Some(ApplicationStatus::Upcoming),
            "ongoing" => Some(ApplicationStatus::Ongoing),
            "closed" => Some(ApplicationStatus::Closed),
            _ => None,
        }
    }

    /// Label used on the detail view.
    pub fn label(&self) -> &'static str {
        match self {
            ApplicationStatus::Ongoing => "Applications Open",
            ApplicationStatus::Upcoming => "Upcoming",
            ApplicationStatus::Closed => "Applications Closed",
        }
    }

    /// Compact label used in lists and selectors.
    pub fn short_label(&self) -> &'static str {
        match self {
            ApplicationStatus::Ongoing => "Open",
            ApplicationStatus::Upcoming => "Upcoming",
            ApplicationStatus::Closed => "Closed",
        }
    }
}

/// One scheduled sitting of an entrance exam, e.g. "November 16, 2025" / "Batch 1".
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Default)]
pub struct ExamDate {
    #[serde(default, deserialize_with = "null_as_default")]
    pub date: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub note: String,
}

impl ExamDate {
    pub fn new(date: impl Into<String>, note: impl Into<String>) -> Self {
        Self {
            date: date.into(),
            note: note.into(),
        }
    }
}

/// Payload for creating or replacing a university. The slug of an existing
/// record is taken from the path on update and never changes.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(default)]
pub struct UniversityInput {
    pub slug: String,
    pub name: String,
    pub short_name: String,
    pub logo: Option<String>,
    pub exam_name: String,
    pub exam_fee: Option<String>,
    pub application_start: String,
    pub application_end: String,
    pub application_status: ApplicationStatus,
    pub exam_dates: Vec<ExamDate>,
    pub results_release: String,
    pub test_locations: Vec<String>,
    pub requirements: Vec<String>,
    pub admission_link: String,
    pub academic_year: String,
}

impl UniversityInput {
    /// Checks the fields the store relies on.
    pub fn validate(&self) -> Result<(), String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".to_string());
        }
        if !is_valid_slug(&self.slug) {
            return Err(format!(
                "Invalid slug '{}': use lowercase letters, digits and dashes",
                self.slug
            ));
        }
        Ok(())
    }
}

/// Partial update for an existing university. Absent fields keep their
/// stored value; `logo` and `exam_fee` may be sent as `null` to clear them.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct UpdateUniversityRequest {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub short_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_clear")]
    pub logo: Option<Option<String>>,
    pub exam_name: Option<String>,
    #[serde(default, deserialize_with = "null_as_clear")]
    pub exam_fee: Option<Option<String>>,
    pub application_start: Option<String>,
    pub application_end: Option<String>,
    pub application_status: Option<ApplicationStatus>,
    pub exam_dates: Option<Vec<ExamDate>>,
    pub results_release: Option<String>,
    pub test_locations: Option<Vec<String>>,
    pub requirements: Option<Vec<String>>,
    pub admission_link: Option<String>,
    pub academic_year: Option<String>,
}

impl UpdateUniversityRequest {
    /// Overlays the present fields on `current`. The slug is left alone.
    pub fn apply_to(self, current: University) -> UniversityInput {
        UniversityInput {
            slug: current.slug,
            name: self.name.unwrap_or(current.name),
            short_name: self.short_name.unwrap_or(current.short_name),
            logo: self.logo.unwrap_or(current.logo),
            exam_name: self.exam_name.unwrap_or(current.exam_name),
            exam_fee: self.exam_fee.unwrap_or(current.exam_fee),
            application_start: self.application_start.unwrap_or(current.application_start),
            application_end: self.application_end.unwrap_or(current.application_end),
            application_status: self.application_status.unwrap_or(current.application_status),
            exam_dates: self.exam_dates.unwrap_or(current.exam_dates),
            results_release: self.results_release.unwrap_or(current.results_release),
            test_locations: self.test_locations.unwrap_or(current.test_locations),
            requirements: self.requirements.unwrap_or(current.requirements),
            admission_link: self.admission_link.unwrap_or(current.admission_link),
            academic_year: self.academic_year.unwrap_or(current.academic_year),
        }
    }
}

/// A full input replaces every field.
impl From<UniversityInput> for UpdateUniversityRequest {
    fn from(input: UniversityInput) -> Self {
        Self {
            slug: Some(input.slug),
            name: Some(input.name),
            short_name: Some(input.short_name),
            logo: Some(input.logo),
            exam_name: Some(input.exam_name),
            exam_fee: Some(input.exam_fee),
            application_start: Some(input.application_start),
            application_end: Some(input.application_end),
            application_status: Some(input.application_status),
            exam_dates: Some(input.exam_dates),
            results_release: Some(input.results_release),
            test_locations: Some(input.test_locations),
            requirements: Some(input.requirements),
            admission_link: Some(input.admission_link),
            academic_year: Some(input.academic_year),
        }
    }
}

pub fn is_valid_slug(slug: &str) -> bool {
    !slug.is_empty()
        && !slug.starts_with('-')
        && !slug.ends_with('-')
        && slug
            .chars()
            .all(|c| c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-')
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_round_trip_names() {
        assert_eq!(ApplicationStatus::from_str("ONGOING"), Some(ApplicationStatus::Ongoing));
        assert_eq!(ApplicationStatus::from_str("open"), None);
        assert_eq!(ApplicationStatus::Ongoing.short_label(), "Open");
        assert_eq!(ApplicationStatus::Closed.label(), "Applications Closed");
    }

    #[test]
    fn test_exam_date_tolerates_nulls() {
        let date: ExamDate = serde_json::from_str(r#"{"date": "Aug 1", "note": null}"#).unwrap();
        assert_eq!(date, ExamDate::new("Aug 1", ""));

        let date: ExamDate = serde_json::from_str(r#"{"date": null}"#).unwrap();
        assert_eq!(date.date, "");
    }

    #[test]
    fn test_slug_validation() {
        assert!(is_valid_slug("up"));
        assert!(is_valid_slug("ust-2025"));
        assert!(!is_valid_slug(""));
        assert!(!is_valid_slug("UP"));
        assert!(!is_valid_slug("-up"));
        assert!(!is_valid_slug("de la salle"));
    }

    #[test]
    fn test_input_requires_name() {
        let input = UniversityInput {
            slug: "up".to_string(),
            ..Default::default()
        };
        assert!(input.validate().is_err());
    }

    #[test]
    fn test_partial_update_keeps_omitted_fields() {
        let now = Utc::now();
        let current = University {
            id: Uuid::new_v4(),
            slug: "up".to_string(),
            name: "University of the Philippines".to_string(),
            short_name: "UP".to_string(),
            logo: Some("/up.png".to_string()),
            exam_name: "UPCAT".to_string(),
            exam_fee: Some("Free".to_string()),
            application_start: "June 1".to_string(),
            application_end: "July 1".to_string(),
            application_status: ApplicationStatus::Ongoing,
            exam_dates: vec![ExamDate::new("August 1", "")],
            results_release: "January".to_string(),
            test_locations: vec!["Diliman".to_string()],
            requirements: vec!["Form 138".to_string()],
            admission_link: "https://up.edu.ph".to_string(),
            academic_year: "2025-2026".to_string(),
            created_at: now,
            updated_at: now,
        };

        let request: UpdateUniversityRequest =
            serde_json::from_str(r#"{"application_status": "closed", "exam_fee": null}"#).unwrap();
        let merged = request.apply_to(current);

        assert_eq!(merged.application_status, ApplicationStatus::Closed);
        assert_eq!(merged.exam_fee, None);
        assert_eq!(merged.logo.as_deref(), Some("/up.png"));
        assert_eq!(merged.exam_name, "UPCAT");
        assert_eq!(merged.exam_dates, vec![ExamDate::new("August 1", "")]);
        assert_eq!(merged.requirements, vec!["Form 138".to_string()]);
        assert_eq!(merged.academic_year, "2025-2026");
    }
}
