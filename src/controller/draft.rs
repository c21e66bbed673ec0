use serde::{Deserialize, Serialize};

use crate::domain::{ApplicationStatus, ExamDate, University, UniversityInput};

/// The three variable-length lists of a university draft.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftList {
    ExamDates,
    TestLocations,
    Requirements,
}

impl DraftList {
    pub const ALL: [DraftList; 3] = [
        DraftList::ExamDates,
        DraftList::TestLocations,
        DraftList::Requirements,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftList::ExamDates => "exam_dates",
            DraftList::TestLocations => "test_locations",
            DraftList::Requirements => "requirements",
        }
    }

    pub fn from_str(s: &str) -> Option<Self> {
        DraftList::ALL.into_iter().find(|list| list.as_str() == s)
    }
}

/// Editable, not yet persisted state of one university.
///
/// Every list always holds at least one entry so the form has a row to type
/// into; blank rows are dropped by [`UniversityDraft::to_input`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UniversityDraft {
    pub slug: String,
    pub name: String,
    pub short_name: String,
    pub logo: String,
    pub exam_name: String,
    pub exam_fee: String,
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

impl Default for UniversityDraft {
    fn default() -> Self {
        Self {
            slug: String::new(),
            name: String::new(),
            short_name: String::new(),
            logo: String::new(),
            exam_name: String::new(),
            exam_fee: String::new(),
            application_start: String::new(),
            application_end: String::new(),
            application_status: ApplicationStatus::Upcoming,
            exam_dates: vec![ExamDate::default()],
            results_release: String::new(),
            test_locations: vec![String::new()],
            requirements: vec![String::new()],
            admission_link: String::new(),
            academic_year: String::new(),
        }
    }
}

impl UniversityDraft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Copies a stored record into a draft, padding empty lists with one blank row.
    pub fn from_university(university: &University) -> Self {
        let mut draft = Self {
            slug: university.slug.clone(),
            name: university.name.clone(),
            short_name: university.short_name.clone(),
            logo: university.logo.clone().unwrap_or_default(),
            exam_name: university.exam_name.clone(),
            exam_fee: university.exam_fee.clone().unwrap_or_default(),
            application_start: university.application_start.clone(),
            application_end: university.application_end.clone(),
            application_status: university.application_status,
            exam_dates: university.exam_dates.clone(),
            results_release: university.results_release.clone(),
            test_locations: university.test_locations.clone(),
            requirements: university.requirements.clone(),
            admission_link: university.admission_link.clone(),
            academic_year: university.academic_year.clone(),
        };
        draft.pad_lists();
        draft
    }

    pub(crate) fn pad_lists(&mut self) {
        if self.exam_dates.is_empty() {
            self.exam_dates.push(ExamDate::default());
        }
        if self.test_locations.is_empty() {
            self.test_locations.push(String::new());
        }
        if self.requirements.is_empty() {
            self.requirements.push(String::new());
        }
    }

    pub fn len(&self, list: DraftList) -> usize {
        match list {
            DraftList::ExamDates => self.exam_dates.len(),
            DraftList::TestLocations => self.test_locations.len(),
            DraftList::Requirements => self.requirements.len(),
        }
    }

    /// Whether the remove control should be offered for `list`.
    pub fn can_remove(&self, list: DraftList) -> bool {
        self.len(list) > 1
    }

    pub fn add_entry(&mut self, list: DraftList) {
        match list {
            DraftList::ExamDates => self.exam_dates.push(ExamDate::default()),
            DraftList::TestLocations => self.test_locations.push(String::new()),
            DraftList::Requirements => self.requirements.push(String::new()),
        }
    }

    /// Removes the entry at `index`. The last remaining entry of a list is
    /// never removed; returns whether anything changed.
    pub fn remove_entry(&mut self, list: DraftList, index: usize) -> bool {
        if !self.can_remove(list) || index >= self.len(list) {
            return false;
        }
        match list {
            DraftList::ExamDates => {
                self.exam_dates.remove(index);
            }
            DraftList::TestLocations => {
                self.test_locations.remove(index);
            }
            DraftList::Requirements => {
                self.requirements.remove(index);
            }
        }
        true
    }

    /// Builds the payload sent to the record store: exam dates without a
    /// date and empty strings are dropped.
    pub fn to_input(&self) -> UniversityInput {
        UniversityInput {
            slug: self.slug.trim().to_string(),
            name: self.name.trim().to_string(),
            short_name: self.short_name.trim().to_string(),
            logo: optional(&self.logo),
            exam_name: self.exam_name.clone(),
            exam_fee: optional(&self.exam_fee),
            application_start: self.application_start.clone(),
            application_end: self.application_end.clone(),
            application_status: self.application_status,
            exam_dates: self.exam_dates
                .iter()
                .filter(|entry| !entry.date.is_empty())
                .cloned()
                .collect(),
            results_release: self.results_release.clone(),
            test_locations: non_empty(&self.test_locations),
            requirements: non_empty(&self.requirements),
            admission_link: self.admission_link.clone(),
            academic_year: self.academic_year.trim().to_string(),
        }
    }
}

fn optional(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

fn non_empty(items: &[String]) -> Vec<String> {
    items.iter().filter(|s| !s.is_empty()).cloned().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use uuid::Uuid;

    fn stored(exam_dates: Vec<ExamDate>, requirements: Vec<String>) -> University {
        University {
            id: Uuid::new_v4(),
            slug: "up".to_string(),
            name: "University of the Philippines".to_string(),
            short_name: "UP".to_string(),
            logo: None,
            exam_name: "UPCAT".to_string(),
            exam_fee: Some("₱450".to_string()),
            application_start: "August 1, 2025".to_string(),
            application_end: "September 15, 2025".to_string(),
            application_status: ApplicationStatus::Ongoing,
            exam_dates,
            results_release: "January 2026".to_string(),
            test_locations: vec![],
            requirements,
            admission_link: "https://upcat.up.edu.ph".to_string(),
            academic_year: "2025-2026".to_string(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    #[test]
    fn test_create_template() {
        let draft = UniversityDraft::new();
        assert_eq!(draft.application_status, ApplicationStatus::Upcoming);
        for list in DraftList::ALL {
            assert_eq!(draft.len(list), 1);
            assert!(!draft.can_remove(list));
        }
        assert_eq!(draft.exam_dates[0], ExamDate::new("", ""));
    }

    #[test]
    fn test_edit_pads_empty_lists_only() {
        let draft = UniversityDraft::from_university(&stored(
            vec![ExamDate::new("November 16, 2025", "")],
            vec!["Form 138".to_string(), "PSA birth certificate".to_string()],
        ));
        assert_eq!(draft.exam_dates, vec![ExamDate::new("November 16, 2025", "")]);
        assert_eq!(draft.test_locations, vec![String::new()]);
        assert_eq!(draft.requirements.len(), 2);
        assert_eq!(draft.exam_fee, "₱450");
        assert_eq!(draft.logo, "");
    }

    #[test]
    fn test_add_then_remove_restores_every_list() {
        let mut draft = UniversityDraft::from_university(&stored(
            vec![ExamDate::new("Aug 1", "Batch 1"), ExamDate::new("Aug 2", "Batch 2")],
            vec!["Form 138".to_string()],
        ));
        for list in DraftList::ALL {
            let before = draft.clone();
            draft.add_entry(list);
            let added_at = draft.len(list) - 1;
            assert!(draft.remove_entry(list, added_at));
            assert_eq!(draft, before);
        }
    }

    #[test]
    fn test_last_entry_is_never_removed() {
        let mut draft = UniversityDraft::new();
        draft.requirements[0] = "Form 138".to_string();
        for list in DraftList::ALL {
            assert!(!draft.remove_entry(list, 0));
            assert_eq!(draft.len(list), 1);
        }
        assert_eq!(draft.requirements, vec!["Form 138".to_string()]);
    }

    #[test]
    fn test_remove_out_of_range_is_noop() {
        let mut draft = UniversityDraft::new();
        draft.add_entry(DraftList::TestLocations);
        assert!(!draft.remove_entry(DraftList::TestLocations, 5));
        assert_eq!(draft.len(DraftList::TestLocations), 2);
    }

    #[test]
    fn test_commit_drops_blank_entries() {
        let mut draft = UniversityDraft::new();
        draft.slug = "up".to_string();
        draft.name = "University of the Philippines".to_string();
        draft.exam_dates = vec![ExamDate::new("Aug 1", ""), ExamDate::new("", "x")];
        draft.test_locations = vec![String::new(), "Diliman".to_string()];
        draft.requirements = vec![String::new()];

        let input = draft.to_input();
        assert_eq!(input.exam_dates, vec![ExamDate::new("Aug 1", "")]);
        assert_eq!(input.test_locations, vec!["Diliman".to_string()]);
        assert!(input.requirements.is_empty());
        assert_eq!(input.exam_fee, None);
    }

    #[test]
    fn test_list_names() {
        assert_eq!(DraftList::from_str("test_locations"), Some(DraftList::TestLocations));
        assert_eq!(DraftList::from_str("locations"), None);
    }
}
