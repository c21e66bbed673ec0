//! Reconciles extraction results with a draft, one declared policy per field.

use crate::domain::{ExamDate, ExtractedFields, Patch};

use super::draft::UniversityDraft;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MergePolicy {
    /// A value replaces the draft's; null or a missing key keep it.
    KeepOnNull,
    /// Only a non-blank value replaces the draft's.
    KeepOnEmpty,
}

/// Draft fields the extraction endpoint can fill.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DraftField {
    ApplicationStart,
    ApplicationEnd,
    ExamDates,
    ResultsRelease,
    ExamFee,
    Requirements,
}

impl DraftField {
    pub const ALL: [DraftField; 6] = [
        DraftField::ApplicationStart,
        DraftField::ApplicationEnd,
        DraftField::ExamDates,
        DraftField::ResultsRelease,
        DraftField::ExamFee,
        DraftField::Requirements,
    ];

    pub fn policy(self) -> MergePolicy {
        match self {
            DraftField::ApplicationStart
            | DraftField::ApplicationEnd
            | DraftField::ResultsRelease
            | DraftField::ExamFee => MergePolicy::KeepOnNull,
            DraftField::ExamDates | DraftField::Requirements => MergePolicy::KeepOnEmpty,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            DraftField::ApplicationStart => "application_start",
            DraftField::ApplicationEnd => "application_end",
            DraftField::ExamDates => "exam_dates",
            DraftField::ResultsRelease => "results_release",
            DraftField::ExamFee => "exam_fee",
            DraftField::Requirements => "requirements",
        }
    }
}

trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.trim().is_empty()
    }
}

impl Blank for ExamDate {
    fn is_blank(&self) -> bool {
        self.date.is_blank()
    }
}

impl<T: Blank> Blank for Vec<T> {
    fn is_blank(&self) -> bool {
        self.iter().all(Blank::is_blank)
    }
}

fn apply<T: Blank + Clone>(target: &mut T, patch: &Patch<T>, policy: MergePolicy) -> bool {
    let Patch::Value(value) = patch else {
        return false;
    };
    if policy == MergePolicy::KeepOnEmpty && value.is_blank() {
        return false;
    }
    *target = value.clone();
    true
}

/// Merges `fields` into `draft` and returns the fields that were replaced.
pub fn merge_extracted(draft: &mut UniversityDraft, fields: &ExtractedFields) -> Vec<DraftField> {
    let mut changed = Vec::new();

    for field in DraftField::ALL {
        let policy = field.policy();
        let replaced = match field {
            DraftField::ApplicationStart => {
                apply(&mut draft.application_start, &fields.application_start, policy)
            }
            DraftField::ApplicationEnd => {
                apply(&mut draft.application_end, &fields.application_end, policy)
            }
            DraftField::ExamDates => apply(&mut draft.exam_dates, &fields.exam_dates, policy),
            DraftField::ResultsRelease => {
                apply(&mut draft.results_release, &fields.results_release, policy)
            }
            DraftField::ExamFee => apply(&mut draft.exam_fee, &fields.exam_fee, policy),
            DraftField::Requirements => apply(&mut draft.requirements, &fields.requirements, policy),
        };
        if replaced {
            changed.push(field);
        }
    }

    draft.pad_lists();
    changed
}

#[cfg(test)]
mod tests {
    use super::*;

    fn draft_with_requirements() -> UniversityDraft {
        let mut draft = UniversityDraft::new();
        draft.requirements = vec!["Form 138".to_string(), "2x2 photo".to_string()];
        draft.exam_fee = "₱450".to_string();
        draft.application_start = "August 1, 2025".to_string();
        draft
    }

    #[test]
    fn test_null_requirements_keep_draft_and_fee_is_adopted() {
        let mut draft = draft_with_requirements();
        let fields: ExtractedFields =
            serde_json::from_str(r#"{"requirements": null, "exam_fee": "₱500"}"#).unwrap();

        let changed = merge_extracted(&mut draft, &fields);

        assert_eq!(changed, vec![DraftField::ExamFee]);
        assert_eq!(draft.requirements, vec!["Form 138".to_string(), "2x2 photo".to_string()]);
        assert_eq!(draft.exam_fee, "₱500");
    }

    #[test]
    fn test_null_scalar_keeps_draft_value() {
        let mut draft = draft_with_requirements();
        let fields: ExtractedFields =
            serde_json::from_str(r#"{"application_start": null, "results_release": "January 2026"}"#)
                .unwrap();

        merge_extracted(&mut draft, &fields);

        assert_eq!(draft.application_start, "August 1, 2025");
        assert_eq!(draft.results_release, "January 2026");
    }

    #[test]
    fn test_empty_lists_do_not_clobber() {
        let mut draft = draft_with_requirements();
        draft.exam_dates = vec![ExamDate::new("Aug 1", "")];
        let fields: ExtractedFields = serde_json::from_str(
            r#"{"requirements": [], "exam_dates": [{"date": "", "note": "TBA"}]}"#,
        )
        .unwrap();

        assert!(merge_extracted(&mut draft, &fields).is_empty());
        assert_eq!(draft.exam_dates, vec![ExamDate::new("Aug 1", "")]);
        assert_eq!(draft.requirements.len(), 2);
    }

    #[test]
    fn test_lists_replaced_by_real_values() {
        let mut draft = UniversityDraft::new();
        let fields: ExtractedFields = serde_json::from_str(
            r#"{"exam_dates": [{"date": "Nov 16, 2025", "note": "Batch 1"}], "requirements": ["Form 138"]}"#,
        )
        .unwrap();

        let changed = merge_extracted(&mut draft, &fields);

        assert_eq!(changed, vec![DraftField::ExamDates, DraftField::Requirements]);
        assert_eq!(draft.exam_dates, vec![ExamDate::new("Nov 16, 2025", "Batch 1")]);
        assert_eq!(draft.requirements, vec!["Form 138".to_string()]);
        // Untouched list still offers one row
        assert_eq!(draft.test_locations, vec![String::new()]);
    }

    #[test]
    fn test_policy_table() {
        assert_eq!(DraftField::ExamDates.policy(), MergePolicy::KeepOnEmpty);
        assert_eq!(DraftField::Requirements.policy(), MergePolicy::KeepOnEmpty);
        assert_eq!(DraftField::ExamFee.policy(), MergePolicy::KeepOnNull);
    }
}
