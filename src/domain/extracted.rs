use serde::{Deserialize, Deserializer, Serialize, Serializer};

use super::ExamDate;

/// A field as it came back from the model: missing from the object,
/// explicitly `null`, or carrying a value.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Patch<T> {
    #[default]
    Absent,
    Null,
    Value(T),
}

impl<T> Patch<T> {
    pub fn is_absent(&self) -> bool {
        matches!(self, Patch::Absent)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Patch::Value(v) => Some(v),
            _ => None,
        }
    }
}

impl<T> From<Option<T>> for Patch<T> {
    fn from(value: Option<T>) -> Self {
        match value {
            Some(v) => Patch::Value(v),
            None => Patch::Null,
        }
    }
}

// A missing key never reaches this impl; `#[serde(default)]` yields `Absent`.
impl<'de, T: Deserialize<'de>> Deserialize<'de> for Patch<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Option::<T>::deserialize(deserializer).map(Patch::from)
    }
}

impl<T: Serialize> Serialize for Patch<T> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Patch::Value(v) => v.serialize(serializer),
            _ => serializer.serialize_none(),
        }
    }
}

/// Admission details pulled out of an announcement by the extraction
/// endpoint. Keys the model adds beyond these are dropped.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ExtractedFields {
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub application_start: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub application_end: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub exam_dates: Patch<Vec<ExamDate>>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub results_release: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub exam_fee: Patch<String>,
    #[serde(default, skip_serializing_if = "Patch::is_absent")]
    pub requirements: Patch<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_absent_null_and_value_are_distinct() {
        let fields: ExtractedFields =
            serde_json::from_str(r#"{"requirements": null, "exam_fee": "₱500"}"#).unwrap();
        assert_eq!(fields.requirements, Patch::Null);
        assert_eq!(fields.exam_fee, Patch::Value("₱500".to_string()));
        assert_eq!(fields.application_start, Patch::Absent);
    }

    #[test]
    fn test_unknown_keys_dropped_and_absent_not_serialized() {
        let fields: ExtractedFields =
            serde_json::from_str(r#"{"results_release": "January 2026", "mood": "great"}"#).unwrap();
        let json = serde_json::to_value(&fields).unwrap();
        assert_eq!(json, serde_json::json!({"results_release": "January 2026"}));
    }
}
