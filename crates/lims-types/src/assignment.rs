//! Assignment and result wire models.
//!
//! An assignment pairs a patient with a test and (optionally) the administrator who owns it.
//! The test carries an ordered list of field descriptors describing the expected result values.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Result values keyed by test field name.
pub type ResultValues = BTreeMap<String, f64>;

/// Error returned when parsing an [`AssignmentStatus`] from a strict string.
#[derive(Debug, thiserror::Error)]
#[error("unknown assignment status: {0}")]
pub struct ParseStatusError(pub String);

/// Lifecycle state of an assignment.
///
/// Values the server may grow in future decode as [`AssignmentStatus::Other`] and are treated
/// like any other not-yet-submitted state.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignmentStatus {
    Pending,
    Assigned,
    InProgress,
    Completed,
    Submitted,
    Other(String),
}

impl AssignmentStatus {
    /// Convert to the wire string.
    pub fn as_wire(&self) -> &str {
        match self {
            AssignmentStatus::Pending => "PENDING",
            AssignmentStatus::Assigned => "ASSIGNED",
            AssignmentStatus::InProgress => "IN_PROGRESS",
            AssignmentStatus::Completed => "COMPLETED",
            AssignmentStatus::Submitted => "SUBMITTED",
            AssignmentStatus::Other(raw) => raw,
        }
    }

    /// Parse from the wire string, keeping unrecognised values.
    pub fn from_wire(s: &str) -> Self {
        match s {
            "PENDING" => AssignmentStatus::Pending,
            "ASSIGNED" => AssignmentStatus::Assigned,
            "IN_PROGRESS" => AssignmentStatus::InProgress,
            "COMPLETED" => AssignmentStatus::Completed,
            "SUBMITTED" => AssignmentStatus::Submitted,
            other => AssignmentStatus::Other(other.to_owned()),
        }
    }
}

impl std::str::FromStr for AssignmentStatus {
    type Err = ParseStatusError;

    /// Strict parse: only the known lifecycle states are accepted.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match AssignmentStatus::from_wire(s) {
            AssignmentStatus::Other(raw) => Err(ParseStatusError(raw)),
            known => Ok(known),
        }
    }
}

impl std::fmt::Display for AssignmentStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_wire())
    }
}

impl Serialize for AssignmentStatus {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_wire())
    }
}

impl<'de> Deserialize<'de> for AssignmentStatus {
    fn deserialize<D>(deserializer: D) -> Result<Self, D::Error>
    where
        D: serde::Deserializer<'de>,
    {
        let s = String::deserialize(deserializer)?;
        Ok(AssignmentStatus::from_wire(&s))
    }
}

/// A single field descriptor of a test's result schema.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct TestField {
    #[serde(default)]
    pub field_name: Option<String>,
}

/// The test attached to an assignment.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TestSchema {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub test_fields: Option<Vec<TestField>>,
}

/// Assignment as returned in the patient listing.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: String,
    #[serde(default)]
    pub status: Option<AssignmentStatus>,
    #[serde(default)]
    pub admin_id: Option<String>,
}

impl Assignment {
    pub fn is_submitted(&self) -> bool {
        self.status == Some(AssignmentStatus::Submitted)
    }

    pub fn is_completed(&self) -> bool {
        self.status == Some(AssignmentStatus::Completed)
    }

    /// Owning administrator, ignoring null and empty identifiers.
    pub fn owner_id(&self) -> Option<&str> {
        self.admin_id.as_deref().filter(|id| !id.is_empty())
    }
}

/// Assignment detail as returned by `GET /assignments/{id}`.
///
/// Every field is optional: an error envelope decodes to an empty detail.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssignmentDetail {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub status: Option<AssignmentStatus>,
    #[serde(default)]
    pub admin_id: Option<String>,
    #[serde(default)]
    pub test: Option<TestSchema>,
}

impl AssignmentDetail {
    /// Ordered field descriptors of the attached test (empty when unknown).
    pub fn test_fields(&self) -> &[TestField] {
        self.test
            .as_ref()
            .and_then(|t| t.test_fields.as_deref())
            .unwrap_or(&[])
    }

    /// Name of the first result field, or `default` when the test defines none.
    ///
    /// A first descriptor without a name also falls back to `default`; later descriptors are
    /// never consulted.
    pub fn first_field_name<'a>(&'a self, default: &'a str) -> &'a str {
        match self.test_fields().first() {
            Some(field) => field.field_name.as_deref().unwrap_or(default),
            None => default,
        }
    }
}

/// Body of `PUT /assignments/{id}/status`.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct UpdateStatusReq {
    pub status: AssignmentStatus,
}

/// Body of `POST /results/submit`.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitResultReq<'a> {
    pub assignment_id: &'a str,
    pub result_values: ResultValues,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_decodes_known_and_unknown_values() {
        let a: Assignment =
            serde_json::from_str(r#"{"id":"a-1","status":"SUBMITTED","adminId":"u-1"}"#)
                .expect("decode");
        assert!(a.is_submitted());
        assert_eq!(a.owner_id(), Some("u-1"));

        let b: Assignment =
            serde_json::from_str(r#"{"id":"a-2","status":"ON_HOLD"}"#).expect("decode");
        assert_eq!(b.status, Some(AssignmentStatus::Other("ON_HOLD".into())));
        assert!(!b.is_submitted());
        assert!(!b.is_completed());
    }

    #[test]
    fn strict_parse_rejects_unknown_status() {
        assert_eq!(
            "IN_PROGRESS".parse::<AssignmentStatus>().expect("parse"),
            AssignmentStatus::InProgress
        );
        let err = "ON_HOLD".parse::<AssignmentStatus>().expect_err("should reject");
        assert_eq!(err.0, "ON_HOLD");
    }

    #[test]
    fn owner_id_ignores_null_and_empty() {
        let null: Assignment =
            serde_json::from_str(r#"{"id":"a-1","status":"PENDING","adminId":null}"#)
                .expect("decode");
        assert_eq!(null.owner_id(), None);

        let empty: Assignment =
            serde_json::from_str(r#"{"id":"a-1","adminId":""}"#).expect("decode");
        assert_eq!(empty.owner_id(), None);
        assert_eq!(empty.status, None);
    }

    #[test]
    fn first_field_name_uses_only_the_first_descriptor() {
        let detail: AssignmentDetail = serde_json::from_str(
            r#"{"id":"a-1","test":{"testFields":[{"field_name":"glucose"},{"field_name":"hba1c"}]}}"#,
        )
        .expect("decode");
        assert_eq!(detail.test_fields().len(), 2);
        assert_eq!(detail.first_field_name("result_value"), "glucose");
    }

    #[test]
    fn first_field_name_falls_back_to_default() {
        let no_fields: AssignmentDetail =
            serde_json::from_str(r#"{"test":{"testFields":[]}}"#).expect("decode");
        assert_eq!(no_fields.first_field_name("result_value"), "result_value");

        let null_test: AssignmentDetail =
            serde_json::from_str(r#"{"test":null}"#).expect("decode");
        assert_eq!(null_test.first_field_name("result_value"), "result_value");

        let unnamed: AssignmentDetail =
            serde_json::from_str(r#"{"test":{"testFields":[{"label":"x"}]}}"#).expect("decode");
        assert_eq!(unnamed.first_field_name("result_value"), "result_value");

        let envelope: AssignmentDetail =
            serde_json::from_str(r#"{"statusCode":404,"message":["Assignment not found"]}"#)
                .expect("decode");
        assert_eq!(envelope.first_field_name("result_value"), "result_value");
    }

    #[test]
    fn submit_body_uses_camel_case_keys() {
        let mut values = ResultValues::new();
        values.insert("glucose".into(), 7.5);
        let req = SubmitResultReq {
            assignment_id: "a-1",
            result_values: values,
        };
        assert_eq!(
            serde_json::to_value(&req).expect("serialise"),
            serde_json::json!({"assignmentId": "a-1", "resultValues": {"glucose": 7.5}})
        );

        let status = UpdateStatusReq {
            status: AssignmentStatus::Completed,
        };
        assert_eq!(
            serde_json::to_value(&status).expect("serialise"),
            serde_json::json!({"status": "COMPLETED"})
        );
    }
}
