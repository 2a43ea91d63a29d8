//! Wire models for the LIMS HTTP API.
//!
//! These types mirror the JSON bodies exchanged with the LIMS server. They are transient views
//! of remote resources: nothing here is persisted or owned by the backfill tool.
//!
//! Response models are lenient. The server answers failed requests with an error
//! envelope (`{"statusCode": 404, "message": [...], "error": "..."}`) instead of the resource, so
//! every field the tool branches on is optional and unknown keys are ignored. An error envelope
//! therefore decodes as a record whose interesting field is simply absent.

pub mod assignment;
pub mod auth;

pub use assignment::{
    Assignment, AssignmentDetail, AssignmentStatus, ParseStatusError, ResultValues,
    SubmitResultReq, TestField, TestSchema, UpdateStatusReq,
};
pub use auth::{LoginReq, LoginRes};

use serde::{Deserialize, Serialize};

/// A page of patients as returned by `GET /patients`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientPage {
    #[serde(default)]
    pub data: Vec<PatientSummary>,
}

impl PatientPage {
    /// Identifier of the first patient on the page, if it has one.
    pub fn first_id(&self) -> Option<&str> {
        self.data
            .first()
            .and_then(|p| p.id.as_deref())
            .filter(|id| !id.is_empty())
    }
}

/// Minimal patient view; only the identifier is read.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct PatientSummary {
    #[serde(default)]
    pub id: Option<String>,
}

/// User record as returned by `GET /users/{id}`.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct UserRecord {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
}

impl UserRecord {
    /// The user's email, ignoring blank values.
    pub fn email(&self) -> Option<&str> {
        self.email.as_deref().filter(|e| !e.trim().is_empty())
    }
}
