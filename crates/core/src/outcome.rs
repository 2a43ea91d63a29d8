//! Per-assignment outcomes and the run report.
//!
//! Every assignment in the listing yields exactly one [`AssignmentOutcome`]. Its `Display` form is
//! the console line printed for that assignment.

use crate::constants::FAILURE_EXCERPT_CHARS;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum AssignmentOutcome {
    /// Status was already `SUBMITTED`; nothing was sent.
    AlreadySubmitted,
    /// The assignment has no owning administrator.
    NoAdmin,
    /// The owner's user record carried no email.
    NoAdminEmail,
    /// None of the candidate passwords worked for the owner.
    OwnerLoginFailed { email: String },
    /// The server rejected the result; holds the start of the response body.
    SubmitFailed { body_excerpt: String },
    Submitted,
}

impl AssignmentOutcome {
    pub fn is_skip(&self) -> bool {
        matches!(
            self,
            AssignmentOutcome::AlreadySubmitted
                | AssignmentOutcome::NoAdmin
                | AssignmentOutcome::NoAdminEmail
                | AssignmentOutcome::OwnerLoginFailed { .. }
        )
    }

    pub fn is_failure(&self) -> bool {
        matches!(self, AssignmentOutcome::SubmitFailed { .. })
    }
}

/// One processed assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AssignmentReport {
    pub assignment_id: String,
    pub outcome: AssignmentOutcome,
}

impl fmt::Display for AssignmentReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let id = &self.assignment_id;
        match &self.outcome {
            AssignmentOutcome::AlreadySubmitted => write!(f, "Assignment {id} already SUBMITTED"),
            AssignmentOutcome::NoAdmin => write!(f, "Assignment {id} has no admin, skipping"),
            AssignmentOutcome::NoAdminEmail => write!(f, "Cannot get admin email for {id}"),
            AssignmentOutcome::OwnerLoginFailed { email } => {
                write!(f, "Cannot login as admin {email} for assignment {id}")
            }
            AssignmentOutcome::SubmitFailed { body_excerpt } => {
                write!(f, "✗ Failed to submit result for {id}: {body_excerpt}")
            }
            AssignmentOutcome::Submitted => write!(f, "✓ Submitted result for assignment {id}"),
        }
    }
}

/// Ordered outcomes of one run.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackfillReport {
    pub patient_id: String,
    pub assignments: Vec<AssignmentReport>,
}

impl BackfillReport {
    pub fn submitted(&self) -> usize {
        self.count(|o| *o == AssignmentOutcome::Submitted)
    }

    pub fn skipped(&self) -> usize {
        self.count(AssignmentOutcome::is_skip)
    }

    pub fn failed(&self) -> usize {
        self.count(AssignmentOutcome::is_failure)
    }

    fn count(&self, pred: impl Fn(&AssignmentOutcome) -> bool) -> usize {
        self.assignments.iter().filter(|r| pred(&r.outcome)).count()
    }
}

impl fmt::Display for BackfillReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Done: {} submitted, {} skipped, {} failed",
            self.submitted(),
            self.skipped(),
            self.failed()
        )
    }
}

/// Decide whether a result submission failed.
///
/// A non-success HTTP status is a failure. The LIMS error contract is not pinned down, so a
/// success status is still treated as a failure when the body mentions `error` (any case) or is
/// a JSON object carrying a `statusCode` field.
pub fn submission_failed(http_success: bool, body: &str) -> bool {
    if !http_success {
        return true;
    }
    if body.to_lowercase().contains("error") {
        return true;
    }
    matches!(
        serde_json::from_str::<serde_json::Value>(body),
        Ok(serde_json::Value::Object(map)) if map.contains_key("statusCode")
    )
}

/// First [`FAILURE_EXCERPT_CHARS`] characters of a response body.
pub fn body_excerpt(body: &str) -> String {
    body.chars().take(FAILURE_EXCERPT_CHARS).collect()
}
