//! The backfill run.
//!
//! One linear pass over one patient's assignments:
//! 1. log in as the configured administrator,
//! 2. resolve the patient (configured id, or the first patient the LIMS lists),
//! 3. list the patient's assignments,
//! 4. for each assignment that still needs a result, log in as its owner, make sure it is
//!    `COMPLETED`, and submit a synthetic value for the first field of its test.
//!
//! Each assignment produces one line on the report writer. Only the admin login and the patient
//! lookup abort the run; per-assignment problems become skip/failure lines. Transport and decoding
//! errors are not caught here and end the run.

use crate::client::{LimsClient, SessionToken};
use crate::outcome::{
    body_excerpt, submission_failed, AssignmentOutcome, AssignmentReport, BackfillReport,
};
use crate::{BackfillConfig, BackfillError, BackfillResult};
use lims_types::{Assignment, AssignmentStatus, ResultValues, SubmitResultReq};
use std::io::Write;

pub struct Backfiller {
    cfg: BackfillConfig,
    client: LimsClient,
}

impl Backfiller {
    pub fn new(cfg: BackfillConfig) -> BackfillResult<Self> {
        let client = LimsClient::new(&cfg)?;
        Ok(Self { cfg, client })
    }

    pub fn config(&self) -> &BackfillConfig {
        &self.cfg
    }

    /// Run the backfill, writing one line per assignment to `out` as it is processed.
    ///
    /// # Errors
    /// - [`BackfillError::AdminLogin`] if the administrator login yields no token,
    /// - [`BackfillError::NoPatient`] if no patient could be resolved,
    /// - transport, decoding or report-writing failures.
    pub async fn run<W: Write>(&self, out: &mut W) -> BackfillResult<BackfillReport> {
        let admin = &self.cfg.admin().email;
        let admin_token = self
            .client
            .login(admin, &self.cfg.admin().password)
            .await?
            .ok_or(BackfillError::AdminLogin)?;
        tracing::info!("logged in as {}", admin);

        let patient_id = match self.cfg.patient_id() {
            Some(id) => id.to_owned(),
            None => self
                .client
                .first_patient(&admin_token)
                .await?
                .ok_or(BackfillError::NoPatient)?,
        };

        let assignments = self
            .client
            .patient_assignments(&admin_token, &patient_id)
            .await?;
        tracing::info!(
            "patient {} has {} assignment(s)",
            patient_id,
            assignments.len()
        );

        let mut report = BackfillReport {
            patient_id,
            assignments: Vec::with_capacity(assignments.len()),
        };

        for assignment in &assignments {
            let outcome = self.process(&admin_token, assignment).await?;
            let entry = AssignmentReport {
                assignment_id: assignment.id.clone(),
                outcome,
            };
            writeln!(out, "{entry}").map_err(BackfillError::Report)?;
            report.assignments.push(entry);
        }

        tracing::info!(
            "backfill finished: {} submitted, {} skipped, {} failed",
            report.submitted(),
            report.skipped(),
            report.failed()
        );
        Ok(report)
    }

    async fn process(
        &self,
        admin_token: &SessionToken,
        assignment: &Assignment,
    ) -> BackfillResult<AssignmentOutcome> {
        let id = assignment.id.as_str();

        if assignment.is_submitted() {
            return Ok(AssignmentOutcome::AlreadySubmitted);
        }

        let Some(owner_id) = assignment.owner_id() else {
            tracing::warn!("assignment {} has no owner", id);
            return Ok(AssignmentOutcome::NoAdmin);
        };

        let owner = self.client.user(admin_token, owner_id).await?;
        let Some(email) = owner.email() else {
            tracing::warn!("owner {} of assignment {} has no email", owner_id, id);
            return Ok(AssignmentOutcome::NoAdminEmail);
        };

        let Some(owner_token) = self.owner_login(email).await? else {
            tracing::warn!("no candidate password accepted for {}", email);
            return Ok(AssignmentOutcome::OwnerLoginFailed {
                email: email.to_owned(),
            });
        };

        let detail = self.client.assignment(admin_token, id).await?;
        let field = detail.first_field_name(self.cfg.result_field());
        let values = result_values(field, self.cfg.result_value());

        if !assignment.is_completed() {
            let status = self
                .client
                .update_status(&owner_token, id, AssignmentStatus::Completed)
                .await?;
            if !status.is_success() {
                tracing::warn!("status update for {} returned {}", id, status);
            }
        }

        let req = SubmitResultReq {
            assignment_id: id,
            result_values: values,
        };
        let res = self.client.submit_result(&owner_token, &req).await?;

        if submission_failed(res.status.is_success(), &res.body) {
            tracing::warn!("result submission for {} rejected ({})", id, res.status);
            Ok(AssignmentOutcome::SubmitFailed {
                body_excerpt: body_excerpt(&res.body),
            })
        } else {
            Ok(AssignmentOutcome::Submitted)
        }
    }

    /// Try each candidate password in order, stopping at the first that yields a token.
    async fn owner_login(&self, email: &str) -> BackfillResult<Option<SessionToken>> {
        for password in self.cfg.owner_passwords() {
            if let Some(token) = self.client.login(email, password).await? {
                tracing::debug!("logged in as owner {}", email);
                return Ok(Some(token));
            }
        }
        Ok(None)
    }
}

/// Result payload populating a single field.
pub fn result_values(field: &str, value: f64) -> ResultValues {
    let mut values = ResultValues::new();
    values.insert(field.to_owned(), value);
    values
}
