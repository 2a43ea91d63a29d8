//! Backfill runtime configuration.
//!
//! This module defines configuration that is resolved once at process startup and then passed
//! into the [`crate::Backfiller`]. The runner never reads process-wide environment variables
//! itself, so tests can point it at a mock server without touching global state.

use crate::constants::{
    DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD, DEFAULT_BASE_URL, DEFAULT_OWNER_PASSWORDS,
    DEFAULT_REQUEST_TIMEOUT, DEFAULT_RESULT_FIELD, DEFAULT_RESULT_VALUE,
};
use crate::{BackfillError, BackfillResult};
use std::time::Duration;
use url::Url;

/// Login credentials for one account.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl Credentials {
    pub fn new(email: impl Into<String>, password: impl Into<String>) -> Self {
        Self {
            email: email.into(),
            password: password.into(),
        }
    }
}

impl std::fmt::Debug for Credentials {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Backfill configuration resolved at startup.
#[derive(Clone)]
pub struct BackfillConfig {
    base_url: Url,
    admin: Credentials,
    owner_passwords: Vec<String>,
    result_value: f64,
    result_field: String,
    request_timeout: Duration,
    patient_id: Option<String>,
}

impl BackfillConfig {
    /// Create a new `BackfillConfig`.
    ///
    /// `base_url` must be an absolute `http` or `https` URL; a trailing `/` is ignored. Blank
    /// entries in `owner_passwords` are dropped. An empty list is accepted: every owner login
    /// then fails and the matching assignments are skipped.
    pub fn new(
        base_url: &str,
        admin: Credentials,
        owner_passwords: Vec<String>,
        result_value: f64,
        request_timeout: Duration,
    ) -> BackfillResult<Self> {
        let trimmed = base_url.trim().trim_end_matches('/');
        let parsed = Url::parse(trimmed).map_err(|e| {
            BackfillError::InvalidConfig(format!("invalid base URL '{trimmed}': {e}"))
        })?;
        if !matches!(parsed.scheme(), "http" | "https") || parsed.cannot_be_a_base() {
            return Err(BackfillError::InvalidConfig(format!(
                "base URL must use http or https, got: {trimmed}"
            )));
        }

        if admin.email.trim().is_empty() {
            return Err(BackfillError::InvalidConfig(
                "admin email cannot be empty".into(),
            ));
        }

        if !result_value.is_finite() {
            return Err(BackfillError::InvalidConfig(format!(
                "result value must be a finite number, got: {result_value}"
            )));
        }

        if request_timeout.is_zero() {
            return Err(BackfillError::InvalidConfig(
                "request timeout must be greater than zero".into(),
            ));
        }

        let owner_passwords = owner_passwords
            .into_iter()
            .filter(|p| !p.trim().is_empty())
            .collect();

        Ok(Self {
            base_url: parsed,
            admin,
            owner_passwords,
            result_value,
            result_field: DEFAULT_RESULT_FIELD.into(),
            request_timeout,
            patient_id: None,
        })
    }

    /// Target a specific patient instead of discovering the first one.
    ///
    /// Blank identifiers are ignored.
    pub fn with_patient_id(mut self, patient_id: Option<String>) -> Self {
        self.patient_id = patient_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty());
        self
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn admin(&self) -> &Credentials {
        &self.admin
    }

    pub fn owner_passwords(&self) -> &[String] {
        &self.owner_passwords
    }

    pub fn result_value(&self) -> f64 {
        self.result_value
    }

    pub fn result_field(&self) -> &str {
        &self.result_field
    }

    pub fn request_timeout(&self) -> Duration {
        self.request_timeout
    }

    pub fn patient_id(&self) -> Option<&str> {
        self.patient_id.as_deref()
    }
}

impl Default for BackfillConfig {
    fn default() -> Self {
        Self {
            base_url: Url::parse(DEFAULT_BASE_URL).expect("default base URL is valid"),
            admin: Credentials::new(DEFAULT_ADMIN_EMAIL, DEFAULT_ADMIN_PASSWORD),
            owner_passwords: default_owner_passwords(),
            result_value: DEFAULT_RESULT_VALUE,
            result_field: DEFAULT_RESULT_FIELD.into(),
            request_timeout: DEFAULT_REQUEST_TIMEOUT,
            patient_id: None,
        }
    }
}

impl std::fmt::Debug for BackfillConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BackfillConfig")
            .field("base_url", &self.base_url.as_str())
            .field("admin", &self.admin)
            .field("owner_passwords", &self.owner_passwords.len())
            .field("result_value", &self.result_value)
            .field("request_timeout", &self.request_timeout)
            .field("patient_id", &self.patient_id)
            .finish()
    }
}

/// The fixture passwords, in the order they are tried.
pub fn default_owner_passwords() -> Vec<String> {
    DEFAULT_OWNER_PASSWORDS.iter().map(|p| p.to_string()).collect()
}
