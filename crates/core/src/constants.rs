//! Defaults and endpoint paths used throughout the backfill core crate.
//!
//! The defaults reproduce the fixture environment the backfill was written against: a local LIMS
//! seeded with a super-admin account and technicians sharing a small set of known passwords.

use std::time::Duration;

/// Default LIMS base URL.
pub const DEFAULT_BASE_URL: &str = "http://localhost:3000";

/// Default administrator used for discovery and reads.
pub const DEFAULT_ADMIN_EMAIL: &str = "admin@lims.com";

/// Password of [`DEFAULT_ADMIN_EMAIL`].
pub const DEFAULT_ADMIN_PASSWORD: &str = "Admin@123";

/// Candidate passwords tried, in order, when logging in as an assignment owner.
pub const DEFAULT_OWNER_PASSWORDS: [&str; 3] = ["TestAdmin@123", "Admin@123", "LabTech@123"];

/// Synthetic value written into the result payload.
pub const DEFAULT_RESULT_VALUE: f64 = 7.5;

/// Result key used when the test defines no fields.
pub const DEFAULT_RESULT_FIELD: &str = "result_value";

/// Per-request timeout.
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);

/// Connect timeout for the shared HTTP client.
pub const CONNECT_TIMEOUT: Duration = Duration::from_secs(10);

/// Number of characters of a failed submission body echoed to the console.
pub const FAILURE_EXCERPT_CHARS: usize = 200;

pub const LOGIN_PATH: &str = "/auth/login";
pub const PATIENTS_PATH: &str = "/patients";
pub const ASSIGNMENTS_PATH: &str = "/assignments";
pub const USERS_PATH: &str = "/users";
pub const SUBMIT_RESULT_PATH: &str = "/results/submit";
