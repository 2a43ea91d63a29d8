//! HTTP client for the LIMS REST API.
//!
//! One [`LimsClient`] wraps a single reusable `reqwest::Client` with explicit connect and request
//! timeouts. Every call is awaited by the caller before the next one is issued.
//!
//! Reads decode their typed model from the body regardless of the HTTP status: the LIMS answers
//! failures with an error envelope, which decodes as a record with the interesting fields absent.
//! A body that is not JSON of the expected shape is a [`BackfillError::Decode`].

use crate::constants::{
    ASSIGNMENTS_PATH, CONNECT_TIMEOUT, LOGIN_PATH, PATIENTS_PATH, SUBMIT_RESULT_PATH, USERS_PATH,
};
use crate::{BackfillConfig, BackfillError, BackfillResult};
use lims_types::{
    Assignment, AssignmentDetail, AssignmentStatus, LoginReq, LoginRes, PatientPage,
    SubmitResultReq, UpdateStatusReq, UserRecord,
};
use reqwest::{Method, RequestBuilder, StatusCode};
use serde::de::DeserializeOwned;
use url::Url;

/// Opaque bearer credential for one authenticated identity.
#[derive(Clone, PartialEq, Eq)]
pub struct SessionToken(String);

impl SessionToken {
    pub fn new(token: impl Into<String>) -> Self {
        Self(token.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for SessionToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("SessionToken(<redacted>)")
    }
}

/// Raw outcome of a result submission, kept for classification.
#[derive(Clone, Debug)]
pub struct SubmitResponse {
    pub status: StatusCode,
    pub body: String,
}

#[derive(Clone, Debug)]
pub struct LimsClient {
    http: reqwest::Client,
    base_url: Url,
}

impl LimsClient {
    /// Build a client for the configured LIMS.
    pub fn new(cfg: &BackfillConfig) -> BackfillResult<Self> {
        let http = reqwest::Client::builder()
            .connect_timeout(CONNECT_TIMEOUT.min(cfg.request_timeout()))
            .timeout(cfg.request_timeout())
            .build()
            .map_err(BackfillError::ClientBuild)?;

        Ok(Self {
            http,
            base_url: cfg.base_url().clone(),
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Log in and return the access token, or `None` if the server issued none.
    pub async fn login(&self, email: &str, password: &str) -> BackfillResult<Option<SessionToken>> {
        let url = self.endpoint(LOGIN_PATH, &[])?;
        let body = LoginReq { email, password };
        let (_, text) = self
            .send(self.http.post(url.clone()).json(&body), &url)
            .await?;
        let res: LoginRes = decode(&text, "login")?;
        Ok(res.into_access_token().map(SessionToken::new))
    }

    /// Identifier of the first patient on a one-entry page, if any.
    pub async fn first_patient(&self, token: &SessionToken) -> BackfillResult<Option<String>> {
        let mut url = self.endpoint(PATIENTS_PATH, &[])?;
        url.query_pairs_mut().append_pair("limit", "1");
        let page: PatientPage = self.get_json(token, url, "patient list").await?;
        Ok(page.first_id().map(str::to_owned))
    }

    /// Every assignment of a patient, in server order.
    pub async fn patient_assignments(
        &self,
        token: &SessionToken,
        patient_id: &str,
    ) -> BackfillResult<Vec<Assignment>> {
        let url = self.endpoint(ASSIGNMENTS_PATH, &["patient", patient_id])?;
        self.get_json(token, url, "assignment list").await
    }

    pub async fn user(&self, token: &SessionToken, user_id: &str) -> BackfillResult<UserRecord> {
        let url = self.endpoint(USERS_PATH, &[user_id])?;
        self.get_json(token, url, "user").await
    }

    pub async fn assignment(
        &self,
        token: &SessionToken,
        assignment_id: &str,
    ) -> BackfillResult<AssignmentDetail> {
        let url = self.endpoint(ASSIGNMENTS_PATH, &[assignment_id])?;
        self.get_json(token, url, "assignment").await
    }

    /// Set an assignment's status. The response body is discarded.
    pub async fn update_status(
        &self,
        token: &SessionToken,
        assignment_id: &str,
        status: AssignmentStatus,
    ) -> BackfillResult<StatusCode> {
        let url = self.endpoint(ASSIGNMENTS_PATH, &[assignment_id, "status"])?;
        let body = UpdateStatusReq { status };
        let (status, _) = self
            .send(
                self.authorised(Method::PUT, url.clone(), token).json(&body),
                &url,
            )
            .await?;
        Ok(status)
    }

    pub async fn submit_result(
        &self,
        token: &SessionToken,
        req: &SubmitResultReq<'_>,
    ) -> BackfillResult<SubmitResponse> {
        let url = self.endpoint(SUBMIT_RESULT_PATH, &[])?;
        let (status, body) = self
            .send(
                self.authorised(Method::POST, url.clone(), token).json(req),
                &url,
            )
            .await?;
        Ok(SubmitResponse { status, body })
    }

    async fn get_json<T: DeserializeOwned>(
        &self,
        token: &SessionToken,
        url: Url,
        context: &'static str,
    ) -> BackfillResult<T> {
        let (_, text) = self
            .send(self.authorised(Method::GET, url.clone(), token), &url)
            .await?;
        decode(&text, context)
    }

    fn authorised(&self, method: Method, url: Url, token: &SessionToken) -> RequestBuilder {
        self.http.request(method, url).bearer_auth(token.as_str())
    }

    async fn send(&self, req: RequestBuilder, url: &Url) -> BackfillResult<(StatusCode, String)> {
        let http_err = |source: reqwest::Error| BackfillError::Http {
            path: url.path().to_string(),
            source,
        };
        let res = req.send().await.map_err(http_err)?;
        let status = res.status();
        let text = res.text().await.map_err(http_err)?;
        tracing::debug!("{} -> {}", url.path(), status);
        Ok((status, text))
    }

    /// Resolve `path` plus percent-encoded `segments` against the base URL.
    fn endpoint(&self, path: &str, segments: &[&str]) -> BackfillResult<Url> {
        let mut url = self.base_url.clone();
        {
            let mut parts = url.path_segments_mut().map_err(|_| {
                BackfillError::InvalidConfig(format!(
                    "base URL cannot carry a path: {}",
                    self.base_url
                ))
            })?;
            parts.pop_if_empty();
            parts.extend(path.split('/').filter(|s| !s.is_empty()));
            parts.extend(segments);
        }
        Ok(url)
    }
}

fn decode<T: DeserializeOwned>(text: &str, context: &'static str) -> BackfillResult<T> {
    serde_json::from_str(text).map_err(|source| BackfillError::Decode { context, source })
}
