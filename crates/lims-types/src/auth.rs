//! Login request/response bodies for `POST /auth/login`.

use serde::{Deserialize, Serialize};

/// Credentials sent to the login endpoint.
#[derive(Clone, Serialize)]
pub struct LoginReq<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

impl std::fmt::Debug for LoginReq<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginReq")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Login response.
///
/// A successful login carries `accessToken`; a rejected one is an error envelope without it.
#[derive(Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LoginRes {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub refresh_token: Option<String>,
}

impl LoginRes {
    /// Consume the response, returning the access token if one was issued.
    pub fn into_access_token(self) -> Option<String> {
        self.access_token.filter(|t| !t.is_empty())
    }
}

impl std::fmt::Debug for LoginRes {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LoginRes")
            .field("access_token", &self.access_token.as_ref().map(|_| "<redacted>"))
            .field("refresh_token", &self.refresh_token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn login_req_serialises_email_and_password() {
        let req = LoginReq {
            email: "admin@lims.com",
            password: "Admin@123",
        };
        let json = serde_json::to_value(&req).expect("serialise");
        assert_eq!(
            json,
            serde_json::json!({"email": "admin@lims.com", "password": "Admin@123"})
        );
        assert!(!format!("{req:?}").contains("Admin@123"));
    }

    #[test]
    fn rejected_login_has_no_token() {
        let res: LoginRes = serde_json::from_str(
            r#"{"statusCode":401,"message":["Invalid credentials"],"error":"Unauthorized"}"#,
        )
        .expect("decode envelope");
        assert!(res.into_access_token().is_none());
    }

    #[test]
    fn successful_login_yields_token_and_redacts_debug() {
        let res: LoginRes = serde_json::from_str(
            r#"{"accessToken":"abc.def","refreshToken":"r","user":{"id":"u-1"}}"#,
        )
        .expect("decode login");
        assert!(!format!("{res:?}").contains("abc.def"));
        assert_eq!(res.into_access_token().as_deref(), Some("abc.def"));
    }
}
