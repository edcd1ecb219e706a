use serde::{Deserialize, Serialize};

/// Error body returned by the REST and auth endpoints. PostgREST uses
/// `message`, the auth server uses `msg` or `error_description`.
#[derive(Debug, Default, Deserialize)]
pub struct ErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub msg: Option<String>,
    #[serde(default)]
    pub error_description: Option<String>,
    #[serde(default)]
    pub error: Option<String>,
}

impl ErrorBody {
    pub fn into_message(self) -> Option<String> {
        self.message
            .or(self.msg)
            .or(self.error_description)
            .or(self.error)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuthUser {
    pub id: String,
    #[serde(default)]
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Session {
    pub access_token: String,
    #[serde(default)]
    pub refresh_token: Option<String>,
    #[serde(default)]
    pub expires_in: Option<u64>,
    pub user: AuthUser,
}

#[derive(Debug, Serialize)]
pub struct Credentials<'a> {
    pub email: &'a str,
    pub password: &'a str,
}

/// `/signup` answers with the bare user when e-mail confirmation is on,
/// and with a full session when sign-ups are auto-confirmed.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub enum SignUpResponse {
    Session(Session),
    User(AuthUser),
}

impl SignUpResponse {
    pub fn into_user(self) -> AuthUser {
        match self {
            SignUpResponse::Session(session) => session.user,
            SignUpResponse::User(user) => user,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_body_prefers_message() {
        let body: ErrorBody = serde_json::from_str(
            r#"{"code":"23505","message":"duplicate key value violates unique constraint","hint":null}"#,
        )
        .expect("parse error body");
        assert_eq!(
            body.into_message().as_deref(),
            Some("duplicate key value violates unique constraint")
        );
    }

    #[test]
    fn test_error_body_falls_back_to_auth_fields() {
        let body: ErrorBody =
            serde_json::from_str(r#"{"error":"invalid_grant","error_description":"Invalid login credentials"}"#)
                .expect("parse auth error");
        assert_eq!(body.into_message().as_deref(), Some("Invalid login credentials"));
    }

    #[test]
    fn test_sign_up_accepts_both_shapes() {
        let bare: SignUpResponse =
            serde_json::from_str(r#"{"id":"u-1","email":"a@b.c","aud":"authenticated"}"#).expect("bare user");
        assert_eq!(bare.into_user().id, "u-1");

        let session: SignUpResponse = serde_json::from_str(
            r#"{"access_token":"t","token_type":"bearer","user":{"id":"u-2","email":"x@y.z"}}"#,
        )
        .expect("session");
        assert_eq!(session.into_user().id, "u-2");
    }
}
