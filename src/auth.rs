//! Calls to the managed backend's password auth endpoints.

use log::debug;
use reqwest::Client;
use serde::{Deserialize, Serialize};

use crate::config::{BackendKind, Session};
use crate::error::StoreError;
use crate::store::check_status;

type Result<T> = std::result::Result<T, StoreError>;

#[derive(Debug, Serialize)]
struct Credentials<'a> {
    email: &'a str,
    password: &'a str,
}

#[derive(Debug, Clone, Deserialize)]
struct AuthUser {
    id: String,
    #[serde(default)]
    email: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    refresh_token: Option<String>,
    user: AuthUser,
}

/// Signup answers with a session, or with just the user when email confirmation is pending.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum SignUpResponse {
    Session(TokenResponse),
    User(AuthUser),
}

#[derive(Debug, Clone)]
pub struct SignUp {
    pub user_id: String,
    /// `None` until the user confirms their email and signs in.
    pub session: Option<Session>,
}

#[derive(Debug, Clone)]
pub struct AuthClient {
    client: Client,
    base_url: String,
    anon_key: String,
}

impl TokenResponse {
    fn into_session(self, fallback_email: &str) -> Session {
        Session {
            backend: BackendKind::Remote,
            user_id: self.user.id,
            email: self.user.email.unwrap_or_else(|| fallback_email.to_string()),
            access_token: Some(self.access_token),
            refresh_token: self.refresh_token,
        }
    }
}

impl AuthClient {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
        }
    }

    fn url(&self, path: &str) -> String {
        format!("{}/auth/v1/{}", self.base_url, path)
    }

    pub async fn sign_up(&self, email: &str, password: &str) -> Result<SignUp> {
        let response = self
            .client
            .post(self.url("signup"))
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let body = check_status(response).await?.text().await?;

        let signup = match serde_json::from_str::<SignUpResponse>(&body)? {
            SignUpResponse::Session(token) => SignUp {
                user_id: token.user.id.clone(),
                session: Some(token.into_session(email)),
            },
            SignUpResponse::User(user) => SignUp {
                user_id: user.id,
                session: None,
            },
        };
        debug!("Signed up {} as {}", email, signup.user_id);
        Ok(signup)
    }

    pub async fn sign_in(&self, email: &str, password: &str) -> Result<Session> {
        let response = self
            .client
            .post(self.url("token"))
            .query(&[("grant_type", "password")])
            .header("apikey", &self.anon_key)
            .json(&Credentials { email, password })
            .send()
            .await?;
        let body = check_status(response).await?.text().await?;
        let token: TokenResponse = serde_json::from_str(&body)?;
        debug!("Signed in {}", email);
        Ok(token.into_session(email))
    }

    pub async fn sign_out(&self, access_token: &str) -> Result<()> {
        let response = self
            .client
            .post(self.url("logout"))
            .header("apikey", &self.anon_key)
            .bearer_auth(access_token)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_signup_response_variants() {
        let with_session = r#"{
            "access_token": "jwt", "token_type": "bearer", "expires_in": 3600,
            "refresh_token": "r", "user": {"id": "u-1", "email": "a@b.c"}
        }"#;
        match serde_json::from_str::<SignUpResponse>(with_session).unwrap() {
            SignUpResponse::Session(t) => {
                let session = t.into_session("ignored@x.y");
                assert_eq!(session.user_id, "u-1");
                assert_eq!(session.email, "a@b.c");
                assert_eq!(session.access_token.as_deref(), Some("jwt"));
            }
            other => panic!("expected session, got {:?}", other),
        }

        let pending = r#"{"id": "u-2", "email": "a@b.c", "confirmation_sent_at": "2024-01-01T00:00:00Z"}"#;
        assert!(matches!(
            serde_json::from_str::<SignUpResponse>(pending).unwrap(),
            SignUpResponse::User(AuthUser { ref id, .. }) if id == "u-2"
        ));
    }
}
