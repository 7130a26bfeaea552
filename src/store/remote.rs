use async_trait::async_trait;
use log::debug;
use reqwest::{Client, RequestBuilder, Response};
use serde::Serialize;
use serde_json::Value;

use super::{PrayerStore, ProfileStore, Result};
use crate::error::StoreError;
use crate::models::{NewProfile, PrayerRecord, PrayerType, UserProfile};

const PRAYER_STATS_TABLE: &str = "prayer_stats";
const USERS_TABLE: &str = "users";
const INCREMENT_PROCEDURE: &str = "update_prayer_count";
const SIGNUP_PROCEDURE: &str = "handle_user_signup";

/// Store backed by a hosted PostgREST-style API.
#[derive(Debug, Clone)]
pub struct RestStore {
    client: Client,
    base_url: String,
    anon_key: String,
    access_token: Option<String>,
}

#[derive(Debug, Serialize)]
struct IncrementParams<'a> {
    user_id_param: &'a str,
    prayer_name_param: &'a str,
    delta: i64,
}

#[derive(Debug, Serialize)]
struct SignupParams<'a> {
    user_id: &'a str,
    user_email: &'a str,
    user_first_name: &'a str,
    user_last_name: &'a str,
    user_birth_year: i32,
    user_gender: &'a str,
}

impl RestStore {
    pub fn new(base_url: &str, anon_key: &str) -> Self {
        Self {
            client: Client::new(),
            base_url: base_url.trim_end_matches('/').to_string(),
            anon_key: anon_key.to_string(),
            access_token: None,
        }
    }

    /// Authenticate requests as a signed-in user rather than with the anon key.
    pub fn with_access_token(mut self, token: &str) -> Self {
        self.access_token = Some(token.to_string());
        self
    }

    fn table_url(&self, table: &str) -> String {
        format!("{}/rest/v1/{}", self.base_url, table)
    }

    fn rpc_url(&self, procedure: &str) -> String {
        format!("{}/rest/v1/rpc/{}", self.base_url, procedure)
    }

    fn authorize(&self, request: RequestBuilder) -> RequestBuilder {
        let bearer = self.access_token.as_deref().unwrap_or(&self.anon_key);
        request
            .header("apikey", &self.anon_key)
            .bearer_auth(bearer)
    }

    async fn call<P: Serialize + Sync>(&self, procedure: &str, params: &P) -> Result<()> {
        let response = self
            .authorize(self.client.post(self.rpc_url(procedure)))
            .json(params)
            .send()
            .await?;
        check_status(response).await?;
        Ok(())
    }
}

/// Turns a non-2xx response into [`StoreError::Api`], preferring the body's `message` field.
pub(crate) async fn check_status(response: Response) -> Result<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<Value>(&body)
        .ok()
        .and_then(|v| {
            ["message", "msg", "error_description", "error"]
                .iter()
                .find_map(|k| v.get(*k).and_then(Value::as_str).map(str::to_string))
        })
        .unwrap_or(body);

    Err(StoreError::Api {
        status: status.as_u16(),
        message,
    })
}

#[async_trait]
impl PrayerStore for RestStore {
    async fn fetch_records(&self, user_id: &str) -> Result<Vec<PrayerRecord>> {
        let filter = format!("eq.{}", user_id);
        let response = self
            .authorize(self.client.get(self.table_url(PRAYER_STATS_TABLE)))
            .query(&[("select", "*"), ("user_id", filter.as_str()), ("order", "prayer_name")])
            .send()
            .await?;
        let body = check_status(response).await?.text().await?;
        let records: Vec<PrayerRecord> = serde_json::from_str(&body)?;
        debug!("Fetched {} prayer records for {}", records.len(), user_id);
        Ok(records)
    }

    async fn increment(&self, user_id: &str, prayer: PrayerType, delta: i64) -> Result<()> {
        let params = IncrementParams {
            user_id_param: user_id,
            prayer_name_param: prayer.as_str(),
            delta,
        };
        self.call(INCREMENT_PROCEDURE, &params).await
    }
}

#[async_trait]
impl ProfileStore for RestStore {
    async fn create_profile(&self, user_id: &str, profile: &NewProfile) -> Result<()> {
        let params = SignupParams {
            user_id,
            user_email: &profile.email,
            user_first_name: &profile.first_name,
            user_last_name: &profile.last_name,
            user_birth_year: profile.birth_year,
            user_gender: profile.gender.as_str(),
        };
        self.call(SIGNUP_PROCEDURE, &params).await
    }

    async fn profile(&self, user_id: &str) -> Result<UserProfile> {
        let filter = format!("eq.{}", user_id);
        let response = self
            .authorize(self.client.get(self.table_url(USERS_TABLE)))
            .query(&[("select", "*"), ("id", filter.as_str())])
            .send()
            .await?;
        let body = check_status(response).await?.text().await?;
        let users: Vec<UserProfile> = serde_json::from_str(&body)?;
        users.into_iter().next().ok_or_else(|| StoreError::NotFound {
            resource: "user",
            identifier: user_id.to_string(),
        })
    }
}
