//! Client for the tracking backend's REST API.

use crate::errors::ApiError;
use crate::models::{
    ActivityRecord, Client, ClientInput, Credentials, ManualEntry, ManualEntryReceipt,
    Registration, Screenshot, TokenResponse, TrackingStatus, User, UserList, WeeklyReport,
};
use crate::session::Session;
use chrono::NaiveDate;
use reqwest::{Method, RequestBuilder, Response, StatusCode};
use serde::Serialize;
use serde::de::DeserializeOwned;
use std::time::Duration;
use tracing::{debug, warn};

#[derive(Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base_url: String,
    session: Session,
}

#[derive(Serialize)]
struct RegistrationPayload<'a> {
    #[serde(flatten)]
    registration: &'a Registration,
    role: &'static str,
}

impl ApiClient {
    pub fn new(base_url: &str, timeout: Duration, session: Session) -> Result<Self, ApiError> {
        let http = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self {
            http,
            base_url: base_url.trim_end_matches('/').to_string(),
            session,
        })
    }

    pub async fn login(&self, credentials: &Credentials) -> Result<TokenResponse, ApiError> {
        let request = self.request(Method::POST, "/api/login").json(credentials);
        decode(self.send(request).await?).await
    }

    pub async fn register(&self, registration: &Registration) -> Result<(), ApiError> {
        let payload = RegistrationPayload {
            registration,
            role: "employee",
        };
        let request = self.request(Method::POST, "/api/register").json(&payload);
        self.send(request).await?;
        Ok(())
    }

    /// Tells the backend the token is being dropped. Tokens are stateless
    /// there, so a failure only gets logged.
    pub async fn logout(&self) {
        match self.authed(Method::POST, "/api/logout").await {
            Ok(request) => {
                if let Err(err) = self.send_authed(request).await {
                    debug!("remote logout failed: {err}");
                }
            }
            Err(ApiError::Unauthorized) => {}
            Err(err) => debug!("remote logout skipped: {err}"),
        }
    }

    pub async fn activities(&self, date: NaiveDate) -> Result<Vec<ActivityRecord>, ApiError> {
        let request = self
            .authed(Method::GET, "/api/activities")
            .await?
            .query(&[("date", date_param(date))]);
        decode_list(self.send_authed(request).await?).await
    }

    pub async fn tracking_status(&self) -> Result<TrackingStatus, ApiError> {
        let request = self.authed(Method::GET, "/api/tracking-status").await?;
        decode(self.send_authed(request).await?).await
    }

    pub async fn set_tracking(&self, enabled: bool) -> Result<(), ApiError> {
        let path = if enabled {
            "/api/start-tracking"
        } else {
            "/api/stop-tracking"
        };
        let request = self.authed(Method::POST, path).await?;
        self.send_authed(request).await?;
        Ok(())
    }

    pub async fn submit_manual_entry(
        &self,
        entry: &ManualEntry,
    ) -> Result<ManualEntryReceipt, ApiError> {
        let request = self
            .authed(Method::POST, "/api/manual-entry")
            .await?
            .json(entry);
        decode(self.send_authed(request).await?).await
    }

    pub async fn users(&self) -> Result<Vec<User>, ApiError> {
        let request = self.authed(Method::GET, "/api/admin/users").await?;
        let users: UserList = decode(self.send_authed(request).await?).await?;
        Ok(users.into_vec())
    }

    pub async fn user_activities(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<ActivityRecord>, ApiError> {
        let path = format!("/api/admin/users/{user_id}/activities-by-date");
        let request = self
            .authed(Method::GET, &path)
            .await?
            .query(&[("date", date_param(date))]);
        decode_list(self.send_authed(request).await?).await
    }

    pub async fn user_screenshots(
        &self,
        user_id: i64,
        date: NaiveDate,
    ) -> Result<Vec<Screenshot>, ApiError> {
        let path = format!("/api/admin/users/{user_id}/screenshots-by-date");
        let request = self
            .authed(Method::GET, &path)
            .await?
            .query(&[("date", date_param(date))]);
        decode_list(self.send_authed(request).await?).await
    }

    pub async fn weekly_report(&self, user_id: i64) -> Result<WeeklyReport, ApiError> {
        let path = format!("/api/admin/users/{user_id}/weekly-report");
        let request = self.authed(Method::GET, &path).await?;
        decode(self.send_authed(request).await?).await
    }

    pub async fn clients(&self) -> Result<Vec<Client>, ApiError> {
        let request = self.authed(Method::GET, "/api/clients").await?;
        decode_list(self.send_authed(request).await?).await
    }

    pub async fn create_client(&self, input: &ClientInput) -> Result<Client, ApiError> {
        // The backend reads these fields from the query string, older
        // deployments from the body.
        let request = self
            .authed(Method::POST, "/api/clients")
            .await?
            .query(input)
            .json(input);
        decode(self.send_authed(request).await?).await
    }

    pub async fn update_client(&self, id: i64, input: &ClientInput) -> Result<(), ApiError> {
        let path = format!("/api/clients/{id}");
        let request = self.authed(Method::PUT, &path).await?.json(input);
        self.send_authed(request).await?;
        Ok(())
    }

    pub async fn delete_client(&self, id: i64) -> Result<(), ApiError> {
        let path = format!("/api/clients/{id}");
        let request = self.authed(Method::DELETE, &path).await?;
        self.send_authed(request).await?;
        Ok(())
    }

    fn request(&self, method: Method, path: &str) -> RequestBuilder {
        self.http.request(method, format!("{}{}", self.base_url, path))
    }

    /// A request carrying the session's bearer token. Fails without
    /// touching the network when nobody is signed in.
    async fn authed(&self, method: Method, path: &str) -> Result<RequestBuilder, ApiError> {
        let token = self
            .session
            .current_token()
            .await
            .ok_or(ApiError::Unauthorized)?;
        Ok(self.request(method, path).bearer_auth(token))
    }

    /// Sends a request carrying the session token. A 401 means the token is
    /// no longer valid, so the session is torn down.
    async fn send_authed(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let result = self.send(request).await;
        if matches!(result, Err(ApiError::Unauthorized)) {
            warn!("backend rejected the session token, signing out");
            if let Err(err) = self.session.logout().await {
                warn!("failed to clear session: {}", err.message);
            }
        }
        result
    }

    async fn send(&self, request: RequestBuilder) -> Result<Response, ApiError> {
        let response = request.send().await?;
        let status = response.status();
        debug!(url = %response.url(), %status, "backend response");

        if status == StatusCode::UNAUTHORIZED {
            return Err(ApiError::Unauthorized);
        }
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(ApiError::Rejected {
                status: status.as_u16(),
                detail: error_detail(&body, status),
            });
        }
        Ok(response)
    }
}

async fn decode<T: DeserializeOwned>(response: Response) -> Result<T, ApiError> {
    let bytes = response.bytes().await?;
    serde_json::from_slice(&bytes).map_err(|err| ApiError::Decode(err.to_string()))
}

/// Lists come back as `null` on some empty results.
async fn decode_list<T: DeserializeOwned>(response: Response) -> Result<Vec<T>, ApiError> {
    let list: Option<Vec<T>> = decode(response).await?;
    Ok(list.unwrap_or_default())
}

fn date_param(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// The backend reports failures as `{"detail": "..."}`; validation errors
/// carry a list of `{msg}` objects instead.
fn error_detail(body: &str, status: StatusCode) -> String {
    let fallback = || {
        status
            .canonical_reason()
            .unwrap_or("request failed")
            .to_string()
    };
    let Ok(value) = serde_json::from_str::<serde_json::Value>(body) else {
        return if body.trim().is_empty() {
            fallback()
        } else {
            body.trim().to_string()
        };
    };

    match value.get("detail") {
        Some(serde_json::Value::String(detail)) => detail.clone(),
        Some(serde_json::Value::Array(items)) => {
            let messages: Vec<&str> = items
                .iter()
                .filter_map(|item| item.get("msg").and_then(serde_json::Value::as_str))
                .collect();
            if messages.is_empty() {
                fallback()
            } else {
                messages.join("; ")
            }
        }
        _ => fallback(),
    }
}
