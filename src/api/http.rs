use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde_json::Value;

use crate::api::QuizApi;
use crate::config::Config;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{Identity, Question, Technology};
use crate::models::dto::request::{
    FinishSessionRequest, LoginRequest, RegisterRequest, StartSessionRequest,
};
use crate::models::dto::response::{
    ProfileResponse, RemoteSession, SessionResults, TokenResponse, UserDashboard,
    ValidateTokenResponse,
};

/// REST client for the quiz backend. One `reqwest::Client` with the configured
/// timeout; every call suspends without blocking the caller's thread.
pub struct HttpQuizApi {
    client: reqwest::Client,
    base_url: String,
}

impl HttpQuizApi {
    pub fn new(config: &Config) -> AppResult<Self> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.request_timeout_secs))
            .build()?;

        Ok(HttpQuizApi {
            client,
            base_url: config.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    fn bearer(credential: &SecretString) -> String {
        format!("Bearer {}", credential.expose_secret())
    }

    /// Extract the server-provided `detail` from an error body, falling back
    /// to a caller-supplied message when the body is unreadable.
    async fn error_detail(response: reqwest::Response, fallback: &str) -> String {
        let status = response.status();
        let detail = response
            .json::<Value>()
            .await
            .ok()
            .and_then(|body| {
                body.get("detail")
                    .and_then(|d| d.as_str())
                    .map(str::to_string)
            })
            .unwrap_or_else(|| fallback.to_string());

        log::debug!("request rejected with status {}: {}", status, detail);
        detail
    }
}

#[async_trait]
impl QuizApi for HttpQuizApi {
    async fn fetch_technologies(&self) -> AppResult<Vec<Technology>> {
        let response = self.client.get(self.url("/technologies")).send().await?;

        if !response.status().is_success() {
            return Err(AppError::Backend(format!(
                "technology catalog returned status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn fetch_questions(&self, technology: &str) -> AppResult<Vec<Question>> {
        let response = self
            .client
            .get(self.url("/questions/"))
            .query(&[("technology", technology)])
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Backend(format!(
                "question bank returned status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn login(&self, request: &LoginRequest) -> AppResult<TokenResponse> {
        let response = self
            .client
            .post(self.url("/auth/login"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = Self::error_detail(response, "invalid credentials").await;
            return Err(AppError::AuthRejected(detail));
        }

        Ok(response.json().await?)
    }

    async fn register(&self, request: &RegisterRequest) -> AppResult<()> {
        let response = self
            .client
            .post(self.url("/auth/register"))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = Self::error_detail(response, "registration failed").await;
            return Err(AppError::AuthRejected(detail));
        }

        Ok(())
    }

    async fn fetch_profile(&self, credential: &SecretString) -> AppResult<Identity> {
        let response = self
            .client
            .get(self.url("/auth/me"))
            .header("Authorization", Self::bearer(credential))
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = Self::error_detail(response, "profile read rejected").await;
            return Err(AppError::AuthRejected(detail));
        }

        let profile: ProfileResponse = response.json().await?;
        Ok(profile.into())
    }

    async fn validate_token(&self, credential: &SecretString) -> AppResult<Identity> {
        let response = self
            .client
            .get(self.url("/auth/validate-token"))
            .header("Authorization", Self::bearer(credential))
            .send()
            .await?;

        if !response.status().is_success() {
            let detail = Self::error_detail(response, "token rejected").await;
            return Err(AppError::AuthRejected(detail));
        }

        let body: ValidateTokenResponse = response.json().await?;
        Ok(body.user.into())
    }

    async fn start_session(
        &self,
        technology_id: i64,
        credential: &SecretString,
    ) -> AppResult<RemoteSession> {
        let response = self
            .client
            .post(self.url("/quiz/start"))
            .header("Authorization", Self::bearer(credential))
            .json(&StartSessionRequest { technology_id })
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Backend(format!(
                "session open returned status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn finish_session(
        &self,
        session_id: i64,
        request: &FinishSessionRequest,
        credential: &SecretString,
    ) -> AppResult<SessionResults> {
        let response = self
            .client
            .post(self.url(&format!("/quiz/{}/finish", session_id)))
            .header("Authorization", Self::bearer(credential))
            .json(request)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Backend(format!(
                "session finish returned status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }

    async fn fetch_dashboard(&self, credential: &SecretString) -> AppResult<UserDashboard> {
        let response = self
            .client
            .get(self.url("/dashboard/me"))
            .header("Authorization", Self::bearer(credential))
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(AppError::Backend(format!(
                "dashboard returned status {}",
                response.status()
            )));
        }

        Ok(response.json().await?)
    }
}
