use async_trait::async_trait;
use secrecy::SecretString;

#[cfg(test)]
use mockall::automock;

use crate::errors::AppResult;
use crate::models::domain::{Identity, Question, Technology};
use crate::models::dto::request::{FinishSessionRequest, LoginRequest, RegisterRequest};
use crate::models::dto::response::{RemoteSession, SessionResults, TokenResponse, UserDashboard};

pub mod http;
pub use http::HttpQuizApi;

/// The REST backend, one method per consumed endpoint. Controllers and the
/// engine depend on this trait, never on the transport.
#[cfg_attr(test, automock)]
#[async_trait]
pub trait QuizApi: Send + Sync {
    async fn fetch_technologies(&self) -> AppResult<Vec<Technology>>;

    async fn fetch_questions(&self, technology: &str) -> AppResult<Vec<Question>>;

    async fn login(&self, request: &LoginRequest) -> AppResult<TokenResponse>;

    async fn register(&self, request: &RegisterRequest) -> AppResult<()>;

    async fn fetch_profile(&self, credential: &SecretString) -> AppResult<Identity>;

    async fn validate_token(&self, credential: &SecretString) -> AppResult<Identity>;

    async fn start_session(
        &self,
        technology_id: i64,
        credential: &SecretString,
    ) -> AppResult<RemoteSession>;

    async fn finish_session(
        &self,
        session_id: i64,
        request: &FinishSessionRequest,
        credential: &SecretString,
    ) -> AppResult<SessionResults>;

    async fn fetch_dashboard(&self, credential: &SecretString) -> AppResult<UserDashboard>;
}
