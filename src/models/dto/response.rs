use chrono::{DateTime, Utc};
use serde::Deserialize;

use crate::models::domain::{FinalResults, Identity, ResultsSource};

/// `POST /auth/login` body. The token is optional on purpose: a success status
/// without an issued token is a backend contract violation the controller must
/// detect rather than a deserialization failure.
#[derive(Debug, Clone, Deserialize)]
pub struct TokenResponse {
    #[serde(default)]
    pub access_token: Option<String>,
    #[serde(default)]
    pub token_type: Option<String>,
}

impl TokenResponse {
    pub fn token(&self) -> Option<&str> {
        self.access_token.as_deref().filter(|t| !t.trim().is_empty())
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProfileResponse {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: Option<String>,
}

impl From<ProfileResponse> for Identity {
    fn from(profile: ProfileResponse) -> Self {
        Identity::new(
            &profile.username,
            &profile.email,
            profile.full_name.as_deref().unwrap_or_default(),
        )
    }
}

/// `GET /auth/validate-token` envelope: `{valid, user}`. The user object has
/// no full_name field on this endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct ValidateTokenResponse {
    #[serde(default)]
    pub valid: bool,
    pub user: ProfileResponse,
}

#[derive(Debug, Clone, Deserialize)]
pub struct RemoteSession {
    pub id: i64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SessionResults {
    pub correct_answers: u32,
    pub total_questions: u32,
    pub score_percentage: f64,
    pub time_spent_seconds: u64,
}

impl From<SessionResults> for FinalResults {
    fn from(results: SessionResults) -> Self {
        FinalResults {
            correct_answers: results.correct_answers,
            total_questions: results.total_questions,
            score_percentage: results.score_percentage,
            time_spent_seconds: results.time_spent_seconds,
            source: ResultsSource::Server,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct QuizSessionSummary {
    pub id: i64,
    pub technology_name: String,
    pub score_percentage: f64,
    pub total_questions: u32,
    pub correct_answers: u32,
    pub started_at: DateTime<Utc>,
    #[serde(default)]
    pub completed_at: Option<DateTime<Utc>>,
    pub time_spent_seconds: u64,
}

#[derive(Debug, Clone, Deserialize)]
pub struct UserStatistics {
    pub total_quizzes: u32,
    pub average_score: f64,
    pub best_score: f64,
    pub total_time_spent: u64,
    #[serde(default)]
    pub recent_activity: Vec<QuizSessionSummary>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ProgressData {
    #[serde(default)]
    pub dates: Vec<String>,
    #[serde(default)]
    pub scores: Vec<f64>,
    #[serde(default)]
    pub quiz_counts: Vec<u32>,
}

/// `GET /dashboard/me` aggregate. Rendered only; no business rules read it.
#[derive(Debug, Clone, Deserialize)]
pub struct UserDashboard {
    pub user: ProfileResponse,
    pub statistics: UserStatistics,
    #[serde(default)]
    pub progress_data: Option<ProgressData>,
    #[serde(default)]
    pub quiz_history: Vec<QuizSessionSummary>,
}
