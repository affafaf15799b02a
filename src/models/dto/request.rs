use serde::Serialize;
use validator::Validate;

#[derive(Debug, Clone, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}

impl LoginRequest {
    pub fn new(username: &str, password: &str) -> Self {
        LoginRequest {
            username: username.to_string(),
            password: password.to_string(),
        }
    }
}

/// Registration payload. Field presence and password length are checked by the
/// controller in declaration order (first failing rule wins); the derive covers
/// email format on top of that. The server re-validates everything.
#[derive(Debug, Clone, Serialize, Validate)]
pub struct RegisterRequest {
    pub username: String,

    pub password: String,

    #[validate(email(message = "Invalid email format"))]
    pub email: String,

    pub full_name: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct StartSessionRequest {
    pub technology_id: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct FinishSessionRequest {
    pub time_spent_seconds: u64,
}
