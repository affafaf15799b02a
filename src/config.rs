use std::env;
use std::path::PathBuf;

#[derive(Clone, Debug)]
pub struct Config {
    pub api_base_url: String,
    pub request_timeout_secs: u64,
    pub token_dir: PathBuf,
}

impl Config {
    pub fn from_env() -> Self {
        Self {
            api_base_url: env::var("QUIZ_API_URL")
                .unwrap_or_else(|_| "http://localhost:8000".to_string()),
            request_timeout_secs: env::var("QUIZ_REQUEST_TIMEOUT_SECS")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(15),
            token_dir: env::var("QUIZ_TOKEN_DIR")
                .map(PathBuf::from)
                .unwrap_or_else(|_| default_token_dir()),
        }
    }

    #[cfg(test)]
    pub fn test_config() -> Self {
        Self {
            api_base_url: "http://localhost:8000".to_string(),
            request_timeout_secs: 15,
            token_dir: env::temp_dir().join("techquiz-test"),
        }
    }
}

fn default_token_dir() -> PathBuf {
    env::var("HOME")
        .map(|home| PathBuf::from(home).join(".techquiz"))
        .unwrap_or_else(|_| PathBuf::from(".techquiz"))
}
