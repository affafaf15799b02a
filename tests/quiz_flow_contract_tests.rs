use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};

use techquiz_client::{
    api::QuizApi,
    errors::{AppError, AppResult},
    models::domain::{Identity, Question, ResultsSource, Technology},
    models::dto::request::{FinishSessionRequest, LoginRequest, RegisterRequest},
    models::dto::response::{
        RemoteSession, SessionResults, TokenResponse, UserDashboard,
    },
    services::{AuthController, EnginePhase, QuizEngine, SubmitOutcome},
    store::TokenStore,
};

struct InMemoryTokenStore {
    slot: Mutex<Option<String>>,
}

impl InMemoryTokenStore {
    fn new(initial: Option<&str>) -> Self {
        Self {
            slot: Mutex::new(initial.map(str::to_string)),
        }
    }

    fn stored(&self) -> Option<String> {
        self.slot.lock().expect("store lock should not be poisoned").clone()
    }
}

impl TokenStore for InMemoryTokenStore {
    fn save(&self, credential: &SecretString) {
        *self.slot.lock().expect("store lock should not be poisoned") =
            Some(credential.expose_secret().to_string());
    }

    fn load(&self) -> Option<SecretString> {
        self.stored().map(SecretString::from)
    }

    fn clear(&self) {
        *self.slot.lock().expect("store lock should not be poisoned") = None;
    }
}

/// Scriptable stand-in for the REST backend. Failure toggles model the
/// degradation paths; call counters let tests assert which endpoints ran.
struct FakeBackend {
    questions: Vec<Question>,
    technologies: Vec<Technology>,
    issue_token: Option<String>,
    reject_login: Option<String>,
    fail_profile: bool,
    fail_validate: bool,
    fail_start_session: bool,
    fail_finish_session: bool,
    server_results: Option<SessionResults>,
    start_calls: AtomicU32,
    finish_calls: AtomicU32,
}

impl FakeBackend {
    fn new() -> Self {
        Self {
            questions: make_questions("docker", 3),
            technologies: vec![make_technology(42, "docker")],
            issue_token: Some("issued-tok".to_string()),
            reject_login: None,
            fail_profile: false,
            fail_validate: false,
            fail_start_session: false,
            fail_finish_session: false,
            server_results: None,
            start_calls: AtomicU32::new(0),
            finish_calls: AtomicU32::new(0),
        }
    }
}

#[async_trait]
impl QuizApi for FakeBackend {
    async fn fetch_technologies(&self) -> AppResult<Vec<Technology>> {
        Ok(self.technologies.clone())
    }

    async fn fetch_questions(&self, technology: &str) -> AppResult<Vec<Question>> {
        Ok(self
            .questions
            .iter()
            .filter(|q| q.technology == technology)
            .cloned()
            .collect())
    }

    async fn login(&self, _request: &LoginRequest) -> AppResult<TokenResponse> {
        if let Some(detail) = &self.reject_login {
            return Err(AppError::AuthRejected(detail.clone()));
        }
        Ok(TokenResponse {
            access_token: self.issue_token.clone(),
            token_type: Some("bearer".to_string()),
        })
    }

    async fn register(&self, _request: &RegisterRequest) -> AppResult<()> {
        Ok(())
    }

    async fn fetch_profile(&self, _credential: &SecretString) -> AppResult<Identity> {
        if self.fail_profile {
            return Err(AppError::Network("profile read blocked".into()));
        }
        Ok(Identity::new("johndoe", "john@example.com", "John Doe"))
    }

    async fn validate_token(&self, _credential: &SecretString) -> AppResult<Identity> {
        if self.fail_validate {
            return Err(AppError::AuthRejected("token rejected".into()));
        }
        Ok(Identity::new("johndoe", "john@example.com", ""))
    }

    async fn start_session(
        &self,
        technology_id: i64,
        _credential: &SecretString,
    ) -> AppResult<RemoteSession> {
        self.start_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_start_session {
            return Err(AppError::Network("connection refused".into()));
        }
        assert_eq!(technology_id, 42, "session must use the catalog id");
        Ok(RemoteSession { id: 700 })
    }

    async fn finish_session(
        &self,
        session_id: i64,
        request: &FinishSessionRequest,
        _credential: &SecretString,
    ) -> AppResult<SessionResults> {
        self.finish_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail_finish_session {
            return Err(AppError::Backend("session finish returned status 500".into()));
        }
        assert_eq!(session_id, 700);
        self.server_results.clone().ok_or_else(|| {
            AppError::Backend(format!(
                "no scripted results (elapsed {}s)",
                request.time_spent_seconds
            ))
        })
    }

    async fn fetch_dashboard(&self, _credential: &SecretString) -> AppResult<UserDashboard> {
        let json = serde_json::json!({
            "user": {"username": "johndoe", "email": "john@example.com"},
            "statistics": {
                "total_quizzes": 1,
                "average_score": 66.7,
                "best_score": 66.7,
                "total_time_spent": 30,
                "recent_activity": []
            },
            "quiz_history": []
        });
        let dashboard: UserDashboard =
            serde_json::from_value(json).expect("scripted dashboard should deserialize");
        Ok(dashboard)
    }
}

fn make_questions(technology: &str, count: i64) -> Vec<Question> {
    (1..=count)
        .map(|i| Question {
            id: i,
            technology: technology.to_string(),
            category: "general".to_string(),
            difficulty: 2,
            question_text: format!("Question {}", i),
            options: vec![
                "right".to_string(),
                "wrong one".to_string(),
                "wrong two".to_string(),
            ],
            correct_answer: "right".to_string(),
            explanation: None,
            tags: None,
        })
        .collect()
}

fn make_technology(id: i64, name: &str) -> Technology {
    Technology {
        id,
        name: name.to_string(),
        display_name: None,
        icon: None,
        color: None,
    }
}

fn build(
    backend: FakeBackend,
    stored_token: Option<&str>,
) -> (Arc<FakeBackend>, Arc<InMemoryTokenStore>, Arc<AuthController>, QuizEngine) {
    let api = Arc::new(backend);
    let store = Arc::new(InMemoryTokenStore::new(stored_token));
    let auth = Arc::new(AuthController::new(
        Arc::clone(&api) as Arc<dyn QuizApi>,
        Arc::clone(&store) as Arc<dyn TokenStore>,
    ));
    let engine = QuizEngine::new(Arc::clone(&api) as Arc<dyn QuizApi>, Arc::clone(&auth));
    (api, store, auth, engine)
}

#[tokio::test]
async fn anonymous_docker_attempt_scores_two_of_three_locally() {
    let (api, _store, _auth, mut engine) = build(FakeBackend::new(), None);

    engine
        .select_technology("docker")
        .await
        .expect("selection should succeed");

    engine.submit_answer("right").await.expect("answer 1");
    engine.submit_answer("wrong one").await.expect("answer 2");
    let outcome = engine.submit_answer("right").await.expect("answer 3");

    assert_eq!(outcome, SubmitOutcome::Completed);
    let results = engine.final_results().expect("results should be set");
    assert_eq!(results.correct_answers, 2);
    assert_eq!(results.total_questions, 3);
    assert_eq!(results.score_percentage, 66.7);
    assert_eq!(results.source, ResultsSource::Local);

    // An anonymous attempt never touches the session endpoints.
    assert_eq!(api.start_calls.load(Ordering::SeqCst), 0);
    assert_eq!(api.finish_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn authenticated_attempt_adopts_server_results() {
    let mut backend = FakeBackend::new();
    backend.server_results = Some(SessionResults {
        correct_answers: 3,
        total_questions: 3,
        score_percentage: 100.0,
        time_spent_seconds: 48,
    });
    let (api, _store, auth, mut engine) = build(backend, None);

    auth.login("johndoe", "secret123")
        .await
        .expect("login should succeed");
    engine
        .select_technology("docker")
        .await
        .expect("selection should succeed");

    assert_eq!(
        engine.attempt().expect("attempt").remote_session,
        Some(700)
    );

    for _ in 0..3 {
        engine.submit_answer("right").await.expect("answer");
    }

    let results = engine.final_results().expect("results should be set");
    assert_eq!(results.source, ResultsSource::Server);
    assert_eq!(results.time_spent_seconds, 48);
    assert_eq!(api.finish_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn failed_session_open_still_completes_with_local_scoring() {
    let mut backend = FakeBackend::new();
    backend.fail_start_session = true;
    let (api, _store, auth, mut engine) = build(backend, None);

    auth.login("johndoe", "secret123")
        .await
        .expect("login should succeed");
    engine
        .select_technology("docker")
        .await
        .expect("selection should succeed despite open failure");

    assert!(engine.attempt().expect("attempt").remote_session.is_none());

    engine.submit_answer("right").await.expect("answer");
    engine.submit_answer("wrong one").await.expect("answer");
    engine.submit_answer("right").await.expect("answer");

    assert_eq!(engine.phase(), EnginePhase::Completed);
    let results = engine.final_results().expect("results should be set");
    assert_eq!(results.source, ResultsSource::Local);
    assert_eq!(results.score_percentage, 66.7);

    // The finish endpoint is never called without a remote handle.
    assert_eq!(api.start_calls.load(Ordering::SeqCst), 1);
    assert_eq!(api.finish_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn failed_finish_call_falls_back_to_local_results() {
    let mut backend = FakeBackend::new();
    backend.fail_finish_session = true;
    let (api, _store, auth, mut engine) = build(backend, None);

    auth.login("johndoe", "secret123")
        .await
        .expect("login should succeed");
    engine.select_technology("docker").await.expect("selection");

    for _ in 0..3 {
        engine.submit_answer("right").await.expect("answer");
    }

    let results = engine.final_results().expect("results should be set");
    assert_eq!(results.source, ResultsSource::Local);
    assert_eq!(results.score_percentage, 100.0);
    assert_eq!(api.finish_calls.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn bootstrap_with_stale_credential_clears_the_store() {
    let mut backend = FakeBackend::new();
    backend.fail_validate = true;
    let (_api, store, auth, _engine) = build(backend, Some("stale-tok"));

    auth.bootstrap().await;

    assert!(!auth.is_authenticated().await);
    assert!(!auth.is_loading().await);
    assert!(auth.credential().await.is_none());
    assert_eq!(
        store.stored(),
        None
    );
}

#[tokio::test]
async fn bootstrap_with_valid_credential_restores_the_session() {
    let (_api, _store, auth, _engine) = build(FakeBackend::new(), Some("stored-tok"));

    auth.bootstrap().await;

    assert!(auth.is_authenticated().await);
    let identity = auth.identity().await.expect("identity should be set");
    assert_eq!(identity.username, "johndoe");
    assert!(!identity.is_degraded());
}

#[tokio::test]
async fn login_without_issued_token_keeps_previous_credential() {
    let mut backend = FakeBackend::new();
    backend.issue_token = None;
    let (_api, store, auth, _engine) = build(backend, Some("previous-tok"));

    let result = auth.login("johndoe", "secret123").await;

    assert!(matches!(result, Err(AppError::MissingToken)));
    assert_eq!(
        store.stored(),
        Some("previous-tok".to_string())
    );
}

#[tokio::test]
async fn login_with_blocked_profile_read_degrades_but_succeeds() {
    let mut backend = FakeBackend::new();
    backend.fail_profile = true;
    let (_api, store, auth, _engine) = build(backend, None);

    let identity = auth
        .login("johndoe", "secret123")
        .await
        .expect("login should still succeed");

    assert!(identity.is_degraded());
    assert_eq!(identity.username, "johndoe");
    assert!(auth.is_authenticated().await);
    assert_eq!(
        store.stored(),
        Some("issued-tok".to_string())
    );
}

#[tokio::test]
async fn restart_after_completion_leaves_no_remote_leftovers() {
    let mut backend = FakeBackend::new();
    backend.questions = make_questions("docker", 1);
    backend.server_results = Some(SessionResults {
        correct_answers: 1,
        total_questions: 1,
        score_percentage: 100.0,
        time_spent_seconds: 5,
    });
    let (api, _store, auth, mut engine) = build(backend, None);

    auth.login("johndoe", "secret123")
        .await
        .expect("login should succeed");
    engine.select_technology("docker").await.expect("selection");
    engine.submit_answer("right").await.expect("answer");
    assert_eq!(engine.phase(), EnginePhase::Completed);

    engine.restart().await.expect("restart should succeed");

    let attempt = engine.attempt().expect("fresh attempt");
    assert_eq!(attempt.current_index, 0);
    assert!(attempt.answers.is_empty());
    assert!(attempt.final_results.is_none());
    // A new session handle is opened for the new attempt, not reused.
    assert_eq!(attempt.remote_session, Some(700));
    assert_eq!(api.start_calls.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn registration_success_means_logged_in() {
    let (_api, _store, auth, _engine) = build(FakeBackend::new(), None);

    let data = RegisterRequest {
        username: "johndoe".to_string(),
        password: "secret123".to_string(),
        email: "john@example.com".to_string(),
        full_name: "John Doe".to_string(),
    };
    let identity = auth
        .register(&data)
        .await
        .expect("registration should succeed");

    assert_eq!(identity.username, "johndoe");
    assert!(auth.is_authenticated().await);
}

#[tokio::test]
async fn logout_after_login_forgets_everything() {
    let (_api, store, auth, _engine) = build(FakeBackend::new(), None);

    auth.login("johndoe", "secret123")
        .await
        .expect("login should succeed");
    assert!(auth.is_authenticated().await);

    auth.logout().await;

    assert!(!auth.is_authenticated().await);
    assert!(auth.credential().await.is_none());
    assert_eq!(
        store.stored(),
        None
    );
}
