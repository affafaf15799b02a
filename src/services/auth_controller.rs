use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use secrecy::SecretString;
use tokio::sync::Mutex;
use validator::Validate;

use crate::api::QuizApi;
use crate::errors::{AppError, AppResult};
use crate::models::domain::Identity;
use crate::models::dto::request::{LoginRequest, RegisterRequest};
use crate::services::session_validator::SessionValidator;
use crate::store::TokenStore;

const MIN_PASSWORD_CHARS: usize = 6;

#[derive(Debug, Default)]
struct AuthState {
    identity: Option<Identity>,
    credential: Option<SecretString>,
    is_loading: bool,
}

/// Orchestrates login, registration, logout and startup credential
/// validation. State changes are guarded by a request generation counter:
/// every credential-changing operation bumps it, and an async result is only
/// committed if no newer operation has run in the meantime. Stale results are
/// discarded, not applied last-writer-wins.
pub struct AuthController {
    api: Arc<dyn QuizApi>,
    store: Arc<dyn TokenStore>,
    validator: SessionValidator,
    state: Mutex<AuthState>,
    generation: AtomicU64,
}

impl AuthController {
    pub fn new(api: Arc<dyn QuizApi>, store: Arc<dyn TokenStore>) -> Self {
        AuthController {
            validator: SessionValidator::new(Arc::clone(&api)),
            api,
            store,
            state: Mutex::new(AuthState {
                identity: None,
                credential: None,
                is_loading: true,
            }),
            generation: AtomicU64::new(0),
        }
    }

    /// Exchange a stored credential for a confirmed identity, or discard it.
    /// An unconfirmable credential is never trusted: any validation failure
    /// other than cancellation clears the store and leaves the controller
    /// unauthenticated.
    pub async fn bootstrap(&self) {
        let generation = self.next_generation();

        let Some(credential) = self.store.load() else {
            let mut state = self.state.lock().await;
            if self.is_current(generation) {
                state.credential = None;
                state.is_loading = false;
            }
            return;
        };

        {
            let mut state = self.state.lock().await;
            if !self.is_current(generation) {
                return;
            }
            state.credential = Some(credential.clone());
        }

        match self.validator.validate(&credential).await {
            Ok(identity) => {
                let mut state = self.state.lock().await;
                if !self.is_current(generation) {
                    return;
                }
                log::info!("stored credential confirmed for {}", identity.username);
                state.identity = Some(identity);
                state.is_loading = false;
            }
            Err(err) if err.is_cancelled() => {
                // Superseded or torn down: the newer operation owns the state.
            }
            Err(err) => {
                log::warn!("stored credential failed validation, discarding: {}", err);
                let mut state = self.state.lock().await;
                if !self.is_current(generation) {
                    return;
                }
                self.store.clear();
                state.credential = None;
                state.identity = None;
                state.is_loading = false;
            }
        }
    }

    /// Authenticate and adopt the issued credential. Login success is defined
    /// by credential issuance: a failed follow-up profile read degrades the
    /// identity to a placeholder instead of failing the login.
    pub async fn login(&self, username: &str, password: &str) -> AppResult<Identity> {
        if username.trim().is_empty() {
            return Err(AppError::ValidationError("username is required".into()));
        }
        if password.trim().is_empty() {
            return Err(AppError::ValidationError("password is required".into()));
        }

        log::info!("attempting login for {}", username);
        let request = LoginRequest::new(username, password);
        let response = self.api.login(&request).await?;

        // A success status without an issued token is a backend contract
        // violation; previously stored credentials stay untouched.
        let Some(token) = response.token() else {
            return Err(AppError::MissingToken);
        };
        let credential = SecretString::from(token.to_string());

        let generation = self.next_generation();
        self.store.save(&credential);
        {
            let mut state = self.state.lock().await;
            if !self.is_current(generation) {
                return Err(AppError::Cancelled);
            }
            state.credential = Some(credential.clone());
        }

        match self.validator.fetch_profile(&credential).await {
            Ok(identity) => {
                let mut state = self.state.lock().await;
                if !self.is_current(generation) {
                    return Err(AppError::Cancelled);
                }
                log::info!("logged in as {}", identity.username);
                state.identity = Some(identity.clone());
                state.is_loading = false;
                Ok(identity)
            }
            Err(err) if err.is_cancelled() => Err(AppError::Cancelled),
            Err(err) => {
                log::warn!(
                    "profile read failed after credential issuance for {}, using degraded identity: {}",
                    username,
                    err
                );
                let identity = Identity::degraded(username);
                let mut state = self.state.lock().await;
                if !self.is_current(generation) {
                    return Err(AppError::Cancelled);
                }
                state.identity = Some(identity.clone());
                state.is_loading = false;
                Ok(identity)
            }
        }
    }

    /// Register a new account. Success is defined as "can now log in": backend
    /// acceptance is immediately followed by a login with the same
    /// credentials, and that result is returned.
    pub async fn register(&self, data: &RegisterRequest) -> AppResult<Identity> {
        if data.username.trim().is_empty() {
            return Err(AppError::ValidationError("username is required".into()));
        }
        if data.password.trim().is_empty() {
            return Err(AppError::ValidationError("password is required".into()));
        }
        if data.email.trim().is_empty() {
            return Err(AppError::ValidationError("email is required".into()));
        }
        if data.full_name.trim().is_empty() {
            return Err(AppError::ValidationError("full name is required".into()));
        }
        if data.password.chars().count() < MIN_PASSWORD_CHARS {
            return Err(AppError::ValidationError(format!(
                "password must be at least {} characters",
                MIN_PASSWORD_CHARS
            )));
        }
        data.validate()?;

        self.api.register(data).await?;
        log::info!("registration accepted for {}", data.username);

        self.login(&data.username, &data.password).await
    }

    /// Clear identity and credential. No network call is involved; logout
    /// cannot fail.
    pub async fn logout(&self) {
        self.next_generation();
        self.validator.dispose().await;
        self.store.clear();

        let mut state = self.state.lock().await;
        state.identity = None;
        state.credential = None;
        state.is_loading = false;
        log::info!("logged out");
    }

    /// Tear down: abort any in-flight validation and invalidate pending
    /// results so nothing mutates state afterwards.
    pub async fn dispose(&self) {
        self.next_generation();
        self.validator.dispose().await;
    }

    pub async fn identity(&self) -> Option<Identity> {
        self.state.lock().await.identity.clone()
    }

    pub async fn credential(&self) -> Option<SecretString> {
        self.state.lock().await.credential.clone()
    }

    pub async fn is_authenticated(&self) -> bool {
        self.state.lock().await.identity.is_some()
    }

    pub async fn is_loading(&self) -> bool {
        self.state.lock().await.is_loading
    }

    fn next_generation(&self) -> u64 {
        self.generation.fetch_add(1, Ordering::SeqCst) + 1
    }

    fn is_current(&self, generation: u64) -> bool {
        self.generation.load(Ordering::SeqCst) == generation
    }
}
