use std::future::Future;
use std::sync::Arc;

use futures::future::{AbortHandle, Abortable};
use secrecy::SecretString;
use tokio::sync::Mutex;

use crate::api::QuizApi;
use crate::errors::{AppError, AppResult};
use crate::models::domain::Identity;

/// Issues identity-confirmation requests bound to a credential. Each new
/// request supersedes the previous one: the in-flight predecessor is aborted
/// and its result discarded, so a stale response can never overwrite state
/// established by a newer operation.
pub struct SessionValidator {
    api: Arc<dyn QuizApi>,
    abort_handle: Mutex<Option<AbortHandle>>,
}

impl SessionValidator {
    pub fn new(api: Arc<dyn QuizApi>) -> Self {
        SessionValidator {
            api,
            abort_handle: Mutex::new(None),
        }
    }

    /// Confirm a stored credential via the validate-token endpoint. The caller
    /// applies the fail-closed policy on any non-cancelled error.
    pub async fn validate(&self, credential: &SecretString) -> AppResult<Identity> {
        let api = Arc::clone(&self.api);
        self.abortable(api.validate_token(credential)).await
    }

    /// Read the full profile after credential issuance. The caller decides
    /// whether a failure degrades to a fallback identity.
    pub async fn fetch_profile(&self, credential: &SecretString) -> AppResult<Identity> {
        let api = Arc::clone(&self.api);
        self.abortable(api.fetch_profile(credential)).await
    }

    /// Abort whatever request is in flight. Late results resolve as
    /// `Cancelled` and are discarded by callers, never applied.
    pub async fn dispose(&self) {
        if let Some(handle) = self.abort_handle.lock().await.take() {
            handle.abort();
        }
    }

    async fn abortable<F>(&self, request: F) -> AppResult<Identity>
    where
        F: Future<Output = AppResult<Identity>>,
    {
        let (handle, registration) = AbortHandle::new_pair();
        if let Some(previous) = self.abort_handle.lock().await.replace(handle) {
            previous.abort();
        }

        match Abortable::new(request, registration).await {
            Ok(result) => result,
            Err(_aborted) => Err(AppError::Cancelled),
        }
    }
}
