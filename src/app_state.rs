use std::sync::Arc;

use crate::{
    api::{HttpQuizApi, QuizApi},
    config::Config,
    errors::AppResult,
    services::{AuthController, QuizEngine},
    store::{FileTokenStore, TokenStore},
};

/// Composition root: wires the HTTP client, token store, auth controller and
/// quiz engine. Consumers receive their dependencies explicitly; there are no
/// ambient singletons.
pub struct AppState {
    pub api: Arc<dyn QuizApi>,
    pub auth: Arc<AuthController>,
    pub engine: QuizEngine,
    pub config: Arc<Config>,
}

impl AppState {
    pub fn new(config: Config) -> AppResult<Self> {
        let api: Arc<dyn QuizApi> = Arc::new(HttpQuizApi::new(&config)?);
        let store: Arc<dyn TokenStore> = Arc::new(FileTokenStore::new(config.token_dir.clone()));

        let auth = Arc::new(AuthController::new(Arc::clone(&api), store));
        let engine = QuizEngine::new(Arc::clone(&api), Arc::clone(&auth));

        Ok(Self {
            api,
            auth,
            engine,
            config: Arc::new(config),
        })
    }
}
