use std::sync::Arc;

use secrecy::SecretString;

use crate::api::QuizApi;
use crate::errors::{AppError, AppResult};
use crate::models::domain::{AnswerRecord, FinalResults, Question, QuizAttempt};
use crate::models::dto::request::FinishSessionRequest;
use crate::models::dto::response::RemoteSession;
use crate::services::auth_controller::AuthController;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnginePhase {
    #[default]
    Idle,
    Loading,
    InProgress,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SubmitOutcome {
    NextQuestion,
    Completed,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ExitOutcome {
    /// An attempt with recorded answers would be lost; the view must confirm
    /// before calling `confirm_exit`.
    ConfirmationRequired,
    Exited,
}

/// State machine for one quiz attempt: Idle -> Loading -> InProgress ->
/// Completed, with abandonment back to Idle. Remote session bookkeeping is an
/// enhancement: every backend call except the question fetch is best-effort
/// and its failure degrades the attempt to local-only scoring.
pub struct QuizEngine {
    api: Arc<dyn QuizApi>,
    auth: Arc<AuthController>,
    phase: EnginePhase,
    attempt: Option<QuizAttempt>,
}

impl QuizEngine {
    pub fn new(api: Arc<dyn QuizApi>, auth: Arc<AuthController>) -> Self {
        QuizEngine {
            api,
            auth,
            phase: EnginePhase::Idle,
            attempt: None,
        }
    }

    /// Start a fresh attempt for a technology. Question-fetch failure is the
    /// one fatal path: it surfaces an error and returns to Idle with no
    /// partial attempt. A failed remote-session open is logged and swallowed.
    pub async fn select_technology(&mut self, technology: &str) -> AppResult<()> {
        match self.phase {
            EnginePhase::Idle | EnginePhase::Completed => {}
            _ => {
                return Err(AppError::InvalidState(
                    "a quiz attempt is already active".into(),
                ))
            }
        }

        self.phase = EnginePhase::Loading;
        self.attempt = None;
        log::info!("loading questions for {}", technology);

        let questions = match self.api.fetch_questions(technology).await {
            Ok(questions) => questions,
            Err(err) => {
                self.phase = EnginePhase::Idle;
                return Err(AppError::QuestionFetch(err.to_string()));
            }
        };

        let mut attempt = QuizAttempt::new(technology, questions);

        if let Some(credential) = self.auth.credential().await {
            match self.open_remote_session(technology, &credential).await {
                Ok(session) => {
                    log::info!("remote quiz session {} opened", session.id);
                    attempt.remote_session = Some(session.id);
                }
                Err(err) => {
                    log::warn!("remote session open failed, continuing local-only: {}", err);
                }
            }
        }

        log::debug!(
            "attempt {} started with {} questions",
            attempt.id,
            attempt.questions.len()
        );
        self.attempt = Some(attempt);
        self.phase = EnginePhase::InProgress;
        Ok(())
    }

    /// Record an answer for the current question and advance. The Nth answer
    /// of an N-question attempt finishes it.
    pub async fn submit_answer(&mut self, selected_option: &str) -> AppResult<SubmitOutcome> {
        if self.phase != EnginePhase::InProgress {
            return Err(AppError::InvalidState("no quiz in progress".into()));
        }
        let attempt = self
            .attempt
            .as_mut()
            .ok_or_else(|| AppError::InvalidState("no active attempt".into()))?;

        let record = {
            let question = attempt
                .current_question()
                .ok_or_else(|| AppError::InvalidState("no current question".into()))?;
            AnswerRecord::new(question, selected_option)
        };
        attempt.answers.push(record);
        attempt.current_index += 1;

        if attempt.is_complete() {
            self.finish().await;
            self.phase = EnginePhase::Completed;
            Ok(SubmitOutcome::Completed)
        } else {
            Ok(SubmitOutcome::NextQuestion)
        }
    }

    /// Settle final results. The server is authoritative when a remote session
    /// exists and the finish call succeeds; everything else falls back to the
    /// local computation.
    async fn finish(&mut self) {
        let Some(attempt) = self.attempt.as_mut() else {
            return;
        };
        let elapsed = attempt.elapsed_seconds();

        let mut server_results = None;
        if let Some(session_id) = attempt.remote_session {
            if let Some(credential) = self.auth.credential().await {
                let request = FinishSessionRequest {
                    time_spent_seconds: elapsed,
                };
                match self
                    .api
                    .finish_session(session_id, &request, &credential)
                    .await
                {
                    Ok(results) => {
                        log::info!("quiz session {} finished and saved", session_id);
                        server_results = Some(results.into());
                    }
                    Err(err) => {
                        log::warn!(
                            "session finish failed, falling back to local scoring: {}",
                            err
                        );
                    }
                }
            }
        }

        let results = server_results.unwrap_or_else(|| {
            FinalResults::local(&attempt.answers, attempt.questions.len(), elapsed)
        });
        attempt.final_results = Some(results);
    }

    /// Discard the current attempt and start over on the same technology.
    pub async fn restart(&mut self) -> AppResult<()> {
        let technology = self
            .attempt
            .as_ref()
            .map(|a| a.technology.clone())
            .ok_or_else(|| AppError::InvalidState("no attempt to restart".into()))?;

        self.phase = EnginePhase::Idle;
        self.attempt = None;
        self.select_technology(&technology).await
    }

    /// Leave the quiz. Abandoning an attempt with recorded answers requires
    /// confirmation; otherwise there is nothing to lose and the exit is
    /// immediate.
    pub fn request_exit(&mut self) -> ExitOutcome {
        let has_progress = self.phase == EnginePhase::InProgress
            && self
                .attempt
                .as_ref()
                .map(|a| a.current_index > 0)
                .unwrap_or(false);

        if has_progress {
            ExitOutcome::ConfirmationRequired
        } else {
            self.abandon();
            ExitOutcome::Exited
        }
    }

    pub fn confirm_exit(&mut self) {
        self.abandon();
    }

    fn abandon(&mut self) {
        if let Some(attempt) = &self.attempt {
            log::info!("abandoning attempt {}", attempt.id);
        }
        self.phase = EnginePhase::Idle;
        self.attempt = None;
    }

    pub fn phase(&self) -> EnginePhase {
        self.phase
    }

    pub fn attempt(&self) -> Option<&QuizAttempt> {
        self.attempt.as_ref()
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.attempt.as_ref().and_then(|a| a.current_question())
    }

    pub fn final_results(&self) -> Option<&FinalResults> {
        self.attempt.as_ref().and_then(|a| a.final_results.as_ref())
    }

    async fn open_remote_session(
        &self,
        technology: &str,
        credential: &SecretString,
    ) -> AppResult<RemoteSession> {
        let technologies = self.api.fetch_technologies().await?;
        let tech = technologies
            .iter()
            .find(|t| t.name == technology)
            .ok_or_else(|| {
                AppError::Backend(format!("technology '{}' not in catalog", technology))
            })?;

        self.api.start_session(tech.id, credential).await
    }
}
