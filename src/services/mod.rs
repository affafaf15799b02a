pub mod auth_controller;
pub mod quiz_engine;
pub mod session_validator;

pub use auth_controller::AuthController;
pub use quiz_engine::{EnginePhase, ExitOutcome, QuizEngine, SubmitOutcome};
pub use session_validator::SessionValidator;
