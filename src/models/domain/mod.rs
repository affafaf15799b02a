pub mod attempt;
pub mod identity;
pub mod question;
pub mod technology;
pub use attempt::{AnswerRecord, FinalResults, QuizAttempt, ResultsSource};
pub use identity::{Identity, IdentitySource};
pub use question::Question;
pub use technology::Technology;
