use std::time::Instant;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::domain::Question;

/// One graded answer. Created exactly once per question, in question order,
/// and never mutated afterwards.
#[derive(Clone, Debug, PartialEq, Deserialize, Serialize)]
pub struct AnswerRecord {
    pub question_id: i64,
    pub user_answer: String,
    pub correct_answer: String,
    pub is_correct: bool,
    pub answered_at: DateTime<Utc>,
}

impl AnswerRecord {
    pub fn new(question: &Question, user_answer: &str) -> Self {
        AnswerRecord {
            question_id: question.id,
            user_answer: user_answer.to_string(),
            correct_answer: question.correct_answer.clone(),
            is_correct: question.is_correct(user_answer),
            answered_at: Utc::now(),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ResultsSource {
    /// Computed and persisted by the backend; authoritative for history.
    Server,
    /// Computed from local answer records; shown as unsaved.
    Local,
}

#[derive(Clone, Debug, PartialEq)]
pub struct FinalResults {
    pub correct_answers: u32,
    pub total_questions: u32,
    pub score_percentage: f64,
    pub time_spent_seconds: u64,
    pub source: ResultsSource,
}

impl FinalResults {
    /// Local scoring fallback. Percentage is rounded to one decimal so
    /// recomputation from the same records is stable.
    pub fn local(answers: &[AnswerRecord], total_questions: usize, time_spent_seconds: u64) -> Self {
        let correct = answers.iter().filter(|a| a.is_correct).count();
        let score_percentage = if total_questions == 0 {
            0.0
        } else {
            let raw = correct as f64 / total_questions as f64 * 100.0;
            (raw * 10.0).round() / 10.0
        };

        FinalResults {
            correct_answers: correct as u32,
            total_questions: total_questions as u32,
            score_percentage,
            time_spent_seconds,
            source: ResultsSource::Local,
        }
    }

    pub fn is_saved(&self) -> bool {
        self.source == ResultsSource::Server
    }
}

/// One traversal of a technology's question set, from selection to completion
/// or abandonment. Replaced wholesale on restart; nothing carries over.
#[derive(Clone, Debug)]
pub struct QuizAttempt {
    pub id: Uuid,
    pub technology: String,
    pub questions: Vec<Question>,
    pub current_index: usize,
    pub answers: Vec<AnswerRecord>,
    pub started_at: DateTime<Utc>,
    pub remote_session: Option<i64>,
    pub final_results: Option<FinalResults>,
    started: Instant,
}

impl QuizAttempt {
    pub fn new(technology: &str, questions: Vec<Question>) -> Self {
        QuizAttempt {
            id: Uuid::new_v4(),
            technology: technology.to_string(),
            questions,
            current_index: 0,
            answers: Vec::new(),
            started_at: Utc::now(),
            remote_session: None,
            final_results: None,
            started: Instant::now(),
        }
    }

    pub fn current_question(&self) -> Option<&Question> {
        self.questions.get(self.current_index)
    }

    /// current_index reaches questions.len() exactly when the attempt is done.
    pub fn is_complete(&self) -> bool {
        self.current_index == self.questions.len()
    }

    pub fn elapsed_seconds(&self) -> u64 {
        self.started.elapsed().as_secs()
    }
}
