use serde::{Deserialize, Serialize};

/// A multiple-choice question as served by the question bank. Immutable once
/// fetched for an attempt.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Question {
    pub id: i64,
    pub technology: String,
    #[serde(default)]
    pub category: String,
    pub difficulty: u8, // 1-5
    pub question_text: String,
    pub options: Vec<String>,
    pub correct_answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tags: Option<Vec<String>>,
}

impl Question {
    pub fn is_correct(&self, answer: &str) -> bool {
        answer == self.correct_answer
    }
}

#[cfg(test)]
impl Question {
    pub fn test_question(id: i64, technology: &str, correct: &str) -> Self {
        Question {
            id,
            technology: technology.to_string(),
            category: "general".to_string(),
            difficulty: 2,
            question_text: format!("Question {}", id),
            options: vec![
                correct.to_string(),
                "wrong one".to_string(),
                "wrong two".to_string(),
            ],
            correct_answer: correct.to_string(),
            explanation: None,
            tags: None,
        }
    }
}
