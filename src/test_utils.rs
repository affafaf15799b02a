use crate::models::domain::{Identity, Question, Technology};

#[cfg(test)]
pub mod fixtures {
    use super::*;

    /// Creates a question set for a technology, every answer being "right"
    pub fn test_questions(technology: &str, count: i64) -> Vec<Question> {
        (1..=count)
            .map(|i| Question::test_question(i, technology, "right"))
            .collect()
    }

    /// Creates a one-entry technology catalog
    pub fn test_catalog(name: &str, id: i64) -> Vec<Technology> {
        vec![Technology {
            id,
            name: name.to_string(),
            display_name: None,
            icon: None,
            color: None,
        }]
    }

    /// Creates a confirmed identity for a username
    pub fn test_identity(username: &str) -> Identity {
        Identity::new(username, &format!("{}@example.com", username), "Test User")
    }
}
