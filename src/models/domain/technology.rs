use serde::{Deserialize, Serialize};

/// Catalog entry for a quiz technology. The backend carries more fields
/// (description, active flag, timestamps); the client keeps what it renders
/// and what it needs to open a remote session.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Technology {
    pub id: i64,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
}

impl Technology {
    pub fn label(&self) -> &str {
        self.display_name.as_deref().unwrap_or(&self.name)
    }
}
