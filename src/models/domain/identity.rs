use serde::{Deserialize, Serialize};

/// Placeholder profile values used when a credential was accepted but the
/// follow-up identity read failed. Matches what the backend provisions for
/// its default account.
pub const DEGRADED_EMAIL: &str = "admin@quiz.local";
pub const DEGRADED_FULL_NAME: &str = "Administrator";

/// How an identity was established. `Degraded` identities are best-effort
/// placeholders, not verified profile data, and must stay distinguishable
/// for diagnostics even though they count as authenticated.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum IdentitySource {
    #[default]
    Confirmed,
    Degraded,
}

#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct Identity {
    pub username: String,
    pub email: String,
    #[serde(default)]
    pub full_name: String,
    #[serde(skip)]
    pub source: IdentitySource,
}

impl Identity {
    pub fn new(username: &str, email: &str, full_name: &str) -> Self {
        Identity {
            username: username.to_string(),
            email: email.to_string(),
            full_name: full_name.to_string(),
            source: IdentitySource::Confirmed,
        }
    }

    /// Fallback identity built purely from the submitted username. A validated
    /// credential is proof of authentication even when the profile read is
    /// blocked, so the user still counts as logged in.
    pub fn degraded(username: &str) -> Self {
        Identity {
            username: username.to_string(),
            email: DEGRADED_EMAIL.to_string(),
            full_name: DEGRADED_FULL_NAME.to_string(),
            source: IdentitySource::Degraded,
        }
    }

    pub fn is_degraded(&self) -> bool {
        self.source == IdentitySource::Degraded
    }
}
