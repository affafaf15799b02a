use std::fs;
use std::path::{Path, PathBuf};

use secrecy::{ExposeSecret, SecretString};

#[cfg(test)]
use mockall::automock;

/// Persists the bearer credential across runs. Storage failures are never
/// surfaced to callers: a credential that cannot be read or written is simply
/// treated as absent.
#[cfg_attr(test, automock)]
pub trait TokenStore: Send + Sync {
    /// Persist the credential in the canonical slot, removing any copy left in
    /// legacy slots as part of the same operation.
    fn save(&self, credential: &SecretString);

    /// Canonical credential if present, else the first readable legacy slot.
    /// Legacy reads never write back; migration happens on the next `save`.
    fn load(&self) -> Option<SecretString>;

    /// Remove the credential from the canonical slot and all legacy slots.
    fn clear(&self);
}

const CANONICAL_DIR: &str = "session";
const TOKEN_FILE: &str = "auth_token";
// Older releases wrote directly into the store root, the oldest under "token".
const LEGACY_FILES: [&str; 2] = ["auth_token", "token"];

pub struct FileTokenStore {
    base_dir: PathBuf,
}

impl FileTokenStore {
    pub fn new(base_dir: PathBuf) -> Self {
        FileTokenStore { base_dir }
    }

    fn canonical_path(&self) -> PathBuf {
        self.base_dir.join(CANONICAL_DIR).join(TOKEN_FILE)
    }

    fn legacy_paths(&self) -> Vec<PathBuf> {
        LEGACY_FILES.iter().map(|f| self.base_dir.join(f)).collect()
    }

    fn read_slot(path: &Path) -> Option<SecretString> {
        match fs::read_to_string(path) {
            Ok(contents) => {
                let token = contents.trim();
                if token.is_empty() {
                    // Corrupt or truncated slot, same as absent.
                    None
                } else {
                    Some(SecretString::from(token.to_string()))
                }
            }
            Err(err) if err.kind() == std::io::ErrorKind::NotFound => None,
            Err(err) => {
                log::warn!("failed to read token slot {}: {}", path.display(), err);
                None
            }
        }
    }

    fn remove_slot(path: &Path) {
        if let Err(err) = fs::remove_file(path) {
            if err.kind() != std::io::ErrorKind::NotFound {
                log::warn!("failed to remove token slot {}: {}", path.display(), err);
            }
        }
    }
}

impl TokenStore for FileTokenStore {
    fn save(&self, credential: &SecretString) {
        let canonical = self.canonical_path();
        if let Some(parent) = canonical.parent() {
            if let Err(err) = fs::create_dir_all(parent) {
                log::warn!("failed to create token dir {}: {}", parent.display(), err);
                return;
            }
        }

        if let Err(err) = fs::write(&canonical, credential.expose_secret()) {
            log::warn!("failed to write token slot {}: {}", canonical.display(), err);
            return;
        }

        // Migration-on-write: a credential must live in exactly one place.
        for legacy in self.legacy_paths() {
            Self::remove_slot(&legacy);
        }
    }

    fn load(&self) -> Option<SecretString> {
        if let Some(token) = Self::read_slot(&self.canonical_path()) {
            return Some(token);
        }

        self.legacy_paths()
            .iter()
            .find_map(|path| Self::read_slot(path))
    }

    fn clear(&self) {
        Self::remove_slot(&self.canonical_path());
        for legacy in self.legacy_paths() {
            Self::remove_slot(&legacy);
        }
    }
}
