//! Storage and resolution of the OpenWeather API key.
//!
//! The key lives in a single plaintext file. It is read every time a request
//! needs it and only written when the user enters a new one, so edits made
//! outside the program are picked up on the next request.

use std::{
    fs,
    path::{Path, PathBuf},
};

use tracing::{debug, warn};

use crate::error::WorldClockError;

/// Asks the user for a key when none is stored.
///
/// Returning `None` means the user cancelled.
pub trait KeyPrompt {
    fn request_key(&self) -> Option<String>;
}

/// Prompt that always cancels; used where no interactive input is possible.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoPrompt;

impl KeyPrompt for NoPrompt {
    fn request_key(&self) -> Option<String> {
        None
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum KeyState {
    NoKey,
    Cached(String),
}

#[derive(Debug, Clone)]
pub struct ApiKeyStore {
    path: PathBuf,
}

impl ApiKeyStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Current state of the key file. Missing, unreadable or blank files all
    /// count as having no key.
    pub fn state(&self) -> KeyState {
        match fs::read_to_string(&self.path) {
            Ok(contents) => {
                let key = contents.trim();
                if key.is_empty() { KeyState::NoKey } else { KeyState::Cached(key.to_string()) }
            }
            Err(err) => {
                debug!(path = %self.path.display(), error = %err, "no readable API key file");
                KeyState::NoKey
            }
        }
    }

    /// Persist a key, overwriting whatever was stored before.
    pub fn store(&self, key: &str) -> Result<(), WorldClockError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        fs::write(&self.path, key.trim())?;
        Ok(())
    }

    /// Return the stored key, prompting for one if there is none.
    ///
    /// A key entered at the prompt is written to disk before it is returned.
    /// If writing fails the key is still used for this request.
    pub fn resolve(&self, prompt: &dyn KeyPrompt) -> Result<String, WorldClockError> {
        if let KeyState::Cached(key) = self.state() {
            return Ok(key);
        }

        let key = prompt
            .request_key()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or(WorldClockError::MissingApiKey)?;

        if let Err(err) = self.store(&key) {
            warn!(path = %self.path.display(), error = %err, "failed to persist API key");
        }

        Ok(key)
    }
}
