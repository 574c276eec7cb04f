//! Capabilities supplied by the spreadsheet host.
//!
//! The sheet functions only need a place to keep the auth key, the value
//! currently displayed in the calling cell, and a default target language.

use std::sync::RwLock;

/// Key-value slot holding the DeepL auth key.
pub trait CredentialStore: Send + Sync {
    fn get(&self) -> Option<String>;
    fn set(&self, value: String);
}

/// Returns the text currently displayed in the calling cell, if any.
pub trait CellInspector: Send + Sync {
    fn displayed_value(&self) -> Option<String>;
}

/// Provides the target language used when the caller passes none.
pub trait LocaleLookup: Send + Sync {
    fn target_lang(&self) -> Option<String>;
}

impl<F> CellInspector for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn displayed_value(&self) -> Option<String> {
        self()
    }
}

impl<F> LocaleLookup for F
where
    F: Fn() -> Option<String> + Send + Sync,
{
    fn target_lang(&self) -> Option<String> {
        self()
    }
}

/// Fixed target language, e.g. derived once from the spreadsheet locale.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FixedLocale(pub String);

impl LocaleLookup for FixedLocale {
    fn target_lang(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// In-process credential store.
#[derive(Debug, Default)]
pub struct MemoryCredentialStore {
    value: RwLock<Option<String>>,
}

impl MemoryCredentialStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_key(key: impl Into<String>) -> Self {
        Self {
            value: RwLock::new(Some(key.into())),
        }
    }
}

impl CredentialStore for MemoryCredentialStore {
    fn get(&self) -> Option<String> {
        match self.value.read() {
            Ok(guard) => guard.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }

    fn set(&self, value: String) {
        match self.value.write() {
            Ok(mut guard) => *guard = Some(value),
            Err(poisoned) => *poisoned.into_inner() = Some(value),
        }
    }
}

/// Reads `DEEPL_AUTH_KEY`; values passed to `set` shadow it for this process.
#[derive(Debug)]
pub struct EnvCredentialStore {
    var: String,
    overridden: MemoryCredentialStore,
}

impl EnvCredentialStore {
    pub const VAR: &'static str = "DEEPL_AUTH_KEY";

    pub fn new() -> Self {
        Self::from_var(Self::VAR)
    }

    /// Reads the key from `var` instead of `DEEPL_AUTH_KEY`.
    pub fn from_var(var: impl Into<String>) -> Self {
        Self {
            var: var.into(),
            overridden: MemoryCredentialStore::new(),
        }
    }
}

impl Default for EnvCredentialStore {
    fn default() -> Self {
        Self::new()
    }
}

impl CredentialStore for EnvCredentialStore {
    fn get(&self) -> Option<String> {
        self.overridden
            .get()
            .or_else(|| std::env::var(&self.var).ok())
    }

    fn set(&self, value: String) {
        self.overridden.set(value);
    }
}
