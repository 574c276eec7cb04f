use crate::BackoffPolicy;

/// Base URL for auth keys ending in `:fx`.
pub const FREE_API_URL: &str = "https://api-free.deepl.com";
/// Base URL for all other auth keys.
pub const PRO_API_URL: &str = "https://api.deepl.com";

/// Configures HTTP timeout and retry behavior.
#[derive(Clone, Debug, PartialEq)]
pub struct ClientOptions {
    /// Per-request timeout in milliseconds.
    pub timeout_ms: u64,
    /// Maximum number of attempts per call, including the first one.
    pub max_attempts: usize,
    /// Delay policy between attempts.
    pub backoff: BackoffPolicy,
}

impl Default for ClientOptions {
    fn default() -> Self {
        Self {
            timeout_ms: 30_000,
            max_attempts: 5,
            backoff: BackoffPolicy::default(),
        }
    }
}

/// The two DeepL API hosts an auth key can be routed to.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Endpoints {
    pub free: String,
    pub pro: String,
}

impl Endpoints {
    /// Routes both free and pro keys to the same base URL.
    pub fn single(url: impl Into<String>) -> Self {
        let url = url.into();
        Self {
            free: url.clone(),
            pro: url,
        }
    }

    /// Base URL for `auth_key`, chosen by its `:fx` suffix.
    pub fn for_key(&self, auth_key: &str) -> &str {
        if is_free_account_key(auth_key) {
            &self.free
        } else {
            &self.pro
        }
    }
}

impl Default for Endpoints {
    fn default() -> Self {
        Self {
            free: FREE_API_URL.to_owned(),
            pro: PRO_API_URL.to_owned(),
        }
    }
}

/// Free-tier keys carry a literal `:fx` suffix.
pub fn is_free_account_key(auth_key: &str) -> bool {
    auth_key.ends_with(":fx")
}
