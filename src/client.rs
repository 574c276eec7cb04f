use std::fmt;
use std::time::{Duration, Instant};

use reqwest::header;
use tokio::time::sleep;

use crate::{
    classify::check_response, wire, ClientOptions, DeepLError, Endpoints, FormFields,
    HttpResponse, Request, Result, TextRequest, Translation, Usage,
};

/// Scheme token placed in front of the auth key in the `Authorization` header.
pub const AUTH_SCHEME: &str = "DeepL-Auth-Key";

/// HTTP client for the DeepL translation API.
#[derive(Clone)]
pub struct DeepLClient {
    http: reqwest::Client,
    auth_key: String,
    endpoints: Endpoints,
    options: ClientOptions,
}

impl fmt::Debug for DeepLClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DeepLClient")
            .field("server_url", &self.server_url())
            .field("auth_key", &"<redacted>")
            .field("options", &self.options)
            .finish()
    }
}

/// Result of a single attempt, as seen by the retry loop.
#[derive(Debug)]
enum Outcome {
    /// Response that ends the loop; the status may still be an error.
    Success(HttpResponse),
    Retryable(RetryReason),
    Terminal(DeepLError),
}

#[derive(Debug)]
enum RetryReason {
    Status(u16),
    Timeout,
}

impl fmt::Display for RetryReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Status(429) => f.write_str("HTTP 429 too many requests"),
            Self::Status(status) => write!(f, "HTTP {status} server error"),
            Self::Timeout => f.write_str("request timed out"),
        }
    }
}

impl DeepLClient {
    /// Creates a client for `auth_key` with default options and endpoints.
    pub fn new(auth_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            auth_key: auth_key.into().trim().to_owned(),
            endpoints: Endpoints::default(),
            options: ClientOptions::default(),
        }
    }

    /// Creates a client from the `DEEPL_AUTH_KEY` environment variable.
    ///
    /// Returns [`DeepLError::MissingCredential`] if it is missing or empty.
    pub fn from_env() -> Result<Self> {
        let auth_key = std::env::var("DEEPL_AUTH_KEY").map_err(|_| DeepLError::MissingCredential)?;
        if auth_key.trim().is_empty() {
            return Err(DeepLError::MissingCredential);
        }
        Ok(Self::new(auth_key))
    }

    /// Applies client options such as timeout and retry behavior.
    pub fn with_options(mut self, opts: ClientOptions) -> Self {
        self.options = opts;
        self
    }

    /// Overrides the free/pro base URLs.
    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    /// Base URL selected for this client's auth key.
    pub fn server_url(&self) -> &str {
        self.endpoints.for_key(&self.auth_key)
    }

    /// Translates one text.
    pub async fn translate_text(&self, request: &TextRequest) -> Result<Translation> {
        let mut form = FormFields::new();
        form.insert("text", &request.text)
            .insert("target_lang", &request.target_lang);
        if let Some(source_lang) = request
            .source_lang
            .as_deref()
            .filter(|lang| !lang.eq_ignore_ascii_case("auto"))
        {
            form.insert("source_lang", source_lang);
        }
        if let Some(glossary_id) = &request.glossary_id {
            form.insert("glossary_id", glossary_id);
        }
        form.extend(request.extra.iter().map(|(k, v)| (k.as_str(), v.as_str())));

        let request =
            Request::post("/v2/translate", form).with_size_hint(request.text.chars().count());
        let response = self.send_with_retry(&request).await?;
        check_response(&response)?;

        let parsed: wire::TranslateResponse = decode_body(&response.body, "translate")?;
        let first = parsed
            .translations
            .into_iter()
            .next()
            .ok_or_else(|| DeepLError::Decode("translate response has no translations".to_owned()))?;
        Ok(Translation {
            text: first.text,
            detected_source_language: first.detected_source_language,
        })
    }

    /// Fetches character usage for the current billing period.
    pub async fn usage(&self) -> Result<Usage> {
        let response = self.send_with_retry(&Request::get("/v2/usage")).await?;
        check_response(&response)?;

        let parsed: wire::UsageResponse = decode_body(&response.body, "usage")?;
        Ok(Usage {
            character_count: parsed.character_count,
            character_limit: parsed.character_limit,
        })
    }

    /// Sends `request`, retrying on HTTP 429, 5xx and timeouts.
    ///
    /// Returns the first response with any other status unchanged, including
    /// 4xx responses. Run [`check_response`] on it to map error statuses.
    pub async fn send_with_retry(&self, request: &Request) -> Result<HttpResponse> {
        let max_attempts = self.options.max_attempts.max(1);
        let mut attempt = 0usize;
        loop {
            let started = Instant::now();
            let reason = match Self::classify_attempt(self.execute(request).await) {
                Outcome::Success(response) => return Ok(response),
                Outcome::Terminal(err) => return Err(err),
                Outcome::Retryable(reason) => reason,
            };

            if attempt + 1 >= max_attempts {
                return Err(DeepLError::MaxRetriesReached {
                    attempts: attempt + 1,
                    last: reason.to_string(),
                });
            }
            self.wait_before_retry(attempt, started, &reason).await;
            attempt += 1;
        }
    }

    /// Performs exactly one HTTP exchange. Error statuses are returned as
    /// responses; only transport failures become `Err`.
    async fn execute(&self, request: &Request) -> std::result::Result<HttpResponse, reqwest::Error> {
        let url = format!("{}{}", self.server_url(), request.path);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            method = ?request.method,
            url = %url,
            size_hint = request.size_hint,
            "sending DeepL request"
        );

        let mut builder = self
            .http
            .request(request.method.as_reqwest(), &url)
            .header(
                header::AUTHORIZATION,
                format!("{AUTH_SCHEME} {}", self.auth_key),
            )
            .timeout(Duration::from_millis(self.options.timeout_ms));
        if let Some(form) = &request.form {
            builder = builder.form(form);
        }

        let response = builder.send().await?;
        let status = response.status().as_u16();
        let body = response.text().await?;
        Ok(HttpResponse { status, body })
    }

    fn classify_attempt(result: std::result::Result<HttpResponse, reqwest::Error>) -> Outcome {
        match result {
            Ok(response) if response.status == 429 || response.status >= 500 => {
                Outcome::Retryable(RetryReason::Status(response.status))
            }
            Ok(response) => Outcome::Success(response),
            Err(err) if err.is_timeout() => Outcome::Retryable(RetryReason::Timeout),
            Err(err) => Outcome::Terminal(DeepLError::Transport(err)),
        }
    }

    async fn wait_before_retry(&self, attempt: usize, started: Instant, reason: &RetryReason) {
        let delay = self.options.backoff.delay(attempt, started);

        #[cfg(feature = "tracing")]
        tracing::debug!(
            attempt,
            delay_ms = delay.as_millis() as u64,
            "retrying DeepL request after {reason}"
        );
        #[cfg(not(feature = "tracing"))]
        let _ = reason;

        sleep(delay).await;
    }
}

fn decode_body<T: serde::de::DeserializeOwned>(body: &str, what: &str) -> Result<T> {
    serde_json::from_str(body)
        .map_err(|err| DeepLError::Decode(format!("invalid {what} response JSON: {err}; body: {body}")))
}
