//! `deepl-http` is an async HTTP client for the DeepL translation API with
//! spreadsheet-style entry points.
//!
//! Requests go through a bounded retry loop that retries HTTP 429, 5xx and
//! timeouts with jittered exponential backoff:
//! - [`DeepLClient::translate_text`]
//! - [`DeepLClient::usage`]
//! - [`SheetFunctions::translate`] and [`SheetFunctions::usage`] add input
//!   validation and host-supplied credentials on top.

mod backoff;
mod classify;
mod client;
mod error;
mod options;
mod request;
mod types;
mod value;
mod wire;

pub mod host;
pub mod sheet;

pub use backoff::BackoffPolicy;
pub use classify::check_response;
pub use client::{DeepLClient, AUTH_SCHEME};
pub use error::{DeepLError, ErrorDetails};
pub use options::{is_free_account_key, ClientOptions, Endpoints, FREE_API_URL, PRO_API_URL};
pub use request::{FormFields, HttpResponse, Method, Request};
pub use sheet::{SheetFunctions, TranslateArgs, TranslateConfig};
pub use types::{TextRequest, Translation, Usage, UsageKind, UsageValue};
pub use value::CellValue;

pub type Result<T> = std::result::Result<T, DeepLError>;
