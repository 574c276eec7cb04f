use std::fmt;

use crate::{DeepLError, Result};

/// Parameters for one `/v2/translate` call.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TextRequest {
    pub text: String,
    pub target_lang: String,
    /// Source language, `None` lets DeepL detect it.
    pub source_lang: Option<String>,
    pub glossary_id: Option<String>,
    /// Extra API fields, applied last so they override the fields above.
    pub extra: Vec<(String, String)>,
}

impl TextRequest {
    pub fn new(text: impl Into<String>, target_lang: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            target_lang: target_lang.into(),
            ..Self::default()
        }
    }

    pub fn source_lang(mut self, source_lang: impl Into<String>) -> Self {
        self.source_lang = Some(source_lang.into());
        self
    }

    pub fn glossary_id(mut self, glossary_id: impl Into<String>) -> Self {
        self.glossary_id = Some(glossary_id.into());
        self
    }

    pub fn extra(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.extra.push((key.into(), value.into()));
        self
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Translation {
    pub text: String,
    pub detected_source_language: Option<String>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Usage {
    pub character_count: u64,
    pub character_limit: u64,
}

/// Which usage figure the usage function reports.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum UsageKind {
    /// `"<count> of <limit> characters used."`
    #[default]
    Summary,
    Count,
    Limit,
}

impl UsageKind {
    /// Parses the optional `type` argument: absent, `"count"` or `"limit"`.
    pub fn parse(kind: Option<&str>) -> Result<Self> {
        match kind {
            None => Ok(Self::Summary),
            Some("count") => Ok(Self::Count),
            Some("limit") => Ok(Self::Limit),
            Some(other) => Err(DeepLError::InvalidInput(format!(
                "unrecognized usage type '{other}', expected 'count' or 'limit'"
            ))),
        }
    }

    pub fn select(self, usage: Usage) -> UsageValue {
        match self {
            Self::Summary => UsageValue::Summary(format!(
                "{} of {} characters used.",
                usage.character_count, usage.character_limit
            )),
            Self::Count => UsageValue::Count(usage.character_count),
            Self::Limit => UsageValue::Limit(usage.character_limit),
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum UsageValue {
    Summary(String),
    Count(u64),
    Limit(u64),
}

impl fmt::Display for UsageValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Summary(text) => f.write_str(text),
            Self::Count(value) | Self::Limit(value) => write!(f, "{value}"),
        }
    }
}
