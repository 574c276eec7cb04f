//! Spreadsheet-callable translate and usage functions.
//!
//! Arguments arrive as loosely typed host values and are validated here
//! before any network activity.

use serde_json::Value as JsonValue;

use crate::{
    host::{CellInspector, CredentialStore, LocaleLookup},
    CellValue, ClientOptions, DeepLClient, DeepLError, Endpoints, Result, TextRequest, UsageKind,
    UsageValue,
};

/// Switches that change how the translate function behaves.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct TranslateConfig {
    /// Keep the value already shown in the cell instead of calling DeepL.
    /// Used to stop recalculation from spending quota.
    pub disable_translations: bool,
}

/// Arguments of the translate function.
#[derive(Clone, Debug, PartialEq)]
pub struct TranslateArgs {
    pub input: CellValue,
    /// `None` or `"auto"` lets DeepL detect the source language.
    pub source_lang: Option<String>,
    /// `None` falls back to the [`LocaleLookup`].
    pub target_lang: Option<String>,
    pub glossary_id: Option<String>,
    /// Extra API fields as a list of `[key, value]` pairs.
    pub options: Option<JsonValue>,
}

impl TranslateArgs {
    pub fn new(input: impl Into<CellValue>) -> Self {
        Self {
            input: input.into(),
            source_lang: None,
            target_lang: None,
            glossary_id: None,
            options: None,
        }
    }

    pub fn source_lang(mut self, lang: impl Into<String>) -> Self {
        self.source_lang = Some(lang.into());
        self
    }

    pub fn target_lang(mut self, lang: impl Into<String>) -> Self {
        self.target_lang = Some(lang.into());
        self
    }

    pub fn glossary_id(mut self, glossary_id: impl Into<String>) -> Self {
        self.glossary_id = Some(glossary_id.into());
        self
    }

    pub fn options(mut self, options: JsonValue) -> Self {
        self.options = Some(options);
        self
    }
}

/// Translate and usage functions bound to host capabilities.
pub struct SheetFunctions<S> {
    store: S,
    options: ClientOptions,
    endpoints: Endpoints,
    config: TranslateConfig,
    cell: Option<Box<dyn CellInspector>>,
    locale: Option<Box<dyn LocaleLookup>>,
}

impl<S: CredentialStore> SheetFunctions<S> {
    pub fn new(store: S) -> Self {
        Self {
            store,
            options: ClientOptions::default(),
            endpoints: Endpoints::default(),
            config: TranslateConfig::default(),
            cell: None,
            locale: None,
        }
    }

    pub fn with_options(mut self, options: ClientOptions) -> Self {
        self.options = options;
        self
    }

    pub fn with_endpoints(mut self, endpoints: Endpoints) -> Self {
        self.endpoints = endpoints;
        self
    }

    pub fn with_config(mut self, config: TranslateConfig) -> Self {
        self.config = config;
        self
    }

    pub fn with_cell_inspector(mut self, cell: impl CellInspector + 'static) -> Self {
        self.cell = Some(Box::new(cell));
        self
    }

    pub fn with_locale(mut self, locale: impl LocaleLookup + 'static) -> Self {
        self.locale = Some(Box::new(locale));
        self
    }

    /// Stores the auth key used by later calls.
    pub fn set_auth_key(&self, key: impl Into<String>) {
        self.store.set(key.into().trim().to_owned());
    }

    pub fn auth_key(&self) -> Option<String> {
        self.store.get().filter(|key| !key.trim().is_empty())
    }

    /// Translates `args.input` and returns the translated text.
    pub async fn translate(&self, args: TranslateArgs) -> Result<String> {
        let text = args.input.to_input_text()?;
        let source_lang = args
            .source_lang
            .as_deref()
            .map(|lang| validate_lang_code(lang, "source"))
            .transpose()?
            .filter(|lang| !lang.eq_ignore_ascii_case("auto"));
        let target_lang = match args.target_lang {
            Some(lang) => lang,
            None => self
                .locale
                .as_ref()
                .and_then(|locale| locale.target_lang())
                .ok_or_else(|| {
                    DeepLError::InvalidInput(
                        "no target language given and none could be derived from the locale"
                            .to_owned(),
                    )
                })?,
        };
        let target_lang = validate_lang_code(&target_lang, "target")?;
        let extra = args
            .options
            .as_ref()
            .map(parse_option_pairs)
            .transpose()?
            .unwrap_or_default();
        let client = self.client()?;

        if self.config.disable_translations {
            return self
                .cell
                .as_ref()
                .and_then(|cell| cell.displayed_value())
                .filter(|value| !value.is_empty())
                .ok_or(DeepLError::TranslationsDisabled);
        }

        let request = TextRequest {
            text,
            target_lang,
            source_lang,
            glossary_id: args.glossary_id.filter(|id| !id.is_empty()),
            extra,
        };
        let translation = client.translate_text(&request).await?;
        Ok(translation.text)
    }

    /// Reports character usage; `kind` is `None`, `"count"` or `"limit"`.
    pub async fn usage(&self, kind: Option<&str>) -> Result<UsageValue> {
        let kind = UsageKind::parse(kind)?;
        let usage = self.client()?.usage().await?;
        Ok(kind.select(usage))
    }

    fn client(&self) -> Result<DeepLClient> {
        let auth_key = self.auth_key().ok_or(DeepLError::MissingCredential)?;
        Ok(DeepLClient::new(auth_key)
            .with_options(self.options.clone())
            .with_endpoints(self.endpoints.clone()))
    }
}

fn validate_lang_code(lang: &str, role: &str) -> Result<String> {
    let lang = lang.trim();
    let valid = !lang.is_empty()
        && lang.chars().all(|c| c.is_ascii_alphabetic() || c == '-')
        && !lang.starts_with('-')
        && !lang.ends_with('-');
    if valid {
        Ok(lang.to_owned())
    } else {
        Err(DeepLError::InvalidInput(format!(
            "invalid {role} language code '{lang}'"
        )))
    }
}

/// Reads `[[key, value], ...]` into field pairs.
pub(crate) fn parse_option_pairs(options: &JsonValue) -> Result<Vec<(String, String)>> {
    let rows = options.as_array().ok_or_else(|| {
        DeepLError::InvalidInput("options must be a list of [key, value] pairs".to_owned())
    })?;

    rows.iter()
        .enumerate()
        .map(|(index, row)| match row.as_array().map(Vec::as_slice) {
            Some([key, value]) => {
                let key = option_scalar(key)
                    .filter(|key| !key.is_empty())
                    .ok_or_else(|| {
                        DeepLError::InvalidInput(format!("option {index} has an invalid key"))
                    })?;
                let value = option_scalar(value).ok_or_else(|| {
                    DeepLError::InvalidInput(format!("option '{key}' has an invalid value"))
                })?;
                Ok((key, value))
            }
            _ => Err(DeepLError::InvalidInput(format!(
                "option {index} must be a [key, value] pair"
            ))),
        })
        .collect()
}

fn option_scalar(value: &JsonValue) -> Option<String> {
    match value {
        JsonValue::String(text) => Some(text.clone()),
        JsonValue::Number(number) => Some(number.to_string()),
        JsonValue::Bool(flag) => Some(flag.to_string()),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::{parse_option_pairs, validate_lang_code};
    use crate::DeepLError;

    #[test]
    fn option_pairs_are_read_verbatim() {
        let pairs = parse_option_pairs(&json!([
            ["tag_handling", "xml"],
            ["ignore_tags", "ignore"]
        ]))
        .expect("valid pairs");
        assert_eq!(
            pairs,
            vec![
                ("tag_handling".to_owned(), "xml".to_owned()),
                ("ignore_tags".to_owned(), "ignore".to_owned()),
            ]
        );
    }

    #[test]
    fn scalar_option_values_are_stringified() {
        let pairs = parse_option_pairs(&json!([["split_sentences", 0], ["preserve_formatting", true]]))
            .expect("valid pairs");
        assert_eq!(pairs[0].1, "0");
        assert_eq!(pairs[1].1, "true");
    }

    #[test]
    fn malformed_options_are_rejected() {
        for options in [
            json!(["tag_handling", "xml"]),
            json!([["tag_handling"]]),
            json!([["a", "b", "c"]]),
            json!({"tag_handling": "xml"}),
            json!([["", "xml"]]),
            json!([["tag_handling", null]]),
        ] {
            let err = parse_option_pairs(&options).expect_err("must fail");
            assert!(matches!(err, DeepLError::InvalidInput(_)), "{options}");
        }
    }

    #[test]
    fn lang_codes_are_checked() {
        assert_eq!(validate_lang_code(" en-GB ", "target").expect("valid"), "en-GB");
        assert!(validate_lang_code("", "target").is_err());
        assert!(validate_lang_code("de_DE", "target").is_err());
        assert!(validate_lang_code("-de", "target").is_err());
    }
}
