use crate::{DeepLError, Result};

/// Scalar value handed over by a spreadsheet host.
#[derive(Clone, Debug, PartialEq)]
pub enum CellValue {
    Empty,
    Text(String),
    Number(f64),
    Bool(bool),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        Self::Text(value.into())
    }

    pub fn number(value: f64) -> Self {
        Self::Number(value)
    }

    /// Text to translate: strings pass through, finite numbers are formatted.
    pub fn to_input_text(&self) -> Result<String> {
        match self {
            Self::Text(value) => Ok(value.clone()),
            Self::Number(value) if value.is_finite() => Ok(value.to_string()),
            Self::Number(value) => Err(DeepLError::InvalidInput(format!(
                "non-finite number '{value}' cannot be translated"
            ))),
            Self::Bool(_) => Err(DeepLError::InvalidInput(
                "input must be text or a number, got a boolean".to_owned(),
            )),
            Self::Empty => Err(DeepLError::InvalidInput(
                "input must be text or a number, got an empty cell".to_owned(),
            )),
        }
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Bool(value)
    }
}
