//! Per-field selector configuration.
//!
//! A config is fixed once a field is attached. It can be built in code or
//! deserialised, e.g. from TOML:
//!
//! ```toml
//! is_date_time = false
//! min_date = "100"
//! max_date = "now"
//! allow_empty = true
//! ```

use serde::{Deserialize, Serialize};

use crate::{BIRTHDAY_MAX_AGE, BoundSpec, SelectorError};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct SelectorConfig {
    /// Whether the field carries hour and minute.
    pub is_date_time: bool,
    pub min_date:     BoundSpec,
    pub max_date:     BoundSpec,
    /// Whether a field without a value passes validation.
    pub allow_empty:  bool,
    pub placeholder:  Option<String>,
}

impl SelectorConfig {
    /// Date-only field between the default bounds, allowing empty values.
    pub fn date() -> Self {
        Self {
            allow_empty: true,
            ..Self::default()
        }
    }

    /// Date-time field between the default bounds, allowing empty values.
    pub fn date_time() -> Self {
        Self {
            is_date_time: true,
            ..Self::date()
        }
    }

    /// Date of birth: at most 100 years back, never in the future.
    pub fn birthday() -> Self {
        Self::date()
            .with_min_date(BoundSpec::RelativeYears(BIRTHDAY_MAX_AGE))
            .with_max_date(BoundSpec::Now)
    }

    #[must_use]
    pub fn with_min_date(mut self, spec: impl Into<BoundSpec>) -> Self {
        self.min_date = spec.into();
        self
    }

    #[must_use]
    pub fn with_max_date(mut self, spec: impl Into<BoundSpec>) -> Self {
        self.max_date = spec.into();
        self
    }

    #[must_use]
    pub fn allow_empty(mut self, allow: bool) -> Self {
        self.allow_empty = allow;
        self
    }

    #[must_use]
    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    /// # Errors
    /// Returns `SelectorError::Config` if the document is not a valid config.
    pub fn from_toml_str(s: &str) -> Result<Self, SelectorError> {
        Ok(toml::from_str(s)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::date;

    #[test]
    fn test_birthday_preset() {
        let config = SelectorConfig::birthday();
        assert_eq!(config.min_date, BoundSpec::RelativeYears(100));
        assert_eq!(config.max_date, BoundSpec::Now);
        assert!(!config.is_date_time);
    }

    #[test]
    fn test_from_toml() {
        let config = SelectorConfig::from_toml_str(
            r#"
            is_date_time = true
            min_date = "2020-01-01"
            max_date = "peer-end"
            placeholder = "Pick a day"
            "#,
        )
        .unwrap();

        assert!(config.is_date_time);
        assert!(!config.allow_empty);
        assert_eq!(config.min_date, BoundSpec::IsoDate(date(2020, 1, 1)));
        assert_eq!(config.max_date, BoundSpec::from("peer-end"));
        assert_eq!(config.placeholder.as_deref(), Some("Pick a day"));
    }

    #[test]
    fn test_from_toml_defaults() {
        let config = SelectorConfig::from_toml_str("").unwrap();
        assert_eq!(config, SelectorConfig::default());
        assert_eq!(config.min_date, BoundSpec::Default);
    }

    #[test]
    fn test_from_toml_rejects_bad_types() {
        let result = SelectorConfig::from_toml_str("is_date_time = \"yes\"");
        assert!(matches!(result, Err(SelectorError::Config(_))));
    }
}
