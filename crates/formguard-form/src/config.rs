// File: src/config.rs
// Purpose: Controller configuration parsing from formguard.toml

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

/// Form controller configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct FormConfig {
    #[serde(default)]
    pub markup: MarkupConfig,

    #[serde(default)]
    pub validation: ValidationConfig,

    #[serde(default)]
    pub submit: SubmitConfig,
}

/// Attribute and class names the controller reads from and writes to markup
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarkupConfig {
    /// Attribute holding a field's rule string (default: "data-validate")
    #[serde(default = "default_rules_attribute", alias = "rulesAttribute")]
    pub rules_attribute: String,

    /// Prefix of per-rule message overrides, e.g. `data-msg-required`
    #[serde(
        default = "default_message_attribute_prefix",
        alias = "messageAttributePrefix"
    )]
    pub message_attribute_prefix: String,

    /// Attribute that explicitly ties an error element to a field name
    #[serde(default = "default_error_attribute", alias = "errorAttribute")]
    pub error_attribute: String,

    /// Fallback error element id: field id (or name) plus this suffix
    #[serde(default = "default_error_id_suffix", alias = "errorIdSuffix")]
    pub error_id_suffix: String,

    /// Class set on invalid fields
    #[serde(default = "default_invalid_class", alias = "invalidClass")]
    pub invalid_class: String,
}

/// When fields are validated
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ValidationConfig {
    #[serde(default = "default_true", alias = "onInput")]
    pub on_input: bool,

    #[serde(default = "default_true", alias = "onBlur")]
    pub on_blur: bool,

    /// Reject unknown rule names when the controller is built, instead of
    /// ignoring them
    #[serde(default = "default_false", alias = "strictRules")]
    pub strict_rules: bool,
}

/// Submit control behaviour
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubmitConfig {
    /// Label shown on the submit control while submitting
    #[serde(default = "default_submitting_label", alias = "submittingLabel")]
    pub submitting_label: String,
}

// Default values
fn default_rules_attribute() -> String {
    "data-validate".to_string()
}

fn default_message_attribute_prefix() -> String {
    "data-msg-".to_string()
}

fn default_error_attribute() -> String {
    "data-error-for".to_string()
}

fn default_error_id_suffix() -> String {
    "-error".to_string()
}

fn default_invalid_class() -> String {
    "is-invalid".to_string()
}

fn default_submitting_label() -> String {
    "Submitting...".to_string()
}

fn default_true() -> bool {
    true
}

fn default_false() -> bool {
    false
}

impl Default for MarkupConfig {
    fn default() -> Self {
        Self {
            rules_attribute: default_rules_attribute(),
            message_attribute_prefix: default_message_attribute_prefix(),
            error_attribute: default_error_attribute(),
            error_id_suffix: default_error_id_suffix(),
            invalid_class: default_invalid_class(),
        }
    }
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            on_input: true,
            on_blur: true,
            strict_rules: false,
        }
    }
}

impl Default for SubmitConfig {
    fn default() -> Self {
        Self {
            submitting_label: default_submitting_label(),
        }
    }
}

impl FormConfig {
    /// Load configuration from a TOML file.
    ///
    /// A missing or empty file yields the defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Ok(Self::default());
        }

        let content = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {:?}", path))?;

        Self::from_toml_str(&content)
            .with_context(|| format!("Failed to parse config file: {:?}", path))
    }

    /// Load configuration from default path (./formguard.toml)
    pub fn load_default() -> Result<Self> {
        Self::load("formguard.toml")
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        if content.trim().is_empty() {
            return Ok(Self::default());
        }
        Ok(toml::from_str(content)?)
    }

    /// Error element id for a field whose id (or name) is `base`.
    pub fn error_id_for(&self, base: &str) -> String {
        format!("{}{}", base, self.markup.error_id_suffix)
    }
}
