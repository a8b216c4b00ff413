// File: src/result.rs
// Purpose: Validation outcomes for one field and for a whole form

use serde::ser::{SerializeMap, SerializeStruct, Serializer};
use serde::{Deserialize, Serialize};

/// Outcome of validating one field. Errors keep rule declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FieldResult {
    pub is_valid: bool,
    pub errors: Vec<String>,
}

impl FieldResult {
    pub fn from_errors(errors: Vec<String>) -> Self {
        Self {
            is_valid: errors.is_empty(),
            errors,
        }
    }

    pub fn valid() -> Self {
        Self::from_errors(Vec::new())
    }

    /// Message shown where only one error fits.
    pub fn first_error(&self) -> Option<&str> {
        self.errors.first().map(String::as_str)
    }
}

/// Outcome of validating a whole form.
///
/// Fields appear in the insertion order of the form's rule table.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormResult {
    pub is_valid: bool,
    fields: Vec<(String, FieldResult)>,
}

impl FormResult {
    pub fn from_fields(fields: Vec<(String, FieldResult)>) -> Self {
        Self {
            is_valid: fields.iter().all(|(_, result)| result.is_valid),
            fields,
        }
    }

    pub fn field(&self, name: &str) -> Option<&FieldResult> {
        self.fields
            .iter()
            .find(|(field, _)| field == name)
            .map(|(_, result)| result)
    }

    /// Every validated field with its result.
    pub fn fields(&self) -> impl Iterator<Item = (&str, &FieldResult)> {
        self.fields.iter().map(|(name, result)| (name.as_str(), result))
    }

    /// Only the fields with at least one error.
    pub fn errors(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.fields
            .iter()
            .filter(|(_, result)| !result.is_valid)
            .map(|(name, result)| (name.as_str(), result.errors.as_slice()))
    }

    pub fn invalid_fields(&self) -> Vec<&str> {
        self.errors().map(|(name, _)| name).collect()
    }

    pub fn first_error(&self, field: &str) -> Option<&str> {
        self.field(field).and_then(FieldResult::first_error)
    }

    pub fn error_count(&self) -> usize {
        self.fields.iter().map(|(_, result)| result.errors.len()).sum()
    }
}

impl Serialize for FormResult {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut state = serializer.serialize_struct("FormResult", 3)?;
        state.serialize_field("isValid", &self.is_valid)?;
        state.serialize_field("fields", &ResultMap(&self.fields))?;
        state.serialize_field("errors", &ErrorMap(&self.fields))?;
        state.end()
    }
}

struct ResultMap<'a>(&'a [(String, FieldResult)]);

impl Serialize for ResultMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.0.len()))?;
        for (field, result) in self.0 {
            map.serialize_entry(field, result)?;
        }
        map.end()
    }
}

/// Invalid fields only, each with its messages.
struct ErrorMap<'a>(&'a [(String, FieldResult)]);

impl Serialize for ErrorMap<'_> {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(None)?;
        for (field, result) in self.0.iter().filter(|(_, result)| !result.is_valid) {
            map.serialize_entry(field, &result.errors)?;
        }
        map.end()
    }
}
