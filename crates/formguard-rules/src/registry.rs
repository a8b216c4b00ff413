// File: src/registry.rs
// Purpose: Rule registry - named predicates and messages, open to runtime extension

use crate::builtins;
use crate::error::RegistryError;
use crate::rule::RuleParam;
use crate::value::{FieldValue, FormSnapshot};
use once_cell::sync::Lazy;
use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

/// Predicate applied to a field value, with the whole form for cross-field rules.
pub type ValuePredicate = Arc<dyn Fn(&FieldValue, &FormSnapshot) -> bool + Send + Sync>;

/// First stage of a parameterized rule: declared parameters in, predicate out.
pub type PredicateFactory = Arc<dyn Fn(&[RuleParam]) -> ValuePredicate + Send + Sync>;

/// Builds a message from the rule's declared parameters.
pub type MessageFn = Arc<dyn Fn(&[RuleParam]) -> String + Send + Sync>;

/// How a rule obtains its predicate.
#[derive(Clone)]
pub enum RuleKind {
    /// Zero-parameter rule; declared parameters are ignored.
    Simple(ValuePredicate),
    /// Parameterized rule; the factory runs with the declared parameters.
    Factory(PredicateFactory),
}

impl RuleKind {
    pub fn simple<F>(predicate: F) -> Self
    where
        F: Fn(&FieldValue, &FormSnapshot) -> bool + Send + Sync + 'static,
    {
        RuleKind::Simple(Arc::new(predicate))
    }

    pub fn factory<F>(factory: F) -> Self
    where
        F: Fn(&[RuleParam]) -> ValuePredicate + Send + Sync + 'static,
    {
        RuleKind::Factory(Arc::new(factory))
    }

    /// Predicate for one rule usage.
    pub fn predicate(&self, params: &[RuleParam]) -> ValuePredicate {
        match self {
            RuleKind::Simple(predicate) => predicate.clone(),
            RuleKind::Factory(factory) => factory(params),
        }
    }
}

impl fmt::Debug for RuleKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleKind::Simple(_) => f.write_str("Simple"),
            RuleKind::Factory(_) => f.write_str("Factory"),
        }
    }
}

/// Message shown when a rule fails.
#[derive(Clone)]
pub enum RuleMessage {
    Literal(Cow<'static, str>),
    Template(MessageFn),
}

impl RuleMessage {
    pub fn template<F>(f: F) -> Self
    where
        F: Fn(&[RuleParam]) -> String + Send + Sync + 'static,
    {
        RuleMessage::Template(Arc::new(f))
    }

    pub fn resolve(&self, params: &[RuleParam]) -> String {
        match self {
            RuleMessage::Literal(text) => text.to_string(),
            RuleMessage::Template(f) => f(params),
        }
    }
}

impl From<&'static str> for RuleMessage {
    fn from(text: &'static str) -> Self {
        RuleMessage::Literal(Cow::Borrowed(text))
    }
}

impl From<String> for RuleMessage {
    fn from(text: String) -> Self {
        RuleMessage::Literal(Cow::Owned(text))
    }
}

impl fmt::Debug for RuleMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleMessage::Literal(text) => f.debug_tuple("Literal").field(text).finish(),
            RuleMessage::Template(_) => f.write_str("Template"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct RuleDefinition {
    pub kind: RuleKind,
    pub message: RuleMessage,
}

static BUILTIN: Lazy<Arc<RuleRegistry>> = Lazy::new(|| Arc::new(RuleRegistry::with_builtins()));

/// Lookup from rule name to predicate and message.
///
/// A lookup miss returns `None`. Validation treats a missing rule as inert:
/// it never passes or fails a field.
#[derive(Debug, Clone, Default)]
pub struct RuleRegistry {
    rules: HashMap<String, RuleDefinition>,
}

impl RuleRegistry {
    /// Registry with no rules at all.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Registry preloaded with the builtin rules (`required`, `email`, `min`, ...).
    pub fn with_builtins() -> Self {
        let mut registry = Self::empty();
        builtins::install(&mut registry);
        registry
    }

    /// Shared builtin registry.
    pub fn builtin() -> Arc<RuleRegistry> {
        BUILTIN.clone()
    }

    /// Add a new rule. Existing rules are never overwritten.
    pub fn register(
        &mut self,
        name: impl Into<String>,
        kind: RuleKind,
        message: impl Into<RuleMessage>,
    ) -> Result<(), RegistryError> {
        let name = checked_name(name.into())?;
        if self.rules.contains_key(&name) {
            return Err(RegistryError::AlreadyRegistered(name));
        }
        tracing::debug!(rule = %name, "registered validation rule");
        self.rules.insert(
            name,
            RuleDefinition {
                kind,
                message: message.into(),
            },
        );
        Ok(())
    }

    /// Add or overwrite a rule, returning the previous definition.
    pub fn replace(
        &mut self,
        name: impl Into<String>,
        kind: RuleKind,
        message: impl Into<RuleMessage>,
    ) -> Result<Option<RuleDefinition>, RegistryError> {
        let name = checked_name(name.into())?;
        Ok(self.rules.insert(
            name,
            RuleDefinition {
                kind,
                message: message.into(),
            },
        ))
    }

    pub fn get(&self, name: &str) -> Option<&RuleDefinition> {
        self.rules.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.rules.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.rules.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

fn checked_name(name: String) -> Result<String, RegistryError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(RegistryError::EmptyName);
    }
    if trimmed.contains(['|', ':', ',']) {
        return Err(RegistryError::ReservedCharacter(name));
    }
    Ok(trimmed.to_string())
}
