// File: src/error.rs
// Purpose: Errors raised by registry misuse

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RegistryError {
    /// `register` never overwrites; use `RuleRegistry::replace` for that.
    #[error("rule `{0}` is already registered")]
    AlreadyRegistered(String),

    #[error("rule name must not be empty")]
    EmptyName,

    /// Rule names may not contain the grammar's separators.
    #[error("rule name `{0}` contains a reserved character (`|`, `:` or `,`)")]
    ReservedCharacter(String),
}
