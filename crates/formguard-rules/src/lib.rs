//! formguard rules
//!
//! Pure validation core for declarative form rules. Fields declare their rules
//! in markup with a compact grammar:
//!
//! ```text
//! required|email
//! required|minLength:8|maxLength:64
//! match:password
//! ```
//!
//! The pieces, leaves first:
//!
//! - [`RuleRegistry`] - named predicates and their messages, open to runtime extension
//! - [`parse_rules`] - compiles a rule string into [`RuleSpec`]s
//! - [`Validator::validate_field`] - runs one value through its rules
//! - [`Validator::validate_form`] - runs every declared field of a [`FormSnapshot`]
//!
//! Nothing in this crate touches the DOM, so everything here can be tested
//! (and reused server-side) on its own.
//!
//! ```
//! use formguard_rules::{parse_rules, validate_field, FieldValue, FormSnapshot};
//!
//! let rules = parse_rules("required|email");
//! let result = validate_field(&FieldValue::from("a@b.com"), &rules, &FormSnapshot::new());
//! assert!(result.is_valid);
//! ```

pub mod builtins;
pub mod error;
pub mod parser;
pub mod registry;
pub mod result;
pub mod rule;
pub mod validator;
pub mod value;

pub use error::RegistryError;
pub use parser::{compile_field_rules, parse_rules, RuleDeclaration};
pub use registry::{
    MessageFn, PredicateFactory, RuleDefinition, RuleKind, RuleMessage, RuleRegistry,
    ValuePredicate,
};
pub use result::{FieldResult, FormResult};
pub use rule::{FieldRules, RuleParam, RuleSpec};
pub use validator::{validate_field, validate_form, Validator};
pub use value::{FieldValue, FormSnapshot};
