//! # formguard
//!
//! Declarative form validation: fields declare rules in markup
//! (`data-validate="required|email"`), errors show up while the user types,
//! and submission is guarded so a form is never sent twice or sent invalid.
//!
//! ## Quick Start
//!
//! ```rust
//! # #[cfg(feature = "form")] {
//! use formguard::form::{FormConfig, FormController, MemoryField, MemoryForm};
//! use std::rc::Rc;
//!
//! let form = Rc::new(
//!     MemoryForm::new()
//!         .field(MemoryField::new("email").rules("required|email").value("ada@example.com"))
//!         .field(MemoryField::new("age").rules("required|integer|min:18").value("36")),
//! );
//! let controller = FormController::new(form, FormConfig::default()).unwrap();
//! assert!(controller.validate().is_valid);
//! # }
//! ```
//!
//! ## Features
//!
//! - **`default`** - The rule engine and the submission controller
//! - **`form`** - The submission controller (`formguard-form`)
//! - **`full`** - All features enabled
//!
//! ## Architecture
//!
//! This crate is a convenience wrapper that re-exports its component crates:
//!
//! - **`formguard-rules`** - Rule registry, rule parser and the pure validators
//! - **`formguard-form`** - Submission controller, configuration, events
//! - **`formguard-wasm`** - Browser bindings (built separately with wasm-pack)

#![doc(html_root_url = "https://docs.rs/formguard/0.1.0")]

// Rule engine (always available)
pub use formguard_rules::{
    parse_rules, validate_field, validate_form, FieldResult, FieldRules, FieldValue, FormResult,
    FormSnapshot, RuleDefinition, RuleKind, RuleMessage, RuleParam, RuleRegistry, RuleSpec,
    Validator,
};

pub use formguard_rules as rules;

// Submission controller (if feature enabled)
#[cfg(feature = "form")]
pub use formguard_form as form;

#[cfg(feature = "form")]
pub use formguard_form::{FormConfig, FormController, SubmitOutcome};
