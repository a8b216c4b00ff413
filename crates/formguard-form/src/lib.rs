//! formguard form controller
//!
//! Binds declarative rules to a live form:
//!
//! - real-time feedback: each input/blur re-validates only the field that changed
//! - a two-state submit machine (`Idle`, `Submitting`) that ignores re-entrant
//!   submits and always returns to `Idle`
//! - submit success/error events with any number of listeners
//!
//! The controller talks to the form only through [`FormElement`], so the same
//! code drives a browser form (see `formguard-wasm`) or a [`MemoryForm`].
//!
//! ```
//! use formguard_form::{FormConfig, FormController, MemoryField, MemoryForm};
//! use std::rc::Rc;
//!
//! let form = Rc::new(
//!     MemoryForm::new().field(MemoryField::new("email").rules("required|email").value("a@b.com")),
//! );
//! let controller = FormController::new(form, FormConfig::default()).unwrap();
//! let outcome = futures::executor::block_on(controller.submit());
//! assert!(outcome.is_submitted());
//! assert!(!controller.is_submitting());
//! ```

pub mod config;
pub mod controller;
pub mod display;
pub mod element;
pub mod error;
pub mod events;
pub mod memory;

pub use config::{FormConfig, MarkupConfig, SubmitConfig, ValidationConfig};
pub use controller::{ControllerState, FieldEvent, FormController, SubmitOutcome};
pub use element::{ErrorSlot, FormElement};
pub use error::{ControllerError, SubmitError};
pub use events::{ListenerFuture, SubmitErrorEvent, SubmitEvent, SubmitListener};
pub use memory::{MemoryField, MemoryForm};

// Re-export the rule engine so users need a single dependency
pub use formguard_rules as rules;
