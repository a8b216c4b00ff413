//! formguard WASM
//!
//! WebAssembly bindings for formguard.
//! Exposes the pure validators to JavaScript and, in the browser, the
//! `FormGuard` class that drives a live `<form>` with the same controller used
//! server-side.

mod bindings;

#[cfg(target_arch = "wasm32")]
mod dom;
#[cfg(target_arch = "wasm32")]
mod guard;
#[cfg(target_arch = "wasm32")]
mod logging;

pub use bindings::{
    check_field, check_form, parse_rules_js, rule_names, validate_field, validate_form,
    FormRulesInput, RuleItem, RulesInput,
};

#[cfg(target_arch = "wasm32")]
pub use dom::DomForm;
#[cfg(target_arch = "wasm32")]
pub use guard::{FormGuard, ERROR_EVENT, SUBMIT_EVENT};
#[cfg(target_arch = "wasm32")]
pub use logging::{init_logging, ConsoleMakeWriter};

use wasm_bindgen::prelude::*;

/// Set the panic hook and route `tracing` output to the browser console
#[wasm_bindgen(start)]
pub fn init() {
    #[cfg(feature = "console_error_panic_hook")]
    console_error_panic_hook::set_once();

    #[cfg(target_arch = "wasm32")]
    init_logging(tracing::Level::INFO);
}
