// File: src/controller.rs
// Purpose: Submission controller - per-field feedback and the Idle/Submitting state machine

use crate::config::FormConfig;
use crate::display;
use crate::element::FormElement;
use crate::error::{ControllerError, SubmitError};
use crate::events::{run_listener, ErrorListener, SubmitErrorEvent, SubmitEvent, SubmitListener};
use formguard_rules::{
    compile_field_rules, FieldResult, FieldRules, FormResult, FormSnapshot, Validator,
};
use std::cell::{Cell, RefCell};
use std::rc::Rc;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ControllerState {
    #[default]
    Idle,
    Submitting,
}

/// Field-level events that trigger real-time validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldEvent {
    /// The value changed
    Input,
    /// The field lost focus
    Blur,
}

/// What happened to one submit attempt.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmitOutcome {
    /// A submission was already running.
    Ignored,
    /// Validation failed; errors are displayed.
    Rejected(FormResult),
    /// Every listener completed.
    Submitted(FormSnapshot),
    /// A listener failed; error listeners were notified.
    Failed(SubmitError),
}

impl SubmitOutcome {
    pub fn is_submitted(&self) -> bool {
        matches!(self, SubmitOutcome::Submitted(_))
    }
}

/// Owns one form's validation and submission lifecycle.
///
/// The controller is single-threaded: it shares the form through `Rc` and
/// keeps its state in cells, so event callbacks can drive it through `&self`.
pub struct FormController<F: FormElement + 'static> {
    form: Rc<F>,
    validator: Validator,
    config: FormConfig,
    rules: FieldRules,
    state: Cell<ControllerState>,
    submit_listeners: RefCell<Vec<Rc<dyn SubmitListener<F>>>>,
    error_listeners: RefCell<Vec<ErrorListener<F>>>,
}

impl<F: FormElement + 'static> FormController<F> {
    /// Controller with the builtin rules.
    pub fn new(form: Rc<F>, config: FormConfig) -> Result<Self, ControllerError> {
        Self::with_validator(form, Validator::default(), config)
    }

    /// Read the form's rule declarations once and compile them.
    ///
    /// Unknown rule names are logged and stay inert, unless
    /// `validation.strict_rules` is set, in which case they are an error.
    pub fn with_validator(
        form: Rc<F>,
        validator: Validator,
        config: FormConfig,
    ) -> Result<Self, ControllerError> {
        let rules = compile_field_rules(form.rule_declarations());

        for (field, rule) in validator.unknown_rules(&rules) {
            if config.validation.strict_rules {
                return Err(ControllerError::UnknownRule {
                    field: field.to_string(),
                    rule: rule.to_string(),
                });
            }
            tracing::warn!(field, rule, "unknown validation rule will be ignored");
        }

        tracing::debug!(
            form = ?form.form_id(),
            fields = rules.len(),
            "form controller ready"
        );

        Ok(Self {
            form,
            validator,
            config,
            rules,
            state: Cell::new(ControllerState::Idle),
            submit_listeners: RefCell::new(Vec::new()),
            error_listeners: RefCell::new(Vec::new()),
        })
    }

    pub fn form(&self) -> &Rc<F> {
        &self.form
    }

    pub fn config(&self) -> &FormConfig {
        &self.config
    }

    pub fn field_rules(&self) -> &FieldRules {
        &self.rules
    }

    pub fn state(&self) -> ControllerState {
        self.state.get()
    }

    pub fn is_submitting(&self) -> bool {
        self.state.get() == ControllerState::Submitting
    }

    /// Register a listener for accepted submissions.
    pub fn on_submit<L>(&self, listener: L)
    where
        L: SubmitListener<F> + 'static,
    {
        self.submit_listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Register a listener for failed submissions.
    pub fn on_error<L>(&self, listener: L)
    where
        L: Fn(&SubmitErrorEvent<F>) + 'static,
    {
        self.error_listeners.borrow_mut().push(Rc::new(listener));
    }

    /// Real-time feedback for one field after an input or blur event.
    ///
    /// Returns `None` when the field has no rules or the event kind is
    /// disabled in the configuration.
    pub fn handle_field_event(&self, field: &str, event: FieldEvent) -> Option<FieldResult> {
        let enabled = match event {
            FieldEvent::Input => self.config.validation.on_input,
            FieldEvent::Blur => self.config.validation.on_blur,
        };
        if !enabled {
            return None;
        }
        self.validate_field(field)
    }

    /// Validate a single field against a fresh snapshot and display the result.
    pub fn validate_field(&self, field: &str) -> Option<FieldResult> {
        let rules = self.rules.get(field)?;
        let snapshot = self.form.snapshot();
        let value = snapshot.get(field).cloned().unwrap_or_default();

        let result = self.validator.validate_field(&value, rules, &snapshot);
        display::show_field_result(&*self.form, &self.config, field, &result);
        Some(result)
    }

    /// Validate every declared field and display every result.
    pub fn validate(&self) -> FormResult {
        let snapshot = self.form.snapshot();
        let result = self.validator.validate_form(&snapshot, &self.rules);
        display::show_form_result(&*self.form, &self.config, &result);
        result
    }

    /// Handle a submit request.
    ///
    /// While a submission is running, further requests are ignored. An invalid
    /// form is rejected and stays idle. A valid form enters `Submitting`, runs
    /// every submit listener in registration order, and returns to `Idle` on
    /// every exit path.
    pub async fn submit(&self) -> SubmitOutcome {
        if self.is_submitting() {
            tracing::debug!(form = ?self.form.form_id(), "submit ignored; already submitting");
            return SubmitOutcome::Ignored;
        }

        let result = self.validate();
        if !result.is_valid {
            tracing::debug!(
                form = ?self.form.form_id(),
                invalid = ?result.invalid_fields(),
                "submit rejected by validation"
            );
            return SubmitOutcome::Rejected(result);
        }

        let _submitting = SubmittingGuard::enter(self);

        let form_data = self.form.snapshot();
        let event = SubmitEvent::new(form_data.clone(), self.form.clone());

        // Listeners may register more listeners; iterate over a copy
        let listeners: Vec<Rc<dyn SubmitListener<F>>> = self.submit_listeners.borrow().clone();
        for listener in listeners {
            if let Err(error) = run_listener(&*listener, event.clone()).await {
                tracing::warn!(form = ?self.form.form_id(), %error, "submission failed");
                self.emit_error(SubmitErrorEvent {
                    error: error.clone(),
                    form_data,
                    form: self.form.clone(),
                });
                return SubmitOutcome::Failed(error);
            }
        }

        if !event.is_default_prevented() {
            tracing::info!(
                form = ?self.form.form_id(),
                data = %form_data.to_json(),
                "form submitted"
            );
        }

        SubmitOutcome::Submitted(form_data)
    }

    /// Clear every error message and invalid marking.
    pub fn clear_errors(&self) {
        display::clear_all(&*self.form);
    }

    /// Restore initial values and clear every error.
    pub fn reset(&self) {
        self.form.reset_values();
        self.clear_errors();
    }

    fn emit_error(&self, event: SubmitErrorEvent<F>) {
        let listeners: Vec<ErrorListener<F>> = self.error_listeners.borrow().clone();
        for listener in listeners {
            listener(&event);
        }
    }
}

/// Holds the controller in `Submitting`. Dropping it, on any path, restores
/// `Idle`, re-enables the submit control and puts its label back.
struct SubmittingGuard<'a, F: FormElement + 'static> {
    controller: &'a FormController<F>,
    original_label: Option<String>,
}

impl<'a, F: FormElement + 'static> SubmittingGuard<'a, F> {
    fn enter(controller: &'a FormController<F>) -> Self {
        controller.state.set(ControllerState::Submitting);

        let form = &controller.form;
        let original_label = form.submit_label();
        form.set_submit_enabled(false);
        form.set_submit_label(&controller.config.submit.submitting_label);

        Self {
            controller,
            original_label,
        }
    }
}

impl<F: FormElement + 'static> Drop for SubmittingGuard<'_, F> {
    fn drop(&mut self) {
        let form = &self.controller.form;
        if let Some(label) = &self.original_label {
            form.set_submit_label(label);
        }
        form.set_submit_enabled(true);
        self.controller.state.set(ControllerState::Idle);
    }
}
