// File: src/events.rs
// Purpose: Submit success/error events and their listeners

use crate::error::SubmitError;
use formguard_rules::FormSnapshot;
use futures::future::LocalBoxFuture;
use futures::FutureExt;
use std::cell::Cell;
use std::fmt;
use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::rc::Rc;

/// Emitted once per accepted submission, carrying the extracted form data.
///
/// Every listener receives a clone; they share the default-prevented flag.
pub struct SubmitEvent<F> {
    form_data: FormSnapshot,
    form: Rc<F>,
    default_prevented: Rc<Cell<bool>>,
}

impl<F> SubmitEvent<F> {
    pub(crate) fn new(form_data: FormSnapshot, form: Rc<F>) -> Self {
        Self {
            form_data,
            form,
            default_prevented: Rc::new(Cell::new(false)),
        }
    }

    pub fn form_data(&self) -> &FormSnapshot {
        &self.form_data
    }

    /// The form that was submitted.
    pub fn form(&self) -> &Rc<F> {
        &self.form
    }

    /// Mark the submission as handled; the controller then skips its default
    /// handling (logging the submitted data).
    pub fn prevent_default(&self) {
        self.default_prevented.set(true);
    }

    pub fn is_default_prevented(&self) -> bool {
        self.default_prevented.get()
    }
}

impl<F> Clone for SubmitEvent<F> {
    fn clone(&self) -> Self {
        Self {
            form_data: self.form_data.clone(),
            form: self.form.clone(),
            default_prevented: self.default_prevented.clone(),
        }
    }
}

impl<F> fmt::Debug for SubmitEvent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitEvent")
            .field("form_data", &self.form_data)
            .field("default_prevented", &self.default_prevented.get())
            .finish()
    }
}

/// Emitted when a submit listener fails.
pub struct SubmitErrorEvent<F> {
    pub error: SubmitError,
    pub form_data: FormSnapshot,
    pub form: Rc<F>,
}

impl<F> fmt::Debug for SubmitErrorEvent<F> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SubmitErrorEvent")
            .field("error", &self.error)
            .field("form_data", &self.form_data)
            .finish()
    }
}

pub type ListenerFuture = LocalBoxFuture<'static, Result<(), SubmitError>>;

/// Receives accepted submissions. Implemented for any
/// `Fn(SubmitEvent<F>) -> impl Future<Output = Result<(), SubmitError>>`.
pub trait SubmitListener<F> {
    fn on_submit(&self, event: SubmitEvent<F>) -> ListenerFuture;
}

impl<F, L, Fut> SubmitListener<F> for L
where
    L: Fn(SubmitEvent<F>) -> Fut,
    Fut: Future<Output = Result<(), SubmitError>> + 'static,
{
    fn on_submit(&self, event: SubmitEvent<F>) -> ListenerFuture {
        self(event).boxed_local()
    }
}

pub type ErrorListener<F> = Rc<dyn Fn(&SubmitErrorEvent<F>)>;

/// Run one listener to completion, turning a panic into a [`SubmitError`].
pub(crate) async fn run_listener<F>(
    listener: &dyn SubmitListener<F>,
    event: SubmitEvent<F>,
) -> Result<(), SubmitError> {
    let future = match std::panic::catch_unwind(AssertUnwindSafe(|| listener.on_submit(event))) {
        Ok(future) => future,
        Err(payload) => return Err(SubmitError::Panicked(panic_message(payload))),
    };

    match AssertUnwindSafe(future).catch_unwind().await {
        Ok(result) => result,
        Err(payload) => Err(SubmitError::Panicked(panic_message(payload))),
    }
}

fn panic_message(payload: Box<dyn std::any::Any + Send>) -> String {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s.to_string()
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic".to_string()
    }
}
