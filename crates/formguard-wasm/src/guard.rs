// File: src/guard.rs
// Purpose: `FormGuard` JavaScript class wiring a FormController to DOM events

use crate::bindings::to_js;
use crate::dom::DomForm;
use formguard_form::{
    FieldEvent, FormConfig, FormController, SubmitError, SubmitErrorEvent, SubmitEvent,
};
use std::future::{ready, Ready};
use std::rc::Rc;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::{CustomEvent, CustomEventInit, Event, EventTarget, HtmlFormElement};

pub const SUBMIT_EVENT: &str = "formguard:submit";
pub const ERROR_EVENT: &str = "formguard:error";

const FIELD_SELECTOR: &str = "input, textarea, select";

type Handler = Closure<dyn FnMut(Event)>;

/// Live validation and guarded submission for one `<form>`.
///
/// ```javascript
/// const guard = new FormGuard(document.querySelector('#signup'));
/// form.addEventListener('formguard:submit', (e) => send(e.detail.formData));
/// form.addEventListener('formguard:error', (e) => console.error(e.detail.error));
/// ```
#[wasm_bindgen]
pub struct FormGuard {
    controller: Rc<FormController<DomForm>>,
    handlers: Vec<(EventTarget, &'static str, Handler)>,
}

#[wasm_bindgen]
impl FormGuard {
    /// `config` is optional and uses the same keys as `formguard.toml`.
    #[wasm_bindgen(constructor)]
    pub fn new(form: HtmlFormElement, config: JsValue) -> Result<FormGuard, JsValue> {
        let config: FormConfig = if config.is_undefined() || config.is_null() {
            FormConfig::default()
        } else {
            serde_wasm_bindgen::from_value(config)
                .map_err(|e| JsValue::from_str(&format!("Failed to parse config: {}", e)))?
        };

        let dom = Rc::new(DomForm::new(form.clone(), config.clone()));
        let controller = FormController::new(dom, config)
            .map_err(|e| JsValue::from_str(&e.to_string()))?;

        controller.on_submit(dispatch_submit);
        controller.on_error(dispatch_error);

        let mut guard = FormGuard {
            controller: Rc::new(controller),
            handlers: Vec::new(),
        };
        guard.attach(&form)?;
        Ok(guard)
    }

    /// Validate every field, display the errors and return the result.
    pub fn validate(&self) -> Result<JsValue, JsValue> {
        to_js(&self.controller.validate())
    }

    #[wasm_bindgen(js_name = clearErrors)]
    pub fn clear_errors(&self) {
        self.controller.clear_errors();
    }

    pub fn reset(&self) {
        self.controller.reset();
    }

    #[wasm_bindgen(js_name = isSubmitting)]
    pub fn is_submitting(&self) -> bool {
        self.controller.is_submitting()
    }

    /// Detach every listener. The guard is inert afterwards.
    pub fn destroy(&mut self) {
        self.detach();
    }
}

impl FormGuard {
    fn attach(&mut self, form: &HtmlFormElement) -> Result<(), JsValue> {
        let fields = form.query_selector_all(FIELD_SELECTOR)?;
        for i in 0..fields.length() {
            let Some(node) = fields.item(i) else { continue };
            let target: EventTarget = node.unchecked_into();
            let on_input = field_handler(&self.controller, FieldEvent::Input);
            let on_blur = field_handler(&self.controller, FieldEvent::Blur);
            self.listen(&target, "input", on_input)?;
            self.listen(&target, "blur", on_blur)?;
        }

        let controller = self.controller.clone();
        let on_submit = Closure::<dyn FnMut(Event)>::new(move |event: Event| {
            event.prevent_default();
            let controller = controller.clone();
            wasm_bindgen_futures::spawn_local(async move {
                let outcome = controller.submit().await;
                tracing::trace!(?outcome, "submit handled");
            });
        });
        self.listen(form.as_ref(), "submit", on_submit)
    }

    fn listen(
        &mut self,
        target: &EventTarget,
        kind: &'static str,
        handler: Handler,
    ) -> Result<(), JsValue> {
        target.add_event_listener_with_callback(kind, handler.as_ref().unchecked_ref())?;
        self.handlers.push((target.clone(), kind, handler));
        Ok(())
    }

    fn detach(&mut self) {
        for (target, kind, handler) in self.handlers.drain(..) {
            let _ = target
                .remove_event_listener_with_callback(kind, handler.as_ref().unchecked_ref());
        }
    }
}

impl Drop for FormGuard {
    fn drop(&mut self) {
        self.detach();
    }
}

fn field_handler(controller: &Rc<FormController<DomForm>>, kind: FieldEvent) -> Handler {
    let controller = controller.clone();
    Closure::<dyn FnMut(Event)>::new(move |event: Event| {
        let name = event
            .target()
            .and_then(|t| t.dyn_into::<web_sys::Element>().ok())
            .and_then(|el| el.get_attribute("name"));
        if let Some(name) = name {
            controller.handle_field_event(&name, kind);
        }
    })
}

fn custom_event(kind: &str, detail: &JsValue, cancelable: bool) -> Result<CustomEvent, JsValue> {
    let init = CustomEventInit::new();
    init.set_bubbles(true);
    init.set_cancelable(cancelable);
    init.set_detail(detail);
    CustomEvent::new_with_event_init_dict(kind, &init)
}

/// Re-emit an accepted submission as `formguard:submit`. A page listener
/// calling `preventDefault()` marks the submission handled.
fn dispatch_submit(event: SubmitEvent<DomForm>) -> Ready<Result<(), SubmitError>> {
    ready(dispatch_submit_event(&event).map_err(|e| SubmitError::listener(describe(&e))))
}

fn dispatch_submit_event(event: &SubmitEvent<DomForm>) -> Result<(), JsValue> {
    let detail = js_sys::Object::new();
    js_sys::Reflect::set(&detail, &"formData".into(), &to_js(event.form_data())?)?;

    let custom = custom_event(SUBMIT_EVENT, &detail, true)?;
    let not_cancelled = event.form().element().dispatch_event(&custom)?;
    if !not_cancelled {
        event.prevent_default();
    }
    Ok(())
}

fn dispatch_error(event: &SubmitErrorEvent<DomForm>) {
    let detail = js_sys::Object::new();
    let dispatched = js_sys::Reflect::set(
        &detail,
        &"error".into(),
        &JsValue::from_str(&event.error.to_string()),
    )
    .and_then(|_| custom_event(ERROR_EVENT, &detail, false))
    .and_then(|custom| event.form.element().dispatch_event(&custom));

    if let Err(e) = dispatched {
        tracing::error!(error = %describe(&e), "failed to dispatch error event");
    }
}

fn describe(value: &JsValue) -> String {
    value
        .as_string()
        .or_else(|| {
            value
                .dyn_ref::<js_sys::Error>()
                .map(|e| String::from(e.message()))
        })
        .unwrap_or_else(|| format!("{:?}", value))
}
