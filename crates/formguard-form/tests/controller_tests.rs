// Submission controller behaviour against an in-memory form

use formguard_form::{
    ControllerError, ControllerState, ErrorSlot, FieldEvent, FormConfig, FormController,
    FormElement, MemoryField, MemoryForm, SubmitError, SubmitErrorEvent, SubmitEvent,
    SubmitOutcome,
};
use formguard_form::rules::FieldValue;
use futures::channel::oneshot;
use futures::executor::block_on;
use futures::future::{ready, Ready};
use pretty_assertions::assert_eq;
use rstest::rstest;
use std::cell::{Cell, RefCell};
use std::future::Future;
use std::rc::Rc;

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn signup_form() -> MemoryForm {
    MemoryForm::new()
        .with_id("signup")
        .field(MemoryField::new("email").id("signup-email").rules("required|email"))
        .field(MemoryField::new("password").rules("required|minLength:8"))
        .field(MemoryField::new("confirm").rules("required|match:password"))
        .field(MemoryField::new("newsletter"))
        .error_slot(ErrorSlot::ElementId("signup-email-error".to_string()))
        .error_slot(ErrorSlot::ElementId("password-error".to_string()))
        .error_slot(ErrorSlot::ForField("confirm".to_string()))
        .submit_button("Create account")
}

fn fill_valid(form: &MemoryForm) {
    form.set_value("email", "ada@example.com");
    form.set_value("password", "analytical");
    form.set_value("confirm", "analytical");
}

fn new_controller(form: MemoryForm) -> FormController<MemoryForm> {
    init_tracing();
    FormController::new(Rc::new(form), FormConfig::default()).unwrap()
}

fn counting_listener(
    count: Rc<Cell<usize>>,
) -> impl Fn(SubmitEvent<MemoryForm>) -> Ready<Result<(), SubmitError>> {
    move |_event| {
        count.set(count.get() + 1);
        ready(Ok(()))
    }
}

fn assert_idle(controller: &FormController<MemoryForm>) {
    assert_eq!(controller.state(), ControllerState::Idle);
    assert!(!controller.is_submitting());
    assert!(controller.form().is_submit_enabled());
    assert_eq!(
        controller.form().current_submit_label().as_deref(),
        Some("Create account")
    );
}

#[test]
fn rules_are_compiled_once_in_document_order() {
    let controller = new_controller(signup_form());
    let fields: Vec<&str> = controller.field_rules().field_names().collect();
    assert_eq!(fields, vec!["email", "password", "confirm"]);
}

#[test]
fn field_event_validates_only_that_field() {
    let controller = new_controller(signup_form());
    let form = controller.form().clone();
    form.set_value("email", "nope");

    let result = controller
        .handle_field_event("email", FieldEvent::Input)
        .unwrap();
    assert_eq!(
        result.errors,
        vec!["Please enter a valid email address".to_string()]
    );
    assert!(form.is_invalid("email"));
    assert!(!form.is_invalid("password"));
    assert_eq!(
        form.error_text(&ErrorSlot::ElementId("signup-email-error".to_string())),
        Some("Please enter a valid email address".to_string())
    );
    assert_eq!(
        form.error_text(&ErrorSlot::ElementId("password-error".to_string())),
        None
    );
}

#[test]
fn fixing_a_field_clears_its_error() {
    let controller = new_controller(signup_form());
    let form = controller.form().clone();
    let slot = ErrorSlot::ElementId("password-error".to_string());

    form.set_value("password", "short");
    controller.handle_field_event("password", FieldEvent::Blur);
    assert_eq!(
        form.error_text(&slot),
        Some("Must be at least 8 characters".to_string())
    );

    form.set_value("password", "long enough");
    let result = controller
        .handle_field_event("password", FieldEvent::Input)
        .unwrap();
    assert!(result.is_valid);
    assert_eq!(form.error_text(&slot), None);
    assert!(!form.is_invalid("password"));
}

#[test]
fn field_events_are_idempotent() {
    let controller = new_controller(signup_form());
    controller.form().set_value("confirm", "x");
    let first = controller.handle_field_event("confirm", FieldEvent::Input);
    let second = controller.handle_field_event("confirm", FieldEvent::Input);
    assert_eq!(first, second);
}

#[test]
fn field_without_rules_is_left_alone() {
    let controller = new_controller(signup_form());
    assert_eq!(
        controller.handle_field_event("newsletter", FieldEvent::Blur),
        None
    );
    assert!(!controller.form().is_invalid("newsletter"));
}

#[rstest]
#[case(true, true, FieldEvent::Input, true)]
#[case(false, true, FieldEvent::Input, false)]
#[case(false, true, FieldEvent::Blur, true)]
#[case(true, false, FieldEvent::Blur, false)]
#[case(true, false, FieldEvent::Input, true)]
fn event_kinds_follow_configuration(
    #[case] on_input: bool,
    #[case] on_blur: bool,
    #[case] event: FieldEvent,
    #[case] validated: bool,
) {
    let mut config = FormConfig::default();
    config.validation.on_input = on_input;
    config.validation.on_blur = on_blur;
    let controller = FormController::new(Rc::new(signup_form()), config).unwrap();

    assert_eq!(controller.handle_field_event("email", event).is_some(), validated);
    assert_eq!(controller.form().is_invalid("email"), validated);
}

#[test]
fn explicit_error_slot_wins_over_id_convention() {
    let form = MemoryForm::new()
        .field(MemoryField::new("name").id("name").rules("required"))
        .error_slot(ErrorSlot::ElementId("name-error".to_string()))
        .error_slot(ErrorSlot::ForField("name".to_string()));
    let controller = new_controller(form);

    controller.validate();
    let form = controller.form();
    assert_eq!(
        form.error_text(&ErrorSlot::ForField("name".to_string())),
        Some("This field is required".to_string())
    );
    assert_eq!(
        form.error_text(&ErrorSlot::ElementId("name-error".to_string())),
        None
    );
}

#[test]
fn invalid_submit_is_rejected_and_stays_idle() {
    let controller = new_controller(signup_form());
    let emitted = Rc::new(Cell::new(0));
    controller.on_submit(counting_listener(emitted.clone()));

    let outcome = block_on(controller.submit());
    match outcome {
        SubmitOutcome::Rejected(result) => {
            assert_eq!(result.invalid_fields(), vec!["email", "password", "confirm"]);
        }
        other => panic!("expected rejection, got {:?}", other),
    }
    assert_eq!(emitted.get(), 0);
    assert_idle(&controller);
    assert!(controller.form().is_invalid("email"));
}

#[test]
fn valid_submit_emits_form_data_once() {
    let controller = new_controller(signup_form());
    fill_valid(controller.form());
    controller.form().set_value("newsletter", vec!["weekly", "offers"]);

    let seen = Rc::new(RefCell::new(None));
    let seen_in_listener = seen.clone();
    controller.on_submit(move |event: SubmitEvent<MemoryForm>| {
        assert!(event.form().form_id().is_some());
        *seen_in_listener.borrow_mut() = Some(event.form_data().clone());
        ready(Ok::<(), SubmitError>(()))
    });

    let outcome = block_on(controller.submit());
    assert!(outcome.is_submitted());

    let data = seen.borrow().clone().unwrap();
    assert_eq!(data.text("email"), "ada@example.com");
    assert_eq!(
        data.get("newsletter"),
        Some(&FieldValue::from(vec!["weekly", "offers"]))
    );
    assert_idle(&controller);
}

#[test]
fn submit_state_is_visible_while_listeners_run() {
    let controller = Rc::new(new_controller(signup_form()));
    fill_valid(controller.form());

    let observed = Rc::new(RefCell::new(Vec::new()));
    let observer = observed.clone();
    let weak = Rc::downgrade(&controller);
    controller.on_submit(move |event: SubmitEvent<MemoryForm>| {
        if let Some(controller) = weak.upgrade() {
            observer.borrow_mut().push((
                controller.state(),
                event.form().is_submit_enabled(),
                event.form().current_submit_label(),
            ));
        }
        ready(Ok::<(), SubmitError>(()))
    });

    block_on(controller.submit());
    assert_eq!(
        observed.borrow().clone(),
        vec![(
            ControllerState::Submitting,
            false,
            Some("Submitting...".to_string())
        )]
    );
    assert_idle(&controller);
}

#[test]
fn rapid_double_submit_emits_once() {
    let controller = new_controller(signup_form());
    fill_valid(controller.form());

    let emitted = Rc::new(Cell::new(0));
    let (release, gate) = oneshot::channel::<()>();
    let gate = RefCell::new(Some(gate));
    let counter = emitted.clone();
    controller.on_submit(move |_event: SubmitEvent<MemoryForm>| {
        counter.set(counter.get() + 1);
        let gate = gate.borrow_mut().take();
        async move {
            if let Some(gate) = gate {
                let _ = gate.await;
            }
            Ok::<(), SubmitError>(())
        }
    });

    let controller_ref = &controller;
    let (first, second) = block_on(async move {
        let first = controller_ref.submit();
        let second = async move {
            // The first submission is parked inside its listener
            assert!(controller_ref.is_submitting());
            let outcome = controller_ref.submit().await;
            let _ = release.send(());
            outcome
        };
        futures::join!(first, second)
    });

    assert!(first.is_submitted());
    assert_eq!(second, SubmitOutcome::Ignored);
    assert_eq!(emitted.get(), 1);
    assert_idle(&controller);
}

#[test]
fn listener_error_is_reported_and_returns_to_idle() {
    let controller = new_controller(signup_form());
    fill_valid(controller.form());

    controller.on_submit(|_event: SubmitEvent<MemoryForm>| async {
        Err::<(), SubmitError>(anyhow::anyhow!("server returned 503").into())
    });

    let reported = Rc::new(RefCell::new(Vec::new()));
    let sink = reported.clone();
    controller.on_error(move |event: &SubmitErrorEvent<MemoryForm>| {
        sink.borrow_mut().push(event.error.to_string());
    });

    let outcome = block_on(controller.submit());
    assert_eq!(
        outcome,
        SubmitOutcome::Failed(SubmitError::Listener("server returned 503".to_string()))
    );
    assert_eq!(
        reported.borrow().clone(),
        vec!["submit listener failed: server returned 503".to_string()]
    );
    assert_idle(&controller);
}

#[test]
fn later_listeners_do_not_run_after_a_failure() {
    let controller = new_controller(signup_form());
    fill_valid(controller.form());
    let emitted = Rc::new(Cell::new(0));

    controller.on_submit(|_event: SubmitEvent<MemoryForm>| {
        ready(Err::<(), SubmitError>(SubmitError::listener("offline")))
    });
    controller.on_submit(counting_listener(emitted.clone()));

    assert!(matches!(
        block_on(controller.submit()),
        SubmitOutcome::Failed(_)
    ));
    assert_eq!(emitted.get(), 0);
}

#[test]
fn panicking_listener_still_returns_to_idle() {
    let controller = new_controller(signup_form());
    fill_valid(controller.form());

    controller.on_submit(
        |_event: SubmitEvent<MemoryForm>| -> Ready<Result<(), SubmitError>> {
            panic!("listener bug")
        },
    );

    let outcome = block_on(controller.submit());
    assert_eq!(
        outcome,
        SubmitOutcome::Failed(SubmitError::Panicked("listener bug".to_string()))
    );
    assert_idle(&controller);
}

#[test]
fn panic_inside_listener_future_still_returns_to_idle() {
    let controller = new_controller(signup_form());
    fill_valid(controller.form());
    let explode = Rc::new(Cell::new(true));

    let flag = explode.clone();
    controller.on_submit(move |_event: SubmitEvent<MemoryForm>| {
        let explode = flag.get();
        async move {
            if explode {
                panic!("async listener bug");
            }
            Ok::<(), SubmitError>(())
        }
    });

    assert!(matches!(
        block_on(controller.submit()),
        SubmitOutcome::Failed(SubmitError::Panicked(_))
    ));
    assert_idle(&controller);

    // A later attempt goes through
    explode.set(false);
    assert!(block_on(controller.submit()).is_submitted());
}

#[test]
fn dropped_submission_returns_to_idle() {
    let controller = new_controller(signup_form());
    fill_valid(controller.form());
    controller.on_submit(|_event: SubmitEvent<MemoryForm>| {
        futures::future::pending::<Result<(), SubmitError>>()
    });

    {
        let mut submission = Box::pin(controller.submit());
        let waker = futures::task::noop_waker();
        let mut cx = std::task::Context::from_waker(&waker);
        assert!(submission.as_mut().poll(&mut cx).is_pending());
        assert!(controller.is_submitting());
    }

    assert_idle(&controller);
}

#[test]
fn prevent_default_is_shared_between_listeners() {
    let controller = new_controller(signup_form());
    fill_valid(controller.form());

    let saw_prevented = Rc::new(Cell::new(false));
    controller.on_submit(|event: SubmitEvent<MemoryForm>| {
        event.prevent_default();
        ready(Ok::<(), SubmitError>(()))
    });
    let flag = saw_prevented.clone();
    controller.on_submit(move |event: SubmitEvent<MemoryForm>| {
        flag.set(event.is_default_prevented());
        ready(Ok::<(), SubmitError>(()))
    });

    assert!(block_on(controller.submit()).is_submitted());
    assert!(saw_prevented.get());
}

#[test]
fn clear_errors_restores_pristine_state() {
    let controller = new_controller(signup_form());
    controller.validate();
    let form = controller.form().clone();
    assert!(form.is_invalid("email"));

    controller.clear_errors();
    for field in ["email", "password", "confirm", "newsletter"] {
        assert!(!form.is_invalid(field), "{} still invalid", field);
    }
    for slot in form.error_slots() {
        assert_eq!(form.error_text(&slot), None);
    }
}

#[test]
fn reset_restores_values_and_clears_errors() {
    let form = signup_form().field(MemoryField::new("nickname").rules("alpha").value("Ada"));
    let controller = new_controller(form);
    let form = controller.form().clone();

    form.set_value("nickname", "4da");
    assert!(!controller.validate_field("nickname").unwrap().is_valid);
    assert!(form.is_invalid("nickname"));

    controller.reset();
    assert_eq!(form.value("nickname"), Some(FieldValue::from("Ada")));
    assert!(!form.is_invalid("nickname"));
}

#[test]
fn unknown_rules_are_ignored_by_default() {
    let form = MemoryForm::new().field(MemoryField::new("name").rules("requird|alpha").value("Ada"));
    let controller = new_controller(form);
    assert!(controller.validate().is_valid);
}

#[test]
fn strict_mode_rejects_unknown_rules() {
    let form = MemoryForm::new().field(MemoryField::new("name").rules("required|emial"));
    let mut config = FormConfig::default();
    config.validation.strict_rules = true;

    let err = FormController::new(Rc::new(form), config).err().unwrap();
    assert_eq!(
        err,
        ControllerError::UnknownRule {
            field: "name".to_string(),
            rule: "emial".to_string(),
        }
    );
}

#[test]
fn message_overrides_from_markup() {
    let form = MemoryForm::new()
        .field(
            MemoryField::new("age")
                .rules("required|min:18")
                .message("min", "You must be an adult")
                .value("12"),
        )
        .error_slot(ErrorSlot::ElementId("age-error".to_string()));
    let controller = new_controller(form);

    controller.validate();
    assert_eq!(
        controller
            .form()
            .error_text(&ErrorSlot::ElementId("age-error".to_string())),
        Some("You must be an adult".to_string())
    );
}
