//! Headless form tests: selection memory, field kinds, persistence of
//! last-used values and observer notification.

mod common;

use std::sync::Arc;

use common::Sensor;
use instanceables::form::{param_key, selection_key};
use instanceables::{ErrorCode, FieldKind, InstanceForm, Properties, PropertyStore};
use parking_lot::Mutex;

// ─── Selection ───────────────────────────────────────────────────────────────

#[test]
fn selects_first_entry_without_memory() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    let form = InstanceForm::with_registry(&catalog, Properties::new(), &r);
    assert_eq!(form.selected().map(|e| e.name.as_str()), Some("Thermometer"));
    assert_eq!(form.store().get("Sensors.default").as_deref(), Some("Thermometer"));
}

#[test]
fn restores_remembered_selection() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    let mut props = Properties::new();
    props.set(&selection_key("Sensors"), "Camera");
    let form = InstanceForm::with_registry(&catalog, props, &r);
    assert_eq!(form.selected().map(|e| e.name.as_str()), Some("Camera"));
}

#[test]
fn ignores_unknown_remembered_selection() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    let mut props = Properties::new();
    props.set("Sensors.default", "Barometer");
    let form = InstanceForm::with_registry(&catalog, props, &r);
    assert_eq!(form.selected().map(|e| e.name.as_str()), Some("Thermometer"));
}

#[test]
fn select_unknown_choice_fails() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    let mut form = InstanceForm::with_registry(&catalog, Properties::new(), &r);
    let err = form.select("Barometer").unwrap_err();
    assert_eq!(err.code(), ErrorCode::F001);
    assert_eq!(form.selected().map(|e| e.name.as_str()), Some("Thermometer"));
}

// ─── Fields ──────────────────────────────────────────────────────────────────

#[test]
fn field_kinds_follow_parameter_types() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    let mut form = InstanceForm::with_registry(&catalog, Properties::new(), &r);

    let kinds: Vec<&FieldKind> = form.fields().iter().map(|f| &f.kind).collect();
    assert_eq!(kinds, [
        &FieldKind::Text,
        &FieldKind::Choice(vec!["Celsius".into(), "Kelvin".into()]),
        &FieldKind::Text,
    ]);

    form.select("Camera").unwrap();
    assert_eq!(form.fields()[3].kind, FieldKind::Toggle);
    assert_eq!(form.values(), ["front", "30", "[hd]", "true"]);
}

#[test]
fn stored_values_override_defaults() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    let mut props = Properties::new();
    props.set(&param_key("Sensors", "Thermometer", "id"), "12");
    // No longer converts, so the default wins.
    props.set(&param_key("Sensors", "Thermometer", "unit"), "Rankine");
    let form = InstanceForm::with_registry(&catalog, props, &r);
    assert_eq!(form.values(), ["12", "Celsius", "0.5"]);
}

#[test]
fn set_value_out_of_range() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    let mut form = InstanceForm::with_registry(&catalog, Properties::new(), &r);
    assert!(form.set_value(0, "3"));
    assert!(!form.set_value(3, "3"));
}

// ─── Creation ────────────────────────────────────────────────────────────────

#[test]
fn create_persists_values_and_notifies() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    let mut form = InstanceForm::with_registry(&catalog, Properties::new(), &r);

    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    form.subscribe(Arc::new(move |s: &Sensor| sink.lock().push(s.clone())));

    form.set_value(0, "5");
    form.set_value(1, "Kelvin");
    let sensor = form.create_instance().unwrap();

    assert_eq!(seen.lock().as_slice(), [sensor]);
    let store = form.into_store();
    assert_eq!(store.get("Sensors.Thermometer.id").as_deref(), Some("5"));
    assert_eq!(store.get("Sensors.Thermometer.unit").as_deref(), Some("Kelvin"));
    assert_eq!(store.get("Sensors.Thermometer.offset").as_deref(), Some("0.5"));
}

#[test]
fn failed_create_leaves_store_untouched() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    let mut form = InstanceForm::with_registry(&catalog, Properties::new(), &r);
    let calls = Arc::new(Mutex::new(0));
    let c = Arc::clone(&calls);
    form.subscribe(Arc::new(move |_: &Sensor| *c.lock() += 1));

    form.set_value(0, "five");
    let err = form.create_instance().unwrap_err();
    assert_eq!(err.code(), ErrorCode::C001);
    assert_eq!(*calls.lock(), 0);
    assert_eq!(form.store().get("Sensors.Thermometer.id"), None);
}

#[test]
fn disabled_form_refuses_to_create() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    let mut form = InstanceForm::with_registry(&catalog, Properties::new(), &r);
    form.set_enabled(false);
    assert_eq!(form.create_instance().unwrap_err().code(), ErrorCode::F002);
    form.set_enabled(true);
    assert!(form.create_instance().is_ok());
}

#[test]
fn values_survive_a_toml_round_trip() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("sensors.toml");

    let mut form = InstanceForm::with_registry(&catalog, Properties::new(), &r);
    form.select("Camera").unwrap();
    form.set_value(2, "[a, b]");
    form.create_instance().unwrap();
    form.into_store().save(&path).unwrap();

    let form = InstanceForm::with_registry(&catalog, Properties::load(&path).unwrap(), &r);
    assert_eq!(form.selected().map(|e| e.name.as_str()), Some("Camera"));
    assert_eq!(form.values(), ["front", "30", "[a, b]", "true"]);
}
