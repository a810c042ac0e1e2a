//! Catalog introspection: referenced types, merge, choice lookup.

mod common;

use instanceables::{all_referenced_types, merge, ClassInfo, ErrorCode, TypeSet};

fn names(set: &TypeSet) -> Vec<&str> {
    set.iter().collect()
}

#[test]
fn referenced_types_include_ancestors_in_order() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    assert_eq!(names(&catalog.referenced_types()), ["Thermometer", "AnalogSensor", "Sensor", "Camera"]);
}

#[test]
fn referenced_types_across_descriptors() {
    let r = common::registry();
    let cam = common::camera(&r);
    let therm = common::thermometer(&r);
    let set = all_referenced_types([&cam as &dyn ClassInfo, &therm, &cam]);
    assert_eq!(names(&set), ["Camera", "Sensor", "Thermometer", "AnalogSensor"]);
}

#[test]
fn empty_input_gives_empty_set() {
    assert!(all_referenced_types(std::iter::empty()).is_empty());
}

#[test]
fn merge_is_order_preserving_union() {
    let r = common::registry();
    let a = all_referenced_types([&common::camera(&r) as &dyn ClassInfo]);
    let b = common::catalog(&r).referenced_types();
    assert_eq!(names(&merge(&a, &b)), ["Camera", "Sensor", "Thermometer", "AnalogSensor"]);
    assert_eq!(names(&merge(&b, &a)), ["Thermometer", "AnalogSensor", "Sensor", "Camera"]);
}

#[test]
fn parse_looks_up_by_exact_name() {
    let r = common::registry();
    let catalog = common::catalog(&r);
    assert_eq!(catalog.parse("Camera").unwrap().descriptor.class_name(), "Camera");
    assert_eq!(catalog.parse("camera").unwrap_err().code(), ErrorCode::F001);
    assert!(catalog.get("Barometer").is_none());
    assert_eq!(catalog.len(), 2);
}
