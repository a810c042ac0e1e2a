//! Sensor catalog shared by the integration tests.

#![allow(dead_code)]

use instanceables::{
    BoxError, Catalog, ClassDesc, ConverterRegistry, EnumDesc, InstantiationDescriptor,
    ParameterDescriptor, SetterDescriptor, Type, Value,
};

#[derive(Debug, Clone, PartialEq)]
pub enum Unit { Celsius, Kelvin }

#[derive(Debug, Clone, PartialEq)]
pub enum Sensor {
    Thermometer { id: i32, unit: Unit, offset: f64 },
    Camera { name: String, fps: f64, tags: Vec<String>, enabled: bool },
}

pub fn registry() -> ConverterRegistry {
    let mut r = ConverterRegistry::default();
    r.register_enum(EnumDesc::new("Unit", &["Celsius", "Kelvin"]));
    r
}

fn thermometer_class() -> ClassDesc<Sensor> {
    ClassDesc::new("Thermometer")
        .extends("AnalogSensor")
        .extends("Sensor")
        .constructor(vec![Type::Int.into(), Type::enumeration("Unit").into()], |args| {
            let id = args[0].as_int().ok_or("id")?;
            let unit = match args[1].as_enum() {
                Some("Celsius") => Unit::Celsius,
                Some("Kelvin") => Unit::Kelvin,
                other => return Err(format!("unknown unit {other:?}").into()),
            };
            Ok(Sensor::Thermometer { id, unit, offset: 0.0 })
        })
}

fn camera_class() -> ClassDesc<Sensor> {
    ClassDesc::new("Camera")
        .extends("Sensor")
        .constructor(vec![Type::Str.into(), Type::Double.into()], |args| {
            let name = args[0].as_str().ok_or("name")?.to_string();
            let fps = args[1].as_double().ok_or("fps")?;
            if fps <= 0.0 {
                return Err("fps must be positive".into());
            }
            Ok(Sensor::Camera { name, fps, tags: vec![], enabled: false })
        })
}

fn set_offset(s: &mut Sensor, v: &Value) -> Result<(), BoxError> {
    let Sensor::Thermometer { offset, .. } = s else { unreachable!() };
    *offset = v.as_double().ok_or("offset")?;
    Ok(())
}

fn set_tags(s: &mut Sensor, v: &Value) -> Result<(), BoxError> {
    let Sensor::Camera { tags, .. } = s else { unreachable!() };
    *tags = v.as_list().ok_or("tags")?
        .iter()
        .filter_map(|t| t.as_str().map(str::to_string))
        .collect();
    Ok(())
}

fn set_enabled(s: &mut Sensor, v: &Value) -> Result<(), BoxError> {
    let Sensor::Camera { enabled, .. } = s else { unreachable!() };
    *enabled = v.as_bool().ok_or("enabled")?;
    Ok(())
}

pub fn thermometer(r: &ConverterRegistry) -> InstantiationDescriptor<Sensor> {
    InstantiationDescriptor::builder(thermometer_class())
        .param(ParameterDescriptor::new(Type::Int, "id", "1"))
        .param(ParameterDescriptor::new(Type::enumeration("Unit"), "unit", "Celsius"))
        .setter(SetterDescriptor::new(Type::Double, "offset", "0.5", set_offset))
        .build_with(r)
        .expect("thermometer descriptor")
}

pub fn camera(r: &ConverterRegistry) -> InstantiationDescriptor<Sensor> {
    InstantiationDescriptor::builder(camera_class())
        .param(ParameterDescriptor::new(Type::Str, "name", "front"))
        .param(ParameterDescriptor::new(Type::Double, "fps", "30"))
        .setter(SetterDescriptor::generic(Type::List, vec![Type::Str], "tags", "[hd]", set_tags))
        .setter(SetterDescriptor::new(Type::Bool, "enabled", "true", set_enabled))
        .build_with(r)
        .expect("camera descriptor")
}

pub fn catalog(r: &ConverterRegistry) -> Catalog<Sensor> {
    Catalog::new("Sensors")
        .with("Thermometer", thermometer(r))
        .with("Camera", camera(r))
}
