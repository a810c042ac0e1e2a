use std::any::Any;
use std::fmt;
use std::sync::Arc;

use crate::types::registry::list_item_text;
use crate::types::ty::{ParamType, Type};

// ─── Value ────────────────────────────────────────────────────────────────────

/// A converted argument, ready to be handed to a constructor or setter.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i32),
    Long(i64),
    Float(f32),
    Double(f64),
    Bool(bool),
    Str(String),
    Enum(EnumValue),
    List(Vec<Value>),
    Named(NamedValue),
}

/// A constant of a registered enum.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct EnumValue {
    pub ty:       String,
    pub constant: String,
    pub ordinal:  usize,
}

/// Payload produced by a converter for a user-defined `Type::Named` kind.
/// `text` is the input it was parsed from and doubles as its canonical form.
#[derive(Clone)]
pub struct NamedValue {
    pub ty:   String,
    pub text: String,
    data:     Arc<dyn Any + Send + Sync>,
}

impl NamedValue {
    pub fn new<V: Any + Send + Sync>(ty: impl Into<String>, text: impl Into<String>, data: V) -> Self {
        Self { ty: ty.into(), text: text.into(), data: Arc::new(data) }
    }

    pub fn downcast_ref<V: Any>(&self) -> Option<&V> {
        self.data.downcast_ref::<V>()
    }
}

impl fmt::Debug for NamedValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NamedValue")
            .field("ty", &self.ty)
            .field("text", &self.text)
            .finish_non_exhaustive()
    }
}

impl PartialEq for NamedValue {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && (Arc::ptr_eq(&self.data, &other.data) || self.text == other.text)
    }
}

impl Value {
    pub fn type_name(&self) -> &str {
        match self {
            Value::Int(_)    => "int",
            Value::Long(_)   => "long",
            Value::Float(_)  => "float",
            Value::Double(_) => "double",
            Value::Bool(_)   => "bool",
            Value::Str(_)    => "string",
            Value::Enum(e)   => &e.ty,
            Value::List(_)   => "list",
            Value::Named(n)  => &n.ty,
        }
    }

    /// Runtime type check against a declared parameter type.
    /// Lists check every element against the first element type.
    pub fn matches(&self, expected: &ParamType) -> bool {
        match (self, &expected.ty) {
            (Value::Int(_), Type::Int)
            | (Value::Long(_), Type::Long)
            | (Value::Float(_), Type::Float)
            | (Value::Double(_), Type::Double)
            | (Value::Bool(_), Type::Bool)
            | (Value::Str(_), Type::Str) => true,
            (Value::Enum(e), Type::Enum(name))   => &e.ty == name,
            (Value::Named(n), Type::Named(name)) => &n.ty == name,
            (Value::List(items), Type::List) => match expected.elements.first() {
                Some(elem) => {
                    let inner = ParamType::new(elem.clone(), expected.elements[1..].to_vec());
                    items.iter().all(|v| v.matches(&inner))
                }
                None => items.is_empty(),
            },
            _ => false,
        }
    }

    /// Text that the built-in rules convert back into an equal value.
    pub fn to_text(&self) -> String {
        match self {
            Value::Int(x)    => x.to_string(),
            Value::Long(x)   => x.to_string(),
            Value::Float(x)  => x.to_string(),
            Value::Double(x) => x.to_string(),
            Value::Bool(b)   => b.to_string(),
            Value::Str(s)    => s.clone(),
            Value::Enum(e)   => e.constant.clone(),
            Value::List(items) => {
                let parts: Vec<String> = items.iter()
                    .map(|v| match v {
                        Value::List(_) => v.to_text(),
                        _ => list_item_text(&v.to_text()),
                    })
                    .collect();
                format!("[{}]", parts.join(", "))
            }
            Value::Named(n)  => n.text.clone(),
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────────

    pub fn as_int(&self) -> Option<i32> {
        match self { Value::Int(x) => Some(*x), _ => None }
    }

    pub fn as_long(&self) -> Option<i64> {
        match self { Value::Long(x) => Some(*x), _ => None }
    }

    pub fn as_float(&self) -> Option<f32> {
        match self { Value::Float(x) => Some(*x), _ => None }
    }

    pub fn as_double(&self) -> Option<f64> {
        match self { Value::Double(x) => Some(*x), _ => None }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self { Value::Bool(b) => Some(*b), _ => None }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self { Value::Str(s) => Some(s), _ => None }
    }

    /// Constant name of an enum value.
    pub fn as_enum(&self) -> Option<&str> {
        match self { Value::Enum(e) => Some(&e.constant), _ => None }
    }

    pub fn as_list(&self) -> Option<&[Value]> {
        match self { Value::List(items) => Some(items), _ => None }
    }

    pub fn as_named<V: Any>(&self) -> Option<&V> {
        match self { Value::Named(n) => n.downcast_ref::<V>(), _ => None }
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.to_text())
    }
}
