use crate::descriptor::class::SetterFn;
use crate::error::ConversionError;
use crate::runtime::value::Value;
use crate::types::registry::ConverterRegistry;
use crate::types::ty::{ParamType, Type};

// ─── ParameterDescriptor ──────────────────────────────────────────────────────

/// One constructor parameter: its declared type, a label shown to users and
/// used as persistence key, and a default as text.
#[derive(Debug, Clone, PartialEq)]
pub struct ParameterDescriptor {
    pub ty:      ParamType,
    pub label:   String,
    pub default: String,
}

impl ParameterDescriptor {
    pub fn new(ty: Type, label: impl Into<String>, default: impl Into<String>) -> Self {
        Self { ty: ParamType::simple(ty), label: label.into(), default: default.into() }
    }

    /// A parameterized target, e.g. `list` with elements `[int]`.
    pub fn generic(ty: Type, elements: Vec<Type>, label: impl Into<String>, default: impl Into<String>) -> Self {
        Self { ty: ParamType::new(ty, elements), label: label.into(), default: default.into() }
    }

    pub fn parse_with(&self, registry: &ConverterRegistry, text: &str) -> Result<Value, ConversionError> {
        registry.convert_param(&self.ty, text)
    }

    pub fn parse(&self, text: &str) -> Result<Value, ConversionError> {
        self.parse_with(ConverterRegistry::global(), text)
    }

    pub fn parse_default_with(&self, registry: &ConverterRegistry) -> Result<Value, ConversionError> {
        self.parse_with(registry, &self.default)
    }
}

// ─── SetterDescriptor ─────────────────────────────────────────────────────────

/// A parameter applied after construction. `apply` is typed on the owner,
/// so it can only ever run on instances of the type it was declared for.
pub struct SetterDescriptor<T> {
    pub param: ParameterDescriptor,
    pub apply: SetterFn<T>,
}

impl<T> SetterDescriptor<T> {
    pub fn new(ty: Type, label: impl Into<String>, default: impl Into<String>, apply: SetterFn<T>) -> Self {
        Self { param: ParameterDescriptor::new(ty, label, default), apply }
    }

    pub fn generic(
        ty: Type,
        elements: Vec<Type>,
        label: impl Into<String>,
        default: impl Into<String>,
        apply: SetterFn<T>,
    ) -> Self {
        Self { param: ParameterDescriptor::generic(ty, elements, label, default), apply }
    }

    pub fn label(&self) -> &str { &self.param.label }
}

impl<T> std::fmt::Debug for SetterDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SetterDescriptor").field("param", &self.param).finish_non_exhaustive()
    }
}
