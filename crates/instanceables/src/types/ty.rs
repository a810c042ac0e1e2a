//! Declared parameter types.
//!
//! A closed set of value kinds replaces runtime class objects. `Named` is the
//! extension point: any user-defined kind, converted only by rules registered
//! in the [`ConverterRegistry`](super::registry::ConverterRegistry).

use std::fmt;

// ─── Type ─────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Type {
    /// 32-bit signed integer.
    Int,
    /// 64-bit signed integer.
    Long,
    /// 32-bit float.
    Float,
    /// 64-bit float.
    Double,
    Bool,
    Str,
    /// Enumerated type, identified by the name it was registered under.
    Enum(String),
    /// Ordered collection. Its element type lives in `ParamType::elements`.
    List,
    /// User-defined kind, identified by name.
    Named(String),
}

impl Type {
    pub fn enumeration(name: impl Into<String>) -> Self { Type::Enum(name.into()) }
    pub fn named(name: impl Into<String>) -> Self { Type::Named(name.into()) }

    pub fn name(&self) -> &str {
        match self {
            Type::Int        => "int",
            Type::Long       => "long",
            Type::Float      => "float",
            Type::Double     => "double",
            Type::Bool       => "bool",
            Type::Str        => "string",
            Type::Enum(n)    => n,
            Type::List       => "list",
            Type::Named(n)   => n,
        }
    }
}

impl fmt::Display for Type {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ─── ParamType ────────────────────────────────────────────────────────────────

/// A type together with its element types, e.g. `list<int>`.
/// `elements` is empty for non-parameterized types.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ParamType {
    pub ty:       Type,
    pub elements: Vec<Type>,
}

impl ParamType {
    pub fn new(ty: Type, elements: Vec<Type>) -> Self {
        Self { ty, elements }
    }

    pub fn simple(ty: Type) -> Self {
        Self { ty, elements: Vec::new() }
    }

    pub fn list_of(elem: Type) -> Self {
        Self { ty: Type::List, elements: vec![elem] }
    }
}

impl From<Type> for ParamType {
    fn from(ty: Type) -> Self { ParamType::simple(ty) }
}

impl fmt::Display for ParamType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.ty)?;
        if !self.elements.is_empty() {
            let elems: Vec<&str> = self.elements.iter().map(|e| e.name()).collect();
            write!(f, "<{}>", elems.join(", "))?;
        }
        Ok(())
    }
}

/// Render a parameter-type list as `(int, list<string>)`.
pub fn signature(types: &[ParamType]) -> String {
    let parts: Vec<String> = types.iter().map(|t| t.to_string()).collect();
    format!("({})", parts.join(", "))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_includes_elements() {
        assert_eq!(ParamType::list_of(Type::Int).to_string(), "list<int>");
        assert_eq!(ParamType::simple(Type::enumeration("Mode")).to_string(), "Mode");
    }

    #[test]
    fn signature_formats_in_order() {
        let sig = signature(&[Type::Int.into(), Type::Str.into()]);
        assert_eq!(sig, "(int, string)");
        assert_eq!(signature(&[]), "()");
    }
}
