//! Class table: the constructors a target type exposes, keyed by their
//! declared parameter types. Stands in for runtime reflection: every
//! buildable type registers its overloads here explicitly.

use crate::error::BoxError;
use crate::runtime::value::Value;
use crate::types::ty::ParamType;

// ─── Function pointer aliases ─────────────────────────────────────────────────

/// Invoke a constructor with positional, already type-checked arguments.
pub type ConstructorFn<T> = fn(&[Value]) -> Result<T, BoxError>;

/// Apply one converted value to a constructed instance.
pub type SetterFn<T> = fn(&mut T, &Value) -> Result<(), BoxError>;

// ─── Descriptors ──────────────────────────────────────────────────────────────

pub struct ConstructorDesc<T> {
    /// Declared parameter types, in call order.
    pub params: Vec<ParamType>,
    pub call:   ConstructorFn<T>,
}

pub struct ClassDesc<T> {
    pub name:         String,
    /// Ancestor type names, nearest first. The universal base is never listed.
    pub ancestors:    Vec<String>,
    pub constructors: Vec<ConstructorDesc<T>>,
}

impl<T> ClassDesc<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), ancestors: Vec::new(), constructors: Vec::new() }
    }

    pub fn extends(mut self, ancestor: impl Into<String>) -> Self {
        self.ancestors.push(ancestor.into());
        self
    }

    pub fn constructor(mut self, params: Vec<ParamType>, call: ConstructorFn<T>) -> Self {
        self.constructors.push(ConstructorDesc { params, call });
        self
    }

    /// All overloads whose signature equals `params` exactly.
    pub fn matching(&self, params: &[ParamType]) -> Vec<usize> {
        self.constructors.iter()
            .enumerate()
            .filter(|(_, c)| c.params.as_slice() == params)
            .map(|(i, _)| i)
            .collect()
    }
}

impl<T> std::fmt::Debug for ClassDesc<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let sigs: Vec<String> = self.constructors.iter()
            .map(|c| crate::types::ty::signature(&c.params))
            .collect();
        f.debug_struct("ClassDesc")
            .field("name", &self.name)
            .field("ancestors", &self.ancestors)
            .field("constructors", &sigs)
            .finish()
    }
}
