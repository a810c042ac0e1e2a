pub mod types;
pub mod runtime;
pub mod descriptor;
pub mod catalog;
pub mod form;
pub mod error;

pub use error::{BoxError, ConversionError, Error, ErrorCode};
pub use types::ty::{ParamType, Type};
pub use types::registry::{ConverterFn, ConverterRegistry, EnumDesc};
pub use runtime::value::{EnumValue, NamedValue, Value};
pub use runtime::observers::{InstanceObserver, ObserverId, ObserverList};
pub use descriptor::{
    ClassDesc, ConstructorDesc, InstantiationBuilder, InstantiationDescriptor,
    ParameterDescriptor, SetterDescriptor,
};
pub use catalog::{all_referenced_types, Catalog, CatalogEntry, ClassInfo, TypeSet};
pub use form::{Field, FieldKind, InstanceForm};
pub use form::properties::{Properties, PropertyStore};

// ─── Public API ───────────────────────────────────────────────────────────────

/// Parse `text` as `ty` with the process-wide registry.
pub fn convert(ty: &Type, elements: &[Type], text: &str) -> Result<Value, ConversionError> {
    ConverterRegistry::global().convert(ty, elements, text)
}

/// Order-preserving union of two type sets.
pub fn merge(a: &TypeSet, b: &TypeSet) -> TypeSet {
    TypeSet::merge(a, b)
}
