//! Construction orchestration.
//!
//! An `InstantiationDescriptor` binds a class to an ordered list of constructor
//! parameters and setters. It is frozen by its builder after validation and
//! then reused, read-only, for any number of builds.
//!
//! Text protocol for `build_from_text`:
//!   values[..params.len()]  → constructor arguments, in declared order
//!   values[params.len()..]  → setter arguments, in declared order

use std::sync::Arc;

use crate::descriptor::class::{ClassDesc, ConstructorDesc};
use crate::descriptor::parameter::{ParameterDescriptor, SetterDescriptor};
use crate::error::{BoxError, Error};
use crate::runtime::value::Value;
use crate::types::registry::ConverterRegistry;
use crate::types::ty::{signature, ParamType};

// ─── Builder ──────────────────────────────────────────────────────────────────

pub struct InstantiationBuilder<T> {
    class:   Arc<ClassDesc<T>>,
    params:  Vec<ParameterDescriptor>,
    setters: Vec<SetterDescriptor<T>>,
}

impl<T> InstantiationBuilder<T> {
    pub fn param(mut self, param: ParameterDescriptor) -> Self {
        self.params.push(param);
        self
    }

    pub fn setter(mut self, setter: SetterDescriptor<T>) -> Self {
        self.setters.push(setter);
        self
    }

    /// Freeze against the process-wide registry.
    pub fn build(self) -> Result<InstantiationDescriptor<T>, Error> {
        self.build_with(ConverterRegistry::global())
    }

    /// Freeze the descriptor. Fails if the constructor parameter types do not
    /// address exactly one constructor, or if any default does not convert.
    pub fn build_with(self, registry: &ConverterRegistry) -> Result<InstantiationDescriptor<T>, Error> {
        let types: Vec<ParamType> = self.params.iter().map(|p| p.ty.clone()).collect();
        let ctor = resolve(&self.class, &types)?;

        let all_params = self.params.iter().chain(self.setters.iter().map(|s| &s.param));
        for param in all_params {
            param.parse_default_with(registry).map_err(|source| Error::InvalidDefault {
                label: param.label.clone(),
                source,
            })?;
        }

        tracing::debug!(
            class = %self.class.name,
            params = self.params.len(),
            setters = self.setters.len(),
            "instantiation descriptor frozen"
        );
        Ok(InstantiationDescriptor {
            class:   self.class,
            params:  self.params,
            setters: self.setters,
            ctor,
        })
    }
}

// ─── Descriptor ───────────────────────────────────────────────────────────────

pub struct InstantiationDescriptor<T> {
    class:   Arc<ClassDesc<T>>,
    params:  Vec<ParameterDescriptor>,
    setters: Vec<SetterDescriptor<T>>,
    /// Index into `class.constructors`, resolved when frozen.
    ctor:    usize,
}

impl<T> InstantiationDescriptor<T> {
    pub fn builder(class: impl Into<Arc<ClassDesc<T>>>) -> InstantiationBuilder<T> {
        InstantiationBuilder { class: class.into(), params: Vec::new(), setters: Vec::new() }
    }

    pub fn class(&self) -> &ClassDesc<T> { &self.class }
    pub fn class_name(&self) -> &str { &self.class.name }
    pub fn ancestors(&self) -> &[String] { &self.class.ancestors }
    pub fn params(&self) -> &[ParameterDescriptor] { &self.params }
    pub fn setters(&self) -> &[SetterDescriptor<T>] { &self.setters }

    /// Number of text values `build_from_text` expects.
    pub fn arity(&self) -> usize {
        self.params.len() + self.setters.len()
    }

    /// Every parameter in text-protocol order: constructor params, then setters.
    pub fn all_params(&self) -> impl Iterator<Item = &ParameterDescriptor> {
        self.params.iter().chain(self.setters.iter().map(|s| &s.param))
    }

    pub fn defaults(&self) -> Vec<&str> {
        self.all_params().map(|p| p.default.as_str()).collect()
    }

    /// The unique constructor whose signature equals the declared parameter types.
    pub fn resolve_constructor(&self) -> Result<&ConstructorDesc<T>, Error> {
        let types: Vec<ParamType> = self.params.iter().map(|p| p.ty.clone()).collect();
        let idx = resolve(&self.class, &types)?;
        Ok(&self.class.constructors[idx])
    }

    // ── Construction ──────────────────────────────────────────────────────────

    /// Invoke the resolved constructor with typed arguments. Setters are not
    /// applied. Wrong arity or argument types are reported as
    /// `ConstructionFailed`, like a failure inside the constructor itself.
    pub fn build(&self, args: Vec<Value>) -> Result<T, Error> {
        let ctor = &self.class.constructors[self.ctor];
        if args.len() != ctor.params.len() {
            return Err(self.construction_failed(&args, format!(
                "constructor takes {} argument(s), got {}",
                ctor.params.len(), args.len()
            ).into()));
        }
        if let Some((i, (arg, ty))) = args.iter().zip(&ctor.params)
            .enumerate()
            .find(|(_, (arg, ty))| !arg.matches(ty))
        {
            return Err(self.construction_failed(&args, format!(
                "argument {i}: expected {ty}, got {}", arg.type_name()
            ).into()));
        }

        let instance = (ctor.call)(&args).map_err(|source| self.construction_failed(&args, source))?;
        tracing::debug!(class = %self.class.name, args = args.len(), "instance constructed");
        Ok(instance)
    }

    pub fn build_from_text<S: AsRef<str>>(&self, values: &[S]) -> Result<T, Error> {
        self.build_from_text_with(ConverterRegistry::global(), values)
    }

    /// Convert every value first, then construct, then apply setters in
    /// declared order. A conversion failure never leaves an instance behind.
    pub fn build_from_text_with<S: AsRef<str>>(
        &self,
        registry: &ConverterRegistry,
        values: &[S],
    ) -> Result<T, Error> {
        if values.len() != self.arity() {
            return Err(Error::ArityMismatch { expected: self.arity(), got: values.len() });
        }

        let mut converted = Vec::with_capacity(values.len());
        for (index, (param, text)) in self.all_params().zip(values).enumerate() {
            let value = param.parse_with(registry, text.as_ref()).map_err(|source| Error::Conversion {
                index,
                label: param.label.clone(),
                source,
            })?;
            converted.push(value);
        }

        let setter_values = converted.split_off(self.params.len());
        let mut instance = self.build(converted)?;
        self.apply_setters(&mut instance, setter_values)?;
        Ok(instance)
    }

    pub fn build_default(&self) -> Result<T, Error> {
        self.build_default_with(ConverterRegistry::global())
    }

    pub fn build_default_with(&self, registry: &ConverterRegistry) -> Result<T, Error> {
        self.build_from_text_with(registry, &self.defaults())
    }

    /// Fail fast on the first setter error; the partially configured instance
    /// is dropped and the error reports how many setters had already run.
    fn apply_setters(&self, instance: &mut T, values: Vec<Value>) -> Result<(), Error> {
        for (index, (setter, value)) in self.setters.iter().zip(values).enumerate() {
            let result = if value.matches(&setter.param.ty) {
                (setter.apply)(instance, &value)
            } else {
                Err(format!("expected {}, got {}", setter.param.ty, value.type_name()).into())
            };
            result.map_err(|source| Error::SetterFailed {
                index,
                label: setter.param.label.clone(),
                applied: index,
                source,
            })?;
            tracing::trace!(class = %self.class.name, setter = %setter.param.label, "setter applied");
        }
        Ok(())
    }

    fn construction_failed(&self, args: &[Value], source: BoxError) -> Error {
        let rendered: Vec<String> = args.iter().map(Value::to_text).collect();
        Error::ConstructionFailed {
            class: self.class.name.clone(),
            args:  rendered.join(", "),
            source,
        }
    }
}

impl<T> std::fmt::Debug for InstantiationDescriptor<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InstantiationDescriptor")
            .field("class", &self.class.name)
            .field("params", &self.params)
            .field("setters", &self.setters)
            .finish()
    }
}

// ─── Resolution ───────────────────────────────────────────────────────────────

/// Exact signature match only; zero or several candidates is an error.
fn resolve<T>(class: &ClassDesc<T>, types: &[ParamType]) -> Result<usize, Error> {
    match class.matching(types).as_slice() {
        [idx] => {
            tracing::trace!(class = %class.name, signature = %signature(types), "constructor resolved");
            Ok(*idx)
        }
        candidates => Err(Error::NoMatchingConstructor {
            class:      class.name.clone(),
            signature:  signature(types),
            candidates: candidates.len(),
        }),
    }
}
