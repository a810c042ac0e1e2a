//! Headless instance form.
//!
//! Holds what an interactive editor shows (the selected catalog choice and
//! one editable text per parameter) without any widgets. Values are
//! restored from and saved to a `PropertyStore` under these keys:
//!
//!   `<catalog>.<choice>.<label>`  last value of one parameter
//!   `<catalog>.default`           last selected choice

pub mod properties;

use std::sync::Arc;

use crate::catalog::{Catalog, CatalogEntry};
use crate::error::Error;
use crate::runtime::observers::{InstanceObserver, ObserverId, ObserverList};
use crate::types::registry::ConverterRegistry;
use crate::types::ty::Type;
use properties::PropertyStore;

const DEFAULT_SELECTION: &str = "default";

pub fn param_key(catalog: &str, choice: &str, label: &str) -> String {
    format!("{catalog}.{choice}.{label}")
}

pub fn selection_key(catalog: &str) -> String {
    format!("{catalog}.{DEFAULT_SELECTION}")
}

// ─── Fields ───────────────────────────────────────────────────────────────────

/// How an editor should present a field.
#[derive(Debug, Clone, PartialEq)]
pub enum FieldKind {
    Text,
    /// Pick one of the enum constants.
    Choice(Vec<String>),
    Toggle,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Field {
    pub label: String,
    pub kind:  FieldKind,
    pub value: String,
}

// ─── Form ─────────────────────────────────────────────────────────────────────

pub struct InstanceForm<'c, T, S: PropertyStore> {
    catalog:   &'c Catalog<T>,
    registry:  &'c ConverterRegistry,
    store:     S,
    selected:  Option<usize>,
    fields:    Vec<Field>,
    enabled:   bool,
    observers: ObserverList<T>,
}

impl<'c, T, S: PropertyStore> InstanceForm<'c, T, S> {
    pub fn new(catalog: &'c Catalog<T>, store: S) -> Self {
        Self::with_registry(catalog, store, ConverterRegistry::global())
    }

    /// Restores the last selection from `store` if it still names a choice,
    /// otherwise selects the first entry.
    pub fn with_registry(catalog: &'c Catalog<T>, store: S, registry: &'c ConverterRegistry) -> Self {
        let mut form = Self {
            catalog,
            registry,
            store,
            selected:  None,
            fields:    Vec::new(),
            enabled:   true,
            observers: ObserverList::new(),
        };

        let remembered = form.store.get(&selection_key(catalog.name()));
        let restored = remembered.and_then(|name| {
            let idx = catalog.entries().iter().position(|e| e.name == name);
            if idx.is_none() {
                tracing::debug!(choice = %name, "ignoring unknown remembered selection");
            }
            idx
        });
        if let Some(idx) = restored.or_else(|| (!catalog.is_empty()).then_some(0)) {
            form.select_index(idx);
        }
        form
    }

    // ── Selection ─────────────────────────────────────────────────────────────

    /// Select a choice, load its field values and remember the selection.
    pub fn select(&mut self, name: &str) -> Result<(), Error> {
        let idx = self.catalog.entries().iter()
            .position(|e| e.name == name)
            .ok_or_else(|| Error::UnknownChoice {
                catalog: self.catalog.name().to_string(),
                name:    name.to_string(),
            })?;
        self.select_index(idx);
        Ok(())
    }

    fn select_index(&mut self, idx: usize) {
        let catalog = self.catalog;
        let entry = &catalog.entries()[idx];

        let fields: Vec<Field> = entry.descriptor.all_params()
            .map(|p| Field {
                label: p.label.clone(),
                kind:  self.field_kind(&p.ty.ty),
                value: self.load_value(entry, &p.label, &p.default, |text| {
                    p.parse_with(self.registry, text).is_ok()
                }),
            })
            .collect();
        self.fields = fields;
        self.selected = Some(idx);
        self.store.set(&selection_key(catalog.name()), &entry.name);
        tracing::debug!(catalog = %catalog.name(), choice = %entry.name, "selected");
    }

    pub fn selected(&self) -> Option<&CatalogEntry<T>> {
        self.selected.map(|i| &self.catalog.entries()[i])
    }

    // ── Fields ────────────────────────────────────────────────────────────────

    pub fn fields(&self) -> &[Field] { &self.fields }

    /// Edit one field. Returns false if there is no field at `index`.
    pub fn set_value(&mut self, index: usize, text: impl Into<String>) -> bool {
        match self.fields.get_mut(index) {
            Some(field) => {
                field.value = text.into();
                true
            }
            None => false,
        }
    }

    pub fn values(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.value.as_str()).collect()
    }

    pub fn set_enabled(&mut self, enabled: bool) { self.enabled = enabled; }
    pub fn is_enabled(&self) -> bool { self.enabled }

    // ── Creation ──────────────────────────────────────────────────────────────

    pub fn subscribe(&self, observer: Arc<dyn InstanceObserver<T>>) -> ObserverId {
        self.observers.subscribe(observer)
    }

    pub fn unsubscribe(&self, id: ObserverId) -> bool {
        self.observers.unsubscribe(id)
    }

    /// Build the selected choice from the current field values. On success
    /// every value is remembered and observers are notified; on failure the
    /// error is logged and returned, and the store is left untouched.
    pub fn create_instance(&mut self) -> Result<T, Error> {
        if !self.enabled {
            return Err(Error::FormDisabled);
        }
        let catalog = self.catalog;
        let entry = self.selected
            .map(|i| &catalog.entries()[i])
            .ok_or_else(|| Error::UnknownChoice {
                catalog: catalog.name().to_string(),
                name:    String::new(),
            })?;

        let instance = match entry.descriptor.build_from_text_with(self.registry, &self.values()) {
            Ok(instance) => instance,
            Err(e) => {
                tracing::error!(choice = %entry.name, error = %e, "could not create instance");
                return Err(e);
            }
        };

        for field in &self.fields {
            let key = param_key(catalog.name(), &entry.name, &field.label);
            self.store.set(&key, &field.value);
        }

        self.observers.notify(&instance);
        Ok(instance)
    }

    pub fn store(&self) -> &S { &self.store }
    pub fn into_store(self) -> S { self.store }

    // ── Helpers ───────────────────────────────────────────────────────────────

    fn field_kind(&self, ty: &Type) -> FieldKind {
        match ty {
            Type::Bool => FieldKind::Toggle,
            Type::Enum(name) => match self.registry.enum_desc(name) {
                Some(desc) => FieldKind::Choice(desc.constants.clone()),
                None => FieldKind::Text,
            },
            _ => FieldKind::Text,
        }
    }

    /// Stored override if it still converts, else the declared default.
    fn load_value(
        &self,
        entry: &CatalogEntry<T>,
        label: &str,
        default: &str,
        converts: impl Fn(&str) -> bool,
    ) -> String {
        let key = param_key(self.catalog.name(), &entry.name, label);
        match self.store.get(&key) {
            Some(v) if converts(&v) => v,
            Some(v) => {
                tracing::debug!(key = %key, value = %v, "stored value no longer converts, using default");
                default.to_string()
            }
            None => default.to_string(),
        }
    }
}
