//! Catalogs (closed, named lists of instantiation choices) and the type
//! introspection tooling runs over them, e.g. to decide which types need
//! special (de)serialization support.

use std::collections::HashSet;

use crate::descriptor::InstantiationDescriptor;
use crate::error::Error;

// ─── Type set ─────────────────────────────────────────────────────────────────

/// Insertion-ordered set of type names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TypeSet {
    order: Vec<String>,
    seen:  HashSet<String>,
}

impl TypeSet {
    pub fn new() -> Self { Self::default() }

    /// Returns false if `name` was already present.
    pub fn insert(&mut self, name: &str) -> bool {
        if !self.seen.insert(name.to_string()) {
            return false;
        }
        self.order.push(name.to_string());
        true
    }

    pub fn contains(&self, name: &str) -> bool { self.seen.contains(name) }
    pub fn len(&self) -> usize { self.order.len() }
    pub fn is_empty(&self) -> bool { self.order.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// `a`'s names in order, then `b`'s names not already present.
    pub fn merge(a: &TypeSet, b: &TypeSet) -> TypeSet {
        let mut out = a.clone();
        out.extend(b.iter());
        out
    }
}

impl<'a> Extend<&'a str> for TypeSet {
    fn extend<I: IntoIterator<Item = &'a str>>(&mut self, iter: I) {
        for name in iter {
            self.insert(name);
        }
    }
}

impl<'a> FromIterator<&'a str> for TypeSet {
    fn from_iter<I: IntoIterator<Item = &'a str>>(iter: I) -> Self {
        let mut set = TypeSet::new();
        set.extend(iter);
        set
    }
}

// ─── Class info ───────────────────────────────────────────────────────────────

/// Type-erased view of a descriptor's target type.
pub trait ClassInfo {
    fn class_name(&self) -> &str;
    /// Nearest first, universal base excluded.
    fn ancestors(&self) -> &[String];
}

impl<T> ClassInfo for InstantiationDescriptor<T> {
    fn class_name(&self) -> &str { InstantiationDescriptor::class_name(self) }
    fn ancestors(&self) -> &[String] { InstantiationDescriptor::ancestors(self) }
}

/// Every descriptor's target type followed by its ancestors, merged across
/// descriptors in first-seen order.
pub fn all_referenced_types<'a, I>(descriptors: I) -> TypeSet
where
    I: IntoIterator<Item = &'a dyn ClassInfo>,
{
    let mut set = TypeSet::new();
    for d in descriptors {
        set.insert(d.class_name());
        set.extend(d.ancestors().iter().map(String::as_str));
    }
    set
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

pub struct CatalogEntry<T> {
    pub name:       String,
    pub descriptor: InstantiationDescriptor<T>,
}

/// A named, closed list of instantiation choices.
pub struct Catalog<T> {
    name:    String,
    entries: Vec<CatalogEntry<T>>,
}

impl<T> Catalog<T> {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into(), entries: Vec::new() }
    }

    /// Add a choice. Lookup is first-come, so a repeated name is unreachable.
    pub fn with(mut self, name: impl Into<String>, descriptor: InstantiationDescriptor<T>) -> Self {
        self.entries.push(CatalogEntry { name: name.into(), descriptor });
        self
    }

    pub fn name(&self) -> &str { &self.name }
    pub fn entries(&self) -> &[CatalogEntry<T>] { &self.entries }
    pub fn len(&self) -> usize { self.entries.len() }
    pub fn is_empty(&self) -> bool { self.entries.is_empty() }

    pub fn get(&self, name: &str) -> Option<&CatalogEntry<T>> {
        self.entries.iter().find(|e| e.name == name)
    }

    /// Like `get`, but an unknown name is an error.
    pub fn parse(&self, name: &str) -> Result<&CatalogEntry<T>, Error> {
        self.get(name).ok_or_else(|| Error::UnknownChoice {
            catalog: self.name.clone(),
            name:    name.to_string(),
        })
    }

    pub fn referenced_types(&self) -> TypeSet {
        all_referenced_types(self.entries.iter().map(|e| &e.descriptor as &dyn ClassInfo))
    }
}

impl<T> std::fmt::Debug for CatalogEntry<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CatalogEntry")
            .field("name", &self.name)
            .field("descriptor", &self.descriptor)
            .finish()
    }
}

impl<T> std::fmt::Debug for Catalog<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names: Vec<&str> = self.entries.iter().map(|e| e.name.as_str()).collect();
        f.debug_struct("Catalog").field("name", &self.name).field("entries", &names).finish()
    }
}
