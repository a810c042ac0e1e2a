//! Last-used values, kept as a flat string table and stored as TOML.
//!
//! ```toml
//! "Limiters.default" = "TokenBucket"
//! "Limiters.TokenBucket.capacity" = "100"
//! ```

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// Key-value persistence consulted by a form. The engine itself never
/// touches a store.
pub trait PropertyStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str);
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Properties {
    values: BTreeMap<String, String>,
}

impl Properties {
    pub fn new() -> Self { Self::default() }

    /// Parse a flat TOML table of string values.
    pub fn parse(content: &str) -> Result<Self, Error> {
        toml::from_str(content).map_err(|e| Error::Properties(e.to_string()))
    }

    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let content = fs::read_to_string(path.as_ref()).map_err(|e| {
            Error::Properties(format!("{}: {e}", path.as_ref().display()))
        })?;
        Self::parse(&content)
    }

    /// A missing file yields an empty table; any other failure is an error.
    pub fn load_or_default<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        if !path.as_ref().exists() {
            tracing::debug!(path = %path.as_ref().display(), "no properties file, starting empty");
            return Ok(Self::default());
        }
        Self::load(path)
    }

    pub fn to_toml(&self) -> Result<String, Error> {
        toml::to_string(self).map_err(|e| Error::Properties(e.to_string()))
    }

    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<(), Error> {
        let content = self.to_toml()?;
        fs::write(path.as_ref(), content).map_err(|e| {
            Error::Properties(format!("{}: {e}", path.as_ref().display()))
        })
    }

    pub fn len(&self) -> usize { self.values.len() }
    pub fn is_empty(&self) -> bool { self.values.is_empty() }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl PropertyStore for Properties {
    fn get(&self, key: &str) -> Option<String> {
        self.values.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.values.insert(key.to_string(), value.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_dotted_keys() {
        let p = Properties::parse(r#"
            "Limiters.default" = "TokenBucket"
            "Limiters.TokenBucket.capacity" = "100"
        "#).unwrap();
        assert_eq!(p.get("Limiters.default").as_deref(), Some("TokenBucket"));
        assert_eq!(p.len(), 2);
    }

    #[test]
    fn rejects_non_string_values() {
        let err = Properties::parse("a = 1").unwrap_err();
        assert!(matches!(err, Error::Properties(_)));
    }

    #[test]
    fn save_then_load() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("props.toml");
        let mut p = Properties::new();
        p.set("A.b.c", "x, y");
        p.save(&path).unwrap();
        assert_eq!(Properties::load(&path).unwrap(), p);
    }

    #[test]
    fn missing_file_is_empty() {
        let dir = tempfile::tempdir().unwrap();
        let p = Properties::load_or_default(dir.path().join("absent.toml")).unwrap();
        assert!(p.is_empty());
        assert!(Properties::load(dir.path().join("absent.toml")).is_err());
    }
}
