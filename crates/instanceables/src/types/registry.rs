//! Converter registry: maps (type, element types) → text parser.
//!
//! Consumed by:
//!   • Descriptors   : default-value validation when a descriptor is frozen
//!   • Construction  : `build_from_text` / `build_default`
//!   • The form      : converting field text before persisting it
//!
//! Supporting a new kind = registering one rule here (or one `EnumDesc`).
//! No edits to the construction engine needed.

use std::collections::HashMap;
use std::sync::OnceLock;

use crate::error::{ConversionError, Error};
use crate::runtime::value::{EnumValue, Value};
use crate::types::ty::{ParamType, Type};

// ─── Function pointer aliases ─────────────────────────────────────────────────

/// Parse `text` into a value. `elements` are the element types of the target
/// (empty for simple types); the registry is passed so container rules can
/// convert their elements. Returns a human-readable reason on failure.
pub type ConverterFn = fn(&str, &[Type], &ConverterRegistry) -> Result<Value, String>;

// ─── Descriptors ──────────────────────────────────────────────────────────────

/// An enumerated type known to the registry. Constants are matched by exact,
/// case-sensitive name; the ordinal is the position in `constants`.
#[derive(Debug, Clone)]
pub struct EnumDesc {
    pub name:      String,
    pub constants: Vec<String>,
}

impl EnumDesc {
    pub fn new(name: impl Into<String>, constants: &[&str]) -> Self {
        Self {
            name:      name.into(),
            constants: constants.iter().map(|c| c.to_string()).collect(),
        }
    }

    pub fn constant(&self, name: &str) -> Option<EnumValue> {
        self.constants.iter()
            .position(|c| c == name)
            .map(|ordinal| EnumValue {
                ty: self.name.clone(),
                constant: name.to_string(),
                ordinal,
            })
    }
}

// ─── Registry ─────────────────────────────────────────────────────────────────

#[derive(Clone)]
pub struct ConverterRegistry {
    rules: HashMap<(Type, Vec<Type>), ConverterFn>,
    enums: HashMap<String, EnumDesc>,
}

static GLOBAL: OnceLock<ConverterRegistry> = OnceLock::new();

impl ConverterRegistry {
    /// An empty registry with no rules at all.
    pub fn new() -> Self {
        Self { rules: HashMap::new(), enums: HashMap::new() }
    }

    /// The process-wide registry. Initialised with the built-in rules on first
    /// use unless [`install`](Self::install) ran before; immutable afterwards.
    pub fn global() -> &'static ConverterRegistry {
        GLOBAL.get_or_init(ConverterRegistry::default)
    }

    /// Replace the process-wide default. Must run during start-up, before any
    /// call to [`global`](Self::global); fails once the default exists.
    pub fn install(registry: ConverterRegistry) -> Result<(), Error> {
        GLOBAL.set(registry).map_err(|_| Error::RegistryInstalled)?;
        tracing::debug!("installed custom default converter registry");
        Ok(())
    }

    /// Add or replace the rule for `(ty, elements)`.
    pub fn register(&mut self, ty: Type, elements: Vec<Type>, f: ConverterFn) {
        tracing::trace!(ty = %ty, elements = elements.len(), "register converter");
        self.rules.insert((ty, elements), f);
    }

    pub fn register_enum(&mut self, desc: EnumDesc) {
        tracing::trace!(name = %desc.name, constants = desc.constants.len(), "register enum");
        self.enums.insert(desc.name.clone(), desc);
    }

    pub fn enum_desc(&self, name: &str) -> Option<&EnumDesc> {
        self.enums.get(name)
    }

    /// True if `convert` has some rule to try for this type.
    pub fn supports(&self, ty: &Type, elements: &[Type]) -> bool {
        self.lookup(ty, elements).is_some()
            || matches!(ty, Type::Enum(n) if self.enums.contains_key(n))
    }

    // ── Conversion ────────────────────────────────────────────────────────────

    /// Most specific rule first: exact `(ty, elements)`, then the simple
    /// `(ty, [])` rule, which receives `elements` as its argument.
    fn lookup(&self, ty: &Type, elements: &[Type]) -> Option<ConverterFn> {
        if let Some(f) = self.rules.get(&(ty.clone(), elements.to_vec())) {
            return Some(*f);
        }
        if elements.is_empty() {
            return None;
        }
        self.rules.get(&(ty.clone(), Vec::new())).copied()
    }

    pub fn convert(&self, ty: &Type, elements: &[Type], text: &str) -> Result<Value, ConversionError> {
        if let Some(f) = self.lookup(ty, elements) {
            return f(text, elements, self)
                .map_err(|reason| ConversionError::new(ty, elements, text, reason));
        }
        if let Type::Enum(name) = ty {
            if let Some(desc) = self.enums.get(name) {
                return desc.constant(text)
                    .map(Value::Enum)
                    .ok_or_else(|| ConversionError::new(ty, elements, text, format!(
                        "no constant named `{text}` (expected one of {})",
                        desc.constants.join(", ")
                    )));
            }
        }
        Err(ConversionError::new(ty, elements, text, "no converter registered"))
    }

    pub fn convert_param(&self, ty: &ParamType, text: &str) -> Result<Value, ConversionError> {
        self.convert(&ty.ty, &ty.elements, text)
    }
}

impl Default for ConverterRegistry {
    fn default() -> Self {
        let mut r = Self::new();
        // Primitives
        r.register(Type::Int,    vec![], convert_int);
        r.register(Type::Long,   vec![], convert_long);
        r.register(Type::Float,  vec![], convert_float);
        r.register(Type::Double, vec![], convert_double);
        r.register(Type::Bool,   vec![], convert_bool);
        r.register(Type::Str,    vec![], convert_str);
        // Containers
        r.register(Type::List,   vec![], convert_list);
        r
    }
}

impl std::fmt::Debug for ConverterRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut rules: Vec<String> = self.rules.keys()
            .map(|(ty, elems)| ParamType::new(ty.clone(), elems.clone()).to_string())
            .collect();
        rules.sort();
        let mut enums: Vec<&String> = self.enums.keys().collect();
        enums.sort();
        f.debug_struct("ConverterRegistry")
            .field("rules", &rules)
            .field("enums", &enums)
            .finish()
    }
}

// ─── Built-in rules ───────────────────────────────────────────────────────────

fn convert_int(text: &str, _: &[Type], _: &ConverterRegistry) -> Result<Value, String> {
    text.trim().parse::<i32>().map(Value::Int).map_err(|e| e.to_string())
}

fn convert_long(text: &str, _: &[Type], _: &ConverterRegistry) -> Result<Value, String> {
    text.trim().parse::<i64>().map(Value::Long).map_err(|e| e.to_string())
}

fn convert_float(text: &str, _: &[Type], _: &ConverterRegistry) -> Result<Value, String> {
    text.trim().parse::<f32>().map(Value::Float).map_err(|e| e.to_string())
}

fn convert_double(text: &str, _: &[Type], _: &ConverterRegistry) -> Result<Value, String> {
    text.trim().parse::<f64>().map(Value::Double).map_err(|e| e.to_string())
}

/// Strict: only `true` / `false` (any ASCII case). Everything else fails.
fn convert_bool(text: &str, _: &[Type], _: &ConverterRegistry) -> Result<Value, String> {
    let t = text.trim();
    if t.eq_ignore_ascii_case("true") {
        Ok(Value::Bool(true))
    } else if t.eq_ignore_ascii_case("false") {
        Ok(Value::Bool(false))
    } else {
        Err("expected `true` or `false`".into())
    }
}

fn convert_str(text: &str, _: &[Type], _: &ConverterRegistry) -> Result<Value, String> {
    Ok(Value::Str(text.to_string()))
}

/// `a, b, c` or `[a, b, c]`. Bare elements are trimmed; an element wrapped in
/// double quotes is taken verbatim after unescaping `\"` and `\\`. Nested
/// lists may appear bare. Elements are converted with the first element type;
/// the remaining element types are passed on for nesting.
fn convert_list(text: &str, elements: &[Type], r: &ConverterRegistry) -> Result<Value, String> {
    let Some((elem, rest)) = elements.split_first() else {
        return Err("list needs an element type".into());
    };
    let t = text.trim();
    let inner = match closing_bracket(t) {
        Some(end) if end == t.len() - 1 => t[1..end].trim(),
        _ => t,
    };
    if inner.is_empty() {
        return Ok(Value::List(Vec::new()));
    }
    split_items(inner)?
        .iter()
        .map(|item| r.convert(elem, rest, item).map_err(|e| e.to_string()))
        .collect::<Result<Vec<_>, _>>()
        .map(Value::List)
}

/// Renders one list element so that `convert_list` reads it back unchanged.
pub(crate) fn list_item_text(text: &str) -> String {
    let plain = !text.is_empty()
        && text.trim() == text
        && !text.contains([',', '"', '\\', '[', ']']);
    if plain {
        return text.to_string();
    }
    let mut out = String::with_capacity(text.len() + 2);
    out.push('"');
    for c in text.chars() {
        if matches!(c, '"' | '\\') {
            out.push('\\');
        }
        out.push(c);
    }
    out.push('"');
    out
}

/// Byte index of the `]` closing a leading `[`, skipping quoted text.
fn closing_bracket(t: &str) -> Option<usize> {
    if !t.starts_with('[') {
        return None;
    }
    let mut depth = 0usize;
    let mut quoted = false;
    let mut escaped = false;
    for (i, c) in t.char_indices() {
        if quoted {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => quoted = false,
                _ => {}
            }
            continue;
        }
        match c {
            '"' => quoted = true,
            '[' => depth += 1,
            ']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// Splits on top-level commas.
fn split_items(inner: &str) -> Result<Vec<String>, String> {
    let mut items = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        while chars.next_if(|c| c.is_whitespace()).is_some() {}
        let item = if chars.next_if_eq(&'"').is_some() {
            let mut item = String::new();
            loop {
                match chars.next() {
                    Some('"') => break,
                    Some('\\') => match chars.next() {
                        Some(c @ ('"' | '\\')) => item.push(c),
                        Some(c) => return Err(format!("unknown escape `\\{c}`")),
                        None => return Err("unterminated quote".into()),
                    },
                    Some(c) => item.push(c),
                    None => return Err("unterminated quote".into()),
                }
            }
            while chars.next_if(|c| c.is_whitespace()).is_some() {}
            if let Some(c) = chars.next_if(|c| *c != ',') {
                return Err(format!("unexpected `{c}` after quoted element"));
            }
            item
        } else {
            let mut item = String::new();
            let mut depth = 0usize;
            let mut quoted = false;
            let mut escaped = false;
            while let Some(c) = chars.next_if(|c| quoted || depth > 0 || *c != ',') {
                item.push(c);
                if quoted {
                    match c {
                        _ if escaped => escaped = false,
                        '\\' => escaped = true,
                        '"' => quoted = false,
                        _ => {}
                    }
                    continue;
                }
                match c {
                    '"' if depth > 0 => quoted = true,
                    '"' => return Err("quote inside a bare element".into()),
                    '[' => depth += 1,
                    ']' => depth = depth.checked_sub(1).ok_or("unbalanced `]`")?,
                    _ => {}
                }
            }
            if depth > 0 || quoted {
                return Err("unbalanced `[`".into());
            }
            item.trim_end().to_string()
        };
        items.push(item);
        if chars.next().is_none() {
            return Ok(items);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn registry() -> ConverterRegistry {
        let mut r = ConverterRegistry::default();
        r.register_enum(EnumDesc::new("Letter", &["A", "B", "C"]));
        r
    }

    #[test]
    fn numeric_rejects_garbage() {
        let r = registry();
        assert_eq!(r.convert(&Type::Int, &[], " 42 "), Ok(Value::Int(42)));
        assert!(r.convert(&Type::Int, &[], "4x2").is_err());
        assert!(r.convert(&Type::Int, &[], "3000000000").is_err());
        assert_eq!(r.convert(&Type::Long, &[], "3000000000"), Ok(Value::Long(3_000_000_000)));
        assert!(r.convert(&Type::Double, &[], "").is_err());
    }

    #[test]
    fn bool_is_strict() {
        let r = registry();
        assert_eq!(r.convert(&Type::Bool, &[], "true"), Ok(Value::Bool(true)));
        assert_eq!(r.convert(&Type::Bool, &[], "FALSE"), Ok(Value::Bool(false)));
        let err = r.convert(&Type::Bool, &[], "maybe").unwrap_err();
        assert_eq!(err.text, "maybe");
        assert_eq!(err.ty, Type::Bool);
    }

    #[test]
    fn enum_lookup_is_case_sensitive() {
        let r = registry();
        let ty = Type::enumeration("Letter");
        let b = r.convert(&ty, &[], "B").unwrap();
        assert_eq!(b.as_enum(), Some("B"));
        assert!(matches!(b, Value::Enum(EnumValue { ordinal: 1, .. })));
        assert!(r.convert(&ty, &[], "b").is_err());
        assert!(r.convert(&ty, &[], " B").is_err());
        assert!(r.convert(&ty, &[], "Z").is_err());
    }

    #[test]
    fn unknown_enum_has_no_rule() {
        let err = registry().convert(&Type::enumeration("Nope"), &[], "A").unwrap_err();
        assert_eq!(err.reason, "no converter registered");
    }

    #[test]
    fn list_converts_elements() {
        let r = registry();
        let v = r.convert(&Type::List, &[Type::Int], "[1, 2, 3]").unwrap();
        assert_eq!(v, Value::List(vec![Value::Int(1), Value::Int(2), Value::Int(3)]));
        assert_eq!(r.convert(&Type::List, &[Type::Int], "4,5").unwrap().as_list().map(|l| l.len()), Some(2));
        assert_eq!(r.convert(&Type::List, &[Type::Int], "[]").unwrap(), Value::List(vec![]));
        assert!(r.convert(&Type::List, &[Type::Int], "1, x").is_err());
        assert!(r.convert(&Type::List, &[], "1").is_err());
    }

    #[test]
    fn list_quoted_elements() {
        let r = registry();
        let v = r.convert(&Type::List, &[Type::Str], r#"["a, b" , " c ", "\"\\"]"#).unwrap();
        assert_eq!(v, Value::List(vec![
            Value::Str("a, b".into()),
            Value::Str(" c ".into()),
            Value::Str(r#""\"#.into()),
        ]));
        assert_eq!(r.convert(&Type::List, &[Type::Str], r#"[""]"#).unwrap(), Value::List(vec![Value::Str(String::new())]));
        assert!(r.convert(&Type::List, &[Type::Str], r#"["open"#).is_err());
        assert!(r.convert(&Type::List, &[Type::Str], r#"["a" b]"#).is_err());
        assert!(r.convert(&Type::List, &[Type::Str], r#"["\n"]"#).is_err());
        assert!(r.convert(&Type::List, &[Type::Str], r#"a"b"#).is_err());
    }

    #[test]
    fn list_nests_without_quotes() {
        let r = registry();
        let v = r.convert(&Type::List, &[Type::List, Type::Int], "[[1, 2], [3]]").unwrap();
        assert_eq!(v, Value::List(vec![
            Value::List(vec![Value::Int(1), Value::Int(2)]),
            Value::List(vec![Value::Int(3)]),
        ]));
        let bare = r.convert(&Type::List, &[Type::List, Type::Int], "[1], [2, 3]").unwrap();
        assert_eq!(bare.as_list().map(|l| l.len()), Some(2));
        assert!(r.convert(&Type::List, &[Type::List, Type::Int], "[[1, 2]").is_err());
    }

    #[test]
    fn exact_rule_shadows_generic_rule() {
        let mut r = registry();
        r.register(Type::List, vec![Type::Str], |text, _, _| {
            Ok(Value::List(text.split('|').map(|s| Value::Str(s.into())).collect()))
        });
        let v = r.convert(&Type::List, &[Type::Str], "a|b").unwrap();
        assert_eq!(v.as_list().map(|l| l.len()), Some(2));
        // Other element types still use the generic rule.
        assert!(r.convert(&Type::List, &[Type::Int], "1,2").is_ok());
    }

    #[test]
    fn named_types_need_a_rule() {
        let mut r = registry();
        let ty = Type::named("Celsius");
        assert!(!r.supports(&ty, &[]));
        r.register(ty.clone(), vec![], |text, _, _| {
            let deg: f64 = text.trim_end_matches('C').parse().map_err(|_| "expected <number>C".to_string())?;
            Ok(Value::Named(crate::runtime::value::NamedValue::new("Celsius", text, deg)))
        });
        assert!(r.supports(&ty, &[]));
        assert_eq!(r.convert(&ty, &[], "21.5C").unwrap().as_named::<f64>(), Some(&21.5));
    }
}
