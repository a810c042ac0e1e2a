use thiserror::Error;

use crate::types::ty::Type;

/// Failure type returned by constructors and setters in a class table.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

/// Error codes prefixed by area: C = conversion, A = arity, R = resolution,
/// D = descriptor, B = build, F = form, G = global registry, P = properties.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorCode {
    C001, // text could not be converted to the declared type
    A001, // value count does not match the declared parameter count
    R001, // declared parameter types address zero or several constructors
    D001, // default text does not convert
    B001, // constructor failed or rejected its arguments
    B002, // setter failed after construction
    F001, // unknown catalog choice
    F002, // form is disabled
    G001, // default registry already initialised
    P001, // property file could not be read, parsed or written
}

impl ErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::C001 => "C001",
            Self::A001 => "A001",
            Self::R001 => "R001",
            Self::D001 => "D001",
            Self::B001 => "B001",
            Self::B002 => "B002",
            Self::F001 => "F001",
            Self::F002 => "F002",
            Self::G001 => "G001",
            Self::P001 => "P001",
        }
    }
}

// ─── ConversionError ──────────────────────────────────────────────────────────

/// Text could not be parsed into the requested type.
#[derive(Debug, Clone, PartialEq, Error)]
#[error("cannot convert {text:?} to {}: {reason}", display_type(.ty, .elements))]
pub struct ConversionError {
    pub ty:       Type,
    pub elements: Vec<Type>,
    pub text:     String,
    pub reason:   String,
}

impl ConversionError {
    pub fn new(ty: &Type, elements: &[Type], text: &str, reason: impl Into<String>) -> Self {
        Self {
            ty:       ty.clone(),
            elements: elements.to_vec(),
            text:     text.to_string(),
            reason:   reason.into(),
        }
    }
}

fn display_type(ty: &Type, elements: &[Type]) -> String {
    if elements.is_empty() {
        return ty.to_string();
    }
    let elems: Vec<&str> = elements.iter().map(|e| e.name()).collect();
    format!("{ty}<{}>", elems.join(", "))
}

// ─── Error ────────────────────────────────────────────────────────────────────

#[derive(Debug, Error)]
pub enum Error {
    /// Input value at `index` (in the flattened constructor+setter order)
    /// failed to convert.
    #[error("parameter {index} ({label}): {source}")]
    Conversion {
        index:  usize,
        label:  String,
        #[source]
        source: ConversionError,
    },

    #[error("expected {expected} value(s), got {got}")]
    ArityMismatch { expected: usize, got: usize },

    #[error("`{class}` has {candidates} constructor(s) matching {signature}, expected exactly one")]
    NoMatchingConstructor {
        class:      String,
        signature:  String,
        candidates: usize,
    },

    #[error("default of `{label}` does not convert: {source}")]
    InvalidDefault {
        label:  String,
        #[source]
        source: ConversionError,
    },

    #[error("cannot create `{class}` from [{args}]: {source}")]
    ConstructionFailed {
        class:  String,
        args:   String,
        #[source]
        source: BoxError,
    },

    /// Setter `index` failed on an already constructed instance.
    /// `applied` setters before it ran successfully; the instance is dropped.
    #[error("setter {index} ({label}) failed after {applied} setter(s) applied: {source}")]
    SetterFailed {
        index:   usize,
        label:   String,
        applied: usize,
        #[source]
        source:  BoxError,
    },

    #[error("unknown choice `{name}` in catalog `{catalog}`")]
    UnknownChoice { catalog: String, name: String },

    #[error("form is disabled")]
    FormDisabled,

    #[error("default converter registry is already initialised")]
    RegistryInstalled,

    #[error("properties: {0}")]
    Properties(String),
}

impl Error {
    pub fn code(&self) -> ErrorCode {
        match self {
            Error::Conversion { .. }            => ErrorCode::C001,
            Error::ArityMismatch { .. }         => ErrorCode::A001,
            Error::NoMatchingConstructor { .. } => ErrorCode::R001,
            Error::InvalidDefault { .. }        => ErrorCode::D001,
            Error::ConstructionFailed { .. }    => ErrorCode::B001,
            Error::SetterFailed { .. }          => ErrorCode::B002,
            Error::UnknownChoice { .. }         => ErrorCode::F001,
            Error::FormDisabled                 => ErrorCode::F002,
            Error::RegistryInstalled            => ErrorCode::G001,
            Error::Properties(_)                => ErrorCode::P001,
        }
    }
}
