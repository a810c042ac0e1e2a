//! Demo catalog: rate limiters, buildable from the command line.

use std::time::Duration;

use instanceables::{
    BoxError, Catalog, ClassDesc, ConverterRegistry, EnumDesc, Error, InstantiationDescriptor,
    NamedValue, ParameterDescriptor, SetterDescriptor, Type, Value,
};

// ─── Domain ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Overflow { Reject, Queue, Drop }

#[derive(Debug, Clone, PartialEq)]
pub enum Limiter {
    TokenBucket {
        capacity:    i32,
        refill_rate: f64,
        overflow:    Overflow,
    },
    FixedWindow {
        window:  Duration,
        limit:   i64,
        exempt:  Vec<String>,
        verbose: bool,
    },
    Unlimited,
}

fn overflow(v: &Value) -> Result<Overflow, BoxError> {
    match v.as_enum() {
        Some("Reject") => Ok(Overflow::Reject),
        Some("Queue")  => Ok(Overflow::Queue),
        Some("Drop")   => Ok(Overflow::Drop),
        other => Err(format!("unknown overflow policy {other:?}").into()),
    }
}

// ─── Registry ─────────────────────────────────────────────────────────────────

fn duration() -> Type { Type::named("duration") }

/// `250ms`, `2s` or `1m`.
fn convert_duration(text: &str, _: &[Type], _: &ConverterRegistry) -> Result<Value, String> {
    let t = text.trim();
    let split = t.find(|c: char| !c.is_ascii_digit()).unwrap_or(t.len());
    let (digits, unit) = t.split_at(split);
    let n: u64 = digits.parse().map_err(|_| format!("expected <number><unit>, got `{t}`"))?;
    let d = match unit {
        "ms" => Duration::from_millis(n),
        "s"  => Duration::from_secs(n),
        "m"  => Duration::from_secs(n.checked_mul(60).ok_or_else(|| format!("duration `{t}` too large"))?),
        _ => return Err(format!("unknown unit `{unit}` (expected ms, s or m)")),
    };
    Ok(Value::Named(NamedValue::new("duration", t, d)))
}

pub fn registry() -> ConverterRegistry {
    let mut r = ConverterRegistry::default();
    r.register_enum(EnumDesc::new("Overflow", &["Reject", "Queue", "Drop"]));
    r.register(duration(), vec![], convert_duration);
    r
}

// ─── Classes ──────────────────────────────────────────────────────────────────

fn token_bucket() -> ClassDesc<Limiter> {
    ClassDesc::new("TokenBucket")
        .extends("Limiter")
        .constructor(vec![Type::Int.into(), Type::Double.into()], |args| {
            let capacity = args[0].as_int().ok_or("capacity")?;
            let refill_rate = args[1].as_double().ok_or("refill rate")?;
            if capacity <= 0 {
                return Err("capacity must be positive".into());
            }
            Ok(Limiter::TokenBucket { capacity, refill_rate, overflow: Overflow::Reject })
        })
}

fn fixed_window() -> ClassDesc<Limiter> {
    ClassDesc::new("FixedWindow")
        .extends("WindowedLimiter")
        .extends("Limiter")
        .constructor(vec![duration().into(), Type::Long.into()], |args| {
            let window = *args[0].as_named::<Duration>().ok_or("window")?;
            let limit = args[1].as_long().ok_or("limit")?;
            if window.is_zero() {
                return Err("window must not be empty".into());
            }
            Ok(Limiter::FixedWindow { window, limit, exempt: vec![], verbose: false })
        })
}

fn unlimited() -> ClassDesc<Limiter> {
    ClassDesc::new("Unlimited")
        .extends("Limiter")
        .constructor(vec![], |_| Ok(Limiter::Unlimited))
}

// ─── Catalog ──────────────────────────────────────────────────────────────────

pub fn catalog(r: &ConverterRegistry) -> Result<Catalog<Limiter>, Error> {
    let bucket = InstantiationDescriptor::builder(token_bucket())
        .param(ParameterDescriptor::new(Type::Int, "capacity", "100"))
        .param(ParameterDescriptor::new(Type::Double, "refill per second", "10"))
        .setter(SetterDescriptor::new(Type::enumeration("Overflow"), "on overflow", "Reject", |l, v| {
            let Limiter::TokenBucket { overflow: o, .. } = l else { unreachable!() };
            *o = overflow(v)?;
            Ok(())
        }))
        .build_with(r)?;

    let window = InstantiationDescriptor::builder(fixed_window())
        .param(ParameterDescriptor::new(duration(), "window", "1s"))
        .param(ParameterDescriptor::new(Type::Long, "limit", "1000"))
        .setter(SetterDescriptor::generic(Type::List, vec![Type::Str], "exempt clients", "[]", |l, v| {
            let Limiter::FixedWindow { exempt, .. } = l else { unreachable!() };
            *exempt = v.as_list().unwrap_or_default()
                .iter()
                .filter_map(|c| c.as_str().map(str::to_string))
                .collect();
            Ok(())
        }))
        .setter(SetterDescriptor::new(Type::Bool, "verbose", "false", |l, v| {
            let Limiter::FixedWindow { verbose, .. } = l else { unreachable!() };
            *verbose = v.as_bool().ok_or("verbose")?;
            Ok(())
        }))
        .build_with(r)?;

    let none = InstantiationDescriptor::builder(unlimited()).build_with(r)?;

    Ok(Catalog::new("Limiters")
        .with("TokenBucket", bucket)
        .with("FixedWindow", window)
        .with("Unlimited", none))
}
