use std::fmt;
use std::str::FromStr;

use serde_json::{json, Value};
use thiserror::Error;

use crate::table::{Lower, RangeEntry, RangeTable, Upper};

#[derive(Debug, Error)]
pub enum EmitError {
  #[error("unknown target '{name}' (available: {})", available_targets())]
  UnknownTarget { name: String },
  #[error("unsupported integer type '{name}' (expected i8, i16, i32 or i64)")]
  UnknownIntType { name: String },
  #[error("version {value} does not fit in {ty}")]
  OutOfRange { value: i64, ty: IntType },
  #[error("invalid match scrutinee '{0}'")]
  InvalidScrutinee(String),
  #[error(transparent)]
  Json(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TargetKind {
  Rust,
  Json,
}

impl TargetKind {
  pub fn as_str(&self) -> &'static str {
    match self {
      TargetKind::Rust => "rust",
      TargetKind::Json => "json",
    }
  }
}

pub fn resolve_target(name: &str) -> Result<TargetKind, EmitError> {
  match name.trim().to_ascii_lowercase().as_str() {
    "rust" => Ok(TargetKind::Rust),
    "json" => Ok(TargetKind::Json),
    _ => Err(EmitError::UnknownTarget { name: name.to_string() }),
  }
}

pub fn list_targets() -> Vec<TargetKind> {
  vec![TargetKind::Rust, TargetKind::Json]
}

fn available_targets() -> String {
  list_targets().iter().map(|t| t.as_str()).collect::<Vec<_>>().join(", ")
}

pub fn describe_target(kind: TargetKind) -> Value {
  match kind {
    TargetKind::Rust => json!({
      "target": "rust",
      "output": "match expression mapping an integer to a &'static str label",
      "options": {
        "int_type": ["i8", "i16", "i32", "i64"],
        "scrutinee": "expression matched on (default: version)"
      }
    }),
    TargetKind::Json => json!({
      "target": "json",
      "output": "array of {lower, upper, label}; null marks an unbounded side",
      "options": {}
    }),
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntType {
  I8,
  I16,
  I32,
  I64,
}

impl IntType {
  pub fn as_str(&self) -> &'static str {
    match self {
      IntType::I8 => "i8",
      IntType::I16 => "i16",
      IntType::I32 => "i32",
      IntType::I64 => "i64",
    }
  }

  fn bounds(&self) -> (i64, i64) {
    match self {
      IntType::I8 => (i8::MIN.into(), i8::MAX.into()),
      IntType::I16 => (i16::MIN.into(), i16::MAX.into()),
      IntType::I32 => (i32::MIN.into(), i32::MAX.into()),
      IntType::I64 => (i64::MIN, i64::MAX),
    }
  }

  fn check(&self, value: i64) -> Result<i64, EmitError> {
    let (min, max) = self.bounds();
    if value < min || value > max {
      return Err(EmitError::OutOfRange { value, ty: *self });
    }
    Ok(value)
  }
}

impl fmt::Display for IntType {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(self.as_str())
  }
}

impl FromStr for IntType {
  type Err = EmitError;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    match s.trim() {
      "i8" => Ok(IntType::I8),
      "i16" => Ok(IntType::I16),
      "i32" => Ok(IntType::I32),
      "i64" => Ok(IntType::I64),
      other => Err(EmitError::UnknownIntType { name: other.to_string() }),
    }
  }
}

#[derive(Debug, Clone)]
pub struct RustOptions {
  pub int_type: IntType,
  pub scrutinee: String,
}

impl Default for RustOptions {
  fn default() -> Self {
    Self { int_type: IntType::I32, scrutinee: "version".to_string() }
  }
}

pub fn emit(kind: TargetKind, table: &RangeTable, options: &RustOptions) -> Result<String, EmitError> {
  match kind {
    TargetKind::Rust => emit_rust(table, options),
    TargetKind::Json => emit_json(table),
  }
}

/// Render the table as a `match` expression. The last entry becomes the
/// wildcard arm so the match is exhaustive for any integer type.
pub fn emit_rust(table: &RangeTable, options: &RustOptions) -> Result<String, EmitError> {
  if !is_valid_scrutinee(&options.scrutinee) {
    return Err(EmitError::InvalidScrutinee(options.scrutinee.clone()));
  }
  let mut out = format!("match {} {{\n", options.scrutinee);
  let last = table.len().saturating_sub(1);
  for (idx, entry) in table.iter().enumerate() {
    let pattern = if idx == last {
      "_".to_string()
    } else {
      rust_pattern(entry, options.int_type)?
    };
    out.push_str(&format!("    {} => {:?},\n", pattern, entry.label));
  }
  out.push('}');
  Ok(out)
}

pub fn emit_json(table: &RangeTable) -> Result<String, EmitError> {
  Ok(serde_json::to_string_pretty(table)?)
}

fn rust_pattern(entry: &RangeEntry, ty: IntType) -> Result<String, EmitError> {
  Ok(match (entry.lower, entry.upper) {
    (Lower::Unbounded, Upper::At(hi)) => format!("{ty}::MIN..={}", ty.check(hi)?),
    (Lower::At(lo), Upper::At(hi)) if lo == hi => ty.check(lo)?.to_string(),
    (Lower::At(lo), Upper::At(hi)) => format!("{}..={}", ty.check(lo)?, ty.check(hi)?),
    (Lower::At(lo), Upper::Unbounded) => format!("{}..", ty.check(lo)?),
    (Lower::Unbounded, Upper::Unbounded) => "_".to_string(),
  })
}

fn is_valid_scrutinee(s: &str) -> bool {
  !s.is_empty()
    && !s.starts_with(|c: char| c.is_ascii_digit())
    && s.split('.').all(|seg| !seg.is_empty() && seg.chars().all(|c| c.is_ascii_alphanumeric() || c == '_'))
}
