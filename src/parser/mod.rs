use thiserror::Error;
use tracing::trace;

use crate::marker::{SourceMarker, VersionMarker};

const SEPARATOR: &str = " = ";

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
  #[error("line {line}: expected `<label> = <version>`")]
  MissingSeparator { line: usize },
  #[error("line {line}: empty label")]
  EmptyLabel { line: usize },
  #[error("line {line}: invalid version '{value}'")]
  InvalidVersion { line: usize, value: String },
}

/// Read one marker per line. Blank lines and `#` comments are skipped.
pub fn parse_markers(input: &str) -> Result<Vec<SourceMarker>, ParseError> {
  let mut markers = Vec::new();
  for (idx, raw) in input.lines().enumerate() {
    let line = idx + 1;
    let text = raw.trim();
    if text.is_empty() || text.starts_with('#') {
      continue;
    }
    let marker = parse_line(raw, line)?;
    trace!(line, label = %marker.label, version = marker.version, "marker");
    markers.push(SourceMarker { marker, line });
  }
  Ok(markers)
}

fn parse_line(text: &str, line: usize) -> Result<VersionMarker, ParseError> {
  let (label, value) = text
    .split_once(SEPARATOR)
    .ok_or(ParseError::MissingSeparator { line })?;
  let label = label.trim();
  if label.is_empty() {
    return Err(ParseError::EmptyLabel { line });
  }
  let value = value.trim();
  let version = value.parse::<i64>().map_err(|_| ParseError::InvalidVersion {
    line,
    value: value.to_string(),
  })?;
  Ok(VersionMarker::new(label, version))
}
