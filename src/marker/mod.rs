use serde::{Deserialize, Serialize};

/// One named release point, e.g. `1.4.0.5 = 269`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VersionMarker {
  pub label: String,
  pub version: i64,
}

impl VersionMarker {
  pub fn new(label: impl Into<String>, version: i64) -> Self {
    Self { label: label.into(), version }
  }
}

/// A marker together with the 1-based line it was read from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceMarker {
  pub marker: VersionMarker,
  pub line: usize,
}

/// Split parsed markers into the markers and their parallel source lines.
pub fn strip_lines(source: Vec<SourceMarker>) -> (Vec<VersionMarker>, Vec<usize>) {
  source.into_iter().map(|s| (s.marker, s.line)).unzip()
}
