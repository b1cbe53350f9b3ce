use std::fmt;

use serde::{Deserialize, Serialize};

pub const UNKNOWN_LABEL: &str = "Unknown";
pub const NEWER_SUFFIX: &str = " (or newer)";

/// Lower end of a range. `None` on the wire means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum Lower {
  Unbounded,
  At(i64),
}

/// Upper end of a range. `None` on the wire means unbounded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Option<i64>", into = "Option<i64>")]
pub enum Upper {
  At(i64),
  Unbounded,
}

impl From<Option<i64>> for Lower {
  fn from(v: Option<i64>) -> Self {
    v.map_or(Lower::Unbounded, Lower::At)
  }
}

impl From<Lower> for Option<i64> {
  fn from(v: Lower) -> Self {
    match v {
      Lower::Unbounded => None,
      Lower::At(n) => Some(n),
    }
  }
}

impl From<Option<i64>> for Upper {
  fn from(v: Option<i64>) -> Self {
    v.map_or(Upper::Unbounded, Upper::At)
  }
}

impl From<Upper> for Option<i64> {
  fn from(v: Upper) -> Self {
    match v {
      Upper::At(n) => Some(n),
      Upper::Unbounded => None,
    }
  }
}

/// Which step of the compile pass produced an entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum EntryKind {
  /// `..=-1`, always first.
  Sentinel,
  /// Non-negative values below the first marker.
  Undefined,
  #[default]
  Marker,
  /// Values strictly between two known markers.
  Gap,
  /// Everything above the last marker.
  Newer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RangeEntry {
  pub lower: Lower,
  pub upper: Upper,
  pub label: String,
  #[serde(skip)]
  pub kind: EntryKind,
}

impl RangeEntry {
  pub fn sentinel() -> Self {
    Self {
      lower: Lower::Unbounded,
      upper: Upper::At(-1),
      label: UNKNOWN_LABEL.to_string(),
      kind: EntryKind::Sentinel,
    }
  }

  pub fn undefined(upper: i64) -> Self {
    Self {
      lower: Lower::At(0),
      upper: Upper::At(upper),
      label: UNKNOWN_LABEL.to_string(),
      kind: EntryKind::Undefined,
    }
  }

  pub fn marker(version: i64, label: impl Into<String>) -> Self {
    Self {
      lower: Lower::At(version),
      upper: Upper::At(version),
      label: label.into(),
      kind: EntryKind::Marker,
    }
  }

  /// `label` is the run label; the suffix is appended here.
  pub fn gap(lower: i64, upper: i64, label: &str) -> Self {
    Self {
      lower: Lower::At(lower),
      upper: Upper::At(upper),
      label: format!("{label}{NEWER_SUFFIX}"),
      kind: EntryKind::Gap,
    }
  }

  pub fn newer(lower: i64, label: &str) -> Self {
    Self {
      lower: Lower::At(lower),
      upper: Upper::Unbounded,
      label: format!("{label}{NEWER_SUFFIX}"),
      kind: EntryKind::Newer,
    }
  }

  pub fn contains(&self, version: i64) -> bool {
    let above = match self.lower {
      Lower::Unbounded => true,
      Lower::At(lo) => version >= lo,
    };
    let below = match self.upper {
      Upper::At(hi) => version <= hi,
      Upper::Unbounded => true,
    };
    above && below
  }

  pub fn is_single(&self) -> bool {
    matches!((self.lower, self.upper), (Lower::At(lo), Upper::At(hi)) if lo == hi)
  }

  pub fn is_gap(&self) -> bool {
    self.kind == EntryKind::Gap
  }
}

impl fmt::Display for RangeEntry {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match (self.lower, self.upper) {
      (Lower::Unbounded, Upper::At(hi)) => write!(f, "..={hi}")?,
      (Lower::At(lo), Upper::At(hi)) if lo == hi => write!(f, "{lo}")?,
      (Lower::At(lo), Upper::At(hi)) => write!(f, "{lo}..={hi}")?,
      (Lower::At(lo), Upper::Unbounded) => write!(f, "{lo}..")?,
      (Lower::Unbounded, Upper::Unbounded) => write!(f, "..")?,
    }
    write!(f, " => {}", self.label)
  }
}

/// Ordered, gap-free partition of the integers produced by one compile run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RangeTable {
  entries: Vec<RangeEntry>,
}

impl RangeTable {
  pub(crate) fn from_entries(entries: Vec<RangeEntry>) -> Self {
    Self { entries }
  }

  pub fn entries(&self) -> &[RangeEntry] {
    &self.entries
  }

  pub fn len(&self) -> usize {
    self.entries.len()
  }

  pub fn is_empty(&self) -> bool {
    self.entries.is_empty()
  }

  pub fn iter(&self) -> std::slice::Iter<'_, RangeEntry> {
    self.entries.iter()
  }

  /// Label of the entry covering `version`.
  pub fn lookup(&self, version: i64) -> Option<&str> {
    // entries are sorted and disjoint, so the first entry whose upper bound
    // reaches `version` is the one containing it
    let idx = self.entries.partition_point(|e| match e.upper {
      Upper::At(hi) => hi < version,
      Upper::Unbounded => false,
    });
    self
      .entries
      .get(idx)
      .filter(|e| e.contains(version))
      .map(|e| e.label.as_str())
  }
}

impl<'a> IntoIterator for &'a RangeTable {
  type Item = &'a RangeEntry;
  type IntoIter = std::slice::Iter<'a, RangeEntry>;

  fn into_iter(self) -> Self::IntoIter {
    self.entries.iter()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn sample() -> RangeTable {
    RangeTable::from_entries(vec![
      RangeEntry::sentinel(),
      RangeEntry::undefined(0),
      RangeEntry::marker(1, "A"),
      RangeEntry::gap(2, 4, "A"),
      RangeEntry::marker(5, "B (or newer)"),
      RangeEntry::newer(6, "B (or newer)"),
    ])
  }

  #[test]
  fn lookup_hits_every_region() {
    let table = sample();
    assert_eq!(table.lookup(i64::MIN), Some("Unknown"));
    assert_eq!(table.lookup(-1), Some("Unknown"));
    assert_eq!(table.lookup(0), Some("Unknown"));
    assert_eq!(table.lookup(1), Some("A"));
    assert_eq!(table.lookup(3), Some("A (or newer)"));
    assert_eq!(table.lookup(5), Some("B (or newer)"));
    assert_eq!(table.lookup(i64::MAX), Some("B (or newer) (or newer)"));
  }

  #[test]
  fn unbounded_sides_serialize_as_null() {
    let json = serde_json::to_value(sample()).unwrap();
    assert_eq!(json[0]["lower"], serde_json::Value::Null);
    assert_eq!(json[0]["upper"], serde_json::json!(-1));
    assert_eq!(json[5]["upper"], serde_json::Value::Null);
    assert!(json[0].get("kind").is_none());
  }

  #[test]
  fn gaps_are_found_by_kind_not_label() {
    let table = sample();
    let gaps: Vec<_> = table.iter().filter(|e| e.is_gap()).map(|e| e.to_string()).collect();
    assert_eq!(gaps, vec!["2..=4 => A (or newer)".to_string()]);
  }
}
