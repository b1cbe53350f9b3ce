use thiserror::Error;
use tracing::debug;

use crate::marker::VersionMarker;
use crate::table::{RangeEntry, RangeTable};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CompileError {
  #[error("no version markers given")]
  Empty,
  /// `position` is the 1-based index of the first marker smaller than its predecessor.
  #[error("versions not ordered at marker {position}: {version} follows {previous}")]
  OrderingViolation { position: usize, version: i64, previous: i64 },
}

/// Markers sharing one version, labels kept in input order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Run {
  pub version: i64,
  pub labels: Vec<String>,
}

impl Run {
  pub fn label(&self) -> String {
    self.labels.join("/")
  }

  pub fn is_coalesced(&self) -> bool {
    self.labels.len() > 1
  }
}

/// Compile an ordered marker list into a total range table.
pub fn compile(markers: &[VersionMarker]) -> Result<RangeTable, CompileError> {
  let first = markers.first().ok_or(CompileError::Empty)?;
  check_ordering(markers)?;

  let mut entries = vec![RangeEntry::sentinel()];
  // ordering guarantees first.version >= 0; fill the values below it
  if first.version > 0 {
    entries.push(RangeEntry::undefined(first.version - 1));
  }

  let mut runs = coalesce(markers).into_iter().peekable();
  while let Some(run) = runs.next() {
    let label = run.label();
    debug!(version = run.version, label = %label, "range entry");
    entries.push(RangeEntry::marker(run.version, label.clone()));

    match runs.peek() {
      Some(next) => {
        if let Some(gap) = gap_entry(run.version, next.version, &label) {
          debug!(entry = %gap, "gap entry");
          entries.push(gap);
        }
      }
      None => {
        // nothing lies above i64::MAX
        if let Some(lower) = run.version.checked_add(1) {
          entries.push(RangeEntry::newer(lower, &label));
        }
      }
    }
  }

  debug!(markers = markers.len(), entries = entries.len(), "compiled range table");
  Ok(RangeTable::from_entries(entries))
}

/// Group consecutive markers with equal versions.
pub fn coalesce(markers: &[VersionMarker]) -> Vec<Run> {
  let mut runs: Vec<Run> = Vec::new();
  for marker in markers {
    match runs.last_mut() {
      Some(run) if run.version == marker.version => run.labels.push(marker.label.clone()),
      _ => runs.push(Run { version: marker.version, labels: vec![marker.label.clone()] }),
    }
  }
  runs
}

fn check_ordering(markers: &[VersionMarker]) -> Result<(), CompileError> {
  // the first marker is checked against a virtual predecessor at version 0
  let mut previous = 0;
  for (idx, marker) in markers.iter().enumerate() {
    if marker.version < previous {
      return Err(CompileError::OrderingViolation {
        position: idx + 1,
        version: marker.version,
        previous,
      });
    }
    previous = marker.version;
  }
  Ok(())
}

fn gap_entry(version: i64, next: i64, label: &str) -> Option<RangeEntry> {
  // next > version holds here, so neither bound overflows
  let lower = version + 1;
  let upper = next - 1;
  if lower > upper {
    return None;
  }
  Some(RangeEntry::gap(lower, upper, label))
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn coalesce_joins_equal_neighbours_only() {
    let markers = vec![
      VersionMarker::new("a", 1),
      VersionMarker::new("b", 1),
      VersionMarker::new("c", 2),
      VersionMarker::new("d", 2),
      VersionMarker::new("e", 2),
    ];
    let runs = coalesce(&markers);
    assert_eq!(runs.len(), 2);
    assert_eq!(runs[0].label(), "a/b");
    assert_eq!(runs[1].label(), "c/d/e");
    assert!(runs[1].is_coalesced());
  }

  #[test]
  fn one_integer_gap_is_a_single_value() {
    let gap = gap_entry(3, 5, "x").expect("gap");
    assert!(gap.is_single());
    assert_eq!(gap.to_string(), "4 => x (or newer)");
    assert_eq!(gap_entry(3, 4, "x"), None);
  }

  #[test]
  fn top_of_range_has_no_final_entry() {
    let table = compile(&[VersionMarker::new("max", i64::MAX)]).unwrap();
    let last = table.entries().last().unwrap();
    assert_eq!(last, &RangeEntry::marker(i64::MAX, "max"));
    assert_eq!(table.lookup(i64::MAX), Some("max"));
  }
}
