use crate::compiler::coalesce;
use crate::marker::VersionMarker;
use crate::table::{RangeTable, Upper};

pub fn generate_report(markers: &[VersionMarker], table: &RangeTable) -> String {
  let runs = coalesce(markers);
  let mut out = String::new();
  out.push_str(&format!("markers: {}\n", markers.len()));
  out.push_str(&format!("distinct versions: {}\n", runs.len()));

  let coalesced: Vec<_> = runs.iter().filter(|r| r.is_coalesced()).collect();
  out.push_str(&format!("coalesced: {}\n", coalesced.len()));
  for run in coalesced {
    out.push_str(&format!("  {} => {}\n", run.version, run.label()));
  }

  let gaps: Vec<_> = table.iter().filter(|e| e.is_gap()).collect();
  out.push_str(&format!("gaps: {}\n", gaps.len()));
  for gap in gaps {
    out.push_str(&format!("  {}\n", gap));
  }

  out.push_str(&format!("entries: {}\n", table.len()));
  if let (Some(first), Some(last)) = (runs.first(), runs.last()) {
    out.push_str(&format!("span: {}..={}\n", first.version, last.version));
  }
  let open_ended = table.iter().any(|e| e.upper == Upper::Unbounded);
  out.push_str(&format!("open ended: {}\n", if open_ended { "yes" } else { "no" }));
  out
}
