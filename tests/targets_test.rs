use pretty_assertions::assert_eq;

use verrange::compiler::compile;
use verrange::marker::VersionMarker;
use verrange::targets::{emit, emit_json, emit_rust, resolve_target, EmitError, IntType, RustOptions, TargetKind};

fn table(pairs: &[(&str, i64)]) -> verrange::table::RangeTable {
    let markers: Vec<_> = pairs.iter().map(|(l, v)| VersionMarker::new(*l, *v)).collect();
    compile(&markers).expect("compile")
}

#[test]
fn emits_match_expression() {
    let out = emit_rust(&table(&[("A", 1), ("B", 5)]), &RustOptions::default()).expect("emit");
    let expected = r#"match version {
    i32::MIN..=-1 => "Unknown",
    0 => "Unknown",
    1 => "A",
    2..=4 => "A (or newer)",
    5 => "B",
    _ => "B (or newer)",
}"#;
    assert_eq!(out, expected);
}

#[test]
fn honours_int_type_and_scrutinee() {
    let options = RustOptions {
        int_type: IntType::I16,
        scrutinee: "header.version".to_string(),
    };
    let out = emit_rust(&table(&[("v0", 0), ("v1", 1)]), &options).expect("emit");
    let expected = r#"match header.version {
    i16::MIN..=-1 => "Unknown",
    0 => "v0",
    1 => "v1",
    _ => "v1 (or newer)",
}"#;
    assert_eq!(out, expected);
}

#[test]
fn escapes_labels() {
    let out = emit_rust(&table(&[("say \"hi\"", 3)]), &RustOptions::default()).expect("emit");
    assert!(out.contains(r#"3 => "say \"hi\"","#), "{out}");
    assert!(out.contains(r#"_ => "say \"hi\" (or newer)","#), "{out}");
}

#[test]
fn rejects_versions_outside_int_type() {
    let options = RustOptions {
        int_type: IntType::I8,
        ..RustOptions::default()
    };
    let err = emit_rust(&table(&[("a", 1), ("b", 300)]), &options).unwrap_err();
    assert!(matches!(err, EmitError::OutOfRange { ty: IntType::I8, .. }), "{err}");
}

#[test]
fn last_marker_at_i64_max_becomes_wildcard() {
    let options = RustOptions {
        int_type: IntType::I64,
        ..RustOptions::default()
    };
    let out = emit_rust(&table(&[("zero", 0), ("max", i64::MAX)]), &options).expect("emit");
    let expected = format!(
        r#"match version {{
    i64::MIN..=-1 => "Unknown",
    0 => "zero",
    1..={} => "zero (or newer)",
    _ => "max",
}}"#,
        i64::MAX - 1
    );
    assert_eq!(out, expected);
    assert!(out.ends_with("    _ => \"max\",\n}"));
    assert!(!out.contains(&format!("{}..", i64::MAX)));
}

#[test]
fn json_marks_unbounded_sides_with_null() {
    let out = emit_json(&table(&[("A", 1)])).expect("emit");
    let value: serde_json::Value = serde_json::from_str(&out).expect("valid json");
    assert_eq!(
        value,
        serde_json::json!([
            { "lower": null, "upper": -1, "label": "Unknown" },
            { "lower": 0, "upper": 0, "label": "Unknown" },
            { "lower": 1, "upper": 1, "label": "A" },
            { "lower": 2, "upper": null, "label": "A (or newer)" }
        ])
    );
}

#[test]
fn emit_dispatches_on_target() {
    let t = table(&[("A", 1)]);
    let kind = resolve_target("json").expect("target");
    assert_eq!(kind, TargetKind::Json);
    let out = emit(kind, &t, &RustOptions::default()).expect("emit");
    assert!(out.trim_start().starts_with('['));
}
