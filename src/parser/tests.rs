#[cfg(test)]
use super::*;

use std::fs;

use crate::ast::StructuralEvent;
use crate::error::{LtxError, Warning};

fn events_of(input: &str) -> Vec<StructuralEvent> {
    let (events, _) = parse_str(input, Path::new("<test>")).expect("Failed to parse input");
    events
}

#[test]
fn test_section_and_assignments() {
    let input = "\
[wpn_base]\n\
cost = 100\n\
[wpn_ak74] : wpn_base, wpn_rifle\n\
cost = 4200\n";

    let events = events_of(input);

    assert_eq!(
        events,
        vec![
            StructuralEvent::SectionStart {
                name: "wpn_base".into(),
                parents: vec![],
            },
            StructuralEvent::Assign {
                key: Some("cost".into()),
                values: vec!["100".into()],
            },
            StructuralEvent::SectionStart {
                name: "wpn_ak74".into(),
                parents: vec!["wpn_base".into(), "wpn_rifle".into()],
            },
            StructuralEvent::Assign {
                key: Some("cost".into()),
                values: vec!["4200".into()],
            },
        ]
    );
}

#[test]
fn test_bare_entry_has_no_key() {
    let events = events_of("[list]\nfirst\nsecond\n");

    assert_eq!(events[1], StructuralEvent::Assign { key: None, values: vec!["first".into()] });
    assert_eq!(events[2], StructuralEvent::Assign { key: None, values: vec!["second".into()] });
}

#[test]
fn test_csv_keeps_a_sequence() {
    let events = events_of("[a]\nk = hello, world\n");

    assert_eq!(
        events[1],
        StructuralEvent::Assign {
            key: Some("k".into()),
            values: vec!["hello".into(), "world".into()],
        }
    );
}

#[test]
fn test_unquoted_values_coalesce_with_warning() {
    let (events, warnings) = parse_str("[a]\nk = hello world\n", Path::new("<test>")).unwrap();

    assert_eq!(
        events[1],
        StructuralEvent::Assign {
            key: Some("k".into()),
            values: vec!["helloworld".into()],
        }
    );
    assert!(matches!(
        warnings.as_slice(),
        [Warning::ValueCoalescing { key, line: 2 }] if key == "k"
    ));
}

#[test]
fn test_precondition_parameter_is_never_coalesced() {
    let (events, warnings) =
        parse_str("[a]\nprecondition_parameter = x y\n", Path::new("<test>")).unwrap();

    assert_eq!(
        events[1],
        StructuralEvent::Assign {
            key: Some("precondition_parameter".into()),
            values: vec!["x".into(), "y".into()],
        }
    );
    assert!(warnings.is_empty());
}

#[test]
fn test_constraint_and_eval_are_dropped() {
    let events = events_of("[sr_idle]\non_actor_inside = sr_timer {+kill_done} %=run_timer%\n");

    assert_eq!(
        events[1],
        StructuralEvent::Assign {
            key: Some("on_actor_inside".into()),
            values: vec!["sr_timer".into()],
        }
    );
}

#[test]
fn test_empty_assignment_is_absent() {
    let events = events_of("[a]\nk =\n");

    assert_eq!(events[1], StructuralEvent::Assign { key: Some("k".into()), values: vec![] });
}

#[test]
fn test_identifier_out_of_section_is_fatal() {
    let result = parse_str("cost = 100\n", Path::new("<test>"));

    assert!(matches!(
        result,
        Err(LtxError::IdentifierOutOfSection { identifier, .. }) if identifier == "cost"
    ));
}

#[test]
fn test_header_requires_identifier_and_close() {
    assert!(matches!(
        parse_str("[=]\n", Path::new("<test>")),
        Err(LtxError::ExpectedToken { .. })
    ));
    assert!(matches!(
        parse_str("[name name2]\n", Path::new("<test>")),
        Err(LtxError::ExpectedToken { .. })
    ));
}

#[test]
fn test_include_requires_quoted_path() {
    assert!(matches!(
        parse_str("#include nope.ltx\n", Path::new("<test>")),
        Err(LtxError::ExpectedToken { .. })
    ));
}

#[test]
fn test_include_expansion() {
    let tmp = tempfile::tempdir().expect("Failed to create temp dir");
    fs::write(tmp.path().join("sub.ltx"), "[child]:root\nx = 1\n").unwrap();

    let main = tmp.path().join("main.ltx");
    fs::write(&main, "[root]\n#include \"sub.ltx\"\n").unwrap();

    let (events, warnings) = parse_file(&main).expect("Failed to parse");
    assert!(warnings.is_empty());

    assert_eq!(events.len(), 2);
    match &events[1] {
        StructuralEvent::Include { path, events } => {
            assert!(path.ends_with("sub.ltx"));
            assert_eq!(
                events[0],
                StructuralEvent::SectionStart {
                    name: "child".into(),
                    parents: vec!["root".into()],
                }
            );
        }
        other => panic!("Expected an Include event, got {:?}", other),
    }
}

#[test]
fn test_include_with_backslash_path() {
    let tmp = tempfile::tempdir().unwrap();
    fs::create_dir(tmp.path().join("sub")).unwrap();
    fs::write(tmp.path().join("sub").join("frag.ltx"), "[inner]\n").unwrap();

    let main = tmp.path().join("main.ltx");
    fs::write(&main, "#include \"sub\\frag.ltx\"\n").unwrap();

    let (events, warnings) = parse_file(&main).unwrap();
    assert!(warnings.is_empty());
    assert!(matches!(events[0], StructuralEvent::Include { .. }));
}

#[test]
fn test_glob_includes_expand_sorted() {
    let tmp = tempfile::tempdir().unwrap();
    // written out of order; expansion must sort lexicographically
    fs::write(tmp.path().join("mod_z.ltx"), "[z]\n").unwrap();
    fs::write(tmp.path().join("mod_a.ltx"), "[a]\n").unwrap();
    fs::write(tmp.path().join("other.ltx"), "[other]\n").unwrap();

    let main = tmp.path().join("main.ltx");
    fs::write(&main, "#include \"mod_*.ltx\"\n").unwrap();

    let (events, warnings) = parse_file(&main).unwrap();
    assert!(warnings.is_empty());

    let included: Vec<String> = events
        .iter()
        .map(|e| match e {
            StructuralEvent::Include { path, .. } => {
                path.file_name().unwrap().to_string_lossy().to_string()
            }
            other => panic!("Expected only Include events, got {:?}", other),
        })
        .collect();

    assert_eq!(included, vec!["mod_a.ltx", "mod_z.ltx"]);
}

#[test]
fn test_missing_include_warns_and_continues() {
    let tmp = tempfile::tempdir().unwrap();
    let main = tmp.path().join("main.ltx");
    fs::write(&main, "#include \"nope.ltx\"\n[after]\n").unwrap();

    let (events, warnings) = parse_file(&main).unwrap();

    assert!(matches!(
        warnings.as_slice(),
        [Warning::MissingInclude { path }] if path.ends_with("nope.ltx")
    ));
    assert_eq!(
        events,
        vec![StructuralEvent::SectionStart { name: "after".into(), parents: vec![] }]
    );
}

#[test]
fn test_empty_glob_warns_once() {
    let tmp = tempfile::tempdir().unwrap();
    let main = tmp.path().join("main.ltx");
    fs::write(&main, "#include \"missing_*.ltx\"\n").unwrap();

    let (events, warnings) = parse_file(&main).unwrap();

    assert!(events.is_empty());
    assert!(matches!(warnings.as_slice(), [Warning::MissingInclude { .. }]));
}

#[test]
fn test_include_cycle_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("a.ltx"), "[a]\n#include \"b.ltx\"\n").unwrap();
    fs::write(tmp.path().join("b.ltx"), "#include \"a.ltx\"\n").unwrap();

    assert!(matches!(
        parse_file(&tmp.path().join("a.ltx")),
        Err(LtxError::CyclicInclude { .. })
    ));
}

#[test]
fn test_self_include_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    let main = tmp.path().join("loop.ltx");
    fs::write(&main, "[a]\n#include \"loop.ltx\"\n").unwrap();

    assert!(matches!(parse_file(&main), Err(LtxError::CyclicInclude { .. })));
}

#[test]
fn test_diamond_includes_are_not_a_cycle() {
    // two sibling includes of the same file finish one before the other
    // starts; only re-entry while still expanding is cyclic
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("shared.ltx"), "[shared]\n").unwrap();

    let main = tmp.path().join("main.ltx");
    fs::write(&main, "#include \"shared.ltx\"\n#include \"shared.ltx\"\n").unwrap();

    let (events, warnings) = parse_file(&main).expect("Diamond include must parse");
    assert!(warnings.is_empty());
    assert_eq!(events.len(), 2);
}

#[test]
fn test_section_open_flag_crosses_include_boundaries() {
    // the included fragment opens no section of its own; its assignment
    // belongs to whatever section the includer left open
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("frag.ltx"), "extra = 1\n").unwrap();

    let main = tmp.path().join("main.ltx");
    fs::write(&main, "[host]\n#include \"frag.ltx\"\n").unwrap();

    let (events, _) = parse_file(&main).expect("Cross-file assignment must parse");

    match &events[1] {
        StructuralEvent::Include { events, .. } => {
            assert_eq!(
                events[0],
                StructuralEvent::Assign { key: Some("extra".into()), values: vec!["1".into()] }
            );
        }
        other => panic!("Expected an Include event, got {:?}", other),
    }
}

#[test]
fn test_assignment_before_any_section_inside_include_is_fatal() {
    let tmp = tempfile::tempdir().unwrap();
    fs::write(tmp.path().join("frag.ltx"), "orphan = 1\n").unwrap();

    let main = tmp.path().join("main.ltx");
    fs::write(&main, "#include \"frag.ltx\"\n").unwrap();

    assert!(matches!(
        parse_file(&main),
        Err(LtxError::IdentifierOutOfSection { .. })
    ));
}
