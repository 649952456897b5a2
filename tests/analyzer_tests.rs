// tests/analyzer_tests.rs

use std::fs;

use specl::{Analyzer, AssertionError, Binding, DataObject, DeclarationError, InputError, SourceError, SpeclError};
use tempfile::tempdir;

// ============================================================================
// End-to-end scenarios
// ============================================================================

#[test]
fn test_map_input_declared_equality_passes() {
    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("status", "ok")]);
    let result = analyzer.evaluate_source("let s = status;\nequals(s, \"ok\")");
    assert!(result.unwrap());
}

#[test]
fn test_json_input_comparison_fails_cleanly() {
    let mut analyzer = Analyzer::new();
    analyzer.set_json_input(r#"{"count": 3}"#).unwrap();
    let result = analyzer.evaluate_source("let c = count;\ngreater-than(c, 5)");
    assert!(!result.unwrap());
}

#[test]
fn test_syntax_error_stops_before_evaluation() {
    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("status", "ok")]);
    let error = analyzer
        .evaluate_source("let s = status;\nequals(s, \"ok\"")
        .unwrap_err();

    let diagnostics = error.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert!(!diagnostics[0].message.is_empty());
    assert!(diagnostics[0].line > 0);
    assert!(!diagnostics[0].token.is_empty());
    assert!(analyzer.variables().is_empty());
    assert_eq!(error.to_string(), "SYNTAX ERRORS: 1 found");
}

#[test]
fn test_missing_input_is_reported() {
    let mut analyzer = Analyzer::new();
    analyzer.set_source("exists(a)");
    let error = analyzer.evaluate().unwrap_err();
    assert!(matches!(error, SpeclError::Input(InputError::Missing)));
    assert_eq!(error.to_string(), "Input not found or not defined");
}

// ============================================================================
// Sources
// ============================================================================

#[test]
fn test_input_is_checked_before_source() {
    let mut analyzer = Analyzer::new();
    assert!(matches!(analyzer.evaluate(), Err(SpeclError::Input(InputError::Missing))));
}

#[test]
fn test_missing_source() {
    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("a", 1)]);
    let error = analyzer.evaluate().unwrap_err();
    assert!(matches!(error, SpeclError::Source(SourceError::Missing)));
    assert!(error.to_string().starts_with("Assertions not found or not defined"));
}

#[test]
fn test_source_from_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("check.specl");
    fs::write(&path, "let a = a;\nequals(a, 1)\n").unwrap();

    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("a", 1)]);
    analyzer.set_source_path(&path);
    assert!(analyzer.evaluate().unwrap());

    // The file is read again on every evaluation.
    fs::write(&path, "equals(a, 2)").unwrap();
    assert!(!analyzer.evaluate().unwrap());
}

#[test]
fn test_unreadable_source_file() {
    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("a", 1)]);
    analyzer.set_source_path("/definitely/not/here.specl");
    assert!(matches!(
        analyzer.evaluate(),
        Err(SpeclError::Source(SourceError::Read { .. }))
    ));
}

#[test]
fn test_inline_source_replaces_configured_file() {
    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("a", 1)]);
    analyzer.set_source_path("/definitely/not/here.specl");
    analyzer.set_source("equals(a, 1)");
    assert!(analyzer.evaluate().unwrap());
}

// ============================================================================
// Inputs
// ============================================================================

#[test]
fn test_invalid_inputs_are_rejected() {
    let mut analyzer = Analyzer::new();
    assert!(matches!(analyzer.set_json_input("{\"a\": "), Err(InputError::Json(_))));
    assert!(matches!(analyzer.set_xml_input("<a><b></a>"), Err(InputError::Xml(_))));
    assert!(analyzer.input().is_none());
}

#[test]
fn test_repeated_xml_elements_match_json_arrays() {
    let source = "let items = order.item;\nsize(items, 2) and contains(items, \"b\") and all starts-with(order.item, \"\")";

    let mut xml = Analyzer::new();
    xml.set_xml_input("<order><item>a</item><item>b</item></order>").unwrap();

    let mut json = Analyzer::new();
    json.set_json_input(r#"{"order": {"item": ["a", "b"]}}"#).unwrap();

    let mut map = Analyzer::new();
    map.set_map_input([("order", DataObject::mapping([("item", "a"), ("item", "b")]))]);

    assert!(xml.evaluate_source(source).unwrap());
    assert!(json.evaluate_source(source).unwrap());
    assert!(map.evaluate_source(source).unwrap());
}

#[test]
fn test_indexed_repeated_elements_agree_across_shapes() {
    let source = "size(order.item, 2) and equals(order.item[1], \"b\") and not exists(order.item[2])";

    let mut xml = Analyzer::new();
    xml.set_xml_input("<order><item>a</item><item>b</item></order>").unwrap();

    let mut json = Analyzer::new();
    json.set_json_input(r#"{"order": {"item": ["a", "b"]}}"#).unwrap();

    let mut map = Analyzer::new();
    map.set_map_input([("order", DataObject::mapping([("item", "a"), ("item", "b")]))]);

    assert!(xml.evaluate_source(source).unwrap());
    assert!(json.evaluate_source(source).unwrap());
    assert!(map.evaluate_source(source).unwrap());
}

#[test]
fn test_xml_text_numbers_agree_with_json_numbers() {
    let source = "equals(r.count, \"3.0\") and less-or-equal(r.count, \"3.0\") and greater-or-equal(r.count, \"3.0\")";

    let mut xml = Analyzer::new();
    xml.set_xml_input("<r><count>3</count></r>").unwrap();

    let mut json = Analyzer::new();
    json.set_json_input(r#"{"r": {"count": 3}}"#).unwrap();

    assert!(xml.evaluate_source(source).unwrap());
    assert!(json.evaluate_source(source).unwrap());
}

#[test]
fn test_xml_attributes_are_addressable() {
    let mut analyzer = Analyzer::new();
    analyzer
        .set_xml_input(r#"<response code="200"><status>ok</status></response>"#)
        .unwrap();
    assert!(analyzer
        .evaluate_source("equals(response[\"@code\"], 200) and equals(response.status, \"ok\")")
        .unwrap());
}

// ============================================================================
// Declarations and variables
// ============================================================================

#[test]
fn test_duplicate_declaration_stops_before_assertions() {
    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("a", 1)]);
    let error = analyzer
        .evaluate_source("let x = a;\nlet x = a;\nexists($undefined)")
        .unwrap_err();
    assert!(matches!(
        error,
        SpeclError::Declaration(DeclarationError::DuplicateName(name)) if name == "x"
    ));
    assert!(analyzer.variables().is_empty());
}

#[test]
fn test_failed_declarations_clear_previous_variables() {
    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("a", 1)]);
    assert!(analyzer.evaluate_source("let x = a;\nexists(x)").unwrap());
    assert!(analyzer.get_variable("x").is_some());

    let error = analyzer.evaluate_source("let y = b;\nexists(y)").unwrap_err();
    assert!(matches!(error, SpeclError::Declaration(DeclarationError::Unresolved { .. })));
    assert!(analyzer.variables().is_empty());
}

#[test]
fn test_assertion_error_is_not_false() {
    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("a", "text")]);
    let error = analyzer.evaluate_source("let x = a;\ncontains(x, \"e\")").unwrap_err();
    assert!(matches!(error, SpeclError::Assertion(AssertionError::NotCollection { .. })));
    // Declarations bound before the failure stay readable.
    assert!(analyzer.get_variable("x").is_some());
}

#[test]
fn test_variable_side_channel() {
    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("tag", "a"), ("tag", "b")]);
    assert!(analyzer.evaluate_source("let tags = tag;\nsize(tags, 2)").unwrap());

    let tags = analyzer.get_variable("tags").unwrap();
    assert_eq!(tags.nodes(), &[DataObject::from("a"), DataObject::from("b")]);

    let previous = analyzer.put_variable("tags", DataObject::from("c"));
    assert_eq!(previous.as_ref().map(Binding::len), Some(2));
    assert_eq!(
        analyzer.get_variable("tags").and_then(Binding::as_single),
        Some(&DataObject::from("c"))
    );

    assert!(analyzer.put_variable("extra", DataObject::from(1)).is_none());
    assert!(analyzer.remove_variable("extra").is_some());
    assert!(analyzer.remove_variable("extra").is_none());
}

#[test]
fn test_new_input_clears_variables() {
    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("a", 1)]);
    analyzer.evaluate_source("let x = a;\nexists(x)").unwrap();
    assert_eq!(analyzer.variables().len(), 1);

    analyzer.set_json_input(r#"{"a": 2}"#).unwrap();
    assert!(analyzer.variables().is_empty());
}

#[test]
fn test_each_evaluation_starts_a_new_session() {
    let mut analyzer = Analyzer::new();
    analyzer.set_map_input([("a", 1)]);
    analyzer.set_source("let x = a;\nequals(x, 1)");

    // Same declaration twice: no duplicate, because the store is fresh.
    assert!(analyzer.evaluate().unwrap());
    assert!(analyzer.evaluate().unwrap());
    assert_eq!(analyzer.variables().len(), 1);
}
