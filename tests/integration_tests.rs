//! End-to-end scenarios from the spec's literal test table: textual rule
//! file in, textual document in, textual document out, round-tripped
//! through the full reader -> builder -> matcher -> rule driver ->
//! writer pipeline.

use luxemog_codec::{read_all, read_one, Writer};
use luxemog_rule::RuleList;
use luxemog_value::EngineError;

fn rule_file(body: &str) -> String {
    format!("(luxemog 0.0.1) [{body}]")
}

fn apply_one(rules_src: &str, input: &str) -> String {
    let rules = RuleList::build(&read_one(rules_src).unwrap()).unwrap();
    let mut tree = read_one(input).unwrap();
    rules.apply(&mut tree, false).unwrap();
    Writer::new().write_value(&tree)
}

#[test]
fn scenario_1_literal_replacement() {
    let rules = rule_file("{from: 4, to: 5}");
    assert_eq!(apply_one(&rules, "4"), "5");
}

#[test]
fn scenario_2_typed_literal_replacement() {
    let rules = rule_file("{from: (int) 6, to: (dog) 6}");
    assert_eq!(apply_one(&rules, "(int) 6"), "(dog) 6");
}

#[test]
fn scenario_3_match_capture_reused_in_array() {
    let rules = rule_file("{from: [(*match) w, 735], to: [(*match) w, 28]}");
    assert_eq!(apply_one(&rules, "[[22, 735], 735]"), "[[22, 28], 28]");
}

#[test]
fn scenario_4_alt_rewrites_only_matching_alternative() {
    let rules = rule_file("{from: (*alt) [1, 7], to: 9}");
    assert_eq!(apply_one(&rules, "7"), "9");
    assert_eq!(apply_one(&rules, "2"), "2");
}

#[test]
fn scenario_5_regex_gates_a_digit() {
    let rules = rule_file(r#"{from: (*regex) "[[:digit:]]", to: 5}"#);
    assert_eq!(apply_one(&rules, "4"), "5");
    assert_eq!(apply_one(&rules, "a"), "a");
}

#[test]
fn scenario_6_subtransform_applies_at_match_site_only() {
    let rules = rule_file("{from: {x: (*match) v}, subtransforms: [{from: 7, to: 9}]}");
    assert_eq!(apply_one(&rules, "{x: 7}"), "{x: 9}");
    assert_eq!(apply_one(&rules, "{y: 7}"), "{y: 7}");
}

#[test]
fn scenario_7_type_template_builds_from_format_string() {
    // The codec is external to the core (spec §1) and free to choose its
    // own quoting convention for a typename containing a space; what the
    // engine must get right is the *value* -- type "dog adhesive" over an
    // empty, untyped array.
    let rules_root = read_one(&rule_file(
        r#"{from: (*wild), to: (*type) {format: "dog adhesive", value: []}}"#,
    ))
    .unwrap();
    let rules = RuleList::build(&rules_root).unwrap();
    let mut tree = read_one("1").unwrap();
    rules.apply(&mut tree, false).unwrap();
    assert_eq!(tree.ty(), Some("dog adhesive"));
    assert_eq!(tree.as_array().unwrap().len(), 0);
}

#[test]
fn scenario_8_user_error_carries_message() {
    let rules_root = read_one(&rule_file("{from: 9, to: (*error) testing}")).unwrap();
    let rules = RuleList::build(&rules_root).unwrap();
    let mut tree = read_one("9").unwrap();
    let error = rules.apply(&mut tree, false).unwrap_err();
    assert!(matches!(error, EngineError::UserError(ref m) if m == "testing"));
}

#[test]
fn capture_round_trip_is_the_identity() {
    // {from: (*match) x, to: (*match) x} is the identity over any input tree.
    let rules = rule_file("{from: (*match) x, to: (*match) x}");
    for input in ["4", "(int) 6", "[1, 2, 3]", r#"{a: 1, b: [2, "three"]}"#] {
        assert_eq!(apply_one(&rules, input), apply_one("(luxemog 0.0.1) []", input));
    }
}

#[test]
fn missing_version_type_is_a_build_error() {
    let root = read_one("[{from: 4, to: 5}]").unwrap();
    assert!(RuleList::build(&root).is_err());
}

#[test]
fn reverse_swaps_from_and_to_across_the_whole_list() {
    let rules_root = read_one(&rule_file("{from: 4, to: 5}")).unwrap();
    let rules = RuleList::build(&rules_root).unwrap();
    let mut tree = read_one("5").unwrap();
    rules.apply(&mut tree, true).unwrap();
    assert_eq!(Writer::new().write_value(&tree), "4");
}

#[test]
fn reads_multiple_source_documents_and_applies_rules_to_each() {
    let rules_root = read_one(&rule_file("{from: 4, to: 5}")).unwrap();
    let rules = RuleList::build(&rules_root).unwrap();
    let mut trees = read_all("4 4 6").unwrap();
    for tree in &mut trees {
        rules.apply(tree, false).unwrap();
    }
    let texts: Vec<_> = trees.iter().map(|t| Writer::new().write_value(t)).collect();
    assert_eq!(texts, vec!["5", "5", "6"]);
}
