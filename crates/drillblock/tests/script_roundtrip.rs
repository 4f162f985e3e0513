use std::collections::HashMap;

use approx::assert_relative_eq;
use drillblock::{emit, generate, Configuration, ScriptTarget};

/// `NAME = literal` assignments at the top level of a Python script.
fn assignments(script: &str) -> HashMap<String, f64> {
    script
        .lines()
        .filter_map(|line| line.split_once(" = "))
        .filter_map(|(name, value)| Some((name.to_string(), value.parse().ok()?)))
        .collect()
}

/// `key=value` pairs of the per-block summary comments.
fn summaries(script: &str, comment: &str) -> Vec<HashMap<String, f64>> {
    script
        .lines()
        .filter_map(|line| line.strip_prefix(comment)?.trim().strip_prefix("block "))
        .map(|rest| {
            rest.split_whitespace()
                .filter_map(|kv| kv.split_once('='))
                .filter_map(|(k, v)| Some((k.to_string(), v.parse().ok()?)))
                .collect()
        })
        .collect()
}

#[test]
fn rhino_literals_match_pipeline() {
    let config = Configuration::batch(&[3, 2, 5], 4.0, 0.5).with_segments(6);
    let script = emit(&config, ScriptTarget::Rhino);
    let vars = assignments(&script);
    assert_relative_eq!(vars["DRILL_RADIUS"], config.drill_radius);
    assert_relative_eq!(vars["GROOVE_DEPTH"], config.groove_depth);
    assert_relative_eq!(vars["HOLE_PITCH"], 20.0);
    assert_relative_eq!(vars["BATCH_SPACING"], 40.0);

    let blocks = generate(&config);
    let rows = summaries(&script, "#");
    assert_eq!(rows.len(), blocks.len());
    for (row, block) in rows.iter().zip(&blocks) {
        assert_eq!(row["hole_count"], block.layout.hole_count as f64);
        assert_relative_eq!(row["offset_x"], block.offset_x);
        assert_relative_eq!(row["box_height"], block.layout.box_height());
        assert_eq!(row["cutters"], block.layout.cutter_count() as f64);
        assert_relative_eq!(row["side_groove"], block.layout.side_groove_offset());
        assert_relative_eq!(row["cap_groove"], block.layout.cap_groove_offset());
    }
}

#[test]
fn openscad_literals_match_pipeline() {
    let config = Configuration::single(4, 1.5, 0.25);
    let script = emit(&config, ScriptTarget::OpenScad);
    let vars: HashMap<String, f64> = script
        .lines()
        .filter_map(|line| line.strip_suffix(';')?.split_once(" = "))
        .filter_map(|(k, v)| Some((k.to_string(), v.parse().ok()?)))
        .collect();
    assert_relative_eq!(vars["drill_radius"], 1.5);
    assert_relative_eq!(vars["groove_depth"], 0.25);

    let rows = summaries(&script, "//");
    assert_eq!(rows.len(), 1);
    assert_relative_eq!(rows[0]["box_height"], 80.0);
}

#[test]
fn zero_depth_script_keeps_guarded_grooves() {
    let config = Configuration::single(3, 2.0, 0.0);
    let script = emit(&config, ScriptTarget::Rhino);
    assert!(script.contains("GROOVE_DEPTH = 0.0\n"));
    assert_eq!(script.matches("if GROOVE_DEPTH > 0:").count(), 2);
    let rows = summaries(&script, "#");
    assert_eq!(rows[0]["cutters"], 7.0);
}

#[test]
fn script_has_driver_and_completion_message() {
    let script = emit(&Configuration::default(), ScriptTarget::Rhino);
    assert!(script.contains("BATCH_LIST = [5]"));
    assert!(script.contains("def make_block(hole_count, offset_x):"));
    assert!(script.contains("generation complete"));
    assert!(script.trim_end().ends_with("main()"));
}
