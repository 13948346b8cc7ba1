//! End-to-end scenarios across builder, index, diff and bulk stages.

use crate::{
    Options, StrategyPath, build_command_pack, build_rows, bulk_modify_number, compute_changes, dedupe_strategies,
    detect_duplicate_commands, detect_duplicate_strategies, freeze_forward_baseline, freeze_revert_baseline, parse,
    parse_chunked, parse_with,
};

const FOO: &str = "##Begin_Strategy\nStrategyName=Foo\nTriggerKeysBL=5,7\n##End_Strategy";

fn large_text(strategies: usize) -> String {
    let mut text = String::new();
    for i in 0..strategies {
        if i % 25 == 0 {
            text.push_str(&format!("#Begin_Folder Group{}\n", i % 3));
        }
        text.push_str(&format!(
            "##Begin_Strategy\nStrategyName=S{i}\nTriggerKey={i}\nTriggerKeysBL={} {}=30\n// note\n##End_Strategy\n",
            i + 1,
            i + 2
        ));
        if i % 25 == 24 {
            text.push_str("#End_Folder\n");
        }
    }
    text
}

#[test]
fn parsing_well_formed_text_is_idempotent() {
    let text = large_text(60);
    assert_eq!(parse(&text), parse(&text));
}

#[test]
fn same_named_folders_merge_in_source_order() {
    let text = "\
#Begin_Folder A
##Begin_Strategy
StrategyName=One
##End_Strategy
#End_Folder
#Begin_Folder B
##Begin_Strategy
StrategyName=Two
##End_Strategy
#End_Folder
#Begin_Folder A
##Begin_Strategy
StrategyName=Three
##End_Strategy
#End_Folder
";
    let doc = parse(text);
    let folders: Vec<_> = doc.folders().collect();

    assert_eq!(folders.len(), 2);
    assert_eq!(folders[0].name, "A");
    let names: Vec<&str> = folders[0].strategies.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["One", "Three"]);
}

#[test]
fn chunked_parse_matches_single_pass() {
    let text = large_text(400);
    let options = Options { chunk_threshold_lines: 100, yield_every_lines: 64, ..Options::default() };

    let mut yields = 0usize;
    let chunked = parse_chunked(&text, &options, |progress| {
        yields += 1;
        assert_eq!(progress.yields, yields);
    });

    assert!(yields > 10);
    assert_eq!(chunked, parse_with(&text, &Options::default()));
    assert_eq!(chunked.strategy_count(), 400);
    assert_eq!(chunked.folders().count(), 3);
}

#[test]
fn edit_produces_forward_and_revert_commands() {
    let mut doc = parse(FOO);
    let path = doc.paths()[0];
    doc.set_value(path, "TriggerKeysBL", "5,7,9");

    let changes = compute_changes(&doc);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].forward.as_deref(), Some("SetParam \"Foo\" TriggerKeysBL 5,7,9"));
    assert_eq!(changes[0].revert.as_deref(), Some("SetParam \"Foo\" TriggerKeysBL 5,7"));
    assert_eq!(changes[0].old_value, "5,7");
    assert_eq!(changes[0].new_value, "5,7,9");
    assert_eq!(changes[0].target, "Foo");
}

#[test]
fn bulk_remove_restores_original_value() {
    let mut doc = parse(FOO);
    let path = doc.paths()[0];
    doc.set_value(path, "TriggerKeysBL", "5,7,9");

    let rows = build_rows(&doc);
    assert_eq!(bulk_modify_number(&mut doc, &rows, 9, None, false, false), 1);
    assert_eq!(doc.strategy(path).and_then(|s| s.value("TriggerKeysBL")), Some("5,7"));
    assert!(compute_changes(&doc).is_empty());
}

#[test]
fn forward_baseline_does_not_move_revert() {
    let mut doc = parse(FOO);
    let path = doc.paths()[0];
    doc.set_value(path, "TriggerKeysBL", "5,7,9");
    freeze_forward_baseline(&mut doc);
    doc.set_value(path, "TriggerKeysBL", "5,7,9,11");

    let changes = compute_changes(&doc);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].forward.as_deref(), Some("SetParam \"Foo\" TriggerKeysBL 5,7,9,11"));
    assert_eq!(changes[0].old_value, "5,7,9");
    assert_eq!(changes[0].revert.as_deref(), Some("SetParam \"Foo\" TriggerKeysBL 5,7"));
}

#[test]
fn revert_baseline_does_not_move_forward() {
    let mut doc = parse(FOO);
    let path = doc.paths()[0];
    doc.set_value(path, "TriggerKeysBL", "5");
    freeze_revert_baseline(&mut doc);

    let changes = compute_changes(&doc);
    assert_eq!(changes.len(), 1);
    assert_eq!(changes[0].forward.as_deref(), Some("SetParam \"Foo\" TriggerKeysBL 5"));
    assert_eq!(changes[0].revert, None);

    freeze_forward_baseline(&mut doc);
    assert!(compute_changes(&doc).is_empty());
}

#[test]
fn duplicate_command_groups_count_every_occurrence() {
    let line = "SetParam \"Foo\" TriggerKeysBL 5";
    let text = [line, "SetParam \"Bar\" X 1", line, line, ""].join("\n");

    let dups = detect_duplicate_commands(&text);
    assert_eq!(dups.len(), 1);
    assert_eq!(dups[0].command, line);
    assert_eq!(dups[0].count, 3);

    let deduped = [line, "SetParam \"Bar\" X 1"].join("\n");
    assert!(detect_duplicate_commands(&deduped).is_empty());
}

#[test]
fn identical_strategies_with_identical_edits_are_duplicates() {
    let text = format!("{FOO}\n{FOO}\n");
    let mut doc = parse(&text);
    for path in doc.paths() {
        doc.set_value(path, "TriggerKeysBL", "5,7,9");
    }

    assert_eq!(detect_duplicate_strategies(&doc), vec![StrategyPath::top_level(1)]);

    let pack = build_command_pack(&compute_changes(&doc));
    assert_eq!(detect_duplicate_commands(&pack.forward)[0].count, 2);
}

#[test]
fn identical_deltas_flag_strategies_with_different_untouched_values() {
    // Dedup compares generated commands, not raw parameter state.
    let text = "\
##Begin_Strategy
StrategyName=Foo
TriggerKeysBL=5
Depth=1
##End_Strategy
##Begin_Strategy
StrategyName=Foo
TriggerKeysBL=6
Depth=2
##End_Strategy
";
    let mut doc = parse(text);
    for path in doc.paths() {
        doc.set_value(path, "TriggerKeysBL", "8");
    }

    assert_eq!(detect_duplicate_strategies(&doc), vec![StrategyPath::top_level(1)]);
}

#[test]
fn identical_unedited_strategies_are_duplicates() {
    let mut doc = parse(&format!("{FOO}\n{FOO}\n"));
    assert_eq!(detect_duplicate_strategies(&doc), vec![StrategyPath::top_level(1)]);

    assert_eq!(dedupe_strategies(&mut doc), 1);
    assert_eq!(doc.strategy_count(), 1);
    assert!(detect_duplicate_strategies(&doc).is_empty());
}

#[test]
fn unedited_strategies_share_the_empty_command_set() {
    // Known edge case: with no edits every strategy generates the same (empty) set.
    let text = "\
##Begin_Strategy
StrategyName=Foo
TriggerKeysBL=5
##End_Strategy
##Begin_Strategy
StrategyName=Bar
TriggerKeysBL=6
##End_Strategy
";
    let mut doc = parse(text);
    assert_eq!(detect_duplicate_strategies(&doc), vec![StrategyPath::top_level(1)]);

    doc.set_value(StrategyPath::top_level(1), "TriggerKeysBL", "7");
    assert!(detect_duplicate_strategies(&doc).is_empty());
}
