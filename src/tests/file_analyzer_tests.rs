use indexmap::IndexMap;

use crate::ast::SourceFile;
use crate::config::{AutoImportRule, default_extension_rewrite};
use crate::context::{AutoImportContext, FileState};
use crate::file_analyzer::{FileAnalyzer, map_found_file};

fn rule(target: &str, variable: &str, found: &[&str]) -> AutoImportRule {
    AutoImportRule {
        source_glob: "**/*".to_string(),
        source_ignore: Vec::new(),
        target_file: target.to_string(),
        target_variable: variable.to_string(),
        extension_rewrite: default_extension_rewrite(),
        found_files: found.iter().map(|file| (*file).to_string()).collect(),
    }
}

fn rewrite(pairs: &[(&str, &str)]) -> IndexMap<String, String> {
    pairs
        .iter()
        .map(|(from, to)| ((*from).to_string(), (*to).to_string()))
        .collect()
}

fn analyze(context: &AutoImportContext, file_name: &str) -> FileState {
    let file = SourceFile::new(file_name, Vec::new());
    let mut state = FileState::new();
    assert!(FileAnalyzer.wants(context, &file));
    FileAnalyzer.visit(context, &file, &mut state);
    state
}

#[test]
fn maps_sibling_nested_and_outside_files() {
    let rule = rule("plugins/index.ts", "values", &[]);
    let sibling = map_found_file("/base", "/base/plugins", "plugins/a.ts", &rule);
    assert_eq!(sibling.display_key, "a.ts");
    assert_eq!(sibling.specifier, "./a.js");

    let nested = map_found_file("/base", "/base/plugins", "plugins/specials/b.tsx", &rule);
    assert_eq!(nested.display_key, "specials/b.tsx");
    assert_eq!(nested.specifier, "./specials/b.jsx");

    let outside = map_found_file("/base", "/base/plugins", "outside/c.ts", &rule);
    assert_eq!(outside.display_key, "../outside/c.ts");
    assert_eq!(outside.specifier, "../outside/c.js");
}

#[test]
fn only_last_extension_segment_is_rewritten() {
    let rule = rule("index.ts", "values", &[]);
    let mapped = map_found_file("/base", "/base", "types/a.d.ts", &rule);
    assert_eq!(mapped.display_key, "types/a.d.ts");
    assert_eq!(mapped.specifier, "./types/a.d.js");
}

#[test]
fn unknown_or_missing_extensions_are_kept() {
    let mut rule = rule("index.ts", "values", &[]);
    rule.extension_rewrite = rewrite(&[("ts", "js"), ("mts", "mjs")]);

    assert_eq!(
        map_found_file("/base", "/base", "a.js", &rule).specifier,
        "./a.js"
    );
    assert_eq!(
        map_found_file("/base", "/base", "b.mts", &rule).specifier,
        "./b.mjs"
    );
    assert_eq!(
        map_found_file("/base", "/base", "Makefile", &rule).specifier,
        "./Makefile"
    );
    // Extension matching is case-sensitive.
    assert_eq!(
        map_found_file("/base", "/base", "c.TS", &rule).specifier,
        "./c.TS"
    );
}

#[test]
fn empty_rewrite_table_keeps_extensions() {
    let mut rule = rule("index.ts", "values", &[]);
    rule.extension_rewrite = IndexMap::new();
    assert_eq!(
        map_found_file("/base", "/base", "a.ts", &rule).specifier,
        "./a.ts"
    );
}

#[test]
fn non_target_files_are_not_wanted() {
    let context = AutoImportContext::from_rules(
        "/base",
        vec![rule("plugins/index.ts", "values", &["plugins/a.ts"])],
    );
    assert!(!FileAnalyzer.wants(&context, &SourceFile::new("/base/index.ts", Vec::new())));
    assert!(!FileAnalyzer.wants(
        &context,
        &SourceFile::new("/elsewhere/plugins/index.ts", Vec::new())
    ));
    assert!(FileAnalyzer.wants(
        &context,
        &SourceFile::new("/base/plugins/index.ts", Vec::new())
    ));
    assert!(FileAnalyzer.wants(&context, &SourceFile::new("plugins/index.ts", Vec::new())));
}

#[test]
fn fills_both_tables_in_discovery_order() {
    let context = AutoImportContext::from_rules(
        "/base",
        vec![rule(
            "plugins/index.ts",
            "values",
            &["plugins/b.ts", "plugins/a.ts"],
        )],
    );
    let state = analyze(&context, "/base/plugins/index.ts");

    let imports: Vec<(&str, &str)> = state
        .imported_files
        .iter()
        .map(|(specifier, binding)| (specifier, binding.placeholder.as_str()))
        .collect();
    assert_eq!(
        imports,
        vec![("./b.js", "auto_import_0"), ("./a.js", "auto_import_1")]
    );
    let values = &state.updated_variables["values"];
    assert_eq!(values.get("b.ts").map(String::as_str), Some("./b.js"));
    assert_eq!(values.get("a.ts").map(String::as_str), Some("./a.js"));
}

#[test]
fn rules_for_same_variable_merge_and_share_imports() {
    let context = AutoImportContext::from_rules(
        "/base",
        vec![
            rule("plugins/index.ts", "values", &["plugins/a.ts", "plugins/b.ts"]),
            rule("plugins/index.ts", "values", &["plugins/b.ts", "plugins/c.ts"]),
            rule("plugins/index.ts", "others", &["plugins/a.ts"]),
        ],
    );
    let state = analyze(&context, "/base/plugins/index.ts");

    assert_eq!(
        state.imported_files.specifiers().collect::<Vec<_>>(),
        vec!["./a.js", "./b.js", "./c.js"]
    );
    let keys: Vec<&str> = state.updated_variables["values"]
        .keys()
        .map(String::as_str)
        .collect();
    assert_eq!(keys, vec!["a.ts", "b.ts", "c.ts"]);
    assert_eq!(state.updated_variables["others"].len(), 1);
}

#[test]
fn duplicate_display_key_is_last_write_wins() {
    let mut first = rule("plugins/index.ts", "values", &["plugins/a.ts"]);
    first.extension_rewrite = rewrite(&[("ts", "js")]);
    let mut second = rule("plugins/index.ts", "values", &["plugins/a.ts"]);
    second.extension_rewrite = rewrite(&[("ts", "mjs")]);
    let context = AutoImportContext::from_rules("/base", vec![first, second]);

    let state = analyze(&context, "/base/plugins/index.ts");
    assert_eq!(
        state.updated_variables["values"].get("a.ts").map(String::as_str),
        Some("./a.mjs")
    );
    // Both modules stay imported even though only one is referenced.
    assert_eq!(state.imported_files.len(), 2);
}

#[test]
fn rule_without_matches_still_creates_variable_entry() {
    let context =
        AutoImportContext::from_rules("/base", vec![rule("plugins/index.ts", "values", &[])]);
    let state = analyze(&context, "/base/plugins/index.ts");
    assert!(state.imported_files.is_empty());
    assert!(state.updated_variables["values"].is_empty());
}

#[test]
fn analysis_is_deterministic() {
    let context = AutoImportContext::from_rules(
        "/base",
        vec![rule(
            "plugins/index.ts",
            "values",
            &["plugins/a.ts", "outside/x.ts", "plugins/specials/s.ts"],
        )],
    );
    let first = analyze(&context, "/base/plugins/index.ts");
    let second = analyze(&context, "/base/plugins/index.ts");
    assert_eq!(first, second);
}
