//! End-to-end tests: real files on disk, globbed and rewritten.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use rustc_hash::FxHashMap;
use serde_json::{Value, json};
use tempfile::TempDir;

use tsz_auto_import::ast::{Expression, SourceFile, Statement};
use tsz_auto_import::path_utils::path_to_posix;
use tsz_auto_import::printer::print_source_file;
use tsz_auto_import::source_parser::parse_source_file;
use tsz_auto_import::{AutoImportContext, TransformedFile, Transformer};

const INDEX_SOURCE: &str = "\
export const constValues: Record<string, string> = { initialized: true };
export let letValues: Record<string, string> = { initialized: true };
export var varValues: Record<string, string> = { initialized: true };
";

fn write_file(dir: &Path, name: &str, contents: &str) {
    let path = dir.join(name);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).expect("failed to create test dir");
    }
    std::fs::write(&path, contents).expect("failed to write test file");
}

/// `<tmp>/src` holds the sources, `<tmp>/elsewhere` is outside of it.
fn fixture() -> TempDir {
    let temp = TempDir::new().expect("temp dir");
    let files = [
        ("src/index.ts", INDEX_SOURCE),
        ("src/plugins/index.ts", INDEX_SOURCE),
        ("src/plugins/myFirstPlugin.ts", "export default 'Hello from myFirstPlugin.ts';\n"),
        ("src/plugins/otherone.ts", "export default 'Hello from otherone.ts';\n"),
        ("src/plugins/parasite.ts", "export default 'Hello from parasite.ts';\n"),
        ("src/plugins/directjs.js", "export default 'I am a direct JS module';\n"),
        ("src/plugins/iammjs.mts", "export default 'I am an MJS module';\n"),
        ("src/plugins/specials/specialThing.ts", "export default 'This is a special thing';\n"),
        ("src/plugins/specials/other.ts", "export default 'This is another special module';\n"),
        ("src/outside/outsideFile.ts", "export default 'I am outside of the folder';\n"),
        ("elsewhere/stranger.ts", "export default 'I am out of root';\n"),
    ];
    for (name, contents) in files {
        write_file(temp.path(), name, contents);
    }
    temp
}

fn compile(base: &Path, config: &Value, file: &str) -> TransformedFile {
    let context = AutoImportContext::new(config, base).expect("configuration should resolve");
    let transformer = Transformer::new(context);
    let path = base.join(file);
    let text = std::fs::read_to_string(&path).expect("read source");
    transformer.transform_file(parse_source_file(path_to_posix(&path), &text))
}

/// Display key -> imported specifier, as the variable would evaluate.
///
/// `None` when the variable still has its original initializer.
fn resolved_values(file: &SourceFile, variable: &str) -> Option<BTreeMap<String, String>> {
    let mut bindings: FxHashMap<&str, &str> = FxHashMap::default();
    let mut initializer = None;
    for statement in &file.statements {
        match statement {
            Statement::Import(import) => {
                if let Some(binding) = &import.default_binding {
                    bindings.insert(&binding.text, &import.module_specifier);
                }
            }
            Statement::Variable(statement) => {
                for declaration in &statement.declarations {
                    if declaration.name == variable {
                        initializer = declaration.initializer.as_ref();
                    }
                }
            }
            Statement::Verbatim(_) => {}
        }
    }

    let Some(Expression::ObjectLiteral(properties)) = initializer else {
        return None;
    };
    Some(
        properties
            .iter()
            .map(|property| {
                let Expression::Identifier(identifier) = &property.value else {
                    panic!("property {} is not an identifier", property.key);
                };
                let specifier = bindings
                    .get(identifier.text.as_str())
                    .unwrap_or_else(|| panic!("{} is not imported", identifier.text));
                (property.key.clone(), (*specifier).to_string())
            })
            .collect(),
    )
}

fn values(pairs: &[(&str, &str)]) -> Option<BTreeMap<String, String>> {
    Some(
        pairs
            .iter()
            .map(|(key, specifier)| ((*key).to_string(), (*specifier).to_string()))
            .collect(),
    )
}

fn base(temp: &TempDir) -> PathBuf {
    temp.path().join("src")
}

#[test]
fn simple_configuration() {
    let temp = fixture();
    let config = json!({ "autoImports": [
        {
            "source": { "glob": "plugins/*.ts", "ignore": "**/index.ts" },
            "target": { "file": "plugins/index.ts", "variable": "constValues" }
        },
        {
            "source": { "glob": "plugins/specials/*.ts" },
            "target": { "file": "plugins/index.ts", "variable": "letValues" }
        },
        {
            "source": { "glob": "plugins/specials/*" },
            "target": { "file": "plugins/index.ts", "variable": "varValues" }
        }
    ]});
    let result = compile(&base(&temp), &config, "plugins/index.ts");

    assert_eq!(
        resolved_values(&result.file, "constValues"),
        values(&[
            ("myFirstPlugin.ts", "./myFirstPlugin.js"),
            ("otherone.ts", "./otherone.js"),
            ("parasite.ts", "./parasite.js"),
        ])
    );
    let specials = values(&[
        ("specials/specialThing.ts", "./specials/specialThing.js"),
        ("specials/other.ts", "./specials/other.js"),
    ]);
    assert_eq!(resolved_values(&result.file, "letValues"), specials);
    assert_eq!(resolved_values(&result.file, "varValues"), specials);

    // Modules used by two variables are imported once.
    let imports = result
        .file
        .statements
        .iter()
        .filter(|statement| matches!(statement, Statement::Import(_)))
        .count();
    assert_eq!(imports, 5);
}

#[test]
fn merging_rules_into_one_variable() {
    let temp = fixture();
    let config = json!({ "autoImports": [
        {
            "source": { "glob": "plugins/*.ts", "ignore": "**/index.ts" },
            "target": { "file": "plugins/index.ts", "variable": "constValues" }
        },
        {
            "source": { "glob": "plugins/specials/*.ts" },
            "target": { "file": "plugins/index.ts", "variable": "constValues" }
        }
    ]});
    let result = compile(&base(&temp), &config, "plugins/index.ts");

    assert_eq!(
        resolved_values(&result.file, "constValues"),
        values(&[
            ("myFirstPlugin.ts", "./myFirstPlugin.js"),
            ("otherone.ts", "./otherone.js"),
            ("parasite.ts", "./parasite.js"),
            ("specials/specialThing.ts", "./specials/specialThing.js"),
            ("specials/other.ts", "./specials/other.js"),
        ])
    );
    assert_eq!(resolved_values(&result.file, "letValues"), None);
    assert_eq!(resolved_values(&result.file, "varValues"), None);
}

#[test]
fn extension_rewrite_option() {
    let temp = fixture();
    let config = json!({ "autoImports": [{
        "source": { "glob": "plugins/*.{ts,mts,js}", "ignore": "**/index.ts" },
        "target": {
            "file": "plugins/index.ts",
            "variable": "constValues",
            "extensionRewrite": { "ts": "js", "mts": "mjs" }
        }
    }]});
    let result = compile(&base(&temp), &config, "plugins/index.ts");

    assert_eq!(
        resolved_values(&result.file, "constValues"),
        values(&[
            ("directjs.js", "./directjs.js"),
            ("iammjs.mts", "./iammjs.mjs"),
            ("myFirstPlugin.ts", "./myFirstPlugin.js"),
            ("otherone.ts", "./otherone.js"),
            ("parasite.ts", "./parasite.js"),
        ])
    );
}

#[test]
fn empty_extension_rewrite_keeps_source_extensions() {
    let temp = fixture();
    let config = json!({ "autoImports": [{
        "source": { "glob": "plugins/specials/*.ts" },
        "target": { "file": "plugins/index.ts", "variable": "letValues", "extensionRewrite": {} }
    }]});
    let result = compile(&base(&temp), &config, "plugins/index.ts");

    assert_eq!(
        resolved_values(&result.file, "letValues"),
        values(&[
            ("specials/specialThing.ts", "./specials/specialThing.ts"),
            ("specials/other.ts", "./specials/other.ts"),
        ])
    );
}

#[test]
fn files_outside_of_target_directory() {
    let temp = fixture();
    let config = json!({ "autoImports": [
        {
            "source": { "glob": "outside/*.ts" },
            "target": { "file": "plugins/index.ts", "variable": "letValues" }
        },
        {
            "source": { "glob": "**/*.ts", "ignore": "**/index.ts" },
            "target": { "file": "plugins/index.ts", "variable": "varValues" }
        }
    ]});
    let result = compile(&base(&temp), &config, "plugins/index.ts");

    assert_eq!(resolved_values(&result.file, "constValues"), None);
    assert_eq!(
        resolved_values(&result.file, "letValues"),
        values(&[("../outside/outsideFile.ts", "../outside/outsideFile.js")])
    );
    assert_eq!(
        resolved_values(&result.file, "varValues"),
        values(&[
            ("myFirstPlugin.ts", "./myFirstPlugin.js"),
            ("otherone.ts", "./otherone.js"),
            ("parasite.ts", "./parasite.js"),
            ("specials/specialThing.ts", "./specials/specialThing.js"),
            ("specials/other.ts", "./specials/other.js"),
            ("../outside/outsideFile.ts", "../outside/outsideFile.js"),
        ])
    );
}

#[test]
fn without_root_directory() {
    let temp = fixture();
    let config = json!({ "autoImports": [{
        "source": { "glob": "src/plugins/*.ts", "ignore": "**/index.ts" },
        "target": { "file": "src/plugins/index.ts", "variable": "constValues" }
    }]});
    let result = compile(temp.path(), &config, "src/plugins/index.ts");

    assert_eq!(
        resolved_values(&result.file, "constValues"),
        values(&[
            ("myFirstPlugin.ts", "./myFirstPlugin.js"),
            ("otherone.ts", "./otherone.js"),
            ("parasite.ts", "./parasite.js"),
        ])
    );
}

#[test]
fn files_out_of_root_are_dropped() {
    let temp = fixture();
    let stranger = path_to_posix(&temp.path().join("elsewhere/stranger.ts"));
    let config = json!({ "autoImports": [{
        "source": { "glob": stranger },
        "target": { "file": "plugins/index.ts", "variable": "varValues" }
    }]});
    let result = compile(&base(&temp), &config, "plugins/index.ts");

    assert!(result.changed);
    assert!(result.state.imported_files.is_empty());
    assert_eq!(resolved_values(&result.file, "varValues"), values(&[]));
    assert!(print_source_file(&result.file).contains("export var varValues: Record<string, string> = {};"));
}

#[test]
fn absolute_glob_inside_root_is_relativized() {
    let temp = fixture();
    let pattern = format!("{}/outside/*.ts", path_to_posix(&base(&temp)));
    let config = json!({ "autoImports": [{
        "source": { "glob": pattern },
        "target": { "file": "plugins/index.ts", "variable": "letValues" }
    }]});
    let context = AutoImportContext::new(&config, base(&temp)).expect("resolve");
    assert_eq!(context.rules()[0].found_files, vec!["outside/outsideFile.ts"]);
}

#[test]
fn non_target_files_are_not_updated() {
    let temp = fixture();
    let config = json!({ "autoImports": [{
        "source": { "glob": "plugins/specials/*.ts" },
        "target": { "file": "index.ts", "variable": "varValues" }
    }]});

    let untouched = compile(&base(&temp), &config, "plugins/index.ts");
    assert!(!untouched.changed);
    assert_eq!(print_source_file(&untouched.file), INDEX_SOURCE);

    let target = compile(&base(&temp), &config, "index.ts");
    assert_eq!(
        resolved_values(&target.file, "varValues"),
        values(&[
            ("plugins/specials/specialThing.ts", "./plugins/specials/specialThing.js"),
            ("plugins/specials/other.ts", "./plugins/specials/other.js"),
        ])
    );
}

#[test]
fn output_is_deterministic() {
    let temp = fixture();
    let config = json!({ "autoImports": [{
        "source": { "glob": "**/*.{ts,mts,js}", "ignore": ["**/index.ts"] },
        "target": { "file": "plugins/index.ts", "variable": "varValues" }
    }]});
    let first = print_source_file(&compile(&base(&temp), &config, "plugins/index.ts").file);
    let second = print_source_file(&compile(&base(&temp), &config, "plugins/index.ts").file);
    assert_eq!(first, second);
    assert!(first.starts_with("import "));
}
