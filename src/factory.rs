//! Node factory: creates the nodes the transform inserts and hands out
//! collision-free names for them.

use rustc_hash::FxHashSet;

use crate::ast::{Expression, Identifier, ImportDeclaration, PropertyAssignment, SourceFile};

/// Turn a module specifier into an identifier base.
///
/// "./foo/bar.js" -> "foo_bar_js", "../outside/x-y.js" -> "outside_x_y_js"
pub fn sanitize_module_name(module_spec: &str) -> String {
    let mut rest = module_spec;
    loop {
        if let Some(stripped) = rest.strip_prefix("./") {
            rest = stripped;
        } else if let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        } else {
            break;
        }
    }

    let mut name: String = rest
        .chars()
        .map(|c| {
            if c.is_alphanumeric() || c == '_' || c == '$' {
                c
            } else {
                '_'
            }
        })
        .collect();
    if name.chars().next().is_some_and(|c| c.is_ascii_digit()) {
        name.insert(0, '_');
    }
    name
}

/// Per-file node factory.
///
/// Names generated here never collide with an identifier already present in
/// the file nor with another generated name.
#[derive(Debug, Default)]
pub struct NodeFactory {
    file_identifiers: FxHashSet<String>,
    generated_names: FxHashSet<String>,
}

impl NodeFactory {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn for_source_file(file: &SourceFile) -> Self {
        Self {
            file_identifiers: file.collect_identifiers(),
            generated_names: FxHashSet::default(),
        }
    }

    pub fn create_identifier(&self, text: impl Into<String>) -> Identifier {
        Identifier::new(text)
    }

    pub fn create_import_declaration(
        &self,
        default_binding: Identifier,
        module_specifier: impl Into<String>,
    ) -> ImportDeclaration {
        ImportDeclaration {
            default_binding: Some(default_binding),
            module_specifier: module_specifier.into(),
        }
    }

    pub fn update_import_declaration(
        &self,
        declaration: ImportDeclaration,
        default_binding: Identifier,
    ) -> ImportDeclaration {
        ImportDeclaration {
            default_binding: Some(default_binding),
            ..declaration
        }
    }

    pub fn create_string_literal(&self, text: impl Into<String>) -> Expression {
        Expression::StringLiteral(text.into())
    }

    pub fn create_object_literal(&self, properties: Vec<PropertyAssignment>) -> Expression {
        Expression::ObjectLiteral(properties)
    }

    pub fn create_property_assignment(
        &self,
        key: impl Into<String>,
        value: Expression,
    ) -> PropertyAssignment {
        PropertyAssignment {
            key: key.into(),
            value,
        }
    }

    /// Name for the binding of an import declaration, derived from its module
    /// specifier (falling back to the current binding text).
    pub fn get_generated_name_for_import(&mut self, declaration: &ImportDeclaration) -> Identifier {
        let mut base = sanitize_module_name(&declaration.module_specifier);
        if base.is_empty() {
            base = declaration
                .default_binding
                .as_ref()
                .map(|binding| binding.text.clone())
                .unwrap_or_else(|| "module".to_string());
        }
        self.make_unique_name(&base)
    }

    /// `base_1`, `base_2`, ... skipping names already in use.
    fn make_unique_name(&mut self, base: &str) -> Identifier {
        let mut counter = 1u32;
        loop {
            let name = format!("{base}_{counter}");
            counter += 1;
            if !self.file_identifiers.contains(&name) && !self.generated_names.contains(&name) {
                self.generated_names.insert(name.clone());
                return Identifier::new(name);
            }
        }
    }
}
