//! Variable materializer.
//!
//! Rewrites the initializer of each target variable into an object literal
//! built from the merged variable table. The trait is the boundary a host
//! can plug its own rewriting into; [`ObjectLiteralMaterializer`] works on
//! the AST of this crate.

use tracing::debug;

use crate::ast::{Expression, SourceFile, Statement};
use crate::context::{ImportedFiles, UpdatedVariables, VariableEntries};
use crate::factory::NodeFactory;

/// What the generated object properties point at.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum MaterializeMode {
    /// The imported binding (`{ "a.ts": a_js_1 }`).
    #[default]
    Identifier,
    /// The import specifier as a string (`{ "a.ts": "./a.js" }`).
    Specifier,
}

pub trait VariableMaterializer {
    /// `variables` already holds the merged result of every rule targeting
    /// each variable; `imported_files` holds the finalized bindings.
    fn materialize(
        &self,
        file: SourceFile,
        variables: &UpdatedVariables,
        imported_files: &ImportedFiles,
        factory: &NodeFactory,
    ) -> SourceFile;
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ObjectLiteralMaterializer {
    pub mode: MaterializeMode,
}

impl ObjectLiteralMaterializer {
    pub const fn new(mode: MaterializeMode) -> Self {
        Self { mode }
    }

    fn build_object(
        &self,
        entries: &VariableEntries,
        imported_files: &ImportedFiles,
        factory: &NodeFactory,
    ) -> Expression {
        let properties = entries
            .iter()
            .map(|(display_key, specifier)| {
                let value = match self.mode {
                    MaterializeMode::Specifier => factory.create_string_literal(specifier),
                    MaterializeMode::Identifier => match imported_files.get(specifier) {
                        Some(binding) => Expression::Identifier(binding.identifier()),
                        // Every specifier in the variable table was registered
                        // by the analyzer; keep the text if a host broke that.
                        None => factory.create_string_literal(specifier),
                    },
                };
                factory.create_property_assignment(display_key, value)
            })
            .collect();
        factory.create_object_literal(properties)
    }
}

impl VariableMaterializer for ObjectLiteralMaterializer {
    fn materialize(
        &self,
        mut file: SourceFile,
        variables: &UpdatedVariables,
        imported_files: &ImportedFiles,
        factory: &NodeFactory,
    ) -> SourceFile {
        for (variable, entries) in variables {
            let declaration = file.statements.iter_mut().find_map(|statement| match statement {
                Statement::Variable(statement) => statement
                    .declarations
                    .iter_mut()
                    .find(|declaration| declaration.name == *variable),
                _ => None,
            });

            match declaration {
                Some(declaration) => {
                    declaration.initializer =
                        Some(self.build_object(entries, imported_files, factory));
                    debug!(
                        file = %file.file_name,
                        variable = %variable,
                        entries = entries.len(),
                        "materialized auto-import variable"
                    );
                }
                None => {
                    debug!(
                        file = %file.file_name,
                        variable = %variable,
                        "target variable not declared at top level, skipping"
                    );
                }
            }
        }
        file
    }
}
