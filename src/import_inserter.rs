//! Import synthesizer.
//!
//! Prepends one default import per registered module, in discovery order, and
//! writes the final binding names back into the imported-files table.

use tracing::debug;

use crate::ast::{SourceFile, Statement};
use crate::context::ImportedFiles;
use crate::factory::NodeFactory;

#[derive(Debug, Clone, Copy, Default)]
pub struct ImportInserter;

impl ImportInserter {
    pub fn wants(&self, imported_files: &ImportedFiles) -> bool {
        !imported_files.is_empty()
    }

    /// Reads and finalizes `imported_files`; replaces the statement list.
    pub fn visit(
        &self,
        mut file: SourceFile,
        imported_files: &mut ImportedFiles,
        factory: &mut NodeFactory,
    ) -> SourceFile {
        let pending: Vec<(String, String)> = imported_files
            .iter()
            .map(|(specifier, binding)| (specifier.to_string(), binding.placeholder.clone()))
            .collect();

        let mut statements = Vec::with_capacity(pending.len() + file.statements.len());
        for (specifier, placeholder) in pending {
            let declaration = factory
                .create_import_declaration(factory.create_identifier(placeholder), &specifier);
            let name = factory.get_generated_name_for_import(&declaration);
            imported_files.finalize(&specifier, name.clone());
            statements.push(Statement::Import(
                factory.update_import_declaration(declaration, name),
            ));
        }
        debug!(
            file = %file.file_name,
            imports = statements.len(),
            "inserted auto-imports"
        );

        statements.append(&mut file.statements);
        file.update_statements(statements)
    }
}
