//! The auto-import pipeline.
//!
//! Each file goes through three stages with a fresh [`FileState`]:
//!
//! 1. [`FileAnalyzer`]: reads the rules, fills both tables.
//! 2. [`ImportInserter`]: reads and finalizes the imported files, prepends the
//!    import declarations.
//! 3. [`VariableMaterializer`]: reads both tables, rewrites the variables.
//!
//! Files that are not the target of any rule come back untouched.

use tracing::{debug, debug_span};

use crate::ast::SourceFile;
use crate::context::{AutoImportContext, FileState};
use crate::factory::NodeFactory;
use crate::file_analyzer::FileAnalyzer;
use crate::import_inserter::ImportInserter;
use crate::materializer::{MaterializeMode, ObjectLiteralMaterializer, VariableMaterializer};

/// Result of running the pipeline on one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransformedFile {
    pub file: SourceFile,
    /// Tables as left by the last stage (identifiers finalized).
    pub state: FileState,
    pub changed: bool,
}

pub struct Transformer {
    context: AutoImportContext,
    analyzer: FileAnalyzer,
    inserter: ImportInserter,
    materializer: Box<dyn VariableMaterializer>,
}

impl Transformer {
    pub fn new(context: AutoImportContext) -> Self {
        Self::with_mode(context, MaterializeMode::default())
    }

    pub fn with_mode(context: AutoImportContext, mode: MaterializeMode) -> Self {
        Self::with_materializer(context, Box::new(ObjectLiteralMaterializer::new(mode)))
    }

    pub fn with_materializer(
        context: AutoImportContext,
        materializer: Box<dyn VariableMaterializer>,
    ) -> Self {
        Self {
            context,
            analyzer: FileAnalyzer,
            inserter: ImportInserter,
            materializer,
        }
    }

    pub fn context(&self) -> &AutoImportContext {
        &self.context
    }

    /// Run every stage on `file`.
    pub fn transform_file(&self, file: SourceFile) -> TransformedFile {
        let _span = debug_span!("auto_import", file = %file.file_name).entered();
        let mut state = FileState::new();

        if !self.analyzer.wants(&self.context, &file) {
            debug!("not an auto-import target");
            return TransformedFile {
                file,
                state,
                changed: false,
            };
        }
        self.analyzer.visit(&self.context, &file, &mut state);

        let mut factory = NodeFactory::for_source_file(&file);
        let file = if self.inserter.wants(&state.imported_files) {
            self.inserter
                .visit(file, &mut state.imported_files, &mut factory)
        } else {
            file
        };

        let file = self.materializer.materialize(
            file,
            &state.updated_variables,
            &state.imported_files,
            &factory,
        );

        TransformedFile {
            file,
            state,
            changed: true,
        }
    }

    /// Transform several files in order; each gets its own state.
    pub fn transform_files(
        &self,
        files: impl IntoIterator<Item = SourceFile>,
    ) -> Vec<TransformedFile> {
        files
            .into_iter()
            .map(|file| self.transform_file(file))
            .collect()
    }
}
