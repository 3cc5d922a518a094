//! Host AST used by the transform.
//!
//! Only the nodes the transform creates or rewrites are modelled: default
//! imports, top-level variable statements and the object literals that end
//! up in their initializers. Everything else is carried as verbatim source
//! text and printed back untouched.

use rustc_hash::FxHashSet;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Identifier {
    pub text: String,
}

impl Identifier {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceFile {
    /// Absolute (or base-relative) POSIX file name.
    pub file_name: String,
    pub statements: Vec<Statement>,
}

impl SourceFile {
    pub fn new(file_name: impl Into<String>, statements: Vec<Statement>) -> Self {
        Self {
            file_name: file_name.into(),
            statements,
        }
    }

    /// Replace the statement list, keeping the file identity.
    pub fn update_statements(self, statements: Vec<Statement>) -> Self {
        Self {
            file_name: self.file_name,
            statements,
        }
    }

    /// Every identifier-like word appearing in the file.
    ///
    /// Verbatim text is scanned token by token, including string contents and
    /// comments, so the set over-approximates the names in use.
    pub fn collect_identifiers(&self) -> FxHashSet<String> {
        let mut names = FxHashSet::default();
        for statement in &self.statements {
            match statement {
                Statement::Import(import) => {
                    if let Some(binding) = &import.default_binding {
                        names.insert(binding.text.clone());
                    }
                }
                Statement::Variable(variable) => {
                    for declaration in &variable.declarations {
                        names.insert(declaration.name.clone());
                        if let Some(annotation) = &declaration.type_annotation {
                            collect_words(annotation, &mut names);
                        }
                        if let Some(initializer) = &declaration.initializer {
                            initializer.collect_identifiers(&mut names);
                        }
                    }
                }
                Statement::Verbatim(text) => collect_words(text, &mut names),
            }
        }
        names
    }
}

fn collect_words(text: &str, names: &mut FxHashSet<String>) {
    for word in text.split(|c: char| !(c.is_alphanumeric() || c == '_' || c == '$')) {
        if word.chars().next().is_some_and(|c| !c.is_ascii_digit()) {
            names.insert(word.to_string());
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Statement {
    Import(ImportDeclaration),
    Variable(VariableStatement),
    /// Source text the transform does not look into.
    Verbatim(String),
}

/// `import <default_binding> from "<module_specifier>";`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportDeclaration {
    pub default_binding: Option<Identifier>,
    pub module_specifier: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VariableKind {
    Const,
    Let,
    Var,
}

impl VariableKind {
    pub const fn keyword(self) -> &'static str {
        match self {
            Self::Const => "const",
            Self::Let => "let",
            Self::Var => "var",
        }
    }

    pub fn from_keyword(keyword: &str) -> Option<Self> {
        match keyword {
            "const" => Some(Self::Const),
            "let" => Some(Self::Let),
            "var" => Some(Self::Var),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableStatement {
    pub exported: bool,
    pub kind: VariableKind,
    pub declarations: Vec<VariableDeclaration>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VariableDeclaration {
    pub name: String,
    /// Type annotation text, without the leading `:`.
    pub type_annotation: Option<String>,
    pub initializer: Option<Expression>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expression {
    Identifier(Identifier),
    StringLiteral(String),
    ObjectLiteral(Vec<PropertyAssignment>),
    /// Expression text the transform does not look into.
    Verbatim(String),
}

impl Expression {
    fn collect_identifiers(&self, names: &mut FxHashSet<String>) {
        match self {
            Expression::Identifier(identifier) => {
                names.insert(identifier.text.clone());
            }
            Expression::StringLiteral(_) => {}
            Expression::ObjectLiteral(properties) => {
                for property in properties {
                    property.value.collect_identifiers(names);
                }
            }
            Expression::Verbatim(text) => collect_words(text, names),
        }
    }
}

/// `"<key>": <value>`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyAssignment {
    pub key: String,
    pub value: Expression,
}
