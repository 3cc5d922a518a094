//! Render a [`SourceFile`] back to source text.

use std::fmt::Write;

use crate::ast::{Expression, ImportDeclaration, SourceFile, Statement, VariableStatement};

#[derive(Debug, Clone)]
pub struct PrinterOptions {
    pub indent: String,
    pub new_line: String,
}

impl Default for PrinterOptions {
    fn default() -> Self {
        Self {
            indent: "    ".to_string(),
            new_line: "\n".to_string(),
        }
    }
}

/// Quote `text` as a double-quoted string literal.
pub fn quote_string(text: &str) -> String {
    serde_json::to_string(text).unwrap_or_else(|_| format!("\"{text}\""))
}

pub struct Printer {
    options: PrinterOptions,
    output: String,
}

impl Printer {
    pub fn new(options: PrinterOptions) -> Self {
        Self {
            options,
            output: String::new(),
        }
    }

    pub fn print_file(mut self, file: &SourceFile) -> String {
        for statement in &file.statements {
            self.emit_statement(statement);
            self.output.push_str(&self.options.new_line);
        }
        self.output
    }

    fn emit_statement(&mut self, statement: &Statement) {
        match statement {
            Statement::Import(import) => self.emit_import(import),
            Statement::Variable(variable) => self.emit_variable(variable),
            Statement::Verbatim(text) => self.output.push_str(text),
        }
    }

    fn emit_import(&mut self, import: &ImportDeclaration) {
        self.output.push_str("import ");
        if let Some(binding) = &import.default_binding {
            self.output.push_str(&binding.text);
            self.output.push_str(" from ");
        }
        self.output.push_str(&quote_string(&import.module_specifier));
        self.output.push(';');
    }

    fn emit_variable(&mut self, variable: &VariableStatement) {
        if variable.exported {
            self.output.push_str("export ");
        }
        self.output.push_str(variable.kind.keyword());
        self.output.push(' ');
        for (index, declaration) in variable.declarations.iter().enumerate() {
            if index > 0 {
                self.output.push_str(", ");
            }
            self.output.push_str(&declaration.name);
            if let Some(annotation) = &declaration.type_annotation {
                self.output.push_str(": ");
                self.output.push_str(annotation);
            }
            if let Some(initializer) = &declaration.initializer {
                self.output.push_str(" = ");
                self.emit_expression(initializer, 0);
            }
        }
        self.output.push(';');
    }

    fn emit_expression(&mut self, expression: &Expression, depth: usize) {
        match expression {
            Expression::Identifier(identifier) => self.output.push_str(&identifier.text),
            Expression::StringLiteral(text) => self.output.push_str(&quote_string(text)),
            Expression::Verbatim(text) => self.output.push_str(text),
            Expression::ObjectLiteral(properties) if properties.is_empty() => {
                self.output.push_str("{}");
            }
            Expression::ObjectLiteral(properties) => {
                self.output.push('{');
                for (index, property) in properties.iter().enumerate() {
                    if index > 0 {
                        self.output.push(',');
                    }
                    self.output.push_str(&self.options.new_line);
                    self.write_indent(depth + 1);
                    let _ = write!(self.output, "{}: ", quote_string(&property.key));
                    self.emit_expression(&property.value, depth + 1);
                }
                self.output.push_str(&self.options.new_line);
                self.write_indent(depth);
                self.output.push('}');
            }
        }
    }

    fn write_indent(&mut self, depth: usize) {
        for _ in 0..depth {
            self.output.push_str(&self.options.indent);
        }
    }
}

/// Print `file` with default options.
pub fn print_source_file(file: &SourceFile) -> String {
    Printer::new(PrinterOptions::default()).print_file(file)
}
