//! JavaScript module reference extraction.
//!
//! Only top-level program statements are inspected. Two shapes are
//! recognised: `import` declarations and `var`/`let`/`const` declarations
//! whose initializer is a bare `require('<string>')` call. Both are kept only
//! when the specifier is relative (starts with `.`).

use std::collections::VecDeque;

use tree_sitter::{Language, Node, Tree, TreeCursor};

use super::{LanguageAnalyser, References};
use crate::config::{DeclarationKind, ModuleReference, NAMESPACE_BINDING};

/// Analyser for `.js`, `.jsx`, `.mjs` and `.cjs` sources.
pub struct JavaScriptAnalyser;

impl Default for JavaScriptAnalyser {
    fn default() -> Self {
        Self
    }
}

impl JavaScriptAnalyser {
    pub fn new() -> Self {
        Self
    }
}

impl LanguageAnalyser for JavaScriptAnalyser {
    fn extensions(&self) -> &[&str] {
        &["js", "jsx", "mjs", "cjs"]
    }

    fn language_name(&self) -> &str {
        "JavaScript"
    }

    fn get_language(&self) -> Language {
        tree_sitter_javascript::LANGUAGE.into()
    }

    fn extract_references<'tree>(
        &self,
        tree: &'tree Tree,
        source: &'tree [u8],
        file_path: &'tree str,
    ) -> References<'tree> {
        Box::new(ReferenceIter::new(tree, source, file_path))
    }
}

/// Top-level statement shapes the extractor understands.
#[derive(Debug, Clone, Copy)]
enum Statement<'tree> {
    Import(Node<'tree>),
    VariableDeclaration(Node<'tree>),
}

impl<'tree> Statement<'tree> {
    fn classify(node: Node<'tree>) -> Option<Self> {
        match node.kind() {
            "import_statement" => Some(Self::Import(node)),
            "lexical_declaration" | "variable_declaration" => {
                Some(Self::VariableDeclaration(node))
            }
            _ => None,
        }
    }
}

/// Walks the program's top-level statements one at a time.
pub struct ReferenceIter<'tree> {
    cursor: TreeCursor<'tree>,
    started: bool,
    exhausted: bool,
    source: &'tree [u8],
    file_path: &'tree str,
    // A single declaration can hold several require declarators.
    pending: VecDeque<ModuleReference>,
}

impl<'tree> ReferenceIter<'tree> {
    pub fn new(tree: &'tree Tree, source: &'tree [u8], file_path: &'tree str) -> Self {
        Self {
            cursor: tree.walk(),
            started: false,
            exhausted: false,
            source,
            file_path,
            pending: VecDeque::new(),
        }
    }

    fn next_statement(&mut self) -> Option<Node<'tree>> {
        if self.exhausted {
            return None;
        }
        let moved = if self.started {
            self.cursor.goto_next_sibling()
        } else {
            self.started = true;
            self.cursor.goto_first_child()
        };
        if moved {
            Some(self.cursor.node())
        } else {
            self.exhausted = true;
            None
        }
    }

    fn reference(
        &self,
        specifier: String,
        declaration_kind: DeclarationKind,
        bound_names: Vec<String>,
    ) -> ModuleReference {
        ModuleReference {
            source_file: self.file_path.to_string(),
            specifier,
            declaration_kind,
            bound_names,
        }
    }

    fn import_reference(&self, node: Node<'tree>) -> Option<ModuleReference> {
        let specifier = node
            .child_by_field_name("source")
            .and_then(|s| string_value(s, self.source))?;
        if !specifier.starts_with('.') {
            return None;
        }

        let mut bound_names = Vec::new();
        let mut cursor = node.walk();
        for child in node.named_children(&mut cursor) {
            if child.kind() == "import_clause" {
                import_clause_names(child, self.source, &mut bound_names);
            }
        }

        Some(self.reference(specifier, DeclarationKind::DeclarativeImport, bound_names))
    }

    fn require_references(&self, declaration: Node<'tree>) -> Vec<ModuleReference> {
        let mut cursor = declaration.walk();
        let references = declaration
            .named_children(&mut cursor)
            .filter(|child| child.kind() == "variable_declarator")
            .filter_map(|declarator| self.require_reference(declarator))
            .collect();
        references
    }

    fn require_reference(&self, declarator: Node<'tree>) -> Option<ModuleReference> {
        let call = unparenthesized(declarator.child_by_field_name("value")?);
        if call.kind() != "call_expression" {
            return None;
        }
        let callee = call.child_by_field_name("function")?;
        if callee.kind() != "identifier" || callee.utf8_text(self.source).ok()? != "require" {
            return None;
        }

        let arguments = call.child_by_field_name("arguments")?;
        let mut cursor = arguments.walk();
        let first = arguments
            .named_children(&mut cursor)
            .find(|arg| arg.kind() != "comment")?;
        let specifier = string_value(first, self.source)?;
        if !specifier.starts_with('.') {
            return None;
        }

        // Plain identifier and array bindings carry no names.
        let bound_names = match declarator.child_by_field_name("name") {
            Some(pattern) if pattern.kind() == "object_pattern" => {
                destructured_keys(pattern, self.source)
            }
            _ => Vec::new(),
        };

        Some(self.reference(specifier, DeclarationKind::CallStyleRequire, bound_names))
    }
}

impl Iterator for ReferenceIter<'_> {
    type Item = ModuleReference;

    fn next(&mut self) -> Option<ModuleReference> {
        loop {
            if let Some(reference) = self.pending.pop_front() {
                return Some(reference);
            }
            let statement = self.next_statement()?;
            match Statement::classify(statement) {
                Some(Statement::Import(node)) => {
                    if let Some(reference) = self.import_reference(node) {
                        return Some(reference);
                    }
                }
                Some(Statement::VariableDeclaration(node)) => {
                    let references = self.require_references(node);
                    self.pending.extend(references);
                }
                None => {}
            }
        }
    }
}

/// Names bound by an import clause. Default bindings contribute nothing.
fn import_clause_names(clause: Node, source: &[u8], names: &mut Vec<String>) {
    let mut cursor = clause.walk();
    for binding in clause.named_children(&mut cursor) {
        match binding.kind() {
            "namespace_import" => names.push(NAMESPACE_BINDING.to_string()),
            "named_imports" => {
                let mut inner = binding.walk();
                for specifier in binding.named_children(&mut inner) {
                    if specifier.kind() != "import_specifier" {
                        continue;
                    }
                    // The exported-side name, not the local alias.
                    if let Some(name) = specifier
                        .child_by_field_name("name")
                        .and_then(|n| identifier_or_string(n, source))
                    {
                        names.push(name);
                    }
                }
            }
            _ => {}
        }
    }
}

/// Property keys of an object destructuring pattern, in source order.
fn destructured_keys(pattern: Node, source: &[u8]) -> Vec<String> {
    let mut keys = Vec::new();
    let mut cursor = pattern.walk();
    for property in pattern.named_children(&mut cursor) {
        let key = match property.kind() {
            "shorthand_property_identifier_pattern" => text(property, source),
            "pair_pattern" => property
                .child_by_field_name("key")
                .and_then(|k| property_key(k, source)),
            "object_assignment_pattern" => property
                .child_by_field_name("left")
                .filter(|l| l.kind() == "shorthand_property_identifier_pattern")
                .and_then(|l| text(l, source)),
            // rest_pattern, comments
            _ => None,
        };
        if let Some(key) = key {
            keys.push(key);
        }
    }
    keys
}

fn property_key(node: Node, source: &[u8]) -> Option<String> {
    match node.kind() {
        "property_identifier" | "identifier" | "number" => text(node, source),
        "string" => string_value(node, source),
        _ => None,
    }
}

fn identifier_or_string(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() == "string" {
        string_value(node, source)
    } else {
        text(node, source)
    }
}

fn text(node: Node, source: &[u8]) -> Option<String> {
    node.utf8_text(source).ok().map(str::to_string)
}

/// Strip any number of enclosing parentheses from an expression.
fn unparenthesized(mut node: Node) -> Node {
    while node.kind() == "parenthesized_expression" {
        match node.named_child(0) {
            Some(inner) => node = inner,
            None => break,
        }
    }
    node
}

/// Value of a string literal: quotes removed, escape sequences decoded.
fn string_value(node: Node, source: &[u8]) -> Option<String> {
    if node.kind() != "string" {
        return None;
    }
    let raw = node.utf8_text(source).ok()?;
    raw.get(1..raw.len().saturating_sub(1)).map(unescape)
}

fn unescape(body: &str) -> String {
    let mut out = String::with_capacity(body.len());
    let mut chars = body.chars().peekable();
    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }
        let Some(escaped) = chars.next() else {
            out.push('\\');
            break;
        };
        match escaped {
            'n' => out.push('\n'),
            't' => out.push('\t'),
            'r' => out.push('\r'),
            'b' => out.push('\u{8}'),
            'f' => out.push('\u{c}'),
            'v' => out.push('\u{b}'),
            '0' if !chars.peek().is_some_and(|d| d.is_ascii_digit()) => out.push('\0'),
            'x' => {
                let hex: String = chars.by_ref().take(2).collect();
                push_code_point(&mut out, &hex, 'x');
            }
            'u' if chars.peek() == Some(&'{') => {
                chars.next();
                let hex: String = chars.by_ref().take_while(|&d| d != '}').collect();
                push_code_point(&mut out, &hex, 'u');
            }
            'u' => {
                let hex: String = chars.by_ref().take(4).collect();
                push_code_point(&mut out, &hex, 'u');
            }
            // line continuation
            '\n' | '\u{2028}' | '\u{2029}' => {}
            '\r' => {
                if chars.peek() == Some(&'\n') {
                    chars.next();
                }
            }
            other => out.push(other),
        }
    }
    out
}

/// Push the code point spelled by `hex`, or the escape verbatim if invalid.
fn push_code_point(out: &mut String, hex: &str, marker: char) {
    match u32::from_str_radix(hex, 16).ok().and_then(char::from_u32) {
        Some(c) => out.push(c),
        None => {
            out.push('\\');
            out.push(marker);
            out.push_str(hex);
        }
    }
}
