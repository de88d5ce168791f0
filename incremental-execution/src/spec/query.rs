//! Executable documents.

use std::collections::HashMap;

use apollo_compiler::Name;
use apollo_compiler::Node;
use apollo_compiler::ast;

use crate::error::CoercionError;
use crate::error::Location;
use crate::error::SpecError;

/// The fragment definitions of a document, by name.
pub type Fragments = HashMap<Name, Node<ast::FragmentDefinition>>;

/// A parsed executable document.
///
/// The document is not validated against a schema: selections of fields that do not exist
/// reach the executor, which decides what to do with them.
#[derive(Debug)]
pub struct Query {
    document: ast::Document,
    operations: Vec<Node<ast::OperationDefinition>>,
    fragments: Fragments,
}

impl Query {
    pub fn parse(source: impl Into<String>) -> Result<Self, SpecError> {
        let document = ast::Document::parse(source, "query.graphql")
            .map_err(|errors| SpecError::Parse(errors.to_string()))?;

        let mut operations = Vec::new();
        let mut fragments = Fragments::new();
        for definition in &document.definitions {
            match definition {
                ast::Definition::OperationDefinition(operation) => {
                    operations.push(operation.clone());
                }
                ast::Definition::FragmentDefinition(fragment) => {
                    fragments
                        .entry(fragment.name.clone())
                        .or_insert_with(|| fragment.clone());
                }
                _ => {}
            }
        }

        Ok(Query {
            document,
            operations,
            fragments,
        })
    }

    pub fn document(&self) -> &ast::Document {
        &self.document
    }

    pub fn operations(&self) -> &[Node<ast::OperationDefinition>] {
        &self.operations
    }

    pub fn fragments(&self) -> &Fragments {
        &self.fragments
    }

    /// Selects the operation to execute.
    ///
    /// Without a name the document must contain exactly one operation.
    pub fn operation(
        &self,
        operation_name: Option<&str>,
    ) -> Result<&Node<ast::OperationDefinition>, CoercionError> {
        match operation_name {
            Some(name) => self
                .operations
                .iter()
                .find(|operation| operation.name.as_ref().is_some_and(|n| n.as_str() == name))
                .ok_or_else(|| CoercionError::UnknownOperation {
                    name: name.to_string(),
                }),
            None => match self.operations.as_slice() {
                [] => Err(CoercionError::NoOperation),
                [operation] => Ok(operation),
                _ => Err(CoercionError::OperationNameRequired),
            },
        }
    }

    /// The source location of a node of this document.
    pub(crate) fn location<T>(&self, node: &Node<T>) -> Option<Location> {
        node.line_column_range(&self.document.sources)
            .map(|range| Location {
                line: range.start.line as u32,
                column: range.start.column as u32,
            })
    }
}
