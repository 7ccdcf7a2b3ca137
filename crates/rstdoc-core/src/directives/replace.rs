use crate::ast::{Document, Node, Substitutions};
use crate::directives::{Directive, DirectiveCall};
use crate::error::{ParseError, Result};

/// `.. |name| replace:: text` substitution definitions.
///
/// Definitions are collected while the document is parsed and appended as a
/// single `Substitutions` node when the registry is finalized.
#[derive(Debug, Clone, Default)]
pub struct Replace {
    definitions: Vec<(String, String)>,
}

impl Replace {
    /// Handler with no collected definitions.
    pub fn new() -> Self {
        Self::default()
    }
}

impl Directive for Replace {
    fn name(&self) -> &str {
        "replace"
    }

    fn process(&mut self, call: DirectiveCall) -> Result<Option<Node>> {
        let Some(variable) = call.variable else {
            return Err(ParseError::invalid_directive(
                "replace",
                "only valid inside a substitution definition",
                call.span.start,
            ));
        };

        let replacement = [call.argument.as_str(), call.content.as_str()]
            .iter()
            .filter(|part| !part.is_empty())
            .copied()
            .collect::<Vec<_>>()
            .join(" ");
        if replacement.is_empty() {
            return Err(ParseError::invalid_directive(
                "replace",
                "replacement text required",
                call.span.start,
            ));
        }

        self.definitions.push((variable, replacement));
        Ok(None)
    }

    fn finalize(&mut self, document: &mut Document) -> Result<()> {
        if self.definitions.is_empty() {
            return Ok(());
        }
        document.push(Node::Substitutions(Substitutions {
            definitions: std::mem::take(&mut self.definitions),
        }));
        Ok(())
    }

    fn reset(&mut self) {
        self.definitions.clear();
    }
}
