use crate::ast::{CodeBlock, Node};
use crate::directives::{Directive, DirectiveCall};
use crate::error::{ParseError, Result};

/// `.. code-block:: language` with a verbatim body.
#[derive(Debug, Clone)]
pub struct CodeBlockDirective {
    name: String,
}

impl CodeBlockDirective {
    /// Handler registered under `name` (`code-block` or `code`).
    pub fn new(name: &str) -> Self {
        Self {
            name: name.to_string(),
        }
    }
}

impl Directive for CodeBlockDirective {
    fn name(&self) -> &str {
        &self.name
    }

    fn process(&mut self, call: DirectiveCall) -> Result<Option<Node>> {
        if call.content.is_empty() {
            return Err(ParseError::invalid_directive(
                &self.name,
                "content block required",
                call.span.start,
            ));
        }

        let language = (!call.argument.is_empty()).then(|| call.argument.clone());
        Ok(Some(Node::Code(CodeBlock {
            language,
            line_numbers: call.has_option("linenos"),
            text: call.content,
            span: call.span,
        })))
    }
}
