use crate::ast::{self, Node, Paragraph};
use crate::directives::{Directive, DirectiveCall};
use crate::error::Result;
use crate::span::Span;

/// Directive names handled as admonitions by the standard registry.
pub const ADMONITION_KINDS: &[&str] = &[
    "note",
    "warning",
    "tip",
    "important",
    "caution",
    "danger",
    "hint",
    "attention",
];

/// `.. note::` and friends: the argument and content become the admonition
/// body.
#[derive(Debug, Clone)]
pub struct Admonition {
    kind: String,
}

impl Admonition {
    /// Handler for the admonition named `kind`.
    pub fn new(kind: &str) -> Self {
        Self {
            kind: kind.to_string(),
        }
    }
}

impl Directive for Admonition {
    fn name(&self) -> &str {
        &self.kind
    }

    fn parses_content(&self) -> bool {
        true
    }

    fn process(&mut self, call: DirectiveCall) -> Result<Option<Node>> {
        let mut children = Vec::with_capacity(call.children.len() + 1);
        if !call.argument.is_empty() {
            children.push(Node::Paragraph(Paragraph {
                text: call.argument,
                span: Span::line(call.span.start),
            }));
        }
        children.extend(call.children);

        Ok(Some(Node::Admonition(ast::Admonition {
            kind: self.kind.clone(),
            children,
            span: call.span,
        })))
    }
}
