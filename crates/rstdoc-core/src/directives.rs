//! Directive handlers and their registry.
//!
//! The directive rule parses the generic `.. name:: argument` syntax, then
//! hands a [`DirectiveCall`] to the handler registered under `name`. After
//! the line loop has finished, every handler gets one [`Directive::finalize`]
//! call, in registration order, to append deferred content to the document.

mod admonition;
mod code;
mod replace;

pub use admonition::{Admonition, ADMONITION_KINDS};
pub use code::CodeBlockDirective;
pub use replace::Replace;

use crate::ast::{Document, Node};
use crate::error::Result;
use crate::span::Span;

/// One parsed directive invocation.
#[derive(Debug, Clone, PartialEq)]
pub struct DirectiveCall {
    /// Directive name, lowercased.
    pub name: String,
    /// Text after `::`, including continuation lines before the first
    /// option or blank line.
    pub argument: String,
    /// Substitution name for `.. |name| directive::` forms.
    pub variable: Option<String>,
    /// `:key: value` options in source order.
    pub options: Vec<(String, String)>,
    /// Dedented content block.
    pub content: String,
    /// Parsed content, filled only for handlers whose
    /// [`Directive::parses_content`] is true.
    pub children: Vec<Node>,
    /// Lines covered by the directive.
    pub span: Span,
}

impl DirectiveCall {
    /// Value of an option, if given.
    pub fn option(&self, key: &str) -> Option<&str> {
        self.options
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Check if an option was given, with or without a value.
    pub fn has_option(&self, key: &str) -> bool {
        self.options.iter().any(|(k, _)| k == key)
    }
}

/// A directive handler.
///
/// Handlers are owned by the registry the caller hands to the parser. State
/// kept between `process` and `finalize` is dropped by `reset`, which the
/// parser calls before every parse.
pub trait Directive {
    /// Name the handler is registered under.
    fn name(&self) -> &str;

    /// Whether the content block should be parsed into `DirectiveCall::children`
    /// before `process` is called.
    fn parses_content(&self) -> bool {
        false
    }

    /// Turn an invocation into a node, or into nothing.
    fn process(&mut self, call: DirectiveCall) -> Result<Option<Node>>;

    /// Called once after the line loop and section sweep.
    fn finalize(&mut self, _document: &mut Document) -> Result<()> {
        Ok(())
    }

    /// Forget per-parse state.
    fn reset(&mut self) {}
}

/// Ordered set of directive handlers.
#[derive(Default)]
pub struct DirectiveRegistry {
    handlers: Vec<Box<dyn Directive>>,
}

impl DirectiveRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registry with the built-in admonitions, `code-block`, `code` and
    /// `replace`.
    pub fn standard() -> Self {
        let mut registry = Self::new();
        for kind in ADMONITION_KINDS {
            registry.register(Admonition::new(kind));
        }
        registry.register(CodeBlockDirective::new("code-block"));
        registry.register(CodeBlockDirective::new("code"));
        registry.register(Replace::new());
        registry
    }

    /// Add a handler. A handler registered under the same name is replaced
    /// in place, keeping its finalize position.
    pub fn register(&mut self, handler: impl Directive + 'static) -> &mut Self {
        let handler: Box<dyn Directive> = Box::new(handler);
        match self
            .handlers
            .iter()
            .position(|existing| existing.name() == handler.name())
        {
            Some(index) => self.handlers[index] = handler,
            None => self.handlers.push(handler),
        }
        self
    }

    /// Builder form of [`register`](Self::register).
    pub fn with(mut self, handler: impl Directive + 'static) -> Self {
        self.register(handler);
        self
    }

    /// Look up a handler by name.
    pub fn get(&self, name: &str) -> Option<&dyn Directive> {
        self.handlers
            .iter()
            .find(|handler| handler.name() == name)
            .map(|handler| &**handler)
    }

    /// Look up a handler by name for processing.
    pub fn get_mut(&mut self, name: &str) -> Option<&mut (dyn Directive + 'static)> {
        self.handlers
            .iter_mut()
            .find(|handler| handler.name() == name)
            .map(|handler| &mut **handler)
    }

    /// Check if a handler is registered under `name`.
    pub fn contains(&self, name: &str) -> bool {
        self.get(name).is_some()
    }

    /// Registered names, in registration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.handlers.iter().map(|handler| handler.name())
    }

    /// Number of handlers.
    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    /// Check if no handler is registered.
    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }

    /// Reset every handler ahead of a new parse.
    pub fn reset(&mut self) {
        for handler in &mut self.handlers {
            handler.reset();
        }
    }

    /// Give every handler its finalize call, in registration order.
    pub fn finalize(&mut self, document: &mut Document) -> Result<()> {
        for handler in &mut self.handlers {
            let before = document.len();
            handler.finalize(document)?;
            if document.len() > before {
                log::debug!(
                    "{} directive appended {} nodes",
                    handler.name(),
                    document.len() - before
                );
            }
        }
        Ok(())
    }
}

impl std::fmt::Debug for DirectiveRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}
