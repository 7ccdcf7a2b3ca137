//! Document driver.
//!
//! One call to [`Parser::parse`] runs the whole lifecycle:
//!
//! 1. the pre-parse hook may rewrite the raw content,
//! 2. a fresh document is created, identified by the fingerprint of the
//!    untouched input,
//! 3. per-parse state (last title, open sections, title styles, directive
//!    handler state) is reset,
//! 4. the cursor is loaded with the trimmed content,
//! 5. the dispatch loop runs until the cursor is exhausted,
//! 6. sections still open are closed,
//! 7. every directive handler is finalized in registration order,
//! 8. the post-parse hook observes the finished document.
//!
//! A parser holds mutable per-parse state, so it runs one parse at a time.
//! Parse independent documents concurrently with separate parsers.

use crate::ast::{Document, Title};
use crate::config::ParserConfig;
use crate::context::{ParseContext, ParseState};
use crate::cursor::LineCursor;
use crate::directives::{Directive, DirectiveRegistry};
use crate::error::Result;
use crate::hooks::ParseHooks;
use crate::rules::RuleSet;
use crate::sections::OpenSections;

/// Document parser with its rules, directive handlers and hooks.
#[derive(Debug)]
pub struct Parser {
    config: ParserConfig,
    rules: RuleSet,
    directives: DirectiveRegistry,
    hooks: ParseHooks,
    state: ParseState,
}

impl Parser {
    /// Create a parser with the standard rules and directives.
    pub fn new(config: ParserConfig) -> Self {
        Self {
            config,
            rules: RuleSet::standard(),
            directives: DirectiveRegistry::standard(),
            hooks: ParseHooks::new(),
            state: ParseState::default(),
        }
    }

    /// Replace the rule set.
    pub fn with_rules(mut self, rules: RuleSet) -> Self {
        self.rules = rules;
        self
    }

    /// Replace the directive registry.
    pub fn with_directives(mut self, directives: DirectiveRegistry) -> Self {
        self.directives = directives;
        self
    }

    /// Install a pre-parse hook that may rewrite the raw content.
    pub fn with_pre_parse(mut self, hook: impl Fn(&str) -> String + 'static) -> Self {
        self.hooks.set_pre_parse(hook);
        self
    }

    /// Install a post-parse hook that observes the finished document.
    pub fn with_post_parse(mut self, hook: impl Fn(&Document) + 'static) -> Self {
        self.hooks.set_post_parse(hook);
        self
    }

    /// Register an extra directive handler.
    pub fn register_directive(&mut self, handler: impl Directive + 'static) -> &mut Self {
        self.directives.register(handler);
        self
    }

    /// Parse `input` into a document.
    ///
    /// Stops at the first error. The returned document is also kept and
    /// available from [`document`](Self::document) until the next parse.
    pub fn parse(&mut self, input: &str) -> Result<Document> {
        let content = self.hooks.pre_parse(input);

        self.state.reset(Document::for_content(input));
        self.directives.reset();
        self.state.cursor.load(&self.config, content.trim());

        ParseContext::new(
            &mut self.state,
            &mut self.directives,
            &self.rules,
            &self.config,
        )
        .run()?;
        self.directives.finalize(&mut self.state.document)?;

        log::debug!(
            "parsed document {} into {} nodes",
            self.state.document.id(),
            self.state.document.len()
        );
        self.hooks.post_parse(&self.state.document);
        Ok(self.state.document.clone())
    }

    /// Document of the most recent parse.
    pub fn document(&self) -> &Document {
        &self.state.document
    }

    /// Cursor of the most recent parse.
    pub fn cursor(&self) -> &LineCursor {
        &self.state.cursor
    }

    /// Sections open at the point the most recent parse stopped. Empty after
    /// a successful parse.
    pub fn open_sections(&self) -> &OpenSections {
        &self.state.sections
    }

    /// Last title seen by the most recent parse.
    pub fn last_title(&self) -> Option<&Title> {
        self.state.last_title.as_ref()
    }

    /// Parser configuration.
    pub fn config(&self) -> &ParserConfig {
        &self.config
    }

    /// Rules in dispatch order.
    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    /// Directive handlers.
    pub fn directives(&self) -> &DirectiveRegistry {
        &self.directives
    }

    /// Directive handlers, for registration.
    pub fn directives_mut(&mut self) -> &mut DirectiveRegistry {
        &mut self.directives
    }
}

impl Default for Parser {
    fn default() -> Self {
        Self::new(ParserConfig::default())
    }
}
