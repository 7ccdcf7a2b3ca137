//! Per-parse state and the context handed to production rules.
//!
//! [`ParseState`] holds everything that belongs to one parse: the document
//! being built, the line cursor, the open-section registry, the last title
//! and the title styles seen so far. The driver resets it at the start of
//! every parse.
//!
//! [`ParseContext`] bundles that state with the read-only rule set and
//! configuration plus the directive registry, and runs the dispatch loop.

use crate::ast::{Document, Node, Title, TitleId};
use crate::config::ParserConfig;
use crate::cursor::LineCursor;
use crate::directives::DirectiveRegistry;
use crate::error::{ParseError, Result};
use crate::rules::RuleSet;
use crate::sections::OpenSections;

/// Adornment style of a title: the character and whether it is overlined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct TitleStyle {
    /// Adornment character.
    pub adornment: char,
    /// Whether an overline is present.
    pub overlined: bool,
}

/// Mutable state of one parse.
#[derive(Debug, Clone, PartialEq)]
pub struct ParseState {
    pub(crate) document: Document,
    pub(crate) cursor: LineCursor,
    pub(crate) sections: OpenSections,
    pub(crate) last_title: Option<Title>,
    pub(crate) title_styles: Vec<TitleStyle>,
    pub(crate) next_title_id: u32,
    pub(crate) literal_after: Option<usize>,
    pub(crate) depth: usize,
}

impl ParseState {
    /// Fresh state around an empty document.
    pub fn new(document: Document) -> Self {
        Self {
            document,
            cursor: LineCursor::new(),
            sections: OpenSections::new(),
            last_title: None,
            title_styles: Vec::new(),
            next_title_id: 0,
            literal_after: None,
            depth: 0,
        }
    }

    /// Install a new document and clear every per-parse field.
    pub fn reset(&mut self, document: Document) {
        *self = Self::new(document);
    }
}

impl Default for ParseState {
    fn default() -> Self {
        Self::new(Document::new(""))
    }
}

/// What a production rule can see and change while it runs.
pub struct ParseContext<'p> {
    state: &'p mut ParseState,
    directives: &'p mut DirectiveRegistry,
    rules: &'p RuleSet,
    config: &'p ParserConfig,
}

impl<'p> ParseContext<'p> {
    /// Bundle the pieces of a parse.
    pub fn new(
        state: &'p mut ParseState,
        directives: &'p mut DirectiveRegistry,
        rules: &'p RuleSet,
        config: &'p ParserConfig,
    ) -> Self {
        Self {
            state,
            directives,
            rules,
            config,
        }
    }

    /// The line cursor.
    pub fn cursor(&self) -> &LineCursor {
        &self.state.cursor
    }

    /// The line cursor, for rules consuming lines.
    pub fn cursor_mut(&mut self) -> &mut LineCursor {
        &mut self.state.cursor
    }

    /// The document built so far.
    pub fn document(&self) -> &Document {
        &self.state.document
    }

    /// Open sections, in the order they were opened.
    pub fn open_sections(&self) -> &OpenSections {
        &self.state.sections
    }

    /// The most recent title of this parse.
    pub fn last_title(&self) -> Option<&Title> {
        self.state.last_title.as_ref()
    }

    /// Parser configuration.
    pub fn config(&self) -> &ParserConfig {
        self.config
    }

    /// Directive handlers.
    pub fn directives(&self) -> &DirectiveRegistry {
        self.directives
    }

    /// Directive handlers, for processing.
    pub fn directives_mut(&mut self) -> &mut DirectiveRegistry {
        self.directives
    }

    /// Level for a title style: styles are numbered in order of first use.
    pub fn title_level(&mut self, style: TitleStyle) -> usize {
        let index = match self.state.title_styles.iter().position(|s| *s == style) {
            Some(index) => index,
            None => {
                self.state.title_styles.push(style);
                self.state.title_styles.len() - 1
            }
        };
        self.config.initial_header_level + index
    }

    /// Allocate the identity of a new title.
    pub fn next_title_id(&mut self) -> TitleId {
        let id = TitleId(self.state.next_title_id);
        self.state.next_title_id += 1;
        id
    }

    /// Register a title as open and remember it as the last title.
    pub fn open_section(&mut self, title: &Title) {
        self.state.sections.open(title);
        self.state.last_title = Some(title.clone());
    }

    /// Emit a `SectionEnd` for `id` if it is open. No-op otherwise.
    pub fn end_open_section(&mut self, id: TitleId) -> bool {
        self.state
            .sections
            .end_open_section(&mut self.state.document, id)
    }

    /// Close open sections at `level` or deeper, in registry order.
    pub fn close_sections_from_level(&mut self, level: usize) {
        self.state
            .sections
            .close_from_level(&mut self.state.document, level);
    }

    /// Record that the paragraph ending on `line` announced a literal block.
    pub fn expect_literal_after(&mut self, line: usize) {
        self.state.literal_after = Some(line);
    }

    /// Line of the paragraph that announced a literal block, if any.
    pub fn literal_announced_at(&self) -> Option<usize> {
        self.state.literal_after
    }

    /// Forget a pending literal block announcement.
    pub fn clear_literal(&mut self) {
        self.state.literal_after = None;
    }

    /// Parse `text` with the same rules and directives into a separate tree
    /// and return its nodes. Sections opened inside are closed at its end.
    ///
    /// `first_line` is the line of the enclosing text that `text` starts on.
    /// Spans of the returned nodes and the line of an error are reported
    /// against the enclosing text, and title ids continue the outer sequence.
    pub fn parse_nested(&mut self, text: &str, first_line: usize) -> Result<Vec<Node>> {
        let depth = self.state.depth + 1;
        if depth > self.config.max_nesting_depth {
            let line = text.lines().next().unwrap_or_default();
            return Err(ParseError::syntax("nesting too deep", first_line, line));
        }

        let mut state = ParseState::new(Document::new(""));
        state.depth = depth;
        state.next_title_id = self.state.next_title_id;
        state.cursor.load(self.config, text);
        let result =
            ParseContext::new(&mut state, self.directives, self.rules, self.config).run();
        self.state.next_title_id = state.next_title_id;
        result.map_err(|error| error.offset_line(first_line))?;

        let mut nodes = state.document.into_nodes();
        for node in &mut nodes {
            node.shift_lines(first_line);
        }
        Ok(nodes)
    }

    /// Run the dispatch loop until the cursor is exhausted, then close the
    /// sections still open.
    pub fn run(&mut self) -> Result<()> {
        while self.state.cursor.valid() {
            self.dispatch()?;
            self.state.cursor.next_line();
        }
        let ParseState {
            sections, document, ..
        } = &mut *self.state;
        sections.close_all(document);
        Ok(())
    }

    /// Try the rules in priority order on the current line and apply the
    /// first one that accepts it.
    fn dispatch(&mut self) -> Result<()> {
        let rules = self.rules;
        let Some(rule) = rules.iter().find(|rule| rule.applies(self)) else {
            let position = self.state.cursor.position();
            let text = self.state.cursor.current().unwrap_or_default();
            return Err(ParseError::no_rule_applied(position, text));
        };

        log::debug!(
            "line {}: {} rule applies",
            self.state.cursor.position() + 1,
            rule.name()
        );
        if let Some(node) = rule.apply(self)? {
            self.state.document.push(node);
        }
        Ok(())
    }
}
