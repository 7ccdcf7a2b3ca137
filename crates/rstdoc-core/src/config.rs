//! Parser configuration.

/// What the directive rule does with a directive name nobody registered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum UnknownDirectivePolicy {
    /// Abort the parse with an `UnknownDirective` error.
    #[default]
    Error,
    /// Log a warning and keep the block as a generic directive node.
    Warn,
}

/// Settings shared by the line cursor and the production rules.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParserConfig {
    /// Column stride used when expanding tabs on load.
    pub tab_width: usize,
    /// Level assigned to the first title style encountered.
    pub initial_header_level: usize,
    /// Handling of directives missing from the registry.
    pub unknown_directives: UnknownDirectivePolicy,
    /// Deepest allowed nesting of block quotes, list items, definitions and
    /// directive bodies.
    pub max_nesting_depth: usize,
}

/// Default for [`ParserConfig::max_nesting_depth`].
pub const DEFAULT_MAX_NESTING_DEPTH: usize = 32;

impl Default for ParserConfig {
    fn default() -> Self {
        Self {
            tab_width: 8,
            initial_header_level: 1,
            unknown_directives: UnknownDirectivePolicy::Error,
            max_nesting_depth: DEFAULT_MAX_NESTING_DEPTH,
        }
    }
}

impl ParserConfig {
    /// Set the tab expansion width. Zero is treated as one.
    pub fn with_tab_width(mut self, tab_width: usize) -> Self {
        self.tab_width = tab_width.max(1);
        self
    }

    /// Set the level of the first title style. Zero is treated as one.
    pub fn with_initial_header_level(mut self, level: usize) -> Self {
        self.initial_header_level = level.max(1);
        self
    }

    /// Choose how unknown directives are handled.
    pub fn with_unknown_directives(mut self, policy: UnknownDirectivePolicy) -> Self {
        self.unknown_directives = policy;
        self
    }

    /// Limit how deeply nested blocks may go. Deeper content fails the parse.
    pub fn with_max_nesting_depth(mut self, depth: usize) -> Self {
        self.max_nesting_depth = depth;
        self
    }
}
