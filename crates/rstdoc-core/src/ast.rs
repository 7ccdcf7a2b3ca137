//! Document tree types produced by the parser.
//!
//! The tree is a flat, append-only sequence of nodes in source order.
//! Section structure is expressed with `Title` nodes and the matching
//! `SectionEnd` markers emitted by the section scope tracker, not by
//! nesting. Nodes that wrap other content (block quotes, list items,
//! definitions, admonitions) own their children directly.

use sha2::{Digest, Sha256};

use crate::span::Span;

/// A parsed document.
#[derive(Debug, Clone, PartialEq)]
pub struct Document {
    id: String,
    nodes: Vec<Node>,
}

impl Document {
    /// Create an empty document with the given identity.
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            nodes: Vec::new(),
        }
    }

    /// Create an empty document identified by the fingerprint of `content`.
    pub fn for_content(content: &str) -> Self {
        Self::new(fingerprint(content))
    }

    /// Stable identity derived from the raw input.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Nodes in insertion order.
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Append a node.
    pub fn push(&mut self, node: Node) {
        self.nodes.push(node);
    }

    /// Number of nodes.
    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    /// Check if no node was appended.
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Iterate over the nodes.
    pub fn iter(&self) -> std::slice::Iter<'_, Node> {
        self.nodes.iter()
    }

    /// All title nodes, in order.
    pub fn titles(&self) -> impl Iterator<Item = &Title> {
        self.nodes.iter().filter_map(Node::as_title)
    }

    /// All section end markers, in order.
    pub fn section_ends(&self) -> impl Iterator<Item = &SectionEnd> {
        self.nodes.iter().filter_map(|node| match node {
            Node::SectionEnd(end) => Some(end),
            _ => None,
        })
    }

    /// Take the nodes out of the document.
    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }
}

impl<'a> IntoIterator for &'a Document {
    type Item = &'a Node;
    type IntoIter = std::slice::Iter<'a, Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.iter()
    }
}

/// Deterministic digest of raw content: the first 8 bytes of its SHA-256,
/// rendered as 16 hex digits.
///
/// Used as a document identity, not as an integrity guarantee.
pub fn fingerprint(content: &str) -> String {
    let digest = Sha256::digest(content.as_bytes());
    digest[..8].iter().map(|byte| format!("{:02x}", byte)).collect()
}

/// Nodes produced by the production rules, the scope tracker and the
/// directive handlers.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Section heading.
    Title(Title),
    /// Closing marker for a section opened by a title.
    SectionEnd(SectionEnd),
    /// Text paragraph.
    Paragraph(Paragraph),
    /// Horizontal transition between sections of text.
    Transition(Span),
    /// Hyperlink target definition.
    LinkTarget(LinkTarget),
    /// Verbatim text introduced by `::`.
    LiteralBlock(LiteralBlock),
    /// Indented block quotation.
    BlockQuote(BlockQuote),
    /// Bullet or enumerated list.
    List(List),
    /// Terms with indented definitions.
    DefinitionList(DefinitionList),
    /// Grid or simple table.
    Table(Table),
    /// Code from a `code-block` directive.
    Code(CodeBlock),
    /// Note, warning and friends.
    Admonition(Admonition),
    /// Substitution definitions collected while parsing.
    Substitutions(Substitutions),
    /// Directive kept as-is because no handler claimed it.
    Directive(DirectiveBlock),
}

impl Node {
    /// Short lowercase name of the node variant.
    pub fn kind(&self) -> &'static str {
        match self {
            Node::Title(_) => "title",
            Node::SectionEnd(_) => "section_end",
            Node::Paragraph(_) => "paragraph",
            Node::Transition(_) => "transition",
            Node::LinkTarget(_) => "link_target",
            Node::LiteralBlock(_) => "literal_block",
            Node::BlockQuote(_) => "block_quote",
            Node::List(_) => "list",
            Node::DefinitionList(_) => "definition_list",
            Node::Table(_) => "table",
            Node::Code(_) => "code",
            Node::Admonition(_) => "admonition",
            Node::Substitutions(_) => "substitutions",
            Node::Directive(_) => "directive",
        }
    }

    /// The title, if this node is one.
    pub fn as_title(&self) -> Option<&Title> {
        match self {
            Node::Title(title) => Some(title),
            _ => None,
        }
    }

    /// Source lines this node was built from. Markers emitted outside the
    /// line loop have no span.
    pub fn span(&self) -> Option<Span> {
        match self {
            Node::Title(n) => Some(n.span),
            Node::SectionEnd(_) | Node::Substitutions(_) => None,
            Node::Paragraph(n) => Some(n.span),
            Node::Transition(span) => Some(*span),
            Node::LinkTarget(n) => Some(n.span),
            Node::LiteralBlock(n) => Some(n.span),
            Node::BlockQuote(n) => Some(n.span),
            Node::List(n) => Some(n.span),
            Node::DefinitionList(n) => Some(n.span),
            Node::Table(n) => Some(n.span),
            Node::Code(n) => Some(n.span),
            Node::Admonition(n) => Some(n.span),
            Node::Directive(n) => Some(n.span),
        }
    }

    /// Move this node and everything it contains `offset` lines down.
    ///
    /// Nested content is parsed on its own; this maps it back onto the lines
    /// of the enclosing text.
    pub fn shift_lines(&mut self, offset: usize) {
        match self {
            Node::SectionEnd(_) | Node::Substitutions(_) => {}
            Node::Title(n) => n.span = n.span.shifted(offset),
            Node::Paragraph(n) => n.span = n.span.shifted(offset),
            Node::Transition(span) => *span = span.shifted(offset),
            Node::LinkTarget(n) => n.span = n.span.shifted(offset),
            Node::LiteralBlock(n) => n.span = n.span.shifted(offset),
            Node::Table(n) => n.span = n.span.shifted(offset),
            Node::Code(n) => n.span = n.span.shifted(offset),
            Node::Directive(n) => n.span = n.span.shifted(offset),
            Node::BlockQuote(n) => {
                n.span = n.span.shifted(offset);
                shift_all(&mut n.children, offset);
            }
            Node::List(n) => {
                n.span = n.span.shifted(offset);
                for item in &mut n.items {
                    item.span = item.span.shifted(offset);
                    shift_all(&mut item.blocks, offset);
                }
            }
            Node::DefinitionList(n) => {
                n.span = n.span.shifted(offset);
                for item in &mut n.items {
                    item.span = item.span.shifted(offset);
                    shift_all(&mut item.definition, offset);
                }
            }
            Node::Admonition(n) => {
                n.span = n.span.shifted(offset);
                shift_all(&mut n.children, offset);
            }
        }
    }
}

fn shift_all(nodes: &mut [Node], offset: usize) {
    for node in nodes {
        node.shift_lines(offset);
    }
}

/// Identity of a title within one parse.
///
/// Two titles with the same text and level are still distinct sections;
/// the scope tracker and `SectionEnd` markers refer to titles by this id.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TitleId(pub u32);

/// Section heading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Title {
    /// Identity used by section end markers.
    pub id: TitleId,
    /// Nesting level, starting at the configured initial header level.
    pub level: usize,
    /// Heading text.
    pub text: String,
    /// Source span, including adornment lines.
    pub span: Span,
}

/// Closing marker for the section opened by `title`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SectionEnd {
    /// The title whose section ends here.
    pub title: TitleId,
    /// Level of that title.
    pub level: usize,
}

/// Text paragraph.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Paragraph {
    /// Paragraph text, lines joined with `\n`.
    pub text: String,
    /// Source span.
    pub span: Span,
}

/// Hyperlink target such as `.. _name: https://example.org`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LinkTarget {
    /// Normalized reference name; `None` for anonymous targets.
    pub name: Option<String>,
    /// Destination; `None` for internal targets.
    pub url: Option<String>,
    /// Whether the target is anonymous (`__ url`).
    pub anonymous: bool,
    /// Source span.
    pub span: Span,
}

/// Verbatim text block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LiteralBlock {
    /// Dedented content.
    pub text: String,
    /// Source span.
    pub span: Span,
}

/// Indented block quotation.
#[derive(Debug, Clone, PartialEq)]
pub struct BlockQuote {
    /// Quoted content.
    pub children: Vec<Node>,
    /// Text of a trailing `-- attribution` line.
    pub attribution: Option<String>,
    /// Source span.
    pub span: Span,
}

/// List ordering style.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListKind {
    /// Enumerated list (1. 2. 3.).
    Ordered,
    /// Bulleted list (-, * or +).
    Unordered,
}

/// A list block containing multiple items.
#[derive(Debug, Clone, PartialEq)]
pub struct List {
    /// Ordered or unordered.
    pub kind: ListKind,
    /// Starting number for enumerated lists with an explicit first number.
    pub start: Option<u64>,
    /// List items.
    pub items: Vec<ListItem>,
    /// Source span.
    pub span: Span,
}

/// A single list item (may contain nested blocks).
#[derive(Debug, Clone, PartialEq)]
pub struct ListItem {
    /// Content blocks within the item.
    pub blocks: Vec<Node>,
    /// Source span.
    pub span: Span,
}

/// Definition list.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionList {
    /// Term/definition pairs.
    pub items: Vec<DefinitionItem>,
    /// Source span.
    pub span: Span,
}

/// One term of a definition list.
#[derive(Debug, Clone, PartialEq)]
pub struct DefinitionItem {
    /// The term text.
    pub term: String,
    /// Classifiers written after ` : ` on the term line.
    pub classifiers: Vec<String>,
    /// Definition content.
    pub definition: Vec<Node>,
    /// Source span.
    pub span: Span,
}

/// Table flavour.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableKind {
    /// `+---+` bordered table.
    Grid,
    /// `===  ===` column table.
    Simple,
}

/// Table with rows of plain-text cells.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Table {
    /// Source syntax.
    pub kind: TableKind,
    /// Number of leading header rows.
    pub header_rows: usize,
    /// Rows of cell text.
    pub rows: Vec<Vec<String>>,
    /// Source span.
    pub span: Span,
}

/// Code block from a `code-block` or `code` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CodeBlock {
    /// Language named by the directive argument.
    pub language: Option<String>,
    /// Verbatim content.
    pub text: String,
    /// Whether `:linenos:` was given.
    pub line_numbers: bool,
    /// Source span.
    pub span: Span,
}

/// Admonition such as `.. note::`.
#[derive(Debug, Clone, PartialEq)]
pub struct Admonition {
    /// Directive name (`note`, `warning`, ...).
    pub kind: String,
    /// Parsed content.
    pub children: Vec<Node>,
    /// Source span.
    pub span: Span,
}

/// Substitution definitions gathered by the `replace` directive.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Substitutions {
    /// `(name, replacement)` pairs in definition order.
    pub definitions: Vec<(String, String)>,
}

/// Directive invocation kept verbatim.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectiveBlock {
    /// Directive name.
    pub name: String,
    /// Text after `::` on the directive line.
    pub argument: String,
    /// `:key: value` options.
    pub options: Vec<(String, String)>,
    /// Dedented content.
    pub content: String,
    /// Source span.
    pub span: Span,
}
