//! Document statistics and section outlines.

use std::collections::BTreeMap;

use rstdoc_core::{Document, Node, TitleId};
use serde::Serialize;

#[derive(Debug, Default, PartialEq, Eq, Serialize)]
pub struct DocumentStats {
    pub fingerprint: String,
    pub lines: usize,
    pub top_level_nodes: usize,
    pub sections: usize,
    /// Node counts by kind, nested nodes included.
    pub kinds: BTreeMap<&'static str, usize>,
}

impl DocumentStats {
    pub fn from_document(doc: &Document, input: &str) -> Self {
        let mut stats = Self {
            fingerprint: doc.id().to_string(),
            lines: input.lines().count(),
            top_level_nodes: doc.len(),
            sections: doc.titles().count(),
            kinds: BTreeMap::new(),
        };
        stats.count_nodes(doc.nodes());
        stats
    }

    fn count_nodes(&mut self, nodes: &[Node]) {
        for node in nodes {
            *self.kinds.entry(node.kind()).or_insert(0) += 1;
            match node {
                Node::BlockQuote(q) => self.count_nodes(&q.children),
                Node::List(l) => {
                    for item in &l.items {
                        self.count_nodes(&item.blocks);
                    }
                }
                Node::DefinitionList(d) => {
                    for item in &d.items {
                        self.count_nodes(&item.definition);
                    }
                }
                Node::Admonition(a) => self.count_nodes(&a.children),
                _ => {}
            }
        }
    }
}

/// Number of lines the parser strips from the start of `input`.
///
/// Node spans count from the first non-blank line, so adding this turns a
/// span line into a line of the file.
pub fn leading_lines(input: &str) -> usize {
    let stripped = input.len() - input.trim_start().len();
    input[..stripped].matches('\n').count()
}

/// One title in the section outline.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OutlineEntry {
    /// Number of sections still open when the title appears.
    pub depth: usize,
    pub level: usize,
    pub text: String,
    /// 1-based line of the title text.
    pub line: usize,
}

/// Rebuild the section tree from the flat title and section end markers.
///
/// `skipped` is the number of input lines before the first parsed line.
pub fn outline(doc: &Document, skipped: usize) -> Vec<OutlineEntry> {
    let mut open: Vec<TitleId> = Vec::new();
    let mut entries = Vec::new();

    for node in doc.nodes() {
        match node {
            Node::Title(title) => {
                entries.push(OutlineEntry {
                    depth: open.len(),
                    level: title.level,
                    text: title.text.clone(),
                    line: skipped + title.span.start + 1,
                });
                open.push(title.id);
            }
            Node::SectionEnd(end) => open.retain(|id| *id != end.title),
            _ => {}
        }
    }

    entries
}
