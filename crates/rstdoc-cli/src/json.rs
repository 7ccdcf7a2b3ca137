//! Serializable mirror of the document tree.

use rstdoc_core::ast::{DefinitionItem, ListKind, TableKind};
use rstdoc_core::span::Span;
use rstdoc_core::{Document, Node};
use serde::Serialize;

#[derive(Debug, Serialize)]
pub struct JsonDocument<'a> {
    pub id: &'a str,
    pub nodes: Vec<JsonNode<'a>>,
}

#[derive(Debug, Clone, Copy, Serialize)]
pub struct JsonSpan {
    pub start: usize,
    pub end: usize,
}

impl From<Span> for JsonSpan {
    fn from(span: Span) -> Self {
        JsonSpan {
            start: span.start,
            end: span.end,
        }
    }
}

#[derive(Debug, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum JsonNode<'a> {
    Title {
        id: u32,
        level: usize,
        text: &'a str,
        span: JsonSpan,
    },
    SectionEnd {
        title: u32,
        level: usize,
    },
    Paragraph {
        text: &'a str,
        span: JsonSpan,
    },
    Transition {
        span: JsonSpan,
    },
    LinkTarget {
        name: Option<&'a str>,
        url: Option<&'a str>,
        anonymous: bool,
        span: JsonSpan,
    },
    LiteralBlock {
        text: &'a str,
        span: JsonSpan,
    },
    BlockQuote {
        children: Vec<JsonNode<'a>>,
        attribution: Option<&'a str>,
        span: JsonSpan,
    },
    List {
        kind: &'static str,
        start: Option<u64>,
        items: Vec<Vec<JsonNode<'a>>>,
        span: JsonSpan,
    },
    DefinitionList {
        items: Vec<JsonDefinition<'a>>,
        span: JsonSpan,
    },
    Table {
        kind: &'static str,
        header_rows: usize,
        rows: &'a [Vec<String>],
        span: JsonSpan,
    },
    Code {
        language: Option<&'a str>,
        text: &'a str,
        line_numbers: bool,
        span: JsonSpan,
    },
    Admonition {
        kind: &'a str,
        children: Vec<JsonNode<'a>>,
        span: JsonSpan,
    },
    Substitutions {
        definitions: &'a [(String, String)],
    },
    Directive {
        name: &'a str,
        argument: &'a str,
        options: &'a [(String, String)],
        content: &'a str,
        span: JsonSpan,
    },
}

#[derive(Debug, Serialize)]
pub struct JsonDefinition<'a> {
    pub term: &'a str,
    pub classifiers: &'a [String],
    pub definition: Vec<JsonNode<'a>>,
}

pub fn convert_document(doc: &Document) -> JsonDocument<'_> {
    JsonDocument {
        id: doc.id(),
        nodes: convert_nodes(doc.nodes()),
    }
}

fn convert_nodes(nodes: &[Node]) -> Vec<JsonNode<'_>> {
    nodes.iter().map(convert_node).collect()
}

fn convert_definition(item: &DefinitionItem) -> JsonDefinition<'_> {
    JsonDefinition {
        term: &item.term,
        classifiers: &item.classifiers,
        definition: convert_nodes(&item.definition),
    }
}

pub fn convert_node(node: &Node) -> JsonNode<'_> {
    match node {
        Node::Title(t) => JsonNode::Title {
            id: t.id.0,
            level: t.level,
            text: &t.text,
            span: t.span.into(),
        },
        Node::SectionEnd(end) => JsonNode::SectionEnd {
            title: end.title.0,
            level: end.level,
        },
        Node::Paragraph(p) => JsonNode::Paragraph {
            text: &p.text,
            span: p.span.into(),
        },
        Node::Transition(span) => JsonNode::Transition {
            span: (*span).into(),
        },
        Node::LinkTarget(l) => JsonNode::LinkTarget {
            name: l.name.as_deref(),
            url: l.url.as_deref(),
            anonymous: l.anonymous,
            span: l.span.into(),
        },
        Node::LiteralBlock(l) => JsonNode::LiteralBlock {
            text: &l.text,
            span: l.span.into(),
        },
        Node::BlockQuote(q) => JsonNode::BlockQuote {
            children: convert_nodes(&q.children),
            attribution: q.attribution.as_deref(),
            span: q.span.into(),
        },
        Node::List(l) => JsonNode::List {
            kind: match l.kind {
                ListKind::Ordered => "ordered",
                ListKind::Unordered => "unordered",
            },
            start: l.start,
            items: l
                .items
                .iter()
                .map(|item| convert_nodes(&item.blocks))
                .collect(),
            span: l.span.into(),
        },
        Node::DefinitionList(d) => JsonNode::DefinitionList {
            items: d.items.iter().map(convert_definition).collect(),
            span: d.span.into(),
        },
        Node::Table(t) => JsonNode::Table {
            kind: match t.kind {
                TableKind::Grid => "grid",
                TableKind::Simple => "simple",
            },
            header_rows: t.header_rows,
            rows: &t.rows,
            span: t.span.into(),
        },
        Node::Code(c) => JsonNode::Code {
            language: c.language.as_deref(),
            text: &c.text,
            line_numbers: c.line_numbers,
            span: c.span.into(),
        },
        Node::Admonition(a) => JsonNode::Admonition {
            kind: &a.kind,
            children: convert_nodes(&a.children),
            span: a.span.into(),
        },
        Node::Substitutions(s) => JsonNode::Substitutions {
            definitions: &s.definitions,
        },
        Node::Directive(d) => JsonNode::Directive {
            name: &d.name,
            argument: &d.argument,
            options: &d.options,
            content: &d.content,
            span: d.span.into(),
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstdoc_core::Parser;
    use serde_json::json;

    #[test]
    fn test_document_tree_as_json() {
        let mut parser = Parser::default();
        let doc = parser.parse("Title\n=====\n\nSome text.").unwrap();

        let value = serde_json::to_value(convert_document(&doc)).unwrap();
        assert_eq!(
            value,
            json!({
                "id": doc.id(),
                "nodes": [
                    {"type": "title", "id": 0, "level": 1, "text": "Title",
                     "span": {"start": 0, "end": 2}},
                    {"type": "paragraph", "text": "Some text.",
                     "span": {"start": 3, "end": 4}},
                    {"type": "section_end", "title": 0, "level": 1},
                ]
            })
        );
    }

    #[test]
    fn test_type_tag_matches_node_kind() {
        let mut parser = Parser::default();
        let doc = parser
            .parse("- one\n- two\n\n.. note:: Careful\n\n----\n\nEnd.")
            .unwrap();

        for node in doc.nodes() {
            let value = serde_json::to_value(convert_node(node)).unwrap();
            assert_eq!(value["type"], node.kind());
        }
    }
}
