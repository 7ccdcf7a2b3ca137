//! Python bindings for the rstdoc parser.

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::{PyDict, PyList};
use rstdoc_core::{
    ast::{ListKind, TableKind},
    Node, Parser as CoreParser, ParserConfig, UnknownDirectivePolicy,
};

// ============================================================================
// Node conversion
// ============================================================================

fn convert_nodes<'py>(py: Python<'py>, nodes: &[Node]) -> PyResult<Bound<'py, PyList>> {
    let items = nodes
        .iter()
        .map(|node| convert_node(py, node))
        .collect::<PyResult<Vec<_>>>()?;
    PyList::new(py, items)
}

/// One node as a dict with a `"type"` key and, when known, a
/// `"span"` of `(start, end)` line indices.
fn convert_node<'py>(py: Python<'py>, node: &Node) -> PyResult<Bound<'py, PyDict>> {
    let dict = PyDict::new(py);
    dict.set_item("type", node.kind())?;
    if let Some(span) = node.span() {
        dict.set_item("span", (span.start, span.end))?;
    }

    match node {
        Node::Title(t) => {
            dict.set_item("id", t.id.0)?;
            dict.set_item("level", t.level)?;
            dict.set_item("text", &t.text)?;
        }
        Node::SectionEnd(end) => {
            dict.set_item("title", end.title.0)?;
            dict.set_item("level", end.level)?;
        }
        Node::Paragraph(p) => dict.set_item("text", &p.text)?,
        Node::Transition(_) => {}
        Node::LinkTarget(l) => {
            dict.set_item("name", l.name.as_deref())?;
            dict.set_item("url", l.url.as_deref())?;
            dict.set_item("anonymous", l.anonymous)?;
        }
        Node::LiteralBlock(l) => dict.set_item("text", &l.text)?,
        Node::BlockQuote(q) => {
            dict.set_item("children", convert_nodes(py, &q.children)?)?;
            dict.set_item("attribution", q.attribution.as_deref())?;
        }
        Node::List(l) => {
            let kind = match l.kind {
                ListKind::Ordered => "ordered",
                ListKind::Unordered => "unordered",
            };
            dict.set_item("kind", kind)?;
            dict.set_item("start", l.start)?;
            let items = l
                .items
                .iter()
                .map(|item| convert_nodes(py, &item.blocks))
                .collect::<PyResult<Vec<_>>>()?;
            dict.set_item("items", items)?;
        }
        Node::DefinitionList(d) => {
            let items = d
                .items
                .iter()
                .map(|item| {
                    let entry = PyDict::new(py);
                    entry.set_item("term", &item.term)?;
                    entry.set_item("classifiers", &item.classifiers)?;
                    entry.set_item("definition", convert_nodes(py, &item.definition)?)?;
                    Ok(entry)
                })
                .collect::<PyResult<Vec<_>>>()?;
            dict.set_item("items", items)?;
        }
        Node::Table(t) => {
            let kind = match t.kind {
                TableKind::Grid => "grid",
                TableKind::Simple => "simple",
            };
            dict.set_item("kind", kind)?;
            dict.set_item("header_rows", t.header_rows)?;
            dict.set_item("rows", &t.rows)?;
        }
        Node::Code(c) => {
            dict.set_item("language", c.language.as_deref())?;
            dict.set_item("text", &c.text)?;
            dict.set_item("line_numbers", c.line_numbers)?;
        }
        Node::Admonition(a) => {
            dict.set_item("kind", &a.kind)?;
            dict.set_item("children", convert_nodes(py, &a.children)?)?;
        }
        Node::Substitutions(s) => {
            let definitions = PyDict::new(py);
            for (name, replacement) in &s.definitions {
                definitions.set_item(name, replacement)?;
            }
            dict.set_item("definitions", definitions)?;
        }
        Node::Directive(d) => {
            dict.set_item("name", &d.name)?;
            dict.set_item("argument", &d.argument)?;
            let options: Vec<(&str, &str)> = d
                .options
                .iter()
                .map(|(key, value)| (key.as_str(), value.as_str()))
                .collect();
            dict.set_item("options", options)?;
            dict.set_item("content", &d.content)?;
        }
    }

    Ok(dict)
}

// ============================================================================
// PyDocument
// ============================================================================

/// A parsed document.
#[pyclass(frozen, name = "Document")]
pub struct PyDocument {
    /// Fingerprint of the raw input.
    #[pyo3(get)]
    pub id: String,
    /// Nodes as dicts, in document order.
    #[pyo3(get)]
    pub nodes: Py<PyList>,
}

#[pymethods]
impl PyDocument {
    fn __repr__(&self, py: Python<'_>) -> String {
        format!("Document(id={:?}, nodes={})", self.id, self.nodes.bind(py).len())
    }

    fn __len__(&self, py: Python<'_>) -> usize {
        self.nodes.bind(py).len()
    }
}

// ============================================================================
// Parser
// ============================================================================

/// reStructuredText parser.
///
/// Args:
///     tab_width: Columns per tab stop (default: 8)
///     initial_header_level: Level of the first title style (default: 1)
///     strict_directives: Raise on unknown directives (default: True)
#[pyclass(frozen, name = "Parser")]
pub struct PyParser {
    config: ParserConfig,
}

#[pymethods]
impl PyParser {
    #[new]
    #[pyo3(
        signature = (tab_width=None, initial_header_level=None, strict_directives=None),
        text_signature = "(tab_width=None, initial_header_level=None, strict_directives=None)"
    )]
    fn new(
        tab_width: Option<usize>,
        initial_header_level: Option<usize>,
        strict_directives: Option<bool>,
    ) -> Self {
        let mut config = ParserConfig::default();
        if let Some(width) = tab_width {
            config = config.with_tab_width(width);
        }
        if let Some(level) = initial_header_level {
            config = config.with_initial_header_level(level);
        }
        if strict_directives == Some(false) {
            config = config.with_unknown_directives(UnknownDirectivePolicy::Warn);
        }
        PyParser { config }
    }

    /// Parse a document. Raises ValueError on error.
    #[pyo3(text_signature = "(self, input)")]
    fn parse(&self, py: Python<'_>, input: &str) -> PyResult<PyDocument> {
        // The core parser holds boxed hooks, so each call builds its own.
        let mut parser = CoreParser::new(self.config.clone());
        let doc = parser
            .parse(input)
            .map_err(|e| PyValueError::new_err(e.to_string()))?;
        Ok(PyDocument {
            id: doc.id().to_string(),
            nodes: convert_nodes(py, doc.nodes())?.unbind(),
        })
    }

    fn __repr__(&self) -> String {
        format!(
            "Parser(tab_width={}, initial_header_level={}, strict_directives={})",
            self.config.tab_width,
            self.config.initial_header_level,
            self.config.unknown_directives == UnknownDirectivePolicy::Error
        )
    }
}

// ============================================================================
// Module
// ============================================================================

/// Parse a document with default settings.
///
/// Args:
///     input: Document string to parse
///
/// Returns:
///     Document: Parsed document
///
/// Raises:
///     ValueError: On parse error
#[pyfunction]
#[pyo3(text_signature = "(input)")]
fn parse(py: Python<'_>, input: &str) -> PyResult<PyDocument> {
    PyParser::new(None, None, None).parse(py, input)
}

/// rstdoc - reStructuredText document parser.
#[pymodule]
fn pyrst(m: &Bound<'_, PyModule>) -> PyResult<()> {
    m.add_class::<PyParser>()?;
    m.add_class::<PyDocument>()?;
    m.add_function(wrap_pyfunction!(parse, m)?)?;
    Ok(())
}
