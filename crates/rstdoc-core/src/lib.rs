//! # rstdoc core
//!
//! Document driver for a reStructuredText parser.
//!
//! Raw text is split into lines and walked by a cursor. At every line the
//! driver tries an ordered list of production rules and applies the first
//! one that accepts it. Titles open sections; a section is closed with a
//! `SectionEnd` marker when a sibling or shallower title appears, or when the
//! document ends. Directives are handed to a registry of handlers that get a
//! final pass over the finished document.
//!
//! ## Quick Start
//!
//! ```rust
//! use rstdoc_core::{Node, Parser};
//!
//! let mut parser = Parser::default();
//! let doc = parser.parse("Title\n=====\n\nHello world.\n").unwrap();
//!
//! assert_eq!(doc.len(), 3);
//! assert!(matches!(doc.nodes()[1], Node::Paragraph(_)));
//! ```
//!
//! ## Hooks
//!
//! ```rust
//! use rstdoc_core::Parser;
//!
//! let mut parser = Parser::default()
//!     .with_pre_parse(|text| text.replace("|version|", "1.0"))
//!     .with_post_parse(|doc| println!("{} nodes", doc.len()));
//! let doc = parser.parse("Release |version|").unwrap();
//! println!("document {}", doc.id());
//! ```

pub mod ast;
pub mod config;
pub mod context;
pub mod cursor;
pub mod directives;
pub mod error;
pub mod hooks;
pub mod parser;
pub mod rules;
pub mod sections;
pub mod span;

pub use ast::{Document, Node, Title, TitleId};
pub use config::{ParserConfig, UnknownDirectivePolicy};
pub use context::ParseContext;
pub use cursor::LineCursor;
pub use directives::{Directive, DirectiveCall, DirectiveRegistry};
pub use error::{ParseError, ParseErrorKind, Result};
pub use parser::Parser;
pub use rules::{Rule, RuleSet};
pub use sections::OpenSections;
pub use span::Span;
