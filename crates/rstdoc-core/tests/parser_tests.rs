//! Integration tests for the document driver

use std::cell::{Cell, RefCell};
use std::rc::Rc;
use std::sync::{Arc, Mutex};

use pretty_assertions::assert_eq;
use rstest::rstest;

use rstdoc_core::ast::{fingerprint, Paragraph, SectionEnd};
use rstdoc_core::rules::TitleRule;
use rstdoc_core::{
    Directive, DirectiveCall, Document, Node, ParseContext, ParseErrorKind, Parser, ParserConfig,
    Rule, RuleSet, Span, Title, TitleId, UnknownDirectivePolicy,
};

fn parse(input: &str) -> Document {
    Parser::default().parse(input).unwrap()
}

fn kinds(doc: &Document) -> Vec<&'static str> {
    doc.iter().map(Node::kind).collect()
}

fn section_end_ids(doc: &Document) -> Vec<TitleId> {
    doc.section_ends().map(|end| end.title).collect()
}

// ============================================================================
// End-to-end Scenarios
// ============================================================================

#[test]
fn test_title_and_paragraph() {
    let doc = parse("Title\n=====\n\nHello world.\n");

    assert_eq!(
        doc.nodes(),
        &[
            Node::Title(Title {
                id: TitleId(0),
                level: 1,
                text: "Title".to_string(),
                span: Span::lines(0, 1),
            }),
            Node::Paragraph(Paragraph {
                text: "Hello world.".to_string(),
                span: Span::line(3),
            }),
            Node::SectionEnd(SectionEnd {
                title: TitleId(0),
                level: 1,
            }),
        ]
    );
}

#[test]
fn test_sibling_titles_close_previous_section() {
    let doc = parse("A\n=\n\nx\n\nB\n=\n\ny\n");

    assert_eq!(
        kinds(&doc),
        vec![
            "title",
            "paragraph",
            "section_end",
            "title",
            "paragraph",
            "section_end"
        ]
    );
    let titles: Vec<&str> = doc.titles().map(|t| t.text.as_str()).collect();
    assert_eq!(titles, vec!["A", "B"]);
    assert_eq!(section_end_ids(&doc), vec![TitleId(0), TitleId(1)]);
}

#[test]
fn test_shallower_title_closes_deeper_sections() {
    let doc = parse("A\n=\n\nB\n-\n\nC\n=\n");

    assert_eq!(
        kinds(&doc),
        vec![
            "title",
            "title",
            "section_end",
            "section_end",
            "title",
            "section_end"
        ]
    );
    assert_eq!(
        section_end_ids(&doc),
        vec![TitleId(0), TitleId(1), TitleId(2)]
    );
}

// ============================================================================
// Section Closing
// ============================================================================

#[rstest]
#[case::empty("")]
#[case::single("Title\n=====\n\ntext")]
#[case::nested("A\n=\n\nB\n-\n\nC\n=\n\nD\n-")]
#[case::overlined("=====\nTop\n=====\n\nSub\n---\n\ntext")]
#[case::repeated("Same\n====\n\nSame\n====\n\nSame\n====")]
#[case::deep("One\n===\n\nTwo\n---\n\nThree\n~~~~~\n\nFour\n^^^^\n\nFive\n====")]
fn test_every_title_is_closed(#[case] input: &str) {
    let doc = parse(input);
    assert_eq!(doc.titles().count(), doc.section_ends().count());
}

#[test]
fn test_end_of_document_closes_in_opening_order() {
    let doc = parse("T1\n==\n\nT2\n--\n\ntext");

    assert_eq!(section_end_ids(&doc), vec![TitleId(0), TitleId(1)]);
    let levels: Vec<usize> = doc.section_ends().map(|end| end.level).collect();
    assert_eq!(levels, vec![1, 2]);
}

#[test]
fn test_identical_titles_are_distinct_sections() {
    let doc = parse("Same\n====\n\nSame\n====");
    let ids: Vec<TitleId> = doc.titles().map(|t| t.id).collect();

    assert_eq!(ids, vec![TitleId(0), TitleId(1)]);
    assert_eq!(section_end_ids(&doc), ids);
}

#[test]
fn test_no_sections_left_open_after_parse() {
    let mut parser = Parser::default();
    parser.parse("A\n=\n\nB\n-\n").unwrap();

    assert!(parser.open_sections().is_empty());
    assert_eq!(parser.last_title().map(|t| t.text.as_str()), Some("B"));
}

// ============================================================================
// Rule Priority
// ============================================================================

#[test]
fn test_underline_is_not_a_transition() {
    let doc = parse("Heading\n-------\n");
    assert_eq!(kinds(&doc), vec!["title", "section_end"]);
}

#[test]
fn test_standalone_line_is_a_transition() {
    let doc = parse("Para\n\n-------\n\nMore");
    assert_eq!(kinds(&doc), vec!["paragraph", "transition", "paragraph"]);
    assert_eq!(doc.nodes()[1], Node::Transition(Span::line(2)));
}

// ============================================================================
// Determinism and Identity
// ============================================================================

const SAMPLE: &str = "Guide\n=====\n\nIntro text.\n\n- one\n- two\n\nUsage\n-----\n\n.. note:: Read this.\n\nExample::\n\n    code\n";

#[test]
fn test_fresh_parsers_agree() {
    let first = Parser::default().parse(SAMPLE).unwrap();
    let second = Parser::default().parse(SAMPLE).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_reused_parser_resets_state() {
    let mut parser = Parser::default();
    let first = parser.parse(SAMPLE).unwrap();
    parser.parse("Other\n~~~~~\n\nText").unwrap();
    let again = parser.parse(SAMPLE).unwrap();

    assert_eq!(first, again);
    assert_eq!(again.titles().next().map(|t| t.level), Some(1));
}

#[test]
fn test_fingerprint_uses_untouched_input() {
    let input = "  text  \n\n";
    let mut parser = Parser::default().with_pre_parse(|text| text.to_uppercase());
    let doc = parser.parse(input).unwrap();

    assert_eq!(doc.id(), fingerprint(input));
    assert_ne!(doc.id(), fingerprint("TEXT"));
    assert_eq!(doc.id().len(), 16);
}

#[test]
fn test_fingerprint_is_pinned() {
    assert_eq!(fingerprint(""), "e3b0c44298fc1c14");
    assert_eq!(fingerprint("abc"), "ba7816bf8f01cfea");
}

#[rstest]
#[case::empty("")]
#[case::whitespace("   \n\n  \t\n")]
fn test_empty_input(#[case] input: &str) {
    let doc = parse(input);
    assert!(doc.is_empty());
    assert_eq!(doc.id(), fingerprint(input));
}

#[test]
fn test_input_is_trimmed_before_loading() {
    let mut parser = Parser::default();
    let doc = parser.parse("\n\n\nText\n\n\n").unwrap();

    assert_eq!(
        doc.nodes(),
        &[Node::Paragraph(Paragraph {
            text: "Text".to_string(),
            span: Span::line(0),
        })]
    );
    assert_eq!(parser.cursor().len(), 1);
}

// ============================================================================
// Hooks and Finalization
// ============================================================================

#[test]
fn test_pre_parse_rewrite_is_parsed() {
    let mut parser = Parser::default().with_pre_parse(|text| text.replace('A', "B"));
    let doc = parser.parse("A").unwrap();

    assert_eq!(
        doc.nodes(),
        &[Node::Paragraph(Paragraph {
            text: "B".to_string(),
            span: Span::line(0),
        })]
    );
}

#[test]
fn test_post_parse_sees_finalized_document() {
    let seen = Rc::new(RefCell::new(Vec::new()));
    let sink = Rc::clone(&seen);
    let mut parser = Parser::default().with_post_parse(move |doc| {
        sink.borrow_mut().extend(doc.iter().map(Node::kind));
    });

    parser
        .parse(".. |name| replace:: value\n\nText")
        .unwrap();
    assert_eq!(*seen.borrow(), vec!["paragraph", "substitutions"]);
}

#[test]
fn test_substitutions_do_not_leak_between_parses() {
    let mut parser = Parser::default();
    let first = parser.parse(".. |a| replace:: alpha\n").unwrap();
    let second = parser.parse("Plain text.").unwrap();

    match first.nodes() {
        [Node::Substitutions(subs)] => assert_eq!(
            subs.definitions,
            vec![("a".to_string(), "alpha".to_string())]
        ),
        other => panic!("unexpected nodes: {:?}", other),
    }
    assert_eq!(kinds(&second), vec!["paragraph"]);
}

/// Collects `footer` text and appends it after everything else.
struct Footer {
    lines: Vec<String>,
    finalized: Rc<Cell<usize>>,
}

impl Directive for Footer {
    fn name(&self) -> &str {
        "footer"
    }

    fn process(&mut self, call: DirectiveCall) -> rstdoc_core::Result<Option<Node>> {
        self.lines.push(call.argument);
        Ok(None)
    }

    fn finalize(&mut self, document: &mut Document) -> rstdoc_core::Result<()> {
        self.finalized.set(self.finalized.get() + 1);
        if !self.lines.is_empty() {
            document.push(Node::Paragraph(Paragraph {
                text: self.lines.join(" "),
                span: Span::line(0),
            }));
        }
        Ok(())
    }

    fn reset(&mut self) {
        self.lines.clear();
    }
}

#[test]
fn test_finalize_runs_after_section_sweep() {
    let finalized = Rc::new(Cell::new(0));
    let mut parser = Parser::default();
    parser.register_directive(Footer {
        lines: Vec::new(),
        finalized: Rc::clone(&finalized),
    });

    let doc = parser.parse("Title\n=====\n\n.. footer:: bye").unwrap();
    assert_eq!(kinds(&doc), vec!["title", "section_end", "paragraph"]);
    assert_eq!(finalized.get(), 1);

    let empty = parser.parse("").unwrap();
    assert!(empty.is_empty());
    assert_eq!(finalized.get(), 2);
}

// ============================================================================
// Errors
// ============================================================================

#[test]
fn test_unknown_directive_is_an_error_by_default() {
    let err = Parser::default().parse("Text\n\n.. foo:: bar").unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::UnknownDirective);
    assert_eq!(err.line, Some(2));
    assert_eq!(err.to_string(), "unknown directive \"foo\" at line 3");
}

#[test]
fn test_unknown_directive_can_be_kept() {
    let config = ParserConfig::default().with_unknown_directives(UnknownDirectivePolicy::Warn);
    let doc = Parser::new(config)
        .parse(".. foo:: bar\n   :key: value\n\n   body")
        .unwrap();

    match doc.nodes() {
        [Node::Directive(block)] => {
            assert_eq!(block.name, "foo");
            assert_eq!(block.argument, "bar");
            assert_eq!(block.options, vec![("key".to_string(), "value".to_string())]);
            assert_eq!(block.content, "body");
            assert_eq!(block.span, Span::lines(0, 3));
        }
        other => panic!("unexpected nodes: {:?}", other),
    }
}

#[test]
fn test_syntax_error_is_located() {
    let err = Parser::default()
        .parse("Intro\n\nHeading text\n====\n")
        .unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::Syntax);
    assert_eq!(err.line, Some(3));
    assert_eq!(err.text.as_deref(), Some("===="));
    assert_eq!(err.to_string(), "title underline too short at line 4");
}

#[test]
fn test_missing_catch_all_rule_is_reported() {
    let mut parser = Parser::default().with_rules(RuleSet::new().with(TitleRule));
    let err = parser.parse("plain text").unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::NoRuleApplied);
    assert_eq!(err.line, Some(0));
    assert_eq!(err.text.as_deref(), Some("plain text"));
}

#[rstest]
#[case::block_quote("Intro\n\n    Bad heading text\n    =====\n", 3)]
#[case::list_item("Intro\n\n- item\n\n  Heading text\n  ====", 5)]
#[case::definition("term\n    Heading text\n    ====", 2)]
#[case::directive_body(".. note::\n\n   Heading text\n   ====", 3)]
#[case::directive_after_options(".. note::\n   :class: x\n\n   Heading text\n   ====", 4)]
#[case::quote_in_list("- item\n\n      Heading text\n      ====", 3)]
fn test_nested_errors_report_document_lines(#[case] input: &str, #[case] line: usize) {
    let err = Parser::default().parse(input).unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::Syntax);
    assert_eq!(err.line, Some(line));
    assert_eq!(err.text.as_deref().map(str::trim), Some(input.lines().nth(line).unwrap().trim()));
}

#[test]
fn test_block_quote_error_display() {
    let err = Parser::default()
        .parse("Intro\n\n    Bad heading text\n    =====\n")
        .unwrap_err();
    assert_eq!(err.to_string(), "title underline too short at line 4");
}

#[test]
fn test_deep_nesting_is_an_error() {
    let input = format!("{}x", "- ".repeat(800));
    let err = Parser::default().parse(&input).unwrap_err();

    assert_eq!(err.kind, ParseErrorKind::Syntax);
    assert_eq!(err.message, "nesting too deep");
    assert_eq!(err.line, Some(0));
}

#[test]
fn test_nesting_limit_is_configurable() {
    let config = ParserConfig::default().with_max_nesting_depth(1);

    assert!(Parser::new(config.clone()).parse("- x").is_ok());
    let err = Parser::new(config).parse("- a\n\n  - b").unwrap_err();
    assert_eq!(err.message, "nesting too deep");
    assert_eq!(err.line, Some(2));
}

// ============================================================================
// Cursor Contract
// ============================================================================

/// Records the lines it is dispatched on. A line reading `pair` also
/// consumes the line after it.
struct Recorder {
    seen: Arc<Mutex<Vec<usize>>>,
}

impl Rule for Recorder {
    fn name(&self) -> &'static str {
        "recorder"
    }

    fn applies(&self, _ctx: &ParseContext<'_>) -> bool {
        true
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> rstdoc_core::Result<Option<Node>> {
        let position = ctx.cursor().position();
        self.seen.lock().unwrap().push(position);
        if ctx.cursor().current() == Some("pair") {
            ctx.cursor_mut().advance(1);
        }
        Ok(None)
    }
}

#[test]
fn test_driver_steps_past_last_consumed_line() {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let rules = RuleSet::new().with(Recorder {
        seen: Arc::clone(&seen),
    });
    let mut parser = Parser::default().with_rules(rules);
    parser.parse("pair\nconsumed\nnext\npair\nlast").unwrap();

    assert_eq!(*seen.lock().unwrap(), vec![0, 2, 3]);
    assert!(!parser.cursor().valid());
    assert_eq!(parser.cursor().position(), 5);
}

#[test]
fn test_cursor_is_exhausted_after_parse() {
    let mut parser = Parser::default();
    let doc = parser.parse(SAMPLE).unwrap();

    assert!(!parser.cursor().valid());
    assert_eq!(parser.cursor().position(), parser.cursor().len());
    assert_eq!(parser.document(), &doc);
}

// ============================================================================
// Title Identity
// ============================================================================

fn collect_title_ids(nodes: &[Node], titles: &mut Vec<TitleId>, ends: &mut Vec<TitleId>) {
    for node in nodes {
        match node {
            Node::Title(title) => titles.push(title.id),
            Node::SectionEnd(end) => ends.push(end.title),
            Node::BlockQuote(quote) => collect_title_ids(&quote.children, titles, ends),
            Node::Admonition(admonition) => collect_title_ids(&admonition.children, titles, ends),
            Node::List(list) => {
                for item in &list.items {
                    collect_title_ids(&item.blocks, titles, ends);
                }
            }
            Node::DefinitionList(list) => {
                for item in &list.items {
                    collect_title_ids(&item.definition, titles, ends);
                }
            }
            _ => {}
        }
    }
}

#[test]
fn test_nested_titles_get_their_own_ids() {
    let doc = parse("Top\n===\n\n    Quoted\n    ======\n\nNext\n====\n");

    match doc.nodes() {
        [Node::Title(top), Node::BlockQuote(quote), Node::SectionEnd(top_end), Node::Title(next), Node::SectionEnd(next_end)] =>
        {
            assert_eq!(top.id, TitleId(0));
            assert_eq!(top_end.title, TitleId(0));
            assert_eq!(next.id, TitleId(2));
            assert_eq!(next_end.title, TitleId(2));
            match quote.children.as_slice() {
                [Node::Title(inner), Node::SectionEnd(inner_end)] => {
                    assert_eq!(inner.id, TitleId(1));
                    assert_eq!(inner_end.title, TitleId(1));
                    assert_eq!(inner.span, Span::lines(3, 4));
                }
                other => panic!("unexpected quote children: {:?}", other),
            }
        }
        other => panic!("unexpected nodes: {:?}", other),
    }
}

#[rstest]
#[case::quote("Top\n===\n\n    Quoted\n    ======\n\nNext\n====\n")]
#[case::list_and_note("A\n=\n\n- B\n\n  B\n  -\n\n.. note::\n\n   C\n   =\n\nD\n=")]
#[case::flat(SAMPLE)]
fn test_title_ids_are_unique(#[case] input: &str) {
    let doc = parse(input);
    let (mut titles, mut ends) = (Vec::new(), Vec::new());
    collect_title_ids(doc.nodes(), &mut titles, &mut ends);

    let mut unique = titles.clone();
    unique.sort();
    unique.dedup();
    assert_eq!(unique.len(), titles.len());

    ends.sort();
    assert_eq!(ends, unique);
}
