//! rstcli - parse, validate and inspect reStructuredText documents
//!
//! Usage:
//!   rstcli [OPTIONS] <COMMAND> <FILE>
//!
//! Commands:
//!   parse     Print the document nodes
//!   validate  Check the document for errors
//!   stats     Show node counts and the document fingerprint
//!   outline   Show the section tree

mod config;
mod json;
mod report;

use std::path::{Path, PathBuf};
use std::process;

use anyhow::{Context, Result};
use clap::{Parser as ClapParser, Subcommand};
use rstdoc_core::{Document, Node, Parser, ParserConfig};

use crate::config::{Config, DEFAULT_CONFIG_FILE};
use crate::report::{leading_lines, outline, DocumentStats};

#[derive(ClapParser)]
#[command(name = "rstcli", version, about = "reStructuredText document parser and validator")]
struct Cli {
    /// Output in JSON format
    #[arg(short, long, global = true)]
    json: bool,

    /// Log each rule decision
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Parser settings file (defaults to ./rstdoc.toml when present)
    #[arg(long, global = true, value_name = "PATH")]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Parse and print the document nodes
    Parse { file: PathBuf },
    /// Check the document for errors without printing it
    Validate { file: PathBuf },
    /// Show document statistics
    Stats { file: PathBuf },
    /// Show the section outline
    Outline { file: PathBuf },
}

fn main() {
    let cli = Cli::parse();

    env_logger::Builder::from_default_env()
        .filter_level(if cli.verbose {
            log::LevelFilter::Debug
        } else {
            log::LevelFilter::Warn
        })
        .init();

    match run(&cli) {
        Ok(true) => {}
        Ok(false) => process::exit(1),
        Err(e) => {
            eprintln!("error: {:#}", e);
            process::exit(1);
        }
    }
}

/// Returns `false` when the command ran but the document is invalid.
fn run(cli: &Cli) -> Result<bool> {
    let parser_config = load_parser_config(cli.config.as_deref())?;
    let mut parser = Parser::new(parser_config);

    match &cli.command {
        Command::Parse { file } => {
            let input = read_input(file)?;
            let doc = parser
                .parse(&input)
                .with_context(|| format!("failed to parse '{}'", file.display()))?;
            if cli.json {
                print_json(&json::convert_document(&doc))?;
            } else {
                print_document(&doc, leading_lines(&input));
            }
            Ok(true)
        }
        Command::Validate { file } => {
            let input = read_input(file)?;
            cmd_validate(&mut parser, &input, cli.json)
        }
        Command::Stats { file } => {
            let input = read_input(file)?;
            let doc = parser
                .parse(&input)
                .with_context(|| format!("failed to parse '{}'", file.display()))?;
            let stats = DocumentStats::from_document(&doc, &input);
            if cli.json {
                print_json(&stats)?;
            } else {
                print_stats(&stats);
            }
            Ok(true)
        }
        Command::Outline { file } => {
            let input = read_input(file)?;
            let doc = parser
                .parse(&input)
                .with_context(|| format!("failed to parse '{}'", file.display()))?;
            let entries = outline(&doc, leading_lines(&input));
            if cli.json {
                print_json(&entries)?;
            } else {
                for entry in &entries {
                    println!("{}{} (line {})", "  ".repeat(entry.depth), entry.text, entry.line);
                }
            }
            Ok(true)
        }
    }
}

/// An explicit `--config` path must exist; the default file may be absent.
fn load_parser_config(path: Option<&Path>) -> Result<ParserConfig> {
    let config = match path {
        Some(path) => Config::load(path)
            .with_context(|| format!("failed to load config '{}'", path.display()))?,
        None => Config::load_from_path(DEFAULT_CONFIG_FILE)
            .with_context(|| format!("failed to load config '{}'", DEFAULT_CONFIG_FILE))?
            .unwrap_or_default(),
    };
    Ok(config.parser_config())
}

fn read_input(file: &Path) -> Result<String> {
    std::fs::read_to_string(file).with_context(|| format!("failed to read '{}'", file.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

// =============================================================================
// Validate Command
// =============================================================================

fn cmd_validate(parser: &mut Parser, input: &str, json: bool) -> Result<bool> {
    match parser
        .parse(input)
        .map_err(|error| error.offset_line(leading_lines(input)))
    {
        Ok(doc) => {
            if json {
                print_json(&serde_json::json!({"valid": true, "id": doc.id()}))?;
            } else {
                println!("Valid: {} nodes", doc.len());
            }
            Ok(true)
        }
        Err(error) => {
            if json {
                print_json(&serde_json::json!({
                    "valid": false,
                    "error": {
                        "kind": format!("{:?}", error.kind),
                        "message": error.message,
                        "line": error.line.map(|line| line + 1),
                    }
                }))?;
            } else {
                eprintln!("Invalid: {}", error);
                if let Some(text) = &error.text {
                    eprintln!("  | {}", text);
                }
            }
            Ok(false)
        }
    }
}

// =============================================================================
// Text Output
// =============================================================================

fn print_document(doc: &Document, skipped: usize) {
    println!("Document: {}", doc.id());
    println!("Nodes: {}", doc.len());
    for (i, node) in doc.nodes().iter().enumerate() {
        println!("  [{}] {}", i + 1, describe_node(node, skipped));
    }
}

/// One-line summary of a node. `skipped` is the number of input lines
/// before the first parsed line.
fn describe_node(node: &Node, skipped: usize) -> String {
    let detail = match node {
        Node::Title(t) => format!("level {}: {}", t.level, t.text),
        Node::SectionEnd(end) => format!("closes title {} (level {})", end.title.0, end.level),
        Node::Paragraph(p) => preview(&p.text),
        Node::LinkTarget(l) => format!(
            "{} -> {}",
            l.name.as_deref().unwrap_or("(anonymous)"),
            l.url.as_deref().unwrap_or("(internal)")
        ),
        Node::LiteralBlock(l) => preview(&l.text),
        Node::BlockQuote(q) => format!("{} blocks", q.children.len()),
        Node::List(l) => format!("{:?}, {} items", l.kind, l.items.len()),
        Node::DefinitionList(d) => format!("{} terms", d.items.len()),
        Node::Table(t) => format!("{:?}, {} rows", t.kind, t.rows.len()),
        Node::Code(c) => format!("lang: {}", c.language.as_deref().unwrap_or("none")),
        Node::Admonition(a) => a.kind.clone(),
        Node::Substitutions(s) => format!("{} definitions", s.definitions.len()),
        Node::Directive(d) => d.name.clone(),
        Node::Transition(_) => return node.kind().to_string(),
    };
    let line = node
        .span()
        .map(|span| format!(" @{}", skipped + span.start + 1))
        .unwrap_or_default();
    format!("{}{} ({})", node.kind(), line, detail)
}

fn preview(text: &str) -> String {
    let first = text.lines().next().unwrap_or_default();
    let mut out: String = first.chars().take(60).collect();
    if first.chars().count() > 60 || text.contains('\n') {
        out.push_str("...");
    }
    out
}

fn print_stats(stats: &DocumentStats) {
    println!("Document Statistics");
    println!("-------------------");
    println!("Fingerprint:  {}", stats.fingerprint);
    println!("Lines:        {}", stats.lines);
    println!("Sections:     {}", stats.sections);
    println!("Top-level:    {}", stats.top_level_nodes);
    println!();
    println!("Nodes:");
    for (kind, count) in &stats.kinds {
        println!("  {:<16}{}", kind, count);
    }
}
