use crate::ast::{List, ListItem, ListKind, Node};
use crate::context::ParseContext;
use crate::cursor::{indentation, is_blank, LineCursor};
use crate::error::Result;
use crate::rules::{next_non_blank, Rule};
use crate::span::Span;

/// Bullet and enumerated lists.
///
/// Bullets are `-`, `*` and `+`. Enumerators are arabic numbers or `#`
/// written as `1.`, `1)` or `(1)`. Every marker is followed by a space or
/// ends the line. Item bodies continue on indented lines and are parsed as
/// documents of their own.
#[derive(Debug, Clone, Copy, Default)]
pub struct ListRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Style {
    Bullet(char),
    Period,
    Paren,
    Enclosed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Marker {
    style: Style,
    number: Option<u64>,
    /// Column where item text starts.
    content: usize,
}

impl Marker {
    fn kind(&self) -> ListKind {
        match self.style {
            Style::Bullet(_) => ListKind::Unordered,
            _ => ListKind::Ordered,
        }
    }
}

fn marker(line: &str) -> Option<Marker> {
    if indentation(line) > 0 || is_blank(line) {
        return None;
    }
    let bytes = line.as_bytes();

    let (style, number, width) = match bytes[0] {
        b'-' | b'*' | b'+' => (Style::Bullet(bytes[0] as char), None, 1),
        b'(' => {
            let (number, digits) = enumerator(&line[1..])?;
            if bytes.get(1 + digits) != Some(&b')') {
                return None;
            }
            (Style::Enclosed, number, digits + 2)
        }
        _ => {
            let (number, digits) = enumerator(line)?;
            let style = match bytes.get(digits) {
                Some(b'.') => Style::Period,
                Some(b')') => Style::Paren,
                _ => return None,
            };
            (style, number, digits + 1)
        }
    };

    match bytes.get(width) {
        None => Some(Marker {
            style,
            number,
            content: width + 1,
        }),
        Some(b' ') => {
            let spaces = line[width..].len() - line[width..].trim_start().len();
            Some(Marker {
                style,
                number,
                content: width + spaces,
            })
        }
        _ => None,
    }
}

/// Parse a leading enumerator: `#` or up to nine digits.
fn enumerator(text: &str) -> Option<(Option<u64>, usize)> {
    if text.starts_with('#') {
        return Some((None, 1));
    }
    let digits = text.bytes().take_while(u8::is_ascii_digit).count();
    if digits == 0 || digits > 9 {
        return None;
    }
    let number = text[..digits].parse().ok()?;
    Some((Some(number), digits))
}

/// Body text of the item starting at `start`, and the item's last line.
///
/// Line `i` of the body is line `start + i` of the cursor, even when the
/// marker line carries no text.
fn item_body(cursor: &LineCursor, start: usize, marker: &Marker) -> (String, usize) {
    let first = cursor.line(start).unwrap_or_default();
    let mut lines = vec![first.get(marker.content..).unwrap_or_default().trim_end()];
    let mut last = start;
    let mut index = start + 1;
    while let Some(line) = cursor.line(index) {
        if !is_blank(line) {
            if indentation(line) == 0 {
                break;
            }
            last = index;
        }
        index += 1;
    }

    for line in (start + 1..=last).filter_map(|i| cursor.line(i)) {
        let strip = indentation(line).min(marker.content);
        lines.push(line[strip..].trim_end());
    }
    (lines.join("\n"), last)
}

impl Rule for ListRule {
    fn name(&self) -> &'static str {
        "list"
    }

    fn applies(&self, ctx: &ParseContext<'_>) -> bool {
        ctx.cursor().current().and_then(marker).is_some()
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>> {
        let position = ctx.cursor().position();
        let Some(first) = ctx.cursor().current().and_then(marker) else {
            return Ok(None);
        };

        let mut items = Vec::new();
        let mut start = position;
        let mut current = first;
        let last = loop {
            let (body, last) = item_body(ctx.cursor(), start, &current);
            let blocks = ctx.parse_nested(&body, start)?;
            items.push(ListItem {
                blocks,
                span: Span::lines(start, last),
            });

            let cursor = ctx.cursor();
            let next = next_non_blank(cursor, last + 1)
                .and_then(|index| Some((index, cursor.line(index).and_then(marker)?)))
                .filter(|(_, next)| next.style == first.style);
            match next {
                Some((index, next)) => {
                    start = index;
                    current = next;
                }
                None => break last,
            }
        };

        ctx.cursor_mut().seek(last);
        Ok(Some(Node::List(List {
            kind: first.kind(),
            start: first.number,
            items,
            span: Span::lines(position, last),
        })))
    }
}
