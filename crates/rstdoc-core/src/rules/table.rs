use crate::ast::{Node, Table, TableKind};
use crate::context::ParseContext;
use crate::cursor::{indentation, is_blank, LineCursor};
use crate::error::{ParseError, Result};
use crate::rules::Rule;
use crate::span::Span;

/// Grid and simple tables.
///
/// ```text
/// +-------+-------+      =====  =====
/// | head  | head  |      head   head
/// +=======+=======+      =====  =====
/// | cell  | cell  |      cell   cell
/// +-------+-------+      =====  =====
/// ```
///
/// Cells hold plain text; spanning cells are not supported. A table that is
/// not closed, or whose rows do not line up with its border, is an error.
#[derive(Debug, Clone, Copy, Default)]
pub struct TableRule;

fn is_grid_border(line: &str) -> bool {
    let line = line.trim_end();
    line.len() >= 3
        && line.starts_with('+')
        && line.ends_with('+')
        && line.contains(['-', '='])
        && line.chars().all(|ch| matches!(ch, '+' | '-' | '='))
}

fn is_simple_border(line: &str) -> bool {
    let line = line.trim_end();
    line.starts_with('=') && line.chars().all(|ch| ch == '=' || ch == ' ')
}

/// Column ranges of a simple table border, in characters.
fn simple_columns(line: &str) -> Vec<(usize, usize)> {
    let mut columns = Vec::new();
    let mut start = None;
    for (index, ch) in line.trim_end().chars().enumerate() {
        match (ch, start) {
            ('=', None) => start = Some(index),
            (' ', Some(begin)) => {
                columns.push((begin, index));
                start = None;
            }
            _ => {}
        }
    }
    if let Some(begin) = start {
        columns.push((begin, line.trim_end().chars().count()));
    }
    columns
}

fn cell(chars: &[char], start: usize, end: usize) -> String {
    let end = end.min(chars.len());
    let start = start.min(end);
    chars[start..end].iter().collect::<String>().trim().to_string()
}

fn join_cell(cell: &mut String, text: &str) {
    if text.is_empty() {
        return;
    }
    if !cell.is_empty() {
        cell.push(' ');
    }
    cell.push_str(text);
}

fn grid(cursor: &LineCursor, position: usize) -> Result<(Table, usize)> {
    let top = cursor.line(position).unwrap_or_default().trim_end();
    let boundaries: Vec<usize> = top
        .chars()
        .enumerate()
        .filter(|(_, ch)| *ch == '+')
        .map(|(index, _)| index)
        .collect();

    let mut rows = Vec::new();
    let mut pending: Option<Vec<String>> = None;
    let mut header_rows = 0;
    let mut index = position + 1;

    let last = loop {
        let Some(line) = cursor.line(index).filter(|line| !is_blank(line)) else {
            return Err(ParseError::syntax(
                "grid table is not closed",
                position,
                top,
            ));
        };
        let chars: Vec<char> = line.trim_end().chars().collect();

        if is_grid_border(line) {
            let aligned = chars.len() == top.chars().count()
                && boundaries.iter().all(|&b| chars.get(b) == Some(&'+'));
            if !aligned {
                return Err(ParseError::syntax(
                    "grid table border does not match the top border",
                    index,
                    line,
                ));
            }
            if let Some(row) = pending.take() {
                rows.push(row);
            }
            if chars.contains(&'=') {
                header_rows = rows.len();
            }
            let continues = cursor
                .line(index + 1)
                .is_some_and(|next| next.starts_with(['|', '+']));
            if !continues {
                break index;
            }
        } else if line.starts_with('|') {
            if !boundaries.iter().all(|&b| chars.get(b) == Some(&'|')) {
                return Err(ParseError::syntax(
                    "grid table row does not line up with its border",
                    index,
                    line,
                ));
            }
            let row = pending.get_or_insert_with(|| vec![String::new(); boundaries.len() - 1]);
            for (column, pair) in boundaries.windows(2).enumerate() {
                join_cell(&mut row[column], &cell(&chars, pair[0] + 1, pair[1]));
            }
        } else {
            return Err(ParseError::syntax("malformed grid table line", index, line));
        }
        index += 1;
    };

    let table = Table {
        kind: TableKind::Grid,
        header_rows,
        rows,
        span: Span::lines(position, last),
    };
    Ok((table, last))
}

fn simple(cursor: &LineCursor, position: usize) -> Result<(Table, usize)> {
    let top = cursor.line(position).unwrap_or_default();
    let columns = simple_columns(top);

    let mut rows: Vec<Vec<String>> = Vec::new();
    let mut header_rows = 0;
    let mut separated = false;
    let mut index = position + 1;

    let last = loop {
        let Some(line) = cursor.line(index) else {
            return Err(ParseError::syntax(
                "simple table is not closed",
                position,
                top,
            ));
        };
        if is_blank(line) {
            index += 1;
            continue;
        }

        if is_simple_border(line) {
            let more = cursor.line(index + 1).is_some_and(|next| !is_blank(next));
            if more && !separated {
                separated = true;
                header_rows = rows.len();
                index += 1;
                continue;
            }
            break index;
        }

        let chars: Vec<char> = line.trim_end().chars().collect();
        let cells: Vec<String> = columns
            .iter()
            .enumerate()
            .map(|(column, &(start, end))| {
                // Text in the last column may run past the border.
                let end = if column + 1 == columns.len() {
                    chars.len()
                } else {
                    end
                };
                cell(&chars, start, end)
            })
            .collect();

        // An empty first column continues the previous row.
        let continuation = cells.first().is_some_and(String::is_empty);
        match rows.last_mut() {
            Some(previous) if continuation => {
                for (target, text) in previous.iter_mut().zip(&cells) {
                    join_cell(target, text);
                }
            }
            Some(_) | None => rows.push(cells),
        }
        index += 1;
    };

    let table = Table {
        kind: TableKind::Simple,
        header_rows,
        rows,
        span: Span::lines(position, last),
    };
    Ok((table, last))
}

impl Rule for TableRule {
    fn name(&self) -> &'static str {
        "table"
    }

    fn applies(&self, ctx: &ParseContext<'_>) -> bool {
        ctx.cursor().current().is_some_and(|line| {
            indentation(line) == 0
                && (is_grid_border(line)
                    || (is_simple_border(line) && simple_columns(line).len() >= 2))
        })
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>> {
        let cursor = ctx.cursor();
        let position = cursor.position();
        let is_grid = cursor.current().is_some_and(is_grid_border);
        let (table, last) = if is_grid {
            grid(cursor, position)?
        } else {
            simple(cursor, position)?
        };

        ctx.cursor_mut().seek(last);
        Ok(Some(Node::Table(table)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn simple_border_columns() {
        assert_eq!(simple_columns("=====  ===   ="), vec![(0, 5), (7, 10), (13, 14)]);
    }

    #[test]
    fn grid_border_shapes() {
        assert!(is_grid_border("+---+===+"));
        assert!(!is_grid_border("+++"));
        assert!(!is_grid_border("| a | b |"));
    }
}
