use crate::ast::{Node, Title};
use crate::context::{ParseContext, TitleStyle};
use crate::cursor::{adornment_char, adornment_len, indentation, is_blank, LineCursor};
use crate::error::{ParseError, Result};
use crate::rules::Rule;
use crate::span::Span;

/// Section titles, underlined or over- and underlined.
///
/// ```text
/// Title        =======
/// =====        Title
///              =======
/// ```
///
/// Levels follow the order in which adornment styles first appear. Before
/// the new title is opened, sections it ends are closed: every open section
/// at the same or a deeper level when the title is shallower than the last
/// one, or just the last title when both are at the same level.
#[derive(Debug, Clone, Copy, Default)]
pub struct TitleRule;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shape {
    Underlined,
    Overlined,
}

fn shape(cursor: &LineCursor) -> Option<Shape> {
    let line = cursor.current()?;
    if is_blank(line) {
        return None;
    }
    let next = cursor.peek(1)?;

    if adornment_char(line).is_some() {
        let under = cursor.peek(2)?;
        return (!is_blank(next) && adornment_char(under).is_some()).then_some(Shape::Overlined);
    }

    if indentation(line) > 0 || adornment_char(next).is_none() {
        return None;
    }
    // Short underlines of three characters or fewer only count when they
    // cover the text; anything longer is a title with a bad underline.
    let width = line.trim().chars().count();
    let underline = adornment_len(next);
    (underline >= width || underline >= 4).then_some(Shape::Underlined)
}

impl Rule for TitleRule {
    fn name(&self) -> &'static str {
        "title"
    }

    fn applies(&self, ctx: &ParseContext<'_>) -> bool {
        shape(ctx.cursor()).is_some()
    }

    fn apply(&self, ctx: &mut ParseContext<'_>) -> Result<Option<Node>> {
        let cursor = ctx.cursor();
        let position = cursor.position();
        let (Some(shape), Some(current), Some(next)) =
            (shape(cursor), cursor.current(), cursor.peek(1))
        else {
            return Ok(None);
        };

        let (text, adornment, last) = match shape {
            Shape::Underlined => {
                let text = current.trim().to_string();
                if adornment_len(next) < text.chars().count() {
                    return Err(ParseError::syntax(
                        "title underline too short",
                        position + 1,
                        next,
                    ));
                }
                (text, adornment_char(next), position + 1)
            }
            Shape::Overlined => {
                let under = cursor.peek(2).unwrap_or_default();
                let text = next.trim().to_string();
                if adornment_char(under) != adornment_char(current)
                    || adornment_len(under) != adornment_len(current)
                {
                    return Err(ParseError::syntax(
                        "title overline and underline do not match",
                        position + 2,
                        under,
                    ));
                }
                if adornment_len(current) < text.chars().count() {
                    return Err(ParseError::syntax(
                        "title overline too short",
                        position,
                        current,
                    ));
                }
                (text, adornment_char(current), position + 2)
            }
        };
        let Some(adornment) = adornment else {
            return Ok(None);
        };

        let level = ctx.title_level(TitleStyle {
            adornment,
            overlined: shape == Shape::Overlined,
        });
        if let Some((previous, previous_level)) = ctx.last_title().map(|t| (t.id, t.level)) {
            if level < previous_level {
                ctx.close_sections_from_level(level);
            } else if level == previous_level {
                ctx.end_open_section(previous);
            }
        }

        let title = Title {
            id: ctx.next_title_id(),
            level,
            text,
            span: Span::lines(position, last),
        };
        ctx.open_section(&title);
        ctx.cursor_mut().seek(last);
        Ok(Some(Node::Title(title)))
    }
}
