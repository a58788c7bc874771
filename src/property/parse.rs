//! Property parsing: value strings → typed property values.
//!
//! Every parser is strict and returns a [`ParseError`]; the permissive
//! fallback to defaults happens one layer up, in [`super::Property`].

use crate::geometry::Edges;

use super::tokenizer::{tokenize, Token};
use super::types::*;

/// Errors from property value parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ParseError {
    #[error("unexpected character at offset {offset} in {input:?}")]
    UnexpectedCharacter { input: String, offset: usize },
    #[error("empty value for {property}")]
    Empty { property: &'static str },
    #[error("unknown keyword for {property}: {keyword}")]
    UnknownKeyword {
        property: &'static str,
        keyword: String,
    },
    #[error("invalid value for {property}: {message}")]
    InvalidValue {
        property: &'static str,
        message: String,
    },
}

fn invalid(property: &'static str, message: impl Into<String>) -> ParseError {
    ParseError::InvalidValue {
        property,
        message: message.into(),
    }
}

// ---------------------------------------------------------------------------
// Token cursor
// ---------------------------------------------------------------------------

/// Forward-only cursor over the tokens of one value.
struct Cursor<'a> {
    tokens: Vec<(Token, &'a str)>,
    pos: usize,
    property: &'static str,
}

impl<'a> Cursor<'a> {
    fn new(input: &'a str, property: &'static str) -> Result<Self, ParseError> {
        let tokens = tokenize(input)?;
        if tokens.is_empty() {
            return Err(ParseError::Empty { property });
        }
        Ok(Self {
            tokens,
            pos: 0,
            property,
        })
    }

    fn peek(&self) -> Option<(Token, &'a str)> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<(Token, &'a str)> {
        let token = self.peek();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn is_done(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn expect(&mut self, expected: Token) -> Result<&'a str, ParseError> {
        match self.next() {
            Some((token, text)) if token == expected => Ok(text),
            Some((_, text)) => Err(invalid(
                self.property,
                format!("expected {expected:?}, got {text:?}"),
            )),
            None => Err(invalid(
                self.property,
                format!("expected {expected:?}, got end of value"),
            )),
        }
    }

    fn number(&mut self) -> Result<f32, ParseError> {
        let text = self.expect(Token::Number)?;
        parse_f32(text, self.property)
    }

    fn finish(&self) -> Result<(), ParseError> {
        match self.peek() {
            None => Ok(()),
            Some((_, text)) => Err(invalid(
                self.property,
                format!("unexpected trailing {text:?}"),
            )),
        }
    }
}

fn parse_f32(text: &str, property: &'static str) -> Result<f32, ParseError> {
    text.parse()
        .map_err(|_| invalid(property, format!("not a number: {text:?}")))
}

/// Split a dimension token into its numeric part and unit.
fn split_dimension<'a>(text: &'a str, property: &'static str) -> Result<(f32, &'a str), ParseError> {
    let unit_start = text
        .find(|c: char| c == '%' || c.is_ascii_alphabetic())
        .ok_or_else(|| invalid(property, format!("missing unit in {text:?}")))?;
    let (number, unit) = text.split_at(unit_start);
    Ok((parse_f32(number, property)?, unit))
}

/// Match a single identifier against a keyword table.
fn keyword<T: Copy>(
    input: &str,
    property: &'static str,
    table: &[(&str, T)],
) -> Result<T, ParseError> {
    let mut cursor = Cursor::new(input, property)?;
    let name = cursor.expect(Token::Ident)?;
    cursor.finish()?;
    table
        .iter()
        .find(|(kw, _)| kw.eq_ignore_ascii_case(name))
        .map(|(_, value)| *value)
        .ok_or_else(|| ParseError::UnknownKeyword {
            property,
            keyword: name.to_owned(),
        })
}

// ---------------------------------------------------------------------------
// Lengths and edges
// ---------------------------------------------------------------------------

fn length_token(
    token: Token,
    text: &str,
    property: &'static str,
) -> Result<Length, ParseError> {
    match token {
        Token::Ident if text.eq_ignore_ascii_case("auto") => Ok(Length::Auto),
        Token::Number => Ok(Length::Px(parse_f32(text, property)?)),
        Token::Dimension => match split_dimension(text, property)? {
            (value, "px") => Ok(Length::Px(value)),
            (value, "%") => Ok(Length::Percent(value)),
            (_, unit) => Err(invalid(property, format!("unit {unit:?} not allowed here"))),
        },
        _ => Err(invalid(
            property,
            format!("expected number, percentage or 'auto', got {text:?}"),
        )),
    }
}

/// Parse a single length: `auto`, `12`, `12px` or `50%`.
pub fn parse_length(input: &str) -> Result<Length, ParseError> {
    let mut cursor = Cursor::new(input, "length")?;
    let (token, text) = cursor.next().ok_or(ParseError::Empty { property: "length" })?;
    let length = length_token(token, text, "length")?;
    cursor.finish()?;
    Ok(length)
}

/// Parse 1-4 pixel values into [`Edges`] (CSS shorthand).
///
/// - 1 value: all sides
/// - 2 values: vertical, horizontal
/// - 3 values: top, horizontal, bottom
/// - 4 values: top, right, bottom, left
pub fn parse_edges(input: &str) -> Result<Edges, ParseError> {
    let mut cursor = Cursor::new(input, "edges")?;
    let mut values = Vec::with_capacity(4);
    while let Some((token, text)) = cursor.next() {
        match length_token(token, text, "edges")? {
            Length::Px(px) => values.push(px),
            other => {
                return Err(invalid("edges", format!("expected pixels, got {other}")));
            }
        }
    }
    match values.as_slice() {
        [all] => Ok(Edges::all(*all)),
        [vertical, horizontal] => Ok(Edges::symmetric(*vertical, *horizontal)),
        [top, horizontal, bottom] => Ok(Edges::new(*top, *horizontal, *bottom, *horizontal)),
        [top, right, bottom, left] => Ok(Edges::new(*top, *right, *bottom, *left)),
        other => Err(invalid("edges", format!("expected 1-4 values, got {}", other.len()))),
    }
}

/// Parse a `gap`: one value for both axes, or `row column`.
pub fn parse_gap(input: &str) -> Result<Gap, ParseError> {
    let mut cursor = Cursor::new(input, "gap")?;
    let row = cursor.number()?;
    if cursor.is_done() {
        return Ok(Gap::uniform(row));
    }
    let column = cursor.number()?;
    cursor.finish()?;
    Ok(Gap { row, column })
}

// ---------------------------------------------------------------------------
// Grid placement
// ---------------------------------------------------------------------------

fn grid_line(cursor: &mut Cursor<'_>) -> Result<GridLine, ParseError> {
    match cursor.next() {
        Some((Token::Ident, text)) if text.eq_ignore_ascii_case("auto") => Ok(GridLine::Auto),
        Some((Token::Ident, text)) if text.eq_ignore_ascii_case("span") => {
            let count = cursor.number()?;
            if count < 1.0 || count.fract() != 0.0 {
                return Err(invalid(cursor.property, format!("invalid span {count}")));
            }
            Ok(GridLine::Span(count as u32))
        }
        Some((Token::Number, text)) => {
            let line = parse_f32(text, cursor.property)?;
            if line == 0.0 || line.fract() != 0.0 {
                return Err(invalid(cursor.property, format!("invalid line {line}")));
            }
            Ok(GridLine::Line(line as i32))
        }
        Some((_, text)) => Err(invalid(
            cursor.property,
            format!("expected line, 'span N' or 'auto', got {text:?}"),
        )),
        None => Err(invalid(cursor.property, "expected line after '/'")),
    }
}

/// Parse `grid-column` / `grid-row`: `start` or `start / end`, where each side
/// is `auto`, a line number, or `span N`.
pub fn parse_grid_span(input: &str) -> Result<GridSpan, ParseError> {
    let mut cursor = Cursor::new(input, "grid-line")?;
    let start = grid_line(&mut cursor)?;
    let end = match cursor.peek() {
        Some((Token::Slash, _)) => {
            cursor.next();
            grid_line(&mut cursor)?
        }
        _ => GridLine::Auto,
    };
    cursor.finish()?;
    Ok(GridSpan { start, end })
}

// ---------------------------------------------------------------------------
// Track lists and template areas
// ---------------------------------------------------------------------------

fn track_size(token: Token, text: &str) -> Result<TrackSize, ParseError> {
    const PROPERTY: &str = "track-list";
    match token {
        Token::Ident if text.eq_ignore_ascii_case("auto") => Ok(TrackSize::Auto),
        Token::Number => Ok(TrackSize::Px(parse_f32(text, PROPERTY)?)),
        Token::Dimension => match split_dimension(text, PROPERTY)? {
            (value, "fr") => Ok(TrackSize::Fr(value)),
            (value, "%") => Ok(TrackSize::Percent(value)),
            (value, _) => Ok(TrackSize::Px(value)),
        },
        _ => Err(invalid(PROPERTY, format!("unexpected {text:?}"))),
    }
}

fn repeat(cursor: &mut Cursor<'_>, out: &mut Vec<TrackSize>) -> Result<(), ParseError> {
    cursor.expect(Token::ParenOpen)?;
    let count = cursor.number()?;
    if count < 1.0 || count.fract() != 0.0 {
        return Err(invalid(cursor.property, format!("invalid repeat count {count}")));
    }
    cursor.expect(Token::Comma)?;
    let mut pattern = Vec::new();
    loop {
        match cursor.next() {
            Some((Token::ParenClose, _)) => break,
            Some((token, text)) => pattern.push(track_size(token, text)?),
            None => return Err(invalid(cursor.property, "unterminated repeat()")),
        }
    }
    if pattern.is_empty() {
        return Err(invalid(cursor.property, "empty repeat()"));
    }
    for _ in 0..count as usize {
        out.extend_from_slice(&pattern);
    }
    Ok(())
}

/// Parse a `grid-template-columns` / `grid-template-rows` track list.
/// `repeat(count, tracks...)` is expanded eagerly.
pub fn parse_track_list(input: &str) -> Result<Vec<TrackSize>, ParseError> {
    let mut cursor = Cursor::new(input, "track-list")?;
    let mut tracks = Vec::new();
    while let Some((token, text)) = cursor.next() {
        if token == Token::Ident && text.eq_ignore_ascii_case("repeat") {
            repeat(&mut cursor, &mut tracks)?;
        } else {
            tracks.push(track_size(token, text)?);
        }
    }
    Ok(tracks)
}

fn area_cell(name: &str) -> Option<String> {
    (name != ".").then(|| name.to_owned())
}

/// Parse `grid-template-areas`: quoted rows (`"a a" "b c"`), or a single
/// unquoted row of names (`xyz abc`). `.` marks an empty cell.
pub fn parse_template_areas(input: &str) -> Result<TemplateAreas, ParseError> {
    const PROPERTY: &str = "grid-template-areas";
    let tokens = tokenize(input)?;
    if tokens.is_empty() {
        return Err(ParseError::Empty { property: PROPERTY });
    }

    let quoted = |token: Token| matches!(token, Token::StringLiteral | Token::StringLiteralSingle);
    let rows: Vec<Vec<Option<String>>> = if tokens.iter().all(|(token, _)| quoted(*token)) {
        tokens
            .iter()
            .map(|(_, text)| {
                text[1..text.len() - 1]
                    .split_whitespace()
                    .map(area_cell)
                    .collect()
            })
            .collect()
    } else if tokens
        .iter()
        .all(|(token, _)| matches!(token, Token::Ident | Token::Dot))
    {
        vec![tokens.iter().map(|(_, text)| area_cell(text)).collect()]
    } else {
        return Err(invalid(PROPERTY, "mix of quoted and unquoted rows"));
    };

    if rows.iter().any(Vec::is_empty) {
        return Err(invalid(PROPERTY, "empty row"));
    }
    Ok(TemplateAreas { rows })
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// Parse `display`.
pub fn parse_display(input: &str) -> Result<Display, ParseError> {
    keyword(
        input,
        "display",
        &[
            ("flex", Display::Flex),
            ("grid", Display::Grid),
            ("block", Display::Block),
            ("content", Display::Content),
        ],
    )
}

/// Parse `justify-self` / `align-self`.
pub fn parse_self_alignment(input: &str) -> Result<SelfAlignment, ParseError> {
    keyword(
        input,
        "self-alignment",
        &[
            ("auto", SelfAlignment::Auto),
            ("start", SelfAlignment::Start),
            ("flex-start", SelfAlignment::Start),
            ("end", SelfAlignment::End),
            ("flex-end", SelfAlignment::End),
            ("center", SelfAlignment::Center),
            ("centre", SelfAlignment::Center),
            ("stretch", SelfAlignment::Stretch),
            ("baseline", SelfAlignment::Baseline),
        ],
    )
}

/// Parse `justify-items` / `align-items`.
pub fn parse_item_alignment(input: &str) -> Result<ItemAlignment, ParseError> {
    keyword(
        input,
        "item-alignment",
        &[
            ("normal", ItemAlignment::Normal),
            ("auto", ItemAlignment::Normal),
            ("start", ItemAlignment::Start),
            ("flex-start", ItemAlignment::Start),
            ("end", ItemAlignment::End),
            ("flex-end", ItemAlignment::End),
            ("center", ItemAlignment::Center),
            ("centre", ItemAlignment::Center),
            ("stretch", ItemAlignment::Stretch),
            ("baseline", ItemAlignment::Baseline),
        ],
    )
}

/// Parse `justify-content` / `align-content`.
pub fn parse_content_alignment(input: &str) -> Result<ContentAlignment, ParseError> {
    keyword(
        input,
        "content-alignment",
        &[
            ("normal", ContentAlignment::Normal),
            ("start", ContentAlignment::Start),
            ("flex-start", ContentAlignment::Start),
            ("end", ContentAlignment::End),
            ("flex-end", ContentAlignment::End),
            ("center", ContentAlignment::Center),
            ("centre", ContentAlignment::Center),
            ("stretch", ContentAlignment::Stretch),
            ("space-between", ContentAlignment::SpaceBetween),
            ("space-around", ContentAlignment::SpaceAround),
            ("space-evenly", ContentAlignment::SpaceEvenly),
        ],
    )
}

/// Parse `flex-direction`.
pub fn parse_flex_direction(input: &str) -> Result<FlexDirection, ParseError> {
    keyword(
        input,
        "flex-direction",
        &[
            ("column", FlexDirection::Column),
            ("column-reverse", FlexDirection::ColumnReverse),
            ("row", FlexDirection::Row),
            ("row-reverse", FlexDirection::RowReverse),
        ],
    )
}

/// Parse `flex-wrap`.
pub fn parse_flex_wrap(input: &str) -> Result<FlexWrap, ParseError> {
    keyword(
        input,
        "flex-wrap",
        &[
            ("nowrap", FlexWrap::NoWrap),
            ("no-wrap", FlexWrap::NoWrap),
            ("wrap", FlexWrap::Wrap),
            ("wrap-reverse", FlexWrap::WrapReverse),
        ],
    )
}

/// Parse `grid-auto-flow`: `row`, `column`, optionally followed by `dense`.
pub fn parse_auto_flow(input: &str) -> Result<AutoFlow, ParseError> {
    let mut cursor = Cursor::new(input, "grid-auto-flow")?;
    let axis = cursor.expect(Token::Ident)?;
    let dense = match cursor.next() {
        Some((Token::Ident, text)) if text.eq_ignore_ascii_case("dense") => true,
        Some((_, text)) => {
            return Err(ParseError::UnknownKeyword {
                property: "grid-auto-flow",
                keyword: text.to_owned(),
            })
        }
        None => false,
    };
    cursor.finish()?;
    match (axis.to_ascii_lowercase().as_str(), dense) {
        ("row", false) => Ok(AutoFlow::Row),
        ("row", true) => Ok(AutoFlow::RowDense),
        ("column", false) => Ok(AutoFlow::Column),
        ("column", true) => Ok(AutoFlow::ColumnDense),
        ("dense" | "row-dense", false) => Ok(AutoFlow::RowDense),
        ("column-dense", false) => Ok(AutoFlow::ColumnDense),
        _ => Err(ParseError::UnknownKeyword {
            property: "grid-auto-flow",
            keyword: axis.to_owned(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    // ── Lengths ──────────────────────────────────────────────────────

    #[test]
    fn lengths() {
        assert_eq!(parse_length("auto").unwrap(), Length::Auto);
        assert_eq!(parse_length("112").unwrap(), Length::Px(112.0));
        assert_eq!(parse_length("12px").unwrap(), Length::Px(12.0));
        assert_eq!(parse_length("50%").unwrap(), Length::Percent(50.0));
        assert!(parse_length("1fr").is_err());
        assert!(parse_length("wide").is_err());
        assert_eq!(
            parse_length("  ").unwrap_err(),
            ParseError::Empty { property: "length" }
        );
    }

    // ── Edges ────────────────────────────────────────────────────────

    #[test]
    fn edges_four_values() {
        assert_eq!(
            parse_edges("10 20 4 13.67").unwrap(),
            Edges::new(10.0, 20.0, 4.0, 13.67)
        );
    }

    #[test]
    fn edges_shorthands() {
        assert_eq!(parse_edges("45").unwrap(), Edges::all(45.0));
        assert_eq!(parse_edges("1 2").unwrap(), Edges::symmetric(1.0, 2.0));
        assert_eq!(parse_edges("1 2 3").unwrap(), Edges::new(1.0, 2.0, 3.0, 2.0));
        assert_eq!(parse_edges("5px").unwrap(), Edges::all(5.0));
    }

    #[test]
    fn edges_rejects_bad_counts_and_units() {
        assert!(parse_edges("1 2 3 4 5").is_err());
        assert!(parse_edges("10%").is_err());
        assert!(parse_edges("auto").is_err());
    }

    #[test]
    fn gaps() {
        assert_eq!(parse_gap("8").unwrap(), Gap::uniform(8.0));
        assert_eq!(parse_gap("4 6").unwrap(), Gap { row: 4.0, column: 6.0 });
        assert!(parse_gap("4 6 8").is_err());
    }

    // ── Grid placement ───────────────────────────────────────────────

    #[test]
    fn grid_span_line_and_span() {
        assert_eq!(
            parse_grid_span("3 / span 4").unwrap(),
            GridSpan::new(GridLine::Line(3), GridLine::Span(4))
        );
        assert_eq!(
            parse_grid_span("14 / span 7").unwrap(),
            GridSpan::new(GridLine::Line(14), GridLine::Span(7))
        );
    }

    #[test]
    fn grid_span_two_lines() {
        assert_eq!(
            parse_grid_span("2 / 3").unwrap(),
            GridSpan::new(GridLine::Line(2), GridLine::Line(3))
        );
        assert_eq!(
            parse_grid_span("-1 / auto").unwrap(),
            GridSpan::new(GridLine::Line(-1), GridLine::Auto)
        );
    }

    #[test]
    fn grid_span_single_side() {
        assert_eq!(
            parse_grid_span("2").unwrap(),
            GridSpan::new(GridLine::Line(2), GridLine::Auto)
        );
        assert_eq!(
            parse_grid_span("span 2").unwrap(),
            GridSpan::new(GridLine::Span(2), GridLine::Auto)
        );
        assert_eq!(parse_grid_span("auto").unwrap(), GridSpan::AUTO);
    }

    #[test]
    fn grid_span_errors() {
        assert!(parse_grid_span("0").is_err());
        assert!(parse_grid_span("span 0").is_err());
        assert!(parse_grid_span("1 /").is_err());
        assert!(parse_grid_span("1 / 2 / 3").is_err());
        assert!(parse_grid_span("header").is_err());
    }

    // ── Track lists ──────────────────────────────────────────────────

    #[test]
    fn track_lists() {
        assert_eq!(
            parse_track_list("auto 1fr 100 25% 12px").unwrap(),
            vec![
                TrackSize::Auto,
                TrackSize::Fr(1.0),
                TrackSize::Px(100.0),
                TrackSize::Percent(25.0),
                TrackSize::Px(12.0),
            ]
        );
    }

    #[test]
    fn track_list_repeat_expands() {
        assert_eq!(
            parse_track_list("50 repeat(2, 1fr auto)").unwrap(),
            vec![
                TrackSize::Px(50.0),
                TrackSize::Fr(1.0),
                TrackSize::Auto,
                TrackSize::Fr(1.0),
                TrackSize::Auto,
            ]
        );
        assert!(parse_track_list("repeat(2 1fr)").is_err());
        assert!(parse_track_list("repeat(0, 1fr)").is_err());
        assert!(parse_track_list("repeat(2, 1fr").is_err());
    }

    // ── Template areas ───────────────────────────────────────────────

    #[test]
    fn template_areas_quoted_rows() {
        let areas = parse_template_areas(r#""head head" "side ." "#).unwrap();
        assert_eq!(
            areas.rows,
            vec![
                vec![Some("head".to_string()), Some("head".to_string())],
                vec![Some("side".to_string()), None],
            ]
        );
    }

    #[test]
    fn template_areas_single_unquoted_row() {
        let areas = parse_template_areas("xyz abc").unwrap();
        assert_eq!(
            areas.rows,
            vec![vec![Some("xyz".to_string()), Some("abc".to_string())]]
        );
        assert_eq!(areas.area("abc").map(|a| a.column_start), Some(2));

        let single = parse_template_areas("just-here").unwrap();
        assert!(single.area("just-here").is_some());
    }

    #[test]
    fn template_areas_rejects_mixed_rows() {
        assert!(parse_template_areas(r#""a b" c"#).is_err());
        assert!(parse_template_areas(r#""""#).is_err());
    }

    // ── Keywords ─────────────────────────────────────────────────────

    #[test]
    fn self_alignment_keywords() {
        assert_eq!(parse_self_alignment("auto").unwrap(), SelfAlignment::Auto);
        assert_eq!(parse_self_alignment("start").unwrap(), SelfAlignment::Start);
        assert_eq!(parse_self_alignment("end").unwrap(), SelfAlignment::End);
        assert_eq!(parse_self_alignment("centre").unwrap(), SelfAlignment::Center);
        assert_eq!(parse_self_alignment("center").unwrap(), SelfAlignment::Center);
        assert_eq!(parse_self_alignment("stretch").unwrap(), SelfAlignment::Stretch);
        assert_eq!(
            parse_self_alignment("sideways").unwrap_err(),
            ParseError::UnknownKeyword {
                property: "self-alignment",
                keyword: "sideways".into(),
            }
        );
    }

    #[test]
    fn container_keywords() {
        assert_eq!(parse_display("grid").unwrap(), Display::Grid);
        assert_eq!(parse_display("Block").unwrap(), Display::Block);
        assert_eq!(parse_flex_direction("row-reverse").unwrap(), FlexDirection::RowReverse);
        assert_eq!(parse_flex_wrap("wrap").unwrap(), FlexWrap::Wrap);
        assert_eq!(
            parse_content_alignment("space-evenly").unwrap(),
            ContentAlignment::SpaceEvenly
        );
        assert_eq!(parse_item_alignment("flex-end").unwrap(), ItemAlignment::End);
        assert!(parse_display("grid flex").is_err());
    }

    #[test]
    fn auto_flow_keywords() {
        assert_eq!(parse_auto_flow("row").unwrap(), AutoFlow::Row);
        assert_eq!(parse_auto_flow("column dense").unwrap(), AutoFlow::ColumnDense);
        assert_eq!(parse_auto_flow("dense").unwrap(), AutoFlow::RowDense);
        assert!(parse_auto_flow("diagonal").is_err());
    }
}
