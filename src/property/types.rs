//! Typed property values: lengths, grid placement, track lists, alignment.
//!
//! Every type here has a `Default` that matches the layout solver's canonical
//! default, so an undeclared property and a malformed one read the same.

use std::fmt;

// ---------------------------------------------------------------------------
// Length
// ---------------------------------------------------------------------------

/// A single length: `auto`, pixels, or a percentage of the parent content box.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum Length {
    #[default]
    Auto,
    Px(f32),
    /// Percentage in the 0..=100 range.
    Percent(f32),
}

impl Length {
    /// Resolve against `basis`. `Auto` stays unresolved.
    pub fn resolve(self, basis: f32) -> Option<f32> {
        match self {
            Length::Auto => None,
            Length::Px(px) => Some(px),
            Length::Percent(pct) => Some(pct / 100.0 * basis),
        }
    }

    /// Whether this is [`Length::Auto`].
    pub fn is_auto(self) -> bool {
        matches!(self, Length::Auto)
    }
}

impl fmt::Display for Length {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Length::Auto => f.write_str("auto"),
            Length::Px(px) => write!(f, "{px}"),
            Length::Percent(pct) => write!(f, "{pct}%"),
        }
    }
}

// ---------------------------------------------------------------------------
// Grid placement
// ---------------------------------------------------------------------------

/// One side of a `grid-column` / `grid-row` declaration.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum GridLine {
    #[default]
    Auto,
    /// A 1-based line number. Negative numbers count from the end.
    Line(i32),
    /// Span a number of tracks.
    Span(u32),
}

impl fmt::Display for GridLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GridLine::Auto => f.write_str("auto"),
            GridLine::Line(n) => write!(f, "{n}"),
            GridLine::Span(n) => write!(f, "span {n}"),
        }
    }
}

/// A `start / end` placement on one grid axis.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GridSpan {
    pub start: GridLine,
    pub end: GridLine,
}

impl GridSpan {
    /// Automatic placement on both sides.
    pub const AUTO: GridSpan = GridSpan {
        start: GridLine::Auto,
        end: GridLine::Auto,
    };

    pub const fn new(start: GridLine, end: GridLine) -> Self {
        Self { start, end }
    }

    /// Whether both sides are automatic.
    pub fn is_auto(self) -> bool {
        self == Self::AUTO
    }
}

impl fmt::Display for GridSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} / {}", self.start, self.end)
    }
}

// ---------------------------------------------------------------------------
// Track lists
// ---------------------------------------------------------------------------

/// Sizing of one grid track.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum TrackSize {
    #[default]
    Auto,
    Px(f32),
    Percent(f32),
    Fr(f32),
}

// ---------------------------------------------------------------------------
// Template areas
// ---------------------------------------------------------------------------

/// Cell bounds of a named area, as 1-based grid lines (end exclusive).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AreaLines {
    pub column_start: i32,
    pub column_end: i32,
    pub row_start: i32,
    pub row_end: i32,
}

/// A parsed `grid-template-areas` value: rows of optional cell names.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TemplateAreas {
    pub rows: Vec<Vec<Option<String>>>,
}

impl TemplateAreas {
    /// Whether no areas are declared.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Number of columns (the widest row).
    pub fn column_count(&self) -> usize {
        self.rows.iter().map(Vec::len).max().unwrap_or(0)
    }

    /// The bounding lines of every cell named `name`, or `None` when the name
    /// is not declared.
    pub fn area(&self, name: &str) -> Option<AreaLines> {
        let mut bounds: Option<(usize, usize, usize, usize)> = None;
        for (row, cells) in self.rows.iter().enumerate() {
            for (column, cell) in cells.iter().enumerate() {
                if cell.as_deref() != Some(name) {
                    continue;
                }
                bounds = Some(match bounds {
                    None => (column, column, row, row),
                    Some((c0, c1, r0, r1)) => (c0.min(column), c1.max(column), r0.min(row), r1.max(row)),
                });
            }
        }
        bounds.map(|(c0, c1, r0, r1)| AreaLines {
            column_start: c0 as i32 + 1,
            column_end: c1 as i32 + 2,
            row_start: r0 as i32 + 1,
            row_end: r1 as i32 + 2,
        })
    }
}

// ---------------------------------------------------------------------------
// Keywords
// ---------------------------------------------------------------------------

/// How a node lays out its children.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Display {
    #[default]
    Flex,
    Grid,
    /// Children are positioned explicitly by their `x` / `y`.
    Block,
    /// Not a layout container.
    Content,
}

impl Display {
    /// Whether this mode lays out children.
    pub fn is_container(self) -> bool {
        !matches!(self, Display::Content)
    }
}

/// `justify-self` / `align-self`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SelfAlignment {
    #[default]
    Auto,
    Start,
    End,
    Center,
    Stretch,
    Baseline,
}

/// `justify-items` / `align-items`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ItemAlignment {
    /// Solver default (stretch for grid and flex).
    #[default]
    Normal,
    Start,
    End,
    Center,
    Stretch,
    Baseline,
}

/// `justify-content` / `align-content`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContentAlignment {
    /// Solver default.
    #[default]
    Normal,
    Start,
    End,
    Center,
    Stretch,
    SpaceBetween,
    SpaceAround,
    SpaceEvenly,
}

/// `flex-direction`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlexDirection {
    #[default]
    Column,
    ColumnReverse,
    Row,
    RowReverse,
}

/// `flex-wrap`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum FlexWrap {
    #[default]
    NoWrap,
    Wrap,
    WrapReverse,
}

/// `grid-auto-flow`.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AutoFlow {
    #[default]
    Row,
    Column,
    RowDense,
    ColumnDense,
}

/// `gap`: spacing between rows and between columns, in pixels.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Gap {
    pub row: f32,
    pub column: f32,
}

impl Gap {
    /// The same spacing on both axes.
    pub const fn uniform(value: f32) -> Self {
        Self {
            row: value,
            column: value,
        }
    }
}
