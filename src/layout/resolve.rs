//! Geometry primitive -> taffy Style conversion.
//!
//! Maps trellis' layout types ([`ContainerGeometry`], [`ChildGeometry`],
//! [`Length`], [`TrackSize`], alignment keywords) to taffy's style types.
//! Child sizes arrive already resolved to pixels; only `flex-basis` and
//! block positions are still lengths.

use taffy::prelude::*;

use crate::geometry::Edges;
use crate::property::{
    AutoFlow, ContentAlignment, Display as DisplayMode, FlexDirection as Direction,
    FlexWrap as Wrap, GridLine, GridSpan, ItemAlignment, Length, SelfAlignment, TemplateAreas,
    TrackSize,
};

use super::{ChildGeometry, ContainerGeometry, GridItemGeometry, Sizing};

/// Convert a [`Length`] to a [`LengthPercentageAuto`].
///
/// - `Px` -> length
/// - `Percent` -> percent (0..100 mapped to 0..1)
/// - `Auto` -> auto
pub fn resolve_length(length: Length) -> LengthPercentageAuto {
    match length {
        Length::Px(px) => LengthPercentageAuto::from_length(px),
        Length::Percent(pct) => LengthPercentageAuto::from_percent(pct / 100.0),
        Length::Auto => LengthPercentageAuto::AUTO,
    }
}

/// Convert a [`Length`] to a [`Dimension`] for sizing contexts.
pub fn resolve_dimension(length: Length) -> Dimension {
    match length {
        Length::Px(px) => Dimension::from_length(px),
        Length::Percent(pct) => Dimension::from_percent(pct / 100.0),
        Length::Auto => Dimension::AUTO,
    }
}

fn optional_dimension(px: Option<f32>) -> Dimension {
    px.map_or(Dimension::AUTO, Dimension::from_length)
}

/// Convert margins to a taffy [`Rect<LengthPercentageAuto>`].
pub fn resolve_margin(edges: Edges) -> taffy::geometry::Rect<LengthPercentageAuto> {
    taffy::geometry::Rect {
        top: LengthPercentageAuto::from_length(edges.top),
        right: LengthPercentageAuto::from_length(edges.right),
        bottom: LengthPercentageAuto::from_length(edges.bottom),
        left: LengthPercentageAuto::from_length(edges.left),
    }
}

/// Convert padding to a taffy [`Rect<LengthPercentage>`] (no auto).
pub fn resolve_padding(edges: Edges) -> taffy::geometry::Rect<LengthPercentage> {
    taffy::geometry::Rect {
        top: LengthPercentage::from_length(edges.top),
        right: LengthPercentage::from_length(edges.right),
        bottom: LengthPercentage::from_length(edges.bottom),
        left: LengthPercentage::from_length(edges.left),
    }
}

/// Convert one grid track.
pub fn resolve_track(track: TrackSize) -> TrackSizingFunction {
    match track {
        TrackSize::Auto => auto(),
        TrackSize::Px(px) => length(px),
        TrackSize::Percent(pct) => percent(pct / 100.0),
        TrackSize::Fr(fraction) => fr(fraction),
    }
}

fn resolve_template(tracks: &[TrackSize]) -> Vec<GridTemplateComponent<String>> {
    tracks
        .iter()
        .map(|&track| GridTemplateComponent::Single(resolve_track(track)))
        .collect()
}

/// `auto` and `normal` defer to the solver's default behaviour.
pub fn resolve_self_alignment(alignment: SelfAlignment) -> Option<AlignSelf> {
    match alignment {
        SelfAlignment::Auto => None,
        SelfAlignment::Start => Some(AlignSelf::Start),
        SelfAlignment::End => Some(AlignSelf::End),
        SelfAlignment::Center => Some(AlignSelf::Center),
        SelfAlignment::Stretch => Some(AlignSelf::Stretch),
        SelfAlignment::Baseline => Some(AlignSelf::Baseline),
    }
}

pub fn resolve_item_alignment(alignment: ItemAlignment) -> Option<AlignItems> {
    match alignment {
        ItemAlignment::Normal => None,
        ItemAlignment::Start => Some(AlignItems::Start),
        ItemAlignment::End => Some(AlignItems::End),
        ItemAlignment::Center => Some(AlignItems::Center),
        ItemAlignment::Stretch => Some(AlignItems::Stretch),
        ItemAlignment::Baseline => Some(AlignItems::Baseline),
    }
}

pub fn resolve_content_alignment(alignment: ContentAlignment) -> Option<AlignContent> {
    match alignment {
        ContentAlignment::Normal => None,
        ContentAlignment::Start => Some(AlignContent::Start),
        ContentAlignment::End => Some(AlignContent::End),
        ContentAlignment::Center => Some(AlignContent::Center),
        ContentAlignment::Stretch => Some(AlignContent::Stretch),
        ContentAlignment::SpaceBetween => Some(AlignContent::SpaceBetween),
        ContentAlignment::SpaceAround => Some(AlignContent::SpaceAround),
        ContentAlignment::SpaceEvenly => Some(AlignContent::SpaceEvenly),
    }
}

/// Largest grid line number or span passed to the solver. Larger values are
/// clamped so that a start line plus a span stays within taffy's `i16` line
/// space.
pub const MAX_GRID_LINE: i16 = 10_000;

/// Convert one side of a grid placement. Line 0 and span 0 are invalid and
/// mean `auto`; other values are clamped to [`MAX_GRID_LINE`].
pub fn resolve_grid_line(line: GridLine) -> GridPlacement {
    let limit = i32::from(MAX_GRID_LINE);
    match line {
        GridLine::Auto | GridLine::Line(0) | GridLine::Span(0) => GridPlacement::Auto,
        GridLine::Line(index) => GridPlacement::from_line_index(index.clamp(-limit, limit) as i16),
        GridLine::Span(span) => {
            GridPlacement::from_span(span.min(MAX_GRID_LINE as u32) as u16)
        }
    }
}

pub fn resolve_grid_span(span: GridSpan) -> Line<GridPlacement> {
    Line {
        start: resolve_grid_line(span.start),
        end: resolve_grid_line(span.end),
    }
}

/// Column and row placement of a grid child. A named area wins over the
/// column/row properties when the container declares it.
pub fn resolve_grid_placement(
    child: &GridItemGeometry,
    areas: &TemplateAreas,
) -> (Line<GridPlacement>, Line<GridPlacement>) {
    if !child.area.is_empty() {
        match areas.area(&child.area) {
            Some(lines) => {
                let column = GridSpan::new(
                    GridLine::Line(lines.column_start),
                    GridLine::Line(lines.column_end),
                );
                let row = GridSpan::new(GridLine::Line(lines.row_start), GridLine::Line(lines.row_end));
                return (resolve_grid_span(column), resolve_grid_span(row));
            }
            None => {
                tracing::debug!(area = %child.area, "unknown grid area, using column/row placement");
            }
        }
    }
    (resolve_grid_span(child.column), resolve_grid_span(child.row))
}

/// Convert a [`ContainerGeometry`] into the container's [`taffy::Style`].
///
/// `size` fixes the container's border box (the real pass); `None` lets the
/// solver size it from its children (measuring).
///
/// Mapping summary:
/// - `display: grid` -> `Display::Grid`, `block` -> `Display::Block`,
///   anything else -> `Display::Flex`
/// - `padding` -> `padding`, `gap` -> `gap` (row gap is the height axis)
/// - `grid-template-*`, `grid-auto-*`, `grid-auto-flow` -> grid fields
/// - `flex-direction`, `flex-wrap` -> flex fields
/// - `justify-*` / `align-*` -> alignment, `normal` left unset
pub fn container_style(container: &ContainerGeometry, size: Option<crate::geometry::Size>) -> Style {
    let mut style = Style {
        display: match container.display {
            DisplayMode::Grid => Display::Grid,
            DisplayMode::Block => Display::Block,
            DisplayMode::Flex | DisplayMode::Content => Display::Flex,
        },
        ..Style::default()
    };

    if let Some(size) = size {
        style.size = taffy::geometry::Size {
            width: Dimension::from_length(size.width),
            height: Dimension::from_length(size.height),
        };
    }

    style.padding = resolve_padding(container.padding);
    style.gap = taffy::geometry::Size {
        width: LengthPercentage::from_length(container.gap.column),
        height: LengthPercentage::from_length(container.gap.row),
    };

    // Flex
    style.flex_direction = match container.flex_direction {
        Direction::Row => FlexDirection::Row,
        Direction::RowReverse => FlexDirection::RowReverse,
        Direction::Column => FlexDirection::Column,
        Direction::ColumnReverse => FlexDirection::ColumnReverse,
    };
    style.flex_wrap = match container.flex_wrap {
        Wrap::NoWrap => FlexWrap::NoWrap,
        Wrap::Wrap => FlexWrap::Wrap,
        Wrap::WrapReverse => FlexWrap::WrapReverse,
    };

    // Grid
    style.grid_template_columns = resolve_template(&container.template_columns);
    style.grid_template_rows = resolve_template(&container.template_rows);
    style.grid_auto_columns = container.auto_columns.iter().map(|&t| resolve_track(t)).collect();
    style.grid_auto_rows = container.auto_rows.iter().map(|&t| resolve_track(t)).collect();
    style.grid_auto_flow = match container.auto_flow {
        AutoFlow::Row => GridAutoFlow::Row,
        AutoFlow::Column => GridAutoFlow::Column,
        AutoFlow::RowDense => GridAutoFlow::RowDense,
        AutoFlow::ColumnDense => GridAutoFlow::ColumnDense,
    };

    // Alignment
    style.justify_content = resolve_content_alignment(container.justify_content);
    style.align_content = resolve_content_alignment(container.align_content);
    style.justify_items = resolve_item_alignment(container.justify_items);
    style.align_items = resolve_item_alignment(container.align_items);

    style
}

fn apply_sizing(style: &mut Style, sizing: &Sizing) {
    style.size = taffy::geometry::Size {
        width: optional_dimension(sizing.width),
        height: optional_dimension(sizing.height),
    };
    style.min_size = taffy::geometry::Size {
        width: Dimension::from_length(sizing.min_width),
        height: Dimension::from_length(sizing.min_height),
    };
    style.max_size = taffy::geometry::Size {
        width: optional_dimension(sizing.max_width),
        height: optional_dimension(sizing.max_height),
    };
    style.margin = resolve_margin(sizing.margin);
}

/// Convert one child's primitive into its [`taffy::Style`]. Block children
/// are taken out of flow and placed at their `x` / `y`, measured from the
/// container's content box.
pub fn child_style(child: &ChildGeometry, container: &ContainerGeometry) -> Style {
    let mut style = Style::default();
    if let Some(sizing) = child.sizing() {
        apply_sizing(&mut style, sizing);
    }

    match child {
        ChildGeometry::Grid(grid) => {
            style.justify_self = resolve_self_alignment(grid.justify_self);
            style.align_self = resolve_self_alignment(grid.align_self);
            let (column, row) = resolve_grid_placement(grid, &container.template_areas);
            style.grid_column = column;
            style.grid_row = row;
        }
        ChildGeometry::Flex(flex) => {
            style.align_self = resolve_self_alignment(flex.align_self);
            style.flex_grow = flex.flex_grow;
            style.flex_shrink = flex.flex_shrink;
            style.flex_basis = resolve_dimension(flex.flex_basis);
        }
        ChildGeometry::Block(block) => {
            style.position = Position::Absolute;
            style.inset = taffy::geometry::Rect {
                top: LengthPercentageAuto::from_length(container.padding.top + block.y),
                left: LengthPercentageAuto::from_length(container.padding.left + block.x),
                right: LengthPercentageAuto::AUTO,
                bottom: LengthPercentageAuto::AUTO,
            };
        }
        ChildGeometry::Unplaced => {}
    }

    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layout::{BlockItemGeometry, FlexItemGeometry};
    use crate::property::AreaLines;

    fn grid_child(area: &str, column: GridSpan, row: GridSpan) -> GridItemGeometry {
        GridItemGeometry {
            order: 0,
            justify_self: SelfAlignment::Auto,
            align_self: SelfAlignment::Auto,
            column,
            row,
            area: area.to_owned(),
            sizing: Sizing::default(),
        }
    }

    fn areas(rows: &[&[&str]]) -> TemplateAreas {
        TemplateAreas {
            rows: rows
                .iter()
                .map(|row| row.iter().map(|c| Some(c.to_string())).collect())
                .collect(),
        }
    }

    // -----------------------------------------------------------------------
    // scalars
    // -----------------------------------------------------------------------

    #[test]
    fn resolve_px_and_percent() {
        assert_eq!(resolve_length(Length::Px(10.0)), LengthPercentageAuto::from_length(10.0));
        assert_eq!(resolve_length(Length::Percent(50.0)), LengthPercentageAuto::from_percent(0.5));
        assert_eq!(resolve_length(Length::Auto), LengthPercentageAuto::AUTO);
        assert_eq!(resolve_dimension(Length::Percent(25.0)), Dimension::from_percent(0.25));
    }

    #[test]
    fn resolve_margin_sides() {
        let margin = resolve_margin(Edges::new(10.0, 20.0, 4.0, 13.67));
        assert_eq!(margin.top, LengthPercentageAuto::from_length(10.0));
        assert_eq!(margin.right, LengthPercentageAuto::from_length(20.0));
        assert_eq!(margin.bottom, LengthPercentageAuto::from_length(4.0));
        assert_eq!(margin.left, LengthPercentageAuto::from_length(13.67));
    }

    #[test]
    fn zero_lines_are_auto() {
        assert_eq!(resolve_grid_line(GridLine::Line(0)), GridPlacement::Auto);
        assert_eq!(resolve_grid_line(GridLine::Span(0)), GridPlacement::Auto);
        assert_eq!(resolve_grid_line(GridLine::Line(3)), GridPlacement::from_line_index(3));
        assert_eq!(resolve_grid_line(GridLine::Span(4)), GridPlacement::from_span(4));
    }

    #[test]
    fn huge_lines_and_spans_are_clamped() {
        let limit = MAX_GRID_LINE;
        assert_eq!(resolve_grid_line(GridLine::Span(32_768)), GridPlacement::from_span(limit as u16));
        assert_eq!(resolve_grid_line(GridLine::Span(u32::MAX)), GridPlacement::from_span(limit as u16));
        assert_eq!(resolve_grid_line(GridLine::Line(i32::MAX)), GridPlacement::from_line_index(limit));
        assert_eq!(resolve_grid_line(GridLine::Line(i32::MIN)), GridPlacement::from_line_index(-limit));
    }

    #[test]
    fn huge_spans_solve_without_panicking() {
        use crate::geometry::{Rect, Size};
        use crate::layout::LayoutEngine;

        let container = ContainerGeometry {
            display: crate::property::Display::Grid,
            ..ContainerGeometry::default()
        };
        let children = [
            ChildGeometry::Grid(grid_child(
                "",
                GridSpan::new(GridLine::Auto, GridLine::Span(32_768)),
                GridSpan::AUTO,
            )),
            ChildGeometry::Grid(grid_child(
                "",
                GridSpan::new(GridLine::Line(i32::MAX), GridLine::Span(u32::MAX)),
                GridSpan::AUTO,
            )),
        ];
        let size = Size::new(222.0, 333.0);
        let solved = LayoutEngine::new().solve(&container, &children, Some(size), size, |_, _| Size::ZERO);
        assert_eq!(solved.rects.len(), 2);
        assert!(solved.rects.iter().all(|rect: &Rect| rect.x.is_finite() && rect.y.is_finite()));
    }

    #[test]
    fn alignment_normal_is_unset() {
        assert_eq!(resolve_self_alignment(SelfAlignment::Auto), None);
        assert_eq!(resolve_self_alignment(SelfAlignment::Center), Some(AlignSelf::Center));
        assert_eq!(resolve_item_alignment(ItemAlignment::Normal), None);
        assert_eq!(
            resolve_content_alignment(ContentAlignment::SpaceEvenly),
            Some(AlignContent::SpaceEvenly)
        );
    }

    // -----------------------------------------------------------------------
    // grid placement
    // -----------------------------------------------------------------------

    #[test]
    fn area_overrides_column_and_row() {
        let template = areas(&[&["xyz", "abc"]]);
        assert_eq!(
            template.area("abc"),
            Some(AreaLines { column_start: 2, column_end: 3, row_start: 1, row_end: 2 })
        );
        let child = grid_child("abc", GridSpan::AUTO, GridSpan::AUTO);
        let (column, row) = resolve_grid_placement(&child, &template);
        assert_eq!(column.start, GridPlacement::from_line_index(2));
        assert_eq!(column.end, GridPlacement::from_line_index(3));
        assert_eq!(row.start, GridPlacement::from_line_index(1));
        assert_eq!(row.end, GridPlacement::from_line_index(2));
    }

    #[test]
    fn unknown_area_falls_back_to_lines() {
        let template = areas(&[&["just-here"]]);
        let column = GridSpan::new(GridLine::Line(1), GridLine::Span(3));
        let child = grid_child("abc", column, GridSpan::AUTO);
        let (column, row) = resolve_grid_placement(&child, &template);
        assert_eq!(column.start, GridPlacement::from_line_index(1));
        assert_eq!(column.end, GridPlacement::from_span(3));
        assert_eq!(row.start, GridPlacement::Auto);
    }

    // -----------------------------------------------------------------------
    // container_style / child_style
    // -----------------------------------------------------------------------

    #[test]
    fn default_container_is_flex_column() {
        let style = container_style(&ContainerGeometry::default(), None);
        assert_eq!(style.display, Display::Flex);
        assert_eq!(style.flex_direction, FlexDirection::Column);
        assert_eq!(style.size.width, Dimension::AUTO);
        assert_eq!(style.justify_content, None);
    }

    #[test]
    fn grid_container_tracks() {
        let container = ContainerGeometry {
            display: DisplayMode::Grid,
            template_columns: vec![TrackSize::Fr(1.0), TrackSize::Px(30.0)],
            auto_rows: vec![TrackSize::Auto],
            padding: Edges::all(2.0),
            ..ContainerGeometry::default()
        };
        let style = container_style(&container, Some(crate::geometry::Size::new(100.0, 50.0)));
        assert_eq!(style.display, Display::Grid);
        assert_eq!(style.grid_template_columns.len(), 2);
        assert_eq!(style.grid_auto_rows.len(), 1);
        assert_eq!(style.size.width, Dimension::from_length(100.0));
        assert_eq!(style.padding.left, LengthPercentage::from_length(2.0));
    }

    #[test]
    fn block_child_is_absolute() {
        let child = ChildGeometry::Block(BlockItemGeometry {
            x: 5.0,
            y: 7.0,
            sizing: Sizing { width: Some(20.0), ..Sizing::default() },
        });
        let style = child_style(&child, &ContainerGeometry::default());
        assert_eq!(style.position, Position::Absolute);
        assert_eq!(style.inset.left, LengthPercentageAuto::from_length(5.0));
        assert_eq!(style.inset.top, LengthPercentageAuto::from_length(7.0));
        assert_eq!(style.size.width, Dimension::from_length(20.0));
        assert_eq!(style.size.height, Dimension::AUTO);
    }

    #[test]
    fn flex_child_factors() {
        let child = ChildGeometry::Flex(FlexItemGeometry {
            order: 0,
            align_self: SelfAlignment::Stretch,
            flex_grow: 2.0,
            flex_shrink: 0.0,
            flex_basis: Length::Px(12.0),
            sizing: Sizing::default(),
        });
        let style = child_style(&child, &ContainerGeometry::default());
        assert_eq!(style.flex_grow, 2.0);
        assert_eq!(style.flex_shrink, 0.0);
        assert_eq!(style.flex_basis, Dimension::from_length(12.0));
        assert_eq!(style.align_self, Some(AlignSelf::Stretch));
    }
}
