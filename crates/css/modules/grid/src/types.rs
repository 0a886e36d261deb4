//! Grid container and item type definitions.
//!
//! Spec: CSS Grid Layout Module Level 2
//! <https://www.w3.org/TR/css-grid-2/>

use crate::error::GridError;

/// Axis whose tracks are being sized.
///
/// `Column` sizes the column tracks (the inline axis of the grid container in
/// horizontal writing modes), `Row` sizes the row tracks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GridAxis {
    /// Row tracks
    Row,
    /// Column tracks
    Column,
}

impl GridAxis {
    /// The perpendicular axis.
    pub const fn orthogonal(self) -> Self {
        match self {
            Self::Row => Self::Column,
            Self::Column => Self::Row,
        }
    }
}

/// Represents a track size in the grid.
///
/// Percentages are stored as fractions (`0.5` is `50%`).
///
/// Spec: §7.2.1 Track Sizing Functions
/// <https://www.w3.org/TR/css-grid-2/#track-sizing>
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TrackBreadth {
    /// Length in pixels
    Length(f32),
    /// Percentage of available space
    Percentage(f32),
    /// Flex factor (fr units)
    Flex(f32),
    /// Minimum content size
    MinContent,
    /// Maximum content size
    MaxContent,
    /// Automatic sizing
    Auto,
}

impl TrackBreadth {
    /// Check if this breadth is intrinsic (depends on content).
    pub const fn is_intrinsic(&self) -> bool {
        matches!(self, Self::MinContent | Self::MaxContent | Self::Auto)
    }

    /// Check if this breadth is flexible (uses fr units).
    pub const fn is_flexible(&self) -> bool {
        matches!(self, Self::Flex(_))
    }

    /// Check if this breadth is a length or percentage.
    pub const fn is_fixed(&self) -> bool {
        matches!(self, Self::Length(_) | Self::Percentage(_))
    }

    /// Check if this breadth is a percentage.
    pub const fn has_percentage(&self) -> bool {
        matches!(self, Self::Percentage(_))
    }

    /// Get the flex factor, or 0.0 if not flexible.
    pub const fn flex_factor(&self) -> f32 {
        match self {
            Self::Flex(factor) => *factor,
            _ => 0.0,
        }
    }

    /// Resolve a length or percentage against `available`.
    ///
    /// Returns `None` for content keywords and flex factors.
    pub fn fixed_value(&self, available: f32) -> Option<f32> {
        match self {
            Self::Length(len) => Some(*len),
            Self::Percentage(pct) => Some(pct * available),
            Self::Flex(_) | Self::MinContent | Self::MaxContent | Self::Auto => None,
        }
    }
}

/// Track sizing function.
///
/// Spec: §7.2.1 Track Sizing Functions
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridTrackSize {
    /// Fixed size
    Breadth(TrackBreadth),
    /// minmax(min, max)
    MinMax(TrackBreadth, TrackBreadth),
    /// fit-content(limit)
    FitContent(TrackBreadth),
}

impl Default for GridTrackSize {
    fn default() -> Self {
        Self::Breadth(TrackBreadth::Auto)
    }
}

impl GridTrackSize {
    /// A fixed length track.
    pub const fn length(len: f32) -> Self {
        Self::Breadth(TrackBreadth::Length(len))
    }

    /// A flexible track.
    pub const fn flex(factor: f32) -> Self {
        Self::Breadth(TrackBreadth::Flex(factor))
    }

    /// Get the minimum breadth for this track size.
    ///
    /// `fit-content()` has an automatic minimum.
    pub const fn min_breadth(&self) -> &TrackBreadth {
        match self {
            Self::Breadth(breadth) | Self::MinMax(breadth, _) => breadth,
            Self::FitContent(_) => &TrackBreadth::Auto,
        }
    }

    /// Get the maximum breadth for this track size.
    ///
    /// `fit-content()` has an automatic maximum; its argument is only a cap.
    pub const fn max_breadth(&self) -> &TrackBreadth {
        match self {
            Self::Breadth(breadth) | Self::MinMax(_, breadth) => breadth,
            Self::FitContent(_) => &TrackBreadth::Auto,
        }
    }

    /// The `fit-content()` argument, if this is a fit-content track.
    pub const fn fit_content_breadth(&self) -> Option<&TrackBreadth> {
        match self {
            Self::FitContent(limit) => Some(limit),
            Self::Breadth(_) | Self::MinMax(..) => None,
        }
    }

    /// Check if this is a `fit-content()` track.
    pub const fn is_fit_content(&self) -> bool {
        matches!(self, Self::FitContent(_))
    }

    /// Either sizing function depends on content.
    pub const fn is_content_sized(&self) -> bool {
        self.min_breadth().is_intrinsic() || self.max_breadth().is_intrinsic()
    }

    pub const fn has_intrinsic_min(&self) -> bool {
        self.min_breadth().is_intrinsic()
    }

    pub const fn has_min_or_max_content_min(&self) -> bool {
        matches!(
            self.min_breadth(),
            TrackBreadth::MinContent | TrackBreadth::MaxContent
        )
    }

    pub const fn has_min_content_min(&self) -> bool {
        matches!(self.min_breadth(), TrackBreadth::MinContent)
    }

    pub const fn has_max_content_min(&self) -> bool {
        matches!(self.min_breadth(), TrackBreadth::MaxContent)
    }

    pub const fn has_auto_min(&self) -> bool {
        matches!(self.min_breadth(), TrackBreadth::Auto)
    }

    pub const fn has_intrinsic_max(&self) -> bool {
        self.max_breadth().is_intrinsic()
    }

    pub const fn has_min_content_max(&self) -> bool {
        matches!(self.max_breadth(), TrackBreadth::MinContent)
    }

    pub const fn has_auto_max(&self) -> bool {
        matches!(self.max_breadth(), TrackBreadth::Auto)
    }

    pub const fn has_max_content_or_auto_max(&self) -> bool {
        matches!(
            self.max_breadth(),
            TrackBreadth::MaxContent | TrackBreadth::Auto
        )
    }

    /// The max sizing function is a length or percentage.
    pub const fn has_fixed_max(&self) -> bool {
        self.max_breadth().is_fixed()
    }

    pub const fn has_auto_or_min_content_min_and_intrinsic_max(&self) -> bool {
        matches!(
            self.min_breadth(),
            TrackBreadth::MinContent | TrackBreadth::Auto
        ) && self.has_intrinsic_max()
    }

    pub const fn has_max_content_min_and_max_content_max(&self) -> bool {
        self.has_max_content_min() && matches!(self.max_breadth(), TrackBreadth::MaxContent)
    }

    /// Either sizing function is a percentage.
    pub const fn has_percentage(&self) -> bool {
        self.min_breadth().has_percentage() || self.max_breadth().has_percentage()
    }
}

/// Repeat pattern for track lists.
///
/// Spec: §7.2.3 Repeating Rows and Columns
#[derive(Debug, Clone, PartialEq)]
pub enum TrackRepeat {
    /// repeat(count, track-list)
    Count(usize, Vec<GridTrackSize>),
    /// repeat(auto-fill, track-list)
    AutoFill(Vec<GridTrackSize>),
    /// repeat(auto-fit, track-list)
    AutoFit(Vec<GridTrackSize>),
}

/// Which auto-repeat keyword a track list uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AutoRepeatType {
    /// repeat(auto-fill, ...)
    AutoFill,
    /// repeat(auto-fit, ...): empty repetitions collapse
    AutoFit,
}

/// Gap between tracks (`row-gap` / `column-gap`).
///
/// Spec: CSS Box Alignment §8 Gaps Between Boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum GridGap {
    /// Length in pixels
    Length(f32),
    /// Fraction of the container's content box size in this axis
    Percentage(f32),
}

impl Default for GridGap {
    fn default() -> Self {
        Self::Length(0.0)
    }
}

impl GridGap {
    /// Resolve the gap; percentages against an indefinite size resolve to zero.
    pub fn resolve(self, available: Option<f32>) -> f32 {
        match self {
            Self::Length(len) => len.max(0.0),
            Self::Percentage(pct) => (pct * available.unwrap_or(0.0)).max(0.0),
        }
    }
}

/// Track list definition for one axis.
///
/// Mirrors `grid-template-{rows,columns}` plus `grid-auto-{rows,columns}` and
/// the axis gap.
#[derive(Debug, Clone, PartialEq)]
pub struct GridAxisTracks {
    /// Explicit track sizes, excluding the auto-repeat tracks
    pub tracks: Vec<GridTrackSize>,
    /// Gap between tracks
    pub gap: GridGap,
    /// Track sizes inside `repeat(auto-fill | auto-fit, ...)`
    pub auto_repeat_tracks: Vec<GridTrackSize>,
    /// Auto-repeat keyword, if the template has an auto-repeat
    pub auto_repeat_type: Option<AutoRepeatType>,
    /// Index in `tracks` before which the auto-repeat tracks are inserted
    pub auto_repeat_insertion_point: usize,
    /// Implicit track sizes (`grid-auto-rows` / `grid-auto-columns`)
    pub auto_tracks: Vec<GridTrackSize>,
}

impl Default for GridAxisTracks {
    fn default() -> Self {
        Self::new(Vec::new(), 0.0)
    }
}

impl GridAxisTracks {
    /// Create a new axis tracks definition with `auto` implicit tracks.
    pub fn new(tracks: Vec<GridTrackSize>, gap: f32) -> Self {
        Self {
            tracks,
            gap: GridGap::Length(gap),
            auto_repeat_tracks: Vec::new(),
            auto_repeat_type: None,
            auto_repeat_insertion_point: 0,
            auto_tracks: vec![GridTrackSize::default()],
        }
    }

    /// Create a new axis tracks definition with auto-repeat pattern.
    ///
    /// The repeated tracks are inserted after `tracks`.
    pub fn with_auto_repeat(tracks: Vec<GridTrackSize>, gap: f32, auto_repeat: TrackRepeat) -> Self {
        let mut axis = Self::new(tracks, gap);
        axis.push_repeat(auto_repeat);
        axis
    }

    /// Append a repeat pattern at the end of the explicit track list.
    ///
    /// Counted repeats expand immediately; auto repeats are recorded with the
    /// current end of the list as their insertion point.
    pub fn push_repeat(&mut self, repeat: TrackRepeat) {
        let (repeat_type, sizes) = match repeat {
            TrackRepeat::Count(count, sizes) => {
                for _ in 0..count {
                    self.tracks.extend_from_slice(&sizes);
                }
                return;
            }
            TrackRepeat::AutoFill(sizes) => (AutoRepeatType::AutoFill, sizes),
            TrackRepeat::AutoFit(sizes) => (AutoRepeatType::AutoFit, sizes),
        };
        self.auto_repeat_type = Some(repeat_type);
        self.auto_repeat_tracks = sizes;
        self.auto_repeat_insertion_point = self.tracks.len();
    }

    /// Replace the implicit track sizes.
    #[must_use]
    pub fn with_auto_tracks(mut self, auto_tracks: Vec<GridTrackSize>) -> Self {
        self.auto_tracks = auto_tracks;
        self
    }

    /// Replace the gap.
    #[must_use]
    pub fn with_gap(mut self, gap: GridGap) -> Self {
        self.gap = gap;
        self
    }

    /// Number of explicit tracks before auto-repeat expansion.
    pub fn count(&self) -> usize {
        self.tracks.len()
    }

    /// Number of explicit tracks once `auto_repeat_count` repeated tracks are inserted.
    pub fn explicit_count(&self, auto_repeat_count: usize) -> usize {
        self.tracks.len() + auto_repeat_count
    }

    /// Check whether this track list uses `repeat(auto-fit, ...)`.
    pub fn is_auto_fit(&self) -> bool {
        self.auto_repeat_type == Some(AutoRepeatType::AutoFit)
    }

    /// Validate the track list.
    ///
    /// # Errors
    /// Returns an error if the implicit track list is empty, the auto-repeat
    /// pattern is empty or not definite, or a breadth is negative.
    pub fn validate(&self, axis: GridAxis) -> Result<(), GridError> {
        if self.auto_tracks.is_empty() {
            return Err(GridError::EmptyImplicitTrackList { axis });
        }
        if self.auto_repeat_type.is_some() {
            if self.auto_repeat_tracks.is_empty() {
                return Err(GridError::EmptyAutoRepeat { axis });
            }
            // Auto repetitions need a definite size to count how many fit.
            let indefinite = self.auto_repeat_tracks.iter().any(|size| {
                (!size.min_breadth().is_fixed() && !size.max_breadth().is_fixed())
                    || size.min_breadth().is_flexible()
            });
            if indefinite {
                return Err(GridError::IndefiniteAutoRepeatTrack { axis });
            }
        }
        if self.auto_repeat_insertion_point > self.tracks.len() {
            return Err(GridError::InvalidAutoRepeatInsertionPoint { axis });
        }
        let all_sizes = self
            .tracks
            .iter()
            .chain(&self.auto_repeat_tracks)
            .chain(&self.auto_tracks);
        for size in all_sizes {
            let breadths = [
                *size.min_breadth(),
                *size.max_breadth(),
                size.fit_content_breadth().copied().unwrap_or(TrackBreadth::Auto),
            ];
            let negative = breadths.iter().any(|breadth| match breadth {
                TrackBreadth::Length(value)
                | TrackBreadth::Percentage(value)
                | TrackBreadth::Flex(value) => !(value.is_finite() && *value >= 0.0),
                TrackBreadth::MinContent | TrackBreadth::MaxContent | TrackBreadth::Auto => false,
            });
            if negative {
                return Err(GridError::InvalidTrackBreadth { axis });
            }
        }
        Ok(())
    }
}

/// Auto-placement algorithm direction.
///
/// Spec: §8.5 Grid Item Placement Algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum GridAutoFlow {
    /// Place items row by row
    #[default]
    Row,
    /// Place items column by column
    Column,
    /// Pack items densely (try to fill holes)
    RowDense,
    /// Pack items densely in columns
    ColumnDense,
}

impl GridAutoFlow {
    /// Check if the dense packing algorithm is used.
    pub const fn is_dense(self) -> bool {
        matches!(self, Self::RowDense | Self::ColumnDense)
    }

    /// Axis along which the auto-placement cursor advances first.
    ///
    /// With `grid-auto-flow: row` items fill a row before moving on, so the
    /// major axis is the row axis.
    pub const fn major_axis(self) -> GridAxis {
        match self {
            Self::Row | Self::RowDense => GridAxis::Row,
            Self::Column | Self::ColumnDense => GridAxis::Column,
        }
    }
}

/// Self-alignment values for grid items.
///
/// Spec: §11 Alignment and Spacing
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum GridAlignment {
    /// Start alignment
    Start,
    /// End alignment
    End,
    /// Center alignment
    Center,
    /// Stretch to fill
    #[default]
    Stretch,
    /// Align first baselines within the baseline-sharing group
    Baseline,
    /// Align last baselines within the baseline-sharing group
    LastBaseline,
}

impl GridAlignment {
    /// Check if this is a baseline alignment value.
    pub const fn is_baseline(self) -> bool {
        matches!(self, Self::Baseline | Self::LastBaseline)
    }
}

/// Content alignment of the grid tracks inside the container
/// (`justify-content` for columns, `align-content` for rows).
///
/// Spec: CSS Box Alignment §5.1 The align-content and justify-content properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ContentAlignment {
    /// `normal`, which behaves as `stretch` for grid containers
    #[default]
    Normal,
    /// Pack tracks at the start
    Start,
    /// Pack tracks at the end
    End,
    /// Center the tracks
    Center,
    /// Grow `auto` tracks to fill the container
    Stretch,
    /// Equal space between tracks
    SpaceBetween,
    /// Equal space around each track
    SpaceAround,
    /// Equal space between and around tracks
    SpaceEvenly,
}

impl ContentAlignment {
    /// Check if auto tracks are stretched into remaining free space.
    pub const fn is_stretch(self) -> bool {
        matches!(self, Self::Normal | Self::Stretch)
    }
}

/// One side of a `grid-row` / `grid-column` placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GridLine {
    /// A 1-indexed line number; negative numbers count from the end of the explicit grid
    Line(i32),
    /// `span N`
    Span(usize),
}

/// Represents a grid item with its placement and alignment properties.
#[derive(Debug, Clone)]
pub struct GridItem<NodeId = usize> {
    /// Node identifier (generic to support different node ID types)
    pub node_id: NodeId,
    /// Row start position (if specified)
    pub row_start: Option<GridLine>,
    /// Row end position (if specified)
    pub row_end: Option<GridLine>,
    /// Column start position (if specified)
    pub col_start: Option<GridLine>,
    /// Column end position (if specified)
    pub col_end: Option<GridLine>,
    /// `align-self` (block axis, affects rows)
    pub align_self: GridAlignment,
    /// `justify-self` (inline axis, affects columns)
    pub justify_self: GridAlignment,
}

impl<NodeId> GridItem<NodeId> {
    /// Create a new grid item with the given node ID.
    pub const fn new(node_id: NodeId) -> Self {
        Self {
            node_id,
            row_start: None,
            row_end: None,
            col_start: None,
            col_end: None,
            align_self: GridAlignment::Stretch,
            justify_self: GridAlignment::Stretch,
        }
    }

    /// Set the row placement.
    #[must_use]
    pub fn with_rows(mut self, start: Option<GridLine>, end: Option<GridLine>) -> Self {
        self.row_start = start;
        self.row_end = end;
        self
    }

    /// Set the column placement.
    #[must_use]
    pub fn with_columns(mut self, start: Option<GridLine>, end: Option<GridLine>) -> Self {
        self.col_start = start;
        self.col_end = end;
        self
    }

    /// Set `align-self` / `justify-self`.
    #[must_use]
    pub fn with_alignment(mut self, align_self: GridAlignment, justify_self: GridAlignment) -> Self {
        self.align_self = align_self;
        self.justify_self = justify_self;
        self
    }

    /// Check if this item has explicit row placement.
    pub const fn has_explicit_row_placement(&self) -> bool {
        self.row_start.is_some() || self.row_end.is_some()
    }

    /// Check if this item has explicit column placement.
    pub const fn has_explicit_col_placement(&self) -> bool {
        self.col_start.is_some() || self.col_end.is_some()
    }

    /// Placement lines for `axis`.
    pub const fn lines(&self, axis: GridAxis) -> (Option<GridLine>, Option<GridLine>) {
        match axis {
            GridAxis::Row => (self.row_start, self.row_end),
            GridAxis::Column => (self.col_start, self.col_end),
        }
    }

    /// Self-alignment in `axis`.
    pub const fn self_alignment(&self, axis: GridAxis) -> GridAlignment {
        match axis {
            GridAxis::Row => self.align_self,
            GridAxis::Column => self.justify_self,
        }
    }
}
