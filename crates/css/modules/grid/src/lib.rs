//! CSS Grid Layout Module Level 2
//! Spec: <https://www.w3.org/TR/css-grid-2/>
//!
//! Places grid items on a sparse grid and sizes its tracks. The box tree
//! stays outside this crate: items are opaque handles and every measurement
//! goes through [`GridLayoutTree`].

// Grid container and item types
mod types;
pub use types::{
    AutoRepeatType, ContentAlignment, GridAlignment, GridAutoFlow, GridAxis, GridAxisTracks, GridGap,
    GridItem, GridLine, GridTrackSize, TrackBreadth, TrackRepeat,
};

mod error;
pub use error::GridError;

// Box tree seen by the grid
mod tree;
pub use tree::{ContentSizes, GridLayoutTree, ItemAxisStyle, ItemLength};

// Baseline sharing groups
mod baseline;
pub use baseline::{BaselineContext, BaselineItems};

// Sparse grid storage
mod list_grid;
pub use list_grid::{GridIterator, ListGrid};

// Grid placement algorithm
mod placement;
pub use placement::{
    AUTO_REPEAT_MIN_TRACK_SIZE, GridArea, GridSpan, MAX_GRID_TRACKS, ResolvedSpan, UntranslatedSpan,
    clamp_auto_repeat_tracks, compute_auto_repeat_tracks_count, compute_empty_tracks_for_auto_repeat,
    place_items_on_grid, resolve_grid_positions,
};

// Track sizing algorithm
mod track_sizing;
pub use track_sizing::{
    GridTrack, GridTrackSizingAlgorithm, SizingState, SizingStrategy, TrackSizeComputationPhase,
    TrackSizeRestriction, find_fr_unit_size, initial_base_size, initial_growth_limit, raw_grid_track_size,
    update_override_containing_block_size,
};

// Grid layout algorithm
mod layout;
pub use layout::{
    AxisSizeConstraints, ContentAlignmentOffset, GridContainerInputs, GridLayoutResult, GridPlacedItem,
    compute_content_distribution_offset, compute_intrinsic_inline_sizes, gutters_size, layout_grid,
    populate_grid_positions, self_alignment_offset,
};

#[cfg(test)]
mod test_tree;
