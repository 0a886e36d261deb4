//! Sizing functions of individual tracks.
//!
//! Spec: §7.2.1 Track Sizing Functions, §7.6 Implicit Track Sizing
//! <https://www.w3.org/TR/css-grid-2/#implicit-grids>

use core::fmt::Debug;
use core::hash::Hash;

use super::GridTrackSizingAlgorithm;
use crate::types::{GridAxis, GridAxisTracks, GridTrackSize, TrackBreadth};

/// Sizing function of translated track `translated_index` as written in the
/// template, with `auto_repeat_count` repeated tracks inserted.
///
/// Implicit tracks before the explicit grid cycle backwards through the
/// implicit track list, implicit tracks after it cycle forwards.
pub fn raw_grid_track_size(
    tracks: &GridAxisTracks,
    explicit_start: usize,
    auto_repeat_count: usize,
    translated_index: usize,
) -> GridTrackSize {
    let untranslated = translated_index as i64 - explicit_start as i64;
    let auto_count = tracks.auto_tracks.len();
    let style = if untranslated < 0 {
        let count = auto_count as i64;
        let mut index = untranslated.checked_rem(count).unwrap_or(0);
        if index != 0 {
            index += count;
        }
        tracks.auto_tracks.get(index as usize)
    } else {
        let untranslated = untranslated as usize;
        let explicit_count = tracks.explicit_count(auto_repeat_count);
        let insertion_point = tracks.auto_repeat_insertion_point;
        if untranslated >= explicit_count {
            (untranslated - explicit_count)
                .checked_rem(auto_count)
                .and_then(|index| tracks.auto_tracks.get(index))
        } else if auto_repeat_count == 0 || untranslated < insertion_point {
            tracks.tracks.get(untranslated)
        } else if untranslated < insertion_point + auto_repeat_count {
            (untranslated - insertion_point)
                .checked_rem(tracks.auto_repeat_tracks.len())
                .and_then(|index| tracks.auto_repeat_tracks.get(index))
        } else {
            tracks.tracks.get(untranslated - auto_repeat_count)
        }
    };
    style.copied().unwrap_or_default()
}

/// Base size before any item is considered.
pub fn initial_base_size(track_size: &GridTrackSize, available: f32) -> f32 {
    track_size.min_breadth().fixed_value(available).unwrap_or(0.0)
}

/// Growth limit before any item is considered; infinite for content-sized maxima.
pub fn initial_growth_limit(track_size: &GridTrackSize, base_size: f32, available: f32) -> f32 {
    let max_breadth = track_size.max_breadth();
    if max_breadth.is_flexible() {
        return base_size;
    }
    max_breadth.fixed_value(available).unwrap_or(f32::INFINITY)
}

impl<NodeId: Copy + Eq + Hash + Debug> GridTrackSizingAlgorithm<'_, NodeId> {
    pub fn raw_grid_track_size(&self, axis: GridAxis, translated_index: usize) -> GridTrackSize {
        raw_grid_track_size(
            self.inputs.tracks(axis),
            self.grid.explicit_grid_start(axis),
            self.grid.auto_repeat_tracks(axis),
            translated_index,
        )
    }

    /// A percentage resolves against nothing while the axis size is indefinite.
    fn is_relative_breadth_as_auto(&self, breadth: &TrackBreadth, axis: GridAxis) -> bool {
        breadth.has_percentage() && self.available_space(axis).is_none()
    }

    /// The minimum decides when it is a percentage, else the maximum.
    fn is_relative_sized_track_as_auto(&self, track_size: &GridTrackSize, axis: GridAxis) -> bool {
        if track_size.min_breadth().has_percentage() {
            return self.is_relative_breadth_as_auto(track_size.min_breadth(), axis);
        }
        self.is_relative_breadth_as_auto(track_size.max_breadth(), axis)
    }

    /// Sizing function the algorithm works with for a track.
    ///
    /// Collapsed auto-fit tracks become `0px`, unresolvable percentages
    /// become `auto` and a flexible minimum becomes `auto`.
    pub fn calculate_grid_track_size(&self, axis: GridAxis, translated_index: usize) -> GridTrackSize {
        if self.grid.is_empty_auto_repeat_track(axis, translated_index) {
            return GridTrackSize::length(0.0);
        }
        let track_size = self.raw_grid_track_size(axis, translated_index);
        if let Some(limit) = track_size.fit_content_breadth() {
            return if self.is_relative_breadth_as_auto(limit, axis) {
                GridTrackSize::MinMax(TrackBreadth::Auto, TrackBreadth::MaxContent)
            } else {
                track_size
            };
        }

        let mut min_breadth = *track_size.min_breadth();
        let mut max_breadth = *track_size.max_breadth();
        if self.is_relative_sized_track_as_auto(&track_size, axis) {
            if min_breadth.has_percentage() {
                min_breadth = TrackBreadth::Auto;
            }
            if max_breadth.has_percentage() {
                max_breadth = TrackBreadth::Auto;
            }
        }
        if min_breadth.is_flexible() {
            min_breadth = TrackBreadth::Auto;
        }
        GridTrackSize::MinMax(min_breadth, max_breadth)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackRepeat;

    const EPSILON: f32 = 1e-4;

    fn length(size: &GridTrackSize) -> f32 {
        size.min_breadth().fixed_value(0.0).unwrap_or(-1.0)
    }

    /// Tracks resolve through the template, the repeat range and the implicit lists.
    ///
    /// # Panics
    /// Panics if a track resolves to the wrong sizing function.
    #[test]
    fn raw_sizes_follow_template() {
        let mut tracks = GridAxisTracks::new(
            vec![GridTrackSize::length(1.0), GridTrackSize::length(2.0)],
            0.0,
        )
        .with_auto_tracks(vec![GridTrackSize::length(10.0), GridTrackSize::length(20.0)]);
        tracks.push_repeat(TrackRepeat::AutoFill(vec![
            GridTrackSize::length(5.0),
            GridTrackSize::length(6.0),
        ]));
        tracks.auto_repeat_insertion_point = 1;

        // Explicit start 1, four repeated tracks: [auto] 1 5 6 5 6 2 [auto...]
        let lengths: Vec<f32> = (0..9)
            .map(|index| length(&raw_grid_track_size(&tracks, 1, 4, index)))
            .collect();
        let expected = [20.0, 1.0, 5.0, 6.0, 5.0, 6.0, 2.0, 10.0, 20.0];
        for (actual, wanted) in lengths.iter().zip(expected) {
            assert!((actual - wanted).abs() < EPSILON, "{lengths:?}");
        }
    }

    /// Implicit tracks before the explicit grid are transposed from the end
    /// of the implicit list.
    ///
    /// # Panics
    /// Panics if the leading implicit tracks resolve in the wrong order.
    #[test]
    fn leading_implicit_tracks_wrap_backwards() {
        let tracks = GridAxisTracks::new(vec![], 0.0).with_auto_tracks(vec![
            GridTrackSize::length(1.0),
            GridTrackSize::length(2.0),
            GridTrackSize::length(3.0),
        ]);
        let lengths: Vec<f32> = (0..4)
            .map(|index| length(&raw_grid_track_size(&tracks, 4, 0, index)))
            .collect();
        let expected = [3.0, 1.0, 2.0, 3.0];
        for (actual, wanted) in lengths.iter().zip(expected) {
            assert!((actual - wanted).abs() < EPSILON, "{lengths:?}");
        }
    }

    /// Initial sizes resolve fixed breadths and leave content maxima open.
    ///
    /// # Panics
    /// Panics if an initial size is wrong.
    #[test]
    fn initial_sizes() {
        let percent = GridTrackSize::MinMax(TrackBreadth::Percentage(0.5), TrackBreadth::MaxContent);
        let base = initial_base_size(&percent, 80.0);
        assert!((base - 40.0).abs() < EPSILON);
        assert!(initial_growth_limit(&percent, base, 80.0).is_infinite());

        let flex = GridTrackSize::MinMax(TrackBreadth::Length(15.0), TrackBreadth::Flex(1.0));
        assert!((initial_growth_limit(&flex, 15.0, 80.0) - 15.0).abs() < EPSILON);
        assert!(initial_base_size(&GridTrackSize::default(), 80.0).abs() < EPSILON);
    }
}
