//! Distributing extra space across a set of tracks.
//!
//! Spec: §12.5.1 Distributing Extra Space Across Spanned Tracks
//! <https://www.w3.org/TR/css-grid-2/#extra-space>

use core::cmp::Ordering;

use super::phases::{TrackSizeComputationPhase, TrackSizeRestriction};
use super::track::GridTrack;

/// Whether a track can absorb any amount of space, with no cap to stop it.
const fn has_uncapped_infinite_growth_potential(track: &GridTrack) -> bool {
    track.infinite_growth_potential() && track.growth_limit_cap().is_none()
}

/// Tracks closest to their limit come first; unbounded tracks last.
fn growth_potential_order(first: &GridTrack, second: &GridTrack) -> Ordering {
    match (
        has_uncapped_infinite_growth_potential(first),
        has_uncapped_infinite_growth_potential(second),
    ) {
        (true, true) => Ordering::Equal,
        (true, false) => Ordering::Greater,
        (false, true) => Ordering::Less,
        (false, false) => {
            let first_potential = first.growth_limit_cap().unwrap_or(first.growth_limit()) - first.base_size();
            let second_potential =
                second.growth_limit_cap().unwrap_or(second.growth_limit()) - second.base_size();
            first_potential.total_cmp(&second_potential)
        }
    }
}

/// Stable sort of `indices` by growth potential of the tracks they name.
pub fn sort_by_growth_potential(all_tracks: &[GridTrack], indices: &mut [usize]) {
    indices.sort_by(|first, second| growth_potential_order(&all_tracks[*first], &all_tracks[*second]));
}

/// In the max-content maximums phase, `fit-content()` tracks stop at their cap.
fn clamp_growth_share(phase: TrackSizeComputationPhase, track: &GridTrack, growth_share: f32) -> f32 {
    if phase != TrackSizeComputationPhase::MaxContentMaximums {
        return growth_share;
    }
    let Some(cap) = track.growth_limit_cap() else {
        return growth_share;
    };
    let distance_to_cap = cap - track.size_during_distribution();
    if distance_to_cap <= 0.0 {
        return growth_share;
    }
    growth_share.min(distance_to_cap)
}

fn grow_track(track: &mut GridTrack, growth_share: f32, available: &mut f32) {
    let share = if growth_share < 0.0 {
        tracing::warn!(growth_share, "negative growth share clamped to zero");
        0.0
    } else {
        growth_share
    };
    track.grow_size_during_distribution(share);
    *available -= share;
}

/// Distribute `available` over `tracks`, then over `grow_beyond` once every
/// track reached its limit.
///
/// `tracks` and `grow_beyond` hold indices into `all_tracks` and are
/// reordered. On return every listed track's planned size holds the
/// result and `available` holds whatever could not be placed.
///
/// # Panics
/// Panics if an index is out of bounds.
pub fn distribute_space_to_tracks(
    phase: TrackSizeComputationPhase,
    all_tracks: &mut [GridTrack],
    tracks: &mut [usize],
    grow_beyond: Option<&mut [usize]>,
    available: &mut f32,
) {
    debug_assert!(*available >= 0.0, "distributing negative space");

    for &index in &*tracks {
        let track = &mut all_tracks[index];
        let size = phase.track_size(track, TrackSizeRestriction::ForbidInfinity);
        track.set_size_during_distribution(size);
    }

    if *available > 0.0 {
        sort_by_growth_potential(all_tracks, tracks);
        let count = tracks.len();
        for (position, index) in tracks.iter().enumerate() {
            let track = &mut all_tracks[*index];
            let available_share = *available / (count - position) as f32;
            let track_breadth = phase.track_size(track, TrackSizeRestriction::ForbidInfinity);
            let growth_share = if track.infinite_growth_potential() {
                available_share
            } else {
                available_share.min(track.growth_limit() - track_breadth)
            };
            let growth_share = clamp_growth_share(phase, track, growth_share);
            grow_track(track, growth_share, available);
        }
    }

    if *available > 0.0
        && let Some(beyond) = grow_beyond
    {
        // Capped fit-content() tracks cannot take an unbounded share.
        if phase == TrackSizeComputationPhase::MaxContentMaximums {
            sort_by_growth_potential(all_tracks, beyond);
        }
        let count = beyond.len();
        for (position, index) in beyond.iter().enumerate() {
            let track = &mut all_tracks[*index];
            let growth_share = clamp_growth_share(phase, track, *available / (count - position) as f32);
            grow_track(track, growth_share, available);
        }
    }

    for &index in &*tracks {
        let track = &mut all_tracks[index];
        let planned = if track.planned_size().is_infinite() {
            track.size_during_distribution()
        } else {
            track.planned_size().max(track.size_during_distribution())
        };
        track.set_planned_size(planned);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{GridTrackSize, TrackBreadth};

    const EPSILON: f32 = 1e-4;

    fn track(base: f32, limit: f32) -> GridTrack {
        let mut track = GridTrack::default();
        track.set_growth_limit(limit);
        track.set_base_size(base);
        track.set_planned_size(base);
        track
    }

    fn sizes(tracks: &[GridTrack]) -> Vec<f32> {
        tracks.iter().map(GridTrack::size_during_distribution).collect()
    }

    /// Tracks with the least room fill first and nothing is over-allocated.
    ///
    /// # Panics
    /// Panics if a share is negative or the total exceeds the space.
    #[test]
    fn shares_respect_growth_limits() {
        let mut all_tracks = [track(0.0, 10.0), track(0.0, 100.0), track(0.0, 30.0)];
        let mut indices = [0, 1, 2];
        let mut available = 90.0;
        distribute_space_to_tracks(
            TrackSizeComputationPhase::MaximizeTracks,
            &mut all_tracks,
            &mut indices,
            None,
            &mut available,
        );

        let grown = sizes(&all_tracks);
        assert!((grown[0] - 10.0).abs() < EPSILON);
        assert!((grown[2] - 30.0).abs() < EPSILON);
        assert!((grown[1] - 50.0).abs() < EPSILON);
        assert!(available.abs() < EPSILON);
        assert!(grown.iter().all(|size| *size >= 0.0));
        assert!(grown.iter().sum::<f32>() <= 90.0 + EPSILON);
        assert!((all_tracks[1].planned_size() - 50.0).abs() < EPSILON);
    }

    /// Space left after every limit is reached goes to the grow-beyond set.
    ///
    /// # Panics
    /// Panics if the leftover is not split over the grow-beyond tracks.
    #[test]
    fn leftover_goes_beyond_limits() {
        let mut all_tracks = [track(0.0, 10.0), track(0.0, 10.0)];
        let mut indices = [0, 1];
        let mut beyond = [1];
        let mut available = 50.0;
        distribute_space_to_tracks(
            TrackSizeComputationPhase::IntrinsicMinimums,
            &mut all_tracks,
            &mut indices,
            Some(&mut beyond[..]),
            &mut available,
        );
        let grown = sizes(&all_tracks);
        assert!((grown[0] - 10.0).abs() < EPSILON);
        assert!((grown[1] - 40.0).abs() < EPSILON);
        assert!(available.abs() < EPSILON);
    }

    /// Unbounded tracks sort last; others by remaining room.
    ///
    /// # Panics
    /// Panics if the order is wrong.
    #[test]
    fn growth_potential_sorting() {
        let all_tracks = [track(0.0, f32::INFINITY), track(5.0, 50.0), track(0.0, 10.0)];
        let mut indices = [0, 1, 2];
        sort_by_growth_potential(&all_tracks, &mut indices);
        assert_eq!(indices, [2, 1, 0]);
    }

    /// `fit-content()` tracks stop at their cap in the max-content maximums phase.
    ///
    /// # Panics
    /// Panics if a capped track grows past its cap.
    #[test]
    fn fit_content_cap_clamps_share() {
        let mut capped = track(0.0, f32::INFINITY);
        capped.set_cached_track_size(GridTrackSize::FitContent(TrackBreadth::Length(15.0)));
        capped.set_growth_limit_cap(Some(15.0));
        capped.set_planned_size(f32::INFINITY);
        let mut open = track(0.0, f32::INFINITY);
        open.set_planned_size(f32::INFINITY);

        let mut all_tracks = [capped, open];
        let mut indices = [0, 1];
        let mut beyond = [0, 1];
        let mut available = 100.0;
        distribute_space_to_tracks(
            TrackSizeComputationPhase::MaxContentMaximums,
            &mut all_tracks,
            &mut indices,
            Some(&mut beyond[..]),
            &mut available,
        );
        assert!((all_tracks[0].planned_size() - 15.0).abs() < EPSILON);
        assert!((all_tracks[1].planned_size() - 85.0).abs() < EPSILON);
    }
}
