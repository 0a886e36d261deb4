//! Per-phase rules for sizing tracks to fit spanning items.
//!
//! Spec: §12.5.1 Distributing Extra Space Across Spanned Tracks
//! <https://www.w3.org/TR/css-grid-2/#extra-space>

use super::track::GridTrack;
use crate::types::GridTrackSize;

/// Step of the intrinsic sizing pass, plus the final maximization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSizeComputationPhase {
    IntrinsicMinimums,
    ContentBasedMinimums,
    MaxContentMinimums,
    IntrinsicMaximums,
    MaxContentMaximums,
    MaximizeTracks,
}

/// Whether an infinite growth limit may be reported as a phase size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackSizeRestriction {
    AllowInfinity,
    ForbidInfinity,
}

/// Measurement of an item that a phase accommodates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ContributionKind {
    /// Minimum contribution (automatic minimum size)
    MinSize,
    MinContent,
    MaxContent,
}

impl TrackSizeComputationPhase {
    /// Phases run, in order, for every group of items with the same span.
    pub const SPANNING_ITEM_PHASES: [Self; 5] = [
        Self::IntrinsicMinimums,
        Self::ContentBasedMinimums,
        Self::MaxContentMinimums,
        Self::IntrinsicMaximums,
        Self::MaxContentMaximums,
    ];

    const fn affects_growth_limit(self) -> bool {
        matches!(self, Self::IntrinsicMaximums | Self::MaxContentMaximums)
    }

    /// Size of `track` this phase grows: the base size, or the growth
    /// limit for the maximum phases.
    pub const fn track_size(self, track: &GridTrack, restriction: TrackSizeRestriction) -> f32 {
        if !self.affects_growth_limit() {
            return track.base_size();
        }
        match restriction {
            TrackSizeRestriction::AllowInfinity => track.growth_limit(),
            TrackSizeRestriction::ForbidInfinity => track.used_growth_limit(),
        }
    }

    /// Whether a track with `track_size` receives space in this phase.
    pub const fn should_process(self, track_size: &GridTrackSize) -> bool {
        match self {
            Self::IntrinsicMinimums => track_size.has_intrinsic_min(),
            Self::ContentBasedMinimums => track_size.has_min_or_max_content_min(),
            Self::MaxContentMinimums => track_size.has_max_content_min(),
            Self::IntrinsicMaximums => track_size.has_intrinsic_max(),
            Self::MaxContentMaximums => track_size.has_max_content_or_auto_max(),
            Self::MaximizeTracks => false,
        }
    }

    /// Whether a track may receive space past its growth limit.
    pub const fn grows_beyond_growth_limit(self, track_size: &GridTrackSize) -> bool {
        match self {
            Self::IntrinsicMinimums | Self::ContentBasedMinimums => {
                track_size.has_auto_or_min_content_min_and_intrinsic_max()
            }
            Self::MaxContentMinimums => track_size.has_max_content_min_and_max_content_max(),
            Self::IntrinsicMaximums | Self::MaxContentMaximums => true,
            Self::MaximizeTracks => false,
        }
    }

    /// A track whose growth limit went from infinite to finite in the
    /// intrinsic maximums phase may keep growing in the max-content one.
    pub fn mark_infinitely_growable(self, track: &mut GridTrack) {
        match self {
            Self::IntrinsicMaximums => {
                if self.track_size(track, TrackSizeRestriction::AllowInfinity).is_infinite()
                    && !track.planned_size().is_infinite()
                {
                    track.set_infinitely_growable(true);
                }
            }
            Self::MaxContentMaximums => track.set_infinitely_growable(false),
            Self::IntrinsicMinimums
            | Self::ContentBasedMinimums
            | Self::MaxContentMinimums
            | Self::MaximizeTracks => {}
        }
    }

    /// Commit the planned size into the size this phase grows.
    pub fn update_track_size(self, track: &mut GridTrack) {
        match self {
            Self::IntrinsicMinimums | Self::ContentBasedMinimums | Self::MaxContentMinimums => {
                track.set_base_size(track.planned_size());
            }
            Self::IntrinsicMaximums | Self::MaxContentMaximums => {
                track.set_growth_limit(track.planned_size());
            }
            Self::MaximizeTracks => {}
        }
    }

    /// Item measurement this phase accommodates; `None` for maximization.
    pub const fn contribution(self) -> Option<ContributionKind> {
        match self {
            Self::IntrinsicMinimums => Some(ContributionKind::MinSize),
            Self::ContentBasedMinimums | Self::IntrinsicMaximums => Some(ContributionKind::MinContent),
            Self::MaxContentMinimums | Self::MaxContentMaximums => Some(ContributionKind::MaxContent),
            Self::MaximizeTracks => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::TrackBreadth;

    const EPSILON: f32 = 1e-4;

    /// Maximum phases read the growth limit, falling back to the base size.
    ///
    /// # Panics
    /// Panics if a phase reads the wrong size.
    #[test]
    fn phase_track_sizes() {
        let mut track = GridTrack::default();
        track.set_base_size(10.0);
        track.set_growth_limit(f32::INFINITY);

        let min_phase = TrackSizeComputationPhase::ContentBasedMinimums;
        assert!((min_phase.track_size(&track, TrackSizeRestriction::AllowInfinity) - 10.0).abs() < EPSILON);

        let max_phase = TrackSizeComputationPhase::IntrinsicMaximums;
        assert!(max_phase.track_size(&track, TrackSizeRestriction::AllowInfinity).is_infinite());
        assert!((max_phase.track_size(&track, TrackSizeRestriction::ForbidInfinity) - 10.0).abs() < EPSILON);
    }

    /// Track filters follow the min and max sizing functions.
    ///
    /// # Panics
    /// Panics if a track is filtered wrongly.
    #[test]
    fn phase_filters() {
        let auto = GridTrackSize::default();
        let min_content = GridTrackSize::Breadth(TrackBreadth::MinContent);
        let max_content = GridTrackSize::Breadth(TrackBreadth::MaxContent);
        let fixed_max = GridTrackSize::MinMax(TrackBreadth::Auto, TrackBreadth::Length(20.0));

        assert!(TrackSizeComputationPhase::IntrinsicMinimums.should_process(&auto));
        assert!(!TrackSizeComputationPhase::ContentBasedMinimums.should_process(&auto));
        assert!(TrackSizeComputationPhase::ContentBasedMinimums.should_process(&min_content));
        assert!(TrackSizeComputationPhase::MaxContentMinimums.should_process(&max_content));
        assert!(!TrackSizeComputationPhase::IntrinsicMaximums.should_process(&fixed_max));
        assert!(TrackSizeComputationPhase::MaxContentMaximums.should_process(&auto));

        assert!(TrackSizeComputationPhase::IntrinsicMinimums.grows_beyond_growth_limit(&auto));
        assert!(!TrackSizeComputationPhase::IntrinsicMinimums.grows_beyond_growth_limit(&fixed_max));
        assert!(TrackSizeComputationPhase::MaxContentMinimums.grows_beyond_growth_limit(&max_content));
        assert!(TrackSizeComputationPhase::MaxContentMaximums.grows_beyond_growth_limit(&fixed_max));
    }

    /// Intrinsic maximums flag tracks that just became finite; max-content
    /// maximums clear the flag.
    ///
    /// # Panics
    /// Panics if the flag is not toggled.
    #[test]
    fn infinitely_growable_marking() {
        let mut track = GridTrack::default();
        track.set_growth_limit(f32::INFINITY);
        track.set_planned_size(30.0);
        TrackSizeComputationPhase::IntrinsicMaximums.mark_infinitely_growable(&mut track);
        assert!(track.infinitely_growable());

        TrackSizeComputationPhase::IntrinsicMaximums.update_track_size(&mut track);
        assert!((track.growth_limit() - 30.0).abs() < EPSILON);

        TrackSizeComputationPhase::MaxContentMaximums.mark_infinitely_growable(&mut track);
        assert!(!track.infinitely_growable());
    }
}
