//! Sizing state of a single track.

use crate::types::GridTrackSize;

/// One row or column while the sizing algorithm runs.
///
/// `growth_limit` is `f32::INFINITY` while it is still unknown. Whenever it
/// is finite it never drops below `base_size`; both setters restore that.
#[derive(Debug, Clone, PartialEq)]
pub struct GridTrack {
    base_size: f32,
    growth_limit: f32,
    planned_size: f32,
    size_during_distribution: f32,
    growth_limit_cap: Option<f32>,
    infinitely_growable: bool,
    cached_track_size: GridTrackSize,
}

impl Default for GridTrack {
    fn default() -> Self {
        Self {
            base_size: 0.0,
            growth_limit: 0.0,
            planned_size: 0.0,
            size_during_distribution: 0.0,
            growth_limit_cap: None,
            infinitely_growable: false,
            cached_track_size: GridTrackSize::default(),
        }
    }
}

impl GridTrack {
    pub const fn base_size(&self) -> f32 {
        self.base_size
    }

    pub fn set_base_size(&mut self, base_size: f32) {
        self.base_size = base_size;
        self.ensure_growth_limit_is_bigger_than_base_size();
    }

    pub const fn growth_limit(&self) -> f32 {
        self.growth_limit
    }

    pub const fn growth_limit_is_infinite(&self) -> bool {
        self.growth_limit.is_infinite()
    }

    /// Set the growth limit, clamped to the cap unless infinite.
    pub fn set_growth_limit(&mut self, growth_limit: f32) {
        self.growth_limit = if growth_limit.is_infinite() {
            growth_limit
        } else {
            growth_limit.min(self.growth_limit_cap.unwrap_or(growth_limit))
        };
        self.ensure_growth_limit_is_bigger_than_base_size();
    }

    /// Growth limit when finite, else the base size.
    pub const fn used_growth_limit(&self) -> f32 {
        if self.growth_limit_is_infinite() {
            self.base_size
        } else {
            self.growth_limit
        }
    }

    pub const fn infinite_growth_potential(&self) -> bool {
        self.growth_limit_is_infinite() || self.infinitely_growable
    }

    pub const fn planned_size(&self) -> f32 {
        self.planned_size
    }

    pub fn set_planned_size(&mut self, planned_size: f32) {
        self.planned_size = planned_size;
    }

    pub const fn size_during_distribution(&self) -> f32 {
        self.size_during_distribution
    }

    pub fn set_size_during_distribution(&mut self, size: f32) {
        debug_assert!(size >= 0.0, "negative size during distribution");
        self.size_during_distribution = size;
    }

    pub fn grow_size_during_distribution(&mut self, growth: f32) {
        debug_assert!(growth >= 0.0, "tracks never shrink during distribution");
        self.size_during_distribution += growth;
    }

    pub const fn infinitely_growable(&self) -> bool {
        self.infinitely_growable
    }

    pub fn set_infinitely_growable(&mut self, infinitely_growable: bool) {
        self.infinitely_growable = infinitely_growable;
    }

    /// Upper bound from `fit-content()`.
    pub const fn growth_limit_cap(&self) -> Option<f32> {
        self.growth_limit_cap
    }

    pub fn set_growth_limit_cap(&mut self, cap: Option<f32>) {
        debug_assert!(cap.is_none_or(|value| value >= 0.0), "negative growth limit cap");
        self.growth_limit_cap = cap;
    }

    /// Sizing function resolved for the current run.
    pub const fn cached_track_size(&self) -> &GridTrackSize {
        &self.cached_track_size
    }

    pub fn set_cached_track_size(&mut self, track_size: GridTrackSize) {
        self.cached_track_size = track_size;
    }

    fn ensure_growth_limit_is_bigger_than_base_size(&mut self) {
        if !self.growth_limit.is_infinite() && self.growth_limit < self.base_size {
            self.growth_limit = self.base_size;
        }
    }
}
