// SPDX-License-Identifier: MPL-2.0
//! Tunable parameters for the gesture mapping and transition timing.
//!
//! These are in-memory settings a host embeds at construction time; the core
//! owns no settings file. Defaults match the observed production behavior.

use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Fraction of the viewport width the horizontal rubber-band wobble may reach.
pub const DEFAULT_HORIZONTAL_BOUND_FRACTION: f32 = 0.4;

/// Fraction of the viewport height the eased over-pull (pulling against the
/// dismiss direction) may reach.
pub const DEFAULT_OVERPULL_BOUND_FRACTION: f32 = 0.26;

/// Scale floor the dragged content shrinks towards while dismissing.
pub const DEFAULT_MIN_SCALE: f32 = 0.6;

/// Gain applied to the vertical translation when deriving the completion
/// progress: `progress = clamp(gain * ty / viewport_height, 0, 1)`.
pub const DEFAULT_PROGRESS_GAIN: f32 = 2.0;

/// Duration of a non-interactive push transition.
pub const DEFAULT_PUSH_DURATION: Duration = Duration::from_millis(500);

/// Duration of a non-interactive pop transition.
pub const DEFAULT_POP_DURATION: Duration = Duration::from_millis(350);

/// Build-phase duration of an interactive pop transition.
pub const DEFAULT_INTERACTIVE_POP_DURATION: Duration = Duration::from_millis(250);

/// Tunables for the drag-gesture to transform/progress mapping.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GestureTuning {
    /// Horizontal wobble bound as a fraction of viewport width.
    #[serde(default = "default_horizontal_bound")]
    pub horizontal_bound_fraction: f32,
    /// Over-pull bound as a fraction of viewport height.
    #[serde(default = "default_overpull_bound")]
    pub overpull_bound_fraction: f32,
    /// Minimum content scale reached at full dismiss progress.
    #[serde(default = "default_min_scale")]
    pub min_scale: f32,
    /// Vertical-translation gain for the progress fraction.
    #[serde(default = "default_progress_gain")]
    pub progress_gain: f32,
}

fn default_horizontal_bound() -> f32 {
    DEFAULT_HORIZONTAL_BOUND_FRACTION
}

fn default_overpull_bound() -> f32 {
    DEFAULT_OVERPULL_BOUND_FRACTION
}

fn default_min_scale() -> f32 {
    DEFAULT_MIN_SCALE
}

fn default_progress_gain() -> f32 {
    DEFAULT_PROGRESS_GAIN
}

impl Default for GestureTuning {
    fn default() -> Self {
        Self {
            horizontal_bound_fraction: DEFAULT_HORIZONTAL_BOUND_FRACTION,
            overpull_bound_fraction: DEFAULT_OVERPULL_BOUND_FRACTION,
            min_scale: DEFAULT_MIN_SCALE,
            progress_gain: DEFAULT_PROGRESS_GAIN,
        }
    }
}

impl GestureTuning {
    /// Returns a copy with every field clamped to a sane range.
    ///
    /// Fractions are clamped to `[0, 1]`, the scale floor to `(0, 1]` and the
    /// progress gain to `[0.1, 10]`. Hosts feeding user-supplied values
    /// should pass them through here.
    #[must_use]
    pub fn clamped(self) -> Self {
        Self {
            horizontal_bound_fraction: self.horizontal_bound_fraction.clamp(0.0, 1.0),
            overpull_bound_fraction: self.overpull_bound_fraction.clamp(0.0, 1.0),
            min_scale: self.min_scale.clamp(f32::EPSILON, 1.0),
            progress_gain: self.progress_gain.clamp(0.1, 10.0),
        }
    }
}

/// Fixed durations for the non-gesture-driven phases of each transition kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTiming {
    /// Push (thumbnail grows into the viewer).
    pub push: Duration,
    /// Pop (viewer shrinks back to the thumbnail).
    pub pop: Duration,
    /// Interactive pop build phase, before the gesture takes over.
    pub interactive_pop: Duration,
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            push: DEFAULT_PUSH_DURATION,
            pop: DEFAULT_POP_DURATION,
            interactive_pop: DEFAULT_INTERACTIVE_POP_DURATION,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_tuning_matches_constants() {
        let tuning = GestureTuning::default();
        assert_eq!(
            tuning.horizontal_bound_fraction,
            DEFAULT_HORIZONTAL_BOUND_FRACTION
        );
        assert_eq!(tuning.overpull_bound_fraction, DEFAULT_OVERPULL_BOUND_FRACTION);
        assert_eq!(tuning.min_scale, DEFAULT_MIN_SCALE);
        assert_eq!(tuning.progress_gain, DEFAULT_PROGRESS_GAIN);
    }

    #[test]
    fn clamped_bounds_out_of_range_values() {
        let tuning = GestureTuning {
            horizontal_bound_fraction: 3.0,
            overpull_bound_fraction: -0.5,
            min_scale: 0.0,
            progress_gain: 100.0,
        }
        .clamped();

        assert_eq!(tuning.horizontal_bound_fraction, 1.0);
        assert_eq!(tuning.overpull_bound_fraction, 0.0);
        assert!(tuning.min_scale > 0.0);
        assert_eq!(tuning.progress_gain, 10.0);
    }

    #[test]
    fn clamped_preserves_defaults() {
        assert_eq!(GestureTuning::default().clamped(), GestureTuning::default());
    }

    #[test]
    fn default_timing_matches_operation_kinds() {
        let timing = TransitionTiming::default();
        assert_eq!(timing.push, Duration::from_millis(500));
        assert_eq!(timing.pop, Duration::from_millis(350));
        assert_eq!(timing.interactive_pop, Duration::from_millis(250));
    }
}
