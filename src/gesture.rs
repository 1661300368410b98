// SPDX-License-Identifier: MPL-2.0
//! Pure mapping from raw drag translation to content transform and
//! completion progress.
//!
//! Everything here is derivable from the translation vector and the viewport
//! size alone; the only captured state is the immutable initial zoom taken
//! when the transition is prepared. No hidden mutable state, so the mapping
//! is directly unit-testable.

use crate::config::GestureTuning;
use iced_core::{Size, Vector};
use std::f32::consts::FRAC_PI_2;

/// Result of translating one drag sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DragEffect {
    /// Eased offset to apply to the dragged content.
    pub offset: Vector,
    /// Content scale relative to the captured initial zoom (`1.0` = unchanged).
    pub scale: f32,
    /// Completion progress in `[0, 1]`.
    pub progress: f32,
}

/// Whether a released gesture should finish or cancel the transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReleaseDecision {
    /// Play the transition forward to completion.
    Finish,
    /// Reverse the transition and restore the pre-gesture state.
    Cancel,
}

/// Decides finish vs. cancel from the release velocity.
///
/// Velocity dominates position: a fast small flick in the dismiss direction
/// still completes. Only the sign of the vertical component matters;
/// horizontal velocity is ignored. Zero (including a dead stop) finishes.
#[must_use]
pub fn decide_on_release(velocity: Vector) -> ReleaseDecision {
    if velocity.y >= 0.0 {
        ReleaseDecision::Finish
    } else {
        ReleaseDecision::Cancel
    }
}

/// Translator for one interactive dismissal, parameterized by tuning and the
/// zoom captured at prepare time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureTranslator {
    tuning: GestureTuning,
    initial_zoom: f32,
}

impl GestureTranslator {
    /// Creates a translator with the zoom scale the content had when the
    /// transition was prepared.
    #[must_use]
    pub fn new(tuning: GestureTuning, initial_zoom: f32) -> Self {
        Self {
            tuning,
            initial_zoom,
        }
    }

    /// Returns the zoom the content had when the transition was prepared.
    #[must_use]
    pub fn initial_zoom(&self) -> f32 {
        self.initial_zoom
    }

    /// Maps a raw translation and viewport size to a [`DragEffect`].
    ///
    /// Degenerate viewports (non-positive height or width) yield the
    /// identity effect so a mid-resize gesture can never divide by zero.
    #[must_use]
    pub fn translate(&self, translation: Vector, viewport: Size) -> DragEffect {
        if viewport.width <= 0.0 || viewport.height <= 0.0 {
            return DragEffect {
                offset: Vector::new(0.0, 0.0),
                scale: 1.0,
                progress: 0.0,
            };
        }

        let progress = self.progress(translation, viewport);
        DragEffect {
            offset: Vector::new(
                self.horizontal_offset(translation.x, viewport.width),
                self.vertical_offset(translation.y, viewport.height),
            ),
            scale: self.dismiss_scale(translation.y, progress),
            progress,
        }
    }

    /// Completion progress: `clamp(gain * ty / height, 0, 1)`.
    ///
    /// Monotonically non-decreasing in `translation.y` for a fixed viewport.
    #[must_use]
    pub fn progress(&self, translation: Vector, viewport: Size) -> f32 {
        if viewport.height <= 0.0 {
            return 0.0;
        }
        (self.tuning.progress_gain * translation.y / viewport.height).clamp(0.0, 1.0)
    }

    /// Sine-eased horizontal wobble, bounded to a fraction of the viewport
    /// width. Independent of completion progress.
    fn horizontal_offset(&self, tx: f32, width: f32) -> f32 {
        let bound = self.tuning.horizontal_bound_fraction * width;
        let ratio = (tx / width).clamp(-1.0, 1.0);
        bound * (ratio * FRAC_PI_2).sin()
    }

    /// Vertical offset: linear while pulling in the dismiss direction,
    /// quadratically eased out and bounded while pulling against it.
    fn vertical_offset(&self, ty: f32, height: f32) -> f32 {
        if ty >= 0.0 {
            return ty;
        }
        let bound = self.tuning.overpull_bound_fraction * height;
        let ratio = (-ty / height).min(1.0);
        // ease-out quadratic: fast at first, flattening near the bound
        -bound * ratio * (2.0 - ratio)
    }

    /// Linear scale from `1.0` down to the floor while dismissing; unchanged
    /// while pulling the opposite direction.
    fn dismiss_scale(&self, ty: f32, progress: f32) -> f32 {
        if ty > 0.0 {
            1.0 - (1.0 - self.tuning.min_scale) * progress
        } else {
            1.0
        }
    }
}
