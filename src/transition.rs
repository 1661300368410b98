// SPDX-License-Identifier: MPL-2.0
//! Lifecycle of one push/pop/interactive-pop transition.
//!
//! The [`TransitionCoordinator`] guarantees exactly one transition is active
//! at a time. A transition walks `Idle → Preparing → Active → Finishing →
//! Completed` (or `Active → Cancelling → Idle`); every operation checks its
//! required source state first, so a misuse is reported without ever
//! corrupting state. Cancellation is a first-class transition that always
//! reaches `Idle` with the [`VisualBackup`](crate::visual::VisualBackup)
//! restored exactly.

use crate::config::{GestureTuning, TransitionTiming};
use crate::error::{Error, Result};
use crate::gesture::{decide_on_release, GestureTranslator, ReleaseDecision};
use crate::visual::{ContentTransform, VisualBackup, VisualState};
use iced_core::{Rectangle, Size, Vector};
use log::{debug, error, trace};
use std::time::Duration;

/// The kind of transition being driven.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransitionKind {
    /// Thumbnail grows into the full-screen viewer.
    Push,
    /// Viewer shrinks back to the thumbnail at a fixed rate.
    Pop,
    /// Viewer is dismissed by a continuous gesture.
    InteractivePop,
}

impl TransitionKind {
    /// The fixed duration of this kind's property animation.
    #[must_use]
    pub fn duration(self, timing: &TransitionTiming) -> Duration {
        match self {
            TransitionKind::Push => timing.push,
            TransitionKind::Pop => timing.pop,
            TransitionKind::InteractivePop => timing.interactive_pop,
        }
    }
}

/// Current phase of the coordinator's single transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    Idle,
    Preparing,
    Active { progress: f32 },
    Finishing,
    Cancelling,
    Completed,
}

impl TransitionState {
    /// Short name for logs and protocol-violation reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            TransitionState::Idle => "idle",
            TransitionState::Preparing => "preparing",
            TransitionState::Active { .. } => "active",
            TransitionState::Finishing => "finishing",
            TransitionState::Cancelling => "cancelling",
            TransitionState::Completed => "completed",
        }
    }
}

/// Everything the coordinator needs to know about the transition it is asked
/// to drive. Frames are in window coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TransitionContext {
    pub kind: TransitionKind,
    /// Size of the viewport hosting the gesture.
    pub viewport: Size,
    /// Frame of the full-screen content.
    pub content_frame: Rectangle,
    /// Frame of the source thumbnail, when one exists. Absent means the
    /// transition degrades to a cross-dissolve instead of a hero morph.
    pub source_frame: Option<Rectangle>,
}

/// Headless stand-in for a cancelable property animator: it records the
/// duration, completion fraction and playback direction the rendering layer
/// should apply.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Animator {
    duration: Duration,
    fraction: f32,
    reversed: bool,
}

impl Animator {
    #[must_use]
    pub fn new(duration: Duration) -> Self {
        Self {
            duration,
            fraction: 0.0,
            reversed: false,
        }
    }

    /// Sets the completion fraction, clamped to `[0, 1]`.
    pub fn set_fraction(&mut self, fraction: f32) {
        self.fraction = fraction.clamp(0.0, 1.0);
    }

    /// Plays forward to the end.
    pub fn continue_to_end(&mut self) {
        self.reversed = false;
        self.fraction = 1.0;
    }

    /// Reverses back to the start.
    pub fn reverse_to_start(&mut self) {
        self.reversed = true;
        self.fraction = 0.0;
    }

    #[must_use]
    pub fn fraction(&self) -> f32 {
        self.fraction
    }

    #[must_use]
    pub fn is_reversed(&self) -> bool {
        self.reversed
    }

    #[must_use]
    pub fn duration(&self) -> Duration {
        self.duration
    }
}

/// Owns one transition end-to-end.
#[derive(Debug, Clone)]
pub struct TransitionCoordinator {
    state: TransitionState,
    tuning: GestureTuning,
    timing: TransitionTiming,
    backup: VisualBackup,
    context: Option<TransitionContext>,
    translator: Option<GestureTranslator>,
    animator: Option<Animator>,
}

impl TransitionCoordinator {
    #[must_use]
    pub fn new(tuning: GestureTuning, timing: TransitionTiming) -> Self {
        Self {
            state: TransitionState::Idle,
            tuning: tuning.clamped(),
            timing,
            backup: VisualBackup::new(),
            context: None,
            translator: None,
            animator: None,
        }
    }

    #[must_use]
    pub fn state(&self) -> TransitionState {
        self.state
    }

    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, TransitionState::Idle)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        matches!(self.state, TransitionState::Active { .. })
    }

    /// Current progress while `Active`.
    #[must_use]
    pub fn progress(&self) -> Option<f32> {
        match self.state {
            TransitionState::Active { progress } => Some(progress),
            _ => None,
        }
    }

    /// The animator driving the current transition, once started.
    #[must_use]
    pub fn animator(&self) -> Option<&Animator> {
        self.animator.as_ref()
    }

    /// Start and end frames of the hero morph, once started. `None` when no
    /// source thumbnail exists and the transition cross-dissolves instead.
    #[must_use]
    pub fn hero_frames(&self) -> Option<(Rectangle, Rectangle)> {
        let ctx = self.context.as_ref()?;
        let source = ctx.source_frame?;
        match ctx.kind {
            TransitionKind::Push => Some((source, ctx.content_frame)),
            TransitionKind::Pop | TransitionKind::InteractivePop => {
                Some((ctx.content_frame, source))
            }
        }
    }

    fn violation(&self, operation: &'static str) -> Error {
        error!(
            "transition protocol violation: {} while {}",
            operation,
            self.state.name()
        );
        Error::Protocol {
            operation,
            state: self.state.name(),
        }
    }

    /// Captures the visual backup and claims the transition slot.
    ///
    /// Valid only from `Idle`; a second `prepare` while a transition is in
    /// flight is a protocol violation and leaves all state untouched.
    pub fn prepare(&mut self, context: TransitionContext, visual: &mut VisualState) -> Result<()> {
        if !matches!(self.state, TransitionState::Idle) {
            return Err(self.violation("prepare"));
        }

        self.backup = VisualBackup::new();
        // The content moves into a transition-owned overlay layer: the source
        // thumbnail hides and the overlay escapes the safe-area management.
        self.backup.set_source_hidden(visual, true);
        self.backup
            .set_safe_area_insets(visual, iced_core::Padding::ZERO);

        self.context = Some(context);
        self.state = TransitionState::Preparing;
        debug!("transition prepared: {:?}", context.kind);
        Ok(())
    }

    /// Computes frames, builds the primary animation and goes live.
    ///
    /// Valid only from `Preparing`. Captures the current zoom scale as the
    /// translator's immutable initial zoom.
    pub fn start(&mut self, visual: &VisualState) -> Result<()> {
        if !matches!(self.state, TransitionState::Preparing) {
            return Err(self.violation("start"));
        }
        let Some(context) = self.context else {
            return Err(self.violation("start"));
        };

        self.translator = Some(GestureTranslator::new(self.tuning, visual.zoom_scale));
        self.animator = Some(Animator::new(context.kind.duration(&self.timing)));
        self.state = TransitionState::Active { progress: 0.0 };
        debug!("transition started: {:?}", context.kind);
        Ok(())
    }

    /// Applies one gesture sample to the live transition.
    ///
    /// Returns the clamped progress so the caller can mirror it elsewhere
    /// (page-control bar fades). Outside `Active` this is a silent no-op:
    /// late-arriving gesture callbacks before `start` are expected.
    pub fn update_progress(
        &mut self,
        translation: Vector,
        viewport: Size,
        visual: &mut VisualState,
    ) -> Option<f32> {
        if !self.is_active() {
            trace!(
                "gesture sample dropped while {}: {:?}",
                self.state.name(),
                translation
            );
            return None;
        }
        let Some(translator) = self.translator.as_ref() else {
            return None;
        };

        let effect = translator.translate(translation, viewport);
        self.backup.set_content_transform(
            visual,
            ContentTransform {
                translation: effect.offset,
                scale: effect.scale * translator.initial_zoom(),
            },
        );
        if let Some(animator) = self.animator.as_mut() {
            animator.set_fraction(effect.progress);
        }
        self.state = TransitionState::Active {
            progress: effect.progress,
        };
        Some(effect.progress)
    }

    /// Decides finish vs. cancel from the release velocity and drives the
    /// chosen completion. Valid only from `Active`.
    pub fn release(&mut self, velocity: Vector, visual: &mut VisualState) -> Result<ReleaseDecision> {
        if !self.is_active() {
            return Err(self.violation("release"));
        }
        let decision = decide_on_release(velocity);
        match decision {
            ReleaseDecision::Finish => self.finish(visual)?,
            ReleaseDecision::Cancel => self.cancel(visual)?,
        }
        Ok(decision)
    }

    /// Plays the animation forward to completion.
    ///
    /// Valid from `Active`. Restores every backed-up field the new steady
    /// state does not supersede, then parks in `Completed` until the owner
    /// acknowledges.
    pub fn finish(&mut self, visual: &mut VisualState) -> Result<()> {
        if !self.is_active() {
            return Err(self.violation("finish"));
        }
        self.state = TransitionState::Finishing;
        if let Some(animator) = self.animator.as_mut() {
            animator.continue_to_end();
        }
        self.backup.restore_except_content(visual);
        self.state = TransitionState::Completed;
        debug!("transition finished");
        Ok(())
    }

    /// Reverses the animation and restores every backed-up field exactly.
    ///
    /// Valid from `Active`. Always reaches `Idle`: the user observes zero
    /// residue from the aborted gesture.
    pub fn cancel(&mut self, visual: &mut VisualState) -> Result<()> {
        if !self.is_active() {
            return Err(self.violation("cancel"));
        }
        self.state = TransitionState::Cancelling;
        if let Some(animator) = self.animator.as_mut() {
            animator.reverse_to_start();
        }
        self.backup.restore(visual);
        self.reset_to_idle();
        debug!("transition cancelled");
        Ok(())
    }

    /// Returns a `Completed` coordinator to `Idle` so the next transition
    /// can be prepared. Called by the owner once the end signal is consumed.
    pub fn acknowledge_completion(&mut self) -> Result<()> {
        if !matches!(self.state, TransitionState::Completed) {
            return Err(self.violation("acknowledge_completion"));
        }
        self.reset_to_idle();
        Ok(())
    }

    fn reset_to_idle(&mut self) {
        self.state = TransitionState::Idle;
        self.backup = VisualBackup::new();
        self.context = None;
        self.translator = None;
        self.animator = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::assert_abs_diff_eq;
    use iced_core::{Padding, Point};

    fn coordinator() -> TransitionCoordinator {
        TransitionCoordinator::new(GestureTuning::default(), TransitionTiming::default())
    }

    fn context(kind: TransitionKind) -> TransitionContext {
        TransitionContext {
            kind,
            viewport: Size::new(400.0, 800.0),
            content_frame: Rectangle::new(Point::new(0.0, 0.0), Size::new(400.0, 800.0)),
            source_frame: Some(Rectangle::new(
                Point::new(10.0, 650.0),
                Size::new(80.0, 80.0),
            )),
        }
    }

    fn visual() -> VisualState {
        VisualState {
            zoom_scale: 1.5,
            safe_area_insets: Padding {
                top: 44.0,
                right: 0.0,
                bottom: 34.0,
                left: 0.0,
            },
            ..VisualState::default()
        }
    }

    #[test]
    fn prepare_start_walks_to_active() {
        let mut coordinator = coordinator();
        let mut visual = visual();

        coordinator
            .prepare(context(TransitionKind::InteractivePop), &mut visual)
            .expect("prepare");
        assert_eq!(coordinator.state(), TransitionState::Preparing);
        assert!(visual.source_hidden);

        coordinator.start(&visual).expect("start");
        assert_eq!(
            coordinator.state(),
            TransitionState::Active { progress: 0.0 }
        );
    }

    #[test]
    fn second_prepare_is_a_protocol_violation_and_leaves_state_alone() {
        let mut coordinator = coordinator();
        let mut visual = visual();

        coordinator
            .prepare(context(TransitionKind::InteractivePop), &mut visual)
            .expect("prepare");
        let before = coordinator.state();

        let err = coordinator
            .prepare(context(TransitionKind::Push), &mut visual)
            .unwrap_err();
        assert!(matches!(
            err,
            Error::Protocol {
                operation: "prepare",
                ..
            }
        ));
        assert_eq!(coordinator.state(), before);
    }

    #[test]
    fn start_without_prepare_is_a_protocol_violation() {
        let mut coordinator = coordinator();
        let err = coordinator.start(&visual()).unwrap_err();
        assert!(matches!(err, Error::Protocol { operation: "start", .. }));
        assert!(coordinator.is_idle());
    }

    #[test]
    fn update_before_start_is_a_silent_no_op() {
        let mut coordinator = coordinator();
        let mut visual = visual();
        coordinator
            .prepare(context(TransitionKind::InteractivePop), &mut visual)
            .expect("prepare");

        let progress =
            coordinator.update_progress(Vector::new(0.0, 100.0), Size::new(400.0, 800.0), &mut visual);
        assert_eq!(progress, None);
        assert_eq!(coordinator.state(), TransitionState::Preparing);
    }

    #[test]
    fn update_progress_drives_animator_and_transform() {
        let mut coordinator = coordinator();
        let mut visual = visual();
        coordinator
            .prepare(context(TransitionKind::InteractivePop), &mut visual)
            .expect("prepare");
        coordinator.start(&visual).expect("start");

        let progress = coordinator
            .update_progress(Vector::new(0.0, 200.0), Size::new(400.0, 800.0), &mut visual)
            .expect("active");
        assert_abs_diff_eq!(progress, 0.5);
        assert_abs_diff_eq!(coordinator.animator().expect("animator").fraction(), 0.5);
        assert_abs_diff_eq!(visual.content_transform.translation.y, 200.0);
        // drag scale composes with the zoom captured at prepare time
        assert_abs_diff_eq!(visual.content_transform.scale, 0.8 * 1.5);
    }

    #[test]
    fn cancel_restores_every_field_exactly() {
        let mut coordinator = coordinator();
        let original = visual();
        let mut visual = original;

        coordinator
            .prepare(context(TransitionKind::InteractivePop), &mut visual)
            .expect("prepare");
        coordinator.start(&visual).expect("start");
        coordinator.update_progress(Vector::new(40.0, 300.0), Size::new(400.0, 800.0), &mut visual);
        assert_ne!(visual, original);

        coordinator.cancel(&mut visual).expect("cancel");
        assert_eq!(visual, original);
        assert!(coordinator.is_idle());
    }

    #[test]
    fn finish_restores_chrome_but_keeps_content_state() {
        let mut coordinator = coordinator();
        let original = visual();
        let mut visual = original;

        coordinator
            .prepare(context(TransitionKind::InteractivePop), &mut visual)
            .expect("prepare");
        coordinator.start(&visual).expect("start");
        coordinator.update_progress(Vector::new(0.0, 400.0), Size::new(400.0, 800.0), &mut visual);

        coordinator.finish(&mut visual).expect("finish");
        assert_eq!(coordinator.state(), TransitionState::Completed);
        assert_eq!(visual.safe_area_insets, original.safe_area_insets);
        assert_eq!(visual.source_hidden, original.source_hidden);
        // the dragged content keeps its final transform; the dismissed viewer
        // is gone and its properties are superseded
        assert_ne!(visual.content_transform, original.content_transform);
        assert!(coordinator.animator().expect("animator").fraction() >= 1.0);
    }

    #[test]
    fn release_decision_dispatches_finish_or_cancel() {
        let mut coordinator = coordinator();
        let mut visual = visual();
        coordinator
            .prepare(context(TransitionKind::InteractivePop), &mut visual)
            .expect("prepare");
        coordinator.start(&visual).expect("start");

        let decision = coordinator
            .release(Vector::new(0.0, -50.0), &mut visual)
            .expect("release");
        assert_eq!(decision, ReleaseDecision::Cancel);
        assert!(coordinator.is_idle());
    }

    #[test]
    fn completed_coordinator_is_reusable_after_acknowledgement() {
        let mut coordinator = coordinator();
        let mut visual = visual();
        coordinator
            .prepare(context(TransitionKind::InteractivePop), &mut visual)
            .expect("prepare");
        coordinator.start(&visual).expect("start");
        coordinator.finish(&mut visual).expect("finish");

        // prepare while completed is still a violation
        assert!(coordinator
            .prepare(context(TransitionKind::Push), &mut visual)
            .is_err());

        coordinator.acknowledge_completion().expect("acknowledge");
        assert!(coordinator.is_idle());
        coordinator
            .prepare(context(TransitionKind::Push), &mut visual)
            .expect("reusable after acknowledgement");
    }

    #[test]
    fn hero_frames_orient_by_kind_and_need_a_source() {
        let mut coordinator = coordinator();
        let mut visual = visual();
        let ctx = context(TransitionKind::Pop);
        coordinator.prepare(ctx, &mut visual).expect("prepare");
        coordinator.start(&visual).expect("start");

        let (from, to) = coordinator.hero_frames().expect("frames");
        assert_eq!(from, ctx.content_frame);
        assert_eq!(to, ctx.source_frame.expect("source"));

        coordinator.cancel(&mut visual).expect("cancel");
        let mut no_source = context(TransitionKind::Pop);
        no_source.source_frame = None;
        coordinator.prepare(no_source, &mut visual).expect("prepare");
        assert_eq!(coordinator.hero_frames(), None);
    }

    #[test]
    fn animator_durations_follow_operation_kind() {
        let timing = TransitionTiming::default();
        assert_eq!(
            TransitionKind::Push.duration(&timing),
            Duration::from_millis(500)
        );
        assert_eq!(
            TransitionKind::Pop.duration(&timing),
            Duration::from_millis(350)
        );
        assert_eq!(
            TransitionKind::InteractivePop.duration(&timing),
            Duration::from_millis(250)
        );
    }
}
