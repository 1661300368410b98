// SPDX-License-Identifier: MPL-2.0
//! Facade wiring gesture and page-change events between the transition
//! coordinator and the page-control bar engine.
//!
//! The facade owns the [`PagingModel`], the [`TransitionCoordinator`], the
//! [`PageControlBarEngine`], the viewer's [`VisualState`] and the outbound
//! event queue. Everything runs on the caller's single logical thread: each
//! recognizer callback or bar notification is one event fed into the same
//! serialized machinery. The model is replaced only between transitions.

use crate::config::{GestureTuning, TransitionTiming};
use crate::error::{Error, Result};
use crate::events::{EventQueue, PageChange, PageChangeReason};
use crate::gesture::ReleaseDecision;
use crate::image_source::{FetchTicket, ImageSource, StaleGuard};
use crate::page_bar::{BarEffect, PageControlBarEngine, ReloadBarrier};
use crate::paging::{MediaId, PagingModel};
use crate::providers::{MediaProvider, ThumbnailProvider};
use crate::transition::{TransitionContext, TransitionCoordinator, TransitionKind};
use crate::visual::VisualState;
use iced_core::{Rectangle, Size, Vector};

/// One sample of a continuous drag gesture.
///
/// The recognizer's five terminal/continuous cases map onto
/// [`GesturePhase`]; `Began` is handled separately by
/// [`ViewerCoordinator::begin_dismissal`] because it carries the transition
/// context.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GestureSample {
    pub phase: GesturePhase,
    pub translation: Vector,
    pub velocity: Vector,
    pub viewport: Size,
}

/// Continuation or terminal state of a drag gesture.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GesturePhase {
    Changed,
    Ended,
    Cancelled,
    Failed,
}

/// Entry point hosts embed: owns the coordination state and exposes the
/// serialized operations of the core.
#[derive(Debug)]
pub struct ViewerCoordinator {
    model: PagingModel,
    transition: TransitionCoordinator,
    bar: PageControlBarEngine,
    events: EventQueue,
    visual: VisualState,
    /// Guard for full-size media fetches; superseded on every page change.
    fetch_guard: StaleGuard,
}

impl Default for ViewerCoordinator {
    fn default() -> Self {
        Self::new(GestureTuning::default(), TransitionTiming::default())
    }
}

impl ViewerCoordinator {
    #[must_use]
    pub fn new(tuning: GestureTuning, timing: TransitionTiming) -> Self {
        Self {
            model: PagingModel::new(),
            transition: TransitionCoordinator::new(tuning, timing),
            bar: PageControlBarEngine::new(),
            events: EventQueue::new(),
            visual: VisualState::default(),
            fetch_guard: StaleGuard::new(),
        }
    }

    // ─── read access ──────────────────────────────────────────────────────

    #[must_use]
    pub fn model(&self) -> &PagingModel {
        &self.model
    }

    #[must_use]
    pub fn bar(&self) -> &PageControlBarEngine {
        &self.bar
    }

    #[must_use]
    pub fn transition(&self) -> &TransitionCoordinator {
        &self.transition
    }

    #[must_use]
    pub fn visual(&self) -> &VisualState {
        &self.visual
    }

    /// Replaces the viewer's visual state wholesale.
    ///
    /// Only valid between transitions; a transition owns the visual state
    /// while it is in flight.
    pub fn sync_visual(&mut self, visual: VisualState) -> Result<()> {
        if !self.transition.is_idle() {
            return Err(Error::Protocol {
                operation: "sync_visual",
                state: "transition in flight",
            });
        }
        self.visual = visual;
        Ok(())
    }

    // ─── configuration and loading ────────────────────────────────────────

    fn guard_model_replacement(&self, operation: &'static str) -> Result<()> {
        if !self.transition.is_idle() {
            return Err(Error::Protocol {
                operation,
                state: "transition in flight",
            });
        }
        if self.bar.is_transitioning_interactively() {
            return Err(Error::Protocol {
                operation,
                state: "bar transitioning interactively",
            });
        }
        Ok(())
    }

    /// Configures the viewer with its initial media sequence.
    ///
    /// Emits `page_did_change` with the `Configuration` reason.
    pub fn configure(&mut self, identifiers: Vec<MediaId>, current: Option<usize>) -> Result<()> {
        self.guard_model_replacement("configure")?;
        self.model.reset(identifiers, current)?;
        self.fetch_guard.invalidate();
        self.events.reset_dedup();
        if let Some(page) = current {
            self.events.emit(page, PageChangeReason::Configuration);
        }
        Ok(())
    }

    /// Replaces the media sequence wholesale after a reload.
    ///
    /// Emits `page_did_change` with the `Load` reason when a page is
    /// current after the swap. Diffing old vs. new sequences for animated
    /// insert/remove is the rendering layer's concern.
    pub fn load(&mut self, identifiers: Vec<MediaId>) -> Result<()> {
        self.guard_model_replacement("load")?;
        self.model.replace(identifiers)?;
        self.fetch_guard.invalidate();
        if let Some(page) = self.model.current_index() {
            self.events.emit(page, PageChangeReason::Load);
        }
        Ok(())
    }

    // ─── interactive dismissal ────────────────────────────────────────────

    /// Begins a gesture-driven dismissal: prepares the transition, captures
    /// the visual backup and goes live.
    pub fn begin_dismissal(&mut self, context: TransitionContext) -> Result<()> {
        self.transition.prepare(context, &mut self.visual)?;
        self.transition.start(&self.visual)?;
        self.bar.mirror_transition_progress(0.0);
        Ok(())
    }

    /// Feeds one gesture sample into the serialized machinery.
    ///
    /// `Changed` updates progress and mirrors it onto the bar; `Ended`
    /// decides finish vs. cancel by release velocity; `Cancelled`/`Failed`
    /// always cancel. Samples arriving while no transition is active are
    /// silently dropped.
    pub fn handle_gesture(&mut self, sample: GestureSample) -> Result<Option<ReleaseDecision>> {
        match sample.phase {
            GesturePhase::Changed => {
                if let Some(progress) = self.transition.update_progress(
                    sample.translation,
                    sample.viewport,
                    &mut self.visual,
                ) {
                    self.bar.mirror_transition_progress(progress);
                }
                Ok(None)
            }
            GesturePhase::Ended => {
                if !self.transition.is_active() {
                    return Ok(None);
                }
                let decision = self.transition.release(sample.velocity, &mut self.visual)?;
                match decision {
                    ReleaseDecision::Finish => {
                        self.transition.acknowledge_completion()?;
                    }
                    ReleaseDecision::Cancel => {
                        self.bar.mirror_transition_progress(0.0);
                    }
                }
                Ok(Some(decision))
            }
            GesturePhase::Cancelled | GesturePhase::Failed => {
                if !self.transition.is_active() {
                    return Ok(None);
                }
                self.transition.cancel(&mut self.visual)?;
                self.bar.mirror_transition_progress(0.0);
                Ok(Some(ReleaseDecision::Cancel))
            }
        }
    }

    // ─── page-control bar ─────────────────────────────────────────────────

    pub fn bar_scroll_began(&mut self) {
        self.bar.scroll_began();
    }

    pub fn bar_collapse_finished(&mut self) {
        self.bar.collapse_finished();
    }

    pub fn bar_scroll_destination_known(&mut self, destination: usize) -> Result<()> {
        let effect = self.bar.scroll_destination_known(destination, &self.model);
        self.apply_bar_effect(effect)
    }

    pub fn bar_deceleration_finished(&mut self, landing: usize) -> Result<()> {
        let effect = self.bar.deceleration_finished(landing, &self.model);
        self.apply_bar_effect(effect)
    }

    pub fn bar_expand_finished(&mut self) {
        self.bar.expand_finished();
    }

    /// The user tapped the thumbnail at `index`.
    pub fn select_page(&mut self, index: usize) -> Result<()> {
        let effect = self.bar.page_selected(index, &self.model);
        self.apply_bar_effect(effect)
    }

    /// The viewer changed pages without bar interaction; re-centers the bar.
    pub fn page_changed_externally(&mut self, index: usize) -> Result<()> {
        self.model.set_current_index(index)?;
        self.fetch_guard.invalidate();
        self.bar.external_page_changed();
        Ok(())
    }

    // ─── interactive paging ───────────────────────────────────────────────

    pub fn start_interactive_paging(&mut self, forwards: bool) -> Result<()> {
        self.bar.start_interactive_paging(forwards, &self.model)
    }

    pub fn set_interactive_paging_progress(&mut self, progress: f32) {
        self.bar.set_interactive_progress(progress);
    }

    pub fn finish_interactive_paging(&mut self) -> Result<()> {
        let effect = self.bar.finish_interactive_paging();
        self.apply_bar_effect(effect)
    }

    pub fn cancel_interactive_paging(&mut self) -> Result<()> {
        let effect = self.bar.cancel_interactive_paging();
        self.apply_bar_effect(effect)
    }

    // ─── reloading ────────────────────────────────────────────────────────

    /// Claims the bar for reload logic, or returns a barrier to await.
    pub fn try_start_reloading(&mut self) -> std::result::Result<(), ReloadBarrier> {
        self.bar.try_start_reloading()
    }

    /// Runs the vanish animation body; valid only while reloading.
    pub fn perform_vanish_animation<R>(&mut self, body: impl FnOnce() -> R) -> Result<R> {
        self.bar.perform_vanish_animation(body)
    }

    pub fn finish_reloading(&mut self) -> Result<()> {
        self.bar.finish_reloading()
    }

    // ─── thumbnail aspect correction ──────────────────────────────────────

    /// Issues a stale-guard ticket for an async aspect-ratio request
    /// targeting the currently centered page.
    #[must_use]
    pub fn begin_aspect_correction(&self) -> Option<FetchTicket> {
        self.bar.begin_aspect_correction(&self.model)
    }

    /// Applies a resolved aspect ratio unless the centered page changed in
    /// the meantime; returns whether it was applied.
    pub fn apply_aspect_correction(&mut self, ticket: &FetchTicket, ratio: Option<f32>) -> bool {
        self.bar.apply_aspect_correction(ticket, ratio, &self.model)
    }

    // ─── media fetching ───────────────────────────────────────────────────

    /// Starts a fetch of the current page's full-size media.
    ///
    /// Returns the source plus a ticket to validate with [`Self::accept_fetch`]
    /// after awaiting; `None` when no page is current.
    #[must_use]
    pub fn begin_media_fetch(
        &self,
        provider: &impl MediaProvider,
    ) -> Option<(FetchTicket, ImageSource)> {
        let page = self.model.current_index()?;
        let id = self.model.current_identifier()?;
        Some((self.fetch_guard.issue(id.clone()), provider.media_at(page)))
    }

    /// Starts a fetch of the current page's bar thumbnail.
    #[must_use]
    pub fn begin_thumbnail_fetch(
        &self,
        provider: &impl ThumbnailProvider,
        filling: Size,
    ) -> Option<(FetchTicket, ImageSource)> {
        let id = self.model.current_identifier()?;
        Some((self.fetch_guard.issue(id.clone()), provider.thumbnail(id, filling)))
    }

    /// Whether a resolved fetch may still be applied to the viewer.
    #[must_use]
    pub fn accept_fetch(&self, ticket: &FetchTicket) -> bool {
        self.fetch_guard
            .is_current(ticket, self.model.current_identifier())
    }

    /// Builds the dismissal context for the current page, taking the hero
    /// source frame from the provider. An absent frame degrades the
    /// transition to a cross-dissolve.
    #[must_use]
    pub fn dismissal_context(
        &self,
        provider: &impl MediaProvider,
        viewport: Size,
        content_frame: Rectangle,
    ) -> TransitionContext {
        let source_frame = self
            .model
            .current_index()
            .and_then(|page| provider.transition_source_frame(page));
        TransitionContext {
            kind: TransitionKind::InteractivePop,
            viewport,
            content_frame,
            source_frame,
        }
    }

    // ─── outbound events ──────────────────────────────────────────────────

    /// Pops the oldest pending `page_did_change` event.
    pub fn poll_event(&mut self) -> Option<PageChange> {
        self.events.pop()
    }

    /// Drains every pending event in emission order.
    pub fn drain_events(&mut self) -> Vec<PageChange> {
        self.events.drain()
    }

    fn apply_bar_effect(&mut self, effect: BarEffect) -> Result<()> {
        match effect {
            BarEffect::None => Ok(()),
            BarEffect::PageChanged { page, reason } => {
                self.model.set_current_index(page)?;
                self.fetch_guard.invalidate();
                self.events.emit(page, reason);
                Ok(())
            }
        }
    }
}
