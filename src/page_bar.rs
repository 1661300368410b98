// SPDX-License-Identifier: MPL-2.0
//! State machine for the thumbnail strip ("page control bar").
//!
//! The bar continuously expands, collapses and scrolls in lockstep with the
//! current page and with in-flight interactive transitions:
//!
//! ```text
//! collapsed(d) --scroll begins--> collapsing
//! collapsing --layout animation completes--> collapsed(nil)
//! collapsed(d) --settles on d, d not at an edge--> expanding
//! expanding --layout animation completes--> expanded
//! expanded --page selected / external page change--> expanding
//! expanded --drag begins--> collapsing
//! expanded --interactive paging starts--> transitioning-interactively
//! transitioning-interactively --finish--> expanded (page-changed emitted)
//! transitioning-interactively --cancel--> expanded (no emission)
//! expanded|reloading --start reloading--> reloading
//! reloading --finish reloading--> expanded
//! ```
//!
//! Scroll and deceleration notifications are environmental and tolerated in
//! any state (dropped with a trace log when they do not apply); the
//! interactive-paging and reload operations are API surface and report
//! protocol violations when misused.

use crate::error::{Error, Result};
use crate::events::PageChangeReason;
use crate::image_source::{FetchTicket, StaleGuard};
use crate::paging::PagingModel;
use log::{debug, error, trace};
use tokio::sync::watch;

/// Square fallback used until a real thumbnail aspect ratio is known.
pub const FALLBACK_ASPECT_RATIO: f32 = 1.0;

/// Layout transition for one interactive page step inside the bar.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BarLayoutTransition {
    from_index: usize,
    to_index: usize,
    progress: f32,
}

impl BarLayoutTransition {
    #[must_use]
    pub fn new(from_index: usize, to_index: usize) -> Self {
        Self {
            from_index,
            to_index,
            progress: 0.0,
        }
    }

    /// Sets the layout progress, clamped to `[0, 1]`.
    pub fn set_progress(&mut self, progress: f32) {
        self.progress = progress.clamp(0.0, 1.0);
    }

    #[must_use]
    pub fn progress(&self) -> f32 {
        self.progress
    }

    #[must_use]
    pub fn from_index(&self) -> usize {
        self.from_index
    }

    #[must_use]
    pub fn to_index(&self) -> usize {
        self.to_index
    }
}

/// The bar's current state. Initial and terminal state is `Collapsed(None)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BarState {
    /// Collapse layout animation in flight.
    Collapsing,
    /// Fully collapsed; optionally holding the projected landing index of an
    /// in-flight scroll whose expansion is deferred.
    Collapsed {
        final_destination: Option<usize>,
    },
    /// Expand layout animation in flight.
    Expanding,
    /// Fully expanded around the current page.
    Expanded,
    /// An interactive page step is driving the layout.
    TransitioningInteractively {
        transition: BarLayoutTransition,
        forwards: bool,
    },
    /// A reload owns the bar; only the vanish animation may run.
    Reloading,
}

impl BarState {
    /// Short name for logs and protocol-violation reports.
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            BarState::Collapsing => "collapsing",
            BarState::Collapsed { .. } => "collapsed",
            BarState::Expanding => "expanding",
            BarState::Expanded => "expanded",
            BarState::TransitioningInteractively { .. } => "transitioning interactively",
            BarState::Reloading => "reloading",
        }
    }

    fn phase(&self) -> BarPhase {
        match self {
            BarState::Collapsing => BarPhase::Collapsing,
            BarState::Collapsed { .. } => BarPhase::Collapsed,
            BarState::Expanding => BarPhase::Expanding,
            BarState::Expanded => BarPhase::Expanded,
            BarState::TransitioningInteractively { .. } => BarPhase::Interactive,
            BarState::Reloading => BarPhase::Reloading,
        }
    }
}

/// Coarse phase published to reload barriers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarPhase {
    Collapsing,
    Collapsed,
    Expanding,
    Expanded,
    Interactive,
    Reloading,
}

impl BarPhase {
    /// States in which reload logic may safely claim the bar.
    #[must_use]
    pub fn is_ready(self) -> bool {
        matches!(self, BarPhase::Expanded | BarPhase::Reloading)
    }
}

/// What a bar operation asks the facade to do.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BarEffect {
    /// Nothing to propagate.
    None,
    /// The bar settled on a page; the facade updates the model and emits.
    PageChanged {
        page: usize,
        reason: PageChangeReason,
    },
}

/// Barrier resolving once the bar reaches a reload-ready state.
///
/// Obtained from [`PageControlBarEngine::try_start_reloading`] when the bar
/// is mid-transition. Await [`ReloadBarrier::wait_ready`], then retry the
/// claim; the watch channel stores the latest phase, so a bar that became
/// ready before the await resolves immediately.
#[derive(Debug)]
pub struct ReloadBarrier {
    rx: watch::Receiver<BarPhase>,
}

impl ReloadBarrier {
    /// Suspends until the bar is in a reload-ready state.
    pub async fn wait_ready(&mut self) {
        // An error means the engine was dropped; resuming is harmless since
        // the retried claim has nothing left to mutate.
        let _ = self.rx.wait_for(|phase| phase.is_ready()).await;
    }
}

/// State machine owning the page-control bar's layout lifecycle.
#[derive(Debug)]
pub struct PageControlBarEngine {
    state: BarState,
    phase_tx: watch::Sender<BarPhase>,
    /// Landing index remembered while a collapse animation finishes.
    deferred_destination: Option<usize>,
    /// Bar alpha mirrored from the viewer's in-flight transition progress.
    mirror_alpha: f32,
    /// Centered thumbnail aspect ratio; square until corrected.
    thumbnail_aspect: f32,
    guard: StaleGuard,
}

impl Default for PageControlBarEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl PageControlBarEngine {
    #[must_use]
    pub fn new() -> Self {
        let (phase_tx, _) = watch::channel(BarPhase::Collapsed);
        Self {
            state: BarState::Collapsed {
                final_destination: None,
            },
            phase_tx,
            deferred_destination: None,
            mirror_alpha: 1.0,
            thumbnail_aspect: FALLBACK_ASPECT_RATIO,
            guard: StaleGuard::new(),
        }
    }

    #[must_use]
    pub fn state(&self) -> BarState {
        self.state
    }

    #[must_use]
    pub fn is_expanded(&self) -> bool {
        matches!(self.state, BarState::Expanded)
    }

    #[must_use]
    pub fn is_transitioning_interactively(&self) -> bool {
        matches!(self.state, BarState::TransitioningInteractively { .. })
    }

    /// Bar alpha mirroring the viewer's transition progress.
    #[must_use]
    pub fn mirror_alpha(&self) -> f32 {
        self.mirror_alpha
    }

    /// Centered thumbnail aspect ratio (square until corrected).
    #[must_use]
    pub fn thumbnail_aspect(&self) -> f32 {
        self.thumbnail_aspect
    }

    /// A watch on the bar's coarse phase.
    #[must_use]
    pub fn phase_watch(&self) -> watch::Receiver<BarPhase> {
        self.phase_tx.subscribe()
    }

    fn set_state(&mut self, state: BarState) {
        trace!("bar: {} -> {}", self.state.name(), state.name());
        self.state = state;
        let _ = self.phase_tx.send_replace(state.phase());
    }

    fn violation(&self, operation: &'static str) -> Error {
        error!(
            "bar protocol violation: {} while {}",
            operation,
            self.state.name()
        );
        Error::Protocol {
            operation,
            state: self.state.name(),
        }
    }

    // ─── scrolling ────────────────────────────────────────────────────────

    /// A scroll or drag began on the bar.
    pub fn scroll_began(&mut self) {
        match self.state {
            BarState::Collapsed { .. } | BarState::Expanded | BarState::Expanding => {
                self.deferred_destination = None;
                self.set_state(BarState::Collapsing);
            }
            _ => trace!("scroll began ignored while {}", self.state.name()),
        }
    }

    /// The collapse layout animation completed.
    pub fn collapse_finished(&mut self) {
        if matches!(self.state, BarState::Collapsing) {
            let final_destination = self.deferred_destination.take();
            self.set_state(BarState::Collapsed { final_destination });
        } else {
            trace!("collapse finish ignored while {}", self.state.name());
        }
    }

    /// The scroll's projected landing index became known.
    ///
    /// Non-edge destinations expand eagerly to avoid a visible
    /// settle-then-expand delay. Edge destinations defer expansion until
    /// deceleration actually finishes, because edge positions can bounce
    /// past the true destination.
    pub fn scroll_destination_known(&mut self, destination: usize, model: &PagingModel) -> BarEffect {
        match self.state {
            BarState::Collapsing => {
                if model.is_edge_index(destination) {
                    self.deferred_destination = Some(destination);
                    BarEffect::None
                } else {
                    self.expand_towards(destination)
                }
            }
            BarState::Collapsed { .. } => {
                if model.is_edge_index(destination) {
                    self.set_state(BarState::Collapsed {
                        final_destination: Some(destination),
                    });
                    BarEffect::None
                } else {
                    self.expand_towards(destination)
                }
            }
            _ => {
                trace!("scroll destination ignored while {}", self.state.name());
                BarEffect::None
            }
        }
    }

    /// Deceleration fully stopped on `landing`.
    pub fn deceleration_finished(&mut self, landing: usize, model: &PagingModel) -> BarEffect {
        match self.state {
            BarState::Collapsing | BarState::Collapsed { .. } => {
                if model.identifier_at(landing).is_none() {
                    trace!("deceleration landing {} out of bounds", landing);
                    return BarEffect::None;
                }
                self.deferred_destination = None;
                self.expand_towards(landing)
            }
            _ => BarEffect::None,
        }
    }

    fn expand_towards(&mut self, destination: usize) -> BarEffect {
        self.guard.invalidate();
        self.thumbnail_aspect = FALLBACK_ASPECT_RATIO;
        self.set_state(BarState::Expanding);
        BarEffect::PageChanged {
            page: destination,
            reason: PageChangeReason::ScrollingBar,
        }
    }

    /// The expand layout animation completed.
    pub fn expand_finished(&mut self) {
        if matches!(self.state, BarState::Expanding) {
            self.set_state(BarState::Expanded);
        } else {
            trace!("expand finish ignored while {}", self.state.name());
        }
    }

    // ─── page selection ───────────────────────────────────────────────────

    /// The user tapped the thumbnail at `index`.
    pub fn page_selected(&mut self, index: usize, model: &PagingModel) -> BarEffect {
        if !matches!(self.state, BarState::Expanded) {
            trace!("tap ignored while {}", self.state.name());
            return BarEffect::None;
        }
        if model.identifier_at(index).is_none() {
            trace!("tap on out-of-bounds index {}", index);
            return BarEffect::None;
        }
        self.guard.invalidate();
        self.thumbnail_aspect = FALLBACK_ASPECT_RATIO;
        self.set_state(BarState::Expanding);
        BarEffect::PageChanged {
            page: index,
            reason: PageChangeReason::TapOnThumbnail,
        }
    }

    /// The viewer changed pages without bar interaction; the bar re-centers.
    pub fn external_page_changed(&mut self) {
        if matches!(self.state, BarState::Expanded) {
            self.guard.invalidate();
            self.thumbnail_aspect = FALLBACK_ASPECT_RATIO;
            self.set_state(BarState::Expanding);
        }
    }

    // ─── interactive paging ───────────────────────────────────────────────

    /// Starts an interactive page step from the current page.
    ///
    /// Valid only while `Expanded`. When no neighbor page exists in the
    /// requested direction this is a no-op: the bar stays `Expanded` and no
    /// transition begins.
    pub fn start_interactive_paging(
        &mut self,
        forwards: bool,
        model: &PagingModel,
    ) -> Result<()> {
        if !matches!(self.state, BarState::Expanded) {
            return Err(self.violation("start_interactive_paging"));
        }
        let Some(current) = model.current_index() else {
            return Err(Error::Paging("no current page".to_string()));
        };
        let Some(target) = model.neighbor(current, forwards) else {
            debug!("interactive paging at sequence edge, staying expanded");
            return Ok(());
        };
        self.set_state(BarState::TransitioningInteractively {
            transition: BarLayoutTransition::new(current, target),
            forwards,
        });
        Ok(())
    }

    /// Updates the in-flight interactive layout progress.
    ///
    /// Silently dropped outside `TransitioningInteractively`; late gesture
    /// callbacks around the start/finish boundaries are expected.
    pub fn set_interactive_progress(&mut self, progress: f32) {
        match &mut self.state {
            BarState::TransitioningInteractively { transition, .. } => {
                transition.set_progress(progress);
            }
            _ => trace!("interactive progress dropped while {}", self.state.name()),
        }
    }

    /// Completes the interactive page step.
    ///
    /// Emits the page change for the target index. Idempotent once the bar
    /// is back in `Expanded`: repeated calls have no further effect.
    pub fn finish_interactive_paging(&mut self) -> BarEffect {
        match self.state {
            BarState::TransitioningInteractively { transition, .. } => {
                self.guard.invalidate();
                self.thumbnail_aspect = FALLBACK_ASPECT_RATIO;
                self.set_state(BarState::Expanded);
                BarEffect::PageChanged {
                    page: transition.to_index(),
                    reason: PageChangeReason::InteractivePaging,
                }
            }
            BarState::Expanded => BarEffect::None,
            _ => {
                trace!("interactive finish ignored while {}", self.state.name());
                BarEffect::None
            }
        }
    }

    /// Abandons the interactive page step with no emission.
    pub fn cancel_interactive_paging(&mut self) -> BarEffect {
        match self.state {
            BarState::TransitioningInteractively { .. } => {
                self.set_state(BarState::Expanded);
                BarEffect::None
            }
            BarState::Expanded => BarEffect::None,
            _ => {
                trace!("interactive cancel ignored while {}", self.state.name());
                BarEffect::None
            }
        }
    }

    // ─── mirrored fades ───────────────────────────────────────────────────

    /// Mirrors the viewer's transition progress onto the bar alpha.
    ///
    /// Progress `0` restores full opacity, so a cancelled viewer transition
    /// reports `0.0` here to clear the fade.
    pub fn mirror_transition_progress(&mut self, progress: f32) {
        self.mirror_alpha = (1.0 - progress).clamp(0.0, 1.0);
    }

    // ─── reloading ────────────────────────────────────────────────────────

    /// Claims the bar for a reload when it is in a ready state.
    ///
    /// Otherwise returns a [`ReloadBarrier`]; await it and retry so reload
    /// logic never runs against a mid-transition layout. The
    /// wait-then-retry pair is the cooperative equivalent of "wait until
    /// ready, then atomically claim".
    pub fn try_start_reloading(&mut self) -> std::result::Result<(), ReloadBarrier> {
        if self.state.phase().is_ready() {
            self.guard.invalidate();
            self.set_state(BarState::Reloading);
            Ok(())
        } else {
            Err(ReloadBarrier {
                rx: self.phase_tx.subscribe(),
            })
        }
    }

    /// Runs the vanish animation body; valid only while `Reloading`.
    pub fn perform_vanish_animation<R>(&mut self, body: impl FnOnce() -> R) -> Result<R> {
        if !matches!(self.state, BarState::Reloading) {
            return Err(self.violation("perform_vanish_animation"));
        }
        Ok(body())
    }

    /// Ends the reload; the bar re-expands around the (possibly new) page.
    pub fn finish_reloading(&mut self) -> Result<()> {
        if !matches!(self.state, BarState::Reloading) {
            return Err(self.violation("finish_reloading"));
        }
        self.thumbnail_aspect = FALLBACK_ASPECT_RATIO;
        self.set_state(BarState::Expanded);
        Ok(())
    }

    // ─── aspect-ratio correction ──────────────────────────────────────────

    /// Issues a ticket for an asynchronous aspect-ratio request targeting
    /// the currently centered page. `None` when no page is centered.
    #[must_use]
    pub fn begin_aspect_correction(&self, model: &PagingModel) -> Option<FetchTicket> {
        model
            .current_identifier()
            .map(|id| self.guard.issue(id.clone()))
    }

    /// Applies a resolved aspect ratio if the ticket is still current.
    ///
    /// Returns whether the correction was applied; a stale result (centered
    /// page changed since the request) is discarded. An absent ratio falls
    /// back to square.
    pub fn apply_aspect_correction(
        &mut self,
        ticket: &FetchTicket,
        ratio: Option<f32>,
        model: &PagingModel,
    ) -> bool {
        if !self.guard.is_current(ticket, model.current_identifier()) {
            return false;
        }
        self.thumbnail_aspect = match ratio {
            Some(r) if r.is_finite() && r > 0.0 => r,
            _ => FALLBACK_ASPECT_RATIO,
        };
        true
    }
}
