// SPDX-License-Identifier: MPL-2.0
//! Image capability values and the stale-result discipline.
//!
//! An [`ImageSource`] is either an image available now or an image available
//! later through a cancelable fetch, with a declared cross-fade to apply once
//! it resolves after first paint. Consumers must capture a [`FetchTicket`]
//! *before* awaiting and validate it with [`StaleGuard::is_current`] on
//! resolution; a result whose page or epoch has since changed is discarded,
//! never applied. This check is mandatory at every await boundary that
//! touches transition- or bar-owned visual state.

use crate::paging::MediaId;
use futures_util::future::BoxFuture;
use log::debug;
use std::fmt;
use std::sync::Arc;
use std::time::Duration;

/// Decoded RGBA image, cheap to clone.
#[derive(Debug, Clone)]
pub struct ImageData {
    pub width: u32,
    pub height: u32,
    rgba_bytes: Arc<Vec<u8>>,
}

impl ImageData {
    /// Creates an image from RGBA pixels.
    #[must_use]
    pub fn from_rgba(width: u32, height: u32, pixels: Vec<u8>) -> Self {
        Self {
            width,
            height,
            rgba_bytes: Arc::new(pixels),
        }
    }

    /// Returns a reference to the RGBA bytes.
    #[must_use]
    pub fn rgba_bytes(&self) -> &[u8] {
        &self.rgba_bytes
    }

    /// Width-over-height ratio, when both dimensions are non-zero.
    #[must_use]
    pub fn aspect_ratio(&self) -> Option<f32> {
        if self.width == 0 || self.height == 0 {
            return None;
        }
        Some(self.width as f32 / self.height as f32)
    }
}

impl PartialEq for ImageData {
    fn eq(&self, other: &Self) -> bool {
        self.width == other.width
            && self.height == other.height
            && Arc::ptr_eq(&self.rgba_bytes, &other.rgba_bytes)
    }
}

/// Easing applied to a late-resolving image's cross-fade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CrossFadeEasing {
    #[default]
    Linear,
    EaseIn,
    EaseOut,
    EaseInOut,
}

/// The cross-fade a consumer applies when an async image resolves after
/// first paint.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CrossFadeSpec {
    pub duration: Duration,
    pub easing: CrossFadeEasing,
}

impl Default for CrossFadeSpec {
    fn default() -> Self {
        Self {
            duration: Duration::from_millis(200),
            easing: CrossFadeEasing::Linear,
        }
    }
}

/// A cancelable image fetch: dropping the future cancels it.
pub type ImageFetch = BoxFuture<'static, Option<ImageData>>;

/// An image available now, or later via an asynchronous fetch.
pub enum ImageSource {
    /// Image available immediately (possibly absent).
    Sync(Option<ImageData>),
    /// Image arriving later; the cross-fade applies on resolution.
    Async {
        cross_fade: CrossFadeSpec,
        fetch: ImageFetch,
    },
}

impl ImageSource {
    /// A source with no image at all.
    #[must_use]
    pub fn empty() -> Self {
        ImageSource::Sync(None)
    }

    /// A source resolved up front.
    #[must_use]
    pub fn resolved(image: ImageData) -> Self {
        ImageSource::Sync(Some(image))
    }

    /// A deferred source with its declared cross-fade.
    #[must_use]
    pub fn deferred(cross_fade: CrossFadeSpec, fetch: ImageFetch) -> Self {
        ImageSource::Async { cross_fade, fetch }
    }

    /// True when the image requires awaiting.
    #[must_use]
    pub fn is_async(&self) -> bool {
        matches!(self, ImageSource::Async { .. })
    }

    /// Resolves the source to an image plus the cross-fade to apply.
    ///
    /// Sync sources resolve immediately with no cross-fade. A fetch failure
    /// surfaces as an absent image, never an error; retry policy belongs to
    /// the provider.
    pub async fn resolve(self) -> (Option<ImageData>, Option<CrossFadeSpec>) {
        match self {
            ImageSource::Sync(image) => (image, None),
            ImageSource::Async { cross_fade, fetch } => (fetch.await, Some(cross_fade)),
        }
    }
}

impl fmt::Debug for ImageSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ImageSource::Sync(image) => f.debug_tuple("Sync").field(image).finish(),
            ImageSource::Async { cross_fade, .. } => f
                .debug_struct("Async")
                .field("cross_fade", cross_fade)
                .finish_non_exhaustive(),
        }
    }
}

/// Ticket capturing what a fetch was initiated for.
///
/// Captured before the await; validated after it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchTicket {
    id: MediaId,
    epoch: u64,
}

impl FetchTicket {
    /// The identifier the fetch targets.
    #[must_use]
    pub fn id(&self) -> &MediaId {
        &self.id
    }
}

/// Epoch-based guard deciding whether a resolved result may still be applied.
///
/// The owning component bumps the epoch whenever the state a pending fetch
/// targeted is superseded (page change, reload, teardown). A ticket is
/// current only if its epoch matches and its identifier is still the one of
/// interest.
#[derive(Debug, Clone, Default)]
pub struct StaleGuard {
    epoch: u64,
}

impl StaleGuard {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Issues a ticket for a fetch targeting `id`.
    #[must_use]
    pub fn issue(&self, id: MediaId) -> FetchTicket {
        FetchTicket {
            id,
            epoch: self.epoch,
        }
    }

    /// Supersedes every outstanding ticket.
    pub fn invalidate(&mut self) {
        self.epoch = self.epoch.wrapping_add(1);
    }

    /// Whether a resolved result for `ticket` may be applied, given the
    /// identifier currently of interest (`None` when the component no longer
    /// displays anything).
    #[must_use]
    pub fn is_current(&self, ticket: &FetchTicket, current: Option<&MediaId>) -> bool {
        let fresh = ticket.epoch == self.epoch && current == Some(&ticket.id);
        if !fresh {
            debug!("stale fetch result dropped for {}", ticket.id);
        }
        fresh
    }
}
