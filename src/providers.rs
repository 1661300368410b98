// SPDX-License-Identifier: MPL-2.0
//! Provider capabilities the core consumes from its external collaborators.
//!
//! These are in-process contracts, not a wire protocol. Providers answer
//! synchronously or asynchronously via [`ImageSource`] and must be safe to
//! call repeatedly for the same key: idempotent, side-effect-free beyond the
//! fetch itself. Retry policy lives behind these traits, never in the core.

use crate::image_source::{ImageData, ImageSource};
use crate::paging::MediaId;
use iced_core::{Rectangle, Size};

/// Supplies full-size media and hero-transition geometry for pages.
pub trait MediaProvider {
    /// Number of pages available.
    fn count(&self) -> usize;

    /// The image for `page`.
    fn media_at(&self, page: usize) -> ImageSource;

    /// Width-over-height ratio for `page`, when known.
    fn aspect_ratio_at(&self, page: usize) -> Option<f32>;

    /// Frame of the view a hero transition should morph from/to for `page`,
    /// in window coordinates. Absent means the transition degrades to a
    /// cross-dissolve.
    fn transition_source_frame(&self, page: usize) -> Option<Rectangle>;

    /// Snapshot image of the transition source view, when one exists.
    fn transition_source_image(&self, page: usize) -> Option<ImageData>;
}

/// Supplies thumbnails for the page-control bar.
pub trait ThumbnailProvider {
    /// A thumbnail for `identifier` sized to fill `size`.
    fn thumbnail(&self, identifier: &MediaId, filling: Size) -> ImageSource;

    /// Width-over-height ratio for `identifier`, when known.
    fn aspect_ratio(&self, identifier: &MediaId) -> Option<f32>;
}
