// SPDX-License-Identifier: MPL-2.0
//! Shared helpers for tests.
//!
//! The gesture and transition math is all `f32`, so tests compare results
//! with the `approx` macros instead of `assert_eq!`.

pub use approx::{assert_abs_diff_eq, assert_relative_eq};

use crate::paging::MediaId;

/// Builds a sequence of distinct identifiers `media-0 .. media-(count-1)`.
#[must_use]
pub fn media_ids(count: usize) -> Vec<MediaId> {
    (0..count)
        .map(|i| MediaId::from(format!("media-{}", i)))
        .collect()
}
