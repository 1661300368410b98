// SPDX-License-Identifier: MPL-2.0
//! `hero_gallery` is the coordination core of a paginated, zoomable media
//! gallery: hero push/pop transitions, gesture-driven interactive dismissal,
//! and a thumbnail page-control bar kept in lockstep with the viewer.
//!
//! Rendering, layout and media storage are external collaborators reached
//! through the [`providers`] traits; this crate owns the state machines,
//! the gesture-to-progress mapping and the cross-component synchronization.

pub mod config;
pub mod error;
pub mod events;
pub mod facade;
pub mod gesture;
pub mod image_source;
pub mod page_bar;
pub mod paging;
pub mod providers;
pub mod transition;
pub mod visual;

#[cfg(test)]
pub mod test_utils;

pub use error::{Error, Result};
pub use facade::ViewerCoordinator;
