// SPDX-License-Identifier: MPL-2.0
//! Mutable visual state of the viewer and its exact-restore backup.
//!
//! A transition temporarily mutates view properties (visibility, alpha,
//! safe-area insets, bar appearance, zoom, content transform). Every
//! mutation goes through [`VisualBackup`], which records the pre-transition
//! value the first time a field is touched. Cancellation replays the backup
//! verbatim, so an aborted gesture leaves zero visible residue; capture and
//! restore are symmetric by construction.

use iced_core::{Padding, Vector};

/// Affine transform applied to the dragged content: translation then
/// uniform scale.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ContentTransform {
    pub translation: Vector,
    pub scale: f32,
}

impl ContentTransform {
    /// The identity transform.
    pub const IDENTITY: Self = Self {
        translation: Vector::new(0.0, 0.0),
        scale: 1.0,
    };
}

impl Default for ContentTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// The view properties a transition is allowed to mutate.
///
/// Owned by the host; borrowed by the coordinator for the duration of one
/// transition. No other component may mutate it mid-transition.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct VisualState {
    /// Whether the source thumbnail is hidden (the overlay owns the image).
    pub source_hidden: bool,
    /// Alpha of the transitioning content.
    pub content_alpha: f32,
    /// Transform of the transitioning content.
    pub content_transform: ContentTransform,
    /// Zoom scale of the full-screen viewer.
    pub zoom_scale: f32,
    /// Safe-area insets applied to the viewer.
    pub safe_area_insets: Padding,
    /// Alpha of the page-control / tab bar.
    pub bar_alpha: f32,
    /// Whether the toolbar items are hidden.
    pub toolbar_hidden: bool,
}

impl Default for VisualState {
    fn default() -> Self {
        Self {
            source_hidden: false,
            content_alpha: 1.0,
            content_transform: ContentTransform::IDENTITY,
            zoom_scale: 1.0,
            safe_area_insets: Padding::ZERO,
            bar_alpha: 1.0,
            toolbar_hidden: false,
        }
    }
}

/// Snapshot of the fields a transition actually mutated.
///
/// Fields are captured lazily: a field that was never written through the
/// backup is never restored, and a field that was written is restored to its
/// value immediately before the first write.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct VisualBackup {
    source_hidden: Option<bool>,
    content_alpha: Option<f32>,
    content_transform: Option<ContentTransform>,
    zoom_scale: Option<f32>,
    safe_area_insets: Option<Padding>,
    bar_alpha: Option<f32>,
    toolbar_hidden: Option<bool>,
}

impl VisualBackup {
    /// Creates an empty backup with nothing captured.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// True when no field has been mutated through this backup.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    pub fn set_source_hidden(&mut self, state: &mut VisualState, value: bool) {
        self.source_hidden.get_or_insert(state.source_hidden);
        state.source_hidden = value;
    }

    pub fn set_content_alpha(&mut self, state: &mut VisualState, value: f32) {
        self.content_alpha.get_or_insert(state.content_alpha);
        state.content_alpha = value;
    }

    pub fn set_content_transform(&mut self, state: &mut VisualState, value: ContentTransform) {
        self.content_transform.get_or_insert(state.content_transform);
        state.content_transform = value;
    }

    pub fn set_zoom_scale(&mut self, state: &mut VisualState, value: f32) {
        self.zoom_scale.get_or_insert(state.zoom_scale);
        state.zoom_scale = value;
    }

    pub fn set_safe_area_insets(&mut self, state: &mut VisualState, value: Padding) {
        self.safe_area_insets.get_or_insert(state.safe_area_insets);
        state.safe_area_insets = value;
    }

    pub fn set_bar_alpha(&mut self, state: &mut VisualState, value: f32) {
        self.bar_alpha.get_or_insert(state.bar_alpha);
        state.bar_alpha = value;
    }

    pub fn set_toolbar_hidden(&mut self, state: &mut VisualState, value: bool) {
        self.toolbar_hidden.get_or_insert(state.toolbar_hidden);
        state.toolbar_hidden = value;
    }

    /// Restores every captured field to its pre-transition value, exactly.
    pub fn restore(&self, state: &mut VisualState) {
        if let Some(v) = self.source_hidden {
            state.source_hidden = v;
        }
        if let Some(v) = self.content_alpha {
            state.content_alpha = v;
        }
        if let Some(v) = self.content_transform {
            state.content_transform = v;
        }
        if let Some(v) = self.zoom_scale {
            state.zoom_scale = v;
        }
        if let Some(v) = self.safe_area_insets {
            state.safe_area_insets = v;
        }
        if let Some(v) = self.bar_alpha {
            state.bar_alpha = v;
        }
        if let Some(v) = self.toolbar_hidden {
            state.toolbar_hidden = v;
        }
    }

    /// Restores the fields not superseded by the steady state a finished
    /// transition installs: the source thumbnail visibility and the chrome
    /// (insets, bar, toolbar). Content transform, alpha and zoom belong to
    /// the dismissed viewer and are left alone.
    pub fn restore_except_content(&self, state: &mut VisualState) {
        if let Some(v) = self.source_hidden {
            state.source_hidden = v;
        }
        if let Some(v) = self.safe_area_insets {
            state.safe_area_insets = v;
        }
        if let Some(v) = self.bar_alpha {
            state.bar_alpha = v;
        }
        if let Some(v) = self.toolbar_hidden {
            state.toolbar_hidden = v;
        }
    }
}
