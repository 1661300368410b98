// SPDX-License-Identifier: MPL-2.0
//! Ordered media sequence shared between the viewer and the page-control bar.
//!
//! The [`PagingModel`] is the single source of truth for page order and the
//! current page cursor. Transition code reads it; only explicit `reset`/
//! `replace`/`append` operations mutate it, and the facade only performs
//! those between transitions. Diffing old vs. new sequences for animated
//! insert/remove is a rendering-layer concern; the model exposes
//! [`PagingModel::index_of`] and [`PagingModel::identifier_at`] so a
//! collaborator can compute that diff.

use crate::error::{Error, Result};
use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

/// Opaque, stable identity of one media item.
///
/// Equality defines "same logical page" across reloads. Cloning is cheap
/// (shared string), so identifiers can be captured freely before await
/// boundaries for stale-result checks.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct MediaId(Arc<str>);

impl MediaId {
    /// Creates an identifier from any string-like value.
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    /// Returns the identifier as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for MediaId {
    fn from(id: &str) -> Self {
        Self::new(id)
    }
}

impl From<String> for MediaId {
    fn from(id: String) -> Self {
        Self::new(id)
    }
}

impl fmt::Display for MediaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Ordered sequence of unique [`MediaId`]s plus a current-index cursor.
///
/// Invariants: identifiers are unique; the cursor, when present, is within
/// bounds. Both are checked on every mutation.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PagingModel {
    identifiers: Vec<MediaId>,
    current: Option<usize>,
}

fn check_unique(identifiers: &[MediaId]) -> Result<()> {
    let mut seen = HashSet::with_capacity(identifiers.len());
    for id in identifiers {
        if !seen.insert(id) {
            return Err(Error::Paging(format!("duplicate identifier: {}", id)));
        }
    }
    Ok(())
}

impl PagingModel {
    /// Creates an empty model with no current page.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replaces the whole sequence and cursor.
    ///
    /// Fails if identifiers are not unique or the cursor is out of bounds.
    /// An empty sequence requires `current_index` to be `None`.
    pub fn reset(
        &mut self,
        identifiers: Vec<MediaId>,
        current_index: Option<usize>,
    ) -> Result<()> {
        check_unique(&identifiers)?;
        if let Some(index) = current_index {
            if index >= identifiers.len() {
                return Err(Error::Paging(format!(
                    "current index {} out of bounds for {} identifiers",
                    index,
                    identifiers.len()
                )));
            }
        }
        self.identifiers = identifiers;
        self.current = current_index;
        Ok(())
    }

    /// Replaces the sequence, keeping the cursor on the same logical page
    /// when its identifier survives the reload.
    ///
    /// When the current identifier is gone, the cursor clamps to the nearest
    /// valid index (or clears for an empty sequence).
    pub fn replace(&mut self, identifiers: Vec<MediaId>) -> Result<()> {
        check_unique(&identifiers)?;
        let previous = self.current_identifier().cloned();
        self.current = match previous.and_then(|id| identifiers.iter().position(|i| *i == id)) {
            Some(index) => Some(index),
            None if identifiers.is_empty() => None,
            None => Some(
                self.current
                    .unwrap_or(0)
                    .min(identifiers.len().saturating_sub(1)),
            ),
        };
        self.identifiers = identifiers;
        Ok(())
    }

    /// Appends identifiers to the end of the sequence.
    ///
    /// Fails if any of them already exists; the cursor is unaffected.
    pub fn append(&mut self, identifiers: Vec<MediaId>) -> Result<()> {
        let mut combined = self.identifiers.clone();
        combined.extend(identifiers);
        check_unique(&combined)?;
        self.identifiers = combined;
        Ok(())
    }

    /// Moves the cursor to `index`.
    pub fn set_current_index(&mut self, index: usize) -> Result<()> {
        if index >= self.identifiers.len() {
            return Err(Error::Paging(format!(
                "current index {} out of bounds for {} identifiers",
                index,
                self.identifiers.len()
            )));
        }
        self.current = Some(index);
        Ok(())
    }

    /// Returns the index of `identifier`, if present.
    #[must_use]
    pub fn index_of(&self, identifier: &MediaId) -> Option<usize> {
        self.identifiers.iter().position(|id| id == identifier)
    }

    /// Returns the identifier at `index`, if within bounds.
    #[must_use]
    pub fn identifier_at(&self, index: usize) -> Option<&MediaId> {
        self.identifiers.get(index)
    }

    /// Returns the current cursor, if set.
    #[must_use]
    pub fn current_index(&self) -> Option<usize> {
        self.current
    }

    /// Returns the identifier under the cursor, if any.
    #[must_use]
    pub fn current_identifier(&self) -> Option<&MediaId> {
        self.current.and_then(|index| self.identifiers.get(index))
    }

    /// Returns the number of pages.
    #[must_use]
    pub fn len(&self) -> usize {
        self.identifiers.len()
    }

    /// Checks whether the model holds no pages.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.identifiers.is_empty()
    }

    /// Checks whether `index` is the first or last page.
    ///
    /// Edge pages get special treatment in the page-control bar: their
    /// expansion is deferred until scrolling has fully settled.
    #[must_use]
    pub fn is_edge_index(&self, index: usize) -> bool {
        !self.identifiers.is_empty()
            && (index == 0 || index == self.identifiers.len() - 1)
    }

    /// Returns the neighbor of `index` in the given direction, if it exists.
    #[must_use]
    pub fn neighbor(&self, index: usize, forwards: bool) -> Option<usize> {
        if forwards {
            let next = index.checked_add(1)?;
            (next < self.identifiers.len()).then_some(next)
        } else {
            index.checked_sub(1)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ids(names: &[&str]) -> Vec<MediaId> {
        names.iter().map(|n| MediaId::from(*n)).collect()
    }

    #[test]
    fn new_model_is_empty() {
        let model = PagingModel::new();
        assert!(model.is_empty());
        assert_eq!(model.len(), 0);
        assert_eq!(model.current_index(), None);
        assert_eq!(model.current_identifier(), None);
    }

    #[test]
    fn reset_sets_sequence_and_cursor() {
        let mut model = PagingModel::new();
        model.reset(ids(&["a", "b", "c"]), Some(1)).expect("reset");

        assert_eq!(model.len(), 3);
        assert_eq!(model.current_index(), Some(1));
        assert_eq!(model.current_identifier(), Some(&MediaId::from("b")));
    }

    #[test]
    fn reset_rejects_out_of_bounds_cursor() {
        let mut model = PagingModel::new();
        let err = model.reset(ids(&["a", "b"]), Some(2)).unwrap_err();
        assert!(matches!(err, Error::Paging(_)));
        assert!(model.is_empty());
    }

    #[test]
    fn reset_rejects_duplicate_identifiers() {
        let mut model = PagingModel::new();
        let err = model.reset(ids(&["a", "b", "a"]), Some(0)).unwrap_err();
        assert!(matches!(err, Error::Paging(_)));
    }

    #[test]
    fn replace_keeps_cursor_on_surviving_identifier() {
        let mut model = PagingModel::new();
        model.reset(ids(&["a", "b", "c"]), Some(1)).expect("reset");

        model.replace(ids(&["x", "b", "y", "z"])).expect("replace");
        assert_eq!(model.current_index(), Some(1));
        assert_eq!(model.current_identifier(), Some(&MediaId::from("b")));
    }

    #[test]
    fn replace_clamps_cursor_when_identifier_removed() {
        let mut model = PagingModel::new();
        model.reset(ids(&["a", "b", "c"]), Some(2)).expect("reset");

        model.replace(ids(&["x", "y"])).expect("replace");
        assert_eq!(model.current_index(), Some(1));
    }

    #[test]
    fn replace_with_empty_clears_cursor() {
        let mut model = PagingModel::new();
        model.reset(ids(&["a"]), Some(0)).expect("reset");

        model.replace(Vec::new()).expect("replace");
        assert!(model.is_empty());
        assert_eq!(model.current_index(), None);
    }

    #[test]
    fn append_extends_without_moving_cursor() {
        let mut model = PagingModel::new();
        model.reset(ids(&["a", "b"]), Some(0)).expect("reset");

        model.append(ids(&["c", "d"])).expect("append");
        assert_eq!(model.len(), 4);
        assert_eq!(model.current_index(), Some(0));
        assert_eq!(model.identifier_at(3), Some(&MediaId::from("d")));
    }

    #[test]
    fn append_rejects_existing_identifier() {
        let mut model = PagingModel::new();
        model.reset(ids(&["a", "b"]), Some(0)).expect("reset");

        let err = model.append(ids(&["b"])).unwrap_err();
        assert!(matches!(err, Error::Paging(_)));
        assert_eq!(model.len(), 2);
    }

    #[test]
    fn index_of_finds_identifier() {
        let mut model = PagingModel::new();
        model.reset(ids(&["a", "b", "c"]), None).expect("reset");

        assert_eq!(model.index_of(&MediaId::from("c")), Some(2));
        assert_eq!(model.index_of(&MediaId::from("nope")), None);
    }

    #[test]
    fn edge_index_detection() {
        let mut model = PagingModel::new();
        model.reset(ids(&["a", "b", "c"]), None).expect("reset");

        assert!(model.is_edge_index(0));
        assert!(!model.is_edge_index(1));
        assert!(model.is_edge_index(2));
    }

    #[test]
    fn neighbor_respects_bounds() {
        let mut model = PagingModel::new();
        model.reset(ids(&["a", "b", "c"]), None).expect("reset");

        assert_eq!(model.neighbor(1, true), Some(2));
        assert_eq!(model.neighbor(1, false), Some(0));
        assert_eq!(model.neighbor(2, true), None);
        assert_eq!(model.neighbor(0, false), None);
    }

    #[test]
    fn set_current_index_validates_bounds() {
        let mut model = PagingModel::new();
        model.reset(ids(&["a", "b"]), None).expect("reset");

        model.set_current_index(1).expect("in bounds");
        assert_eq!(model.current_index(), Some(1));
        assert!(model.set_current_index(2).is_err());
        assert_eq!(model.current_index(), Some(1));
    }
}
