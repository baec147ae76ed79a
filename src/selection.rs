use egui::Pos2;

use crate::document::Document;
use crate::element::ObjectId;

/// Objects found under one click, remembered so repeated cycling can walk
/// through overlapping objects.
#[derive(Debug, Clone, PartialEq)]
pub struct OverlapCycle {
    pub point: Pos2,
    /// Hits in z-order, topmost first
    pub candidates: Vec<ObjectId>,
    pub index: usize,
    /// Document version the candidates were computed against
    pub doc_version: u64,
}

/// The selected objects plus the ephemeral overlap state of the last click.
///
/// Ids are kept in selection order; the first one is the primary selection.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Selection {
    ids: Vec<ObjectId>,
    overlap: Option<OverlapCycle>,
}

impl Selection {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn ids(&self) -> &[ObjectId] {
        &self.ids
    }

    pub fn is_empty(&self) -> bool {
        self.ids.is_empty()
    }

    pub fn len(&self) -> usize {
        self.ids.len()
    }

    pub fn contains(&self, id: ObjectId) -> bool {
        self.ids.contains(&id)
    }

    pub fn primary(&self) -> Option<ObjectId> {
        self.ids.first().copied()
    }

    /// The selected id when exactly one object is selected
    pub fn single(&self) -> Option<ObjectId> {
        match self.ids.as_slice() {
            [id] => Some(*id),
            _ => None,
        }
    }

    pub fn select_only(&mut self, id: ObjectId) {
        self.ids.clear();
        self.ids.push(id);
    }

    pub fn set(&mut self, ids: Vec<ObjectId>) {
        self.ids.clear();
        self.add(ids);
    }

    pub fn add(&mut self, ids: impl IntoIterator<Item = ObjectId>) {
        for id in ids {
            if !self.ids.contains(&id) {
                self.ids.push(id);
            }
        }
    }

    /// Add `id` if absent, remove it if present
    pub fn toggle(&mut self, id: ObjectId) {
        match self.ids.iter().position(|selected| *selected == id) {
            Some(index) => {
                self.ids.remove(index);
            }
            None => self.ids.push(id),
        }
    }

    pub fn clear(&mut self) {
        self.ids.clear();
        self.overlap = None;
    }

    /// Remember every hit under `point` for later cycling. The currently
    /// selected candidate starts the cycle.
    pub fn remember_overlap(&mut self, point: Pos2, candidates: Vec<ObjectId>, doc_version: u64) {
        let index = self
            .primary()
            .and_then(|id| candidates.iter().position(|candidate| *candidate == id))
            .unwrap_or(0);
        self.overlap = Some(OverlapCycle {
            point,
            candidates,
            index,
            doc_version,
        });
    }

    pub fn overlap(&self) -> Option<&OverlapCycle> {
        self.overlap.as_ref()
    }

    pub fn invalidate_overlap(&mut self) {
        self.overlap = None;
    }

    /// Advance to the next overlapping object and select it alone.
    ///
    /// Returns `None` without changing anything when there is nothing to cycle
    /// through or the document changed since the click.
    pub fn cycle(&mut self, doc_version: u64) -> Option<ObjectId> {
        let stale = self
            .overlap
            .as_ref()
            .is_some_and(|overlap| overlap.doc_version != doc_version);
        if stale {
            log::debug!("Overlap list is stale, ignoring cycle");
            self.overlap = None;
            return None;
        }

        let overlap = self.overlap.as_mut()?;
        if overlap.candidates.len() <= 1 {
            return None;
        }
        overlap.index = (overlap.index + 1) % overlap.candidates.len();
        let next = overlap.candidates[overlap.index];
        self.ids.clear();
        self.ids.push(next);
        Some(next)
    }

    /// Drop ids that no longer exist in `document`. Returns true if anything changed.
    pub fn retain_existing(&mut self, document: &Document) -> bool {
        let before = self.ids.len();
        self.ids.retain(|id| document.contains(*id));
        self.ids.len() != before
    }
}
