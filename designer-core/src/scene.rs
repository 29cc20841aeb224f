//! Scene store: the ordered element mapping plus the single selection.
//!
//! Every mutation of the scene goes through this type. Mutations keyed by an
//! element id never fail; an unknown id is logged and ignored so a stale
//! reference from the host cannot corrupt unrelated state.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::element::{Element, ElementId, ElementPatch};
use crate::event::EditorCallbacks;
use crate::{EditorError, EditorResult};

/// Default offset applied to duplicates so they do not sit exactly on top of
/// the source.
pub const DEFAULT_DUPLICATE_OFFSET: f32 = 20.0;

/// Stacking change for [`SceneStore::reorder`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerMove {
    /// Above every other element.
    BringToFront,
    /// Below every other element.
    SendToBack,
    /// One step up.
    Forward,
    /// One step down.
    Backward,
}

/// The scene's elements in insertion order plus the current selection.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SceneStore {
    /// All elements, indexed by ID.
    elements: HashMap<ElementId, Element>,
    /// Element IDs in insertion order; the paint order tie-breaker.
    order: Vec<ElementId>,
    /// Currently selected element.
    selected: Option<ElementId>,
    /// Offset applied to duplicates, in scene units.
    duplicate_offset: f32,
}

impl Default for SceneStore {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneStore {
    /// Create an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::with_duplicate_offset(DEFAULT_DUPLICATE_OFFSET)
    }

    /// Create an empty store with a custom duplicate offset.
    #[must_use]
    pub fn with_duplicate_offset(duplicate_offset: f32) -> Self {
        Self {
            elements: HashMap::new(),
            order: Vec::new(),
            selected: None,
            duplicate_offset,
        }
    }

    /// Offset applied to duplicates, in scene units.
    #[must_use]
    pub fn duplicate_offset(&self) -> f32 {
        self.duplicate_offset
    }

    /// Change the offset applied to duplicates.
    pub fn set_duplicate_offset(&mut self, duplicate_offset: f32) {
        self.duplicate_offset = duplicate_offset;
    }

    /// Build a store from elements in insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::DuplicateElement`] if two elements share an id.
    pub fn from_elements(elements: impl IntoIterator<Item = Element>) -> EditorResult<Self> {
        let mut store = Self::new();
        for element in elements {
            store.add_element(element)?;
        }
        Ok(store)
    }

    /// Add an element on top of the insertion order.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::DuplicateElement`] if the id is already present.
    pub fn add_element(&mut self, element: Element) -> EditorResult<ElementId> {
        let id = element.id;
        if self.elements.contains_key(&id) {
            return Err(EditorError::DuplicateElement(id.to_string()));
        }
        tracing::debug!("Add {} element {id}", element.kind.name());
        self.order.push(id);
        self.elements.insert(id, element);
        Ok(id)
    }

    /// Merge a partial update into the element with `id`.
    ///
    /// Returns `false` (and changes nothing) when the id is unknown.
    pub fn update_element(&mut self, id: ElementId, patch: &ElementPatch) -> bool {
        if let Some(element) = self.elements.get_mut(&id) {
            element.apply(patch);
            true
        } else {
            tracing::debug!("Ignoring update for missing element {id}");
            false
        }
    }

    /// Move the element with `id` to an absolute position.
    pub fn move_element(&mut self, id: ElementId, x: f32, y: f32) -> bool {
        self.update_element(id, &ElementPatch::position(x, y))
    }

    /// Remove an element. Clears the selection if it pointed at it.
    pub fn delete_element(&mut self, id: ElementId) -> Option<Element> {
        let Some(element) = self.elements.remove(&id) else {
            tracing::debug!("Ignoring delete for missing element {id}");
            return None;
        };
        self.order.retain(|&eid| eid != id);
        if self.selected == Some(id) {
            self.selected = None;
        }
        Some(element)
    }

    /// Copy an element under a fresh id, one step above the source and
    /// offset by the duplicate offset. Returns the new id.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let Some(source) = self.elements.get(&id) else {
            tracing::debug!("Ignoring duplicate for missing element {id}");
            return None;
        };
        let mut copy = source.clone();
        copy.id = ElementId::new();
        copy.x += self.duplicate_offset;
        copy.y += self.duplicate_offset;
        copy.z_index = source.z_index.saturating_add(1);

        let new_id = copy.id;
        self.order.push(new_id);
        self.elements.insert(new_id, copy);
        Some(new_id)
    }

    /// Set or clear the selection.
    ///
    /// Locked and invisible elements may be selected. An id that is not in
    /// the scene clears the selection instead.
    pub fn set_selection(&mut self, id: Option<ElementId>) {
        self.selected = id.filter(|id| {
            let known = self.elements.contains_key(id);
            if !known {
                tracing::debug!("Selection of missing element {id} treated as none");
            }
            known
        });
    }

    /// Currently selected id, if it refers to an element in the scene.
    #[must_use]
    pub fn selected_id(&self) -> Option<ElementId> {
        self.selected.filter(|id| self.elements.contains_key(id))
    }

    /// Currently selected element.
    #[must_use]
    pub fn selected_element(&self) -> Option<&Element> {
        self.selected.and_then(|id| self.elements.get(&id))
    }

    /// Change an element's stacking position through its `z_index`.
    pub fn reorder(&mut self, id: ElementId, movement: LayerMove) -> bool {
        let Some(current) = self.elements.get(&id).map(|e| e.z_index) else {
            tracing::debug!("Ignoring reorder for missing element {id}");
            return false;
        };
        let others = self
            .elements
            .values()
            .filter(|e| e.id != id)
            .map(|e| e.z_index);

        let z_index = match movement {
            LayerMove::BringToFront => others
                .max()
                .map_or(current, |max| max.saturating_add(1).max(current)),
            LayerMove::SendToBack => others
                .min()
                .map_or(current, |min| min.saturating_sub(1).min(current)),
            LayerMove::Forward => current.saturating_add(1),
            LayerMove::Backward => current.saturating_sub(1),
        };
        self.update_element(
            id,
            &ElementPatch {
                z_index: Some(z_index),
                ..ElementPatch::default()
            },
        )
    }

    /// Get an element by ID.
    #[must_use]
    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(&id)
    }

    /// Check whether an element is present.
    #[must_use]
    pub fn contains(&self, id: ElementId) -> bool {
        self.elements.contains_key(&id)
    }

    /// Elements in insertion order.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.order.iter().filter_map(|id| self.elements.get(id))
    }

    /// Elements in paint order: ascending `z_index`, ties by insertion order.
    #[must_use]
    pub fn paint_order(&self) -> Vec<&Element> {
        paint_order(self.elements())
    }

    /// Owned snapshot of the elements in insertion order, for renderers and
    /// hosts that want a plain list.
    #[must_use]
    pub fn to_vec(&self) -> Vec<Element> {
        self.elements().cloned().collect()
    }

    /// Get the number of elements.
    #[must_use]
    pub fn len(&self) -> usize {
        self.elements.len()
    }

    /// Check if the store is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }
}

impl EditorCallbacks for SceneStore {
    fn on_element_select(&mut self, id: Option<ElementId>) {
        self.set_selection(id);
    }

    fn on_element_update(&mut self, id: ElementId, patch: &ElementPatch) {
        self.update_element(id, patch);
    }

    fn on_element_move(&mut self, id: ElementId, x: f32, y: f32) {
        self.move_element(id, x, y);
    }
}

/// Order elements for painting: ascending `z_index`, ties kept in the
/// order they were given.
#[must_use]
pub fn paint_order<'a>(elements: impl IntoIterator<Item = &'a Element>) -> Vec<&'a Element> {
    let mut ordered: Vec<&Element> = elements.into_iter().collect();
    // Stable sort keeps insertion order among equal z-indices.
    ordered.sort_by_key(|e| e.z_index);
    ordered
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::{ElementKind, ShapeType, StylePatch};

    fn rect(x: f32, y: f32, w: f32, h: f32) -> Element {
        Element::shape(ShapeType::Rectangle).with_bounds(x, y, w, h)
    }

    #[test]
    fn test_store_add_remove() {
        let mut store = SceneStore::new();
        assert!(store.is_empty());

        let id = store.add_element(Element::text("Hello")).expect("add");
        assert_eq!(store.len(), 1);
        assert!(store.get(id).is_some());

        store.delete_element(id).expect("should remove");
        assert!(store.is_empty());
    }

    #[test]
    fn test_add_rejects_duplicate_id() {
        let mut store = SceneStore::new();
        let element = Element::text("a");
        store.add_element(element.clone()).expect("first add");
        assert!(matches!(
            store.add_element(element),
            Err(EditorError::DuplicateElement(_))
        ));
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_update_unknown_id_is_noop() {
        let mut store = SceneStore::new();
        let id = store.add_element(rect(0.0, 0.0, 10.0, 10.0)).expect("add");
        let before = store.to_vec();

        assert!(!store.update_element(ElementId::new(), &ElementPatch::position(5.0, 5.0)));
        assert!(!store.move_element(ElementId::new(), 5.0, 5.0));
        assert!(store.delete_element(ElementId::new()).is_none());
        assert!(store.duplicate_element(ElementId::new()).is_none());

        assert_eq!(store.to_vec(), before);
        assert!(store.get(id).is_some());
    }

    #[test]
    fn test_update_merges_style() {
        let mut store = SceneStore::new();
        let id = store.add_element(Element::text("Hi")).expect("add");
        store.update_element(
            id,
            &ElementPatch::style(StylePatch {
                font_size: Some(20.0),
                ..StylePatch::default()
            }),
        );
        store.update_element(
            id,
            &ElementPatch::style(StylePatch {
                color: Some("#fff".to_string()),
                ..StylePatch::default()
            }),
        );

        match &store.get(id).expect("present").kind {
            ElementKind::Text { style, .. } => {
                assert_eq!(style.color, "#fff");
                assert!((style.font_size - 20.0).abs() < f32::EPSILON);
            }
            other => panic!("expected text, got {}", other.name()),
        }
    }

    #[test]
    fn test_move_is_absolute() {
        let mut store = SceneStore::new();
        let id = store.add_element(rect(10.0, 10.0, 5.0, 5.0)).expect("add");
        assert!(store.move_element(id, 3.0, 4.0));
        assert!(store.move_element(id, 3.0, 4.0));
        let element = store.get(id).expect("present");
        assert!((element.x - 3.0).abs() < f32::EPSILON);
        assert!((element.y - 4.0).abs() < f32::EPSILON);
    }

    #[test]
    fn test_delete_clears_selection() {
        let mut store = SceneStore::new();
        let id = store.add_element(rect(0.0, 0.0, 1.0, 1.0)).expect("add");
        store.set_selection(Some(id));
        assert_eq!(store.selected_id(), Some(id));

        store.delete_element(id);
        assert_eq!(store.selected_id(), None);
        assert!(store.selected_element().is_none());
    }

    #[test]
    fn test_delete_other_keeps_selection() {
        let mut store = SceneStore::new();
        let a = store.add_element(rect(0.0, 0.0, 1.0, 1.0)).expect("add");
        let b = store.add_element(rect(0.0, 0.0, 1.0, 1.0)).expect("add");
        store.set_selection(Some(a));
        store.delete_element(b);
        assert_eq!(store.selected_id(), Some(a));
    }

    #[test]
    fn test_selection_of_missing_id_is_none() {
        let mut store = SceneStore::new();
        store.set_selection(Some(ElementId::new()));
        assert_eq!(store.selected_id(), None);
    }

    #[test]
    fn test_locked_and_hidden_can_be_selected() {
        let mut store = SceneStore::new();
        let locked = store
            .add_element(rect(0.0, 0.0, 1.0, 1.0).with_locked(true))
            .expect("add");
        let hidden = store
            .add_element(rect(0.0, 0.0, 1.0, 1.0).with_visible(false))
            .expect("add");
        store.set_selection(Some(locked));
        assert_eq!(store.selected_id(), Some(locked));
        store.set_selection(Some(hidden));
        assert_eq!(store.selected_id(), Some(hidden));
    }

    #[test]
    fn test_duplicate_then_delete_restores_store() {
        let mut store = SceneStore::new();
        let id = store
            .add_element(rect(10.0, 10.0, 50.0, 50.0).with_z_index(2))
            .expect("add");
        let original = store.get(id).cloned().expect("present");

        let copy_id = store.duplicate_element(id).expect("duplicated");
        assert_ne!(copy_id, id);
        assert_eq!(store.len(), 2);

        let copy = store.get(copy_id).expect("copy present");
        assert_eq!(copy.z_index, 3);
        assert!((copy.x - 30.0).abs() < f32::EPSILON);
        assert_eq!(copy.kind, original.kind);

        store.delete_element(copy_id);
        assert_eq!(store.len(), 1);
        assert_eq!(store.get(id), Some(&original));
    }

    #[test]
    fn test_paint_order_is_stable() {
        let mut store = SceneStore::new();
        let a = store.add_element(rect(0.0, 0.0, 1.0, 1.0).with_z_index(1)).expect("add");
        let b = store.add_element(rect(0.0, 0.0, 1.0, 1.0).with_z_index(0)).expect("add");
        let c = store.add_element(rect(0.0, 0.0, 1.0, 1.0).with_z_index(1)).expect("add");
        let d = store.add_element(rect(0.0, 0.0, 1.0, 1.0).with_z_index(0)).expect("add");

        let ids: Vec<_> = store.paint_order().iter().map(|e| e.id).collect();
        assert_eq!(ids, vec![b, d, a, c]);
    }

    #[test]
    fn test_reorder() {
        let mut store = SceneStore::new();
        let a = store.add_element(rect(0.0, 0.0, 1.0, 1.0).with_z_index(0)).expect("add");
        let b = store.add_element(rect(0.0, 0.0, 1.0, 1.0).with_z_index(5)).expect("add");

        assert!(store.reorder(a, LayerMove::BringToFront));
        assert_eq!(store.get(a).map(|e| e.z_index), Some(6));
        assert_eq!(store.paint_order().last().map(|e| e.id), Some(a));

        assert!(store.reorder(a, LayerMove::SendToBack));
        assert_eq!(store.get(a).map(|e| e.z_index), Some(4));
        assert_eq!(store.paint_order().first().map(|e| e.id), Some(a));

        assert!(store.reorder(b, LayerMove::Backward));
        assert_eq!(store.get(b).map(|e| e.z_index), Some(4));
        assert!(!store.reorder(ElementId::new(), LayerMove::Forward));
    }

    #[test]
    fn test_store_as_callbacks() {
        let mut store = SceneStore::new();
        let id = store.add_element(rect(0.0, 0.0, 1.0, 1.0)).expect("add");
        store.dispatch(&crate::EditorEvent::Select(Some(id)));
        store.dispatch(&crate::EditorEvent::Move { id, x: 7.0, y: 8.0 });
        assert_eq!(store.selected_id(), Some(id));
        assert!((store.get(id).expect("present").x - 7.0).abs() < f32::EPSILON);
    }
}
