//! Editing session: wires the pointer controller and property panel to the
//! scene store and an optional host observer.

use std::fmt;

use crate::config::EditorConfig;
use crate::element::{Element, ElementId, ElementPatch};
use crate::error::{EditorError, EditorResult};
use crate::event::{EditorCallbacks, EditorEvent, PointerEvent, PointerPhase, WheelEvent};
use crate::geometry::Point;
use crate::pointer::{hit_test, PointerController, WheelOutcome};
use crate::property::{PropertyEdit, PropertyField, PropertyPanel, PropertyTab};
use crate::scene::{LayerMove, SceneStore};
use crate::viewport::Viewport;

/// One editing session over a scene.
///
/// Events produced by pointer and property interactions are applied to the
/// store, then forwarded to the observer in the same call.
pub struct Editor {
    store: SceneStore,
    viewport: Viewport,
    pointer: PointerController,
    panel: PropertyPanel,
    config: EditorConfig,
    observer: Option<Box<dyn EditorCallbacks>>,
    needs_redraw: bool,
}

impl fmt::Debug for Editor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Editor")
            .field("elements", &self.store.len())
            .field("selected", &self.store.selected_id())
            .field("viewport", &self.viewport)
            .field("drag", &self.pointer.state())
            .field("tab", &self.panel.active_tab)
            .field("observer", &self.observer.is_some())
            .field("needs_redraw", &self.needs_redraw)
            .finish_non_exhaustive()
    }
}

impl Default for Editor {
    fn default() -> Self {
        Self::new(EditorConfig::default())
    }
}

impl Editor {
    /// Start a session over an empty scene.
    #[must_use]
    pub fn new(config: EditorConfig) -> Self {
        Self::with_store(SceneStore::new(), config)
    }

    /// Start a session over an existing scene.
    ///
    /// The config's duplicate offset replaces the store's. An inconsistent
    /// config is replaced by the default.
    #[must_use]
    pub fn with_store(mut store: SceneStore, config: EditorConfig) -> Self {
        let config = match config.validate() {
            Ok(()) => config,
            Err(e) => {
                tracing::warn!("{e}, using the default editor config");
                EditorConfig::default()
            }
        };
        store.set_duplicate_offset(config.duplicate_offset);
        Self {
            store,
            viewport: Viewport::default(),
            pointer: PointerController::with_wheel_pan_speed(config.wheel_pan_speed),
            panel: PropertyPanel::new(),
            config,
            observer: None,
            needs_redraw: true,
        }
    }

    /// Register the host observer that receives every emitted event.
    pub fn set_observer(&mut self, observer: Box<dyn EditorCallbacks>) {
        self.observer = Some(observer);
    }

    /// Remove and return the host observer.
    pub fn take_observer(&mut self) -> Option<Box<dyn EditorCallbacks>> {
        self.observer.take()
    }

    /// The scene.
    #[must_use]
    pub fn store(&self) -> &SceneStore {
        &self.store
    }

    /// Session configuration.
    #[must_use]
    pub fn config(&self) -> &EditorConfig {
        &self.config
    }

    /// Current viewport.
    #[must_use]
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Look up an element.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::ElementNotFound`] if the id is not in the scene.
    pub fn element(&self, id: ElementId) -> EditorResult<&Element> {
        self.store
            .get(id)
            .ok_or_else(|| EditorError::ElementNotFound(id.to_string()))
    }

    /// Topmost visible element at a screen point, locked elements included.
    #[must_use]
    pub fn element_at(&self, screen: Point) -> Option<&Element> {
        hit_test(self.store.elements(), self.viewport.screen_to_scene(screen))
    }

    /// Set the zoom percentage, clamped to the configured range.
    pub fn set_zoom(&mut self, zoom: f32) {
        if zoom.is_finite() {
            self.viewport.zoom = self.config.clamp_zoom(zoom);
            self.needs_redraw = true;
        } else {
            tracing::warn!("Ignoring non-finite zoom {zoom}");
        }
    }

    /// Record where the rendered surface sits on screen.
    pub fn set_origin(&mut self, x: f32, y: f32) {
        self.viewport.origin_x = x;
        self.viewport.origin_y = y;
    }

    /// Whether the scene changed since the last [`Editor::take_redraw`].
    #[must_use]
    pub fn needs_redraw(&self) -> bool {
        self.needs_redraw
    }

    /// Read and clear the redraw flag.
    pub fn take_redraw(&mut self) -> bool {
        std::mem::take(&mut self.needs_redraw)
    }

    /// Request a redraw, e.g. after an image finished decoding.
    pub fn mark_dirty(&mut self) {
        self.needs_redraw = true;
    }

    // Pointer input.

    /// Route a pointer event by phase.
    pub fn handle_pointer(&mut self, event: PointerEvent) -> Option<EditorEvent> {
        let screen = Point::new(event.x, event.y);
        match event.phase {
            PointerPhase::Down => Some(self.pointer_down(screen)),
            PointerPhase::Move => self.pointer_move(screen),
            PointerPhase::Up => {
                self.pointer_up();
                None
            }
        }
    }

    /// Pointer press: select and start dragging, or clear the selection.
    pub fn pointer_down(&mut self, screen: Point) -> EditorEvent {
        let event = self
            .pointer
            .pointer_down(screen, self.store.elements(), &self.viewport);
        self.emit(&event);
        event
    }

    /// Pointer motion: move the dragged element, if any.
    pub fn pointer_move(&mut self, screen: Point) -> Option<EditorEvent> {
        let event = self
            .pointer
            .pointer_move(screen, self.store.elements(), &self.viewport)?;
        self.emit(&event);
        Some(event)
    }

    /// Pointer release.
    pub fn pointer_up(&mut self) {
        self.pointer.pointer_up();
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.pointer.is_dragging()
    }

    /// Wheel gesture: pans the viewport or reports a zoom gesture.
    pub fn wheel(&mut self, event: &WheelEvent) -> WheelOutcome {
        self.pointer.wheel(&mut self.viewport, event)
    }

    // Property panel.

    /// Active property tab.
    #[must_use]
    pub fn active_tab(&self) -> PropertyTab {
        self.panel.active_tab
    }

    /// Switch property tabs.
    pub fn set_tab(&mut self, tab: PropertyTab) {
        self.panel.set_tab(tab);
    }

    /// Fields of the active tab for the selected element; empty when nothing
    /// is selected.
    #[must_use]
    pub fn property_fields(&self) -> Vec<PropertyField> {
        self.store
            .selected_element()
            .map(|element| self.panel.fields(element))
            .unwrap_or_default()
    }

    /// Apply a property edit to the selected element.
    ///
    /// Returns the emitted update, or `None` when nothing is selected or the
    /// edit does not apply to the element's kind.
    pub fn edit_selected(&mut self, edit: PropertyEdit) -> Option<EditorEvent> {
        let element = self.store.selected_element()?;
        let patch = self.panel.edit(element, edit)?;
        let event = EditorEvent::Update {
            id: element.id,
            patch,
        };
        self.emit(&event);
        Some(event)
    }

    // Scene actions issued by the host (toolbar, context menu, keyboard).

    /// Add an element and select it.
    ///
    /// # Errors
    ///
    /// Returns [`EditorError::DuplicateElement`] if the id is already present.
    pub fn add_element(&mut self, element: Element) -> EditorResult<ElementId> {
        let id = self.store.add_element(element)?;
        self.emit(&EditorEvent::Select(Some(id)));
        Ok(id)
    }

    /// Merge a partial update into an element.
    pub fn update_element(&mut self, id: ElementId, patch: ElementPatch) {
        if self.store.contains(id) {
            self.emit(&EditorEvent::Update { id, patch });
        }
    }

    /// Delete an element, clearing the selection if it pointed at it.
    pub fn delete_element(&mut self, id: ElementId) -> Option<Element> {
        let was_selected = self.store.selected_id() == Some(id);
        let removed = self.store.delete_element(id)?;
        self.needs_redraw = true;
        if was_selected {
            self.notify(&EditorEvent::Select(None));
        }
        Some(removed)
    }

    /// Delete the selected element.
    pub fn delete_selected(&mut self) -> Option<Element> {
        let id = self.store.selected_id()?;
        self.delete_element(id)
    }

    /// Duplicate an element and select the copy.
    pub fn duplicate_element(&mut self, id: ElementId) -> Option<ElementId> {
        let new_id = self.store.duplicate_element(id)?;
        self.emit(&EditorEvent::Select(Some(new_id)));
        Some(new_id)
    }

    /// Change an element's stacking position.
    pub fn reorder(&mut self, id: ElementId, movement: LayerMove) {
        let Some(before) = self.store.get(id).map(|e| e.z_index) else {
            return;
        };
        self.store.reorder(id, movement);
        let after = self.store.get(id).map_or(before, |e| e.z_index);
        if after != before {
            self.needs_redraw = true;
            self.notify(&EditorEvent::Update {
                id,
                patch: ElementPatch {
                    z_index: Some(after),
                    ..ElementPatch::default()
                },
            });
        }
    }

    /// Select an element, or clear the selection.
    pub fn select(&mut self, id: Option<ElementId>) {
        self.emit(&EditorEvent::Select(id));
    }

    fn emit(&mut self, event: &EditorEvent) {
        self.store.dispatch(event);
        self.needs_redraw = true;
        self.notify(event);
    }

    fn notify(&mut self, event: &EditorEvent) {
        if let Some(observer) = self.observer.as_mut() {
            observer.dispatch(event);
        }
    }
}
