//! Hit testing and drag-to-move.
//!
//! The controller is a two-state machine:
//!
//! ```text
//!            down on unlocked element
//!   Idle ─────────────────────────────► Dragging { id, offset }
//!    ▲                                     │  move: Move(id, scene - offset)
//!    └─────────────── up ──────────────────┘
//! ```
//!
//! It never caches geometry: every event is resolved against the element
//! slice and viewport passed in with it. Events to persist are returned to
//! the caller rather than applied here.

use crate::element::{Element, ElementId};
use crate::event::{EditorEvent, KeyModifiers, WheelEvent};
use crate::geometry::Point;
use crate::scene::paint_order;
use crate::viewport::Viewport;

/// Topmost visible element whose unrotated bounding box contains `point`.
///
/// Locked elements are included; this is the display hit test.
#[must_use]
pub fn hit_test<'a>(
    elements: impl IntoIterator<Item = &'a Element>,
    point: Point,
) -> Option<&'a Element> {
    paint_order(elements)
        .into_iter()
        .rev()
        .find(|e| e.visible && e.bounds().contains(point))
}

/// Topmost visible, unlocked element under `point`: the element a
/// pointer-down would pick up for dragging. Locked elements are passed
/// through, so the next unlocked element underneath can be acquired.
#[must_use]
pub fn drag_target<'a>(
    elements: impl IntoIterator<Item = &'a Element>,
    point: Point,
) -> Option<&'a Element> {
    paint_order(elements)
        .into_iter()
        .rev()
        .find(|e| e.visible && !e.locked && e.bounds().contains(point))
}

/// Drag state carried between pointer-down and pointer-up.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub enum DragState {
    /// No drag in progress.
    #[default]
    Idle,
    /// An element is following the pointer.
    Dragging {
        /// Element being moved.
        id: ElementId,
        /// Pointer position minus element origin at pointer-down, in scene
        /// units.
        offset_x: f32,
        /// See `offset_x`.
        offset_y: f32,
    },
}

/// What a wheel gesture did.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum WheelOutcome {
    /// The pan offset changed by this scene-space delta.
    Panned {
        /// Horizontal change.
        dx: f32,
        /// Vertical change.
        dy: f32,
    },
    /// A zoom gesture: the host owns zoom, so nothing changed here, but the
    /// host should suppress its default scroll behaviour.
    ZoomGesture {
        /// Vertical wheel delta of the gesture.
        delta: f32,
    },
}

impl WheelOutcome {
    /// Whether the host should suppress default scrolling.
    #[must_use]
    pub const fn prevent_default(&self) -> bool {
        true
    }
}

/// Converts pointer input into selection and move events.
#[derive(Debug, Clone)]
pub struct PointerController {
    state: DragState,
    wheel_pan_speed: f32,
}

impl Default for PointerController {
    fn default() -> Self {
        Self::new()
    }
}

impl PointerController {
    /// Create an idle controller with 1:1 wheel panning.
    #[must_use]
    pub fn new() -> Self {
        Self::with_wheel_pan_speed(1.0)
    }

    /// Create an idle controller with a custom wheel pan multiplier.
    #[must_use]
    pub fn with_wheel_pan_speed(wheel_pan_speed: f32) -> Self {
        Self {
            state: DragState::Idle,
            wheel_pan_speed,
        }
    }

    /// Current drag state.
    #[must_use]
    pub fn state(&self) -> DragState {
        self.state
    }

    /// Whether a drag is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    /// Handle a pointer press at screen coordinates.
    ///
    /// Selects the topmost unlocked visible element under the pointer and
    /// starts dragging it, or clears the selection when there is none.
    pub fn pointer_down<'a>(
        &mut self,
        screen: Point,
        elements: impl IntoIterator<Item = &'a Element>,
        viewport: &Viewport,
    ) -> EditorEvent {
        let point = viewport.screen_to_scene(screen);
        match drag_target(elements, point) {
            Some(element) => {
                tracing::trace!(
                    "Pointer down at ({}, {}) acquired {}",
                    point.x,
                    point.y,
                    element.id
                );
                self.state = DragState::Dragging {
                    id: element.id,
                    offset_x: point.x - element.x,
                    offset_y: point.y - element.y,
                };
                EditorEvent::Select(Some(element.id))
            }
            None => {
                tracing::trace!("Pointer down at ({}, {}) hit nothing", point.x, point.y);
                self.state = DragState::Idle;
                EditorEvent::Select(None)
            }
        }
    }

    /// Handle pointer motion. Emits an absolute move while dragging.
    ///
    /// The element slice is only consulted to drop a drag whose element has
    /// disappeared mid-gesture.
    pub fn pointer_move<'a>(
        &mut self,
        screen: Point,
        elements: impl IntoIterator<Item = &'a Element>,
        viewport: &Viewport,
    ) -> Option<EditorEvent> {
        let DragState::Dragging {
            id,
            offset_x,
            offset_y,
        } = self.state
        else {
            return None;
        };

        if !elements.into_iter().any(|e| e.id == id) {
            tracing::debug!("Dragged element {id} vanished; ending drag");
            self.state = DragState::Idle;
            return None;
        }

        let point = viewport.screen_to_scene(screen);
        Some(EditorEvent::Move {
            id,
            x: point.x - offset_x,
            y: point.y - offset_y,
        })
    }

    /// Handle pointer release. Always returns to idle.
    pub fn pointer_up(&mut self) {
        self.state = DragState::Idle;
    }

    /// Handle a wheel gesture.
    ///
    /// Ctrl/Cmd-wheel is reserved for the host's zoom control. Shift-wheel
    /// pans horizontally; a plain wheel pans along both axes of the delta.
    /// Screen deltas are converted to scene units so content follows the
    /// wheel at any zoom.
    pub fn wheel(&self, viewport: &mut Viewport, event: &WheelEvent) -> WheelOutcome {
        if event.modifiers.zoom_modifier() {
            return WheelOutcome::ZoomGesture {
                delta: event.delta_y,
            };
        }

        let factor = self.wheel_pan_speed / viewport.scale();
        let (dx, dy) = if is_horizontal(event.modifiers) {
            let primary = if event.delta_y == 0.0 {
                event.delta_x
            } else {
                event.delta_y
            };
            (-primary * factor, 0.0)
        } else {
            (-event.delta_x * factor, -event.delta_y * factor)
        };
        viewport.pan_by(dx, dy);
        WheelOutcome::Panned { dx, dy }
    }
}

fn is_horizontal(modifiers: KeyModifiers) -> bool {
    modifiers.shift
}
