//! Input events consumed by the pointer controller and the editor events it
//! emits back to the host.

use serde::{Deserialize, Serialize};

use crate::element::{ElementId, ElementPatch};

/// Pointer button.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerButton {
    /// Primary (left) button.
    #[default]
    Primary,
    /// Middle button.
    Middle,
    /// Secondary (right) button.
    Secondary,
}

/// Phase of a pointer event.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PointerPhase {
    /// Button pressed.
    Down,
    /// Pointer moved.
    Move,
    /// Button released.
    Up,
}

/// A pointer event in screen coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PointerEvent {
    /// Phase.
    pub phase: PointerPhase,
    /// Screen X.
    pub x: f32,
    /// Screen Y.
    pub y: f32,
    /// Button involved.
    #[serde(default)]
    pub button: PointerButton,
}

impl PointerEvent {
    /// Primary-button press.
    #[must_use]
    pub const fn down(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Down,
            x,
            y,
            button: PointerButton::Primary,
        }
    }

    /// Pointer motion.
    #[must_use]
    pub const fn moved(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Move,
            x,
            y,
            button: PointerButton::Primary,
        }
    }

    /// Primary-button release.
    #[must_use]
    pub const fn up(x: f32, y: f32) -> Self {
        Self {
            phase: PointerPhase::Up,
            x,
            y,
            button: PointerButton::Primary,
        }
    }
}

/// A wheel (scroll) event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct WheelEvent {
    /// Horizontal delta in screen pixels.
    pub delta_x: f32,
    /// Vertical delta in screen pixels.
    pub delta_y: f32,
    /// Modifiers held during the gesture.
    #[serde(default)]
    pub modifiers: KeyModifiers,
}

/// Keyboard modifiers.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct KeyModifiers {
    /// Shift key pressed.
    pub shift: bool,
    /// Control key pressed.
    pub ctrl: bool,
    /// Alt/Option key pressed.
    pub alt: bool,
    /// Meta/Command key pressed.
    pub meta: bool,
}

impl KeyModifiers {
    /// Only shift held.
    pub const SHIFT: Self = Self {
        shift: true,
        ctrl: false,
        alt: false,
        meta: false,
    };

    /// Only ctrl held.
    pub const CTRL: Self = Self {
        shift: false,
        ctrl: true,
        alt: false,
        meta: false,
    };

    /// Ctrl on most platforms, Command on macOS.
    #[must_use]
    pub const fn zoom_modifier(&self) -> bool {
        self.ctrl || self.meta
    }
}

/// An event emitted by the editing surfaces for the host to persist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "data")]
pub enum EditorEvent {
    /// Selection changed (`None` clears it).
    Select(Option<ElementId>),
    /// Partial update of an element.
    Update {
        /// Target element.
        id: ElementId,
        /// Fields to merge.
        patch: ElementPatch,
    },
    /// Absolute reposition of an element.
    Move {
        /// Target element.
        id: ElementId,
        /// New left edge in scene units.
        x: f32,
        /// New top edge in scene units.
        y: f32,
    },
}

/// Output contract of the editor core.
///
/// Pointer and property interactions fire these synchronously. The
/// implementor owns persisting them; [`crate::SceneStore`] implements this
/// trait so it can be wired in directly.
pub trait EditorCallbacks {
    /// The selection changed.
    fn on_element_select(&mut self, id: Option<ElementId>);

    /// An element should receive a partial update.
    fn on_element_update(&mut self, id: ElementId, patch: &ElementPatch);

    /// An element should move to an absolute position.
    fn on_element_move(&mut self, id: ElementId, x: f32, y: f32);

    /// Dispatch an [`EditorEvent`] to the matching callback.
    fn dispatch(&mut self, event: &EditorEvent) {
        match event {
            EditorEvent::Select(id) => self.on_element_select(*id),
            EditorEvent::Update { id, patch } => self.on_element_update(*id, patch),
            EditorEvent::Move { id, x, y } => self.on_element_move(*id, *x, *y),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl EditorCallbacks for Recorder {
        fn on_element_select(&mut self, id: Option<ElementId>) {
            self.calls.push(format!("select:{}", id.is_some()));
        }

        fn on_element_update(&mut self, _id: ElementId, patch: &ElementPatch) {
            self.calls.push(format!("update:{}", patch.is_empty()));
        }

        fn on_element_move(&mut self, _id: ElementId, x: f32, y: f32) {
            self.calls.push(format!("move:{x},{y}"));
        }
    }

    #[test]
    fn test_dispatch_routes_to_callbacks() {
        let id = ElementId::new();
        let mut recorder = Recorder::default();
        recorder.dispatch(&EditorEvent::Select(Some(id)));
        recorder.dispatch(&EditorEvent::Move { id, x: 1.0, y: 2.0 });
        recorder.dispatch(&EditorEvent::Update {
            id,
            patch: ElementPatch::default(),
        });
        recorder.dispatch(&EditorEvent::Select(None));
        assert_eq!(
            recorder.calls,
            vec!["select:true", "move:1,2", "update:true", "select:false"]
        );
    }

    #[test]
    fn test_zoom_modifier() {
        assert!(KeyModifiers::CTRL.zoom_modifier());
        assert!(!KeyModifiers::SHIFT.zoom_modifier());
        let meta = KeyModifiers {
            meta: true,
            ..KeyModifiers::default()
        };
        assert!(meta.zoom_modifier());
    }
}
