//! # Designer Core
//!
//! Editor logic for a 2D design canvas: the element model, the scene store,
//! the screen/scene transform, pointer-driven selection and dragging, and
//! the property panel. Rendering lives in `designer-renderer`.
//!
//! ## Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │                   Editor                    │
//! ├──────────────────────┬──────────────────────┤
//! │  PointerController   │  PropertyPanel       │
//! │  - Hit testing       │  - Tabs / fields     │
//! │  - Drag state        │  - Typed edits       │
//! │  - Wheel panning     │                      │
//! ├──────────────────────┴──────────────────────┤
//! │  EditorEvent ──► SceneStore ──► observer    │
//! │  - Select / Update / Move                   │
//! ├─────────────────────────────────────────────┤
//! │  Element model   │  Viewport                │
//! │  - Text / Shape  │  - Zoom / pan            │
//! │  - Image         │  - Screen ↔ scene        │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Everything here runs synchronously on the caller's thread.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod color;
pub mod config;
pub mod editor;
pub mod element;
pub mod error;
pub mod event;
pub mod geometry;
pub mod pointer;
pub mod property;
pub mod scene;
pub mod viewport;

pub use color::Rgba;
pub use config::EditorConfig;
pub use editor::Editor;
pub use element::{
    AnimationKind, Element, ElementId, ElementKind, ElementPatch, Filters, FiltersPatch,
    FontStyle, FontWeight, Shadow, ShapeStyle, ShapeType, StylePatch, TextAlign, TextDecoration,
    TextStyle,
};
pub use error::{EditorError, EditorResult};
pub use event::{
    EditorCallbacks, EditorEvent, KeyModifiers, PointerButton, PointerEvent, PointerPhase,
    WheelEvent,
};
pub use geometry::{Handle, Point, Rect};
pub use pointer::{drag_target, hit_test, DragState, PointerController, WheelOutcome};
pub use property::{
    display_rotation, PropertyEdit, PropertyField, PropertyPanel, PropertyTab, PropertyValue,
};
pub use scene::{paint_order, LayerMove, SceneStore};
pub use viewport::Viewport;

/// Designer core version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
