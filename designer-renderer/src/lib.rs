//! # Designer Renderer
//!
//! CPU raster renderer for the designer scene, built on tiny-skia.
//!
//! ## Frame Pipeline
//!
//! ```text
//! ┌─────────────────────────────────────────────┐
//! │  Surface  ceil(w·zoom) × ceil(h·zoom)       │
//! ├─────────────────────────────────────────────┤
//! │  Background → Grid                          │
//! ├─────────────────────────────────────────────┤
//! │  for element in paint order (visible only): │
//! │    PaintScope ── text │ shape │ image       │
//! │      filters → shadow → composite(opacity)  │
//! │    selection outline + handles              │
//! └─────────────────────────────────────────────┘
//! ```
//!
//! Images decode in the background through [`ImageCache`]; a frame drawn
//! while a decode is pending simply omits that image.

#![forbid(unsafe_code)]
#![deny(missing_docs)]
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![allow(clippy::module_name_repetitions)]

pub mod error;
pub mod filters;
pub mod frame;
pub mod image;
pub mod image_cache;
pub mod overlay;
pub mod scope;
pub mod shapes;
pub mod text;

use std::time::Duration;

use designer_core::{paint_order, Element, ElementId, ElementKind, Rgba};
use serde::{Deserialize, Serialize};
use tiny_skia::Pixmap;

pub use error::{RenderError, RenderResult};
pub use frame::Frame;
pub use image_cache::{CacheStats, ImageCache, ImageCacheConfig};
pub use scope::PaintScope;
pub use text::TextPainter;

/// Configuration for the renderer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RendererConfig {
    /// Canvas background color.
    pub background_color: String,
    /// Grid spacing in scene units.
    pub grid_pitch: f32,
    /// Grid line color.
    pub grid_color: String,
    /// Grid line width in scene units.
    pub grid_line_width: f32,
    /// Selection outline and handle border color.
    pub selection_color: String,
    /// Gap between an element's bounds and its selection outline.
    pub selection_margin: f32,
    /// Selection outline width in scene units.
    pub selection_width: f32,
    /// Side length of the square handles in scene units.
    pub handle_size: f32,
    /// Handle fill color (`none` fills with the selection color).
    pub handle_fill: String,
    /// Maximum decoded images kept.
    pub image_cache_entries: usize,
    /// Decode images off the render thread.
    pub background_image_decode: bool,
    /// Load the system fonts for text.
    pub load_system_fonts: bool,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            background_color: "#FFFFFF".to_string(),
            grid_pitch: 20.0,
            grid_color: "#E5E7EB".to_string(),
            grid_line_width: 1.0,
            selection_color: "#3B82F6".to_string(),
            selection_margin: 2.0,
            selection_width: 2.0,
            handle_size: 8.0,
            handle_fill: "#FFFFFF".to_string(),
            image_cache_entries: 64,
            background_image_decode: true,
            load_system_fonts: true,
        }
    }
}

/// Per-frame canvas input supplied by the host.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CanvasSettings {
    /// Logical canvas width in scene units.
    pub width: f32,
    /// Logical canvas height in scene units.
    pub height: f32,
    /// Zoom percentage (100 = 1:1).
    pub zoom: f32,
    /// Draw the grid.
    pub show_grid: bool,
}

impl Default for CanvasSettings {
    fn default() -> Self {
        Self::new(800.0, 600.0)
    }
}

impl CanvasSettings {
    /// Canvas of the given logical size at 100% without a grid.
    #[must_use]
    pub fn new(width: f32, height: f32) -> Self {
        Self {
            width,
            height,
            zoom: 100.0,
            show_grid: false,
        }
    }

    /// Set the zoom percentage.
    #[must_use]
    pub fn with_zoom(mut self, zoom: f32) -> Self {
        self.zoom = zoom;
        self
    }

    /// Enable or disable the grid.
    #[must_use]
    pub fn with_grid(mut self, show_grid: bool) -> Self {
        self.show_grid = show_grid;
        self
    }

    /// Scene-to-pixel scale; invalid zoom falls back to 1:1.
    #[must_use]
    pub fn scale(&self) -> f32 {
        if self.zoom.is_finite() && self.zoom > 0.0 {
            self.zoom / 100.0
        } else {
            tracing::warn!("Invalid zoom {}, rendering at 100%", self.zoom);
            1.0
        }
    }

    /// Surface size in pixels: the logical size times the scale, rounded
    /// up, at least 1×1.
    #[must_use]
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn surface_size(&self) -> (u32, u32) {
        let scale = self.scale();
        let px = |logical: f32| {
            let logical = if logical.is_finite() { logical.max(0.0) } else { 0.0 };
            ((logical * scale).ceil() as u32).max(1)
        };
        (px(self.width), px(self.height))
    }
}

/// The scene renderer.
#[derive(Debug)]
pub struct Renderer {
    config: RendererConfig,
    text: TextPainter,
    images: ImageCache,
    frame_count: u64,
}

impl Default for Renderer {
    fn default() -> Self {
        Self::new(RendererConfig::default())
    }
}

impl Renderer {
    /// Create a new renderer with the given configuration.
    #[must_use]
    pub fn new(config: RendererConfig) -> Self {
        let images = ImageCache::with_config(ImageCacheConfig {
            max_entries: config.image_cache_entries,
            background_decode: config.background_image_decode,
        });
        let text = TextPainter::new(config.load_system_fonts);
        Self {
            config,
            text,
            images,
            frame_count: 0,
        }
    }

    /// Replace the text painter, e.g. to supply bundled fonts.
    pub fn set_text_painter(&mut self, text: TextPainter) {
        self.text = text;
    }

    /// Render a frame.
    ///
    /// Elements are drawn in paint order; invisible elements are skipped.
    /// A selection id that matches no visible element draws no outline.
    ///
    /// # Errors
    ///
    /// Returns an error if the surface cannot be allocated.
    pub fn render(
        &mut self,
        elements: &[Element],
        selected: Option<ElementId>,
        settings: &CanvasSettings,
    ) -> RenderResult<Frame> {
        let scale = settings.scale();
        let (px_w, px_h) = settings.surface_size();
        let mut surface = Pixmap::new(px_w, px_h)
            .ok_or_else(|| RenderError::Surface(format!("Failed to create {px_w}x{px_h} pixmap")))?;

        overlay::draw_background(
            &mut surface,
            Rgba::parse_or_none(&self.config.background_color),
            settings.width,
            settings.height,
            scale,
        );
        if settings.show_grid {
            overlay::draw_grid(&mut surface, &self.config, settings.width, settings.height, scale);
        }

        for element in paint_order(elements) {
            if !element.visible {
                continue;
            }
            if element.opacity > 0.0 {
                self.paint_element(&mut surface, element, scale)?;
            }
            if selected == Some(element.id) {
                overlay::draw_selection(&mut surface, element, &self.config, scale);
            }
        }

        self.frame_count += 1;
        tracing::trace!(
            "Rendered frame {} ({px_w}x{px_h}, {} elements)",
            self.frame_count,
            elements.len()
        );
        Ok(Frame::new(
            surface,
            scale,
            self.frame_count,
            self.images.pending(),
        ))
    }

    fn paint_element(&mut self, surface: &mut Pixmap, element: &Element, scale: f32) -> RenderResult<()> {
        let mut scope = PaintScope::begin(surface.width(), surface.height(), scale, element)?;
        let bounds = element.bounds();

        match &element.kind {
            ElementKind::Text { content, style } => {
                if let Err(e) = self.text.paint(&mut scope, bounds, content, style) {
                    tracing::warn!("Skipping text of {}: {e}", element.id);
                }
            }
            ElementKind::Shape { style } => {
                if let Some(rect) =
                    tiny_skia::Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height)
                {
                    shapes::paint_shape(&mut scope, rect, style);
                }
            }
            ElementKind::Image { image_data } => {
                let source = image_data.as_deref().filter(|s| !s.is_empty());
                if let Some(image) = source.and_then(|s| self.images.request(s)) {
                    if let Some(rect) =
                        tiny_skia::Rect::from_xywh(bounds.x, bounds.y, bounds.width, bounds.height)
                    {
                        scope.draw_image(&image, rect);
                    }
                }
            }
        }

        scope.finish(surface, element);
        Ok(())
    }

    /// Collect finished image decodes. Non-zero means the next render will
    /// show new images, so the host should render once more.
    pub fn poll_images(&mut self) -> usize {
        self.images.poll()
    }

    /// Block until pending image decodes finish or `timeout` elapses.
    pub fn wait_for_images(&mut self, timeout: Duration) -> usize {
        self.images.wait(timeout)
    }

    /// The image cache.
    #[must_use]
    pub fn images(&self) -> &ImageCache {
        &self.images
    }

    /// Get the current frame count.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Get the renderer configuration.
    #[must_use]
    pub fn config(&self) -> &RendererConfig {
        &self.config
    }
}
