//! Rendered frame.

use std::path::Path;

use tiny_skia::Pixmap;

use crate::error::{RenderError, RenderResult};

/// One rendered frame: the raster surface plus bookkeeping for the host.
#[derive(Debug, Clone)]
pub struct Frame {
    pixmap: Pixmap,
    scale: f32,
    number: u64,
    pending_images: usize,
}

impl Frame {
    pub(crate) fn new(pixmap: Pixmap, scale: f32, number: u64, pending_images: usize) -> Self {
        Self {
            pixmap,
            scale,
            number,
            pending_images,
        }
    }

    /// Surface width in pixels.
    #[must_use]
    pub fn width(&self) -> u32 {
        self.pixmap.width()
    }

    /// Surface height in pixels.
    #[must_use]
    pub fn height(&self) -> u32 {
        self.pixmap.height()
    }

    /// Scene units to pixels.
    #[must_use]
    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Sequence number of this frame, starting at 1.
    #[must_use]
    pub fn number(&self) -> u64 {
        self.number
    }

    /// Images still decoding when this frame was drawn. Non-zero means a
    /// later render will show more.
    #[must_use]
    pub fn pending_images(&self) -> usize {
        self.pending_images
    }

    /// Straight (non-premultiplied) RGBA of one pixel.
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Premultiplied RGBA8 pixel data, row-major.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        self.pixmap.data()
    }

    /// Borrow the underlying pixmap.
    #[must_use]
    pub fn pixmap(&self) -> &Pixmap {
        &self.pixmap
    }

    /// Take the underlying pixmap.
    #[must_use]
    pub fn into_pixmap(self) -> Pixmap {
        self.pixmap
    }

    /// Encode as PNG.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding fails.
    pub fn encode_png(&self) -> RenderResult<Vec<u8>> {
        self.pixmap
            .encode_png()
            .map_err(|e| RenderError::Encode(format!("PNG encoding failed: {e}")))
    }

    /// Write the frame to a PNG file.
    ///
    /// # Errors
    ///
    /// Returns an error if encoding or writing fails.
    pub fn save_png(&self, path: impl AsRef<Path>) -> RenderResult<()> {
        std::fs::write(path, self.encode_png()?)?;
        Ok(())
    }
}
