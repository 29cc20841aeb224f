//! Text painting.
//!
//! Each line becomes an SVG `<text>` node positioned by alignment; the
//! fragment is parsed with usvg and rasterized with resvg straight into the
//! element's paint scope.

use std::fmt::Write;
use std::sync::{Arc, OnceLock};

use designer_core::{FontStyle, Rect, Rgba, TextAlign, TextDecoration, TextStyle};
use usvg::fontdb;

use crate::error::{RenderError, RenderResult};
use crate::scope::PaintScope;

/// Shared font database with the system fonts loaded on first use.
fn system_fonts() -> Arc<fontdb::Database> {
    static FONTS: OnceLock<Arc<fontdb::Database>> = OnceLock::new();
    Arc::clone(FONTS.get_or_init(|| {
        let mut db = fontdb::Database::new();
        db.load_system_fonts();
        tracing::info!("Loaded {} system font faces", db.len());
        Arc::new(db)
    }))
}

/// Lays out and rasterizes text elements.
#[derive(Debug, Clone)]
pub struct TextPainter {
    fontdb: Arc<fontdb::Database>,
}

impl TextPainter {
    /// Painter backed by the system fonts, or an empty font set.
    #[must_use]
    pub fn new(load_system_fonts: bool) -> Self {
        let fontdb = if load_system_fonts {
            system_fonts()
        } else {
            Arc::new(fontdb::Database::new())
        };
        Self { fontdb }
    }

    /// Painter backed by a caller-supplied font set.
    #[must_use]
    pub fn with_fonts(fontdb: Arc<fontdb::Database>) -> Self {
        Self { fontdb }
    }

    /// Number of font faces available.
    #[must_use]
    pub fn face_count(&self) -> usize {
        self.fontdb.len()
    }

    /// Paint `content` inside `bounds` into the scope.
    ///
    /// # Errors
    ///
    /// Returns an error if the generated fragment cannot be parsed.
    pub fn paint(
        &self,
        scope: &mut PaintScope,
        bounds: Rect,
        content: &str,
        style: &TextStyle,
    ) -> RenderResult<()> {
        let Some(color) = Rgba::parse_or_none(&style.color) else {
            return Ok(());
        };
        if content.is_empty() || style.font_size <= 0.0 {
            return Ok(());
        }

        // The document only needs to cover the canvas in scene units.
        let scale = scope.scale().max(f32::EPSILON);
        let layer = scope.layer_mut();
        #[allow(clippy::cast_precision_loss)]
        let (w, h) = (layer.width() as f32 / scale, layer.height() as f32 / scale);
        let svg = text_svg(bounds, content, style, color, w, h);

        let mut options = usvg::Options::default();
        options.fontdb = Arc::clone(&self.fontdb);
        options.font_family.clone_from(&style.font_family);

        let tree = usvg::Tree::from_str(&svg, &options)
            .map_err(|e| RenderError::Text(format!("SVG parsing failed: {e}")))?;
        let transform = scope.transform();
        resvg::render(&tree, transform, &mut scope.layer_mut().as_mut());
        Ok(())
    }
}

/// Horizontal anchor for a line: `(x, text-anchor)`.
fn line_anchor(bounds: Rect, align: TextAlign) -> (f32, &'static str) {
    match align {
        TextAlign::Left => (bounds.x, "start"),
        TextAlign::Center => (bounds.x + bounds.width / 2.0, "middle"),
        TextAlign::Right => (bounds.right(), "end"),
    }
}

/// Build the SVG document for a text element in scene units.
#[allow(clippy::cast_precision_loss)]
fn text_svg(
    bounds: Rect,
    content: &str,
    style: &TextStyle,
    color: Rgba,
    width: f32,
    height: f32,
) -> String {
    let (x, anchor) = line_anchor(bounds, style.text_align);
    let font_style = match style.font_style {
        FontStyle::Normal => "normal",
        FontStyle::Italic => "italic",
    };
    let decoration = match style.text_decoration {
        TextDecoration::None => "none",
        TextDecoration::Underline => "underline",
        TextDecoration::LineThrough => "line-through",
    };
    let line_height = style.line_height();

    let mut svg = String::new();
    let _ = write!(
        svg,
        r#"<svg xmlns="http://www.w3.org/2000/svg" width="{}" height="{}">"#,
        width.max(1.0),
        height.max(1.0)
    );
    for (i, line) in content.lines().enumerate() {
        if line.is_empty() {
            continue;
        }
        let y = bounds.y + i as f32 * line_height + style.font_size;
        let _ = write!(
            svg,
            r#"<text x="{x}" y="{y}" font-family="{}" font-size="{}" font-weight="{}" font-style="{font_style}" text-decoration="{decoration}" text-anchor="{anchor}" fill="rgb({},{},{})" fill-opacity="{}" xml:space="preserve">{}</text>"#,
            escape_xml(&style.font_family),
            style.font_size,
            style.font_weight.numeric(),
            color.r,
            color.g,
            color.b,
            f32::from(color.a) / 255.0,
            escape_xml(line),
        );
    }
    svg.push_str("</svg>");
    svg
}

/// Escape XML special characters.
fn escape_xml(input: &str) -> String {
    input
        .replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}
