//! Canvas elements - the building blocks of a design.
//!
//! An [`Element`] carries geometry, stacking metadata, post-processing
//! filters and a closed [`ElementKind`] that decides how it is drawn and
//! which style keys mean anything. Elements are plain data; all mutation
//! goes through [`ElementPatch`] merged by the scene store.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::geometry::{Point, Rect};
use crate::EditorResult;

/// Default fill for new shapes.
pub const DEFAULT_SHAPE_FILL: &str = "#8B5CF6";

/// Default text color.
pub const DEFAULT_TEXT_COLOR: &str = "#000000";

/// Default shadow color (translucent black).
pub const DEFAULT_SHADOW_COLOR: &str = "#00000080";

/// Unique identifier for an element.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ElementId(Uuid);

impl ElementId {
    /// Create a new unique element ID.
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// Create from an existing UUID.
    #[must_use]
    pub fn from_uuid(uuid: Uuid) -> Self {
        Self(uuid)
    }

    /// Parse an element ID from its string form.
    ///
    /// # Errors
    ///
    /// Returns an error if the string is not a valid UUID.
    pub fn parse(s: &str) -> EditorResult<Self> {
        Ok(Self(Uuid::parse_str(s)?))
    }
}

impl Default for ElementId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for ElementId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Font weight.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontWeight {
    /// Regular weight (400).
    #[default]
    Normal,
    /// Bold weight (700).
    Bold,
}

impl FontWeight {
    /// Numeric CSS weight.
    #[must_use]
    pub const fn numeric(self) -> u16 {
        match self {
            Self::Normal => 400,
            Self::Bold => 700,
        }
    }
}

/// Font style.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FontStyle {
    /// Upright.
    #[default]
    Normal,
    /// Italic.
    Italic,
}

/// Text decoration line.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum TextDecoration {
    /// No decoration.
    #[default]
    None,
    /// Underline.
    Underline,
    /// Strike-through.
    LineThrough,
}

/// Horizontal alignment of each text line inside the element box.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextAlign {
    /// Lines start at the element's left edge.
    #[default]
    Left,
    /// Lines are centered on the element's horizontal center.
    Center,
    /// Lines end at the element's right edge.
    Right,
}

/// Geometry drawn by a shape element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ShapeType {
    /// Circle inscribed in the bounding box.
    Circle,
    /// Rectangle, optionally with rounded corners.
    #[default]
    Rectangle,
    /// Triangle with its apex at top-center.
    Triangle,
}

/// Drop shadow parameters shared by text and shapes.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Shadow {
    /// Whether the shadow is drawn.
    #[serde(rename = "shadow")]
    pub enabled: bool,
    /// Shadow color.
    #[serde(rename = "shadowColor")]
    pub color: String,
    /// Blur amount in scene units.
    #[serde(rename = "shadowBlur")]
    pub blur: f32,
    /// Horizontal offset in scene units.
    #[serde(rename = "shadowOffsetX")]
    pub offset_x: f32,
    /// Vertical offset in scene units.
    #[serde(rename = "shadowOffsetY")]
    pub offset_y: f32,
}

impl Default for Shadow {
    fn default() -> Self {
        Self {
            enabled: false,
            color: DEFAULT_SHADOW_COLOR.to_string(),
            blur: 4.0,
            offset_x: 2.0,
            offset_y: 2.0,
        }
    }
}

/// Text styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct TextStyle {
    /// Font family name.
    pub font_family: String,
    /// Font size in scene units.
    pub font_size: f32,
    /// Font weight.
    pub font_weight: FontWeight,
    /// Font style.
    pub font_style: FontStyle,
    /// Decoration line.
    pub text_decoration: TextDecoration,
    /// Fill color.
    pub color: String,
    /// Line alignment.
    pub text_align: TextAlign,
    /// Drop shadow.
    #[serde(flatten)]
    pub shadow: Shadow,
}

impl Default for TextStyle {
    fn default() -> Self {
        Self {
            font_family: "Inter".to_string(),
            font_size: 24.0,
            font_weight: FontWeight::Normal,
            font_style: FontStyle::Normal,
            text_decoration: TextDecoration::None,
            color: DEFAULT_TEXT_COLOR.to_string(),
            text_align: TextAlign::Left,
            shadow: Shadow::default(),
        }
    }
}

impl TextStyle {
    /// Line advance used when laying out multi-line content.
    #[must_use]
    pub fn line_height(&self) -> f32 {
        self.font_size * 1.2
    }

    fn merge(&mut self, patch: &StylePatch) {
        merge_field(&mut self.font_family, patch.font_family.as_ref());
        merge_number(&mut self.font_size, patch.font_size.as_ref());
        merge_field(&mut self.font_weight, patch.font_weight.as_ref());
        merge_field(&mut self.font_style, patch.font_style.as_ref());
        merge_field(&mut self.text_decoration, patch.text_decoration.as_ref());
        merge_field(&mut self.color, patch.color.as_ref());
        merge_field(&mut self.text_align, patch.text_align.as_ref());
        self.shadow.merge(patch);
    }
}

/// Shape styling.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ShapeStyle {
    /// Which geometry to draw.
    pub shape_type: ShapeType,
    /// Fill color (`none` for no fill).
    pub fill: String,
    /// Stroke color (`none` for no stroke).
    pub stroke: String,
    /// Stroke width in scene units; stroke is drawn only when positive.
    pub stroke_width: f32,
    /// Corner radius for rectangles; zero draws square corners.
    pub border_radius: f32,
    /// Drop shadow.
    #[serde(flatten)]
    pub shadow: Shadow,
}

impl Default for ShapeStyle {
    fn default() -> Self {
        Self {
            shape_type: ShapeType::Rectangle,
            fill: DEFAULT_SHAPE_FILL.to_string(),
            stroke: "none".to_string(),
            stroke_width: 0.0,
            border_radius: 0.0,
            shadow: Shadow::default(),
        }
    }
}

impl ShapeStyle {
    fn merge(&mut self, patch: &StylePatch) {
        merge_field(&mut self.shape_type, patch.shape_type.as_ref());
        merge_field(&mut self.fill, patch.fill.as_ref());
        merge_field(&mut self.stroke, patch.stroke.as_ref());
        merge_number(&mut self.stroke_width, patch.stroke_width.as_ref());
        merge_number(&mut self.border_radius, patch.border_radius.as_ref());
        self.shadow.merge(patch);
    }
}

impl Shadow {
    fn merge(&mut self, patch: &StylePatch) {
        merge_field(&mut self.enabled, patch.shadow.as_ref());
        merge_field(&mut self.color, patch.shadow_color.as_ref());
        merge_number(&mut self.blur, patch.shadow_blur.as_ref());
        merge_number(&mut self.offset_x, patch.shadow_offset_x.as_ref());
        merge_number(&mut self.offset_y, patch.shadow_offset_y.as_ref());
    }
}

/// Post-processing applied to an element's whole paint.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Filters {
    /// Gaussian blur standard deviation in scene units.
    pub blur: f32,
    /// Brightness percentage (100 = unchanged).
    pub brightness: f32,
    /// Contrast percentage (100 = unchanged).
    pub contrast: f32,
    /// Saturation percentage (100 = unchanged).
    pub saturate: f32,
}

impl Default for Filters {
    fn default() -> Self {
        Self {
            blur: 0.0,
            brightness: 100.0,
            contrast: 100.0,
            saturate: 100.0,
        }
    }
}

impl Filters {
    /// True when no filter changes the paint.
    #[must_use]
    #[allow(clippy::float_cmp)]
    pub fn is_identity(&self) -> bool {
        self.blur <= 0.0 && self.brightness == 100.0 && self.contrast == 100.0 && self.saturate == 100.0
    }

    fn merge(&mut self, patch: &FiltersPatch) {
        merge_number(&mut self.blur, patch.blur.as_ref());
        merge_number(&mut self.brightness, patch.brightness.as_ref());
        merge_number(&mut self.contrast, patch.contrast.as_ref());
        merge_number(&mut self.saturate, patch.saturate.as_ref());
    }
}

/// Entrance animation label. Stored for the host; never played back here.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AnimationKind {
    /// No animation.
    #[default]
    None,
    /// Fade in.
    FadeIn,
    /// Slide up into place.
    SlideUp,
    /// Zoom in from a smaller scale.
    ZoomIn,
    /// Bounce.
    Bounce,
    /// Pulse.
    Pulse,
}

impl AnimationKind {
    /// All selectable values, in menu order.
    pub const ALL: [Self; 6] = [
        Self::None,
        Self::FadeIn,
        Self::SlideUp,
        Self::ZoomIn,
        Self::Bounce,
        Self::Pulse,
    ];
}

/// The type of content an element draws.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum ElementKind {
    /// Multi-line text.
    Text {
        /// Text payload; each line is laid out independently.
        content: String,
        /// Typography and shadow.
        #[serde(default)]
        style: TextStyle,
    },

    /// A vector shape.
    Shape {
        /// Geometry, fill, stroke and shadow.
        #[serde(default)]
        style: ShapeStyle,
    },

    /// A raster image.
    Image {
        /// Image source URI (data URI or path). Unset draws nothing.
        #[serde(default, rename = "imageData")]
        image_data: Option<String>,
    },
}

impl ElementKind {
    /// Short type name.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::Text { .. } => "text",
            Self::Shape { .. } => "shape",
            Self::Image { .. } => "image",
        }
    }

    /// Default bounding box size for a freshly added element of this kind.
    #[must_use]
    pub const fn default_size(&self) -> (f32, f32) {
        match self {
            Self::Text { .. } => (200.0, 50.0),
            Self::Shape { .. } => (100.0, 100.0),
            Self::Image { .. } => (200.0, 150.0),
        }
    }
}

/// A canvas element with geometry, stacking metadata and content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Element {
    /// Unique identifier.
    pub id: ElementId,
    /// Left edge in scene units.
    pub x: f32,
    /// Top edge in scene units.
    pub y: f32,
    /// Width in scene units.
    pub width: f32,
    /// Height in scene units.
    pub height: f32,
    /// Rotation in degrees about the element center; not normalized.
    #[serde(default)]
    pub rotation: f32,
    /// Paint order key (ascending).
    #[serde(default)]
    pub z_index: i32,
    /// Opacity percentage, 0-100.
    #[serde(default = "Element::default_opacity")]
    pub opacity: f32,
    /// Invisible elements are neither drawn nor hit.
    #[serde(default = "Element::default_visible")]
    pub visible: bool,
    /// Locked elements cannot be dragged.
    #[serde(default)]
    pub locked: bool,
    /// Post-processing filters.
    #[serde(default)]
    pub filters: Filters,
    /// Entrance animation label.
    #[serde(default)]
    pub animation: AnimationKind,
    /// Element content type.
    #[serde(flatten)]
    pub kind: ElementKind,
}

impl Element {
    /// Create a new element of the given kind at the origin with the kind's
    /// default size.
    #[must_use]
    pub fn new(kind: ElementKind) -> Self {
        let (width, height) = kind.default_size();
        Self {
            id: ElementId::new(),
            x: 0.0,
            y: 0.0,
            width,
            height,
            rotation: 0.0,
            z_index: 0,
            opacity: 100.0,
            visible: true,
            locked: false,
            filters: Filters::default(),
            animation: AnimationKind::None,
            kind,
        }
    }

    /// Create a text element with default typography.
    #[must_use]
    pub fn text(content: impl Into<String>) -> Self {
        Self::new(ElementKind::Text {
            content: content.into(),
            style: TextStyle::default(),
        })
    }

    /// Create a shape element with the default fill.
    #[must_use]
    pub fn shape(shape_type: ShapeType) -> Self {
        Self::new(ElementKind::Shape {
            style: ShapeStyle {
                shape_type,
                ..ShapeStyle::default()
            },
        })
    }

    /// Create an image element.
    #[must_use]
    pub fn image(image_data: Option<String>) -> Self {
        Self::new(ElementKind::Image { image_data })
    }

    const fn default_opacity() -> f32 {
        100.0
    }

    const fn default_visible() -> bool {
        true
    }

    /// Set position and size.
    #[must_use]
    pub fn with_bounds(mut self, x: f32, y: f32, width: f32, height: f32) -> Self {
        self.x = x;
        self.y = y;
        self.width = width;
        self.height = height;
        self
    }

    /// Set the paint order key.
    #[must_use]
    pub fn with_z_index(mut self, z_index: i32) -> Self {
        self.z_index = z_index;
        self
    }

    /// Set the rotation in degrees.
    #[must_use]
    pub fn with_rotation(mut self, rotation: f32) -> Self {
        self.rotation = rotation;
        self
    }

    /// Set the opacity percentage.
    #[must_use]
    pub fn with_opacity(mut self, opacity: f32) -> Self {
        self.opacity = opacity;
        self
    }

    /// Set visibility.
    #[must_use]
    pub fn with_visible(mut self, visible: bool) -> Self {
        self.visible = visible;
        self
    }

    /// Set the lock flag.
    #[must_use]
    pub fn with_locked(mut self, locked: bool) -> Self {
        self.locked = locked;
        self
    }

    /// Replace the filters.
    #[must_use]
    pub fn with_filters(mut self, filters: Filters) -> Self {
        self.filters = filters;
        self
    }

    /// Unrotated bounding box in scene units.
    #[must_use]
    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    /// Check if a scene-space point is within the unrotated bounding box.
    #[must_use]
    pub fn contains_point(&self, x: f32, y: f32) -> bool {
        self.bounds().contains(Point::new(x, y))
    }

    /// The drop shadow, for kinds that carry one.
    #[must_use]
    pub fn shadow(&self) -> Option<&Shadow> {
        match &self.kind {
            ElementKind::Text { style, .. } => Some(&style.shadow),
            ElementKind::Shape { style } => Some(&style.shadow),
            ElementKind::Image { .. } => None,
        }
    }

    /// Merge a partial update into this element.
    ///
    /// Top-level fields present in the patch replace the current value.
    /// `style` and `filters` merge key by key; style keys that do not apply
    /// to this element's kind are ignored. The id is never changed.
    pub fn apply(&mut self, patch: &ElementPatch) {
        merge_number(&mut self.x, patch.x.as_ref());
        merge_number(&mut self.y, patch.y.as_ref());
        merge_number(&mut self.width, patch.width.as_ref());
        merge_number(&mut self.height, patch.height.as_ref());
        merge_number(&mut self.rotation, patch.rotation.as_ref());
        merge_field(&mut self.z_index, patch.z_index.as_ref());
        merge_number(&mut self.opacity, patch.opacity.as_ref());
        merge_field(&mut self.visible, patch.visible.as_ref());
        merge_field(&mut self.locked, patch.locked.as_ref());
        merge_field(&mut self.animation, patch.animation.as_ref());
        if let Some(filters) = &patch.filters {
            self.filters.merge(filters);
        }

        match &mut self.kind {
            ElementKind::Text { content, style } => {
                merge_field(content, patch.content.as_ref());
                if let Some(style_patch) = &patch.style {
                    style.merge(style_patch);
                }
            }
            ElementKind::Shape { style } => {
                if let Some(style_patch) = &patch.style {
                    style.merge(style_patch);
                }
            }
            ElementKind::Image { image_data } => {
                if let Some(data) = &patch.image_data {
                    *image_data = if data.is_empty() {
                        None
                    } else {
                        Some(data.clone())
                    };
                }
            }
        }
    }
}

fn merge_field<T: Clone>(target: &mut T, value: Option<&T>) {
    if let Some(value) = value {
        target.clone_from(value);
    }
}

/// Numeric fields only take finite values; NaN or infinity leaves the
/// current value in place.
fn merge_number(target: &mut f32, value: Option<&f32>) {
    match value {
        Some(value) if value.is_finite() => *target = *value,
        Some(value) => tracing::debug!("Ignoring non-finite value {value}"),
        None => {}
    }
}

/// Partial update of an element. Absent fields are preserved.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ElementPatch {
    /// New left edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<f32>,
    /// New top edge.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<f32>,
    /// New width.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub width: Option<f32>,
    /// New height.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub height: Option<f32>,
    /// New rotation in degrees.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rotation: Option<f32>,
    /// New paint order key.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub z_index: Option<i32>,
    /// New opacity percentage.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f32>,
    /// New visibility.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visible: Option<bool>,
    /// New lock flag.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub locked: Option<bool>,
    /// New text content (text elements only).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// New image source (image elements only); an empty string clears it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_data: Option<String>,
    /// Style keys to override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub style: Option<StylePatch>,
    /// Filter keys to override.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub filters: Option<FiltersPatch>,
    /// New animation label.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub animation: Option<AnimationKind>,
}

impl ElementPatch {
    /// A patch that only moves the element.
    #[must_use]
    pub fn position(x: f32, y: f32) -> Self {
        Self {
            x: Some(x),
            y: Some(y),
            ..Self::default()
        }
    }

    /// A patch that only touches style keys.
    #[must_use]
    pub fn style(style: StylePatch) -> Self {
        Self {
            style: Some(style),
            ..Self::default()
        }
    }

    /// A patch that only touches filter keys.
    #[must_use]
    pub fn filters(filters: FiltersPatch) -> Self {
        Self {
            filters: Some(filters),
            ..Self::default()
        }
    }

    /// True when applying the patch would change nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }
}

/// Style keys for a partial update. Text and shape keys share one bag.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
#[allow(missing_docs)] // Keys mirror the documented fields of TextStyle, ShapeStyle and Shadow.
pub struct StylePatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_family: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_size: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_weight: Option<FontWeight>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub font_style: Option<FontStyle>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_decoration: Option<TextDecoration>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub text_align: Option<TextAlign>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shape_type: Option<ShapeType>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stroke_width: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub border_radius: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_color: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_blur: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_offset_x: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shadow_offset_y: Option<f32>,
}

/// Filter keys for a partial update.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
#[allow(missing_docs)] // Keys mirror the documented fields of Filters.
pub struct FiltersPatch {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blur: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub brightness: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contrast: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturate: Option<f32>,
}
