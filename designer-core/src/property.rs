//! Property panel: reads the selected element and turns form edits into
//! partial updates.
//!
//! The panel holds no element state of its own, only which tab is showing.

use serde::{Deserialize, Serialize};

use crate::element::{
    AnimationKind, Element, ElementKind, ElementPatch, FiltersPatch, FontStyle, FontWeight,
    ShapeType, StylePatch, TextAlign, TextDecoration,
};

/// Largest blur the effects slider offers.
pub const MAX_BLUR: f32 = 20.0;

/// Largest brightness/contrast/saturate percentage the effects sliders offer.
pub const MAX_FILTER_PERCENT: f32 = 200.0;

/// Panel tab.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PropertyTab {
    /// Position, size, rotation, stacking and visibility.
    #[default]
    Layout,
    /// Kind-specific content and styling.
    Style,
    /// Filters.
    Effects,
    /// Entrance animation.
    Animation,
}

impl PropertyTab {
    /// All tabs in display order.
    pub const ALL: [Self; 4] = [Self::Layout, Self::Style, Self::Effects, Self::Animation];
}

/// Current value of one form field.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "lowercase")]
pub enum PropertyValue {
    /// Free numeric input.
    Number(f32),
    /// Bounded slider.
    Slider {
        /// Current value.
        value: f32,
        /// Lower bound.
        min: f32,
        /// Upper bound.
        max: f32,
    },
    /// Checkbox.
    Toggle(bool),
    /// Free text.
    Text(String),
    /// CSS color string.
    Color(String),
    /// One of a fixed set of options.
    Choice {
        /// Selected option.
        selected: String,
        /// Available options.
        options: Vec<String>,
    },
}

/// A labelled form field.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PropertyField {
    /// Patch key the field edits (camelCase, as in the JSON patch).
    pub key: &'static str,
    /// Human-readable label.
    pub label: &'static str,
    /// Current value.
    pub value: PropertyValue,
}

impl PropertyField {
    fn new(key: &'static str, label: &'static str, value: PropertyValue) -> Self {
        Self { key, label, value }
    }
}

/// A single typed edit from the panel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "key", content = "value", rename_all = "camelCase")]
#[allow(missing_docs)] // Each variant edits the element field of the same name.
pub enum PropertyEdit {
    X(f32),
    Y(f32),
    Width(f32),
    Height(f32),
    Rotation(f32),
    ZIndex(i32),
    Opacity(f32),
    Visible(bool),
    Locked(bool),
    Content(String),
    ImageData(String),
    FontFamily(String),
    FontSize(f32),
    FontWeight(FontWeight),
    FontStyle(FontStyle),
    TextDecoration(TextDecoration),
    TextAlign(TextAlign),
    Color(String),
    ShapeType(ShapeType),
    Fill(String),
    Stroke(String),
    StrokeWidth(f32),
    BorderRadius(f32),
    Shadow(bool),
    ShadowColor(String),
    ShadowBlur(f32),
    ShadowOffsetX(f32),
    ShadowOffsetY(f32),
    Blur(f32),
    Brightness(f32),
    Contrast(f32),
    Saturate(f32),
    Animation(AnimationKind),
}

impl PropertyEdit {
    /// The numeric payload of a slider or number edit.
    fn number(&self) -> Option<f32> {
        match *self {
            Self::X(n)
            | Self::Y(n)
            | Self::Width(n)
            | Self::Height(n)
            | Self::Rotation(n)
            | Self::Opacity(n)
            | Self::FontSize(n)
            | Self::StrokeWidth(n)
            | Self::BorderRadius(n)
            | Self::ShadowBlur(n)
            | Self::ShadowOffsetX(n)
            | Self::ShadowOffsetY(n)
            | Self::Blur(n)
            | Self::Brightness(n)
            | Self::Contrast(n)
            | Self::Saturate(n) => Some(n),
            _ => None,
        }
    }
}

/// Rotation wrapped to `[0, 360)` for display. The stored value is never
/// normalized.
#[must_use]
pub fn display_rotation(degrees: f32) -> f32 {
    let wrapped = degrees.rem_euclid(360.0);
    // rem_euclid can round up to exactly 360 for tiny negative inputs.
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Form-like editor over the selected element.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PropertyPanel {
    /// Tab currently showing.
    pub active_tab: PropertyTab,
}

impl PropertyPanel {
    /// Panel showing the layout tab.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Switch tabs.
    pub fn set_tab(&mut self, tab: PropertyTab) {
        self.active_tab = tab;
    }

    /// Fields of the active tab for `element`.
    #[must_use]
    pub fn fields(&self, element: &Element) -> Vec<PropertyField> {
        match self.active_tab {
            PropertyTab::Layout => layout_fields(element),
            PropertyTab::Style => style_fields(element),
            PropertyTab::Effects => effect_fields(element),
            PropertyTab::Animation => vec![PropertyField::new(
                "animation",
                "Animation",
                choice(&element.animation, &AnimationKind::ALL),
            )],
        }
    }

    /// Convert an edit into a partial update for `element`.
    ///
    /// Returns `None` when the edit does not apply to the element's kind or
    /// carries a non-finite number. Opacity and filter values are clamped to
    /// their slider ranges. Locked elements are still editable here.
    #[must_use]
    pub fn edit(&self, element: &Element, edit: PropertyEdit) -> Option<ElementPatch> {
        if edit.number().is_some_and(|n| !n.is_finite()) {
            tracing::debug!("Ignoring non-finite {edit:?}");
            return None;
        }
        let is_text = matches!(element.kind, ElementKind::Text { .. });
        let is_shape = matches!(element.kind, ElementKind::Shape { .. });
        let has_shadow = is_text || is_shape;

        let patch = match edit {
            PropertyEdit::X(x) => ElementPatch {
                x: Some(x),
                ..ElementPatch::default()
            },
            PropertyEdit::Y(y) => ElementPatch {
                y: Some(y),
                ..ElementPatch::default()
            },
            PropertyEdit::Width(width) => ElementPatch {
                width: Some(width),
                ..ElementPatch::default()
            },
            PropertyEdit::Height(height) => ElementPatch {
                height: Some(height),
                ..ElementPatch::default()
            },
            PropertyEdit::Rotation(rotation) => ElementPatch {
                rotation: Some(rotation),
                ..ElementPatch::default()
            },
            PropertyEdit::ZIndex(z_index) => ElementPatch {
                z_index: Some(z_index),
                ..ElementPatch::default()
            },
            PropertyEdit::Opacity(opacity) => ElementPatch {
                opacity: Some(opacity.clamp(0.0, 100.0)),
                ..ElementPatch::default()
            },
            PropertyEdit::Visible(visible) => ElementPatch {
                visible: Some(visible),
                ..ElementPatch::default()
            },
            PropertyEdit::Locked(locked) => ElementPatch {
                locked: Some(locked),
                ..ElementPatch::default()
            },
            PropertyEdit::Content(content) if is_text => ElementPatch {
                content: Some(content),
                ..ElementPatch::default()
            },
            PropertyEdit::ImageData(data) if matches!(element.kind, ElementKind::Image { .. }) => {
                ElementPatch {
                    image_data: Some(data),
                    ..ElementPatch::default()
                }
            }
            PropertyEdit::Animation(animation) => ElementPatch {
                animation: Some(animation),
                ..ElementPatch::default()
            },
            PropertyEdit::Blur(blur) => ElementPatch::filters(FiltersPatch {
                blur: Some(blur.clamp(0.0, MAX_BLUR)),
                ..FiltersPatch::default()
            }),
            PropertyEdit::Brightness(value) => ElementPatch::filters(FiltersPatch {
                brightness: Some(value.clamp(0.0, MAX_FILTER_PERCENT)),
                ..FiltersPatch::default()
            }),
            PropertyEdit::Contrast(value) => ElementPatch::filters(FiltersPatch {
                contrast: Some(value.clamp(0.0, MAX_FILTER_PERCENT)),
                ..FiltersPatch::default()
            }),
            PropertyEdit::Saturate(value) => ElementPatch::filters(FiltersPatch {
                saturate: Some(value.clamp(0.0, MAX_FILTER_PERCENT)),
                ..FiltersPatch::default()
            }),
            edit => ElementPatch::style(style_edit(edit, is_text, is_shape, has_shadow)?),
        };
        Some(patch)
    }
}

fn style_edit(
    edit: PropertyEdit,
    is_text: bool,
    is_shape: bool,
    has_shadow: bool,
) -> Option<StylePatch> {
    let mut patch = StylePatch::default();
    match edit {
        PropertyEdit::FontFamily(v) if is_text => patch.font_family = Some(v),
        PropertyEdit::FontSize(v) if is_text => patch.font_size = Some(v),
        PropertyEdit::FontWeight(v) if is_text => patch.font_weight = Some(v),
        PropertyEdit::FontStyle(v) if is_text => patch.font_style = Some(v),
        PropertyEdit::TextDecoration(v) if is_text => patch.text_decoration = Some(v),
        PropertyEdit::TextAlign(v) if is_text => patch.text_align = Some(v),
        PropertyEdit::Color(v) if is_text => patch.color = Some(v),
        PropertyEdit::ShapeType(v) if is_shape => patch.shape_type = Some(v),
        PropertyEdit::Fill(v) if is_shape => patch.fill = Some(v),
        PropertyEdit::Stroke(v) if is_shape => patch.stroke = Some(v),
        PropertyEdit::StrokeWidth(v) if is_shape => patch.stroke_width = Some(v),
        PropertyEdit::BorderRadius(v) if is_shape => patch.border_radius = Some(v),
        PropertyEdit::Shadow(v) if has_shadow => patch.shadow = Some(v),
        PropertyEdit::ShadowColor(v) if has_shadow => patch.shadow_color = Some(v),
        PropertyEdit::ShadowBlur(v) if has_shadow => patch.shadow_blur = Some(v),
        PropertyEdit::ShadowOffsetX(v) if has_shadow => patch.shadow_offset_x = Some(v),
        PropertyEdit::ShadowOffsetY(v) if has_shadow => patch.shadow_offset_y = Some(v),
        other => {
            tracing::debug!("Edit {other:?} does not apply to this element kind");
            return None;
        }
    }
    Some(patch)
}

#[allow(clippy::cast_precision_loss)]
fn layout_fields(element: &Element) -> Vec<PropertyField> {
    vec![
        PropertyField::new("x", "X", PropertyValue::Number(element.x)),
        PropertyField::new("y", "Y", PropertyValue::Number(element.y)),
        PropertyField::new("width", "Width", PropertyValue::Number(element.width)),
        PropertyField::new("height", "Height", PropertyValue::Number(element.height)),
        PropertyField::new(
            "rotation",
            "Rotation",
            PropertyValue::Number(display_rotation(element.rotation)),
        ),
        PropertyField::new("zIndex", "Layer", PropertyValue::Number(element.z_index as f32)),
        PropertyField::new(
            "opacity",
            "Opacity",
            PropertyValue::Slider {
                value: element.opacity,
                min: 0.0,
                max: 100.0,
            },
        ),
        PropertyField::new("visible", "Visible", PropertyValue::Toggle(element.visible)),
        PropertyField::new("locked", "Locked", PropertyValue::Toggle(element.locked)),
    ]
}

fn style_fields(element: &Element) -> Vec<PropertyField> {
    match &element.kind {
        ElementKind::Text { content, style } => {
            let mut fields = vec![
                PropertyField::new("content", "Text", PropertyValue::Text(content.clone())),
                PropertyField::new(
                    "fontFamily",
                    "Font",
                    PropertyValue::Text(style.font_family.clone()),
                ),
                PropertyField::new("fontSize", "Size", PropertyValue::Number(style.font_size)),
                PropertyField::new(
                    "fontWeight",
                    "Weight",
                    choice(&style.font_weight, &[FontWeight::Normal, FontWeight::Bold]),
                ),
                PropertyField::new(
                    "fontStyle",
                    "Style",
                    choice(&style.font_style, &[FontStyle::Normal, FontStyle::Italic]),
                ),
                PropertyField::new(
                    "textDecoration",
                    "Decoration",
                    choice(
                        &style.text_decoration,
                        &[
                            TextDecoration::None,
                            TextDecoration::Underline,
                            TextDecoration::LineThrough,
                        ],
                    ),
                ),
                PropertyField::new("color", "Color", PropertyValue::Color(style.color.clone())),
                PropertyField::new(
                    "textAlign",
                    "Align",
                    choice(
                        &style.text_align,
                        &[TextAlign::Left, TextAlign::Center, TextAlign::Right],
                    ),
                ),
            ];
            fields.extend(shadow_fields(&style.shadow));
            fields
        }
        ElementKind::Shape { style } => {
            let mut fields = vec![
                PropertyField::new(
                    "shapeType",
                    "Shape",
                    choice(
                        &style.shape_type,
                        &[ShapeType::Circle, ShapeType::Rectangle, ShapeType::Triangle],
                    ),
                ),
                PropertyField::new("fill", "Fill", PropertyValue::Color(style.fill.clone())),
                PropertyField::new("stroke", "Stroke", PropertyValue::Color(style.stroke.clone())),
                PropertyField::new(
                    "strokeWidth",
                    "Stroke width",
                    PropertyValue::Number(style.stroke_width),
                ),
            ];
            if style.shape_type == ShapeType::Rectangle {
                fields.push(PropertyField::new(
                    "borderRadius",
                    "Corner radius",
                    PropertyValue::Number(style.border_radius),
                ));
            }
            fields.extend(shadow_fields(&style.shadow));
            fields
        }
        ElementKind::Image { image_data } => vec![PropertyField::new(
            "imageData",
            "Source",
            PropertyValue::Text(image_data.clone().unwrap_or_default()),
        )],
    }
}

fn shadow_fields(shadow: &crate::element::Shadow) -> Vec<PropertyField> {
    let mut fields = vec![PropertyField::new(
        "shadow",
        "Shadow",
        PropertyValue::Toggle(shadow.enabled),
    )];
    if shadow.enabled {
        fields.extend([
            PropertyField::new(
                "shadowColor",
                "Shadow color",
                PropertyValue::Color(shadow.color.clone()),
            ),
            PropertyField::new("shadowBlur", "Shadow blur", PropertyValue::Number(shadow.blur)),
            PropertyField::new(
                "shadowOffsetX",
                "Shadow X",
                PropertyValue::Number(shadow.offset_x),
            ),
            PropertyField::new(
                "shadowOffsetY",
                "Shadow Y",
                PropertyValue::Number(shadow.offset_y),
            ),
        ]);
    }
    fields
}

fn effect_fields(element: &Element) -> Vec<PropertyField> {
    let filters = &element.filters;
    let slider = |value, max| PropertyValue::Slider {
        value,
        min: 0.0,
        max,
    };
    vec![
        PropertyField::new("blur", "Blur", slider(filters.blur, MAX_BLUR)),
        PropertyField::new(
            "brightness",
            "Brightness",
            slider(filters.brightness, MAX_FILTER_PERCENT),
        ),
        PropertyField::new(
            "contrast",
            "Contrast",
            slider(filters.contrast, MAX_FILTER_PERCENT),
        ),
        PropertyField::new(
            "saturate",
            "Saturation",
            slider(filters.saturate, MAX_FILTER_PERCENT),
        ),
    ]
}

/// Wire name of a unit enum variant, as it appears in element JSON.
fn wire_name<T: Serialize>(value: &T) -> String {
    match serde_json::to_value(value) {
        Ok(serde_json::Value::String(name)) => name,
        _ => String::new(),
    }
}

fn choice<T: Serialize>(selected: &T, options: &[T]) -> PropertyValue {
    PropertyValue::Choice {
        selected: wire_name(selected),
        options: options.iter().map(wire_name).collect(),
    }
}
