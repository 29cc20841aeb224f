//! Render Integration Tests
//!
//! Renders small scenes and inspects the resulting pixels:
//! - Paint order, opacity and visibility
//! - Canvas chrome (grid, selection outline)
//! - Zoom, rotation, filters and shadows
//! - Asynchronous image decoding

use std::time::Duration;

use anyhow::Result;
use designer_core::{
    Element, ElementKind, ElementPatch, Filters, FiltersPatch, SceneStore, Shadow, ShapeStyle,
    ShapeType,
};
use designer_renderer::{CanvasSettings, Frame, Renderer, RendererConfig};

/// 1×1 opaque red PNG.
const RED_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mP8z8DwHwAFBQIAX8jx0gAAAABJRU5ErkJggg==";

const WHITE: [u8; 4] = [255, 255, 255, 255];
const RED: [u8; 4] = [255, 0, 0, 255];
const BLUE: [u8; 4] = [0, 0, 255, 255];

fn init_tracing() {
    let _ = tracing_subscriber::fmt().with_test_writer().try_init();
}

fn renderer() -> Renderer {
    init_tracing();
    Renderer::new(RendererConfig {
        load_system_fonts: false,
        ..RendererConfig::default()
    })
}

fn filled(fill: &str, x: f32, y: f32, w: f32, h: f32) -> Element {
    Element::new(ElementKind::Shape {
        style: ShapeStyle {
            fill: fill.to_string(),
            ..ShapeStyle::default()
        },
    })
    .with_bounds(x, y, w, h)
}

fn canvas() -> CanvasSettings {
    CanvasSettings::new(200.0, 200.0)
}

fn pixel(frame: &Frame, x: u32, y: u32) -> [u8; 4] {
    frame.pixel(x, y).expect("pixel in bounds")
}

fn assert_near(actual: [u8; 4], expected: [u8; 4], tolerance: u8) {
    for (a, e) in actual.iter().zip(expected) {
        assert!(
            a.abs_diff(e) <= tolerance,
            "pixel {actual:?} not within {tolerance} of {expected:?}"
        );
    }
}

// ============================================================================
// Paint Order
// ============================================================================

#[test]
fn test_higher_z_paints_on_top() -> Result<()> {
    let mut renderer = renderer();
    let red = filled("#FF0000", 0.0, 0.0, 100.0, 100.0).with_z_index(0);
    let blue = filled("#0000FF", 50.0, 50.0, 100.0, 100.0).with_z_index(1);

    let frame = renderer.render(&[red.clone(), blue.clone()], None, &canvas())?;
    assert_eq!(pixel(&frame, 25, 25), RED);
    assert_eq!(pixel(&frame, 75, 75), BLUE);
    assert_eq!(pixel(&frame, 175, 175), WHITE);

    // Raising red above blue changes only the overlap.
    let frame = renderer.render(&[red.with_z_index(2), blue], None, &canvas())?;
    assert_eq!(pixel(&frame, 75, 75), RED);
    assert_eq!(pixel(&frame, 125, 125), BLUE);
    Ok(())
}

#[test]
fn test_equal_z_keeps_insertion_order() -> Result<()> {
    let mut renderer = renderer();
    let first = filled("#FF0000", 0.0, 0.0, 100.0, 100.0);
    let second = filled("#0000FF", 0.0, 0.0, 100.0, 100.0);
    let frame = renderer.render(&[first, second], None, &canvas())?;
    assert_eq!(pixel(&frame, 50, 50), BLUE);
    Ok(())
}

// ============================================================================
// Opacity and Visibility
// ============================================================================

#[test]
fn test_zero_opacity_draws_nothing() -> Result<()> {
    let mut renderer = renderer();
    let red = filled("#FF0000", 0.0, 0.0, 100.0, 100.0).with_opacity(0.0);
    let frame = renderer.render(&[red], None, &canvas())?;
    assert_eq!(pixel(&frame, 50, 50), WHITE);
    Ok(())
}

#[test]
fn test_half_opacity_blends_with_background() -> Result<()> {
    let mut renderer = renderer();
    let red = filled("#FF0000", 0.0, 0.0, 100.0, 100.0).with_opacity(50.0);
    let frame = renderer.render(&[red], None, &canvas())?;
    assert_near(pixel(&frame, 50, 50), [255, 128, 128, 255], 2);
    Ok(())
}

#[test]
fn test_opacity_does_not_leak_to_next_element() -> Result<()> {
    let mut renderer = renderer();
    let faded = filled("#FF0000", 0.0, 0.0, 50.0, 50.0).with_opacity(10.0);
    let solid = filled("#0000FF", 100.0, 100.0, 50.0, 50.0).with_z_index(1);
    let frame = renderer.render(&[faded, solid], None, &canvas())?;
    assert_eq!(pixel(&frame, 125, 125), BLUE);
    Ok(())
}

#[test]
fn test_invisible_element_is_skipped() -> Result<()> {
    let mut renderer = renderer();
    let hidden = filled("#FF0000", 0.0, 0.0, 100.0, 100.0).with_visible(false);
    let id = hidden.id;
    let frame = renderer.render(&[hidden], Some(id), &canvas())?;
    assert_eq!(pixel(&frame, 50, 50), WHITE);
    // No selection outline for a hidden element either.
    assert_eq!(pixel(&frame, 101, 50), WHITE);
    Ok(())
}

// ============================================================================
// Canvas Chrome
// ============================================================================

#[test]
fn test_grid_draws_only_when_enabled() -> Result<()> {
    let mut renderer = renderer();
    let plain = renderer.render(&[], None, &canvas())?;
    assert_eq!(pixel(&plain, 20, 10), WHITE);

    let grid = renderer.render(&[], None, &canvas().with_grid(true))?;
    assert_ne!(pixel(&grid, 20, 10), WHITE);
    assert_eq!(pixel(&grid, 10, 10), WHITE);
    Ok(())
}

#[test]
fn test_selection_outline_uses_accent() -> Result<()> {
    let mut renderer = renderer();
    let shape = filled("#00FF00", 50.0, 50.0, 100.0, 100.0);
    let id = shape.id;

    let unselected = renderer.render(&[shape.clone()], None, &canvas())?;
    assert_eq!(pixel(&unselected, 48, 70), WHITE);

    let selected = renderer.render(&[shape], Some(id), &canvas())?;
    // Outline sits two units outside the left edge, away from the handles.
    assert_near(pixel(&selected, 48, 70), [0x3B, 0x82, 0xF6, 255], 2);
    Ok(())
}

// ============================================================================
// Zoom and Rotation
// ============================================================================

#[test]
fn test_surface_follows_zoom() -> Result<()> {
    let mut renderer = renderer();
    let red = filled("#FF0000", 0.0, 0.0, 100.0, 100.0);

    let settings = CanvasSettings::new(200.0, 100.0).with_zoom(50.0);
    let half = renderer.render(&[red.clone()], None, &settings)?;
    assert_eq!((half.width(), half.height()), (100, 50));

    let double = renderer.render(&[red], None, &canvas().with_zoom(200.0))?;
    assert_eq!((double.width(), double.height()), (400, 400));
    assert_eq!(pixel(&double, 150, 150), RED);
    assert_eq!(pixel(&double, 250, 250), WHITE);
    Ok(())
}

#[test]
fn test_rotation_turns_about_center() -> Result<()> {
    let mut renderer = renderer();
    let bar = filled("#FF0000", 50.0, 90.0, 100.0, 20.0);

    let flat = renderer.render(&[bar.clone()], None, &canvas())?;
    assert_eq!(pixel(&flat, 60, 100), RED);
    assert_eq!(pixel(&flat, 100, 60), WHITE);

    let upright = renderer.render(&[bar.with_rotation(90.0)], None, &canvas())?;
    assert_eq!(pixel(&upright, 100, 60), RED);
    assert_eq!(pixel(&upright, 60, 100), WHITE);
    Ok(())
}

// ============================================================================
// Filters and Shadows
// ============================================================================

#[test]
fn test_zero_brightness_renders_black() -> Result<()> {
    let mut renderer = renderer();
    let red = filled("#FF0000", 0.0, 0.0, 100.0, 100.0).with_filters(Filters {
        brightness: 0.0,
        ..Filters::default()
    });
    let frame = renderer.render(&[red], None, &canvas())?;
    assert_eq!(pixel(&frame, 50, 50), [0, 0, 0, 255]);
    Ok(())
}

#[test]
fn test_zero_saturate_renders_grey() -> Result<()> {
    let mut renderer = renderer();
    let red = filled("#FF0000", 0.0, 0.0, 100.0, 100.0).with_filters(Filters {
        saturate: 0.0,
        ..Filters::default()
    });
    let frame = renderer.render(&[red], None, &canvas())?;
    let [r, g, b, _] = pixel(&frame, 50, 50);
    assert!(r.abs_diff(g) <= 1 && g.abs_diff(b) <= 1, "not grey: {r} {g} {b}");
    assert!(r < 128);
    Ok(())
}

#[test]
fn test_blur_softens_edges() -> Result<()> {
    let mut renderer = renderer();
    let sharp = filled("#FF0000", 50.0, 50.0, 100.0, 100.0);
    let blurred = sharp.clone().with_filters(Filters {
        blur: 5.0,
        ..Filters::default()
    });

    let frame = renderer.render(&[sharp], None, &canvas())?;
    assert_eq!(pixel(&frame, 47, 100), WHITE);

    let frame = renderer.render(&[blurred], None, &canvas())?;
    assert_ne!(pixel(&frame, 47, 100), WHITE);
    assert_eq!(pixel(&frame, 100, 100), RED);
    Ok(())
}

#[test]
fn test_huge_blur_renders_without_exhausting_memory() -> Result<()> {
    let mut store = SceneStore::new();
    let id = store.add_element(filled("#FF0000", 0.0, 0.0, 8.0, 8.0))?;
    store.update_element(
        id,
        &ElementPatch::filters(FiltersPatch {
            blur: Some(1e9),
            ..FiltersPatch::default()
        }),
    );

    let mut renderer = renderer();
    let elements = store.to_vec();
    let frame = renderer.render(&elements, None, &CanvasSettings::new(8.0, 8.0))?;
    assert_eq!((frame.width(), frame.height()), (8, 8));
    Ok(())
}

#[test]
fn test_shadow_is_drawn_under_shape() -> Result<()> {
    let mut renderer = renderer();
    let shadowed = Element::new(ElementKind::Shape {
        style: ShapeStyle {
            fill: "#FF0000".to_string(),
            shadow: Shadow {
                enabled: true,
                color: "#000000".to_string(),
                blur: 0.0,
                offset_x: 10.0,
                offset_y: 10.0,
            },
            ..ShapeStyle::default()
        },
    })
    .with_bounds(0.0, 0.0, 100.0, 100.0);

    let frame = renderer.render(&[shadowed], None, &canvas())?;
    assert_eq!(pixel(&frame, 50, 50), RED);
    assert_eq!(pixel(&frame, 105, 105), [0, 0, 0, 255]);
    assert_eq!(pixel(&frame, 150, 150), WHITE);
    Ok(())
}

// ============================================================================
// Shapes and Text
// ============================================================================

#[test]
fn test_circle_leaves_corners_empty() -> Result<()> {
    let mut renderer = renderer();
    let circle = Element::new(ElementKind::Shape {
        style: ShapeStyle {
            shape_type: ShapeType::Circle,
            fill: "#FF0000".to_string(),
            ..ShapeStyle::default()
        },
    })
    .with_bounds(0.0, 0.0, 100.0, 100.0);
    let frame = renderer.render(&[circle], None, &canvas())?;
    assert_eq!(pixel(&frame, 50, 50), RED);
    assert_eq!(pixel(&frame, 3, 3), WHITE);
    Ok(())
}

#[test]
fn test_text_without_fonts_still_renders_frame() -> Result<()> {
    let mut renderer = renderer();
    let text = Element::text("Hello\nWorld").with_bounds(10.0, 10.0, 150.0, 60.0);
    let frame = renderer.render(&[text], None, &canvas())?;
    assert_eq!(frame.number(), 1);
    Ok(())
}

// ============================================================================
// Images
// ============================================================================

#[test]
fn test_image_appears_after_background_decode() -> Result<()> {
    let mut renderer = renderer();
    let image = Element::image(Some(RED_PNG.to_string())).with_bounds(0.0, 0.0, 50.0, 50.0);

    let first = renderer.render(&[image.clone()], None, &canvas())?;
    assert_eq!(first.pending_images(), 1);
    assert_eq!(pixel(&first, 25, 25), WHITE);

    assert_eq!(renderer.wait_for_images(Duration::from_secs(10)), 1);

    let second = renderer.render(&[image], None, &canvas())?;
    assert_eq!(second.pending_images(), 0);
    assert_eq!(pixel(&second, 25, 25), RED);
    assert_eq!(pixel(&second, 75, 75), WHITE);
    Ok(())
}

#[test]
fn test_inline_decode_draws_on_first_frame() -> Result<()> {
    init_tracing();
    let mut renderer = Renderer::new(RendererConfig {
        load_system_fonts: false,
        background_image_decode: false,
        ..RendererConfig::default()
    });
    let image = Element::image(Some(RED_PNG.to_string())).with_bounds(0.0, 0.0, 50.0, 50.0);
    let frame = renderer.render(&[image], None, &canvas())?;
    assert_eq!(frame.pending_images(), 0);
    assert_eq!(pixel(&frame, 25, 25), RED);
    Ok(())
}

#[test]
fn test_missing_image_does_not_block_rendering() -> Result<()> {
    let mut renderer = renderer();
    let source = "/nonexistent/designer/missing.png";
    let image = Element::image(Some(source.to_string())).with_bounds(0.0, 0.0, 50.0, 50.0);
    let neighbour = filled("#0000FF", 100.0, 100.0, 50.0, 50.0);

    renderer.render(&[image.clone(), neighbour.clone()], None, &canvas())?;
    renderer.wait_for_images(Duration::from_secs(10));
    assert!(renderer.images().is_failed(source));

    let frame = renderer.render(&[image, neighbour], None, &canvas())?;
    assert_eq!(frame.pending_images(), 0);
    assert_eq!(pixel(&frame, 25, 25), WHITE);
    assert_eq!(pixel(&frame, 125, 125), BLUE);
    Ok(())
}

#[test]
fn test_image_without_data_draws_nothing() -> Result<()> {
    let mut renderer = renderer();
    let image = Element::image(None).with_bounds(0.0, 0.0, 50.0, 50.0);
    let frame = renderer.render(&[image], None, &canvas())?;
    assert_eq!(frame.pending_images(), 0);
    assert_eq!(pixel(&frame, 25, 25), WHITE);
    Ok(())
}

// ============================================================================
// Export
// ============================================================================

#[test]
fn test_frame_saves_png() -> Result<()> {
    let mut renderer = renderer();
    let red = filled("#FF0000", 0.0, 0.0, 10.0, 10.0);
    let frame = renderer.render(&[red], None, &CanvasSettings::new(10.0, 10.0))?;
    let dir = tempfile::tempdir()?;
    let path = dir.path().join("frame.png");
    frame.save_png(&path)?;
    let bytes = std::fs::read(&path)?;
    assert_eq!(&bytes[..4], b"\x89PNG");
    Ok(())
}
