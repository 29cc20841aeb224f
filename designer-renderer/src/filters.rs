//! Per-pixel post-processing on premultiplied RGBA8 pixmaps: the element
//! filters (brightness, contrast, saturate, blur) and drop-shadow
//! generation.

use designer_core::{Filters, Rgba};
use tiny_skia::Pixmap;

/// Kernel radius in standard deviations.
const BLUR_EXTENT: f32 = 3.0;

/// Apply brightness, contrast and saturate in that order, then blur.
///
/// Percentages follow CSS filter semantics (100 = unchanged). `scale`
/// converts the scene-unit blur radius into surface pixels.
pub fn apply_filters(pixmap: &mut Pixmap, filters: &Filters, scale: f32) {
    if filters.is_identity() {
        return;
    }
    adjust_color(pixmap, filters);
    if filters.blur > 0.0 {
        gaussian_blur(pixmap, filters.blur * scale);
    }
}

#[allow(clippy::float_cmp)]
fn adjust_color(pixmap: &mut Pixmap, filters: &Filters) {
    let brightness = (filters.brightness / 100.0).max(0.0);
    let contrast = (filters.contrast / 100.0).max(0.0);
    let saturate = (filters.saturate / 100.0).max(0.0);
    if brightness == 1.0 && contrast == 1.0 && saturate == 1.0 {
        return;
    }

    for px in pixmap.data_mut().chunks_exact_mut(4) {
        let a = px[3];
        if a == 0 {
            continue;
        }
        let alpha = f32::from(a) / 255.0;
        // Work on straight color, the way CSS filters are specified.
        let mut rgb = [
            f32::from(px[0]) / 255.0 / alpha,
            f32::from(px[1]) / 255.0 / alpha,
            f32::from(px[2]) / 255.0 / alpha,
        ];

        for c in &mut rgb {
            *c *= brightness;
            *c = (*c - 0.5) * contrast + 0.5;
        }
        rgb = saturate_rgb(rgb, saturate);

        for (dst, c) in px.iter_mut().zip(rgb) {
            *dst = unit_to_u8(c.clamp(0.0, 1.0) * alpha);
        }
    }
}

/// The SVG/CSS `saturate` color matrix.
fn saturate_rgb([r, g, b]: [f32; 3], s: f32) -> [f32; 3] {
    [
        (0.213 + 0.787 * s) * r + (0.715 - 0.715 * s) * g + (0.072 - 0.072 * s) * b,
        (0.213 - 0.213 * s) * r + (0.715 + 0.285 * s) * g + (0.072 - 0.072 * s) * b,
        (0.213 - 0.213 * s) * r + (0.715 - 0.715 * s) * g + (0.072 + 0.928 * s) * b,
    ]
}

#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn unit_to_u8(v: f32) -> u8 {
    (v * 255.0).round().clamp(0.0, 255.0) as u8
}

/// Separable gaussian blur with standard deviation `sigma` in pixels.
///
/// Edges clamp, so a layer's transparent border stays transparent.
pub fn gaussian_blur(pixmap: &mut Pixmap, sigma: f32) {
    if !sigma.is_finite() || sigma <= 0.0 {
        return;
    }
    // Edges clamp, so taps beyond the longer side add nothing new.
    #[allow(clippy::cast_precision_loss)]
    let max_radius = pixmap.width().max(pixmap.height()) as f32;
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let radius = (sigma * BLUR_EXTENT).ceil().min(max_radius) as usize;
    if radius == 0 {
        return;
    }

    let kernel = gaussian_kernel_q16(radius, sigma);
    let width = pixmap.width() as usize;
    let height = pixmap.height() as usize;
    let mut tmp = vec![0u8; pixmap.data().len()];

    horizontal_pass(pixmap.data(), &mut tmp, width, height, &kernel);
    vertical_pass(&tmp, pixmap.data_mut(), width, height, &kernel);
}

/// Normalized gaussian weights in Q16 fixed point, summing to exactly 1.0.
#[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
fn gaussian_kernel_q16(radius: usize, sigma: f32) -> Vec<u32> {
    let sigma = f64::from(sigma);
    let denom = 2.0 * sigma * sigma;
    let weights_f: Vec<f64> = (0..=2 * radius)
        .map(|i| {
            #[allow(clippy::cast_precision_loss)]
            let x = i as f64 - radius as f64;
            (-x * x / denom).exp()
        })
        .collect();
    let sum: f64 = weights_f.iter().sum();

    let mut weights: Vec<u32> = weights_f
        .iter()
        .map(|w| ((w / sum) * 65536.0).round().clamp(0.0, 65536.0) as u32)
        .collect();
    let total: u32 = weights.iter().sum();
    // Rounding drift goes to the center tap.
    weights[radius] = (weights[radius] + 65536).saturating_sub(total);
    weights
}

fn horizontal_pass(src: &[u8], dst: &mut [u8], width: usize, height: usize, k: &[u32]) {
    let radius = k.len() / 2;
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sx = (x + ki).saturating_sub(radius).min(width - 1);
                let idx = (y * width + sx) * 4;
                for (c, slot) in acc.iter_mut().enumerate() {
                    *slot += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = (y * width + x) * 4;
            for (c, slot) in acc.iter().enumerate() {
                dst[out + c] = q16_to_u8(*slot);
            }
        }
    }
}

fn vertical_pass(src: &[u8], dst: &mut [u8], width: usize, height: usize, k: &[u32]) {
    let radius = k.len() / 2;
    for y in 0..height {
        for x in 0..width {
            let mut acc = [0u64; 4];
            for (ki, &kw) in k.iter().enumerate() {
                let sy = (y + ki).saturating_sub(radius).min(height - 1);
                let idx = (sy * width + x) * 4;
                for (c, slot) in acc.iter_mut().enumerate() {
                    *slot += u64::from(kw) * u64::from(src[idx + c]);
                }
            }
            let out = (y * width + x) * 4;
            for (c, slot) in acc.iter().enumerate() {
                dst[out + c] = q16_to_u8(*slot);
            }
        }
    }
}

#[allow(clippy::cast_possible_truncation)]
fn q16_to_u8(acc: u64) -> u8 {
    ((acc + 32768) >> 16).min(255) as u8
}

/// Build a drop shadow from a layer's coverage: every pixel becomes
/// `color` at the layer's alpha, shifted by `(dx, dy)` pixels and blurred.
#[must_use]
pub fn drop_shadow(layer: &Pixmap, color: Rgba, dx: f32, dy: f32, sigma: f32) -> Option<Pixmap> {
    let mut mask = Pixmap::new(layer.width(), layer.height())?;
    let width = layer.width() as usize;
    let height = layer.height() as usize;
    #[allow(clippy::cast_possible_truncation)]
    let (ox, oy) = (dx.round() as isize, dy.round() as isize);

    let src = layer.data();
    let dst = mask.data_mut();
    for y in 0..height {
        let Some(sy) = y.checked_add_signed(-oy).filter(|&sy| sy < height) else {
            continue;
        };
        for x in 0..width {
            let Some(sx) = x.checked_add_signed(-ox).filter(|&sx| sx < width) else {
                continue;
            };
            let coverage = u16::from(src[(sy * width + sx) * 4 + 3]);
            if coverage == 0 {
                continue;
            }
            let a = mul_div255(coverage, u16::from(color.a));
            let out = (y * width + x) * 4;
            dst[out] = mul_div255(u16::from(color.r), u16::from(a));
            dst[out + 1] = mul_div255(u16::from(color.g), u16::from(a));
            dst[out + 2] = mul_div255(u16::from(color.b), u16::from(a));
            dst[out + 3] = a;
        }
    }

    gaussian_blur(&mut mask, sigma);
    Some(mask)
}

#[allow(clippy::cast_possible_truncation)]
fn mul_div255(x: u16, y: u16) -> u8 {
    ((u32::from(x) * u32::from(y) + 127) / 255) as u8
}
