//! Drawing primitives shared by the card compositors

use ab_glyph::{Font, PxScale};
use image::{imageops, GrayImage, Luma, Rgba, RgbaImage};
use imageproc::drawing::{draw_text_mut, text_size};
use rand::Rng;

use crate::palette::with_alpha;

/// Fill the whole canvas with a vertical two-color gradient
pub fn vertical_gradient(canvas: &mut RgbaImage, top: Rgba<u8>, bottom: Rgba<u8>) {
    let height = canvas.height().max(1);
    for y in 0..canvas.height() {
        let progress = f32::from(y as u16) / height as f32;
        let pixel = lerp_color(top, bottom, progress);
        for x in 0..canvas.width() {
            canvas.put_pixel(x, y, pixel);
        }
    }
}

/// Linear interpolation between two colors
pub fn lerp_color(a: Rgba<u8>, b: Rgba<u8>, t: f32) -> Rgba<u8> {
    let t = t.clamp(0.0, 1.0);
    let mix = |from: u8, to: u8| -> u8 {
        (f32::from(from) + (f32::from(to) - f32::from(from)) * t).round() as u8
    };
    Rgba([
        mix(a[0], b[0]),
        mix(a[1], b[1]),
        mix(a[2], b[2]),
        mix(a[3], b[3]),
    ])
}

/// Overlay broad translucent diagonal stripes running bottom-left to
/// top-right, leaving a clean footer band.
pub fn diagonal_stripes(
    canvas: &mut RgbaImage,
    color: Rgba<u8>,
    spacing: i32,
    stripe_width: i32,
    footer: i32,
) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let mut pattern = RgbaImage::from_pixel(canvas.width(), canvas.height(), Rgba([0, 0, 0, 0]));

    let usable_height = (height - footer).max(1);
    for offset in (-width..width * 2).step_by(spacing.max(1) as usize) {
        for i in -stripe_width / 2..stripe_width / 2 {
            // Stripe from (offset + width, 0) down-left to (offset, height - footer)
            for y in 0..usable_height {
                let t = f32::from(y as u16) / usable_height as f32;
                let x = offset + width - (width as f32 * t) as i32 + i;
                if x >= 0 && x < width {
                    pattern.put_pixel(x as u32, y as u32, color);
                }
            }
        }
    }

    imageops::overlay(canvas, &pattern, 0, 0);
}

/// Scatter decorative glyphs across the canvas in three vertical bands.
///
/// Purely cosmetic randomness; the right 30% of the canvas is mostly left
/// clear so decorations stay behind the small rank sections.
pub fn scatter_glyphs<F: Font, R: Rng>(
    canvas: &mut RgbaImage,
    rng: &mut R,
    font: &F,
    glyph: &str,
    count_range: (u32, u32),
    colors: &[Rgba<u8>],
    alpha: u8,
    footer: i32,
) {
    let (width, height) = (canvas.width() as i32, canvas.height() as i32);
    let count = rng.gen_range(count_range.0..=count_range.1);
    let bands = [
        (0, height / 3),
        (height / 3, 2 * height / 3),
        (2 * height / 3, (height - footer).max(1)),
    ];
    let per_band = (count / 3).max(1);
    let scale = PxScale::from(20.0);

    for (band_start, band_end) in bands {
        if band_end <= band_start {
            continue;
        }
        for _ in 0..per_band {
            let x = rng.gen_range(0..width);
            if x > width * 7 / 10 && rng.gen::<f32>() > 0.3 {
                continue;
            }
            let y = rng.gen_range(band_start..band_end);
            let color = colors[rng.gen_range(0..colors.len())];
            draw_text_mut(canvas, with_alpha(color, alpha), x, y, scale, font, glyph);
        }
    }
}

/// Grayscale mask of a rounded rectangle (255 inside, 0 outside)
pub fn rounded_mask(width: u32, height: u32, radius: u32) -> GrayImage {
    let radius = radius.min(width / 2).min(height / 2) as i64;
    let (w, h) = (width as i64, height as i64);
    GrayImage::from_fn(width, height, |x, y| {
        let (x, y) = (x as i64, y as i64);
        // Distance check only matters inside the corner squares
        let cx = if x < radius {
            Some(radius - 1)
        } else if x >= w - radius {
            Some(w - radius)
        } else {
            None
        };
        let cy = if y < radius {
            Some(radius - 1)
        } else if y >= h - radius {
            Some(h - radius)
        } else {
            None
        };
        match (cx, cy) {
            (Some(cx), Some(cy)) => {
                let dx = x - cx;
                let dy = y - cy;
                if dx * dx + dy * dy <= radius * radius {
                    Luma([255])
                } else {
                    Luma([0])
                }
            }
            _ => Luma([255]),
        }
    })
}

/// Fill a rounded rectangle with a vertical gradient, clipped by the mask
pub fn fill_rounded_gradient(
    canvas: &mut RgbaImage,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
    radius: u32,
    top: Rgba<u8>,
    bottom: Rgba<u8>,
) {
    let mask = rounded_mask(width, height, radius);
    let mut section = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    for sy in 0..height {
        let t = f32::from(sy as u16) / height.max(1) as f32;
        let pixel = lerp_color(top, bottom, t);
        for sx in 0..width {
            if mask.get_pixel(sx, sy)[0] > 0 {
                section.put_pixel(sx, sy, pixel);
            }
        }
    }
    imageops::overlay(canvas, &section, x, y);
}

/// Stroke a rounded-rectangle border of the given thickness
pub fn stroke_rounded_border(
    canvas: &mut RgbaImage,
    x: i64,
    y: i64,
    width: u32,
    height: u32,
    radius: u32,
    thickness: u32,
    color: Rgba<u8>,
) {
    let outer = rounded_mask(width, height, radius);
    let inner_w = width.saturating_sub(thickness * 2);
    let inner_h = height.saturating_sub(thickness * 2);
    let inner = rounded_mask(inner_w, inner_h, radius.saturating_sub(thickness));

    let mut border = RgbaImage::from_pixel(width, height, Rgba([0, 0, 0, 0]));
    for sy in 0..height {
        for sx in 0..width {
            if outer.get_pixel(sx, sy)[0] == 0 {
                continue;
            }
            let in_inner = sx >= thickness
                && sy >= thickness
                && sx - thickness < inner_w
                && sy - thickness < inner_h
                && inner.get_pixel(sx - thickness, sy - thickness)[0] > 0;
            if !in_inner {
                border.put_pixel(sx, sy, color);
            }
        }
    }
    imageops::overlay(canvas, &border, x, y);
}

/// Draw text with a colored outline behind it
pub fn text_outlined<F: Font>(
    canvas: &mut RgbaImage,
    x: i32,
    y: i32,
    text: &str,
    font: &F,
    scale: PxScale,
    fill: Rgba<u8>,
    outline: Rgba<u8>,
    outline_width: i32,
) {
    for dy in -outline_width..=outline_width {
        for dx in -outline_width..=outline_width {
            if dx == 0 && dy == 0 {
                continue;
            }
            draw_text_mut(canvas, outline, x + dx, y + dy, scale, font, text);
        }
    }
    draw_text_mut(canvas, fill, x, y, scale, font, text);
}

/// Plain text draw
pub fn text_plain<F: Font>(
    canvas: &mut RgbaImage,
    x: i32,
    y: i32,
    text: &str,
    font: &F,
    scale: PxScale,
    fill: Rgba<u8>,
) {
    draw_text_mut(canvas, fill, x, y, scale, font, text);
}

/// Pixel width of a string at a scale
pub fn text_width<F: Font>(font: &F, scale: PxScale, text: &str) -> i32 {
    let (w, _) = text_size(scale, font, text);
    w as i32
}

/// Shrink the scale until the text fits `max_width`, never below `min_size`
pub fn fitting_scale<F: Font>(font: &F, text: &str, max_width: i32, start: f32, min_size: f32) -> PxScale {
    let mut size = start;
    while size > min_size {
        if text_width(font, PxScale::from(size), text) <= max_width {
            break;
        }
        size -= 1.0;
    }
    PxScale::from(size.max(min_size))
}

/// Decode, resize, round-mask, and frame an avatar; falls back to a flat
/// slate tile when the bytes do not decode.
pub fn framed_avatar(
    avatar_bytes: Option<&[u8]>,
    size: u32,
    border_width: u32,
    frame_color: Rgba<u8>,
) -> RgbaImage {
    let final_size = size + border_width * 2;
    let corner_radius = size / 5;

    let avatar = avatar_bytes
        .and_then(|bytes| image::load_from_memory(bytes).ok())
        .map(|img| {
            img.resize_exact(size, size, imageops::FilterType::Lanczos3)
                .to_rgba8()
        })
        .unwrap_or_else(|| RgbaImage::from_pixel(size, size, Rgba([65, 70, 95, 255])));

    // Frame plate
    let mut framed = RgbaImage::from_pixel(final_size, final_size, Rgba([0, 0, 0, 0]));
    let frame_mask = rounded_mask(final_size, final_size, corner_radius + border_width / 2);
    for y in 0..final_size {
        for x in 0..final_size {
            if frame_mask.get_pixel(x, y)[0] > 0 {
                framed.put_pixel(x, y, frame_color);
            }
        }
    }

    // Rounded avatar on top
    let inner_mask = rounded_mask(size, size, corner_radius.saturating_sub(border_width / 2));
    let mut masked = RgbaImage::from_pixel(size, size, Rgba([0, 0, 0, 0]));
    for y in 0..size {
        for x in 0..size {
            if inner_mask.get_pixel(x, y)[0] > 0 {
                masked.put_pixel(x, y, *avatar.get_pixel(x, y));
            }
        }
    }
    imageops::overlay(&mut framed, &masked, i64::from(border_width), i64::from(border_width));

    framed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::palette::{BACKGROUND_BOTTOM, BACKGROUND_TOP};

    #[test]
    fn test_lerp_color_endpoints() {
        assert_eq!(lerp_color(BACKGROUND_TOP, BACKGROUND_BOTTOM, 0.0), BACKGROUND_TOP);
        assert_eq!(lerp_color(BACKGROUND_TOP, BACKGROUND_BOTTOM, 1.0), BACKGROUND_BOTTOM);
    }

    #[test]
    fn test_vertical_gradient_monotonic_red_channel() {
        let mut canvas = RgbaImage::new(4, 64);
        vertical_gradient(&mut canvas, BACKGROUND_TOP, BACKGROUND_BOTTOM);
        let top = canvas.get_pixel(0, 0)[0];
        let bottom = canvas.get_pixel(0, 63)[0];
        assert!(bottom > top, "red rises from sky blue toward violet");
    }

    #[test]
    fn test_rounded_mask_corners_clipped() {
        let mask = rounded_mask(40, 40, 10);
        assert_eq!(mask.get_pixel(0, 0)[0], 0, "corner outside radius");
        assert_eq!(mask.get_pixel(20, 20)[0], 255, "center inside");
        assert_eq!(mask.get_pixel(20, 0)[0], 255, "edge midpoint inside");
    }

    #[test]
    fn test_framed_avatar_fallback_tile() {
        let framed = framed_avatar(Some(b"not an image"), 100, 4, Rgba([220, 212, 255, 255]));
        assert_eq!(framed.width(), 108);
        assert_eq!(framed.height(), 108);
        // Center pixel comes from the slate fallback
        assert_eq!(*framed.get_pixel(54, 54), Rgba([65, 70, 95, 255]));
    }
}
