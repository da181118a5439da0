//! Fortune card compositor - aged-paper slip with the drawn fortune

use ab_glyph::PxScale;
use image::{Rgba, RgbaImage};
use rand::Rng;

use tally_core::FortuneCard;

use crate::assets::RenderAssets;
use crate::draw::{stroke_rounded_border, text_plain, text_width};

pub const CARD_WIDTH: u32 = 500;
pub const CARD_HEIGHT: u32 = 700;

const PAPER: Rgba<u8> = Rgba([255, 248, 220, 255]);
const INK: Rgba<u8> = Rgba([90, 60, 40, 255]);
const SEAL: Rgba<u8> = Rgba([170, 40, 40, 255]);

/// Wrap text into lines of at most `max_width` pixels
pub fn wrap_text<F: ab_glyph::Font>(
    font: &F,
    scale: PxScale,
    text: &str,
    max_width: i32,
) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();
    for word in text.split_whitespace() {
        let candidate = if current.is_empty() {
            word.to_string()
        } else {
            format!("{current} {word}")
        };
        if text_width(font, scale, &candidate) <= max_width || current.is_empty() {
            current = candidate;
        } else {
            lines.push(current);
            current = word.to_string();
        }
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Compose the fortune card
pub fn compose<R: Rng>(card: &FortuneCard, assets: &RenderAssets, rng: &mut R) -> RgbaImage {
    let mut canvas = RgbaImage::from_pixel(CARD_WIDTH, CARD_HEIGHT, PAPER);

    // Paper grain: faint random fibers
    for _ in 0..500 {
        let x0 = rng.gen_range(0..CARD_WIDTH as i32) as f32;
        let y0 = rng.gen_range(0..CARD_HEIGHT as i32) as f32;
        let x1 = (x0 + rng.gen_range(-18.0..18.0)).clamp(0.0, CARD_WIDTH as f32 - 1.0);
        let y1 = (y0 + rng.gen_range(-18.0..18.0)).clamp(0.0, CARD_HEIGHT as f32 - 1.0);
        let fiber = Rgba([
            rng.gen_range(230..=250),
            rng.gen_range(230..=250),
            rng.gen_range(200..=220),
            255,
        ]);
        imageproc::drawing::draw_line_segment_mut(&mut canvas, (x0, y0), (x1, y1), fiber);
    }

    // Double seal-red frame
    stroke_rounded_border(&mut canvas, 14, 14, CARD_WIDTH - 28, CARD_HEIGHT - 28, 10, 3, SEAL);
    stroke_rounded_border(&mut canvas, 26, 26, CARD_WIDTH - 52, CARD_HEIGHT - 52, 8, 1, SEAL);

    // Title
    let title_font = assets.font_for(&card.title);
    let title_scale = PxScale::from(40.0);
    let title_w = text_width(title_font, title_scale, &card.title);
    text_plain(
        &mut canvas,
        (CARD_WIDTH as i32 - title_w) / 2,
        70,
        &card.title,
        title_font,
        title_scale,
        SEAL,
    );

    // Message body, wrapped and centered
    let body_font = assets.font_for(&card.message);
    let body_scale = PxScale::from(24.0);
    let lines = wrap_text(body_font, body_scale, &card.message, CARD_WIDTH as i32 - 110);
    let mut y = 180;
    for line in &lines {
        let w = text_width(body_font, body_scale, line);
        text_plain(&mut canvas, (CARD_WIDTH as i32 - w) / 2, y, line, body_font, body_scale, INK);
        y += 38;
    }

    // Recipient footer
    let footer = format!("— {}", card.display_name);
    let footer_font = assets.font_for(&footer);
    let footer_scale = PxScale::from(22.0);
    let w = text_width(footer_font, footer_scale, &footer);
    text_plain(
        &mut canvas,
        (CARD_WIDTH as i32 - w) / 2,
        CARD_HEIGHT as i32 - 80,
        &footer,
        footer_font,
        footer_scale,
        INK,
    );

    canvas
}
