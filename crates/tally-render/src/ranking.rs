//! Top-6 ranking card compositor
//!
//! 920x1050 canvas: pastel vertical gradient, translucent diagonal stripes,
//! scattered decorative glyphs, a white header band, two large sections for
//! ranks 1-2 on the left and four small rows for ranks 3-6 on the right.

use ab_glyph::PxScale;
use image::{imageops, Rgba, RgbaImage};
use rand::Rng;

use tally_core::{RankingCard, RankingCardEntry};

use crate::assets::RenderAssets;
use crate::draw::{
    diagonal_stripes, fill_rounded_gradient, fitting_scale, framed_avatar, scatter_glyphs,
    stroke_rounded_border, text_outlined, text_plain, text_width, vertical_gradient,
};
use crate::palette::{
    avatar_frame, rank_accent, rank_outline, with_alpha, BACKGROUND_BOTTOM, BACKGROUND_TOP,
    COUNT_TEXT, GOLD, NAME_OUTLINE, NAME_TEXT, ROLE_TEXT, SECTION_BORDER, SECTION_BOTTOM,
    SECTION_TOP, STRIPE,
};

pub const CARD_WIDTH: u32 = 920;
pub const CARD_HEIGHT: u32 = 1050;

const FOOTER: i32 = 50;
const HEADER_BAND: i32 = 100;

const BIG_SECTION_W: u32 = 290;
const BIG_SECTION_H: u32 = 300;
const SMALL_SECTION_W: u32 = 400;
const SMALL_SECTION_H: u32 = 140;
const SECTION_RADIUS: u32 = 20;

/// English ordinal label for a zero-based rank
pub fn ordinal(rank: u32) -> String {
    match rank {
        0 => "1st".to_string(),
        1 => "2nd".to_string(),
        2 => "3rd".to_string(),
        n => format!("{}th", n + 1),
    }
}

/// Role caption with the streak suffix past a single period
pub fn role_caption(role_name: &str, streak: i32) -> String {
    if streak > 1 {
        format!("{role_name} ({streak} in a row)")
    } else {
        role_name.to_string()
    }
}

/// Compose the full ranking card
pub fn compose<R: Rng>(card: &RankingCard, assets: &RenderAssets, rng: &mut R) -> RgbaImage {
    let mut canvas = RgbaImage::new(CARD_WIDTH, CARD_HEIGHT);

    vertical_gradient(&mut canvas, BACKGROUND_TOP, BACKGROUND_BOTTOM);
    diagonal_stripes(&mut canvas, STRIPE, 180, 70, FOOTER);

    let accents: Vec<Rgba<u8>> = (0..6).map(rank_accent).collect();
    scatter_glyphs(&mut canvas, rng, assets.main(), "◆", (4, 6), &accents, 50, FOOTER);
    scatter_glyphs(&mut canvas, rng, assets.main(), "★", (5, 7), &accents, 50, FOOTER);
    scatter_glyphs(&mut canvas, rng, assets.main(), "●", (3, 5), &accents, 50, FOOTER);

    draw_header(&mut canvas, card, assets);
    draw_sections(&mut canvas, card, assets);
    draw_footer(&mut canvas, card, assets);

    canvas
}

fn draw_header(canvas: &mut RgbaImage, card: &RankingCard, assets: &RenderAssets) {
    // White band behind the title
    for y in 0..HEADER_BAND as u32 {
        for x in 0..CARD_WIDTH {
            canvas.put_pixel(x, y, Rgba([255, 255, 255, 255]));
        }
    }

    let title = format!("{} — TOP 6", card.server_name);
    let title_font = assets.font_for(&card.server_name);
    let title_scale = fitting_scale(title_font, &title, CARD_WIDTH as i32 - 80, 52.0, 24.0);
    let title_w = text_width(title_font, title_scale, &title);
    text_plain(
        canvas,
        (CARD_WIDTH as i32 - title_w) / 2,
        24,
        &title,
        title_font,
        title_scale,
        Rgba([70, 70, 110, 255]),
    );

    // Gold stars framing the band edge
    let star_scale = PxScale::from(20.0);
    let stars = [
        (10, HEADER_BAND + 10, 255u8),
        (35, HEADER_BAND + 15, 200),
        (CARD_WIDTH as i32 - 40, HEADER_BAND + 12, 230),
        (CARD_WIDTH as i32 - 70, HEADER_BAND + 20, 180),
    ];
    for (x, y, alpha) in stars {
        text_plain(canvas, x, y, "★", assets.main(), star_scale, with_alpha(GOLD, alpha));
    }
}

fn draw_sections(canvas: &mut RgbaImage, card: &RankingCard, assets: &RenderAssets) {
    // Layout anchors carried over from the deployed card geometry
    let x_left: i32 = (CARD_WIDTH as i32 / 4 - 50) - 70;
    let x_right: i32 = x_left + BIG_SECTION_W as i32 + 50;
    let y_top: i32 = 40 + 240;
    let y_bottom: i32 = y_top + 340;

    let second_section_end = y_bottom + BIG_SECTION_H as i32 - 15;
    let stacked = second_section_end - (y_top - 15);
    let y_spacing = (stacked - SMALL_SECTION_H as i32 * 4) / 3;

    for entry in &card.entries {
        let rank = entry.rank as usize;
        match rank {
            0 => draw_big_section(canvas, card, entry, assets, x_left - 15, y_top - 15),
            1 => draw_big_section(canvas, card, entry, assets, x_left - 15, y_bottom - 15),
            _ => {
                let y = (y_top - 15) + (rank as i32 - 2) * (SMALL_SECTION_H as i32 + y_spacing) + 5;
                draw_small_section(canvas, card, entry, assets, x_right - 15, y);
            }
        }
    }
}

fn draw_section_frame(canvas: &mut RgbaImage, x: i32, y: i32, w: u32, h: u32, rank: usize) {
    fill_rounded_gradient(
        canvas,
        i64::from(x),
        i64::from(y),
        w,
        h,
        SECTION_RADIUS,
        SECTION_TOP,
        SECTION_BOTTOM,
    );
    // Inner white border, outer rank-colored border
    stroke_rounded_border(canvas, i64::from(x), i64::from(y), w, h, SECTION_RADIUS, 5, SECTION_BORDER);
    stroke_rounded_border(
        canvas,
        i64::from(x) - 3,
        i64::from(y) - 3,
        w + 6,
        h + 6,
        SECTION_RADIUS + 3,
        3,
        rank_accent(rank),
    );
}

fn draw_big_section(
    canvas: &mut RgbaImage,
    card: &RankingCard,
    entry: &RankingCardEntry,
    assets: &RenderAssets,
    x: i32,
    y: i32,
) {
    let rank = entry.rank as usize;
    draw_section_frame(canvas, x, y, BIG_SECTION_W, BIG_SECTION_H, rank);

    // Avatar centered in the upper half
    let avatar = framed_avatar(entry.avatar.as_deref(), 140, 4, avatar_frame(rank));
    let avatar_x = x + (BIG_SECTION_W as i32 - avatar.width() as i32) / 2;
    imageops::overlay(canvas, &avatar, i64::from(avatar_x), i64::from(y + 22));

    // Rank label with its tinted outline
    let label = ordinal(entry.rank);
    let label_scale = PxScale::from(34.0);
    text_outlined(
        canvas,
        x + 18,
        y + 14,
        &label,
        assets.main(),
        label_scale,
        NAME_TEXT,
        rank_outline(rank),
        2,
    );

    // Display name, shrunk to fit
    let name_font = assets.font_for(&entry.display_name);
    let name_scale = fitting_scale(name_font, &entry.display_name, BIG_SECTION_W as i32 - 40, 26.0, 16.0);
    let name_w = text_width(name_font, name_scale, &entry.display_name);
    text_outlined(
        canvas,
        x + (BIG_SECTION_W as i32 - name_w) / 2,
        y + 182,
        &entry.display_name,
        name_font,
        name_scale,
        NAME_TEXT,
        NAME_OUTLINE,
        2,
    );

    let count_text = format!("{} msgs", entry.count);
    text_plain(canvas, x + 18, y + 222, &count_text, assets.main(), PxScale::from(24.0), COUNT_TEXT);

    let role_name = match rank {
        0 => &card.first_role_name,
        _ => &card.other_role_name,
    };
    let caption = role_caption(role_name, entry.streak);
    let caption_font = assets.font_for(&caption);
    let caption_scale = fitting_scale(caption_font, &caption, BIG_SECTION_W as i32 - 36, 22.0, 14.0);
    text_plain(canvas, x + 18, y + 258, &caption, caption_font, caption_scale, ROLE_TEXT);
}

fn draw_small_section(
    canvas: &mut RgbaImage,
    card: &RankingCard,
    entry: &RankingCardEntry,
    assets: &RenderAssets,
    x: i32,
    y: i32,
) {
    let rank = entry.rank as usize;
    draw_section_frame(canvas, x, y, SMALL_SECTION_W, SMALL_SECTION_H, rank);

    let avatar = framed_avatar(entry.avatar.as_deref(), 90, 3, avatar_frame(rank));
    imageops::overlay(canvas, &avatar, i64::from(x + 18), i64::from(y + 22));

    let text_x = x + 18 + 96 + 14;

    let label = ordinal(entry.rank);
    text_outlined(
        canvas,
        text_x,
        y + 14,
        &label,
        assets.main(),
        PxScale::from(28.0),
        NAME_TEXT,
        rank_outline(rank),
        2,
    );

    let name_font = assets.font_for(&entry.display_name);
    let name_max = SMALL_SECTION_W as i32 - (text_x - x) - 18;
    let name_scale = fitting_scale(name_font, &entry.display_name, name_max, 24.0, 14.0);
    text_outlined(
        canvas,
        text_x,
        y + 50,
        &entry.display_name,
        name_font,
        name_scale,
        NAME_TEXT,
        NAME_OUTLINE,
        2,
    );

    let caption = format!(
        "{} msgs · {}",
        entry.count,
        role_caption(&card.other_role_name, entry.streak)
    );
    let caption_font = assets.font_for(&caption);
    let caption_scale = fitting_scale(caption_font, &caption, name_max, 20.0, 13.0);
    text_plain(canvas, text_x, y + 88, &caption, caption_font, caption_scale, COUNT_TEXT);
}

fn draw_footer(canvas: &mut RgbaImage, card: &RankingCard, assets: &RenderAssets) {
    let range = format!(
        "{} ~ {}",
        card.window.start.format("%Y-%m-%d %H:%M"),
        card.window.end.format("%Y-%m-%d %H:%M")
    );
    let scale = PxScale::from(20.0);
    let w = text_width(assets.main(), scale, &range);
    text_plain(
        canvas,
        (CARD_WIDTH as i32 - w) / 2,
        CARD_HEIGHT as i32 - FOOTER + 14,
        &range,
        assets.main(),
        scale,
        Rgba([90, 90, 130, 255]),
    );
}
