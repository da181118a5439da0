//! Level card compositor - avatar, level badge, and an XP progress bar

use ab_glyph::PxScale;
use image::{imageops, Rgba, RgbaImage};

use tally_core::LevelCard;

use crate::assets::RenderAssets;
use crate::draw::{
    fill_rounded_gradient, fitting_scale, framed_avatar, text_outlined, text_plain,
    vertical_gradient,
};
use crate::palette::{
    avatar_frame, BACKGROUND_BOTTOM, BACKGROUND_TOP, COUNT_TEXT, NAME_OUTLINE, NAME_TEXT,
};

pub const CARD_WIDTH: u32 = 600;
pub const CARD_HEIGHT: u32 = 240;

const BAR_X: i32 = 170;
const BAR_Y: i32 = 150;
const BAR_W: u32 = 390;
const BAR_H: u32 = 26;

/// Compose the level card
pub fn compose(card: &LevelCard, assets: &RenderAssets) -> RgbaImage {
    let mut canvas = RgbaImage::new(CARD_WIDTH, CARD_HEIGHT);
    vertical_gradient(&mut canvas, BACKGROUND_TOP, BACKGROUND_BOTTOM);

    let avatar = framed_avatar(card.avatar.as_deref(), 120, 4, avatar_frame(0));
    imageops::overlay(&mut canvas, &avatar, 24, 48);

    let name_font = assets.font_for(&card.display_name);
    let name_scale = fitting_scale(name_font, &card.display_name, 380, 32.0, 18.0);
    text_outlined(
        &mut canvas,
        BAR_X,
        36,
        &card.display_name,
        name_font,
        name_scale,
        NAME_TEXT,
        NAME_OUTLINE,
        2,
    );

    let level_text = format!("Level {}", card.level);
    text_outlined(
        &mut canvas,
        BAR_X,
        86,
        &level_text,
        assets.main(),
        PxScale::from(40.0),
        NAME_TEXT,
        NAME_OUTLINE,
        2,
    );

    // Progress track and fill
    fill_rounded_gradient(
        &mut canvas,
        i64::from(BAR_X),
        i64::from(BAR_Y),
        BAR_W,
        BAR_H,
        BAR_H / 2,
        Rgba([255, 255, 255, 190]),
        Rgba([235, 235, 250, 190]),
    );
    let fill_w = (BAR_W as f32 * card.progress.clamp(0.0, 1.0)) as u32;
    if fill_w > BAR_H {
        fill_rounded_gradient(
            &mut canvas,
            i64::from(BAR_X),
            i64::from(BAR_Y),
            fill_w,
            BAR_H,
            BAR_H / 2,
            Rgba([0xDC, 0xD4, 0xFF, 255]),
            Rgba([150, 140, 220, 255]),
        );
    }

    let caption = format!(
        "{} / {} XP · {} messages total",
        card.xp_into_level, card.xp_needed, card.total_messages
    );
    text_plain(
        &mut canvas,
        BAR_X,
        BAR_Y + BAR_H as i32 + 12,
        &caption,
        assets.main(),
        PxScale::from(20.0),
        COUNT_TEXT,
    );

    canvas
}
