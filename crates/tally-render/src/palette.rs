//! Card color palette
//!
//! Pastel per-rank colors and the gradient endpoints, matching the deployed
//! card look.

use image::Rgba;

/// Background gradient, top color (sky blue)
pub const BACKGROUND_TOP: Rgba<u8> = Rgba([155, 190, 255, 255]);
/// Background gradient, bottom color (soft violet)
pub const BACKGROUND_BOTTOM: Rgba<u8> = Rgba([190, 170, 245, 255]);

/// Translucent white for the diagonal stripe pattern
pub const STRIPE: Rgba<u8> = Rgba([255, 255, 255, 70]);

/// Section background gradient endpoints
pub const SECTION_TOP: Rgba<u8> = Rgba([225, 230, 245, 255]);
pub const SECTION_BOTTOM: Rgba<u8> = Rgba([220, 225, 240, 255]);

/// Inner section border
pub const SECTION_BORDER: Rgba<u8> = Rgba([255, 255, 255, 200]);

/// Gold used for the header star decorations
pub const GOLD: Rgba<u8> = Rgba([255, 215, 0, 255]);

/// Count caption gray
pub const COUNT_TEXT: Rgba<u8> = Rgba([102, 102, 102, 255]);
/// Display-name white
pub const NAME_TEXT: Rgba<u8> = Rgba([255, 255, 255, 255]);
/// Role caption gray
pub const ROLE_TEXT: Rgba<u8> = Rgba([74, 74, 74, 255]);
/// Outline behind display names
pub const NAME_OUTLINE: Rgba<u8> = Rgba([80, 90, 150, 255]);

/// Pastel accent for a zero-based rank
pub fn rank_accent(rank: usize) -> Rgba<u8> {
    match rank {
        0 => Rgba([0xDC, 0xD4, 0xFF, 255]), // lavender
        1 => Rgba([0xD4, 0xE8, 0xFF, 255]), // baby blue
        2 => Rgba([0xD4, 0xFF, 0xEC, 255]), // soft mint
        3 => Rgba([0xFF, 0xEC, 0xD4, 255]), // soft peach
        4 => Rgba([0xEC, 0xD4, 0xFF, 255]), // soft purple
        _ => Rgba([0xFF, 0xF8, 0xD4, 255]), // soft cream
    }
}

/// Darker outline tone for a rank label
pub fn rank_outline(rank: usize) -> Rgba<u8> {
    match rank {
        0 => Rgba([150, 140, 200, 255]),
        1 => Rgba([140, 160, 200, 255]),
        2 => Rgba([140, 200, 180, 255]),
        3 => Rgba([200, 160, 140, 255]),
        4 => Rgba([160, 140, 200, 255]),
        _ => Rgba([200, 180, 140, 255]),
    }
}

/// Avatar frame color for a rank
pub fn avatar_frame(rank: usize) -> Rgba<u8> {
    match rank {
        0 => Rgba([220, 212, 255, 255]),
        1 => Rgba([212, 232, 255, 255]),
        _ => Rgba([228, 228, 255, 255]),
    }
}

/// Replace the alpha channel of a color
pub fn with_alpha(color: Rgba<u8>, alpha: u8) -> Rgba<u8> {
    Rgba([color[0], color[1], color[2], alpha])
}
