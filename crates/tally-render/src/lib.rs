//! # tally-render
//!
//! The Card Renderer: pure raster composition from structured ranking/level/
//! fortune data to PNG bytes. No persisted state; identical inputs produce
//! visually equivalent output modulo the randomized decorative scatter.

pub mod assets;
pub mod draw;
pub mod fortune;
pub mod level;
pub mod palette;
pub mod ranking;

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};
use tracing::instrument;

use tally_common::RenderConfig;
use tally_core::traits::{CardRenderer, RepoResult};
use tally_core::{DomainError, FortuneCard, LevelCard, RankingCard};

pub use assets::RenderAssets;

/// Renderer backed by the loaded font assets
pub struct TallyCardRenderer {
    assets: RenderAssets,
}

impl TallyCardRenderer {
    /// Load fonts from the render configuration
    pub fn from_config(config: &RenderConfig) -> Result<Self, DomainError> {
        Ok(Self {
            assets: RenderAssets::load(config)?,
        })
    }

    /// Build from preloaded assets (tests)
    pub fn new(assets: RenderAssets) -> Self {
        Self { assets }
    }
}

impl CardRenderer for TallyCardRenderer {
    #[instrument(skip(self, card), fields(entries = card.entries.len()))]
    fn render_ranking(&self, card: &RankingCard) -> RepoResult<Vec<u8>> {
        let mut rng = rand::thread_rng();
        encode_png(ranking::compose(card, &self.assets, &mut rng))
    }

    #[instrument(skip(self, card), fields(level = card.level))]
    fn render_level(&self, card: &LevelCard) -> RepoResult<Vec<u8>> {
        encode_png(level::compose(card, &self.assets))
    }

    #[instrument(skip(self, card))]
    fn render_fortune(&self, card: &FortuneCard) -> RepoResult<Vec<u8>> {
        let mut rng = rand::thread_rng();
        encode_png(fortune::compose(card, &self.assets, &mut rng))
    }
}

fn encode_png(image: RgbaImage) -> RepoResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image::DynamicImage::ImageRgba8(image)
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| DomainError::RenderFailure(e.to_string()))?;
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use ab_glyph::FontVec;
    use chrono::{TimeZone, Utc};
    use tally_core::{AggregationWindow, RankingCardEntry, RoleColor, Snowflake, Tier};

    /// Load the configured main font; renders are skipped when no font file
    /// is present (same convention as the DATABASE_URL-guarded db tests).
    fn test_assets() -> Option<RenderAssets> {
        let path = std::env::var("RENDER_FONT_PATH")
            .unwrap_or_else(|_| "./assets/fonts/main.ttf".to_string());
        let bytes = std::fs::read(path).ok()?;
        let font = FontVec::try_from_vec(bytes).ok()?;
        Some(RenderAssets::from_fonts(font, None))
    }

    fn sample_card() -> RankingCard {
        let window = AggregationWindow::new(
            Utc.with_ymd_and_hms(2025, 5, 1, 0, 0, 0).unwrap(),
            Utc.with_ymd_and_hms(2025, 5, 7, 23, 59, 59).unwrap(),
        )
        .unwrap();
        let entries = (0..6)
            .map(|rank| RankingCardEntry {
                rank,
                user_id: Snowflake::new(i64::from(rank) + 100),
                display_name: format!("chatter-{rank}"),
                count: 100 - i64::from(rank) * 10,
                tier: Tier::for_rank(rank as usize),
                streak: if rank == 0 { 3 } else { 1 },
                avatar: None,
            })
            .collect();
        RankingCard {
            server_name: "Test Server".to_string(),
            window,
            entries,
            first_role_name: "Champion".to_string(),
            first_role_color: RoleColor::new(0xDCD4FF),
            other_role_name: "Top Chatter".to_string(),
            other_role_color: RoleColor::new(0xD4E8FF),
        }
    }

    #[test]
    fn test_ranking_render_produces_png() {
        let Some(assets) = test_assets() else {
            return;
        };
        let renderer = TallyCardRenderer::new(assets);
        let bytes = renderer.render_ranking(&sample_card()).unwrap();
        // PNG magic
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A]);
    }

    #[test]
    fn test_level_render_produces_png() {
        let Some(assets) = test_assets() else {
            return;
        };
        let renderer = TallyCardRenderer::new(assets);
        let card = LevelCard {
            display_name: "chatter".to_string(),
            level: 12,
            xp: 25_000,
            xp_into_level: 1_200,
            xp_needed: 4_800,
            progress: 0.25,
            total_messages: 5_000,
            avatar: None,
        };
        let bytes = renderer.render_level(&card).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }

    #[test]
    fn test_fortune_render_produces_png() {
        let Some(assets) = test_assets() else {
            return;
        };
        let renderer = TallyCardRenderer::new(assets);
        let card = FortuneCard {
            display_name: "chatter".to_string(),
            title: "No. 7 — Great Blessing".to_string(),
            message: "A good opportunity will find you online today. Check your inbox."
                .to_string(),
        };
        let bytes = renderer.render_fortune(&card).unwrap();
        assert_eq!(&bytes[..4], &[0x89, b'P', b'N', b'G']);
    }
}
