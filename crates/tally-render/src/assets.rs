//! Render assets - fonts loaded once at startup

use ab_glyph::FontVec;

use tally_common::RenderConfig;
use tally_core::DomainError;

/// Fonts used by every card compositor.
///
/// The main font covers the Latin range; display names routinely carry CJK
/// glyphs, which route to the fallback font when one is configured.
pub struct RenderAssets {
    main: FontVec,
    fallback: Option<FontVec>,
}

impl RenderAssets {
    /// Load fonts from the configured paths
    pub fn load(config: &RenderConfig) -> Result<Self, DomainError> {
        let main = load_font(&config.font_path)?;
        let fallback = config
            .fallback_font_path
            .as_deref()
            .map(load_font)
            .transpose()?;
        Ok(Self { main, fallback })
    }

    /// Build from already-loaded fonts (tests)
    pub fn from_fonts(main: FontVec, fallback: Option<FontVec>) -> Self {
        Self { main, fallback }
    }

    /// The main font
    pub fn main(&self) -> &FontVec {
        &self.main
    }

    /// Pick the font for a piece of text: CJK routes to the fallback
    pub fn font_for(&self, text: &str) -> &FontVec {
        match &self.fallback {
            Some(fallback) if needs_cjk_fallback(text) => fallback,
            _ => &self.main,
        }
    }
}

fn load_font(path: &str) -> Result<FontVec, DomainError> {
    let bytes = std::fs::read(path)
        .map_err(|e| DomainError::RenderFailure(format!("cannot read font {path}: {e}")))?;
    FontVec::try_from_vec(bytes)
        .map_err(|e| DomainError::RenderFailure(format!("invalid font {path}: {e}")))
}

/// Hiragana, katakana, or unified CJK ideographs
fn needs_cjk_fallback(text: &str) -> bool {
    text.chars().any(|c| {
        ('\u{3040}'..='\u{309f}').contains(&c)
            || ('\u{30a0}'..='\u{30ff}').contains(&c)
            || ('\u{4e00}'..='\u{9faf}').contains(&c)
            || ('\u{3400}'..='\u{4dbf}').contains(&c)
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_needs_cjk_fallback() {
        assert!(!needs_cjk_fallback("plain ascii"));
        assert!(!needs_cjk_fallback("café ünïcode"));
        assert!(needs_cjk_fallback("こんにちは"));
        assert!(needs_cjk_fallback("カタカナ"));
        assert!(needs_cjk_fallback("漢字まじり name"));
    }
}
