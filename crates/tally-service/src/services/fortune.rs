//! Fortune service - the daily-draw mini-feature
//!
//! Draws a random grade and message and renders them on the paper-slip
//! card. Pure chance, no persistence, no cooldown.

use rand::seq::SliceRandom;
use rand::Rng;
use tokio::task;
use tracing::instrument;

use tally_core::{FortuneCard, Snowflake};

use crate::dto::FortuneResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Fortune grade, best to worst
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FortuneGrade {
    GreatBlessing,
    Blessing,
    SmallBlessing,
    Misfortune,
}

impl FortuneGrade {
    pub const ALL: [FortuneGrade; 4] = [
        Self::GreatBlessing,
        Self::Blessing,
        Self::SmallBlessing,
        Self::Misfortune,
    ];

    pub fn label(&self) -> &'static str {
        match self {
            Self::GreatBlessing => "Great Blessing",
            Self::Blessing => "Blessing",
            Self::SmallBlessing => "Small Blessing",
            Self::Misfortune => "Misfortune",
        }
    }

    fn messages(&self) -> &'static [&'static str] {
        match self {
            Self::GreatBlessing => &[
                "A great opportunity will find you online today. New faces bring good news.",
                "Your online presence shines today. Check your inbox and DMs!",
                "Social energy is overflowing. Conversations bring you real joy today.",
                "A new connection may appear in your feeds. Stay active and watch closely!",
                "A big chance is waiting in the digital world. Fresh ideas will strike.",
                "Try a platform you have never used. Something good is waiting there.",
                "Meow!",
            ],
            Self::Blessing => &[
                "Something you find online today will prove genuinely useful.",
                "A new acquaintance may appear through the screen. Reach out first.",
                "An idea you spot in passing becomes a real help today.",
                "Plan your online time a little more deliberately; small changes pay off.",
                "Active communication brings a pleasant result before the day ends.",
                "Use your messages well today; they open an unexpected door.",
            ],
            Self::SmallBlessing => &[
                "Focus is good, but don't overdo the screen time. Manage your hours.",
                "Mind your devices today; fatigue builds faster than you notice.",
                "Keep things calm online, and don't forget the people next to you.",
                "A small slip is possible in your communities today. Re-read before you send.",
                "Feed fatigue may hit today. A short break works wonders.",
                "Budget your energy; don't start more than you can finish.",
            ],
            Self::Misfortune => &[
                "Small missteps are likely online today. Choose your words with care.",
                "Friction is possible in the open channels. Avoid sharp phrasing.",
                "A misunderstanding could spread today. Read the room before acting.",
                "Skip the pointless arguments; guard your mood instead.",
                "A minor quarrel could color your whole day. Stay composed.",
                "Check your sources twice today; bad information causes trouble.",
            ],
        }
    }
}

/// A completed draw
#[derive(Debug, Clone)]
pub struct FortuneDraw {
    pub grade: FortuneGrade,
    pub number: u32,
    pub message: &'static str,
}

impl FortuneDraw {
    /// Slip title, e.g. "No. 42 — Great Blessing"
    pub fn title(&self) -> String {
        format!("No. {} — {}", self.number, self.grade.label())
    }
}

/// Draw a fortune with the given RNG
pub fn draw_with<R: Rng>(rng: &mut R) -> FortuneDraw {
    let grade = *FortuneGrade::ALL.choose(rng).unwrap_or(&FortuneGrade::Blessing);
    let message = grade
        .messages()
        .choose(rng)
        .copied()
        .unwrap_or("The slip is blank. Draw again tomorrow.");
    FortuneDraw {
        grade,
        number: rng.gen_range(1..=100),
        message,
    }
}

/// Fortune service
pub struct FortuneService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> FortuneService<'a> {
    /// Create a new FortuneService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Draw a fortune for a member and render the slip
    #[instrument(skip(self))]
    pub async fn draw(
        &self,
        server_id: Snowflake,
        user_id: Snowflake,
    ) -> ServiceResult<FortuneResponse> {
        let draw = draw_with(&mut rand::thread_rng());

        let display_name = match self.ctx.membership().fetch_member(server_id, user_id).await {
            Ok(Some(member)) => member.display_name,
            _ => user_id.to_string(),
        };

        let card = FortuneCard {
            display_name,
            title: draw.title(),
            message: draw.message.to_string(),
        };

        let renderer = self.ctx.renderer();
        let bytes = task::spawn_blocking(move || renderer.render_fortune(&card))
            .await
            .map_err(|e| ServiceError::internal(format!("render task failed: {e}")))??;

        let response = FortuneResponse {
            grade: draw.grade.label().to_string(),
            title: draw.title(),
            message: draw.message.to_string(),
            card_png: None,
        };
        Ok(response.with_card(&bytes))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    #[test]
    fn test_draw_number_in_range() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..200 {
            let draw = draw_with(&mut rng);
            assert!((1..=100).contains(&draw.number));
            assert!(!draw.message.is_empty());
        }
    }

    #[test]
    fn test_title_format() {
        let draw = FortuneDraw {
            grade: FortuneGrade::GreatBlessing,
            number: 7,
            message: "Meow!",
        };
        assert_eq!(draw.title(), "No. 7 — Great Blessing");
    }

    #[test]
    fn test_every_grade_has_messages() {
        for grade in FortuneGrade::ALL {
            assert!(!grade.messages().is_empty());
        }
    }
}
