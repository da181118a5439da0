//! GIF service - search passthrough with share-URL resolution

use tracing::instrument;

use crate::dto::GifResponse;

use super::context::ServiceContext;
use super::error::{ServiceError, ServiceResult};

/// Maximum results returned per search
pub const SEARCH_LIMIT: u8 = 8;

/// GIF service
pub struct GifService<'a> {
    ctx: &'a ServiceContext,
}

impl<'a> GifService<'a> {
    /// Create a new GifService
    pub fn new(ctx: &'a ServiceContext) -> Self {
        Self { ctx }
    }

    /// Search by free text, or resolve a pasted share URL to its single GIF
    #[instrument(skip(self))]
    pub async fn search(&self, query: &str) -> ServiceResult<Vec<GifResponse>> {
        let provider = self
            .ctx
            .gif()
            .ok_or_else(|| ServiceError::validation("GIF search is not configured"))?;

        let query = query.trim();
        if query.is_empty() {
            return Err(ServiceError::validation("empty search query"));
        }

        if let Some(id) = share_url_id(query) {
            let result = provider.by_id(id).await?;
            return Ok(result.map(GifResponse::from).into_iter().collect());
        }

        let results = provider.search(query, SEARCH_LIMIT).await?;
        Ok(results.into_iter().map(GifResponse::from).collect())
    }
}

/// Extract the post ID from a share URL like
/// `https://tenor.com/view/funny-cat-1234567890` (with an optional locale
/// segment). Returns None for anything else, which is then treated as a
/// plain search query.
pub fn share_url_id(input: &str) -> Option<&str> {
    let rest = input
        .strip_prefix("https://")
        .or_else(|| input.strip_prefix("http://"))?;
    let rest = rest.strip_prefix("tenor.com/")?;

    // Optional two-letter locale segment before "view/"
    let rest = match rest.strip_prefix("view/") {
        Some(path) => path,
        None => {
            let (locale, tail) = rest.split_once('/')?;
            if locale.len() != 2 {
                return None;
            }
            tail.strip_prefix("view/")?
        }
    };

    let slug = rest.split(['?', '#']).next()?;
    let id = slug.rsplit('-').next()?;
    if !id.is_empty() && id.bytes().all(|b| b.is_ascii_digit()) {
        Some(id)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_share_url_id_plain() {
        assert_eq!(
            share_url_id("https://tenor.com/view/funny-cat-1234567890"),
            Some("1234567890")
        );
    }

    #[test]
    fn test_share_url_id_with_locale() {
        assert_eq!(
            share_url_id("https://tenor.com/ko/view/funny-cat-42"),
            Some("42")
        );
    }

    #[test]
    fn test_share_url_id_rejects_non_urls() {
        assert_eq!(share_url_id("funny cat"), None);
        assert_eq!(share_url_id("https://example.com/view/x-1"), None);
        assert_eq!(share_url_id("https://tenor.com/view/no-digits"), None);
    }

    #[test]
    fn test_share_url_id_strips_query() {
        assert_eq!(
            share_url_id("https://tenor.com/view/cat-99?utm=x"),
            Some("99")
        );
    }
}
