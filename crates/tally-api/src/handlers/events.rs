//! Event ingest handlers
//!
//! The chat platform posts message-created events here. Gated events
//! (unauthorized server, excluded author, bot author) are acknowledged but
//! reported as not counted; the webhook sender never gets an error for them.

use axum::{extract::State, Json};
use tally_service::{ActivityService, MessageEventRequest, RecordOutcomeResponse};

use crate::extractors::ValidatedJson;
use crate::response::ApiResult;
use crate::state::AppState;

/// Ingest one message-created event
///
/// POST /events/message
pub async fn message_created(
    State(state): State<AppState>,
    ValidatedJson(event): ValidatedJson<MessageEventRequest>,
) -> ApiResult<Json<RecordOutcomeResponse>> {
    let service = ActivityService::new(state.service_context());
    let counted = service.record_message(&event).await?;
    Ok(Json(RecordOutcomeResponse { counted }))
}
