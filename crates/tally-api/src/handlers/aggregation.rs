//! Aggregation handlers - the run-aggregation command

use axum::{extract::State, Json};
use tally_core::{WindowBound, WindowSpec};
use tally_service::{
    AggregationResponse, AggregationService, CountSource, RunAggregationRequest, ServiceError,
};

use crate::extractors::{AuthorizedServer, ValidatedJson};
use crate::response::{ApiError, ApiResult};
use crate::state::AppState;

/// Translate the request body into a count source.
///
/// `source: "live"` selects the quick live-counter mode; otherwise both
/// window bounds are required (dates or sentinels) and the message log is
/// scanned.
fn parse_source(request: &RunAggregationRequest) -> Result<CountSource, ApiError> {
    match request.source.as_deref() {
        Some("live") => Ok(CountSource::LiveCounters),
        Some("log") | None => {
            let start = request
                .start
                .as_deref()
                .ok_or_else(|| ApiError::Service(ServiceError::validation("start is required")))?;
            let end = request
                .end
                .as_deref()
                .ok_or_else(|| ApiError::Service(ServiceError::validation("end is required")))?;
            let spec = WindowSpec::new(
                WindowBound::parse(start).map_err(ApiError::Domain)?,
                WindowBound::parse(end).map_err(ApiError::Domain)?,
            );
            Ok(CountSource::MessageLog(spec))
        }
        Some(other) => Err(ApiError::Service(ServiceError::validation(format!(
            "unknown source '{other}' (expected 'log' or 'live')"
        )))),
    }
}

/// Run one aggregation cycle
///
/// POST /servers/{server_id}/aggregation
pub async fn run_aggregation(
    State(state): State<AppState>,
    AuthorizedServer(server_id): AuthorizedServer,
    ValidatedJson(request): ValidatedJson<RunAggregationRequest>,
) -> ApiResult<Json<AggregationResponse>> {
    let source = parse_source(&request)?;
    let service = AggregationService::new(state.service_context());
    let outcome = service.run_aggregation(server_id, source).await?;
    Ok(Json(AggregationResponse::from(&outcome)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request(start: Option<&str>, end: Option<&str>, source: Option<&str>) -> RunAggregationRequest {
        RunAggregationRequest {
            start: start.map(String::from),
            end: end.map(String::from),
            source: source.map(String::from),
        }
    }

    #[test]
    fn test_parse_live_source() {
        let source = parse_source(&request(None, None, Some("live"))).unwrap();
        assert_eq!(source, CountSource::LiveCounters);
    }

    #[test]
    fn test_parse_log_source_requires_bounds() {
        assert!(parse_source(&request(None, None, None)).is_err());
        assert!(parse_source(&request(Some("t"), None, None)).is_err());

        let source = parse_source(&request(Some("20250501"), Some("t"), None)).unwrap();
        assert!(matches!(source, CountSource::MessageLog(_)));
    }

    #[test]
    fn test_parse_unknown_source_rejected() {
        assert!(parse_source(&request(None, None, Some("cache"))).is_err());
    }
}
