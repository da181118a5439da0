//! HTTP error mapping for the platform clients

use reqwest::StatusCode;
use tally_core::DomainError;

/// Map a transport-level failure
pub fn map_transport_error(e: reqwest::Error) -> DomainError {
    DomainError::PlatformUnavailable(e.to_string())
}

/// Map a non-success status from a member/role mutation.
///
/// 403 means the platform refused the mutation for this target (the engine
/// logs and skips); 404 means the target member or role is gone.
pub fn map_mutation_status(status: StatusCode, context: &str) -> DomainError {
    match status {
        StatusCode::FORBIDDEN => DomainError::PermissionDenied(context.to_string()),
        StatusCode::NOT_FOUND => DomainError::MemberNotFound,
        _ => DomainError::PlatformUnavailable(format!("{context}: unexpected status {status}")),
    }
}

/// Map a non-success status from a read
pub fn map_read_status(status: StatusCode, context: &str) -> DomainError {
    DomainError::PlatformUnavailable(format!("{context}: unexpected status {status}"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mutation_status_mapping() {
        assert!(matches!(
            map_mutation_status(StatusCode::FORBIDDEN, "add role"),
            DomainError::PermissionDenied(_)
        ));
        assert!(matches!(
            map_mutation_status(StatusCode::NOT_FOUND, "add role"),
            DomainError::MemberNotFound
        ));
        assert!(matches!(
            map_mutation_status(StatusCode::INTERNAL_SERVER_ERROR, "add role"),
            DomainError::PlatformUnavailable(_)
        ));
    }
}
