//! Status codes of the `SyncEmployeesList` endpoint.

/// Interpreted response status of a sync submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncStatus {
    /// 200: batch accepted.
    Ok,
    /// 400: payload rejected.
    BadRequest,
    /// 401: access token stale.
    ApiKeyExpired,
    /// 500: remote failure.
    ServiceDown,
    /// Anything else.
    Other(u16),
}

impl SyncStatus {
    /// Interprets an HTTP status code.
    pub fn from_code(code: u16) -> Self {
        match code {
            200 => SyncStatus::Ok,
            400 => SyncStatus::BadRequest,
            401 => SyncStatus::ApiKeyExpired,
            500 => SyncStatus::ServiceDown,
            other => SyncStatus::Other(other),
        }
    }

    /// Returns the HTTP status code.
    pub fn code(&self) -> u16 {
        match self {
            SyncStatus::Ok => 200,
            SyncStatus::BadRequest => 400,
            SyncStatus::ApiKeyExpired => 401,
            SyncStatus::ServiceDown => 500,
            SyncStatus::Other(code) => *code,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_code() {
        assert_eq!(SyncStatus::from_code(200), SyncStatus::Ok);
        assert_eq!(SyncStatus::from_code(400), SyncStatus::BadRequest);
        assert_eq!(SyncStatus::from_code(401), SyncStatus::ApiKeyExpired);
        assert_eq!(SyncStatus::from_code(500), SyncStatus::ServiceDown);
        assert_eq!(SyncStatus::from_code(503), SyncStatus::Other(503));
        assert_eq!(SyncStatus::from_code(201), SyncStatus::Other(201));
    }

    #[test]
    fn test_code_round_trips_known_statuses() {
        for code in [200, 400, 401, 404, 500, 502] {
            assert_eq!(SyncStatus::from_code(code).code(), code);
        }
    }
}
