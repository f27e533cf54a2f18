use http::StatusCode;

pub type Result<T = (), E = Error> = std::result::Result<T, E>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The vendor could not be reached, answered with an unexpected status,
    /// or returned a system index that could not be decoded.
    #[error("{endpoint} request failed: {reason}")]
    RequestFailed { endpoint: Endpoint, reason: RequestFailure },

    /// No system with the requested name is visible to the user.
    #[error("no system named `{0}` found")]
    NotFound(String),

    /// The summary response body is not a valid summary.
    #[error("received an invalid summary: {0}")]
    InvalidResponse(serde_json::Error),

    #[error("failed to build the HTTP client: {0}")]
    Client(reqwest::Error),
}

impl Error {
    pub(crate) fn transport(endpoint: Endpoint, error: reqwest::Error) -> Self {
        // Request URLs carry the API key in the query string.
        Self::RequestFailed { endpoint, reason: RequestFailure::Transport(error.without_url()) }
    }

    pub(crate) const fn status(endpoint: Endpoint, status: StatusCode) -> Self {
        Self::RequestFailed { endpoint, reason: RequestFailure::Status(status) }
    }

    pub(crate) fn decode(endpoint: Endpoint, error: serde_json::Error) -> Self {
        Self::RequestFailed { endpoint, reason: RequestFailure::Decode(error) }
    }
}

#[derive(Debug, thiserror::Error)]
pub enum RequestFailure {
    #[error(transparent)]
    Transport(reqwest::Error),

    #[error("HTTP {0}")]
    Status(StatusCode),

    #[error(transparent)]
    Decode(serde_json::Error),
}

/// Vendor endpoint that a request was sent to.
#[derive(Copy, Clone, Debug, PartialEq, Eq, derive_more::Display)]
pub enum Endpoint {
    #[display("system index")]
    SystemIndex,

    #[display("summary")]
    Summary,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn request_failed_display_ok() {
        let error = Error::status(Endpoint::Summary, StatusCode::UNAUTHORIZED);
        assert_eq!(error.to_string(), "summary request failed: HTTP 401 Unauthorized");
    }

    #[test]
    fn not_found_display_ok() {
        assert_eq!(Error::NotFound("Home".into()).to_string(), "no system named `Home` found");
    }
}
