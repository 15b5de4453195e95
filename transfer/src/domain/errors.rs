use std::fmt;
use thiserror::Error;

/// Details of a failed step, as reported by the provider when available
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub status: Option<u16>,
    pub reason: Option<String>,
    pub message: String,
}

impl ApiFailure {
    pub fn local(message: impl Into<String>) -> Self {
        Self {
            status: None,
            reason: None,
            message: message.into(),
        }
    }

    pub fn remote(status: u16, reason: Option<String>, message: impl Into<String>) -> Self {
        Self {
            status: Some(status),
            reason,
            message: message.into(),
        }
    }
}

impl fmt::Display for ApiFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(status) = self.status {
            write!(f, "status {status}")?;
            if let Some(reason) = &self.reason {
                write!(f, " ({reason})")?;
            }
            write!(f, ": ")?;
        }
        f.write_str(&self.message)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum TransferError {
    #[error("authentication failed: {0}")]
    Auth(ApiFailure),
    #[error("file not found or not accessible: {0}")]
    NotFound(ApiFailure),
    #[error("permission conflict: {0}")]
    PermissionConflict(ApiFailure),
    #[error("invalid request: {0}")]
    Validation(ApiFailure),
    #[error("transport error: {0}")]
    Transport(ApiFailure),
}

const AUTH_REASONS: &[&str] = &["authError", "insufficientPermissions", "insufficientScopes"];

const RATE_LIMIT_REASONS: &[&str] = &[
    "rateLimitExceeded",
    "userRateLimitExceeded",
    "sharingRateLimitExceeded",
    "dailyLimitExceeded",
];

const OWNERSHIP_REASONS: &[&str] = &[
    "consentRequiredForOwnershipTransfer",
    "ownershipChangeAcrossDomainNotPermitted",
    "invalidOwnershipTransfer",
    "cannotChangeOwnerRole",
    "cannotSetExpirationOnOwner",
    "transferOwnershipRequired",
    "insufficientFilePermissions",
    "forbidden",
];

impl TransferError {
    /// Classify a non-2xx provider response
    pub fn from_status(status: u16, reason: Option<String>, message: impl Into<String>) -> Self {
        let is = |set: &[&str]| reason.as_deref().map(|r| set.contains(&r)).unwrap_or(false);
        let rate_limited = is(RATE_LIMIT_REASONS);
        let ownership = is(OWNERSHIP_REASONS);
        let auth = is(AUTH_REASONS);
        let failure = ApiFailure::remote(status, reason, message);

        match status {
            401 => Self::Auth(failure),
            404 => Self::NotFound(failure),
            409 => Self::PermissionConflict(failure),
            429 => Self::Transport(failure),
            _ if rate_limited => Self::Transport(failure),
            400 | 403 if ownership => Self::PermissionConflict(failure),
            403 if auth => Self::Auth(failure),
            400 => Self::Validation(failure),
            _ => Self::Transport(failure),
        }
    }

    pub fn failure(&self) -> &ApiFailure {
        match self {
            Self::Auth(f)
            | Self::NotFound(f)
            | Self::PermissionConflict(f)
            | Self::Validation(f)
            | Self::Transport(f) => f,
        }
    }

    pub fn kind(&self) -> &'static str {
        match self {
            Self::Auth(_) => "auth",
            Self::NotFound(_) => "not_found",
            Self::PermissionConflict(_) => "permission_conflict",
            Self::Validation(_) => "validation",
            Self::Transport(_) => "transport",
        }
    }

    /// Process exit code for the CLI
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Auth(_) => 3,
            Self::NotFound(_) => 4,
            Self::PermissionConflict(_) => 5,
            Self::Validation(_) => 6,
            Self::Transport(_) => 7,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn classify(status: u16, reason: Option<&str>) -> &'static str {
        TransferError::from_status(status, reason.map(str::to_string), "boom").kind()
    }

    #[test]
    fn test_status_classification() {
        assert_eq!(classify(401, None), "auth");
        assert_eq!(classify(404, Some("notFound")), "not_found");
        assert_eq!(classify(409, None), "permission_conflict");
        assert_eq!(classify(429, None), "transport");
        assert_eq!(classify(500, None), "transport");
        assert_eq!(classify(503, Some("backendError")), "transport");
    }

    #[test]
    fn test_reason_classification() {
        assert_eq!(classify(403, Some("consentRequiredForOwnershipTransfer")), "permission_conflict");
        assert_eq!(classify(400, Some("invalidOwnershipTransfer")), "permission_conflict");
        assert_eq!(classify(403, Some("insufficientFilePermissions")), "permission_conflict");
        assert_eq!(classify(403, Some("userRateLimitExceeded")), "transport");
        assert_eq!(classify(403, Some("insufficientScopes")), "auth");
        assert_eq!(classify(403, Some("somethingElse")), "transport");
        assert_eq!(classify(400, Some("invalidSharingRequest")), "validation");
        assert_eq!(classify(400, None), "validation");
    }

    #[test]
    fn test_display_includes_status_and_reason() {
        let err = TransferError::from_status(404, Some("notFound".to_string()), "File not found: abc.");
        assert_eq!(
            err.to_string(),
            "file not found or not accessible: status 404 (notFound): File not found: abc."
        );

        let local = TransferError::Auth(ApiFailure::local("token.json missing"));
        assert_eq!(local.to_string(), "authentication failed: token.json missing");
    }

    #[test]
    fn test_exit_codes_are_distinct_and_nonzero() {
        let errors = [
            TransferError::Auth(ApiFailure::local("")),
            TransferError::NotFound(ApiFailure::local("")),
            TransferError::PermissionConflict(ApiFailure::local("")),
            TransferError::Validation(ApiFailure::local("")),
            TransferError::Transport(ApiFailure::local("")),
        ];
        let mut codes: Vec<u8> = errors.iter().map(TransferError::exit_code).collect();
        assert!(codes.iter().all(|c| *c > 1));
        codes.dedup();
        assert_eq!(codes.len(), 5);
    }
}
