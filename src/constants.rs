//! # Handler Constants
//!
//! Closed enumerations that define the contract between resource handlers,
//! the remote services they call, and the host runtime that drives them.
//!
//! - [`HandlerErrorCode`] is the caller-facing code carried by every terminal failure.
//! - [`ServiceErrorCode`] is the set of provider error codes this core knows how to
//!   recognise inside a generic remote-service failure.
//! - [`callback_keys`] names the callback-state fields written by this core.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Caller-facing error codes understood by the host runtime
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum HandlerErrorCode {
    /// The requested change cannot be applied to an existing resource
    NotUpdatable,
    /// The request was malformed or carried invalid parameters
    InvalidRequest,
    /// The caller lacks permission for the operation
    AccessDenied,
    /// The caller lacks permission to mutate tags
    UnauthorizedTaggingOperation,
    /// The supplied credentials were rejected
    InvalidCredentials,
    /// A resource with the same identifier already exists
    AlreadyExists,
    /// The resource does not exist
    NotFound,
    /// A concurrent operation is already modifying the resource
    ResourceConflict,
    /// The remote service throttled the request
    Throttling,
    /// An account or service quota was exceeded
    ServiceLimitExceeded,
    /// The resource did not reach its target state in time
    NotStabilized,
    /// The remote service rejected the request for an unspecific reason
    GeneralServiceException,
    /// The remote service or its client failed internally
    ServiceInternalError,
    /// The request never reached the remote service
    NetworkFailure,
    /// Unclassified failure
    InternalFailure,
}

impl HandlerErrorCode {
    pub fn as_str(&self) -> &'static str {
        match self {
            HandlerErrorCode::NotUpdatable => "NotUpdatable",
            HandlerErrorCode::InvalidRequest => "InvalidRequest",
            HandlerErrorCode::AccessDenied => "AccessDenied",
            HandlerErrorCode::UnauthorizedTaggingOperation => "UnauthorizedTaggingOperation",
            HandlerErrorCode::InvalidCredentials => "InvalidCredentials",
            HandlerErrorCode::AlreadyExists => "AlreadyExists",
            HandlerErrorCode::NotFound => "NotFound",
            HandlerErrorCode::ResourceConflict => "ResourceConflict",
            HandlerErrorCode::Throttling => "Throttling",
            HandlerErrorCode::ServiceLimitExceeded => "ServiceLimitExceeded",
            HandlerErrorCode::NotStabilized => "NotStabilized",
            HandlerErrorCode::GeneralServiceException => "GeneralServiceException",
            HandlerErrorCode::ServiceInternalError => "ServiceInternalError",
            HandlerErrorCode::NetworkFailure => "NetworkFailure",
            HandlerErrorCode::InternalFailure => "InternalFailure",
        }
    }

    /// Whether the code reports a problem with the caller's request rather than
    /// with the remote service
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            HandlerErrorCode::NotUpdatable
                | HandlerErrorCode::InvalidRequest
                | HandlerErrorCode::AccessDenied
                | HandlerErrorCode::UnauthorizedTaggingOperation
                | HandlerErrorCode::InvalidCredentials
                | HandlerErrorCode::AlreadyExists
                | HandlerErrorCode::NotFound
                | HandlerErrorCode::ResourceConflict
        )
    }
}

impl fmt::Display for HandlerErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Provider error codes recognised inside a generic remote-service failure.
///
/// Each variant owns a table of the literal code strings providers use for it.
/// Matching is case-sensitive; a string outside every table is unknown and
/// never matches a code-based rule.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ServiceErrorCode {
    Throttling,
    AccessDenied,
    NotAuthorized,
    ResourceConflict,
    InvalidParameterValue,
    InvalidParameterCombination,
    MissingParameter,
    ServiceUnavailable,
    ClientUnavailable,
    ResourceNotFound,
    AlreadyExists,
    LimitExceeded,
    InternalError,
}

impl ServiceErrorCode {
    pub const ALL: [ServiceErrorCode; 13] = [
        ServiceErrorCode::Throttling,
        ServiceErrorCode::AccessDenied,
        ServiceErrorCode::NotAuthorized,
        ServiceErrorCode::ResourceConflict,
        ServiceErrorCode::InvalidParameterValue,
        ServiceErrorCode::InvalidParameterCombination,
        ServiceErrorCode::MissingParameter,
        ServiceErrorCode::ServiceUnavailable,
        ServiceErrorCode::ClientUnavailable,
        ServiceErrorCode::ResourceNotFound,
        ServiceErrorCode::AlreadyExists,
        ServiceErrorCode::LimitExceeded,
        ServiceErrorCode::InternalError,
    ];

    /// Literal provider strings that normalize to this code
    pub fn aliases(&self) -> &'static [&'static str] {
        match self {
            ServiceErrorCode::Throttling => &[
                "ThrottlingException",
                "Throttling",
                "TooManyRequestsException",
                "RequestLimitExceeded",
            ],
            ServiceErrorCode::AccessDenied => &["AccessDeniedException", "AccessDenied"],
            ServiceErrorCode::NotAuthorized => &[
                "NotAuthorized",
                "NotAuthorizedException",
                "UnauthorizedOperation",
            ],
            ServiceErrorCode::ResourceConflict => &[
                "ResourceConflictException",
                "ResourceConflict",
                "ConflictException",
            ],
            ServiceErrorCode::InvalidParameterValue => {
                &["InvalidParameterValue", "InvalidParameterValueException"]
            }
            ServiceErrorCode::InvalidParameterCombination => &[
                "InvalidParameterCombination",
                "InvalidParameterCombinationException",
            ],
            ServiceErrorCode::MissingParameter => &["MissingParameter", "MissingParameterException"],
            ServiceErrorCode::ServiceUnavailable => {
                &["ServiceUnavailable", "ServiceUnavailableException"]
            }
            ServiceErrorCode::ClientUnavailable => {
                &["ClientUnavailable", "ClientUnavailableException"]
            }
            ServiceErrorCode::ResourceNotFound => &[
                "ResourceNotFoundException",
                "ResourceNotFound",
                "NotFoundException",
            ],
            ServiceErrorCode::AlreadyExists => &[
                "AlreadyExistsException",
                "ResourceAlreadyExistsException",
                "EntityAlreadyExists",
            ],
            ServiceErrorCode::LimitExceeded => &[
                "LimitExceededException",
                "LimitExceeded",
                "ServiceQuotaExceededException",
            ],
            ServiceErrorCode::InternalError => &[
                "InternalFailure",
                "InternalError",
                "InternalServerError",
                "InternalServiceException",
            ],
        }
    }

    /// Normalize a raw provider code. Unknown codes yield `None`.
    pub fn from_code(raw: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|code| code.aliases().contains(&raw))
    }

    /// Canonical spelling, the first entry of the alias table
    pub fn as_str(&self) -> &'static str {
        self.aliases()[0]
    }
}

impl fmt::Display for ServiceErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Names of callback-state fields written by this core
pub mod callback_keys {
    /// Milestone flag set once the side-effect tag mutation has been issued
    pub const TAGGING_ATTEMPTED: &str = "tagging.attempted";

    /// Milestone flag set when tags could not be fully applied but the
    /// operation continued
    pub const TAGGING_INCOMPLETE: &str = "tagging.incomplete";

    /// Suffix of the numeric milestone holding a stabilization loop's attempt number
    pub const ATTEMPT_SUFFIX: &str = ".attempt";

    /// Suffix of the timestamp recorded when a stabilization loop starts
    pub const STARTED_AT_SUFFIX: &str = ".started_at";

    /// Suffix of the milestone flag set once a stabilization loop has timed out
    pub const TIMED_OUT_SUFFIX: &str = ".timed_out";
}
