//! Stock rule sets.
//!
//! Every function here builds a fresh value; nothing is global. Handlers inject
//! the set that fits each call site and extend it locally where a resource
//! family needs a different disposition.

use super::rules::ErrorRuleSet;
use crate::constants::{HandlerErrorCode, ServiceErrorCode};
use crate::failure::FailureKind;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Lifecycle operation a handler is running
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum OperationKind {
    Create,
    Read,
    Update,
    Delete,
    List,
}

impl fmt::Display for OperationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            OperationKind::Create => write!(f, "create"),
            OperationKind::Read => write!(f, "read"),
            OperationKind::Update => write!(f, "update"),
            OperationKind::Delete => write!(f, "delete"),
            OperationKind::List => write!(f, "list"),
        }
    }
}

/// Rules shared by every resource family, in evaluation order:
///
/// 1. client-unavailable → `ServiceInternalError`
/// 2. access-denied, not-authorized → `AccessDenied`
/// 3. throttling → `Throttling`
/// 4. invalid parameter value / combination, missing parameter → `InvalidRequest`
/// 5. client transport failure, any other remote-service failure → `ServiceInternalError`
///
/// Anything else falls through to `InternalFailure`.
pub fn default_rule_set() -> ErrorRuleSet {
    ErrorRuleSet::builder()
        .fail_on_code(
            ServiceErrorCode::ClientUnavailable,
            HandlerErrorCode::ServiceInternalError,
        )
        .fail_on_code(ServiceErrorCode::AccessDenied, HandlerErrorCode::AccessDenied)
        .fail_on_code(ServiceErrorCode::NotAuthorized, HandlerErrorCode::AccessDenied)
        .fail_on_code(ServiceErrorCode::Throttling, HandlerErrorCode::Throttling)
        .fail_on_code(
            ServiceErrorCode::InvalidParameterValue,
            HandlerErrorCode::InvalidRequest,
        )
        .fail_on_code(
            ServiceErrorCode::InvalidParameterCombination,
            HandlerErrorCode::InvalidRequest,
        )
        .fail_on_code(ServiceErrorCode::MissingParameter, HandlerErrorCode::InvalidRequest)
        .fail_on_kind(
            FailureKind::ClientTransport,
            HandlerErrorCode::ServiceInternalError,
        )
        .fail_on_kind(
            FailureKind::RemoteService,
            HandlerErrorCode::ServiceInternalError,
        )
        .build()
}

/// Default rules extended with the dispositions specific to `operation`
pub fn rule_set_for(operation: OperationKind) -> ErrorRuleSet {
    let base = default_rule_set();
    let local = ErrorRuleSet::builder();

    let local = match operation {
        OperationKind::Create => local
            .fail_on_kind(FailureKind::AlreadyExists, HandlerErrorCode::AlreadyExists)
            .fail_on_code(ServiceErrorCode::AlreadyExists, HandlerErrorCode::AlreadyExists)
            .fail_on_kind(FailureKind::Conflict, HandlerErrorCode::ResourceConflict)
            .fail_on_code(
                ServiceErrorCode::ResourceConflict,
                HandlerErrorCode::ResourceConflict,
            )
            .fail_on_kind(
                FailureKind::LimitExceeded,
                HandlerErrorCode::ServiceLimitExceeded,
            )
            .fail_on_code(
                ServiceErrorCode::LimitExceeded,
                HandlerErrorCode::ServiceLimitExceeded,
            )
            .fail_on_kind(FailureKind::InvalidInput, HandlerErrorCode::InvalidRequest),
        OperationKind::Read => local
            .fail_on_kind(FailureKind::NotFound, HandlerErrorCode::NotFound)
            .fail_on_code(ServiceErrorCode::ResourceNotFound, HandlerErrorCode::NotFound),
        OperationKind::Update => local
            .fail_on_kind(FailureKind::NotFound, HandlerErrorCode::NotFound)
            .fail_on_code(ServiceErrorCode::ResourceNotFound, HandlerErrorCode::NotFound)
            .fail_on_kind(FailureKind::Conflict, HandlerErrorCode::ResourceConflict)
            .fail_on_code(
                ServiceErrorCode::ResourceConflict,
                HandlerErrorCode::ResourceConflict,
            )
            .fail_on_kind(
                FailureKind::LimitExceeded,
                HandlerErrorCode::ServiceLimitExceeded,
            )
            .fail_on_kind(FailureKind::InvalidInput, HandlerErrorCode::InvalidRequest),
        // Already gone counts as deleted
        OperationKind::Delete => local
            .ignore_kind(FailureKind::NotFound)
            .ignore_code(ServiceErrorCode::ResourceNotFound)
            .fail_on_kind(FailureKind::Conflict, HandlerErrorCode::ResourceConflict)
            .fail_on_code(
                ServiceErrorCode::ResourceConflict,
                HandlerErrorCode::ResourceConflict,
            ),
        OperationKind::List => local
            .ignore_kind(FailureKind::NotFound)
            .ignore_code(ServiceErrorCode::ResourceNotFound),
    };

    local.extending(&base)
}

/// Rules for tag mutation calls: permission failures become
/// `UnauthorizedTaggingOperation` ahead of the default rules
pub fn tagging_rule_set() -> ErrorRuleSet {
    ErrorRuleSet::builder()
        .fail_on_code(
            ServiceErrorCode::AccessDenied,
            HandlerErrorCode::UnauthorizedTaggingOperation,
        )
        .fail_on_code(
            ServiceErrorCode::NotAuthorized,
            HandlerErrorCode::UnauthorizedTaggingOperation,
        )
        .extending(&default_rule_set())
}
