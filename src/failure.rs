//! # Provider Failures
//!
//! The failure value handed to the classifier when an I/O step supplied by a
//! handler goes wrong.
//!
//! Failures carry a structural [`FailureKind`], an optional message, an optional
//! raw provider error code and an optional nested cause. Kinds form a small
//! hierarchy declared by [`FailureKind::parent`], so a rule written for a broad
//! kind such as [`FailureKind::ClientRejected`] also matches
//! [`FailureKind::NotFound`] and the other specializations beneath it.
//!
//! ```text
//! Runtime
//! Sdk
//! ├── ClientTransport
//! └── RemoteService
//!     ├── ClientRejected
//!     │   ├── NotFound
//!     │   ├── AlreadyExists
//!     │   ├── Conflict
//!     │   ├── LimitExceeded
//!     │   └── InvalidInput
//!     └── ServerFault
//! ```

use crate::constants::ServiceErrorCode;
use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::fmt;

/// Structural category of a failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    /// Anything raised by handler code itself
    Runtime,
    /// Root of every failure produced by a provider client library
    Sdk,
    /// The client library could not deliver the request
    ClientTransport,
    /// The remote service answered with an error
    RemoteService,
    /// The remote service rejected the request as invalid for the caller
    ClientRejected,
    NotFound,
    AlreadyExists,
    Conflict,
    LimitExceeded,
    InvalidInput,
    /// The remote service failed while handling a valid request
    ServerFault,
}

impl FailureKind {
    /// Immediate ancestor in the is-a table
    pub fn parent(&self) -> Option<FailureKind> {
        match self {
            FailureKind::Runtime | FailureKind::Sdk => None,
            FailureKind::ClientTransport | FailureKind::RemoteService => Some(FailureKind::Sdk),
            FailureKind::ClientRejected | FailureKind::ServerFault => {
                Some(FailureKind::RemoteService)
            }
            FailureKind::NotFound
            | FailureKind::AlreadyExists
            | FailureKind::Conflict
            | FailureKind::LimitExceeded
            | FailureKind::InvalidInput => Some(FailureKind::ClientRejected),
        }
    }

    /// Whether `self` is `other` or one of its specializations
    pub fn is_a(&self, other: FailureKind) -> bool {
        let mut current = Some(*self);
        while let Some(kind) = current {
            if kind == other {
                return true;
            }
            current = kind.parent();
        }
        false
    }

    /// Type name reported for failures that were not given a more specific one
    pub fn default_type_name(&self) -> &'static str {
        match self {
            FailureKind::Runtime => "handler::RuntimeFailure",
            FailureKind::Sdk => "sdk::SdkFailure",
            FailureKind::ClientTransport => "sdk::ClientTransportFailure",
            FailureKind::RemoteService => "sdk::RemoteServiceFailure",
            FailureKind::ClientRejected => "sdk::ClientRejectedFailure",
            FailureKind::NotFound => "sdk::NotFoundFailure",
            FailureKind::AlreadyExists => "sdk::AlreadyExistsFailure",
            FailureKind::Conflict => "sdk::ConflictFailure",
            FailureKind::LimitExceeded => "sdk::LimitExceededFailure",
            FailureKind::InvalidInput => "sdk::InvalidInputFailure",
            FailureKind::ServerFault => "sdk::ServerFaultFailure",
        }
    }
}

/// A caught failure from a handler's I/O step
#[derive(Debug, Clone, PartialEq)]
pub struct Failure {
    kind: FailureKind,
    type_name: Cow<'static, str>,
    message: Option<String>,
    error_code: Option<String>,
    cause: Option<Box<Failure>>,
}

impl Failure {
    pub fn new(kind: FailureKind) -> Self {
        Self {
            kind,
            type_name: Cow::Borrowed(kind.default_type_name()),
            message: None,
            error_code: None,
            cause: None,
        }
    }

    pub fn of(kind: FailureKind, message: impl Into<String>) -> Self {
        Self::new(kind).with_message(message)
    }

    pub fn runtime(message: impl Into<String>) -> Self {
        Self::of(FailureKind::Runtime, message)
    }

    pub fn client_transport(message: impl Into<String>) -> Self {
        Self::of(FailureKind::ClientTransport, message)
    }

    /// Generic remote-service failure carrying a raw provider error code
    pub fn remote_service(error_code: impl Into<String>, message: impl Into<String>) -> Self {
        Self::of(FailureKind::RemoteService, message).with_error_code(error_code)
    }

    /// Higher-level failure with no message of its own wrapping `cause`
    pub fn wrap(kind: FailureKind, cause: Failure) -> Self {
        Self::new(kind).caused_by(cause)
    }

    /// Convert any error and its `source()` chain into nested runtime failures
    pub fn from_std_error(error: &(dyn std::error::Error + 'static)) -> Self {
        let mut failure = Failure::runtime(error.to_string());
        if let Some(source) = error.source() {
            failure = failure.caused_by(Failure::from_std_error(source));
        }
        failure
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_error_code(mut self, error_code: impl Into<String>) -> Self {
        self.error_code = Some(error_code.into());
        self
    }

    pub fn with_type_name(mut self, type_name: impl Into<Cow<'static, str>>) -> Self {
        self.type_name = type_name.into();
        self
    }

    pub fn caused_by(mut self, cause: Failure) -> Self {
        self.cause = Some(Box::new(cause));
        self
    }

    pub fn kind(&self) -> FailureKind {
        self.kind
    }

    pub fn type_name(&self) -> &str {
        &self.type_name
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    pub fn error_code(&self) -> Option<&str> {
        self.error_code.as_deref()
    }

    pub fn cause(&self) -> Option<&Failure> {
        self.cause.as_deref()
    }

    pub fn is_a(&self, kind: FailureKind) -> bool {
        self.kind.is_a(kind)
    }

    /// Innermost wrapped cause, or `self` when nothing is wrapped
    pub fn root_cause(&self) -> &Failure {
        let mut current = self;
        while let Some(cause) = current.cause.as_deref() {
            current = cause;
        }
        current
    }

    /// Normalized provider code. Only remote-service failures carry one.
    pub fn service_code(&self) -> Option<ServiceErrorCode> {
        if !self.is_a(FailureKind::RemoteService) {
            return None;
        }
        self.error_code
            .as_deref()
            .and_then(ServiceErrorCode::from_code)
    }

    /// Message of the root cause, falling back to this failure's type name
    /// when the root cause has no usable message
    pub fn extracted_message(&self) -> String {
        match self.root_cause().message() {
            Some(message) if !message.trim().is_empty() => message.to_string(),
            _ => self.type_name().to_string(),
        }
    }
}

impl fmt::Display for Failure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match (&self.message, &self.error_code) {
            (Some(message), Some(code)) => write!(f, "{}: {message} ({code})", self.type_name),
            (Some(message), None) => write!(f, "{}: {message}", self.type_name),
            (None, Some(code)) => write!(f, "{} ({code})", self.type_name),
            (None, None) => f.write_str(&self.type_name),
        }
    }
}

impl std::error::Error for Failure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        self.cause
            .as_deref()
            .map(|cause| cause as &(dyn std::error::Error + 'static))
    }
}
