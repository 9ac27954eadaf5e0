use proptest::prelude::*;
use resource_handler_core::{
    classification::{Matcher, Outcome, Rule},
    Failure, FailureKind, HandlerErrorCode, ServiceErrorCode, Tags,
};

pub fn failure_kind_strategy() -> impl Strategy<Value = FailureKind> {
    prop_oneof![
        Just(FailureKind::Runtime),
        Just(FailureKind::Sdk),
        Just(FailureKind::ClientTransport),
        Just(FailureKind::RemoteService),
        Just(FailureKind::ClientRejected),
        Just(FailureKind::NotFound),
        Just(FailureKind::AlreadyExists),
        Just(FailureKind::Conflict),
        Just(FailureKind::LimitExceeded),
        Just(FailureKind::InvalidInput),
        Just(FailureKind::ServerFault),
    ]
}

pub fn service_code_strategy() -> impl Strategy<Value = ServiceErrorCode> {
    prop::sample::select(ServiceErrorCode::ALL.to_vec())
}

pub fn handler_code_strategy() -> impl Strategy<Value = HandlerErrorCode> {
    prop_oneof![
        Just(HandlerErrorCode::InvalidRequest),
        Just(HandlerErrorCode::AccessDenied),
        Just(HandlerErrorCode::NotFound),
        Just(HandlerErrorCode::ResourceConflict),
        Just(HandlerErrorCode::Throttling),
        Just(HandlerErrorCode::ServiceInternalError),
        Just(HandlerErrorCode::GeneralServiceException),
    ]
}

pub fn outcome_strategy() -> impl Strategy<Value = Outcome> {
    prop_oneof![
        Just(Outcome::Ignore),
        handler_code_strategy().prop_map(Outcome::FailWith),
    ]
}

pub fn rule_strategy() -> impl Strategy<Value = Rule> {
    let matcher = prop_oneof![
        failure_kind_strategy().prop_map(Matcher::Kind),
        service_code_strategy().prop_map(Matcher::Code),
    ];
    (matcher, outcome_strategy()).prop_map(|(matcher, outcome)| Rule::new(matcher, outcome))
}

/// Failures of any kind; remote-service ones may carry a known or unknown code
pub fn failure_strategy() -> impl Strategy<Value = Failure> {
    let code = prop_oneof![
        service_code_strategy().prop_map(|code| Some(code.as_str().to_string())),
        "[A-Z][a-zA-Z]{0,20}".prop_map(Some),
        Just(None),
    ];
    (failure_kind_strategy(), code, "[a-z ]{0,30}").prop_map(|(kind, code, message)| {
        let failure = Failure::of(kind, message);
        match code {
            Some(code) => failure.with_error_code(code),
            None => failure,
        }
    })
}

pub fn tags_strategy() -> impl Strategy<Value = Tags> {
    prop::collection::btree_map("[a-e]{1,2}", "[0-3]", 0..8)
}
