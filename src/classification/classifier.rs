//! Turning a caught failure into a terminal [`ProgressResult`].

use super::rules::{ErrorRuleSet, Outcome};
use crate::failure::Failure;
use crate::logging::{log_line, HandlerLogger};
use crate::progress::ProgressResult;
use tracing::{debug, error};

/// Tag opening the single log line written for every failed classification
pub const UNEXPECTED_ERROR_TAG: &str = "UnexpectedErrorStatus: ";

/// Classify `failure` against `rule_set`
pub fn classify(rule_set: &ErrorRuleSet, failure: &Failure) -> Outcome {
    let outcome = rule_set.classify(failure);
    debug!(
        failure_type = failure.type_name(),
        error_code = failure.error_code(),
        ?outcome,
        "Classified failure"
    );
    outcome
}

/// Classify `failure` and fold it into `progress`.
///
/// `Ignore` re-marks `progress` as successful without touching its model or
/// callback state. `FailWith` writes one log line to `logger` (if any) and
/// returns a terminal failure carrying the code and the root-cause message.
pub fn handle_exception<M>(
    progress: ProgressResult<M>,
    failure: &Failure,
    rule_set: &ErrorRuleSet,
    logger: Option<&dyn HandlerLogger>,
) -> ProgressResult<M> {
    let outcome = classify(rule_set, failure);
    apply_outcome(progress, failure, outcome, logger)
}

/// Fold an already computed outcome into `progress`
pub fn apply_outcome<M>(
    progress: ProgressResult<M>,
    failure: &Failure,
    outcome: Outcome,
    logger: Option<&dyn HandlerLogger>,
) -> ProgressResult<M> {
    match outcome {
        Outcome::Ignore => progress.into_success(),
        Outcome::FailWith(error_code) => {
            let message = failure.extracted_message();
            log_line(logger, &unexpected_error_line(failure, &message));
            error!(
                error_code = %error_code,
                failure_type = failure.type_name(),
                root_cause = failure.root_cause().type_name(),
                message = %message,
                "Handler operation failed"
            );
            progress.into_failure(error_code, message)
        }
    }
}

fn unexpected_error_line(failure: &Failure, message: &str) -> String {
    format!("{UNEXPECTED_ERROR_TAG}{message} [{}]", failure.type_name())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::callback::CallbackState;
    use crate::classification::defaults::default_rule_set;
    use crate::constants::HandlerErrorCode;
    use crate::failure::FailureKind;
    use crate::logging::RecordingLogger;

    fn in_flight() -> ProgressResult<String> {
        let mut state = CallbackState::new();
        state.set_flag("created", true);
        ProgressResult::in_progress("bucket".to_string(), state, 10)
    }

    #[test]
    fn test_unclassified_failure_with_missing_logger() {
        let result = handle_exception(
            in_flight(),
            &Failure::runtime("boom"),
            &ErrorRuleSet::empty(),
            None,
        );

        assert_eq!(result.error_code(), Some(HandlerErrorCode::InternalFailure));
        assert_eq!(result.message(), Some("boom"));
    }

    #[test]
    fn test_ignore_marks_success_without_mutation() {
        let rules = ErrorRuleSet::builder()
            .ignore_kind(FailureKind::NotFound)
            .build();
        let before = in_flight();

        let result = handle_exception(
            before.clone(),
            &Failure::of(FailureKind::NotFound, "gone"),
            &rules,
            None,
        );

        assert!(result.is_success());
        assert_eq!(result.resource_model, before.resource_model);
        assert_eq!(result.callback_state, before.callback_state);
    }

    #[test]
    fn test_failure_logs_single_tagged_line() {
        let logger = RecordingLogger::new();
        let failure = Failure::remote_service("ThrottlingException", "Rate exceeded")
            .with_type_name("acme::ThrottlingException");

        let result = handle_exception(in_flight(), &failure, &default_rule_set(), Some(&logger));

        assert_eq!(result.error_code(), Some(HandlerErrorCode::Throttling));
        let lines = logger.lines();
        assert_eq!(lines.len(), 1);
        assert!(lines[0].starts_with("UnexpectedErrorStatus: Rate exceeded"));
        assert!(lines[0].contains("acme::ThrottlingException"));
    }

    #[test]
    fn test_ignore_writes_nothing() {
        let logger = RecordingLogger::new();
        let rules = ErrorRuleSet::builder().ignore_kind(FailureKind::Runtime).build();
        handle_exception(in_flight(), &Failure::runtime("fine"), &rules, Some(&logger));
        assert!(logger.is_empty());
    }

    #[test]
    fn test_wrapper_without_message_uses_root_cause() {
        let logger = RecordingLogger::new();
        let failure = Failure::wrap(
            FailureKind::Runtime,
            Failure::client_transport("connection reset by peer"),
        );

        let result = handle_exception(in_flight(), &failure, &default_rule_set(), Some(&logger));

        // Classified on the wrapper, described by the root cause
        assert_eq!(result.error_code(), Some(HandlerErrorCode::InternalFailure));
        assert_eq!(result.message(), Some("connection reset by peer"));
        assert!(logger.lines()[0].contains("connection reset by peer"));
        assert!(logger.lines()[0].contains("handler::RuntimeFailure"));
    }

    #[test]
    fn test_blank_message_falls_back_to_type_name() {
        let failure = Failure::of(FailureKind::ServerFault, "").with_type_name("acme::Outage");
        let result = handle_exception(in_flight(), &failure, &default_rule_set(), None);
        assert_eq!(result.error_code(), Some(HandlerErrorCode::ServiceInternalError));
        assert_eq!(result.message(), Some("acme::Outage"));
    }
}
