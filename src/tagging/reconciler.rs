//! Issuing the minimal tag mutations and deciding which tagging failures abort
//! the operation.
//!
//! The reconciler exposes two call sites rather than guessing intent from the
//! failure:
//!
//! - [`TagReconciler::update_tags_after_primary`] runs after a create or modify
//!   call already succeeded. Permission failures are swallowed, recorded as the
//!   `tagging.incomplete` milestone, and the operation carries on (soft fail).
//! - [`TagReconciler::update_tags_only`] runs when tags are the whole change.
//!   Every failure is terminal (hard fail).

use super::tag_set::{TagDiff, Tags};
use crate::callback::CallbackState;
use crate::classification::{apply_outcome, classify, tagging_rule_set, ErrorRuleSet, Outcome};
use crate::constants::{callback_keys, HandlerErrorCode};
use crate::failure::Failure;
use crate::logging::{log_line, HandlerLogger};
use crate::progress::ProgressResult;
use std::collections::BTreeSet;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Tag opening the log line written when a side-effect tag mutation is
/// abandoned and the operation continues
pub const TAGS_INCOMPLETE_TAG: &str = "TagsIncomplete: ";

/// Tag mutation calls against the remote service, supplied by the handler
pub trait TaggingClient {
    fn untag_resource(&mut self, resource_id: &str, keys: &BTreeSet<String>) -> Result<(), Failure>;

    fn tag_resource(&mut self, resource_id: &str, tags: &Tags) -> Result<(), Failure>;
}

pub struct TagReconciler {
    rule_set: ErrorRuleSet,
    logger: Option<Arc<dyn HandlerLogger>>,
}

impl std::fmt::Debug for TagReconciler {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TagReconciler")
            .field("rule_set", &self.rule_set)
            .field("logger", &self.logger.is_some())
            .finish()
    }
}

impl Default for TagReconciler {
    fn default() -> Self {
        Self::new(tagging_rule_set())
    }
}

impl TagReconciler {
    pub fn new(rule_set: ErrorRuleSet) -> Self {
        Self {
            rule_set,
            logger: None,
        }
    }

    pub fn with_logger(mut self, logger: Arc<dyn HandlerLogger>) -> Self {
        self.logger = Some(logger);
        self
    }

    pub fn rule_set(&self) -> &ErrorRuleSet {
        &self.rule_set
    }

    /// Remove first, then add. Each failure is classified once; an `Ignore`
    /// outcome lets the next call proceed, anything else stops here.
    fn issue_calls<C>(
        &self,
        client: &mut C,
        resource_id: &str,
        diff: &TagDiff,
    ) -> Result<(), (Failure, HandlerErrorCode)>
    where
        C: TaggingClient + ?Sized,
    {
        if !diff.to_remove.is_empty() {
            debug!(resource_id, keys = diff.to_remove.len(), "Removing tags");
            if let Err(failure) = client.untag_resource(resource_id, &diff.to_remove) {
                self.check(failure)?;
            }
        }

        if !diff.to_add.is_empty() {
            debug!(resource_id, keys = diff.to_add.len(), "Adding tags");
            if let Err(failure) = client.tag_resource(resource_id, &diff.to_add) {
                self.check(failure)?;
            }
        }

        Ok(())
    }

    fn check(&self, failure: Failure) -> Result<(), (Failure, HandlerErrorCode)> {
        match classify(&self.rule_set, &failure) {
            Outcome::Ignore => Ok(()),
            Outcome::FailWith(code) => Err((failure, code)),
        }
    }

    fn fail<M>(
        &self,
        progress: ProgressResult<M>,
        failure: &Failure,
        code: HandlerErrorCode,
    ) -> ProgressResult<M> {
        apply_outcome(progress, failure, Outcome::FailWith(code), self.logger.as_deref())
    }

    /// Tag-only change: every failure is terminal.
    ///
    /// `progress` is returned unchanged when all calls succeed or nothing needs
    /// to change.
    pub fn update_tags_only<M, C>(
        &self,
        client: &mut C,
        resource_id: &str,
        diff: &TagDiff,
        progress: ProgressResult<M>,
    ) -> ProgressResult<M>
    where
        C: TaggingClient + ?Sized,
    {
        if diff.is_empty() {
            return progress;
        }
        match self.issue_calls(client, resource_id, diff) {
            Ok(()) => {
                info!(resource_id, "Tags updated");
                progress
            }
            Err((failure, code)) => self.fail(progress, &failure, code),
        }
    }

    /// Tags applied as a side effect of a primary call that already succeeded.
    ///
    /// Mutations are issued once per operation: a re-invocation whose callback
    /// state already carries `tagging.attempted` skips straight through.
    /// Permission failures mark `tagging.incomplete` and return `progress`
    /// as-is; other failures stay terminal.
    pub fn update_tags_after_primary<M, C>(
        &self,
        client: &mut C,
        resource_id: &str,
        diff: &TagDiff,
        mut progress: ProgressResult<M>,
    ) -> ProgressResult<M>
    where
        C: TaggingClient + ?Sized,
    {
        if diff.is_empty() || progress.callback_state.flag(callback_keys::TAGGING_ATTEMPTED) {
            return progress;
        }
        progress
            .callback_state
            .set_flag(callback_keys::TAGGING_ATTEMPTED, true);

        match self.issue_calls(client, resource_id, diff) {
            Ok(()) => {
                info!(resource_id, "Tags applied");
                progress
            }
            Err((failure, code)) if is_permission_failure(code) => {
                warn!(
                    resource_id,
                    error_code = %code,
                    message = %failure.extracted_message(),
                    "Tags could not be applied; continuing"
                );
                log_line(
                    self.logger.as_deref(),
                    &format!(
                        "{TAGS_INCOMPLETE_TAG}{} [{}]",
                        failure.extracted_message(),
                        failure.type_name()
                    ),
                );
                mark_incomplete(&mut progress.callback_state);
                progress
            }
            Err((failure, code)) => self.fail(progress, &failure, code),
        }
    }
}

fn is_permission_failure(code: HandlerErrorCode) -> bool {
    matches!(
        code,
        HandlerErrorCode::AccessDenied | HandlerErrorCode::UnauthorizedTaggingOperation
    )
}

fn mark_incomplete(state: &mut CallbackState) {
    state.set_flag(callback_keys::TAGGING_INCOMPLETE, true);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::failure::FailureKind;
    use crate::logging::RecordingLogger;

    #[derive(Default)]
    struct ScriptedClient {
        calls: Vec<String>,
        untag_failure: Option<Failure>,
        tag_failure: Option<Failure>,
    }

    impl TaggingClient for ScriptedClient {
        fn untag_resource(&mut self, resource_id: &str, keys: &BTreeSet<String>) -> Result<(), Failure> {
            self.calls.push(format!("untag {resource_id} {keys:?}"));
            self.untag_failure.take().map_or(Ok(()), Err)
        }

        fn tag_resource(&mut self, resource_id: &str, tags: &Tags) -> Result<(), Failure> {
            self.calls.push(format!("tag {resource_id} {tags:?}"));
            self.tag_failure.take().map_or(Ok(()), Err)
        }
    }

    fn diff() -> TagDiff {
        TagDiff {
            to_add: Tags::from([("c".to_string(), "3".to_string())]),
            to_remove: BTreeSet::from(["a".to_string()]),
        }
    }

    fn progress() -> ProgressResult<&'static str> {
        ProgressResult::progress("bucket", CallbackState::new())
    }

    fn denied() -> Failure {
        Failure::remote_service("AccessDeniedException", "not allowed to tag")
    }

    #[test]
    fn test_remove_issued_before_add() {
        let mut client = ScriptedClient::default();
        let result = TagReconciler::default().update_tags_only(&mut client, "b-1", &diff(), progress());

        assert!(result.can_continue());
        assert_eq!(client.calls.len(), 2);
        assert!(client.calls[0].starts_with("untag b-1"));
        assert!(client.calls[1].starts_with("tag b-1"));
    }

    #[test]
    fn test_empty_diff_issues_nothing() {
        let mut client = ScriptedClient::default();
        let reconciler = TagReconciler::default();
        reconciler.update_tags_only(&mut client, "b-1", &TagDiff::default(), progress());
        reconciler.update_tags_after_primary(&mut client, "b-1", &TagDiff::default(), progress());
        assert!(client.calls.is_empty());
    }

    #[test]
    fn test_hard_fail_on_tag_only_change() {
        let logger = Arc::new(RecordingLogger::new());
        let mut client = ScriptedClient {
            tag_failure: Some(denied()),
            ..Default::default()
        };

        let result = TagReconciler::default()
            .with_logger(logger.clone())
            .update_tags_only(&mut client, "b-1", &diff(), progress());

        assert_eq!(
            result.error_code(),
            Some(HandlerErrorCode::UnauthorizedTaggingOperation)
        );
        assert_eq!(logger.lines().len(), 1);
    }

    #[test]
    fn test_soft_fail_after_primary_call() {
        let logger = Arc::new(RecordingLogger::new());
        let mut client = ScriptedClient {
            untag_failure: Some(denied()),
            ..Default::default()
        };

        let result = TagReconciler::default().with_logger(logger.clone()).update_tags_after_primary(
            &mut client,
            "b-1",
            &diff(),
            progress(),
        );

        assert!(result.can_continue());
        assert!(result.callback_state.flag(callback_keys::TAGGING_INCOMPLETE));
        assert!(result.callback_state.flag(callback_keys::TAGGING_ATTEMPTED));
        // The add call is not attempted after a refused remove
        assert_eq!(client.calls.len(), 1);
        assert_eq!(
            logger.lines(),
            vec!["TagsIncomplete: not allowed to tag [sdk::RemoteServiceFailure]".to_string()]
        );
    }

    #[test]
    fn test_soft_path_keeps_other_failures_terminal() {
        let mut client = ScriptedClient {
            tag_failure: Some(Failure::remote_service("ThrottlingException", "slow down")),
            ..Default::default()
        };

        let result = TagReconciler::default().update_tags_after_primary(
            &mut client,
            "b-1",
            &diff(),
            progress(),
        );

        assert_eq!(result.error_code(), Some(HandlerErrorCode::Throttling));
    }

    #[test]
    fn test_soft_path_runs_once_per_operation() {
        let mut client = ScriptedClient::default();
        let reconciler = TagReconciler::default();

        let first = reconciler.update_tags_after_primary(&mut client, "b-1", &diff(), progress());
        let second = reconciler.update_tags_after_primary(&mut client, "b-1", &diff(), first);

        assert!(second.can_continue());
        assert_eq!(client.calls.len(), 2);
    }

    #[test]
    fn test_ignored_failure_lets_next_call_run() {
        let rules = ErrorRuleSet::builder()
            .ignore_kind(FailureKind::NotFound)
            .extending(&tagging_rule_set());
        let mut client = ScriptedClient {
            untag_failure: Some(Failure::of(FailureKind::NotFound, "tag key not present")),
            ..Default::default()
        };

        let result = TagReconciler::new(rules).update_tags_only(&mut client, "b-1", &diff(), progress());

        assert!(result.can_continue());
        assert_eq!(client.calls.len(), 2);
    }
}
