//! Rule sets: ordered matcher → outcome tables.
//!
//! A rule set is immutable once built. New rule sets are made by prepending
//! rules in front of an existing base, and evaluation is first-match-wins from
//! the front, so a prepended rule always outranks every rule of its base.

use crate::constants::{HandlerErrorCode, ServiceErrorCode};
use crate::failure::{Failure, FailureKind};
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// What a rule matches on
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Matcher {
    /// Structural match; also accepts every specialization of the kind
    Kind(FailureKind),
    /// Normalized provider code carried by a remote-service failure
    Code(ServiceErrorCode),
}

impl Matcher {
    pub fn accepts(&self, failure: &Failure) -> bool {
        match self {
            Matcher::Kind(kind) => failure.is_a(*kind),
            Matcher::Code(code) => failure.service_code() == Some(*code),
        }
    }
}

/// Disposition of a classified failure
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Outcome {
    /// Treat the failure as success
    Ignore,
    /// Terminal failure with a caller-facing code
    FailWith(HandlerErrorCode),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Rule {
    pub matcher: Matcher,
    pub outcome: Outcome,
}

impl Rule {
    pub fn new(matcher: Matcher, outcome: Outcome) -> Self {
        Self { matcher, outcome }
    }

    pub fn on_kind(kind: FailureKind, outcome: Outcome) -> Self {
        Self::new(Matcher::Kind(kind), outcome)
    }

    pub fn on_code(code: ServiceErrorCode, outcome: Outcome) -> Self {
        Self::new(Matcher::Code(code), outcome)
    }
}

/// Ordered, immutable rule table
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorRuleSet {
    rules: Arc<[Rule]>,
}

impl Default for ErrorRuleSet {
    fn default() -> Self {
        Self::empty()
    }
}

impl ErrorRuleSet {
    pub fn empty() -> Self {
        Self {
            rules: Arc::from(Vec::new()),
        }
    }

    pub fn from_rules(rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules.into_iter().collect(),
        }
    }

    pub fn builder() -> RuleSetBuilder {
        RuleSetBuilder::default()
    }

    /// New rule set with `rules` placed ahead of every rule in `self`
    pub fn extended_with(&self, rules: impl IntoIterator<Item = Rule>) -> Self {
        Self {
            rules: rules
                .into_iter()
                .chain(self.rules.iter().copied())
                .collect(),
        }
    }

    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// First rule whose matcher accepts `failure`
    pub fn first_match(&self, failure: &Failure) -> Option<&Rule> {
        self.rules.iter().find(|rule| rule.matcher.accepts(failure))
    }

    /// Outcome of the first matching rule; unmatched failures are internal failures
    pub fn classify(&self, failure: &Failure) -> Outcome {
        self.first_match(failure)
            .map(|rule| rule.outcome)
            .unwrap_or(Outcome::FailWith(HandlerErrorCode::InternalFailure))
    }
}

/// Collects rules in evaluation order
#[derive(Debug, Clone, Default)]
pub struct RuleSetBuilder {
    rules: Vec<Rule>,
}

impl RuleSetBuilder {
    pub fn rule(mut self, rule: Rule) -> Self {
        self.rules.push(rule);
        self
    }

    pub fn ignore_kind(self, kind: FailureKind) -> Self {
        self.rule(Rule::on_kind(kind, Outcome::Ignore))
    }

    pub fn fail_on_kind(self, kind: FailureKind, code: HandlerErrorCode) -> Self {
        self.rule(Rule::on_kind(kind, Outcome::FailWith(code)))
    }

    pub fn ignore_code(self, code: ServiceErrorCode) -> Self {
        self.rule(Rule::on_code(code, Outcome::Ignore))
    }

    pub fn fail_on_code(self, code: ServiceErrorCode, handler_code: HandlerErrorCode) -> Self {
        self.rule(Rule::on_code(code, Outcome::FailWith(handler_code)))
    }

    pub fn build(self) -> ErrorRuleSet {
        ErrorRuleSet::from_rules(self.rules)
    }

    /// Prepend the collected rules to `base`
    pub fn extending(self, base: &ErrorRuleSet) -> ErrorRuleSet {
        base.extended_with(self.rules)
    }
}
