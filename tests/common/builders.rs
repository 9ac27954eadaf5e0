use resource_handler_core::{CallbackState, Failure, FailureKind, ProgressResult, Tags};
use serde::{Deserialize, Serialize};

/// Minimal resource model used across integration tests
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BucketModel {
    pub name: String,
    pub arn: Option<String>,
}

impl BucketModel {
    pub fn named(name: &str) -> Self {
        Self {
            name: name.to_string(),
            arn: None,
        }
    }
}

pub fn in_progress(name: &str) -> ProgressResult<BucketModel> {
    ProgressResult::progress(BucketModel::named(name), CallbackState::new())
}

pub fn service_failure(code: &str, message: &str) -> Failure {
    Failure::remote_service(code, message)
}

pub fn not_found(message: &str) -> Failure {
    Failure::of(FailureKind::NotFound, message)
}

pub fn tags(pairs: &[(&str, &str)]) -> Tags {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}
