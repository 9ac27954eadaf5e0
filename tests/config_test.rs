use resource_handler_core::{
    BackoffStrategy, DelayStrategy, HandlerConfig, HandlerCoreError, Stabilizer,
};
use std::collections::HashMap;
use std::io::Write;
use std::time::Duration;

#[test]
fn test_yaml_file_drives_stabilizer() {
    let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
    writeln!(
        file,
        "backoff:\n  initial_delay_seconds: 2\n  total_timeout_seconds: 30\n  strategy: exponential\n  multiplier: 3.0\n  max_delay_seconds: 10\nprobing:\n  threshold: 2"
    )
    .unwrap();

    let config = HandlerConfig::load_with_env(Some(file.path()), Some(HashMap::new())).unwrap();

    assert_eq!(config.backoff.strategy, BackoffStrategy::Exponential);
    let policy = config.backoff.to_policy();
    assert_eq!(
        policy.strategy(),
        DelayStrategy::Exponential {
            multiplier: 3.0,
            max_delay: Duration::from_secs(10)
        }
    );
    assert_eq!(policy.delay_for(2), Duration::from_secs(6));

    let stabilizer = Stabilizer::new("bucket.ready", policy).with_probing(config.probing.threshold);
    assert_eq!(stabilizer.policy().total_timeout(), Duration::from_secs(30));
}

#[test]
fn test_environment_layer_applies_without_file() {
    let env = HashMap::from([
        ("HANDLER_PROBING__ENABLED".to_string(), "false".to_string()),
        ("HANDLER_BACKOFF__INITIAL_DELAY_SECONDS".to_string(), "1".to_string()),
    ]);

    let config = HandlerConfig::load_with_env(None, Some(env)).unwrap();

    assert!(!config.probing.enabled);
    assert!(!config.probing.context().is_enabled());
    assert_eq!(config.backoff.initial_delay_seconds, 1);
}

#[test]
fn test_invalid_file_values_rejected() {
    let mut file = tempfile::Builder::new().suffix(".toml").tempfile().unwrap();
    writeln!(file, "[backoff]\ninitial_delay_seconds = 60\ntotal_timeout_seconds = 10").unwrap();

    let result = HandlerConfig::load_with_env(Some(file.path()), Some(HashMap::new()));

    assert!(matches!(result, Err(HandlerCoreError::Configuration(_))));
}
