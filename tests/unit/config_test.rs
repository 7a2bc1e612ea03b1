//! Tests for configuration validation

use std::collections::HashMap;

use prometheus_delay_scheduler::config::{
    ClockConfig, SchedulerConfig, SortPolicy, CAPACITY, ENV_CAPACITY, ENV_CLOCK, ENV_SORT_POLICY,
    ENV_SORT_THRESHOLD_MS, SORT_THRESHOLD_MS,
};

fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = vars
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_default_config() {
    let cfg = SchedulerConfig::default();
    assert_eq!(cfg.capacity, CAPACITY);
    assert_eq!(cfg.sort_policy, SortPolicy::Always);
    assert_eq!(cfg.clock, ClockConfig::System);
    assert!(cfg.validate().is_ok());
}

#[test]
fn test_config_invalid_capacity() {
    let zero = SchedulerConfig {
        capacity: 0,
        ..SchedulerConfig::default()
    };
    assert!(zero.validate().is_err());

    let huge = SchedulerConfig {
        capacity: 70_000,
        ..SchedulerConfig::default()
    };
    assert!(huge.validate().is_err());
}

#[test]
fn test_config_invalid_threshold() {
    let cfg = SchedulerConfig {
        sort_policy: SortPolicy::Threshold { threshold_ms: 0 },
        ..SchedulerConfig::default()
    };
    assert!(cfg.validate().is_err());
    assert_eq!(
        SortPolicy::threshold(),
        SortPolicy::Threshold { threshold_ms: SORT_THRESHOLD_MS }
    );
}

#[test]
fn test_config_from_json() {
    let json = r#"{
        "capacity": 8,
        "sort_policy": { "threshold": { "threshold_ms": 25 } },
        "clock": "monotonic"
    }"#;
    let cfg = SchedulerConfig::from_json_str(json).unwrap();
    assert_eq!(cfg.capacity, 8);
    assert_eq!(cfg.sort_policy, SortPolicy::Threshold { threshold_ms: 25 });
    assert_eq!(cfg.clock, ClockConfig::Monotonic);
}

#[test]
fn test_config_from_json_defaults_missing_fields() {
    let cfg = SchedulerConfig::from_json_str(r#"{ "capacity": 10 }"#).unwrap();
    assert_eq!(cfg.capacity, 10);
    assert_eq!(cfg.sort_policy, SortPolicy::Always);
}

#[test]
fn test_config_from_json_rejects_invalid() {
    assert!(SchedulerConfig::from_json_str(r#"{ "capacity": 0 }"#).is_err());
    assert!(SchedulerConfig::from_json_str("not json").is_err());
}

#[test]
fn test_config_from_lookup() {
    let cfg = SchedulerConfig::from_lookup(lookup(&[
        (ENV_CAPACITY, "12"),
        (ENV_SORT_POLICY, "Threshold"),
        (ENV_SORT_THRESHOLD_MS, "75"),
        (ENV_CLOCK, "monotonic"),
    ]))
    .unwrap();
    assert_eq!(cfg.capacity, 12);
    assert_eq!(cfg.sort_policy, SortPolicy::Threshold { threshold_ms: 75 });
    assert_eq!(cfg.clock, ClockConfig::Monotonic);
}

#[test]
fn test_config_from_lookup_empty_is_default() {
    let cfg = SchedulerConfig::from_lookup(lookup(&[])).unwrap();
    assert_eq!(cfg, SchedulerConfig::default());
}

#[test]
fn test_config_from_lookup_errors() {
    assert!(SchedulerConfig::from_lookup(lookup(&[(ENV_CAPACITY, "many")])).is_err());
    assert!(SchedulerConfig::from_lookup(lookup(&[(ENV_CAPACITY, "0")])).is_err());
    assert!(SchedulerConfig::from_lookup(lookup(&[(ENV_SORT_POLICY, "random")])).is_err());
    assert!(SchedulerConfig::from_lookup(lookup(&[(ENV_CLOCK, "sundial")])).is_err());
}
