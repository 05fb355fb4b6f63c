use vantage_alerts::RuleSet;
use vantage_core::errors::VantageError;
use vantage_core::models::{Comparator, ModelKind, RuleTarget, Severity};

fn known() -> Vec<ModelKind> {
    vec![
        ModelKind::BUDGET,
        ModelKind::RESOURCE,
        ModelKind::RISK,
        ModelKind::TIMELINE,
    ]
}

fn problems(err: VantageError) -> Vec<String> {
    match err {
        VantageError::InvalidRuleConfiguration { problems } => problems,
        other => panic!("expected InvalidRuleConfiguration, got {other:?}"),
    }
}

const VALID: &str = r#"
[[rules]]
rule_id = "cpi-low"
applies_to = "cost_performance_index"
comparator = "<"
threshold = 0.85
severity = "medium"
cooldown_window_secs = 604800
description = "Cost efficiency below tolerance"

[[rules]]
rule_id = "risk-high"
applies_to = "risk.point_estimate"
comparator = "ge"
threshold = 67.0
severity = "high"
cooldown_window_secs = 86400

[[rules]]
rule_id = "overrun"
applies_to = "budget.overrun_probability"
comparator = ">"
threshold = 0.5
severity = "critical"
cooldown_window_secs = 0
"#;

#[test]
fn valid_toml_loads_in_order() {
    let set = RuleSet::from_toml(VALID, &known()).unwrap();
    assert_eq!(set.len(), 3);
    let (rule, target) = set.iter().next().unwrap();
    assert_eq!(rule.comparator, Comparator::Lt);
    assert_eq!(rule.severity, Severity::Medium);
    assert_eq!(rule.cooldown_window().num_days(), 7);
    assert!(matches!(target, RuleTarget::Indicator(_)));
    assert_eq!(set.get("risk-high").unwrap().comparator, Comparator::Ge);
}

#[test]
fn empty_document_is_an_empty_set() {
    let set = RuleSet::from_toml("", &known()).unwrap();
    assert!(set.is_empty());
}

#[test]
fn every_problem_is_reported_and_nothing_loads() {
    let toml = r#"
[[rules]]
rule_id = "a"
applies_to = "cpi"
comparator = "<"
threshold = 0.85
severity = "low"
cooldown_window_secs = 0

[[rules]]
rule_id = "a"
applies_to = "churn.point_estimate"
comparator = "<"
threshold = 1.0
severity = "low"
cooldown_window_secs = 0

[[rules]]
rule_id = "b"
applies_to = "risk.overrun_probability"
comparator = ">"
threshold = 0.5
severity = "high"
cooldown_window_secs = 0

[[rules]]
rule_id = "c"
applies_to = "timeline.width"
comparator = ">"
threshold = 0.5
severity = "high"
cooldown_window_secs = 0
"#;
    let found = problems(RuleSet::from_toml(toml, &known()).unwrap_err());
    assert_eq!(found.len(), 5, "{found:#?}");
    assert!(found.iter().any(|p| p.contains("'cpi'")));
    assert!(found.iter().any(|p| p.contains("duplicate rule_id 'a'")));
    assert!(found.iter().any(|p| p.contains("unknown model kind 'churn'")));
    assert!(found.iter().any(|p| p.contains("only produced by the 'budget'")));
    assert!(found.iter().any(|p| p.contains("unknown prediction field 'width'")));
}

#[test]
fn non_finite_threshold_is_rejected() {
    let toml = r#"
[[rules]]
rule_id = "nan"
applies_to = "schedule_performance_index"
comparator = "<"
threshold = nan
severity = "low"
cooldown_window_secs = 0
"#;
    let found = problems(RuleSet::from_toml(toml, &known()).unwrap_err());
    assert_eq!(found, vec!["rule 'nan' has a non-finite threshold".to_string()]);
}

#[test]
fn malformed_toml_is_a_rule_configuration_error() {
    let err = RuleSet::from_toml("[[rules]]\nrule_id = 3", &known()).unwrap_err();
    assert_eq!(problems(err).len(), 1);
}

#[test]
fn unknown_severity_is_rejected() {
    let toml = VALID.replace("\"medium\"", "\"urgent\"");
    assert!(RuleSet::from_toml(&toml, &known()).is_err());
}
