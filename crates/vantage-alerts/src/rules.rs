//! Rule loading and validation.

use std::collections::BTreeSet;

use serde::Deserialize;
use tracing::info;
use vantage_core::constants::MAX_RULES_PER_SET;
use vantage_core::errors::{VantageError, VantageResult};
use vantage_core::models::{ModelKind, PredictionField, Rule, RuleTarget};

#[derive(Debug, Deserialize)]
struct RuleFile {
    #[serde(default)]
    rules: Vec<Rule>,
}

/// A validated, immutable set of rules with their parsed targets.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    entries: Vec<(Rule, RuleTarget)>,
}

impl RuleSet {
    /// Validate `rules` against the registered model kinds. Every problem is
    /// reported; one bad rule rejects the whole set.
    pub fn new(rules: Vec<Rule>, known_kinds: &[ModelKind]) -> VantageResult<Self> {
        let mut problems = Vec::new();
        if rules.len() > MAX_RULES_PER_SET {
            problems.push(format!(
                "{} rules exceed the limit of {MAX_RULES_PER_SET}",
                rules.len()
            ));
        }

        let mut seen = BTreeSet::new();
        let mut entries = Vec::with_capacity(rules.len());
        for rule in rules {
            if rule.rule_id.trim().is_empty() {
                problems.push(format!("rule for '{}' has an empty rule_id", rule.applies_to));
            } else if !seen.insert(rule.rule_id.clone()) {
                problems.push(format!("duplicate rule_id '{}'", rule.rule_id));
            }
            if !rule.threshold.is_finite() {
                problems.push(format!(
                    "rule '{}' has a non-finite threshold",
                    rule.rule_id
                ));
            }
            match RuleTarget::parse(&rule.applies_to) {
                Ok(target) => match check_target(&target, known_kinds) {
                    Ok(()) => entries.push((rule, target)),
                    Err(problem) => problems.push(format!("rule '{}': {problem}", rule.rule_id)),
                },
                Err(problem) => problems.push(format!("rule '{}': {problem}", rule.rule_id)),
            }
        }

        if !problems.is_empty() {
            return Err(VantageError::InvalidRuleConfiguration { problems });
        }
        info!(rules = entries.len(), "loaded rule set");
        Ok(Self { entries })
    }

    /// Parse a TOML document of `[[rules]]` tables.
    pub fn from_toml(input: &str, known_kinds: &[ModelKind]) -> VantageResult<Self> {
        let file: RuleFile =
            toml::from_str(input).map_err(|e| VantageError::InvalidRuleConfiguration {
                problems: vec![e.to_string()],
            })?;
        Self::new(file.rules, known_kinds)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&Rule, &RuleTarget)> {
        self.entries.iter().map(|(rule, target)| (rule, target))
    }

    pub fn get(&self, rule_id: &str) -> Option<&Rule> {
        self.entries
            .iter()
            .map(|(rule, _)| rule)
            .find(|rule| rule.rule_id == rule_id)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

fn check_target(target: &RuleTarget, known_kinds: &[ModelKind]) -> Result<(), String> {
    let RuleTarget::Prediction { kind, field } = target else {
        return Ok(());
    };
    if !known_kinds.contains(kind) {
        return Err(format!("unknown model kind '{kind}'"));
    }
    let only = match field {
        PredictionField::OverrunProbability => Some(ModelKind::BUDGET),
        PredictionField::UnmetRequirements => Some(ModelKind::RESOURCE),
        _ => None,
    };
    match only {
        Some(required) if *kind != required => {
            Err(format!("'{field}' is only produced by the '{required}' model"))
        }
        _ => Ok(()),
    }
}
