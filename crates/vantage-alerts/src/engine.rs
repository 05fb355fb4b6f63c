//! [`AlertEngine`]: per-(project, rule) trigger and resolve logic.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use dashmap::DashMap;
use tracing::{debug, info, instrument};
use vantage_core::config::AlertConfig;
use vantage_core::models::{
    Alert, AlertPayload, IndicatorSet, Measure, PredictionBundle, PredictionResult, Resolution,
    Rule, RuleTarget, UndefinedReason,
};

use crate::ledger::AlertLedger;
use crate::rules::RuleSet;

/// What one evaluation changed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct AlertEvaluation {
    /// New alerts, most severe first.
    pub raised: Vec<Alert>,
    /// Ids of alerts resolved by this evaluation.
    pub resolved: Vec<String>,
}

impl AlertEvaluation {
    pub fn is_empty(&self) -> bool {
        self.raised.is_empty() && self.resolved.is_empty()
    }
}

#[derive(Debug, Clone, Default)]
struct RuleState {
    active: Option<String>,
    last_alert_at: Option<DateTime<Utc>>,
}

type StateKey = (String, String);

/// Evaluates a [`RuleSet`] and keeps per-(project, rule) state plus the ledger.
pub struct AlertEngine {
    rules: Arc<RuleSet>,
    config: AlertConfig,
    states: DashMap<StateKey, RuleState>,
    ledger: AlertLedger,
}

impl AlertEngine {
    pub fn new(rules: RuleSet, config: AlertConfig) -> Self {
        Self {
            rules: Arc::new(rules),
            config,
            states: DashMap::new(),
            ledger: AlertLedger::new(),
        }
    }

    pub fn rules(&self) -> &RuleSet {
        &self.rules
    }

    pub fn ledger(&self) -> &AlertLedger {
        &self.ledger
    }

    /// Run every rule for one project at `now`.
    ///
    /// Running twice with the same inputs and `now` changes nothing the second
    /// time.
    #[instrument(skip(self, indicators, bundle), fields(rules = self.rules.len()))]
    pub fn evaluate(
        &self,
        project_id: &str,
        indicators: &IndicatorSet,
        bundle: Option<&PredictionBundle>,
        now: DateTime<Utc>,
    ) -> AlertEvaluation {
        let mut evaluation = AlertEvaluation::default();

        for (rule, target) in self.rules.iter() {
            let (observed, prediction) = observe(target, indicators, bundle);
            let Some(value) = observed.value() else {
                debug!(rule_id = %rule.rule_id, reason = %observed, "indeterminate input");
                continue;
            };

            let key = (project_id.to_string(), rule.rule_id.clone());
            let mut state = self.states.entry(key).or_default();

            if !rule.comparator.holds(value, rule.threshold) {
                if let Some(alert_id) = state.active.take() {
                    if self.ledger.resolve(&alert_id, now, Resolution::ConditionCleared) {
                        info!(project_id, rule_id = %rule.rule_id, "alert resolved");
                        evaluation.resolved.push(alert_id);
                    }
                }
                continue;
            }

            let cooling = state
                .last_alert_at
                .is_some_and(|last| now - last < rule.cooldown_window());
            if cooling {
                continue;
            }

            let alert_id = Alert::content_id(project_id, &rule.rule_id, window_index(rule, now));
            if self.ledger.contains(&alert_id) {
                continue;
            }

            if let Some(previous) = state.active.take() {
                if self.ledger.resolve(&previous, now, Resolution::Superseded) {
                    evaluation.resolved.push(previous);
                }
            }

            let alert = build_alert(alert_id, project_id, rule, value, indicators, prediction, now);
            if self.ledger.insert(alert.clone()) {
                info!(
                    project_id,
                    rule_id = %rule.rule_id,
                    severity = %alert.severity,
                    observed = value,
                    "alert raised"
                );
                state.active = Some(alert.alert_id.clone());
                state.last_alert_at = Some(now);
                evaluation.raised.push(alert);
            }
        }

        evaluation.raised.sort_by(|a, b| {
            self.config
                .rank(a.severity)
                .cmp(&self.config.rank(b.severity))
                .then_with(|| a.rule_id.cmp(&b.rule_id))
        });
        evaluation
    }

    /// Active alerts for one project, most severe first.
    pub fn active_alerts(&self, project_id: &str) -> Vec<Alert> {
        let mut alerts = self.ledger.active_for(project_id);
        alerts.sort_by_key(|a| self.config.rank(a.severity));
        alerts
    }

    pub fn history(&self, project_id: &str) -> Vec<Alert> {
        self.ledger.history_for(project_id)
    }
}

fn observe(
    target: &RuleTarget,
    indicators: &IndicatorSet,
    bundle: Option<&PredictionBundle>,
) -> (Measure, Option<PredictionResult>) {
    match target {
        RuleTarget::Indicator(field) => (indicators.field(*field), None),
        RuleTarget::Prediction { kind, field } => {
            match bundle.and_then(|b| b.prediction(kind)) {
                Some(prediction) => (prediction.field(*field), Some(prediction.clone())),
                None => (Measure::undefined(UndefinedReason::NotApplicable), None),
            }
        }
    }
}

/// Cooldown window that `now` falls into; the whole second for a zero cooldown.
fn window_index(rule: &Rule, now: DateTime<Utc>) -> i64 {
    let secs = rule.cooldown_window().num_seconds();
    if secs <= 0 {
        now.timestamp()
    } else {
        now.timestamp().div_euclid(secs)
    }
}

fn build_alert(
    alert_id: String,
    project_id: &str,
    rule: &Rule,
    value: f64,
    indicators: &IndicatorSet,
    prediction: Option<PredictionResult>,
    now: DateTime<Utc>,
) -> Alert {
    let mut message = format!(
        "{}: {} = {value:.4} {} {}",
        rule.rule_id, rule.applies_to, rule.comparator, rule.threshold
    );
    if let Some(description) = &rule.description {
        message.push_str(" (");
        message.push_str(description);
        message.push(')');
    }
    Alert {
        alert_id,
        severity: rule.severity,
        rule_id: rule.rule_id.clone(),
        project_id: project_id.to_string(),
        triggered_at: now,
        message,
        payload: AlertPayload {
            applies_to: rule.applies_to.clone(),
            comparator: rule.comparator,
            threshold: rule.threshold,
            observed_value: value,
            indicators: indicators.clone(),
            prediction,
        },
        resolved: false,
        resolved_at: None,
        resolution: None,
    }
}
