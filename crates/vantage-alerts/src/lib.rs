//! # vantage-alerts
//!
//! Evaluates threshold rules against indicators and predictions.
//!
//! Each (project, rule) pair runs a small state machine:
//! `inactive → triggered → resolved (≡ inactive)`. A trigger needs the condition
//! to hold and the rule's cooldown to have elapsed since the pair's last alert.
//! Undefined inputs leave the state untouched.

pub mod engine;
pub mod ledger;
pub mod rules;

pub use engine::{AlertEngine, AlertEvaluation};
pub use ledger::AlertLedger;
pub use rules::RuleSet;
