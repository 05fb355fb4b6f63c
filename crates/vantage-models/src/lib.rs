//! # vantage-models
//!
//! Predictive models behind one capability trait, [`IPredictiveModel`].
//!
//! | Kind | Adapter | Output |
//! |------|---------|--------|
//! | `timeline` | [`TimelinePredictor`] | days to completion |
//! | `budget` | [`BudgetForecaster`] | estimate at completion + overrun probability |
//! | `risk` | [`RiskScorer`] | 0–100 score + category |
//! | `resource` | [`ResourceOptimizer`] | coverage ratio + allocation |
//!
//! Models are stateless. Parameters live in a [`FittedState`] that callers pass to
//! `predict`, so one registry serves any number of trained variants.

pub mod budget;
pub mod linalg;
pub mod registry;
pub mod resource;
pub mod risk;
pub mod state;
pub mod timeline;
pub mod traits;

pub use budget::BudgetForecaster;
pub use registry::ModelRegistry;
pub use resource::{Allocation, ResourceOptimizer};
pub use risk::RiskScorer;
pub use state::{FittedState, FittedStates};
pub use timeline::TimelinePredictor;
pub use traits::{IPredictiveModel, ModelInput, TrainingExample};
