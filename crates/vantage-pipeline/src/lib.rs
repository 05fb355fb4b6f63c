//! # vantage-pipeline
//!
//! Runs the per-project evaluation cycle (fetch → indicators → predictions →
//! health → alerts → dispatch) and publishes each successful cycle atomically to a
//! read-only [`Dashboard`]. Also ships in-memory implementations of the external
//! collaborators for embedding and tests.

pub mod cancellation;
pub mod dashboard;
pub mod dispatch;
pub mod pipeline;
pub mod store;

pub use cancellation::CancellationFlag;
pub use dashboard::{Dashboard, ProjectView};
pub use dispatch::{RecordingDispatcher, TracingDispatcher};
pub use pipeline::{CycleReport, Pipeline};
pub use store::InMemoryRecordStore;
