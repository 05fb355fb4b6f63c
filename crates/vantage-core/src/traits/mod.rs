//! Narrow interfaces to the collaborators around the core.

mod dashboard;
mod dispatcher;
mod record_store;

pub use dashboard::IDashboardReader;
pub use dispatcher::INotificationDispatcher;
pub use record_store::IProjectRecordStore;
