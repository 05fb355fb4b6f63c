use std::time::Duration;

use crate::errors::VantageResult;
use crate::models::Alert;

/// Delivery channel for alerts (email, chat, paging, ...).
///
/// A failed send returns [`VantageError::DeliveryFailure`](crate::errors::VantageError::DeliveryFailure).
/// The core records the failure and never retries; retry policy belongs to the
/// implementation.
pub trait INotificationDispatcher: Send + Sync {
    fn send(&self, alert: &Alert, timeout: Duration) -> VantageResult<()>;
}
