mod model_error;
mod store_error;
mod vantage_error;

pub use model_error::ModelError;
pub use store_error::StoreError;
pub use vantage_error::{VantageError, VantageResult};
