/// Errors raised while fitting or invoking a predictive model.
#[derive(Debug, thiserror::Error)]
pub enum ModelError {
    #[error("{kind}: not enough training examples: need {required}, got {available}")]
    NotEnoughExamples {
        kind: String,
        required: usize,
        available: usize,
    },

    #[error("{kind}: normal equations are singular")]
    SingularSystem { kind: String },

    #[error("{kind}: feature schema mismatch: expected {expected}, got {actual}")]
    SchemaMismatch {
        kind: String,
        expected: String,
        actual: String,
    },

    #[error("{kind}: fitted state is missing parameter {parameter}")]
    MissingParameter { kind: String, parameter: String },
}
