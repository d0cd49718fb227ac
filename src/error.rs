use thiserror::Error;

#[derive(Error, Debug)]
pub enum UnderwritingError {
    #[error("Invalid margin fraction {0}: must be between 0.0 (inclusive) and 1.0 (exclusive)")]
    InvalidMarginFraction(f64),

    #[error("Invalid advance rate {0}: must be between 0.0 and 1.0")]
    InvalidAdvanceRate(f64),

    #[error("Invalid usance period {0} months: must be greater than 0")]
    InvalidUsanceMonths(f64),

    #[error("Invalid leverage cap {0}: must be greater than 0")]
    InvalidLeverageCap(f64),

    #[error("Invalid debt amortisation period {0} years: must be greater than 0")]
    InvalidAmortisationYears(f64),

    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, UnderwritingError>;
