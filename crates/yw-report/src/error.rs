/// Alias for `Result<T, ReportError>`.
pub type ReportResult<T> = Result<T, ReportError>;

/// Failures while writing or rewriting a detection dump.
#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    /// Reading or writing a dump failed.
    #[error("failed to write report: {0}")]
    Io(#[from] std::io::Error),

    /// A dump line could not be serialized.
    #[error("failed to encode report line: {0}")]
    Json(#[from] serde_json::Error),

    // Class replacement
    /// Replacement classes and weights differ in length.
    #[error("{classes} replacement classes but {weights} weights")]
    WeightCount {
        /// Number of classes given.
        classes: usize,
        /// Number of weights given.
        weights: usize,
    },

    /// The weights cannot be sampled from (empty, negative, or all zero).
    #[error("invalid replacement weights: {0}")]
    Weights(String),

    /// A class is both replaced and a replacement.
    #[error("class \"{class}\" is both an existing and a replacement class")]
    OverlappingClass {
        /// The class listed on both sides.
        class: String,
    },
}
