use thiserror::Error;

#[derive(Error, Debug)]
pub enum DistributionError {
    /// A consistent snapshot of studies or doctors could not be obtained.
    /// Fatal; the run aborts before any mutation.
    #[error("Snapshot unavailable: {0}")]
    SnapshotUnavailable(String),

    /// An internal assertion failed. Fatal; should never occur in a correct
    /// build.
    #[error("Invariant {invariant} violated: {detail}")]
    InvariantViolation { invariant: String, detail: String },
}

impl DistributionError {
    pub fn invariant(invariant: &str, detail: impl Into<String>) -> Self {
        Self::InvariantViolation {
            invariant: invariant.to_string(),
            detail: detail.into(),
        }
    }
}
