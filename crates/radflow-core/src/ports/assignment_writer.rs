use async_trait::async_trait;

#[cfg_attr(any(test, feature = "testing"), mockall::automock)]
#[async_trait]
pub trait AssignmentWriter: Send + Sync {
    /// Persist one assignment: set the study's diagnostician reference and
    /// mark it confirmed. Idempotent per row; no other fields are touched.
    async fn assign(&self, study_id: i64, doctor_id: i64) -> anyhow::Result<()>;
}
