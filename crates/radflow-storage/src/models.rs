/// Database row types. Raw and fully optional; the core's snapshot loader
/// owns the defaulting.
use sqlx::FromRow;

#[derive(Debug, Clone, FromRow)]
pub struct StudyRow {
    pub id: i64,
    pub research_number: String,
    pub priority: Option<String>,
    pub created_at: Option<String>,
    pub study_type_id: Option<i64>,
    pub modality: Option<String>,
    pub up_value: Option<f64>,
}

#[derive(Debug, Clone, FromRow)]
pub struct DoctorShiftRow {
    pub id: i64,
    pub fio_alias: Option<String>,
    pub modality: Option<String>,
    pub max_up_per_day: Option<i64>,
    pub work_date: String,
    pub time_start: Option<String>,
    pub time_end: Option<String>,
}
