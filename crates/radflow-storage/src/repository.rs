use crate::models::{DoctorShiftRow, StudyRow};
use async_trait::async_trait;
use chrono::{FixedOffset, NaiveDate, NaiveTime};
use radflow_core::time::to_canonical;
use radflow_core::{
    AssignmentWriter, DoctorRecord, DoctorRepository, ModalityField, ShiftRecord, StudyRecord,
    StudyRepository,
};
use sqlx::{query, query_as, SqlitePool};

/// Snapshot reads and the assignment write over the `studies` table.
pub struct SqliteStudyRepository {
    pool: SqlitePool,
    /// Offset used to promote naive stored timestamps into the canonical zone.
    local_offset: FixedOffset,
}

impl SqliteStudyRepository {
    pub fn new(pool: SqlitePool, local_offset: FixedOffset) -> Self {
        Self { pool, local_offset }
    }

    fn to_record(&self, row: StudyRow) -> StudyRecord {
        StudyRecord {
            id: row.id,
            research_number: row.research_number,
            priority: row.priority,
            created_at: row
                .created_at
                .as_deref()
                .and_then(|raw| to_canonical(raw, self.local_offset)),
            study_type_id: row.study_type_id,
            modality: match row.modality {
                Some(m) if !m.trim().is_empty() => ModalityField::Single(m),
                _ => ModalityField::Empty,
            },
            up_value: row.up_value,
        }
    }
}

#[async_trait]
impl StudyRepository for SqliteStudyRepository {
    async fn pending_studies(&self) -> anyhow::Result<Vec<StudyRecord>> {
        let rows = query_as::<_, StudyRow>(
            "SELECT s.id, s.research_number, s.priority, s.created_at, s.study_type_id,
                    st.modality AS modality, st.up_value AS up_value
             FROM studies s
             LEFT JOIN study_types st ON st.id = s.study_type_id
             WHERE s.diagnostician_id IS NULL
             ORDER BY CASE s.priority WHEN 'cito' THEN 0 WHEN 'asap' THEN 1 ELSE 2 END,
                      s.created_at ASC,
                      s.id ASC",
        )
        .fetch_all(&self.pool)
        .await?;

        Ok(rows.into_iter().map(|r| self.to_record(r)).collect())
    }
}

#[async_trait]
impl AssignmentWriter for SqliteStudyRepository {
    async fn assign(&self, study_id: i64, doctor_id: i64) -> anyhow::Result<()> {
        let result = query(
            "UPDATE studies SET diagnostician_id = ?, status = 'confirmed' WHERE id = ?",
        )
        .bind(doctor_id)
        .bind(study_id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            anyhow::bail!("study {study_id} does not exist");
        }
        Ok(())
    }
}

/// On-shift doctor reads over `doctors` joined to `schedules`.
pub struct SqliteDoctorRepository {
    pool: SqlitePool,
}

impl SqliteDoctorRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DoctorRepository for SqliteDoctorRepository {
    async fn doctors_on_shift(
        &self,
        date: NaiveDate,
    ) -> anyhow::Result<Vec<(DoctorRecord, ShiftRecord)>> {
        let rows = query_as::<_, DoctorShiftRow>(
            "SELECT d.id, d.fio_alias, d.modality, d.max_up_per_day,
                    sch.work_date, sch.time_start, sch.time_end
             FROM doctors d
             JOIN schedules sch ON sch.doctor_id = d.id
             WHERE d.is_active = 1 AND sch.work_date = ? AND sch.is_day_off = 0
             ORDER BY d.id",
        )
        .bind(date.format("%Y-%m-%d").to_string())
        .fetch_all(&self.pool)
        .await?;

        Ok(rows
            .into_iter()
            .map(|row| {
                let doctor = DoctorRecord {
                    id: row.id,
                    fio_alias: row.fio_alias,
                    modality: match row.modality {
                        Some(m) if !m.trim().is_empty() => ModalityField::Single(m),
                        _ => ModalityField::Empty,
                    },
                    max_up_per_day: row.max_up_per_day,
                };
                let shift = ShiftRecord {
                    work_date: NaiveDate::parse_from_str(&row.work_date, "%Y-%m-%d")
                        .unwrap_or(date),
                    time_start: row.time_start.as_deref().and_then(parse_time),
                    time_end: row.time_end.as_deref().and_then(parse_time),
                };
                (doctor, shift)
            })
            .collect())
    }
}

fn parse_time(raw: &str) -> Option<NaiveTime> {
    NaiveTime::parse_from_str(raw, "%H:%M:%S")
        .ok()
        .or_else(|| NaiveTime::parse_from_str(raw, "%H:%M").ok())
}

#[cfg(test)]
mod tests {
    use super::parse_time;

    #[test]
    fn parses_both_time_formats() {
        assert!(parse_time("09:00:00").is_some());
        assert!(parse_time("09:00").is_some());
        assert!(parse_time("morning").is_none());
    }
}
