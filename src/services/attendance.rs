use chrono::NaiveDate;
use sqlx::SqlitePool;
use tracing::warn;

use crate::db::repository;
use crate::error::AppError;
use crate::models::{
    AttendanceRecord, AttendanceStats, SaveAttendanceRequest, Student, User,
};

/// Attendance-taking over the local store: mirrors platform students into
/// the users table and records per-day presence marks against them.
pub struct AttendanceService {
    db: SqlitePool,
}

impl AttendanceService {
    pub fn new(db: SqlitePool) -> Self {
        Self { db }
    }

    /// Store one platform student locally. Students missing an id, a full
    /// name, or an email are rejected rather than stored half-filled.
    pub async fn upsert_user(&self, student: &Student) -> Result<User, AppError> {
        if student.user_id.is_empty() {
            return Err(AppError::BadRequest(
                "student record is missing its user id".to_string(),
            ));
        }
        let name = student
            .full_name()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| {
                AppError::BadRequest(format!(
                    "student {} is missing a full name",
                    student.user_id
                ))
            })?;
        let email = student.email().filter(|e| !e.is_empty()).ok_or_else(|| {
            AppError::BadRequest(format!("student {} is missing an email", student.user_id))
        })?;

        let user = repository::upsert_user(
            &self.db,
            &student.user_id,
            name,
            email,
            student.photo_url(),
        )
        .await?;
        Ok(user)
    }

    /// Store every storable student; incomplete records are logged and
    /// skipped so one bad roster entry does not block the rest.
    pub async fn ensure_users_exist(&self, students: &[Student]) -> Result<Vec<User>, AppError> {
        let mut users = Vec::new();

        for student in students {
            match self.upsert_user(student).await {
                Ok(user) => users.push(user),
                Err(e) => {
                    warn!("could not store user for student {}: {}", student.user_id, e);
                }
            }
        }

        Ok(users)
    }

    pub async fn sheet_for_date(
        &self,
        course_id: &str,
        date: &str,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let date = parse_day(date)?;
        let records = repository::attendance_for_date(&self.db, course_id, date).await?;
        Ok(records)
    }

    pub async fn save(
        &self,
        course_id: &str,
        request: SaveAttendanceRequest,
    ) -> Result<Vec<AttendanceRecord>, AppError> {
        let date = parse_day(&request.date)?;

        let mut saved = Vec::with_capacity(request.marks.len());
        for mark in &request.marks {
            let record =
                repository::save_attendance(&self.db, &mark.user_id, course_id, date, mark.present)
                    .await?;
            saved.push(record);
        }

        Ok(saved)
    }

    pub async fn stats(
        &self,
        course_id: &str,
        start: Option<&str>,
        end: Option<&str>,
    ) -> Result<AttendanceStats, AppError> {
        let start = start.map(parse_day).transpose()?;
        let end = end.map(parse_day).transpose()?;
        let stats = repository::attendance_stats(&self.db, course_id, start, end).await?;
        Ok(stats)
    }

    pub async fn dates(&self, course_id: &str) -> Result<Vec<String>, AppError> {
        let dates = repository::attendance_dates(&self.db, course_id).await?;
        Ok(dates)
    }
}

/// Attendance is day-granular; anything finer than a calendar day is
/// rejected rather than silently truncated.
fn parse_day(value: &str) -> Result<NaiveDate, AppError> {
    NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| AppError::BadRequest(format!("invalid date, expected YYYY-MM-DD: {}", value)))
}
