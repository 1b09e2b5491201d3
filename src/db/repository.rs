use std::collections::HashMap;

use chrono::NaiveDate;
use sqlx::SqlitePool;
use uuid::Uuid;

use crate::models::{
    AttendanceOverall, AttendanceRecord, AttendanceStats, StudentAttendance, User,
};

pub async fn find_user_by_platform_id(
    db: &SqlitePool,
    platform_id: &str,
) -> Result<Option<User>, sqlx::Error> {
    sqlx::query_as::<_, User>(
        "SELECT id, platform_id, name, email, photo_url FROM users WHERE platform_id = ?",
    )
    .bind(platform_id)
    .fetch_optional(db)
    .await
}

/// Insert or refresh a user keyed by the platform's user id.
pub async fn upsert_user(
    db: &SqlitePool,
    platform_id: &str,
    name: &str,
    email: &str,
    photo_url: Option<&str>,
) -> Result<User, sqlx::Error> {
    match find_user_by_platform_id(db, platform_id).await? {
        Some(_) => {
            sqlx::query("UPDATE users SET name = ?, email = ?, photo_url = ? WHERE platform_id = ?")
                .bind(name)
                .bind(email)
                .bind(photo_url)
                .bind(platform_id)
                .execute(db)
                .await?;
        }
        None => {
            let id = Uuid::new_v4().to_string();
            sqlx::query(
                "INSERT INTO users (id, platform_id, name, email, photo_url) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(platform_id)
            .bind(name)
            .bind(email)
            .bind(photo_url)
            .execute(db)
            .await?;
        }
    }

    find_user_by_platform_id(db, platform_id)
        .await?
        .ok_or(sqlx::Error::RowNotFound)
}

const RECORD_COLUMNS: &str = "a.id, a.user_id, a.course_id, a.date, a.present, \
     u.name AS user_name, u.email AS user_email, u.photo_url AS user_photo_url";

pub async fn attendance_for_date(
    db: &SqlitePool,
    course_id: &str,
    date: NaiveDate,
) -> Result<Vec<AttendanceRecord>, sqlx::Error> {
    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {RECORD_COLUMNS} \
         FROM attendance a JOIN users u ON u.id = a.user_id \
         WHERE a.course_id = ? AND a.date = ? \
         ORDER BY u.name"
    ))
    .bind(course_id)
    .bind(day_key(date))
    .fetch_all(db)
    .await
}

/// Upsert one attendance mark for (user, course, day) and return the stored
/// row joined with the user's display fields.
pub async fn save_attendance(
    db: &SqlitePool,
    user_id: &str,
    course_id: &str,
    date: NaiveDate,
    present: bool,
) -> Result<AttendanceRecord, sqlx::Error> {
    let date = day_key(date);

    let existing: Option<(String,)> = sqlx::query_as(
        "SELECT id FROM attendance WHERE user_id = ? AND course_id = ? AND date = ?",
    )
    .bind(user_id)
    .bind(course_id)
    .bind(&date)
    .fetch_optional(db)
    .await?;

    match existing {
        Some((id,)) => {
            sqlx::query("UPDATE attendance SET present = ? WHERE id = ?")
                .bind(present)
                .bind(&id)
                .execute(db)
                .await?;
        }
        None => {
            let id = Uuid::new_v4().to_string();
            sqlx::query(
                "INSERT INTO attendance (id, user_id, course_id, date, present) VALUES (?, ?, ?, ?, ?)",
            )
            .bind(&id)
            .bind(user_id)
            .bind(course_id)
            .bind(&date)
            .bind(present)
            .execute(db)
            .await?;
        }
    }

    sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {RECORD_COLUMNS} \
         FROM attendance a JOIN users u ON u.id = a.user_id \
         WHERE a.user_id = ? AND a.course_id = ? AND a.date = ?"
    ))
    .bind(user_id)
    .bind(course_id)
    .bind(&date)
    .fetch_one(db)
    .await
}

/// Overall and per-student attendance counts for a course, optionally
/// bounded to a date range (inclusive).
pub async fn attendance_stats(
    db: &SqlitePool,
    course_id: &str,
    start: Option<NaiveDate>,
    end: Option<NaiveDate>,
) -> Result<AttendanceStats, sqlx::Error> {
    let records = sqlx::query_as::<_, AttendanceRecord>(&format!(
        "SELECT {RECORD_COLUMNS} \
         FROM attendance a JOIN users u ON u.id = a.user_id \
         WHERE a.course_id = ? \
         ORDER BY a.date"
    ))
    .bind(course_id)
    .fetch_all(db)
    .await?;

    let in_range = |record: &AttendanceRecord| {
        // Day keys are ISO dates, so the lexicographic comparison is the
        // chronological one.
        if let Some(start) = start {
            if record.date < day_key(start) {
                return false;
            }
        }
        if let Some(end) = end {
            if record.date > day_key(end) {
                return false;
            }
        }
        true
    };

    let mut total_records = 0i64;
    let mut present_count = 0i64;
    let mut by_student: Vec<StudentAttendance> = Vec::new();
    let mut slot_by_user: HashMap<String, usize> = HashMap::new();

    for record in records.iter().filter(|r| in_range(r)) {
        total_records += 1;
        if record.present {
            present_count += 1;
        }

        let slot = *slot_by_user
            .entry(record.user_id.clone())
            .or_insert_with(|| {
                by_student.push(StudentAttendance {
                    user_id: record.user_id.clone(),
                    name: record.user_name.clone(),
                    email: record.user_email.clone(),
                    total: 0,
                    present: 0,
                    absent: 0,
                    rate: 0.0,
                });
                by_student.len() - 1
            });

        let entry = &mut by_student[slot];
        entry.total += 1;
        if record.present {
            entry.present += 1;
        } else {
            entry.absent += 1;
        }
        entry.rate = round_rate(entry.present, entry.total);
    }

    let absent_count = total_records - present_count;
    let attendance_rate = round_rate(present_count, total_records);

    Ok(AttendanceStats {
        overall: AttendanceOverall {
            total_records,
            present_count,
            absent_count,
            attendance_rate,
        },
        by_student,
    })
}

/// Days on which attendance was taken for a course, newest first.
pub async fn attendance_dates(
    db: &SqlitePool,
    course_id: &str,
) -> Result<Vec<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT DISTINCT date FROM attendance WHERE course_id = ? ORDER BY date DESC",
    )
    .bind(course_id)
    .fetch_all(db)
    .await
}

fn day_key(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

fn round_rate(present: i64, total: i64) -> f64 {
    if total == 0 {
        return 0.0;
    }
    let rate = (present as f64) / (total as f64) * 100.0;
    (rate * 100.0).round() / 100.0
}
