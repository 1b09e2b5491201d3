use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Locally stored user, keyed by the classroom platform's user id.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: String,
    pub platform_id: String,
    pub name: String,
    pub email: String,
    pub photo_url: Option<String>,
}

/// One attendance row joined with the user's display fields.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct AttendanceRecord {
    pub id: String,
    pub user_id: String,
    pub course_id: String,
    pub date: String,
    pub present: bool,
    pub user_name: String,
    pub user_email: String,
    pub user_photo_url: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceMark {
    pub user_id: String,
    pub present: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SaveAttendanceRequest {
    pub date: String,
    pub marks: Vec<AttendanceMark>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceOverall {
    pub total_records: i64,
    pub present_count: i64,
    pub absent_count: i64,
    pub attendance_rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentAttendance {
    pub user_id: String,
    pub name: String,
    pub email: String,
    pub total: i64,
    pub present: i64,
    pub absent: i64,
    pub rate: f64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AttendanceStats {
    pub overall: AttendanceOverall,
    pub by_student: Vec<StudentAttendance>,
}
