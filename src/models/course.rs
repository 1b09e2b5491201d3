use serde::{Deserialize, Serialize};

/// Course record as returned by the classroom platform.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub name: String,
    pub section: Option<String>,
    pub description: Option<String>,
    pub room: Option<String>,
    pub owner_id: Option<String>,
    pub course_state: Option<String>,
    pub enrollment_code: Option<String>,
    pub alternate_link: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum CourseRole {
    Teacher,
    Student,
}

/// The role the authenticated user holds in one course. A user enrolled
/// both ways resolves to `Teacher`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserCourseRole {
    pub course_id: String,
    pub role: CourseRole,
}
