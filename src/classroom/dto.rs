use serde::Deserialize;

use crate::models::{Announcement, Course, CourseWork, Student, Submission, Teacher};

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCoursesResponse {
    #[serde(default)]
    pub courses: Vec<Course>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListStudentsResponse {
    #[serde(default)]
    pub students: Vec<Student>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListTeachersResponse {
    #[serde(default)]
    pub teachers: Vec<Teacher>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListCourseWorkResponse {
    #[serde(default)]
    pub course_work: Vec<CourseWork>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListSubmissionsResponse {
    #[serde(default)]
    pub student_submissions: Vec<Submission>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListAnnouncementsResponse {
    #[serde(default)]
    pub announcements: Vec<Announcement>,
    #[serde(default)]
    pub next_page_token: Option<String>,
}
