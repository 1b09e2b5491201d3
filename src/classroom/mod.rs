pub mod dto;

use std::collections::HashMap;
use std::env;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;
use tracing::warn;

use crate::error::AppError;
use crate::models::{
    Announcement, Course, CourseRole, CourseWork, Student, Submission, Teacher, UserCourseRole,
};

#[derive(Clone, Debug)]
pub struct ClassroomConfig {
    pub base_url: String,
    pub access_token: String,
}

impl ClassroomConfig {
    pub fn new_from_env() -> Result<Self, AppError> {
        let access_token = env::var("CLASSROOM_ACCESS_TOKEN")
            .map_err(|_| AppError::Unauthorized("CLASSROOM_ACCESS_TOKEN is not set".to_string()))?;
        let base_url = env::var("CLASSROOM_API_BASE")
            .unwrap_or_else(|_| "https://classroom.googleapis.com".to_string());

        Ok(Self {
            base_url,
            access_token,
        })
    }
}

/// Active courses visible to the authenticated user, with the role they
/// hold in each.
#[derive(Debug, Clone, Serialize)]
pub struct CourseList {
    pub courses: Vec<Course>,
    pub user_roles: Vec<UserCourseRole>,
}

/// Everything the dashboard shows for one course. Roster, coursework and
/// announcements degrade to empty when the platform denies access to them;
/// only the course record itself is required.
#[derive(Debug, Clone, Serialize)]
pub struct CourseDetail {
    pub course: Course,
    pub students: Vec<Student>,
    pub teachers: Vec<Teacher>,
    pub coursework: Vec<CourseWork>,
    pub announcements: Vec<Announcement>,
}

/// Merge the teaching and enrolled course listings into one deduplicated
/// list. A course appearing in both keeps its first occurrence and resolves
/// to the `Teacher` role.
pub fn merge_course_roles(teaching: Vec<Course>, enrolled: Vec<Course>) -> CourseList {
    let mut courses: Vec<Course> = Vec::new();
    let mut role_by_id: HashMap<String, CourseRole> = HashMap::new();

    for course in teaching {
        if course.id.is_empty() || role_by_id.contains_key(&course.id) {
            continue;
        }
        role_by_id.insert(course.id.clone(), CourseRole::Teacher);
        courses.push(course);
    }

    for course in enrolled {
        if course.id.is_empty() || role_by_id.contains_key(&course.id) {
            continue;
        }
        role_by_id.insert(course.id.clone(), CourseRole::Student);
        courses.push(course);
    }

    let user_roles = courses
        .iter()
        .map(|course| UserCourseRole {
            course_id: course.id.clone(),
            role: role_by_id[&course.id],
        })
        .collect();

    CourseList {
        courses,
        user_roles,
    }
}

#[async_trait]
pub trait ClassroomClient: Send + Sync {
    async fn fetch_courses(&self) -> Result<CourseList, AppError>;
    async fn fetch_course(&self, course_id: &str) -> Result<Course, AppError>;
    async fn fetch_students(&self, course_id: &str) -> Result<Vec<Student>, AppError>;
    async fn fetch_teachers(&self, course_id: &str) -> Result<Vec<Teacher>, AppError>;
    async fn fetch_coursework(&self, course_id: &str) -> Result<Vec<CourseWork>, AppError>;
    async fn fetch_announcements(&self, course_id: &str) -> Result<Vec<Announcement>, AppError>;
    async fn fetch_submissions(
        &self,
        course_id: &str,
        course_work_id: &str,
    ) -> Result<Vec<Submission>, AppError>;

    /// All raw submissions of a course: one listing per coursework item. A
    /// coursework whose submissions cannot be fetched is logged and
    /// skipped, never fatal.
    async fn fetch_course_submissions(&self, course_id: &str) -> Result<Vec<Submission>, AppError> {
        let coursework = self.fetch_coursework(course_id).await?;
        let mut all = Vec::new();

        for work in &coursework {
            if work.id.is_empty() {
                continue;
            }
            match self.fetch_submissions(course_id, &work.id).await {
                Ok(mut submissions) => all.append(&mut submissions),
                Err(e) => {
                    warn!("could not fetch submissions for coursework {}: {}", work.id, e);
                }
            }
        }

        Ok(all)
    }

    async fn fetch_course_detail(&self, course_id: &str) -> Result<CourseDetail, AppError> {
        let course = self.fetch_course(course_id).await?;

        let students = self.fetch_students(course_id).await.unwrap_or_else(|e| {
            warn!("no access to students of course {}: {}", course_id, e);
            Vec::new()
        });
        let teachers = self.fetch_teachers(course_id).await.unwrap_or_else(|e| {
            warn!("no access to teachers of course {}: {}", course_id, e);
            Vec::new()
        });
        let coursework = self.fetch_coursework(course_id).await.unwrap_or_else(|e| {
            warn!("no access to coursework of course {}: {}", course_id, e);
            Vec::new()
        });
        let announcements = self.fetch_announcements(course_id).await.unwrap_or_else(|e| {
            warn!("no access to announcements of course {}: {}", course_id, e);
            Vec::new()
        });

        Ok(CourseDetail {
            course,
            students,
            teachers,
            coursework,
            announcements,
        })
    }
}

pub struct ClassroomHttpClient {
    client: Client,
    config: ClassroomConfig,
}

impl ClassroomHttpClient {
    pub fn new(config: ClassroomConfig) -> Result<Self, AppError> {
        let client = Client::builder()
            .build()
            .map_err(|e| AppError::Upstream(format!("Failed to build http client: {}", e)))?;
        Ok(Self { client, config })
    }

    async fn get_json<T: serde::de::DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, &str)],
    ) -> Result<T, AppError> {
        let url = format!("{}/v1/{}", self.config.base_url.trim_end_matches('/'), path);

        let response = self
            .client
            .get(&url)
            .query(query)
            .bearer_auth(&self.config.access_token)
            .send()
            .await
            .map_err(|_| AppError::InternalServerError)?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(AppError::Upstream(format!("{} {}: {}", status, path, body)));
        }

        let body_text = response.text().await.unwrap_or_default();
        serde_json::from_str::<T>(&body_text).map_err(|e| {
            tracing::error!("Failed to parse classroom response from {}: {}", path, e);
            AppError::Upstream(format!("Failed to parse classroom response: {}", e))
        })
    }
}

#[async_trait]
impl ClassroomClient for ClassroomHttpClient {
    async fn fetch_courses(&self) -> Result<CourseList, AppError> {
        let teaching: dto::ListCoursesResponse = self
            .get_json(
                "courses",
                &[
                    ("teacherId", "me"),
                    ("courseStates", "ACTIVE"),
                    ("pageSize", "100"),
                ],
            )
            .await?;
        let enrolled: dto::ListCoursesResponse = self
            .get_json(
                "courses",
                &[
                    ("studentId", "me"),
                    ("courseStates", "ACTIVE"),
                    ("pageSize", "100"),
                ],
            )
            .await?;

        Ok(merge_course_roles(teaching.courses, enrolled.courses))
    }

    async fn fetch_course(&self, course_id: &str) -> Result<Course, AppError> {
        self.get_json(&format!("courses/{}", course_id), &[]).await
    }

    async fn fetch_students(&self, course_id: &str) -> Result<Vec<Student>, AppError> {
        let response: dto::ListStudentsResponse = self
            .get_json(&format!("courses/{}/students", course_id), &[("pageSize", "100")])
            .await?;
        Ok(response.students)
    }

    async fn fetch_teachers(&self, course_id: &str) -> Result<Vec<Teacher>, AppError> {
        let response: dto::ListTeachersResponse = self
            .get_json(&format!("courses/{}/teachers", course_id), &[("pageSize", "100")])
            .await?;
        Ok(response.teachers)
    }

    async fn fetch_coursework(&self, course_id: &str) -> Result<Vec<CourseWork>, AppError> {
        let response: dto::ListCourseWorkResponse = self
            .get_json(&format!("courses/{}/courseWork", course_id), &[("pageSize", "100")])
            .await?;
        Ok(response.course_work)
    }

    async fn fetch_announcements(&self, course_id: &str) -> Result<Vec<Announcement>, AppError> {
        let response: dto::ListAnnouncementsResponse = self
            .get_json(
                &format!("courses/{}/announcements", course_id),
                &[("pageSize", "100")],
            )
            .await?;
        Ok(response.announcements)
    }

    async fn fetch_submissions(
        &self,
        course_id: &str,
        course_work_id: &str,
    ) -> Result<Vec<Submission>, AppError> {
        let response: dto::ListSubmissionsResponse = self
            .get_json(
                &format!(
                    "courses/{}/courseWork/{}/studentSubmissions",
                    course_id, course_work_id
                ),
                &[("pageSize", "100")],
            )
            .await?;
        Ok(response.student_submissions)
    }
}

/// Client used when no platform token is configured and in tests.
pub struct NoopClassroomClient;

#[async_trait]
impl ClassroomClient for NoopClassroomClient {
    async fn fetch_courses(&self) -> Result<CourseList, AppError> {
        Ok(CourseList {
            courses: Vec::new(),
            user_roles: Vec::new(),
        })
    }

    async fn fetch_course(&self, _course_id: &str) -> Result<Course, AppError> {
        Err(AppError::NotFound)
    }

    async fn fetch_students(&self, _course_id: &str) -> Result<Vec<Student>, AppError> {
        Ok(Vec::new())
    }

    async fn fetch_teachers(&self, _course_id: &str) -> Result<Vec<Teacher>, AppError> {
        Ok(Vec::new())
    }

    async fn fetch_coursework(&self, _course_id: &str) -> Result<Vec<CourseWork>, AppError> {
        Ok(Vec::new())
    }

    async fn fetch_announcements(&self, _course_id: &str) -> Result<Vec<Announcement>, AppError> {
        Ok(Vec::new())
    }

    async fn fetch_submissions(
        &self,
        _course_id: &str,
        _course_work_id: &str,
    ) -> Result<Vec<Submission>, AppError> {
        Ok(Vec::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn course(id: &str, name: &str) -> Course {
        Course {
            id: id.to_string(),
            name: name.to_string(),
            section: None,
            description: None,
            room: None,
            owner_id: None,
            course_state: Some("ACTIVE".to_string()),
            enrollment_code: None,
            alternate_link: None,
        }
    }

    #[test]
    fn teacher_role_wins_when_enrolled_both_ways() {
        let merged = merge_course_roles(
            vec![course("c1", "Algebra")],
            vec![course("c1", "Algebra"), course("c2", "History")],
        );

        assert_eq!(merged.courses.len(), 2);
        assert_eq!(merged.user_roles.len(), 2);
        assert_eq!(
            merged.user_roles[0],
            UserCourseRole {
                course_id: "c1".to_string(),
                role: CourseRole::Teacher,
            }
        );
        assert_eq!(merged.user_roles[1].role, CourseRole::Student);
    }

    #[test]
    fn merge_skips_courses_without_ids() {
        let merged = merge_course_roles(vec![course("", "Draft")], vec![course("c1", "History")]);
        assert_eq!(merged.courses.len(), 1);
        assert_eq!(merged.courses[0].id, "c1");
    }

    #[test]
    fn merge_preserves_listing_order() {
        let merged = merge_course_roles(
            vec![course("c2", "History"), course("c1", "Algebra")],
            vec![course("c3", "Biology")],
        );
        let ids: Vec<&str> = merged.courses.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(ids, vec!["c2", "c1", "c3"]);
    }
}
