use std::sync::Arc;

use tracing::info;

use crate::classroom::ClassroomClient;
use crate::error::AppError;
use crate::reconcile::{self, CourseReport, SubmissionStats};

/// Fetch-then-reconcile flow behind the dashboard views: pulls a course's
/// roster, coursework and raw submissions from the platform and derives
/// the submission report from them.
pub struct DashboardService {
    classroom: Arc<dyn ClassroomClient>,
}

impl DashboardService {
    pub fn new(classroom: Arc<dyn ClassroomClient>) -> Self {
        Self { classroom }
    }

    pub async fn course_report(&self, course_id: &str) -> Result<CourseReport, AppError> {
        let students = self.classroom.fetch_students(course_id).await?;
        let coursework = self.classroom.fetch_coursework(course_id).await?;
        let submissions = self.classroom.fetch_course_submissions(course_id).await?;

        let report = reconcile::reconcile(&students, &coursework, &submissions);
        info!(
            "reconciled course {}: {} students x {} assignments",
            course_id,
            report.students.len(),
            report.assignments.len()
        );
        Ok(report)
    }

    pub async fn course_stats(&self, course_id: &str) -> Result<SubmissionStats, AppError> {
        Ok(self.course_report(course_id).await?.stats)
    }
}
