//! Submission reconciliation: classify every (student, assignment) pair of
//! a course against the platform's raw submission records and roll the
//! results up into course-level counts.

use std::collections::HashMap;

use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::{CourseWork, PartialDate, StateHistory, Student, Submission, TimeOfDay};

/// State tag the platform records when a student hands work in.
pub const TURNED_IN: &str = "TURNED_IN";

const FALLBACK_ASSIGNMENT_TITLE: &str = "untitled";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SubmissionStatus {
    OnTime,
    Late,
    Resubmitted,
    NotSubmitted,
    Pending,
}

/// One classified cell of the student × assignment grid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionCell {
    pub status: SubmissionStatus,
    pub submitted_at: Option<String>,
    pub due_date: Option<NaiveDateTime>,
    pub grade: Option<f64>,
    pub max_points: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentRow {
    pub student_id: String,
    pub student_name: String,
    pub student_email: String,
    /// Keyed by assignment id. Column order is carried by the report's
    /// `assignments` list, which preserves the input coursework order.
    pub submissions: HashMap<String, SubmissionCell>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AssignmentMeta {
    pub id: String,
    pub title: String,
    pub due_date: Option<NaiveDateTime>,
    pub max_points: Option<f64>,
}

/// Course-wide counts. `pending` cells increment none of the four named
/// counters; `total` is always students × assignments.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubmissionStats {
    pub on_time: usize,
    pub late: usize,
    pub resubmitted: usize,
    pub not_submitted: usize,
    pub total: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseReport {
    pub students: Vec<StudentRow>,
    pub assignments: Vec<AssignmentMeta>,
    pub stats: SubmissionStats,
}

/// Resolve an assignment's partial due date plus optional time of day into
/// a single instant, or `None` when there is no usable deadline.
///
/// A date with no time of day resolves to the very end of that calendar
/// day, so work handed in any time on the due date still counts as on
/// time. When a time of day is present, its missing components default to
/// 23 hours / 59 minutes / 59 seconds. Out-of-range components resolve to
/// `None` rather than an error.
pub fn resolve_due_instant(
    due_date: Option<&PartialDate>,
    due_time: Option<&TimeOfDay>,
) -> Option<NaiveDateTime> {
    let due_date = due_date?;
    let date = NaiveDate::from_ymd_opt(due_date.year?, due_date.month?, due_date.day?)?;

    match due_time {
        Some(time) => date.and_hms_opt(
            time.hours.unwrap_or(23),
            time.minutes.unwrap_or(59),
            time.seconds.unwrap_or(59),
        ),
        None => date.and_hms_milli_opt(23, 59, 59, 999),
    }
}

/// Parse an RFC3339 state timestamp into a zone-less instant comparable
/// with resolved due instants.
pub fn parse_timestamp(ts: &str) -> Option<NaiveDateTime> {
    chrono::DateTime::parse_from_rfc3339(ts)
        .ok()
        .map(|dt| dt.naive_utc())
}

fn is_turn_in(entry: &crate::models::HistoryEntry) -> bool {
    entry
        .state_history
        .as_ref()
        .and_then(|h| h.state.as_deref())
        == Some(TURNED_IN)
}

/// First turn-in by position in the history sequence. History is taken in
/// the order the platform delivered it and never re-sorted by timestamp.
fn first_turn_in(submission: &Submission) -> Option<&StateHistory> {
    submission
        .submission_history
        .iter()
        .find(|e| is_turn_in(e))
        .and_then(|e| e.state_history.as_ref())
}

fn turn_in_count(submission: &Submission) -> usize {
    submission
        .submission_history
        .iter()
        .filter(|e| is_turn_in(e))
        .count()
}

/// Classify one submission against one assignment's resolved due instant.
///
/// Ordered guard chain; the first matching rule wins:
/// 1. no record at all → not submitted;
/// 2. empty history → not submitted when the state tag is `CREATED` or
///    `NEW`, pending otherwise;
/// 3. no turn-in entry, or a first turn-in without a parseable timestamp
///    → not submitted (the timestamp is the only evidence of when work
///    was handed in);
/// 4. more than one turn-in → resubmitted, whatever the timestamps say;
/// 5. otherwise on time when there is no deadline or the first turn-in is
///    at or before it, late when it is after.
pub fn classify(
    submission: Option<&Submission>,
    due_instant: Option<NaiveDateTime>,
) -> SubmissionStatus {
    let Some(submission) = submission else {
        return SubmissionStatus::NotSubmitted;
    };

    if submission.submission_history.is_empty() {
        return match submission.state.as_deref() {
            Some("CREATED") | Some("NEW") => SubmissionStatus::NotSubmitted,
            _ => SubmissionStatus::Pending,
        };
    }

    let Some(first) = first_turn_in(submission) else {
        return SubmissionStatus::NotSubmitted;
    };

    let Some(submitted_at) = first.state_timestamp.as_deref().and_then(parse_timestamp) else {
        return SubmissionStatus::NotSubmitted;
    };

    // The resubmission check outranks on-time/late: the count includes
    // turn-ins with missing timestamps.
    if turn_in_count(submission) > 1 {
        return SubmissionStatus::Resubmitted;
    }

    match due_instant {
        Some(due) if submitted_at > due => SubmissionStatus::Late,
        _ => SubmissionStatus::OnTime,
    }
}

/// Build the full student × assignment report for one course.
///
/// Outer order follows the input student list, inner order the input
/// coursework list. Duplicate (student, assignment) submission keys keep
/// the last record seen. An empty student or coursework list short-circuits
/// to an empty report with zeroed stats.
pub fn reconcile(
    students: &[Student],
    coursework: &[CourseWork],
    submissions: &[Submission],
) -> CourseReport {
    if students.is_empty() || coursework.is_empty() {
        return CourseReport {
            students: Vec::new(),
            assignments: Vec::new(),
            stats: SubmissionStats::default(),
        };
    }

    let assignments: Vec<AssignmentMeta> = coursework
        .iter()
        .map(|work| AssignmentMeta {
            id: work.id.clone(),
            title: work
                .title
                .clone()
                .filter(|t| !t.is_empty())
                .unwrap_or_else(|| FALLBACK_ASSIGNMENT_TITLE.to_string()),
            due_date: resolve_due_instant(work.due_date.as_ref(), work.due_time.as_ref()),
            max_points: work.max_points,
        })
        .collect();

    let mut index: HashMap<(&str, &str), &Submission> = HashMap::new();
    for submission in submissions {
        if submission.user_id.is_empty() || submission.course_work_id.is_empty() {
            continue;
        }
        index.insert(
            (submission.user_id.as_str(), submission.course_work_id.as_str()),
            submission,
        );
    }

    let mut stats = SubmissionStats {
        total: students.len() * coursework.len(),
        ..SubmissionStats::default()
    };

    let mut rows = Vec::with_capacity(students.len());
    for student in students {
        let mut cells = HashMap::with_capacity(coursework.len());

        for (work, meta) in coursework.iter().zip(&assignments) {
            let submission = index
                .get(&(student.user_id.as_str(), work.id.as_str()))
                .copied();
            let status = classify(submission, meta.due_date);

            match status {
                SubmissionStatus::OnTime => stats.on_time += 1,
                SubmissionStatus::Late => stats.late += 1,
                SubmissionStatus::Resubmitted => stats.resubmitted += 1,
                SubmissionStatus::NotSubmitted => stats.not_submitted += 1,
                SubmissionStatus::Pending => {}
            }

            cells.insert(
                work.id.clone(),
                SubmissionCell {
                    status,
                    submitted_at: submission
                        .and_then(first_turn_in)
                        .and_then(|h| h.state_timestamp.clone()),
                    due_date: meta.due_date,
                    grade: submission.and_then(|s| s.assigned_grade),
                    max_points: work.max_points,
                },
            );
        }

        rows.push(StudentRow {
            student_id: student.user_id.clone(),
            student_name: student.full_name().unwrap_or_default().to_string(),
            student_email: student.email().unwrap_or_default().to_string(),
            submissions: cells,
        });
    }

    CourseReport {
        students: rows,
        assignments,
        stats,
    }
}

/// Stats-only view of [`reconcile`], for dashboard course cards.
pub fn course_stats(
    students: &[Student],
    coursework: &[CourseWork],
    submissions: &[Submission],
) -> SubmissionStats {
    reconcile(students, coursework, submissions).stats
}
