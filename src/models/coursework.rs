use serde::{Deserialize, Serialize};

/// Calendar date in the platform's partial representation. Month is
/// 1-based. Any missing component means the assignment has no usable
/// deadline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PartialDate {
    pub year: Option<i32>,
    pub month: Option<u32>,
    pub day: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TimeOfDay {
    pub hours: Option<u32>,
    pub minutes: Option<u32>,
    pub seconds: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CourseWork {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub id: String,
    pub title: Option<String>,
    pub description: Option<String>,
    pub state: Option<String>,
    pub due_date: Option<PartialDate>,
    pub due_time: Option<TimeOfDay>,
    pub max_points: Option<f64>,
    pub work_type: Option<String>,
    pub alternate_link: Option<String>,
}

/// One state transition in a submission's history. The platform emits
/// history entries that may carry other payloads; only `stateHistory`
/// matters here, so everything else deserializes to `None`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub state_history: Option<StateHistory>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateHistory {
    pub state: Option<String>,
    pub state_timestamp: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub user_id: String,
    #[serde(default)]
    pub course_work_id: String,
    pub state: Option<String>,
    #[serde(default)]
    pub submission_history: Vec<HistoryEntry>,
    pub assigned_grade: Option<f64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Announcement {
    #[serde(default)]
    pub course_id: String,
    #[serde(default)]
    pub id: String,
    #[serde(default)]
    pub text: String,
    pub state: Option<String>,
    pub creation_time: Option<String>,
    pub update_time: Option<String>,
    pub alternate_link: Option<String>,
}
