use axum::Json;
use axum::extract::{Path, Query};
use axum::routing::{get, post};
use axum::{Router, extract::State, http::StatusCode};
use serde::Deserialize;

use crate::classroom::{CourseDetail, CourseList};
use crate::error::AppError;
use crate::models::{AttendanceRecord, AttendanceStats, SaveAttendanceRequest, User};
use crate::reconcile::{CourseReport, SubmissionStats};
use crate::services::{AttendanceService, DashboardService};
use crate::state::AppState;

#[derive(Deserialize)]
struct AttendanceQueryParams {
    date: String,
}

#[derive(Deserialize)]
struct AttendanceStatsParams {
    start: Option<String>,
    end: Option<String>,
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/courses", get(list_courses))
        .route("/courses/{id}", get(course_detail))
        .route("/courses/{id}/report", get(course_report))
        .route("/courses/{id}/stats", get(course_stats))
        .route("/courses/{id}/roster/sync", post(sync_roster))
        .route(
            "/courses/{id}/attendance",
            get(attendance_sheet).post(save_attendance),
        )
        .route("/courses/{id}/attendance/stats", get(attendance_stats))
        .route("/courses/{id}/attendance/dates", get(attendance_dates))
        .with_state(state)
}

async fn health(State(state): State<AppState>) -> Result<StatusCode, AppError> {
    sqlx::query("select 1").execute(&state.db).await?;
    Ok(StatusCode::OK)
}

async fn list_courses(State(state): State<AppState>) -> Result<Json<CourseList>, AppError> {
    let courses = state.classroom.fetch_courses().await?;
    Ok(Json(courses))
}

async fn course_detail(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CourseDetail>, AppError> {
    let detail = state.classroom.fetch_course_detail(&id).await?;
    Ok(Json(detail))
}

async fn course_report(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<CourseReport>, AppError> {
    let service = DashboardService::new(state.classroom.clone());
    let report = service.course_report(&id).await?;
    Ok(Json(report))
}

async fn course_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<SubmissionStats>, AppError> {
    let service = DashboardService::new(state.classroom.clone());
    let stats = service.course_stats(&id).await?;
    Ok(Json(stats))
}

async fn sync_roster(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<User>>, AppError> {
    let students = state.classroom.fetch_students(&id).await?;
    let service = AttendanceService::new(state.db.clone());
    let users = service.ensure_users_exist(&students).await?;
    Ok(Json(users))
}

async fn attendance_sheet(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<AttendanceQueryParams>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let service = AttendanceService::new(state.db.clone());
    let records = service.sheet_for_date(&id, &params.date).await?;
    Ok(Json(records))
}

async fn save_attendance(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<SaveAttendanceRequest>,
) -> Result<Json<Vec<AttendanceRecord>>, AppError> {
    let service = AttendanceService::new(state.db.clone());
    let records = service.save(&id, req).await?;
    Ok(Json(records))
}

async fn attendance_stats(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Query(params): Query<AttendanceStatsParams>,
) -> Result<Json<AttendanceStats>, AppError> {
    let service = AttendanceService::new(state.db.clone());
    let stats = service
        .stats(&id, params.start.as_deref(), params.end.as_deref())
        .await?;
    Ok(Json(stats))
}

async fn attendance_dates(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<Vec<String>>, AppError> {
    let service = AttendanceService::new(state.db.clone());
    let dates = service.dates(&id).await?;
    Ok(Json(dates))
}
