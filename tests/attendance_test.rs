use sqlx::SqlitePool;

use classdash_backend::db::repository;
use classdash_backend::models::{
    AttendanceMark, PersonName, SaveAttendanceRequest, Student, UserProfile,
};
use classdash_backend::services::AttendanceService;

async fn setup_db() -> SqlitePool {
    let pool = SqlitePool::connect("sqlite::memory:")
        .await
        .expect("Failed to create database");

    sqlx::migrate!("./migrations")
        .run(&pool)
        .await
        .expect("Failed to run migrations");

    pool
}

fn student(user_id: &str, name: Option<&str>, email: Option<&str>) -> Student {
    Student {
        course_id: "c1".to_string(),
        user_id: user_id.to_string(),
        profile: Some(UserProfile {
            id: user_id.to_string(),
            name: Some(PersonName {
                given_name: None,
                family_name: None,
                full_name: name.map(str::to_string),
            }),
            email_address: email.map(str::to_string),
            photo_url: None,
        }),
    }
}

fn marks(request: &[(&str, bool)]) -> Vec<AttendanceMark> {
    request
        .iter()
        .map(|(user_id, present)| AttendanceMark {
            user_id: user_id.to_string(),
            present: *present,
        })
        .collect()
}

#[tokio::test]
async fn upsert_user_inserts_then_updates_in_place() {
    let db = setup_db().await;
    let service = AttendanceService::new(db.clone());

    let user = service
        .upsert_user(&student("g-1", Some("Ana Ruiz"), Some("ana@school.test")))
        .await
        .expect("Failed to store user");
    assert_eq!(user.platform_id, "g-1");
    assert_eq!(user.name, "Ana Ruiz");

    let updated = service
        .upsert_user(&student("g-1", Some("Ana R. Ruiz"), Some("ana@school.test")))
        .await
        .expect("Failed to update user");

    // Same local row, refreshed display fields.
    assert_eq!(updated.id, user.id);
    assert_eq!(updated.name, "Ana R. Ruiz");
}

#[tokio::test]
async fn incomplete_students_are_rejected() {
    let db = setup_db().await;
    let service = AttendanceService::new(db.clone());

    let missing_email = student("g-1", Some("Ana Ruiz"), None);
    assert!(service.upsert_user(&missing_email).await.is_err());

    let missing_name = student("g-2", None, Some("ben@school.test"));
    assert!(service.upsert_user(&missing_name).await.is_err());

    let missing_id = student("", Some("Caro Diaz"), Some("caro@school.test"));
    assert!(service.upsert_user(&missing_id).await.is_err());
}

#[tokio::test]
async fn roster_sync_skips_incomplete_students() {
    let db = setup_db().await;
    let service = AttendanceService::new(db.clone());

    let roster = vec![
        student("g-1", Some("Ana Ruiz"), Some("ana@school.test")),
        student("g-2", None, Some("ben@school.test")),
        student("g-3", Some("Caro Diaz"), Some("caro@school.test")),
    ];

    let users = service
        .ensure_users_exist(&roster)
        .await
        .expect("Roster sync failed");

    let stored: Vec<&str> = users.iter().map(|u| u.platform_id.as_str()).collect();
    assert_eq!(stored, vec!["g-1", "g-3"]);
}

#[tokio::test]
async fn save_marks_then_flip_one() {
    let db = setup_db().await;
    let service = AttendanceService::new(db.clone());

    let users = service
        .ensure_users_exist(&[
            student("g-1", Some("Ana Ruiz"), Some("ana@school.test")),
            student("g-2", Some("Ben Okafor"), Some("ben@school.test")),
        ])
        .await
        .expect("Roster sync failed");

    let saved = service
        .save(
            "c1",
            SaveAttendanceRequest {
                date: "2024-03-10".to_string(),
                marks: marks(&[(&users[0].id, true), (&users[1].id, false)]),
            },
        )
        .await
        .expect("Failed to save attendance");
    assert_eq!(saved.len(), 2);

    // Re-saving the same day updates in place instead of adding rows.
    service
        .save(
            "c1",
            SaveAttendanceRequest {
                date: "2024-03-10".to_string(),
                marks: marks(&[(&users[1].id, true)]),
            },
        )
        .await
        .expect("Failed to update attendance");

    let sheet = service
        .sheet_for_date("c1", "2024-03-10")
        .await
        .expect("Failed to read sheet");
    assert_eq!(sheet.len(), 2);
    assert!(sheet.iter().all(|r| r.present));

    // Rows come back ordered by user name.
    assert_eq!(sheet[0].user_name, "Ana Ruiz");
    assert_eq!(sheet[1].user_name, "Ben Okafor");
}

#[tokio::test]
async fn stats_aggregate_overall_and_per_student() {
    let db = setup_db().await;
    let service = AttendanceService::new(db.clone());

    let users = service
        .ensure_users_exist(&[
            student("g-1", Some("Ana Ruiz"), Some("ana@school.test")),
            student("g-2", Some("Ben Okafor"), Some("ben@school.test")),
        ])
        .await
        .expect("Roster sync failed");

    for (date, ana, ben) in [
        ("2024-03-10", true, true),
        ("2024-03-11", true, false),
        ("2024-03-12", false, false),
    ] {
        service
            .save(
                "c1",
                SaveAttendanceRequest {
                    date: date.to_string(),
                    marks: marks(&[(&users[0].id, ana), (&users[1].id, ben)]),
                },
            )
            .await
            .expect("Failed to save attendance");
    }

    let stats = service
        .stats("c1", None, None)
        .await
        .expect("Failed to compute stats");

    assert_eq!(stats.overall.total_records, 6);
    assert_eq!(stats.overall.present_count, 3);
    assert_eq!(stats.overall.absent_count, 3);
    assert_eq!(stats.overall.attendance_rate, 50.0);

    let ana = stats
        .by_student
        .iter()
        .find(|s| s.user_id == users[0].id)
        .expect("missing per-student row");
    assert_eq!(ana.total, 3);
    assert_eq!(ana.present, 2);
    assert_eq!(ana.absent, 1);
    assert_eq!(ana.rate, 66.67);
}

#[tokio::test]
async fn stats_respect_date_range() {
    let db = setup_db().await;
    let service = AttendanceService::new(db.clone());

    let users = service
        .ensure_users_exist(&[student("g-1", Some("Ana Ruiz"), Some("ana@school.test"))])
        .await
        .expect("Roster sync failed");

    for (date, present) in [("2024-03-01", false), ("2024-03-10", true), ("2024-03-20", true)] {
        service
            .save(
                "c1",
                SaveAttendanceRequest {
                    date: date.to_string(),
                    marks: marks(&[(&users[0].id, present)]),
                },
            )
            .await
            .expect("Failed to save attendance");
    }

    let stats = service
        .stats("c1", Some("2024-03-05"), Some("2024-03-15"))
        .await
        .expect("Failed to compute stats");

    assert_eq!(stats.overall.total_records, 1);
    assert_eq!(stats.overall.present_count, 1);
    assert_eq!(stats.overall.attendance_rate, 100.0);
}

#[tokio::test]
async fn empty_course_yields_zeroed_stats() {
    let db = setup_db().await;
    let service = AttendanceService::new(db.clone());

    let stats = service
        .stats("nowhere", None, None)
        .await
        .expect("Failed to compute stats");
    assert_eq!(stats.overall.total_records, 0);
    assert_eq!(stats.overall.attendance_rate, 0.0);
    assert!(stats.by_student.is_empty());
}

#[tokio::test]
async fn attendance_dates_are_distinct_and_newest_first() {
    let db = setup_db().await;
    let service = AttendanceService::new(db.clone());

    let users = service
        .ensure_users_exist(&[
            student("g-1", Some("Ana Ruiz"), Some("ana@school.test")),
            student("g-2", Some("Ben Okafor"), Some("ben@school.test")),
        ])
        .await
        .expect("Roster sync failed");

    for date in ["2024-03-10", "2024-03-12", "2024-03-11"] {
        service
            .save(
                "c1",
                SaveAttendanceRequest {
                    date: date.to_string(),
                    marks: marks(&[(&users[0].id, true), (&users[1].id, true)]),
                },
            )
            .await
            .expect("Failed to save attendance");
    }

    let dates = service.dates("c1").await.expect("Failed to list dates");
    assert_eq!(dates, vec!["2024-03-12", "2024-03-11", "2024-03-10"]);
}

#[tokio::test]
async fn sub_daily_dates_are_rejected() {
    let db = setup_db().await;
    let service = AttendanceService::new(db.clone());

    assert!(service.sheet_for_date("c1", "2024-03-10T10:00:00").await.is_err());
    assert!(service.sheet_for_date("c1", "not-a-date").await.is_err());
}

#[tokio::test]
async fn repository_find_user_misses_cleanly() {
    let db = setup_db().await;
    let found = repository::find_user_by_platform_id(&db, "g-404")
        .await
        .expect("Query failed");
    assert!(found.is_none());
}
