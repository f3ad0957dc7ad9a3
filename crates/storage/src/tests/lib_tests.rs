use super::*;

fn fields(technician: &str, description: &str) -> ReportFields {
    ReportFields {
        technician: technician.to_string(),
        office_time: Some("09:00 - 18:00".to_string()),
        date: "2024-05-01".to_string(),
        description: description.to_string(),
    }
}

#[tokio::test]
async fn health_check_succeeds_for_live_pool() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    storage.health_check().await.expect("health check");
}

#[tokio::test]
async fn creates_database_file_when_missing() {
    let temp_root = tempfile::tempdir().expect("temp root");
    let db_path = temp_root.path().join("nested").join("reports.db");
    let database_url = format!("sqlite://{}", db_path.to_string_lossy().replace('\\', "/"));

    let storage = Storage::new(&database_url).await.expect("db");
    drop(storage);

    assert!(
        db_path.exists(),
        "database file should exist: {}",
        db_path.display()
    );
}

#[tokio::test]
async fn stores_and_lists_reports_per_owner() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let ana = OwnerId::from("uid-ana");
    let bruno = OwnerId::from("uid-bruno");

    let id = storage
        .create_report(&ana, &fields("Ana", "Restarted service X"))
        .await
        .expect("create");
    storage
        .create_report(&bruno, &fields("Bruno", "Replaced router"))
        .await
        .expect("create");

    let reports = storage.reports_for_owner(&ana).await.expect("list");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id, id);
    assert_eq!(reports[0].owner_id, ana);
    assert_eq!(reports[0].fields.technician, "Ana");
    assert_eq!(reports[0].fields.office_time.as_deref(), Some("09:00 - 18:00"));
}

#[tokio::test]
async fn empty_owner_yields_empty_list() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let reports = storage
        .reports_for_owner(&OwnerId::from("uid-nobody"))
        .await
        .expect("list");
    assert!(reports.is_empty());
}

#[tokio::test]
async fn update_rewrites_all_content_fields() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let ana = OwnerId::from("uid-ana");
    let id = storage
        .create_report(&ana, &fields("Ana", "Restarted service X"))
        .await
        .expect("create");

    let updated = ReportFields {
        technician: "Ana Souza".to_string(),
        office_time: None,
        date: "2024-05-02".to_string(),
        description: "Restarted service X and verified logs".to_string(),
    };
    let matched = storage
        .update_report(&id, &ana, &updated)
        .await
        .expect("update");
    assert!(matched);

    let reports = storage.reports_for_owner(&ana).await.expect("list");
    assert_eq!(reports[0].fields, updated);
}

#[tokio::test]
async fn update_is_scoped_to_the_owner() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let ana = OwnerId::from("uid-ana");
    let id = storage
        .create_report(&ana, &fields("Ana", "Restarted service X"))
        .await
        .expect("create");

    let matched = storage
        .update_report(&id, &OwnerId::from("uid-bruno"), &fields("Bruno", "hijack"))
        .await
        .expect("update");
    assert!(!matched);

    let reports = storage.reports_for_owner(&ana).await.expect("list");
    assert_eq!(reports[0].fields.technician, "Ana");
}

#[tokio::test]
async fn delete_removes_only_the_targeted_report() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let ana = OwnerId::from("uid-ana");
    let first = storage
        .create_report(&ana, &fields("Ana", "Restarted service X"))
        .await
        .expect("create");
    let second = storage
        .create_report(&ana, &fields("Ana", "Patched firmware"))
        .await
        .expect("create");

    let matched = storage.delete_report(&first, &ana).await.expect("delete");
    assert!(matched);

    let reports = storage.reports_for_owner(&ana).await.expect("list");
    assert_eq!(reports.len(), 1);
    assert_eq!(reports[0].id, second);
}

#[tokio::test]
async fn deleting_unknown_id_matches_no_row() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let matched = storage
        .delete_report(&ReportId::from("missing"), &OwnerId::from("uid-ana"))
        .await
        .expect("delete");
    assert!(!matched);
}
