//! Runs the models against a real PostgreSQL database.
//! Skipped unless DATABASE_URL is set.

use std::sync::Arc;

use tokio::sync::OnceCell;

use pharmamate_api::config::{AppConfig, DatabaseConfig, StoreKind};
use pharmamate_api::database::models::{
    ActivitiesCalendar, ActivityChanges, JournalEntries, ModelError, NewActivity, NewJournalEntry, Users,
};
use pharmamate_api::database::{DatabaseManager, Store};

// Concurrent CREATE TABLE IF NOT EXISTS can still collide in the catalog
static SCHEMA: OnceCell<()> = OnceCell::const_new();

async fn postgres() -> Option<Arc<dyn Store>> {
    let url = std::env::var("DATABASE_URL").ok()?;
    let config = DatabaseConfig {
        store: StoreKind::Postgres,
        url: Some(url),
        ..AppConfig::test().database
    };

    SCHEMA
        .get_or_init(|| async {
            DatabaseManager::init_schema(&config).await.unwrap();
        })
        .await;
    Some(DatabaseManager::connect(&config).await.unwrap())
}

/// Usernames are at most 25 characters
fn unique_name(prefix: &str) -> String {
    let micros = chrono::Utc::now().timestamp_micros() % 1_000_000_000_000;
    format!("{}{}", prefix, micros)
}

async fn drop_user(store: &Arc<dyn Store>, username: &str) {
    store
        .query(r#"DELETE FROM "users" WHERE "username" = $1 RETURNING "username""#, &[username.into()])
        .await
        .unwrap();
}

#[tokio::test]
async fn duplicate_registration_is_bad_request() {
    let Some(store) = postgres().await else { return };
    let users = Users::new(store.clone());
    let name = unique_name("dup");

    users.register(&name, "password1").await.unwrap();
    let (a, b) = tokio::join!(users.register(&name, "password2"), users.add(&name, "password3", true));
    for result in [a, b] {
        assert!(matches!(result, Err(ModelError::BadRequest(ref msg)) if *msg == format!("Duplicate username: {}", name)));
    }

    let stored = users.get(&name).await.unwrap();
    assert!(!stored.is_admin);
    users.authenticate(&name, "password1").await.unwrap();

    drop_user(&store, &name).await;
}

#[tokio::test]
async fn activity_crud_round_trip() {
    let Some(store) = postgres().await else { return };
    let name = unique_name("act");
    Users::new(store.clone()).register(&name, "password1").await.unwrap();
    let activities = ActivitiesCalendar::new(store.clone());

    let created = activities
        .create(
            &name,
            NewActivity {
                activity_name: "Walk".into(),
                start_time: chrono::NaiveTime::from_hms_opt(7, 30, 0),
                start_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 14),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(created.username, name);

    let summary = activities
        .update(
            created.id,
            ActivityChanges {
                activity_description: Some("Around the park".into()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(summary.activity_description.as_deref(), Some("Around the park"));

    let listed = activities.fetch_all_by_owner(&name).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].start_time, chrono::NaiveTime::from_hms_opt(7, 30, 0));

    activities.remove(created.id).await.unwrap();
    assert!(matches!(activities.fetch_by_id(created.id).await, Err(ModelError::NotFound(_))));

    drop_user(&store, &name).await;
}

#[tokio::test]
async fn unknown_owner_is_not_found() {
    let Some(store) = postgres().await else { return };
    let journal = JournalEntries::new(store);
    let ghost = unique_name("ghost");

    let err = journal
        .create(
            &ghost,
            NewJournalEntry {
                journal_entry: "Nobody wrote this".into(),
                journal_date: chrono::NaiveDate::from_ymd_opt(2024, 1, 14).unwrap(),
                activity_name: None,
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, ModelError::NotFound(ref msg) if *msg == format!("No user: {}", ghost)));
}
