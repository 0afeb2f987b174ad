use texdocs::{
    Database, DatabaseConfig,
    account::{self, AccountId, CreateAccount},
    database::{self, FieldSet, SelectOptions, SqlValue, query, schema},
};

use crate::helpers::*;

#[tokio::test]
async fn test_open_creates_file_and_persists() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("texdocs.db");
    assert!(!database::exists(&path).await);

    let db = Database::open(&path).await.unwrap();
    assert!(database::exists(&path).await);
    let alice = create_account(&db, "alice", "secret1").await;
    db.close().await;

    let db = Database::open(&path).await.unwrap();
    assert!(account::exists(&db, alice).await);
    assert!(account::exists_by_name(&db, "alice").await);
    db.close().await;
}

#[tokio::test]
async fn test_open_with_config_keeps_access_checks() {
    let dir = tempfile::tempdir().unwrap();
    let config = DatabaseConfig::new(dir.path().join("legacy.db"))
        .with_access_checks(texdocs::AccessChecks::Legacy);

    let db = Database::open_with_config(&config).await.unwrap();
    assert!(!db.access_checks().is_strict());
    db.close().await;
}

#[tokio::test]
async fn test_schema_version_is_recorded() {
    let db = test_db().await;
    let row: Option<(i64,)> = db
        .get_one(
            &query::select("schema_version", &["version".into()], SelectOptions::default()),
            &[],
        )
        .await
        .unwrap();
    assert_eq!(row, Some((schema::SCHEMA_VERSION,)));
}

#[tokio::test]
async fn test_reset_clears_data_and_ids() {
    let db = test_db().await;
    create_account(&db, "alice", "secret1").await;
    create_account(&db, "bob", "secret2").await;

    db.reset().await.unwrap();
    assert!(!account::exists_by_name(&db, "alice").await);

    let carol = create_account(&db, "carol", "secret3").await;
    assert_eq!(carol, AccountId(1));
}

#[tokio::test]
async fn test_unique_violation_is_classified() {
    let db = test_db().await;
    let insert = || {
        FieldSet::new()
            .set("name", "alice")
            .set("password_hash", "h")
            .set("password_salt", "s")
            .into_insert("account")
    };

    let (statement, params) = insert();
    let first = db.post(&statement, &params).await.unwrap();
    assert_eq!(first.changes, 1);
    assert_eq!(first.last_insert_id, 1);

    let (statement, params) = insert();
    let err = db.post(&statement, &params).await.unwrap_err();
    assert!(err.is_already_exists());
    assert_eq!(err.module(), "database");
}

#[tokio::test]
async fn test_other_storage_failures_propagate() {
    let db = test_db().await;
    let statement = query::select("missing_table", &["id".into()], SelectOptions::filter("id"));
    let err = db
        .get_one::<(i64,)>(&statement, &[SqlValue::Integer(1)])
        .await
        .unwrap_err();
    assert!(!err.is_already_exists());
    assert_eq!(err.module(), "database");
}

#[tokio::test]
async fn test_get_all_empty_and_get_one_absent() {
    let db = test_db().await;
    let statement = query::select("account", &["id".into()], SelectOptions::filter("name"));

    let rows: Vec<(i64,)> = db.get_all(&statement, &["nobody".into()]).await.unwrap();
    assert!(rows.is_empty());
    let row: Option<(i64,)> = db.get_one(&statement, &["nobody".into()]).await.unwrap();
    assert!(row.is_none());
}

#[tokio::test]
async fn test_hostile_values_are_stored_verbatim() {
    let db = test_db().await;
    let name = "x');DROP";
    // Not a valid account name, so go through the request layer directly
    let (statement, params) = FieldSet::new()
        .set("name", name)
        .set("password_hash", "h")
        .set("password_salt", "s")
        .into_insert("account");
    db.post(&statement, &params).await.unwrap();

    assert!(account::exists_by_name(&db, name).await);
    let created = account::create(&db, &CreateAccount::new("alice", "secret1")).await;
    assert!(created.is_ok());
}
