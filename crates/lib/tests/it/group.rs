use texdocs::account::AccountId;
use texdocs::group::{self, CreateGroup, GroupError, GroupId, UpdateGroup};
use texdocs::{Database, Error, Result};

use crate::helpers::*;

async fn create_group(db: &Database, owner: AccountId, name: &str, public: bool) -> GroupId {
    group::create(
        db,
        owner,
        &CreateGroup {
            name: name.to_string(),
            public,
        },
    )
    .await
    .expect("Failed to create group")
}

#[tokio::test]
async fn test_create_and_get() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;

    let id = create_group(&db, alice, "Thesis", false).await;
    assert!(group::exists(&db, id).await);

    let fetched = group::get(&db, Some(alice), id).await?.unwrap();
    assert_eq!(fetched.name, "Thesis");
    assert_eq!(fetched.owner, alice);
    assert!(!fetched.public);

    assert!(group::get(&db, Some(alice), GroupId(99)).await?.is_none());
    assert!(!group::exists(&db, GroupId(99)).await);
    Ok(())
}

#[tokio::test]
async fn test_create_requires_owner() {
    let db = test_db().await;
    let err = group::create(
        &db,
        AccountId(5),
        &CreateGroup {
            name: "Orphan".to_string(),
            public: false,
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_not_found());
}

#[tokio::test]
async fn test_get_applies_visibility() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    let root = create_admin(&db, "root").await;
    let private = create_group(&db, alice, "Private", false).await;
    let public = create_group(&db, alice, "Public", true).await;

    assert!(group::get(&db, Some(bob), private).await.unwrap_err().is_no_access());
    assert!(group::get(&db, None, private).await.unwrap_err().is_no_access());
    assert!(group::get(&db, Some(root), private).await?.is_some());
    assert!(group::get(&db, None, public).await?.is_some());

    befriend(&db, alice, bob).await;
    assert!(group::get(&db, Some(bob), private).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_legacy_get_has_no_gate() -> Result<()> {
    let db = legacy_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    let private = create_group(&db, alice, "Private", false).await;

    // Historical behaviour: any caller may read any group
    assert!(group::get(&db, Some(bob), private).await?.is_some());
    assert!(group::get(&db, None, private).await?.is_some());
    Ok(())
}

#[tokio::test]
async fn test_get_all_from_owner() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    create_group(&db, alice, "First", false).await;
    create_group(&db, bob, "Other", false).await;
    create_group(&db, alice, "Second", true).await;

    let groups = group::get_all_from_owner(&db, alice).await?;
    let summary: Vec<_> = groups.iter().map(|g| (g.name.as_str(), g.public)).collect();
    assert_eq!(summary, vec![("First", false), ("Second", true)]);
    assert!(groups.iter().all(|g| g.owner == alice));
    Ok(())
}

#[tokio::test]
async fn test_update() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    let id = create_group(&db, alice, "Draft", false).await;

    let rename = UpdateGroup {
        id,
        name: Some("Final".to_string()),
        public: None,
    };
    assert!(group::update(&db, bob, &rename).await.unwrap_err().is_no_access());
    assert!(group::update(&db, alice, &rename).await?);

    let fetched = group::get(&db, Some(alice), id).await?.unwrap();
    assert_eq!(fetched.name, "Final");
    assert!(!fetched.public);

    let nothing = UpdateGroup {
        id,
        name: None,
        public: None,
    };
    assert!(!group::update(&db, alice, &nothing).await?);

    let missing = UpdateGroup {
        id: GroupId(99),
        ..nothing
    };
    let err = group::update(&db, alice, &missing).await.unwrap_err();
    assert!(matches!(err, Error::Group(GroupError::NotExisting { .. })));
    Ok(())
}

#[tokio::test]
async fn test_remove_strict() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    let id = create_group(&db, alice, "Mine", false).await;

    assert!(group::remove(&db, bob, id).await.unwrap_err().is_no_access());
    assert!(group::exists(&db, id).await);

    assert!(group::remove(&db, alice, id).await?);
    assert!(!group::exists(&db, id).await);
    assert!(group::remove(&db, alice, id).await.unwrap_err().is_not_found());
    Ok(())
}

#[tokio::test]
async fn test_legacy_remove_has_no_gate() -> Result<()> {
    let db = legacy_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    let id = create_group(&db, alice, "Mine", false).await;

    // Historical behaviour: anyone may remove, unknown ids report no change
    assert!(group::remove(&db, bob, id).await?);
    assert!(!group::exists(&db, id).await);
    assert!(!group::remove(&db, bob, id).await?);
    Ok(())
}

#[tokio::test]
async fn test_update_that_changes_nothing_is_inconsistent() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let id = create_group(&db, alice, "Draft", false).await;

    execute_raw(
        &db,
        "CREATE TRIGGER swallow_group_update BEFORE UPDATE ON document_group \
         BEGIN SELECT RAISE(IGNORE); END",
    )
    .await;
    let publish = UpdateGroup {
        id,
        name: None,
        public: Some(true),
    };
    let err = group::update(&db, alice, &publish).await.unwrap_err();
    assert!(matches!(err, Error::InternalInconsistency { .. }));
    assert!(!group::get(&db, Some(alice), id).await?.unwrap().public);
    Ok(())
}
