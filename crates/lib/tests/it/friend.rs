use texdocs::account::{AccountError, AccountId};
use texdocs::friend::{self, CreateFriend, CreateFriendByName, FriendError, FriendId, FriendPair};
use texdocs::{Error, Result};

use crate::helpers::*;

#[tokio::test]
async fn test_create_and_get() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;

    let input = CreateFriend {
        account_id: alice,
        friend_account_id: bob,
    };
    let id = friend::create(&db, alice, input).await?;
    assert!(friend::exists(&db, id).await);

    let edge = friend::get(&db, id).await?.unwrap();
    assert_eq!(edge.account_id, alice);
    assert_eq!(edge.friend_account_id, bob);
    assert!(friend::get(&db, FriendId(99)).await?.is_none());
    Ok(())
}

#[tokio::test]
async fn test_edges_are_directed() {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    befriend(&db, alice, bob).await;

    let forward = FriendPair {
        account: alice,
        friend: bob,
    };
    let backward = FriendPair {
        account: bob,
        friend: alice,
    };
    assert!(friend::exists_account_and_friend_account(&db, forward).await);
    assert!(!friend::exists_account_and_friend_account(&db, backward).await);
}

#[tokio::test]
async fn test_create_requires_existing_accounts() {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;

    let err = friend::create(
        &db,
        alice,
        CreateFriend {
            account_id: alice,
            friend_account_id: AccountId(42),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(
        err,
        Error::Friend(FriendError::AccountNotExisting { id }) if id == AccountId(42)
    ));
}

#[tokio::test]
async fn test_create_requires_direct_access() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    let root = create_admin(&db, "root").await;

    let input = CreateFriend {
        account_id: alice,
        friend_account_id: bob,
    };
    // Bob cannot make himself a friend of alice
    assert!(friend::create(&db, bob, input).await.unwrap_err().is_no_access());
    friend::create(&db, root, input).await?;
    Ok(())
}

#[tokio::test]
async fn test_duplicate_edge_fails() {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    befriend(&db, alice, bob).await;

    let err = friend::create(
        &db,
        alice,
        CreateFriend {
            account_id: alice,
            friend_account_id: bob,
        },
    )
    .await
    .unwrap_err();
    assert!(err.is_already_exists());
    assert!(matches!(err, Error::Friend(FriendError::AlreadyExists { .. })));
}

#[tokio::test]
async fn test_create_by_name() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;

    let id = friend::create_by_name(
        &db,
        alice,
        &CreateFriendByName {
            account_id: alice,
            friend_account_name: "bob".to_string(),
        },
    )
    .await?;
    assert_eq!(friend::get(&db, id).await?.unwrap().friend_account_id, bob);

    let err = friend::create_by_name(
        &db,
        alice,
        &CreateFriendByName {
            account_id: alice,
            friend_account_name: "nobody".to_string(),
        },
    )
    .await
    .unwrap_err();
    assert!(matches!(err, Error::Account(AccountError::NameNotExisting { .. })));
    Ok(())
}

#[tokio::test]
async fn test_get_all_from_account() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    let carol = create_account(&db, "carol", "secret3").await;
    befriend(&db, alice, bob).await;
    befriend(&db, alice, carol).await;
    befriend(&db, bob, alice).await;

    let friends: Vec<_> = friend::get_all_from_account(&db, alice)
        .await?
        .into_iter()
        .map(|edge| edge.friend_account_id)
        .collect();
    assert_eq!(friends, vec![bob, carol]);
    assert!(friend::get_all_from_account(&db, carol).await?.is_empty());
    Ok(())
}

#[tokio::test]
async fn test_remove() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    let id = friend::create(
        &db,
        alice,
        CreateFriend {
            account_id: alice,
            friend_account_id: bob,
        },
    )
    .await?;

    // The friend side does not own the edge
    assert!(friend::remove(&db, bob, id).await.unwrap_err().is_no_access());
    assert!(friend::remove(&db, alice, id).await?);
    assert!(!friend::exists(&db, id).await);

    let err = friend::remove(&db, alice, id).await.unwrap_err();
    assert!(matches!(err, Error::Friend(FriendError::NotExisting { .. })));
    Ok(())
}

#[tokio::test]
async fn test_removing_edge_revokes_visibility() -> Result<()> {
    let db = test_db().await;
    let alice = create_account(&db, "alice", "secret1").await;
    let bob = create_account(&db, "bob", "secret2").await;
    let doc = create_document(&db, alice, "Private").await;
    let get = texdocs::document::GetDocument::new(doc);

    let id = friend::create(
        &db,
        alice,
        CreateFriend {
            account_id: alice,
            friend_account_id: bob,
        },
    )
    .await?;
    assert!(texdocs::document::get(&db, Some(bob), &get).await?.is_some());

    friend::remove(&db, alice, id).await?;
    let err = texdocs::document::get(&db, Some(bob), &get).await.unwrap_err();
    assert!(err.is_no_access());
    Ok(())
}
