//! The alice/bob walkthrough: two accounts, one private document that later
//! becomes public.

use texdocs::account::{self, AccountId, CreateAccount, Credentials};
use texdocs::document::{self, CreateDocument, DocumentId, GetDocument, UpdateDocument};
use texdocs::Result;

use crate::helpers::*;

#[tokio::test]
async fn test_alice_and_bob() -> Result<()> {
    let db = test_db().await;

    let alice = account::create(&db, &CreateAccount::new("alice", "secret1")).await?;
    let bob = account::create(&db, &CreateAccount::new("bob", "secret2")).await?;
    assert_eq!(alice, AccountId(1));
    assert_eq!(bob, AccountId(2));
    assert_eq!(
        account::check_login(&db, &Credentials::new("bob", "secret2")).await?,
        Some(bob)
    );

    let doc = document::create(
        &db,
        alice,
        &CreateDocument::new(alice, "Alice's notes", "\\documentclass{article}"),
    )
    .await?;
    assert_eq!(doc, DocumentId(1));

    let get = GetDocument::new(doc).with_content();
    let err = document::get(&db, Some(bob), &get).await.unwrap_err();
    assert!(err.is_no_access());

    let own = document::get(&db, Some(alice), &get).await?.unwrap();
    assert_eq!(own.title, "Alice's notes");
    assert_eq!(own.content.as_deref(), Some("\\documentclass{article}"));

    let make_public = UpdateDocument {
        public: Some(true),
        ..UpdateDocument::new(doc)
    };
    assert!(document::update(&db, alice, &make_public).await?);

    let shared = document::get(&db, Some(bob), &get).await?.unwrap();
    assert_eq!(shared.id, doc);
    assert!(shared.public);
    Ok(())
}
