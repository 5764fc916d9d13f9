use super::*;

/// Tests logging in by username or email.
///
/// Verifies that credentials are found by exact username and by email regardless of
/// case, and that the stored hash is returned alongside the user.
///
/// Expected: Ok(Some) for both login forms
#[tokio::test]
async fn finds_by_username_or_email() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let created = repo
        .create(user_param("carol", "carol@example.com", Role::Owner))
        .await?;

    let by_name = repo.find_credentials("carol").await?.unwrap();
    let by_email = repo.find_credentials(" CAROL@example.com ").await?.unwrap();

    assert_eq!(by_name.user.id, created.id);
    assert_eq!(by_email.user.id, created.id);
    assert_eq!(by_name.password_hash, "hash");

    Ok(())
}

/// Tests an unknown login.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_unknown_login() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::create_user(db).await?;

    let repo = UserRepository::new(db);
    assert!(repo.find_credentials("nobody").await?.is_none());

    Ok(())
}
