use super::*;

/// Tests creating a user stores the email lowercased.
///
/// Verifies that the repository creates an active user with the given role and
/// normalises the email so later lookups are case-insensitive.
///
/// Expected: Ok with active user and lowercased email
#[tokio::test]
async fn creates_active_user_with_lowercased_email() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let user = repo
        .create(user_param("alice", "Alice@Example.COM", Role::Player))
        .await?;

    assert_eq!(user.username, "alice");
    assert_eq!(user.email, "alice@example.com");
    assert_eq!(user.role, Role::Player);
    assert!(user.is_active);

    Ok(())
}

/// Tests that usernames are unique.
///
/// Expected: Err from the unique constraint
#[tokio::test]
async fn rejects_duplicate_username() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    repo.create(user_param("bob", "bob@example.com", Role::Player))
        .await?;
    let result = repo
        .create(user_param("bob", "other@example.com", Role::Owner))
        .await;

    assert!(result.is_err());
    assert!(repo.username_exists("bob").await?);
    assert!(repo.email_exists("BOB@example.com").await?);

    Ok(())
}

/// Tests that a failed profile insert leaves no user behind.
///
/// The player table is missing, so the profile insert fails after the user row was
/// written inside the same transaction.
///
/// Expected: Err, and the username is still free
#[tokio::test]
async fn profile_failure_rolls_back_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let result = repo
        .create_account(
            user_param("carol", "carol@example.com", Role::Player),
            NewProfile::Player {
                skill_level: SkillLevel::Beginner,
                preferred_location: None,
                availability: None,
                coordinates: None,
            },
            async { true },
        )
        .await;

    assert!(result.is_err());
    assert!(!repo.username_exists("carol").await?);

    Ok(())
}

/// Tests account creation with its owner profile and a refused claim.
///
/// Expected: profile committed when the claim holds; nothing stored when it fails
#[tokio::test]
async fn create_account_honours_claim() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    let account = repo
        .create_account(
            user_param("dan", "dan@example.com", Role::Owner),
            NewProfile::Owner {
                business_name: Some("Baseline Club".to_string()),
            },
            async { true },
        )
        .await?
        .unwrap();
    assert_eq!(account.user.role, Role::Owner);
    assert_eq!(
        account.owner.and_then(|o| o.business_name).as_deref(),
        Some("Baseline Club")
    );

    let refused = repo
        .create_account(
            user_param("erin", "erin@example.com", Role::Admin),
            NewProfile::None,
            async { false },
        )
        .await?;
    assert!(refused.is_none());
    assert!(!repo.username_exists("erin").await?);

    Ok(())
}
