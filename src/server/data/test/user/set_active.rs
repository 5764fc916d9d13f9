use super::*;

/// Tests deactivating and reactivating a user.
///
/// Expected: Ok(Some) reflecting each new state
#[tokio::test]
async fn toggles_active_flag() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let user = factory::create_user(db).await?;
    let repo = UserRepository::new(db);

    let deactivated = repo.set_active(user.id, false).await?.unwrap();
    assert!(!deactivated.is_active);

    let (total, active) = repo.count_totals().await?;
    assert_eq!((total, active), (1, 0));

    let reactivated = repo.set_active(user.id, true).await?.unwrap();
    assert!(reactivated.is_active);

    Ok(())
}

/// Tests toggling a user that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_user() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = UserRepository::new(db);
    assert!(repo.set_active(999, false).await?.is_none());

    Ok(())
}
