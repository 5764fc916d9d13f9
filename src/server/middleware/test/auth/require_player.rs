use super::*;

/// Tests a player session yields the player profile.
///
/// Expected: Ok((User, Player)) with matching IDs
#[tokio::test]
async fn returns_player_profile() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let (user, player) = factory::create_player(db).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let (guarded_user, guarded_player) = AuthGuard::new(db, session).require_player().await?;

    assert_eq!(guarded_user.id, user.id);
    assert_eq!(guarded_player.id, player.id);

    Ok(())
}

/// Tests owners are refused on player routes.
///
/// Expected: Err(AuthError::AccessDenied)
#[tokio::test]
async fn denies_owner() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let owner = factory::create_owner(db).await?;
    AuthSession::new(session).set_user_id(owner.id).await?;

    let result = AuthGuard::new(db, session).require_player().await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccessDenied(_, _)))
    ));

    Ok(())
}

/// Tests a player account without a profile row is refused.
///
/// Expected: Err(AuthError::PlayerProfileMissing)
#[tokio::test]
async fn denies_player_without_profile() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session).require_player().await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::PlayerProfileMissing(id))) if id == user.id
    ));

    Ok(())
}
