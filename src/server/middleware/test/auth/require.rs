use super::*;

/// Tests a user with the listed role passes the guard.
///
/// Expected: Ok(User) for an admin requiring Admin
#[tokio::test]
async fn grants_access_with_matching_role() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::create_admin(db).await?;
    AuthSession::new(session).set_user_id(admin.id).await?;

    let user = AuthGuard::new(db, session)
        .require(&[Permission::Admin])
        .await?;

    assert_eq!(user.id, admin.id);

    Ok(())
}

/// Tests admins do not inherit owner access.
///
/// Expected: Err(AuthError::AccessDenied) mentioning the owner role
#[tokio::test]
async fn denies_admin_on_owner_route() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let admin = factory::create_admin(db).await?;
    AuthSession::new(session).set_user_id(admin.id).await?;

    let result = AuthGuard::new(db, session)
        .require(&[Permission::Owner])
        .await;

    match result {
        Err(AppError::AuthErr(AuthError::AccessDenied(user_id, message))) => {
            assert_eq!(user_id, admin.id);
            assert!(message.contains("owner"));
        }
        other => panic!("Expected AccessDenied error, got: {:?}", other),
    }

    Ok(())
}

/// Tests unauthenticated requests are refused.
///
/// Expected: Err(AuthError::UserNotInSession)
#[tokio::test]
async fn denies_access_when_not_authenticated() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInSession))
    ));

    Ok(())
}

/// Tests a session pointing at a missing user is refused.
///
/// Expected: Err(AuthError::UserNotInDatabase)
#[tokio::test]
async fn denies_access_when_user_missing() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    AuthSession::new(session).set_user_id(404).await?;

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInDatabase(404)))
    ));

    Ok(())
}

/// Tests deactivated users are refused even without permissions.
///
/// Expected: Err(AuthError::AccountDisabled)
#[tokio::test]
async fn denies_deactivated_user() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::user::UserFactory::new(db)
        .active(false)
        .build()
        .await?;
    AuthSession::new(session).set_user_id(user.id).await?;

    let result = AuthGuard::new(db, session).require(&[]).await;

    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::AccountDisabled(id))) if id == user.id
    ));

    Ok(())
}

/// Tests clearing the session logs the user out.
///
/// Expected: Err(AuthError::UserNotInSession) after clear
#[tokio::test]
async fn clear_logs_out() -> Result<(), AppError> {
    let mut test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let (db, session) = test.db_and_session().await.unwrap();

    let user = factory::create_user(db).await?;
    let auth_session = AuthSession::new(session);
    auth_session.set_user_id(user.id).await?;
    assert!(auth_session.is_authenticated().await?);

    auth_session.clear().await?;

    let result = AuthGuard::new(db, session).require(&[]).await;
    assert!(matches!(
        result,
        Err(AppError::AuthErr(AuthError::UserNotInSession))
    ));

    Ok(())
}
