use super::*;

/// Tests that candidates exclude the requester and inactive users.
///
/// Verifies that the candidate pool holds every other player whose user account is
/// active, each paired with its user record.
///
/// Expected: Ok with only the active other player
#[tokio::test]
async fn excludes_requester_and_inactive_users() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, requester) = factory::create_player(db).await?;
    let (active_user, active_player) = factory::create_player(db).await?;
    factory::player::PlayerFactory::new(db)
        .active(false)
        .build()
        .await?;

    let repo = PlayerRepository::new(db);
    let candidates = repo.get_active_candidates(requester.id).await?;

    assert_eq!(candidates.len(), 1);
    assert_eq!(candidates[0].player.id, active_player.id);
    assert_eq!(candidates[0].user.id, active_user.id);

    Ok(())
}
