use super::*;

/// Tests listing proposals awaiting a player's response.
///
/// Expected: Ok with the unexpired proposal addressed to the player only
#[tokio::test]
async fn lists_unexpired_proposals_addressed_to_player() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, alice) = factory::create_player(db).await?;
    let (_, bob) = factory::create_player(db).await?;
    let (_, carol) = factory::create_player(db).await?;

    let incoming = factory::create_shared_booking(db, alice.id, bob.id, court.id).await?;
    factory::shared_booking::SharedBookingFactory::new(db, carol.id, bob.id, court.id)
        .expires_at(Utc::now() - Duration::minutes(5))
        .build()
        .await?;
    factory::create_shared_booking(db, bob.id, carol.id, court.id).await?;

    let repo = SharedBookingRepository::new(db);
    let pending = repo.get_pending_for_recipient(bob.id, Utc::now()).await?;

    assert_eq!(pending.len(), 1);
    assert_eq!(pending[0].id, incoming.id);

    let all_for_bob = repo.get_for_player(bob.id, false).await?;
    assert_eq!(all_for_bob.len(), 3);

    Ok(())
}
