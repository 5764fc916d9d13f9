use super::*;

/// Tests detecting a pending proposal in either direction.
///
/// Expected: Ok(true) for both orderings of the pair, Ok(false) for another pair
#[tokio::test]
async fn detects_pending_in_both_directions() -> Result<(), DbErr> {
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
    factory::create_shared_booking(db, alice.id, bob.id, court.id).await?;

    let repo = SharedBookingRepository::new(db);
    assert!(repo.pending_exists_between(alice.id, bob.id).await?);
    assert!(repo.pending_exists_between(bob.id, alice.id).await?);
    assert!(!repo.pending_exists_between(alice.id, carol.id).await?);

    Ok(())
}

/// Tests that settled proposals do not block a new one.
///
/// Expected: Ok(false) when the only proposal is cancelled
#[tokio::test]
async fn ignores_settled_proposals() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, alice) = factory::create_player(db).await?;
    let (_, bob) = factory::create_player(db).await?;
    factory::shared_booking::SharedBookingFactory::new(db, alice.id, bob.id, court.id)
        .status("cancelled")
        .build()
        .await?;

    let repo = SharedBookingRepository::new(db);
    assert!(!repo.pending_exists_between(alice.id, bob.id).await?);

    Ok(())
}
