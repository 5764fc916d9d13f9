use super::*;

/// Tests expiring overdue proposals.
///
/// Verifies that only pending proposals past their deadline are expired; accepted
/// proposals and those still within the window keep their status.
///
/// Expected: Ok(1)
#[tokio::test]
async fn expires_only_overdue_pending_proposals() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, alice) = factory::create_player(db).await?;
    let (_, bob) = factory::create_player(db).await?;
    let past = Utc::now() - Duration::hours(1);

    let overdue = factory::shared_booking::SharedBookingFactory::new(db, alice.id, bob.id, court.id)
        .expires_at(past)
        .build()
        .await?;
    let accepted = factory::shared_booking::SharedBookingFactory::new(db, alice.id, bob.id, court.id)
        .status("accepted")
        .expires_at(past)
        .build()
        .await?;
    let fresh = factory::create_shared_booking(db, bob.id, alice.id, court.id).await?;

    let repo = SharedBookingRepository::new(db);
    let expired = repo.expire_overdue(Utc::now()).await?;

    assert_eq!(expired, 1);
    let find_status = |id: i32| repo.find_by_id(id);
    assert_eq!(
        find_status(overdue.id).await?.map(|s| s.status),
        Some(SharedBookingStatus::Expired)
    );
    assert_eq!(
        find_status(accepted.id).await?.map(|s| s.status),
        Some(SharedBookingStatus::Accepted)
    );
    assert_eq!(
        find_status(fresh.id).await?.map(|s| s.status),
        Some(SharedBookingStatus::Proposed)
    );

    Ok(())
}
