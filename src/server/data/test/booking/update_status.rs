use super::*;

/// Tests rejecting a booking with a reason.
///
/// Expected: Ok(Some) with rejected status and stored reason
#[tokio::test]
async fn rejects_with_reason() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, player) = factory::create_player(db).await?;
    let booking = factory::create_booking(db, court.id, player.id).await?;

    let repo = BookingRepository::new(db);
    let rejected = repo
        .update_status(
            booking.id,
            &[BookingStatus::Pending],
            BookingStatus::Rejected,
            Some("Court maintenance".to_string()),
        )
        .await?
        .unwrap();

    assert_eq!(rejected.status, BookingStatus::Rejected);
    assert_eq!(rejected.rejection_reason.as_deref(), Some("Court maintenance"));
    assert!(rejected.cancellation_reason.is_none());

    Ok(())
}

/// Tests updating a booking that does not exist.
///
/// Expected: Ok(None)
#[tokio::test]
async fn returns_none_for_missing_booking() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let repo = BookingRepository::new(db);
    let result = repo
        .update_status(42, &[BookingStatus::Pending], BookingStatus::Confirmed, None)
        .await?;

    assert!(result.is_none());

    Ok(())
}

/// Tests that a decided booking is not moved again.
///
/// The first approval wins; a later rejection expecting a pending booking updates nothing.
///
/// Expected: Ok(None) and the booking stays confirmed without a rejection reason
#[tokio::test]
async fn skips_booking_no_longer_in_expected_status() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, player) = factory::create_player(db).await?;
    let booking = factory::create_booking(db, court.id, player.id).await?;

    let repo = BookingRepository::new(db);
    let approved = repo
        .update_status(booking.id, &[BookingStatus::Pending], BookingStatus::Confirmed, None)
        .await?;
    assert!(approved.is_some());

    let rejected = repo
        .update_status(
            booking.id,
            &[BookingStatus::Pending],
            BookingStatus::Rejected,
            Some("Too late".to_string()),
        )
        .await?;
    assert!(rejected.is_none());

    let stored = repo.find_by_id(booking.id).await?.unwrap();
    assert_eq!(stored.status, BookingStatus::Confirmed);
    assert!(stored.rejection_reason.is_none());

    Ok(())
}
