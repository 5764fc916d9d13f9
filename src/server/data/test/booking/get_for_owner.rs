use super::*;

/// Tests listing bookings across an owner's courts.
///
/// Verifies that bookings on other owners' courts are excluded, that the status
/// filter applies and that court names are attached.
///
/// Expected: Ok with the owner's bookings only
#[tokio::test]
async fn lists_bookings_on_owned_courts() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::create_owner(db).await?;
    let court = factory::court::CourtFactory::new(db, owner.id)
        .name("Owner Court")
        .build()
        .await?;
    let (_, foreign_court) = factory::create_court_with_owner(db).await?;
    let (_, player) = factory::create_player(db).await?;

    factory::booking::BookingFactory::new(db, court.id, player.id)
        .window(hour(8), hour(9))
        .build()
        .await?;
    factory::booking::BookingFactory::new(db, court.id, player.id)
        .window(hour(10), hour(11))
        .status("confirmed")
        .build()
        .await?;
    factory::create_booking(db, foreign_court.id, player.id).await?;

    let repo = BookingRepository::new(db);
    let all = repo.get_for_owner(owner.id, None, None, None).await?;
    assert_eq!(all.len(), 2);
    assert!(all.iter().all(|b| b.court_name == "Owner Court"));
    assert_eq!(all[0].booking.start_time, hour(8));

    let pending = repo
        .get_for_owner(owner.id, Some(BookingStatus::Pending), None, None)
        .await?;
    assert_eq!(pending.len(), 1);
    assert_eq!(repo.count_pending_for_owner(owner.id).await?, 1);

    Ok(())
}
