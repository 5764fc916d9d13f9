use super::*;

/// Tests that a player's bookings include those where they are the partner.
///
/// Expected: Ok with booked and partnered bookings inside the date range
#[tokio::test]
async fn includes_partner_bookings_within_range() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, player) = factory::create_player(db).await?;
    let (_, partner) = factory::create_player(db).await?;

    factory::booking::BookingFactory::new(db, court.id, player.id)
        .window(hour(8), hour(9))
        .build()
        .await?;
    factory::booking::BookingFactory::new(db, court.id, partner.id)
        .partner(player.id)
        .window(hour(10), hour(11))
        .build()
        .await?;
    factory::booking::BookingFactory::new(db, court.id, player.id)
        .date(days_from_today(20))
        .build()
        .await?;

    let repo = BookingRepository::new(db);
    let in_range = repo
        .get_for_player(player.id, Some(days_from_today(0)), Some(days_from_today(7)))
        .await?;
    assert_eq!(in_range.len(), 2);
    assert!(in_range.iter().all(|b| b.booking.involves_player(player.id)));

    let all = repo.get_for_player(player.id, None, None).await?;
    assert_eq!(all.len(), 3);

    let partner_only = repo.get_for_player(partner.id, None, None).await?;
    assert_eq!(partner_only.len(), 1);

    Ok(())
}
