use super::*;

/// Tests counting bookings per player.
///
/// Expected: Ok with counts for players that booked and no entry for others
#[tokio::test]
async fn counts_bookings_per_player() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, busy) = factory::create_player(db).await?;
    let (_, idle) = factory::create_player(db).await?;

    for start in [8, 10, 12] {
        factory::booking::BookingFactory::new(db, court.id, busy.id)
            .window(hour(start), hour(start + 1))
            .build()
            .await?;
    }

    let repo = BookingRepository::new(db);
    let counts = repo.count_by_players(&[busy.id, idle.id]).await?;

    assert_eq!(counts.get(&busy.id), Some(&3));
    assert!(!counts.contains_key(&idle.id));
    assert!(repo.count_by_players(&[]).await?.is_empty());

    Ok(())
}
