use super::*;

/// Tests finding the booking that blocks a slot.
///
/// Verifies that a partially overlapping slot reports the existing booking, that a
/// different day or court does not, and that excluding the booking itself clears it.
///
/// Expected: Ok(Some) only for the overlapping slot on the same court and day
#[tokio::test]
async fn finds_overlapping_booking() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, court) = factory::create_court_with_owner(db).await?;
    let other_court = factory::create_court(db, owner.id).await?;
    let (_, player) = factory::create_player(db).await?;
    let existing = factory::booking::BookingFactory::new(db, court.id, player.id)
        .window(hour(14), hour(16))
        .status("confirmed")
        .build()
        .await?;

    let repo = BookingRepository::new(db);
    let tomorrow = days_from_today(1);

    let conflict = repo
        .find_conflict(court.id, tomorrow, hour(15), hour(17), None)
        .await?;
    assert_eq!(conflict.map(|b| b.id), Some(existing.id));

    assert!(repo
        .find_conflict(court.id, days_from_today(2), hour(15), hour(17), None)
        .await?
        .is_none());
    assert!(repo
        .find_conflict(other_court.id, tomorrow, hour(15), hour(17), None)
        .await?
        .is_none());
    assert!(repo
        .find_conflict(court.id, tomorrow, hour(15), hour(17), Some(existing.id))
        .await?
        .is_none());

    Ok(())
}
