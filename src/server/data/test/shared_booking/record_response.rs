use super::*;

/// Tests storing a counter-proposal.
///
/// Verifies that the alternative slot and notes are stored and read back as a
/// complete `AlternativeSlot`.
///
/// Expected: Ok(Some) in counter_proposed status with the alternative set
#[tokio::test]
async fn stores_counter_proposal() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, alice) = factory::create_player(db).await?;
    let (_, bob) = factory::create_player(db).await?;
    let proposal = factory::create_shared_booking(db, alice.id, bob.id, court.id).await?;

    let alternative = AlternativeSlot {
        court_id: court.id,
        date: days_from_today(3),
        start_time: hour(17),
        end_time: hour(18),
    };

    let repo = SharedBookingRepository::new(db);
    let updated = repo
        .record_response(
            proposal.id,
            SharedBookingStatus::CounterProposed,
            Some("Evening works better".to_string()),
            Some(alternative.clone()),
        )
        .await?
        .unwrap();

    assert_eq!(updated.status, SharedBookingStatus::CounterProposed);
    assert_eq!(updated.alternative, Some(alternative.clone()));
    assert_eq!(updated.partner_notes.as_deref(), Some("Evening works better"));

    let booking = factory::create_booking(db, court.id, alice.id).await?;
    let adopted = repo
        .mark_confirmed(proposal.id, booking.id, Some((&alternative, 60.0)))
        .await?
        .unwrap();
    assert_eq!(adopted.status, SharedBookingStatus::Confirmed);
    assert_eq!(adopted.final_booking_id, Some(booking.id));
    assert_eq!(adopted.start_time, hour(17));
    assert_eq!(adopted.player1_share, 30.0);

    Ok(())
}
