use super::*;

/// Tests inserting a booking into a free slot.
///
/// Expected: Ok(Created) with a pending booking
#[tokio::test]
async fn creates_pending_booking_in_free_slot() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, player) = factory::create_player(db).await?;

    let repo = BookingRepository::new(db);
    let result = repo
        .create_checked(booking_param(court.id, player.id, 10, 12))
        .await?;

    let BookingInsert::Created(booking) = result else {
        panic!("expected booking to be created");
    };
    assert_eq!(booking.status, BookingStatus::Pending);
    assert_eq!(booking.total_cost, 100.0);

    Ok(())
}

/// Tests that an overlapping insert is refused without writing.
///
/// Verifies that a slot overlapping a pending booking is reported as a conflict with
/// the existing booking and no second row is stored.
///
/// Expected: Ok(Conflict) naming the existing booking
#[tokio::test]
async fn refuses_overlapping_slot() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, player) = factory::create_player(db).await?;
    let (_, other) = factory::create_player(db).await?;

    let repo = BookingRepository::new(db);
    let BookingInsert::Created(first) = repo
        .create_checked(booking_param(court.id, player.id, 10, 12))
        .await?
    else {
        panic!("expected first booking to be created");
    };

    let second = repo
        .create_checked(booking_param(court.id, other.id, 11, 13))
        .await?;

    assert_eq!(second, BookingInsert::Conflict(first));
    assert_eq!(repo.count_by_status(None).await?, 1);

    Ok(())
}

/// Tests that adjacent slots do not conflict.
///
/// A booking ending at 12:00 and one starting at 12:00 share only the boundary.
///
/// Expected: Ok(Created) for both
#[tokio::test]
async fn allows_adjacent_slots() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, player) = factory::create_player(db).await?;

    let repo = BookingRepository::new(db);
    let first = repo
        .create_checked(booking_param(court.id, player.id, 10, 12))
        .await?;
    let second = repo
        .create_checked(booking_param(court.id, player.id, 12, 13))
        .await?;

    assert!(matches!(first, BookingInsert::Created(_)));
    assert!(matches!(second, BookingInsert::Created(_)));

    Ok(())
}

/// Tests that cancelled bookings free their slot.
///
/// Expected: Ok(Created) over a cancelled booking
#[tokio::test]
async fn ignores_cancelled_bookings() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, player) = factory::create_player(db).await?;
    factory::booking::BookingFactory::new(db, court.id, player.id)
        .window(hour(10), hour(12))
        .status("cancelled")
        .build()
        .await?;

    let repo = BookingRepository::new(db);
    let result = repo
        .create_checked(booking_param(court.id, player.id, 10, 12))
        .await?;

    assert!(matches!(result, BookingInsert::Created(_)));

    Ok(())
}

/// Tests that confirmed bookings on a court never intersect.
///
/// Attempts every one-hour and two-hour slot of the day, confirms whatever was
/// created, then checks all confirmed pairs pairwise.
///
/// Expected: no two confirmed bookings overlap
#[tokio::test]
async fn confirmed_bookings_never_overlap() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, court) = factory::create_court_with_owner(db).await?;
    let (_, player) = factory::create_player(db).await?;

    let repo = BookingRepository::new(db);
    for start in 6..21 {
        for length in [2, 1] {
            if start + length > 22 {
                continue;
            }
            if let BookingInsert::Created(booking) = repo
                .create_checked(booking_param(court.id, player.id, start, start + length))
                .await?
            {
                repo.update_status(
                    booking.id,
                    &[BookingStatus::Pending],
                    BookingStatus::Confirmed,
                    None,
                )
                .await?;
            }
        }
    }

    let confirmed = repo
        .get_blocking_for_court(court.id, days_from_today(1))
        .await?;
    assert!(!confirmed.is_empty());
    for (i, a) in confirmed.iter().enumerate() {
        assert_eq!(a.status, BookingStatus::Confirmed);
        for b in confirmed.iter().skip(i + 1) {
            assert!(
                !(a.start_time < b.end_time && b.start_time < a.end_time),
                "bookings {} and {} overlap",
                a.id,
                b.id
            );
        }
    }

    Ok(())
}
