use super::*;

/// Tests searching with every column filter set.
///
/// Verifies that location text, price ceiling, court type and surface narrow the
/// result and that inactive courts are hidden when `active_only` is set.
///
/// Expected: Ok with the single matching court
#[tokio::test]
async fn applies_all_filters() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::create_owner(db).await?;
    let wanted = factory::court::CourtFactory::new(db, owner.id)
        .location("Haifa Port")
        .court_type("indoor")
        .surface("clay")
        .hourly_rate(40.0)
        .build()
        .await?;
    factory::court::CourtFactory::new(db, owner.id)
        .location("Haifa Port")
        .court_type("indoor")
        .surface("clay")
        .hourly_rate(90.0)
        .build()
        .await?;
    factory::court::CourtFactory::new(db, owner.id)
        .location("Haifa Port")
        .court_type("indoor")
        .surface("clay")
        .hourly_rate(30.0)
        .active(false)
        .build()
        .await?;
    factory::court::CourtFactory::new(db, owner.id)
        .location("Eilat Marina")
        .court_type("indoor")
        .surface("clay")
        .hourly_rate(40.0)
        .build()
        .await?;

    let repo = CourtRepository::new(db);
    let filter = CourtFilter {
        location: Some("Haifa".to_string()),
        max_price: Some(50.0),
        court_type: Some(CourtType::Indoor),
        surface: Some(Surface::Clay),
    };
    let courts = repo.search(&filter, true).await?;

    assert_eq!(courts.len(), 1);
    assert_eq!(courts[0].id, wanted.id);

    let with_inactive = repo.search(&filter, false).await?;
    assert_eq!(with_inactive.len(), 2);

    Ok(())
}

/// Tests that results are ordered by hourly rate.
///
/// Expected: Ok with cheapest court first
#[tokio::test]
async fn orders_by_hourly_rate() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::create_owner(db).await?;
    factory::court::CourtFactory::new(db, owner.id)
        .hourly_rate(80.0)
        .build()
        .await?;
    factory::court::CourtFactory::new(db, owner.id)
        .hourly_rate(20.0)
        .build()
        .await?;

    let repo = CourtRepository::new(db);
    let courts = repo.search(&CourtFilter::default(), true).await?;

    assert_eq!(courts.len(), 2);
    assert_eq!(courts[0].hourly_rate, 20.0);

    Ok(())
}
