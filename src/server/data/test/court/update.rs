use super::*;

/// Tests updating a court and deactivating it.
///
/// Expected: Ok(Some) with the new rate, then an inactive court counted by owner
#[tokio::test]
async fn updates_and_deactivates_court() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (owner, court) = factory::create_court_with_owner(db).await?;
    let repo = CourtRepository::new(db);

    let updated = repo
        .update(
            court.id,
            UpdateCourtParam {
                hourly_rate: Some(75.0),
                has_lighting: Some(true),
                ..Default::default()
            },
        )
        .await?
        .unwrap();
    assert_eq!(updated.hourly_rate, 75.0);
    assert!(updated.has_lighting);
    assert_eq!(updated.name, court.name);

    let deactivated = repo.set_active(court.id, false).await?.unwrap();
    assert!(!deactivated.is_active);

    let (total, active) = repo.count_by_owner(owner.id).await?;
    assert_eq!((total, active), (1, 0));

    Ok(())
}
