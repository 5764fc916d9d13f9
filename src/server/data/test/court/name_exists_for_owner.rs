use super::*;

/// Tests that court names are unique per owner only.
///
/// Verifies that the same name is reported taken for its owner, free for another
/// owner, and free when the court itself is excluded during a rename.
///
/// Expected: Ok(true) only for the owning owner without exclusion
#[tokio::test]
async fn checks_name_per_owner() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_booking_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let owner = factory::create_owner(db).await?;
    let other_owner = factory::create_owner(db).await?;
    let court = factory::court::CourtFactory::new(db, owner.id)
        .name("Centre Court")
        .build()
        .await?;

    let repo = CourtRepository::new(db);

    assert!(repo.name_exists_for_owner(owner.id, "Centre Court", None).await?);
    assert!(!repo.name_exists_for_owner(other_owner.id, "Centre Court", None).await?);
    assert!(
        !repo
            .name_exists_for_owner(owner.id, "Centre Court", Some(court.id))
            .await?
    );

    Ok(())
}
