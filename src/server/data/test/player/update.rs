use super::*;

/// Tests applying partial profile edits.
///
/// Verifies that set fields change, unset fields keep their value and coordinates
/// can be cleared explicitly.
///
/// Expected: Ok(Some) with the edited profile
#[tokio::test]
async fn applies_partial_edits() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_account_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let (_, player) = factory::player::PlayerFactory::new(db)
        .coordinates(32.08, 34.78)
        .build()
        .await?;

    let repo = PlayerRepository::new(db);
    let updated = repo
        .update(
            player.id,
            UpdatePlayerParam {
                skill_level: Some(SkillLevel::Advanced),
                availability: Some(Availability::Evenings),
                coordinates: Some(None),
                ..Default::default()
            },
        )
        .await?
        .unwrap();

    assert_eq!(updated.skill_level, SkillLevel::Advanced);
    assert_eq!(updated.availability, Some(Availability::Evenings));
    assert_eq!(updated.preferred_location.as_deref(), Some("Tel Aviv"));
    assert!(updated.coordinates.is_none());

    let relocated = repo
        .update(
            player.id,
            UpdatePlayerParam {
                coordinates: Some(Some(Coordinates::new(31.77, 35.21))),
                ..Default::default()
            },
        )
        .await?
        .unwrap();
    assert_eq!(relocated.coordinates, Some(Coordinates::new(31.77, 35.21)));

    Ok(())
}
