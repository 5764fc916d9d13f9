use super::*;

/// Tests reusing the direct conversation of a pair.
///
/// Verifies that the lookup matches regardless of argument order and ignores group
/// conversations that merely include both users.
///
/// Expected: Ok(Some) with the two-person conversation
#[tokio::test]
async fn finds_exact_pair() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_chat_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::create_user(db).await?;
    let bob = factory::create_user(db).await?;
    let carol = factory::create_user(db).await?;

    factory::conversation::create_conversation(db, "direct", &[alice.id, bob.id, carol.id])
        .await?;
    let direct = factory::create_direct_conversation(db, alice.id, bob.id).await?;

    let repo = ConversationRepository::new(db);
    let found = repo.find_between(ConversationType::Direct, bob.id, alice.id).await?;

    assert_eq!(found.map(|c| c.id), Some(direct.id));
    assert!(repo
        .find_between(ConversationType::Direct, alice.id, carol.id)
        .await?
        .is_none());

    Ok(())
}

/// Tests that a support conversation and a direct one between the same pair stay apart.
///
/// Expected: each lookup returns the conversation of its own type
#[tokio::test]
async fn keeps_support_apart_from_direct() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_chat_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let player = factory::create_user(db).await?;
    let owner = factory::create_owner(db).await?;

    let direct = factory::create_direct_conversation(db, player.id, owner.id).await?;
    let repo = ConversationRepository::new(db);
    assert!(repo
        .find_between(ConversationType::Support, owner.id, player.id)
        .await?
        .is_none());

    let support =
        factory::conversation::create_conversation(db, "support", &[player.id, owner.id]).await?;

    let found_support = repo
        .find_between(ConversationType::Support, owner.id, player.id)
        .await?;
    let found_direct = repo
        .find_between(ConversationType::Direct, owner.id, player.id)
        .await?;
    assert_eq!(found_support.map(|c| c.id), Some(support.id));
    assert_eq!(found_direct.map(|c| c.id), Some(direct.id));

    Ok(())
}
