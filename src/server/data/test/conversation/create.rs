use super::*;

/// Tests creating a conversation with its participants.
///
/// Expected: Ok with every listed user an active participant
#[tokio::test]
async fn creates_conversation_with_participants() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_chat_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::create_user(db).await?;
    let bob = factory::create_user(db).await?;
    let outsider = factory::create_user(db).await?;

    let repo = ConversationRepository::new(db);
    let conversation = repo
        .create(ConversationType::Direct, None, &[alice.id, bob.id])
        .await?;

    assert_eq!(conversation.conversation_type, ConversationType::Direct);
    assert!(repo.is_participant(conversation.id, alice.id).await?);
    assert!(repo.is_participant(conversation.id, bob.id).await?);
    assert!(!repo.is_participant(conversation.id, outsider.id).await?);

    let participants = repo.get_participants(&[conversation.id]).await?;
    assert_eq!(participants.get(&conversation.id).map(Vec::len), Some(2));

    Ok(())
}
