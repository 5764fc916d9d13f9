use super::*;

/// Tests storing a message bumps the conversation.
///
/// Expected: Ok with the stored message and a later conversation `updated_at`
#[tokio::test]
async fn stores_message_and_touches_conversation() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_chat_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::create_user(db).await?;
    let bob = factory::create_user(db).await?;
    let conversation = factory::create_direct_conversation(db, alice.id, bob.id).await?;

    let repo = MessageRepository::new(db);
    let message = repo
        .create(CreateMessageParam {
            conversation_id: conversation.id,
            sender_id: alice.id,
            content: "Game on Sunday?".to_string(),
            message_type: MessageType::Text,
            reply_to_message_id: None,
            related_booking_id: None,
        })
        .await?;

    assert_eq!(message.content, "Game on Sunday?");
    assert_eq!(repo.get_last(conversation.id).await?.map(|m| m.id), Some(message.id));

    let stored = crate::server::data::conversation::ConversationRepository::new(db)
        .find_by_id(conversation.id)
        .await?
        .unwrap();
    assert!(stored.updated_at >= conversation.updated_at);

    assert_eq!(
        repo.count_sent_since(alice.id, Utc::now() - Duration::hours(1))
            .await?,
        1
    );

    Ok(())
}
