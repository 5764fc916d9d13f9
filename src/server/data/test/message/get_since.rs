use super::*;

/// Tests polling for messages after the last seen ID.
///
/// Expected: Ok with only newer messages in ascending ID order
#[tokio::test]
async fn returns_newer_messages_ascending() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_chat_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::create_user(db).await?;
    let bob = factory::create_user(db).await?;
    let conversation = factory::create_direct_conversation(db, alice.id, bob.id).await?;

    let first = factory::create_message(db, conversation.id, alice.id, "one").await?;
    let second = factory::create_message(db, conversation.id, bob.id, "two").await?;
    let third = factory::create_message(db, conversation.id, alice.id, "three").await?;

    let repo = MessageRepository::new(db);
    let messages = repo.get_since(conversation.id, first.id).await?;
    let ids: Vec<i32> = messages.iter().map(|m| m.id).collect();

    assert_eq!(ids, vec![second.id, third.id]);
    assert!(repo.get_since(conversation.id, third.id).await?.is_empty());

    Ok(())
}
