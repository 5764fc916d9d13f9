use super::*;

/// Tests counting unread messages across conversations.
///
/// Verifies that messages in conversations the user is not part of and the user's
/// own messages are not counted.
///
/// Expected: Ok with one unread message per conversation the user is in
#[tokio::test]
async fn counts_across_own_conversations() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_chat_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::create_user(db).await?;
    let bob = factory::create_user(db).await?;
    let carol = factory::create_user(db).await?;

    let with_bob = factory::create_direct_conversation(db, alice.id, bob.id).await?;
    let with_carol = factory::create_direct_conversation(db, alice.id, carol.id).await?;
    let without_alice = factory::create_direct_conversation(db, bob.id, carol.id).await?;

    factory::create_message(db, with_bob.id, bob.id, "hello").await?;
    factory::create_message(db, with_bob.id, alice.id, "hey").await?;
    factory::create_message(db, with_carol.id, carol.id, "match tomorrow?").await?;
    factory::create_message(db, without_alice.id, bob.id, "private").await?;

    let repo = MessageRepository::new(db);
    assert_eq!(repo.count_unread(alice.id).await?, 2);

    repo.mark_conversation_read(with_bob.id, alice.id, Utc::now())
        .await?;
    assert_eq!(repo.count_unread(alice.id).await?, 1);

    Ok(())
}
