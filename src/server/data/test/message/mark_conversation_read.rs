use super::*;

/// Tests marking a conversation read.
///
/// Verifies that only messages from others are marked, that a second call marks
/// nothing, and that read messages stay read after new messages arrive.
///
/// Expected: Ok(2) then Ok(0), with earlier messages still read
#[tokio::test]
async fn marks_once_and_never_reverts() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_chat_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::create_user(db).await?;
    let bob = factory::create_user(db).await?;
    let conversation = factory::create_direct_conversation(db, alice.id, bob.id).await?;

    let first = factory::create_message(db, conversation.id, alice.id, "hi").await?;
    factory::create_message(db, conversation.id, alice.id, "are you free?").await?;
    let own = factory::create_message(db, conversation.id, bob.id, "yes").await?;

    let repo = MessageRepository::new(db);
    assert_eq!(repo.count_unread_in(conversation.id, bob.id).await?, 2);

    let marked = repo
        .mark_conversation_read(conversation.id, bob.id, Utc::now())
        .await?;
    assert_eq!(marked, 2);
    assert!(!repo.is_read_by(own.id, bob.id).await?);

    let again = repo
        .mark_conversation_read(conversation.id, bob.id, Utc::now())
        .await?;
    assert_eq!(again, 0);

    factory::create_message(db, conversation.id, alice.id, "see you").await?;
    assert!(repo.is_read_by(first.id, bob.id).await?);
    assert_eq!(repo.count_unread_in(conversation.id, bob.id).await?, 1);

    Ok(())
}
