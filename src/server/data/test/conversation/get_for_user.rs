use super::*;
use chrono::{Duration, Utc};

/// Tests that a user's conversations are listed most recently updated first.
///
/// Expected: Ok with the touched conversation first and no foreign conversations
#[tokio::test]
async fn orders_by_most_recent_update() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_chat_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::create_user(db).await?;
    let bob = factory::create_user(db).await?;
    let carol = factory::create_user(db).await?;

    let older = factory::create_direct_conversation(db, alice.id, bob.id).await?;
    let newer = factory::create_direct_conversation(db, alice.id, carol.id).await?;
    factory::create_direct_conversation(db, bob.id, carol.id).await?;

    let repo = ConversationRepository::new(db);
    repo.touch(older.id, Utc::now() + Duration::minutes(5)).await?;

    let conversations = repo.get_for_user(alice.id).await?;
    let ids: Vec<i32> = conversations.iter().map(|c| c.id).collect();

    assert_eq!(ids, vec![older.id, newer.id]);
    assert_eq!(repo.get_all().await?.len(), 3);

    Ok(())
}
