use super::*;

/// Tests paging history from the newest message.
///
/// Verifies that page 0 holds the newest messages and each page is returned in
/// ascending order for display.
///
/// Expected: Ok with [4, 5] on page 0 and [2, 3] on page 1
#[tokio::test]
async fn pages_newest_first_in_ascending_order() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_chat_tables()
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let alice = factory::create_user(db).await?;
    let bob = factory::create_user(db).await?;
    let conversation = factory::create_direct_conversation(db, alice.id, bob.id).await?;

    let mut ids = Vec::new();
    for i in 1..=5 {
        let message =
            factory::create_message(db, conversation.id, alice.id, &format!("message {i}")).await?;
        ids.push(message.id);
    }

    let repo = MessageRepository::new(db);
    let newest: Vec<i32> = repo
        .get_page(conversation.id, 0, 2)
        .await?
        .iter()
        .map(|m| m.id)
        .collect();
    let older: Vec<i32> = repo
        .get_page(conversation.id, 1, 2)
        .await?
        .iter()
        .map(|m| m.id)
        .collect();

    assert_eq!(newest, vec![ids[3], ids[4]]);
    assert_eq!(older, vec![ids[1], ids[2]]);

    Ok(())
}
