use super::*;

/// Tests the recipient directory a user searches when starting a conversation.
///
/// Verifies that the searching user and deactivated accounts are left out, that the
/// search matches full names, and that the role filter and limit apply.
///
/// Expected: Ok with active users in full name order
#[tokio::test]
async fn lists_active_users_except_self() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    let me = factory::user::UserFactory::new(db).full_name("Ada Me").build().await?;
    let zoe = factory::user::UserFactory::new(db).full_name("Zoe Server").build().await?;
    let ben = factory::user::UserFactory::new(db)
        .full_name("Ben Baseline")
        .role("owner")
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .full_name("Carl Gone")
        .active(false)
        .build()
        .await?;

    let repo = UserRepository::new(db);

    let all = repo.get_messaging_directory(me.id, None, None, 20).await?;
    let ids: Vec<i32> = all.iter().map(|u| u.id).collect();
    assert_eq!(ids, vec![ben.id, zoe.id]);

    let searched = repo
        .get_messaging_directory(me.id, None, Some("server"), 20)
        .await?;
    assert_eq!(searched.len(), 1);
    assert_eq!(searched[0].id, zoe.id);

    let owners = repo
        .get_messaging_directory(me.id, Some(Role::Owner), None, 20)
        .await?;
    assert_eq!(owners.len(), 1);
    assert_eq!(owners[0].id, ben.id);

    let limited = repo.get_messaging_directory(me.id, None, None, 1).await?;
    assert_eq!(limited.len(), 1);

    Ok(())
}
