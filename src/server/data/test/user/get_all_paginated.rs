use super::*;

/// Tests paginating the user list.
///
/// Verifies that the page holds at most `per_page` users while the total counts
/// every matching user.
///
/// Expected: Ok with 2 users on page 0 and total 3
#[tokio::test]
async fn paginates_users() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    for _ in 0..3 {
        factory::create_user(db).await?;
    }

    let repo = UserRepository::new(db);
    let (users, total) = repo
        .get_all_paginated(&UserFilter::default(), 0, 2)
        .await?;

    assert_eq!(users.len(), 2);
    assert_eq!(total, 3);

    let (users, _) = repo
        .get_all_paginated(&UserFilter::default(), 1, 2)
        .await?;
    assert_eq!(users.len(), 1);

    Ok(())
}

/// Tests filtering by role, active flag and search text together.
///
/// Expected: Ok with only the active owner whose username matches
#[tokio::test]
async fn filters_by_role_active_and_search() -> Result<(), DbErr> {
    let test = TestBuilder::new()
        .with_table(entity::prelude::User)
        .build()
        .await
        .unwrap();
    let db = test.db.as_ref().unwrap();

    factory::user::UserFactory::new(db)
        .username("clubhouse")
        .role("owner")
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .username("clubhouse_closed")
        .role("owner")
        .active(false)
        .build()
        .await?;
    factory::user::UserFactory::new(db)
        .username("club_player")
        .role("player")
        .build()
        .await?;

    let repo = UserRepository::new(db);
    let filter = UserFilter {
        role: Some(Role::Owner),
        is_active: Some(true),
        search: Some("club".to_string()),
    };
    let (users, total) = repo.get_all_paginated(&filter, 0, 10).await?;

    assert_eq!(total, 1);
    assert_eq!(users[0].username, "clubhouse");

    Ok(())
}
