//! Admin tooling: user and court moderation, platform statistics and the bootstrap code.

pub mod code;

use sea_orm::DatabaseConnection;

use crate::server::{
    data::{
        booking::BookingRepository, court::CourtRepository,
        shared_booking::SharedBookingRepository, user::UserRepository,
    },
    error::AppError,
    model::{
        analytics::PlatformStats,
        booking::BookingStatus,
        court::Court,
        shared_booking::SharedBookingStatus,
        user::{PaginatedUsers, Role, User, UserFilter},
    },
    util::parse::{round1, round2},
};

pub const USERS_PER_PAGE: u64 = 20;

pub struct AdminService<'a> {
    db: &'a DatabaseConnection,
}

impl<'a> AdminService<'a> {
    pub fn new(db: &'a DatabaseConnection) -> Self {
        Self { db }
    }

    /// Gets a page of users matching the filter, newest first.
    ///
    /// # Arguments
    /// - `filter` - Optional role, active flag and search text
    /// - `page` - Zero-indexed page number
    /// - `per_page` - Users per page, `USERS_PER_PAGE` when zero
    pub async fn get_users(
        &self,
        filter: &UserFilter,
        page: u64,
        per_page: u64,
    ) -> Result<PaginatedUsers, AppError> {
        let per_page = if per_page == 0 { USERS_PER_PAGE } else { per_page };
        let (users, total) = UserRepository::new(self.db)
            .get_all_paginated(filter, page, per_page)
            .await?;

        Ok(PaginatedUsers {
            users,
            total,
            page,
            per_page,
            total_pages: total.div_ceil(per_page),
        })
    }

    /// Flips a user's active flag. Admins cannot deactivate themselves.
    pub async fn toggle_user(&self, admin: &User, user_id: i32) -> Result<User, AppError> {
        if admin.id == user_id {
            return Err(AppError::BadRequest(
                "Cannot deactivate your own account".to_string(),
            ));
        }

        let repo = UserRepository::new(self.db);
        let user = repo
            .find_by_id(user_id)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        let updated = repo
            .set_active(user.id, !user.is_active)
            .await?
            .ok_or_else(|| AppError::NotFound("User not found".to_string()))?;

        tracing::info!(
            "Admin {} set user {} active={}",
            admin.id,
            updated.id,
            updated.is_active
        );

        Ok(updated)
    }

    /// Flips a court's active flag.
    pub async fn toggle_court(&self, admin: &User, court_id: i32) -> Result<Court, AppError> {
        let repo = CourtRepository::new(self.db);
        let court = repo
            .find_by_id(court_id)
            .await?
            .ok_or_else(|| AppError::NotFound("Court not found".to_string()))?;

        let updated = repo
            .set_active(court.id, !court.is_active)
            .await?
            .ok_or_else(|| AppError::NotFound("Court not found".to_string()))?;

        tracing::info!(
            "Admin {} set court {} active={}",
            admin.id,
            updated.id,
            updated.is_active
        );

        Ok(updated)
    }

    /// Counts across users, courts, bookings and shared proposals.
    pub async fn platform_stats(&self) -> Result<PlatformStats, AppError> {
        let user_repo = UserRepository::new(self.db);
        let booking_repo = BookingRepository::new(self.db);
        let shared_repo = SharedBookingRepository::new(self.db);

        let (total_users, active_users) = user_repo.count_totals().await?;
        let (total_courts, active_courts) = CourtRepository::new(self.db).count_totals().await?;
        let shared_proposals = shared_repo.count_by_status(None).await?;
        let shared_confirmed = shared_repo
            .count_by_status(Some(SharedBookingStatus::Confirmed))
            .await?;

        Ok(PlatformStats {
            total_users,
            active_users,
            players: user_repo.count_by_role(Role::Player).await?,
            owners: user_repo.count_by_role(Role::Owner).await?,
            admins: user_repo.count_by_role(Role::Admin).await?,
            total_courts,
            active_courts,
            total_bookings: booking_repo.count_by_status(None).await?,
            pending_bookings: booking_repo
                .count_by_status(Some(BookingStatus::Pending))
                .await?,
            confirmed_bookings: booking_repo
                .count_by_status(Some(BookingStatus::Confirmed))
                .await?,
            total_revenue: round2(booking_repo.total_confirmed_revenue().await?),
            shared_proposals,
            shared_confirmed,
            shared_success_rate: if shared_proposals > 0 {
                round1(shared_confirmed as f64 / shared_proposals as f64 * 100.0)
            } else {
                0.0
            },
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::{builder::TestBuilder, factory};

    /// Tests toggling a user twice restores it and self-deactivation is refused.
    ///
    /// Expected: inactive then active again; BadRequest for own account
    #[tokio::test]
    async fn toggle_user_flips_active() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let admin = User::from_entity(factory::create_admin(db).await?)?;
        let user = factory::create_user(db).await?;
        let service = AdminService::new(db);

        assert!(!service.toggle_user(&admin, user.id).await?.is_active);
        assert!(service.toggle_user(&admin, user.id).await?.is_active);
        assert!(matches!(
            service.toggle_user(&admin, admin.id).await,
            Err(AppError::BadRequest(_))
        ));

        Ok(())
    }

    /// Tests user pages report totals and page counts.
    ///
    /// Expected: 5 players over pages of 2 gives 3 pages
    #[tokio::test]
    async fn get_users_paginates() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        for _ in 0..5 {
            factory::create_player(db).await?;
        }
        factory::create_owner(db).await?;

        let filter = UserFilter {
            role: Some(Role::Player),
            ..Default::default()
        };
        let page = AdminService::new(db).get_users(&filter, 2, 2).await?;

        assert_eq!(page.total, 5);
        assert_eq!(page.total_pages, 3);
        assert_eq!(page.users.len(), 1);

        Ok(())
    }

    /// Tests platform statistics count revenue from confirmed bookings only.
    ///
    /// Expected: one confirmed booking worth 80.0 of two bookings
    #[tokio::test]
    async fn platform_stats_counts_rows() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let (_, court) = factory::create_court_with_owner(db).await?;
        let (_, player) = factory::create_player(db).await?;
        factory::booking::BookingFactory::new(db, court.id, player.id)
            .status("confirmed")
            .total_cost(80.0)
            .build()
            .await?;
        factory::booking::BookingFactory::new(db, court.id, player.id)
            .window(factory::helpers::hour(14), factory::helpers::hour(15))
            .build()
            .await?;

        let stats = AdminService::new(db).platform_stats().await?;

        assert_eq!(stats.total_users, 2);
        assert_eq!(stats.players, 1);
        assert_eq!(stats.owners, 1);
        assert_eq!(stats.total_courts, 1);
        assert_eq!(stats.total_bookings, 2);
        assert_eq!(stats.confirmed_bookings, 1);
        assert_eq!(stats.total_revenue, 80.0);
        assert_eq!(stats.shared_success_rate, 0.0);

        Ok(())
    }
}
