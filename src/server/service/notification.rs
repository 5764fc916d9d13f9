//! Booking lifecycle notifications.
//!
//! Notifications are posted as `notification` messages into the direct conversation
//! between the acting user and the recipient, and booking status changes are emailed to
//! the player. Every failure is logged and swallowed so the triggering request succeeds.

use sea_orm::DatabaseConnection;

use crate::server::{
    data::{player::PlayerRepository, user::UserRepository},
    error::AppError,
    model::{booking::Booking, court::Court, shared_booking::SharedBooking, user::User},
    service::{
        chat::ChatService,
        email::{booking_status_text, EmailService},
    },
    util::parse::{format_date, format_time},
};

pub struct NotificationService<'a> {
    db: &'a DatabaseConnection,
    email: &'a EmailService,
}

impl<'a> NotificationService<'a> {
    pub fn new(db: &'a DatabaseConnection, email: &'a EmailService) -> Self {
        Self { db, email }
    }

    /// Tells the court owner about a new booking request.
    pub async fn booking_requested(&self, actor_user_id: i32, booking: &Booking, court: &Court) {
        let content = format!(
            "New booking request for {} on {} from {} to {}.",
            court.name,
            format_date(booking.booking_date),
            format_time(booking.start_time),
            format_time(booking.end_time)
        );

        self.post(actor_user_id, court.owner_id, content, Some(booking.id))
            .await;
    }

    /// Tells the booking players about an approval, rejection or cancellation.
    ///
    /// The booking player and, for two-player bookings, the partner are notified and
    /// emailed unless they made the change themselves. When the booking player cancelled
    /// their own booking the court owner is told instead.
    pub async fn booking_status_changed(&self, actor_user_id: i32, booking: &Booking, court: &Court) {
        let content = booking_status_text(&court.name, booking);

        let Some(player_user) = self.booking_user(booking.player_id, booking.id).await else {
            return;
        };

        if actor_user_id == player_user.id {
            self.post(actor_user_id, court.owner_id, content.clone(), Some(booking.id))
                .await;
        } else {
            self.post(actor_user_id, player_user.id, content.clone(), Some(booking.id))
                .await;
            self.email
                .send_booking_status(&player_user, &court.name, booking)
                .await;
        }

        let Some(partner_player_id) = booking.partner_player_id else {
            return;
        };
        let Some(partner_user) = self.booking_user(partner_player_id, booking.id).await else {
            return;
        };
        if partner_user.id == actor_user_id {
            return;
        }

        self.post(actor_user_id, partner_user.id, content, Some(booking.id))
            .await;
        self.email
            .send_booking_status(&partner_user, &court.name, booking)
            .await;
    }

    /// Tells the invited partner about a shared booking proposal.
    pub async fn proposal_received(&self, actor_user_id: i32, proposal: &SharedBooking, court: &Court) {
        let recipient = match self.player_user(proposal.player2_id).await {
            Ok(Some(user)) => user,
            _ => return,
        };

        let content = format!(
            "You have a new shared booking proposal at {} on {} from {} to {}. Your share is {:.2}.",
            court.name,
            format_date(proposal.booking_date),
            format_time(proposal.start_time),
            format_time(proposal.end_time),
            proposal.player2_share
        );

        self.post(actor_user_id, recipient.id, content, None).await;
    }

    async fn booking_user(&self, player_id: i32, booking_id: i32) -> Option<User> {
        match self.player_user(player_id).await {
            Ok(Some(user)) => Some(user),
            Ok(None) => {
                tracing::warn!("Booking {} has no user for player {}", booking_id, player_id);
                None
            }
            Err(e) => {
                tracing::warn!("Failed to load player {} for booking {}: {}", player_id, booking_id, e);
                None
            }
        }
    }

    async fn post(&self, sender_id: i32, recipient_id: i32, content: String, booking_id: Option<i32>) {
        if sender_id == recipient_id {
            return;
        }

        if let Err(e) = ChatService::new(self.db)
            .post_notification(sender_id, recipient_id, content, booking_id)
            .await
        {
            tracing::warn!(
                "Failed to notify user {} from user {}: {}",
                recipient_id,
                sender_id,
                e
            );
        }
    }

    async fn player_user(&self, player_id: i32) -> Result<Option<User>, AppError> {
        let Some(player) = PlayerRepository::new(self.db).find_by_id(player_id).await? else {
            return Ok(None);
        };

        Ok(UserRepository::new(self.db).find_by_id(player.user_id).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::server::data::{
        booking::BookingRepository, court::CourtRepository, message::MessageRepository,
    };
    use test_utils::{builder::TestBuilder, factory};

    /// Tests an owner decision on a two-player booking.
    ///
    /// Expected: the booking player and the partner each get one unread notification
    #[tokio::test]
    async fn status_change_reaches_partner() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let (owner, court) = factory::create_court_with_owner(db).await?;
        let (player_user, player) = factory::create_player(db).await?;
        let (partner_user, partner) = factory::create_player(db).await?;
        let entity = factory::booking::BookingFactory::new(db, court.id, player.id)
            .partner(partner.id)
            .status("confirmed")
            .build()
            .await?;

        let booking = BookingRepository::new(db).find_by_id(entity.id).await?.unwrap();
        let court = CourtRepository::new(db).find_by_id(court.id).await?.unwrap();
        let email = EmailService::disabled(reqwest::Client::new());

        NotificationService::new(db, &email)
            .booking_status_changed(owner.id, &booking, &court)
            .await;

        let messages = MessageRepository::new(db);
        assert_eq!(messages.count_unread(player_user.id).await?, 1);
        assert_eq!(messages.count_unread(partner_user.id).await?, 1);
        assert_eq!(messages.count_unread(owner.id).await?, 0);

        Ok(())
    }

    /// Tests the partner cancelling a two-player booking.
    ///
    /// Expected: the booking player is told, the partner gets nothing about their own change
    #[tokio::test]
    async fn partner_is_not_told_of_own_change() -> Result<(), AppError> {
        let test = TestBuilder::new().with_all_tables().build().await.unwrap();
        let db = test.db.as_ref().unwrap();
        let (_, court) = factory::create_court_with_owner(db).await?;
        let (player_user, player) = factory::create_player(db).await?;
        let (partner_user, partner) = factory::create_player(db).await?;
        let entity = factory::booking::BookingFactory::new(db, court.id, player.id)
            .partner(partner.id)
            .status("cancelled")
            .build()
            .await?;

        let booking = BookingRepository::new(db).find_by_id(entity.id).await?.unwrap();
        let court = CourtRepository::new(db).find_by_id(court.id).await?.unwrap();
        let email = EmailService::disabled(reqwest::Client::new());

        NotificationService::new(db, &email)
            .booking_status_changed(partner_user.id, &booking, &court)
            .await;

        let messages = MessageRepository::new(db);
        assert_eq!(messages.count_unread(player_user.id).await?, 1);
        assert_eq!(messages.count_unread(partner_user.id).await?, 0);

        Ok(())
    }
}
