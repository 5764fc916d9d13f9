pub use super::booking::Entity as Booking;
pub use super::conversation::Entity as Conversation;
pub use super::conversation_participant::Entity as ConversationParticipant;
pub use super::court::Entity as Court;
pub use super::message::Entity as Message;
pub use super::message_read_status::Entity as MessageReadStatus;
pub use super::owner::Entity as Owner;
pub use super::player::Entity as Player;
pub use super::shared_booking::Entity as SharedBooking;
pub use super::user::Entity as User;
