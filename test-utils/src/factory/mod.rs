//! Factory methods for creating test data.
//!
//! This module provides factory methods for creating test entities with sensible defaults,
//! reducing boilerplate in tests. Factories take the IDs of the rows they depend on so tests
//! stay explicit about foreign key relationships.
//!
//! # Overview
//!
//! Each entity has its own factory module with both a `Factory` struct for customization
//! and a `create_*` convenience function for quick default creation.
//!
//! # Basic Usage
//!
//! ```rust,ignore
//! use test_utils::factory;
//!
//! #[tokio::test]
//! async fn test_example() -> Result<(), sea_orm::DbErr> {
//!     let db = /* ... */;
//!
//!     // Create with defaults
//!     let (user, player) = factory::player::create_player(&db).await?;
//!     let (owner, court) = factory::court::create_court_with_owner(&db).await?;
//!
//!     // Create a booking tomorrow at 10:00-11:00
//!     let booking = factory::booking::create_booking(&db, court.id, player.id).await?;
//!
//!     Ok(())
//! }
//! ```
//!
//! # Customization
//!
//! ```rust,ignore
//! let court = factory::court::CourtFactory::new(&db, owner.id)
//!     .name("Centre Court")
//!     .hourly_rate(80.0)
//!     .coordinates(32.08, 34.78)
//!     .build()
//!     .await?;
//! ```
//!
//! # Available Factories
//!
//! - `user` - Create user entities of any role
//! - `player` - Create player profiles (with their user)
//! - `court` - Create courts
//! - `booking` - Create bookings
//! - `shared_booking` - Create two-player booking proposals
//! - `conversation` - Create conversations with participants
//! - `message` - Create messages
//! - `helpers` - Unique ID generation

pub mod booking;
pub mod conversation;
pub mod court;
pub mod helpers;
pub mod message;
pub mod player;
pub mod shared_booking;
pub mod user;

// Re-export commonly used factory functions for concise usage
pub use booking::create_booking;
pub use conversation::create_direct_conversation;
pub use court::{create_court, create_court_with_owner};
pub use message::create_message;
pub use player::create_player;
pub use shared_booking::create_shared_booking;
pub use user::{create_admin, create_owner, create_user};
