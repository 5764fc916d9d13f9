//! Courtmatch Test Utils
//!
//! Provides shared testing utilities for building integration and unit tests for the court
//! booking server. This crate offers a builder pattern for creating test contexts with in-memory
//! SQLite databases and customizable table schemas, plus factories for inserting rows with
//! sensible defaults.
//!
//! # Overview
//!
//! The test utilities consist of four main components:
//! - **TestBuilder**: Fluent builder for configuring test environments
//! - **TestContext**: Test environment containing database connection and session
//! - **TestError**: Error types that can occur during test setup
//! - **factory**: Builders inserting users, players, courts, bookings and chat rows
//!
//! # Usage
//!
//! ```rust,ignore
//! use test_utils::builder::TestBuilder;
//!
//! #[tokio::test]
//! async fn test_booking_operations() -> Result<(), DbErr> {
//!     let test = TestBuilder::new().with_booking_tables().build().await.unwrap();
//!     let db = test.db.as_ref().unwrap();
//!
//!     let (owner, court) = factory::court::create_court_with_owner(db).await?;
//!     // Perform database operations...
//!
//!     Ok(())
//! }
//! ```

pub mod builder;
pub mod context;
pub mod error;
pub mod factory;
