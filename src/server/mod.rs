//! Server-side API backend and business logic.
//!
//! This module contains the complete backend for the court booking application: JSON API
//! endpoints, booking and matching rules, data access, and infrastructure services. The
//! backend uses Axum as the web framework and SeaORM over Sqlite for persistence.
//!
//! # Architecture
//!
//! The server follows a layered architecture:
//!
//! - **Controller Layer** (`controller/`) - HTTP request handlers, access control, and DTO conversion
//! - **Service Layer** (`service/`) - Business logic: booking rules, pricing, matching, messaging
//! - **Data Layer** (`data/`) - Database operations and entity-to-domain model conversion
//! - **Model Layer** (`model/`) - Domain models and operation-specific parameter types
//! - **Error Layer** (`error/`) - Application error types and HTTP response mapping
//! - **Middleware** (`middleware/`) - Session access and role guards
//!
//! # Infrastructure
//!
//! - **Configuration** (`config`) - Environment-based application configuration
//! - **State** (`state`) - Shared application state (DB, HTTP client, geocoder, email)
//! - **Startup** (`startup`) - Database, session store, HTTP client and admin bootstrap
//! - **Router** (`router`) - Route table, rate limiting, CORS and API documentation
//! - **Scheduler** (`scheduler/`) - Cron job expiring unanswered shared booking proposals
//!
//! # Request Flow
//!
//! 1. **Router** receives the HTTP request and routes it to a controller
//! 2. **Controller** checks the session role, converts DTOs to params, calls a service
//! 3. **Service** runs the business rules and orchestrates data operations
//! 4. **Data** queries the database and converts entities to domain models
//! 5. **Controller** converts the domain model to a DTO and returns the response

pub mod config;
pub mod controller;
pub mod data;
pub mod error;
pub mod middleware;
pub mod model;
pub mod router;
pub mod scheduler;
pub mod service;
pub mod startup;
pub mod state;
pub mod util;
