//! Database layer for data persistence and access.
//!
//! This module implements the data access layer using SQLx with SQLite.
//! It follows the Repository pattern to provide clean abstractions over database operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────┐
//! │  Handlers   │  (API request handlers)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │ Repositories│  (db::handlers - queries)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   Models    │  (db::models - database records)
//! └──────┬──────┘
//!        │
//!        ↓
//! ┌─────────────┐
//! │   SQLite    │
//! └─────────────┘
//! ```
//!
//! # Transactions
//!
//! Multi-statement writes run on a transaction; reads may use a pooled connection:
//!
//! ```ignore
//! let mut tx = pool.begin().await?;
//! let mut repo = Cities::new(&mut tx);
//! // ... operations ...
//! tx.commit().await?;
//! ```
//!
//! Dropping the transaction without committing rolls it back.
//!
//! # Migrations
//!
//! Migrations live in `migrations/` and are embedded by [`crate::migrator`]:
//!
//! ```ignore
//! cityctl::migrator().run(&pool).await?;
//! ```

pub mod errors;
pub mod handlers;
pub mod models;
