//! Repository implementations for database access.
//!
//! Repositories wrap a SQLx connection or transaction and provide strongly-typed operations
//! over one table each, returning models from [`crate::db::models`].
//!
//! - [`Cities`]: cities, paginated listing and search, cascading delete
//! - [`Translations`]: city name translations and the name resolver
//! - [`query`]: the shared list/count query composer for city listings
//!
//! # Common Pattern
//!
//! ```ignore
//! use cityctl::db::handlers::{Cities, Repository};
//!
//! async fn example(pool: &sqlx::SqlitePool) -> Result<(), Box<dyn std::error::Error>> {
//!     let mut tx = pool.begin().await?;
//!     let mut repo = Cities::new(&mut tx);
//!
//!     let removed = repo.delete_with_translations(5).await?;
//!
//!     tx.commit().await?;
//!     Ok(())
//! }
//! ```

pub mod cities;
pub mod query;
pub mod repository;
pub mod translations;

pub use cities::Cities;
pub use repository::Repository;
pub use translations::Translations;
