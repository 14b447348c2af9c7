//! HTTP request handlers for all API endpoints.
//!
//! Each handler validates its input, runs the repositories from [`crate::db::handlers`] and
//! wraps the result in the `{status, data, message}` envelope.
//!
//! - [`cities`]: listing, search, translate mode and city CRUD
//! - [`translations`]: translation CRUD
//!
//! # Error Handling
//!
//! Handlers return [`crate::errors::Error`], which converts to the HTTP status and the error
//! envelope. Store failures are reported with the stage that failed (`Failed to count cities`).

pub mod cities;
pub mod translations;
