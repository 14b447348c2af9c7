//! API request and response data models.
//!
//! These structures define the public API contract and are kept separate from the database
//! models in [`crate::db::models`]. All of them carry `utoipa` annotations for the generated
//! OpenAPI document.
//!
//! - [`cities`]: city payloads, list/search query parameters, translate-mode result
//! - [`translations`]: translation payloads
//! - [`pagination`]: lenient `skip`/`limit` parsing and the paginated envelope
//! - [`responses`]: the `{status, data, message}` envelope

pub mod cities;
pub mod pagination;
pub mod responses;
pub mod translations;
