//! API layer for HTTP request handling and data models.
//!
//! - **[`handlers`]**: Axum route handlers
//! - **[`models`]**: Request/response data structures
//!
//! # API Structure
//!
//! - **Cities** (`/api/v1/cities/*`): list, search, translate mode, CRUD
//! - **Translations** (`/api/v1/translations/*`): CRUD
//!
//! # OpenAPI Documentation
//!
//! Endpoints carry `utoipa` annotations. The document is served at `/api/v1/openapi.json` and
//! rendered at `/docs`.

pub mod handlers;
pub mod models;
