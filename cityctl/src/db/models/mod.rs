//! Database record models matching table schemas.
//!
//! These structs map directly onto rows of the `cities` and `city_translations` tables and are
//! returned by the repositories in [`crate::db::handlers`]. They are kept separate from the API
//! models in [`crate::api::models`] so that storage and wire representations can evolve
//! independently; conversions live on the API side as `From` impls.

pub mod cities;
pub mod translations;
