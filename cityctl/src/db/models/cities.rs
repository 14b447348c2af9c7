//! Database models for cities.

use crate::db::models::translations::TranslationDBResponse;
use crate::types::CityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A row of the `cities` table
#[derive(Debug, Clone, Serialize, Deserialize, sqlx::FromRow)]
pub struct City {
    pub id: CityId,
    pub hex: String,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
}

/// A city together with its eagerly loaded translations (ordered by translation id)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CityDBResponse {
    pub id: CityId,
    pub hex: String,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    pub translations: Vec<TranslationDBResponse>,
}

impl CityDBResponse {
    pub fn from_row(city: City, translations: Vec<TranslationDBResponse>) -> Self {
        Self {
            id: city.id,
            hex: city.hex,
            updated_at: city.updated_at,
            deleted_at: city.deleted_at,
            translations,
        }
    }
}

/// Request to create a new city
#[derive(Debug, Clone)]
pub struct CityCreateDBRequest {
    pub hex: String,
}

/// Request to update a city. `None` leaves the column untouched; for `deleted_at`,
/// `Some(None)` clears the marker and `Some(Some(ts))` sets it.
#[derive(Debug, Clone, Default)]
pub struct CityUpdateDBRequest {
    pub hex: Option<String>,
    pub deleted_at: Option<Option<DateTime<Utc>>>,
}
