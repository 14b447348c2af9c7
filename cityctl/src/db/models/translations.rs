//! Database models for city translations.

use crate::types::{CityId, TranslationId};
use serde::{Deserialize, Serialize};

/// A row of the `city_translations` table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, sqlx::FromRow)]
pub struct CityTranslation {
    pub id: TranslationId,
    pub city_id: CityId,
    pub lang: String,
    pub name: String,
}

pub type TranslationDBResponse = CityTranslation;

/// Request to create a translation. `lang` is expected in canonical form
/// (see [`crate::types::normalize_lang`]).
#[derive(Debug, Clone)]
pub struct TranslationCreateDBRequest {
    pub city_id: CityId,
    pub lang: String,
    pub name: String,
}

/// Request to update a translation; `None` fields are left untouched
#[derive(Debug, Clone, Default)]
pub struct TranslationUpdateDBRequest {
    pub city_id: Option<CityId>,
    pub lang: Option<String>,
    pub name: Option<String>,
}
