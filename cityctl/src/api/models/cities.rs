//! API request/response models for cities.

use super::{pagination::Pagination, translations::TranslationResponse};
use crate::db::{handlers::cities::CityDeletion, models::cities::CityDBResponse};
use crate::types::CityId;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_with::rust::double_option;
use utoipa::{IntoParams, ToSchema};

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CityCreate {
    /// Opaque display key, must not be blank
    pub hex: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct CityUpdate {
    /// New display key (None = no change)
    pub hex: Option<String>,
    /// Deletion marker (None = no change, Some(None) = clear, Some(timestamp) = set)
    #[serde(default, skip_serializing_if = "Option::is_none", with = "double_option")]
    pub deleted_at: Option<Option<DateTime<Utc>>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CityResponse {
    pub id: CityId,
    pub hex: String,
    pub updated_at: DateTime<Utc>,
    pub deleted_at: Option<DateTime<Utc>>,
    /// Translations ordered by id. Search results only carry the searched language.
    pub translations: Vec<TranslationResponse>,
}

impl From<CityDBResponse> for CityResponse {
    fn from(db: CityDBResponse) -> Self {
        Self {
            id: db.id,
            hex: db.hex,
            updated_at: db.updated_at,
            deleted_at: db.deleted_at,
            translations: db.translations.into_iter().map(Into::into).collect(),
        }
    }
}

/// What a city delete removed
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CityDeleted {
    pub id: CityId,
    pub translations_deleted: u64,
}

impl From<CityDeletion> for CityDeleted {
    fn from(deletion: CityDeletion) -> Self {
        Self {
            id: deletion.id,
            translations_deleted: deletion.translations_deleted,
        }
    }
}

/// Query parameters for listing cities
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct ListCitiesQuery {
    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,
}

/// Query parameters for searching cities by translated name
#[derive(Debug, Default, Deserialize, IntoParams, ToSchema)]
pub struct SearchCitiesQuery {
    /// Case-insensitive substring of a translated name
    pub name: Option<String>,

    /// Language code of the translations to search (and, in translate mode, to return)
    pub lang: Option<String>,

    /// Resolve the best matching name to the same city's name in `lang` (`true`, `1` or `yes`)
    pub translate: Option<String>,

    #[serde(flatten)]
    #[param(inline)]
    pub pagination: Pagination,
}

impl SearchCitiesQuery {
    pub fn translate_enabled(&self) -> bool {
        self.translate
            .as_deref()
            .map(|value| matches!(value.trim().to_ascii_lowercase().as_str(), "true" | "1" | "yes"))
            .unwrap_or(false)
    }
}

/// Translate-mode result: the matched city's name in the requested language
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct TranslatedName {
    pub city_id: CityId,
    pub lang: String,
    pub name: String,
}
