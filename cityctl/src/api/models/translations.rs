//! API request/response models for city translations.

use crate::db::models::translations::TranslationDBResponse;
use crate::types::{CityId, TranslationId};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Fields are optional at the type level so missing values get a specific 400 message
#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TranslationCreate {
    /// Owning city, required and non-zero
    pub city_id: Option<CityId>,
    /// Language code, normalized to upper case
    pub lang: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, ToSchema)]
pub struct TranslationUpdate {
    pub city_id: Option<CityId>,
    pub lang: Option<String>,
    pub name: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TranslationResponse {
    pub id: TranslationId,
    pub city_id: CityId,
    pub lang: String,
    pub name: String,
}

impl From<TranslationDBResponse> for TranslationResponse {
    fn from(db: TranslationDBResponse) -> Self {
        Self {
            id: db.id,
            city_id: db.city_id,
            lang: db.lang,
            name: db.name,
        }
    }
}
