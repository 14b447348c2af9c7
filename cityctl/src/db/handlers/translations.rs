//! Database repository for city translations, including the two-hop name resolver.

use crate::db::{
    errors::Result,
    handlers::{query::contains_pattern, repository::Repository},
    models::translations::{CityTranslation, TranslationCreateDBRequest, TranslationDBResponse, TranslationUpdateDBRequest},
};
use crate::types::{CityId, TranslationId, fold_name, normalize_lang};
use sqlx::{QueryBuilder, Sqlite, SqliteConnection};
use tracing::instrument;

/// Filter for bulk translation lookups (eager loading)
#[derive(Debug, Clone, Default)]
pub struct TranslationFilter {
    pub city_ids: Vec<CityId>,
    pub lang: Option<String>,
}

impl TranslationFilter {
    pub fn for_cities(city_ids: Vec<CityId>) -> Self {
        Self { city_ids, lang: None }
    }

    pub fn with_lang(mut self, lang: Option<&str>) -> Self {
        self.lang = lang.map(str::to_string);
        self
    }
}

/// Outcome of resolving a name (in any language) to its sibling in a target language
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Resolution {
    /// The target-language translation of the matched city
    Resolved(CityTranslation),
    /// No translation of any visible city contains the name
    NoMatch,
    /// A city matched but has no translation in the target language
    MissingLanguage { city_id: CityId },
}

pub struct Translations<'c> {
    db: &'c mut SqliteConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Translations<'c> {
    type CreateRequest = TranslationCreateDBRequest;
    type UpdateRequest = TranslationUpdateDBRequest;
    type Response = TranslationDBResponse;
    type Id = TranslationId;
    type Filter = TranslationFilter;

    #[instrument(skip(self, request), fields(city_id = request.city_id, lang = %request.lang), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let translation = sqlx::query_as::<_, CityTranslation>(
            r#"
            INSERT INTO city_translations (city_id, lang, name, name_folded)
            VALUES (?, ?, ?, ?)
            RETURNING id, city_id, lang, name
            "#,
        )
        .bind(request.city_id)
        .bind(&request.lang)
        .bind(&request.name)
        .bind(fold_name(&request.name))
        .fetch_one(&mut *self.db)
        .await?;

        Ok(translation)
    }

    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let translation = sqlx::query_as::<_, CityTranslation>("SELECT id, city_id, lang, name FROM city_translations WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(translation)
    }

    /// Translations of the given cities, ordered by city then translation id
    #[instrument(skip(self, filter), fields(cities = filter.city_ids.len(), lang = ?filter.lang), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        if filter.city_ids.is_empty() {
            return Ok(Vec::new());
        }

        let mut query: QueryBuilder<'_, Sqlite> = QueryBuilder::new("SELECT id, city_id, lang, name FROM city_translations WHERE city_id IN (");
        let mut ids = query.separated(", ");
        for id in &filter.city_ids {
            ids.push_bind(*id);
        }
        ids.push_unseparated(")");

        if let Some(lang) = &filter.lang {
            query.push(" AND lang = ");
            query.push_bind(lang.clone());
        }

        query.push(" ORDER BY city_id ASC, id ASC");

        let translations = query.build_query_as::<CityTranslation>().fetch_all(&mut *self.db).await?;
        Ok(translations)
    }

    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let result = sqlx::query("DELETE FROM city_translations WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let translation = sqlx::query_as::<_, CityTranslation>(
            r#"
            UPDATE city_translations SET
                city_id = COALESCE(?, city_id),
                lang = COALESCE(?, lang),
                name = COALESCE(?, name),
                name_folded = COALESCE(?, name_folded)
            WHERE id = ?
            RETURNING id, city_id, lang, name
            "#,
        )
        .bind(request.city_id)
        .bind(request.lang.as_deref())
        .bind(request.name.as_deref())
        .bind(request.name.as_deref().map(fold_name))
        .bind(id)
        .fetch_one(&mut *self.db)
        .await?;

        Ok(translation)
    }
}

impl<'c> Translations<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Delete every translation owned by a city, returning how many were removed
    #[instrument(skip(self), err)]
    pub async fn delete_by_city(&mut self, city_id: CityId) -> Result<u64> {
        let result = sqlx::query("DELETE FROM city_translations WHERE city_id = ?")
            .bind(city_id)
            .execute(&mut *self.db)
            .await?;

        Ok(result.rows_affected())
    }

    /// First translation (lowest id) of a visible city whose name contains `name`,
    /// case-insensitively
    #[instrument(skip(self), err)]
    pub async fn find_first_by_name(&mut self, name: &str) -> Result<Option<CityTranslation>> {
        let translation = sqlx::query_as::<_, CityTranslation>(
            r#"
            SELECT ct.id, ct.city_id, ct.lang, ct.name
            FROM city_translations ct
            JOIN cities c ON c.id = ct.city_id
            WHERE c.deleted_at IS NULL AND ct.name_folded LIKE ? ESCAPE '\'
            ORDER BY ct.id ASC
            LIMIT 1
            "#,
        )
        .bind(contains_pattern(name))
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(translation)
    }

    /// First translation (lowest id) of a city in the given language
    #[instrument(skip(self), err)]
    pub async fn find_by_city_and_lang(&mut self, city_id: CityId, lang: &str) -> Result<Option<CityTranslation>> {
        let translation = sqlx::query_as::<_, CityTranslation>(
            r#"
            SELECT id, city_id, lang, name
            FROM city_translations
            WHERE city_id = ? AND lang = ?
            ORDER BY id ASC
            LIMIT 1
            "#,
        )
        .bind(city_id)
        .bind(lang)
        .fetch_optional(&mut *self.db)
        .await?;

        Ok(translation)
    }

    /// Resolve a name in an unknown language to the same city's name in `target_lang`.
    ///
    /// 1. find the first translation (by id) whose name contains `name`
    /// 2. look up that city's translation in `target_lang`
    ///
    /// Misses at either step are reported as [`Resolution`] variants, never as errors.
    #[instrument(skip(self), err)]
    pub async fn resolve(&mut self, name: &str, target_lang: &str) -> Result<Resolution> {
        let Some(matched) = self.find_first_by_name(name).await? else {
            return Ok(Resolution::NoMatch);
        };

        let target_lang = normalize_lang(target_lang);
        match self.find_by_city_and_lang(matched.city_id, &target_lang).await? {
            Some(translation) => Ok(Resolution::Resolved(translation)),
            None => Ok(Resolution::MissingLanguage { city_id: matched.city_id }),
        }
    }
}
