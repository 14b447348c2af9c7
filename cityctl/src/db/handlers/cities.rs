//! Database repository for cities.
//!
//! Listing goes through [`CityQuery`], which renders both the page query and the count query
//! from one predicate. Translations are eagerly attached with a single bulk lookup per page
//! rather than one query per city.

use crate::db::{
    errors::{DbError, Result},
    handlers::{
        query::CityQuery,
        repository::Repository,
        translations::{TranslationFilter, Translations},
    },
    models::{
        cities::{City, CityCreateDBRequest, CityDBResponse, CityUpdateDBRequest},
        translations::TranslationDBResponse,
    },
};
use crate::types::CityId;
use chrono::Utc;
use sqlx::{Connection, SqliteConnection};
use std::collections::HashMap;
use tracing::instrument;

/// Result of deleting a city together with its translations
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CityDeletion {
    pub id: CityId,
    pub translations_deleted: u64,
}

pub struct Cities<'c> {
    db: &'c mut SqliteConnection,
}

#[async_trait::async_trait]
impl<'c> Repository for Cities<'c> {
    type CreateRequest = CityCreateDBRequest;
    type UpdateRequest = CityUpdateDBRequest;
    type Response = CityDBResponse;
    type Id = CityId;
    type Filter = CityQuery;

    #[instrument(skip(self, request), fields(hex = %request.hex), err)]
    async fn create(&mut self, request: &Self::CreateRequest) -> Result<Self::Response> {
        let city = sqlx::query_as::<_, City>(
            r#"
            INSERT INTO cities (hex, updated_at)
            VALUES (?, ?)
            RETURNING id, hex, updated_at, deleted_at
            "#,
        )
        .bind(&request.hex)
        .bind(Utc::now())
        .fetch_one(&mut *self.db)
        .await?;

        Ok(CityDBResponse::from_row(city, Vec::new()))
    }

    /// Visible (not soft-deleted) city with all of its translations
    #[instrument(skip(self), err)]
    async fn get_by_id(&mut self, id: Self::Id) -> Result<Option<Self::Response>> {
        let city = sqlx::query_as::<_, City>(
            "SELECT id, hex, updated_at, deleted_at FROM cities WHERE id = ? AND deleted_at IS NULL",
        )
        .bind(id)
        .fetch_optional(&mut *self.db)
        .await?;

        match city {
            Some(city) => Ok(self.attach_translations(vec![city], None).await?.pop()),
            None => Ok(None),
        }
    }

    /// One page of cities for the query, ordered by id, with translations attached
    #[instrument(skip(self, filter), fields(limit = filter.limit, skip = filter.skip), err)]
    async fn list(&mut self, filter: &Self::Filter) -> Result<Vec<Self::Response>> {
        let mut query = filter.list_query();
        let cities = query.build_query_as::<City>().fetch_all(&mut *self.db).await?;

        self.attach_translations(cities, filter.translation_lang()).await
    }

    /// Deletes the city and its translations atomically. Opens its own transaction, which
    /// becomes a savepoint when the connection is already inside one.
    #[instrument(skip(self), err)]
    async fn delete(&mut self, id: Self::Id) -> Result<bool> {
        let mut tx = self.db.begin().await?;
        let deleted = Cities::new(&mut tx).delete_with_translations(id).await?;
        tx.commit().await?;

        Ok(deleted.is_some())
    }

    /// Applies the provided fields and re-stamps `updated_at`. Soft-deleted rows can be
    /// updated too, which is how the deletion marker is cleared.
    #[instrument(skip(self, request), err)]
    async fn update(&mut self, id: Self::Id, request: &Self::UpdateRequest) -> Result<Self::Response> {
        let city = sqlx::query_as::<_, City>(
            r#"
            UPDATE cities SET
                hex = COALESCE(?, hex),
                deleted_at = CASE
                    WHEN ? THEN ?
                    ELSE deleted_at
                END,
                updated_at = ?
            WHERE id = ?
            RETURNING id, hex, updated_at, deleted_at
            "#,
        )
        .bind(request.hex.as_deref())
        // deleted_at
        .bind(request.deleted_at.is_some())
        .bind(request.deleted_at.flatten())
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&mut *self.db)
        .await?;

        self.attach_translations(vec![city], None)
            .await?
            .pop()
            .ok_or(DbError::NotFound)
    }
}

impl<'c> Cities<'c> {
    pub fn new(db: &'c mut SqliteConnection) -> Self {
        Self { db }
    }

    /// Count cities matching the query, ignoring its page window
    #[instrument(skip(self, filter), err)]
    pub async fn count(&mut self, filter: &CityQuery) -> Result<i64> {
        let mut query = filter.count_query();
        let count: i64 = query.build_query_scalar().fetch_one(&mut *self.db).await?;
        Ok(count)
    }

    /// Whether a visible city with this id exists
    #[instrument(skip(self), err)]
    pub async fn exists(&mut self, id: CityId) -> Result<bool> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM cities WHERE id = ? AND deleted_at IS NULL")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;

        Ok(found.is_some())
    }

    /// Delete a city's translations and then the city itself. Returns `None` when no city has
    /// this id. Run it on a transaction so both deletes commit or roll back together.
    #[instrument(skip(self), err)]
    pub async fn delete_with_translations(&mut self, id: CityId) -> Result<Option<CityDeletion>> {
        let found: Option<i64> = sqlx::query_scalar("SELECT id FROM cities WHERE id = ?")
            .bind(id)
            .fetch_optional(&mut *self.db)
            .await?;
        if found.is_none() {
            return Ok(None);
        }

        let translations_deleted = Translations::new(&mut *self.db).delete_by_city(id).await?;

        sqlx::query("DELETE FROM cities WHERE id = ?")
            .bind(id)
            .execute(&mut *self.db)
            .await?;

        Ok(Some(CityDeletion { id, translations_deleted }))
    }

    /// Attach translations (all, or only `lang`) to each city, preserving city order
    async fn attach_translations(&mut self, cities: Vec<City>, lang: Option<&str>) -> Result<Vec<CityDBResponse>> {
        let ids: Vec<CityId> = cities.iter().map(|c| c.id).collect();
        let filter = TranslationFilter::for_cities(ids).with_lang(lang);
        let translations = Translations::new(&mut *self.db).list(&filter).await?;

        let mut by_city: HashMap<CityId, Vec<TranslationDBResponse>> = HashMap::new();
        for translation in translations {
            by_city.entry(translation.city_id).or_default().push(translation);
        }

        Ok(cities
            .into_iter()
            .map(|city| {
                let translations = by_city.remove(&city.id).unwrap_or_default();
                CityDBResponse::from_row(city, translations)
            })
            .collect())
    }
}
