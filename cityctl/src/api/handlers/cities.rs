use crate::api::models::{
    cities::{CityCreate, CityDeleted, CityResponse, CityUpdate, ListCitiesQuery, SearchCitiesQuery, TranslatedName},
    pagination::PaginatedResponse,
    responses::{ApiResponse, ErrorResponse},
};
use crate::db::handlers::{Cities, Repository, Translations, query::CityQuery, translations::Resolution};
use crate::db::errors::DbError;
use crate::db::models::cities::{CityCreateDBRequest, CityUpdateDBRequest};
use crate::errors::{ApiJson, Error, Result, stage};
use crate::types::{CityId, non_blank, normalize_lang};
use crate::AppState;
use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};

/// Count then fetch one page for the query. Both stages read from the same `CityQuery`.
async fn city_page(state: &AppState, query: &CityQuery) -> Result<PaginatedResponse<CityResponse>> {
    let mut conn = state.db.acquire().await.map_err(|e| stage("count cities")(e.into()))?;
    let mut repo = Cities::new(&mut conn);

    let total = repo.count(query).await.map_err(stage("count cities"))?;
    let cities = repo.list(query).await.map_err(stage("list cities"))?;

    Ok(PaginatedResponse::new(
        cities.into_iter().map(CityResponse::from).collect(),
        total,
        query.skip,
        query.limit,
    ))
}

#[utoipa::path(
    get,
    path = "/cities",
    tag = "cities",
    summary = "List cities",
    description = "Cities ordered by id, each with all of its translations. `meta.total` counts every city.",
    params(ListCitiesQuery),
    responses(
        (status = 200, description = "Page of cities", body = PaginatedResponse<CityResponse>),
        (status = 500, description = "Store failure while counting or listing", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn list_cities(State(state): State<AppState>, Query(query): Query<ListCitiesQuery>) -> Result<Json<PaginatedResponse<CityResponse>>> {
    let (skip, limit) = query.pagination.params();
    let page = city_page(&state, &CityQuery::new(skip, limit)).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/cities/search",
    tag = "cities",
    summary = "Search cities by translated name",
    description = "Cities having a `lang` translation whose name contains `name` (case-insensitive). \
                   Only `lang` translations are attached. With `translate=true` the first name matching \
                   in any language is resolved to the same city's name in `lang` instead.",
    params(SearchCitiesQuery),
    responses(
        (status = 200, description = "Page of matching cities. In translate mode the body is an `ApiResponse<TranslatedName>` instead.", body = PaginatedResponse<CityResponse>),
        (status = 400, description = "`name` or `lang` missing", body = ErrorResponse),
        (status = 404, description = "Translate mode: no matching name, or no translation in `lang`", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn search_cities(State(state): State<AppState>, Query(query): Query<SearchCitiesQuery>) -> Result<Response> {
    let (Some(name), Some(lang)) = (non_blank(query.name.as_deref()), non_blank(query.lang.as_deref())) else {
        return Err(Error::bad_request("Query parameters 'name' and 'lang' are required"));
    };

    if query.translate_enabled() {
        return Ok(Json(translate_name(&state, name, lang).await?).into_response());
    }

    let (skip, limit) = query.pagination.params();
    let page = city_page(&state, &CityQuery::new(skip, limit).with_name_in_language(name, lang)).await?;
    Ok(Json(page).into_response())
}

async fn translate_name(state: &AppState, name: &str, lang: &str) -> Result<ApiResponse<TranslatedName>> {
    let mut conn = state.db.acquire().await.map_err(|e| stage("resolve translation")(e.into()))?;
    let resolution = Translations::new(&mut conn)
        .resolve(name, lang)
        .await
        .map_err(stage("resolve translation"))?;

    match resolution {
        Resolution::Resolved(translation) => Ok(ApiResponse::success(TranslatedName {
            city_id: translation.city_id,
            lang: translation.lang,
            name: translation.name,
        })),
        Resolution::NoMatch => Err(Error::NoMatch {
            message: format!("No translation matching '{name}'"),
        }),
        Resolution::MissingLanguage { city_id } => Err(Error::NoMatch {
            message: format!("City {city_id} has no {} translation", normalize_lang(lang)),
        }),
    }
}

#[utoipa::path(
    post,
    path = "/cities",
    tag = "cities",
    summary = "Create city",
    request_body = CityCreate,
    responses(
        (status = 201, description = "City created", body = ApiResponse<CityResponse>),
        (status = 400, description = "Missing or blank `hex`", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_city(
    State(state): State<AppState>,
    ApiJson(create): ApiJson<CityCreate>,
) -> Result<(StatusCode, Json<ApiResponse<CityResponse>>)> {
    let Some(hex) = non_blank(Some(&create.hex)) else {
        return Err(Error::bad_request("Field 'hex' must not be blank"));
    };

    let mut conn = state.db.acquire().await.map_err(|e| stage("create city")(e.into()))?;
    let city = Cities::new(&mut conn)
        .create(&CityCreateDBRequest { hex: hex.to_string() })
        .await
        .map_err(stage("create city"))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(CityResponse::from(city)))))
}

#[utoipa::path(
    get,
    path = "/cities/{id}",
    tag = "cities",
    summary = "Get city",
    params(("id" = i64, Path, description = "City ID")),
    responses(
        (status = 200, description = "City with all of its translations", body = ApiResponse<CityResponse>),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_city(State(state): State<AppState>, Path(id): Path<CityId>) -> Result<Json<ApiResponse<CityResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| stage("get city")(e.into()))?;
    let city = Cities::new(&mut conn)
        .get_by_id(id)
        .await
        .map_err(stage("get city"))?
        .ok_or_else(|| Error::not_found("City", id))?;

    Ok(Json(ApiResponse::success(CityResponse::from(city))))
}

#[utoipa::path(
    patch,
    path = "/cities/{id}",
    tag = "cities",
    summary = "Update city",
    description = "Absent fields are kept. `deleted_at: null` restores a deleted city, a timestamp hides it.",
    request_body = CityUpdate,
    params(("id" = i64, Path, description = "City ID")),
    responses(
        (status = 200, description = "Updated city", body = ApiResponse<CityResponse>),
        (status = 400, description = "Malformed body", body = ErrorResponse),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_city(
    State(state): State<AppState>,
    Path(id): Path<CityId>,
    ApiJson(update): ApiJson<CityUpdate>,
) -> Result<Json<ApiResponse<CityResponse>>> {
    let request = CityUpdateDBRequest {
        hex: update.hex,
        deleted_at: update.deleted_at,
    };

    let mut conn = state.db.acquire().await.map_err(|e| stage("update city")(e.into()))?;
    let city = Cities::new(&mut conn).update(id, &request).await.map_err(|e| match e {
        DbError::NotFound => Error::not_found("City", id),
        other => stage("update city")(other),
    })?;

    Ok(Json(ApiResponse::success(CityResponse::from(city))))
}

#[utoipa::path(
    delete,
    path = "/cities/{id}",
    tag = "cities",
    summary = "Delete city",
    description = "Deletes the city and all of its translations in one transaction.",
    params(("id" = i64, Path, description = "City ID")),
    responses(
        (status = 200, description = "City and translations deleted", body = ApiResponse<CityDeleted>),
        (status = 404, description = "City not found", body = ErrorResponse),
        (status = 500, description = "Store failure, nothing deleted", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_city(State(state): State<AppState>, Path(id): Path<CityId>) -> Result<Json<ApiResponse<CityDeleted>>> {
    let mut tx = state.db.begin().await.map_err(|e| stage("delete city")(e.into()))?;

    let deletion = Cities::new(&mut tx)
        .delete_with_translations(id)
        .await
        .map_err(stage("delete city"))?
        .ok_or_else(|| Error::not_found("City", id))?;

    tx.commit().await.map_err(|e| stage("delete city")(e.into()))?;

    tracing::info!(
        city_id = id,
        translations_deleted = deletion.translations_deleted,
        "Deleted city"
    );
    Ok(Json(ApiResponse::success(CityDeleted::from(deletion))))
}

#[cfg(test)]
mod tests {
    use crate::api::models::{
        cities::{CityDeleted, CityResponse, TranslatedName},
        pagination::PaginatedResponse,
        responses::ApiResponse,
    };
    use crate::test_utils::*;
    use axum::http::StatusCode;
    use serde_json::{Value, json};
    use sqlx::SqlitePool;

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_cities_with_pagination(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;
        let mut ids = Vec::new();
        for i in 0..5 {
            let city = create_test_city(&pool, &format!("hex{i}"), &[("EN", &format!("City {i}"))]).await;
            ids.push(city.id);
        }

        let response = app.get("/api/v1/cities?limit=2&skip=1").await;
        response.assert_status_ok();
        let body: PaginatedResponse<CityResponse> = response.json();

        assert_eq!(body.status, "success");
        assert_eq!(body.meta.total, 5);
        assert_eq!(body.meta.limit, 2);
        assert_eq!(body.meta.skip, 1);
        let page_ids: Vec<i64> = body.data.iter().map(|c| c.id).collect();
        assert_eq!(page_ids, vec![ids[1], ids[2]]);
        assert_eq!(body.data[0].translations.len(), 1);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_cities_coerces_invalid_pagination(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;
        for i in 0..12 {
            create_test_city(&pool, &format!("c{i}"), &[]).await;
        }

        for uri in [
            "/api/v1/cities?limit=0&skip=-3",
            "/api/v1/cities?limit=abc&skip=xyz",
            "/api/v1/cities?limit=-1",
            "/api/v1/cities",
        ] {
            let response = app.get(uri).await;
            response.assert_status_ok();
            let body: PaginatedResponse<CityResponse> = response.json();
            assert_eq!(body.meta.limit, 10, "{uri}");
            assert_eq!(body.meta.skip, 0, "{uri}");
            assert_eq!(body.meta.total, 12, "{uri}");
            assert_eq!(body.data.len(), 10, "{uri}");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_search_filters_by_name_and_language(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;
        let springfield = create_test_city(&pool, "a1", &[("EN", "Springfield"), ("FR", "Champs")]).await;
        create_test_city(&pool, "a2", &[("EN", "Boston")]).await;
        let palm = create_test_city(&pool, "a3", &[("EN", "Palm Springs")]).await;
        create_test_city(&pool, "a4", &[("FR", "Springville")]).await;

        let response = app.get("/api/v1/cities/search?name=Spring&lang=en&limit=1").await;
        response.assert_status_ok();
        let body: PaginatedResponse<CityResponse> = response.json();
        assert_eq!(body.meta.total, 2);
        assert_eq!(body.data.len(), 1);
        assert_eq!(body.data[0].id, springfield.id);
        assert!(body.data[0].translations.iter().all(|t| t.lang == "EN"));

        let response = app.get("/api/v1/cities/search?name=spring&lang=EN&skip=1").await;
        let body: PaginatedResponse<CityResponse> = response.json();
        assert_eq!(body.meta.total, 2);
        assert_eq!(body.data[0].id, palm.id);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_search_requires_name_and_lang(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;

        for uri in [
            "/api/v1/cities/search?name=Spring",
            "/api/v1/cities/search?lang=EN",
            "/api/v1/cities/search?name=%20&lang=EN",
        ] {
            let response = app.get(uri).await;
            response.assert_status(StatusCode::BAD_REQUEST);
            let body: Value = response.json();
            assert_eq!(body["status"], "error");
            assert_eq!(body["data"], Value::Null);
            assert_eq!(body["message"], "Query parameters 'name' and 'lang' are required");
        }
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_translate_mode(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;
        let berlin = create_test_city(&pool, "b1", &[("DE", "Berlin"), ("FR", "Berlin-FR")]).await;
        let munich = create_test_city(&pool, "m1", &[("DE", "München")]).await;

        let response = app.get("/api/v1/cities/search?name=Berl&lang=fr&translate=true").await;
        response.assert_status_ok();
        let body: ApiResponse<TranslatedName> = response.json();
        assert_eq!(body.data.city_id, berlin.id);
        assert_eq!(body.data.lang, "FR");
        assert_eq!(body.data.name, "Berlin-FR");

        let response = app.get("/api/v1/cities/search?name=Münch&lang=FR&translate=1").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], format!("City {} has no FR translation", munich.id));

        let response = app.get("/api/v1/cities/search?name=Atlantis&lang=FR&translate=yes").await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], "No translation matching 'Atlantis'");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_search_and_translate_non_ascii_names(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;
        let moscow = create_test_city(&pool, "m2", &[("RU", "Москва"), ("EN", "Moscow")]).await;
        let athens = create_test_city(&pool, "a5", &[("EL", "Αθήνα"), ("FR", "ATHÈNES")]).await;

        for needle in ["Москва", "моск", "МОСКВА"] {
            let response = app
                .get("/api/v1/cities/search")
                .add_query_param("name", needle)
                .add_query_param("lang", "ru")
                .await;
            response.assert_status_ok();
            let body: PaginatedResponse<CityResponse> = response.json();
            assert_eq!(body.meta.total, 1, "needle {needle}");
            assert_eq!(body.data[0].id, moscow.id);
            assert_eq!(body.data[0].translations[0].name, "Москва");
        }

        let response = app
            .get("/api/v1/cities/search")
            .add_query_param("name", "athènes")
            .add_query_param("lang", "fr")
            .await;
        response.assert_status_ok();
        let body: PaginatedResponse<CityResponse> = response.json();
        assert_eq!(body.meta.total, 1);
        assert_eq!(body.data[0].id, athens.id);

        let response = app
            .get("/api/v1/cities/search")
            .add_query_param("name", "ΑΘΉΝΑ")
            .add_query_param("lang", "FR")
            .add_query_param("translate", "true")
            .await;
        response.assert_status_ok();
        let body: ApiResponse<TranslatedName> = response.json();
        assert_eq!(body.data.city_id, athens.id);
        assert_eq!(body.data.name, "ATHÈNES");

        let response = app
            .get("/api/v1/cities/search")
            .add_query_param("name", "МОСКВА")
            .add_query_param("lang", "en")
            .add_query_param("translate", "yes")
            .await;
        response.assert_status_ok();
        let body: ApiResponse<TranslatedName> = response.json();
        assert_eq!(body.data.city_id, moscow.id);
        assert_eq!(body.data.name, "Moscow");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_create_get_and_update_city(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;

        let response = app.post("/api/v1/cities").json(&json!({"hex": " "})).await;
        response.assert_status(StatusCode::BAD_REQUEST);

        let response = app.post("/api/v1/cities").json(&json!({})).await;
        response.assert_status(StatusCode::BAD_REQUEST);
        let body: Value = response.json();
        assert_eq!(body["status"], "error");

        let response = app.post("/api/v1/cities").json(&json!({"hex": "c0ffee"})).await;
        response.assert_status(StatusCode::CREATED);
        let created: ApiResponse<CityResponse> = response.json();
        assert_eq!(created.data.hex, "c0ffee");
        assert!(created.data.deleted_at.is_none());
        assert!(created.data.translations.is_empty());
        let id = created.data.id;

        let response = app.patch(&format!("/api/v1/cities/{id}")).json(&json!({"hex": "bada55"})).await;
        response.assert_status_ok();
        let updated: ApiResponse<CityResponse> = response.json();
        assert_eq!(updated.data.hex, "bada55");
        assert!(updated.data.updated_at >= created.data.updated_at);

        // Soft delete hides the city from reads, clearing the marker brings it back
        let response = app
            .patch(&format!("/api/v1/cities/{id}"))
            .json(&json!({"deleted_at": "2025-01-01T00:00:00Z"}))
            .await;
        response.assert_status_ok();
        app.get(&format!("/api/v1/cities/{id}")).await.assert_status(StatusCode::NOT_FOUND);

        let response = app.patch(&format!("/api/v1/cities/{id}")).json(&json!({"deleted_at": null})).await;
        response.assert_status_ok();
        let response = app.get(&format!("/api/v1/cities/{id}")).await;
        response.assert_status_ok();
        let fetched: ApiResponse<CityResponse> = response.json();
        assert_eq!(fetched.data.hex, "bada55");

        app.patch("/api/v1/cities/99999")
            .json(&json!({"hex": "nope"}))
            .await
            .assert_status(StatusCode::NOT_FOUND);
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_delete_city_removes_translations(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;
        let city = create_test_city(&pool, "dead", &[("EN", "Gone"), ("FR", "Parti")]).await;
        let kept = create_test_city(&pool, "live", &[("EN", "Kept")]).await;
        let translation_ids: Vec<i64> = city.translations.iter().map(|t| t.id).collect();

        let response = app.delete(&format!("/api/v1/cities/{}", city.id)).await;
        response.assert_status_ok();
        let body: ApiResponse<CityDeleted> = response.json();
        assert_eq!(body.data.id, city.id);
        assert_eq!(body.data.translations_deleted, 2);

        app.get(&format!("/api/v1/cities/{}", city.id))
            .await
            .assert_status(StatusCode::NOT_FOUND);
        for id in translation_ids {
            app.get(&format!("/api/v1/translations/{id}"))
                .await
                .assert_status(StatusCode::NOT_FOUND);
        }
        app.get(&format!("/api/v1/cities/{}", kept.id)).await.assert_status_ok();

        let response = app.delete(&format!("/api/v1/cities/{}", city.id)).await;
        response.assert_status(StatusCode::NOT_FOUND);
        let body: Value = response.json();
        assert_eq!(body["message"], format!("City with ID {} not found", city.id));
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_store_failures_report_the_stage(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;
        sqlx::query("DROP TABLE city_translations").execute(&pool).await.unwrap();
        sqlx::query("DROP TABLE cities").execute(&pool).await.unwrap();

        let response = app.get("/api/v1/cities").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["status"], "error");
        assert_eq!(body["message"], "Failed to count cities");

        // A failed store is not a miss
        let response = app.get("/api/v1/cities/search?name=x&lang=EN&translate=true").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["message"], "Failed to resolve translation");
    }

    #[sqlx::test]
    #[test_log::test]
    async fn test_list_stage_failure_after_count(pool: SqlitePool) {
        let app = create_test_app(pool.clone()).await;
        create_test_city(&pool, "ok", &[("EN", "Fine")]).await;
        // Counts like any other row but cannot be decoded into a city
        sqlx::query("INSERT INTO cities (hex, updated_at) VALUES ('bad', 'not a timestamp')")
            .execute(&pool)
            .await
            .unwrap();

        let response = app.get("/api/v1/cities").await;
        response.assert_status(StatusCode::INTERNAL_SERVER_ERROR);
        let body: Value = response.json();
        assert_eq!(body["status"], "error");
        assert_eq!(body["data"], Value::Null);
        assert_eq!(body["message"], "Failed to list cities");
    }
}
