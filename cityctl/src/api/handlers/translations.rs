use crate::api::models::{
    responses::{ApiResponse, ErrorResponse},
    translations::{TranslationCreate, TranslationResponse, TranslationUpdate},
};
use crate::db::errors::DbError;
use crate::db::handlers::{Cities, Repository, Translations};
use crate::db::models::translations::{TranslationCreateDBRequest, TranslationUpdateDBRequest};
use crate::errors::{ApiJson, Error, Result, stage};
use crate::types::{CityId, TranslationId, non_blank, normalize_lang};
use crate::AppState;
use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};
use sqlx::SqliteConnection;

/// A referenced city id must be non-zero and point at a visible city
async fn ensure_city(conn: &mut SqliteConnection, city_id: CityId, operation: &'static str) -> Result<()> {
    if city_id == 0 {
        return Err(Error::bad_request("Field 'city_id' must be a non-zero integer"));
    }
    if !Cities::new(conn).exists(city_id).await.map_err(stage(operation))? {
        return Err(Error::not_found("City", city_id));
    }
    Ok(())
}

/// Present text fields must not be blank
fn present_text<'a>(field: &str, value: Option<&'a str>) -> Result<Option<&'a str>> {
    match value {
        None => Ok(None),
        Some(raw) => non_blank(Some(raw))
            .map(Some)
            .ok_or_else(|| Error::bad_request(format!("Field '{field}' must not be blank"))),
    }
}

#[utoipa::path(
    post,
    path = "/translations",
    tag = "translations",
    summary = "Create translation",
    request_body = TranslationCreate,
    responses(
        (status = 201, description = "Translation created", body = ApiResponse<TranslationResponse>),
        (status = 400, description = "Missing or invalid field", body = ErrorResponse),
        (status = 404, description = "Referenced city not found", body = ErrorResponse),
        (status = 409, description = "The city already has a translation in this language", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn create_translation(
    State(state): State<AppState>,
    ApiJson(create): ApiJson<TranslationCreate>,
) -> Result<(StatusCode, Json<ApiResponse<TranslationResponse>>)> {
    let city_id = create
        .city_id
        .ok_or_else(|| Error::bad_request("Field 'city_id' is required"))?;
    let lang = present_text("lang", create.lang.as_deref())?.ok_or_else(|| Error::bad_request("Field 'lang' is required"))?;
    let name = present_text("name", create.name.as_deref())?.ok_or_else(|| Error::bad_request("Field 'name' is required"))?;

    let mut tx = state.db.begin().await.map_err(|e| stage("create translation")(e.into()))?;
    ensure_city(&mut tx, city_id, "create translation").await?;

    let translation = Translations::new(&mut tx)
        .create(&TranslationCreateDBRequest {
            city_id,
            lang: normalize_lang(lang),
            name: name.to_string(),
        })
        .await
        .map_err(stage("create translation"))?;

    tx.commit().await.map_err(|e| stage("create translation")(e.into()))?;

    Ok((StatusCode::CREATED, Json(ApiResponse::success(TranslationResponse::from(translation)))))
}

#[utoipa::path(
    get,
    path = "/translations/{id}",
    tag = "translations",
    summary = "Get translation",
    params(("id" = i64, Path, description = "Translation ID")),
    responses(
        (status = 200, description = "Translation", body = ApiResponse<TranslationResponse>),
        (status = 404, description = "Translation not found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn get_translation(
    State(state): State<AppState>,
    Path(id): Path<TranslationId>,
) -> Result<Json<ApiResponse<TranslationResponse>>> {
    let mut conn = state.db.acquire().await.map_err(|e| stage("get translation")(e.into()))?;
    let translation = Translations::new(&mut conn)
        .get_by_id(id)
        .await
        .map_err(stage("get translation"))?
        .ok_or_else(|| Error::not_found("Translation", id))?;

    Ok(Json(ApiResponse::success(TranslationResponse::from(translation))))
}

#[utoipa::path(
    patch,
    path = "/translations/{id}",
    tag = "translations",
    summary = "Update translation",
    description = "Absent fields are kept. A new `city_id` must reference an existing city.",
    request_body = TranslationUpdate,
    params(("id" = i64, Path, description = "Translation ID")),
    responses(
        (status = 200, description = "Updated translation", body = ApiResponse<TranslationResponse>),
        (status = 400, description = "Invalid field", body = ErrorResponse),
        (status = 404, description = "Translation or referenced city not found", body = ErrorResponse),
        (status = 409, description = "The city already has a translation in this language", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn update_translation(
    State(state): State<AppState>,
    Path(id): Path<TranslationId>,
    ApiJson(update): ApiJson<TranslationUpdate>,
) -> Result<Json<ApiResponse<TranslationResponse>>> {
    let lang = present_text("lang", update.lang.as_deref())?.map(normalize_lang);
    let name = present_text("name", update.name.as_deref())?.map(str::to_string);

    let mut tx = state.db.begin().await.map_err(|e| stage("update translation")(e.into()))?;
    if let Some(city_id) = update.city_id {
        ensure_city(&mut tx, city_id, "update translation").await?;
    }

    let translation = Translations::new(&mut tx)
        .update(
            id,
            &TranslationUpdateDBRequest {
                city_id: update.city_id,
                lang,
                name,
            },
        )
        .await
        .map_err(|e| match e {
            DbError::NotFound => Error::not_found("Translation", id),
            other => stage("update translation")(other),
        })?;

    tx.commit().await.map_err(|e| stage("update translation")(e.into()))?;

    Ok(Json(ApiResponse::success(TranslationResponse::from(translation))))
}

#[utoipa::path(
    delete,
    path = "/translations/{id}",
    tag = "translations",
    summary = "Delete translation",
    params(("id" = i64, Path, description = "Translation ID")),
    responses(
        (status = 200, description = "The deleted translation", body = ApiResponse<TranslationResponse>),
        (status = 404, description = "Translation not found", body = ErrorResponse),
        (status = 500, description = "Store failure", body = ErrorResponse)
    )
)]
#[tracing::instrument(skip_all)]
pub async fn delete_translation(
    State(state): State<AppState>,
    Path(id): Path<TranslationId>,
) -> Result<Json<ApiResponse<TranslationResponse>>> {
    let mut tx = state.db.begin().await.map_err(|e| stage("delete translation")(e.into()))?;
    let mut repo = Translations::new(&mut tx);

    let translation = repo
        .get_by_id(id)
        .await
        .map_err(stage("delete translation"))?
        .ok_or_else(|| Error::not_found("Translation", id))?;
    repo.delete(id).await.map_err(stage("delete translation"))?;

    tx.commit().await.map_err(|e| stage("delete translation")(e.into()))?;

    Ok(Json(ApiResponse::success(TranslationResponse::from(translation))))
}
