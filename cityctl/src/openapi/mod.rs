//! OpenAPI documentation for the `/api/v1` surface.
//!
//! [`ApiDoc`] is served as JSON at `/api/v1/openapi.json` and rendered with Scalar at `/docs`.

use utoipa::OpenApi;

use crate::api;

#[derive(OpenApi)]
#[openapi(
    info(
        title = "cityctl API",
        description = "Cities, their localized names, and paginated search over those names."
    ),
    servers(
        (url = "/api/v1", description = "cityctl API server")
    ),
    paths(
        api::handlers::cities::list_cities,
        api::handlers::cities::search_cities,
        api::handlers::cities::create_city,
        api::handlers::cities::get_city,
        api::handlers::cities::update_city,
        api::handlers::cities::delete_city,
        api::handlers::translations::create_translation,
        api::handlers::translations::get_translation,
        api::handlers::translations::update_translation,
        api::handlers::translations::delete_translation,
    ),
    components(
        schemas(
            api::models::cities::CityCreate,
            api::models::cities::CityUpdate,
            api::models::cities::CityResponse,
            api::models::cities::CityDeleted,
            api::models::cities::TranslatedName,
            api::models::translations::TranslationCreate,
            api::models::translations::TranslationUpdate,
            api::models::translations::TranslationResponse,
            api::models::pagination::PageMeta,
            api::models::responses::ErrorResponse,
        )
    ),
    tags(
        (name = "cities", description = "Cities, search and translate mode"),
        (name = "translations", description = "Localized city names"),
    )
)]
pub struct ApiDoc;
