//! Test utilities shared by the handler and repository tests.

use crate::config::{Config, PoolSettings};
use crate::db::{
    handlers::{Cities, Repository, Translations},
    models::{
        cities::{CityCreateDBRequest, CityDBResponse},
        translations::TranslationCreateDBRequest,
    },
};
use crate::types::normalize_lang;
use axum_test::TestServer;
use sqlx::SqlitePool;

pub async fn create_test_app(pool: SqlitePool) -> TestServer {
    let config = create_test_config();

    let app = crate::Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> Config {
    let mut config = Config::default();
    config.database.pool = PoolSettings {
        max_connections: 1,
        min_connections: 0,
        ..Default::default()
    };
    config
}

/// Insert a city with the given `(lang, name)` translations and return it as the API would load it
pub async fn create_test_city(pool: &SqlitePool, hex: &str, translations: &[(&str, &str)]) -> CityDBResponse {
    let mut conn = pool.acquire().await.expect("Failed to acquire connection");

    let city = Cities::new(&mut conn)
        .create(&CityCreateDBRequest { hex: hex.to_string() })
        .await
        .expect("Failed to create test city");

    for (lang, name) in translations {
        Translations::new(&mut conn)
            .create(&TranslationCreateDBRequest {
                city_id: city.id,
                lang: normalize_lang(lang),
                name: name.to_string(),
            })
            .await
            .expect("Failed to create test translation");
    }

    Cities::new(&mut conn)
        .get_by_id(city.id)
        .await
        .expect("Failed to reload test city")
        .expect("Test city disappeared")
}
