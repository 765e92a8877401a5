//! Test helpers: configuration, application and fixture constructors.

use crate::api::models::items::ItemCreate;
use crate::config::{Config, CorsConfig, DatabaseConfig, PasswordConfig, PoolSettings};
use crate::db::handlers::{Items, Repository, Users};
use crate::db::models::{items::ItemCreateDBRequest, items::ItemDBResponse, users::UserCreateDBRequest, users::UserDBResponse};
use crate::password::{self, Argon2Params};
use crate::types::UserId;
use axum_test::TestServer;
use sqlx::SqlitePool;

const TEST_ARGON2: Argon2Params = Argon2Params {
    memory_kib: 8,
    iterations: 1,
    parallelism: 1,
};

pub async fn create_test_app(pool: SqlitePool) -> TestServer {
    let config = create_test_config();

    let app = crate::Application::new_with_pool(config, Some(pool))
        .await
        .expect("Failed to create application");

    app.into_test_server()
}

pub fn create_test_config() -> Config {
    Config {
        host: "127.0.0.1".to_string(),
        port: 0,
        database_url: None,
        database: DatabaseConfig {
            // Only used when a test doesn't supply its own pool
            url: "sqlite::memory:".to_string(),
            pool: PoolSettings {
                max_connections: 1,
                min_connections: 1,
                ..Default::default()
            },
        },
        slow_statement_threshold_ms: 1000,
        // Cheap hashing keeps the HTTP tests fast in debug builds
        password: PasswordConfig {
            argon2_memory_kib: TEST_ARGON2.memory_kib,
            argon2_iterations: TEST_ARGON2.iterations,
            argon2_parallelism: TEST_ARGON2.parallelism,
        },
        cors: CorsConfig::default(),
        // The Prometheus recorder is process-global, tests opt in explicitly
        enable_metrics: false,
        enable_otel_export: false,
    }
}

pub async fn create_test_user(pool: &SqlitePool, email: &str) -> UserDBResponse {
    let hashed_password = password::hash_string_with_params("password", Some(TEST_ARGON2)).expect("Failed to hash test password");

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Users::new(&mut conn)
        .create(&UserCreateDBRequest::new(email.to_string(), hashed_password))
        .await
        .expect("Failed to create test user")
}

pub async fn create_test_item(pool: &SqlitePool, owner_id: UserId, title: &str) -> ItemDBResponse {
    let request = ItemCreateDBRequest::new(
        owner_id,
        ItemCreate {
            title: title.to_string(),
            description: None,
        },
    );

    let mut conn = pool.acquire().await.expect("Failed to acquire connection");
    Items::new(&mut conn).create(&request).await.expect("Failed to create test item")
}
