//! Helpers compartidos por los tests de integración con PostgreSQL.
//!
//! Se ejecutan solo si `TEST_DATABASE_URL` apunta a una base de datos
//! desechable: cada test trunca la tabla `routes` y la vuelve a sembrar.

#![allow(dead_code)]

use route_registry::config::database::DatabaseConfig;
use route_registry::database::connection::run_migrations_on;
use sqlx::{Executor, PgPool};
use tokio::sync::{Mutex, MutexGuard};

static DB_LOCK: Mutex<()> = Mutex::const_new(());

const TEST_DATA: &str = include_str!("../fixtures/test_data.sql");

pub struct TestDatabase {
    pub pool: PgPool,
    _guard: MutexGuard<'static, ()>,
}

/// Conectar, migrar y sembrar. `None` si no hay base de datos de test.
pub async fn setup_test_database() -> Option<TestDatabase> {
    let url = match std::env::var("TEST_DATABASE_URL") {
        Ok(url) if !url.trim().is_empty() => url,
        _ => {
            println!("⚠️ Skipping test: TEST_DATABASE_URL not set");
            return None;
        }
    };

    let guard = DB_LOCK.lock().await;

    let pool = DatabaseConfig::new(url)
        .create_test_pool()
        .await
        .expect("failed to establish database connection");
    run_migrations_on(&pool)
        .await
        .expect("failed to perform db migration");
    seed_test_data(&pool).await;

    Some(TestDatabase {
        pool,
        _guard: guard,
    })
}

pub async fn seed_test_data(pool: &PgPool) {
    pool.execute(TEST_DATA)
        .await
        .expect("sql script execution");
}
