//! Configuración de conexión a PostgreSQL
//!
//! Crea el pool, aplica las migraciones si se pide y comprueba que el
//! schema esté listo antes de servir requests.

use anyhow::{anyhow, Context, Result};
use sqlx::PgPool;
use tracing::{info, warn};

use crate::config::database::DatabaseConfig;

/// Migraciones embebidas en el binario
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("./migrations");

/// Conexión a la base de datos ya verificada
pub struct DatabaseConnection {
    pool: PgPool,
}

impl DatabaseConnection {
    /// Conectar, migrar (opcional) y verificar el schema
    pub async fn new(config: &DatabaseConfig, run_migrations: bool) -> Result<Self> {
        info!("🔗 Conectando a PostgreSQL: {}", mask_database_url(&config.url));

        let pool = config
            .create_pool()
            .await
            .context("database connecting")?;

        sqlx::query("SELECT 1")
            .execute(&pool)
            .await
            .context("database ping")?;

        if run_migrations {
            run_migrations_on(&pool).await?;
        }

        if !routes_table_exists(&pool).await.context("check table")? {
            warn!("⚠️ La tabla routes no existe");
            return Err(anyhow!("you need to run migrations before running server"));
        }

        info!("✅ Base de datos lista");
        Ok(Self { pool })
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

/// Ejecutar migraciones de la base de datos
pub async fn run_migrations_on(pool: &PgPool) -> Result<()> {
    info!("📜 Aplicando migraciones");
    MIGRATOR.run(pool).await.context("running migrations")?;
    Ok(())
}

/// Verificar que la tabla `routes` existe
pub async fn routes_table_exists(pool: &PgPool) -> Result<bool, sqlx::Error> {
    let (exists,): (bool,) = sqlx::query_as(
        r#"
        SELECT EXISTS (
            SELECT 1
            FROM information_schema.tables
            WHERE table_name = 'routes'
        )
        "#,
    )
    .fetch_one(pool)
    .await?;

    Ok(exists)
}

/// Función helper para enmascarar la URL de la base de datos en logs
pub fn mask_database_url(url: &str) -> String {
    let Some(at_pos) = url.rfind('@') else {
        return url.to_string();
    };
    let scheme_end = url.find("://").map(|p| p + 3).unwrap_or(0);
    if scheme_end > at_pos {
        return url.to_string();
    }

    format!("{}***:***@{}", &url[..scheme_end], &url[at_pos + 1..])
}
