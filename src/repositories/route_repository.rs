use async_trait::async_trait;
use sqlx::PgPool;
use tracing::debug;

use crate::models::route::{RegisterOutcome, Route};
use crate::utils::errors::{not_found_error, AppError, AppResult};

/// Clave del advisory lock que serializa los registros concurrentes
const REGISTER_LOCK_KEY: i64 = 0x726f_7574_6573;

/// Inserta la ruta con el id pedido. Si el id ya existe, la fila existente
/// pasa a `is_actual = false` y la ruta se inserta con `max(route_id) + 1`.
/// Todos los CTE ven el mismo snapshot, así que `new_id` se calcula sobre
/// el estado previo a la sentencia.
const REGISTER_SQL: &str = r#"
    WITH try AS (
        INSERT INTO routes (route_id, route_name, load, cargo_type)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (route_id) DO UPDATE SET is_actual = FALSE
        RETURNING (xmax = 0) AS inserted
    ), new_id AS (
        SELECT COALESCE(MAX(route_id), -1) + 1 AS route_id
        FROM routes
    ), insert_new AS (
        INSERT INTO routes (route_id, route_name, load, cargo_type)
        SELECT new_id.route_id, $2, $3, $4
        FROM new_id
        WHERE NOT EXISTS (SELECT 1 FROM try WHERE inserted)
        RETURNING route_id
    )
    SELECT
        COALESCE((SELECT route_id FROM insert_new), $1) AS route_id,
        EXISTS (SELECT 1 FROM insert_new) AS reassigned
"#;

/// Acceso a la tabla `routes`
#[async_trait]
pub trait RouteRepository: Send + Sync {
    /// Registra una ruta, reasignando el id si colisiona
    async fn register(&self, route: &Route) -> AppResult<RegisterOutcome>;

    /// Obtiene la ruta con el id dado, vigente o no
    async fn get_by_id(&self, route_id: i32) -> AppResult<Route>;

    /// Borra todas las rutas cuyo id esté en la lista. Devuelve las filas borradas.
    async fn delete_by_ids(&self, route_ids: &[i32]) -> AppResult<u64>;

    /// Comprueba que el almacenamiento responde
    async fn ping(&self) -> AppResult<()>;
}

pub struct PgRouteRepository {
    pool: PgPool,
}

impl PgRouteRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl RouteRepository for PgRouteRepository {
    async fn register(&self, route: &Route) -> AppResult<RegisterOutcome> {
        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| AppError::from(e).context("register route"))?;

        sqlx::query("SELECT pg_advisory_xact_lock($1)")
            .bind(REGISTER_LOCK_KEY)
            .execute(&mut *tx)
            .await
            .map_err(|e| AppError::from(e).context("register route"))?;

        let (route_id, reassigned): (i32, bool) = sqlx::query_as(REGISTER_SQL)
            .bind(route.route_id)
            .bind(&route.route_name)
            .bind(route.load)
            .bind(&route.cargo_type)
            .fetch_one(&mut *tx)
            .await
            .map_err(|e| AppError::from(e).context("register route"))?;

        tx.commit()
            .await
            .map_err(|e| AppError::from(e).context("register route"))?;

        let outcome = if reassigned {
            RegisterOutcome::Reassigned {
                route_id,
                superseded_route_id: route.route_id,
            }
        } else {
            RegisterOutcome::Inserted { route_id }
        };

        debug!("💾 Route registrada: {:?}", outcome);
        Ok(outcome)
    }

    async fn get_by_id(&self, route_id: i32) -> AppResult<Route> {
        let route = sqlx::query_as::<_, Route>(
            r#"
            SELECT route_id, route_name, load, cargo_type, is_actual
            FROM routes
            WHERE route_id = $1
            "#,
        )
        .bind(route_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| AppError::from(e).context("getting route by id"))?;

        route.ok_or_else(|| not_found_error("Route", &route_id.to_string()))
    }

    async fn delete_by_ids(&self, route_ids: &[i32]) -> AppResult<u64> {
        if route_ids.is_empty() {
            return Ok(0);
        }

        let result = sqlx::query("DELETE FROM routes WHERE route_id = ANY($1)")
            .bind(route_ids)
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from(e).context("deleting route by id"))?;

        Ok(result.rows_affected())
    }

    async fn ping(&self) -> AppResult<()> {
        sqlx::query("SELECT 1")
            .execute(&self.pool)
            .await
            .map_err(|e| AppError::from(e).context("database ping"))?;
        Ok(())
    }
}
