//! Servicio de rutas
//!
//! Valida la entrada, orquesta el repositorio y aplica las reglas de negocio:
//! reasignación de id en registro, ruta reemplazada como `Gone` y borrado
//! en segundo plano.

use std::sync::Arc;

use tracing::{debug, info};

use crate::dto::route_dto::{DeleteRoutesRequest, RegisterRouteRequest};
use crate::models::route::{RegisterOutcome, Route};
use crate::repositories::route_repository::RouteRepository;
use crate::services::deletion_queue::DeletionQueue;
use crate::utils::errors::{AppError, AppResult};
use crate::utils::validation::validate_non_negative_ids;

#[derive(Clone)]
pub struct RouteService {
    repository: Arc<dyn RouteRepository>,
    deletions: DeletionQueue,
}

impl RouteService {
    pub fn new(repository: Arc<dyn RouteRepository>, deletions: DeletionQueue) -> Self {
        Self {
            repository,
            deletions,
        }
    }

    pub async fn register(&self, request: RegisterRouteRequest) -> AppResult<RegisterOutcome> {
        let route = request
            .into_route()
            .map_err(|e| e.context("converting dto to entity model"))?;

        let outcome = self
            .repository
            .register(&route)
            .await
            .map_err(|e| e.context("route registration"))?;

        if let RegisterOutcome::Reassigned {
            route_id,
            superseded_route_id,
        } = outcome
        {
            info!(
                "🔁 Route {} ya existía: marcada como no vigente, nueva ruta guardada como {}",
                superseded_route_id, route_id
            );
        }

        Ok(outcome)
    }

    /// Obtener una ruta vigente.
    ///
    /// Una ruta que perdió un conflicto de registro sigue en la tabla pero
    /// se reporta como `AppError::Gone`.
    pub async fn get_by_id(&self, route_id: i32) -> AppResult<Route> {
        if route_id < 0 {
            return Err(AppError::Validation(
                "route id should be non-negative".to_string(),
            ));
        }

        let route = self
            .repository
            .get_by_id(route_id)
            .await
            .map_err(|e| e.context("getting route by id"))?;

        if !route.is_actual {
            return Err(AppError::Gone("route is not actual".to_string()));
        }

        Ok(route)
    }

    /// Encolar el borrado de las rutas y volver sin esperar.
    pub async fn delete_by_ids(&self, request: DeleteRoutesRequest) -> AppResult<()> {
        validate_non_negative_ids(&request.route_ids).map_err(|e| {
            let message = e
                .message
                .map(|m| m.to_string())
                .unwrap_or_else(|| e.code.to_string());
            AppError::Validation(message).context("deleting routes")
        })?;

        let mut route_ids = request.route_ids;
        route_ids.sort_unstable();
        route_ids.dedup();

        if route_ids.is_empty() {
            debug!("🗑️ Lista de ids vacía, nada que borrar");
            return Ok(());
        }

        debug!("🗑️ Encolando borrado de {} rutas", route_ids.len());
        self.deletions
            .enqueue(route_ids)
            .map_err(|e| e.context("deleting routes"))
    }

    /// Comprobar que el almacenamiento responde
    pub async fn health(&self) -> AppResult<()> {
        self.repository
            .ping()
            .await
            .map_err(|e| AppError::ServiceUnavailable(e.to_string()))
    }
}
