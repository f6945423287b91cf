//! Shared application state
//!
//! Este módulo define el estado compartido de la aplicación que se pasa
//! a través del router de Axum.

use std::sync::Arc;
use std::time::Duration;

use sqlx::PgPool;
use tokio::task::JoinHandle;

use crate::repositories::route_repository::{PgRouteRepository, RouteRepository};
use crate::services::deletion_queue::{DeletionQueue, DEFAULT_MAX_IN_FLIGHT_DELETES};
use crate::services::route_service::RouteService;

#[derive(Clone)]
pub struct AppState {
    pub routes: RouteService,
}

impl AppState {
    /// Construir el estado sobre PostgreSQL.
    ///
    /// Devuelve también el handle del worker de borrado, que termina cuando
    /// se sueltan todas las copias del estado.
    pub fn new(
        pool: PgPool,
        delete_timeout: Duration,
        max_in_flight_deletes: usize,
    ) -> (Self, JoinHandle<()>) {
        Self::build(
            Arc::new(PgRouteRepository::new(pool)),
            delete_timeout,
            max_in_flight_deletes,
        )
    }

    pub fn with_repository(
        repository: Arc<dyn RouteRepository>,
        delete_timeout: Duration,
    ) -> (Self, JoinHandle<()>) {
        Self::build(repository, delete_timeout, DEFAULT_MAX_IN_FLIGHT_DELETES)
    }

    fn build(
        repository: Arc<dyn RouteRepository>,
        delete_timeout: Duration,
        max_in_flight_deletes: usize,
    ) -> (Self, JoinHandle<()>) {
        let (deletions, worker) =
            DeletionQueue::spawn_with_limit(repository.clone(), delete_timeout, max_in_flight_deletes);
        let state = Self {
            routes: RouteService::new(repository, deletions),
        };
        (state, worker)
    }
}
