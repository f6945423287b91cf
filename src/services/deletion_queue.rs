//! Cola de borrado en segundo plano
//!
//! Los borrados de rutas se ejecutan fuera del ciclo de vida de la request:
//! el handler encola el lote y responde `202 Accepted` sin esperar.
//! Cada lote corre con su propio timeout, así que cancelar la request no
//! aborta el borrado. Los fallos solo se registran en el log, nunca se
//! devuelven al cliente.
//!
//! Los lotes en curso están limitados por un semáforo para que una ráfaga
//! de borrados lentos no acapare el pool de conexiones.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::{mpsc, Semaphore};
use tokio::task::{JoinHandle, JoinSet};
use tracing::{error, info, warn};

use crate::repositories::route_repository::RouteRepository;
use crate::utils::errors::{AppError, AppResult};

/// Timeout por defecto de cada lote de borrado
pub const DEFAULT_DELETE_TIMEOUT: Duration = Duration::from_secs(30);

/// Lotes de borrado simultáneos por defecto
pub const DEFAULT_MAX_IN_FLIGHT_DELETES: usize = 4;

/// Lotes simultáneos para un pool de `max_connections`: la mitad del pool,
/// como mínimo uno.
pub fn deletion_concurrency(max_connections: u32) -> usize {
    (max_connections / 2).max(1) as usize
}

/// Lote de ids a borrar
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeletionJob {
    pub route_ids: Vec<i32>,
}

/// Extremo emisor de la cola. Clonable y barato.
#[derive(Clone)]
pub struct DeletionQueue {
    sender: mpsc::UnboundedSender<DeletionJob>,
}

impl DeletionQueue {
    /// Arrancar el worker de borrado.
    ///
    /// El worker termina cuando se sueltan todos los `DeletionQueue`, después
    /// de completar los lotes que ya estaban encolados o en curso.
    pub fn spawn(
        repository: Arc<dyn RouteRepository>,
        job_timeout: Duration,
    ) -> (Self, JoinHandle<()>) {
        Self::spawn_with_limit(repository, job_timeout, DEFAULT_MAX_IN_FLIGHT_DELETES)
    }

    /// Igual que `spawn`, con como mucho `max_in_flight` lotes a la vez.
    pub fn spawn_with_limit(
        repository: Arc<dyn RouteRepository>,
        job_timeout: Duration,
        max_in_flight: usize,
    ) -> (Self, JoinHandle<()>) {
        let (sender, receiver) = mpsc::unbounded_channel();
        let limiter = Arc::new(Semaphore::new(max_in_flight.max(1)));
        let handle = tokio::spawn(run_worker(receiver, repository, job_timeout, limiter));
        (Self { sender }, handle)
    }

    /// Encolar un lote. Solo falla si el worker ya no existe.
    pub fn enqueue(&self, route_ids: Vec<i32>) -> AppResult<()> {
        self.sender
            .send(DeletionJob { route_ids })
            .map_err(|_| AppError::Internal("deletion worker is not running".to_string()))
    }
}

async fn run_worker(
    mut receiver: mpsc::UnboundedReceiver<DeletionJob>,
    repository: Arc<dyn RouteRepository>,
    job_timeout: Duration,
    limiter: Arc<Semaphore>,
) {
    info!(
        "🗑️ Worker de borrado iniciado (timeout {:?}, {} lotes simultáneos)",
        job_timeout,
        limiter.available_permits()
    );
    let mut in_flight = JoinSet::new();

    loop {
        tokio::select! {
            job = receiver.recv() => match job {
                Some(job) => {
                    in_flight.spawn(run_job(repository.clone(), job, job_timeout, limiter.clone()));
                }
                None => break,
            },
            Some(joined) = in_flight.join_next(), if !in_flight.is_empty() => {
                if let Err(e) = joined {
                    error!("❌ Tarea de borrado abortada: {}", e);
                }
            }
        }
    }

    while let Some(joined) = in_flight.join_next().await {
        if let Err(e) = joined {
            error!("❌ Tarea de borrado abortada: {}", e);
        }
    }

    info!("👋 Worker de borrado terminado");
}

async fn run_job(
    repository: Arc<dyn RouteRepository>,
    job: DeletionJob,
    job_timeout: Duration,
    limiter: Arc<Semaphore>,
) {
    // El timeout empieza a contar al obtener el permiso
    let _permit = match limiter.acquire_owned().await {
        Ok(permit) => permit,
        Err(e) => {
            error!("❌ Borrado de rutas {:?} descartado: {}", job.route_ids, e);
            return;
        }
    };

    match tokio::time::timeout(job_timeout, repository.delete_by_ids(&job.route_ids)).await {
        Ok(Ok(deleted)) => {
            info!(
                "✅ Borrado completado: {} de {} rutas ({:?})",
                deleted,
                job.route_ids.len(),
                job.route_ids
            );
        }
        Ok(Err(e)) => {
            error!("❌ Error borrando rutas {:?}: {}", job.route_ids, e);
        }
        Err(_) => {
            warn!(
                "⏱️ Timeout borrando rutas {:?} tras {:?}",
                job.route_ids, job_timeout
            );
        }
    }
}
