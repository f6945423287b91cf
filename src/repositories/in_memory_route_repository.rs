//! Repositorio en memoria para tests.
//!
//! Reproduce la semántica del repositorio PostgreSQL sobre un `HashMap`
//! protegido por un `RwLock`.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::models::route::{RegisterOutcome, Route};
use crate::utils::errors::{not_found_error, AppError, AppResult};

use super::route_repository::RouteRepository;

#[derive(Clone, Default)]
pub struct InMemoryRouteRepository {
    routes: Arc<RwLock<HashMap<i32, Route>>>,
    failure: Option<AppError>,
    delete_calls: Arc<AtomicUsize>,
}

impl InMemoryRouteRepository {
    pub fn new() -> Self {
        Self::default()
    }

    /// Repositorio cuyas operaciones fallan siempre con `error`
    pub fn failing(error: AppError) -> Self {
        Self {
            failure: Some(error),
            ..Self::default()
        }
    }

    pub async fn seed(&self, routes: impl IntoIterator<Item = Route>) {
        let mut map = self.routes.write().await;
        for route in routes {
            map.insert(route.route_id, route);
        }
    }

    pub async fn snapshot(&self, route_id: i32) -> Option<Route> {
        self.routes.read().await.get(&route_id).cloned()
    }

    pub async fn len(&self) -> usize {
        self.routes.read().await.len()
    }

    pub fn delete_calls(&self) -> usize {
        self.delete_calls.load(Ordering::SeqCst)
    }

    fn check(&self) -> AppResult<()> {
        match &self.failure {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }
}

#[async_trait]
impl RouteRepository for InMemoryRouteRepository {
    async fn register(&self, route: &Route) -> AppResult<RegisterOutcome> {
        self.check().map_err(|e| e.context("register route"))?;

        let mut map = self.routes.write().await;
        match map.get_mut(&route.route_id) {
            None => {
                map.insert(route.route_id, route.clone());
                Ok(RegisterOutcome::Inserted {
                    route_id: route.route_id,
                })
            }
            Some(existing) => {
                existing.is_actual = false;
                let new_id = map.keys().max().copied().unwrap_or(-1) + 1;
                map.insert(new_id, route.with_id(new_id));
                Ok(RegisterOutcome::Reassigned {
                    route_id: new_id,
                    superseded_route_id: route.route_id,
                })
            }
        }
    }

    async fn get_by_id(&self, route_id: i32) -> AppResult<Route> {
        self.check().map_err(|e| e.context("getting route by id"))?;

        self.routes
            .read()
            .await
            .get(&route_id)
            .cloned()
            .ok_or_else(|| not_found_error("Route", &route_id.to_string()))
    }

    async fn delete_by_ids(&self, route_ids: &[i32]) -> AppResult<u64> {
        self.delete_calls.fetch_add(1, Ordering::SeqCst);
        self.check().map_err(|e| e.context("deleting route by id"))?;

        let mut map = self.routes.write().await;
        let removed = route_ids
            .iter()
            .filter(|id| map.remove(*id).is_some())
            .count();
        Ok(removed as u64)
    }

    async fn ping(&self) -> AppResult<()> {
        self.check().map_err(|e| e.context("database ping"))
    }
}
