use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

use crate::models::route::{RegisterOutcome, Route};
use crate::utils::errors::AppError;
use crate::utils::validation::first_validation_message;

/// Orden en el que se reportan los errores de validación del registro
const REGISTER_FIELDS: &[&str] = &["route_id", "route_name", "load", "cargo_type"];

// Request para registrar una ruta
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct RegisterRouteRequest {
    #[validate(range(min = 0, message = "route id should be non-negative"))]
    pub route_id: i32,

    #[validate(length(min = 1, message = "route name should not be empty"))]
    pub route_name: String,

    #[validate(range(min = 0.0, message = "load should be non-negative"))]
    pub load: f64,

    #[validate(length(min = 1, message = "cargo type should not be empty"))]
    pub cargo_type: String,
}

impl RegisterRouteRequest {
    /// Validar y convertir al modelo de dominio
    pub fn into_route(self) -> Result<Route, AppError> {
        self.validate()
            .map_err(|e| AppError::Validation(first_validation_message(&e, REGISTER_FIELDS)))?;

        Ok(Route::new(
            self.route_id,
            self.route_name,
            self.load,
            self.cargo_type,
        ))
    }
}

// Request para borrar rutas
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DeleteRoutesRequest {
    #[serde(default, deserialize_with = "null_as_empty")]
    pub route_ids: Vec<i32>,
}

// `null` se trata igual que una lista ausente
fn null_as_empty<'de, D>(deserializer: D) -> Result<Vec<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<Vec<i32>>::deserialize(deserializer)?.unwrap_or_default())
}

// Response de registro
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RegisterRouteResponse {
    pub route_id: i32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub superseded_route_id: Option<i32>,
}

impl From<RegisterOutcome> for RegisterRouteResponse {
    fn from(outcome: RegisterOutcome) -> Self {
        Self {
            route_id: outcome.route_id(),
            superseded_route_id: outcome.superseded_route_id(),
        }
    }
}

// Response de ruta
#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct RouteResponse {
    pub route_name: String,
    pub load: f64,
    pub cargo_type: String,
}

impl From<Route> for RouteResponse {
    fn from(route: Route) -> Self {
        Self {
            route_name: route.route_name,
            load: route.load,
            cargo_type: route.cargo_type,
        }
    }
}
