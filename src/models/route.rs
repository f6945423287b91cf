//! Modelo de Route
//!
//! Este módulo contiene el struct Route y el resultado de un registro.
//! Mapea exactamente a la tabla `routes` con primary key `route_id`.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Route principal - mapea exactamente a la tabla routes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Route {
    pub route_id: i32,
    pub route_name: String,
    pub load: f64,
    pub cargo_type: String,
    pub is_actual: bool,
}

impl Route {
    /// Crear una ruta vigente
    pub fn new(route_id: i32, route_name: String, load: f64, cargo_type: String) -> Self {
        Self {
            route_id,
            route_name,
            load,
            cargo_type,
            is_actual: true,
        }
    }

    /// Copia de la ruta con otro identificador
    pub fn with_id(&self, route_id: i32) -> Self {
        Self {
            route_id,
            ..self.clone()
        }
    }
}

/// Resultado de registrar una ruta
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterOutcome {
    /// El identificador estaba libre
    Inserted { route_id: i32 },
    /// El identificador ya existía: la fila anterior queda como no vigente
    /// y la nueva se guarda con `max(route_id) + 1`
    Reassigned {
        route_id: i32,
        superseded_route_id: i32,
    },
}

impl RegisterOutcome {
    /// Identificador con el que quedó guardada la ruta
    pub fn route_id(&self) -> i32 {
        match self {
            RegisterOutcome::Inserted { route_id } => *route_id,
            RegisterOutcome::Reassigned { route_id, .. } => *route_id,
        }
    }

    pub fn superseded_route_id(&self) -> Option<i32> {
        match self {
            RegisterOutcome::Inserted { .. } => None,
            RegisterOutcome::Reassigned {
                superseded_route_id,
                ..
            } => Some(*superseded_route_id),
        }
    }
}
