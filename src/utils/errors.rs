//! Sistema de manejo de errores
//!
//! Este módulo define los tipos de errores del servicio de rutas
//! y su conversión a respuestas HTTP.
//!
//! El contrato HTTP es simple: todo fallo se devuelve como `500` con
//! `{"error": "..."}`, salvo una ruta reemplazada (`410 Gone`) y el
//! health check (`503`).

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use thiserror::Error;
use tracing::{error, warn};

/// Errores principales de la aplicación
#[derive(Error, Debug, Clone, PartialEq)]
pub enum AppError {
    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Gone(String),

    #[error("{0}")]
    Database(String),

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    ServiceUnavailable(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    /// Antepone un prefijo de contexto al mensaje, conservando la variante.
    ///
    /// `AppError::NotFound("no rows".into()).context("getting route by id")`
    /// produce `getting route by id: no rows`.
    pub fn context(self, prefix: &str) -> Self {
        let wrap = |msg: String| format!("{}: {}", prefix, msg);
        match self {
            AppError::Validation(msg) => AppError::Validation(wrap(msg)),
            AppError::NotFound(msg) => AppError::NotFound(wrap(msg)),
            AppError::Gone(msg) => AppError::Gone(wrap(msg)),
            AppError::Database(msg) => AppError::Database(wrap(msg)),
            AppError::BadRequest(msg) => AppError::BadRequest(wrap(msg)),
            AppError::ServiceUnavailable(msg) => AppError::ServiceUnavailable(wrap(msg)),
            AppError::Internal(msg) => AppError::Internal(wrap(msg)),
        }
    }

    /// Código HTTP asociado a cada variante
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::Gone(_) => StatusCode::GONE,
            AppError::ServiceUnavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Código corto para logs
    pub fn code(&self) -> &'static str {
        match self {
            AppError::Validation(_) => "VALIDATION_ERROR",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Gone(_) => "GONE",
            AppError::Database(_) => "DB_ERROR",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::ServiceUnavailable(_) => "SERVICE_UNAVAILABLE",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

impl From<sqlx::Error> for AppError {
    fn from(e: sqlx::Error) -> Self {
        match e {
            sqlx::Error::RowNotFound => AppError::NotFound("no rows in result set".to_string()),
            other => AppError::Database(other.to_string()),
        }
    }
}

/// Respuesta de error para la API
#[derive(Debug, serde::Serialize, serde::Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        match &self {
            AppError::Gone(msg)
            | AppError::Validation(msg)
            | AppError::NotFound(msg)
            | AppError::BadRequest(msg) => {
                warn!("⚠️ [{}] {}", self.code(), msg);
            }
            other => {
                error!("❌ [{}] {}", other.code(), other);
            }
        }

        let body = ErrorResponse {
            error: self.to_string(),
        };

        (status, Json(body)).into_response()
    }
}

/// Resultado tipado para operaciones que pueden fallar
pub type AppResult<T> = Result<T, AppError>;

/// Función helper para crear errores de recurso no encontrado
pub fn not_found_error(resource: &str, id: &str) -> AppError {
    AppError::NotFound(format!("{} with id '{}' not found", resource, id))
}

/// Función helper para crear errores de solicitud incorrecta
pub fn bad_request_error(message: &str) -> AppError {
    AppError::BadRequest(message.to_string())
}
