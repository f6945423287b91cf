//! Services module
//!
//! Este módulo contiene la lógica de negocio de la aplicación.
//! Los servicios validan la entrada y orquestan los repositorios.

pub mod deletion_queue;
pub mod route_service;

pub use deletion_queue::DeletionQueue;
pub use route_service::RouteService;
