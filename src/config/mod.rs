//! Configuración del proyecto
//!
//! Este módulo contiene la configuración de base de datos y las variables
//! de entorno / flags del servidor.

pub mod database;
pub mod environment;

pub use environment::*;
