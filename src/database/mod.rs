//! Módulo de base de datos
//!
//! Maneja la conexión, las migraciones y la verificación del schema de PostgreSQL

pub mod connection;

pub use connection::DatabaseConnection;
