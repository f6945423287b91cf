//! Route Registry
//!
//! Servicio HTTP para registrar, consultar y borrar rutas de carga
//! guardadas en PostgreSQL.

pub mod config;
pub mod database;
pub mod dto;
pub mod middleware;
pub mod models;
pub mod repositories;
pub mod routes;
pub mod services;
pub mod state;
pub mod utils;
