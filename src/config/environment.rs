//! Configuración de variables de entorno
//!
//! Cada opción se puede dar por flag o por variable de entorno.
//! Si ambas están presentes, gana la variable de entorno.

use std::env;
use std::time::Duration;

use anyhow::{anyhow, Result};
use clap::Parser;

use crate::services::deletion_queue::DEFAULT_DELETE_TIMEOUT;

/// Route Registry - registro, consulta y borrado de rutas
#[derive(Parser, Debug, Clone, Default)]
#[command(name = "route_registry")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Dirección del servidor (SERVER_ADDRESS)
    #[arg(short = 'a', long = "address")]
    pub server_address: Option<String>,

    /// Cadena de conexión a PostgreSQL (CONNECTION_STRING)
    #[arg(short = 'b', long = "connection-string")]
    pub connection_string: Option<String>,

    /// Máximo de conexiones del pool (DB_MAX_CONNECTIONS)
    #[arg(long)]
    pub max_connections: Option<u32>,

    /// Timeout en segundos de cada lote de borrado (DELETE_TIMEOUT_SECS)
    #[arg(long = "delete-timeout")]
    pub delete_timeout_secs: Option<u64>,

    /// Ejecutar migraciones al arrancar (RUN_MIGRATIONS)
    #[arg(long = "migrate")]
    pub run_migrations: bool,

    /// Orígenes CORS permitidos, separados por comas (CORS_ORIGINS)
    #[arg(long)]
    pub cors_origins: Option<String>,
}

/// Configuración del entorno
#[derive(Debug, Clone)]
pub struct EnvironmentConfig {
    pub server_address: String,
    pub connection_string: String,
    pub max_connections: u32,
    pub delete_timeout: Duration,
    pub run_migrations: bool,
    pub cors_origins: Vec<String>,
}

impl EnvironmentConfig {
    /// Resolver la configuración con las variables del proceso
    pub fn from_cli(cli: Cli) -> Result<Self> {
        Self::resolve(cli, |key| env::var(key).ok())
    }

    /// Resolver la configuración con un lector de variables arbitrario
    pub fn resolve(cli: Cli, lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let server_address = var("SERVER_ADDRESS")
            .or(cli.server_address)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!(r#"set env variable SERVER_ADDRESS or use "-a" flag"#))?;

        let connection_string = var("CONNECTION_STRING")
            .or(cli.connection_string)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| anyhow!(r#"set env variable CONNECTION_STRING or use "-b" flag"#))?;

        let max_connections = match var("DB_MAX_CONNECTIONS") {
            Some(v) => v
                .parse()
                .map_err(|_| anyhow!("DB_MAX_CONNECTIONS must be a valid number"))?,
            None => cli.max_connections.unwrap_or(10),
        };

        let delete_timeout = match var("DELETE_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(
                v.parse()
                    .map_err(|_| anyhow!("DELETE_TIMEOUT_SECS must be a valid number"))?,
            ),
            None => cli
                .delete_timeout_secs
                .map(Duration::from_secs)
                .unwrap_or(DEFAULT_DELETE_TIMEOUT),
        };

        let run_migrations = match var("RUN_MIGRATIONS") {
            Some(v) => matches!(v.trim().to_lowercase().as_str(), "1" | "true" | "yes"),
            None => cli.run_migrations,
        };

        let cors_origins = var("CORS_ORIGINS")
            .or(cli.cors_origins)
            .map(|v| {
                v.split(',')
                    .map(|s| s.trim().to_string())
                    .filter(|s| !s.is_empty())
                    .collect()
            })
            .unwrap_or_default();

        Ok(Self {
            server_address,
            connection_string,
            max_connections,
            delete_timeout,
            run_migrations,
            cors_origins,
        })
    }

    /// Dirección para `bind`. Acepta la forma corta `:8080`.
    pub fn bind_address(&self) -> String {
        if self.server_address.starts_with(':') {
            format!("0.0.0.0{}", self.server_address)
        } else {
            self.server_address.clone()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_flags_only() {
        let cli = Cli::parse_from([
            "route_registry",
            "-a",
            "127.0.0.1:8080",
            "-b",
            "postgres://localhost/routes",
            "--delete-timeout",
            "5",
        ]);
        let config = EnvironmentConfig::resolve(cli, lookup(&[])).unwrap();

        assert_eq!(config.server_address, "127.0.0.1:8080");
        assert_eq!(config.connection_string, "postgres://localhost/routes");
        assert_eq!(config.max_connections, 10);
        assert_eq!(config.delete_timeout, Duration::from_secs(5));
        assert!(!config.run_migrations);
        assert!(config.cors_origins.is_empty());
    }

    #[test]
    fn test_env_wins_over_flags() {
        let cli = Cli::parse_from(["route_registry", "-a", ":1", "-b", "flag-conn", "--migrate"]);
        let config = EnvironmentConfig::resolve(
            cli,
            lookup(&[
                ("SERVER_ADDRESS", "0.0.0.0:9000"),
                ("CONNECTION_STRING", "env-conn"),
                ("RUN_MIGRATIONS", "false"),
                ("CORS_ORIGINS", "https://a.example, https://b.example"),
            ]),
        )
        .unwrap();

        assert_eq!(config.server_address, "0.0.0.0:9000");
        assert_eq!(config.connection_string, "env-conn");
        assert!(!config.run_migrations);
        assert_eq!(
            config.cors_origins,
            vec!["https://a.example".to_string(), "https://b.example".to_string()]
        );
    }

    #[test]
    fn test_empty_env_falls_back_to_flag() {
        let cli = Cli::parse_from(["route_registry", "-a", ":1", "-b", "flag-conn"]);
        let config =
            EnvironmentConfig::resolve(cli, lookup(&[("SERVER_ADDRESS", "")])).unwrap();
        assert_eq!(config.server_address, ":1");
    }

    #[test]
    fn test_missing_settings() {
        let err = EnvironmentConfig::resolve(Cli::default(), lookup(&[])).unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"set env variable SERVER_ADDRESS or use "-a" flag"#
        );

        let err = EnvironmentConfig::resolve(
            Cli::default(),
            lookup(&[("SERVER_ADDRESS", ":8080")]),
        )
        .unwrap_err();
        assert_eq!(
            err.to_string(),
            r#"set env variable CONNECTION_STRING or use "-b" flag"#
        );
    }

    #[test]
    fn test_bind_address() {
        let cli = Cli::parse_from(["route_registry", "-a", ":8080", "-b", "conn"]);
        let config = EnvironmentConfig::resolve(cli, lookup(&[])).unwrap();
        assert_eq!(config.bind_address(), "0.0.0.0:8080");

        let cli = Cli::parse_from(["route_registry", "-a", "127.0.0.1:8080", "-b", "conn"]);
        let config = EnvironmentConfig::resolve(cli, lookup(&[])).unwrap();
        assert_eq!(config.bind_address(), "127.0.0.1:8080");
    }

    #[test]
    fn test_invalid_number() {
        let err = EnvironmentConfig::resolve(
            Cli::default(),
            lookup(&[
                ("SERVER_ADDRESS", ":8080"),
                ("CONNECTION_STRING", "conn"),
                ("DB_MAX_CONNECTIONS", "many"),
            ]),
        )
        .unwrap_err();
        assert_eq!(err.to_string(), "DB_MAX_CONNECTIONS must be a valid number");
    }
}
